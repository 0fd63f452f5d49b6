//! Shared utilities for the Taskdeck workspace.
//!
//! Currently this is build metadata: version, commit, and environment labels
//! shown in the nav bar and sent nowhere else.

pub mod version_info;
