use std::any::Any;
use std::fmt::Debug;

use crate::{Dep, Updater};

/// A user-triggered action.
///
/// Commands run synchronously on the UI thread: they read their inputs from
/// [`Dep`], validate, and either publish a result directly or start a network
/// call whose callback owns a cloned [`Updater`]. Registered with
/// `record_command` and triggered via `dispatch` (immediately) or
/// `enqueue_command`/`flush_commands` (end of frame).
pub trait Command: Any + Debug {
    fn run(&self, deps: Dep<'_>, updater: Updater);
}
