mod env_version;
mod nav_bar;
pub mod table;

pub use env_version::env_version;
pub use nav_bar::nav_bar;
