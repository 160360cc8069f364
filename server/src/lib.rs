pub mod app;
pub mod background;
pub mod bootstrap;
pub mod config;
pub mod server;
pub mod shutdown;

pub use bootstrap::{init_foundation, load_remote_config};
