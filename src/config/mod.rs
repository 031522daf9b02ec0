pub mod env;
mod loader;

pub use env::{AppConfig, DirectoryConfig, SearchConfig};
pub use loader::load_config;
