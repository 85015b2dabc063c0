//! Config file loading, CLI overlay, and the validated run configuration.
mod apply;
mod bench_config;
mod loader;
pub mod types;


pub use apply::apply_config;
pub use bench_config::BenchConfig;
pub use loader::{load_config, load_config_file};
