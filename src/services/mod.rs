pub mod cli_runner;
pub mod envelope;
pub mod loader;
