pub mod cli;
pub mod config;
pub mod format;
pub mod hosts;
