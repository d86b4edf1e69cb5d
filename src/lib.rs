pub mod brew;
pub mod config;
pub mod exec;
pub mod tray;
