pub mod commands;
pub mod common;
pub mod menu;
pub mod model;
pub mod render;
