pub mod commands;
pub mod error;
pub mod menu;
pub mod models;
pub mod storage;
pub mod store;
pub mod tui;
