pub mod client;
pub mod config;
pub mod error;
pub mod event;
pub mod path;
pub mod ui;
