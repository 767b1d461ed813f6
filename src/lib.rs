pub mod app;
pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod router;
pub mod state;
pub mod ui;
