pub mod admin;
pub mod api;
pub mod auth;
pub mod browser;
pub mod card;
pub mod cli;
pub mod config;
pub mod error;
pub mod event;
pub mod logging;
pub mod model;
pub mod session;
pub mod state;
pub mod timer;
pub mod tui;
pub mod ui;
