pub mod api;
pub mod cli;
pub mod config;
pub mod controller;
pub mod error;
pub mod logging;
pub mod models;
pub mod repl;
pub mod session;
pub mod ui;
