pub mod api;
pub mod app;
pub mod config;
pub mod polling;
pub mod session;
pub mod shared;
pub mod state;
pub mod workflows;
