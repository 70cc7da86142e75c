pub mod coindcx;
pub mod config;
pub mod error;
pub mod event;
pub mod input;
pub mod model;
pub mod monitor;
pub mod notify;
pub mod twilio;
pub mod ui;
