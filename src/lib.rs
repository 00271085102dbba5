#![doc = "The `tasktrack` library crate."]
#![doc = ""]
#![doc = "This crate contains the domain models, JWT authentication mechanisms, routing"]
#![doc = "configuration, and error handling for the TaskTrack API: a multi-user task"]
#![doc = "tracker where every category and task is scoped to its owning account."]
#![doc = "It is used by the main binary (`main.rs`) to construct and run the application."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
