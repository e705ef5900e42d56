// src/lib.rs
pub mod api;
pub mod banner;
pub mod config;
pub mod errors;
pub mod harness;
pub mod models;
pub mod postprocess;
pub mod prompt;
pub mod providers;
pub mod report;
pub mod runner;
