// src/lib.rs
pub mod config;
pub mod errors;
pub mod evaluator;
pub mod fetcher;
pub mod history;
pub mod indicators;
pub mod notifier;
pub mod scanner;
pub mod types;
