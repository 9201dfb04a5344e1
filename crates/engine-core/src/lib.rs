pub mod author;
pub mod config;
pub mod error;
pub mod executor;
pub mod service;
