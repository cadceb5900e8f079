#![doc = include_str!("../README.md")]

pub mod api;
pub mod cli;
pub mod dom;
pub mod engine;
pub mod error;
pub mod services;
pub mod types;

pub use engine::*;
pub use error::*;
pub use services::*;
pub use types::*;
