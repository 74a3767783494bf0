//! Generation client for Voxelforge
//!
//! Talks to an OpenRouter-compatible chat completions endpoint in two
//! stages: a planning call that expands a short description into a
//! detailed blueprint, then a building call that turns the blueprint into
//! a structure description the `structure` crate can parse.

pub mod client;
pub mod error;
pub mod prompt;
pub mod types;

pub use client::GeneratorClient;
pub use error::ApiError;
pub use types::{ChatRequest, ChatResponse, Message, Role};
