//! HTTP networking layer

mod client;
mod user_agent;

pub use client::HttpClient;
pub use user_agent::{accept_json, accept_language, default_user_agent};
