//! All Slack-specific functionality

pub mod client;
pub mod command_parser;
pub mod gateway;
pub mod response_builder;

// Re-export main types for convenience
pub use client::SlackClient;
pub use gateway::ChatGateway;
