//! Configuration and the domain records shared by every handler.

pub mod config;
pub mod models;
