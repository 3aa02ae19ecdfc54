//! Utilities shared by the roomrelay server and client.

pub mod logger;
pub mod time;
