//! Health endpoint

pub mod handlers;
