// ABOUTME: Library root for d2ship - exposes the domain, repositories and use cases.
// ABOUTME: The CLI binary is in main.rs.

pub mod config;
pub mod deferred;
pub mod deploy;
pub mod error;
pub mod fetch;
pub mod output;
pub mod repositories;
pub mod types;
pub mod usecases;
