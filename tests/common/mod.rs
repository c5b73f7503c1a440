//! Common test utilities and helpers
//!
//! This module provides shared utilities for all tests including:
//! - An in-process application over the in-memory store
//! - Registered test users with tokens
//! - Error response assertions
//! - PostgreSQL fixtures
//! - Mock forum servers for the client

pub mod database;
pub mod mock_server;

pub use assertions::*;
pub use auth_helpers::*;
