//! Shared test utilities for integration tests

// Allow dead_code when compiled with test binaries that don't use every helper
#[allow(dead_code)]
pub mod mcp_harness;
