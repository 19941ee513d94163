// ABOUTME: Root module for llm-testgen - local LLM backends for test generation.
// ABOUTME: Re-exports all public types from submodules.

pub mod config;
pub mod error;
pub mod llm;
pub mod mcp;
pub mod prelude;

pub use error::TestgenError;
