// ABOUTME: LLM module - chat backends for local model servers.
// ABOUTME: Defines types, the backend trait, providers, the unified client and factory.

mod client;
mod factory;
mod lm_studio;
mod ollama;
pub mod parse;
mod prompts;
mod types;
mod unified;

pub use client::*;
pub use factory::*;
pub use lm_studio::*;
pub use ollama::*;
pub use parse::parse_step_list;
pub use types::*;
pub use unified::*;
