//! LLM Service Module
//!
//! Chat-completion access for blessing generation.
//!
//! # Architecture
//! ```text
//! ┌──────────────────┐
//! │ CompletionClient │  ← Trait (generic interface)
//! └────────┬─────────┘
//!          │
//!    ┌─────┴──────┐
//!    ▼            ▼
//! ┌─────────┐  ┌───────────┐
//! │LLMClient│  │ Test      │
//! │(OpenAI) │  │ doubles   │
//! └─────────┘  └───────────┘
//! ```

mod client;
mod models;
mod scenarios;

pub use client::{CompletionClient, LLMClient};
pub use models::*;
pub use scenarios::blessing::{BlessingPrompt, build_prompt, length_constraint, style_instruction};
