//! # Hanzo PII
//!
//! Configurable PII detection and redaction for LLM gateway traffic.
//!
//! Hanzo PII sits behind an LLM gateway as a guardrail. For every chat
//! completion it receives, it:
//!
//! - **Resolves** the caller's recognizer selection (presets such as `US` or
//!   `INDIAN`, or individual identifiers such as `US_SSN`)
//! - **Analyzes** each message with the selected recognizers
//! - **Redacts** every detected span with an `[ENTITY_TYPE]` marker
//! - **Audits** the decision without logging the content itself
//!
//! ## Quick Start
//!
//! ```rust
//! use hanzo_pii::{ChatMessage, Direction, Guard, GuardContext, GuardrailConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let guard = Guard::default();
//!     let config = GuardrailConfig::enabled("US");
//!     let messages = vec![ChatMessage::user("My SSN is 123-45-6789")];
//!
//!     let decision = guard
//!         .process_messages(&messages, &config, Direction::Input, &GuardContext::new())
//!         .await?;
//!
//!     if let Some(messages) = decision.messages() {
//!         // "My SSN is [US_SSN]"
//!         println!("{}", messages[0].text().unwrap_or_default());
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────┐     ┌───────────────────────────────────────────┐
//! │ Gateway │ ──► │ Guard                                     │
//! └─────────┘     │  ┌──────────┐  ┌──────────┐  ┌──────────┐ │
//!                 │  │ Resolver │─►│ Analyzer │─►│ Redactor │ │
//!                 │  └──────────┘  └──────────┘  └──────────┘ │
//!                 │       │             │                     │
//!                 │  ┌──────────┐  ┌──────────┐  ┌──────────┐ │
//!                 │  │ Catalog  │  │ Set cache│  │  Audit   │ │
//!                 │  └──────────┘  └──────────┘  └──────────┘ │
//!                 └───────────────────────────────────────────┘
//! ```

pub mod analyzer;
pub mod audit;
pub mod catalog;
pub mod config;
pub mod error;
pub mod guard;
pub mod pipeline;
pub mod recognizers;
pub mod redactor;
pub mod request;
pub mod resolver;
pub mod types;

pub use analyzer::{AnalyzerEngine, RecognizerSet};
pub use catalog::{Preset, RecognizerId};
pub use config::{
    AuditConfig, EngineConfig, GuardConfig, GuardrailConfig, PipelineConfig, RecognizerSpec,
};
pub use error::{PiiError, Result};
pub use guard::{Guard, GuardBuilder};
pub use pipeline::Pipeline;
pub use recognizers::Recognizer;
pub use request::{GuardrailResponse, InputGuardrailRequest, OutputGuardrailRequest};
pub use types::*;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::catalog::{Preset, RecognizerId};
    pub use crate::config::{EngineConfig, GuardConfig, GuardrailConfig, PipelineConfig};
    pub use crate::error::{PiiError, Result};
    pub use crate::guard::Guard;
    pub use crate::types::*;
}
