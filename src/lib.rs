//! WealthTech Job Search
//!
//! A thin web service that asks a hosted search agent to browse for
//! Director+ GTM roles at wealthtech companies and returns the listings
//! it reports.
//!
//! REQUEST → CALL AGENT (retry on rate limit) → EXTRACT JSON → RESPOND

pub mod anthropic;
pub mod api;
pub mod config;
pub mod error;
pub mod extract;
pub mod models;
pub mod prompt;
pub mod search;

pub use error::Result;

// Re-export common types
pub use models::*;
pub use search::{AgentTransport, RetryPolicy, SearchOrchestrator};
