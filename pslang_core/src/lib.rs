//! PS-Lang Core - Prompt Zone Annotation
//!
//! Prompts are annotated with delimiter-bound **zones** that say which
//! consumer may see which part of the text:
//!
//! ```text
//! Summarize the ticket. <. internal: customer is on the legacy plan .>
//! <#. Reply in a friendly tone. #.>
//! ```
//!
//! This crate provides:
//! 1. **Tokenizer**: trie-based longest-match lexing plus stack pairing,
//!    failing open on malformed markers
//! 2. **Visibility filter**: agent-scoped, marker-free views of a prompt
//! 3. **Extraction report**: per-kind counts and previews
//!
//! Everything here is a pure function of its input.

pub mod agents;
pub mod delimiters;
pub mod filter;
pub mod report;
pub mod tokenizer;
pub mod zone;

// Re-export key types for convenience
pub use agents::AgentProfile;
pub use filter::{filter_for_agent, filter_with_profile, FilterResult};
pub use report::ZoneReport;
pub use tokenizer::{tokenize, Tokenizer};
pub use zone::{MutableBy, VisibilityPolicy, Zone, ZoneKind};
