//! Multilingual voice-command parsing for VoCart.
//!
//! The rule parser extracts action, quantity, brand, size, and price
//! constraints from English, Spanish, and Hindi transcripts using a fixed
//! lexicon; an optional generative backend re-parses unfamiliar locales,
//! and its output is reconciled field-by-field against the rule result so
//! a misbehaving model can never make the parse worse.

pub mod generative;
pub mod lexicon;
pub mod normalize;
pub mod parser;
pub mod reconcile;
pub mod smart;

pub use generative::{CompletionBackend, GenerativeClient, GenerativeConfig};
pub use normalize::{normalize_term, normalize_token, normalize_transcript, query_tokens};
pub use parser::{BrandSource, RuleParser, apply_alias_corrections};
pub use reconcile::{extract_json, reconcile};
pub use smart::SmartParser;
