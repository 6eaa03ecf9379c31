//! Parsed voice commands and their enums.

use serde::{Deserialize, Serialize};

use crate::unit::Unit;

/// What the shopper asked the list to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandAction {
    Add,
    Remove,
    Update,
    Search,
    /// Nothing recognizable was said (empty or unparseable transcript).
    Unknown,
}

impl CommandAction {
    /// Parse a lowercase action name, used to clamp generative output to
    /// the allowed set.
    pub fn from_name(name: &str) -> Option<CommandAction> {
        match name {
            "add" => Some(CommandAction::Add),
            "remove" => Some(CommandAction::Remove),
            "update" => Some(CommandAction::Update),
            "search" => Some(CommandAction::Search),
            "unknown" => Some(CommandAction::Unknown),
            _ => None,
        }
    }
}

/// How confident the parser is in its extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    pub fn from_name(name: &str) -> Option<Confidence> {
        match name {
            "high" => Some(Confidence::High),
            "medium" => Some(Confidence::Medium),
            "low" => Some(Confidence::Low),
            _ => None,
        }
    }
}

/// Which parser produced the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParserSource {
    Rule,
    Generative,
}

/// How a resolved add/update mutates an existing list line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplyMode {
    /// Merge the new quantity into whatever is already on the line.
    Increment,
    /// Overwrite the line's quantity.
    Set,
}

/// Search constraints extracted alongside the command.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandFilters {
    /// Free-text query, normally the residual item text.
    #[serde(default)]
    pub query: String,
    /// Brand constraint, if one was spoken.
    #[serde(default)]
    pub brand: String,
    /// Package-size constraint like "2l", if one was spoken.
    #[serde(default)]
    pub size: String,
    /// Upper bound on the effective price.
    #[serde(default)]
    pub max_price: Option<f64>,
    /// Lower bound on the effective price.
    #[serde(default)]
    pub min_price: Option<f64>,
}

/// Structured result of parsing one transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedCommand {
    pub action: CommandAction,
    /// Residual item text after every recognized span was removed.
    pub item: String,
    /// Brand, when one was recognized; empty otherwise.
    pub brand: String,
    /// Requested quantity. `None` only for searches, where quantity is
    /// meaningless; defaults to 1 everywhere else.
    pub quantity: Option<f64>,
    /// Whether the shopper actually spoke a quantity, as opposed to the
    /// parser defaulting one in.
    pub quantity_provided: bool,
    pub unit: Unit,
    /// Spoken package-size constraint like "2l"; searches only.
    pub size: String,
    pub filters: CommandFilters,
    pub confidence: Confidence,
    pub source: ParserSource,
    /// Original transcript, untouched.
    pub raw: String,
    /// BCP-47 locale tag the transcript arrived with.
    pub locale: String,
}

impl ParsedCommand {
    /// The low-confidence result for transcripts nothing could be read
    /// from (empty input).
    pub fn unknown(raw: impl Into<String>, locale: impl Into<String>) -> Self {
        Self {
            action: CommandAction::Unknown,
            item: String::new(),
            brand: String::new(),
            quantity: Some(1.0),
            quantity_provided: false,
            unit: Unit::Unit,
            size: String::new(),
            filters: CommandFilters::default(),
            confidence: Confidence::Low,
            source: ParserSource::Rule,
            raw: raw.into(),
            locale: locale.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_names_clamp_to_known_set() {
        assert_eq!(CommandAction::from_name("add"), Some(CommandAction::Add));
        assert_eq!(CommandAction::from_name("search"), Some(CommandAction::Search));
        assert_eq!(CommandAction::from_name("purchase"), None);
        assert_eq!(Confidence::from_name("medium"), Some(Confidence::Medium));
        assert_eq!(Confidence::from_name("certain"), None);
    }

    #[test]
    fn unknown_command_defaults() {
        let parsed = ParsedCommand::unknown("", "en-US");
        assert_eq!(parsed.action, CommandAction::Unknown);
        assert_eq!(parsed.quantity, Some(1.0));
        assert!(!parsed.quantity_provided);
        assert_eq!(parsed.unit, Unit::Unit);
        assert_eq!(parsed.confidence, Confidence::Low);
        assert_eq!(parsed.source, ParserSource::Rule);
    }

    #[test]
    fn serializes_camel_case_fields() {
        let parsed = ParsedCommand::unknown("hello", "en-US");
        let json = serde_json::to_string(&parsed).unwrap();
        assert!(json.contains(r#""quantityProvided":false"#));
        assert!(json.contains(r#""action":"unknown""#));
        assert!(json.contains(r#""maxPrice":null"#));
    }
}
