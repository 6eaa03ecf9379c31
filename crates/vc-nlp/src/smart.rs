//! Two-stage parser: rules first, generative fallback second.
//!
//! The rule parse always runs and is always the safety net. The backend
//! is consulted only for locales the lexicon does not claim, and only
//! when one is configured; any backend failure degrades to the rule
//! result with a warning rather than an error.

use vc_protocol::ParsedCommand;

use crate::generative::{CompletionBackend, GenerativeClient, GenerativeConfig, build_prompt};
use crate::lexicon::is_rule_preferred;
use crate::parser::RuleParser;
use crate::reconcile::{extract_json, reconcile};

pub struct SmartParser {
    rule: RuleParser,
    backend: Option<Box<dyn CompletionBackend>>,
}

impl SmartParser {
    /// Rule-only parser, no generative fallback.
    pub fn new(rule: RuleParser) -> Self {
        Self { rule, backend: None }
    }

    pub fn with_backend(rule: RuleParser, backend: Box<dyn CompletionBackend>) -> Self {
        Self { rule, backend: Some(backend) }
    }

    /// Attach a [`GenerativeClient`] when the config enables one.
    pub fn from_config(rule: RuleParser, config: &GenerativeConfig) -> Self {
        let backend: Option<Box<dyn CompletionBackend>> = if config.enabled {
            Some(Box::new(GenerativeClient::new(config.clone())))
        } else {
            None
        };
        Self { rule, backend }
    }

    /// Parser mode for health reporting.
    pub fn mode(&self) -> &'static str {
        if self.backend.is_some() { "generative+rule-fallback" } else { "rule-based" }
    }

    /// Rule parse only, no backend round-trip.
    pub fn parse(&self, transcript: &str, locale: &str) -> ParsedCommand {
        self.rule.parse(transcript, locale)
    }

    /// Full two-stage parse. Infallible: every failure path returns the
    /// rule result.
    pub async fn parse_smart(&self, transcript: &str, locale: &str) -> ParsedCommand {
        let rule_parsed = self.rule.parse(transcript, locale);

        // The lexicon handles these locales better than a general model.
        if is_rule_preferred(locale) {
            return rule_parsed;
        }
        let Some(backend) = &self.backend else {
            return rule_parsed;
        };

        let prompt = build_prompt(transcript, locale);
        let completion = match backend.complete(&prompt).await {
            Ok(completion) => completion,
            Err(e) => {
                tracing::warn!(error = %e, "generative parse failed; using rule result");
                return rule_parsed;
            }
        };

        match extract_json(&completion) {
            Some(value) => reconcile(&value, &rule_parsed, transcript, locale),
            None => {
                tracing::warn!("generative completion had no parseable JSON; using rule result");
                rule_parsed
            }
        }
    }
}
