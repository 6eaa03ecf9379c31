//! Reconciles generative completions against the rule parse.
//!
//! Model output is untrusted: it may be fenced in markdown, wrap the JSON
//! in prose, mistype fields, or hallucinate a generic item where the rule
//! parser already found a concrete one. Everything here is
//! clamp-and-fallback; the worst possible completion still yields the
//! rule parse.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use vc_protocol::{CommandAction, Confidence, ParsedCommand, ParserSource, Unit};

use crate::lexicon::GENERIC_ITEMS;
use crate::normalize::{normalize_term, normalize_transcript};
use crate::parser::apply_alias_corrections;

static FENCE_JSON_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^```json\s*").unwrap());
static FENCE_OPEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^```\s*").unwrap());
static FENCE_CLOSE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"```$").unwrap());
// Greedy: first brace to the last, so trailing prose is dropped.
static JSON_OBJECT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)\{.*\}").unwrap());

/// Pull a JSON value out of completion text, tolerating markdown fences
/// and surrounding prose. Returns `None` when nothing parseable remains.
pub fn extract_json(text: &str) -> Option<Value> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    let stripped = FENCE_JSON_OPEN.replace(trimmed, "");
    let stripped = FENCE_OPEN.replace(&stripped, "");
    let stripped = FENCE_CLOSE.replace(&stripped, "");
    let stripped = stripped.trim();

    if let Ok(value) = serde_json::from_str::<Value>(stripped) {
        return Some(value);
    }

    let braced = JSON_OBJECT.find(stripped)?;
    serde_json::from_str::<Value>(braced.as_str()).ok()
}

/// Merge a generative completion with the rule parse for the same
/// transcript. Field by field the completion wins where it is valid and
/// the rule result fills the gaps; a completion that is structurally
/// unusable, or that lost the item the rule parser found, is discarded
/// wholesale in favor of the rule parse.
pub fn reconcile(
    raw: &Value,
    fallback: &ParsedCommand,
    transcript: &str,
    locale: &str,
) -> ParsedCommand {
    let Some(obj) = raw.as_object() else {
        return rule_fallback(fallback);
    };

    let action = string_field(obj, "action")
        .map(|name| name.to_lowercase())
        .and_then(|name| CommandAction::from_name(&name))
        .unwrap_or(fallback.action);

    let brand = string_field(obj, "brand").unwrap_or_default();
    let item = string_field(obj, "item").unwrap_or_else(|| fallback.item.clone());
    let unit = string_field(obj, "unit")
        .map(|alias| Unit::parse_or_default(&alias))
        .unwrap_or(fallback.unit);

    let quantity_default = if action == CommandAction::Search { None } else { Some(1.0) };
    let quantity = numeric_value(obj.get("quantity"), quantity_default);
    let quantity_provided = match obj.get("quantityProvided").and_then(Value::as_bool) {
        Some(provided) => provided,
        None if action == CommandAction::Search => false,
        None => quantity != Some(1.0),
    };

    let empty_filters = Map::new();
    let filters = obj.get("filters").and_then(Value::as_object).unwrap_or(&empty_filters);

    let size = string_field(obj, "size")
        .or_else(|| string_field(filters, "size"))
        .unwrap_or_default();
    let filter_query = string_field(filters, "query").unwrap_or_else(|| item.clone());
    let filter_brand = string_field(filters, "brand").unwrap_or_else(|| brand.clone());
    let filter_size = string_field(filters, "size")
        .or_else(|| string_field(obj, "size"))
        .unwrap_or_default();

    let mut merged = ParsedCommand {
        action,
        item: normalize_transcript(&item),
        brand,
        quantity,
        quantity_provided,
        unit,
        size,
        filters: vc_protocol::CommandFilters {
            query: normalize_transcript(&filter_query),
            brand: filter_brand,
            size: filter_size,
            max_price: numeric_value(filters.get("maxPrice"), None),
            min_price: numeric_value(filters.get("minPrice"), None),
        },
        confidence: string_field(obj, "confidence")
            .map(|name| name.to_lowercase())
            .and_then(|name| Confidence::from_name(&name))
            .unwrap_or(fallback.confidence),
        source: ParserSource::Generative,
        raw: transcript.to_string(),
        locale: locale.to_string(),
    };

    if merged.item.is_empty() && merged.action != CommandAction::Search {
        return rule_fallback(fallback);
    }

    if merged.action == CommandAction::Search {
        merged.quantity = None;
        merged.quantity_provided = false;
        merged.unit = Unit::Unit;
    }

    if lost_rule_item(&merged, fallback) {
        return rule_fallback(fallback);
    }

    apply_alias_corrections(merged)
}

fn rule_fallback(fallback: &ParsedCommand) -> ParsedCommand {
    let mut out = fallback.clone();
    out.source = ParserSource::Rule;
    out
}

// The completion dropped or genericized an item the rule parser had.
fn lost_rule_item(merged: &ParsedCommand, fallback: &ParsedCommand) -> bool {
    let merged_item = normalize_term(&merged.item);
    let fallback_item = normalize_term(&fallback.item);

    if merged_item.is_empty() && !fallback_item.is_empty() {
        return true;
    }
    is_generic(&merged_item) && !fallback_item.is_empty() && !is_generic(&fallback_item)
}

fn is_generic(item: &str) -> bool {
    GENERIC_ITEMS.contains(&item)
}

// Trimmed string field, `None` when missing, non-string, or empty.
fn string_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    let text = obj.get(key)?.as_str()?.trim();
    if text.is_empty() { None } else { Some(text.to_string()) }
}

// Numbers or numeric strings; anything else takes the default.
fn numeric_value(value: Option<&Value>, default: Option<f64>) -> Option<f64> {
    let Some(value) = value else { return default };
    match value {
        Value::Number(number) => number.as_f64().filter(|v| v.is_finite()).or(default),
        Value::String(text) => {
            let text = text.trim();
            if text.is_empty() {
                return default;
            }
            text.parse::<f64>().ok().filter(|v| v.is_finite()).or(default)
        }
        _ => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fallback() -> ParsedCommand {
        ParsedCommand {
            action: CommandAction::Add,
            item: "apples".into(),
            brand: String::new(),
            quantity: Some(2.0),
            quantity_provided: true,
            unit: Unit::Kg,
            size: String::new(),
            filters: vc_protocol::CommandFilters {
                query: "apples".into(),
                ..Default::default()
            },
            confidence: Confidence::High,
            source: ParserSource::Rule,
            raw: "add 2 kg apples".into(),
            locale: "en-US".into(),
        }
    }

    // ── extract_json ─────────────────────────────────────────────────

    #[test]
    fn extracts_plain_json() {
        let value = extract_json(r#"{"action": "add"}"#).unwrap();
        assert_eq!(value["action"], "add");
    }

    #[test]
    fn extracts_fenced_json() {
        let value = extract_json("```json\n{\"action\": \"remove\"}\n```").unwrap();
        assert_eq!(value["action"], "remove");
    }

    #[test]
    fn extracts_json_wrapped_in_prose() {
        let value =
            extract_json("Here is the result: {\"action\": \"add\", \"item\": \"milk\"} hope that helps")
                .unwrap();
        assert_eq!(value["item"], "milk");
    }

    #[test]
    fn rejects_unparseable_text() {
        assert!(extract_json("no braces here").is_none());
        assert!(extract_json("{broken json").is_none());
        assert!(extract_json("").is_none());
    }

    // ── reconcile ────────────────────────────────────────────────────

    #[test]
    fn completion_fields_win_when_valid() {
        let raw = json!({
            "action": "add",
            "item": "Green Apples",
            "brand": "FreshFarm",
            "quantity": 3,
            "quantityProvided": true,
            "unit": "kg",
            "size": "",
            "filters": {"query": "green apples", "brand": "FreshFarm"},
            "confidence": "high"
        });
        let merged = reconcile(&raw, &fallback(), "add 3 kg green apples", "en-US");
        assert_eq!(merged.item, "green apples");
        assert_eq!(merged.brand, "FreshFarm");
        assert_eq!(merged.quantity, Some(3.0));
        assert_eq!(merged.unit, Unit::Kg);
        assert_eq!(merged.source, ParserSource::Generative);
        assert_eq!(merged.filters.brand, "FreshFarm");
    }

    #[test]
    fn non_object_falls_back_to_rule() {
        let merged = reconcile(&json!("just text"), &fallback(), "add 2 kg apples", "en-US");
        assert_eq!(merged.item, "apples");
        assert_eq!(merged.source, ParserSource::Rule);
    }

    #[test]
    fn invalid_action_keeps_rule_action() {
        let raw = json!({"action": "purchase", "item": "apples"});
        let merged = reconcile(&raw, &fallback(), "add 2 kg apples", "en-US");
        assert_eq!(merged.action, CommandAction::Add);
    }

    #[test]
    fn empty_item_falls_back_when_rule_found_one() {
        let raw = json!({"action": "add", "item": ""});
        let merged = reconcile(&raw, &fallback(), "add 2 kg apples", "en-US");
        assert_eq!(merged.item, "apples");
        assert_eq!(merged.source, ParserSource::Rule);
    }

    #[test]
    fn generic_item_falls_back_when_rule_was_specific() {
        let raw = json!({"action": "add", "item": "items", "quantity": 2});
        let merged = reconcile(&raw, &fallback(), "add 2 kg apples", "en-US");
        assert_eq!(merged.item, "apples");
        assert_eq!(merged.source, ParserSource::Rule);
    }

    #[test]
    fn search_clears_quantity_and_unit() {
        let raw = json!({
            "action": "search",
            "item": "toothpaste",
            "quantity": 3,
            "unit": "kg",
            "filters": {"maxPrice": "5"}
        });
        let merged = reconcile(&raw, &fallback(), "find toothpaste under 5", "en-US");
        assert_eq!(merged.action, CommandAction::Search);
        assert_eq!(merged.quantity, None);
        assert!(!merged.quantity_provided);
        assert_eq!(merged.unit, Unit::Unit);
        assert_eq!(merged.filters.max_price, Some(5.0));
    }

    #[test]
    fn numeric_strings_are_accepted() {
        let raw = json!({"action": "add", "item": "milk", "quantity": "2.5", "unit": "liter"});
        let merged = reconcile(&raw, &fallback(), "add milk", "en-US");
        assert_eq!(merged.quantity, Some(2.5));
        assert_eq!(merged.unit, Unit::Liter);
        assert!(merged.quantity_provided);
    }

    #[test]
    fn garbage_quantity_takes_default() {
        let raw = json!({"action": "add", "item": "milk", "quantity": "lots"});
        let merged = reconcile(&raw, &fallback(), "add milk", "en-US");
        assert_eq!(merged.quantity, Some(1.0));
        assert!(!merged.quantity_provided);
    }

    #[test]
    fn item_is_phrase_normalized() {
        let raw = json!({"action": "add", "item": "Leche"});
        let merged = reconcile(&raw, &fallback(), "agrega leche", "es-ES");
        assert_eq!(merged.item, "milk");
        assert_eq!(merged.filters.query, "milk");
    }

    #[test]
    fn alias_corrections_apply_to_completions() {
        let raw = json!({"action": "add", "item": "kitkat", "quantity": 1});
        let merged = reconcile(&raw, &fallback(), "add kitkat", "en-US");
        assert_eq!(merged.item, "kitkat chocolate");
        assert_eq!(merged.brand, "Nestle");
    }

    #[test]
    fn filter_size_and_top_size_backfill_each_other() {
        let raw = json!({"action": "search", "item": "cola", "filters": {"size": "2l"}});
        let merged = reconcile(&raw, &fallback(), "find 2l cola", "en-US");
        assert_eq!(merged.size, "2l");
        assert_eq!(merged.filters.size, "2l");

        let raw = json!({"action": "search", "item": "cola", "size": "2l"});
        let merged = reconcile(&raw, &fallback(), "find 2l cola", "en-US");
        assert_eq!(merged.size, "2l");
        assert_eq!(merged.filters.size, "2l");
    }
}
