//! Rule-based command parser.
//!
//! Each field is extracted by an independent pass over the normalized
//! transcript; every recognized span (verbs, quantity, price bounds,
//! brand, size, stopwords) is then subtracted, and whatever text is left
//! becomes the item. No pass can fail; worst case the result is a
//! low-confidence command with an empty item.

use std::sync::{Arc, LazyLock};

use regex::Regex;

use vc_protocol::{
    CommandAction, CommandFilters, Confidence, ParsedCommand, ParserSource, Unit,
};

use crate::lexicon::{self, is_rule_preferred};
use crate::normalize::{normalize_term, normalize_transcript, replace_number_words};

/// Live provider of the catalog's brand names, injected so the parser
/// sees brand changes as soon as a new snapshot is ingested.
pub trait BrandSource: Send + Sync {
    fn known_brands(&self) -> Vec<String>;
}

/// Fixed brand list, for tests and brandless deployments.
impl BrandSource for Vec<String> {
    fn known_brands(&self) -> Vec<String> {
        self.clone()
    }
}

// "<number> <unit?>": unit aliases longest-first so plurals are not
// half-matched; the trailing boundary keeps an alias from consuming the
// head of a longer word ("5 grapes" is five units, not five grams).
static QUANTITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(\d+(?:\.\d+)?)\s*(kilograms|kilogram|kilos|kilo|kg|gramos|gramo|grams|gram|g|liters|litres|liter|litre|litros|litro|l|mililitros|mililitro|ml|botellas|botella|bottles|bottle|paquetes|paquete|packs|pack|pieces|piece|piezas|pieza|pcs|unidades|unidad|units|unit)?\b",
    )
    .unwrap()
});

// Size constraints in searches use a narrower unit set than quantities.
static SIZE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(\d+(?:\.\d+)?)\s*(kg|g|ml|l|liters|litres|liter|litre|litros|litro|packs|pack|pieces|piece|pcs|paquetes|paquete|piezas|pieza)\b",
    )
    .unwrap()
});

static MAX_PRICE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:under|below|less than|max|up to|upto|at most|menos de|debajo de|neeche|kam se kam)\s*\$?\s*(\d+(?:\.\d+)?)",
    )
    .unwrap()
});

static MIN_PRICE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:above|over|more than|min|at least|greater than|mas de|zyada|upar)\s*\$?\s*(\d+(?:\.\d+)?)",
    )
    .unwrap()
});

// Secondary brand extraction for searches: "brand X" / "from X" / "by X".
static SEARCH_BRAND_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:brand|from|by|marca)\s+([a-z0-9\s-]+)").unwrap());

// Keywords that end a free-text brand capture.
static BRAND_TAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:under|below|less|than|max|size|for).*").unwrap());

static STOPWORD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"\b(?:{})\b", lexicon::STOPWORDS.join("|"))).unwrap()
});

// All action verbs in one alternation, longest-first so the two-word
// "set karo" is removed before "set" can split it.
static VERB_RE: LazyLock<Regex> = LazyLock::new(|| {
    let mut verbs: Vec<&str> = lexicon::ACTION_VERBS
        .iter()
        .flat_map(|(_, verbs)| verbs.iter().copied())
        .collect();
    verbs.sort_by_key(|verb| std::cmp::Reverse(verb.chars().count()));
    Regex::new(&format!(r"\b(?:{})\b", verbs.join("|"))).unwrap()
});

struct PriceFilters {
    max: Option<f64>,
    min: Option<f64>,
}

/// Multilingual rule parser over the static lexicon plus a live brand
/// list.
pub struct RuleParser {
    brands: Arc<dyn BrandSource>,
}

impl RuleParser {
    pub fn new(brands: Arc<dyn BrandSource>) -> Self {
        Self { brands }
    }

    /// Parse one transcript. Infallible: unreadable input degrades to an
    /// unknown action with low confidence.
    pub fn parse(&self, transcript: &str, locale: &str) -> ParsedCommand {
        let raw = transcript.trim();
        if raw.is_empty() {
            return ParsedCommand::unknown(raw, locale);
        }

        let normalized = replace_number_words(&normalize_transcript(raw));
        let action = detect_action(&normalized);
        let price = extract_price_filters(&normalized);
        let brand = self.extract_brand(&normalized, action);
        let size = if action == CommandAction::Search {
            extract_size(&normalized)
        } else {
            String::new()
        };

        let quantity_span = QUANTITY_RE.find(&normalized).map(|m| m.as_str().to_string());
        let (quantity, unit, quantity_provided) = extract_quantity(&normalized, action);

        let mut item = strip_known_spans(
            &normalized,
            action,
            quantity_span.as_deref(),
            &price,
            &brand,
            &size,
        );
        if item.is_empty() && is_rule_preferred(locale) {
            // The lexicon claims this locale but nothing survived the
            // span subtraction; surface the raw words rather than nothing.
            item = raw.to_string();
        }

        let confidence = if !item.is_empty() {
            Confidence::High
        } else if action == CommandAction::Search {
            Confidence::Medium
        } else {
            Confidence::Low
        };

        let parsed = ParsedCommand {
            action,
            filters: CommandFilters {
                query: item.clone(),
                brand: brand.clone(),
                size: size.clone(),
                max_price: price.max,
                min_price: price.min,
            },
            item,
            brand,
            quantity,
            quantity_provided,
            unit,
            size,
            confidence,
            source: ParserSource::Rule,
            raw: raw.to_string(),
            locale: locale.to_string(),
        };

        apply_alias_corrections(parsed)
    }

    // Primary: longest known brand whose name occurs in the transcript.
    // Secondary (searches only): free text after "brand"/"from"/"by".
    fn extract_brand(&self, normalized: &str, action: CommandAction) -> String {
        let mut brands: Vec<(String, String)> = self
            .brands
            .known_brands()
            .into_iter()
            .map(|brand| (normalize_term(&brand), brand))
            .collect();
        brands.sort_by_key(|(folded, _)| std::cmp::Reverse(folded.chars().count()));
        if let Some((_, raw)) = brands
            .into_iter()
            .find(|(folded, _)| !folded.is_empty() && normalized.contains(folded.as_str()))
        {
            return raw;
        }

        if action != CommandAction::Search {
            return String::new();
        }
        let Some(caps) = SEARCH_BRAND_RE.captures(normalized) else {
            return String::new();
        };
        BRAND_TAIL_RE.replace(&caps[1], "").trim().to_string()
    }
}

fn detect_action(normalized: &str) -> CommandAction {
    let tokens: Vec<&str> = normalized.split_whitespace().collect();
    for (action, verbs) in lexicon::ACTION_VERBS {
        if verbs.iter().any(|verb| contains_phrase(&tokens, verb)) {
            return *action;
        }
    }
    CommandAction::Add
}

fn contains_phrase(tokens: &[&str], phrase: &str) -> bool {
    let words: Vec<&str> = phrase.split_whitespace().collect();
    if words.is_empty() || words.len() > tokens.len() {
        return false;
    }
    tokens.windows(words.len()).any(|window| window == words.as_slice())
}

fn extract_price_filters(normalized: &str) -> PriceFilters {
    let capture_value = |re: &Regex| {
        re.captures(normalized).and_then(|caps| caps[1].parse::<f64>().ok())
    };
    PriceFilters { max: capture_value(&MAX_PRICE_RE), min: capture_value(&MIN_PRICE_RE) }
}

fn extract_quantity(normalized: &str, action: CommandAction) -> (Option<f64>, Unit, bool) {
    if action == CommandAction::Search {
        return (None, Unit::Unit, false);
    }
    let Some(caps) = QUANTITY_RE.captures(normalized) else {
        return (Some(1.0), Unit::Unit, false);
    };
    let unit = caps
        .get(2)
        .map(|alias| Unit::parse_or_default(alias.as_str()))
        .unwrap_or_default();
    match caps[1].parse::<f64>() {
        Ok(quantity) if quantity > 0.0 && quantity.is_finite() => (Some(quantity), unit, true),
        _ => (Some(1.0), unit, false),
    }
}

fn extract_size(normalized: &str) -> String {
    let Some(caps) = SIZE_RE.captures(normalized) else {
        return String::new();
    };
    let unit = Unit::parse_or_default(&caps[2]);
    let rendered = if unit == Unit::Liter { "l" } else { unit.as_str() };
    format!("{}{}", &caps[1], rendered)
}

fn strip_known_spans(
    normalized: &str,
    action: CommandAction,
    quantity_span: Option<&str>,
    price: &PriceFilters,
    brand: &str,
    size: &str,
) -> String {
    let mut cleaned = VERB_RE.replace_all(normalized, " ").into_owned();

    // Price spans go first: if the price digits are also the first number
    // in the transcript, removing the quantity span before them would
    // orphan the keyword ("above", "menos de") inside the item.
    if price.max.is_some() {
        cleaned = MAX_PRICE_RE.replace(&cleaned, " ").into_owned();
    }
    if price.min.is_some() {
        cleaned = MIN_PRICE_RE.replace(&cleaned, " ").into_owned();
    }
    if let Some(span) = quantity_span {
        cleaned = cleaned.replacen(span, " ", 1);
    }
    if !brand.is_empty() {
        let pattern = format!(r"\b{}\b", regex::escape(&normalize_term(brand)));
        if let Ok(re) = Regex::new(&pattern) {
            cleaned = re.replace_all(&cleaned, " ").into_owned();
        }
    }
    if action == CommandAction::Search && !size.is_empty() {
        cleaned = SIZE_RE.replace(&cleaned, " ").into_owned();
    }

    cleaned = STOPWORD_RE.replace_all(&cleaned, " ").into_owned();
    cleaned = cleaned.replace('$', " ");
    cleaned.split_whitespace().collect::<Vec<&str>>().join(" ")
}

/// Rewrite item/brand/query when a spoken alias names a specific catalog
/// product ("kitkat" → KitKat Chocolate by Nestle). Applied to both rule
/// and generative results.
pub fn apply_alias_corrections(mut parsed: ParsedCommand) -> ParsedCommand {
    let item = normalize_term(&parsed.item);
    let brand = normalize_term(&parsed.brand);
    let query_source =
        if parsed.filters.query.is_empty() { &parsed.item } else { &parsed.filters.query };
    let query = normalize_term(query_source);

    let generic_chocolate = item.contains("chocolate")
        || item.contains("chocholate")
        || query.contains("chocolate");

    for rule in lexicon::PRODUCT_ALIAS_RULES {
        let in_brand = rule.aliases.iter().any(|alias| brand == *alias);
        let in_item = rule.aliases.iter().any(|alias| item.contains(alias));
        let in_query = rule.aliases.iter().any(|alias| query.contains(alias));

        if in_brand || in_item || (in_query && generic_chocolate) {
            parsed.item = rule.item.to_string();
            parsed.brand = rule.brand.to_string();
            parsed.filters.query = rule.item.to_string();
            parsed.filters.brand = rule.brand.to_string();
        }
    }
    parsed
}
