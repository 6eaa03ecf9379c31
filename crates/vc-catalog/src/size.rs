//! Package-size label parsing.
//!
//! Catalog sizes are short free-text labels ("1kg", "4x100g", "3 pack",
//! "4-finger"). Parsing is anchored at the start of the label; anything
//! that does not open with a number is not a size.

use std::sync::LazyLock;

use regex::Regex;
use vc_nlp::normalize_term;
use vc_protocol::Unit;

/// Multipack labels like "4x100g" or "2 x 1.5l".
static MULTI_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+(?:\.\d+)?)\s*x\s*(\d+(?:\.\d+)?)\s*(kg|g|ml|l|liter|litre)\b").unwrap()
});

/// Plain measured or counted labels like "500ml" or "12 pieces".
static SINGLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(\d+(?:\.\d+)?)\s*(kg|g|ml|l|liter|litre|pack|packs|piece|pieces|pcs|unit|units|bottle|bottles)\b",
    )
    .unwrap()
});

/// Confectionery labels like "4-finger"; each finger counts as a piece.
static FINGER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+(?:\.\d+)?)\s*[- ]?finger\b").unwrap());

/// A parsed package size: total amount in one canonical unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeDescriptor {
    pub amount: f64,
    pub unit: Unit,
}

/// Parse a size label into a [`SizeDescriptor`], or `None` when the
/// label carries no usable measure. Multipack labels collapse to their
/// total measure, so "4x100g" reads as 400 g.
pub fn parse_size_label(label: &str) -> Option<SizeDescriptor> {
    let text = normalize_term(label);
    if text.is_empty() {
        return None;
    }

    if let Some(caps) = MULTI_RE.captures(&text)
        && let (Ok(count), Ok(amount)) = (caps[1].parse::<f64>(), caps[2].parse::<f64>())
        && count.is_finite()
        && count > 0.0
        && amount.is_finite()
        && amount > 0.0
        && let Some(unit) = Unit::from_alias(&caps[3])
    {
        return Some(SizeDescriptor { amount: count * amount, unit });
    }

    if let Some(caps) = SINGLE_RE.captures(&text)
        && let Ok(amount) = caps[1].parse::<f64>()
        && amount.is_finite()
        && amount > 0.0
        && let Some(unit) = Unit::from_alias(&caps[2])
    {
        return Some(SizeDescriptor { amount, unit });
    }

    if let Some(caps) = FINGER_RE.captures(&text)
        && let Ok(amount) = caps[1].parse::<f64>()
        && amount.is_finite()
        && amount > 0.0
    {
        return Some(SizeDescriptor { amount, unit: Unit::Piece });
    }

    None
}
