//! Quantity conversion and package-size-aware pricing.
//!
//! Mass and volume quantities convert through a base measure (grams,
//! millilitres); count units never convert into each other. Pricing
//! divides a requested measure by the package size and bills fractional
//! packs, falling back to per-package pricing when the two measures do
//! not share a family.

use vc_protocol::{PricingMode, PricingSnapshot, Unit, UnitFamily};

use crate::size::{SizeDescriptor, parse_size_label};

/// Floor for prorated pack counts, so a tiny request never bills zero
/// packs.
const MIN_BILLABLE_PACKS: f64 = 0.0001;

/// Round a dollar amount to cents.
pub fn round_money(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Round a quantity to four decimal places.
pub fn round_quantity(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// Express an amount in its family base measure (grams or millilitres).
/// `None` for non-positive amounts and for count units.
fn to_base_measure(amount: f64, unit: Unit) -> Option<(f64, Unit)> {
    if !amount.is_finite() || amount <= 0.0 {
        return None;
    }
    match unit {
        Unit::Kg => Some((amount * 1000.0, Unit::G)),
        Unit::G => Some((amount, Unit::G)),
        Unit::Liter => Some((amount * 1000.0, Unit::Ml)),
        Unit::Ml => Some((amount, Unit::Ml)),
        Unit::Unit | Unit::Piece | Unit::Pack | Unit::Bottle => None,
    }
}

/// Convert a quantity between units. Identity when the units are equal;
/// `None` for non-positive quantities and for any cross-family or
/// count-to-count conversion.
pub fn convert_quantity(quantity: f64, from: Unit, to: Unit) -> Option<f64> {
    if !quantity.is_finite() || quantity <= 0.0 {
        return None;
    }
    if from == to {
        return Some(quantity);
    }
    let (from_amount, from_base) = to_base_measure(quantity, from)?;
    let (one_in_base, to_base) = to_base_measure(1.0, to)?;
    if from_base != to_base {
        return None;
    }
    Some(from_amount / one_in_base)
}

/// Price a requested quantity against one catalog entry.
///
/// With a comparable package size the request is billed in (possibly
/// fractional) packs; otherwise the spoken quantity is billed per
/// package. Invalid inputs produce [`PricingSnapshot::unknown`].
pub fn pricing_snapshot(
    quantity: f64,
    unit: Unit,
    size_label: &str,
    unit_price: f64,
) -> PricingSnapshot {
    if !quantity.is_finite() || quantity <= 0.0 || !unit_price.is_finite() || unit_price <= 0.0 {
        return PricingSnapshot::unknown();
    }

    let Some(size) = parse_size_label(size_label) else {
        // No usable package size: the spoken quantity is the billable
        // quantity, priced per package.
        return PricingSnapshot {
            line_total_price: Some(round_money(quantity * unit_price)),
            billable_quantity: Some(quantity),
            billable_unit: unit.as_str().to_string(),
            pricing_mode: PricingMode::Direct,
        };
    };

    let finish = |billable: f64, billable_unit: Unit, mode: PricingMode| {
        let rounded = round_quantity(billable);
        PricingSnapshot {
            line_total_price: Some(round_money(rounded * unit_price)),
            billable_quantity: Some(rounded),
            billable_unit: billable_unit.as_str().to_string(),
            pricing_mode: mode,
        }
    };

    // Same measurable family: bill the requested measure as packs.
    if let (Some((request_base, request_unit)), Some((size_base, size_unit))) =
        (to_base_measure(quantity, unit), to_base_measure(size.amount, size.unit))
        && request_unit == size_unit
    {
        let packs = (request_base / size_base).max(MIN_BILLABLE_PACKS);
        return finish(packs, Unit::Pack, PricingMode::Prorated);
    }

    if unit.family() == UnitFamily::Count && size.unit.family() == UnitFamily::Count {
        return count_over_count(quantity, unit, size, finish);
    }

    // Mixed families cannot be compared; charge the spoken quantity per
    // package.
    finish(quantity, unit, PricingMode::Direct)
}

fn count_over_count(
    quantity: f64,
    unit: Unit,
    size: SizeDescriptor,
    finish: impl Fn(f64, Unit, PricingMode) -> PricingSnapshot,
) -> PricingSnapshot {
    // Asking for packs of a counted package is already pack-priced.
    if unit == Unit::Pack {
        return finish(quantity, Unit::Pack, PricingMode::Direct);
    }
    // A multipack spreads the requested count over the package count.
    if size.unit == Unit::Pack || size.amount > 1.0 {
        let packs = (quantity / size.amount).max(MIN_BILLABLE_PACKS);
        return finish(packs, Unit::Pack, PricingMode::Prorated);
    }
    finish(quantity, unit, PricingMode::Direct)
}
