//! Merging a spoken quantity delta into an existing list line.

use vc_protocol::{MergedQuantity, Unit};

use crate::pricing::convert_quantity;

/// Combine an existing line quantity with a newly spoken delta.
///
/// Equal units add directly. Mismatched units are reconciled by
/// converting the delta into the current unit, then the current
/// quantity into the delta unit. When neither direction converts the
/// quantities add as-is under the current unit, which is wrong
/// dimensionally but never loses the shopper's intent.
pub fn merge_quantities(
    current_quantity: f64,
    current_unit: Unit,
    delta_quantity: f64,
    delta_unit: Unit,
) -> MergedQuantity {
    if !current_quantity.is_finite() || current_quantity <= 0.0 {
        return MergedQuantity { quantity: delta_quantity, unit: delta_unit };
    }
    if current_unit == delta_unit {
        return MergedQuantity { quantity: current_quantity + delta_quantity, unit: current_unit };
    }
    if let Some(delta_in_current) = convert_quantity(delta_quantity, delta_unit, current_unit) {
        return MergedQuantity {
            quantity: current_quantity + delta_in_current,
            unit: current_unit,
        };
    }
    if let Some(current_in_delta) = convert_quantity(current_quantity, current_unit, delta_unit) {
        return MergedQuantity { quantity: current_in_delta + delta_quantity, unit: delta_unit };
    }
    tracing::warn!(
        current_unit = %current_unit,
        delta_unit = %delta_unit,
        "merging incompatible units without conversion; keeping current unit"
    );
    MergedQuantity { quantity: current_quantity + delta_quantity, unit: current_unit }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_units_add() {
        let merged = merge_quantities(2.0, Unit::Kg, 3.0, Unit::Kg);
        assert_eq!(merged, MergedQuantity { quantity: 5.0, unit: Unit::Kg });
    }

    #[test]
    fn delta_converts_into_current_unit() {
        let merged = merge_quantities(1.0, Unit::Kg, 500.0, Unit::G);
        assert_eq!(merged, MergedQuantity { quantity: 1.5, unit: Unit::Kg });

        let merged = merge_quantities(250.0, Unit::Ml, 1.0, Unit::Liter);
        assert_eq!(merged, MergedQuantity { quantity: 1250.0, unit: Unit::Ml });
    }

    #[test]
    fn empty_line_takes_the_delta_verbatim() {
        let merged = merge_quantities(0.0, Unit::Unit, 2.0, Unit::Bottle);
        assert_eq!(merged, MergedQuantity { quantity: 2.0, unit: Unit::Bottle });
    }

    #[test]
    fn unconvertible_zero_delta_flips_to_delta_unit() {
        // The delta itself cannot convert (not positive), but the
        // current quantity can, so the line re-expresses in the delta
        // unit.
        let merged = merge_quantities(1.0, Unit::Liter, 0.0, Unit::Ml);
        assert_eq!(merged, MergedQuantity { quantity: 1000.0, unit: Unit::Ml });
    }

    #[test]
    fn count_units_fall_back_to_raw_addition() {
        let merged = merge_quantities(2.0, Unit::Piece, 1.0, Unit::Pack);
        assert_eq!(merged, MergedQuantity { quantity: 3.0, unit: Unit::Piece });
    }

    #[test]
    fn cross_family_falls_back_to_raw_addition() {
        let merged = merge_quantities(1.0, Unit::Kg, 1.0, Unit::Liter);
        assert_eq!(merged, MergedQuantity { quantity: 2.0, unit: Unit::Kg });
    }
}
