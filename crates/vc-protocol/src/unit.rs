//! Canonical measurement units and their conversion families.

use serde::{Deserialize, Serialize};

/// Canonical unit every locale spelling and plural form normalizes to.
///
/// Transcripts arrive with aliases in English, Spanish, and Hindi
/// (Latin and Devanagari); [`Unit::from_alias`] folds them all onto this
/// fixed set so pricing and merging never see raw spellings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    /// Grams.
    G,
    /// Kilograms.
    Kg,
    /// Millilitres.
    Ml,
    /// Litres.
    Liter,
    /// Generic "each" count, the default when no unit is spoken.
    #[default]
    Unit,
    /// Individual pieces.
    Piece,
    /// Multi-item packs.
    Pack,
    /// Bottles.
    Bottle,
}

/// Conversion family a unit belongs to. Quantities convert freely within
/// a family (mass, volume) and never across families; count units do not
/// convert between each other at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitFamily {
    Mass,
    Volume,
    Count,
}

impl Unit {
    /// Canonical lowercase spelling used on the wire and in labels.
    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::G => "g",
            Unit::Kg => "kg",
            Unit::Ml => "ml",
            Unit::Liter => "liter",
            Unit::Unit => "unit",
            Unit::Piece => "piece",
            Unit::Pack => "pack",
            Unit::Bottle => "bottle",
        }
    }

    /// Conversion family for this unit.
    pub fn family(&self) -> UnitFamily {
        match self {
            Unit::G | Unit::Kg => UnitFamily::Mass,
            Unit::Ml | Unit::Liter => UnitFamily::Volume,
            Unit::Unit | Unit::Piece | Unit::Pack | Unit::Bottle => UnitFamily::Count,
        }
    }

    /// Resolve a spoken alias (any supported locale, singular or plural)
    /// to its canonical unit. Returns `None` for unrecognized spellings.
    pub fn from_alias(alias: &str) -> Option<Unit> {
        let folded = alias.trim().to_lowercase();
        let unit = match folded.as_str() {
            "unit" | "units" | "unidad" | "unidades" => Unit::Unit,
            "pc" | "pcs" | "piece" | "pieces" | "pieza" | "piezas" => Unit::Piece,
            "bottle" | "bottles" | "botella" | "botellas" => Unit::Bottle,
            "pack" | "packs" | "paquete" | "paquetes" => Unit::Pack,
            "kg" | "kilo" | "kilos" | "kilogram" | "kilograms" | "kilogramo" | "kilogramos"
            | "किलो" | "किलोग्राम" => Unit::Kg,
            "g" | "gram" | "grams" | "gramo" | "gramos" | "ग्राम" => Unit::G,
            "l" | "liter" | "liters" | "litre" | "litres" | "litro" | "litros" | "लीटर" => {
                Unit::Liter
            }
            "ml" | "mililitro" | "mililitros" | "मिलीलीटर" => Unit::Ml,
            _ => return None,
        };
        Some(unit)
    }

    /// Alias resolution with the generic count unit as the fallback for
    /// empty or unknown spellings.
    pub fn parse_or_default(alias: &str) -> Unit {
        Unit::from_alias(alias).unwrap_or_default()
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
