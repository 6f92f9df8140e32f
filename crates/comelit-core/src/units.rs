// ── Unit registry ──
//
// Power counters arrive as unit-tagged text ("1.2 kW", "350W", "0").
// A `UnitRegistry` parses such readings and converts between units; the
// bridge client normalizes every reading to watts through it.

use std::fmt;

use tracing::debug;

use crate::model::WATT;

/// A parsed reading. `unit` is `None` for dimensionless values.
#[derive(Debug, Clone, PartialEq)]
pub struct Quantity {
    pub magnitude: f64,
    pub unit: Option<String>,
}

impl Quantity {
    pub fn is_dimensionless(&self) -> bool {
        self.unit.is_none()
    }
}

/// Parses unit-tagged readings and converts magnitudes between units.
pub trait UnitRegistry: fmt::Debug + Send + Sync {
    /// Parse `"<number> [unit]"`. `None` when there is no leading number.
    fn parse(&self, reading: &str) -> Option<Quantity> {
        let reading = reading.trim();
        let split = reading
            .find(|c: char| c.is_alphabetic() || c.is_whitespace())
            .unwrap_or(reading.len());
        let (number, unit) = reading.split_at(split);
        let magnitude = number.parse::<f64>().ok()?;
        let unit = unit.trim();
        Some(Quantity {
            magnitude,
            unit: (!unit.is_empty()).then(|| unit.to_owned()),
        })
    }

    /// Convert `value` from `from` to `to`. `None` when either unit is
    /// unknown or the two are not commensurable.
    fn convert(&self, value: f64, from: &str, to: &str) -> Option<f64>;
}

/// Electrical power units, SI-prefixed watts.
#[derive(Debug, Clone, Copy, Default)]
pub struct PowerUnits;

const POWER_FACTORS: &[(&str, f64)] = &[
    ("mW", 1e-3),
    ("W", 1.0),
    ("kW", 1e3),
    ("MW", 1e6),
    ("GW", 1e9),
    ("milliwatt", 1e-3),
    ("watt", 1.0),
    ("kilowatt", 1e3),
    ("megawatt", 1e6),
    ("gigawatt", 1e9),
];

impl PowerUnits {
    fn factor(unit: &str) -> Option<f64> {
        // Symbols are case sensitive (mW vs MW); long names are not.
        let unit = unit.trim();
        POWER_FACTORS
            .iter()
            .find(|(name, _)| {
                *name == unit || (name.len() > 2 && name.eq_ignore_ascii_case(unit.trim_end_matches('s')))
            })
            .map(|&(_, factor)| factor)
    }
}

impl UnitRegistry for PowerUnits {
    fn convert(&self, value: f64, from: &str, to: &str) -> Option<f64> {
        Some(value * Self::factor(from)? / Self::factor(to)?)
    }
}

/// Normalize a counter reading to watts.
///
/// Dimensionless, unparseable, or non-power readings give `0.0`.
pub fn reading_to_watts(registry: &dyn UnitRegistry, reading: &str) -> f64 {
    let Some(quantity) = registry.parse(reading) else {
        debug!(reading, "unparseable power reading");
        return 0.0;
    };
    let Some(unit) = quantity.unit.as_deref() else {
        return 0.0;
    };
    registry
        .convert(quantity.magnitude, unit, WATT)
        .unwrap_or_else(|| {
            debug!(reading, unit, "power reading has no conversion to watts");
            0.0
        })
}
