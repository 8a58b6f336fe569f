//! The vehicle spec table.
//!
//! One row per car, keyed by the `File Name` column (which is also the model
//! name). Columns are looked up by header text so their order does not matter
//! and unknown columns are ignored. Only `File Name` is required.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};
use tracing::warn;

use crate::{
    error::{SpecError, SpecResult},
    kinematics::KinematicsParams,
};

/// Column headers as they appear in the vehicle data sheet.
pub mod columns {
    pub const FILE_NAME: &str = "File Name";
    pub const TYPE: &str = "Type";
    pub const MODEL: &str = "Model";
    pub const PRICE: &str = "Price";
    pub const SEATS: &str = "Seats";
    pub const FUEL_ECONOMY: &str = "Fuel Economy (MPG)";
    pub const FUEL_TANK: &str = "Fuel Tank";
    pub const RANGE: &str = "Range";
    pub const HORSEPOWER: &str = "Horsepower";
    pub const STEERING_DIAMETER: &str = "Steering diameter (ft)";
    pub const DRAG: &str = "Drag";
    pub const WEIGHT: &str = "Weight (lbs)";
    pub const SAFETY_FEATURES: &str = "Safety Features";
    pub const DESCRIPTION: &str = "Description ex. leather seats, heating... (FWD)";

    /// Every known column, for matching headers regardless of case.
    pub const ALL: [&str; 14] = [
        FILE_NAME,
        TYPE,
        MODEL,
        PRICE,
        SEATS,
        FUEL_ECONOMY,
        FUEL_TANK,
        RANGE,
        HORSEPOWER,
        STEERING_DIAMETER,
        DRAG,
        WEIGHT,
        SAFETY_FEATURES,
        DESCRIPTION,
    ];
}

/// Reference power-to-weight ratio (horsepower per pound) the base constants
/// are tuned for.
const REFERENCE_POWER_TO_WEIGHT: f32 = 200.0 / 3500.0;
/// Reference turning circle in feet.
const REFERENCE_STEERING_DIAMETER: f32 = 36.0;
/// Reference drag coefficient.
const REFERENCE_DRAG: f32 = 0.30;
/// Bounds applied to every derived scale factor.
const FACTOR_RANGE: (f32, f32) = (0.6, 1.6);

/// One row of the vehicle spec table.
///
/// Missing columns and empty cells deserialize to the field's default.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct VehicleSpec {
    /// Car name; also the model file stem.
    #[serde(rename = "File Name")]
    pub name: String,
    #[serde(rename = "Type")]
    pub category: String,
    #[serde(rename = "Model")]
    pub model: String,
    #[serde(rename = "Price", deserialize_with = "number")]
    pub price: Option<f32>,
    #[serde(rename = "Seats", deserialize_with = "count")]
    pub seats: Option<u32>,
    /// Kept as text since sheets write it as e.g. "28 city / 36 hwy".
    #[serde(rename = "Fuel Economy (MPG)")]
    pub fuel_economy: String,
    /// Gallons.
    #[serde(rename = "Fuel Tank", deserialize_with = "number")]
    pub fuel_tank: Option<f32>,
    /// Miles.
    #[serde(rename = "Range", deserialize_with = "number")]
    pub range: Option<f32>,
    #[serde(rename = "Horsepower", deserialize_with = "number")]
    pub horsepower: Option<f32>,
    #[serde(rename = "Steering diameter (ft)", deserialize_with = "number")]
    pub steering_diameter_ft: Option<f32>,
    #[serde(rename = "Drag", deserialize_with = "number")]
    pub drag: Option<f32>,
    #[serde(rename = "Weight (lbs)", deserialize_with = "number")]
    pub weight_lbs: Option<f32>,
    #[serde(rename = "Safety Features")]
    pub safety_features: String,
    #[serde(rename = "Description ex. leather seats, heating... (FWD)")]
    pub description: String,
}

impl VehicleSpec {
    /// Power-to-weight scale relative to the reference car.
    #[must_use]
    pub fn power_factor(&self) -> f32 {
        match (self.horsepower, self.weight_lbs) {
            (Some(hp), Some(weight)) if hp > 0.0 && weight > 0.0 => {
                clamp_factor((hp / weight) / REFERENCE_POWER_TO_WEIGHT)
            }
            _ => 1.0,
        }
    }

    /// Steering scale: tighter turning circles steer harder.
    #[must_use]
    pub fn steering_factor(&self) -> f32 {
        match self.steering_diameter_ft {
            Some(diameter) if diameter > 0.0 => {
                clamp_factor(REFERENCE_STEERING_DIAMETER / diameter)
            }
            _ => 1.0,
        }
    }

    /// Coasting scale: draggier cars slow down faster.
    #[must_use]
    pub fn drag_factor(&self) -> f32 {
        match self.drag {
            Some(drag) if drag > 0.0 => clamp_factor(drag / REFERENCE_DRAG),
            _ => 1.0,
        }
    }

    /// Scale `base` by this car's power, steering and drag figures.
    ///
    /// Missing or non-positive figures leave the matching constants as they
    /// are. Every factor is clamped so an odd row cannot make the car
    /// undriveable.
    #[must_use]
    pub fn derive_params(&self, base: &KinematicsParams) -> KinematicsParams {
        let power = self.power_factor();
        let speed_scale = power.sqrt();
        KinematicsParams {
            max_forward_speed: base.max_forward_speed * speed_scale,
            max_reverse_speed: base.max_reverse_speed * speed_scale,
            acceleration: base.acceleration * power,
            max_steer: base.max_steer * self.steering_factor(),
            deceleration: base.deceleration * self.drag_factor(),
            ..base.clone()
        }
    }

    /// Label/value pairs for display, skipping empty cells.
    #[must_use]
    pub fn display_rows(&self) -> Vec<(&'static str, String)> {
        let text = |label, value: &String| (!value.is_empty()).then(|| (label, value.clone()));
        let number = |label, value: Option<f32>, fmt: fn(f32) -> String| value.map(|v| (label, fmt(v)));

        [
            text(columns::TYPE, &self.category),
            text(columns::MODEL, &self.model),
            number(columns::PRICE, self.price, |v| format!("${v:.0}")),
            self.seats.map(|v| (columns::SEATS, v.to_string())),
            text(columns::FUEL_ECONOMY, &self.fuel_economy),
            number(columns::FUEL_TANK, self.fuel_tank, |v| format!("{v} gal")),
            number(columns::RANGE, self.range, |v| format!("{v} mi")),
            number(columns::HORSEPOWER, self.horsepower, |v| format!("{v} hp")),
            number(columns::STEERING_DIAMETER, self.steering_diameter_ft, |v| format!("{v} ft")),
            number(columns::DRAG, self.drag, |v| format!("{v:.2}")),
            number(columns::WEIGHT, self.weight_lbs, |v| format!("{v} lbs")),
            text(columns::SAFETY_FEATURES, &self.safety_features),
            text("Description", &self.description),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

fn clamp_factor(factor: f32) -> f32 {
    if factor.is_finite() {
        factor.clamp(FACTOR_RANGE.0, FACTOR_RANGE.1)
    } else {
        1.0
    }
}

/// Parse a numeric cell, tolerating `$`, thousands separators and a trailing
/// unit (`"$27,500"`, `"3,300 lbs"`, `"14.5 gal"`).
fn parse_number(cell: &str) -> Option<f32> {
    let cleaned: String = cell
        .trim()
        .trim_start_matches('$')
        .chars()
        .filter(|c| *c != ',')
        .take_while(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+'))
        .collect();
    cleaned.parse().ok()
}

/// Parse a whole, non-negative count such as a seat number.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn parse_count(cell: &str) -> Option<u32> {
    // Float to int casts saturate, so huge counts clamp to u32::MAX.
    parse_number(cell)
        .filter(|v| *v >= 0.0)
        .map(|v| v.round() as u32)
}

fn number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f32>, D::Error> {
    let cell = String::deserialize(deserializer)?;
    Ok(parse_number(&cell))
}

fn count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    let cell = String::deserialize(deserializer)?;
    Ok(parse_count(&cell))
}

/// Map a header onto its known column name, ignoring case.
fn canonical_column(header: &str) -> &str {
    columns::ALL
        .iter()
        .copied()
        .find(|column| column.eq_ignore_ascii_case(header))
        .unwrap_or(header)
}

/// Spec rows keyed by car name.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SpecTable {
    rows: BTreeMap<String, VehicleSpec>,
}

impl SpecTable {
    /// Parse the table from CSV text with a header row.
    ///
    /// Rows with an empty name are skipped; when a name repeats, the later row
    /// wins. Short rows leave their trailing fields empty.
    pub fn parse(input: &str) -> SpecResult<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(input.trim_start_matches('\u{feff}').as_bytes());

        let headers: csv::StringRecord = reader.headers()?.iter().map(canonical_column).collect();
        if headers.iter().all(str::is_empty) {
            return Err(SpecError::EmptyInput);
        }
        if !headers.iter().any(|header| header == columns::FILE_NAME) {
            return Err(SpecError::MissingColumn {
                column: columns::FILE_NAME,
            });
        }

        let mut rows = BTreeMap::new();
        for record in reader.records() {
            let mut record = record?;
            while record.len() < headers.len() {
                record.push_field("");
            }

            let spec: VehicleSpec = record.deserialize(Some(&headers))?;
            if spec.name.is_empty() {
                continue;
            }

            let name = spec.name.clone();
            if rows.insert(name.clone(), spec).is_some() {
                let line = record.position().map_or(0, csv::Position::line);
                warn!("Duplicate vehicle '{name}' on line {line}, using the later row");
            }
        }

        Ok(Self { rows })
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&VehicleSpec> {
        self.rows.get(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rows.keys().map(String::as_str)
    }
}
