//! Core car setup types for driftset.
//!
//! A car's setup exists in two shapes:
//!
//! - [`CarRecord`]: what the store holds. Tunable values are numbers, except
//!   the shock names.
//! - [`CarForm`]: what the screens edit. Every tunable value is free text so
//!   half-typed input (`""`, `"-"`, `"3."`) can live in it while editing.
//!
//! Converting a form back to a record never fails: text that is not a finite
//! decimal number becomes `0.0`.
//!
//! Fields are addressed through a catalogue ([`Field`], [`Tunable`]) instead
//! of one accessor per column, and left/right mirroring is driven by the
//! [`MIRROR_PAIRS`] table.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{Error, Result};

/// Identifier of a car that has not been stored yet.
pub const UNASSIGNED_ID: i64 = 0;

/// Front or rear axle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axle {
    /// Front axle.
    Front,
    /// Rear axle.
    Rear,
}

impl Axle {
    /// Both axles, in display order.
    pub const ALL: [Self; 2] = [Self::Front, Self::Rear];

    /// Lowercase key used in field keys and column names.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::Front => "front",
            Self::Rear => "rear",
        }
    }

    /// Section heading shown above the axle's fields.
    #[must_use]
    pub fn heading(self) -> &'static str {
        match self {
            Self::Front => "Front Settings",
            Self::Rear => "Rear Settings",
        }
    }
}

impl fmt::Display for Axle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Left or right side of an axle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// Left side.
    Left,
    /// Right side.
    Right,
}

impl Side {
    /// Lowercase key.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }

    /// Label word.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Left => "Left",
            Self::Right => "Right",
        }
    }
}

/// A dimension measured separately on the left and right side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    /// Camber angle.
    CamberDegree,
    /// Camber arm length.
    CamberLength,
    /// Toe angle.
    TowDegree,
    /// Toe link length.
    TowLength,
}

impl Dimension {
    /// All side-scoped dimensions, in display order.
    pub const ALL: [Self; 4] = [
        Self::CamberDegree,
        Self::CamberLength,
        Self::TowDegree,
        Self::TowLength,
    ];

    /// Lowercase key.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::CamberDegree => "camber_degree",
            Self::CamberLength => "camber_length",
            Self::TowDegree => "tow_degree",
            Self::TowLength => "tow_length",
        }
    }

    /// Label words.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::CamberDegree => "Camber Degree",
            Self::CamberLength => "Camber Length",
            Self::TowDegree => "Tow Degree",
            Self::TowLength => "Tow Length",
        }
    }
}

/// A setting that applies to a whole axle rather than one side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxleSetting {
    /// Shock absorber model, free text.
    ShockName,
    /// Shock absorber length.
    ShockLength,
    /// Spring preload.
    ShockPreload,
    /// Wheel rim offset.
    RimOffset,
}

impl AxleSetting {
    /// All axle-scoped settings, in display order.
    pub const ALL: [Self; 4] = [
        Self::ShockName,
        Self::ShockLength,
        Self::ShockPreload,
        Self::RimOffset,
    ];

    /// Lowercase key.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::ShockName => "shock_name",
            Self::ShockLength => "shock_length",
            Self::ShockPreload => "shock_preload",
            Self::RimOffset => "rim_offset",
        }
    }

    /// Label words.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::ShockName => "Shock Name",
            Self::ShockLength => "Shock Length",
            Self::ShockPreload => "Shock Preload",
            Self::RimOffset => "Rim Offset",
        }
    }
}

/// One tunable value within an axle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tunable {
    /// A side-scoped dimension on one side.
    Sided(Dimension, Side),
    /// An axle-scoped setting.
    Setting(AxleSetting),
}

impl Tunable {
    /// The twelve tunables of an axle, in display order.
    pub const ALL: [Self; 12] = [
        Self::Sided(Dimension::CamberDegree, Side::Left),
        Self::Sided(Dimension::CamberDegree, Side::Right),
        Self::Sided(Dimension::CamberLength, Side::Left),
        Self::Sided(Dimension::CamberLength, Side::Right),
        Self::Sided(Dimension::TowDegree, Side::Left),
        Self::Sided(Dimension::TowDegree, Side::Right),
        Self::Sided(Dimension::TowLength, Side::Left),
        Self::Sided(Dimension::TowLength, Side::Right),
        Self::Setting(AxleSetting::ShockName),
        Self::Setting(AxleSetting::ShockLength),
        Self::Setting(AxleSetting::ShockPreload),
        Self::Setting(AxleSetting::RimOffset),
    ];

    /// Whether the stored value is a number.
    #[must_use]
    pub fn is_numeric(self) -> bool {
        self != Self::Setting(AxleSetting::ShockName)
    }

    fn key(self) -> String {
        match self {
            Self::Sided(dimension, side) => format!("{}_{}", dimension.key(), side.key()),
            Self::Setting(setting) => setting.key().to_string(),
        }
    }

    fn label(self) -> String {
        match self {
            Self::Sided(dimension, side) => format!("{} {}", dimension.label(), side.label()),
            Self::Setting(setting) => setting.label().to_string(),
        }
    }
}

/// A tunable field of a car: an axle plus a tunable on that axle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Field {
    /// The axle the field belongs to.
    pub axle: Axle,
    /// Which value on that axle.
    pub tunable: Tunable,
}

/// Number of tunable fields per car.
pub const FIELD_COUNT: usize = Axle::ALL.len() * Tunable::ALL.len();

/// Left/right field pairs that mirror mode keeps identical.
///
/// Axle-scoped settings are absent, so they are never mirrored.
pub const MIRROR_PAIRS: [(Field, Field); 8] = [
    mirror_pair(Axle::Front, Dimension::CamberDegree),
    mirror_pair(Axle::Front, Dimension::CamberLength),
    mirror_pair(Axle::Front, Dimension::TowDegree),
    mirror_pair(Axle::Front, Dimension::TowLength),
    mirror_pair(Axle::Rear, Dimension::CamberDegree),
    mirror_pair(Axle::Rear, Dimension::CamberLength),
    mirror_pair(Axle::Rear, Dimension::TowDegree),
    mirror_pair(Axle::Rear, Dimension::TowLength),
];

const fn mirror_pair(axle: Axle, dimension: Dimension) -> (Field, Field) {
    (
        Field::new(axle, Tunable::Sided(dimension, Side::Left)),
        Field::new(axle, Tunable::Sided(dimension, Side::Right)),
    )
}

impl Field {
    /// Create a field.
    #[must_use]
    pub const fn new(axle: Axle, tunable: Tunable) -> Self {
        Self { axle, tunable }
    }

    /// Every tunable field, front axle first, in display order.
    pub fn all() -> impl Iterator<Item = Self> {
        Axle::ALL
            .into_iter()
            .flat_map(|axle| Tunable::ALL.into_iter().map(move |t| Self::new(axle, t)))
    }

    /// Key accepted by the shell and CLI, e.g. `front.camber_degree_left`.
    #[must_use]
    pub fn key(&self) -> String {
        format!("{}.{}", self.axle.key(), self.tunable.key())
    }

    /// Store column name, e.g. `front_camber_degree_left`.
    #[must_use]
    pub fn column(&self) -> String {
        format!("{}_{}", self.axle.key(), self.tunable.key())
    }

    /// Label shown next to the value, e.g. `Camber Degree Left`.
    ///
    /// Labels repeat across axles; the screen groups them under
    /// [`Axle::heading`].
    #[must_use]
    pub fn label(&self) -> String {
        self.tunable.label()
    }

    /// Whether the stored value is a number.
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        self.tunable.is_numeric()
    }

    /// The field on the other side of the same pair, if this field is paired.
    #[must_use]
    pub fn mirror_partner(&self) -> Option<Self> {
        MIRROR_PAIRS.iter().find_map(|&(left, right)| {
            if left == *self {
                Some(right)
            } else if right == *self {
                Some(left)
            } else {
                None
            }
        })
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

impl FromStr for Field {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::all()
            .find(|field| field.key() == wanted)
            .ok_or_else(|| Error::unknown_field(s.trim()))
    }
}

/// Render a stored number as editable text.
///
/// Uses the shortest text that parses back to the same value and always
/// keeps a fractional part (`0.0`, `3.5`).
#[must_use]
pub fn format_decimal(value: f64) -> String {
    let text = value.to_string();
    if text.contains('.') || !value.is_finite() {
        text
    } else {
        format!("{text}.0")
    }
}

/// Parse editable text into a stored number.
///
/// Empty, unparsable and non-finite text all become `0.0`.
#[must_use]
pub fn parse_decimal(text: &str) -> f64 {
    match text.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => {
            if !text.is_empty() {
                trace!("Coercing non-numeric text {:?} to 0.0", text);
            }
            0.0
        }
    }
}

/// Stored values for one axle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct AxleRecord {
    pub camber_degree_left: f64,
    pub camber_degree_right: f64,
    pub camber_length_left: f64,
    pub camber_length_right: f64,
    pub tow_degree_left: f64,
    pub tow_degree_right: f64,
    pub tow_length_left: f64,
    pub tow_length_right: f64,
    pub shock_name: String,
    pub shock_length: f64,
    pub shock_preload: f64,
    pub rim_offset: f64,
}

impl AxleRecord {
    /// The numeric value of a tunable, `None` for the shock name.
    #[must_use]
    pub fn number(&self, tunable: Tunable) -> Option<f64> {
        let value = match tunable {
            Tunable::Sided(Dimension::CamberDegree, Side::Left) => self.camber_degree_left,
            Tunable::Sided(Dimension::CamberDegree, Side::Right) => self.camber_degree_right,
            Tunable::Sided(Dimension::CamberLength, Side::Left) => self.camber_length_left,
            Tunable::Sided(Dimension::CamberLength, Side::Right) => self.camber_length_right,
            Tunable::Sided(Dimension::TowDegree, Side::Left) => self.tow_degree_left,
            Tunable::Sided(Dimension::TowDegree, Side::Right) => self.tow_degree_right,
            Tunable::Sided(Dimension::TowLength, Side::Left) => self.tow_length_left,
            Tunable::Sided(Dimension::TowLength, Side::Right) => self.tow_length_right,
            Tunable::Setting(AxleSetting::ShockName) => return None,
            Tunable::Setting(AxleSetting::ShockLength) => self.shock_length,
            Tunable::Setting(AxleSetting::ShockPreload) => self.shock_preload,
            Tunable::Setting(AxleSetting::RimOffset) => self.rim_offset,
        };
        Some(value)
    }

    /// Mutable access to the numeric value of a tunable.
    pub fn number_mut(&mut self, tunable: Tunable) -> Option<&mut f64> {
        let slot = match tunable {
            Tunable::Sided(Dimension::CamberDegree, Side::Left) => &mut self.camber_degree_left,
            Tunable::Sided(Dimension::CamberDegree, Side::Right) => &mut self.camber_degree_right,
            Tunable::Sided(Dimension::CamberLength, Side::Left) => &mut self.camber_length_left,
            Tunable::Sided(Dimension::CamberLength, Side::Right) => &mut self.camber_length_right,
            Tunable::Sided(Dimension::TowDegree, Side::Left) => &mut self.tow_degree_left,
            Tunable::Sided(Dimension::TowDegree, Side::Right) => &mut self.tow_degree_right,
            Tunable::Sided(Dimension::TowLength, Side::Left) => &mut self.tow_length_left,
            Tunable::Sided(Dimension::TowLength, Side::Right) => &mut self.tow_length_right,
            Tunable::Setting(AxleSetting::ShockName) => return None,
            Tunable::Setting(AxleSetting::ShockLength) => &mut self.shock_length,
            Tunable::Setting(AxleSetting::ShockPreload) => &mut self.shock_preload,
            Tunable::Setting(AxleSetting::RimOffset) => &mut self.rim_offset,
        };
        Some(slot)
    }

    fn to_form(&self) -> AxleForm {
        let mut form = AxleForm {
            shock_name: self.shock_name.clone(),
            ..AxleForm::default()
        };
        for tunable in Tunable::ALL {
            if let Some(value) = self.number(tunable) {
                *form.text_mut(tunable) = format_decimal(value);
            }
        }
        form
    }
}

/// Editable text for one axle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct AxleForm {
    pub camber_degree_left: String,
    pub camber_degree_right: String,
    pub camber_length_left: String,
    pub camber_length_right: String,
    pub tow_degree_left: String,
    pub tow_degree_right: String,
    pub tow_length_left: String,
    pub tow_length_right: String,
    pub shock_name: String,
    pub shock_length: String,
    pub shock_preload: String,
    pub rim_offset: String,
}

impl AxleForm {
    /// The text of a tunable.
    #[must_use]
    pub fn text(&self, tunable: Tunable) -> &str {
        match tunable {
            Tunable::Sided(Dimension::CamberDegree, Side::Left) => &self.camber_degree_left,
            Tunable::Sided(Dimension::CamberDegree, Side::Right) => &self.camber_degree_right,
            Tunable::Sided(Dimension::CamberLength, Side::Left) => &self.camber_length_left,
            Tunable::Sided(Dimension::CamberLength, Side::Right) => &self.camber_length_right,
            Tunable::Sided(Dimension::TowDegree, Side::Left) => &self.tow_degree_left,
            Tunable::Sided(Dimension::TowDegree, Side::Right) => &self.tow_degree_right,
            Tunable::Sided(Dimension::TowLength, Side::Left) => &self.tow_length_left,
            Tunable::Sided(Dimension::TowLength, Side::Right) => &self.tow_length_right,
            Tunable::Setting(AxleSetting::ShockName) => &self.shock_name,
            Tunable::Setting(AxleSetting::ShockLength) => &self.shock_length,
            Tunable::Setting(AxleSetting::ShockPreload) => &self.shock_preload,
            Tunable::Setting(AxleSetting::RimOffset) => &self.rim_offset,
        }
    }

    /// Mutable access to the text of a tunable.
    pub fn text_mut(&mut self, tunable: Tunable) -> &mut String {
        match tunable {
            Tunable::Sided(Dimension::CamberDegree, Side::Left) => &mut self.camber_degree_left,
            Tunable::Sided(Dimension::CamberDegree, Side::Right) => &mut self.camber_degree_right,
            Tunable::Sided(Dimension::CamberLength, Side::Left) => &mut self.camber_length_left,
            Tunable::Sided(Dimension::CamberLength, Side::Right) => &mut self.camber_length_right,
            Tunable::Sided(Dimension::TowDegree, Side::Left) => &mut self.tow_degree_left,
            Tunable::Sided(Dimension::TowDegree, Side::Right) => &mut self.tow_degree_right,
            Tunable::Sided(Dimension::TowLength, Side::Left) => &mut self.tow_length_left,
            Tunable::Sided(Dimension::TowLength, Side::Right) => &mut self.tow_length_right,
            Tunable::Setting(AxleSetting::ShockName) => &mut self.shock_name,
            Tunable::Setting(AxleSetting::ShockLength) => &mut self.shock_length,
            Tunable::Setting(AxleSetting::ShockPreload) => &mut self.shock_preload,
            Tunable::Setting(AxleSetting::RimOffset) => &mut self.rim_offset,
        }
    }

    fn to_record(&self) -> AxleRecord {
        let mut record = AxleRecord {
            shock_name: self.shock_name.clone(),
            ..AxleRecord::default()
        };
        for tunable in Tunable::ALL {
            if let Some(slot) = record.number_mut(tunable) {
                *slot = parse_decimal(self.text(tunable));
            }
        }
        record
    }
}

/// A car's setup as stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CarRecord {
    /// Store-assigned identifier, [`UNASSIGNED_ID`] until first insert.
    pub id: i64,
    /// Display name. Not unique.
    pub name: String,
    /// Front axle values.
    pub front: AxleRecord,
    /// Rear axle values.
    pub rear: AxleRecord,
}

impl CarRecord {
    /// The values of one axle.
    #[must_use]
    pub fn axle(&self, axle: Axle) -> &AxleRecord {
        match axle {
            Axle::Front => &self.front,
            Axle::Rear => &self.rear,
        }
    }

    /// Mutable access to the values of one axle.
    pub fn axle_mut(&mut self, axle: Axle) -> &mut AxleRecord {
        match axle {
            Axle::Front => &mut self.front,
            Axle::Rear => &mut self.rear,
        }
    }

    /// Convert to editable text.
    #[must_use]
    pub fn to_form(&self) -> CarForm {
        CarForm {
            id: self.id,
            name: self.name.clone(),
            front: self.front.to_form(),
            rear: self.rear.to_form(),
        }
    }
}

/// A car's setup as edited on screen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarForm {
    /// Store-assigned identifier, [`UNASSIGNED_ID`] until first insert.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Front axle text.
    pub front: AxleForm,
    /// Rear axle text.
    pub rear: AxleForm,
}

impl CarForm {
    /// A fresh, unsaved car with every field empty.
    #[must_use]
    pub fn new_named(name: impl Into<String>) -> Self {
        Self {
            id: UNASSIGNED_ID,
            name: name.into(),
            ..Self::default()
        }
    }

    /// Whether the car has not been stored yet.
    #[must_use]
    pub fn is_unsaved(&self) -> bool {
        self.id == UNASSIGNED_ID
    }

    /// The text of one axle.
    #[must_use]
    pub fn axle(&self, axle: Axle) -> &AxleForm {
        match axle {
            Axle::Front => &self.front,
            Axle::Rear => &self.rear,
        }
    }

    /// Mutable access to the text of one axle.
    pub fn axle_mut(&mut self, axle: Axle) -> &mut AxleForm {
        match axle {
            Axle::Front => &mut self.front,
            Axle::Rear => &mut self.rear,
        }
    }

    /// The text of a field.
    #[must_use]
    pub fn text(&self, field: Field) -> &str {
        self.axle(field.axle).text(field.tunable)
    }

    /// Replace the text of a field.
    pub fn set_text(&mut self, field: Field, text: impl Into<String>) {
        *self.axle_mut(field.axle).text_mut(field.tunable) = text.into();
    }

    /// Convert to stored values, coercing bad numbers to `0.0`.
    #[must_use]
    pub fn to_record(&self) -> CarRecord {
        CarRecord {
            id: self.id,
            name: self.name.clone(),
            front: self.front.to_record(),
            rear: self.rear.to_record(),
        }
    }
}

impl From<&CarRecord> for CarForm {
    fn from(record: &CarRecord) -> Self {
        record.to_form()
    }
}

impl From<&CarForm> for CarRecord {
    fn from(form: &CarForm) -> Self {
        form.to_record()
    }
}
