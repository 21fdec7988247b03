//! Core record types for earthrep.
//!
//! A [`Record`] is one reported earthquake observation. Records are immutable
//! once built; the human-readable label is derived from the creation time
//! whenever it is asked for, so records reloaded from storage label
//! themselves exactly like freshly created ones.

use std::fmt;

use chrono::{DateTime, Datelike, Local, Utc};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

/// Month names used by the record label, indexed by zero-based month.
const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Number of trailing digits of the creation tick kept in a record id.
const ID_DIGITS: usize = 10;

/// A map location as latitude and longitude in degrees.
///
/// Serialized as a two-element `[lat, lng]` array.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coordinates {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
}

impl Coordinates {
    /// Build coordinates from already-trusted values.
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Build coordinates, rejecting non-finite components.
    #[must_use]
    pub fn try_new(lat: f64, lng: f64) -> Option<Self> {
        (lat.is_finite() && lng.is_finite()).then_some(Self { lat, lng })
    }
}

impl From<[f64; 2]> for Coordinates {
    fn from([lat, lng]: [f64; 2]) -> Self {
        Self { lat, lng }
    }
}

impl From<Coordinates> for [f64; 2] {
    fn from(coords: Coordinates) -> Self {
        [coords.lat, coords.lng]
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

/// Identifier of a record: the last ten digits of its creation time in
/// epoch milliseconds.
///
/// Unique in practice for a single user clicking by hand; uniqueness is not
/// enforced anywhere.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Derive an id from a creation timestamp.
    #[must_use]
    pub fn from_timestamp(created_at: DateTime<Utc>) -> Self {
        let ticks = created_at.timestamp_millis().to_string();
        let start = ticks.len().saturating_sub(ID_DIGITS);
        Self(ticks[start..].to_string())
    }

    /// The id as text, as carried by a list entry's `data-id` attribute.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// One reported earthquake observation.
///
/// The persisted layout uses the field names `date`, `id`, `coords`,
/// `strength`, `duration`, `matDmg`, `time` and `description`. The
/// `description` written on save is the derived label; on load it (and any
/// legacy `clicks` counter) is ignored and the label is derived again.
///
/// The label uses the month and day of `date` in the host's local time
/// zone. A record saved and loaded under the same zone keeps its label; one
/// loaded under a different offset can land on a neighbouring day.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Record {
    #[serde(rename = "date")]
    created_at: DateTime<Utc>,
    id: RecordId,
    coords: Coordinates,
    strength: f64,
    #[serde(rename = "duration")]
    duration_secs: f64,
    #[serde(rename = "time")]
    minutes_ago: f64,
    #[serde(rename = "matDmg", default)]
    material_damage: String,
}

impl Record {
    /// Create a record stamped with the current time.
    ///
    /// No validation happens here; callers validate the numeric fields
    /// first (see [`crate::form::FormInput::validate`]).
    #[must_use]
    pub fn new(
        coords: Coordinates,
        strength: f64,
        duration_secs: f64,
        minutes_ago: f64,
        material_damage: String,
    ) -> Self {
        Self::new_at(
            Utc::now(),
            coords,
            strength,
            duration_secs,
            minutes_ago,
            material_damage,
        )
    }

    /// Create a record with an explicit creation time.
    #[must_use]
    pub fn new_at(
        created_at: DateTime<Utc>,
        coords: Coordinates,
        strength: f64,
        duration_secs: f64,
        minutes_ago: f64,
        material_damage: String,
    ) -> Self {
        Self {
            created_at,
            id: RecordId::from_timestamp(created_at),
            coords,
            strength,
            duration_secs,
            minutes_ago,
            material_damage,
        }
    }

    /// The record id.
    #[must_use]
    pub fn id(&self) -> &RecordId {
        &self.id
    }

    /// When the record was created.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Where the earthquake was reported.
    #[must_use]
    pub fn coords(&self) -> Coordinates {
        self.coords
    }

    /// Reported strength.
    #[must_use]
    pub fn strength(&self) -> f64 {
        self.strength
    }

    /// Reported duration in seconds.
    #[must_use]
    pub fn duration_secs(&self) -> f64 {
        self.duration_secs
    }

    /// How many minutes before the report the earthquake happened.
    #[must_use]
    pub fn minutes_ago(&self) -> f64 {
        self.minutes_ago
    }

    /// Free-form note on material damage.
    #[must_use]
    pub fn material_damage(&self) -> &str {
        &self.material_damage
    }

    /// Human-readable label, `"Earthquake on <Month> <Day>"`, in local time.
    #[must_use]
    pub fn label(&self) -> String {
        label_for(&self.created_at.with_timezone(&Local))
    }
}

/// Format the label for a calendar date.
#[must_use]
pub fn label_for(date: &impl Datelike) -> String {
    // month0 is always within 0..12
    let month = MONTHS[date.month0() as usize];
    format!("Earthquake on {month} {}", date.day())
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Record", 8)?;
        state.serialize_field("date", &self.created_at)?;
        state.serialize_field("id", &self.id)?;
        state.serialize_field("coords", &self.coords)?;
        state.serialize_field("strength", &self.strength)?;
        state.serialize_field("duration", &self.duration_secs)?;
        state.serialize_field("matDmg", &self.material_damage)?;
        state.serialize_field("time", &self.minutes_ago)?;
        state.serialize_field("description", &self.label())?;
        state.end()
    }
}
