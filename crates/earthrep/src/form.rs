//! The report form.
//!
//! The form is open only while a map click has supplied a location:
//! [`FormState::NoPendingLocation`] until the map is clicked, then
//! [`FormState::OpenForLocation`] until a submission succeeds. Numeric
//! fields arrive as raw text and are coerced the way a browser number
//! conversion does before they are validated.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

use crate::record::Coordinates;

/// Message shown to the user when numeric input is rejected.
pub const INVALID_INPUT_MESSAGE: &str = "Inputs have to be positive numbers!";

/// A numeric form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// Earthquake strength.
    Strength,
    /// Duration in seconds.
    Duration,
    /// Minutes since the earthquake.
    MinutesAgo,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Strength => write!(f, "strength"),
            Self::Duration => write!(f, "duration"),
            Self::MinutesAgo => write!(f, "minutes ago"),
        }
    }
}

/// Rejected numeric input.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// The field is not a finite number.
    #[error("{field} must be a finite number, got {raw:?}")]
    NotFinite {
        /// Offending field.
        field: Field,
        /// Raw text as entered.
        raw: String,
    },

    /// The field is zero or negative.
    #[error("{field} must be positive, got {value}")]
    NotPositive {
        /// Offending field.
        field: Field,
        /// Coerced value.
        value: f64,
    },
}

impl ValidationError {
    /// The field that failed validation.
    #[must_use]
    pub fn field(&self) -> Field {
        match self {
            Self::NotFinite { field, .. } | Self::NotPositive { field, .. } => *field,
        }
    }
}

/// Why a submission was not accepted.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SubmitError {
    /// No map click has supplied a location yet.
    #[error("no location selected: click the map before submitting")]
    NoPendingLocation,

    /// A numeric field is invalid.
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

impl SubmitError {
    /// Text for the blocking user notification.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::NoPendingLocation => "Click on the map to choose a location first!".to_string(),
            Self::Invalid(_) => INVALID_INPUT_MESSAGE.to_string(),
        }
    }
}

/// Raw text values of the report form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormInput {
    /// Strength field.
    pub strength: String,
    /// Duration field, in seconds.
    pub duration: String,
    /// Minutes-ago field.
    pub minutes_ago: String,
    /// Material damage note. Never validated.
    pub material_damage: String,
}

/// Form values that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedInput {
    /// Positive, finite strength.
    pub strength: f64,
    /// Positive, finite duration in seconds.
    pub duration_secs: f64,
    /// Positive, finite minutes since the earthquake.
    pub minutes_ago: f64,
    /// Damage note as entered.
    pub material_damage: String,
}

impl FormInput {
    /// Build input from raw field values.
    #[must_use]
    pub fn new(
        strength: impl Into<String>,
        duration: impl Into<String>,
        minutes_ago: impl Into<String>,
        material_damage: impl Into<String>,
    ) -> Self {
        Self {
            strength: strength.into(),
            duration: duration.into(),
            minutes_ago: minutes_ago.into(),
            material_damage: material_damage.into(),
        }
    }

    /// Coerce and validate the numeric fields.
    ///
    /// Every numeric field must be finite first; positivity is checked only
    /// once all of them are finite.
    ///
    /// # Errors
    ///
    /// Returns the first field that is non-finite, or else the first that
    /// is not strictly positive.
    pub fn validate(&self) -> Result<ValidatedInput, ValidationError> {
        let fields = [
            (Field::Strength, &self.strength),
            (Field::Duration, &self.duration),
            (Field::MinutesAgo, &self.minutes_ago),
        ];

        let mut values = [0.0_f64; 3];
        for (slot, (field, raw)) in values.iter_mut().zip(fields) {
            let value = coerce_number(raw);
            if !value.is_finite() {
                return Err(ValidationError::NotFinite {
                    field,
                    raw: raw.clone(),
                });
            }
            *slot = value;
        }

        for (value, (field, _)) in values.iter().zip(fields) {
            if *value <= 0.0 {
                return Err(ValidationError::NotPositive {
                    field,
                    value: *value,
                });
            }
        }

        let [strength, duration_secs, minutes_ago] = values;
        Ok(ValidatedInput {
            strength,
            duration_secs,
            minutes_ago,
            material_damage: self.material_damage.clone(),
        })
    }

    /// Empty every field of the form.
    pub fn clear(&mut self) {
        self.strength.clear();
        self.duration.clear();
        self.minutes_ago.clear();
        self.material_damage.clear();
    }
}

fn decimal_literal() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?$").expect("Invalid regex pattern")
    })
}

fn radix_literal() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^0([xXoObB])([0-9a-fA-F]+)$").expect("Invalid regex pattern"))
}

/// Convert form text to a number with browser number-conversion rules.
///
/// Surrounding whitespace is ignored and blank text is zero. Decimal and
/// `0x`/`0o`/`0b` literals and `Infinity` are understood; anything else is
/// NaN. Unlike [`str::parse`], spellings such as `inf` or `nan` are not
/// numbers here.
#[must_use]
pub fn coerce_number(raw: &str) -> f64 {
    let text = raw.trim();
    if text.is_empty() {
        return 0.0;
    }

    match text {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    if decimal_literal().is_match(text) {
        return text.parse().unwrap_or(f64::NAN);
    }

    if let Some(caps) = radix_literal().captures(text) {
        let radix = match &caps[1] {
            "x" | "X" => 16,
            "o" | "O" => 8,
            _ => 2,
        };
        return caps[2].chars().try_fold(0.0_f64, |acc, c| {
            c.to_digit(radix)
                .map(|digit| acc * f64::from(radix) + f64::from(digit))
        })
        .unwrap_or(f64::NAN);
    }

    f64::NAN
}

/// Whether the form is waiting for a map click or open for a location.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum FormState {
    /// No map click yet (or the last submission consumed it).
    #[default]
    NoPendingLocation,
    /// A map click selected this location; the form is open.
    OpenForLocation(Coordinates),
}

/// The report form: its state, field values and display flag.
#[derive(Debug, Clone, Default)]
pub struct Form {
    state: FormState,
    input: FormInput,
    display_suppressed: bool,
}

impl Form {
    /// Create a closed, empty form.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the form for a map-click location.
    ///
    /// Clicking again while open moves the pending location and keeps
    /// whatever has been typed.
    pub fn open(&mut self, coords: Coordinates) {
        self.state = FormState::OpenForLocation(coords);
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> FormState {
        self.state
    }

    /// Location the form is open for.
    #[must_use]
    pub fn pending_location(&self) -> Option<Coordinates> {
        match self.state {
            FormState::OpenForLocation(coords) => Some(coords),
            FormState::NoPendingLocation => None,
        }
    }

    /// Whether the form is open (not hidden).
    #[must_use]
    pub fn is_open(&self) -> bool {
        matches!(self.state, FormState::OpenForLocation(_))
    }

    /// Whether the form is open and currently displayable.
    #[must_use]
    pub fn is_displayed(&self) -> bool {
        self.is_open() && !self.display_suppressed
    }

    /// Current field values.
    #[must_use]
    pub fn input(&self) -> &FormInput {
        &self.input
    }

    /// Replace the field values.
    pub fn fill(&mut self, input: FormInput) {
        self.input = input;
    }

    /// Check the form can be submitted and return its location and values.
    ///
    /// Does not change the form.
    ///
    /// # Errors
    ///
    /// Returns [`SubmitError::NoPendingLocation`] if the map hasn't been
    /// clicked, or [`SubmitError::Invalid`] if a numeric field is invalid.
    pub fn check(&self) -> Result<(Coordinates, ValidatedInput), SubmitError> {
        let coords = self.pending_location().ok_or(SubmitError::NoPendingLocation)?;
        let values = self.input.validate()?;
        Ok((coords, values))
    }

    /// Clear the fields and hide the form after a successful submission.
    ///
    /// Display stays suppressed until [`Form::restore_display`].
    pub fn close_after_submit(&mut self) {
        self.input.clear();
        self.state = FormState::NoPendingLocation;
        self.display_suppressed = true;
    }

    /// Make the form displayable again once the hide delay has passed.
    pub fn restore_display(&mut self) {
        self.display_suppressed = false;
    }

    /// Whether display is suppressed after a recent submission.
    #[must_use]
    pub fn is_display_suppressed(&self) -> bool {
        self.display_suppressed
    }
}
