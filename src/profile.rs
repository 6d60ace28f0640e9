//! Trip profile models and input validation
//!
//! This module contains the validated trip description used by the generation
//! pipeline, the closed vocabularies offered by the input form, and the raw
//! input type that turns form fields into a well-formed [`TripProfile`].

use std::collections::BTreeSet;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::PacklisteError;

/// Kind of trip, as offered by the input form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TripType {
    #[serde(rename = "Strand")]
    Beach,
    #[serde(rename = "Stadt")]
    City,
    #[serde(rename = "Sport")]
    Sports,
    #[serde(rename = "Familie")]
    Family,
    #[serde(rename = "Business")]
    Business,
}

impl TripType {
    /// German label shown to the user and interpolated into the prompt
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            TripType::Beach => "Strand",
            TripType::City => "Stadt",
            TripType::Sports => "Sport",
            TripType::Family => "Familie",
            TripType::Business => "Business",
        }
    }
}

impl fmt::Display for TripType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Kind of accommodation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Accommodation {
    #[serde(rename = "Hotel")]
    Hotel,
    #[serde(rename = "Camping")]
    Camping,
    #[serde(rename = "Selbstversorger")]
    SelfCatering,
}

impl Accommodation {
    /// German label shown to the user and interpolated into the prompt
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Accommodation::Hotel => "Hotel",
            Accommodation::Camping => "Camping",
            Accommodation::SelfCatering => "Selbstversorger",
        }
    }
}

impl fmt::Display for Accommodation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Means of transport to the destination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transport {
    #[serde(rename = "Auto")]
    Car,
    #[serde(rename = "Flugzeug")]
    Plane,
    #[serde(rename = "Zug")]
    Train,
    #[serde(rename = "Bus")]
    Bus,
    #[serde(rename = "Wohnmobil")]
    Campervan,
}

impl Transport {
    /// German label shown to the user and interpolated into the prompt
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Transport::Car => "Auto",
            Transport::Plane => "Flugzeug",
            Transport::Train => "Zug",
            Transport::Bus => "Bus",
            Transport::Campervan => "Wohnmobil",
        }
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Planned activity at the destination
///
/// Ordering follows the form's option order, so a `BTreeSet<Activity>`
/// iterates in a stable, form-matching sequence regardless of input order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Activity {
    #[serde(rename = "Wandern")]
    Hiking,
    #[serde(rename = "Schwimmen")]
    Swimming,
    #[serde(rename = "Sightseeing")]
    Sightseeing,
    #[serde(rename = "Radfahren")]
    Cycling,
    #[serde(rename = "Klettern")]
    Climbing,
    #[serde(rename = "Wellness")]
    Wellness,
    #[serde(rename = "Tauchen")]
    Diving,
    #[serde(rename = "Museen")]
    Museums,
    #[serde(rename = "Skifahren")]
    Skiing,
}

impl Activity {
    /// German label shown to the user and interpolated into the prompt
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Activity::Hiking => "Wandern",
            Activity::Swimming => "Schwimmen",
            Activity::Sightseeing => "Sightseeing",
            Activity::Cycling => "Radfahren",
            Activity::Climbing => "Klettern",
            Activity::Wellness => "Wellness",
            Activity::Diving => "Tauchen",
            Activity::Museums => "Museen",
            Activity::Skiing => "Skifahren",
        }
    }
}

impl fmt::Display for Activity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How the trip period was specified on the form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateMode {
    ExplicitRange,
    MonthAndDuration,
}

/// Validated trip period
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TripDates {
    /// Concrete travel dates with `end >= start`
    Range { start: NaiveDate, end: NaiveDate },
    /// Rough planning by month plus a trip length in days (1 to 60)
    MonthAndDuration { month: String, duration_days: u32 },
}

impl TripDates {
    /// Trip length in days; equal start and end dates count as a same-day trip
    #[must_use]
    pub fn duration_days(&self) -> i64 {
        match self {
            TripDates::Range { start, end } => end.signed_duration_since(*start).num_days(),
            TripDates::MonthAndDuration { duration_days, .. } => i64::from(*duration_days),
        }
    }

    /// Explicit start date, when the trip was specified as a concrete range
    #[must_use]
    pub fn explicit_start(&self) -> Option<NaiveDate> {
        match self {
            TripDates::Range { start, .. } => Some(*start),
            TripDates::MonthAndDuration { .. } => None,
        }
    }
}

/// Validated, immutable trip description used by the generation pipeline
///
/// Constructed by [`TripProfileInput::validate`] once per request and
/// read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripProfile {
    /// Destination, trimmed and non-empty
    pub destination: String,
    /// Trip period, either concrete dates or month plus duration
    pub dates: TripDates,
    /// Number of adults travelling (1 to 10)
    pub adults: u32,
    /// Number of children travelling (0 to 10)
    pub children: u32,
    /// Number of infants among the children
    pub infants: u32,
    /// Number of pets travelling (0 to 5)
    pub pets: u32,
    /// Kind of trip
    pub trip_type: TripType,
    /// Kind of accommodation
    pub accommodation: Accommodation,
    /// Means of transport
    pub transport: Transport,
    /// Planned activities, deduplicated, iterating in form order
    pub activities: BTreeSet<Activity>,
    /// Free-text wishes or hints, kept verbatim, may be empty
    pub special_notes: String,
}

/// Raw form fields as submitted by the input collaborator
///
/// Numeric and optional fields default so that an incomplete submission
/// reaches [`TripProfileInput::validate`] and yields the full violation
/// list instead of failing on the first missing field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripProfileInput {
    #[serde(default)]
    pub destination: String,
    pub date_mode: DateMode,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub month: Option<String>,
    #[serde(default)]
    pub duration_days: Option<u32>,
    #[serde(default)]
    pub adults: u32,
    #[serde(default)]
    pub children: u32,
    #[serde(default)]
    pub infants: u32,
    #[serde(default)]
    pub pets: u32,
    pub trip_type: TripType,
    pub accommodation: Accommodation,
    pub transport: Transport,
    #[serde(default)]
    pub activities: Vec<Activity>,
    #[serde(default)]
    pub special_notes: String,
}

impl TripProfileInput {
    /// Validate the raw fields into a [`TripProfile`]
    ///
    /// Pure and side-effect-free. Collects every violated constraint, so the
    /// user sees all problems at once rather than one per submission.
    pub fn validate(self) -> Result<TripProfile, PacklisteError> {
        let mut violations = Vec::new();

        let destination = self.destination.trim().to_string();
        if destination.is_empty() {
            violations.push("Reiseziel darf nicht leer sein".to_string());
        }

        let dates = self.validate_dates(&mut violations);

        if !(1..=10).contains(&self.adults) {
            violations.push("Anzahl der Erwachsenen muss zwischen 1 und 10 liegen".to_string());
        }
        if self.children > 10 {
            violations.push("Anzahl der Kinder darf höchstens 10 betragen".to_string());
        }
        if self.infants > self.children {
            violations
                .push("Anzahl der Kleinkinder darf die Anzahl der Kinder nicht übersteigen".to_string());
        }
        if self.pets > 5 {
            violations.push("Anzahl der Haustiere darf höchstens 5 betragen".to_string());
        }

        match dates {
            Some(dates) if violations.is_empty() => Ok(TripProfile {
                destination,
                dates,
                adults: self.adults,
                children: self.children,
                infants: self.infants,
                pets: self.pets,
                trip_type: self.trip_type,
                accommodation: self.accommodation,
                transport: self.transport,
                activities: self.activities.into_iter().collect(),
                special_notes: self.special_notes,
            }),
            _ => Err(PacklisteError::Validation { violations }),
        }
    }

    /// Check the period fields for the selected date mode
    ///
    /// Returns `None` exactly when at least one violation was recorded.
    fn validate_dates(&self, violations: &mut Vec<String>) -> Option<TripDates> {
        match self.date_mode {
            DateMode::ExplicitRange => match (self.start_date, self.end_date) {
                (Some(start), Some(end)) => {
                    if end < start {
                        violations
                            .push("Enddatum darf nicht vor dem Startdatum liegen".to_string());
                        None
                    } else {
                        Some(TripDates::Range { start, end })
                    }
                }
                _ => {
                    violations
                        .push("Startdatum und Enddatum müssen angegeben werden".to_string());
                    None
                }
            },
            DateMode::MonthAndDuration => {
                let month = self
                    .month
                    .as_deref()
                    .unwrap_or_default()
                    .trim()
                    .to_string();
                let duration_days = self.duration_days.unwrap_or(0);

                let mut valid = true;
                if month.is_empty() {
                    violations.push("Reisemonat darf nicht leer sein".to_string());
                    valid = false;
                }
                if !(1..=60).contains(&duration_days) {
                    violations.push("Reisedauer muss zwischen 1 und 60 Tagen liegen".to_string());
                    valid = false;
                }

                valid.then_some(TripDates::MonthAndDuration {
                    month,
                    duration_days,
                })
            }
        }
    }
}
