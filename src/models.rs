// ABOUTME: Core data models for the workout tracking domain
// ABOUTME: Workout, Exercise, Set, and Measure definitions with append-only ordering
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;

/// Truncate a timestamp to the start of its calendar day in UTC.
///
/// UTC never observes an offset overlap, so plain truncation already matches
/// the earlier-offset tie-break required at a DST fallback boundary.
#[must_use]
pub fn start_of_day(timestamp: DateTime<Utc>) -> DateTime<Utc> {
    timestamp.date_naive().and_time(NaiveTime::MIN).and_utc()
}

/// Top-level workout session record.
///
/// The `exercises` field is a read-side projection assembled from the
/// exercises collection by foreign key. It is never the persisted source of
/// truth; stored workout rows carry only the scalar fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workout {
    /// Unique identifier
    pub id: Uuid,
    /// Creation timestamp
    pub timestamp: DateTime<Utc>,
    /// Creation timestamp truncated to the UTC calendar day
    pub start_of_day: DateTime<Utc>,
    /// Exercises belonging to this workout, sorted ascending by `order`
    #[serde(default)]
    pub exercises: Vec<Exercise>,
    /// Free-text training emphasis
    pub emphasis: String,
    /// Free-text notes
    pub notes: String,
}

impl Workout {
    /// Create a fresh empty workout stamped with the current time
    #[must_use]
    pub fn new() -> Self {
        let timestamp = Utc::now();
        Self {
            id: Uuid::new_v4(),
            timestamp,
            start_of_day: start_of_day(timestamp),
            exercises: Vec::new(),
            emphasis: String::new(),
            notes: String::new(),
        }
    }
}

impl Default for Workout {
    fn default() -> Self {
        Self::new()
    }
}

/// An activity performed within a workout.
///
/// `order` is the zero-based append-only position among siblings; `sets` is a
/// read-side projection like `Workout::exercises`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exercise {
    /// Unique identifier
    pub id: Uuid,
    /// Owning workout
    pub workout_id: Uuid,
    /// Creation timestamp
    pub timestamp: DateTime<Utc>,
    /// Zero-based position among sibling exercises
    pub order: i32,
    /// Exercise name, e.g. "Squat"
    pub name: String,
    /// Sets recorded for this exercise, sorted ascending by `order`
    #[serde(default)]
    pub sets: Vec<Set>,
    /// How set magnitudes are interpreted
    pub measure: Measure,
}

impl Exercise {
    /// Create a new exercise at the given sibling position
    #[must_use]
    pub fn new(workout_id: Uuid, name: impl Into<String>, order: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            workout_id,
            timestamp: Utc::now(),
            order,
            name: name.into(),
            sets: Vec::new(),
            measure: Measure::default(),
        }
    }
}

/// A single rep-count/magnitude record within an exercise
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Set {
    /// Unique identifier
    pub id: Uuid,
    /// Owning exercise
    pub exercise_id: Uuid,
    /// Creation timestamp
    pub timestamp: DateTime<Utc>,
    /// Zero-based position among sibling sets
    pub order: i32,
    /// Repetition count
    pub reps: i32,
    /// Magnitude, interpreted per the owning exercise's measure
    pub of: f64,
}

impl Set {
    /// Create a new set at the given sibling position
    #[must_use]
    pub fn new(exercise_id: Uuid, reps: i32, of: f64, order: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            exercise_id,
            timestamp: Utc::now(),
            order,
            reps,
            of,
        }
    }
}

/// Category of measurement a unit belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UnitType {
    /// Bodyweight or otherwise unitless work
    None,
    /// Weight lifted
    Mass,
    /// Distance covered
    Distance,
    /// Time under effort
    Time,
}

impl UnitType {
    /// Every unit type, in declaration order
    pub const ALL: [Self; 4] = [Self::None, Self::Mass, Self::Distance, Self::Time];

    /// Uppercase wire/storage representation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Mass => "MASS",
            Self::Distance => "DISTANCE",
            Self::Time => "TIME",
        }
    }
}

impl Display for UnitType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for UnitType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NONE" => Ok(Self::None),
            "MASS" => Ok(Self::Mass),
            "DISTANCE" => Ok(Self::Distance),
            "TIME" => Ok(Self::Time),
            _ => Err(AppError::serialization(format!("Invalid unit type: {s}"))),
        }
    }
}

/// Concrete measurement unit for a set's magnitude
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Unit {
    /// Pounds
    Lbs,
    /// Kilograms
    Kgs,
    /// Seconds
    Seconds,
    /// Minutes
    Minutes,
    /// Hours
    Hours,
    /// Miles
    Miles,
    /// Kilometers
    Kms,
    /// Meters
    Meters,
}

impl Unit {
    /// Every unit, in declaration order
    pub const ALL: [Self; 8] = [
        Self::Lbs,
        Self::Kgs,
        Self::Seconds,
        Self::Minutes,
        Self::Hours,
        Self::Miles,
        Self::Kms,
        Self::Meters,
    ];

    /// The unit type this unit belongs to
    #[must_use]
    pub const fn unit_type(self) -> UnitType {
        match self {
            Self::Lbs | Self::Kgs => UnitType::Mass,
            Self::Seconds | Self::Minutes | Self::Hours => UnitType::Time,
            Self::Miles | Self::Kms | Self::Meters => UnitType::Distance,
        }
    }

    /// Uppercase wire/storage representation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lbs => "LBS",
            Self::Kgs => "KGS",
            Self::Seconds => "SECONDS",
            Self::Minutes => "MINUTES",
            Self::Hours => "HOURS",
            Self::Miles => "MILES",
            Self::Kms => "KMS",
            Self::Meters => "METERS",
        }
    }
}

impl Display for Unit {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for Unit {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LBS" => Ok(Self::Lbs),
            "KGS" => Ok(Self::Kgs),
            "SECONDS" => Ok(Self::Seconds),
            "MINUTES" => Ok(Self::Minutes),
            "HOURS" => Ok(Self::Hours),
            "MILES" => Ok(Self::Miles),
            "KMS" => Ok(Self::Kms),
            "METERS" => Ok(Self::Meters),
            _ => Err(AppError::serialization(format!("Invalid unit: {s}"))),
        }
    }
}

/// Unit-type + unit pairing describing how a set's `of` value reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Measure {
    /// Measurement category
    #[serde(rename = "type")]
    pub unit_type: UnitType,
    /// Concrete unit, absent for unitless work
    pub unit: Option<Unit>,
}

impl Measure {
    /// Whether the unit actually belongs to the declared unit type.
    ///
    /// Not enforced on writes today; this is the hook a write-time validation
    /// would call.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.unit_type == self.unit.map_or(UnitType::None, Unit::unit_type)
    }
}

impl Default for Measure {
    fn default() -> Self {
        Self {
            unit_type: UnitType::Mass,
            unit: Some(Unit::Lbs),
        }
    }
}

/// Caller-supplied fields for a new exercise
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExerciseDraft {
    /// Exercise name
    #[serde(default)]
    pub name: String,
}

/// Caller-supplied fields for a new set
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SetDraft {
    /// Repetition count
    #[serde(default)]
    pub reps: i32,
    /// Magnitude in the owning exercise's unit
    #[serde(default)]
    pub of: f64,
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn start_of_day_truncates_to_utc_midnight() {
        let ts = Utc.with_ymd_and_hms(2025, 3, 9, 18, 42, 17).single().unwrap();
        let day = start_of_day(ts);
        assert_eq!(day, Utc.with_ymd_and_hms(2025, 3, 9, 0, 0, 0).single().unwrap());
    }

    #[test]
    fn new_workout_has_no_children_and_aligned_day() {
        let workout = Workout::new();
        assert!(workout.exercises.is_empty());
        assert_eq!(workout.start_of_day, start_of_day(workout.timestamp));
    }

    #[test]
    fn unit_to_type_mapping_is_total() {
        assert_eq!(Unit::Lbs.unit_type(), UnitType::Mass);
        assert_eq!(Unit::Kgs.unit_type(), UnitType::Mass);
        assert_eq!(Unit::Seconds.unit_type(), UnitType::Time);
        assert_eq!(Unit::Minutes.unit_type(), UnitType::Time);
        assert_eq!(Unit::Hours.unit_type(), UnitType::Time);
        assert_eq!(Unit::Miles.unit_type(), UnitType::Distance);
        assert_eq!(Unit::Kms.unit_type(), UnitType::Distance);
        assert_eq!(Unit::Meters.unit_type(), UnitType::Distance);
    }

    #[test]
    fn measure_consistency_hook() {
        assert!(Measure::default().is_consistent());
        let mismatched = Measure {
            unit_type: UnitType::Time,
            unit: Some(Unit::Lbs),
        };
        assert!(!mismatched.is_consistent());
        let unitless = Measure {
            unit_type: UnitType::None,
            unit: None,
        };
        assert!(unitless.is_consistent());
    }

    #[test]
    fn unit_round_trips_through_str() {
        for unit in Unit::ALL {
            assert_eq!(unit.as_str().parse::<Unit>().unwrap(), unit);
        }
        for unit_type in UnitType::ALL {
            assert_eq!(unit_type.as_str().parse::<UnitType>().unwrap(), unit_type);
        }
    }

    #[test]
    fn measure_serializes_with_type_key() {
        let json = serde_json::to_value(Measure::default()).unwrap();
        assert_eq!(json["type"], "MASS");
        assert_eq!(json["unit"], "LBS");
    }
}
