use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ParseError;

/// Activity types that select a calorie formula
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Walking,
    Running,
}

impl ActivityKind {
    /// Labels accepted for each kind, lowercase
    const RUNNING_LABELS: &'static [&'static str] = &["running", "бег"];
    const WALKING_LABELS: &'static [&'static str] = &["walking", "ходьба"];

    /// Case-insensitive match of a raw label against the recognised aliases.
    /// The label is not trimmed.
    pub fn from_label(label: &str) -> Option<Self> {
        let lowered = label.to_lowercase();
        if Self::RUNNING_LABELS.contains(&lowered.as_str()) {
            Some(ActivityKind::Running)
        } else if Self::WALKING_LABELS.contains(&lowered.as_str()) {
            Some(ActivityKind::Walking)
        } else {
            None
        }
    }
}

impl FromStr for ActivityKind {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s).ok_or_else(|| ParseError::UnknownActivity {
            label: s.to_string(),
        })
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActivityKind::Walking => write!(f, "Walking"),
            ActivityKind::Running => write!(f, "Running"),
        }
    }
}

/// Validated two-field record: steps over a day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DaySteps {
    steps: i64,
    duration: Duration,
}

impl DaySteps {
    pub fn new(steps: i64, duration: Duration) -> Result<Self, ParseError> {
        check_steps(steps)?;
        check_duration(duration)?;
        Ok(Self { steps, duration })
    }

    pub fn steps(&self) -> i64 {
        self.steps
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }
}

/// Validated three-field record: a single training session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainingRecord {
    steps: i64,
    activity_label: String,
    duration: Duration,
}

impl TrainingRecord {
    pub fn new(
        steps: i64,
        activity_label: impl Into<String>,
        duration: Duration,
    ) -> Result<Self, ParseError> {
        check_steps(steps)?;
        check_duration(duration)?;
        Ok(Self {
            steps,
            activity_label: activity_label.into(),
            duration,
        })
    }

    pub fn steps(&self) -> i64 {
        self.steps
    }

    /// Label exactly as it appeared in the raw record
    pub fn activity_label(&self) -> &str {
        &self.activity_label
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Resolve the label to a known activity
    pub fn activity(&self) -> Result<ActivityKind, ParseError> {
        self.activity_label.parse()
    }
}

fn check_steps(steps: i64) -> Result<(), ParseError> {
    if steps <= 0 {
        return Err(ParseError::InvalidStepCount {
            value: steps.to_string(),
            reason: "step count must be greater than zero".to_string(),
        });
    }
    Ok(())
}

fn check_duration(duration: Duration) -> Result<(), ParseError> {
    if duration.is_zero() {
        return Err(ParseError::InvalidDuration {
            value: format!("{:?}", duration),
            reason: "duration must be greater than zero".to_string(),
        });
    }
    Ok(())
}

/// Body parameters supplied by the caller for each calculation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyParameters {
    /// Weight in kilograms
    pub weight_kg: f64,

    /// Height in centimeters
    pub height_cm: f64,
}

impl BodyParameters {
    pub fn new(weight_kg: f64, height_cm: f64) -> Self {
        Self {
            weight_kg,
            height_cm,
        }
    }
}

/// Metrics for a day of walking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayMetrics {
    pub steps: i64,

    /// Distance covered in kilometers
    pub distance_km: f64,

    /// Calories burned, always scored as walking
    pub calories_kcal: f64,
}

/// Metrics for a single training session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingMetrics {
    pub activity: ActivityKind,

    /// Session length in hours
    pub duration_hours: f64,

    /// Distance covered in kilometers
    pub distance_km: f64,

    /// Average speed in km/h
    pub speed_kmh: f64,

    /// Calories burned with the activity's formula
    pub calories_kcal: f64,
}

impl fmt::Display for DayMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Steps: {}.", self.steps)?;
        writeln!(f, "Distance: {:.2} km.", self.distance_km)?;
        writeln!(f, "Calories burned: {:.2} kcal.", self.calories_kcal)
    }
}

impl fmt::Display for TrainingMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Activity: {}", self.activity)?;
        writeln!(f, "Duration: {:.2} h.", self.duration_hours)?;
        writeln!(f, "Distance: {:.2} km.", self.distance_km)?;
        writeln!(f, "Speed: {:.2} km/h", self.speed_kmh)?;
        write!(f, "Calories burned: {:.2}", self.calories_kcal)
    }
}
