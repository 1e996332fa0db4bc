//! Distance, speed and calorie formulas
//!
//! Step length is derived from height (`height * 0.45`), speed is distance
//! over elapsed hours, and calories scale with weight, speed and minutes.
//! Walking burns a fixed share of the running figure.

use std::time::Duration;
use tracing::debug;

use crate::config::{DayStride, TrackerConstants};
use crate::error::{CalculationError, Result, TrackerError};
use crate::models::{
    ActivityKind, BodyParameters, DayMetrics, DaySteps, TrainingMetrics, TrainingRecord,
};
use crate::parser::RecordParser;

/// Core metric calculation engine
#[derive(Debug, Clone, Default)]
pub struct ActivityCalculator {
    constants: TrackerConstants,
    day_stride: DayStride,
}

impl ActivityCalculator {
    pub fn new(constants: TrackerConstants) -> Self {
        Self {
            constants,
            day_stride: DayStride::default(),
        }
    }

    /// Choose how daily summaries convert steps into distance
    pub fn with_day_stride(mut self, day_stride: DayStride) -> Self {
        self.day_stride = day_stride;
        self
    }

    pub fn constants(&self) -> &TrackerConstants {
        &self.constants
    }

    /// Distance in kilometers for a step length derived from height
    pub fn distance(&self, steps: i64, height_cm: f64) -> f64 {
        let step_length = height_cm * self.constants.step_length_coefficient;
        step_length * steps as f64 / self.constants.meters_per_km
    }

    /// Distance in kilometers for the fixed step length
    pub fn fixed_stride_distance(&self, steps: i64) -> f64 {
        steps as f64 * self.constants.step_length_m / self.constants.meters_per_km
    }

    /// Average speed in km/h. Zero for a zero duration.
    pub fn mean_speed(&self, steps: i64, height_cm: f64, duration: Duration) -> f64 {
        if duration.is_zero() {
            return 0.0;
        }
        self.distance(steps, height_cm) / self.hours(duration)
    }

    /// Calories burned running
    pub fn running_calories(
        &self,
        steps: i64,
        weight_kg: f64,
        height_cm: f64,
        duration: Duration,
    ) -> std::result::Result<f64, CalculationError> {
        check_formula_inputs(steps, weight_kg, height_cm, duration)?;

        let speed = self.mean_speed(steps, height_cm, duration);
        Ok(weight_kg * speed * minutes(duration) / self.constants.minutes_per_hour)
    }

    /// Calories burned walking
    pub fn walking_calories(
        &self,
        steps: i64,
        weight_kg: f64,
        height_cm: f64,
        duration: Duration,
    ) -> std::result::Result<f64, CalculationError> {
        check_formula_inputs(steps, weight_kg, height_cm, duration)?;

        let speed = self.mean_speed(steps, height_cm, duration);
        let calories = weight_kg * minutes(duration) * speed / self.constants.minutes_per_hour;
        Ok(calories * self.constants.walking_calories_coefficient)
    }

    /// Calories burned with the formula bound to `kind`
    pub fn calories(
        &self,
        kind: ActivityKind,
        steps: i64,
        weight_kg: f64,
        height_cm: f64,
        duration: Duration,
    ) -> std::result::Result<f64, CalculationError> {
        match kind {
            ActivityKind::Running => self.running_calories(steps, weight_kg, height_cm, duration),
            ActivityKind::Walking => self.walking_calories(steps, weight_kg, height_cm, duration),
        }
    }

    /// Metrics for a validated day of steps, scored as walking
    #[tracing::instrument(skip(self), level = "debug")]
    pub fn day_metrics(&self, record: &DaySteps, body: &BodyParameters) -> Result<DayMetrics> {
        let distance_km = match self.day_stride {
            DayStride::Height => self.distance(record.steps(), body.height_cm),
            DayStride::Fixed => self.fixed_stride_distance(record.steps()),
        };

        let calories_kcal = self.walking_calories(
            record.steps(),
            body.weight_kg,
            body.height_cm,
            record.duration(),
        )?;

        debug!(steps = record.steps(), distance_km, calories_kcal, "Day metrics computed");

        Ok(DayMetrics {
            steps: record.steps(),
            distance_km,
            calories_kcal,
        })
    }

    /// Metrics for a validated training session.
    ///
    /// Fails with `UnknownActivity` when the label is neither running nor walking.
    #[tracing::instrument(skip(self), level = "debug")]
    pub fn training_metrics(
        &self,
        record: &TrainingRecord,
        body: &BodyParameters,
    ) -> Result<TrainingMetrics> {
        let activity = record.activity()?;
        let steps = record.steps();
        let duration = record.duration();

        let calories_kcal =
            self.calories(activity, steps, body.weight_kg, body.height_cm, duration)?;
        let metrics = TrainingMetrics {
            activity,
            duration_hours: self.hours(duration),
            distance_km: self.distance(steps, body.height_cm),
            speed_kmh: self.mean_speed(steps, body.height_cm, duration),
            calories_kcal,
        };

        debug!(
            activity = %metrics.activity,
            distance_km = metrics.distance_km,
            speed_kmh = metrics.speed_kmh,
            calories_kcal = metrics.calories_kcal,
            "Training metrics computed"
        );

        Ok(metrics)
    }

    /// Parse a `steps,duration` record and render a daily summary.
    ///
    /// Never fails: any error is logged at its severity and an empty string is
    /// returned. This covers formula errors too, so a non-positive weight or
    /// height yields `""` rather than a summary with zero calories.
    #[tracing::instrument(skip(self), level = "debug")]
    pub fn day_action_summary(&self, raw: &str, weight_kg: f64, height_cm: f64) -> String {
        let body = BodyParameters::new(weight_kg, height_cm);

        let result = RecordParser::parse_day_steps(raw)
            .map_err(TrackerError::from)
            .and_then(|record| self.day_metrics(&record, &body));

        match result {
            Ok(metrics) => metrics.to_string(),
            Err(e) => {
                e.report(raw);
                String::new()
            }
        }
    }

    /// Parse a `steps,activity,duration` record and render a training summary
    #[tracing::instrument(skip(self), level = "debug")]
    pub fn training_summary(&self, raw: &str, weight_kg: f64, height_cm: f64) -> Result<String> {
        let record = RecordParser::parse_training(raw)?;
        let body = BodyParameters::new(weight_kg, height_cm);

        let metrics = self.training_metrics(&record, &body)?;
        Ok(metrics.to_string())
    }

    fn hours(&self, duration: Duration) -> f64 {
        minutes(duration) / self.constants.minutes_per_hour
    }
}

fn minutes(duration: Duration) -> f64 {
    duration.as_secs_f64() / 60.0
}

fn check_formula_inputs(
    steps: i64,
    weight_kg: f64,
    height_cm: f64,
    duration: Duration,
) -> std::result::Result<(), CalculationError> {
    if steps < 0 {
        return Err(CalculationError::NegativeSteps { steps });
    }
    if weight_kg.is_nan() || weight_kg <= 0.0 {
        return Err(CalculationError::InvalidWeight { weight: weight_kg });
    }
    if height_cm.is_nan() || height_cm <= 0.0 {
        return Err(CalculationError::InvalidHeight { height: height_cm });
    }
    if duration.is_zero() {
        return Err(CalculationError::InvalidDuration {
            seconds: duration.as_secs_f64(),
        });
    }
    Ok(())
}
