//! Raw record parsing and validation
//!
//! Records are comma-separated strings, either `steps,duration` for a day of
//! walking or `steps,activity,duration` for a training session. Every check
//! happens here; the calculator only ever sees validated records.

use std::time::Duration;

use crate::error::ParseError;
use crate::models::{DaySteps, TrainingRecord};

const DAY_FIELDS: usize = 2;
const TRAINING_FIELDS: usize = 3;

/// Parser for raw activity records
pub struct RecordParser;

impl RecordParser {
    /// Parse a `steps,duration` record.
    ///
    /// Fields are trimmed. The step count must be a positive integer and the
    /// duration a positive duration spec.
    pub fn parse_day_steps(raw: &str) -> Result<DaySteps, ParseError> {
        let fields = split_fields(raw, DAY_FIELDS)?;

        let steps = parse_steps(fields[0].trim())?;
        let duration = parse_duration(fields[1].trim())?;

        DaySteps::new(steps, duration)
    }

    /// Parse a `steps,activity,duration` record.
    ///
    /// The activity label is kept verbatim, untrimmed; matching it against
    /// known activities is the caller's job.
    pub fn parse_training(raw: &str) -> Result<TrainingRecord, ParseError> {
        let fields = split_fields(raw, TRAINING_FIELDS)?;

        let steps = parse_steps(fields[0].trim())?;
        let duration = parse_duration(fields[2].trim())?;

        TrainingRecord::new(steps, fields[1], duration)
    }
}

fn split_fields(raw: &str, expected: usize) -> Result<Vec<&str>, ParseError> {
    let fields: Vec<&str> = raw.split(',').collect();
    if fields.len() != expected {
        return Err(ParseError::MalformedInput {
            expected,
            actual: fields.len(),
        });
    }
    Ok(fields)
}

fn parse_steps(field: &str) -> Result<i64, ParseError> {
    let steps: i64 = field.parse().map_err(|e: std::num::ParseIntError| {
        ParseError::InvalidStepCount {
            value: field.to_string(),
            reason: e.to_string(),
        }
    })?;

    if steps <= 0 {
        return Err(ParseError::InvalidStepCount {
            value: field.to_string(),
            reason: "step count must be greater than zero".to_string(),
        });
    }

    Ok(steps)
}

/// Parse a duration spec such as `30m`, `1.5h` or `1h15m30s`.
///
/// The grammar is an optional sign followed by one or more `<number><unit>`
/// groups, where the number may be fractional and the unit is one of `h`,
/// `m`, `s`, `ms`, `us` (or `µs`) and `ns`. A lone `0` is accepted without a
/// unit. Negative durations are rejected; zero is returned as is and left to
/// the record constructors to refuse.
pub fn parse_duration(spec: &str) -> Result<Duration, ParseError> {
    let invalid = |reason: &str| ParseError::InvalidDuration {
        value: spec.to_string(),
        reason: reason.to_string(),
    };

    let (negative, mut rest) = match spec.as_bytes().first() {
        Some(b'-') => (true, &spec[1..]),
        Some(b'+') => (false, &spec[1..]),
        _ => (false, spec),
    };

    if rest == "0" {
        return Ok(Duration::ZERO);
    }
    if rest.is_empty() {
        return Err(invalid("empty duration"));
    }

    let mut total_nanos: u128 = 0;
    while !rest.is_empty() {
        let number_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        let (number, tail) = rest.split_at(number_len);
        let (whole, fraction) = number.split_once('.').unwrap_or((number, ""));
        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid("expected a number"));
        }
        if fraction.contains('.') {
            return Err(invalid("malformed number"));
        }

        let unit_len = tail
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(tail.len());
        let (unit, tail) = tail.split_at(unit_len);
        let scale = match unit {
            "h" => NANOS_PER_HOUR,
            "m" => NANOS_PER_MINUTE,
            "s" => NANOS_PER_SECOND,
            "ms" => 1_000_000,
            "us" | "µs" | "μs" => 1_000,
            "ns" => 1,
            "" => return Err(invalid("missing unit")),
            _ => return Err(invalid("unknown unit")),
        };

        let group_nanos = group_nanos(whole, fraction, scale)
            .ok_or_else(|| invalid("duration out of range"))?;
        total_nanos = total_nanos
            .checked_add(group_nanos)
            .ok_or_else(|| invalid("duration out of range"))?;
        rest = tail;
    }

    if negative && total_nanos > 0 {
        return Err(invalid("duration must be greater than zero"));
    }

    let seconds = u64::try_from(total_nanos / NANOS_PER_SECOND)
        .map_err(|_| invalid("duration out of range"))?;
    let nanos = (total_nanos % NANOS_PER_SECOND) as u32;
    Ok(Duration::new(seconds, nanos))
}

const NANOS_PER_SECOND: u128 = 1_000_000_000;
const NANOS_PER_MINUTE: u128 = 60 * NANOS_PER_SECOND;
const NANOS_PER_HOUR: u128 = 60 * NANOS_PER_MINUTE;

/// Fraction digits past this many cannot add a whole nanosecond for any unit
const MAX_FRACTION_DIGITS: usize = 20;

/// Exact nanoseconds for one `<whole>.<fraction><unit>` group, `None` on overflow.
/// Sub-nanosecond remainders are truncated.
fn group_nanos(whole: &str, fraction: &str, scale: u128) -> Option<u128> {
    let whole: u128 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
    let mut nanos = whole.checked_mul(scale)?;

    let digits = &fraction[..fraction.len().min(MAX_FRACTION_DIGITS)];
    if !digits.is_empty() {
        let numerator: u128 = digits.parse().ok()?;
        let denominator = 10u128.pow(digits.len() as u32);
        nanos = nanos.checked_add(numerator * scale / denominator)?;
    }

    Some(nanos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_day_steps() {
        let record = RecordParser::parse_day_steps("678,0h50m").unwrap();
        assert_eq!(record.steps(), 678);
        assert_eq!(record.duration(), Duration::from_secs(50 * 60));
    }

    #[test]
    fn test_parse_day_steps_trims_fields() {
        let record = RecordParser::parse_day_steps(" 1200 ,  1h ").unwrap();
        assert_eq!(record.steps(), 1200);
        assert_eq!(record.duration(), Duration::from_secs(3600));
    }

    #[test]
    fn test_parse_day_steps_field_count() {
        for raw in ["", "100", "100,1h,extra", "100,walking,1h"] {
            let err = RecordParser::parse_day_steps(raw).unwrap_err();
            assert!(
                matches!(err, ParseError::MalformedInput { expected: 2, .. }),
                "{raw:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn test_parse_day_steps_invalid_steps() {
        for raw in ["abc,10m", "0,10m", "-100,10m", "12.5,10m", ",10m"] {
            let err = RecordParser::parse_day_steps(raw).unwrap_err();
            assert!(
                matches!(err, ParseError::InvalidStepCount { .. }),
                "{raw:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn test_parse_day_steps_invalid_duration() {
        for raw in ["100,", "100,ten", "100,10", "100,10x", "100,-10m", "100,0s", "100,0"] {
            let err = RecordParser::parse_day_steps(raw).unwrap_err();
            assert!(
                matches!(err, ParseError::InvalidDuration { .. }),
                "{raw:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn test_steps_checked_before_duration() {
        let err = RecordParser::parse_day_steps("0,garbage").unwrap_err();
        assert!(matches!(err, ParseError::InvalidStepCount { .. }));
    }

    #[test]
    fn test_parse_training() {
        let record = RecordParser::parse_training("3456,Ходьба,3h00m").unwrap();
        assert_eq!(record.steps(), 3456);
        assert_eq!(record.activity_label(), "Ходьба");
        assert_eq!(record.duration(), Duration::from_secs(3 * 3600));
    }

    #[test]
    fn test_parse_training_keeps_label_verbatim() {
        let record = RecordParser::parse_training(" 1000 , Running ,10m").unwrap();
        assert_eq!(record.activity_label(), " Running ");
        assert_eq!(record.steps(), 1000);
    }

    #[test]
    fn test_parse_training_errors() {
        assert!(matches!(
            RecordParser::parse_training("1000,10m"),
            Err(ParseError::MalformedInput { expected: 3, actual: 2 })
        ));
        assert!(matches!(
            RecordParser::parse_training("x,running,10m"),
            Err(ParseError::InvalidStepCount { .. })
        ));
        assert!(matches!(
            RecordParser::parse_training("1000,running,-1h"),
            Err(ParseError::InvalidDuration { .. })
        ));
    }

    #[test]
    fn test_parse_duration_units() {
        assert_eq!(parse_duration("1h").unwrap(), Duration::from_secs(3600));
        assert_eq!(parse_duration("45m").unwrap(), Duration::from_secs(2700));
        assert_eq!(parse_duration("90s").unwrap(), Duration::from_secs(90));
        assert_eq!(parse_duration("250ms").unwrap(), Duration::from_millis(250));
        assert_eq!(parse_duration("1h15m30s").unwrap(), Duration::from_secs(4530));
        assert_eq!(parse_duration("+2m").unwrap(), Duration::from_secs(120));
    }

    #[test]
    fn test_parse_duration_fractional() {
        assert_eq!(parse_duration("1.5h").unwrap(), Duration::from_secs(5400));
        assert_eq!(parse_duration(".5m").unwrap(), Duration::from_secs(30));
        assert_eq!(parse_duration("0.25h").unwrap(), Duration::from_secs(900));
    }

    #[test]
    fn test_parse_duration_zero() {
        assert_eq!(parse_duration("0").unwrap(), Duration::ZERO);
        assert_eq!(parse_duration("0h0m").unwrap(), Duration::ZERO);
        assert_eq!(parse_duration("-0s").unwrap(), Duration::ZERO);
    }

    #[test]
    fn test_parse_duration_rejects() {
        for spec in ["", "-", "h", "10", "1.2.3h", "5d", "1h 30m", "m10", "."] {
            assert!(parse_duration(spec).is_err(), "{spec:?} should not parse");
        }
    }

    #[test]
    fn test_parse_duration_keeps_nanoseconds_on_long_spans() {
        let record = RecordParser::parse_day_steps("5,1000000h0m0.000000001s").unwrap();
        assert_eq!(record.duration(), Duration::new(3_600_000_000, 1));

        assert_eq!(parse_duration("1.000000001s").unwrap(), Duration::new(1, 1));
        assert_eq!(parse_duration("1.5us").unwrap(), Duration::from_nanos(1_500));
        assert_eq!(parse_duration("0.0000000001s").unwrap(), Duration::ZERO);
    }

    #[test]
    fn test_parse_duration_overflow() {
        let err = parse_duration("99999999999999999999999999999999999999999h").unwrap_err();
        assert!(matches!(err, ParseError::InvalidDuration { .. }));

        let err = parse_duration("6000000000000000h").unwrap_err();
        assert!(matches!(err, ParseError::InvalidDuration { .. }));
    }

    proptest! {
        #[test]
        fn test_exact_duration_roundtrip(seconds in 1u64..u64::MAX, nanos in 0u32..1_000_000_000) {
            let spec = format!(
                "{}h{}m{}.{:09}s",
                seconds / 3600,
                (seconds % 3600) / 60,
                seconds % 60,
                nanos
            );
            let record = RecordParser::parse_day_steps(&format!("5,{spec}")).unwrap();
            prop_assert_eq!(record.duration(), Duration::new(seconds, nanos));
        }

        #[test]
        fn test_day_steps_roundtrip(steps in 1i64..1_000_000, seconds in 1u64..86_400) {
            let record = RecordParser::parse_day_steps(&format!("{steps},{seconds}s")).unwrap();
            prop_assert_eq!(record.steps(), steps);
            prop_assert_eq!(record.duration(), Duration::from_secs(seconds));
        }

        #[test]
        fn test_hours_minutes_roundtrip(hours in 0u64..24, minutes in 1u64..60) {
            let record = RecordParser::parse_training(&format!("500,walking,{hours}h{minutes}m")).unwrap();
            prop_assert_eq!(record.duration(), Duration::from_secs(hours * 3600 + minutes * 60));
        }

        #[test]
        fn test_non_positive_steps_rejected(steps in -1_000_000i64..=0) {
            let err = RecordParser::parse_day_steps(&format!("{steps},10m")).unwrap_err();
            let is_invalid_steps = matches!(err, ParseError::InvalidStepCount { .. });
            prop_assert!(is_invalid_steps);
        }
    }
}
