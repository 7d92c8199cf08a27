//! Refresh schedule expressions.
//!
//! Supported forms (all evaluated in UTC):
//! - `sec min hour * * *` and `min hour * * *` with fixed sec/min/hour
//! - `@daily`, `@midnight`, `@hourly`
//! - `@every <n><s|m|h>`

use chrono::{DateTime, NaiveTime, Utc};
use screening_core::{ScreeningError, DEFAULT_REFRESH_CRON};
use std::str::FromStr;
use std::time::Duration;

const MAX_INTERVAL_SECS: u64 = 366 * 24 * 60 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshSchedule {
    /// Once a day at a fixed UTC time
    Daily(NaiveTime),
    /// Fixed interval from the previous due time
    Every(Duration),
}

impl Default for RefreshSchedule {
    fn default() -> Self {
        // 03:30:00, always valid
        RefreshSchedule::Daily(NaiveTime::from_hms_opt(3, 30, 0).unwrap_or(NaiveTime::MIN))
    }
}

impl RefreshSchedule {
    pub fn parse(expr: &str) -> Result<Self, ScreeningError> {
        let expr = expr.trim();
        if expr.is_empty() {
            return Self::parse(DEFAULT_REFRESH_CRON);
        }

        match expr.to_ascii_lowercase().as_str() {
            "@daily" | "@midnight" => return Ok(RefreshSchedule::Daily(NaiveTime::MIN)),
            "@hourly" => return Ok(RefreshSchedule::Every(Duration::from_secs(60 * 60))),
            lower if lower.starts_with("@every") => {
                return parse_interval(lower.trim_start_matches("@every").trim(), expr)
            }
            _ => {}
        }

        let fields: Vec<&str> = expr.split_whitespace().collect();
        let (sec, min, hour, rest) = match fields.as_slice() {
            [sec, min, hour, rest @ ..] if rest.len() == 3 => (*sec, *min, *hour, rest),
            [min, hour, rest @ ..] if rest.len() == 3 => ("0", *min, *hour, rest),
            _ => {
                return Err(invalid(
                    expr,
                    "expected 5 or 6 cron fields, @daily or @every <n><s|m|h>",
                ))
            }
        };

        if let Some(field) = rest.iter().find(|f| **f != "*" && **f != "?") {
            return Err(invalid(
                expr,
                &format!("day/month/weekday fields must be '*', got '{field}'"),
            ));
        }

        let second = parse_field(sec, 59, "second", expr)?;
        let minute = parse_field(min, 59, "minute", expr)?;
        let hour = parse_field(hour, 23, "hour", expr)?;

        NaiveTime::from_hms_opt(hour, minute, second)
            .map(RefreshSchedule::Daily)
            .ok_or_else(|| invalid(expr, "time of day out of range"))
    }

    /// First due time strictly after `now`.
    pub fn next_after(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            RefreshSchedule::Daily(at) => {
                let today = now.date_naive().and_time(*at).and_utc();
                if today > now {
                    today
                } else {
                    today + chrono::Duration::days(1)
                }
            }
            RefreshSchedule::Every(interval) => {
                let step = chrono::Duration::from_std(*interval)
                    .unwrap_or_else(|_| chrono::Duration::days(1));
                now + step
            }
        }
    }

    /// Due time that follows `previous`, skipping slots already behind `now`.
    ///
    /// Intervals are measured from the previous due time, so a slow reload
    /// does not push later ticks back.
    pub fn next_after_due(&self, previous: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            RefreshSchedule::Daily(_) => self.next_after(now.max(previous)),
            RefreshSchedule::Every(_) => {
                let next = self.next_after(previous);
                if next > now {
                    return next;
                }
                let step = (next - previous).num_milliseconds().max(1);
                let behind = (now - next).num_milliseconds();
                next + chrono::Duration::milliseconds((behind / step + 1) * step)
            }
        }
    }
}

impl FromStr for RefreshSchedule {
    type Err = ScreeningError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for RefreshSchedule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RefreshSchedule::Daily(at) => write!(f, "daily at {} UTC", at.format("%H:%M:%S")),
            RefreshSchedule::Every(interval) => write!(f, "every {}s", interval.as_secs()),
        }
    }
}

fn parse_field(value: &str, max: u32, name: &str, expr: &str) -> Result<u32, ScreeningError> {
    match value.parse::<u32>() {
        Ok(v) if v <= max => Ok(v),
        _ => Err(invalid(expr, &format!("{name} must be a number 0-{max}, got '{value}'"))),
    }
}

fn parse_interval(interval: &str, expr: &str) -> Result<RefreshSchedule, ScreeningError> {
    let split = interval.find(|c: char| !c.is_ascii_digit()).unwrap_or(interval.len());
    let (digits, unit) = interval.split_at(split);

    let n: u64 = digits
        .parse()
        .map_err(|_| invalid(expr, "interval needs a positive number"))?;
    let multiplier = match unit.trim() {
        "s" => 1,
        "m" => 60,
        "h" => 60 * 60,
        other => return Err(invalid(expr, &format!("unknown interval unit '{other}'"))),
    };

    let secs = n.saturating_mul(multiplier);
    if secs == 0 || secs > MAX_INTERVAL_SECS {
        return Err(invalid(expr, "interval must be between 1s and 366 days"));
    }
    Ok(RefreshSchedule::Every(Duration::from_secs(secs)))
}

fn invalid(expr: &str, reason: &str) -> ScreeningError {
    ScreeningError::Configuration(format!("invalid refresh schedule '{expr}': {reason}"))
}
