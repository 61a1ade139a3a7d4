use chrono::{DateTime, Days, Duration, NaiveDate, NaiveDateTime, TimeZone};

use crate::models::{DueWindow, Timestamp};

const WEEK_DAYS: u64 = 7;

/// Accepted shapes for a due value typed or picked by the user, tried in order.
const DUE_INPUT_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidDueInput(pub String);

impl std::fmt::Display for InvalidDueInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid due date `{}` (expected YYYY-MM-DDTHH:MM or YYYY-MM-DD)",
            self.0
        )
    }
}

impl std::error::Error for InvalidDueInput {}

/// Day windows compare calendar dates in `now`'s time zone; the week window is
/// the inclusive range `[now, now + 7 days]`.
pub fn matches_window<Tz: TimeZone>(
    window: DueWindow,
    due: Option<Timestamp>,
    now: &DateTime<Tz>,
) -> bool {
    if window == DueWindow::All {
        return true;
    }
    let Some(due) = due else {
        return false;
    };
    let Some(due_local) = now.timezone().timestamp_opt(due, 0).single() else {
        return false;
    };

    match window {
        DueWindow::All => true,
        DueWindow::Today => due_local.date_naive() == now.date_naive(),
        DueWindow::Tomorrow => now.date_naive().succ_opt() == Some(due_local.date_naive()),
        DueWindow::Week => {
            let start = now.timestamp();
            let end = now
                .clone()
                .checked_add_days(Days::new(WEEK_DAYS))
                .map(|end| end.timestamp())
                .unwrap_or_else(|| start.saturating_add(WEEK_DAYS as i64 * 24 * 60 * 60));
            due >= start && due <= end
        }
    }
}

/// Empty input means "no deadline". Values without an explicit offset are
/// read as wall-clock time in `now`'s time zone, using the rules in force on
/// that date. A time skipped by a DST jump moves forward by the jump.
pub fn parse_due_input<Tz: TimeZone>(
    raw: &str,
    now: &DateTime<Tz>,
) -> Result<Option<Timestamp>, InvalidDueInput> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(Some(parsed.timestamp()));
    }

    let naive = DUE_INPUT_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .ok_or_else(|| InvalidDueInput(raw.to_string()))?;

    let tz = now.timezone();
    tz.from_local_datetime(&naive)
        .earliest()
        .or_else(|| {
            tz.from_local_datetime(&(naive + Duration::hours(1)))
                .earliest()
        })
        .map(|local| Some(local.timestamp()))
        .ok_or_else(|| InvalidDueInput(raw.to_string()))
}
