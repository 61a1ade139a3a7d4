use crate::models::{Timestamp, Urgency};

const DAY_SECS: i64 = 24 * 60 * 60;
const DUE_SOON_DAYS: i64 = 3;

/// Overdue tasks fall under `Urgent` as well.
pub fn classify(due: Option<Timestamp>, now: Timestamp) -> Option<Urgency> {
    let remaining = due?.saturating_sub(now);
    if remaining < DAY_SECS {
        Some(Urgency::Urgent)
    } else if remaining < DUE_SOON_DAYS * DAY_SECS {
        Some(Urgency::DueSoon)
    } else {
        None
    }
}
