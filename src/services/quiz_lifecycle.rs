//! Time arithmetic for the quiz publication window. Everything here is pure;
//! persistence lives in `QuizService`.

use std::fmt;

use chrono::{DateTime, Duration, Utc};

use crate::models::domain::PublicationWindow;

const EXPIRING_SOON_HOURS: i64 = 24;

/// The window to write for a publish/unpublish request made at `now`.
pub fn publication_for(is_published: bool, now: DateTime<Utc>) -> Option<PublicationWindow> {
    is_published.then(|| PublicationWindow::starting_at(now))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimeRemaining {
    Expired,
    Remaining(Duration),
}

impl TimeRemaining {
    pub fn is_expired(&self) -> bool {
        matches!(self, TimeRemaining::Expired)
    }
}

impl fmt::Display for TimeRemaining {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let remaining = match self {
            TimeRemaining::Expired => return f.write_str("Expired"),
            TimeRemaining::Remaining(remaining) => *remaining,
        };

        let days = remaining.num_days();
        let hours = remaining.num_hours() % 24;
        let minutes = remaining.num_minutes() % 60;

        if days > 0 {
            write!(f, "{}d {}h", days, hours)
        } else if hours > 0 {
            write!(f, "{}h {}m", hours, minutes)
        } else {
            write!(f, "{}m", minutes)
        }
    }
}

pub fn time_remaining(unpublish_date: DateTime<Utc>, now: DateTime<Utc>) -> TimeRemaining {
    if unpublish_date <= now {
        TimeRemaining::Expired
    } else {
        TimeRemaining::Remaining(unpublish_date - now)
    }
}

/// True iff the quiz unpublishes within the next 24 hours.
pub fn is_expiring_soon(unpublish_date: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    let diff = unpublish_date - now;
    diff > Duration::zero() && diff <= Duration::hours(EXPIRING_SOON_HOURS)
}
