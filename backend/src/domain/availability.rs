//! Donation cooldown rule.
//!
//! A donor must rest for a fixed window between donations. Eligibility is
//! derived from the last donation date and the current date; the stored
//! `is_available` flag is only a cached projection of this function.

use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

/// Minimum number of days between two donations.
pub const DONATION_COOLDOWN_DAYS: i64 = 90;

/// Result of evaluating the cooldown rule at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Availability {
    /// Whether the donor may currently be asked to donate.
    pub is_available: bool,
    /// Whole days left until the cooldown elapses; zero when available.
    pub days_remaining: u32,
}

impl Availability {
    /// An eligible donor with no wait left.
    pub const ELIGIBLE: Self = Self {
        is_available: true,
        days_remaining: 0,
    };
}

/// Evaluate the cooldown rule.
///
/// A donor who has never donated is immediately eligible. Otherwise the
/// donor becomes eligible once at least [`DONATION_COOLDOWN_DAYS`] whole
/// days have elapsed, the boundary day included.
///
/// A date after `today` can only come from bad data entry; it is clamped
/// to zero elapsed days, so the donor waits the full window rather than
/// being deemed eligible by a date in the future.
///
/// # Examples
/// ```
/// use backend::domain::{calculate_availability, Availability};
/// use chrono::NaiveDate;
///
/// let today = NaiveDate::from_ymd_opt(2024, 4, 10).unwrap();
/// let last = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
/// let availability = calculate_availability(Some(last), today);
/// assert_eq!(availability.is_available, false);
/// assert_eq!(availability.days_remaining, 4);
///
/// assert_eq!(calculate_availability(None, today), Availability::ELIGIBLE);
/// ```
pub fn calculate_availability(last_donation_date: Option<NaiveDate>, today: NaiveDate) -> Availability {
    let Some(last) = last_donation_date else {
        return Availability::ELIGIBLE;
    };

    let elapsed_days = (today - last).num_days().max(0);
    if elapsed_days >= DONATION_COOLDOWN_DAYS {
        Availability::ELIGIBLE
    } else {
        let remaining = DONATION_COOLDOWN_DAYS - elapsed_days;
        Availability {
            is_available: false,
            // remaining is within 1..=90 here, so the cast cannot truncate.
            days_remaining: u32::try_from(remaining).unwrap_or(u32::MAX),
        }
    }
}
