//! Reconciliation of the stored availability flag.
//!
//! `is_available` is a projection of the cooldown rule kept inside the
//! donor record so the store can filter on it. The store offers no
//! transactions, so the flag can lag behind the rule after a date edit or
//! an administrative overwrite. This service restores the invariant on
//! every record load: compute, compare, and write only on divergence.
//!
//! The compare-before-write step is load bearing. The store echoes a
//! subscriber's own writes, so an unconditional write would re-trigger any
//! listener on the record and loop forever.

use std::sync::Arc;

use chrono::NaiveDate;
use mockable::Clock;
use tracing::{debug, error};

use crate::domain::ports::DonorRepository;
use crate::domain::{Availability, DonorRecord, calculate_availability};

/// Keeps the stored `is_available` flag consistent with the cooldown rule.
#[derive(Clone)]
pub struct AvailabilitySynchronizer<R> {
    donors: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> AvailabilitySynchronizer<R> {
    /// Create a synchronizer over the given repository and clock.
    pub fn new(donors: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { donors, clock }
    }

    /// Today's date according to the injected clock.
    pub fn today(&self) -> NaiveDate {
        self.clock.utc().date_naive()
    }

    /// Evaluate the cooldown rule for a record without touching the store.
    ///
    /// Administrators are outside the cooldown rule and always read as
    /// eligible.
    pub fn evaluate(&self, record: &DonorRecord) -> Availability {
        if !record.is_donor() {
            return Availability::ELIGIBLE;
        }
        calculate_availability(record.last_donation_date, self.today())
    }
}

impl<R> AvailabilitySynchronizer<R>
where
    R: DonorRepository,
{
    /// Reconcile the stored flag against the computed availability.
    ///
    /// Issues at most one partial write, and none when the record already
    /// agrees with the rule, which makes back-to-back calls idempotent. A
    /// failed write is logged and swallowed: the next natural reload runs
    /// the reconciliation again, so there is no retry here.
    pub async fn synchronize(&self, record: &DonorRecord) -> Availability {
        let availability = self.evaluate(record);
        if !record.is_donor() || record.is_available == availability.is_available {
            return availability;
        }

        match self
            .donors
            .set_availability(&record.uid, availability.is_available)
            .await
        {
            Ok(()) => {
                debug!(
                    uid = %record.uid,
                    is_available = availability.is_available,
                    "availability flag reconciled"
                );
            }
            Err(write_error) => {
                error!(
                    uid = %record.uid,
                    error = %write_error,
                    "availability reconciliation write failed"
                );
            }
        }
        availability
    }
}
