//! Donor listing, self service, and administration.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use mockable::Clock;

use crate::domain::access::{map_donor_repo_error, require_admin};
use crate::domain::ports::{
    AvailabilityFilter, DonorDirectory, DonorRepository, DonorSearch, DonorSnapshot,
};
use crate::domain::{
    AvailabilitySynchronizer, BloodGroup, DonorId, DonorRecord, DonorUpdate, Error,
};

/// Whether a record matches the administrative search criteria.
///
/// The availability facet filters on the stored flag rather than the
/// computed rule: the flag exists precisely so listings can filter without
/// evaluating every record, and divergence heals on the donor's next load.
fn matches(record: &DonorRecord, criteria: &DonorSearch) -> bool {
    if let Some(term) = criteria.term.as_deref() {
        let needle = term.to_lowercase();
        let hit = record.name.to_lowercase().contains(&needle)
            || record.area.to_lowercase().contains(&needle)
            || record.phone.contains(term);
        if !hit {
            return false;
        }
    }
    if criteria
        .blood_group
        .is_some_and(|group| record.blood_group != group)
    {
        return false;
    }
    match criteria.status {
        AvailabilityFilter::All => true,
        AvailabilityFilter::Available => record.is_available,
        AvailabilityFilter::Unavailable => !record.is_available,
    }
}

/// Donor directory service implementing the driving port.
#[derive(Clone)]
pub struct DonorDirectoryService<D> {
    donors: Arc<D>,
    synchronizer: AvailabilitySynchronizer<D>,
}

impl<D> DonorDirectoryService<D> {
    /// Create the service over the donor repository and a clock.
    pub fn new(donors: Arc<D>, clock: Arc<dyn Clock>) -> Self {
        let synchronizer = AvailabilitySynchronizer::new(Arc::clone(&donors), clock);
        Self {
            donors,
            synchronizer,
        }
    }
}

#[async_trait]
impl<D> DonorDirectory for DonorDirectoryService<D>
where
    D: DonorRepository,
{
    async fn list_public(
        &self,
        blood_group: Option<BloodGroup>,
    ) -> Result<Vec<DonorSnapshot>, Error> {
        let records = self.donors.list().await.map_err(map_donor_repo_error)?;
        Ok(records
            .into_iter()
            .filter(DonorRecord::is_donor)
            .filter(|record| blood_group.is_none_or(|group| record.blood_group == group))
            .map(|record| {
                // Display path: recompute instead of trusting the flag.
                let availability = self.synchronizer.evaluate(&record);
                DonorSnapshot {
                    record,
                    availability,
                }
            })
            .collect())
    }

    async fn search(
        &self,
        actor: &DonorId,
        criteria: DonorSearch,
    ) -> Result<Vec<DonorRecord>, Error> {
        require_admin(self.donors.as_ref(), actor).await?;
        let records = self.donors.list().await.map_err(map_donor_repo_error)?;
        Ok(records
            .into_iter()
            .filter(|record| matches(record, &criteria))
            .collect())
    }

    async fn profile(&self, uid: &DonorId) -> Result<DonorSnapshot, Error> {
        let mut record = self
            .donors
            .find(uid)
            .await
            .map_err(map_donor_repo_error)?
            .ok_or_else(|| Error::not_found(format!("donor {uid} not found")))?;

        // Every load reconciles the stored flag with the rule.
        let availability = self.synchronizer.synchronize(&record).await;
        record.is_available = availability.is_available;
        Ok(DonorSnapshot {
            record,
            availability,
        })
    }

    async fn record_donation(
        &self,
        uid: &DonorId,
        date: NaiveDate,
    ) -> Result<DonorSnapshot, Error> {
        let record = self
            .donors
            .find(uid)
            .await
            .map_err(map_donor_repo_error)?
            .ok_or_else(|| Error::not_found(format!("donor {uid} not found")))?;

        // Two writes, no transaction: the date lands first, then the flag
        // computed for the new date. A crash in between leaves the flag
        // stale until the next load reconciles it.
        self.donors
            .set_last_donation_date(uid, date)
            .await
            .map_err(map_donor_repo_error)?;

        if record.is_donor() {
            let availability =
                crate::domain::calculate_availability(Some(date), self.synchronizer.today());
            self.donors
                .set_availability(uid, availability.is_available)
                .await
                .map_err(map_donor_repo_error)?;
        }

        // Read the record back instead of resetting the whole client view.
        let mut refreshed = self
            .donors
            .find(uid)
            .await
            .map_err(map_donor_repo_error)?
            .ok_or_else(|| Error::not_found(format!("donor {uid} not found")))?;
        let availability = self.synchronizer.synchronize(&refreshed).await;
        refreshed.is_available = availability.is_available;
        Ok(DonorSnapshot {
            record: refreshed,
            availability,
        })
    }

    async fn amend(
        &self,
        actor: &DonorId,
        uid: &DonorId,
        update: DonorUpdate,
    ) -> Result<(), Error> {
        require_admin(self.donors.as_ref(), actor).await?;
        if update.is_empty() {
            return Err(Error::invalid_request("no fields to update"));
        }
        // A date or flag edit here may leave the pair inconsistent; the
        // donor's next load runs the reconciliation.
        self.donors
            .update_fields(uid, &update)
            .await
            .map_err(map_donor_repo_error)
    }

    async fn remove(&self, actor: &DonorId, uid: &DonorId) -> Result<(), Error> {
        require_admin(self.donors.as_ref(), actor).await?;
        self.donors.delete(uid).await.map_err(map_donor_repo_error)
    }
}

#[cfg(test)]
#[path = "donor_directory_service_tests.rs"]
mod tests;
