//! Driving ports for donor listing, profiles, and administration.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{
    Availability, BloodGroup, DonorId, DonorRecord, DonorUpdate, Error,
};

/// Availability facet of the admin donor search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AvailabilityFilter {
    #[default]
    All,
    Available,
    Unavailable,
}

impl std::str::FromStr for AvailabilityFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" | "" => Ok(Self::All),
            "available" => Ok(Self::Available),
            "unavailable" => Ok(Self::Unavailable),
            other => Err(format!("unknown availability filter: {other}")),
        }
    }
}

/// Criteria for the administrative donor search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DonorSearch {
    /// Case-insensitive substring matched against name and area, and a
    /// plain substring matched against the phone number.
    pub term: Option<String>,
    pub blood_group: Option<BloodGroup>,
    pub status: AvailabilityFilter,
}

/// A donor record paired with its freshly computed availability.
///
/// Callers should display the computed availability rather than the stored
/// flag, which may lag behind the cooldown rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DonorSnapshot {
    pub record: DonorRecord,
    pub availability: Availability,
}

/// Driving port for donor listing, self service, and administration.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DonorDirectory: Send + Sync {
    /// Publicly visible donors (never administrators), optionally narrowed
    /// to one blood group.
    async fn list_public(
        &self,
        blood_group: Option<BloodGroup>,
    ) -> Result<Vec<DonorSnapshot>, Error>;

    /// Administrative search across every record.
    async fn search(
        &self,
        actor: &DonorId,
        criteria: DonorSearch,
    ) -> Result<Vec<DonorRecord>, Error>;

    /// One donor's record with availability recomputed on the fly.
    async fn profile(&self, uid: &DonorId) -> Result<DonorSnapshot, Error>;

    /// Self-service update of the last donation date, returning the
    /// re-read record.
    async fn record_donation(&self, uid: &DonorId, date: NaiveDate)
    -> Result<DonorSnapshot, Error>;

    /// Administrative partial edit of any record.
    async fn amend(&self, actor: &DonorId, uid: &DonorId, update: DonorUpdate)
    -> Result<(), Error>;

    /// Administrative removal of a record.
    async fn remove(&self, actor: &DonorId, uid: &DonorId) -> Result<(), Error>;
}

/// Fixture directory with no donors.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureDonorDirectory;

#[async_trait]
impl DonorDirectory for FixtureDonorDirectory {
    async fn list_public(
        &self,
        _blood_group: Option<BloodGroup>,
    ) -> Result<Vec<DonorSnapshot>, Error> {
        Ok(Vec::new())
    }

    async fn search(
        &self,
        _actor: &DonorId,
        _criteria: DonorSearch,
    ) -> Result<Vec<DonorRecord>, Error> {
        Ok(Vec::new())
    }

    async fn profile(&self, uid: &DonorId) -> Result<DonorSnapshot, Error> {
        Err(Error::not_found(format!("donor {uid} not found")))
    }

    async fn record_donation(
        &self,
        uid: &DonorId,
        _date: NaiveDate,
    ) -> Result<DonorSnapshot, Error> {
        Err(Error::not_found(format!("donor {uid} not found")))
    }

    async fn amend(
        &self,
        _actor: &DonorId,
        _uid: &DonorId,
        _update: DonorUpdate,
    ) -> Result<(), Error> {
        Ok(())
    }

    async fn remove(&self, _actor: &DonorId, _uid: &DonorId) -> Result<(), Error> {
        Ok(())
    }
}
