//! Community partner roster services.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::domain::access::require_admin;
use crate::domain::ports::{
    CommunityRepository, CommunityRepositoryError, CommunityRoster, DonorRepository,
};
use crate::domain::{CommunityData, CommunityPartner, DonorId, Error};

fn map_repository_error(error: CommunityRepositoryError) -> Error {
    match error {
        CommunityRepositoryError::Unavailable { message } => {
            Error::service_unavailable(format!("community store unavailable: {message}"))
        }
        CommunityRepositoryError::Query { message } => {
            Error::internal(format!("community store error: {message}"))
        }
        CommunityRepositoryError::Corrupt { message } => {
            Error::internal(format!("corrupt community document: {message}"))
        }
    }
}

/// Community roster service implementing the driving port.
///
/// The roster is one small document edited read-modify-write; concurrent
/// admin edits are last-write-wins, which matches the store's semantics.
#[derive(Clone)]
pub struct CommunityRosterService<D, C> {
    donors: Arc<D>,
    community: Arc<C>,
}

impl<D, C> CommunityRosterService<D, C> {
    /// Create the service over its repositories.
    pub fn new(donors: Arc<D>, community: Arc<C>) -> Self {
        Self { donors, community }
    }
}

#[async_trait]
impl<D, C> CommunityRoster for CommunityRosterService<D, C>
where
    D: DonorRepository,
    C: CommunityRepository,
{
    async fn roster(&self) -> Result<CommunityData, Error> {
        self.community.load().await.map_err(map_repository_error)
    }

    async fn add_partner(&self, actor: &DonorId, partner: CommunityPartner) -> Result<(), Error> {
        require_admin(self.donors.as_ref(), actor).await?;
        if partner.name.trim().is_empty() {
            return Err(Error::invalid_request("partner name must not be empty")
                .with_details(json!({ "field": "name" })));
        }
        if partner.image_url.trim().is_empty() {
            return Err(Error::invalid_request("partner logo URL must not be empty")
                .with_details(json!({ "field": "imageUrl" })));
        }

        let mut data = self.community.load().await.map_err(map_repository_error)?;
        data.partners.push(partner);
        self.community
            .save(&data)
            .await
            .map_err(map_repository_error)
    }

    async fn remove_partner(&self, actor: &DonorId, index: usize) -> Result<(), Error> {
        require_admin(self.donors.as_ref(), actor).await?;
        let mut data = self.community.load().await.map_err(map_repository_error)?;
        if index >= data.partners.len() {
            return Err(Error::invalid_request(format!(
                "no partner at index {index}"
            )));
        }
        data.partners.remove(index);
        self.community
            .save(&data)
            .await
            .map_err(map_repository_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockCommunityRepository, MockDonorRepository};
    use crate::domain::{BloodGroup, DonorRecord, DonorRole, ErrorCode};

    fn admin() -> DonorRecord {
        DonorRecord {
            uid: DonorId::new("boss").expect("valid id"),
            name: "Admin".to_owned(),
            blood_group: BloodGroup::APositive,
            area: String::new(),
            institution: None,
            phone: "01712345678".to_owned(),
            email: "admin@example.org".to_owned(),
            last_donation_date: None,
            is_available: true,
            role: DonorRole::Admin,
        }
    }

    fn roster_with(names: &[&str]) -> CommunityData {
        CommunityData {
            partners: names
                .iter()
                .map(|name| CommunityPartner {
                    name: (*name).to_owned(),
                    image_url: format!("https://example.org/{name}.png"),
                })
                .collect(),
        }
    }

    #[tokio::test]
    async fn add_partner_appends_to_the_roster() {
        let mut donors = MockDonorRepository::new();
        donors
            .expect_find()
            .times(1)
            .return_once(|_| Ok(Some(admin())));
        let mut community = MockCommunityRepository::new();
        community
            .expect_load()
            .times(1)
            .return_once(|| Ok(roster_with(&["red-crescent"])));
        community
            .expect_save()
            .withf(|data: &CommunityData| {
                data.partners.len() == 2 && data.partners[1].name == "sandhani"
            })
            .times(1)
            .return_once(|_| Ok(()));

        let svc = CommunityRosterService::new(Arc::new(donors), Arc::new(community));
        let actor = DonorId::new("boss").expect("valid id");
        svc.add_partner(
            &actor,
            CommunityPartner {
                name: "sandhani".to_owned(),
                image_url: "https://example.org/sandhani.png".to_owned(),
            },
        )
        .await
        .expect("partner added");
    }

    #[tokio::test]
    async fn remove_partner_rejects_out_of_range_indices() {
        let mut donors = MockDonorRepository::new();
        donors
            .expect_find()
            .times(1)
            .return_once(|_| Ok(Some(admin())));
        let mut community = MockCommunityRepository::new();
        community
            .expect_load()
            .times(1)
            .return_once(|| Ok(roster_with(&["red-crescent"])));
        community.expect_save().times(0);

        let svc = CommunityRosterService::new(Arc::new(donors), Arc::new(community));
        let actor = DonorId::new("boss").expect("valid id");
        let err = svc
            .remove_partner(&actor, 5)
            .await
            .expect_err("index out of range");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[tokio::test]
    async fn remove_partner_drops_the_selected_entry() {
        let mut donors = MockDonorRepository::new();
        donors
            .expect_find()
            .times(1)
            .return_once(|_| Ok(Some(admin())));
        let mut community = MockCommunityRepository::new();
        community
            .expect_load()
            .times(1)
            .return_once(|| Ok(roster_with(&["red-crescent", "sandhani"])));
        community
            .expect_save()
            .withf(|data: &CommunityData| {
                data.partners.len() == 1 && data.partners[0].name == "sandhani"
            })
            .times(1)
            .return_once(|_| Ok(()));

        let svc = CommunityRosterService::new(Arc::new(donors), Arc::new(community));
        let actor = DonorId::new("boss").expect("valid id");
        svc.remove_partner(&actor, 0).await.expect("partner removed");
    }
}
