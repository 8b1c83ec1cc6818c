//! Campaign feed services.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::SecondsFormat;
use mockable::Clock;
use serde_json::json;

use crate::domain::access::{map_donor_repo_error, require_admin};
use crate::domain::ports::{
    CampaignFeed, CampaignRepository, CampaignRepositoryError, DonorRepository,
};
use crate::domain::{Campaign, CampaignComment, CampaignDraft, DonorId, Error};

fn map_repository_error(error: CampaignRepositoryError) -> Error {
    match error {
        CampaignRepositoryError::Unavailable { message } => {
            Error::service_unavailable(format!("campaign store unavailable: {message}"))
        }
        CampaignRepositoryError::Query { message } => {
            Error::internal(format!("campaign store error: {message}"))
        }
        CampaignRepositoryError::Corrupt { id, message } => {
            Error::internal(format!("corrupt campaign {id}: {message}"))
        }
    }
}

fn validate_draft(draft: &CampaignDraft) -> Result<(), Error> {
    if draft.title.trim().is_empty() {
        return Err(Error::invalid_request("campaign title must not be empty")
            .with_details(json!({ "field": "title" })));
    }
    if draft.image_url.trim().is_empty() {
        return Err(
            Error::invalid_request("campaign image URL must not be empty")
                .with_details(json!({ "field": "imageUrl" })),
        );
    }
    Ok(())
}

/// Campaign feed service implementing the driving port.
#[derive(Clone)]
pub struct CampaignFeedService<D, C> {
    donors: Arc<D>,
    campaigns: Arc<C>,
    clock: Arc<dyn Clock>,
}

impl<D, C> CampaignFeedService<D, C> {
    /// Create the service over its repositories and a clock.
    pub fn new(donors: Arc<D>, campaigns: Arc<C>, clock: Arc<dyn Clock>) -> Self {
        Self {
            donors,
            campaigns,
            clock,
        }
    }
}

impl<D, C> CampaignFeedService<D, C>
where
    C: CampaignRepository,
{
    async fn find_existing(&self, id: &str) -> Result<Campaign, Error> {
        self.campaigns
            .find(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("campaign {id} not found")))
    }
}

#[async_trait]
impl<D, C> CampaignFeed for CampaignFeedService<D, C>
where
    D: DonorRepository,
    C: CampaignRepository,
{
    async fn list(&self) -> Result<Vec<Campaign>, Error> {
        self.campaigns.list().await.map_err(map_repository_error)
    }

    async fn post(&self, actor: &DonorId, draft: CampaignDraft) -> Result<Campaign, Error> {
        require_admin(self.donors.as_ref(), actor).await?;
        validate_draft(&draft)?;

        let campaign = Campaign {
            id: String::new(),
            title: draft.title,
            description: draft.description,
            image_url: draft.image_url,
            date: self
                .clock
                .utc()
                .to_rfc3339_opts(SecondsFormat::Secs, true),
            likes: BTreeMap::new(),
            comments: BTreeMap::new(),
        };
        self.campaigns
            .append(&campaign)
            .await
            .map_err(map_repository_error)
    }

    async fn revise(&self, actor: &DonorId, id: &str, draft: CampaignDraft) -> Result<(), Error> {
        require_admin(self.donors.as_ref(), actor).await?;
        validate_draft(&draft)?;
        self.find_existing(id).await?;
        self.campaigns
            .update(id, &draft)
            .await
            .map_err(map_repository_error)
    }

    async fn retract(&self, actor: &DonorId, id: &str) -> Result<(), Error> {
        require_admin(self.donors.as_ref(), actor).await?;
        self.campaigns
            .delete(id)
            .await
            .map_err(map_repository_error)
    }

    async fn toggle_like(&self, actor: &DonorId, id: &str) -> Result<bool, Error> {
        let campaign = self.find_existing(id).await?;
        let liked_now = !campaign.liked_by(actor);
        self.campaigns
            .set_like(id, actor, liked_now)
            .await
            .map_err(map_repository_error)?;
        Ok(liked_now)
    }

    async fn comment(
        &self,
        actor: &DonorId,
        id: &str,
        text: String,
    ) -> Result<CampaignComment, Error> {
        if text.trim().is_empty() {
            return Err(Error::invalid_request("comment text must not be empty"));
        }

        let author = self
            .donors
            .find(actor)
            .await
            .map_err(map_donor_repo_error)?
            .ok_or_else(|| Error::unauthorized("account no longer exists"))?;
        self.find_existing(id).await?;

        let comment = CampaignComment {
            user_name: author.name,
            text,
            timestamp: self.clock.utc().timestamp_millis(),
        };
        self.campaigns
            .append_comment(id, &comment)
            .await
            .map_err(map_repository_error)?;
        Ok(comment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockCampaignRepository, MockDonorRepository};
    use crate::domain::{BloodGroup, DonorRecord, DonorRole, ErrorCode};
    use chrono::{DateTime, Local, TimeZone, Utc};

    struct FixedClock(DateTime<Utc>);

    impl Clock for FixedClock {
        fn local(&self) -> DateTime<Local> {
            self.0.with_timezone(&Local)
        }

        fn utc(&self) -> DateTime<Utc> {
            self.0
        }
    }

    fn clock() -> FixedClock {
        FixedClock(
            Utc.with_ymd_and_hms(2024, 4, 10, 9, 30, 0)
                .single()
                .expect("valid test instant"),
        )
    }

    fn account(uid: &str, role: DonorRole) -> DonorRecord {
        DonorRecord {
            uid: DonorId::new(uid).expect("valid id"),
            name: "Sumaiya Akter".to_owned(),
            blood_group: BloodGroup::APositive,
            area: String::new(),
            institution: None,
            phone: "01712345678".to_owned(),
            email: format!("{uid}@example.org"),
            last_donation_date: None,
            is_available: true,
            role,
        }
    }

    fn stored_campaign(id: &str) -> Campaign {
        Campaign {
            id: id.to_owned(),
            title: "Winter drive".to_owned(),
            description: "Join us".to_owned(),
            image_url: "https://example.org/banner.jpg".to_owned(),
            date: "2024-04-01T10:00:00Z".to_owned(),
            likes: BTreeMap::new(),
            comments: BTreeMap::new(),
        }
    }

    fn service(
        donors: MockDonorRepository,
        campaigns: MockCampaignRepository,
    ) -> CampaignFeedService<MockDonorRepository, MockCampaignRepository> {
        CampaignFeedService::new(Arc::new(donors), Arc::new(campaigns), Arc::new(clock()))
    }

    #[tokio::test]
    async fn post_stamps_the_creation_instant() {
        let mut donors = MockDonorRepository::new();
        donors
            .expect_find()
            .times(1)
            .return_once(|_| Ok(Some(account("boss", DonorRole::Admin))));
        let mut campaigns = MockCampaignRepository::new();
        campaigns
            .expect_append()
            .withf(|campaign: &Campaign| campaign.date == "2024-04-10T09:30:00Z")
            .times(1)
            .return_once(|campaign| {
                let mut stored = campaign.clone();
                stored.id = "c1".to_owned();
                Ok(stored)
            });

        let svc = service(donors, campaigns);
        let actor = DonorId::new("boss").expect("valid id");
        let posted = svc
            .post(
                &actor,
                CampaignDraft {
                    title: "Winter drive".to_owned(),
                    description: String::new(),
                    image_url: "https://example.org/banner.jpg".to_owned(),
                },
            )
            .await
            .expect("post succeeds");
        assert_eq!(posted.id, "c1");
    }

    #[tokio::test]
    async fn post_rejects_a_missing_image_url() {
        let mut donors = MockDonorRepository::new();
        donors
            .expect_find()
            .times(1)
            .return_once(|_| Ok(Some(account("boss", DonorRole::Admin))));
        let mut campaigns = MockCampaignRepository::new();
        campaigns.expect_append().times(0);

        let svc = service(donors, campaigns);
        let actor = DonorId::new("boss").expect("valid id");
        let err = svc
            .post(
                &actor,
                CampaignDraft {
                    title: "Winter drive".to_owned(),
                    description: String::new(),
                    image_url: "  ".to_owned(),
                },
            )
            .await
            .expect_err("missing image");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[tokio::test]
    async fn toggle_like_is_an_involution() {
        let mut campaigns = MockCampaignRepository::new();
        let mut liked_state = stored_campaign("c1");
        liked_state
            .likes
            .insert("reader".to_owned(), true);
        campaigns
            .expect_find()
            .times(1)
            .return_once(|_| Ok(Some(stored_campaign("c1"))));
        campaigns
            .expect_set_like()
            .withf(|_, uid, liked| uid.as_ref() == "reader" && *liked)
            .times(1)
            .return_once(|_, _, _| Ok(()));

        let svc = service(MockDonorRepository::new(), campaigns);
        let actor = DonorId::new("reader").expect("valid id");
        let liked = svc.toggle_like(&actor, "c1").await.expect("like succeeds");
        assert!(liked);

        // Second toggle over the updated record clears the like again.
        let mut campaigns = MockCampaignRepository::new();
        campaigns
            .expect_find()
            .times(1)
            .return_once(move |_| Ok(Some(liked_state)));
        campaigns
            .expect_set_like()
            .withf(|_, uid, liked| uid.as_ref() == "reader" && !*liked)
            .times(1)
            .return_once(|_, _, _| Ok(()));
        let svc = service(MockDonorRepository::new(), campaigns);
        let liked = svc
            .toggle_like(&actor, "c1")
            .await
            .expect("unlike succeeds");
        assert!(!liked);
    }

    #[tokio::test]
    async fn comment_is_attributed_and_timestamped() {
        let mut donors = MockDonorRepository::new();
        donors
            .expect_find()
            .times(1)
            .return_once(|_| Ok(Some(account("reader", DonorRole::Donor))));
        let mut campaigns = MockCampaignRepository::new();
        campaigns
            .expect_find()
            .times(1)
            .return_once(|_| Ok(Some(stored_campaign("c1"))));
        campaigns
            .expect_append_comment()
            .withf(|_, comment: &CampaignComment| {
                comment.user_name == "Sumaiya Akter" && comment.text == "Count me in"
            })
            .times(1)
            .return_once(|_, _| Ok(()));

        let svc = service(donors, campaigns);
        let actor = DonorId::new("reader").expect("valid id");
        let comment = svc
            .comment(&actor, "c1", "Count me in".to_owned())
            .await
            .expect("comment succeeds");
        assert_eq!(
            comment.timestamp,
            Utc.with_ymd_and_hms(2024, 4, 10, 9, 30, 0)
                .single()
                .expect("valid test instant")
                .timestamp_millis()
        );
    }

    #[tokio::test]
    async fn commenting_on_a_missing_campaign_is_not_found() {
        let mut donors = MockDonorRepository::new();
        donors
            .expect_find()
            .times(1)
            .return_once(|_| Ok(Some(account("reader", DonorRole::Donor))));
        let mut campaigns = MockCampaignRepository::new();
        campaigns.expect_find().times(1).return_once(|_| Ok(None));
        campaigns.expect_append_comment().times(0);

        let svc = service(donors, campaigns);
        let actor = DonorId::new("reader").expect("valid id");
        let err = svc
            .comment(&actor, "gone", "hello".to_owned())
            .await
            .expect_err("missing campaign");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
