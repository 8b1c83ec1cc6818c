//! Role checks shared by the administrative services.

use crate::domain::ports::{DonorRepository, DonorRepositoryError};
use crate::domain::{DonorId, DonorRecord, Error};

/// Map donor repository failures onto the domain error.
pub(crate) fn map_donor_repo_error(error: DonorRepositoryError) -> Error {
    match error {
        DonorRepositoryError::Unavailable { message } => {
            Error::service_unavailable(format!("donor store unavailable: {message}"))
        }
        DonorRepositoryError::Query { message } => {
            Error::internal(format!("donor store error: {message}"))
        }
        DonorRepositoryError::Corrupt { uid, message } => {
            Error::internal(format!("corrupt donor record {uid}: {message}"))
        }
    }
}

/// Load the acting account and require administrative rights.
///
/// An unknown actor reads as unauthenticated rather than forbidden: the
/// session may outlive a deleted account.
pub(crate) async fn require_admin<R>(donors: &R, actor: &DonorId) -> Result<DonorRecord, Error>
where
    R: DonorRepository,
{
    let record = donors
        .find(actor)
        .await
        .map_err(map_donor_repo_error)?
        .ok_or_else(|| Error::unauthorized("account no longer exists"))?;

    if !record.role.is_admin() {
        return Err(Error::forbidden("administrator access required"));
    }
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockDonorRepository;
    use crate::domain::{BloodGroup, DonorRole};

    fn account(role: DonorRole) -> DonorRecord {
        DonorRecord {
            uid: DonorId::new("acct-1").expect("valid id"),
            name: "Admin".to_owned(),
            blood_group: BloodGroup::APositive,
            area: String::new(),
            institution: None,
            phone: "01712345678".to_owned(),
            email: "admin@example.org".to_owned(),
            last_donation_date: None,
            is_available: true,
            role,
        }
    }

    #[tokio::test]
    async fn admits_administrators() {
        let mut repo = MockDonorRepository::new();
        repo.expect_find()
            .times(1)
            .return_once(|_| Ok(Some(account(DonorRole::Admin))));

        let actor = DonorId::new("acct-1").expect("valid id");
        let record = require_admin(&repo, &actor).await.expect("admin admitted");
        assert!(record.role.is_admin());
    }

    #[tokio::test]
    async fn rejects_plain_donors() {
        let mut repo = MockDonorRepository::new();
        repo.expect_find()
            .times(1)
            .return_once(|_| Ok(Some(account(DonorRole::Donor))));

        let actor = DonorId::new("acct-1").expect("valid id");
        let err = require_admin(&repo, &actor).await.expect_err("forbidden");
        assert_eq!(err.code(), crate::domain::ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn rejects_sessions_for_deleted_accounts() {
        let mut repo = MockDonorRepository::new();
        repo.expect_find().times(1).return_once(|_| Ok(None));

        let actor = DonorId::new("gone").expect("valid id");
        let err = require_admin(&repo, &actor).await.expect_err("unauthorized");
        assert_eq!(err.code(), crate::domain::ErrorCode::Unauthorized);
    }
}
