//! Behaviour tests for registration and login.

use std::sync::Arc;

use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use mockable::Clock;

use crate::domain::ports::{
    DonorOnboarding, IdentityProviderError, LoginRequest, MockDonorRepository,
    MockIdentityProvider, RegisterRequest,
};
use crate::domain::{
    BloodGroup, DonorId, DonorRecord, DonorRole, ErrorCode, NewDonor,
};

use super::DonorOnboardingService;

struct FixedClock(DateTime<Utc>);

impl FixedClock {
    fn on(year: i32, month: u32, day: u32) -> Self {
        let instant = Utc
            .with_ymd_and_hms(year, month, day, 12, 0, 0)
            .single()
            .expect("valid test instant");
        Self(instant)
    }
}

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

fn profile() -> NewDonor {
    NewDonor::try_new(
        "Rahim Uddin",
        BloodGroup::OPositive,
        "Mirpur, Dhaka",
        None,
        "01712345678",
        "rahim@example.org",
        None,
    )
    .expect("valid profile")
}

fn service(
    donors: MockDonorRepository,
    identity: MockIdentityProvider,
    clock: FixedClock,
) -> DonorOnboardingService<MockDonorRepository, MockIdentityProvider> {
    DonorOnboardingService::new(Arc::new(donors), Arc::new(identity), Arc::new(clock))
}

#[tokio::test]
async fn register_stores_an_available_donor_record() {
    let mut identity = MockIdentityProvider::new();
    identity
        .expect_create_account()
        .withf(|email, password| email == "rahim@example.org" && password == "secret123")
        .times(1)
        .return_once(|_, _| Ok(DonorId::new("fresh-uid").expect("valid id")));

    let mut donors = MockDonorRepository::new();
    donors
        .expect_create()
        .withf(|record: &DonorRecord| {
            record.uid.as_ref() == "fresh-uid"
                && record.is_available
                && record.role == DonorRole::Donor
        })
        .times(1)
        .return_once(|_| Ok(()));
    // A never-donated profile is already consistent, so no flag write.
    donors.expect_set_availability().times(0);

    let svc = service(donors, identity, FixedClock::on(2024, 4, 10));
    let snapshot = svc
        .register(RegisterRequest {
            profile: profile(),
            password: "secret123".to_owned(),
        })
        .await
        .expect("registration succeeds");

    assert!(snapshot.availability.is_available);
    assert_eq!(snapshot.record.uid.as_ref(), "fresh-uid");
}

#[tokio::test]
async fn register_reconciles_a_recent_donation_date() {
    let mut identity = MockIdentityProvider::new();
    identity
        .expect_create_account()
        .times(1)
        .return_once(|_, _| Ok(DonorId::new("fresh-uid").expect("valid id")));

    let mut donors = MockDonorRepository::new();
    donors.expect_create().times(1).return_once(|_| Ok(()));
    // New records start available, but a donation five days ago means the
    // flag must flip immediately.
    donors
        .expect_set_availability()
        .withf(|_, available| !available)
        .times(1)
        .return_once(|_, _| Ok(()));

    let mut recent = profile();
    recent.last_donation_date = NaiveDate::from_ymd_opt(2024, 4, 5);

    let svc = service(donors, identity, FixedClock::on(2024, 4, 10));
    let snapshot = svc
        .register(RegisterRequest {
            profile: recent,
            password: "secret123".to_owned(),
        })
        .await
        .expect("registration succeeds");

    assert!(!snapshot.availability.is_available);
    assert!(!snapshot.record.is_available);
    assert_eq!(snapshot.availability.days_remaining, 85);
}

#[tokio::test]
async fn register_rejects_short_passwords_before_the_provider() {
    let mut identity = MockIdentityProvider::new();
    identity.expect_create_account().times(0);
    let donors = MockDonorRepository::new();

    let svc = service(donors, identity, FixedClock::on(2024, 4, 10));
    let err = svc
        .register(RegisterRequest {
            profile: profile(),
            password: "short".to_owned(),
        })
        .await
        .expect_err("weak password");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[tokio::test]
async fn register_surfaces_duplicate_emails_as_conflict() {
    let mut identity = MockIdentityProvider::new();
    identity
        .expect_create_account()
        .times(1)
        .return_once(|_, _| Err(IdentityProviderError::EmailAlreadyInUse));
    let donors = MockDonorRepository::new();

    let svc = service(donors, identity, FixedClock::on(2024, 4, 10));
    let err = svc
        .register(RegisterRequest {
            profile: profile(),
            password: "secret123".to_owned(),
        })
        .await
        .expect_err("duplicate email");
    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[tokio::test]
async fn login_refreshes_a_stale_availability_flag() {
    let mut identity = MockIdentityProvider::new();
    identity
        .expect_verify_credentials()
        .times(1)
        .return_once(|_, _| Ok(DonorId::new("donor-1").expect("valid id")));

    let stored = DonorRecord {
        uid: DonorId::new("donor-1").expect("valid id"),
        name: "Rahim Uddin".to_owned(),
        blood_group: BloodGroup::OPositive,
        area: "Mirpur, Dhaka".to_owned(),
        institution: None,
        phone: "01712345678".to_owned(),
        email: "rahim@example.org".to_owned(),
        // Donated ten days ago but the flag was left at true.
        last_donation_date: NaiveDate::from_ymd_opt(2024, 3, 31),
        is_available: true,
        role: DonorRole::Donor,
    };

    let mut donors = MockDonorRepository::new();
    donors
        .expect_find()
        .times(1)
        .return_once(move |_| Ok(Some(stored)));
    donors
        .expect_set_availability()
        .withf(|_, available| !available)
        .times(1)
        .return_once(|_, _| Ok(()));

    let svc = service(donors, identity, FixedClock::on(2024, 4, 10));
    let snapshot = svc
        .login(LoginRequest {
            email: "rahim@example.org".to_owned(),
            password: "secret123".to_owned(),
        })
        .await
        .expect("login succeeds");

    assert!(!snapshot.availability.is_available);
    assert_eq!(snapshot.availability.days_remaining, 80);
    assert!(!snapshot.record.is_available);
}

#[tokio::test]
async fn login_rejects_bad_credentials() {
    let mut identity = MockIdentityProvider::new();
    identity
        .expect_verify_credentials()
        .times(1)
        .return_once(|_, _| Err(IdentityProviderError::InvalidCredentials));
    let donors = MockDonorRepository::new();

    let svc = service(donors, identity, FixedClock::on(2024, 4, 10));
    let err = svc
        .login(LoginRequest {
            email: "rahim@example.org".to_owned(),
            password: "wrong".to_owned(),
        })
        .await
        .expect_err("bad credentials");
    assert_eq!(err.code(), ErrorCode::Unauthorized);
}

#[tokio::test]
async fn login_without_a_profile_is_unauthorised() {
    let mut identity = MockIdentityProvider::new();
    identity
        .expect_verify_credentials()
        .times(1)
        .return_once(|_, _| Ok(DonorId::new("ghost").expect("valid id")));

    let mut donors = MockDonorRepository::new();
    donors.expect_find().times(1).return_once(|_| Ok(None));

    let svc = service(donors, identity, FixedClock::on(2024, 4, 10));
    let err = svc
        .login(LoginRequest {
            email: "ghost@example.org".to_owned(),
            password: "secret123".to_owned(),
        })
        .await
        .expect_err("missing profile");
    assert_eq!(err.code(), ErrorCode::Unauthorized);
}
