//! Donor data model.
//!
//! The donor record mirrors the shape stored in the hosted record store:
//! profile fields, the last donation date, the derived availability flag,
//! and the account role. Records deserialise tolerantly because the store
//! offers no schema enforcement and administrators can edit records freely.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use chrono::NaiveDate;

/// Characters the hosted store refuses inside keys.
pub const FORBIDDEN_KEY_CHARS: [char; 6] = ['.', '#', '$', '[', ']', '/'];

/// Validation errors returned by the donor value-type constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DonorValidationError {
    EmptyId,
    InvalidId,
    EmptyName,
    InvalidPhone,
    InvalidEmail,
    UnknownBloodGroup { value: String },
}

impl fmt::Display for DonorValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "donor id must not be empty"),
            Self::InvalidId => write!(f, "donor id contains characters the store rejects"),
            Self::EmptyName => write!(f, "donor name must not be empty"),
            Self::InvalidPhone => write!(f, "phone number must contain 6 to 20 digits"),
            Self::InvalidEmail => write!(f, "email address is not well formed"),
            Self::UnknownBloodGroup { value } => {
                write!(f, "unknown blood group: {value}")
            }
        }
    }
}

impl std::error::Error for DonorValidationError {}

/// Opaque stable identifier assigned by the identity provider.
///
/// The id doubles as the record key under `users/`, so it must not contain
/// characters the store rejects in keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DonorId(String);

impl DonorId {
    /// Validate and construct a [`DonorId`] from borrowed input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, DonorValidationError> {
        Self::from_owned(id.as_ref().to_owned())
    }

    /// Generate a fresh random [`DonorId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    fn from_owned(id: String) -> Result<Self, DonorValidationError> {
        if id.trim().is_empty() {
            return Err(DonorValidationError::EmptyId);
        }
        if id.trim() != id || id.contains(FORBIDDEN_KEY_CHARS) {
            return Err(DonorValidationError::InvalidId);
        }
        Ok(Self(id))
    }
}

impl AsRef<str> for DonorId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for DonorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<DonorId> for String {
    fn from(value: DonorId) -> Self {
        value.0
    }
}

impl TryFrom<String> for DonorId {
    type Error = DonorValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// The eight ABO/Rh blood groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum BloodGroup {
    #[serde(rename = "A+")]
    APositive,
    #[serde(rename = "A-")]
    ANegative,
    #[serde(rename = "B+")]
    BPositive,
    #[serde(rename = "B-")]
    BNegative,
    #[serde(rename = "O+")]
    OPositive,
    #[serde(rename = "O-")]
    ONegative,
    #[serde(rename = "AB+")]
    AbPositive,
    #[serde(rename = "AB-")]
    AbNegative,
}

impl BloodGroup {
    /// All groups in listing order.
    pub const ALL: [Self; 8] = [
        Self::APositive,
        Self::ANegative,
        Self::BPositive,
        Self::BNegative,
        Self::OPositive,
        Self::ONegative,
        Self::AbPositive,
        Self::AbNegative,
    ];

    /// Wire representation, e.g. `"AB+"`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::APositive => "A+",
            Self::ANegative => "A-",
            Self::BPositive => "B+",
            Self::BNegative => "B-",
            Self::OPositive => "O+",
            Self::ONegative => "O-",
            Self::AbPositive => "AB+",
            Self::AbNegative => "AB-",
        }
    }
}

impl fmt::Display for BloodGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BloodGroup {
    type Err = DonorValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|group| group.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DonorValidationError::UnknownBloodGroup {
                value: s.to_owned(),
            })
    }
}

/// Account role stored alongside the profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, Default)]
#[serde(rename_all = "lowercase")]
pub enum DonorRole {
    Admin,
    #[default]
    Donor,
}

impl DonorRole {
    /// Whether this role carries administrative rights.
    pub fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

/// Lenient wire encoding for the last donation date.
///
/// The store keeps the field as a string: an empty string means "never
/// donated" and malformed values are normalised to the same, since the
/// store enforces nothing and crashing on a bad record would take the whole
/// listing down with it.
pub(crate) mod date_string {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};
    use tracing::warn;

    pub(crate) const FORMAT: &str = "%Y-%m-%d";

    pub(crate) fn serialize<S>(value: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(date) => serializer.serialize_str(&date.format(FORMAT).to_string()),
            None => serializer.serialize_str(""),
        }
    }

    pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().and_then(parse_lenient))
    }

    pub(crate) fn parse_lenient(raw: &str) -> Option<NaiveDate> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        match NaiveDate::parse_from_str(trimmed, FORMAT) {
            Ok(date) => Some(date),
            Err(error) => {
                warn!(value = trimmed, %error, "unparseable donation date treated as absent");
                None
            }
        }
    }
}

/// One registered donor as stored under `users/{uid}`.
///
/// `is_available` is derived from `last_donation_date`; it is kept in the
/// record purely so the store can filter on it. Readers should prefer
/// recomputing availability over trusting the stored flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DonorRecord {
    #[schema(value_type = String, example = "9f2ddmz0")]
    pub uid: DonorId,
    pub name: String,
    pub blood_group: BloodGroup,
    pub area: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub institution: Option<String>,
    pub phone: String,
    pub email: String,
    #[serde(default, with = "date_string")]
    #[schema(value_type = String, example = "2024-01-15")]
    pub last_donation_date: Option<NaiveDate>,
    pub is_available: bool,
    #[serde(default)]
    pub role: DonorRole,
}

impl DonorRecord {
    /// Whether the cooldown rule applies to this record at all.
    pub fn is_donor(&self) -> bool {
        self.role == DonorRole::Donor
    }
}

static PHONE_RE: OnceLock<Regex> = OnceLock::new();
static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn phone_regex() -> &'static Regex {
    PHONE_RE.get_or_init(|| {
        let pattern = r"^\+?[0-9][0-9 \-]{5,19}$";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("phone regex failed to compile: {error}"))
    })
}

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        let pattern = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Validated profile payload for a new registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDonor {
    pub name: String,
    pub blood_group: BloodGroup,
    pub area: String,
    pub institution: Option<String>,
    pub phone: String,
    pub email: String,
    pub last_donation_date: Option<NaiveDate>,
}

impl NewDonor {
    /// Validate the free-form profile fields.
    pub fn try_new(
        name: impl Into<String>,
        blood_group: BloodGroup,
        area: impl Into<String>,
        institution: Option<String>,
        phone: impl Into<String>,
        email: impl Into<String>,
        last_donation_date: Option<NaiveDate>,
    ) -> Result<Self, DonorValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DonorValidationError::EmptyName);
        }
        let phone = phone.into();
        if !phone_regex().is_match(&phone) {
            return Err(DonorValidationError::InvalidPhone);
        }
        let email = email.into();
        if !email_regex().is_match(&email) {
            return Err(DonorValidationError::InvalidEmail);
        }
        Ok(Self {
            name,
            blood_group,
            area: area.into(),
            institution: institution.filter(|value| !value.trim().is_empty()),
            phone,
            email,
            last_donation_date,
        })
    }

    /// Materialise the stored record for a freshly issued id.
    ///
    /// New donors start available; the availability engine corrects the
    /// flag on first load if a recent donation date was supplied.
    pub fn into_record(self, uid: DonorId) -> DonorRecord {
        DonorRecord {
            uid,
            name: self.name,
            blood_group: self.blood_group,
            area: self.area,
            institution: self.institution,
            phone: self.phone,
            email: self.email,
            last_donation_date: self.last_donation_date,
            is_available: true,
            role: DonorRole::Donor,
        }
    }
}

/// Partial profile edit applied by an administrator.
///
/// Absent fields are left untouched by the store's merge semantics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DonorUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blood_group: Option<BloodGroup>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub institution: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>, example = "2024-01-15")]
    pub last_donation_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_available: Option<bool>,
}

impl DonorUpdate {
    /// Whether the edit carries no changes at all.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn record_json(date: &str) -> serde_json::Value {
        json!({
            "uid": "donor-1",
            "name": "Rahim Uddin",
            "bloodGroup": "O+",
            "area": "Mirpur, Dhaka",
            "phone": "+880171234567",
            "email": "rahim@example.org",
            "lastDonationDate": date,
            "isAvailable": true,
            "role": "donor"
        })
    }

    #[test]
    fn record_round_trips_through_store_json() {
        let record: DonorRecord =
            serde_json::from_value(record_json("2024-01-15")).expect("deserialise record");
        assert_eq!(
            record.last_donation_date,
            NaiveDate::from_ymd_opt(2024, 1, 15)
        );
        let value = serde_json::to_value(&record).expect("serialise record");
        assert_eq!(value["lastDonationDate"], "2024-01-15");
        assert_eq!(value["bloodGroup"], "O+");
        assert_eq!(value["role"], "donor");
    }

    #[rstest]
    #[case("")]
    #[case("not-a-date")]
    #[case("2024-13-40")]
    fn unparseable_dates_normalise_to_absent(#[case] raw: &str) {
        let record: DonorRecord =
            serde_json::from_value(record_json(raw)).expect("deserialise record");
        assert_eq!(record.last_donation_date, None);
    }

    #[test]
    fn absent_date_serialises_as_empty_string() {
        let record: DonorRecord =
            serde_json::from_value(record_json("")).expect("deserialise record");
        let value = serde_json::to_value(&record).expect("serialise record");
        assert_eq!(value["lastDonationDate"], "");
    }

    #[test]
    fn missing_role_defaults_to_donor() {
        let mut raw = record_json("");
        raw.as_object_mut()
            .expect("object")
            .remove("role")
            .expect("role present");
        let record: DonorRecord = serde_json::from_value(raw).expect("deserialise record");
        assert_eq!(record.role, DonorRole::Donor);
    }

    #[rstest]
    #[case("A+", BloodGroup::APositive)]
    #[case("ab-", BloodGroup::AbNegative)]
    #[case(" O- ", BloodGroup::ONegative)]
    fn blood_groups_parse_case_insensitively(#[case] raw: &str, #[case] expected: BloodGroup) {
        assert_eq!(raw.parse::<BloodGroup>().expect("parse group"), expected);
    }

    #[test]
    fn blood_group_rejects_unknown_values() {
        let err = "C+".parse::<BloodGroup>().expect_err("unknown group");
        assert!(matches!(err, DonorValidationError::UnknownBloodGroup { .. }));
    }

    #[rstest]
    #[case("")]
    #[case("a/b")]
    #[case("a.b#c")]
    fn donor_id_rejects_store_hostile_keys(#[case] raw: &str) {
        assert!(DonorId::new(raw).is_err());
    }

    #[test]
    fn new_donor_rejects_bad_phone() {
        let err = NewDonor::try_new(
            "Karim",
            BloodGroup::BPositive,
            "Uttara",
            None,
            "12",
            "karim@example.org",
            None,
        )
        .expect_err("phone too short");
        assert_eq!(err, DonorValidationError::InvalidPhone);
    }

    #[test]
    fn new_donor_blanks_out_empty_institution() {
        let donor = NewDonor::try_new(
            "Karim",
            BloodGroup::BPositive,
            "Uttara",
            Some("   ".to_owned()),
            "+880 1712-345678",
            "karim@example.org",
            None,
        )
        .expect("valid profile");
        assert_eq!(donor.institution, None);
    }

    #[test]
    fn into_record_marks_new_donors_available() {
        let donor = NewDonor::try_new(
            "Karim",
            BloodGroup::BPositive,
            "Uttara",
            None,
            "01712345678",
            "karim@example.org",
            None,
        )
        .expect("valid profile");
        let record = donor.into_record(DonorId::random());
        assert!(record.is_available);
        assert_eq!(record.role, DonorRole::Donor);
    }
}
