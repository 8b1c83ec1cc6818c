//! Donor registry backend library.
//!
//! A donor-registry and community-content backend for a blood-donation
//! charity. Persistence, identity, and push transport are delegated to
//! hosted platform services consumed through narrow ports; the domain
//! layer owns the donation cooldown rule and the synchronisation of the
//! derived availability flag.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
