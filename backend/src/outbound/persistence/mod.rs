//! Repositories layered over the record store, one per collection.

mod store_campaign_repository;
mod store_community_repository;
mod store_device_token_repository;
mod store_donor_repository;
mod store_notice_repository;

pub use store_campaign_repository::StoreCampaignRepository;
pub use store_community_repository::StoreCommunityRepository;
pub use store_device_token_repository::StoreDeviceTokenRepository;
pub use store_donor_repository::StoreDonorRepository;
pub use store_notice_repository::StoreNoticeRepository;
