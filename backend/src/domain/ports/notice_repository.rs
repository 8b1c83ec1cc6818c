//! Port for notice-board persistence.

use async_trait::async_trait;

use crate::domain::{Notice, NoticeUpdate};

/// Errors raised by notice repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NoticeRepositoryError {
    #[error("notice store unreachable: {message}")]
    Unavailable { message: String },
    #[error("notice store operation failed: {message}")]
    Query { message: String },
    #[error("corrupt notice at {id}: {message}")]
    Corrupt { id: String, message: String },
}

impl NoticeRepositoryError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    pub fn corrupt(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Corrupt {
            id: id.into(),
            message: message.into(),
        }
    }
}

/// Port for notice storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NoticeRepository: Send + Sync {
    /// All notices, newest first.
    async fn list(&self) -> Result<Vec<Notice>, NoticeRepositoryError>;

    /// Append a notice, returning it with the generated id filled in.
    async fn append(&self, notice: &Notice) -> Result<Notice, NoticeRepositoryError>;

    /// Merge the populated fields of `update` into one notice.
    async fn update(&self, id: &str, update: &NoticeUpdate) -> Result<(), NoticeRepositoryError>;

    /// Remove one notice.
    async fn delete(&self, id: &str) -> Result<(), NoticeRepositoryError>;
}

/// Fixture repository holding no notices.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureNoticeRepository;

#[async_trait]
impl NoticeRepository for FixtureNoticeRepository {
    async fn list(&self) -> Result<Vec<Notice>, NoticeRepositoryError> {
        Ok(Vec::new())
    }

    async fn append(&self, notice: &Notice) -> Result<Notice, NoticeRepositoryError> {
        Ok(notice.clone())
    }

    async fn update(&self, _id: &str, _update: &NoticeUpdate) -> Result<(), NoticeRepositoryError> {
        Ok(())
    }

    async fn delete(&self, _id: &str) -> Result<(), NoticeRepositoryError> {
        Ok(())
    }
}
