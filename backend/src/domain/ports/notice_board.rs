//! Driving port for the notice board.

use async_trait::async_trait;

use crate::domain::{DonorId, Error, Notice, NoticeUpdate};

/// Payload for publishing a notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNotice {
    pub title: String,
    pub message: String,
}

/// Driving port for reading and managing notices.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NoticeBoard: Send + Sync {
    /// All notices, newest first. Public.
    async fn list(&self) -> Result<Vec<Notice>, Error>;

    /// Publish a notice. Administrators only.
    async fn publish(&self, actor: &DonorId, notice: NewNotice) -> Result<Notice, Error>;

    /// Edit a notice. Administrators only.
    async fn amend(&self, actor: &DonorId, id: &str, update: NoticeUpdate) -> Result<(), Error>;

    /// Delete a notice. Administrators only.
    async fn retract(&self, actor: &DonorId, id: &str) -> Result<(), Error>;
}

/// Fixture board with no notices.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureNoticeBoard;

#[async_trait]
impl NoticeBoard for FixtureNoticeBoard {
    async fn list(&self) -> Result<Vec<Notice>, Error> {
        Ok(Vec::new())
    }

    async fn publish(&self, _actor: &DonorId, notice: NewNotice) -> Result<Notice, Error> {
        Ok(Notice {
            id: String::new(),
            title: notice.title,
            message: notice.message,
            date: String::new(),
        })
    }

    async fn amend(&self, _actor: &DonorId, _id: &str, _update: NoticeUpdate) -> Result<(), Error> {
        Ok(())
    }

    async fn retract(&self, _actor: &DonorId, _id: &str) -> Result<(), Error> {
        Ok(())
    }
}
