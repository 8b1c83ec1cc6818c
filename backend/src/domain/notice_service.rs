//! Notice-board services.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;

use crate::domain::access::require_admin;
use crate::domain::ports::{
    DonorRepository, NewNotice, NoticeBoard, NoticeRepository, NoticeRepositoryError,
};
use crate::domain::{DonorId, Error, Notice, NoticeUpdate};

fn map_repository_error(error: NoticeRepositoryError) -> Error {
    match error {
        NoticeRepositoryError::Unavailable { message } => {
            Error::service_unavailable(format!("notice store unavailable: {message}"))
        }
        NoticeRepositoryError::Query { message } => {
            Error::internal(format!("notice store error: {message}"))
        }
        NoticeRepositoryError::Corrupt { id, message } => {
            Error::internal(format!("corrupt notice {id}: {message}"))
        }
    }
}

/// Notice-board service implementing the driving port.
#[derive(Clone)]
pub struct NoticeBoardService<D, N> {
    donors: Arc<D>,
    notices: Arc<N>,
    clock: Arc<dyn Clock>,
}

impl<D, N> NoticeBoardService<D, N> {
    /// Create the service over its repositories and a clock.
    pub fn new(donors: Arc<D>, notices: Arc<N>, clock: Arc<dyn Clock>) -> Self {
        Self {
            donors,
            notices,
            clock,
        }
    }
}

#[async_trait]
impl<D, N> NoticeBoard for NoticeBoardService<D, N>
where
    D: DonorRepository,
    N: NoticeRepository,
{
    async fn list(&self) -> Result<Vec<Notice>, Error> {
        self.notices.list().await.map_err(map_repository_error)
    }

    async fn publish(&self, actor: &DonorId, notice: NewNotice) -> Result<Notice, Error> {
        require_admin(self.donors.as_ref(), actor).await?;
        if notice.title.trim().is_empty() {
            return Err(Error::invalid_request("notice title must not be empty")
                .with_details(json!({ "field": "title" })));
        }

        let stamped = Notice {
            id: String::new(),
            title: notice.title,
            message: notice.message,
            date: self.clock.utc().date_naive().format("%Y-%m-%d").to_string(),
        };
        self.notices
            .append(&stamped)
            .await
            .map_err(map_repository_error)
    }

    async fn amend(&self, actor: &DonorId, id: &str, update: NoticeUpdate) -> Result<(), Error> {
        require_admin(self.donors.as_ref(), actor).await?;
        if update.is_empty() {
            return Err(Error::invalid_request("no fields to update"));
        }
        self.notices
            .update(id, &update)
            .await
            .map_err(map_repository_error)
    }

    async fn retract(&self, actor: &DonorId, id: &str) -> Result<(), Error> {
        require_admin(self.donors.as_ref(), actor).await?;
        self.notices.delete(id).await.map_err(map_repository_error)
    }
}
