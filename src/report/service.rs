use super::{
    create_report, get_report_detail, OrmUnitOfWork, ReportCommand, ReportDetail, ReportError,
};
use crate::db::get_db_pool;
use sea_orm::DatabaseConnection;

/// Runs each report operation in its own database transaction.
#[derive(Clone, Copy)]
pub struct ReportService<'a> {
    db: &'a DatabaseConnection,
}

impl ReportService<'static> {
    /// Service over the global pool from `db::init_db`.
    pub fn from_pool() -> Self {
        Self::new(get_db_pool())
    }
}

impl<'a> ReportService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn get_report_detail(&self, report_id: i32) -> Result<ReportDetail, ReportError> {
        let uow = OrmUnitOfWork::begin(self.db).await?;
        let detail = get_report_detail(&uow, report_id).await;
        finish(uow, detail).await
    }

    pub async fn create_report(&self, command: &ReportCommand) -> Result<i32, ReportError> {
        let uow = OrmUnitOfWork::begin(self.db).await?;
        let report_id = create_report(&uow, command).await;
        finish(uow, report_id).await
    }
}

/// Commits on success, rolls back on failure. A failed rollback is logged
/// and the original error returned.
async fn finish<T>(uow: OrmUnitOfWork, result: Result<T, ReportError>) -> Result<T, ReportError> {
    match result {
        Ok(value) => {
            uow.commit().await?;
            Ok(value)
        }
        Err(e) => {
            if let Err(rollback_err) = uow.rollback().await {
                log::error!("Failed to roll back report transaction: {}", rollback_err);
            }
            Err(e)
        }
    }
}
