//! Filing reports against articles and replies, and reading them back.
//!
//! The operations in this module take a [`UnitOfWork`] and never commit it;
//! [`ReportService`] wraps them in a database transaction that commits on
//! success and rolls back on any error.

pub mod content;
pub mod error;
pub mod orm_store;
pub mod service;
pub mod store;

pub use content::{ensure_not_self, ContentRef, ReportTarget};
pub use error::{ErrorCode, ReportError};
pub use orm_store::OrmUnitOfWork;
pub use service::ReportService;
pub use store::{
    ArticleStore, NewReport, ReplyStore, ReportStore, ReportWithUsers, SaveReportError,
    UnitOfWork, UserStore,
};

use crate::orm::reports::ReportType;
use crate::orm::{articles, boards, users};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A user's request to report one article or reply.
#[derive(Clone, Debug, Deserialize, Validate)]
pub struct ReportCommand {
    pub reporter_id: i32,
    /// Raw type as received, `BOARD` or `REPLY`
    pub report_type: String,
    pub content_id: i32,
    #[validate(length(min = 1, max = 500))]
    pub reason: String,
    #[validate(length(max = 2000))]
    pub details: Option<String>,
}

/// Public part of a user shown alongside a report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UserSummary {
    pub id: i32,
    pub name: String,
}

impl From<users::Model> for UserSummary {
    fn from(user: users::Model) -> Self {
        Self {
            id: user.id,
            name: user.name,
        }
    }
}

/// A report joined with the article (and board) it concerns. Reply
/// reports show the reply's parent article.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ReportDetail {
    pub report_id: i32,
    pub report_type: ReportType,
    pub content_id: i32,
    pub reason: String,
    pub details: Option<String>,
    pub created_at: chrono::NaiveDateTime,
    pub reporter: UserSummary,
    pub reported: UserSummary,
    pub article_id: i32,
    pub article_title: String,
    pub board_id: i32,
    pub board_name: String,
}

impl ReportDetail {
    pub fn new(row: ReportWithUsers, article: articles::Model, board: boards::Model) -> Self {
        let ReportWithUsers {
            report,
            reporter,
            reported,
        } = row;

        Self {
            report_id: report.id,
            report_type: report.content_type,
            content_id: report.content_id,
            reason: report.reason,
            details: report.details,
            created_at: report.created_at,
            reporter: reporter.into(),
            reported: reported.into(),
            article_id: article.id,
            article_title: article.title,
            board_id: board.id,
            board_name: board.name,
        }
    }
}

/// Loads a report with both users and the article it points at.
pub async fn get_report_detail<U>(uow: &U, report_id: i32) -> Result<ReportDetail, ReportError>
where
    U: UnitOfWork + ?Sized,
{
    let row = uow
        .find_report_with_users(report_id)
        .await?
        .ok_or(ErrorCode::ReportNotFound)?;

    let content = ContentRef::new(row.report.content_type, row.report.content_id);
    let (article, board) = content.article_with_board(uow).await?;

    Ok(ReportDetail::new(row, article, board))
}

/// Validates `command` and files a new report, returning its id.
///
/// Checks run in order: field lengths, reporter, report type, target
/// content, self report, duplicate. The target is flagged as reported in
/// the same unit of work as the insert.
pub async fn create_report<U>(uow: &U, command: &ReportCommand) -> Result<i32, ReportError>
where
    U: UnitOfWork + ?Sized,
{
    let result = try_create_report(uow, command).await;

    match &result {
        Ok(report_id) => log::info!(
            "Report {} filed: reporter={} type={} content={}",
            report_id,
            command.reporter_id,
            command.report_type,
            command.content_id
        ),
        Err(ReportError::Database(e)) => log::error!(
            "Failed to file report by user {}: {}",
            command.reporter_id,
            e
        ),
        Err(e) => log::warn!(
            "Report rejected: reporter={} type={} content={} reason={}",
            command.reporter_id,
            command.report_type,
            command.content_id,
            e
        ),
    }

    result
}

async fn try_create_report<U>(uow: &U, command: &ReportCommand) -> Result<i32, ReportError>
where
    U: UnitOfWork + ?Sized,
{
    command.validate()?;

    let reporter = uow
        .find_user(command.reporter_id)
        .await?
        .ok_or(ErrorCode::UserNotFound)?;

    let report_type: ReportType = command
        .report_type
        .parse()
        .map_err(|_| ErrorCode::ReportTypeBadRequest)?;
    let content = ContentRef::new(report_type, command.content_id);

    let target = ReportTarget::resolve(uow, content).await?;
    let reported_id = target.owning_user().id;

    ensure_not_self(reporter.id, reported_id)?;

    if uow
        .exists_report(reporter.id, content.content_type, content.content_id)
        .await?
    {
        return Err(ErrorCode::DuplicatedReport.into());
    }

    target.mark_reported(uow).await?;

    let saved = uow
        .save_report(NewReport {
            reporter_id: reporter.id,
            reported_id,
            content_type: content.content_type,
            content_id: content.content_id,
            reason: command.reason.clone(),
            details: command.details.clone(),
            created_at: Utc::now().naive_utc(),
        })
        .await
        .map_err(|e| match e {
            SaveReportError::Duplicate => ReportError::from(ErrorCode::DuplicatedReport),
            SaveReportError::Database(e) => ReportError::from(e),
        })?;

    Ok(saved.id)
}
