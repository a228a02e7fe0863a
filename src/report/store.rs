//! Store contracts the report service runs against.
//!
//! Every method runs inside the caller's unit of work. Lookups return
//! `Ok(None)` for a missing row and reserve `Err` for store failures.

use crate::orm::reports::ReportType;
use crate::orm::{articles, boards, replies, reports, users};
use async_trait::async_trait;
use sea_orm::DbErr;

/// Report row with both users resolved.
#[derive(Clone, Debug, PartialEq)]
pub struct ReportWithUsers {
    pub report: reports::Model,
    pub reporter: users::Model,
    pub reported: users::Model,
}

/// Values for a report that has not been stored yet.
#[derive(Clone, Debug, PartialEq)]
pub struct NewReport {
    pub reporter_id: i32,
    pub reported_id: i32,
    pub content_type: ReportType,
    pub content_id: i32,
    pub reason: String,
    pub details: Option<String>,
    pub created_at: chrono::NaiveDateTime,
}

/// Error returned by `ReportStore::save_report`.
#[derive(Debug)]
pub enum SaveReportError {
    /// A report with the same (reporter, type, content) is already stored
    Duplicate,
    Database(DbErr),
}

impl From<DbErr> for SaveReportError {
    fn from(e: DbErr) -> Self {
        SaveReportError::Database(e)
    }
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_user(&self, user_id: i32) -> Result<Option<users::Model>, DbErr>;
}

#[async_trait]
pub trait ArticleStore: Send + Sync {
    /// Article and the user who wrote it.
    async fn find_article_with_writer(
        &self,
        article_id: i32,
    ) -> Result<Option<(articles::Model, users::Model)>, DbErr>;

    /// Article and the board it was posted on.
    async fn find_article_with_board(
        &self,
        article_id: i32,
    ) -> Result<Option<(articles::Model, boards::Model)>, DbErr>;

    /// Raises the reported flag. Returns false if no article was updated.
    async fn mark_article_reported(&self, article_id: i32) -> Result<bool, DbErr>;
}

#[async_trait]
pub trait ReplyStore: Send + Sync {
    /// Reply and the user who wrote it.
    async fn find_reply_with_writer(
        &self,
        reply_id: i32,
    ) -> Result<Option<(replies::Model, users::Model)>, DbErr>;

    /// The article a reply was posted under, with that article's board.
    async fn find_article_with_board_by_reply(
        &self,
        reply_id: i32,
    ) -> Result<Option<(articles::Model, boards::Model)>, DbErr>;

    /// Raises the reported flag. Returns false if no reply was updated.
    async fn mark_reply_reported(&self, reply_id: i32) -> Result<bool, DbErr>;
}

#[async_trait]
pub trait ReportStore: Send + Sync {
    async fn save_report(&self, report: NewReport) -> Result<reports::Model, SaveReportError>;

    /// Whether `reporter_id` already reported this piece of content.
    async fn exists_report(
        &self,
        reporter_id: i32,
        content_type: ReportType,
        content_id: i32,
    ) -> Result<bool, DbErr>;

    async fn find_report_with_users(
        &self,
        report_id: i32,
    ) -> Result<Option<ReportWithUsers>, DbErr>;
}

/// All stores of one transaction. Changes made through it become visible
/// to others only when its owner commits.
pub trait UnitOfWork: UserStore + ArticleStore + ReplyStore + ReportStore {}

impl<T> UnitOfWork for T where T: UserStore + ArticleStore + ReplyStore + ReportStore {}
