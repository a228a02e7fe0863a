//! SeaORM implementation of the report stores over one transaction.

use super::store::{
    ArticleStore, NewReport, ReplyStore, ReportStore, ReportWithUsers, SaveReportError, UserStore,
};
use crate::orm::reports::ReportType;
use crate::orm::{articles, boards, replies, reports, users};
use async_trait::async_trait;
use sea_orm::{
    entity::*, query::*, sea_query::Expr, ActiveValue::Set, DatabaseConnection,
    DatabaseTransaction, DbErr,
};

/// Unit of work backed by a database transaction.
///
/// Dropping it without calling `commit` rolls everything back.
pub struct OrmUnitOfWork {
    txn: DatabaseTransaction,
}

impl OrmUnitOfWork {
    pub async fn begin(db: &DatabaseConnection) -> Result<Self, DbErr> {
        Ok(Self {
            txn: db.begin().await?,
        })
    }

    pub async fn commit(self) -> Result<(), DbErr> {
        self.txn.commit().await
    }

    pub async fn rollback(self) -> Result<(), DbErr> {
        self.txn.rollback().await
    }
}

/// Name of the `(reporter_id, content_type, content_id)` constraint in the
/// reporting migration.
const REPORT_UNIQUE_CONSTRAINT: &str = "reports_reporter_content_key";

/// sea-orm 0.8 flattens driver errors into `DbErr` strings, so the SQLSTATE
/// is gone and only the message text is left to match. The server message
/// may be localized (`lc_messages`); the constraint name never is.
fn is_unique_violation(e: &DbErr) -> bool {
    let msg = e.to_string();
    msg.contains(REPORT_UNIQUE_CONSTRAINT)
        || msg.contains("duplicate key value violates unique constraint")
        || msg.contains("Duplicate entry")
}

#[async_trait]
impl UserStore for OrmUnitOfWork {
    async fn find_user(&self, user_id: i32) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find_by_id(user_id).one(&self.txn).await
    }
}

#[async_trait]
impl ArticleStore for OrmUnitOfWork {
    async fn find_article_with_writer(
        &self,
        article_id: i32,
    ) -> Result<Option<(articles::Model, users::Model)>, DbErr> {
        let row = articles::Entity::find_by_id(article_id)
            .find_also_related(users::Entity)
            .one(&self.txn)
            .await?;

        Ok(row.and_then(|(article, writer)| writer.map(|writer| (article, writer))))
    }

    async fn find_article_with_board(
        &self,
        article_id: i32,
    ) -> Result<Option<(articles::Model, boards::Model)>, DbErr> {
        let row = articles::Entity::find_by_id(article_id)
            .find_also_related(boards::Entity)
            .one(&self.txn)
            .await?;

        Ok(row.and_then(|(article, board)| board.map(|board| (article, board))))
    }

    async fn mark_article_reported(&self, article_id: i32) -> Result<bool, DbErr> {
        let res = articles::Entity::update_many()
            .col_expr(articles::Column::IsReported, Expr::value(true))
            .filter(articles::Column::Id.eq(article_id))
            .exec(&self.txn)
            .await?;

        Ok(res.rows_affected > 0)
    }
}

#[async_trait]
impl ReplyStore for OrmUnitOfWork {
    async fn find_reply_with_writer(
        &self,
        reply_id: i32,
    ) -> Result<Option<(replies::Model, users::Model)>, DbErr> {
        let row = replies::Entity::find_by_id(reply_id)
            .find_also_related(users::Entity)
            .one(&self.txn)
            .await?;

        Ok(row.and_then(|(reply, writer)| writer.map(|writer| (reply, writer))))
    }

    async fn find_article_with_board_by_reply(
        &self,
        reply_id: i32,
    ) -> Result<Option<(articles::Model, boards::Model)>, DbErr> {
        let reply = match replies::Entity::find_by_id(reply_id).one(&self.txn).await? {
            Some(reply) => reply,
            None => return Ok(None),
        };

        self.find_article_with_board(reply.article_id).await
    }

    async fn mark_reply_reported(&self, reply_id: i32) -> Result<bool, DbErr> {
        let res = replies::Entity::update_many()
            .col_expr(replies::Column::IsReported, Expr::value(true))
            .filter(replies::Column::Id.eq(reply_id))
            .exec(&self.txn)
            .await?;

        Ok(res.rows_affected > 0)
    }
}

#[async_trait]
impl ReportStore for OrmUnitOfWork {
    async fn save_report(&self, report: NewReport) -> Result<reports::Model, SaveReportError> {
        let new_report = reports::ActiveModel {
            reporter_id: Set(report.reporter_id),
            reported_id: Set(report.reported_id),
            content_type: Set(report.content_type),
            content_id: Set(report.content_id),
            reason: Set(report.reason),
            details: Set(report.details),
            created_at: Set(report.created_at),
            ..Default::default()
        };

        new_report.insert(&self.txn).await.map_err(|e| {
            if is_unique_violation(&e) {
                SaveReportError::Duplicate
            } else {
                SaveReportError::Database(e)
            }
        })
    }

    async fn exists_report(
        &self,
        reporter_id: i32,
        content_type: ReportType,
        content_id: i32,
    ) -> Result<bool, DbErr> {
        let existing = reports::Entity::find()
            .filter(reports::Column::ReporterId.eq(reporter_id))
            .filter(reports::Column::ContentType.eq(content_type.as_str()))
            .filter(reports::Column::ContentId.eq(content_id))
            .one(&self.txn)
            .await?;

        Ok(existing.is_some())
    }

    async fn find_report_with_users(
        &self,
        report_id: i32,
    ) -> Result<Option<ReportWithUsers>, DbErr> {
        let report = match reports::Entity::find_by_id(report_id).one(&self.txn).await? {
            Some(report) => report,
            None => return Ok(None),
        };

        let people = users::Entity::find()
            .filter(users::Column::Id.is_in([report.reporter_id, report.reported_id]))
            .all(&self.txn)
            .await?;
        let by_id = |id: i32| people.iter().find(|u| u.id == id).cloned();

        Ok(match (by_id(report.reporter_id), by_id(report.reported_id)) {
            (Some(reporter), Some(reported)) => Some(ReportWithUsers {
                report,
                reporter,
                reported,
            }),
            _ => None,
        })
    }
}
