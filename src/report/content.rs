//! Reportable content: articles and replies addressed by `(type, id)`.

use super::error::{ErrorCode, ReportError};
use super::store::{ArticleStore, ReplyStore};
use crate::orm::reports::ReportType;
use crate::orm::{articles, boards, replies, users};

/// Points at one article or reply.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ContentRef {
    pub content_type: ReportType,
    pub content_id: i32,
}

impl ContentRef {
    pub fn new(content_type: ReportType, content_id: i32) -> Self {
        Self {
            content_type,
            content_id,
        }
    }

    /// Error for content of this type that does not exist.
    pub fn not_found(&self) -> ErrorCode {
        match self.content_type {
            ReportType::Board => ErrorCode::ArticleNotFound,
            ReportType::Reply => ErrorCode::ReplyNotFound,
        }
    }

    /// The article this content lives in, with its board. A reply resolves
    /// to its parent article. Any miss is `ArticleNotFound`.
    pub async fn article_with_board<S>(
        &self,
        stores: &S,
    ) -> Result<(articles::Model, boards::Model), ReportError>
    where
        S: ArticleStore + ReplyStore + ?Sized,
    {
        let found = match self.content_type {
            ReportType::Board => stores.find_article_with_board(self.content_id).await?,
            ReportType::Reply => {
                stores
                    .find_article_with_board_by_reply(self.content_id)
                    .await?
            }
        };

        found.ok_or_else(|| ErrorCode::ArticleNotFound.into())
    }
}

/// Resolved content a report is filed against.
#[derive(Clone, Debug, PartialEq)]
pub enum ReportTarget {
    Article {
        article: articles::Model,
        writer: users::Model,
    },
    Reply {
        reply: replies::Model,
        writer: users::Model,
    },
}

impl ReportTarget {
    /// Loads the content together with its writer.
    pub async fn resolve<S>(stores: &S, content: ContentRef) -> Result<Self, ReportError>
    where
        S: ArticleStore + ReplyStore + ?Sized,
    {
        let target = match content.content_type {
            ReportType::Board => stores
                .find_article_with_writer(content.content_id)
                .await?
                .map(|(article, writer)| ReportTarget::Article { article, writer }),
            ReportType::Reply => stores
                .find_reply_with_writer(content.content_id)
                .await?
                .map(|(reply, writer)| ReportTarget::Reply { reply, writer }),
        };

        target.ok_or_else(|| content.not_found().into())
    }

    pub fn content(&self) -> ContentRef {
        match self {
            ReportTarget::Article { article, .. } => ContentRef::new(ReportType::Board, article.id),
            ReportTarget::Reply { reply, .. } => ContentRef::new(ReportType::Reply, reply.id),
        }
    }

    /// The user who wrote the content.
    pub fn owning_user(&self) -> &users::Model {
        match self {
            ReportTarget::Article { writer, .. } | ReportTarget::Reply { writer, .. } => writer,
        }
    }

    /// Flags the content as reported. A row that vanished since `resolve`
    /// fails with the content's not-found code.
    pub async fn mark_reported<S>(&self, stores: &S) -> Result<(), ReportError>
    where
        S: ArticleStore + ReplyStore + ?Sized,
    {
        let updated = match self {
            ReportTarget::Article { article, .. } => {
                stores.mark_article_reported(article.id).await?
            }
            ReportTarget::Reply { reply, .. } => stores.mark_reply_reported(reply.id).await?,
        };

        if updated {
            Ok(())
        } else {
            Err(self.content().not_found().into())
        }
    }
}

/// Nobody may report content they wrote themselves.
pub fn ensure_not_self(reporter_id: i32, reported_id: i32) -> Result<(), ErrorCode> {
    if reporter_id == reported_id {
        Err(ErrorCode::SelfReport)
    } else {
        Ok(())
    }
}
