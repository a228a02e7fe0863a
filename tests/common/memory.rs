//! In-memory unit of work for exercising the report flow without a database
#![allow(dead_code)]

use async_trait::async_trait;
use board_report::orm::reports::ReportType;
use board_report::orm::{articles, boards, replies, reports, users};
use board_report::report::{
    ArticleStore, NewReport, ReplyStore, ReportStore, ReportWithUsers, SaveReportError, UserStore,
};
use chrono::Utc;
use sea_orm::DbErr;
use std::collections::BTreeMap;
use std::sync::Mutex;

#[derive(Default)]
struct State {
    users: BTreeMap<i32, users::Model>,
    boards: BTreeMap<i32, boards::Model>,
    articles: BTreeMap<i32, articles::Model>,
    replies: BTreeMap<i32, replies::Model>,
    reports: Vec<reports::Model>,
    user_lookups: usize,
    content_lookups: usize,
    skip_duplicate_lookup: bool,
}

/// Stores every table in maps behind one lock. The reports table enforces
/// the same (reporter, type, content) uniqueness as the SQL schema.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_user(&self, id: i32, name: &str) -> &Self {
        self.state.lock().unwrap().users.insert(
            id,
            users::Model {
                id,
                name: name.to_string(),
                created_at: Utc::now().naive_utc(),
            },
        );
        self
    }

    pub fn add_board(&self, id: i32, name: &str) -> &Self {
        self.state.lock().unwrap().boards.insert(
            id,
            boards::Model {
                id,
                name: name.to_string(),
            },
        );
        self
    }

    pub fn add_article(&self, id: i32, board_id: i32, writer_id: i32, title: &str) -> &Self {
        self.state.lock().unwrap().articles.insert(
            id,
            articles::Model {
                id,
                board_id,
                user_id: writer_id,
                title: title.to_string(),
                is_reported: false,
                created_at: Utc::now().naive_utc(),
            },
        );
        self
    }

    pub fn add_reply(&self, id: i32, article_id: i32, writer_id: i32) -> &Self {
        self.state.lock().unwrap().replies.insert(
            id,
            replies::Model {
                id,
                article_id,
                user_id: writer_id,
                content: format!("reply {}", id),
                is_reported: false,
                created_at: Utc::now().naive_utc(),
            },
        );
        self
    }

    /// Drops an article, as a concurrent delete would.
    pub fn remove_article(&self, id: i32) {
        self.state.lock().unwrap().articles.remove(&id);
    }

    pub fn remove_reply(&self, id: i32) {
        self.state.lock().unwrap().replies.remove(&id);
    }

    /// Makes `exists_report` always answer false, as a racing request
    /// would observe before the other insert lands.
    pub fn skip_duplicate_lookup(&self) {
        self.state.lock().unwrap().skip_duplicate_lookup = true;
    }

    pub fn reports(&self) -> Vec<reports::Model> {
        self.state.lock().unwrap().reports.clone()
    }

    pub fn article(&self, id: i32) -> Option<articles::Model> {
        self.state.lock().unwrap().articles.get(&id).cloned()
    }

    pub fn reply(&self, id: i32) -> Option<replies::Model> {
        self.state.lock().unwrap().replies.get(&id).cloned()
    }

    pub fn user_lookups(&self) -> usize {
        self.state.lock().unwrap().user_lookups
    }

    pub fn content_lookups(&self) -> usize {
        self.state.lock().unwrap().content_lookups
    }
}

impl State {
    fn article_with_board(&self, article_id: i32) -> Option<(articles::Model, boards::Model)> {
        let article = self.articles.get(&article_id)?;
        let board = self.boards.get(&article.board_id)?;
        Some((article.clone(), board.clone()))
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_user(&self, user_id: i32) -> Result<Option<users::Model>, DbErr> {
        let mut state = self.state.lock().unwrap();
        state.user_lookups += 1;
        Ok(state.users.get(&user_id).cloned())
    }
}

#[async_trait]
impl ArticleStore for MemoryStore {
    async fn find_article_with_writer(
        &self,
        article_id: i32,
    ) -> Result<Option<(articles::Model, users::Model)>, DbErr> {
        let mut state = self.state.lock().unwrap();
        state.content_lookups += 1;
        Ok(state.articles.get(&article_id).and_then(|article| {
            state
                .users
                .get(&article.user_id)
                .map(|writer| (article.clone(), writer.clone()))
        }))
    }

    async fn find_article_with_board(
        &self,
        article_id: i32,
    ) -> Result<Option<(articles::Model, boards::Model)>, DbErr> {
        let mut state = self.state.lock().unwrap();
        state.content_lookups += 1;
        Ok(state.article_with_board(article_id))
    }

    async fn mark_article_reported(&self, article_id: i32) -> Result<bool, DbErr> {
        let mut state = self.state.lock().unwrap();
        Ok(match state.articles.get_mut(&article_id) {
            Some(article) => {
                article.is_reported = true;
                true
            }
            None => false,
        })
    }
}

#[async_trait]
impl ReplyStore for MemoryStore {
    async fn find_reply_with_writer(
        &self,
        reply_id: i32,
    ) -> Result<Option<(replies::Model, users::Model)>, DbErr> {
        let mut state = self.state.lock().unwrap();
        state.content_lookups += 1;
        Ok(state.replies.get(&reply_id).and_then(|reply| {
            state
                .users
                .get(&reply.user_id)
                .map(|writer| (reply.clone(), writer.clone()))
        }))
    }

    async fn find_article_with_board_by_reply(
        &self,
        reply_id: i32,
    ) -> Result<Option<(articles::Model, boards::Model)>, DbErr> {
        let mut state = self.state.lock().unwrap();
        state.content_lookups += 1;
        let article_id = match state.replies.get(&reply_id) {
            Some(reply) => reply.article_id,
            None => return Ok(None),
        };
        Ok(state.article_with_board(article_id))
    }

    async fn mark_reply_reported(&self, reply_id: i32) -> Result<bool, DbErr> {
        let mut state = self.state.lock().unwrap();
        Ok(match state.replies.get_mut(&reply_id) {
            Some(reply) => {
                reply.is_reported = true;
                true
            }
            None => false,
        })
    }
}

#[async_trait]
impl ReportStore for MemoryStore {
    async fn save_report(&self, report: NewReport) -> Result<reports::Model, SaveReportError> {
        let mut state = self.state.lock().unwrap();

        if state.reports.iter().any(|r| {
            r.reporter_id == report.reporter_id
                && r.content_type == report.content_type
                && r.content_id == report.content_id
        }) {
            return Err(SaveReportError::Duplicate);
        }

        let model = reports::Model {
            id: state.reports.len() as i32 + 1,
            reporter_id: report.reporter_id,
            reported_id: report.reported_id,
            content_type: report.content_type,
            content_id: report.content_id,
            reason: report.reason,
            details: report.details,
            created_at: report.created_at,
        };
        state.reports.push(model.clone());
        Ok(model)
    }

    async fn exists_report(
        &self,
        reporter_id: i32,
        content_type: ReportType,
        content_id: i32,
    ) -> Result<bool, DbErr> {
        let state = self.state.lock().unwrap();
        if state.skip_duplicate_lookup {
            return Ok(false);
        }
        Ok(state.reports.iter().any(|r| {
            r.reporter_id == reporter_id
                && r.content_type == content_type
                && r.content_id == content_id
        }))
    }

    async fn find_report_with_users(
        &self,
        report_id: i32,
    ) -> Result<Option<ReportWithUsers>, DbErr> {
        let state = self.state.lock().unwrap();
        let report = match state.reports.iter().find(|r| r.id == report_id) {
            Some(report) => report.clone(),
            None => return Ok(None),
        };

        Ok(
            match (
                state.users.get(&report.reporter_id),
                state.users.get(&report.reported_id),
            ) {
                (Some(reporter), Some(reported)) => Some(ReportWithUsers {
                    reporter: reporter.clone(),
                    reported: reported.clone(),
                    report,
                }),
                _ => None,
            },
        )
    }
}
