//! SeaORM Entity for reports table
//!
//! `(reporter_id, content_type, content_id)` is unique in the schema, so one
//! user can file at most one report per piece of content.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of content a report points at, stored as VARCHAR(16)
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(16))")]
#[serde(rename_all = "UPPERCASE")]
pub enum ReportType {
    /// An article posted on a board
    #[sea_orm(string_value = "BOARD")]
    Board,
    /// A reply under an article
    #[sea_orm(string_value = "REPLY")]
    Reply,
}

impl ReportType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportType::Board => "BOARD",
            ReportType::Reply => "REPLY",
        }
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a raw report type is neither BOARD nor REPLY.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownReportType(pub String);

impl fmt::Display for UnknownReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown report type: {:?}", self.0)
    }
}

impl std::error::Error for UnknownReportType {}

impl FromStr for ReportType {
    type Err = UnknownReportType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BOARD" => Ok(ReportType::Board),
            "REPLY" => Ok(ReportType::Reply),
            _ => Err(UnknownReportType(s.to_string())),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "reports")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub reporter_id: i32,
    pub reported_id: i32,
    pub content_type: ReportType,
    pub content_id: i32,
    pub reason: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub details: Option<String>,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::ReporterId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Reporter,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::ReportedId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Reported,
}

impl ActiveModelBehavior for ActiveModel {}
