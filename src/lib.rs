//! Content reporting for the community board.
//!
//! Users flag articles or replies they consider abusive. Reports are
//! validated against the board's users, articles and replies and stored
//! inside a single database transaction.

pub mod app_config;
pub mod db;
pub mod orm;
pub mod report;
