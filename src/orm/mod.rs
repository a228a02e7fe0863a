//! SeaORM entities for the board tables touched by reporting.

pub mod articles;
pub mod boards;
pub mod replies;
pub mod reports;
pub mod users;
