pub mod auth;
pub mod categories;
pub mod posts;
pub mod uploads;
pub mod users;
