pub mod auth;
pub mod series;
