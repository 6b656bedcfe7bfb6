pub mod series;
pub mod users;
