pub mod current_user;
pub mod password;
pub mod session;
