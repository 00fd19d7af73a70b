pub mod auth;
pub mod documents;
pub mod health;
pub mod notes;
pub mod students;
pub mod users;
