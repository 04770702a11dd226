pub mod resume;
pub mod role;
pub mod score;
pub mod user;
