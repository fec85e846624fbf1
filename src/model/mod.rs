pub mod user;
pub mod client;
pub mod quote;
pub mod meeting;
pub mod document;
