pub mod jwt;
pub mod minio;
pub mod password;
pub mod error;
