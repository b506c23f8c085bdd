pub mod config;
pub mod key;
pub mod monitor;
pub mod s3;
