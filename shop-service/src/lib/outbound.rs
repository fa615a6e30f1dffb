pub mod cache;
pub mod mail;
pub mod repositories;
pub mod storage;
