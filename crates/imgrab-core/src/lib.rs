pub mod config;
pub mod logging;

pub mod audit;
pub mod browser;
pub mod downloader;
pub mod fetch;
pub mod keywords;
pub mod link;
pub mod retry;
pub mod scheduler;
pub mod source;
pub mod storage;
pub mod traversal;
pub mod url_model;
