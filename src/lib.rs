pub mod app;
pub mod clock;
pub mod config;
pub mod export;
pub mod format;
pub mod models;
pub mod portfolio;
pub mod storage;
