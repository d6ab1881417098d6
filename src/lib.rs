pub mod config;
pub mod forecast;
pub mod models;
pub mod provider;
pub mod stats;
pub mod storage;

pub mod api;
pub mod auth;
