//! Locale-aware content gateway for a multilingual travel blog.

pub mod cms;
pub mod config;
pub mod contact;
pub mod content;
pub mod cookie;
pub mod i18n;
pub mod mapper;
pub mod middleware;
pub mod model;
pub mod pages;
pub mod query;
pub mod search;
pub mod server;
