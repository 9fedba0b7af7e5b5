//! Jobscope: a terminal dashboard for a job-posting crawl and analysis backend

pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod infrastructure;
pub mod logging;
pub mod modules;
pub mod ui;
