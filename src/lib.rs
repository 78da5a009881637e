//! Archinara PM web service: request access gate for the `/pm` and `/work`
//! areas, session cookies, and the HTTP scaffolding around them.

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;
pub mod state;
