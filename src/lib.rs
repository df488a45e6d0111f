//! xpdash: a personal analytics dashboard for the school platform.
//!
//! The pipeline runs one way: [`session`] gate → [`api`] fetch →
//! [`records`] normalization → [`stats`] → [`chart`] geometry → [`render`].
//! [`cli`] and [`web`] are the two front ends over [`pipeline`].

pub mod api;
pub mod chart;
pub mod cli;
pub mod config;
pub mod error;
pub mod events;
pub mod pipeline;
pub mod records;
pub mod render;
pub mod session;
pub mod stats;
pub mod web;

pub use error::{DashboardError, DashboardResult};
