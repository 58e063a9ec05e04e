//! Shared numeric, time and coordinate helpers

pub mod celestial;
pub mod config;
pub mod hifi_time;
pub mod logger;
pub mod sexagesimal;
pub mod time_utils;
