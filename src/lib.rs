//! Terminal hardware monitor.
//!
//! The interesting part is [`sampler::run`]: a periodic sampling loop that
//! polls a [`sampler::MetricsProvider`], hands each result to a
//! [`sampler::Render`], and stops cleanly on Ctrl+C, after a bounded duration,
//! or when the provider gives up.

pub mod config;
pub mod format;
pub mod logging;
pub mod render;
pub mod sampler;
pub mod system;
