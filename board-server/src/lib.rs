//! Station departure board server.
//!
//! Shows the trains approaching one station, split into outbound and
//! inbound boards and sorted by departure time, and keeps that view fresh
//! with a rate-limited manual refresh and an optional auto-refresh.

pub mod arrivals;
pub mod board;
pub mod config;
pub mod refresh;
pub mod web;
