//! Core engine for the olympiad platform: score recording, rank resolution,
//! cumulative standings, and coordinator incentives.
//!
//! The crate is organised around the [`competition`] module, which owns the
//! domain records and the services that operate on them. [`config`] and
//! [`telemetry`] carry the runtime wiring shared by every binary that embeds
//! the engine.

pub mod competition;
pub mod config;
pub mod error;
pub mod telemetry;
