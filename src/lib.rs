//! Dermtrack - skin analysis history with derived progress statistics.
//!
//! # Overview
//!
//! Dermtrack keeps the on-device history of skin analyses: each analysis is
//! added when a scan completes, deleted on request, and persisted as a single
//! JSON array in a scoped key-value store. A fresh install is seeded with a
//! fixed demo history. Summary statistics (scan count, latest scan, tracked
//! conditions, improvement trend) are recomputed after every change.
//!
//! # Modules
//!
//! - [`model`]: Analysis records, findings and derived statistics types
//! - [`storage`]: SQLite-backed scoped key-value record store
//! - [`seed`]: Deterministic demo history for first run
//! - [`repository`]: In-memory newest-first history kept in sync with storage
//! - [`stats`]: Statistics derived from the history
//! - [`analysis`]: Mock analyzer producing new records
//! - [`config`]: Environment configuration
//! - [`api`]: HTTP API handlers

pub mod analysis;
pub mod api;
pub mod config;
pub mod model;
pub mod repository;
pub mod seed;
pub mod stats;
pub mod storage;
