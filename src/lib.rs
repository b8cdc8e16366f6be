// ABOUTME: Library entry point for the workout tracker backend
// ABOUTME: Aggregates the store, service, and HTTP boundary modules
//
// SPDX-License-Identifier: MIT OR Apache-2.0

#![deny(unsafe_code)]

//! # Workout Tracker
//!
//! A personal fitness-tracking backend. Workouts, exercises, and sets are
//! three independently persisted collections related by foreign keys; the
//! aggregation service composes them into nested views, maintains append-only
//! sibling ordering, and cascades deletes. A thin axum boundary exposes the
//! operations over REST.
//!
//! ## Architecture
//!
//! - **models**: domain entities and the measure vocabulary
//! - **store**: document-store trait and the SQLite backend
//! - **service**: the aggregation and consistency layer
//! - **routes**: HTTP handlers with identifier validation
//! - **errors**: unified error taxonomy with HTTP mapping
//! - **config** / **logging**: environment-driven wiring

/// Environment-driven server configuration
pub mod config;

/// Unified error handling with HTTP response mapping
pub mod errors;

/// Structured logging initialization
pub mod logging;

/// Domain entities: workouts, exercises, sets, measures
pub mod models;

/// HTTP route handlers and identifier validation
pub mod routes;

/// Aggregation service over the three collections
pub mod service;

/// Document store trait and SQLite implementation
pub mod store;
