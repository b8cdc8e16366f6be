// ABOUTME: Shared test utilities for integration tests
// ABOUTME: In-memory store and service construction helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
#![allow(dead_code, clippy::unwrap_used)]

//! Shared test setup for `workout_tracker` integration tests

use std::sync::{Arc, Once};

use workout_tracker::service::WorkoutService;
use workout_tracker::store::SqliteStore;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Fresh in-memory document store with migrations applied
pub async fn create_test_store() -> Arc<SqliteStore> {
    init_test_logging();
    Arc::new(SqliteStore::new("sqlite::memory:").await.unwrap())
}

/// Service wired to a fresh in-memory store
pub async fn create_test_service() -> (WorkoutService, Arc<SqliteStore>) {
    let store = create_test_store().await;
    (WorkoutService::new(store.clone()), store)
}
