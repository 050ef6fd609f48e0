//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. The
//! backend keeps no in-memory editor state: every request loads what it needs
//! from Postgres, works on a `builder::Document`, and writes it back.

use sqlx::PgPool;

/// Shared application state. Clone is required by Axum; `PgPool` is an `Arc`
/// internally.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
}

impl AppState {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
