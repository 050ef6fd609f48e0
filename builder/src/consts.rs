//! Shared constants for the builder crate.

// ── History ─────────────────────────────────────────────────────

/// Maximum number of snapshots kept for undo/redo.
pub const HISTORY_LIMIT: usize = 50;

// ── View ────────────────────────────────────────────────────────

/// Smallest allowed canvas zoom factor.
pub const ZOOM_MIN: f64 = 0.25;

/// Largest allowed canvas zoom factor.
pub const ZOOM_MAX: f64 = 2.0;

/// Zoom change applied by a single zoom-in/zoom-out step.
pub const ZOOM_STEP: f64 = 0.1;

// ── Documents ───────────────────────────────────────────────────

/// Version string stamped on exported documents.
pub const DOCUMENT_VERSION: &str = "1.0.0";

/// Prefix for generated component ids.
pub const COMPONENT_ID_PREFIX: &str = "component_";
