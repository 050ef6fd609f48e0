//! Component model for the BuildEasy application builder.
//!
//! This crate is the editor's core and has no I/O of its own. It owns the
//! component registry, builds component instances from it, keeps the canvas
//! state with a bounded undo/redo history, defines how raw property input is
//! edited into typed values, and projects components to preview HTML. The
//! backend and the CLI only touch it at load/save time through
//! [`document::Document`].
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`registry`] | Static component definitions, defaults and property schemas |
//! | [`component`] | Component instances and the instance factory |
//! | [`store`] | Canvas store: components, selection, view settings, history |
//! | [`history`] | Linear snapshot history with a fixed capacity |
//! | [`editor`] | Property fields, input coercion, write-through edits |
//! | [`document`] | Exported/imported layout document |
//! | [`render`] | Preview HTML for components |
//! | [`consts`] | Shared constants (history limit, zoom limits, versions) |

pub mod component;
pub mod consts;
pub mod document;
pub mod editor;
pub mod history;
pub mod registry;
pub mod render;
pub mod store;

pub use component::{BuilderError, ComponentInstance, create};
pub use document::{Document, ImportIssue, ImportOutcome};
pub use store::CanvasStore;
