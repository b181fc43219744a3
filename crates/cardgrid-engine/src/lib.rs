#![forbid(unsafe_code)]

//! Interactive dashboard grid layout engine.
//!
//! Cards on a dashboard grid can be dragged to arbitrary cells, their
//! content height resized, and the resulting layout persisted and
//! restored across reloads and breakpoint changes. This crate owns the
//! gesture controllers, the layout store, and the [`GridEngine`] facade;
//! the pure geometry and data model live in `cardgrid-core`.
//!
//! # Architecture
//!
//! ```text
//! host adapter ── GestureInput ──▶ GridEngine ──▶ [HostCommand]
//!                                     │
//!                      ┌──────────────┼──────────────┐
//!                      ▼              ▼              ▼
//!                DragController ResizeController LayoutStore
//!                      │              │              │
//!                      └── geometry (cardgrid-core) ─┘
//! ```
//!
//! Everything is synchronous and single-threaded: geometry and command
//! generation happen on the caller's thread in response to pointer
//! events. The only deferred work is the debounced viewport resize,
//! driven by [`GridEngine::tick`].
//!
//! # Error Handling
//!
//! Gesture-path problems are never errors: invalid placements are
//! silently refused (the placeholder stays put), ignored inputs yield
//! [`HostCommand::Noop`] with a typed reason, and storage write failures
//! are logged and swallowed so the in-memory layout stays correct for the
//! session. The worst case is a layout that fails to persist.

pub mod command;
pub mod debounce;
pub mod drag;
pub mod engine;
pub mod resize;
pub mod store;

pub use command::{HostCommand, NoopReason};
pub use debounce::{DEFAULT_SETTLE_DELAY, ResizeDebouncer};
pub use drag::DragController;
pub use engine::{DEFAULT_DRAG_BIAS_X, EditModeListener, GridEngine};
pub use resize::{MIN_CONTENT_HEIGHT, ResizeController};
pub use store::{
    CardLayoutEntry, DRAG_OFFSET_STORAGE_KEY, FileStore, LAYOUT_SCHEMA_VERSION, LAYOUT_STORAGE_KEY,
    LayoutConfig, LayoutStore, MemoryStore, ParseSpanError, SpanDescriptor, StorageBackend,
    StoreError, StoreResult,
};
