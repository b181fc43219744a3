#![forbid(unsafe_code)]

//! Host-agnostic data model and geometry for the dashboard card grid.
//!
//! This crate defines the pure parts of the layout engine:
//!
//! - [`SizeClass`] - fixed card footprints and their track spans
//! - [`TrackRect`] - occupied rectangles in grid track coordinates
//! - [`GridSpec`] - responsive column derivation and pointer-to-cell mapping
//! - [`CardRegistry`] - the arena of tracked cards
//! - [`GestureInput`] - semantic pointer events emitted by host adapters
//!
//! Everything here is synchronous and free of host (DOM) types; adapters
//! translate raw pointer/touch events into [`GestureInput`] and apply the
//! engine's commands back to the rendered tree.

pub mod card;
pub mod event;
pub mod geometry;
pub mod grid;
pub mod size;

pub use card::{Card, CardId, CardIdError, CardRegistry, CardSeed, CardSlot};
pub use event::{CardHitRegion, GestureInput, PointerPoint};
pub use geometry::{PixelRect, TrackRect, cell_from_point, clamp_to_columns, first_fit, is_placement_valid};
pub use grid::GridSpec;
pub use size::{ParseSizeClassError, SizeClass, Span};
