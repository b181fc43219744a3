#![forbid(unsafe_code)]

//! Semantic gesture input events.
//!
//! Host adapters translate raw mouse/touch events into these before the
//! engine sees them: hit-testing (which card, which sub-element) happens
//! at the adapter boundary, so the engine never inspects the rendered
//! tree. Events are serde-tagged for replay in tests and diagnostics.

use serde::{Deserialize, Serialize};

use crate::card::CardSlot;
use crate::geometry::PixelRect;

/// A pointer position in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PointerPoint {
    pub x: i32,
    pub y: i32,
}

impl PointerPoint {
    /// Create a pointer position.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Which part of a card a pointer-down landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardHitRegion {
    /// The card body: starts a drag.
    Body,
    /// The resize handle sub-element: starts a content resize.
    ResizeHandle,
    /// A button or other interactive control: never starts a gesture.
    Control,
}

/// One semantic gesture event from the host adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GestureInput {
    /// Pointer pressed on a card.
    PointerDown {
        /// The card under the pointer.
        card: CardSlot,
        /// Sub-element that was hit.
        region: CardHitRegion,
        /// Pointer position in viewport pixels.
        position: PointerPoint,
        /// The card's current on-screen bounds.
        card_rect: PixelRect,
        /// Rendered height of the card's content sub-element, if the
        /// card has one. Absent means resize is not wired up.
        content_height: Option<u16>,
    },
    /// Pointer moved anywhere on the page.
    PointerMove { position: PointerPoint },
    /// Pointer released anywhere on the page.
    PointerUp { position: PointerPoint },
    /// Double-activation on a card's resize handle: reset its content
    /// height to natural.
    ResetHeight { card: CardSlot },
    /// The viewport was resized to a new width.
    ViewportResized { width: u32 },
}
