#![forbid(unsafe_code)]

//! The live content-resize gesture.
//!
//! State machine over {Idle, Resizing}, mutually exclusive with dragging.
//! Resize adjusts a card's content height only; the column/row span is a
//! function of the size class and is never touched here. A fixed floor
//! keeps the content from collapsing no matter how far the pointer moves
//! upward.

use cardgrid_core::{CardRegistry, CardSlot, PointerPoint};

use crate::command::HostCommand;

/// Minimum content height in pixels.
pub const MIN_CONTENT_HEIGHT: u16 = 50;

/// In-progress resize session.
#[derive(Debug, Clone, Copy)]
struct ResizeSession {
    card: CardSlot,
    /// Rendered content height at gesture start.
    start_height: u16,
    /// Pointer Y at gesture start.
    start_y: i32,
}

/// Owns the resize gesture lifecycle.
#[derive(Debug, Default)]
pub struct ResizeController {
    session: Option<ResizeSession>,
}

impl ResizeController {
    /// True while a resize session is in progress.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// The card being resized, if any.
    #[must_use]
    pub fn active_card(&self) -> Option<CardSlot> {
        self.session.as_ref().map(|s| s.card)
    }

    /// Begin a resize from a card's handle.
    ///
    /// The caller has already checked edit mode, session exclusivity, and
    /// that the card exposes a content element (`content_height`).
    pub fn start(&mut self, card: CardSlot, content_height: u16, position: PointerPoint) {
        debug_assert!(self.session.is_none());
        self.session = Some(ResizeSession {
            card,
            start_height: content_height,
            start_y: position.y,
        });
        tracing::debug!(card = %card, start_height = content_height, "resize started");
    }

    /// Track a pointer move, applying the new height directly to the
    /// content element and marking the card as custom-height.
    pub fn update(&mut self, registry: &mut CardRegistry, position: PointerPoint) -> Vec<HostCommand> {
        let Some(session) = self.session.as_ref() else {
            return Vec::new();
        };
        let delta = position.y - session.start_y;
        let raw = i32::from(session.start_height) + delta;
        let height = raw.clamp(i32::from(MIN_CONTENT_HEIGHT), i32::from(u16::MAX)) as u16;
        if let Some(card) = registry.get_mut(session.card) {
            card.content_height = Some(height);
        }
        vec![HostCommand::SetContentHeight {
            card: session.card,
            px: height,
        }]
    }

    /// End the resize. Returns the resized card so the caller can persist.
    pub fn finish(&mut self) -> Option<CardSlot> {
        let session = self.session.take()?;
        tracing::debug!(card = %session.card, "resize finished");
        Some(session.card)
    }
}
