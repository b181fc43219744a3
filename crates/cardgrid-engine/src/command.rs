#![forbid(unsafe_code)]

//! Host commands emitted by the engine.
//!
//! Every observable side effect of a gesture is an explicit command the
//! host adapter applies to the rendered tree (style mutation on the
//! floating card and placeholder only; the grid as a whole reflows just
//! on commit/apply). Inputs that are safely ignored produce a [`Noop`]
//! with a typed reason instead of an error, so adapters and tests can
//! assert on why nothing happened.
//!
//! [`Noop`]: HostCommand::Noop

use serde::{Deserialize, Serialize};

use cardgrid_core::{CardSlot, SizeClass, TrackRect};

/// Why an input was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoopReason {
    /// Gestures are gated off while edit mode is disabled.
    EditModeDisabled,
    /// A drag or resize session is already active.
    SessionAlreadyActive,
    /// The slot does not name a tracked card.
    UnknownCard,
    /// Pointer-down on a button or other control.
    ControlRegion,
    /// Move/up arrived with no session in progress.
    NoActiveSession,
    /// The card has no content sub-element, so resize is not wired up.
    MissingContentElement,
}

/// One side effect for the host adapter to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum HostCommand {
    /// Switch the card to viewport-relative positioning at the given
    /// top-left corner so it tracks the pointer directly.
    FloatCard { card: CardSlot, x: i32, y: i32 },
    /// Return the card to normal grid-flow positioning.
    RestoreFlow { card: CardSlot },
    /// Insert the drop-preview placeholder at a grid rectangle, sized to
    /// the dragged card's current pixel height.
    ShowPlaceholder { rect: TrackRect, height: i32 },
    /// Move the placeholder to a new valid grid rectangle.
    MovePlaceholder { rect: TrackRect },
    /// Remove the placeholder.
    RemovePlaceholder,
    /// Set a card's committed grid placement.
    SetPlacement { card: CardSlot, rect: TrackRect },
    /// Set a card's size-class marker.
    SetSizeClass { card: CardSlot, size: SizeClass },
    /// Set a card's content height in pixels.
    SetContentHeight { card: CardSlot, px: u16 },
    /// Clear a card's custom content height, restoring natural height.
    ClearContentHeight { card: CardSlot },
    /// Drop a card's inline placement so it falls back to natural flow.
    ClearInlinePosition { card: CardSlot },
    /// Toggle the layout-invalidation marker to defeat stale cached grid
    /// measurements.
    ForceReflow,
    /// Input was ignored.
    Noop { reason: NoopReason },
}

impl HostCommand {
    /// Convenience constructor for ignored inputs.
    #[must_use]
    pub const fn noop(reason: NoopReason) -> Self {
        HostCommand::Noop { reason }
    }
}

#[cfg(test)]
mod tests {
    use super::{HostCommand, NoopReason};
    use cardgrid_core::{CardSlot, TrackRect};

    #[test]
    fn commands_round_trip_through_json() {
        let commands = vec![
            HostCommand::FloatCard {
                card: CardSlot(1),
                x: -20,
                y: 44,
            },
            HostCommand::ShowPlaceholder {
                rect: TrackRect::new(3, 1, 2, 1),
                height: 240,
            },
            HostCommand::RemovePlaceholder,
            HostCommand::noop(NoopReason::EditModeDisabled),
        ];
        for command in commands {
            let json = serde_json::to_string(&command).unwrap();
            let back: HostCommand = serde_json::from_str(&json).unwrap();
            assert_eq!(back, command);
        }
    }

    #[test]
    fn noop_reasons_serialize_snake_case() {
        let json = serde_json::to_string(&HostCommand::noop(NoopReason::SessionAlreadyActive)).unwrap();
        assert!(json.contains("session_already_active"));
    }
}
