#![forbid(unsafe_code)]

//! The live drag gesture.
//!
//! State machine over {Idle, Dragging}. While dragging, the card is a
//! floating viewport-positioned copy following the pointer, and a
//! placeholder previews the drop cell. Each move maps the pointer into a
//! candidate cell, clamps it to the column axis, and validates it against
//! every other card; an invalid candidate leaves the placeholder at its
//! last valid rectangle so the card visually refuses an illegal drop.
//!
//! Lifecycle invariants:
//!
//! 1. Exactly one `start` per session, before any `update`.
//! 2. `finish` always returns the machine to Idle and never fails: a drag
//!    that found no valid cell commits nothing and the card keeps its
//!    last committed position.
//! 3. The dragged card is excluded from its own collision checks.

use cardgrid_core::{
    CardRegistry, CardSlot, GridSpec, PixelRect, PointerPoint, TrackRect, cell_from_point,
    clamp_to_columns, is_placement_valid,
};

use crate::command::HostCommand;

/// In-progress drag session. Created on gesture start, destroyed on end.
#[derive(Debug, Clone, Copy)]
struct DragSession {
    card: CardSlot,
    /// Pointer offset from the card's center at grab time.
    grab_dx: i32,
    grab_dy: i32,
    /// Half the card's on-screen size, for center-to-corner conversion.
    half_w: i32,
    half_h: i32,
    /// Committed placement at gesture start.
    origin: TrackRect,
    /// Where the placeholder currently sits.
    placeholder: Option<TrackRect>,
    /// Most recent candidate that passed validation.
    last_valid: Option<TrackRect>,
}

/// Owns the drag gesture lifecycle.
#[derive(Debug, Default)]
pub struct DragController {
    session: Option<DragSession>,
}

impl DragController {
    /// True while a drag session is in progress.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// The card being dragged, if any.
    #[must_use]
    pub fn active_card(&self) -> Option<CardSlot> {
        self.session.as_ref().map(|s| s.card)
    }

    /// Begin a drag on a card's body.
    ///
    /// The caller has already checked edit mode and session exclusivity.
    /// Floats the card at its current on-screen corner and inserts the
    /// placeholder at the pre-drag placement, sized to the card's
    /// current pixel height.
    pub fn start(
        &mut self,
        registry: &CardRegistry,
        card: CardSlot,
        position: PointerPoint,
        card_rect: PixelRect,
    ) -> Vec<HostCommand> {
        debug_assert!(self.session.is_none());
        let Some(tracked) = registry.get(card) else {
            return Vec::new();
        };
        let (cx, cy) = card_rect.center();
        let origin = tracked.rect;
        self.session = Some(DragSession {
            card,
            grab_dx: position.x - cx,
            grab_dy: position.y - cy,
            half_w: card_rect.width / 2,
            half_h: card_rect.height / 2,
            origin,
            placeholder: Some(origin),
            last_valid: None,
        });
        tracing::debug!(card = %card, ?origin, "drag started");
        vec![
            HostCommand::FloatCard {
                card,
                x: card_rect.x,
                y: card_rect.y,
            },
            HostCommand::ShowPlaceholder {
                rect: origin,
                height: card_rect.height,
            },
        ]
    }

    /// Track a pointer move.
    ///
    /// Repositions only the floating card and, when the candidate cell is
    /// valid, the placeholder; nothing else reflows mid-gesture.
    pub fn update(
        &mut self,
        registry: &CardRegistry,
        spec: &GridSpec,
        container_origin: PointerPoint,
        bias_x: i32,
        position: PointerPoint,
    ) -> Vec<HostCommand> {
        let Some(session) = self.session.as_mut() else {
            return Vec::new();
        };
        let Some(tracked) = registry.get(session.card) else {
            return Vec::new();
        };

        // Follow the pointer, shifted left by the visual bias so the card
        // does not sit directly under the pointer.
        let float_x = position.x - session.grab_dx - session.half_w - bias_x;
        let float_y = position.y - session.grab_dy - session.half_h;
        let mut commands = vec![HostCommand::FloatCard {
            card: session.card,
            x: float_x,
            y: float_y,
        }];

        let span = tracked.size.span();
        let column_count = spec.column_count();
        let rel_x = f64::from(position.x - container_origin.x);
        let rel_y = f64::from(position.y - container_origin.y);
        let (col0, row0) = cell_from_point(rel_x, rel_y, spec.cell_width(), f64::from(spec.row_height));
        let col0 = clamp_to_columns(col0, span.cols, column_count);
        // Saturate the 1-based conversion: a pointer parked far below the
        // grid maps to the last representable row instead of overflowing.
        let candidate = TrackRect::at(col0.saturating_add(1), row0.saturating_add(1), span);

        let occupied = registry.occupied_rects_excluding(session.card);
        if is_placement_valid(candidate, column_count, &occupied) {
            session.last_valid = Some(candidate);
            if session.placeholder != Some(candidate) {
                session.placeholder = Some(candidate);
                commands.push(HostCommand::MovePlaceholder { rect: candidate });
            }
        }
        commands
    }

    /// End the drag: commit the placeholder cell (or the last valid
    /// candidate), remove the placeholder, and restore grid flow.
    ///
    /// Returns the commands plus `true` when a placement was committed to
    /// the registry.
    pub fn finish(&mut self, registry: &mut CardRegistry) -> (Vec<HostCommand>, bool) {
        let Some(session) = self.session.take() else {
            return (Vec::new(), false);
        };
        let mut commands = Vec::new();
        let mut committed = false;
        let target = session.placeholder.or(session.last_valid);
        if let Some(rect) = target
            && let Some(card) = registry.get_mut(session.card)
        {
            card.rect = rect;
            card.from_markup = false;
            committed = true;
            commands.push(HostCommand::SetPlacement {
                card: session.card,
                rect,
            });
            tracing::debug!(card = %session.card, ?rect, "drag committed");
        }
        commands.push(HostCommand::RemovePlaceholder);
        commands.push(HostCommand::RestoreFlow { card: session.card });
        (commands, committed)
    }
}
