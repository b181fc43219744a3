#![forbid(unsafe_code)]

//! The grid layout engine facade.
//!
//! [`GridEngine`] is an explicitly constructed instance owning the card
//! registry, grid spec, gesture sessions, and layout store; the host page
//! injects it rather than holding layout state in ambient scope. It
//! consumes [`GestureInput`] events and returns [`HostCommand`]s for the
//! adapter to apply, all synchronously on the caller's thread.
//!
//! At most one drag session and one resize session exist system-wide,
//! mutually exclusive: starting either while the other (or itself) is
//! active is a guarded no-op. There is no cancel gesture; releasing the
//! pointer always ends the active session by committing its last valid
//! state.

use std::fmt;
use std::time::Instant;

use cardgrid_core::{
    Card, CardHitRegion, CardRegistry, CardSeed, CardSlot, GestureInput, GridSpec, PixelRect,
    PointerPoint, TrackRect, first_fit,
};

use crate::command::{HostCommand, NoopReason};
use crate::debounce::ResizeDebouncer;
use crate::drag::DragController;
use crate::resize::ResizeController;
use crate::store::{LayoutConfig, LayoutStore, StoreResult};

/// Default leftward visual bias of the floating card, in pixels.
pub const DEFAULT_DRAG_BIAS_X: i32 = 40;

/// Callback fired when edit mode is toggled.
///
/// Replaces attribute-mutation observation: the host registers a listener
/// and the engine notifies it explicitly (e.g. to show the edit-mode
/// instructions panel).
pub type EditModeListener = Box<dyn FnMut(bool) + Send>;

/// The interactive dashboard grid layout engine.
pub struct GridEngine {
    registry: CardRegistry,
    spec: GridSpec,
    container_origin: PointerPoint,
    drag: DragController,
    resize: ResizeController,
    debouncer: ResizeDebouncer,
    store: LayoutStore,
    edit_mode: bool,
    drag_offset_x: i32,
    edit_listener: Option<EditModeListener>,
}

impl GridEngine {
    /// Build an engine over the host page's cards in markup order.
    ///
    /// Cards get first-fit default placements for the current breakpoint;
    /// call [`restore`](Self::restore) afterwards to overlay a saved
    /// layout. The horizontal drag bias is read from its own storage key.
    #[must_use]
    pub fn new(spec: GridSpec, seeds: Vec<CardSeed>, store: LayoutStore) -> Self {
        let registry = CardRegistry::from_seeds(seeds, spec.column_count());
        let drag_offset_x = store.load_drag_offset().unwrap_or(DEFAULT_DRAG_BIAS_X);
        Self {
            registry,
            spec,
            container_origin: PointerPoint::default(),
            drag: DragController::default(),
            resize: ResizeController::default(),
            debouncer: ResizeDebouncer::default(),
            store,
            edit_mode: false,
            drag_offset_x,
            edit_listener: None,
        }
    }

    /// Load the persisted snapshot and apply it over the defaults.
    pub fn restore(&mut self) -> Vec<HostCommand> {
        let config = self.store.load();
        self.apply(&config)
    }

    /// Apply a layout config: cards present in it get their size class,
    /// placement, and custom height; absent cards keep markup defaults.
    ///
    /// Restored positions are trusted from the last save and not
    /// re-validated. Ends with a forced reflow to defeat stale cached
    /// grid measurements.
    pub fn apply(&mut self, config: &LayoutConfig) -> Vec<HostCommand> {
        let mut commands = Vec::new();
        for (slot, card) in self.registry.iter_mut() {
            let Some(id) = card.id.as_ref() else {
                continue;
            };
            let Some(entry) = config.cards.get(id.as_str()) else {
                continue;
            };
            card.size = entry.size;
            card.rect = TrackRect::at(entry.col.start, entry.row.start, entry.size.span());
            card.content_height = entry.height;
            card.from_markup = false;
            commands.push(HostCommand::SetSizeClass {
                card: slot,
                size: card.size,
            });
            commands.push(HostCommand::SetPlacement {
                card: slot,
                rect: card.rect,
            });
            if let Some(px) = card.content_height {
                commands.push(HostCommand::SetContentHeight { card: slot, px });
            }
        }
        commands.push(HostCommand::ForceReflow);
        commands
    }

    /// Handle one semantic gesture event.
    pub fn handle(&mut self, input: GestureInput) -> Vec<HostCommand> {
        match input {
            GestureInput::PointerDown {
                card,
                region,
                position,
                card_rect,
                content_height,
            } => self.pointer_down(card, region, position, card_rect, content_height),
            GestureInput::PointerMove { position } => self.pointer_move(position),
            GestureInput::PointerUp { .. } => self.pointer_up(),
            GestureInput::ResetHeight { card } => self.reset_height(card),
            GestureInput::ViewportResized { width } => {
                self.debouncer.submit(width, Instant::now());
                Vec::new()
            }
        }
    }

    /// Drive pending timers; call from the host's tick source.
    ///
    /// Applies a settled viewport resize when its delay has elapsed.
    pub fn tick(&mut self, now: Instant) -> Vec<HostCommand> {
        match self.debouncer.poll(now) {
            Some(width) => self.apply_viewport_width(width),
            None => Vec::new(),
        }
    }

    fn pointer_down(
        &mut self,
        card: CardSlot,
        region: CardHitRegion,
        position: PointerPoint,
        card_rect: PixelRect,
        content_height: Option<u16>,
    ) -> Vec<HostCommand> {
        if !self.edit_mode {
            return vec![HostCommand::noop(NoopReason::EditModeDisabled)];
        }
        if self.drag.is_active() || self.resize.is_active() {
            return vec![HostCommand::noop(NoopReason::SessionAlreadyActive)];
        }
        if self.registry.get(card).is_none() {
            return vec![HostCommand::noop(NoopReason::UnknownCard)];
        }
        match region {
            CardHitRegion::Control => vec![HostCommand::noop(NoopReason::ControlRegion)],
            CardHitRegion::Body => self.drag.start(&self.registry, card, position, card_rect),
            CardHitRegion::ResizeHandle => {
                let Some(height) = content_height else {
                    return vec![HostCommand::noop(NoopReason::MissingContentElement)];
                };
                self.resize.start(card, height, position);
                Vec::new()
            }
        }
    }

    fn pointer_move(&mut self, position: PointerPoint) -> Vec<HostCommand> {
        if self.drag.is_active() {
            self.drag.update(
                &self.registry,
                &self.spec,
                self.container_origin,
                self.drag_offset_x,
                position,
            )
        } else if self.resize.is_active() {
            self.resize.update(&mut self.registry, position)
        } else {
            vec![HostCommand::noop(NoopReason::NoActiveSession)]
        }
    }

    fn pointer_up(&mut self) -> Vec<HostCommand> {
        if self.drag.is_active() {
            let (commands, _) = self.drag.finish(&mut self.registry);
            self.persist();
            commands
        } else if self.resize.is_active() {
            self.resize.finish();
            self.persist();
            Vec::new()
        } else {
            vec![HostCommand::noop(NoopReason::NoActiveSession)]
        }
    }

    fn reset_height(&mut self, card: CardSlot) -> Vec<HostCommand> {
        if !self.edit_mode {
            return vec![HostCommand::noop(NoopReason::EditModeDisabled)];
        }
        let Some(tracked) = self.registry.get_mut(card) else {
            return vec![HostCommand::noop(NoopReason::UnknownCard)];
        };
        tracked.content_height = None;
        self.persist();
        vec![HostCommand::ClearContentHeight { card }]
    }

    /// Recompute the grid for a settled viewport width.
    ///
    /// Markup-placed cards, and cards whose saved placement no longer
    /// fits the new track count, lose their inline placement and reflow
    /// first-fit in markup order; explicitly placed cards that still fit
    /// keep their cells. Ends with a save and a forced reflow.
    fn apply_viewport_width(&mut self, width: u32) -> Vec<HostCommand> {
        self.spec.container_width = width;
        let column_count = self.spec.column_count();
        tracing::debug!(width, columns = column_count, "viewport resize settled");

        let mut commands = Vec::new();
        let mut cleared: Vec<CardSlot> = Vec::new();
        let mut fixed: Vec<TrackRect> = Vec::new();
        for (slot, card) in self.registry.iter_mut() {
            if card.from_markup || !card.rect.fits(column_count) {
                card.from_markup = true;
                cleared.push(slot);
                commands.push(HostCommand::ClearInlinePosition { card: slot });
            } else {
                fixed.push(card.rect);
            }
        }
        for slot in cleared {
            let Some(card) = self.registry.get_mut(slot) else {
                continue;
            };
            let rect = first_fit(card.size.span(), column_count, &fixed);
            card.rect = rect;
            fixed.push(rect);
        }
        self.persist();
        commands.push(HostCommand::ForceReflow);
        commands
    }

    /// Persist the committed layout, swallowing storage failures so the
    /// in-memory layout stays correct for the current session.
    fn persist(&mut self) {
        if let Err(e) = self.store.save(&self.registry) {
            tracing::warn!(error = %e, "layout save failed; keeping in-memory layout");
        }
    }

    /// Persist the current layout now.
    pub fn save(&mut self) {
        self.persist();
    }

    /// Toggle edit mode, gating all drag/resize gestures.
    ///
    /// Leaving edit mode saves the layout; any registered listener is
    /// notified on every change.
    pub fn set_edit_mode(&mut self, enabled: bool) {
        if self.edit_mode == enabled {
            return;
        }
        self.edit_mode = enabled;
        if !enabled {
            self.persist();
        }
        if let Some(listener) = self.edit_listener.as_mut() {
            listener(enabled);
        }
    }

    /// Register the edit-mode listener, replacing any previous one.
    pub fn on_edit_mode(&mut self, listener: impl FnMut(bool) + Send + 'static) {
        self.edit_listener = Some(Box::new(listener));
    }

    /// Delete the persisted snapshot. The host must fully reinitialize
    /// (reload) afterwards; the engine does not recompute defaults.
    pub fn reset_layout(&self) -> StoreResult<()> {
        self.store.reset()
    }

    /// Set the container's viewport origin used to translate pointer
    /// coordinates into container-relative ones.
    pub fn set_container_origin(&mut self, origin: PointerPoint) {
        self.container_origin = origin;
    }

    /// Set and persist the horizontal drag bias.
    pub fn set_drag_offset_x(&mut self, offset: i32) {
        self.drag_offset_x = offset;
        if let Err(e) = self.store.save_drag_offset(offset) {
            tracing::warn!(error = %e, "drag offset save failed");
        }
    }

    /// Current horizontal drag bias.
    #[must_use]
    pub const fn drag_offset_x(&self) -> i32 {
        self.drag_offset_x
    }

    /// Whether gestures are currently accepted.
    #[must_use]
    pub const fn edit_mode(&self) -> bool {
        self.edit_mode
    }

    /// True while any gesture session is active.
    #[must_use]
    pub fn gesture_active(&self) -> bool {
        self.drag.is_active() || self.resize.is_active()
    }

    /// Current track count.
    #[must_use]
    pub const fn column_count(&self) -> u16 {
        self.spec.column_count()
    }

    /// The tracked cards.
    #[must_use]
    pub fn registry(&self) -> &CardRegistry {
        &self.registry
    }

    /// Card at a slot.
    #[must_use]
    pub fn card(&self, slot: CardSlot) -> Option<&Card> {
        self.registry.get(slot)
    }
}

impl fmt::Debug for GridEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GridEngine")
            .field("cards", &self.registry.len())
            .field("columns", &self.spec.column_count())
            .field("edit_mode", &self.edit_mode)
            .field("drag_active", &self.drag.is_active())
            .field("resize_active", &self.resize.is_active())
            .field("store", &self.store)
            .finish()
    }
}


#[cfg(test)]
impl GridEngine {
    /// Test helper: snapshot the registry as the store would persist it.
    pub(crate) fn store_snapshot(&self) -> LayoutConfig {
        LayoutConfig::snapshot(&self.registry)
    }
}
