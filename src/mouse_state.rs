/*
 * Per-element visual interaction state. The tracker is the single source of
 * truth the paint code reads to pick colors. Every effective transition queues
 * exactly one repaint followed by one `MouseStateChanged` event; transitions to
 * the current value queue nothing. While the element is disabled, pointer and
 * focus input cannot move it out of `Disabled`.
 */
use crate::types::{AppEvent, EffectQueue, ElementId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum MouseState {
    #[default]
    Normal,
    Hover,
    Pressed,
    Disabled,
}

#[derive(Debug, Clone)]
pub struct MouseStateTracker {
    owner: ElementId,
    state: MouseState,
    enabled: bool,
}

impl MouseStateTracker {
    pub fn new(owner: ElementId) -> Self {
        Self {
            owner,
            state: MouseState::Normal,
            enabled: true,
        }
    }

    pub fn state(&self) -> MouseState {
        self.state
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /*
     * Sets the state directly. Returns whether anything changed. The repaint is
     * queued before the notification so listeners observing the event can rely
     * on the invalidation already being requested.
     */
    pub fn set_state(&mut self, state: MouseState, effects: &mut EffectQueue) -> bool {
        if self.state == state {
            return false;
        }
        log::trace!(
            "MouseState: {} {:?} -> {:?}",
            self.owner,
            self.state,
            state
        );
        self.state = state;
        effects.request_repaint(self.owner);
        effects.emit(AppEvent::MouseStateChanged {
            source: self.owner,
            state,
        });
        true
    }

    fn transition(&mut self, state: MouseState, effects: &mut EffectQueue) -> bool {
        if !self.enabled {
            return false;
        }
        self.set_state(state, effects)
    }

    pub fn on_focus_gained(&mut self, effects: &mut EffectQueue) -> bool {
        self.transition(MouseState::Hover, effects)
    }

    pub fn on_pointer_enter(&mut self, effects: &mut EffectQueue) -> bool {
        self.transition(MouseState::Hover, effects)
    }

    pub fn on_focus_lost(&mut self, effects: &mut EffectQueue) -> bool {
        self.transition(MouseState::Normal, effects)
    }

    pub fn on_pointer_leave(&mut self, effects: &mut EffectQueue) -> bool {
        self.transition(MouseState::Normal, effects)
    }

    pub fn on_press(&mut self, effects: &mut EffectQueue) -> bool {
        self.transition(MouseState::Pressed, effects)
    }

    /// Releasing over the element returns it to hover.
    pub fn on_release(&mut self, effects: &mut EffectQueue) -> bool {
        if self.state != MouseState::Pressed {
            return false;
        }
        self.transition(MouseState::Hover, effects)
    }

    pub fn set_enabled(&mut self, enabled: bool, effects: &mut EffectQueue) -> bool {
        if self.enabled == enabled {
            return false;
        }
        self.enabled = enabled;
        let target = if enabled {
            MouseState::Normal
        } else {
            MouseState::Disabled
        };
        self.set_state(target, effects)
    }
}
