/*
 * Themable child control. Holds its own `StyleManager`, the text colors for each
 * visual state, the font and the mouse-state tracker that selects between them.
 * A control that hosts other controls registers them in its `ThemeListeners`, so
 * the same type serves as both leaf and container.
 */
use crate::error::Result as PlatformResult;
use crate::mouse_state::{MouseState, MouseStateTracker};
use crate::styling_primitives::{Color, FontDescription};
use crate::theme::{ColorPalette, StyleId, StyleManager, Theme, ThemeSource};
use crate::theme_propagation::{SharedThemable, Themable, ThemeListeners};
use crate::types::{AppEvent, ControlId, EffectQueue, ElementId};

/// Text color per visual state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlColorState {
    pub enabled: Color,
    pub disabled: Color,
    pub hover: Color,
    pub pressed: Color,
}

impl ControlColorState {
    pub fn from_palette(palette: &ColorPalette) -> Self {
        Self {
            enabled: palette.text_enabled,
            disabled: palette.text_disabled,
            hover: palette.text_hover,
            pressed: palette.text_pressed,
        }
    }

    pub fn color_for(&self, state: MouseState) -> Color {
        match state {
            MouseState::Normal => self.enabled,
            MouseState::Hover => self.hover,
            MouseState::Pressed => self.pressed,
            MouseState::Disabled => self.disabled,
        }
    }
}

impl Default for ControlColorState {
    fn default() -> Self {
        Self {
            enabled: Color::BLACK,
            disabled: Color::rgb(131, 129, 129),
            hover: Color::BLACK,
            pressed: Color::BLACK,
        }
    }
}

#[derive(Debug)]
pub struct StyledControl {
    id: ControlId,
    style_manager: StyleManager,
    text_state: ControlColorState,
    font: FontDescription,
    mouse: MouseStateTracker,
    children: ThemeListeners,
}

impl StyledControl {
    /*
     * Creates a control rendered with `style`. The initial colors come from the
     * loaded theme; when it lacks the palette or text category the built-in
     * defaults stay in place until a complete theme arrives.
     */
    pub fn new(id: ControlId, style: StyleId, source: &dyn ThemeSource) -> Self {
        let style_manager = StyleManager::from_style(style, source);
        let mut control = Self {
            id,
            text_state: ControlColorState::default(),
            font: FontDescription::default(),
            mouse: MouseStateTracker::new(ElementId::Control(id)),
            children: ThemeListeners::new(),
            style_manager,
        };
        let theme = control.style_manager.theme().clone();
        if let Err(err) = control.copy_theme_fields(&theme) {
            log::warn!("StyledControl: control #{} keeps default colors: {err}", id.raw());
        }
        control
    }

    pub fn id(&self) -> ControlId {
        self.id
    }

    pub fn style_manager(&self) -> &StyleManager {
        &self.style_manager
    }

    pub fn text_state(&self) -> &ControlColorState {
        &self.text_state
    }

    /// Replaces the per-state text colors. Unchanged colors queue nothing.
    pub fn set_text_style(&mut self, text_state: ControlColorState, effects: &mut EffectQueue) -> bool {
        if self.text_state == text_state {
            return false;
        }
        self.text_state = text_state;
        effects.request_repaint(self.element_id());
        effects.emit(AppEvent::TextStyleChanged {
            source: self.element_id(),
        });
        true
    }

    pub fn font(&self) -> &FontDescription {
        &self.font
    }

    pub fn mouse_state(&self) -> MouseState {
        self.mouse.state()
    }

    /// Text color for the current visual state.
    pub fn text_color(&self) -> Color {
        self.text_state.color_for(self.mouse.state())
    }

    pub fn is_enabled(&self) -> bool {
        self.mouse.is_enabled()
    }

    pub fn set_enabled(&mut self, enabled: bool, effects: &mut EffectQueue) -> bool {
        self.mouse.set_enabled(enabled, effects)
    }

    pub fn on_focus_gained(&mut self, effects: &mut EffectQueue) -> bool {
        self.mouse.on_focus_gained(effects)
    }

    pub fn on_focus_lost(&mut self, effects: &mut EffectQueue) -> bool {
        self.mouse.on_focus_lost(effects)
    }

    pub fn on_pointer_enter(&mut self, effects: &mut EffectQueue) -> bool {
        self.mouse.on_pointer_enter(effects)
    }

    pub fn on_pointer_leave(&mut self, effects: &mut EffectQueue) -> bool {
        self.mouse.on_pointer_leave(effects)
    }

    pub fn on_pointer_down(&mut self, effects: &mut EffectQueue) -> bool {
        self.mouse.on_press(effects)
    }

    pub fn on_pointer_up(&mut self, effects: &mut EffectQueue) -> bool {
        self.mouse.on_release(effects)
    }

    pub fn add_child(&mut self, child: &SharedThemable) -> PlatformResult<ElementId> {
        self.children.register(child)
    }

    pub fn remove_child(&mut self, id: ElementId) -> bool {
        self.children.unregister(id)
    }

    pub fn children(&self) -> &ThemeListeners {
        &self.children
    }

    fn copy_theme_fields(&mut self, theme: &Theme) -> PlatformResult<()> {
        let palette = theme.color_palette()?;
        let text = theme.text_settings()?;
        self.text_state = ControlColorState::from_palette(palette);
        self.font = text.font.clone();
        Ok(())
    }
}

impl Themable for StyledControl {
    fn element_id(&self) -> ElementId {
        ElementId::Control(self.id)
    }

    fn apply_theme(&mut self, theme: &Theme, effects: &mut EffectQueue) -> PlatformResult<()> {
        self.copy_theme_fields(theme)?;
        self.style_manager = StyleManager::new(theme.clone());
        effects.request_repaint(self.element_id());
        effects.emit(AppEvent::ThemeChanged {
            source: self.element_id(),
            theme: theme.name().to_string(),
        });
        Ok(())
    }

    fn theme_listeners(&mut self) -> Option<&mut ThemeListeners> {
        Some(&mut self.children)
    }
}
