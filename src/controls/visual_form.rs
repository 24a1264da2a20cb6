/*
 * Themed top-level window with custom chrome.
 *
 * `VisualForm` composes the independent pieces: a `WindowChrome` for the
 * borderless window behavior, a `MouseStateTracker` for the border highlight, a
 * `StyleManager` plus the colors and font copied out of its theme, and a
 * `ThemeListeners` registry for the controls it hosts. Window and dialog differ
 * only in configuration, selected through `WindowVariant` and `FormConfig`.
 */
use crate::error::Result as PlatformResult;
use crate::mouse_state::{MouseState, MouseStateTracker};
use crate::styling_primitives::{Border, Color, FontDescription, ShapeType, TitleAlignment};
use crate::theme::{StyleId, StyleManager, Theme, ThemeSource};
use crate::theme_propagation::{SharedThemable, Themable, ThemeListeners};
use crate::types::message_codes::{SC_MAXIMIZE, SC_MINIMIZE, SC_RESTORE};
use crate::types::{
    AppEvent, CursorKind, EffectQueue, ElementId, MessageDisposition, MouseButton, PlatformMessage,
    Point, Rect, Size, WindowId,
};
use crate::window_chrome::{ChromeConfig, CursorSnapshot, ResizeDirection, WindowChrome};

/// Horizontal inset of the window icon inside the title bar.
pub const ICON_MARGIN: i32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowVariant {
    #[default]
    Form,
    Dialog,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormConfig {
    pub variant: WindowVariant,
    pub size: Size,
    pub sizable: bool,
    pub magnetic: bool,
    pub magnetic_radius: i32,
    pub title_alignment: TitleAlignment,
    pub window_bar_height: i32,
    pub border_thickness: i32,
    pub border_shape: ShapeType,
    /// Style the form starts with; also what new child controls should use.
    pub style: StyleId,
    pub show_icon: bool,
    pub icon_size: Size,
    pub minimize_box: bool,
    pub maximize_box: bool,
    pub design_mode: bool,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            variant: WindowVariant::Form,
            size: Size::new(640, 480),
            sizable: true,
            magnetic: false,
            magnetic_radius: 100,
            title_alignment: TitleAlignment::Center,
            window_bar_height: 30,
            border_thickness: Border::DEFAULT_THICKNESS,
            border_shape: ShapeType::Rectangle,
            style: StyleId::Visual,
            show_icon: true,
            icon_size: Size::new(16, 16),
            minimize_box: true,
            maximize_box: true,
            design_mode: false,
        }
    }
}

impl FormConfig {
    /// Fixed-size, left-titled window without icon or minimize/maximize boxes.
    pub fn dialog() -> Self {
        Self {
            variant: WindowVariant::Dialog,
            size: Size::new(400, 250),
            sizable: false,
            title_alignment: TitleAlignment::Left,
            show_icon: false,
            minimize_box: false,
            maximize_box: false,
            ..Self::default()
        }
    }

    fn chrome_config(&self) -> ChromeConfig {
        ChromeConfig {
            sizable: self.sizable,
            magnetic: self.magnetic,
            magnetic_radius: self.magnetic_radius,
            border_thickness: self.border_thickness,
            window_bar_height: self.window_bar_height,
            design_mode: self.design_mode,
        }
    }
}

/*
 * Icon rectangle inside the title bar: fixed left inset, vertically centered.
 * Returns `None` when the form shows no icon.
 */
pub fn icon_bounds(icon_size: Option<Size>, window_bar_height: i32) -> Option<Rect> {
    icon_size.map(|size| {
        Rect::new(
            ICON_MARGIN,
            window_bar_height / 2 - size.height / 2,
            size.width,
            size.height,
        )
    })
}

#[derive(Debug)]
pub struct VisualForm {
    id: WindowId,
    variant: WindowVariant,
    title: String,
    style_manager: StyleManager,
    border: Border,
    background: Color,
    window_bar_color: Color,
    fore_color: Color,
    font: FontDescription,
    title_alignment: TitleAlignment,
    icon_size: Option<Size>,
    icon_bounds: Option<Rect>,
    minimize_box: bool,
    maximize_box: bool,
    chrome: WindowChrome,
    mouse: MouseStateTracker,
    children: ThemeListeners,
}

impl VisualForm {
    pub fn new(id: WindowId, title: impl Into<String>, config: FormConfig, source: &dyn ThemeSource) -> Self {
        let style_manager = StyleManager::from_style(config.style, source);
        let icon_size = config.show_icon.then_some(config.icon_size);
        let mut form = Self {
            id,
            variant: config.variant,
            title: title.into(),
            border: Border::new(config.border_thickness, config.border_shape),
            background: Color::rgb(243, 243, 243),
            window_bar_color: Color::WHITE,
            fore_color: Color::BLACK,
            font: FontDescription::default(),
            title_alignment: config.title_alignment,
            icon_size,
            icon_bounds: icon_bounds(icon_size, config.window_bar_height),
            minimize_box: config.minimize_box,
            maximize_box: config.maximize_box,
            chrome: WindowChrome::new(id, config.chrome_config(), config.size),
            mouse: MouseStateTracker::new(ElementId::Window(id)),
            children: ThemeListeners::new(),
            style_manager,
        };
        let theme = form.style_manager.theme().clone();
        match ThemedFields::read(&theme) {
            Ok(fields) => {
                form.background = fields.background;
                fields.store(&mut form);
            }
            Err(err) => log::warn!("VisualForm: {id:?} keeps default colors: {err}"),
        }
        log::debug!("VisualForm: created {id:?} ({:?}) with style '{}'", form.variant, theme.name());
        form
    }

    pub fn id(&self) -> WindowId {
        self.id
    }

    pub fn variant(&self) -> WindowVariant {
        self.variant
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>, effects: &mut EffectQueue) {
        self.title = title.into();
        effects.request_repaint(self.element_id());
    }

    pub fn style_manager(&self) -> &StyleManager {
        &self.style_manager
    }

    pub fn chrome(&self) -> &WindowChrome {
        &self.chrome
    }

    pub fn border(&self) -> &Border {
        &self.border
    }

    /// Border color for the current mouse state.
    pub fn border_color(&self) -> Color {
        self.border.color_for(self.mouse.state())
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn set_background(&mut self, color: Color, effects: &mut EffectQueue) -> bool {
        if self.background == color {
            return false;
        }
        self.background = color;
        effects.request_repaint(self.element_id());
        effects.emit(AppEvent::BackgroundChanged {
            source: self.element_id(),
            color,
        });
        true
    }

    pub fn window_bar_color(&self) -> Color {
        self.window_bar_color
    }

    pub fn set_window_bar_color(&mut self, color: Color, effects: &mut EffectQueue) -> bool {
        if self.window_bar_color == color {
            return false;
        }
        self.window_bar_color = color;
        effects.request_repaint(self.element_id());
        true
    }

    pub fn fore_color(&self) -> Color {
        self.fore_color
    }

    pub fn font(&self) -> &FontDescription {
        &self.font
    }

    pub fn title_alignment(&self) -> TitleAlignment {
        self.title_alignment
    }

    pub fn set_title_alignment(&mut self, alignment: TitleAlignment, effects: &mut EffectQueue) {
        if self.title_alignment != alignment {
            self.title_alignment = alignment;
            effects.request_repaint(self.element_id());
        }
    }

    pub fn icon_bounds(&self) -> Option<Rect> {
        self.icon_bounds
    }

    /// Shows an icon of `size`, or hides it with `None`.
    pub fn set_icon(&mut self, size: Option<Size>, effects: &mut EffectQueue) {
        self.icon_size = size;
        self.icon_bounds = icon_bounds(size, self.chrome.config().window_bar_height);
        effects.request_repaint(self.element_id());
    }

    pub fn minimize_box(&self) -> bool {
        self.minimize_box
    }

    pub fn maximize_box(&self) -> bool {
        self.maximize_box
    }

    pub fn mouse_state(&self) -> MouseState {
        self.mouse.state()
    }

    pub fn set_sizable(&mut self, sizable: bool) {
        self.chrome.set_sizable(sizable);
    }

    pub fn set_magnetic(&mut self, magnetic: bool) {
        self.chrome.set_magnetic(magnetic);
    }

    pub fn set_magnetic_radius(&mut self, radius: i32) {
        self.chrome.set_magnetic_radius(radius);
    }

    pub fn set_design_mode(&mut self, design_mode: bool) {
        self.chrome.set_design_mode(design_mode);
    }

    pub fn set_window_bar_height(&mut self, height: i32, effects: &mut EffectQueue) {
        self.chrome.set_window_bar_height(height);
        self.icon_bounds = icon_bounds(self.icon_size, height);
        effects.request_repaint(self.element_id());
    }

    pub fn set_border_thickness(&mut self, thickness: i32, effects: &mut EffectQueue) {
        self.border.thickness = thickness;
        self.chrome.set_border_thickness(thickness);
        effects.request_repaint(self.element_id());
    }

    pub fn set_border_shape(&mut self, shape: ShapeType, effects: &mut EffectQueue) {
        self.border.shape = shape;
        effects.request_repaint(self.element_id());
    }

    /// Admits a raw shape code from a designer or settings file.
    pub fn set_border_shape_code(&mut self, code: i32, effects: &mut EffectQueue) -> PlatformResult<()> {
        let shape = ShapeType::try_from(code)?;
        self.set_border_shape(shape, effects);
        Ok(())
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

    pub fn on_resize(&mut self, size: Size) {
        self.chrome.on_resize(size);
        self.icon_bounds = icon_bounds(self.icon_size, self.chrome.config().window_bar_height);
    }

    /// Pointer moved over the form, in client coordinates.
    pub fn on_pointer_move(
        &mut self,
        client: Point,
        child_under_pointer: bool,
        current_cursor: CursorKind,
        effects: &mut EffectQueue,
    ) -> ResizeDirection {
        self.chrome
            .on_pointer_move(client, child_under_pointer, current_cursor, effects)
    }

    pub fn on_pointer_down(&mut self, button: MouseButton, effects: &mut EffectQueue) -> bool {
        self.chrome.on_pointer_down(button, effects)
    }

    pub fn on_pointer_up(&mut self, effects: &mut EffectQueue) {
        self.chrome.on_pointer_up(effects);
    }

    pub fn on_pointer_enter(&mut self, effects: &mut EffectQueue) -> bool {
        self.mouse.on_pointer_enter(effects)
    }

    pub fn on_pointer_leave(&mut self, effects: &mut EffectQueue) -> bool {
        self.mouse.on_pointer_leave(effects)
    }

    pub fn on_focus_gained(&mut self, effects: &mut EffectQueue) -> bool {
        self.mouse.on_focus_gained(effects)
    }

    pub fn on_focus_lost(&mut self, effects: &mut EffectQueue) -> bool {
        self.mouse.on_focus_lost(effects)
    }

    pub fn set_enabled(&mut self, enabled: bool, effects: &mut EffectQueue) -> bool {
        self.mouse.set_enabled(enabled, effects)
    }

    pub fn handle_message(
        &mut self,
        message: &PlatformMessage,
        cursor: CursorSnapshot,
        effects: &mut EffectQueue,
    ) -> MessageDisposition {
        self.chrome.handle_message(message, cursor, effects)
    }

    /*
     * Maximize and restore are done by the chrome so the window fills the work
     * area instead of the whole monitor. Forms without a maximize or minimize box
     * ignore the matching request. A restore while minimized un-minimizes first,
     * which only the platform can do; the chrome stays maximized so the window
     * comes back the way it was. Restoring a form that is not maximized is also
     * left to the platform.
     */
    pub fn on_system_command(
        &mut self,
        command: u32,
        minimized: bool,
        bounds: Rect,
        work_area: Rect,
        effects: &mut EffectQueue,
    ) -> MessageDisposition {
        match command {
            SC_MAXIMIZE => {
                if self.maximize_box {
                    self.chrome.maximize(bounds, work_area, effects);
                } else {
                    log::debug!("VisualForm: {:?} has no maximize box; ignoring maximize", self.id);
                }
                MessageDisposition::Handled
            }
            SC_MINIMIZE if !self.minimize_box => {
                log::debug!("VisualForm: {:?} has no minimize box; ignoring minimize", self.id);
                MessageDisposition::Handled
            }
            SC_RESTORE if minimized => MessageDisposition::Default,
            SC_RESTORE if self.chrome.is_maximized() => {
                self.chrome.restore(effects);
                MessageDisposition::Handled
            }
            _ => MessageDisposition::Default,
        }
    }

    pub fn toggle_maximize(&mut self, bounds: Rect, work_area: Rect, effects: &mut EffectQueue) -> bool {
        if !self.maximize_box && !self.chrome.is_maximized() {
            return false;
        }
        self.chrome.toggle_maximize(bounds, work_area, effects)
    }

    pub fn on_resize_end(&mut self, bounds: Rect, work_area: Rect, effects: &mut EffectQueue) -> Option<Point> {
        self.chrome.on_resize_end(bounds, work_area, effects)
    }
}

/*
 * Everything a form copies out of a theme, read up front so a failed read
 * changes nothing. The background is stored by the caller, which reports
 * whether it changed.
 */
struct ThemedFields {
    border_normal: Color,
    border_hover: Color,
    fore_color: Color,
    font: FontDescription,
    background: Color,
    window_bar: Color,
}

impl ThemedFields {
    fn read(theme: &Theme) -> PlatformResult<Self> {
        let border = theme.border_settings()?;
        let text = theme.text_settings()?;
        let other = theme.other_settings()?;
        Ok(Self {
            border_normal: border.normal,
            border_hover: border.hover,
            fore_color: text.enabled,
            font: text.font.clone(),
            background: other.form_background,
            window_bar: other.form_window_bar,
        })
    }

    fn store(self, form: &mut VisualForm) {
        form.border.color = self.border_normal;
        form.border.hover_color = self.border_hover;
        form.fore_color = self.fore_color;
        form.font = self.font;
        form.window_bar_color = self.window_bar;
    }
}

impl Themable for VisualForm {
    fn element_id(&self) -> ElementId {
        ElementId::Window(self.id)
    }

    fn apply_theme(&mut self, theme: &Theme, effects: &mut EffectQueue) -> PlatformResult<()> {
        let fields = ThemedFields::read(theme)?;
        self.style_manager = StyleManager::new(theme.clone());
        let background = fields.background;
        fields.store(self);
        let background_changed = self.background != background;
        self.background = background;

        effects.request_repaint(self.element_id());
        if background_changed {
            effects.emit(AppEvent::BackgroundChanged {
                source: self.element_id(),
                color: background,
            });
        }
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controls::styled_control::StyledControl;
    use crate::theme::BuiltinThemes;
    use crate::theme_propagation::update_theme;
    use crate::types::{ControlId, PlatformCommand};

    use std::cell::RefCell;
    use std::rc::Rc;

    fn form() -> VisualForm {
        VisualForm::new(WindowId(1), "Main", FormConfig::default(), &BuiltinThemes)
    }

    #[test]
    fn default_config_matches_documented_defaults() {
        let config = FormConfig::default();
        assert!(config.sizable);
        assert!(!config.magnetic);
        assert_eq!(config.magnetic_radius, 100);
        assert_eq!(config.title_alignment, TitleAlignment::Center);
        assert_eq!(config.window_bar_height, 30);
        assert_eq!(config.border_thickness, 3);
        assert_eq!(config.border_shape, ShapeType::Rectangle);
        assert_eq!(config.style, StyleId::Visual);
    }

    #[test]
    fn dialog_variant_is_fixed_and_plain() {
        let dialog = VisualForm::new(WindowId(2), "About", FormConfig::dialog(), &BuiltinThemes);
        assert_eq!(dialog.variant(), WindowVariant::Dialog);
        assert!(!dialog.chrome().config().sizable);
        assert_eq!(dialog.title_alignment(), TitleAlignment::Left);
        assert_eq!(dialog.icon_bounds(), None);
        assert!(!dialog.minimize_box());
        assert!(!dialog.maximize_box());
    }

    #[test]
    fn dialog_ignores_maximize_request() {
        let mut dialog = VisualForm::new(WindowId(2), "About", FormConfig::dialog(), &BuiltinThemes);
        let mut effects = EffectQueue::new();

        let disposition = dialog.on_system_command(
            SC_MAXIMIZE,
            false,
            Rect::new(10, 10, 400, 250),
            Rect::new(0, 0, 1920, 1040),
            &mut effects,
        );

        assert_eq!(disposition, MessageDisposition::Handled);
        assert!(!dialog.chrome().is_maximized());
        assert!(effects.is_empty());
    }

    #[test]
    fn system_commands_maximize_and_restore() {
        let mut form = form();
        let mut effects = EffectQueue::new();
        let bounds = Rect::new(100, 100, 640, 480);
        let work_area = Rect::new(0, 0, 1920, 1040);

        form.on_system_command(SC_MAXIMIZE, false, bounds, work_area, &mut effects);
        assert!(form.chrome().is_maximized());
        assert_eq!(form.chrome().previous_size(), Size::new(640, 480));

        form.on_system_command(SC_RESTORE, false, work_area, work_area, &mut effects);
        assert!(!form.chrome().is_maximized());
        assert_eq!(form.chrome().window_size(), Size::new(640, 480));

        assert_eq!(
            form.on_system_command(SC_RESTORE, false, bounds, work_area, &mut effects),
            MessageDisposition::Default
        );
    }

    #[test]
    fn icon_is_centered_in_title_bar_and_tracks_bar_height() {
        let mut form = form();
        assert_eq!(form.icon_bounds(), Some(Rect::new(5, 7, 16, 16)));

        let mut effects = EffectQueue::new();
        form.set_window_bar_height(40, &mut effects);
        assert_eq!(form.icon_bounds(), Some(Rect::new(5, 12, 16, 16)));
        assert_eq!(form.chrome().status_bar_bounds().height, 40);

        form.set_icon(None, &mut effects);
        assert_eq!(form.icon_bounds(), None);
    }

    #[test]
    fn background_change_notifies_once() {
        let mut form = form();
        let mut effects = EffectQueue::new();
        let current = form.background();

        assert!(!form.set_background(current, &mut effects));
        assert!(effects.is_empty());

        assert!(form.set_background(Color::rgb(1, 2, 3), &mut effects));
        assert_eq!(effects.events().count(), 1);
        assert_eq!(effects.commands().count(), 1);
    }

    #[test]
    fn window_bar_color_change_repaints_once() {
        let mut form = form();
        let mut effects = EffectQueue::new();
        let current = form.window_bar_color();

        assert!(!form.set_window_bar_color(current, &mut effects));
        assert!(effects.is_empty());

        assert!(form.set_window_bar_color(Color::rgb(30, 30, 30), &mut effects));
        assert_eq!(form.window_bar_color(), Color::rgb(30, 30, 30));
        assert_eq!(
            effects.commands().collect::<Vec<_>>(),
            vec![&PlatformCommand::Invalidate(ElementId::Window(WindowId(1)))]
        );
        assert_eq!(effects.events().count(), 0);
    }

    #[test]
    fn border_color_tracks_hover() {
        let mut form = form();
        let mut effects = EffectQueue::new();
        let normal = form.border().color;
        let hover = form.border().hover_color;

        assert_eq!(form.border_color(), normal);
        form.on_pointer_enter(&mut effects);
        assert_eq!(form.border_color(), hover);
        form.on_pointer_leave(&mut effects);
        assert_eq!(form.border_color(), normal);
    }

    #[test]
    fn theme_update_copies_fields_and_reaches_children() {
        // Arrange
        let form = Rc::new(RefCell::new(form()));
        let button = Rc::new(RefCell::new(StyledControl::new(
            ControlId::new(10),
            StyleId::Visual,
            &BuiltinThemes,
        )));
        let shared: SharedThemable = button.clone();
        form.borrow_mut().add_child(&shared).unwrap();
        let theme = BuiltinThemes.load(StyleId::Enigma);
        let other = theme.other_settings().unwrap().clone();
        let mut effects = EffectQueue::new();

        // Act
        update_theme(&mut *form.borrow_mut(), &theme, &mut effects);

        // Assert
        let form = form.borrow();
        assert_eq!(form.style_manager().theme().name(), "Enigma");
        assert_eq!(form.background(), other.form_background);
        assert_eq!(form.window_bar_color(), other.form_window_bar);
        assert_eq!(form.border().color, theme.border_settings().unwrap().normal);
        assert_eq!(button.borrow().style_manager().theme().name(), "Enigma");

        let window = ElementId::Window(WindowId(1));
        let window_repaints = effects
            .commands()
            .filter(|command| **command == PlatformCommand::Invalidate(window))
            .count();
        assert_eq!(window_repaints, 1);
        let events: Vec<&AppEvent> = effects.events().collect();
        assert!(matches!(events[0], AppEvent::BackgroundChanged { .. }));
        assert!(matches!(events[1], AppEvent::ThemeChanged { source: ElementId::Window(_), .. }));
        assert!(matches!(events[2], AppEvent::ThemeChanged { source: ElementId::Control(_), .. }));
    }

    #[test]
    fn incompatible_theme_is_reported_and_form_unchanged() {
        let mut form = form();
        let before_background = form.background();
        let partial = Theme::builder("NoOther")
            .border(crate::theme::BorderSettings {
                normal: Color::BLACK,
                hover: Color::WHITE,
            })
            .text(crate::theme::TextSettings {
                enabled: Color::WHITE,
                font: FontDescription::default(),
            })
            .build();
        let mut effects = EffectQueue::new();

        update_theme(&mut form, &partial, &mut effects);

        assert_eq!(form.style_manager().theme().name(), "Visual");
        assert_eq!(form.background(), before_background);
        assert_eq!(form.border().color, BuiltinThemes.load(StyleId::Visual).border_settings().unwrap().normal);
        let commands: Vec<&PlatformCommand> = effects.commands().collect();
        assert_eq!(commands.len(), 1);
        assert!(matches!(commands[0], PlatformCommand::ShowError { .. }));
    }

    #[test]
    fn raw_shape_codes_are_validated() {
        let mut form = form();
        let mut effects = EffectQueue::new();
        assert!(form.set_border_shape_code(1, &mut effects).is_ok());
        assert_eq!(form.border().shape, ShapeType::Rounded);
        assert!(form.set_border_shape_code(9, &mut effects).is_err());
        assert_eq!(form.border().shape, ShapeType::Rounded);
    }

    #[test]
    fn toggle_maximize_respects_maximize_box() {
        let mut form = form();
        let mut effects = EffectQueue::new();
        let work_area = Rect::new(0, 0, 1920, 1040);
        assert!(form.toggle_maximize(Rect::new(0, 0, 640, 480), work_area, &mut effects));
        assert!(form.chrome().is_maximized());
        assert!(form.toggle_maximize(work_area, work_area, &mut effects));
        assert!(!form.chrome().is_maximized());
    }
}
