/*
 * Theme value objects and the per-scope `StyleManager`.
 *
 * A `Theme` is immutable once built: it is produced by a `ThemeSource` (the
 * built-in presets here, or an external loader reading theme files) and a
 * theme switch always builds a new one. Categories are optional because
 * external loaders may produce partial themes; elements ask for the categories
 * they need and get `MissingThemeCategory` when one is absent.
 */
use crate::error::{PlatformError, Result as PlatformResult};
use crate::styling_primitives::{Color, FontDescription, FontWeight};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BorderSettings {
    pub normal: Color,
    pub hover: Color,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSettings {
    pub enabled: Color,
    pub font: FontDescription,
}

/// Window chrome colors that do not belong to borders or text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtherSettings {
    pub form_background: Color,
    pub form_window_bar: Color,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorPalette {
    pub text_enabled: Color,
    pub text_disabled: Color,
    pub text_hover: Color,
    pub text_pressed: Color,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    name: String,
    border: Option<BorderSettings>,
    text: Option<TextSettings>,
    other: Option<OtherSettings>,
    palette: Option<ColorPalette>,
}

impl Theme {
    pub fn builder(name: impl Into<String>) -> ThemeBuilder {
        ThemeBuilder {
            theme: Theme {
                name: name.into(),
                border: None,
                text: None,
                other: None,
                palette: None,
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn border_settings(&self) -> PlatformResult<&BorderSettings> {
        self.border.as_ref().ok_or_else(|| self.missing("border"))
    }

    pub fn text_settings(&self) -> PlatformResult<&TextSettings> {
        self.text.as_ref().ok_or_else(|| self.missing("text"))
    }

    pub fn other_settings(&self) -> PlatformResult<&OtherSettings> {
        self.other.as_ref().ok_or_else(|| self.missing("other"))
    }

    pub fn color_palette(&self) -> PlatformResult<&ColorPalette> {
        self.palette.as_ref().ok_or_else(|| self.missing("color palette"))
    }

    fn missing(&self, category: &'static str) -> PlatformError {
        PlatformError::MissingThemeCategory {
            theme: self.name.clone(),
            category,
        }
    }
}

/// Assembles a `Theme`; external loaders fill whichever categories their format provides.
#[derive(Debug, Clone)]
pub struct ThemeBuilder {
    theme: Theme,
}

impl ThemeBuilder {
    pub fn border(mut self, settings: BorderSettings) -> Self {
        self.theme.border = Some(settings);
        self
    }

    pub fn text(mut self, settings: TextSettings) -> Self {
        self.theme.text = Some(settings);
        self
    }

    pub fn other(mut self, settings: OtherSettings) -> Self {
        self.theme.other = Some(settings);
        self
    }

    pub fn palette(mut self, palette: ColorPalette) -> Self {
        self.theme.palette = Some(palette);
        self
    }

    pub fn build(self) -> Theme {
        self.theme
    }
}

/// Names of the styles every `ThemeSource` must be able to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StyleId {
    #[default]
    Visual,
    Enigma,
    Neo,
}

impl StyleId {
    pub const ALL: [StyleId; 3] = [StyleId::Visual, StyleId::Enigma, StyleId::Neo];

    pub fn name(self) -> &'static str {
        match self {
            StyleId::Visual => "Visual",
            StyleId::Enigma => "Enigma",
            StyleId::Neo => "Neo",
        }
    }

    pub fn from_name(name: &str) -> Option<StyleId> {
        Self::ALL
            .into_iter()
            .find(|style| style.name().eq_ignore_ascii_case(name))
    }
}

/*
 * Interface to whatever produces themes. Built-in styles must always resolve;
 * named lookups (theme files, embedded resources) may come back empty, in which
 * case callers keep their current theme.
 */
pub trait ThemeSource {
    fn load(&self, style: StyleId) -> Theme;

    fn load_named(&self, name: &str) -> Option<Theme> {
        StyleId::from_name(name).map(|style| self.load(style))
    }
}

/// In-memory presets for the named styles.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinThemes;

impl ThemeSource for BuiltinThemes {
    fn load(&self, style: StyleId) -> Theme {
        match style {
            StyleId::Visual => preset(
                style,
                Palette {
                    border: Color::rgb(180, 180, 180),
                    border_hover: Color::rgb(120, 183, 230),
                    text: Color::rgb(0, 0, 0),
                    text_disabled: Color::rgb(131, 129, 129),
                    text_hover: Color::rgb(0, 0, 0),
                    text_pressed: Color::rgb(0, 0, 0),
                    background: Color::rgb(243, 243, 243),
                    window_bar: Color::rgb(255, 255, 255),
                },
            ),
            StyleId::Enigma => preset(
                style,
                Palette {
                    border: Color::rgb(60, 60, 60),
                    border_hover: Color::rgb(0, 122, 204),
                    text: Color::rgb(220, 220, 220),
                    text_disabled: Color::rgb(110, 110, 110),
                    text_hover: Color::rgb(255, 255, 255),
                    text_pressed: Color::rgb(200, 200, 200),
                    background: Color::rgb(37, 37, 38),
                    window_bar: Color::rgb(45, 45, 48),
                },
            ),
            StyleId::Neo => preset(
                style,
                Palette {
                    border: Color::rgb(40, 56, 80),
                    border_hover: Color::rgb(77, 166, 255),
                    text: Color::rgb(226, 232, 240),
                    text_disabled: Color::rgb(100, 116, 139),
                    text_hover: Color::rgb(255, 255, 255),
                    text_pressed: Color::rgb(191, 219, 254),
                    background: Color::rgb(22, 30, 46),
                    window_bar: Color::rgb(30, 41, 59),
                },
            ),
        }
    }
}

struct Palette {
    border: Color,
    border_hover: Color,
    text: Color,
    text_disabled: Color,
    text_hover: Color,
    text_pressed: Color,
    background: Color,
    window_bar: Color,
}

fn preset(style: StyleId, p: Palette) -> Theme {
    Theme::builder(style.name())
        .border(BorderSettings {
            normal: p.border,
            hover: p.border_hover,
        })
        .text(TextSettings {
            enabled: p.text,
            font: FontDescription::new("Segoe UI", 9, FontWeight::Normal),
        })
        .other(OtherSettings {
            form_background: p.background,
            form_window_bar: p.window_bar,
        })
        .palette(ColorPalette {
            text_enabled: p.text,
            text_disabled: p.text_disabled,
            text_hover: p.text_hover,
            text_pressed: p.text_pressed,
        })
        .build()
}

/*
 * Holds the current theme for one scope (a window or a control). Each element
 * owns its own manager; a theme switch replaces the manager rather than
 * mutating the theme it wraps, so a manager always holds a complete `Theme`.
 */
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleManager {
    theme: Theme,
}

impl StyleManager {
    pub fn new(theme: Theme) -> Self {
        Self { theme }
    }

    pub fn from_style(style: StyleId, source: &dyn ThemeSource) -> Self {
        Self::new(source.load(style))
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_styles_are_complete() {
        for style in StyleId::ALL {
            let theme = BuiltinThemes.load(style);
            assert_eq!(theme.name(), style.name());
            assert!(theme.border_settings().is_ok());
            assert!(theme.text_settings().is_ok());
            assert!(theme.other_settings().is_ok());
            assert!(theme.color_palette().is_ok());
        }
    }

    #[test]
    fn partial_theme_reports_missing_category() {
        let theme = Theme::builder("Partial")
            .border(BorderSettings {
                normal: Color::BLACK,
                hover: Color::WHITE,
            })
            .build();

        assert!(theme.border_settings().is_ok());
        assert_eq!(
            theme.other_settings(),
            Err(PlatformError::MissingThemeCategory {
                theme: "Partial".to_string(),
                category: "other"
            })
        );
    }

    #[test]
    fn style_names_resolve_case_insensitively() {
        assert_eq!(StyleId::from_name("enigma"), Some(StyleId::Enigma));
        assert_eq!(StyleId::from_name("NEO"), Some(StyleId::Neo));
        assert_eq!(StyleId::from_name("unknown"), None);
        assert!(BuiltinThemes.load_named("missing").is_none());
        assert_eq!(
            BuiltinThemes.load_named("visual").map(|t| t.name().to_string()),
            Some("Visual".to_string())
        );
    }

    #[test]
    fn style_manager_wraps_loaded_theme() {
        let manager = StyleManager::from_style(StyleId::Neo, &BuiltinThemes);
        assert_eq!(manager.theme().name(), "Neo");
        assert_eq!(manager.theme(), &BuiltinThemes.load(StyleId::Neo));
    }
}
