/*
 * Platform-agnostic styling values used as paint parameters: colors, fonts,
 * the window border and title alignment. Raw integer codes coming from theme
 * files or designers are admitted through `TryFrom<i32>`, which is the single
 * place an unknown variant can appear; it is reported as `OutOfRange`.
 */
use crate::error::PlatformError;
use crate::mouse_state::MouseState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontDescription {
    pub family: String,
    pub point_size: i32,
    pub weight: FontWeight,
}

impl FontDescription {
    pub fn new(family: impl Into<String>, point_size: i32, weight: FontWeight) -> Self {
        Self {
            family: family.into(),
            point_size,
            weight,
        }
    }
}

impl Default for FontDescription {
    fn default() -> Self {
        Self::new("Segoe UI", 9, FontWeight::Normal)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShapeType {
    #[default]
    Rectangle,
    Rounded,
}

impl TryFrom<i32> for ShapeType {
    type Error = PlatformError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ShapeType::Rectangle),
            1 => Ok(ShapeType::Rounded),
            _ => Err(PlatformError::OutOfRange {
                what: "ShapeType",
                value,
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TitleAlignment {
    Left,
    #[default]
    Center,
    Right,
}

impl TryFrom<i32> for TitleAlignment {
    type Error = PlatformError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(TitleAlignment::Left),
            1 => Ok(TitleAlignment::Center),
            2 => Ok(TitleAlignment::Right),
            _ => Err(PlatformError::OutOfRange {
                what: "TitleAlignment",
                value,
            }),
        }
    }
}

/// Window border: thickness drives hit-testing, colors come from the theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Border {
    pub thickness: i32,
    pub shape: ShapeType,
    pub color: Color,
    pub hover_color: Color,
}

impl Border {
    pub const DEFAULT_THICKNESS: i32 = 3;

    pub fn new(thickness: i32, shape: ShapeType) -> Self {
        Self {
            thickness,
            shape,
            color: Color::rgb(180, 180, 180),
            hover_color: Color::rgb(120, 183, 230),
        }
    }

    pub fn color_for(&self, state: MouseState) -> Color {
        match state {
            MouseState::Hover => self.hover_color,
            _ => self.color,
        }
    }
}

impl Default for Border {
    fn default() -> Self {
        Self::new(Self::DEFAULT_THICKNESS, ShapeType::Rectangle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_type_rejects_unknown_codes() {
        assert_eq!(ShapeType::try_from(0), Ok(ShapeType::Rectangle));
        assert_eq!(ShapeType::try_from(1), Ok(ShapeType::Rounded));
        assert_eq!(
            ShapeType::try_from(5),
            Err(PlatformError::OutOfRange {
                what: "ShapeType",
                value: 5
            })
        );
    }

    #[test]
    fn title_alignment_rejects_unknown_codes() {
        assert_eq!(TitleAlignment::try_from(2), Ok(TitleAlignment::Right));
        assert!(TitleAlignment::try_from(-1).is_err());
        assert_eq!(TitleAlignment::default(), TitleAlignment::Center);
    }

    #[test]
    fn border_uses_hover_color_only_when_hovered() {
        let border = Border::default();
        assert_eq!(border.thickness, 3);
        assert_eq!(border.color_for(MouseState::Hover), border.hover_color);
        assert_eq!(border.color_for(MouseState::Normal), border.color);
        assert_eq!(border.color_for(MouseState::Pressed), border.color);
    }
}
