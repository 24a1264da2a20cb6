/*
 * Resolves what a form's frame looks like for one paint pass: the background,
 * the border path, the title bar, the icon slot and where the title text goes.
 * The plan is plain data so the GDI painter stays a thin translation layer and
 * the geometry can be tested without a device context.
 */
use crate::controls::visual_form::{ICON_MARGIN, VisualForm};
use crate::styling_primitives::{Color, FontDescription, ShapeType, TitleAlignment};
use crate::types::{Point, Rect, Size};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FramePlan {
    /// Whole window, window-relative.
    pub frame: Rect,
    pub background: Color,
    /// Rectangle the border is stroked along.
    pub client_path: Rect,
    pub shape: ShapeType,
    pub border_color: Color,
    pub border_thickness: i32,
    pub window_bar: Rect,
    pub window_bar_color: Color,
    pub icon: Option<Rect>,
    pub title: String,
    pub title_origin: Point,
    pub title_color: Color,
    pub font: FontDescription,
}

/*
 * Rectangle shapes extend the path one pixel past the client area so the stroke
 * lands on the outermost pixels; rounded shapes pull it in by one so the curve
 * is not clipped.
 */
pub fn client_path(window_size: Size, shape: ShapeType) -> Rect {
    let client = Rect::from_location_size(Point::default(), window_size);
    match shape {
        ShapeType::Rectangle => client.resized_by(1),
        ShapeType::Rounded => client.resized_by(-1),
    }
}

pub fn title_origin(
    alignment: TitleAlignment,
    window_width: i32,
    window_bar_height: i32,
    border_thickness: i32,
    icon: Option<Rect>,
    title_size: Size,
) -> Point {
    let y = window_bar_height / 2 - title_size.height / 2;
    let x = match alignment {
        TitleAlignment::Center => window_width / 2 - title_size.width / 2,
        TitleAlignment::Left => icon.map_or(ICON_MARGIN, |icon| icon.right()),
        TitleAlignment::Right => window_width - border_thickness - title_size.width,
    };
    Point::new(x, y)
}

/// Builds the frame plan for `form`; `title_size` is the measured extent of its title.
pub fn plan_frame(form: &VisualForm, title_size: Size) -> FramePlan {
    let chrome = form.chrome();
    let window_size = chrome.window_size();
    let bar_height = chrome.config().window_bar_height;
    let border = form.border();
    let icon = form.icon_bounds();

    FramePlan {
        frame: Rect::from_location_size(Point::default(), window_size),
        background: form.background(),
        client_path: client_path(window_size, border.shape),
        shape: border.shape,
        border_color: form.border_color(),
        border_thickness: border.thickness,
        window_bar: Rect::new(0, 0, window_size.width, bar_height),
        window_bar_color: form.window_bar_color(),
        icon,
        title: form.title().to_string(),
        title_origin: title_origin(
            form.title_alignment(),
            window_size.width,
            bar_height,
            border.thickness,
            icon,
            title_size,
        ),
        title_color: form.fore_color(),
        font: form.font().clone(),
    }
}
