/*
 * GDI painting of a form's custom frame.
 *
 * Handles WM_PAINT for a `VisualForm`: measures the title with the form's font,
 * asks `paint_router::plan_frame` for the layout, then fills the background and
 * the title bar, strokes the border, draws the icon and the title text. All GDI
 * objects created here are released before returning.
 */
use crate::controls::paint_router::{FramePlan, plan_frame};
use crate::controls::styling_handler::{color_to_colorref, create_font};
use crate::controls::visual_form::VisualForm;
use crate::error::Result as PlatformResult;
use crate::styling_primitives::{Color, ShapeType};
use crate::types::{Rect, Size};

use windows::Win32::Foundation::{HWND, RECT, SIZE};
use windows::Win32::Graphics::Gdi::{
    BeginPaint, CreatePen, CreateSolidBrush, DeleteObject, EndPaint, FillRect, GetStockObject,
    GetTextExtentPoint32W, HDC, NULL_BRUSH, PAINTSTRUCT, PS_INSIDEFRAME, Rectangle, RoundRect,
    SelectObject, SetBkMode, SetTextColor, TRANSPARENT, TextOutW,
};
use windows::Win32::UI::WindowsAndMessaging::{DI_NORMAL, DrawIconEx, IDI_APPLICATION, LoadIconW};

/// Corner diameter used for rounded borders.
const CORNER_ROUNDING: i32 = 6;

fn to_rect(rect: Rect) -> RECT {
    RECT {
        left: rect.left(),
        top: rect.top(),
        right: rect.right(),
        bottom: rect.bottom(),
    }
}

fn measure_text(hdc: HDC, text: &[u16]) -> Size {
    let mut extent = SIZE::default();
    if unsafe { GetTextExtentPoint32W(hdc, text, &mut extent) }.as_bool() {
        Size::new(extent.cx, extent.cy)
    } else {
        log::warn!("ChromePainter: GetTextExtentPoint32W failed; centering an empty title");
        Size::default()
    }
}

pub(crate) fn paint_form(hwnd: HWND, form: &VisualForm) -> PlatformResult<()> {
    let font = create_font(form.font())?;
    let title: Vec<u16> = form.title().encode_utf16().collect();

    let mut ps = PAINTSTRUCT::default();
    let hdc = unsafe { BeginPaint(hwnd, &mut ps) };
    if hdc.is_invalid() {
        let _ = unsafe { DeleteObject(font.into()) };
        return Ok(());
    }

    let previous_font = unsafe { SelectObject(hdc, font.into()) };
    let plan = plan_frame(form, measure_text(hdc, &title));
    paint_plan(hdc, &plan, &title);

    unsafe {
        SelectObject(hdc, previous_font);
        let _ = EndPaint(hwnd, &ps);
        let _ = DeleteObject(font.into());
    }
    Ok(())
}

fn fill(hdc: HDC, rect: Rect, color: &Color) {
    unsafe {
        let brush = CreateSolidBrush(color_to_colorref(color));
        if !brush.is_invalid() {
            FillRect(hdc, &to_rect(rect), brush);
            let _ = DeleteObject(brush.into());
        }
    }
}

fn paint_plan(hdc: HDC, plan: &FramePlan, title: &[u16]) {
    fill(hdc, plan.frame, &plan.background);
    fill(hdc, plan.window_bar, &plan.window_bar_color);
    stroke_border(hdc, plan);

    if let Some(icon) = plan.icon {
        unsafe {
            match LoadIconW(None, IDI_APPLICATION) {
                Ok(h_icon) => {
                    let _ = DrawIconEx(hdc, icon.x, icon.y, h_icon, icon.width, icon.height, 0, None, DI_NORMAL);
                }
                Err(err) => log::warn!("ChromePainter: could not load window icon: {err:?}"),
            }
        }
    }

    unsafe {
        SetBkMode(hdc, TRANSPARENT);
        SetTextColor(hdc, color_to_colorref(&plan.title_color));
        let _ = TextOutW(hdc, plan.title_origin.x, plan.title_origin.y, title);
    }
}

fn stroke_border(hdc: HDC, plan: &FramePlan) {
    if plan.border_thickness <= 0 {
        return;
    }
    let path = plan.client_path;
    unsafe {
        let pen = CreatePen(PS_INSIDEFRAME, plan.border_thickness, color_to_colorref(&plan.border_color));
        if pen.is_invalid() {
            log::warn!("ChromePainter: CreatePen failed; border not drawn");
            return;
        }
        let previous_pen = SelectObject(hdc, pen.into());
        let previous_brush = SelectObject(hdc, GetStockObject(NULL_BRUSH));
        let _ = match plan.shape {
            ShapeType::Rectangle => Rectangle(hdc, path.left(), path.top(), path.right(), path.bottom()),
            ShapeType::Rounded => RoundRect(
                hdc,
                path.left(),
                path.top(),
                path.right(),
                path.bottom(),
                CORNER_ROUNDING,
                CORNER_ROUNDING,
            ),
        };
        SelectObject(hdc, previous_brush);
        SelectObject(hdc, previous_pen);
        let _ = DeleteObject(pen.into());
    }
}
