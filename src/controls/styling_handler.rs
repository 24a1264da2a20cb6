/*
 * Helper utilities for translating styling primitives into Win32-friendly values:
 * COLORREF conversion, GDI fonts built from a `FontDescription`, and the stock
 * cursor that backs each `CursorKind`.
 */
use crate::error::{PlatformError, Result as PlatformResult};
use crate::styling_primitives::{Color, FontDescription, FontWeight};
use crate::types::CursorKind;

use windows::Win32::Foundation::{COLORREF, GetLastError};
use windows::Win32::Graphics::Gdi::{
    CLIP_DEFAULT_PRECIS, CreateFontW, DEFAULT_CHARSET, DEFAULT_QUALITY, FF_DONTCARE, FW_BOLD,
    FW_NORMAL, GetDC, GetDeviceCaps, HFONT, LOGPIXELSY, OUT_DEFAULT_PRECIS, ReleaseDC,
};
use windows::Win32::System::WindowsProgramming::MulDiv;
use windows::Win32::UI::WindowsAndMessaging::{
    HCURSOR, IDC_ARROW, IDC_SIZENESW, IDC_SIZENS, IDC_SIZENWSE, IDC_SIZEWE, LoadCursorW,
};
use windows::core::{HSTRING, PCWSTR};

/*
 * Creates a Win32 COLORREF from the platform-agnostic `Color` struct.
 * Win32 expects colors in BGR format, so this function handles the conversion.
 */
pub(crate) fn color_to_colorref(color: &Color) -> COLORREF {
    COLORREF((color.r as u32) | ((color.g as u32) << 8) | ((color.b as u32) << 16))
}

/*
 * Creates a GDI font for `font`, converting the point size to a logical height
 * at the screen's DPI. The caller owns the returned handle and must delete it.
 */
pub(crate) fn create_font(font: &FontDescription) -> PlatformResult<HFONT> {
    let hdc_screen = unsafe { GetDC(None) };
    let logical_height = if !hdc_screen.is_invalid() {
        let height = -unsafe {
            MulDiv(
                font.point_size,
                GetDeviceCaps(Some(hdc_screen), LOGPIXELSY),
                72,
            )
        };
        unsafe { ReleaseDC(None, hdc_screen) };
        height
    } else {
        -font.point_size
    };
    let weight = match font.weight {
        FontWeight::Normal => FW_NORMAL.0 as i32,
        FontWeight::Bold => FW_BOLD.0 as i32,
    };

    let h_font = unsafe {
        CreateFontW(
            logical_height,
            0,
            0,
            0,
            weight,
            0,
            0,
            0,
            DEFAULT_CHARSET,
            OUT_DEFAULT_PRECIS,
            CLIP_DEFAULT_PRECIS,
            DEFAULT_QUALITY,
            FF_DONTCARE.0 as u32,
            &HSTRING::from(font.family.as_str()),
        )
    };
    if h_font.is_invalid() {
        let err = unsafe { GetLastError() };
        log::error!("StylingHandler: CreateFontW failed for {font:?}: {err:?}");
        return Err(PlatformError::OperationFailed(format!(
            "CreateFontW failed for '{}': {err:?}",
            font.family
        )));
    }
    Ok(h_font)
}

/// Stock cursor resource for a cursor kind. `Other` is never set by the chrome.
pub(crate) fn cursor_resource(cursor: CursorKind) -> PCWSTR {
    match cursor {
        CursorKind::SizeNesw => IDC_SIZENESW,
        CursorKind::SizeWe => IDC_SIZEWE,
        CursorKind::SizeNwse => IDC_SIZENWSE,
        CursorKind::SizeNs => IDC_SIZENS,
        CursorKind::Default | CursorKind::Other => IDC_ARROW,
    }
}

/*
 * Classifies the cursor currently shown. Stock cursors are shared handles, so
 * comparing against freshly loaded ones identifies them; anything else was set
 * by a child control and reports `Other`.
 */
pub(crate) fn cursor_kind_for(current: HCURSOR) -> CursorKind {
    [
        CursorKind::Default,
        CursorKind::SizeNesw,
        CursorKind::SizeWe,
        CursorKind::SizeNwse,
        CursorKind::SizeNs,
    ]
    .into_iter()
    .find(|kind| unsafe { LoadCursorW(None, cursor_resource(*kind)) }.is_ok_and(|stock| stock == current))
    .unwrap_or(CursorKind::Other)
}
