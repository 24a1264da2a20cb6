/*
 * This module provides the Win32 windowing glue for `VisualForm`: window class
 * registration, native window creation, the window procedure router and a
 * `PlatformApi` implementation backed by the window's HWND.
 *
 * Each native window owns a boxed `WindowContext` stored in GWLP_USERDATA. The
 * context holds the form, the application's event handler and the input filter
 * subscription that keeps the resize cursor live while the pointer is over a
 * child control. The subscription is released on WM_DESTROY and the context
 * itself is freed on WM_NCDESTROY.
 */
use crate::command_executor::PlatformApi;
use crate::controls::chrome_painter;
use crate::controls::styling_handler::{cursor_kind_for, cursor_resource};
use crate::controls::visual_form::VisualForm;
use crate::error::{PlatformError, Result as PlatformResult};
use crate::input_filter::{InputFilterGuard, subscribe_pointer_moves};
use crate::message_router::{route_global_pointer_move, route_message};
use crate::types::{
    AppEvent, CursorKind, ElementId, MessageDisposition, PlatformEventHandler, PlatformMessage,
    Point, Rect, Size,
};

use std::cell::RefCell;
use std::collections::VecDeque;
use std::ffi::c_void;
use std::rc::Rc;

use windows::Win32::Foundation::{GetLastError, HINSTANCE, HWND, LPARAM, LRESULT, POINT, RECT, WPARAM};
use windows::Win32::Graphics::Gdi::{
    GetMonitorInfoW, InvalidateRect, MONITOR_DEFAULTTONEAREST, MONITORINFO, MonitorFromPoint,
    ScreenToClient,
};
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::UI::Input::KeyboardAndMouse::{
    ReleaseCapture, TME_LEAVE, TRACKMOUSEEVENT, TrackMouseEvent,
};
use windows::Win32::UI::WindowsAndMessaging::*;
use windows::core::{HSTRING, PCWSTR, w};

const FORM_CLASS_NAME: PCWSTR = w!("VisualPlus_FormClass");

struct WindowContext {
    form: Rc<RefCell<VisualForm>>,
    handler: Rc<RefCell<dyn PlatformEventHandler>>,
    pending_events: RefCell<VecDeque<AppEvent>>,
    filter_guard: RefCell<Option<InputFilterGuard>>,
    quit_on_close: bool,
}

impl WindowContext {
    fn flush_pending_events(&self) {
        loop {
            let Ok(mut handler) = self.handler.try_borrow_mut() else {
                return;
            };
            let Some(event) = self.pending_events.borrow_mut().pop_front() else {
                return;
            };
            handler.handle_event(event);
        }
    }
}

/*
 * Delivers events to the application handler. If the handler is already
 * borrowed (it triggered a platform call that re-entered the window procedure),
 * events are parked and delivered once the outer call returns.
 */
struct EventSink<'a> {
    context: &'a WindowContext,
}

impl PlatformEventHandler for EventSink<'_> {
    fn handle_event(&mut self, event: AppEvent) {
        match self.context.handler.try_borrow_mut() {
            Ok(mut handler) => handler.handle_event(event),
            Err(_) => {
                log::debug!("Platform: handler busy, deferring {event:?}");
                self.context.pending_events.borrow_mut().push_back(event);
            }
        }
    }
}

/// `PlatformApi` for one native window.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Win32Platform {
    hwnd: HWND,
}

impl Win32Platform {
    pub(crate) fn new(hwnd: HWND) -> Self {
        Self { hwnd }
    }
}

impl PlatformApi for Win32Platform {
    fn invalidate(&mut self, target: ElementId) -> PlatformResult<()> {
        log::trace!("Platform: invalidating {target} in {:?}", self.hwnd);
        let _ = unsafe { InvalidateRect(Some(self.hwnd), None, true) };
        Ok(())
    }

    fn release_capture(&mut self) -> PlatformResult<()> {
        unsafe { ReleaseCapture() }?;
        Ok(())
    }

    fn send_message(&mut self, code: u32, wparam: usize, lparam: isize) -> PlatformResult<()> {
        unsafe {
            SendMessageW(self.hwnd, code, Some(WPARAM(wparam)), Some(LPARAM(lparam)));
        }
        Ok(())
    }

    fn set_location(&mut self, location: Point) -> PlatformResult<()> {
        unsafe {
            SetWindowPos(
                self.hwnd,
                None,
                location.x,
                location.y,
                0,
                0,
                SWP_NOSIZE | SWP_NOZORDER | SWP_NOACTIVATE,
            )
        }?;
        Ok(())
    }

    fn set_size(&mut self, size: Size) -> PlatformResult<()> {
        unsafe {
            SetWindowPos(
                self.hwnd,
                None,
                0,
                0,
                size.width,
                size.height,
                SWP_NOMOVE | SWP_NOZORDER | SWP_NOACTIVATE,
            )
        }?;
        Ok(())
    }

    fn set_cursor(&mut self, cursor: CursorKind) -> PlatformResult<()> {
        let h_cursor = unsafe { LoadCursorW(None, cursor_resource(cursor)) }?;
        unsafe { SetCursor(Some(h_cursor)) };
        Ok(())
    }

    fn track_pointer_leave(&mut self) -> PlatformResult<()> {
        let mut tme = TRACKMOUSEEVENT {
            cbSize: std::mem::size_of::<TRACKMOUSEEVENT>() as u32,
            dwFlags: TME_LEAVE,
            hwndTrack: self.hwnd,
            dwHoverTime: 0,
        };
        unsafe { TrackMouseEvent(&mut tme) }?;
        Ok(())
    }

    fn show_error(&mut self, message: &str) -> PlatformResult<()> {
        unsafe {
            MessageBoxW(
                Some(self.hwnd),
                &HSTRING::from(message),
                w!("Error"),
                MB_OK | MB_ICONERROR,
            );
        }
        Ok(())
    }

    fn track_system_menu(&mut self, at: Point) -> PlatformResult<Option<u32>> {
        let menu = unsafe { GetSystemMenu(self.hwnd, false) };
        if menu.is_invalid() {
            return Err(PlatformError::InvalidHandle(format!(
                "No system menu for {:?}",
                self.hwnd
            )));
        }
        let chosen = unsafe {
            TrackPopupMenuEx(
                menu,
                (TPM_LEFTALIGN | TPM_RETURNCMD).0,
                at.x,
                at.y,
                self.hwnd,
                None,
            )
        };
        Ok((chosen.0 > 0).then_some(chosen.0 as u32))
    }

    fn cursor_position(&self) -> Point {
        let mut pt = POINT::default();
        match unsafe { GetCursorPos(&mut pt) } {
            Ok(()) => Point::new(pt.x, pt.y),
            Err(err) => {
                log::warn!("Platform: GetCursorPos failed: {err:?}");
                Point::default()
            }
        }
    }

    fn screen_to_client(&self, screen: Point) -> Point {
        let mut pt = POINT {
            x: screen.x,
            y: screen.y,
        };
        if !unsafe { ScreenToClient(self.hwnd, &mut pt) }.as_bool() {
            log::warn!("Platform: ScreenToClient failed for {:?}", self.hwnd);
        }
        Point::new(pt.x, pt.y)
    }

    fn child_at(&self, client: Point) -> bool {
        let child = unsafe {
            ChildWindowFromPointEx(
                self.hwnd,
                POINT {
                    x: client.x,
                    y: client.y,
                },
                CWP_SKIPINVISIBLE | CWP_SKIPTRANSPARENT,
            )
        };
        !child.is_invalid() && child != self.hwnd
    }

    fn current_cursor(&self) -> CursorKind {
        cursor_kind_for(unsafe { GetCursor() })
    }

    fn window_bounds(&self) -> Rect {
        let mut rc = RECT::default();
        if let Err(err) = unsafe { GetWindowRect(self.hwnd, &mut rc) } {
            log::warn!("Platform: GetWindowRect failed for {:?}: {err:?}", self.hwnd);
        }
        Rect::new(rc.left, rc.top, rc.right - rc.left, rc.bottom - rc.top)
    }

    fn is_minimized(&self) -> bool {
        unsafe { IsIconic(self.hwnd) }.as_bool()
    }

    fn work_area_at(&self, point: Point) -> Rect {
        let monitor = unsafe {
            MonitorFromPoint(
                POINT {
                    x: point.x,
                    y: point.y,
                },
                MONITOR_DEFAULTTONEAREST,
            )
        };
        let mut info = MONITORINFO {
            cbSize: std::mem::size_of::<MONITORINFO>() as u32,
            ..Default::default()
        };
        if unsafe { GetMonitorInfoW(monitor, &mut info) }.as_bool() {
            let rc = info.rcWork;
            Rect::new(rc.left, rc.top, rc.right - rc.left, rc.bottom - rc.top)
        } else {
            log::warn!("Platform: GetMonitorInfoW failed; using window bounds as work area");
            self.window_bounds()
        }
    }
}

fn module_instance() -> PlatformResult<HINSTANCE> {
    Ok(unsafe { GetModuleHandleW(None) }?.into())
}

/*
 * Registers the form window class if not already registered. The class has no
 * background brush; the chrome painter fills the whole window.
 */
pub(crate) fn register_window_class() -> PlatformResult<()> {
    let h_instance = module_instance()?;
    unsafe {
        let mut existing = WNDCLASSEXW::default();
        if GetClassInfoExW(Some(h_instance), FORM_CLASS_NAME, &mut existing).is_ok() {
            log::debug!("Platform: Form window class already registered.");
            return Ok(());
        }

        let wc = WNDCLASSEXW {
            cbSize: std::mem::size_of::<WNDCLASSEXW>() as u32,
            style: CS_HREDRAW | CS_VREDRAW | CS_DBLCLKS,
            lpfnWndProc: Some(facade_wnd_proc_router),
            hInstance: h_instance,
            hIcon: LoadIconW(None, IDI_APPLICATION)?,
            hCursor: LoadCursorW(None, IDC_ARROW)?,
            lpszClassName: FORM_CLASS_NAME,
            hIconSm: LoadIconW(None, IDI_APPLICATION)?,
            ..Default::default()
        };

        if RegisterClassExW(&wc) == 0 {
            let error = GetLastError();
            log::error!("Platform: RegisterClassExW failed: {error:?}");
            return Err(PlatformError::InitializationFailed(format!(
                "RegisterClassExW failed: {error:?}"
            )));
        }
    }
    log::debug!("Platform: Form window class registered successfully.");
    Ok(())
}

/*
 * Borderless popup. The system menu stays so the title-bar context menu works;
 * the minimize box lets the taskbar minimize the window and is left out for
 * forms that must not be minimized.
 */
fn form_window_style(minimize_box: bool) -> WINDOW_STYLE {
    let style = WS_POPUP | WS_SYSMENU | WS_CLIPCHILDREN;
    if minimize_box { style | WS_MINIMIZEBOX } else { style }
}

/// Native window showing a `VisualForm`.
#[derive(Debug, Clone, Copy)]
pub struct FormWindow {
    hwnd: HWND,
}

impl FormWindow {
    /// Creates and shows the native window for `form`.
    pub fn create(
        form: Rc<RefCell<VisualForm>>,
        handler: Rc<RefCell<dyn PlatformEventHandler>>,
        location: Point,
        quit_on_close: bool,
    ) -> PlatformResult<FormWindow> {
        register_window_class()?;
        let (title, size, style) = {
            let form = form.borrow();
            (
                HSTRING::from(form.title()),
                form.chrome().window_size(),
                form_window_style(form.minimize_box()),
            )
        };
        let context = Box::new(WindowContext {
            form,
            handler,
            pending_events: RefCell::new(VecDeque::new()),
            filter_guard: RefCell::new(None),
            quit_on_close,
        });

        let hwnd = unsafe {
            CreateWindowExW(
                WINDOW_EX_STYLE(0),
                FORM_CLASS_NAME,
                &title,
                style,
                location.x,
                location.y,
                size.width,
                size.height,
                None,
                None,
                Some(module_instance()?),
                Some(Box::into_raw(context) as *const c_void),
            )
        }?;
        unsafe {
            let _ = ShowWindow(hwnd, SW_SHOW);
        }
        log::debug!("Platform: Form window {hwnd:?} created at {location:?} size {size:?}");
        Ok(FormWindow { hwnd })
    }

    pub fn close(&self) -> PlatformResult<()> {
        unsafe { DestroyWindow(self.hwnd) }?;
        Ok(())
    }
}

/// Pumps messages until WM_QUIT.
pub fn run_message_loop() -> PlatformResult<()> {
    let mut msg = MSG::default();
    loop {
        let result = unsafe { GetMessageW(&mut msg, None, 0, 0) };
        match result.0 {
            0 => return Ok(()),
            -1 => {
                let error = unsafe { GetLastError() };
                log::error!("Platform: GetMessageW failed: {error:?}");
                return Err(PlatformError::OperationFailed(format!(
                    "GetMessageW failed: {error:?}"
                )));
            }
            _ => unsafe {
                let _ = TranslateMessage(&msg);
                DispatchMessageW(&msg);
            },
        }
    }
}

fn subscribe_global_moves(hwnd: HWND, context: &WindowContext) -> PlatformResult<()> {
    let form = Rc::clone(&context.form);
    let handler = Rc::clone(&context.handler);
    let guard = subscribe_pointer_moves(move |screen| {
        let mut platform = Win32Platform::new(hwnd);
        match handler.try_borrow_mut() {
            Ok(mut handler) => route_global_pointer_move(&form, &mut platform, &mut *handler, screen),
            Err(_) => log::trace!("Platform: handler busy, skipping global pointer move"),
        }
    })?;
    *context.filter_guard.borrow_mut() = Some(guard);
    Ok(())
}

fn handle_window_message(hwnd: HWND, context: &WindowContext, msg: u32, wparam: WPARAM, lparam: LPARAM) -> Option<LRESULT> {
    match msg {
        WM_CREATE => {
            if let Err(err) = subscribe_global_moves(hwnd, context) {
                log::error!("Platform: could not subscribe {hwnd:?} to pointer moves: {err}");
            }
            Some(LRESULT(0))
        }
        WM_ERASEBKGND => Some(LRESULT(1)),
        WM_PAINT => {
            match context.form.try_borrow() {
                Ok(form) => {
                    if let Err(err) = chrome_painter::paint_form(hwnd, &form) {
                        log::error!("Platform: painting {hwnd:?} failed: {err}");
                    }
                    Some(LRESULT(0))
                }
                Err(_) => {
                    log::debug!("Platform: form busy during WM_PAINT for {hwnd:?}");
                    None
                }
            }
        }
        WM_DESTROY => {
            context.filter_guard.borrow_mut().take();
            if context.quit_on_close {
                unsafe { PostQuitMessage(0) };
            }
            Some(LRESULT(0))
        }
        _ => {
            let message = PlatformMessage::new(msg, wparam.0, lparam.0);
            let mut platform = Win32Platform::new(hwnd);
            let mut sink = EventSink { context };
            let disposition = route_message(&context.form, &mut platform, &mut sink, &message);
            context.flush_pending_events();
            match disposition {
                // TRUE stops the parent from picking a cursor of its own.
                MessageDisposition::Handled if msg == WM_SETCURSOR => Some(LRESULT(1)),
                MessageDisposition::Handled => Some(LRESULT(0)),
                MessageDisposition::Default => None,
            }
        }
    }
}

/*
 * Main window procedure router. Retrieves the `WindowContext` and calls
 * `handle_window_message`; messages it does not consume fall through to
 * `DefWindowProcW`.
 */
unsafe extern "system" fn facade_wnd_proc_router(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    let context_ptr = if msg == WM_NCCREATE {
        let create_struct = unsafe { &*(lparam.0 as *const CREATESTRUCTW) };
        let context_raw_ptr = create_struct.lpCreateParams as *mut WindowContext;
        unsafe { SetWindowLongPtrW(hwnd, GWLP_USERDATA, context_raw_ptr as isize) };
        context_raw_ptr
    } else {
        unsafe { GetWindowLongPtrW(hwnd, GWLP_USERDATA) as *mut WindowContext }
    };

    if context_ptr.is_null() {
        return unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) };
    }

    let result = {
        let context = unsafe { &*context_ptr };
        handle_window_message(hwnd, context, msg, wparam, lparam)
            .unwrap_or_else(|| unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) })
    };

    if msg == WM_NCDESTROY {
        unsafe { SetWindowLongPtrW(hwnd, GWLP_USERDATA, 0) };
        let _ = unsafe { Box::from_raw(context_ptr) };
    }
    result
}
