/*
 * Process-wide pointer-move filter.
 *
 * A top-level window needs to see pointer moves even while the pointer is over
 * one of its child controls (which would otherwise swallow them), so it can keep
 * the resize cursor up to date near its edges. Windows subscribe here and get an
 * `InputFilterGuard`; the subscription lives exactly as long as the guard, so a
 * window that owns its guard unsubscribes when it is torn down.
 *
 * The subscriber list is thread-local: pointer input is delivered on the UI
 * thread that owns the windows. On Windows a thread mouse hook feeds
 * `dispatch_pointer_move` while at least one subscription is alive; elsewhere the
 * embedding event loop calls it directly.
 */
use crate::error::Result as PlatformResult;
use crate::types::Point;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

pub type PointerMoveCallback = Rc<dyn Fn(Point)>;

struct Subscription {
    id: u64,
    callback: PointerMoveCallback,
}

thread_local! {
    static SUBSCRIBERS: RefCell<Vec<Subscription>> = const { RefCell::new(Vec::new()) };
    static NEXT_SUBSCRIPTION_ID: Cell<u64> = const { Cell::new(1) };
}

/*
 * RAII handle for one subscription. Dropping it removes the callback; dropping
 * the last one also removes the native hook.
 */
#[derive(Debug)]
pub struct InputFilterGuard {
    id: u64,
}

impl InputFilterGuard {
    pub fn id(&self) -> u64 {
        self.id
    }
}

impl Drop for InputFilterGuard {
    fn drop(&mut self) {
        let remaining = SUBSCRIBERS.with(|subs| {
            let mut subs = subs.borrow_mut();
            subs.retain(|sub| sub.id != self.id);
            subs.len()
        });
        log::debug!(
            "InputFilter: subscription {} released, {remaining} remaining",
            self.id
        );
        if remaining == 0 {
            hook::uninstall();
        }
    }
}

/// Registers `callback` for every pointer move on this thread, in screen coordinates.
pub fn subscribe_pointer_moves(callback: impl Fn(Point) + 'static) -> PlatformResult<InputFilterGuard> {
    if active_subscriptions() == 0 {
        hook::install()?;
    }
    let id = NEXT_SUBSCRIPTION_ID.with(|next| {
        let id = next.get();
        next.set(id + 1);
        id
    });
    SUBSCRIBERS.with(|subs| {
        subs.borrow_mut().push(Subscription {
            id,
            callback: Rc::new(callback),
        });
    });
    log::debug!("InputFilter: subscription {id} registered");
    Ok(InputFilterGuard { id })
}

/*
 * Delivers one pointer move to every subscriber. Callbacks are collected first so
 * a callback may subscribe or drop a guard without tripping the registry borrow.
 * Returns how many callbacks ran.
 */
pub fn dispatch_pointer_move(screen: Point) -> usize {
    let callbacks: Vec<PointerMoveCallback> = SUBSCRIBERS.with(|subs| {
        subs.borrow()
            .iter()
            .map(|sub| Rc::clone(&sub.callback))
            .collect()
    });
    for callback in &callbacks {
        callback(screen);
    }
    callbacks.len()
}

pub fn active_subscriptions() -> usize {
    SUBSCRIBERS.with(|subs| subs.borrow().len())
}

#[cfg(target_os = "windows")]
mod hook {
    use super::dispatch_pointer_move;
    use crate::error::Result as PlatformResult;
    use crate::types::Point;

    use std::cell::Cell;
    use windows::Win32::Foundation::{LPARAM, LRESULT, WPARAM};
    use windows::Win32::System::Threading::GetCurrentThreadId;
    use windows::Win32::UI::WindowsAndMessaging::{
        CallNextHookEx, HC_ACTION, HHOOK, MOUSEHOOKSTRUCT, SetWindowsHookExW,
        UnhookWindowsHookEx, WH_MOUSE, WM_MOUSEMOVE, WM_NCMOUSEMOVE,
    };

    thread_local! {
        static HOOK: Cell<Option<HHOOK>> = const { Cell::new(None) };
    }

    pub(super) fn install() -> PlatformResult<()> {
        if HOOK.with(|hook| hook.get()).is_some() {
            return Ok(());
        }
        let hhook = unsafe { SetWindowsHookExW(WH_MOUSE, Some(mouse_hook_proc), None, GetCurrentThreadId())? };
        HOOK.with(|hook| hook.set(Some(hhook)));
        log::debug!("InputFilter: mouse hook installed {hhook:?}");
        Ok(())
    }

    pub(super) fn uninstall() {
        let Some(hhook) = HOOK.with(|hook| hook.take()) else {
            return;
        };
        if let Err(err) = unsafe { UnhookWindowsHookEx(hhook) } {
            log::error!("InputFilter: failed to remove mouse hook {hhook:?}: {err:?}");
        } else {
            log::debug!("InputFilter: mouse hook removed");
        }
    }

    unsafe extern "system" fn mouse_hook_proc(code: i32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
        if code == HC_ACTION as i32 {
            let message = wparam.0 as u32;
            if message == WM_MOUSEMOVE || message == WM_NCMOUSEMOVE {
                let info = unsafe { &*(lparam.0 as *const MOUSEHOOKSTRUCT) };
                dispatch_pointer_move(Point::new(info.pt.x, info.pt.y));
            }
        }
        let current = HOOK.with(|hook| hook.get());
        unsafe { CallNextHookEx(current, code, wparam, lparam) }
    }
}

#[cfg(not(target_os = "windows"))]
mod hook {
    use crate::error::Result as PlatformResult;

    pub(super) fn install() -> PlatformResult<()> {
        Ok(())
    }

    pub(super) fn uninstall() {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_scopes_subscription() {
        // Arrange
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let baseline = active_subscriptions();

        // Act
        let guard = subscribe_pointer_moves(move |pt| sink.borrow_mut().push(pt)).unwrap();
        let delivered = dispatch_pointer_move(Point::new(5, 6));
        drop(guard);
        dispatch_pointer_move(Point::new(7, 8));

        // Assert
        assert_eq!(delivered, baseline + 1);
        assert_eq!(*seen.borrow(), vec![Point::new(5, 6)]);
        assert_eq!(active_subscriptions(), baseline);
    }

    #[test]
    fn every_live_subscriber_sees_the_move() {
        let count = Rc::new(Cell::new(0));
        let a = {
            let count = Rc::clone(&count);
            subscribe_pointer_moves(move |_| count.set(count.get() + 1)).unwrap()
        };
        let b = {
            let count = Rc::clone(&count);
            subscribe_pointer_moves(move |_| count.set(count.get() + 1)).unwrap()
        };
        assert_ne!(a.id(), b.id());

        dispatch_pointer_move(Point::new(0, 0));
        assert_eq!(count.get(), 2);

        drop(a);
        dispatch_pointer_move(Point::new(0, 0));
        assert_eq!(count.get(), 3);
        drop(b);
    }

    #[test]
    fn callback_may_release_its_own_guard() {
        let slot: Rc<RefCell<Option<InputFilterGuard>>> = Rc::new(RefCell::new(None));
        let inner = Rc::clone(&slot);
        let guard = subscribe_pointer_moves(move |_| {
            inner.borrow_mut().take();
        })
        .unwrap();
        *slot.borrow_mut() = Some(guard);

        dispatch_pointer_move(Point::new(1, 1));

        assert!(slot.borrow().is_none());
        assert_eq!(dispatch_pointer_move(Point::new(1, 1)), 0);
    }
}
