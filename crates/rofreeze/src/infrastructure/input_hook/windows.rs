//! Windows low-level keyboard and mouse hook implementation.
//!
//! Each watch (keyboard, mouse suppression) gets its own thread that installs
//! one hook and then pumps a Win32 message loop; low-level hook callbacks are
//! delivered to the installing thread through that loop.  Stopping a watch
//! posts `WM_QUIT` to the thread and joins it, so once `stop()` returns the
//! hook is gone.
//!
//! Keyboard hook callbacks only forward raw key events over an `mpsc` channel.
//! A separate dispatcher thread runs the [`HotkeyFilter`] and invokes the
//! hotkey handler, so a freeze transition (which joins the repeat-press thread
//! and injects input) never runs inside the hook callback.  Windows silently
//! removes low-level hooks whose callbacks take longer than
//! `LowLevelHooksTimeout` (~300ms–1s).
//!
//! # Safety
//!
//! This module uses `unsafe` code exclusively for Windows API FFI calls.
//! All `unsafe` blocks are annotated with `// SAFETY:` comments.

#![cfg(target_os = "windows")]

use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

use rofreeze_core::{HotkeyBindings, HotkeyFilter, Point, VirtualKey};
use tracing::{debug, error, info, warn};
use windows::Win32::Foundation::{LPARAM, LRESULT, WPARAM};
use windows::Win32::System::Threading::GetCurrentThreadId;
use windows::Win32::UI::WindowsAndMessaging::{
    CallNextHookEx, DispatchMessageW, GetMessageW, PeekMessageW, PostThreadMessageW,
    SetWindowsHookExW, UnhookWindowsHookEx, HC_ACTION, HOOKPROC, KBDLLHOOKSTRUCT, MSG,
    MSLLHOOKSTRUCT, PM_NOREMOVE, WH_KEYBOARD_LL, WH_MOUSE_LL, WINDOWS_HOOK_ID, WM_KEYDOWN,
    WM_KEYUP, WM_MOUSEMOVE, WM_QUIT, WM_SYSKEYDOWN, WM_SYSKEYUP, WM_USER,
};

use super::{HookError, HookHandle, HookKind, HotkeyCallback, InputHooks, MoveCallback};

/// `KBDLLHOOKSTRUCT.flags` bit set for events produced by `SendInput`.
const LLKHF_INJECTED: u32 = 0x0000_0010;
/// `MSLLHOOKSTRUCT.flags` bit set for events produced by `SendInput`.
const LLMHF_INJECTED: u32 = 0x0000_0001;

/// A key transition observed by the keyboard hook.
#[derive(Debug, Clone, Copy)]
struct RawKeyEvent {
    key: VirtualKey,
    down: bool,
}

/// Sender used by the keyboard hook callback.  `Some` while a keyboard watch runs.
static KEY_EVENTS: Mutex<Option<Sender<RawKeyEvent>>> = Mutex::new(None);

/// Handler used by the mouse hook callback.  `Some` while suppression is active.
static MOVE_HANDLER: Mutex<Option<MoveCallback>> = Mutex::new(None);

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A running hook thread plus, for the keyboard watch, its dispatcher.
struct HookThread {
    thread_id: u32,
    hook_loop: JoinHandle<()>,
    dispatcher: Option<JoinHandle<()>>,
}

/// Windows global hook service.
///
/// Only one watch of each kind can run at a time because the hook callbacks
/// are plain `extern "system"` functions that reach their state through
/// process-wide statics.
pub struct WindowsInputHooks {
    watches: Mutex<HashMap<HookHandle, HookThread>>,
}

impl WindowsInputHooks {
    pub fn new() -> Self {
        Self {
            watches: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for WindowsInputHooks {
    fn default() -> Self {
        Self::new()
    }
}

impl InputHooks for WindowsInputHooks {
    fn start_keyboard_watch(
        &self,
        bindings: HotkeyBindings,
        on_hotkey: HotkeyCallback,
    ) -> Result<HookHandle, HookError> {
        let rx = {
            let mut key_events = lock(&KEY_EVENTS);
            if key_events.is_some() {
                return Err(HookError::AlreadyRunning(HookKind::Keyboard));
            }
            let (tx, rx) = mpsc::channel();
            *key_events = Some(tx);
            rx
        };

        let dispatcher = thread::Builder::new()
            .name("rofreeze-hotkeys".to_string())
            .spawn(move || dispatch_hotkeys(rx, bindings, on_hotkey))
            .map_err(|e| {
                lock(&KEY_EVENTS).take();
                HookError::Unavailable(format!("failed to spawn hotkey dispatcher: {e}"))
            })?;

        match spawn_hook_thread(HookKind::Keyboard) {
            Ok(mut hook_thread) => {
                hook_thread.dispatcher = Some(dispatcher);
                let handle = HookHandle::new(HookKind::Keyboard);
                lock(&self.watches).insert(handle, hook_thread);
                info!(save_point = %bindings.save_point, toggle_freeze = %bindings.toggle_freeze, "keyboard hook installed");
                Ok(handle)
            }
            Err(e) => {
                // Dropping the sender ends the dispatcher loop.
                lock(&KEY_EVENTS).take();
                let _ = dispatcher.join();
                Err(e)
            }
        }
    }

    fn start_mouse_suppression(&self, on_move: MoveCallback) -> Result<HookHandle, HookError> {
        {
            let mut handler = lock(&MOVE_HANDLER);
            if handler.is_some() {
                return Err(HookError::AlreadyRunning(HookKind::MouseSuppression));
            }
            *handler = Some(on_move);
        }

        match spawn_hook_thread(HookKind::MouseSuppression) {
            Ok(hook_thread) => {
                let handle = HookHandle::new(HookKind::MouseSuppression);
                lock(&self.watches).insert(handle, hook_thread);
                debug!("mouse hook installed");
                Ok(handle)
            }
            Err(e) => {
                lock(&MOVE_HANDLER).take();
                Err(e)
            }
        }
    }

    fn stop(&self, handle: HookHandle) {
        let Some(hook_thread) = lock(&self.watches).remove(&handle) else {
            return;
        };

        // SAFETY: PostThreadMessageW only enqueues a message; a stale thread id
        // makes it fail, which is harmless here.
        if let Err(e) =
            unsafe { PostThreadMessageW(hook_thread.thread_id, WM_QUIT, WPARAM(0), LPARAM(0)) }
        {
            warn!("failed to post WM_QUIT to hook thread: {e}");
        }
        if hook_thread.hook_loop.join().is_err() {
            error!("hook thread panicked");
        }

        match handle.kind() {
            HookKind::Keyboard => {
                lock(&KEY_EVENTS).take();
                if let Some(dispatcher) = hook_thread.dispatcher {
                    // The session may be torn down from a hotkey handler, i.e.
                    // on the dispatcher itself; it exits once the sender is gone.
                    if dispatcher.thread().id() != thread::current().id() {
                        let _ = dispatcher.join();
                    }
                }
                info!("keyboard hook removed");
            }
            HookKind::MouseSuppression => {
                lock(&MOVE_HANDLER).take();
                debug!("mouse hook removed");
            }
        }
    }
}

/// Spawns a hook thread and waits until its hook is installed (or failed).
fn spawn_hook_thread(kind: HookKind) -> Result<HookThread, HookError> {
    let (ready_tx, ready_rx) = mpsc::channel::<Result<u32, String>>();
    let name = match kind {
        HookKind::Keyboard => "rofreeze-kbd-hook",
        HookKind::MouseSuppression => "rofreeze-mouse-hook",
    };

    let hook_loop = thread::Builder::new()
        .name(name.to_string())
        .spawn(move || run_hook_message_loop(kind, ready_tx))
        .map_err(|e| HookError::Unavailable(format!("failed to spawn hook thread: {e}")))?;

    match ready_rx.recv() {
        Ok(Ok(thread_id)) => Ok(HookThread {
            thread_id,
            hook_loop,
            dispatcher: None,
        }),
        Ok(Err(reason)) => {
            let _ = hook_loop.join();
            Err(HookError::Unavailable(reason))
        }
        Err(_) => {
            let _ = hook_loop.join();
            Err(HookError::Unavailable(
                "hook thread exited during installation".to_string(),
            ))
        }
    }
}

/// Entry point for a dedicated hook thread.
fn run_hook_message_loop(kind: HookKind, ready: Sender<Result<u32, String>>) {
    let mut msg = MSG::default();

    // SAFETY: PeekMessageW on this thread forces creation of its message queue,
    // so a WM_QUIT posted right after installation is not lost.
    unsafe {
        let _ = PeekMessageW(&mut msg, None, WM_USER, WM_USER, PM_NOREMOVE);
    }

    let (id, proc): (WINDOWS_HOOK_ID, HOOKPROC) = match kind {
        HookKind::Keyboard => (WH_KEYBOARD_LL, Some(keyboard_hook_proc)),
        HookKind::MouseSuppression => (WH_MOUSE_LL, Some(mouse_hook_proc)),
    };

    // SAFETY: SetWindowsHookExW requires the calling thread to run a message
    // loop, which it does below until WM_QUIT.
    let hook = match unsafe { SetWindowsHookExW(id, proc, None, 0) } {
        Ok(hook) => hook,
        Err(e) => {
            let _ = ready.send(Err(format!("SetWindowsHookExW failed: {e}")));
            return;
        }
    };

    // SAFETY: GetCurrentThreadId has no preconditions.
    let _ = ready.send(Ok(unsafe { GetCurrentThreadId() }));

    // SAFETY: Standard Win32 GetMessage/DispatchMessage loop pattern; the hook
    // handle is owned by this thread and released exactly once.
    unsafe {
        while GetMessageW(&mut msg, None, 0, 0).as_bool() {
            DispatchMessageW(&msg);
        }
        if let Err(e) = UnhookWindowsHookEx(hook) {
            warn!("UnhookWindowsHookEx failed: {e}");
        }
    }
}

/// Runs on the dispatcher thread until the keyboard watch is stopped.
fn dispatch_hotkeys(rx: Receiver<RawKeyEvent>, bindings: HotkeyBindings, on_hotkey: HotkeyCallback) {
    let mut filter = HotkeyFilter::new(bindings);
    while let Ok(event) = rx.recv() {
        if !event.down {
            filter.key_up(event.key);
            continue;
        }
        let Some(action) = filter.key_down(event.key) else {
            continue;
        };
        debug!(?action, "hotkey pressed");
        if panic::catch_unwind(AssertUnwindSafe(|| on_hotkey(action))).is_err() {
            error!(?action, "hotkey handler panicked");
        }
    }
    debug!("hotkey dispatcher stopped");
}

/// Low-level keyboard hook callback.
///
/// # Safety
///
/// This function is called by Windows from the keyboard hook thread.
/// It must return quickly to avoid hook removal by the OS.
unsafe extern "system" fn keyboard_hook_proc(
    n_code: i32,
    w_param: WPARAM,
    l_param: LPARAM,
) -> LRESULT {
    if n_code == HC_ACTION as i32 {
        // SAFETY: l_param points to a KBDLLHOOKSTRUCT when n_code == HC_ACTION.
        let kbs = &*(l_param.0 as *const KBDLLHOOKSTRUCT);
        let injected = kbs.flags.0 & LLKHF_INJECTED != 0;

        let down = match w_param.0 as u32 {
            WM_KEYDOWN | WM_SYSKEYDOWN => Some(true),
            WM_KEYUP | WM_SYSKEYUP => Some(false),
            _ => None,
        };

        if let (Some(down), false) = (down, injected) {
            if let Some(sender) = lock(&KEY_EVENTS).as_ref() {
                // Ignore send errors (dispatcher gone during shutdown).
                let _ = sender.send(RawKeyEvent {
                    key: VirtualKey(kbs.vkCode as u8),
                    down,
                });
            }
        }
    }

    // Hotkeys are observed, never swallowed.
    // SAFETY: Forward the event to the next hook in the chain.
    CallNextHookEx(None, n_code, w_param, l_param)
}

/// Low-level mouse hook callback.
///
/// # Safety
///
/// Called by Windows from the mouse hook thread; must return quickly.
unsafe extern "system" fn mouse_hook_proc(n_code: i32, w_param: WPARAM, l_param: LPARAM) -> LRESULT {
    if n_code == HC_ACTION as i32 && w_param.0 as u32 == WM_MOUSEMOVE {
        // SAFETY: l_param points to a MSLLHOOKSTRUCT when n_code == HC_ACTION.
        let mhs = &*(l_param.0 as *const MSLLHOOKSTRUCT);

        if mhs.flags & LLMHF_INJECTED == 0 {
            let handler = lock(&MOVE_HANDLER).clone();
            if let Some(handler) = handler {
                let target = Point::new(mhs.pt.x, mhs.pt.y);
                // Unwinding out of an extern "system" fn aborts the process.
                let _ = panic::catch_unwind(AssertUnwindSafe(|| handler(target)));
                // Swallow the hardware move.
                return LRESULT(1);
            }
        }
    }

    // SAFETY: Forward to the next hook in the chain.
    CallNextHookEx(None, n_code, w_param, l_param)
}
