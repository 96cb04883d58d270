use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::prelude::*;

/// Batches animation work via `requestAnimationFrame`.
///
/// Call `mark_dirty()` whenever state changes. The frame function fires at
/// most once per vsync with the frame timestamp in milliseconds, coalescing
/// all dirty marks. When it returns `true` another frame is scheduled.
///
/// While paused (page hidden) no frames are requested; dirty marks are kept
/// and flushed on resume.
pub struct RenderScheduler {
    inner: Rc<Inner>,
}

struct Inner {
    window: Option<web_sys::Window>,
    dirty: Cell<bool>,
    scheduled: Cell<bool>,
    paused: Cell<bool>,
    cancelled: Cell<bool>,
    raf_id: Cell<Option<i32>>,
    callback: RefCell<Option<Closure<dyn FnMut(f64)>>>,
}

impl Inner {
    fn request_frame(&self) {
        if self.scheduled.get() || self.paused.get() || self.cancelled.get() {
            return;
        }
        let cb_ref = self.callback.borrow();
        let Some(ref cb) = *cb_ref else {
            return;
        };
        let Some(window) = self.window.as_ref() else {
            return;
        };
        self.scheduled.set(true);
        match window.request_animation_frame(cb.as_ref().unchecked_ref()) {
            Ok(id) => self.raf_id.set(Some(id)),
            Err(_) => self.scheduled.set(false),
        }
    }

    fn cancel_pending(&self) {
        if let Some(raf_id) = self.raf_id.replace(None)
            && let Some(window) = self.window.as_ref()
        {
            let _ = window.cancel_animation_frame(raf_id);
        }
        self.scheduled.set(false);
    }
}

impl RenderScheduler {
    /// `frame_fn` receives the rAF timestamp and returns `true` while
    /// animations are still running.
    pub fn new(frame_fn: impl Fn(f64) -> bool + 'static) -> Self {
        let inner = Rc::new(Inner {
            window: web_sys::window(),
            dirty: Cell::new(false),
            scheduled: Cell::new(false),
            paused: Cell::new(false),
            cancelled: Cell::new(false),
            raf_id: Cell::new(None),
            callback: RefCell::new(None),
        });

        // Weak so the stored callback doesn't keep `inner` alive.
        let inner_cb = Rc::downgrade(&inner);
        let cb = Closure::<dyn FnMut(f64)>::new(move |timestamp: f64| {
            let Some(inner) = inner_cb.upgrade() else {
                return;
            };
            inner.scheduled.set(false);
            inner.raf_id.set(None);
            if inner.cancelled.get() || !inner.dirty.get() {
                return;
            }
            inner.dirty.set(false);
            if frame_fn(timestamp) {
                inner.dirty.set(true);
                inner.request_frame();
            }
        });
        *inner.callback.borrow_mut() = Some(cb);

        Self { inner }
    }

    /// Request a frame. Cheap: sets a flag and schedules one rAF if none is
    /// pending.
    pub fn mark_dirty(&self) {
        self.inner.dirty.set(true);
        self.inner.request_frame();
    }

    /// Stop requesting frames while the page is hidden.
    pub fn set_paused(&self, paused: bool) {
        self.inner.paused.set(paused);
        if paused {
            self.inner.cancel_pending();
        } else if self.inner.dirty.get() {
            self.inner.request_frame();
        }
    }

    /// Cancel the pending frame and refuse any further ones.
    pub fn cancel(&self) {
        self.inner.cancelled.set(true);
        self.inner.dirty.set(false);
        self.inner.cancel_pending();
    }
}

impl Drop for RenderScheduler {
    fn drop(&mut self) {
        self.cancel();
        self.inner.callback.borrow_mut().take();
    }
}
