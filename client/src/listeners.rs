use gloo_timers::callback::Timeout;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{AddEventListenerOptions, Event, EventTarget};

/// A registered DOM listener. Dropping it removes the listener.
pub struct ListenerBinding {
    target: EventTarget,
    event: &'static str,
    handler: Option<Closure<dyn FnMut(Event)>>,
}

impl ListenerBinding {
    fn detach(&self) {
        if let Some(handler) = self.handler.as_ref() {
            let _ = self
                .target
                .remove_event_listener_with_callback(self.event, handler.as_ref().unchecked_ref());
        }
    }

    /// Remove the listener now and free its handler once the current event
    /// has finished dispatching. Use this from inside a handler.
    pub fn release(mut self) {
        self.detach();
        if let Some(handler) = self.handler.take() {
            Timeout::new(0, move || drop(handler)).forget();
        }
    }
}

impl Drop for ListenerBinding {
    fn drop(&mut self) {
        self.detach();
    }
}

pub fn listen(
    target: &EventTarget,
    event: &'static str,
    passive: bool,
    handler: impl FnMut(Event) + 'static,
) -> Option<ListenerBinding> {
    let handler = Closure::<dyn FnMut(Event)>::new(handler);
    let options = AddEventListenerOptions::new();
    options.set_passive(passive);
    target
        .add_event_listener_with_callback_and_add_event_listener_options(
            event,
            handler.as_ref().unchecked_ref(),
            &options,
        )
        .ok()?;
    Some(ListenerBinding {
        target: target.clone(),
        event,
        handler: Some(handler),
    })
}

pub fn on_window(
    event: &'static str,
    passive: bool,
    handler: impl FnMut(Event) + 'static,
) -> Option<ListenerBinding> {
    let window = web_sys::window()?;
    listen(window.as_ref(), event, passive, handler)
}

pub fn on_document(
    event: &'static str,
    handler: impl FnMut(Event) + 'static,
) -> Option<ListenerBinding> {
    let document = web_sys::window()?.document()?;
    listen(document.as_ref(), event, false, handler)
}

/// Release every binding. Safe to call from inside one of their handlers.
pub fn release_all(bindings: Vec<ListenerBinding>) {
    for binding in bindings {
        binding.release();
    }
}
