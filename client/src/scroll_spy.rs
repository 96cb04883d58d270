use std::cell::RefCell;
use std::rc::Rc;

use fallline_shared::{SECTION_ORDER, ScrollSpy, SectionExtent};
use leptos::prelude::*;

use crate::listeners::{self, ListenerBinding};

struct ScrollSpyBinding {
    _scroll: Option<ListenerBinding>,
    _resize: Option<ListenerBinding>,
}

thread_local! {
    static SCROLL_SPY_BINDING: RefCell<Option<ScrollSpyBinding>> = const { RefCell::new(None) };
}

fn viewport_height() -> f64 {
    web_sys::window()
        .and_then(|w| w.inner_height().ok())
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0)
}

fn measure_section(id: &str) -> Option<SectionExtent> {
    let element = web_sys::window()?.document()?.get_element_by_id(id)?;
    let rect = element.get_bounding_client_rect();
    Some(SectionExtent::new(rect.top(), rect.bottom()))
}

/// Write the most visible section into `active` now and on every scroll
/// and resize until [`stop`] is called.
pub(crate) fn start(active: RwSignal<String>, offset: f64, debug_log: bool) {
    stop();

    let spy = Rc::new(RefCell::new(ScrollSpy::new(
        SECTION_ORDER,
        offset,
        &active.get_untracked(),
    )));
    let evaluate = move || {
        let changed = spy
            .borrow_mut()
            .observe(measure_section, viewport_height())
            .map(str::to_string);
        if let Some(id) = changed {
            if debug_log {
                web_sys::console::info_1(&format!("active_section={id}").into());
            }
            active.set(id);
        }
    };
    evaluate();

    let binding = ScrollSpyBinding {
        _scroll: listeners::on_window("scroll", true, {
            let evaluate = evaluate.clone();
            move |_| evaluate()
        }),
        _resize: listeners::on_window("resize", true, move |_| evaluate()),
    };
    SCROLL_SPY_BINDING.with(|slot| *slot.borrow_mut() = Some(binding));
}

pub(crate) fn stop() {
    let binding = SCROLL_SPY_BINDING.with(|slot| slot.borrow_mut().take());
    drop(binding);
}
