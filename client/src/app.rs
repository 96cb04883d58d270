use fallline_shared::{DEFAULT_SECTION, MiniMapSettings, SECTION_ORDER, SectionOrder, section_label};
use leptos::prelude::*;
use web_sys::{ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition, ScrollToOptions};

use crate::minimap::Minimap;
use crate::nav::{MobileNavControls, NavBar};
use crate::scroll_spy;

/// Id of the section currently most visible in the viewport.
#[derive(Clone, Copy)]
pub(crate) struct ActiveSection(pub RwSignal<String>);

const SETTINGS_ELEMENT_ID: &str = "minimap-settings";

/// Milliseconds on the same clock as requestAnimationFrame timestamps.
pub(crate) fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or_else(js_sys::Date::now)
}

/// Settings from the inline JSON block, or defaults.
fn load_settings() -> MiniMapSettings {
    let raw = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(SETTINGS_ELEMENT_ID))
        .and_then(|el| el.text_content());
    let Some(raw) = raw.filter(|text| !text.trim().is_empty()) else {
        return MiniMapSettings::default();
    };
    match MiniMapSettings::from_json(&raw) {
        Ok(settings) => settings,
        Err(e) => {
            web_sys::console::warn_1(&format!("{e}; using defaults").into());
            MiniMapSettings::default()
        }
    }
}

/// Smooth-scroll to a section. The first section scrolls to the very top so
/// the hero isn't left under the nav bar.
pub(crate) fn navigate_to_section(id: &str) {
    let Some(window) = web_sys::window() else {
        return;
    };
    if SectionOrder::default().is_first(id) {
        let options = ScrollToOptions::new();
        options.set_top(0.0);
        options.set_behavior(ScrollBehavior::Smooth);
        window.scroll_to_with_scroll_to_options(&options);
        return;
    }
    let Some(element) = window.document().and_then(|d| d.get_element_by_id(id)) else {
        return;
    };
    let options = ScrollIntoViewOptions::new();
    options.set_behavior(ScrollBehavior::Smooth);
    options.set_block(ScrollLogicalPosition::Start);
    element.scroll_into_view_with_scroll_into_view_options(&options);
}

#[component]
pub fn App() -> impl IntoView {
    let settings = load_settings();
    let active = RwSignal::new(DEFAULT_SECTION.to_string());
    provide_context(ActiveSection(active));
    provide_context(settings.clone());

    let scroll_offset = settings.scroll_offset;
    let debug_log = settings.debug_log;
    Effect::new(move || {
        scroll_spy::start(active, scroll_offset, debug_log);
        on_cleanup(scroll_spy::stop);
    });

    view! {
        <NavBar />
        <main>
            {SECTION_ORDER
                .iter()
                .map(|&id| {
                    view! {
                        <section id=id class="page-section">
                            <h2>{section_label(id)}</h2>
                        </section>
                    }
                })
                .collect_view()}
        </main>
        <Minimap />
        <MobileNavControls />
    }
}
