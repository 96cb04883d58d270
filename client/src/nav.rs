use fallline_shared::SectionOrder;
use fallline_shared::sections::NAV_LABELS;
use leptos::prelude::*;

use crate::app::{ActiveSection, navigate_to_section};

#[component]
pub fn NavBar() -> impl IntoView {
    let ActiveSection(active) = expect_context();
    view! {
        <nav class="site-nav">
            {NAV_LABELS
                .iter()
                .map(|&(id, label)| {
                    view! {
                        <button
                            class="nav-link"
                            class:active=move || active.with(|current| current == id)
                            on:click=move |_| navigate_to_section(id)
                        >
                            {label}
                        </button>
                    }
                })
                .collect_view()}
        </nav>
    }
}

/// Prev/next buttons for small screens.
#[component]
pub fn MobileNavControls() -> impl IntoView {
    let ActiveSection(active) = expect_context();
    let order = SectionOrder::default();

    let go_prev = move |_| {
        if let Some(id) = active.with_untracked(|current| order.prev(current)) {
            navigate_to_section(id);
        }
    };
    let go_next = move |_| {
        if let Some(id) = active.with_untracked(|current| order.next(current)) {
            navigate_to_section(id);
        }
    };

    view! {
        <div class="mobile-nav">
            <button
                class="mobile-nav-btn"
                aria-label="Previous section"
                disabled=move || active.with(|current| order.is_first(current))
                on:click=go_prev
            >
                "↑"
            </button>
            <button
                class="mobile-nav-btn"
                aria-label="Next section"
                disabled=move || active.with(|current| order.is_last(current))
                on:click=go_next
            >
                "↓"
            </button>
        </div>
    }
}
