use std::cell::{Cell, RefCell};
use std::rc::Rc;

use fallline_shared::map_data::{LOCATIONS, path_registry};
use fallline_shared::{
    Animated, CameraController, LocationResolver, LocationTable, MarkerAnimator, MiniMapSettings,
    SECTION_ORDER, section_label,
};
use gloo_timers::callback::Timeout;
use leptos::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Event, PointerEvent};

use crate::app::{ActiveSection, navigate_to_section, now_ms};
use crate::listeners::{self, ListenerBinding};
use crate::map_art::{MapLayers, MapMarker, MapPins, PinView};
use crate::render_loop::RenderScheduler;

struct MinimapRuntime {
    scheduler: Rc<RenderScheduler>,
    _visibility: Option<ListenerBinding>,
    debug_log: bool,
}

thread_local! {
    static LOCATION_RESOLVER: RefCell<Option<LocationResolver>> = const { RefCell::new(None) };
    static MINIMAP_RUNTIME: RefCell<Option<MinimapRuntime>> = const { RefCell::new(None) };
    /// Window listeners of the drag or resize gesture in progress.
    static POINTER_SESSION: RefCell<Vec<ListenerBinding>> = const { RefCell::new(Vec::new()) };
}

/// Section locations, resolved once per page load. Later mounts reuse the
/// finished table.
fn location_table(debug_log: bool) -> Rc<LocationTable> {
    LOCATION_RESOLVER.with(|slot| {
        let mut slot = slot.borrow_mut();
        let resolver = slot.get_or_insert_with(|| LocationResolver::new(LOCATIONS));
        if resolver.is_complete() {
            return resolver.table();
        }

        let (registry, errors) = path_registry();
        for e in &errors {
            web_sys::console::warn_1(&format!("Minimap path skipped: {e}").into());
        }
        let table = resolver.resolve(&registry);
        if !resolver.is_complete() {
            return table;
        }
        if !resolver.unresolved().is_empty() {
            web_sys::console::warn_1(
                &format!(
                    "Minimap using fallback coordinates for {:?}",
                    resolver.unresolved()
                )
                .into(),
            );
        }
        if debug_log {
            let unmapped: Vec<&str> = SECTION_ORDER
                .iter()
                .copied()
                .filter(|id| !table.contains(id))
                .collect();
            web_sys::console::info_1(
                &format!(
                    "minimap_geometry_resolved locations={} passes={} unmapped={unmapped:?}",
                    table.len(),
                    resolver.passes()
                )
                .into(),
            );
        }
        table
    })
}

fn begin_pointer_session(bindings: Vec<Option<ListenerBinding>>) {
    end_pointer_session();
    POINTER_SESSION.with(|slot| slot.borrow_mut().extend(bindings.into_iter().flatten()));
}

fn end_pointer_session() {
    let bindings = POINTER_SESSION.with(|slot| std::mem::take(&mut *slot.borrow_mut()));
    listeners::release_all(bindings);
}

fn teardown_minimap() {
    end_pointer_session();
    let runtime = MINIMAP_RUNTIME.with(|slot| slot.borrow_mut().take());
    if let Some(runtime) = runtime {
        runtime.scheduler.cancel();
        if runtime.debug_log {
            web_sys::console::info_1(&"minimap_unmounted".into());
        }
    }
}

/// Dock holding the map widget, or the "Show Map" button while collapsed.
#[component]
pub fn Minimap() -> impl IntoView {
    let settings: MiniMapSettings = expect_context();
    let visible = RwSignal::new(true);
    let closing = RwSignal::new(false);
    let fade_ms = settings.collapse_fade_ms;

    let collapse = Callback::new(move |_: ()| {
        if closing.get_untracked() {
            return;
        }
        closing.set(true);
        Timeout::new(fade_ms, move || {
            let _ = visible.try_set(false);
            let _ = closing.try_set(false);
        })
        .forget();
    });
    let select = Callback::new(move |section: &'static str| navigate_to_section(section));

    view! {
        <div class="minimap-dock">
            {move || {
                if visible.get() {
                    view! { <MinimapFrame on_collapse=collapse on_select=select closing=closing /> }
                        .into_any()
                } else {
                    view! {
                        <button class="minimap-show" on:click=move |_| visible.set(true)>
                            "Show Map"
                        </button>
                    }
                        .into_any()
                }
            }}
        </div>
    }
}

#[component]
fn MinimapFrame(
    on_collapse: Callback<()>,
    on_select: Callback<&'static str>,
    closing: RwSignal<bool>,
) -> impl IntoView {
    let settings: MiniMapSettings = expect_context();
    let ActiveSection(active) = expect_context();
    let debug_log = settings.debug_log;
    let click_slop = settings.click_slop_px;

    let table = location_table(debug_log);
    let start_section = active.get_untracked();
    let start_ms = now_ms();

    let frame_size = RwSignal::new((settings.viewport_width, settings.viewport_height));
    let camera = Rc::new(RefCell::new(CameraController::new(
        table.clone(),
        settings.camera_limits(),
        settings.viewport_width,
        settings.viewport_height,
        &start_section,
    )));
    let marker = Rc::new(RefCell::new(MarkerAnimator::new(
        table.clone(),
        settings.marker_motion(),
        &start_section,
        start_ms,
    )));
    let camera_state = RwSignal::new(*camera.borrow().state());
    let marker_frame = RwSignal::new(marker.borrow().frame(start_ms));
    let dragging = RwSignal::new(false);
    // Pointer travel since the last press, for telling clicks from drags.
    let drag_travel = StoredValue::new(0.0f64);

    let scheduler = Rc::new(RenderScheduler::new({
        let camera = camera.clone();
        let marker = marker.clone();
        move |now| {
            let camera_busy = camera.borrow_mut().advance(now);
            let marker_busy = marker.borrow_mut().advance(now);
            camera_state.set(*camera.borrow().state());
            marker_frame.set(marker.borrow().frame(now));
            camera_busy || marker_busy
        }
    }));

    // Section changes retarget both controllers; neither reads the other.
    Effect::new({
        let camera = camera.clone();
        let marker = marker.clone();
        let scheduler = scheduler.clone();
        let table = table.clone();
        move || {
            let section = active.get();
            if debug_log && !table.contains(&section) {
                web_sys::console::info_1(
                    &format!("minimap_section_unmapped id={section}").into(),
                );
            }
            let now = now_ms();
            camera.borrow_mut().on_active_section_change(&section, now);
            marker.borrow_mut().on_active_section_change(&section, now);
            scheduler.mark_dirty();
        }
    });

    Effect::new({
        let camera = camera.clone();
        let scheduler = scheduler.clone();
        move || {
            let (width, height) = frame_size.get();
            let state = {
                let mut camera = camera.borrow_mut();
                camera.resize(width, height);
                *camera.state()
            };
            camera_state.set(state);
            scheduler.mark_dirty();
        }
    });

    let visibility = listeners::on_document("visibilitychange", {
        let scheduler = scheduler.clone();
        move |_| {
            let hidden = web_sys::window()
                .and_then(|w| w.document())
                .is_some_and(|d| d.hidden());
            scheduler.set_paused(hidden);
            if !hidden {
                scheduler.mark_dirty();
            }
        }
    });

    let previous = MINIMAP_RUNTIME.with(|slot| {
        slot.borrow_mut().replace(MinimapRuntime {
            scheduler: scheduler.clone(),
            _visibility: visibility,
            debug_log,
        })
    });
    if let Some(previous) = previous {
        previous.scheduler.cancel();
    }
    on_cleanup(teardown_minimap);
    scheduler.mark_dirty();
    if debug_log {
        web_sys::console::info_1(&format!("minimap_mounted section={start_section}").into());
    }

    let on_map_pointer_down = {
        let camera = camera.clone();
        move |e: PointerEvent| {
            if e.button() != 0 {
                return;
            }
            drag_travel.set_value(0.0);
            let last = Rc::new(Cell::new((e.client_x() as f64, e.client_y() as f64)));
            let started = Rc::new(Cell::new(false));

            let on_move = {
                let camera = camera.clone();
                let last = last.clone();
                let started = started.clone();
                move |ev: Event| {
                    let Ok(ev) = ev.dyn_into::<PointerEvent>() else {
                        return;
                    };
                    let (x, y) = (ev.client_x() as f64, ev.client_y() as f64);
                    let (last_x, last_y) = last.replace((x, y));
                    let (dx, dy) = (x - last_x, y - last_y);
                    drag_travel.update_value(|travel| *travel += dx.hypot(dy));

                    let mut camera = camera.borrow_mut();
                    if !started.get() {
                        if drag_travel.get_value() < click_slop {
                            return;
                        }
                        started.set(true);
                        camera.begin_drag();
                        dragging.set(true);
                    }
                    camera.pan(dx, dy);
                    camera_state.set(*camera.state());
                }
            };
            let on_release = {
                let camera = camera.clone();
                move |_: Event| {
                    if started.get() {
                        camera.borrow_mut().end_drag();
                        dragging.set(false);
                    }
                    end_pointer_session();
                }
            };

            begin_pointer_session(vec![
                listeners::on_window("pointermove", true, on_move),
                listeners::on_window("pointerup", true, on_release.clone()),
                listeners::on_window("pointercancel", true, on_release.clone()),
                listeners::on_window("blur", true, on_release),
            ]);
        }
    };

    // Handle sits on the top-left corner of a bottom-right anchored frame,
    // so moving it up/left grows the frame.
    let on_resize_pointer_down = {
        let bounds = settings.clone();
        move |e: PointerEvent| {
            e.stop_propagation();
            e.prevent_default();
            let origin = (e.client_x() as f64, e.client_y() as f64);
            let start = frame_size.get_untracked();
            let bounds = bounds.clone();
            let on_move = move |ev: Event| {
                let Ok(ev) = ev.dyn_into::<PointerEvent>() else {
                    return;
                };
                let dx = ev.client_x() as f64 - origin.0;
                let dy = ev.client_y() as f64 - origin.1;
                frame_size.set(bounds.clamp_frame(start.0 - dx, start.1 - dy));
            };
            let on_release = move |_: Event| end_pointer_session();

            begin_pointer_session(vec![
                listeners::on_window("pointermove", true, on_move),
                listeners::on_window("pointerup", true, on_release),
                listeners::on_window("pointercancel", true, on_release),
                listeners::on_window("blur", true, on_release),
            ]);
        }
    };

    let on_zoom_in = {
        let camera = camera.clone();
        let scheduler = scheduler.clone();
        move |_| {
            camera.borrow_mut().zoom_in(now_ms());
            dragging.set(false);
            scheduler.mark_dirty();
        }
    };
    let on_zoom_out = {
        let camera = camera.clone();
        let scheduler = scheduler.clone();
        move |_| {
            camera.borrow_mut().zoom_out(now_ms());
            dragging.set(false);
            scheduler.mark_dirty();
        }
    };
    let on_snap = {
        let camera = camera.clone();
        let scheduler = scheduler.clone();
        move |_| {
            camera.borrow_mut().snap_to_active(now_ms());
            dragging.set(false);
            scheduler.mark_dirty();
        }
    };

    let pins: Vec<PinView> = table
        .pins()
        .map(|(location, pin)| PinView {
            section: location.section,
            point: location.point,
            pin,
        })
        .collect();
    let on_pin = Callback::new(move |section: &'static str| {
        if drag_travel.get_value() < click_slop {
            on_select.run(section);
        }
    });

    let map_transform = move || {
        let c = camera_state.get();
        format!("translate({} {}) scale({})", c.offset_x, c.offset_y, c.scale)
    };
    let location_text = move || {
        active.with(|section| format!("Current Location: {}", section_label(section)))
    };

    view! {
        <div
            class="minimap"
            class:closing=move || closing.get()
            style:width=move || format!("{}px", frame_size.get().0)
            style:height=move || format!("{}px", frame_size.get().1)
        >
            <svg
                class="minimap-map"
                class:dragging=move || dragging.get()
                width="100%"
                height="100%"
                on:pointerdown=on_map_pointer_down
            >
                <g transform=map_transform>
                    <MapLayers />
                    <MapPins pins=pins active=active on_pin=on_pin />
                    <MapMarker frame=marker_frame />
                </g>
            </svg>
            <button class="minimap-btn minimap-snap" title="Snap to location" on:click=on_snap>
                "◎"
            </button>
            <div class="minimap-zoom">
                <button class="minimap-btn" title="Zoom in" on:click=on_zoom_in>
                    "+"
                </button>
                <button class="minimap-btn" title="Zoom out" on:click=on_zoom_out>
                    "−"
                </button>
            </div>
            <div class="minimap-hint">"Drag to pan"</div>
            <button
                class="minimap-btn minimap-collapse"
                title="Hide map"
                on:click=move |_| on_collapse.run(())
            >
                "×"
            </button>
            <div class="minimap-resize" title="Resize map" on:pointerdown=on_resize_pointer_down />
            <div class="sr-only" aria-live="polite">
                {location_text}
            </div>
        </div>
    }
}
