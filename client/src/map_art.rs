use fallline_shared::geometry::Point;
use fallline_shared::locations::{PIN_FONT_SIZE, PinDef, PinIcon};
use fallline_shared::map_data::{
    BELLE_ISLE_CENTER, BELLE_ISLE_RADII, BROAD_STREET_PATH, EIGHTH_STREET_PATH, FALL_LINE_PATH,
    FLOOD_WALL_PATH, JAMES_RIVER_PATH, MANCHESTER_BRIDGE_PATH, MAP_HEIGHT, MAP_WIDTH,
};
use fallline_shared::marker::MarkerFrame;
use leptos::prelude::*;

const LAND: &str = "#f3ead8";
const WATER: &str = "#7fb3d5";
const STREET: &str = "#d6c7a8";
const TRAIL: &str = "#c0392b";
const INK: &str = "#1f2933";
const PIN_FILL: &str = "#e4572e";
const PIN_FILL_ACTIVE: &str = "#2e86de";

/// Static background: land, river, streets, trail.
#[component]
pub fn MapLayers() -> impl IntoView {
    let (isle_rx, isle_ry) = BELLE_ISLE_RADII;
    view! {
        <rect x="0" y="0" width=MAP_WIDTH.to_string() height=MAP_HEIGHT.to_string() fill=LAND />
        <path d=JAMES_RIVER_PATH fill="none" stroke=WATER stroke-width="46" stroke-linecap="round" />
        <ellipse
            cx=BELLE_ISLE_CENTER.x.to_string()
            cy=BELLE_ISLE_CENTER.y.to_string()
            rx=isle_rx.to_string()
            ry=isle_ry.to_string()
            fill="#a9cf8f"
            stroke="#6f9e55"
            stroke-width="2"
        />
        <path d=BROAD_STREET_PATH fill="none" stroke=STREET stroke-width="10" />
        <path d=EIGHTH_STREET_PATH fill="none" stroke=STREET stroke-width="6" />
        <path d=MANCHESTER_BRIDGE_PATH fill="none" stroke=STREET stroke-width="8" />
        <path d=FLOOD_WALL_PATH fill="none" stroke="#8d8d8d" stroke-width="4" stroke-dasharray="10 6" />
        <path
            d=FALL_LINE_PATH
            fill="none"
            stroke=TRAIL
            stroke-width="5"
            stroke-dasharray="14 8"
            stroke-linecap="round"
        />
    }
}

#[derive(Clone, Copy)]
pub struct PinView {
    pub section: &'static str,
    pub point: Point,
    pub pin: PinDef,
}

#[component]
pub fn MapPins(
    pins: Vec<PinView>,
    active: RwSignal<String>,
    on_pin: Callback<&'static str>,
) -> impl IntoView {
    pins.into_iter()
        .map(|entry| map_pin(entry, active, on_pin))
        .collect_view()
}

fn map_pin(entry: PinView, active: RwSignal<String>, on_pin: Callback<&'static str>) -> impl IntoView {
    let PinView { section, point, pin } = entry;
    let is_active = move || active.with(|current| current == section);
    let label = pin.label_box(false);
    let display_when_active = move || if is_active() { "inline" } else { "none" };

    view! {
        <g
            class="map-pin"
            class:active=is_active
            role="button"
            aria-label=pin.label
            transform=format!("translate({} {})", point.x, point.y)
            on:click=move |_| on_pin.run(section)
        >
            <circle
                class="pin-pulse"
                r=(pin.radius(true) + 6.0).to_string()
                fill="none"
                stroke=PIN_FILL_ACTIVE
                stroke-width="2"
                style:display=display_when_active
            />
            <circle
                r=move || pin.radius(is_active()).to_string()
                fill=move || if is_active() { PIN_FILL_ACTIVE } else { PIN_FILL }
                stroke="#ffffff"
                stroke-width="3"
            />
            {pin_icon(pin.icon)}
            <circle r="4" fill="#ffffff" style:display=display_when_active />
            <g transform=move || format!("translate(0 {})", pin.label_box(is_active()).offset_y)>
                <rect
                    x=(-label.width / 2.0).to_string()
                    y=(-label.height / 2.0).to_string()
                    width=label.width.to_string()
                    height=label.height.to_string()
                    rx="4"
                    fill="#ffffff"
                    stroke=INK
                    stroke-width="1"
                />
                <text
                    text-anchor="middle"
                    dominant-baseline="central"
                    font-size=PIN_FONT_SIZE.to_string()
                    font-weight="700"
                    fill=INK
                >
                    {pin.label}
                </text>
            </g>
        </g>
    }
}

fn pin_icon(icon: PinIcon) -> AnyView {
    match icon {
        PinIcon::Dot => ().into_any(),
        PinIcon::Bus => view! { <g transform="scale(0.55)">{bus_glyph()}</g> }.into_any(),
        PinIcon::CivicBuilding => view! {
            <g fill="#ffffff">
                <polygon points="-8,-3 0,-9 8,-3" />
                <rect x="-7" y="-3" width="14" height="2" />
                <rect x="-6" y="-1" width="2" height="7" />
                <rect x="-1" y="-1" width="2" height="7" />
                <rect x="4" y="-1" width="2" height="7" />
                <rect x="-8" y="6" width="16" height="2" />
            </g>
        }
        .into_any(),
    }
}

fn bus_glyph() -> impl IntoView {
    view! {
        <rect x="-14" y="-10" width="28" height="16" rx="3" fill="#f4b400" stroke=INK stroke-width="1.5" />
        <rect x="-11" y="-7" width="6" height="5" fill="#cfe8ff" />
        <rect x="-3" y="-7" width="6" height="5" fill="#cfe8ff" />
        <rect x="5" y="-7" width="6" height="5" fill="#cfe8ff" />
        <circle cx="-8" cy="7" r="2.5" fill=INK />
        <circle cx="8" cy="7" r="2.5" fill=INK />
    }
}

/// The travelling bus, drawn from the animator's per-frame output.
#[component]
pub fn MapMarker(frame: RwSignal<MarkerFrame>) -> impl IntoView {
    let transform = move || {
        let f = frame.get();
        format!(
            "translate({} {}) rotate({}) scale({})",
            f.x, f.y, f.rotation_deg, f.scale
        )
    };
    view! {
        <g class="map-marker" class:traveling=move || frame.with(|f| f.traveling) transform=transform>
            <ellipse cx="0" cy="12" rx="12" ry="3" fill="rgba(0,0,0,0.2)" />
            {bus_glyph()}
        </g>
    }
}
