//! Scroll-synchronized pan/zoom camera over the map.
//!
//! Offsets are in viewport pixels and place the map's top-left corner;
//! `scale` is viewport pixels per map unit. After every operation the map
//! covers the whole viewport: `scale >= min_scale` and each offset lies in
//! `[viewport_dim - map_dim * scale, 0]`.

use std::rc::Rc;

use crate::animation::{Animated, Easing, Lerp, Tween};
use crate::geometry::Point;
use crate::locations::LocationTable;
use crate::map_data::{MAP_HEIGHT, MAP_WIDTH};

/// Smallest scale at which the map fully covers a `width` x `height` viewport.
pub fn min_scale(width: f64, height: f64) -> f64 {
    let width = sanitize_dim(width);
    let height = sanitize_dim(height);
    (width / MAP_WIDTH).max(height / MAP_HEIGHT)
}

fn sanitize_dim(value: f64) -> f64 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}

fn clamp_offset(offset: f64, viewport_dim: f64, map_dim: f64, scale: f64) -> f64 {
    let lower = (viewport_dim - map_dim * scale).min(0.0);
    if offset.is_finite() {
        offset.clamp(lower, 0.0)
    } else {
        0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    pub offset_x: f64,
    pub offset_y: f64,
    pub scale: f64,
    pub viewport_width: f64,
    pub viewport_height: f64,
}

impl CameraState {
    pub fn min_scale(&self) -> f64 {
        min_scale(self.viewport_width, self.viewport_height)
    }

    /// Visible map rectangle as `(x, y, width, height)` in map units.
    pub fn visible_rect(&self) -> (f64, f64, f64, f64) {
        if self.scale <= 0.0 {
            return (0.0, 0.0, 0.0, 0.0);
        }
        (
            -self.offset_x / self.scale,
            -self.offset_y / self.scale,
            self.viewport_width / self.scale,
            self.viewport_height / self.scale,
        )
    }

    /// Map point currently at the center of the viewport.
    pub fn center(&self) -> Point {
        let (x, y, w, h) = self.visible_rect();
        Point::new(x + w / 2.0, y + h / 2.0)
    }

    /// Raise the scale to the coverage minimum and pull offsets into bounds.
    fn clamp(&mut self) {
        let floor = self.min_scale();
        if !self.scale.is_finite() || self.scale < floor {
            self.scale = floor;
        }
        self.offset_x = clamp_offset(self.offset_x, self.viewport_width, MAP_WIDTH, self.scale);
        self.offset_y = clamp_offset(self.offset_y, self.viewport_height, MAP_HEIGHT, self.scale);
    }

    fn view(&self) -> CameraView {
        CameraView {
            offset_x: self.offset_x,
            offset_y: self.offset_y,
            scale: self.scale,
        }
    }

    fn apply(&mut self, view: CameraView) {
        self.offset_x = view.offset_x;
        self.offset_y = view.offset_y;
        self.scale = view.scale;
        self.clamp();
    }
}

/// The animatable part of the camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraView {
    pub offset_x: f64,
    pub offset_y: f64,
    pub scale: f64,
}

impl Lerp for CameraView {
    fn lerp(self, other: Self, t: f64) -> Self {
        Self {
            offset_x: self.offset_x.lerp(other.offset_x, t),
            offset_y: self.offset_y.lerp(other.offset_y, t),
            scale: self.scale.lerp(other.scale, t),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraLimits {
    pub zoom_step: f64,
    pub min_multiplier: f64,
    pub max_multiplier: f64,
    pub transition_ms: f64,
    pub snap_ms: f64,
    pub easing: Easing,
}

impl Default for CameraLimits {
    fn default() -> Self {
        Self {
            zoom_step: 1.25,
            min_multiplier: 0.1,
            max_multiplier: 5.0,
            transition_ms: 900.0,
            snap_ms: 450.0,
            easing: Easing::EaseInOutCubic,
        }
    }
}

pub struct CameraController {
    state: CameraState,
    locations: Rc<LocationTable>,
    limits: CameraLimits,
    active_section: String,
    zoom_multiplier: f64,
    transition: Option<Tween<CameraView>>,
    dragging: bool,
    /// A section change arrived while dragging and has not been applied.
    deferred_change: bool,
}

impl CameraController {
    /// Camera centered on `section` with no transition running.
    pub fn new(
        locations: Rc<LocationTable>,
        limits: CameraLimits,
        viewport_width: f64,
        viewport_height: f64,
        section: &str,
    ) -> Self {
        let mut camera = Self {
            state: CameraState {
                offset_x: 0.0,
                offset_y: 0.0,
                scale: 1.0,
                viewport_width: sanitize_dim(viewport_width),
                viewport_height: sanitize_dim(viewport_height),
            },
            locations,
            limits,
            active_section: section.to_string(),
            zoom_multiplier: 1.0,
            transition: None,
            dragging: false,
            deferred_change: false,
        };
        let view = camera.target_view();
        camera.state.apply(view);
        camera
    }

    pub fn state(&self) -> &CameraState {
        &self.state
    }

    pub fn active_section(&self) -> &str {
        &self.active_section
    }

    pub fn zoom_multiplier(&self) -> f64 {
        self.zoom_multiplier
    }

    pub fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Whether a section change is waiting for the next snap or change.
    pub fn has_deferred_change(&self) -> bool {
        self.deferred_change
    }

    /// The scale the current section and zoom multiplier ask for.
    pub fn target_scale(&self) -> f64 {
        let base = self.locations.lookup(&self.active_section).scale;
        let raw = base * self.zoom_multiplier;
        let floor = self.state.min_scale();
        if raw.is_finite() && raw > floor {
            raw
        } else {
            floor.max(f64::MIN_POSITIVE)
        }
    }

    /// Centered-on-section view for the current viewport, clamped to bounds.
    pub fn target_view(&self) -> CameraView {
        let location = self.locations.lookup(&self.active_section);
        let scale = self.target_scale();
        let vw = self.state.viewport_width;
        let vh = self.state.viewport_height;
        CameraView {
            offset_x: clamp_offset(vw / 2.0 - location.point.x * scale, vw, MAP_WIDTH, scale),
            offset_y: clamp_offset(vh / 2.0 - location.point.y * scale, vh, MAP_HEIGHT, scale),
            scale,
        }
    }

    /// Retarget toward `section`. An in-flight transition is replaced,
    /// starting from wherever it currently is. The zoom multiplier is kept.
    pub fn on_active_section_change(&mut self, section: &str, now_ms: f64) {
        if section == self.active_section && !self.deferred_change {
            return;
        }
        self.active_section = section.to_string();
        if self.dragging {
            self.deferred_change = true;
            return;
        }
        self.deferred_change = false;
        self.start_transition(now_ms, self.limits.transition_ms);
    }

    /// User pan by a viewport-pixel delta. Cancels any automatic transition.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.transition = None;
        let dx = if dx.is_finite() { dx } else { 0.0 };
        let dy = if dy.is_finite() { dy } else { 0.0 };
        self.state.offset_x += dx;
        self.state.offset_y += dy;
        self.state.clamp();
    }

    /// Pointer went down on the map: manual control overrides recentering.
    pub fn begin_drag(&mut self) {
        self.dragging = true;
        self.transition = None;
    }

    /// Pointer released. The camera stays where the user left it.
    pub fn end_drag(&mut self) {
        self.dragging = false;
    }

    /// Multiply the zoom multiplier by the zoom step and recenter on the
    /// active section.
    pub fn zoom_in(&mut self, now_ms: f64) {
        let next = self.zoom_multiplier * self.limits.zoom_step;
        self.set_multiplier(next.min(self.limits.max_multiplier), now_ms);
    }

    pub fn zoom_out(&mut self, now_ms: f64) {
        let next = self.zoom_multiplier / self.limits.zoom_step;
        self.set_multiplier(next.max(self.limits.min_multiplier), now_ms);
    }

    fn set_multiplier(&mut self, multiplier: f64, now_ms: f64) {
        self.zoom_multiplier = multiplier;
        self.dragging = false;
        self.deferred_change = false;
        self.start_transition(now_ms, self.limits.transition_ms);
    }

    /// Reset zoom and discard manual pan, recentering on the active section.
    pub fn snap_to_active(&mut self, now_ms: f64) {
        self.zoom_multiplier = 1.0;
        self.dragging = false;
        self.deferred_change = false;
        self.start_transition(now_ms, self.limits.snap_ms);
    }

    /// New viewport size. Degenerate sizes (zero, negative, NaN) collapse to
    /// zero without disturbing the scale.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.state.viewport_width = sanitize_dim(width);
        self.state.viewport_height = sanitize_dim(height);
        self.state.clamp();
        let target = self.target_view();
        if let Some(tween) = self.transition.as_mut() {
            tween.to = target;
        }
    }

    fn start_transition(&mut self, now_ms: f64, duration_ms: f64) {
        // Sample the running transition first so the new one starts from
        // the camera's present position.
        self.sample(now_ms);
        let from = self.state.view();
        let to = self.target_view();
        if duration_ms <= 0.0 || from == to {
            self.state.apply(to);
            self.transition = None;
            return;
        }
        self.transition = Some(Tween::new(from, to, now_ms, duration_ms, self.limits.easing));
    }

    fn sample(&mut self, now_ms: f64) {
        let Some(tween) = self.transition else {
            return;
        };
        self.state.apply(tween.sample(now_ms));
        if tween.is_finished(now_ms) {
            self.transition = None;
        }
    }
}

impl Animated for CameraController {
    fn advance(&mut self, now_ms: f64) -> bool {
        self.sample(now_ms);
        self.transition.is_some()
    }
}
