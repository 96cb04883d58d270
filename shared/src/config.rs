use serde::Deserialize;

use crate::animation::Easing;
use crate::camera::CameraLimits;
use crate::marker::MarkerMotion;

pub const DEFAULT_VIEWPORT_WIDTH: f64 = 320.0;
pub const DEFAULT_VIEWPORT_HEIGHT: f64 = 240.0;
pub const DEFAULT_MIN_FRAME_WIDTH: f64 = 200.0;
pub const DEFAULT_MIN_FRAME_HEIGHT: f64 = 150.0;
pub const DEFAULT_MAX_FRAME_WIDTH: f64 = 640.0;
pub const DEFAULT_MAX_FRAME_HEIGHT: f64 = 480.0;
pub const DEFAULT_ZOOM_STEP: f64 = 1.25;
pub const DEFAULT_MIN_ZOOM_MULTIPLIER: f64 = 0.1;
pub const DEFAULT_MAX_ZOOM_MULTIPLIER: f64 = 5.0;
pub const DEFAULT_CAMERA_TRANSITION_MS: f64 = 900.0;
pub const DEFAULT_SNAP_TRANSITION_MS: f64 = 450.0;
pub const DEFAULT_MARKER_TRAVEL_MS: f64 = 1200.0;
pub const DEFAULT_HOVER_AMPLITUDE: f64 = 4.0;
pub const DEFAULT_HOVER_PERIOD_MS: f64 = 2400.0;
pub const DEFAULT_WOBBLE_AMPLITUDE: f64 = 1.5;
pub const DEFAULT_WOBBLE_ROTATION_DEG: f64 = 4.0;
pub const DEFAULT_WOBBLE_SCALE: f64 = 0.06;
pub const DEFAULT_WOBBLE_STEP_MS: f64 = 120.0;
/// Shortest accepted wobble lattice step.
pub const MIN_WOBBLE_STEP_MS: f64 = 1.0;
pub const DEFAULT_SCROLL_OFFSET: f64 = -80.0;
/// Pointer travel after which a press counts as a drag, not a click.
pub const DEFAULT_CLICK_SLOP_PX: f64 = 5.0;
/// Fade-out before a collapsed widget unmounts.
pub const DEFAULT_COLLAPSE_FADE_MS: u32 = 300;

/// Widget tunables. Every field is optional in JSON.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MiniMapSettings {
    pub viewport_width: f64,
    pub viewport_height: f64,
    pub min_frame_width: f64,
    pub min_frame_height: f64,
    pub max_frame_width: f64,
    pub max_frame_height: f64,
    pub zoom_step: f64,
    pub min_zoom_multiplier: f64,
    pub max_zoom_multiplier: f64,
    pub camera_transition_ms: f64,
    pub snap_transition_ms: f64,
    pub camera_easing: Easing,
    pub marker_travel_ms: f64,
    pub hover_amplitude: f64,
    pub hover_period_ms: f64,
    pub wobble_amplitude: f64,
    pub wobble_rotation_deg: f64,
    pub wobble_scale: f64,
    pub wobble_step_ms: f64,
    pub scroll_offset: f64,
    pub click_slop_px: f64,
    pub collapse_fade_ms: u32,
    pub debug_log: bool,
}

impl Default for MiniMapSettings {
    fn default() -> Self {
        Self {
            viewport_width: DEFAULT_VIEWPORT_WIDTH,
            viewport_height: DEFAULT_VIEWPORT_HEIGHT,
            min_frame_width: DEFAULT_MIN_FRAME_WIDTH,
            min_frame_height: DEFAULT_MIN_FRAME_HEIGHT,
            max_frame_width: DEFAULT_MAX_FRAME_WIDTH,
            max_frame_height: DEFAULT_MAX_FRAME_HEIGHT,
            zoom_step: DEFAULT_ZOOM_STEP,
            min_zoom_multiplier: DEFAULT_MIN_ZOOM_MULTIPLIER,
            max_zoom_multiplier: DEFAULT_MAX_ZOOM_MULTIPLIER,
            camera_transition_ms: DEFAULT_CAMERA_TRANSITION_MS,
            snap_transition_ms: DEFAULT_SNAP_TRANSITION_MS,
            camera_easing: Easing::EaseInOutCubic,
            marker_travel_ms: DEFAULT_MARKER_TRAVEL_MS,
            hover_amplitude: DEFAULT_HOVER_AMPLITUDE,
            hover_period_ms: DEFAULT_HOVER_PERIOD_MS,
            wobble_amplitude: DEFAULT_WOBBLE_AMPLITUDE,
            wobble_rotation_deg: DEFAULT_WOBBLE_ROTATION_DEG,
            wobble_scale: DEFAULT_WOBBLE_SCALE,
            wobble_step_ms: DEFAULT_WOBBLE_STEP_MS,
            scroll_offset: DEFAULT_SCROLL_OFFSET,
            click_slop_px: DEFAULT_CLICK_SLOP_PX,
            collapse_fade_ms: DEFAULT_COLLAPSE_FADE_MS,
            debug_log: false,
        }
    }
}

fn positive_or(value: f64, default: f64) -> f64 {
    Some(value)
        .filter(|v| v.is_finite() && *v > 0.0)
        .unwrap_or(default)
}

fn non_negative_or(value: f64, default: f64) -> f64 {
    Some(value)
        .filter(|v| v.is_finite() && *v >= 0.0)
        .unwrap_or(default)
}

impl MiniMapSettings {
    /// Parse and sanitize settings JSON.
    pub fn from_json(raw: &str) -> Result<Self, String> {
        serde_json::from_str::<Self>(raw)
            .map(Self::sanitized)
            .map_err(|e| format!("invalid minimap settings: {e}"))
    }

    /// Replace unusable values with defaults: non-finite or non-positive
    /// sizes and durations, inverted ranges, and a zoom step that would
    /// not change the zoom.
    pub fn sanitized(self) -> Self {
        let d = Self::default();
        let mut s = Self {
            viewport_width: positive_or(self.viewport_width, d.viewport_width),
            viewport_height: positive_or(self.viewport_height, d.viewport_height),
            min_frame_width: positive_or(self.min_frame_width, d.min_frame_width),
            min_frame_height: positive_or(self.min_frame_height, d.min_frame_height),
            max_frame_width: positive_or(self.max_frame_width, d.max_frame_width),
            max_frame_height: positive_or(self.max_frame_height, d.max_frame_height),
            zoom_step: Some(self.zoom_step)
                .filter(|v| v.is_finite() && *v > 1.0)
                .unwrap_or(d.zoom_step),
            min_zoom_multiplier: positive_or(self.min_zoom_multiplier, d.min_zoom_multiplier),
            max_zoom_multiplier: positive_or(self.max_zoom_multiplier, d.max_zoom_multiplier),
            camera_transition_ms: non_negative_or(
                self.camera_transition_ms,
                d.camera_transition_ms,
            ),
            snap_transition_ms: non_negative_or(self.snap_transition_ms, d.snap_transition_ms),
            camera_easing: self.camera_easing,
            marker_travel_ms: non_negative_or(self.marker_travel_ms, d.marker_travel_ms),
            hover_amplitude: non_negative_or(self.hover_amplitude, d.hover_amplitude),
            hover_period_ms: positive_or(self.hover_period_ms, d.hover_period_ms),
            wobble_amplitude: non_negative_or(self.wobble_amplitude, d.wobble_amplitude),
            wobble_rotation_deg: non_negative_or(self.wobble_rotation_deg, d.wobble_rotation_deg),
            wobble_scale: Some(self.wobble_scale)
                .filter(|v| v.is_finite() && (0.0..1.0).contains(v))
                .unwrap_or(d.wobble_scale),
            wobble_step_ms: Some(self.wobble_step_ms)
                .filter(|v| v.is_finite() && *v >= MIN_WOBBLE_STEP_MS)
                .unwrap_or(d.wobble_step_ms),
            scroll_offset: if self.scroll_offset.is_finite() {
                self.scroll_offset
            } else {
                d.scroll_offset
            },
            click_slop_px: non_negative_or(self.click_slop_px, d.click_slop_px),
            collapse_fade_ms: self.collapse_fade_ms,
            debug_log: self.debug_log,
        };
        if s.min_frame_width > s.max_frame_width || s.min_frame_height > s.max_frame_height {
            s.min_frame_width = d.min_frame_width;
            s.min_frame_height = d.min_frame_height;
            s.max_frame_width = d.max_frame_width;
            s.max_frame_height = d.max_frame_height;
        }
        if s.min_zoom_multiplier > 1.0
            || s.max_zoom_multiplier < 1.0
            || s.min_zoom_multiplier > s.max_zoom_multiplier
        {
            s.min_zoom_multiplier = d.min_zoom_multiplier;
            s.max_zoom_multiplier = d.max_zoom_multiplier;
        }
        s.viewport_width = s.viewport_width.clamp(s.min_frame_width, s.max_frame_width);
        s.viewport_height = s.viewport_height.clamp(s.min_frame_height, s.max_frame_height);
        s
    }

    pub fn camera_limits(&self) -> CameraLimits {
        CameraLimits {
            zoom_step: self.zoom_step,
            min_multiplier: self.min_zoom_multiplier,
            max_multiplier: self.max_zoom_multiplier,
            transition_ms: self.camera_transition_ms,
            snap_ms: self.snap_transition_ms,
            easing: self.camera_easing,
        }
    }

    pub fn marker_motion(&self) -> MarkerMotion {
        MarkerMotion {
            travel_ms: self.marker_travel_ms,
            wobble_amplitude: self.wobble_amplitude,
            wobble_rotation_deg: self.wobble_rotation_deg,
            wobble_scale: self.wobble_scale,
            wobble_step_ms: self.wobble_step_ms,
            hover_amplitude: self.hover_amplitude,
            hover_period_ms: self.hover_period_ms,
        }
    }

    /// Clamp a requested frame size to the resize bounds.
    pub fn clamp_frame(&self, width: f64, height: f64) -> (f64, f64) {
        let width = if width.is_finite() { width } else { self.viewport_width };
        let height = if height.is_finite() { height } else { self.viewport_height };
        (
            width.clamp(self.min_frame_width, self.max_frame_width),
            height.clamp(self.min_frame_height, self.max_frame_height),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_widget_constants() {
        let s = MiniMapSettings::default();
        assert_eq!((s.viewport_width, s.viewport_height), (320.0, 240.0));
        assert_eq!(s.camera_limits(), CameraLimits::default());
        assert_eq!(s.marker_motion(), MarkerMotion::default());
        assert_eq!(s.clone().sanitized(), s);
    }

    #[test]
    fn empty_json_is_default() {
        assert_eq!(MiniMapSettings::from_json("{}"), Ok(MiniMapSettings::default()));
    }

    #[test]
    fn partial_json_overrides_fields() {
        let s = MiniMapSettings::from_json(
            r#"{"zoom_step": 1.5, "camera_easing": "smoothstep", "debug_log": true}"#,
        )
        .unwrap();
        assert_eq!(s.zoom_step, 1.5);
        assert_eq!(s.camera_easing, Easing::Smoothstep);
        assert!(s.debug_log);
        assert_eq!(s.viewport_width, 320.0);
    }

    #[test]
    fn malformed_json_is_an_error() {
        let err = MiniMapSettings::from_json("{not json").unwrap_err();
        assert!(err.starts_with("invalid minimap settings"));
        assert!(MiniMapSettings::from_json(r#"{"zoom_step": "big"}"#).is_err());
    }

    #[test]
    fn sanitize_replaces_unusable_values() {
        let s = MiniMapSettings {
            viewport_width: -1.0,
            zoom_step: 0.8,
            min_zoom_multiplier: 3.0,
            max_zoom_multiplier: 2.0,
            hover_period_ms: 0.0,
            marker_travel_ms: f64::NAN,
            wobble_scale: 4.0,
            min_frame_width: 900.0,
            ..MiniMapSettings::default()
        }
        .sanitized();
        let d = MiniMapSettings::default();
        assert_eq!(s.viewport_width, d.viewport_width);
        assert_eq!(s.zoom_step, d.zoom_step);
        assert_eq!(s.min_zoom_multiplier, d.min_zoom_multiplier);
        assert_eq!(s.max_zoom_multiplier, d.max_zoom_multiplier);
        assert_eq!(s.hover_period_ms, d.hover_period_ms);
        assert_eq!(s.marker_travel_ms, d.marker_travel_ms);
        assert_eq!(s.wobble_scale, d.wobble_scale);
        assert_eq!(s.min_frame_width, d.min_frame_width);
    }

    #[test]
    fn sub_millisecond_wobble_step_is_rejected() {
        let s = MiniMapSettings::from_json(r#"{"wobble_step_ms": 1e-18}"#).unwrap();
        assert_eq!(s.wobble_step_ms, DEFAULT_WOBBLE_STEP_MS);
        let s = MiniMapSettings::from_json(r#"{"wobble_step_ms": 1.0}"#).unwrap();
        assert_eq!(s.marker_motion().wobble_step_ms, MIN_WOBBLE_STEP_MS);
    }

    #[test]
    fn viewport_is_kept_within_frame_bounds() {
        let s = MiniMapSettings {
            viewport_width: 5000.0,
            ..MiniMapSettings::default()
        }
        .sanitized();
        assert_eq!(s.viewport_width, DEFAULT_MAX_FRAME_WIDTH);
        assert_eq!(s.clamp_frame(10.0, 10_000.0), (200.0, 480.0));
        assert_eq!(s.clamp_frame(f64::NAN, 300.0), (640.0, 300.0));
    }
}
