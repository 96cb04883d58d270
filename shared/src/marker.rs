//! The travelling map marker.
//!
//! Motion has two layers. The authoritative position travels between
//! section locations along a cubic Hermite curve whose start tangent is the
//! marker's velocity at the moment of retargeting, so a redirect never
//! snaps or kinks. A cosmetic layer (wobble while travelling, hover while
//! idle) is computed on top of that position when rendering and never
//! feeds back into it.

use std::f64::consts::PI;
use std::rc::Rc;

use crate::animation::Animated;
use crate::geometry::Point;
use crate::locations::LocationTable;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerMotion {
    pub travel_ms: f64,
    /// Peak positional jitter while travelling, in map units.
    pub wobble_amplitude: f64,
    pub wobble_rotation_deg: f64,
    /// Peak relative scale change while travelling.
    pub wobble_scale: f64,
    /// Time between wobble noise samples.
    pub wobble_step_ms: f64,
    pub hover_amplitude: f64,
    pub hover_period_ms: f64,
}

impl Default for MarkerMotion {
    fn default() -> Self {
        Self {
            travel_ms: 1200.0,
            wobble_amplitude: 1.5,
            wobble_rotation_deg: 4.0,
            wobble_scale: 0.06,
            wobble_step_ms: 120.0,
            hover_amplitude: 4.0,
            hover_period_ms: 2400.0,
        }
    }
}

/// One leg of travel: Hermite curve from `from` to `to` with start tangent
/// `tangent` (map units per unit of progress) and zero end tangent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Travel {
    pub from: Point,
    pub tangent: Point,
    pub to: Point,
    pub start_ms: f64,
    pub duration_ms: f64,
}

impl Travel {
    pub fn progress(&self, now_ms: f64) -> f64 {
        if self.duration_ms.is_nan() || self.duration_ms <= 0.0 {
            return 1.0;
        }
        let t = (now_ms - self.start_ms) / self.duration_ms;
        if t.is_finite() { t.clamp(0.0, 1.0) } else { 1.0 }
    }

    pub fn position(&self, now_ms: f64) -> Point {
        let t = self.progress(now_ms);
        let t2 = t * t;
        let t3 = t2 * t;
        let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
        let h10 = t3 - 2.0 * t2 + t;
        let h01 = -2.0 * t3 + 3.0 * t2;
        Point::new(
            h00 * self.from.x + h10 * self.tangent.x + h01 * self.to.x,
            h00 * self.from.y + h10 * self.tangent.y + h01 * self.to.y,
        )
    }

    /// Velocity in map units per millisecond.
    pub fn velocity(&self, now_ms: f64) -> Point {
        if self.duration_ms.is_nan() || self.duration_ms <= 0.0 {
            return Point::default();
        }
        let t = self.progress(now_ms);
        if t >= 1.0 {
            return Point::default();
        }
        let t2 = t * t;
        let d00 = 6.0 * t2 - 6.0 * t;
        let d10 = 3.0 * t2 - 4.0 * t + 1.0;
        let d01 = -6.0 * t2 + 6.0 * t;
        Point::new(
            (d00 * self.from.x + d10 * self.tangent.x + d01 * self.to.x) / self.duration_ms,
            (d00 * self.from.y + d10 * self.tangent.y + d01 * self.to.y) / self.duration_ms,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MarkerPhase {
    Idle { since_ms: f64 },
    Traveling(Travel),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerState {
    pub position_x: f64,
    pub position_y: f64,
    pub is_traveling: bool,
}

/// What to draw this frame: authoritative position plus cosmetic layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerFrame {
    pub x: f64,
    pub y: f64,
    pub rotation_deg: f64,
    pub scale: f64,
    pub traveling: bool,
}

pub struct MarkerAnimator {
    locations: Rc<LocationTable>,
    motion: MarkerMotion,
    section: String,
    target: Point,
    position: Point,
    phase: MarkerPhase,
}

impl MarkerAnimator {
    /// Marker resting on `section`'s location.
    pub fn new(locations: Rc<LocationTable>, motion: MarkerMotion, section: &str, now_ms: f64) -> Self {
        let target = locations.lookup(section).point;
        Self {
            locations,
            motion,
            section: section.to_string(),
            target,
            position: target,
            phase: MarkerPhase::Idle { since_ms: now_ms },
        }
    }

    pub fn section(&self) -> &str {
        &self.section
    }

    pub fn phase(&self) -> MarkerPhase {
        self.phase
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn state(&self) -> MarkerState {
        MarkerState {
            position_x: self.position.x,
            position_y: self.position.y,
            is_traveling: matches!(self.phase, MarkerPhase::Traveling(_)),
        }
    }

    /// Head for `section`'s location. A section that resolves to the point
    /// already targeted leaves the current motion alone.
    pub fn on_active_section_change(&mut self, section: &str, now_ms: f64) {
        self.section = section.to_string();
        let target = self.locations.lookup(section).point;
        if target == self.target {
            return;
        }
        self.target = target;

        let (from, velocity) = match self.phase {
            MarkerPhase::Traveling(travel) => (travel.position(now_ms), travel.velocity(now_ms)),
            MarkerPhase::Idle { .. } => (self.position, Point::default()),
        };
        let duration_ms = self.motion.travel_ms;
        if duration_ms.is_nan() || duration_ms <= 0.0 {
            self.position = target;
            self.phase = MarkerPhase::Idle { since_ms: now_ms };
            return;
        }
        self.position = from;
        self.phase = MarkerPhase::Traveling(Travel {
            from,
            tangent: Point::new(velocity.x * duration_ms, velocity.y * duration_ms),
            to: target,
            start_ms: now_ms,
            duration_ms,
        });
    }

    /// Authoritative position plus wobble or hover at `now_ms`.
    pub fn frame(&self, now_ms: f64) -> MarkerFrame {
        let m = &self.motion;
        match self.phase {
            MarkerPhase::Traveling(travel) => {
                let progress = travel.progress(now_ms);
                let envelope = (PI * progress).sin();
                let elapsed = (now_ms - travel.start_ms).max(0.0);
                let step = if m.wobble_step_ms > 0.0 {
                    elapsed / m.wobble_step_ms
                } else {
                    0.0
                };
                MarkerFrame {
                    x: self.position.x + m.wobble_amplitude * envelope * smooth_noise(0, step),
                    y: self.position.y + m.wobble_amplitude * envelope * smooth_noise(1, step),
                    rotation_deg: m.wobble_rotation_deg * envelope * smooth_noise(2, step),
                    scale: 1.0 + m.wobble_scale * envelope * smooth_noise(3, step),
                    traveling: true,
                }
            }
            MarkerPhase::Idle { since_ms } => MarkerFrame {
                x: self.position.x,
                y: self.position.y + hover_offset(m, now_ms - since_ms),
                rotation_deg: 0.0,
                scale: 1.0,
                traveling: false,
            },
        }
    }
}

impl Animated for MarkerAnimator {
    /// Keeps requesting frames while idle too, since the hover loops.
    fn advance(&mut self, now_ms: f64) -> bool {
        if let MarkerPhase::Traveling(travel) = self.phase {
            self.position = travel.position(now_ms);
            if travel.progress(now_ms) >= 1.0 {
                self.position = travel.to;
                self.phase = MarkerPhase::Idle { since_ms: now_ms };
            }
        }
        matches!(self.phase, MarkerPhase::Traveling(_)) || self.motion.hover_amplitude > 0.0
    }
}

/// Upward hover displacement, zero at the start of each period.
fn hover_offset(motion: &MarkerMotion, elapsed_ms: f64) -> f64 {
    if motion.hover_period_ms <= 0.0 || !elapsed_ms.is_finite() {
        return 0.0;
    }
    let phase = 2.0 * PI * elapsed_ms.max(0.0) / motion.hover_period_ms;
    -motion.hover_amplitude * (0.5 - 0.5 * phase.cos())
}

/// Hash-based value noise in [-1, 1] for integer lattice `step` on `channel`.
fn lattice_noise(channel: u32, step: u64) -> f64 {
    let mut bytes = [0u8; 12];
    bytes[..4].copy_from_slice(&channel.to_le_bytes());
    bytes[4..].copy_from_slice(&step.to_le_bytes());
    let hash = crc32fast::hash(&bytes);
    hash as f64 / u32::MAX as f64 * 2.0 - 1.0
}

fn smooth_noise(channel: u32, step: f64) -> f64 {
    if !step.is_finite() {
        return 0.0;
    }
    let base = step.floor().clamp(0.0, u32::MAX as f64);
    let t = (step - base).clamp(0.0, 1.0);
    let t = t * t * (3.0 - 2.0 * t);
    let index = base as u64;
    let a = lattice_noise(channel, index);
    let b = lattice_noise(channel, index.wrapping_add(1));
    a + (b - a) * t
}
