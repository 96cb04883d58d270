pub mod animation;
pub mod camera;
pub mod config;
pub mod geometry;
pub mod locations;
pub mod map_data;
pub mod marker;
pub mod scroll;
pub mod sections;

pub use animation::{Animated, Easing, FixedStepClock, Lerp, Tween};
pub use camera::{CameraController, CameraLimits, CameraState, CameraView, min_scale};
pub use config::MiniMapSettings;
pub use geometry::{PathGeometry, PathRegistry, PathSampler, Point};
pub use locations::{LocationResolver, LocationTable, PinDef, PinIcon, ResolvedLocation};
pub use marker::{MarkerAnimator, MarkerFrame, MarkerMotion, MarkerState};
pub use scroll::{ScrollSpy, SectionExtent};
pub use sections::{DEFAULT_SECTION, SECTION_ORDER, SectionOrder, section_label};
