use std::collections::HashMap;

use kurbo::{BezPath, ParamCurve, ParamCurveArclen, PathSeg};

/// A point in map space.
pub use kurbo::Point;

/// Accuracy passed to kurbo's arc-length solvers, in map units.
const ARCLEN_ACCURACY: f64 = 1e-6;

/// Source of arc-length samples for named paths.
///
/// Returning `None` means the path is not available (yet); callers fall back
/// to whatever fixed coordinate they have for it.
pub trait PathSampler {
    fn total_length(&self, path_id: &str) -> Option<f64>;
    fn point_at_length(&self, path_id: &str, length: f64) -> Option<Point>;
}

/// Drawable segments of an SVG path with cumulative arc lengths.
#[derive(Debug, Clone, PartialEq)]
pub struct PathGeometry {
    segments: Vec<PathSeg>,
    /// `lengths[i]` is the distance travelled along the path to the end of
    /// `segments[i]`.
    lengths: Vec<f64>,
}

impl PathGeometry {
    /// Parse SVG path data. Moves between subpaths contribute no length.
    pub fn parse(d: &str) -> Result<Self, String> {
        let path = BezPath::from_svg(d).map_err(|e| e.to_string())?;
        let segments: Vec<PathSeg> = path.segments().collect();
        if segments.is_empty() {
            return Err("path has no drawable segments".into());
        }

        let mut travelled = 0.0;
        let lengths = segments
            .iter()
            .map(|seg| {
                travelled += seg.arclen(ARCLEN_ACCURACY);
                travelled
            })
            .collect();
        Ok(Self { segments, lengths })
    }

    pub fn length(&self) -> f64 {
        self.lengths.last().copied().unwrap_or(0.0)
    }

    pub fn start(&self) -> Point {
        self.segments
            .first()
            .map(ParamCurve::start)
            .unwrap_or_default()
    }

    pub fn end(&self) -> Point {
        self.segments.last().map(ParamCurve::end).unwrap_or_default()
    }

    /// Point at `length` along the path, clamped to its ends.
    pub fn point_at_length(&self, length: f64) -> Point {
        if !length.is_finite() || length <= 0.0 {
            return self.start();
        }
        if length >= self.length() {
            return self.end();
        }

        // First segment whose end reaches the requested length.
        let i = self
            .lengths
            .partition_point(|&l| l < length)
            .min(self.segments.len() - 1);
        let seg = self.segments[i];
        let seg_start = if i == 0 { 0.0 } else { self.lengths[i - 1] };
        if self.lengths[i] - seg_start <= f64::EPSILON {
            return seg.end();
        }
        let t = seg.inv_arclen(length - seg_start, ARCLEN_ACCURACY);
        seg.eval(t.clamp(0.0, 1.0))
    }
}

/// Named path geometries parsed from their drawing commands.
#[derive(Debug, Clone, Default)]
pub struct PathRegistry {
    paths: HashMap<String, PathGeometry>,
}

impl PathRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and register `d` under `id`, replacing any previous entry.
    pub fn register(&mut self, id: &str, d: &str) -> Result<(), String> {
        let geometry = PathGeometry::parse(d).map_err(|e| format!("path {id}: {e}"))?;
        self.paths.insert(id.to_string(), geometry);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl PathSampler for PathRegistry {
    fn total_length(&self, path_id: &str) -> Option<f64> {
        self.paths.get(path_id).map(PathGeometry::length)
    }

    fn point_at_length(&self, path_id: &str, length: f64) -> Option<Point> {
        self.paths
            .get(path_id)
            .map(|path| path.point_at_length(length))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64, tolerance: f64) {
        let diff = (actual - expected).abs();
        assert!(
            diff < tolerance,
            "expected {expected}, got {actual} (diff: {diff})"
        );
    }

    fn assert_point(actual: Point, x: f64, y: f64) {
        assert_close(actual.x, x, 1e-9);
        assert_close(actual.y, y, 1e-9);
    }

    #[test]
    fn straight_lines_have_exact_length() {
        let path = PathGeometry::parse("M350,0 L350,160 L720,160").unwrap();
        assert_close(path.length(), 530.0, 1e-9);
        assert_point(path.point_at_length(300.0), 490.0, 160.0);
        assert_point(path.point_at_length(160.0), 350.0, 160.0);
    }

    #[test]
    fn point_at_length_clamps_to_ends() {
        let path = PathGeometry::parse("M0,0 L100,0").unwrap();
        assert_eq!(path.point_at_length(-10.0), Point::new(0.0, 0.0));
        assert_eq!(path.point_at_length(f64::NAN), Point::new(0.0, 0.0));
        assert_eq!(path.point_at_length(500.0), Point::new(100.0, 0.0));
        assert_point(path.point_at_length(25.0), 25.0, 0.0);
    }

    #[test]
    fn relative_and_axis_commands() {
        let path = PathGeometry::parse("m10 10 h20 v20 H10 z").unwrap();
        assert_close(path.length(), 80.0, 1e-9);
        assert_eq!(path.end(), Point::new(10.0, 10.0));
    }

    #[test]
    fn implicit_lineto_after_moveto() {
        let path = PathGeometry::parse("M0 0 10 0 10 10").unwrap();
        assert_close(path.length(), 20.0, 1e-9);
    }

    #[test]
    fn exponent_and_signed_numbers() {
        let path = PathGeometry::parse("M-5-5L0.5,0.5").unwrap();
        assert_eq!(path.start(), Point::new(-5.0, -5.0));
        assert_eq!(path.end(), Point::new(0.5, 0.5));

        let path = PathGeometry::parse("M1e2,0 L2E2,0").unwrap();
        assert_close(path.length(), 100.0, 1e-9);
    }

    #[test]
    fn curves_end_on_their_endpoint() {
        let path =
            PathGeometry::parse("M-50,300 C200,350 300,550 500,550 C700,550 900,450 1250,500")
                .unwrap();
        assert_eq!(path.end(), Point::new(1250.0, 500.0));
        // Longer than the chord, shorter than the control polygon.
        let chord = Point::new(-50.0, 300.0).distance(Point::new(1250.0, 500.0));
        assert!(path.length() > chord);
        assert!(path.length() < chord * 1.5);
    }

    #[test]
    fn sampling_a_curve_is_monotonic() {
        let path = PathGeometry::parse("M450,650 C550,680 650,670 750,620").unwrap();
        let total = path.length();
        let mut previous = path.start();
        for i in 1..=20 {
            let p = path.point_at_length(total * i as f64 / 20.0);
            assert!(p.x > previous.x);
            // Consecutive samples are about one twentieth of the length apart.
            assert!(p.distance(previous) <= total / 20.0 + 1e-3);
            previous = p;
        }
        assert_point(previous, 750.0, 620.0);
    }

    #[test]
    fn quadratic_on_its_chord_is_a_straight_line() {
        let path = PathGeometry::parse("M0,0 Q50,0 100,0").unwrap();
        assert_close(path.length(), 100.0, 1e-6);
        assert_close(path.point_at_length(50.0).x, 50.0, 1e-3);
    }

    #[test]
    fn subpath_jumps_add_no_length() {
        let path = PathGeometry::parse("M0,0 L10,0 M100,0 L110,0").unwrap();
        assert_close(path.length(), 20.0, 1e-9);
        assert_point(path.point_at_length(15.0), 105.0, 0.0);
    }

    #[test]
    fn rejects_malformed_paths() {
        assert!(PathGeometry::parse("").is_err());
        assert!(PathGeometry::parse("L10,10").is_err());
        assert!(PathGeometry::parse("M0,0 L10").is_err());
        assert!(PathGeometry::parse("M0,0 L#,2").is_err());
        assert!(PathGeometry::parse("M0,0").is_err());
    }

    #[test]
    fn registry_samples_by_id() {
        let mut registry = PathRegistry::new();
        registry.register("trail", "M0,0 L0,100").unwrap();
        assert_eq!(registry.total_length("trail"), Some(100.0));
        let p = registry.point_at_length("trail", 40.0).unwrap();
        assert_point(p, 0.0, 40.0);
        assert_eq!(registry.total_length("river"), None);
        assert!(registry.register("broken", "Q").is_err());
        assert_eq!(registry.len(), 1);
    }
}
