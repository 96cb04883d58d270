use std::rc::Rc;

use crate::geometry::{PathSampler, Point};
use crate::map_data::{MAP_HEIGHT, MAP_WIDTH};
use crate::sections::DEFAULT_SECTION;

/// Setup passes attempted before unresolved path anchors are finalized on
/// their fallback coordinates.
pub const MAX_SETUP_PASSES: u32 = 2;

/// Where a section sits on the map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Anchor {
    Fixed(Point),
    /// A fractional distance along a named path, with a fixed coordinate to
    /// use while the path is unavailable.
    OnPath {
        path_id: &'static str,
        fraction: f64,
        fallback: Point,
    },
}

impl Anchor {
    pub fn fallback(&self) -> Point {
        match *self {
            Anchor::Fixed(p) => p,
            Anchor::OnPath { fallback, .. } => fallback,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinIcon {
    Dot,
    Bus,
    CivicBuilding,
}

/// Label box around a pin's caption.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelBox {
    pub width: f64,
    pub height: f64,
    /// Vertical offset of the box center from the pin.
    pub offset_y: f64,
}

pub const PIN_FONT_SIZE: f64 = 12.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinDef {
    pub label: &'static str,
    pub icon: PinIcon,
}

impl PinDef {
    pub fn radius(&self, active: bool) -> f64 {
        if active { 18.0 } else { 14.0 }
    }

    pub fn label_box(&self, active: bool) -> LabelBox {
        let char_width = PIN_FONT_SIZE * 0.65;
        LabelBox {
            width: self.label.chars().count() as f64 * char_width + 16.0,
            height: PIN_FONT_SIZE + 8.0,
            offset_y: if active { -40.0 } else { -32.0 },
        }
    }
}

/// Static description of one section's map location.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocationDef {
    pub section: &'static str,
    pub anchor: Anchor,
    /// Camera scale used when this section is active (before the zoom multiplier).
    pub scale: f64,
    pub pin: Option<PinDef>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedLocation {
    pub section: &'static str,
    pub point: Point,
    pub scale: f64,
    pub pin: Option<PinDef>,
}

/// Read-only section → location lookup, resolved once at setup.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationTable {
    entries: Vec<ResolvedLocation>,
}

impl LocationTable {
    pub fn get(&self, section: &str) -> Option<&ResolvedLocation> {
        self.entries.iter().find(|e| e.section == section)
    }

    /// Location for `section`, falling back to the default section, then to a
    /// map-wide view. Never fails.
    pub fn lookup(&self, section: &str) -> ResolvedLocation {
        self.get(section)
            .or_else(|| self.get(DEFAULT_SECTION))
            .or_else(|| self.entries.first())
            .copied()
            .unwrap_or(ResolvedLocation {
                section: DEFAULT_SECTION,
                point: Point::new(MAP_WIDTH / 2.0, MAP_HEIGHT / 2.0),
                scale: 1.0,
                pin: None,
            })
    }

    pub fn contains(&self, section: &str) -> bool {
        self.get(section).is_some()
    }

    /// Entries that render a pin, in definition order.
    pub fn pins(&self) -> impl Iterator<Item = (&ResolvedLocation, PinDef)> {
        self.entries.iter().filter_map(|e| e.pin.map(|pin| (e, pin)))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Resolve every definition to a concrete point.
///
/// Returns the table plus the sections whose path was unavailable and fell
/// back to their fixed coordinate.
pub fn resolve_locations(
    defs: &[LocationDef],
    sampler: &dyn PathSampler,
) -> (LocationTable, Vec<&'static str>) {
    let mut unresolved = Vec::new();
    let entries = defs
        .iter()
        .map(|def| {
            let point = match def.anchor {
                Anchor::Fixed(p) => p,
                Anchor::OnPath {
                    path_id,
                    fraction,
                    fallback,
                } => match sample_fraction(sampler, path_id, fraction) {
                    Some(p) => p,
                    None => {
                        unresolved.push(def.section);
                        fallback
                    }
                },
            };
            ResolvedLocation {
                section: def.section,
                point,
                scale: def.scale,
                pin: def.pin,
            }
        })
        .collect();
    (LocationTable { entries }, unresolved)
}

fn sample_fraction(sampler: &dyn PathSampler, path_id: &str, fraction: f64) -> Option<Point> {
    let total = sampler.total_length(path_id)?;
    if !total.is_finite() || total <= 0.0 {
        return None;
    }
    let fraction = if fraction.is_finite() {
        fraction.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let p = sampler.point_at_length(path_id, total * fraction)?;
    (p.x.is_finite() && p.y.is_finite()).then_some(p)
}

/// One-shot resolver: resolves until every anchor succeeds (or the pass
/// budget runs out) and then serves the cached table forever.
#[derive(Debug)]
pub struct LocationResolver {
    defs: &'static [LocationDef],
    table: Rc<LocationTable>,
    unresolved: Vec<&'static str>,
    passes: u32,
    complete: bool,
}

impl LocationResolver {
    /// Starts out serving fixed/fallback coordinates for every definition.
    pub fn new(defs: &'static [LocationDef]) -> Self {
        let entries = defs
            .iter()
            .map(|def| ResolvedLocation {
                section: def.section,
                point: def.anchor.fallback(),
                scale: def.scale,
                pin: def.pin,
            })
            .collect();
        let unresolved = defs
            .iter()
            .filter(|def| matches!(def.anchor, Anchor::OnPath { .. }))
            .map(|def| def.section)
            .collect();
        Self {
            defs,
            table: Rc::new(LocationTable { entries }),
            unresolved,
            passes: 0,
            complete: false,
        }
    }

    /// Run a setup pass unless setup already completed.
    pub fn resolve(&mut self, sampler: &dyn PathSampler) -> Rc<LocationTable> {
        if !self.complete {
            let (table, unresolved) = resolve_locations(self.defs, sampler);
            self.passes += 1;
            self.table = Rc::new(table);
            self.complete = unresolved.is_empty() || self.passes >= MAX_SETUP_PASSES;
            self.unresolved = unresolved;
        }
        Rc::clone(&self.table)
    }

    pub fn table(&self) -> Rc<LocationTable> {
        Rc::clone(&self.table)
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn passes(&self) -> u32 {
        self.passes
    }

    /// Sections currently served from their fallback coordinate.
    pub fn unresolved(&self) -> &[&'static str] {
        &self.unresolved
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::geometry::PathRegistry;

    static DEFS: &[LocationDef] = &[
        LocationDef {
            section: "hero",
            anchor: Anchor::Fixed(Point::new(150.0, 220.0)),
            scale: 1.4,
            pin: Some(PinDef {
                label: "RICHMOND, VA",
                icon: PinIcon::Dot,
            }),
        },
        LocationDef {
            section: "bus",
            anchor: Anchor::OnPath {
                path_id: "trail",
                fraction: 0.5,
                fallback: Point::new(1.0, 2.0),
            },
            scale: 1.4,
            pin: None,
        },
    ];

    fn trail() -> PathRegistry {
        let mut registry = PathRegistry::new();
        registry.register("trail", "M0,0 L200,0").unwrap();
        registry
    }

    struct CountingSampler<'a> {
        inner: &'a PathRegistry,
        calls: Cell<u32>,
    }

    impl PathSampler for CountingSampler<'_> {
        fn total_length(&self, path_id: &str) -> Option<f64> {
            self.calls.set(self.calls.get() + 1);
            self.inner.total_length(path_id)
        }

        fn point_at_length(&self, path_id: &str, length: f64) -> Option<Point> {
            self.inner.point_at_length(path_id, length)
        }
    }

    #[test]
    fn resolves_fixed_and_path_anchors() {
        let (table, unresolved) = resolve_locations(DEFS, &trail());
        assert!(unresolved.is_empty());
        assert_eq!(table.lookup("hero").point, Point::new(150.0, 220.0));
        assert_eq!(table.lookup("bus").point, Point::new(100.0, 0.0));
    }

    #[test]
    fn missing_path_uses_fallback() {
        let (table, unresolved) = resolve_locations(DEFS, &PathRegistry::new());
        assert_eq!(unresolved, vec!["bus"]);
        assert_eq!(table.lookup("bus").point, Point::new(1.0, 2.0));
    }

    #[test]
    fn resolution_is_idempotent() {
        let registry = trail();
        let (a, _) = resolve_locations(DEFS, &registry);
        let (b, _) = resolve_locations(DEFS, &registry);
        assert_eq!(a, b);
    }

    #[test]
    fn unknown_section_falls_back_to_default() {
        let (table, _) = resolve_locations(DEFS, &trail());
        assert_eq!(table.lookup("news").section, "hero");
        assert!(!table.contains("news"));
    }

    #[test]
    fn empty_table_falls_back_to_map_center() {
        let (table, _) = resolve_locations(&[], &trail());
        let loc = table.lookup("hero");
        assert_eq!(loc.point, Point::new(600.0, 450.0));
        assert!(table.is_empty());
    }

    #[test]
    fn resolver_runs_once_after_success() {
        let registry = trail();
        let sampler = CountingSampler {
            inner: &registry,
            calls: Cell::new(0),
        };
        let mut resolver = LocationResolver::new(DEFS);
        assert_eq!(resolver.table().lookup("bus").point, Point::new(1.0, 2.0));

        let first = resolver.resolve(&sampler);
        let second = resolver.resolve(&sampler);
        assert!(resolver.is_complete());
        assert_eq!(sampler.calls.get(), 1);
        assert!(Rc::ptr_eq(&first, &second));
    }

    #[test]
    fn resolver_retries_then_finalizes_on_fallback() {
        let empty = PathRegistry::new();
        let mut resolver = LocationResolver::new(DEFS);

        resolver.resolve(&empty);
        assert!(!resolver.is_complete());
        assert_eq!(resolver.unresolved(), ["bus"]);

        let table = resolver.resolve(&empty);
        assert!(resolver.is_complete());
        assert_eq!(table.lookup("bus").point, Point::new(1.0, 2.0));

        // Finalized: a later pass with the path available changes nothing.
        let table = resolver.resolve(&trail());
        assert_eq!(resolver.passes(), MAX_SETUP_PASSES);
        assert_eq!(table.lookup("bus").point, Point::new(1.0, 2.0));
    }

    #[test]
    fn label_box_matches_pin_metrics() {
        let pin = PinDef {
            label: "THE PARK",
            icon: PinIcon::Dot,
        };
        let inactive = pin.label_box(false);
        assert!((inactive.width - (8.0 * 7.8 + 16.0)).abs() < 1e-9);
        assert_eq!(inactive.height, 20.0);
        assert_eq!(inactive.offset_y, -32.0);
        assert_eq!(pin.label_box(true).offset_y, -40.0);
        assert_eq!(pin.radius(true), 18.0);
    }
}
