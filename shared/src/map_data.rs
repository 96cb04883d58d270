//! The stylized Richmond map: dimensions, path geometry and section locations.

use crate::geometry::{PathRegistry, Point};
use crate::locations::{Anchor, LocationDef, PinDef, PinIcon};

pub const MAP_WIDTH: f64 = 1200.0;
pub const MAP_HEIGHT: f64 = 900.0;

pub const JAMES_RIVER_PATH_ID: &str = "jamesRiverPath";
pub const JAMES_RIVER_PATH: &str =
    "M-50,300 C200,350 300,550 500,550 C700,550 900,450 1250,500";

pub const FALL_LINE_PATH_ID: &str = "fallLinePath";
pub const FALL_LINE_PATH: &str = "M350,0 L350,160 L720,160 Q680,350 640,540 L620,900";

pub const BROAD_STREET_PATH: &str = "M0,257 L1200,187";
pub const EIGHTH_STREET_PATH: &str = "M850,0 L800,900";
pub const MANCHESTER_BRIDGE_PATH: &str = "M633,0 L573,900";
pub const FLOOD_WALL_PATH: &str = "M450,650 C550,680 650,670 750,620";

pub const BELLE_ISLE_CENTER: Point = Point::new(400.0, 540.0);
pub const BELLE_ISLE_RADII: (f64, f64) = (70.0, 35.0);

/// Paths that locations may be anchored to.
pub const NAMED_PATHS: &[(&str, &str)] = &[
    (JAMES_RIVER_PATH_ID, JAMES_RIVER_PATH),
    (FALL_LINE_PATH_ID, FALL_LINE_PATH),
];

const fn pin(label: &'static str, icon: PinIcon) -> Option<PinDef> {
    Some(PinDef { label, icon })
}

/// Section locations. Sections without an entry (e.g. `news`) use the
/// default section's view.
pub static LOCATIONS: &[LocationDef] = &[
    LocationDef {
        section: "hero",
        anchor: Anchor::Fixed(Point::new(150.0, 220.0)),
        scale: 1.4,
        pin: pin("RICHMOND, VA", PinIcon::Dot),
    },
    LocationDef {
        section: "mission",
        anchor: Anchor::Fixed(Point::new(490.0, 90.0)),
        scale: 1.4,
        pin: pin("THE ARTS DISTRICT", PinIcon::Dot),
    },
    LocationDef {
        section: "proposal",
        anchor: Anchor::Fixed(Point::new(590.0, 660.0)),
        scale: 1.4,
        pin: pin("THE PARK", PinIcon::Dot),
    },
    LocationDef {
        section: "sticker-bus",
        anchor: Anchor::OnPath {
            path_id: FALL_LINE_PATH_ID,
            fraction: 0.2,
            fallback: Point::new(390.0, 241.0),
        },
        scale: 1.4,
        pin: pin("STICKER BUS", PinIcon::Bus),
    },
    LocationDef {
        section: "about",
        anchor: Anchor::Fixed(Point::new(490.0, 237.0)),
        scale: 1.4,
        pin: pin("SUPPLY", PinIcon::Dot),
    },
    LocationDef {
        section: "events",
        anchor: Anchor::Fixed(Point::new(560.0, 225.0)),
        scale: 1.4,
        pin: pin("GALLERY 5", PinIcon::Dot),
    },
    LocationDef {
        section: "sponsors",
        anchor: Anchor::Fixed(Point::new(796.0, 250.0)),
        scale: 1.4,
        pin: pin("CITY HALL", PinIcon::CivicBuilding),
    },
    LocationDef {
        section: "footer",
        anchor: Anchor::Fixed(Point::new(600.0, 450.0)),
        scale: 0.8,
        pin: None,
    },
];

/// Parse every named path. Paths that fail to parse are left out and
/// reported, so anchors on them resolve to their fallbacks.
pub fn path_registry() -> (PathRegistry, Vec<String>) {
    let mut registry = PathRegistry::new();
    let mut errors = Vec::new();
    for (id, d) in NAMED_PATHS {
        if let Err(e) = registry.register(id, d) {
            errors.push(e);
        }
    }
    (registry, errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::PathSampler;
    use crate::locations::resolve_locations;
    use crate::sections::SECTION_ORDER;

    #[test]
    fn all_named_paths_parse() {
        let (registry, errors) = path_registry();
        assert!(errors.is_empty(), "{errors:?}");
        assert_eq!(registry.len(), NAMED_PATHS.len());
    }

    #[test]
    fn sticker_bus_sits_on_the_trail() {
        let (registry, _) = path_registry();
        let (table, unresolved) = resolve_locations(LOCATIONS, &registry);
        assert!(unresolved.is_empty());

        let total = registry.total_length(FALL_LINE_PATH_ID).unwrap();
        let bus = table.lookup("sticker-bus").point;
        // 20% of the trail lands on the east-west leg along y = 160.
        assert!(total * 0.2 > 160.0 && total * 0.2 < 530.0);
        assert!((bus.y - 160.0).abs() < 1e-9);
        assert!((bus.x - (350.0 + total * 0.2 - 160.0)).abs() < 1e-9);
    }

    #[test]
    fn locations_are_inside_the_map() {
        for def in LOCATIONS {
            let p = def.anchor.fallback();
            assert!((0.0..=MAP_WIDTH).contains(&p.x), "{}", def.section);
            assert!((0.0..=MAP_HEIGHT).contains(&p.y), "{}", def.section);
            assert!(def.scale > 0.0);
        }
    }

    #[test]
    fn every_location_is_a_known_section() {
        for def in LOCATIONS {
            assert!(SECTION_ORDER.contains(&def.section), "{}", def.section);
        }
    }
}
