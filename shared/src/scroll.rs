//! Active-section selection from measured section rectangles.

/// Vertical extent of a section relative to the viewport top, in CSS px.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionExtent {
    pub top: f64,
    pub bottom: f64,
}

impl SectionExtent {
    pub fn new(top: f64, bottom: f64) -> Self {
        Self { top, bottom }
    }
}

/// The part of the viewport that counts as "visible". A negative `offset`
/// excludes a strip of that height at the top (under the fixed nav bar).
pub fn observation_band(viewport_height: f64, offset: f64) -> (f64, f64) {
    if !viewport_height.is_finite() || viewport_height <= 0.0 {
        return (0.0, 0.0);
    }
    let start = if offset.is_finite() { -offset } else { 0.0 };
    (start.clamp(0.0, viewport_height), viewport_height)
}

pub fn visible_overlap(extent: SectionExtent, band: (f64, f64)) -> f64 {
    let overlap = extent.bottom.min(band.1) - extent.top.max(band.0);
    if overlap.is_finite() { overlap.max(0.0) } else { 0.0 }
}

/// The section with the most visible pixels. Earlier sections win ties and
/// sections without any overlap never win.
pub fn pick_active<'a, I>(extents: I, band: (f64, f64)) -> Option<&'a str>
where
    I: IntoIterator<Item = (&'a str, SectionExtent)>,
{
    let mut best: Option<(&str, f64)> = None;
    for (id, extent) in extents {
        let overlap = visible_overlap(extent, band);
        if overlap <= 0.0 {
            continue;
        }
        if best.is_none_or(|(_, most)| overlap > most) {
            best = Some((id, overlap));
        }
    }
    best.map(|(id, _)| id)
}

/// Tracks the active section across scroll and resize events.
#[derive(Debug, Clone)]
pub struct ScrollSpy {
    ids: &'static [&'static str],
    offset: f64,
    active: String,
}

impl ScrollSpy {
    pub fn new(ids: &'static [&'static str], offset: f64, initial: &str) -> Self {
        Self {
            ids,
            offset,
            active: initial.to_string(),
        }
    }

    pub fn active(&self) -> &str {
        &self.active
    }

    /// Re-measure and return the new active id only when it changed.
    ///
    /// `measure` returns `None` for sections not present in the document.
    /// When nothing overlaps the band the current id is kept.
    pub fn observe<F>(&mut self, measure: F, viewport_height: f64) -> Option<&str>
    where
        F: Fn(&str) -> Option<SectionExtent>,
    {
        let band = observation_band(viewport_height, self.offset);
        let picked = pick_active(
            self.ids
                .iter()
                .filter_map(|id| measure(id).map(|extent| (*id, extent))),
            band,
        )?;
        if picked == self.active {
            return None;
        }
        self.active = picked.to_string();
        Some(self.active.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const IDS: &[&str] = &["hero", "mission", "proposal"];

    /// Sections stacked from `scroll_y` with the given heights.
    fn layout(scroll_y: f64, heights: &[f64]) -> impl Fn(&str) -> Option<SectionExtent> {
        let mut top = -scroll_y;
        let extents: Vec<(&'static str, SectionExtent)> = IDS
            .iter()
            .zip(heights)
            .map(|(id, h)| {
                let extent = SectionExtent::new(top, top + h);
                top += h;
                (*id, extent)
            })
            .collect();
        move |id: &str| extents.iter().find(|(s, _)| *s == id).map(|(_, e)| *e)
    }

    #[test]
    fn band_excludes_nav_strip() {
        assert_eq!(observation_band(800.0, -80.0), (80.0, 800.0));
        assert_eq!(observation_band(800.0, 40.0), (0.0, 800.0));
        assert_eq!(observation_band(50.0, -80.0), (50.0, 50.0));
        assert_eq!(observation_band(0.0, -80.0), (0.0, 0.0));
        assert_eq!(observation_band(f64::NAN, 0.0), (0.0, 0.0));
    }

    #[test]
    fn overlap_is_clipped_to_band() {
        let band = (80.0, 800.0);
        assert_eq!(visible_overlap(SectionExtent::new(-500.0, 100.0), band), 20.0);
        assert_eq!(visible_overlap(SectionExtent::new(900.0, 1400.0), band), 0.0);
        assert_eq!(visible_overlap(SectionExtent::new(0.0, 2000.0), band), 720.0);
    }

    #[test]
    fn largest_overlap_wins_and_ties_go_first() {
        let band = (0.0, 800.0);
        let picked = pick_active(
            [
                ("hero", SectionExtent::new(-600.0, 300.0)),
                ("mission", SectionExtent::new(300.0, 1200.0)),
            ],
            band,
        );
        assert_eq!(picked, Some("mission"));

        let tie = pick_active(
            [
                ("hero", SectionExtent::new(-400.0, 400.0)),
                ("mission", SectionExtent::new(400.0, 1200.0)),
            ],
            band,
        );
        assert_eq!(tie, Some("hero"));
        assert_eq!(pick_active(std::iter::empty(), band), None);
    }

    #[test]
    fn reports_only_changes() {
        let mut spy = ScrollSpy::new(IDS, -80.0, "hero");
        let heights = [900.0, 700.0, 1200.0];
        assert_eq!(spy.observe(layout(0.0, &heights), 800.0), None);
        assert_eq!(spy.observe(layout(700.0, &heights), 800.0), Some("mission"));
        assert_eq!(spy.observe(layout(750.0, &heights), 800.0), None);
        assert_eq!(spy.observe(layout(1700.0, &heights), 800.0), Some("proposal"));
        assert_eq!(spy.active(), "proposal");
    }

    #[test]
    fn keeps_current_when_nothing_is_visible() {
        let mut spy = ScrollSpy::new(IDS, 0.0, "mission");
        let far = layout(10_000.0, &[100.0, 100.0, 100.0]);
        assert_eq!(spy.observe(far, 800.0), None);
        assert_eq!(spy.observe(|_| None, 800.0), None);
        assert_eq!(spy.observe(layout(0.0, &[900.0, 100.0, 100.0]), 0.0), None);
        assert_eq!(spy.active(), "mission");
    }

    #[test]
    fn missing_sections_are_skipped() {
        let mut spy = ScrollSpy::new(IDS, 0.0, "hero");
        let only_proposal = |id: &str| (id == "proposal").then(|| SectionExtent::new(10.0, 20.0));
        assert_eq!(spy.observe(only_proposal, 800.0), Some("proposal"));
    }
}
