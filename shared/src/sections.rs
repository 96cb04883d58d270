/// Page sections in scroll order.
pub const SECTION_ORDER: &[&str] = &[
    "hero",
    "mission",
    "proposal",
    "sticker-bus",
    "about",
    "sponsors",
    "news",
    "events",
    "footer",
];

/// Section used whenever a lookup by id fails.
pub const DEFAULT_SECTION: &str = "hero";

/// Navigation labels for sections that appear in the menu.
pub const NAV_LABELS: &[(&str, &str)] = &[
    ("hero", "Home"),
    ("mission", "Mission"),
    ("proposal", "The Park"),
    ("about", "The Team"),
    ("sponsors", "Partners"),
    ("events", "Events"),
];

/// Display label for a section, falling back to the raw id.
pub fn section_label(id: &str) -> &str {
    NAV_LABELS
        .iter()
        .find(|(section, _)| *section == id)
        .map(|(_, label)| *label)
        .unwrap_or(id)
}

/// Sequential prev/next navigation over an ordered list of section ids.
#[derive(Debug, Clone, Copy)]
pub struct SectionOrder {
    ids: &'static [&'static str],
}

impl Default for SectionOrder {
    fn default() -> Self {
        Self::new(SECTION_ORDER)
    }
}

impl SectionOrder {
    pub const fn new(ids: &'static [&'static str]) -> Self {
        Self { ids }
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.ids.iter().position(|s| *s == id)
    }

    /// Unknown ids count as being before the first section.
    pub fn is_first(&self, id: &str) -> bool {
        self.index_of(id).is_none_or(|i| i == 0)
    }

    pub fn is_last(&self, id: &str) -> bool {
        self.index_of(id)
            .is_some_and(|i| i + 1 == self.ids.len())
    }

    pub fn next(&self, id: &str) -> Option<&'static str> {
        match self.index_of(id) {
            Some(i) => self.ids.get(i + 1).copied(),
            None => self.ids.first().copied(),
        }
    }

    pub fn prev(&self, id: &str) -> Option<&'static str> {
        let i = self.index_of(id)?;
        i.checked_sub(1).and_then(|p| self.ids.get(p).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_fall_back_to_id() {
        assert_eq!(section_label("proposal"), "The Park");
        assert_eq!(section_label("news"), "news");
    }

    #[test]
    fn next_and_prev_walk_the_order() {
        let order = SectionOrder::default();
        assert_eq!(order.next("hero"), Some("mission"));
        assert_eq!(order.prev("mission"), Some("hero"));
        assert_eq!(order.prev("hero"), None);
        assert_eq!(order.next("footer"), None);
        assert!(order.is_first("hero"));
        assert!(order.is_last("footer"));
        assert!(!order.is_last("events"));
    }

    #[test]
    fn unknown_section_starts_from_the_top() {
        let order = SectionOrder::default();
        assert!(order.is_first("nowhere"));
        assert!(!order.is_last("nowhere"));
        assert_eq!(order.next("nowhere"), Some("hero"));
        assert_eq!(order.prev("nowhere"), None);
    }
}
