use super::*;

/// Vertical extent of one page section in document coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionExtent {
    pub id: String,
    pub top: f64,
    pub height: f64,
}

impl SectionExtent {
    pub fn new(id: impl Into<String>, top: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            top,
            height,
        }
    }

    /// Whether `offset` falls in `[top - lookahead, top - lookahead + height)`.
    pub fn contains(&self, offset: f64, lookahead: f64) -> bool {
        let start = self.top - lookahead;
        offset >= start && offset < start + self.height
    }

    pub fn fragment(&self) -> String {
        format!("#{}", self.id)
    }
}

/// Picks the section spanning the scroll offset and marks its nav link.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollHighlighter {
    lookahead: f64,
}

impl Default for ScrollHighlighter {
    fn default() -> Self {
        Self::new(Self::DEFAULT_LOOKAHEAD)
    }
}

impl ScrollHighlighter {
    pub const DEFAULT_LOOKAHEAD: f64 = 100.0;

    pub fn new(lookahead: f64) -> Self {
        Self { lookahead }
    }

    pub fn lookahead(&self) -> f64 {
        self.lookahead
    }

    /// Section whose adjusted range contains `offset`. Overlapping ranges
    /// resolve to the last match in iteration order.
    pub fn active_section<'a>(
        &self,
        offset: f64,
        sections: &'a [SectionExtent],
    ) -> Option<&'a SectionExtent> {
        sections
            .iter()
            .rev()
            .find(|section| section.contains(offset, self.lookahead))
    }

    /// Reads section geometry from the document and sets `active` on the
    /// matching links only. Returns the active fragment, if any.
    pub(crate) fn apply(
        &self,
        dom: &mut Dom,
        sections: &[NodeId],
        links: &[NodeId],
        offset: f64,
    ) -> Result<Option<String>> {
        let extents = section_extents(dom, sections);
        let target = self
            .active_section(offset, &extents)
            .map(SectionExtent::fragment);

        for link in links {
            let href = dom.attr(*link, "href");
            if target.is_some() && href == target {
                dom.class_add(*link, "active")?;
            } else {
                dom.class_remove(*link, "active")?;
            }
        }
        Ok(target)
    }
}

/// Connected sections that still carry an id, in document order.
pub(crate) fn section_extents(dom: &Dom, sections: &[NodeId]) -> Vec<SectionExtent> {
    sections
        .iter()
        .filter(|node| dom.is_connected(**node))
        .filter_map(|node| {
            let id = dom.attr(*node, "id").filter(|id| !id.is_empty())?;
            let top = dom.offset_top(*node).ok()?;
            let height = dom.offset_height(*node).ok()?;
            Some(SectionExtent::new(id, top, height))
        })
        .collect()
}
