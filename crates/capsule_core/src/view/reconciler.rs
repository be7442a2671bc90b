//! Projects the capsule log into the grid container.
//!
//! # Responsibility
//! - Rebuild every dynamic card from the log on each render.
//! - Leave static placeholder cards where they are.
//!
//! # Invariants
//! - Cards render newest first.
//! - Only children marked `data-capsule="dynamic"` are ever removed.
//! - Each record field goes through the sanitizer exactly once per render.
//! - Rendering the same log twice yields the same grid.

use crate::model::record::Record;
use crate::view::node::{Element, Node};
use crate::view::sanitize::{HtmlSanitizer, Sanitizer};
use log::debug;

/// Attribute distinguishing rendered cards from static placeholders.
pub const CARD_MARKER_ATTR: &str = "data-capsule";
/// Marker value of rendered cards.
pub const DYNAMIC_MARKER: &str = "dynamic";
/// Marker value of static placeholder cards.
pub const STATIC_MARKER: &str = "static";
/// Class shared by every capsule card.
pub const CARD_CLASS: &str = "capsule-card";

/// Outcome of one render pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderReport {
    /// Dynamic cards removed from the previous pass.
    pub removed: usize,
    /// Dynamic cards appended in this pass.
    pub rendered: usize,
}

/// Full-rebuild renderer for the capsule grid.
pub struct ViewReconciler<Z: Sanitizer = HtmlSanitizer> {
    grid_id: String,
    sanitizer: Z,
}

impl ViewReconciler<HtmlSanitizer> {
    pub fn new(grid_id: impl Into<String>) -> Self {
        Self::with_sanitizer(grid_id, HtmlSanitizer)
    }
}

impl<Z: Sanitizer> ViewReconciler<Z> {
    pub fn with_sanitizer(grid_id: impl Into<String>, sanitizer: Z) -> Self {
        Self {
            grid_id: grid_id.into(),
            sanitizer,
        }
    }

    pub fn grid_id(&self) -> &str {
        &self.grid_id
    }

    /// Re-renders `records` (oldest first) into the grid of `body`.
    ///
    /// Returns `None` when the page has no grid container.
    pub fn render(&self, body: &mut Element, records: &[Record]) -> Option<RenderReport> {
        let grid = body.find_by_id_mut(&self.grid_id)?;

        let before = grid.children().len();
        grid.retain_children(|child| !is_dynamic_card(child));
        let removed = before - grid.children().len();

        for record in records.iter().rev() {
            grid.push_child(self.build_card(record));
        }

        debug!(
            "event=view_render module=view status=ok grid={} removed={} rendered={}",
            self.grid_id,
            removed,
            records.len()
        );
        Some(RenderReport {
            removed,
            rendered: records.len(),
        })
    }

    /// Builds one dynamic card, escaping each field separately.
    pub fn build_card(&self, record: &Record) -> Element {
        Element::new("article")
            .with_class(CARD_CLASS)
            .with_attr(CARD_MARKER_ATTR, DYNAMIC_MARKER)
            .with_child(
                Element::new("h3")
                    .with_class("capsule-title")
                    .with_text(self.sanitizer.escape(&record.title)),
            )
            .with_child(
                Element::new("span")
                    .with_class("capsule-year")
                    .with_text(self.sanitizer.escape(&record.year)),
            )
            .with_child(
                Element::new("p")
                    .with_class("capsule-memory")
                    .with_text(self.sanitizer.escape(&record.memory)),
            )
    }
}

/// Whether `node` is a card produced by a previous render.
pub fn is_dynamic_card(node: &Node) -> bool {
    node.as_element()
        .is_some_and(|element| element.attr(CARD_MARKER_ATTR) == Some(DYNAMIC_MARKER))
}

/// Dynamic cards currently in `grid`, in display order.
pub fn dynamic_cards(grid: &Element) -> Vec<&Element> {
    grid.child_elements()
        .filter(|element| element.attr(CARD_MARKER_ATTR) == Some(DYNAMIC_MARKER))
        .collect()
}

/// Static placeholder cards currently in `grid`, in display order.
pub fn static_cards(grid: &Element) -> Vec<&Element> {
    grid.child_elements()
        .filter(|element| element.attr(CARD_MARKER_ATTR) == Some(STATIC_MARKER))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{dynamic_cards, ViewReconciler};
    use crate::model::record::Record;
    use crate::view::node::Element;

    #[test]
    fn render_without_grid_is_a_no_op() {
        let reconciler = ViewReconciler::new("capsuleGrid");
        let mut body = Element::new("body");
        let records = vec![Record::new("Heat", "1995", "Diner scene.").unwrap()];

        assert!(reconciler.render(&mut body, &records).is_none());
        assert!(body.children().is_empty());
    }

    #[test]
    fn build_card_escapes_each_field() {
        let reconciler = ViewReconciler::new("capsuleGrid");
        let record = Record::new("<i>Alien</i>", "1979", "Tom & Jerry \"night\"").unwrap();

        let card = reconciler.build_card(&record);
        assert_eq!(
            card.to_html(),
            "<article class=\"capsule-card\" data-capsule=\"dynamic\">\
             <h3 class=\"capsule-title\">&lt;i&gt;Alien&lt;/i&gt;</h3>\
             <span class=\"capsule-year\">1979</span>\
             <p class=\"capsule-memory\">Tom &amp; Jerry &quot;night&quot;</p>\
             </article>"
        );
    }

    #[test]
    fn render_orders_newest_first() {
        let reconciler = ViewReconciler::new("capsuleGrid");
        let mut body = Element::new("body").with_child(Element::new("div").with_id("capsuleGrid"));
        let records = vec![
            Record::new("Arrival", "2016", "Watched it alone.").unwrap(),
            Record::new("Her", "2013", "Still thinking about it.").unwrap(),
        ];

        reconciler.render(&mut body, &records).unwrap();

        let grid = body.find_by_id("capsuleGrid").unwrap();
        let titles: Vec<String> = dynamic_cards(grid)
            .iter()
            .map(|card| card.child_elements().next().unwrap().text_content())
            .collect();
        assert_eq!(titles, ["Her", "Arrival"]);
    }
}
