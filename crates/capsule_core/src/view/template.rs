//! Default page skeleton served with the capsule feature.

use crate::config::PageBindings;
use crate::view::node::{Document, Element, Markup};
use crate::view::reconciler::{CARD_CLASS, CARD_MARKER_ATTR, STATIC_MARKER};

/// Example capsules always shown in the grid.
const PLACEHOLDER_CAPSULES: &[(&str, &str, &str)] = &[
    (
        "Spirited Away",
        "2001",
        "First film I saw in a cinema with subtitles.",
    ),
    ("The Matrix", "1999", "Rewound the lobby scene until the tape wore out."),
    ("Coco", "2017", "Three generations crying on one couch."),
];

/// Builds the page markup the core binds to.
///
/// Contains every element named in `bindings` plus the static placeholder
/// cards inside the grid.
pub fn default_document(bindings: &PageBindings) -> Document {
    let mut grid = Element::new("div")
        .with_id(bindings.grid.as_str())
        .with_class("capsule-grid");
    for &(title, year, memory) in PLACEHOLDER_CAPSULES {
        grid.push_child(placeholder_card(title, year, memory));
    }

    let header = Element::new("header")
        .with_child(
            Element::new("button")
                .with_id(bindings.theme_toggle.as_str())
                .with_attr("type", "button")
                .with_text(Markup::trusted("Light mode")),
        )
        .with_child(
            Element::new("p")
                .with_class("visit-line")
                .with_text(Markup::trusted("Visits: "))
                .with_child(Element::new("span").with_id(bindings.visit_counter.as_str())),
        );

    let form = Element::new("form")
        .with_id("capsuleForm")
        .with_child(text_input(&bindings.title_input, "Film title"))
        .with_child(text_input(&bindings.year_input, "Year"))
        .with_child(
            Element::new("textarea")
                .with_id(bindings.memory_input.as_str())
                .with_attr("placeholder", "Your memory"),
        )
        .with_child(
            Element::new("button")
                .with_attr("type", "submit")
                .with_text(Markup::trusted("Seal capsule")),
        )
        .with_child(
            Element::new("button")
                .with_id(bindings.clear_button.as_str())
                .with_attr("type", "button")
                .with_text(Markup::trusted("Clear my capsules")),
        )
        .with_child(
            Element::new("p")
                .with_id(bindings.message.as_str())
                .with_class("capsule-message"),
        );

    let section = Element::new("section")
        .with_id("capsules")
        .with_child(form)
        .with_child(grid);

    Document::new(Element::new("body").with_child(header).with_child(section))
}

fn text_input(id: &str, placeholder: &str) -> Element {
    Element::new("input")
        .with_id(id)
        .with_attr("type", "text")
        .with_attr("placeholder", placeholder)
        .with_attr("value", "")
}

fn placeholder_card(title: &'static str, year: &'static str, memory: &'static str) -> Element {
    Element::new("article")
        .with_class(CARD_CLASS)
        .with_attr(CARD_MARKER_ATTR, STATIC_MARKER)
        .with_child(
            Element::new("h3")
                .with_class("capsule-title")
                .with_text(Markup::trusted(title)),
        )
        .with_child(
            Element::new("span")
                .with_class("capsule-year")
                .with_text(Markup::trusted(year)),
        )
        .with_child(
            Element::new("p")
                .with_class("capsule-memory")
                .with_text(Markup::trusted(memory)),
        )
}

/// Number of static placeholder cards in the default document.
pub fn placeholder_count() -> usize {
    PLACEHOLDER_CAPSULES.len()
}
