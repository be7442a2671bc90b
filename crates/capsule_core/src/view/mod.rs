//! Rendered view model.
//!
//! # Responsibility
//! - Represent the page as an owned node tree addressable by element id.
//! - Project the capsule log into the grid container.
//! - Keep untrusted text from ever becoming markup.
//!
//! # Invariants
//! - Text nodes hold `Markup`, which only the sanitizer or a trusted
//!   static literal can produce.
//! - Static placeholder cards survive every render.

pub mod node;
pub mod reconciler;
pub mod sanitize;
pub mod template;
