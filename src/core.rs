//! Renderer-facing surface: element tree, declarative views, native events
//!
//! This module re-exports `wireform-core`.
//!
//! ## Example
//!
//! ```rust
//! use wireform::core::{Element, EventType, IntoView, View};
//!
//! let root = Element::new("div");
//! View::element("button")
//!     .attr("type", "button")
//!     .child("Save")
//!     .into_view()
//!     .mount(&root)
//!     .unwrap();
//!
//! let button = root.children().remove(0);
//! assert_eq!(button.text(), "Save");
//! assert_eq!(button.dispatch_event(EventType::Click), 0);
//! ```

pub use wireform_core::*;
