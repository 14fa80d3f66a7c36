//! Key-addressed, scoped event dispatch
//!
//! This module re-exports `wireform-events`.
//!
//! ## Example
//!
//! ```rust
//! use wireform::core::EventType;
//! use wireform::events::{EmitScope, KeyPress, Scope, issue_typed};
//!
//! let app = Scope::root();
//! let dialog = app.child();
//!
//! let closed = issue_typed::<&'static str>();
//! app.on_message(EventType::Click, &closed, |reason, _| assert_eq!(*reason, "cancel"));
//! assert_eq!(dialog.emit(EventType::Click, &closed, None, "cancel", EmitScope::Bubble), 1);
//!
//! dialog.on_key_press(&KeyPress::parse("escape").unwrap(), |_| {});
//! assert_eq!(dialog.emit_key_press(&KeyPress::new("escape"), None, EmitScope::Local), 1);
//! ```

pub use wireform_events::*;
