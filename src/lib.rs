//! # wireform
//!
//! Component plumbing for Rust/WASM frontends:
//!
//! - **Events**: publish/subscribe dispatch addressed by issued keys instead of
//!   string names, scoped to the component tree, with optional bubbling
//! - **Forms**: two-way binding between a typed value and the form controls a
//!   component renders, including radio groups, `<select>` placeholders and
//!   file inputs
//!
//! The renderer is not part of this crate. [`core`] carries the minimal element
//! tree and declarative views the binding engine works against.
//!
//! ## Feature Flags
//!
//! - `events` - key registry, handler map and scopes
//! - `forms` - form binding engine (implies `events`)
//! - `full` (default) - everything
//! - `debug-dispatch` - logs every dispatch in debug builds
//!
//! ## Quick Example
//!
//! ```rust,ignore
//! use wireform::prelude::*;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Clone, Default, Serialize, Deserialize)]
//! struct Post {
//!     title: String,
//!     status: String,
//! }
//!
//! let page = Scope::root();
//! let state = StateCell::new(Post::default());
//! let form = FormBinding::bound(state.clone(), &page.child());
//!
//! page.on_message(EventType::Change, &form.data_changed_key(), |post, _| {
//!     info_log!("status is now {}", post.status);
//! });
//!
//! form.mount(&root);
//! form.render(
//!     View::element("form")
//!         .child(form.text_input("title"))
//!         .child(form.radio("status", "draft"))
//!         .child(form.radio("status", "published")),
//! )?;
//! ```

pub mod core;
#[cfg(feature = "events")]
pub mod events;
#[cfg(feature = "forms")]
pub mod forms;

/// Common imports.
pub mod prelude {
	pub use crate::core::{
		Element, ElementView, EventType, FileBlob, IntoView, NativeEvent, View, debug_log,
		error_log, info_log, warn_log,
	};

	#[cfg(feature = "events")]
	pub use crate::events::{
		EmitScope, HandlerOptions, KeyPress, Modifier, Scope, TypedKey, UntypedKey, issue_typed,
		issue_untyped,
	};

	#[cfg(feature = "forms")]
	pub use crate::forms::{
		FileInfo, FormBinding, FormError, FormHooks, FormOptions, InputType, SelectOption,
		StateCell, async_trait,
	};
}
