//! wireform events
//!
//! Scoped publish/subscribe dispatch addressed by issued keys instead of
//! string names.
//!
//! ## Modules
//!
//! - [`key`]: typed and untyped keys, key presses
//! - [`handler`]: handler records and the per-scope handler map
//! - [`scope`]: component scopes and the `emit` primitive
//!
//! A payload-carrying key and a payload-less key are different types, so a
//! listener that expects a payload cannot be wired to an emission without one:
//!
//! ```compile_fail
//! use wireform_events::key::{issue_typed, issue_untyped};
//! use wireform_events::scope::Scope;
//! use wireform_core::EventType;
//!
//! let scope = Scope::root();
//! let untyped = issue_untyped();
//! scope.on_message::<u32, _>(EventType::Click, &untyped, |_, _| {});
//! ```

#![warn(missing_docs)]

pub mod handler;
pub mod key;
pub mod scope;

pub use handler::{Attach, Dispatch, Handler, HandlerFn, HandlerMap, HandlerOptions};
pub use key::{
	Key, KeyError, KeyId, KeyPress, Modifier, PayloadType, TypedKey, UntypedKey, issue_typed,
	issue_untyped,
};
pub use scope::{EmitScope, Scope};
