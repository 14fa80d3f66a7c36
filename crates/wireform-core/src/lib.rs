//! wireform core
//!
//! The renderer-facing surface shared by the wireform crates:
//!
//! - [`element`]: an in-memory element tree with the properties form handling
//!   depends on (`value`, `checked`, `selected`, `files`) and bubbling listeners
//! - [`view`]: declarative element descriptions, SSR string rendering and a
//!   minimal mount step
//! - [`event`]: native event categories and event objects
//! - [`file`]: file payloads selected through file inputs
//! - [`logging`]: `debug_log!`, `info_log!`, `warn_log!`, `error_log!`
//!
//! Diffing, reconciliation and the real DOM backend belong to the renderer
//! and are not part of this crate.

#![warn(missing_docs)]

pub mod element;
pub mod event;
pub mod file;
pub mod logging;
pub mod view;

pub use element::{Element, EventHandle};
pub use event::{EventType, NativeEvent};
pub use file::{FileBlob, FileList};
pub use view::{Attrs, ElementView, IntoView, MountError, View, ViewEventHandler};

#[doc(hidden)]
#[cfg(not(target_arch = "wasm32"))]
pub use tracing as __tracing;

#[doc(hidden)]
#[cfg(target_arch = "wasm32")]
pub use web_sys as __web_sys;
