//! wireform forms
//!
//! Two-way binding between typed data and declaratively rendered form
//! controls.
//!
//! ## Modules
//!
//! - [`field`]: per-control codecs between JSON values and elements
//! - [`binding`]: the binding engine, field helpers and the change pipeline
//! - [`state`]: component state cells and the data stores behind a binding
//! - [`files`]: multipart packaging of selected files
//! - [`spawn`]: local task spawning for change handlers
//! - [`error`]: [`FormError`]

#![warn(missing_docs)]

pub mod binding;
pub mod error;
pub mod field;
pub mod files;
pub mod spawn;
pub mod state;

pub use binding::{DefaultHooks, FormBinding, FormHooks, FormOptions, FormPhase, SelectOption};
pub use error::{FormError, FormResult};
pub use field::{Field, FieldKind, FileInfo, InputType};
pub use files::{FormDataBag, FormDataEntry, FormDataValue, read_as_data_url};
pub use state::{ComponentState, DataStore, DetachedData, StateCell, Subscription};

/// `async_trait` re-export for implementing [`FormHooks`].
pub use async_trait::async_trait;
