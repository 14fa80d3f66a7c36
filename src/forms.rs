//! Two-way binding between typed data and form controls
//!
//! This module re-exports `wireform-forms`.
//!
//! ## Example
//!
//! ```rust,ignore
//! use wireform::prelude::*;
//!
//! let state = StateCell::new(Signup::default());
//! let form = FormBinding::bound(state.clone(), &scope);
//! form.mount(&root);
//! form.render(
//!     View::element("form")
//!         .child(form.email_input("email"))
//!         .child(form.password_input("password"))
//!         .child(form.checkbox("newsletter")),
//! )?;
//! ```

pub use wireform_forms::*;
