//! Form binding engine
//!
//! [`FormBinding`] connects a typed data value to the form controls a
//! component renders:
//!
//! ```text
//! ┌──────────────┐  field helpers   ┌──────────────┐   mount    ┌──────────┐
//! │  data (T)    │ ───────────────► │ ElementView  │ ─────────► │ elements │
//! │ state / bag  │                  └──────────────┘            └────┬─────┘
//! └──────▲───────┘                                                   │ change
//!        │ merge + data-changed notification          serialize()    │
//!        └───────────────────────────────────────────────────────────┘
//! ```
//!
//! Every control rendered through a helper is tagged with the instance's class
//! and named `"{instance_id}-{field}"`, so two forms with the same field names
//! never read each other's elements. One `change` listener on the mounted root
//! picks up edits, re-serializes the whole form and publishes the result on
//! [`FormBinding::data_changed_key`], bubbling through the owning scope.
//!
//! ## Example
//!
//! ```ignore
//! let state = StateCell::new(Post::default());
//! let form = FormBinding::bound(state.clone(), &scope);
//!
//! let view = View::element("form")
//!     .child(form.text_input("title"))
//!     .child(form.radio("status", "draft"))
//!     .child(form.radio("status", "published"));
//! form.mount(&root);
//! form.render(view)?;
//!
//! scope.on_message(EventType::Change, &form.data_changed_key(), |post, _| {
//!     info_log!("saved {}", post.title);
//! });
//! ```

use crate::error::{FormError, FormResult};
use crate::field::{Field, FieldKind, InputType, coerce_like, infer_scalar};
use crate::files::FormDataBag;
use crate::spawn::spawn_local;
use crate::state::{ComponentState, DataStore, DetachedData, StateCell};
use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::borrow::Cow;
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};
use wireform_core::{
	Attrs, Element, ElementView, EventHandle, EventType, FileList, IntoView, NativeEvent,
	debug_log, error_log, warn_log,
};
use wireform_events::{EmitScope, Scope, TypedKey, issue_typed};

static NEXT_INSTANCE_ID: AtomicU64 = AtomicU64::new(1);

/// Lifecycle of a binding instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
	/// Created, not mounted yet.
	Uninitialized,
	/// Mounted, nothing serialized yet.
	Mounted,
	/// At least one serialization is in flight.
	Serializing,
	/// Mounted and quiescent.
	Idle,
	/// Torn down; fields and listeners are gone.
	Unmounted,
}

/// Binding options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormOptions {
	/// Also re-serialize on every `input` event, not just `change`.
	pub live_input: bool,
	/// Part name used by [`FormBinding::serialize_file_input`] when no key is
	/// given.
	pub file_key: Cow<'static, str>,
}

impl Default for FormOptions {
	fn default() -> Self {
		Self {
			live_input: false,
			file_key: Cow::Borrowed("file"),
		}
	}
}

impl FormOptions {
	/// Sets [`FormOptions::live_input`].
	pub fn live_input(mut self, on: bool) -> Self {
		self.live_input = on;
		self
	}

	/// Sets [`FormOptions::file_key`].
	pub fn file_key(mut self, key: impl Into<Cow<'static, str>>) -> Self {
		self.file_key = key.into();
		self
	}
}

/// Extension points of the change pipeline.
#[async_trait(?Send)]
pub trait FormHooks<T: 'static>: 'static {
	/// Decides whether a freshly serialized value replaces the current one.
	fn should_update_state(&self, _current: &T, _next: &T) -> bool {
		true
	}

	/// Post-processes serialized data, e.g. to normalize or validate it.
	async fn after_serialize(&self, data: T) -> FormResult<T> {
		Ok(data)
	}
}

/// Hooks that accept every change unmodified.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultHooks;

#[async_trait(?Send)]
impl<T: 'static> FormHooks<T> for DefaultHooks {}

/// An `<option>` of a bound `<select>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
	value: Option<String>,
	label: String,
}

impl SelectOption {
	/// An option with a `value` attribute.
	pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
		Self {
			value: Some(value.into()),
			label: label.into(),
		}
	}

	/// An option without a `value` attribute. Selecting it reads as unset.
	pub fn placeholder(label: impl Into<String>) -> Self {
		Self {
			value: None,
			label: label.into(),
		}
	}

	/// The `value` attribute, if any.
	pub fn value(&self) -> Option<&str> {
		self.value.as_deref()
	}

	/// The visible label.
	pub fn label(&self) -> &str {
		&self.label
	}
}

struct FormInner<T: 'static> {
	instance_id: u64,
	tag_class: String,
	scope: Scope,
	store: Box<dyn DataStore<T>>,
	hooks: RefCell<Rc<dyn FormHooks<T>>>,
	options: RefCell<FormOptions>,
	data_changed_key: RefCell<TypedKey<T>>,
	/// Mangled name → codec.
	fields: RefCell<BTreeMap<String, Rc<Field>>>,
	/// Mangled name → last selection of that file input.
	pending_files: RefCell<HashMap<String, FileList>>,
	root: RefCell<Option<Element>>,
	listeners: RefCell<Vec<EventHandle>>,
	wants_listener: Cell<bool>,
	phase: Cell<FormPhase>,
	in_flight: Cell<usize>,
}

/// Two-way binding between a data value and rendered form controls.
///
/// Cloning yields another handle to the same instance.
pub struct FormBinding<T: 'static> {
	inner: Rc<FormInner<T>>,
}

impl<T: 'static> Clone for FormBinding<T> {
	fn clone(&self) -> Self {
		Self {
			inner: Rc::clone(&self.inner),
		}
	}
}

impl<T> FormBinding<T>
where
	T: Serialize + DeserializeOwned + Clone + 'static,
{
	/// Binds to component state. Merged changes go through the cell, which
	/// notifies its subscribers.
	pub fn bound(state: StateCell<T>, scope: &Scope) -> Self {
		Self::with_store(Box::new(ComponentState::new(state)), scope)
	}

	/// Binds to an owned copy of `data`.
	pub fn detached(data: T, scope: &Scope) -> Self {
		Self::with_store(Box::new(DetachedData::new(data)), scope)
	}

	fn with_store(store: Box<dyn DataStore<T>>, scope: &Scope) -> Self {
		let instance_id = NEXT_INSTANCE_ID.fetch_add(1, Ordering::Relaxed);
		debug_log!("[FormBinding {}] created", instance_id);
		Self {
			inner: Rc::new(FormInner {
				instance_id,
				tag_class: format!("wireform-{}", instance_id),
				scope: scope.clone(),
				store,
				hooks: RefCell::new(Rc::new(DefaultHooks)),
				options: RefCell::new(FormOptions::default()),
				data_changed_key: RefCell::new(issue_typed()),
				fields: RefCell::new(BTreeMap::new()),
				pending_files: RefCell::new(HashMap::new()),
				root: RefCell::new(None),
				listeners: RefCell::new(Vec::new()),
				wants_listener: Cell::new(false),
				phase: Cell::new(FormPhase::Uninitialized),
				in_flight: Cell::new(0),
			}),
		}
	}

	/// Replaces the options. Listeners already attached are re-attached.
	pub fn with_options(self, options: FormOptions) -> Self {
		*self.inner.options.borrow_mut() = options;
		let attached = !self.inner.listeners.borrow().is_empty();
		if let Some(root) = self.root()
			&& attached
		{
			self.attach_listeners(&root);
		}
		self
	}

	/// Installs change pipeline hooks.
	pub fn with_hooks(self, hooks: impl FormHooks<T>) -> Self {
		*self.inner.hooks.borrow_mut() = Rc::new(hooks);
		self
	}

	/// Publishes changes on `key` instead of the instance's own key, so one
	/// listener can observe several forms.
	pub fn with_data_changed_key(self, key: TypedKey<T>) -> Self {
		*self.inner.data_changed_key.borrow_mut() = key;
		self
	}

	// Identity and state

	/// Process-unique instance id.
	pub fn instance_id(&self) -> u64 {
		self.inner.instance_id
	}

	/// Class carried by every control this instance renders.
	pub fn tag_class(&self) -> &str {
		&self.inner.tag_class
	}

	/// DOM name of field `name`.
	pub fn mangle(&self, name: &str) -> String {
		format!("{}-{}", self.inner.instance_id, name)
	}

	/// Current lifecycle phase.
	pub fn phase(&self) -> FormPhase {
		self.inner.phase.get()
	}

	/// The scope data-changed notifications are emitted through.
	pub fn scope(&self) -> &Scope {
		&self.inner.scope
	}

	/// Key data-changed notifications are published on.
	pub fn data_changed_key(&self) -> TypedKey<T> {
		self.inner.data_changed_key.borrow().clone()
	}

	/// Snapshot of the bound data.
	pub fn data(&self) -> T {
		self.inner.store.snapshot()
	}

	/// Replaces the bound data without a data-changed notification.
	pub fn set_data(&self, data: T) {
		self.inner.store.merge(data);
	}

	/// Logical names of the fields rendered so far.
	pub fn field_names(&self) -> Vec<String> {
		self.inner
			.fields
			.borrow()
			.values()
			.map(|f| f.name().to_string())
			.collect()
	}

	/// The codec allocated for field `name`.
	pub fn field(&self, name: &str) -> Option<Rc<Field>> {
		self.inner.fields.borrow().get(&self.mangle(name)).cloned()
	}

	/// Files last selected in file input `name`.
	pub fn files(&self, name: &str) -> FileList {
		self.pending_files_for(&self.mangle(name))
	}

	/// The mounted root element.
	pub fn root(&self) -> Option<Element> {
		self.inner.root.borrow().clone()
	}

	/// Returns true between [`FormBinding::mount`] and
	/// [`FormBinding::unmount`].
	pub fn is_mounted(&self) -> bool {
		self.inner.root.borrow().is_some()
	}

	// Field helpers

	/// `<input type="text">` bound to `name`.
	pub fn text_input(&self, name: &str) -> ElementView {
		self.input(name, InputType::Text)
	}

	/// Text-like `<input>` of the given type bound to `name`.
	pub fn input(&self, name: &str, input_type: InputType) -> ElementView {
		self.control(
			"input",
			Some(input_type.as_str()),
			name,
			FieldKind::Text(input_type),
			|_| {},
		)
	}

	/// `<input type="password">` bound to `name`.
	pub fn password_input(&self, name: &str) -> ElementView {
		self.input(name, InputType::Password)
	}

	/// `<input type="email">` bound to `name`.
	pub fn email_input(&self, name: &str) -> ElementView {
		self.input(name, InputType::Email)
	}

	/// `<input type="number">` bound to `name`. Empty input reads as unset.
	pub fn number_input(&self, name: &str) -> ElementView {
		self.control("input", Some("number"), name, FieldKind::Number, |_| {})
	}

	/// `<input type="range">` bound to `name`.
	pub fn range_input(&self, name: &str) -> ElementView {
		self.control("input", Some("range"), name, FieldKind::Number, |_| {})
	}

	/// `<textarea>` bound to `name`.
	pub fn textarea(&self, name: &str) -> ElementView {
		self.control("textarea", None, name, FieldKind::TextArea, |_| {})
	}

	/// `<input type="checkbox">` bound to a bool property.
	pub fn checkbox(&self, name: &str) -> ElementView {
		self.control("input", Some("checkbox"), name, FieldKind::Checkbox, |_| {})
	}

	/// One radio of the group bound to `name`; checked when the data holds
	/// `option`.
	pub fn radio(&self, name: &str, option: &str) -> ElementView {
		let option = option.to_string();
		self.control("input", Some("radio"), name, FieldKind::Radio, move |attrs| {
			attrs.set("value", option)
		})
	}

	/// `<select>` bound to `name`.
	pub fn select(&self, name: &str, options: impl IntoIterator<Item = SelectOption>) -> ElementView {
		let field = self.field_or_insert(name, FieldKind::Select);
		let value = self.current_value(name);
		let children: Vec<ElementView> = options
			.into_iter()
			.map(|option| {
				let mut attrs = Attrs::new();
				if let Some(v) = option.value {
					attrs.set("value", v);
				}
				field.assign_attr_value(&mut attrs, value.as_ref());
				ElementView::new("option").with_attrs(attrs).child(option.label)
			})
			.collect();
		self.ensure_listener();
		ElementView::new("select")
			.attr("name", self.mangle(name))
			.class(&self.inner.tag_class)
			.children(children)
	}

	/// `<input type="file">` bound to `name`.
	///
	/// The data only sees file metadata; the files themselves are kept by the
	/// binding and restored by [`FormBinding::after_render`].
	pub fn file_input(&self, name: &str) -> ElementView {
		self.control("input", Some("file"), name, FieldKind::File, |_| {})
	}

	fn control(
		&self,
		tag: &'static str,
		input_type: Option<&'static str>,
		name: &str,
		kind: FieldKind,
		prepare: impl FnOnce(&mut Attrs),
	) -> ElementView {
		let field = self.field_or_insert(name, kind);
		let mut attrs = Attrs::new();
		if let Some(input_type) = input_type {
			attrs.set("type", input_type);
		}
		attrs.set("name", self.mangle(name));
		prepare(&mut attrs);
		field.assign_attr_value(&mut attrs, self.current_value(name).as_ref());
		self.ensure_listener();
		ElementView::new(tag)
			.with_attrs(attrs)
			.class(&self.inner.tag_class)
	}

	/// The codec for `name`. A control of another kind rebinds the name, so
	/// the codec always matches the control rendered last.
	fn field_or_insert(&self, name: &str, kind: FieldKind) -> Rc<Field> {
		let mut fields = self.inner.fields.borrow_mut();
		let field = fields
			.entry(self.mangle(name))
			.or_insert_with(|| Rc::new(Field::new(name, kind)));
		if field.kind() != kind {
			warn_log!(
				"[FormBinding {}] field '{}' rebound from {:?} to {:?}",
				self.inner.instance_id,
				name,
				field.kind(),
				kind
			);
			*field = Rc::new(Field::new(name, kind));
		}
		Rc::clone(field)
	}

	fn current_value(&self, name: &str) -> Option<Value> {
		match serde_json::to_value(self.data()) {
			Ok(Value::Object(mut map)) => map.remove(name),
			Ok(_) => {
				warn_log!(
					"[FormBinding {}] {}",
					self.inner.instance_id,
					FormError::NotAnObject
				);
				None
			}
			Err(err) => {
				warn_log!("[FormBinding {}] {}", self.inner.instance_id, err);
				None
			}
		}
	}

	// Lifecycle

	/// Attaches the instance to its rendered root element.
	pub fn mount(&self, root: &Element) {
		if self.phase() == FormPhase::Unmounted {
			warn_log!(
				"[FormBinding {}] mount after unmount ignored",
				self.inner.instance_id
			);
			return;
		}
		*self.inner.root.borrow_mut() = Some(root.clone());
		self.inner.phase.set(FormPhase::Mounted);
		if self.inner.wants_listener.get() {
			self.attach_listeners(root);
		}
		debug_log!("[FormBinding {}] mounted", self.inner.instance_id);
	}

	/// Re-renders the mounted root with `view`, then restores file selections.
	pub fn render(&self, view: impl IntoView) -> FormResult<()> {
		let Some(root) = self.root() else {
			warn_log!(
				"[FormBinding {}] render before mount ignored",
				self.inner.instance_id
			);
			return Ok(());
		};
		view.into_view().replace_children(&root)?;
		self.after_render();
		Ok(())
	}

	/// Tears the instance down: listeners are removed and fields forgotten.
	///
	/// Serializations still in flight complete without touching the data.
	pub fn unmount(&self) {
		self.inner.phase.set(FormPhase::Unmounted);
		self.inner.listeners.borrow_mut().clear();
		self.inner.root.borrow_mut().take();
		self.inner.fields.borrow_mut().clear();
		self.inner.pending_files.borrow_mut().clear();
		debug_log!("[FormBinding {}] unmounted", self.inner.instance_id);
	}

	/// Re-applies remembered file selections to the rendered file inputs.
	///
	/// A re-render recreates file inputs empty, and a file input's selection
	/// cannot be expressed as an attribute. Returns the number of inputs
	/// restored.
	pub fn after_render(&self) -> usize {
		let Some(root) = self.root() else {
			return 0;
		};
		let pending = self.inner.pending_files.borrow();
		if pending.is_empty() {
			return 0;
		}
		let mut restored = 0;
		for element in root.query_by_class(&self.inner.tag_class) {
			if element.input_type().as_deref() != Some("file") {
				continue;
			}
			if let Some(files) = element.attribute("name").and_then(|n| pending.get(&n)) {
				element.set_files(files.clone());
				restored += 1;
			}
		}
		restored
	}

	fn ensure_listener(&self) {
		self.inner.wants_listener.set(true);
		if !self.inner.listeners.borrow().is_empty() {
			return;
		}
		if let Some(root) = self.root() {
			self.attach_listeners(&root);
		}
	}

	fn attach_listeners(&self, root: &Element) {
		let mut event_types = vec![EventType::Change];
		if self.inner.options.borrow().live_input {
			event_types.push(EventType::Input);
		}
		let handles: Vec<EventHandle> = event_types
			.into_iter()
			.map(|event_type| {
				let weak = Rc::downgrade(&self.inner);
				root.add_event_listener(event_type, move |event| {
					if let Some(inner) = weak.upgrade() {
						FormBinding { inner }.on_native_event(event);
					}
				})
			})
			.collect();
		*self.inner.listeners.borrow_mut() = handles;
	}

	fn on_native_event(&self, event: &NativeEvent) {
		let target = event.target();
		if !target.has_class(&self.inner.tag_class) {
			return;
		}
		if target.input_type().as_deref() == Some("file")
			&& let Some(name) = target.attribute("name")
		{
			self.inner
				.pending_files
				.borrow_mut()
				.insert(name, target.files());
		}

		let this = self.clone();
		let native = event.clone();
		spawn_local(async move {
			if let Err(err) = this.handle_change(Some(native)).await {
				error_log!(
					"[FormBinding {}] change handling failed: {}",
					this.inner.instance_id,
					err
				);
			}
		});
	}

	// Serialization

	/// Reads the mounted controls back into a copy of the data.
	///
	/// Without a mounted root this is the current data unchanged. Otherwise
	/// every field rendered by this instance overwrites its property, element
	/// groups without a field are ignored, and the result goes through
	/// [`FormHooks::after_serialize`].
	pub async fn serialize(&self) -> FormResult<T> {
		let Some(root) = self.root() else {
			return Ok(self.data());
		};

		let overlapping = self.inner.in_flight.get();
		if overlapping > 0 {
			debug_log!(
				"[FormBinding {}] serialize overlaps {} in flight; last to finish wins",
				self.inner.instance_id,
				overlapping
			);
		}
		self.inner.in_flight.set(overlapping + 1);
		self.inner.phase.set(FormPhase::Serializing);

		let hooks = self.inner.hooks.borrow().clone();
		let result = match self.collect(&root) {
			Ok(data) => hooks.after_serialize(data).await,
			Err(err) => Err(err),
		};

		let remaining = self.inner.in_flight.get().saturating_sub(1);
		self.inner.in_flight.set(remaining);
		if remaining == 0 && self.phase() == FormPhase::Serializing {
			self.inner.phase.set(FormPhase::Idle);
		}
		result
	}

	fn collect(&self, root: &Element) -> FormResult<T> {
		let mut data = serde_json::to_value(self.data())?;
		let Value::Object(map) = &mut data else {
			return Err(FormError::NotAnObject);
		};

		let mut groups: BTreeMap<String, Vec<Element>> = BTreeMap::new();
		for element in root.query_by_class(&self.inner.tag_class) {
			if let Some(name) = element.attribute("name") {
				groups.entry(name).or_default().push(element);
			}
		}

		// Option strings read as scalars while unset, raw text kept for fallback.
		let mut inferred: Vec<(String, Value)> = Vec::new();
		let fields = self.inner.fields.borrow();
		for (mangled, elements) in &groups {
			let Some(field) = fields.get(mangled) else {
				continue;
			};
			let mut value = field.get_value(elements);
			if field.coerces_to_previous() {
				match map.get(field.name()) {
					None | Some(Value::Null) => {
						let typed = infer_scalar(value.clone());
						if typed != value {
							inferred.push((field.name().to_string(), value));
						}
						value = typed;
					}
					previous => value = coerce_like(value, previous),
				}
			}
			map.insert(field.name().to_string(), value);
		}
		drop(fields);

		if inferred.is_empty() {
			return Ok(serde_json::from_value(data)?);
		}
		if let Ok(typed) = serde_json::from_value(data.clone()) {
			return Ok(typed);
		}
		if let Value::Object(map) = &mut data {
			for (name, raw) in inferred {
				map.insert(name, raw);
			}
		}
		Ok(serde_json::from_value(data)?)
	}

	/// Packages the files of a file input as multipart parts under `key`, or
	/// under [`FormOptions::file_key`] when `key` is `None`.
	///
	/// Falls back to the remembered selection when the element itself holds no
	/// files, e.g. right after a re-render.
	pub async fn serialize_file_input(&self, input: &Element, key: Option<&str>) -> FormDataBag {
		let key = match key {
			Some(key) => key.to_string(),
			None => self.inner.options.borrow().file_key.to_string(),
		};
		let mut files = input.files();
		if files.is_empty()
			&& let Some(name) = input.attribute("name")
		{
			files = self.pending_files_for(&name);
		}

		let mut bag = FormDataBag::new();
		for file in files {
			bag.append_file(key.clone(), file);
		}
		bag
	}

	fn pending_files_for(&self, mangled: &str) -> FileList {
		self.inner
			.pending_files
			.borrow()
			.get(mangled)
			.cloned()
			.unwrap_or_default()
	}

	/// The change pipeline: serialize, then, if still mounted and the hooks
	/// agree, merge and publish on [`FormBinding::data_changed_key`].
	///
	/// Returns whether the data was updated.
	pub async fn handle_change(&self, native: Option<NativeEvent>) -> FormResult<bool> {
		let next = self.serialize().await?;
		if !self.is_mounted() {
			debug_log!(
				"[FormBinding {}] unmounted while serializing, change dropped",
				self.inner.instance_id
			);
			return Ok(false);
		}

		let hooks = self.inner.hooks.borrow().clone();
		if !hooks.should_update_state(&self.data(), &next) {
			return Ok(false);
		}

		self.inner.store.merge(next.clone());
		let key = self.data_changed_key();
		self.inner
			.scope
			.emit(EventType::Change, &key, native.as_ref(), next, EmitScope::Bubble);
		Ok(true)
	}
}

impl<T: 'static> fmt::Debug for FormBinding<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FormBinding")
			.field("instance_id", &self.inner.instance_id)
			.field("phase", &self.inner.phase.get())
			.field("fields", &self.inner.fields.borrow().len())
			.field("mounted", &self.inner.root.borrow().is_some())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use futures::executor::block_on;
	use rstest::{fixture, rstest};
	use serde::Deserialize;
	use wireform_core::View;

	#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
	struct Profile {
		name: String,
		age: Option<i64>,
		admin: bool,
	}

	#[fixture]
	fn form() -> FormBinding<Profile> {
		FormBinding::detached(
			Profile {
				name: "Ada".into(),
				age: Some(36),
				admin: true,
			},
			&Scope::root(),
		)
	}

	#[rstest]
	fn test_instance_ids_and_classes_are_unique() {
		let scope = Scope::root();
		let a = FormBinding::detached(Profile::default(), &scope);
		let b = FormBinding::detached(Profile::default(), &scope);

		assert_ne!(a.instance_id(), b.instance_id());
		assert_ne!(a.tag_class(), b.tag_class());
		assert_ne!(a.mangle("name"), b.mangle("name"));
		assert_eq!(a.mangle("name"), format!("{}-name", a.instance_id()));
	}

	#[rstest]
	fn test_helpers_render_current_values(form: FormBinding<Profile>) {
		let name = form.text_input("name");
		assert_eq!(name.attrs().get("type"), Some("text"));
		assert_eq!(name.attrs().get("value"), Some("Ada"));
		assert_eq!(name.attrs().get("name"), Some(form.mangle("name").as_str()));
		assert_eq!(name.attrs().get("class"), Some(form.tag_class()));

		assert_eq!(form.number_input("age").attrs().get("value"), Some("36"));
		assert!(form.checkbox("admin").attrs().flag("checked"));
	}

	#[rstest]
	fn test_codec_is_reused_across_renders(form: FormBinding<Profile>) {
		let _ = form.text_input("name");
		let first = form.field("name").unwrap();
		let _ = form.text_input("name");
		let second = form.field("name").unwrap();

		assert!(Rc::ptr_eq(&first, &second));
		assert_eq!(form.field_names(), vec!["name"]);
	}

	#[rstest]
	fn test_control_of_another_kind_rebinds_codec(form: FormBinding<Profile>) {
		let _ = form.radio("age", "36");
		assert_eq!(form.field("age").unwrap().kind(), FieldKind::Radio);

		let age = form.number_input("age");
		assert_eq!(form.field("age").unwrap().kind(), FieldKind::Number);
		assert_eq!(age.attrs().get("type"), Some("number"));
		assert_eq!(age.attrs().get("value"), Some("36"));

		let root = Element::new("div");
		form.mount(&root);
		form.render(age).unwrap();
		root.query_by_class(form.tag_class())[0].set_value("40");
		assert_eq!(block_on(form.serialize()).unwrap().age, Some(40));
	}

	#[rstest]
	fn test_textarea_renders_body(form: FormBinding<Profile>) {
		let view = form.textarea("name").into_view();
		assert!(view.render_to_string().contains(">Ada</textarea>"));
	}

	#[rstest]
	fn test_select_marks_matching_option() {
		#[derive(Clone, Serialize, Deserialize)]
		struct Shirt {
			size: Option<String>,
		}
		let form = FormBinding::detached(Shirt { size: None }, &Scope::root());
		let view = form.select(
			"size",
			[
				SelectOption::placeholder("Pick one"),
				SelectOption::new("m", "Medium"),
			],
		);
		let html = view.into_view().render_to_string();
		assert!(html.contains("<option selected=\"\">Pick one</option>"));
		assert!(html.contains("<option value=\"m\">Medium</option>"));
	}

	#[rstest]
	#[tokio::test]
	async fn test_serialize_without_root_returns_copy(form: FormBinding<Profile>) {
		let _ = form.text_input("name");
		assert_eq!(form.serialize().await.unwrap(), form.data());
		assert_eq!(form.phase(), FormPhase::Uninitialized);
	}

	#[rstest]
	#[tokio::test]
	async fn test_serialize_reads_mounted_controls(form: FormBinding<Profile>) {
		let root = Element::new("div");
		form.mount(&root);
		form.render(
			View::element("form")
				.child(form.text_input("name"))
				.child(form.number_input("age")),
		)
		.unwrap();

		let inputs = root.query_by_class(form.tag_class());
		inputs[0].set_value("Grace");
		inputs[1].set_value("");

		let data = form.serialize().await.unwrap();
		assert_eq!(data.name, "Grace");
		assert_eq!(data.age, None);
		assert!(data.admin);
		assert_eq!(form.phase(), FormPhase::Idle);
	}

	#[rstest]
	#[tokio::test]
	async fn test_serialize_rejects_non_object_data() {
		let form = FormBinding::detached(5u32, &Scope::root());
		form.mount(&Element::new("div"));
		assert!(matches!(
			form.serialize().await,
			Err(FormError::NotAnObject)
		));
	}

	#[rstest]
	fn test_listener_attached_on_mount_once(form: FormBinding<Profile>) {
		let root = Element::new("div");
		let _ = form.text_input("name");
		let _ = form.checkbox("admin");
		assert_eq!(root.listener_count(), 0);

		form.mount(&root);
		let _ = form.text_input("name");
		assert_eq!(root.listener_count(), 1);

		form.unmount();
		assert_eq!(root.listener_count(), 0);
		assert_eq!(form.phase(), FormPhase::Unmounted);
		assert!(form.field_names().is_empty());
	}

	#[rstest]
	fn test_live_input_adds_input_listener() {
		let root = Element::new("div");
		let form = FormBinding::detached(Profile::default(), &Scope::root())
			.with_options(FormOptions::default().live_input(true));
		form.mount(&root);
		let _ = form.text_input("name");
		assert_eq!(root.listener_count(), 2);
	}

	#[rstest]
	fn test_mount_after_unmount_is_ignored(form: FormBinding<Profile>) {
		form.unmount();
		form.mount(&Element::new("div"));
		assert!(!form.is_mounted());
		assert_eq!(form.phase(), FormPhase::Unmounted);
	}

	#[rstest]
	fn test_set_data_does_not_notify(form: FormBinding<Profile>) {
		let key = form.data_changed_key();
		let hits = Rc::new(Cell::new(0));
		let sink = Rc::clone(&hits);
		form.scope()
			.on_message(EventType::Change, &key, move |_, _| sink.set(sink.get() + 1));

		form.set_data(Profile::default());

		assert_eq!(form.data(), Profile::default());
		assert_eq!(hits.get(), 0);
	}
}
