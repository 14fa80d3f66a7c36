//! In-memory element tree.
//!
//! This is the surface the binding engine reads from and the renderer writes
//! to. It models what form handling needs from the DOM and nothing more:
//!
//! - attributes (declarative state)
//! - the `value`, `checked`, `selected` and `files` properties, which start
//!   out mirroring their attributes and diverge once the user interacts
//! - class queries over a subtree
//! - bubbling event listeners with RAII removal through [`EventHandle`]
//!
//! Elements are cheap handles (`Rc`); cloning an [`Element`] yields the same
//! node. Children are owned by their parent, parents are referenced weakly.

use crate::event::{EventType, NativeEvent};
use crate::file::FileList;
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::{Rc, Weak};

type ListenerFn = Rc<dyn Fn(&NativeEvent)>;

struct Listener {
	id: u64,
	event_type: EventType,
	callback: ListenerFn,
}

struct Node {
	tag: String,
	attrs: RefCell<BTreeMap<String, String>>,
	/// Dirty `value` property; `None` while it still follows the attribute.
	value: RefCell<Option<String>>,
	/// Dirty `checked` (inputs) or `selected` (options) property.
	checked: Cell<Option<bool>>,
	/// Set on a `<select>` when the user picked a value no option carries.
	deselected: Cell<bool>,
	files: RefCell<FileList>,
	text: RefCell<String>,
	children: RefCell<Vec<Element>>,
	parent: RefCell<Weak<Node>>,
	listeners: RefCell<Vec<Listener>>,
	next_listener_id: Cell<u64>,
}

/// Handle to a node in the element tree.
#[derive(Clone)]
pub struct Element {
	node: Rc<Node>,
}

impl PartialEq for Element {
	fn eq(&self, other: &Self) -> bool {
		Rc::ptr_eq(&self.node, &other.node)
	}
}

impl Eq for Element {}

impl fmt::Debug for Element {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Element")
			.field("tag", &self.node.tag)
			.field("attrs", &*self.node.attrs.borrow())
			.field("children", &self.node.children.borrow().len())
			.finish()
	}
}

impl Element {
	/// Creates a detached element.
	pub fn new(tag: impl Into<String>) -> Self {
		let tag: String = tag.into();
		Self {
			node: Rc::new(Node {
				tag: tag.to_ascii_lowercase(),
				attrs: RefCell::new(BTreeMap::new()),
				value: RefCell::new(None),
				checked: Cell::new(None),
				deselected: Cell::new(false),
				files: RefCell::new(Vec::new()),
				text: RefCell::new(String::new()),
				children: RefCell::new(Vec::new()),
				parent: RefCell::new(Weak::new()),
				listeners: RefCell::new(Vec::new()),
				next_listener_id: Cell::new(0),
			}),
		}
	}

	/// Returns the lowercase tag name.
	pub fn tag_name(&self) -> &str {
		&self.node.tag
	}

	/// Returns the `type` of an `<input>`, lowercased, defaulting to `text`.
	pub fn input_type(&self) -> Option<String> {
		if self.node.tag != "input" {
			return None;
		}
		Some(
			self.attribute("type")
				.map(|t| t.to_ascii_lowercase())
				.unwrap_or_else(|| "text".to_string()),
		)
	}

	// Attributes

	/// Returns an attribute value.
	pub fn attribute(&self, name: &str) -> Option<String> {
		self.node.attrs.borrow().get(name).cloned()
	}

	/// Returns whether an attribute is present.
	pub fn has_attribute(&self, name: &str) -> bool {
		self.node.attrs.borrow().contains_key(name)
	}

	/// Sets an attribute.
	pub fn set_attribute(&self, name: impl Into<String>, value: impl Into<String>) {
		self.node.attrs.borrow_mut().insert(name.into(), value.into());
	}

	/// Removes an attribute.
	pub fn remove_attribute(&self, name: &str) {
		self.node.attrs.borrow_mut().remove(name);
	}

	/// Returns all attributes in name order.
	pub fn attributes(&self) -> Vec<(String, String)> {
		self.node
			.attrs
			.borrow()
			.iter()
			.map(|(k, v)| (k.clone(), v.clone()))
			.collect()
	}

	/// Returns the classes from the `class` attribute.
	pub fn classes(&self) -> Vec<String> {
		self.attribute("class")
			.map(|c| c.split_whitespace().map(str::to_string).collect())
			.unwrap_or_default()
	}

	/// Returns whether the element carries `class`.
	pub fn has_class(&self, class: &str) -> bool {
		self.node
			.attrs
			.borrow()
			.get("class")
			.is_some_and(|c| c.split_whitespace().any(|c| c == class))
	}

	/// Adds a class if it is not present yet.
	pub fn add_class(&self, class: &str) {
		if self.has_class(class) {
			return;
		}
		let joined = match self.attribute("class") {
			Some(existing) if !existing.trim().is_empty() => format!("{} {}", existing.trim(), class),
			_ => class.to_string(),
		};
		self.set_attribute("class", joined);
	}

	// Text

	/// Returns the element's own text.
	pub fn text(&self) -> String {
		self.node.text.borrow().clone()
	}

	/// Replaces the element's own text.
	pub fn set_text(&self, text: impl Into<String>) {
		*self.node.text.borrow_mut() = text.into();
	}

	/// Appends to the element's own text.
	pub fn append_text(&self, text: &str) {
		self.node.text.borrow_mut().push_str(text);
	}

	// Properties

	/// The `value` property.
	///
	/// For `<select>` this mirrors the browser convenience path: the selected
	/// option's value, which falls back to the option text when the option has
	/// no `value` attribute.
	pub fn value(&self) -> String {
		if let Some(value) = self.node.value.borrow().as_ref() {
			return value.clone();
		}
		match self.node.tag.as_str() {
			"select" => self
				.selected_option()
				.map(|option| option.value())
				.unwrap_or_default(),
			"textarea" => self.text(),
			"option" => self.attribute("value").unwrap_or_else(|| self.text()),
			_ => match self.attribute("value") {
				Some(value) => value,
				None if matches!(self.input_type().as_deref(), Some("checkbox" | "radio")) => {
					"on".to_string()
				}
				None => String::new(),
			},
		}
	}

	/// Sets the `value` property as user input would.
	///
	/// On a `<select>` this selects the first option whose value matches, or
	/// clears the selection when none does.
	pub fn set_value(&self, value: impl Into<String>) {
		let value = value.into();
		if self.node.tag == "select" {
			let options = self.options();
			let matched = options.iter().position(|o| o.value() == value);
			for (index, option) in options.iter().enumerate() {
				option.node.checked.set(Some(Some(index) == matched));
			}
			self.node.deselected.set(matched.is_none());
			return;
		}
		*self.node.value.borrow_mut() = Some(value);
	}

	/// The `checked` property of checkboxes and radios.
	pub fn checked(&self) -> bool {
		self.node
			.checked
			.get()
			.unwrap_or_else(|| self.has_attribute("checked"))
	}

	/// Sets the `checked` property.
	///
	/// Checking a radio unchecks the other radios of its group in the same tree.
	pub fn set_checked(&self, checked: bool) {
		self.node.checked.set(Some(checked));
		if !checked || self.input_type().as_deref() != Some("radio") {
			return;
		}
		let Some(name) = self.attribute("name") else {
			return;
		};
		let root = self.root();
		for other in std::iter::once(root.clone()).chain(root.descendants()) {
			if other != *self
				&& other.input_type().as_deref() == Some("radio")
				&& other.attribute("name").as_deref() == Some(name.as_str())
			{
				other.node.checked.set(Some(false));
			}
		}
	}

	/// The `selected` property of an `<option>`.
	pub fn selected(&self) -> bool {
		self.node
			.checked
			.get()
			.unwrap_or_else(|| self.has_attribute("selected"))
	}

	/// The `<option>` descendants of this element, in document order.
	pub fn options(&self) -> Vec<Element> {
		self.descendants()
			.into_iter()
			.filter(|e| e.node.tag == "option")
			.collect()
	}

	/// The option a `<select>` currently shows as selected.
	///
	/// Falls back to the first option when none is marked selected, unless the
	/// selection was explicitly cleared. `None` when there are no options.
	pub fn selected_option(&self) -> Option<Element> {
		if self.node.deselected.get() {
			return None;
		}
		let options = self.options();
		options
			.iter()
			.find(|o| o.selected())
			.or_else(|| options.first())
			.cloned()
	}

	/// Selects the option at `index` as a user would.
	pub fn select_index(&self, index: usize) {
		for (i, option) in self.options().iter().enumerate() {
			option.node.checked.set(Some(i == index));
		}
		self.node.deselected.set(false);
	}

	/// The `files` property of a file input.
	pub fn files(&self) -> FileList {
		self.node.files.borrow().clone()
	}

	/// Replaces the `files` property.
	pub fn set_files(&self, files: FileList) {
		*self.node.files.borrow_mut() = files;
	}

	// Tree

	/// Appends `child`, detaching it from any previous parent.
	pub fn append_child(&self, child: &Element) {
		if let Some(previous) = child.parent() {
			previous.remove_child(child);
		}
		*child.node.parent.borrow_mut() = Rc::downgrade(&self.node);
		self.node.children.borrow_mut().push(child.clone());
	}

	/// Removes `child`. Returns whether it was a child of this element.
	pub fn remove_child(&self, child: &Element) -> bool {
		let mut children = self.node.children.borrow_mut();
		let Some(index) = children.iter().position(|c| c == child) else {
			return false;
		};
		children.remove(index);
		*child.node.parent.borrow_mut() = Weak::new();
		true
	}

	/// Removes all children.
	pub fn clear_children(&self) {
		let children = std::mem::take(&mut *self.node.children.borrow_mut());
		for child in children {
			*child.node.parent.borrow_mut() = Weak::new();
		}
	}

	/// Returns the direct children.
	pub fn children(&self) -> Vec<Element> {
		self.node.children.borrow().clone()
	}

	/// Returns the parent element.
	pub fn parent(&self) -> Option<Element> {
		self.node
			.parent
			.borrow()
			.upgrade()
			.map(|node| Element { node })
	}

	/// Returns the topmost ancestor (or `self`).
	pub fn root(&self) -> Element {
		let mut current = self.clone();
		while let Some(parent) = current.parent() {
			current = parent;
		}
		current
	}

	/// Returns whether `other` is this element or one of its descendants.
	pub fn contains(&self, other: &Element) -> bool {
		let mut current = Some(other.clone());
		while let Some(element) = current {
			if element == *self {
				return true;
			}
			current = element.parent();
		}
		false
	}

	/// All descendants in document order, excluding `self`.
	pub fn descendants(&self) -> Vec<Element> {
		let mut out = Vec::new();
		self.collect_descendants(&mut out);
		out
	}

	fn collect_descendants(&self, out: &mut Vec<Element>) {
		for child in self.node.children.borrow().iter() {
			out.push(child.clone());
			child.collect_descendants(out);
		}
	}

	/// Descendants carrying `class`, in document order.
	pub fn query_by_class(&self, class: &str) -> Vec<Element> {
		self.descendants()
			.into_iter()
			.filter(|e| e.has_class(class))
			.collect()
	}

	// Events

	/// Registers a listener. It stays registered while the handle is alive.
	pub fn add_event_listener<F>(&self, event_type: EventType, callback: F) -> EventHandle
	where
		F: Fn(&NativeEvent) + 'static,
	{
		let id = self.push_listener(event_type.clone(), Rc::new(callback));
		EventHandle {
			node: Rc::downgrade(&self.node),
			event_type,
			id,
		}
	}

	/// Registers a listener owned by the element itself, removed only when
	/// the element is dropped.
	pub fn add_owned_listener<F>(&self, event_type: EventType, callback: F)
	where
		F: Fn(&NativeEvent) + 'static,
	{
		self.push_listener(event_type, Rc::new(callback));
	}

	fn push_listener(&self, event_type: EventType, callback: ListenerFn) -> u64 {
		let id = self.node.next_listener_id.get();
		self.node.next_listener_id.set(id + 1);
		self.node.listeners.borrow_mut().push(Listener {
			id,
			event_type,
			callback,
		});
		id
	}

	/// Number of listeners registered directly on this element.
	pub fn listener_count(&self) -> usize {
		self.node.listeners.borrow().len()
	}

	/// Fires `event_type` at this element and bubbles it to the root.
	///
	/// Returns the number of listeners invoked.
	pub fn dispatch_event(&self, event_type: EventType) -> usize {
		let event = NativeEvent::new(event_type, self.clone());
		let mut invoked = 0;
		let mut current = Some(self.clone());
		while let Some(element) = current {
			// Cloned out so listeners may add or drop listeners while running.
			let callbacks: Vec<ListenerFn> = element
				.node
				.listeners
				.borrow()
				.iter()
				.filter(|l| l.event_type == *event.event_type())
				.map(|l| Rc::clone(&l.callback))
				.collect();
			for callback in callbacks {
				callback(&event);
				invoked += 1;
			}
			current = element.parent();
		}
		invoked
	}
}

/// Keeps a listener registered; dropping it removes the listener.
#[must_use = "dropping the handle removes the listener"]
pub struct EventHandle {
	node: Weak<Node>,
	event_type: EventType,
	id: u64,
}

impl EventHandle {
	/// The event category the listener was registered for.
	pub fn event_type(&self) -> &EventType {
		&self.event_type
	}
}

impl fmt::Debug for EventHandle {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("EventHandle")
			.field("event_type", &self.event_type)
			.field("id", &self.id)
			.finish()
	}
}

impl Drop for EventHandle {
	fn drop(&mut self) {
		if let Some(node) = self.node.upgrade() {
			node.listeners.borrow_mut().retain(|l| l.id != self.id);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::file::FileBlob;
	use rstest::rstest;

	fn radio(name: &str, value: &str) -> Element {
		let el = Element::new("input");
		el.set_attribute("type", "radio");
		el.set_attribute("name", name);
		el.set_attribute("value", value);
		el
	}

	fn option(value: Option<&str>, text: &str) -> Element {
		let el = Element::new("option");
		if let Some(value) = value {
			el.set_attribute("value", value);
		}
		el.set_text(text);
		el
	}

	#[rstest]
	fn test_value_follows_attribute_until_dirty() {
		let input = Element::new("input");
		input.set_attribute("value", "a");
		assert_eq!(input.value(), "a");

		input.set_value("b");
		input.set_attribute("value", "c");
		assert_eq!(input.value(), "b");
	}

	#[rstest]
	fn test_checkbox_value_defaults_to_on() {
		let input = Element::new("input");
		input.set_attribute("type", "checkbox");
		assert_eq!(input.value(), "on");
	}

	#[rstest]
	fn test_checking_radio_unchecks_group() {
		let root = Element::new("form");
		let a = radio("g", "a");
		let b = radio("g", "b");
		let other = radio("h", "x");
		root.append_child(&a);
		root.append_child(&b);
		root.append_child(&other);
		other.set_checked(true);

		a.set_checked(true);
		b.set_checked(true);

		assert!(!a.checked());
		assert!(b.checked());
		assert!(other.checked());
	}

	#[rstest]
	fn test_select_value_falls_back_to_text() {
		let select = Element::new("select");
		select.append_child(&option(None, "Pick one"));
		select.append_child(&option(Some("x"), "X"));

		assert_eq!(select.value(), "Pick one");
		select.select_index(1);
		assert_eq!(select.value(), "x");
	}

	#[rstest]
	fn test_select_set_value_without_match_clears_selection() {
		let select = Element::new("select");
		select.append_child(&option(Some("x"), "X"));
		select.set_value("nope");
		assert!(select.selected_option().is_none());
		select.set_value("x");
		assert_eq!(select.selected_option().unwrap().attribute("value").as_deref(), Some("x"));
	}

	#[rstest]
	fn test_add_class_and_query() {
		let root = Element::new("div");
		let child = Element::new("input");
		let nested = Element::new("input");
		child.add_class("a");
		child.add_class("a");
		nested.set_attribute("class", "b a");
		child.append_child(&nested);
		root.append_child(&child);

		assert_eq!(child.attribute("class").as_deref(), Some("a"));
		assert_eq!(root.query_by_class("a"), vec![child.clone(), nested.clone()]);
		assert!(root.contains(&nested));
		assert!(!nested.contains(&root));
	}

	#[rstest]
	fn test_append_child_moves_between_parents() {
		let first = Element::new("div");
		let second = Element::new("div");
		let child = Element::new("span");
		first.append_child(&child);
		second.append_child(&child);

		assert!(first.children().is_empty());
		assert_eq!(child.parent(), Some(second));
	}

	#[rstest]
	fn test_event_bubbles_and_handle_removes_listener() {
		let root = Element::new("div");
		let input = Element::new("input");
		root.append_child(&input);
		let seen = Rc::new(RefCell::new(Vec::new()));

		let handle = root.add_event_listener(EventType::Change, {
			let seen = Rc::clone(&seen);
			move |event| seen.borrow_mut().push(event.target().tag_name().to_string())
		});
		let _click = root.add_event_listener(EventType::Click, |_| {});

		assert_eq!(input.dispatch_event(EventType::Change), 1);
		assert_eq!(*seen.borrow(), vec!["input".to_string()]);

		drop(handle);
		assert_eq!(input.dispatch_event(EventType::Change), 0);
		assert_eq!(root.listener_count(), 1);
	}

	#[rstest]
	fn test_owned_listener_lives_with_element() {
		let button = Element::new("button");
		let clicks = Rc::new(Cell::new(0));
		button.add_owned_listener(EventType::Click, {
			let clicks = Rc::clone(&clicks);
			move |_| clicks.set(clicks.get() + 1)
		});

		assert_eq!(button.listener_count(), 1);
		button.dispatch_event(EventType::Click);
		button.dispatch_event(EventType::Click);
		assert_eq!(clicks.get(), 2);
	}

	#[rstest]
	fn test_files_property() {
		let input = Element::new("input");
		input.set_attribute("type", "file");
		input.set_files(vec![FileBlob::new("a.png", "image/png", vec![1, 2, 3])]);
		assert_eq!(input.files().len(), 1);
		assert_eq!(input.files()[0].name(), "a.png");
	}
}
