//! Declarative element descriptions.
//!
//! A [`View`] is what components produce on every render. The renderer turns
//! it into elements; [`View::mount`] is the minimal version of that step
//! (create, set attributes, attach handlers) and [`View::render_to_string`]
//! produces markup for server-side rendering.

use crate::element::Element;
use crate::event::{EventType, NativeEvent};
use std::borrow::Cow;
use std::fmt;
use std::rc::Rc;

/// Event handler stored on an [`ElementView`].
pub type ViewEventHandler = Rc<dyn Fn(&NativeEvent)>;

/// Error type for mounting views.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MountError {
	/// A void element (`<input>`, `<br>`, ...) was given children.
	#[error("void element <{0}> cannot have children")]
	VoidChildren(String),
	/// Text cannot be mounted at the top level without a parent element.
	#[error("text cannot be mounted outside an element")]
	OrphanText,
}

/// Declarative attribute set.
///
/// Boolean attributes (`checked`, `selected`, `disabled`, ...) are flags: present
/// with an empty value when set, absent otherwise. `text` holds content for
/// elements whose value lives in their body, such as `<textarea>`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attrs {
	entries: Vec<(Cow<'static, str>, String)>,
	text: Option<String>,
}

impl Attrs {
	/// Creates an empty attribute set.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets an attribute, replacing an existing value.
	pub fn set(&mut self, name: impl Into<Cow<'static, str>>, value: impl Into<String>) {
		let name = name.into();
		let value = value.into();
		match self.entries.iter_mut().find(|(n, _)| *n == name) {
			Some(entry) => entry.1 = value,
			None => self.entries.push((name, value)),
		}
	}

	/// Returns an attribute value.
	pub fn get(&self, name: &str) -> Option<&str> {
		self.entries
			.iter()
			.find(|(n, _)| n == name)
			.map(|(_, v)| v.as_str())
	}

	/// Removes an attribute.
	pub fn remove(&mut self, name: &str) {
		self.entries.retain(|(n, _)| n != name);
	}

	/// Sets or clears a boolean attribute.
	pub fn set_flag(&mut self, name: impl Into<Cow<'static, str>>, on: bool) {
		let name = name.into();
		if on {
			self.set(name, "");
		} else {
			self.remove(&name);
		}
	}

	/// Returns whether a boolean attribute is set.
	pub fn flag(&self, name: &str) -> bool {
		self.get(name).is_some()
	}

	/// Sets the body text.
	pub fn set_text(&mut self, text: impl Into<String>) {
		self.text = Some(text.into());
	}

	/// Returns the body text.
	pub fn text(&self) -> Option<&str> {
		self.text.as_deref()
	}

	/// Iterates attributes in insertion order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.entries.iter().map(|(n, v)| (n.as_ref(), v.as_str()))
	}

	/// Number of attributes (body text excluded).
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Returns true when there are no attributes.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

/// A unified representation of renderable content.
#[derive(Debug)]
pub enum View {
	/// An element.
	Element(ElementView),
	/// A text node.
	Text(Cow<'static, str>),
	/// Several views without a wrapper element.
	Fragment(Vec<View>),
	/// Renders nothing.
	Empty,
}

/// Represents an element in the view tree.
pub struct ElementView {
	tag: Cow<'static, str>,
	attrs: Attrs,
	children: Vec<View>,
	is_void: bool,
	event_handlers: Vec<(EventType, ViewEventHandler)>,
}

impl fmt::Debug for ElementView {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ElementView")
			.field("tag", &self.tag)
			.field("attrs", &self.attrs)
			.field("children", &self.children)
			.field("is_void", &self.is_void)
			.field("event_handlers_count", &self.event_handlers.len())
			.finish()
	}
}

impl ElementView {
	/// Creates a new element view.
	pub fn new(tag: impl Into<Cow<'static, str>>) -> Self {
		let tag = tag.into();
		let is_void = matches!(
			tag.as_ref(),
			"area"
				| "base" | "br"
				| "col" | "embed"
				| "hr" | "img"
				| "input" | "link"
				| "meta" | "source"
				| "track" | "wbr"
		);
		Self {
			tag,
			attrs: Attrs::new(),
			children: Vec::new(),
			is_void,
			event_handlers: Vec::new(),
		}
	}

	/// Sets an attribute.
	pub fn attr(mut self, name: impl Into<Cow<'static, str>>, value: impl Into<String>) -> Self {
		self.attrs.set(name, value);
		self
	}

	/// Sets or clears a boolean attribute.
	pub fn flag(mut self, name: impl Into<Cow<'static, str>>, on: bool) -> Self {
		self.attrs.set_flag(name, on);
		self
	}

	/// Adds a class to the `class` attribute.
	pub fn class(mut self, class: &str) -> Self {
		let joined = match self.attrs.get("class").map(str::to_string) {
			Some(existing) if existing.split_whitespace().any(|c| c == class) => return self,
			Some(existing) if !existing.is_empty() => format!("{} {}", existing, class),
			_ => class.to_string(),
		};
		self.attrs.set("class", joined);
		self
	}

	/// Merges an attribute set; its body text becomes a text child.
	pub fn with_attrs(mut self, attrs: Attrs) -> Self {
		for (name, value) in attrs.entries {
			self.attrs.set(name, value);
		}
		if let Some(text) = attrs.text {
			self.children.push(View::Text(Cow::Owned(text)));
		}
		self
	}

	/// Adds a child view.
	pub fn child(mut self, child: impl IntoView) -> Self {
		self.children.push(child.into_view());
		self
	}

	/// Adds multiple child views.
	pub fn children(mut self, children: impl IntoIterator<Item = impl IntoView>) -> Self {
		self.children
			.extend(children.into_iter().map(|c| c.into_view()));
		self
	}

	/// Adds an event handler.
	pub fn on<F>(mut self, event_type: EventType, handler: F) -> Self
	where
		F: Fn(&NativeEvent) + 'static,
	{
		self.event_handlers.push((event_type, Rc::new(handler)));
		self
	}

	/// Returns the tag name.
	pub fn tag_name(&self) -> &str {
		&self.tag
	}

	/// Returns the attributes.
	pub fn attrs(&self) -> &Attrs {
		&self.attrs
	}

	/// Returns the child views.
	pub fn child_views(&self) -> &[View] {
		&self.children
	}

	/// Returns whether this is a void element.
	pub fn is_void(&self) -> bool {
		self.is_void
	}

	/// Returns the event handlers.
	pub fn event_handlers(&self) -> &[(EventType, ViewEventHandler)] {
		&self.event_handlers
	}
}

impl View {
	/// Creates an element view.
	pub fn element(tag: impl Into<Cow<'static, str>>) -> ElementView {
		ElementView::new(tag)
	}

	/// Creates a text view.
	pub fn text(content: impl Into<Cow<'static, str>>) -> Self {
		Self::Text(content.into())
	}

	/// Creates a fragment view.
	pub fn fragment(children: impl IntoIterator<Item = impl IntoView>) -> Self {
		Self::Fragment(children.into_iter().map(|c| c.into_view()).collect())
	}

	/// Creates an empty view.
	pub fn empty() -> Self {
		Self::Empty
	}

	/// Renders the view to an HTML string.
	pub fn render_to_string(&self) -> String {
		let mut output = String::new();
		self.render_to_string_inner(&mut output);
		output
	}

	fn render_to_string_inner(&self, output: &mut String) {
		match self {
			View::Element(el) => {
				output.push('<');
				output.push_str(el.tag_name());

				for (name, value) in el.attrs().iter() {
					output.push(' ');
					output.push_str(name);
					output.push_str("=\"");
					output.push_str(&html_escape(value));
					output.push('"');
				}

				if el.is_void() {
					output.push_str(" />");
				} else {
					output.push('>');
					for child in el.child_views() {
						child.render_to_string_inner(output);
					}
					output.push_str("</");
					output.push_str(el.tag_name());
					output.push('>');
				}
			}
			View::Text(text) => {
				output.push_str(&html_escape(text));
			}
			View::Fragment(children) => {
				for child in children {
					child.render_to_string_inner(output);
				}
			}
			View::Empty => {}
		}
	}

	/// Mounts the view under `parent`.
	pub fn mount(self, parent: &Element) -> Result<(), MountError> {
		match self {
			View::Element(el) => {
				if el.is_void && !el.children.is_empty() {
					return Err(MountError::VoidChildren(el.tag.into_owned()));
				}
				let element = Element::new(el.tag.as_ref());
				for (name, value) in el.attrs.iter() {
					element.set_attribute(name, value);
				}
				for (event_type, handler) in el.event_handlers {
					element.add_owned_listener(event_type, move |event| handler(event));
				}
				for child in el.children {
					child.mount(&element)?;
				}
				parent.append_child(&element);
			}
			View::Text(text) => parent.append_text(&text),
			View::Fragment(children) => {
				for child in children {
					child.mount(parent)?;
				}
			}
			View::Empty => {}
		}
		Ok(())
	}

	/// Re-renders `root`: drops its current children and mounts this view.
	///
	/// Element state that attributes cannot express (typed values, file
	/// selections) is lost, as with any declarative re-render.
	pub fn replace_children(self, root: &Element) -> Result<(), MountError> {
		root.clear_children();
		root.set_text("");
		self.mount(root)
	}
}

fn html_escape(s: &str) -> String {
	let mut out = String::with_capacity(s.len());
	for c in s.chars() {
		match c {
			'&' => out.push_str("&amp;"),
			'<' => out.push_str("&lt;"),
			'>' => out.push_str("&gt;"),
			'"' => out.push_str("&quot;"),
			'\'' => out.push_str("&#x27;"),
			_ => out.push(c),
		}
	}
	out
}

/// Trait for types that can be converted into a View.
pub trait IntoView {
	/// Converts self into a View.
	fn into_view(self) -> View;
}

impl IntoView for View {
	fn into_view(self) -> View {
		self
	}
}

impl IntoView for ElementView {
	fn into_view(self) -> View {
		View::Element(self)
	}
}

impl IntoView for String {
	fn into_view(self) -> View {
		View::Text(Cow::Owned(self))
	}
}

impl IntoView for &'static str {
	fn into_view(self) -> View {
		View::Text(Cow::Borrowed(self))
	}
}

impl<T: IntoView> IntoView for Option<T> {
	fn into_view(self) -> View {
		match self {
			Some(v) => v.into_view(),
			None => View::Empty,
		}
	}
}

impl<T: IntoView> IntoView for Vec<T> {
	fn into_view(self) -> View {
		View::Fragment(self.into_iter().map(IntoView::into_view).collect())
	}
}
