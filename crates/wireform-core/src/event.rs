//! Native event categories and event objects.

use crate::element::Element;
use std::borrow::Cow;
use std::fmt;

/// Native event category.
///
/// Anything not covered by a named variant is carried as [`EventType::Custom`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventType {
	// Mouse events
	/// `click`
	Click,
	/// `dblclick`
	DblClick,
	/// `mousedown`
	MouseDown,
	/// `mouseup`
	MouseUp,
	/// `mousemove`
	MouseMove,
	/// `mouseenter`
	MouseEnter,
	/// `mouseleave`
	MouseLeave,
	// Keyboard events
	/// `keydown`
	KeyDown,
	/// `keyup`
	KeyUp,
	// Form events
	/// `input`
	Input,
	/// `change`
	Change,
	/// `submit`
	Submit,
	/// `focus`
	Focus,
	/// `blur`
	Blur,
	/// Any other event name.
	Custom(Cow<'static, str>),
}

impl EventType {
	/// Returns the DOM event name.
	pub fn as_str(&self) -> &str {
		match self {
			EventType::Click => "click",
			EventType::DblClick => "dblclick",
			EventType::MouseDown => "mousedown",
			EventType::MouseUp => "mouseup",
			EventType::MouseMove => "mousemove",
			EventType::MouseEnter => "mouseenter",
			EventType::MouseLeave => "mouseleave",
			EventType::KeyDown => "keydown",
			EventType::KeyUp => "keyup",
			EventType::Input => "input",
			EventType::Change => "change",
			EventType::Submit => "submit",
			EventType::Focus => "focus",
			EventType::Blur => "blur",
			EventType::Custom(name) => name,
		}
	}

	/// Maps a DOM event name to its category.
	pub fn parse(name: &str) -> Self {
		match name {
			"click" => EventType::Click,
			"dblclick" => EventType::DblClick,
			"mousedown" => EventType::MouseDown,
			"mouseup" => EventType::MouseUp,
			"mousemove" => EventType::MouseMove,
			"mouseenter" => EventType::MouseEnter,
			"mouseleave" => EventType::MouseLeave,
			"keydown" => EventType::KeyDown,
			"keyup" => EventType::KeyUp,
			"input" => EventType::Input,
			"change" => EventType::Change,
			"submit" => EventType::Submit,
			"focus" => EventType::Focus,
			"blur" => EventType::Blur,
			other => EventType::Custom(Cow::Owned(other.to_string())),
		}
	}
}

impl fmt::Display for EventType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// A native event as delivered to element listeners.
#[derive(Debug, Clone)]
pub struct NativeEvent {
	event_type: EventType,
	target: Element,
}

impl NativeEvent {
	/// Creates an event targeted at `target`.
	pub fn new(event_type: EventType, target: Element) -> Self {
		Self { event_type, target }
	}

	/// Returns the event category.
	pub fn event_type(&self) -> &EventType {
		&self.event_type
	}

	/// Returns the element the event was fired on.
	pub fn target(&self) -> &Element {
		&self.target
	}
}
