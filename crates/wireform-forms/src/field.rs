//! Field codecs
//!
//! A [`Field`] translates one logical property between its JSON value in the
//! bound data and the form controls that edit it:
//!
//! - [`Field::assign_attr_value`] writes the value into the declarative
//!   attributes of the control being rendered
//! - [`Field::get_value`] reads it back from the mounted elements sharing the
//!   field's name
//!
//! Unset values are `Value::Null`. Codecs are stateless; the binding engine
//! keeps one per field name and reuses it across renders.

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value, json};
use wireform_core::{Attrs, Element, FileBlob};

/// Text-like `<input>` types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputType {
	/// `text`
	Text,
	/// `password`
	Password,
	/// `email`
	Email,
	/// `url`
	Url,
	/// `color`
	Color,
	/// `date`
	Date,
	/// `time`
	Time,
	/// `datetime-local`
	DateTimeLocal,
	/// `search`
	Search,
	/// `tel`
	Tel,
	/// `hidden`
	Hidden,
}

impl InputType {
	/// Returns the `type` attribute value.
	pub fn as_str(&self) -> &'static str {
		match self {
			InputType::Text => "text",
			InputType::Password => "password",
			InputType::Email => "email",
			InputType::Url => "url",
			InputType::Color => "color",
			InputType::Date => "date",
			InputType::Time => "time",
			InputType::DateTimeLocal => "datetime-local",
			InputType::Search => "search",
			InputType::Tel => "tel",
			InputType::Hidden => "hidden",
		}
	}
}

/// The kind of control a field is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
	/// Text-like input; the `value` attribute holds the string.
	Text(InputType),
	/// `number` or `range` input.
	Number,
	/// `<textarea>`; the value is the element body.
	TextArea,
	/// Checkbox bound to a bool.
	Checkbox,
	/// Radio group; one element per option.
	Radio,
	/// `<select>`; attributes are assigned per option.
	Select,
	/// File input. State only sees metadata.
	File,
}

/// JSON-shaped description of a selected file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfo {
	/// File name.
	pub name: String,
	/// MIME type, empty when unknown.
	pub mime: String,
	/// Size in bytes.
	pub size: u64,
}

impl From<&FileBlob> for FileInfo {
	fn from(blob: &FileBlob) -> Self {
		Self {
			name: blob.name().to_string(),
			mime: blob.mime().to_string(),
			size: blob.size() as u64,
		}
	}
}

/// Codec for one logical property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
	name: String,
	kind: FieldKind,
}

impl Field {
	/// Creates a codec for property `name`.
	pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
		Self {
			name: name.into(),
			kind,
		}
	}

	/// The logical property name.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// The control kind.
	pub fn kind(&self) -> FieldKind {
		self.kind
	}

	/// Writes `value` into the attributes of a control being rendered.
	///
	/// For [`FieldKind::Radio`] the attributes must already carry the option's
	/// own `value`; for [`FieldKind::Select`] this is called once per
	/// `<option>`.
	pub fn assign_attr_value(&self, attrs: &mut Attrs, value: Option<&Value>) {
		match self.kind {
			FieldKind::Text(_) | FieldKind::Number => attrs.set("value", display(value)),
			FieldKind::TextArea => attrs.set_text(display(value)),
			FieldKind::Checkbox => {
				attrs.set_flag("checked", value.and_then(Value::as_bool).unwrap_or(false))
			}
			FieldKind::Radio => {
				let checked = option_matches(attrs.get("value"), value);
				attrs.set_flag("checked", checked);
			}
			FieldKind::Select => {
				let selected = option_matches(attrs.get("value"), value);
				attrs.set_flag("selected", selected);
			}
			FieldKind::File => {}
		}
	}

	/// Reads the value back from the mounted elements named after this field.
	pub fn get_value(&self, elements: &[Element]) -> Value {
		match self.kind {
			FieldKind::Text(_) | FieldKind::TextArea => elements
				.first()
				.map_or(Value::Null, |el| Value::String(el.value())),
			FieldKind::Number => elements
				.first()
				.map_or(Value::Null, |el| parse_number(&el.value())),
			FieldKind::Checkbox => elements
				.first()
				.map_or(Value::Null, |el| Value::Bool(el.checked())),
			FieldKind::Radio => elements
				.iter()
				.find(|el| el.checked())
				.and_then(|el| el.attribute("value"))
				.map_or(Value::Null, Value::String),
			// The raw attribute, never the option text: a value-less
			// placeholder reads as unset.
			FieldKind::Select => elements
				.first()
				.and_then(Element::selected_option)
				.and_then(|option| option.attribute("value"))
				.map_or(Value::Null, Value::String),
			FieldKind::File => Value::Array(
				elements
					.first()
					.map(Element::files)
					.unwrap_or_default()
					.iter()
					.map(|blob| {
						json!({
							"name": blob.name(),
							"mime": blob.mime(),
							"size": blob.size(),
						})
					})
					.collect(),
			),
		}
	}

	/// Whether the read value is a string that should follow the JSON kind of
	/// the current data (option groups over numbers or booleans).
	pub fn coerces_to_previous(&self) -> bool {
		matches!(self.kind, FieldKind::Radio | FieldKind::Select)
	}
}

/// Parses a number control's raw value.
///
/// Blank text is unset rather than zero. Integers stay integers.
pub fn parse_number(raw: &str) -> Value {
	let raw = raw.trim();
	if raw.is_empty() {
		return Value::Null;
	}
	if let Ok(n) = raw.parse::<i64>() {
		return Value::Number(n.into());
	}
	raw.parse::<f64>()
		.ok()
		.and_then(Number::from_f64)
		.map_or(Value::Null, Value::Number)
}

/// Converts a string read from the DOM to the JSON kind of `previous`.
///
/// Leaves `next` untouched when it is not a string, when `previous` is not a
/// number or bool, or when the text does not parse as that kind.
pub fn coerce_like(next: Value, previous: Option<&Value>) -> Value {
	let Value::String(text) = &next else {
		return next;
	};
	match previous {
		Some(Value::Number(_)) => match parse_number(text) {
			Value::Null => next,
			number => number,
		},
		Some(Value::Bool(_)) => match text.as_str() {
			"true" => Value::Bool(true),
			"false" => Value::Bool(false),
			_ => next,
		},
		_ => next,
	}
}

/// Reads an option string as the number or bool it spells.
///
/// Used when there is no typed previous value to follow. Other text, and
/// anything that is not a string, comes back unchanged.
pub fn infer_scalar(next: Value) -> Value {
	let Value::String(text) = &next else {
		return next;
	};
	match text.as_str() {
		"true" => Value::Bool(true),
		"false" => Value::Bool(false),
		_ => match parse_number(text) {
			Value::Null => next,
			number => number,
		},
	}
}

fn display(value: Option<&Value>) -> String {
	match value {
		None | Some(Value::Null) => String::new(),
		Some(Value::String(s)) => s.clone(),
		Some(other) => other.to_string(),
	}
}

fn option_matches(option_value: Option<&str>, value: Option<&Value>) -> bool {
	match (option_value, value) {
		(None, None | Some(Value::Null)) => true,
		(None, _) | (Some(_), None | Some(Value::Null)) => false,
		(Some(option), Some(value)) => display(Some(value)) == option,
	}
}
