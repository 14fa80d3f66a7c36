//! Event keys
//!
//! Keys address event subscriptions by identity instead of by string name.
//! There are two issued kinds:
//!
//! - [`TypedKey<T>`]: messages sent to it carry a payload of type `T`
//! - [`UntypedKey`]: messages sent to it carry no payload
//!
//! Both draw their ids from one process-wide counter, so no two issued keys
//! ever share an id. The counter is private to this module; the only way to
//! observe it is through [`issue_typed`] and [`issue_untyped`].
//!
//! [`KeyPress`] is the exception: its id is derived from its content, so two
//! key presses with the same key and modifier set are the same key.
//!
//! ## Example
//!
//! ```
//! use wireform_events::key::{issue_typed, issue_untyped, KeyPress, Modifier};
//!
//! let saved = issue_typed::<String>();
//! let closed = issue_untyped();
//! assert_ne!(saved.id(), closed.id());
//!
//! let a = KeyPress::new("s").with(Modifier::Shift).with(Modifier::Control);
//! let b = KeyPress::new("s").with(Modifier::Control).with(Modifier::Shift);
//! assert_eq!(a.id(), b.id());
//! ```

use std::any::TypeId;
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Next id to hand out. Starts at 1 and only ever moves forward.
static NEXT_KEY_ID: AtomicU64 = AtomicU64::new(1);

fn next_id() -> KeyId {
	KeyId::Issued(NEXT_KEY_ID.fetch_add(1, Ordering::Relaxed))
}

/// Identity of a key.
///
/// Issued ids are ordered by issuance; combo ids are ordered after all issued
/// ids and among themselves lexically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KeyId {
	/// Allocated from the process-wide counter.
	Issued(u64),
	/// Derived from content (key presses).
	Combo(Arc<str>),
}

impl fmt::Display for KeyId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			KeyId::Issued(n) => write!(f, "#{}", n),
			KeyId::Combo(s) => f.write_str(s),
		}
	}
}

/// Errors produced while building keys from text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyError {
	/// The key name was empty.
	#[error("key name must not be empty")]
	EmptyKey,
	/// A modifier name was not recognized.
	#[error("unknown modifier '{0}'")]
	UnknownModifier(String),
}

/// A key whose messages carry a payload of type `T`.
///
/// `T` is phantom: nothing of type `T` is stored on the key.
pub struct TypedKey<T> {
	id: KeyId,
	_payload: PhantomData<fn() -> T>,
}

impl<T> TypedKey<T> {
	/// Returns the key id.
	pub fn id(&self) -> &KeyId {
		&self.id
	}
}

impl<T: 'static> TypedKey<T> {
	/// Erases the payload type into a runtime [`Key`].
	pub fn erase(&self) -> Key {
		Key::Typed {
			id: self.id.clone(),
			payload: PayloadType::of::<T>(),
		}
	}
}

impl<T> Clone for TypedKey<T> {
	fn clone(&self) -> Self {
		Self {
			id: self.id.clone(),
			_payload: PhantomData,
		}
	}
}

impl<T> PartialEq for TypedKey<T> {
	fn eq(&self, other: &Self) -> bool {
		self.id == other.id
	}
}

impl<T> Eq for TypedKey<T> {}

impl<T> Hash for TypedKey<T> {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.id.hash(state);
	}
}

impl<T> fmt::Debug for TypedKey<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("TypedKey")
			.field("id", &self.id)
			.field("payload", &std::any::type_name::<T>())
			.finish()
	}
}

/// A key whose messages carry no payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UntypedKey {
	id: KeyId,
}

impl UntypedKey {
	/// Returns the key id.
	pub fn id(&self) -> &KeyId {
		&self.id
	}

	/// Converts into a runtime [`Key`].
	pub fn erase(&self) -> Key {
		Key::Untyped {
			id: self.id.clone(),
		}
	}
}

/// Runtime description of a typed key's payload.
#[derive(Debug, Clone, Copy)]
pub struct PayloadType {
	type_id: TypeId,
	name: &'static str,
}

impl PayloadType {
	fn of<T: 'static>() -> Self {
		Self {
			type_id: TypeId::of::<T>(),
			name: std::any::type_name::<T>(),
		}
	}

	/// Returns the payload `TypeId`.
	pub fn type_id(&self) -> TypeId {
		self.type_id
	}

	/// Returns the payload type name, for diagnostics only.
	pub fn name(&self) -> &'static str {
		self.name
	}
}

/// Type-erased key as stored in the handler map.
#[derive(Debug, Clone)]
pub enum Key {
	/// A payload-carrying key.
	Typed {
		/// Key id.
		id: KeyId,
		/// Payload type.
		payload: PayloadType,
	},
	/// A payload-less key.
	Untyped {
		/// Key id.
		id: KeyId,
	},
}

impl Key {
	/// Returns the key id.
	pub fn id(&self) -> &KeyId {
		match self {
			Key::Typed { id, .. } | Key::Untyped { id } => id,
		}
	}

	/// Returns the payload type for typed keys.
	pub fn payload(&self) -> Option<PayloadType> {
		match self {
			Key::Typed { payload, .. } => Some(*payload),
			Key::Untyped { .. } => None,
		}
	}
}

impl PartialEq for Key {
	fn eq(&self, other: &Self) -> bool {
		self.id() == other.id()
	}
}

impl Eq for Key {}

/// Issues a fresh payload-less key.
pub fn issue_untyped() -> UntypedKey {
	UntypedKey { id: next_id() }
}

/// Issues a fresh key whose messages carry a `T`.
pub fn issue_typed<T>() -> TypedKey<T> {
	TypedKey {
		id: next_id(),
		_payload: PhantomData,
	}
}

/// Platform-neutral keyboard modifier.
///
/// `Control` covers both Ctrl and Command, `Alt` covers Alt and Option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Modifier {
	/// Control / Command
	Control,
	/// Alt / Option
	Alt,
	/// Shift
	Shift,
}

impl Modifier {
	/// Returns the name used inside key press ids.
	pub fn as_str(&self) -> &'static str {
		match self {
			Modifier::Control => "control",
			Modifier::Alt => "alt",
			Modifier::Shift => "shift",
		}
	}

	/// Parses a modifier name, accepting the platform aliases.
	pub fn parse(name: &str) -> Result<Self, KeyError> {
		match name.trim().to_ascii_lowercase().as_str() {
			"ctrl" | "control" | "cmd" | "command" | "meta" => Ok(Modifier::Control),
			"alt" | "option" | "opt" => Ok(Modifier::Alt),
			"shift" => Ok(Modifier::Shift),
			_ => Err(KeyError::UnknownModifier(name.to_string())),
		}
	}
}

/// A key combination such as `control+s`.
///
/// The id is `key + "__" + modifiers.join("&")` with modifiers in canonical
/// order, so construction order does not matter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyPress {
	key: String,
	modifiers: BTreeSet<Modifier>,
}

impl KeyPress {
	/// Creates a key press without modifiers.
	pub fn new(key: impl Into<String>) -> Self {
		Self {
			key: key.into(),
			modifiers: BTreeSet::new(),
		}
	}

	/// Adds a modifier. Adding the same modifier twice has no effect.
	pub fn with(mut self, modifier: Modifier) -> Self {
		self.modifiers.insert(modifier);
		self
	}

	/// Builds a key press from the flags of a native keyboard event.
	pub fn from_keyboard(key: &str, ctrl: bool, meta: bool, alt: bool, shift: bool) -> Self {
		let mut press = Self::new(key);
		if ctrl || meta {
			press = press.with(Modifier::Control);
		}
		if alt {
			press = press.with(Modifier::Alt);
		}
		if shift {
			press = press.with(Modifier::Shift);
		}
		press
	}

	/// Parses `"ctrl+shift+k"` style notation. The last segment is the key.
	pub fn parse(notation: &str) -> Result<Self, KeyError> {
		let mut parts: Vec<&str> = notation.split('+').map(str::trim).collect();
		let key = parts.pop().filter(|k| !k.is_empty()).ok_or(KeyError::EmptyKey)?;
		let mut press = Self::new(key);
		for part in parts {
			press = press.with(Modifier::parse(part)?);
		}
		Ok(press)
	}

	/// Returns the key name.
	pub fn key(&self) -> &str {
		&self.key
	}

	/// Returns the modifiers in canonical order.
	pub fn modifiers(&self) -> impl Iterator<Item = Modifier> + '_ {
		self.modifiers.iter().copied()
	}

	/// Returns the content-addressed id.
	pub fn id(&self) -> KeyId {
		let modifiers: Vec<&str> = self.modifiers.iter().map(Modifier::as_str).collect();
		KeyId::Combo(format!("{}__{}", self.key, modifiers.join("&")).into())
	}

	/// Returns the payload-less key this press dispatches to.
	pub fn to_key(&self) -> UntypedKey {
		UntypedKey { id: self.id() }
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_typed_and_untyped_ids_are_distinct() {
		let typed = issue_typed::<u32>();
		let untyped = issue_untyped();
		let other_typed = issue_typed::<String>();

		assert_ne!(typed.id(), untyped.id());
		assert_ne!(untyped.id(), other_typed.id());
		assert_ne!(typed.id(), other_typed.id());
	}

	#[rstest]
	fn test_ids_increase_in_issuance_order() {
		let first = issue_untyped();
		let second = issue_typed::<()>();
		assert!(first.id() < second.id());
	}

	#[rstest]
	fn test_cloned_key_is_identical() {
		let key = issue_typed::<i64>();
		assert_eq!(key.clone(), key);
		assert_eq!(key.erase(), key.clone().erase());
	}

	#[rstest]
	fn test_erase_keeps_payload_type() {
		let key = issue_typed::<Vec<u8>>();
		let erased = key.erase();
		assert_eq!(erased.id(), key.id());
		assert_eq!(
			erased.payload().map(|p| p.type_id()),
			Some(TypeId::of::<Vec<u8>>())
		);
		assert!(issue_untyped().erase().payload().is_none());
	}

	#[rstest]
	#[case(KeyPress::new("k"), "k__")]
	#[case(KeyPress::new("k").with(Modifier::Shift), "k__shift")]
	#[case(
		KeyPress::new("Enter").with(Modifier::Shift).with(Modifier::Control),
		"Enter__control&shift"
	)]
	#[case(
		KeyPress::new("s").with(Modifier::Alt).with(Modifier::Alt),
		"s__alt"
	)]
	fn test_key_press_id_format(#[case] press: KeyPress, #[case] expected: &str) {
		assert_eq!(press.id().to_string(), expected);
	}

	#[rstest]
	fn test_key_press_from_keyboard_folds_meta_into_control() {
		let mac = KeyPress::from_keyboard("s", false, true, false, false);
		let pc = KeyPress::from_keyboard("s", true, false, false, false);
		assert_eq!(mac.id(), pc.id());
		assert_eq!(mac.to_key(), pc.to_key());
	}

	#[rstest]
	#[case("ctrl+shift+k", "k__control&shift")]
	#[case("Option + x", "x__alt")]
	#[case("cmd+s", "s__control")]
	#[case("escape", "escape__")]
	fn test_key_press_parse(#[case] notation: &str, #[case] expected: &str) {
		assert_eq!(KeyPress::parse(notation).unwrap().id().to_string(), expected);
	}

	#[rstest]
	fn test_key_press_parse_errors() {
		assert_eq!(KeyPress::parse("ctrl+"), Err(KeyError::EmptyKey));
		assert_eq!(
			KeyPress::parse("hyper+k"),
			Err(KeyError::UnknownModifier("hyper".to_string()))
		);
	}

	#[rstest]
	fn test_key_id_display() {
		assert_eq!(KeyId::Issued(7).to_string(), "#7");
		assert_eq!(KeyId::Combo("a__".into()).to_string(), "a__");
	}
}
