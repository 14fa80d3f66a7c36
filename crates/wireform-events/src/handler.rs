//! Handler map
//!
//! Every `on*` subscription compiles down to a [`Handler`] stored in a
//! [`HandlerMap`] under the composite of its event category and key id.
//! Lists keep insertion order and allow duplicates; dispatch walks them front
//! to back.

use crate::key::{Key, KeyId};
use std::any::Any;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::rc::Rc;
use wireform_core::{EventType, NativeEvent};

/// Where the native listener for a handler is physically attached.
///
/// This does not change which emissions a handler matches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Attach {
	/// On the owning component's own root element.
	#[default]
	Active,
	/// On the shared root, receiving bubbled events whether or not the owning
	/// component is mounted.
	Passive,
}

/// Options for registering a handler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HandlerOptions {
	/// Listener placement.
	pub attach: Attach,
}

impl HandlerOptions {
	/// Options for a handler attached to the component root.
	pub fn active() -> Self {
		Self {
			attach: Attach::Active,
		}
	}

	/// Options for a handler attached to the shared root.
	pub fn passive() -> Self {
		Self {
			attach: Attach::Passive,
		}
	}
}

/// What a handler receives when it is invoked.
pub struct Dispatch<'a> {
	event_type: &'a EventType,
	key: &'a Key,
	native: Option<&'a NativeEvent>,
	payload: Option<&'a dyn Any>,
}

impl<'a> Dispatch<'a> {
	/// Creates a dispatch record.
	pub fn new(
		event_type: &'a EventType,
		key: &'a Key,
		native: Option<&'a NativeEvent>,
		payload: Option<&'a dyn Any>,
	) -> Self {
		Self {
			event_type,
			key,
			native,
			payload,
		}
	}

	/// The event category being dispatched.
	pub fn event_type(&self) -> &EventType {
		self.event_type
	}

	/// The key the message was addressed to.
	pub fn key(&self) -> &Key {
		self.key
	}

	/// The native event that caused the message, if any.
	pub fn native_event(&self) -> Option<&'a NativeEvent> {
		self.native
	}

	/// The payload, if it is a `T`.
	pub fn payload<T: 'static>(&self) -> Option<&'a T> {
		self.payload.and_then(|p| p.downcast_ref::<T>())
	}
}

/// Handler callback.
pub type HandlerFn = Rc<dyn Fn(&Dispatch<'_>)>;

/// A registered (event category, key, options, callback) record.
#[derive(Clone)]
pub struct Handler {
	event_type: EventType,
	key: Key,
	options: HandlerOptions,
	callback: HandlerFn,
}

impl Handler {
	/// Creates a handler.
	pub fn new<F>(event_type: EventType, key: Key, options: HandlerOptions, callback: F) -> Self
	where
		F: Fn(&Dispatch<'_>) + 'static,
	{
		Self {
			event_type,
			key,
			options,
			callback: Rc::new(callback),
		}
	}

	/// The event category.
	pub fn event_type(&self) -> &EventType {
		&self.event_type
	}

	/// The key.
	pub fn key(&self) -> &Key {
		&self.key
	}

	/// The registration options.
	pub fn options(&self) -> HandlerOptions {
		self.options
	}

	/// Invokes the callback.
	pub fn invoke(&self, dispatch: &Dispatch<'_>) {
		(self.callback)(dispatch)
	}
}

impl fmt::Debug for Handler {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Handler")
			.field("event_type", &self.event_type)
			.field("key", &self.key)
			.field("options", &self.options)
			.field("callback", &"<function>")
			.finish()
	}
}

/// Multi-map from (event category, key id) to handlers in registration order.
#[derive(Debug, Default)]
pub struct HandlerMap {
	entries: HashMap<(EventType, KeyId), Vec<Handler>>,
}

impl HandlerMap {
	/// Creates an empty map.
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends a handler. Never rejects, never deduplicates.
	pub fn register(&mut self, handler: Handler) {
		let composite = (handler.event_type.clone(), handler.key.id().clone());
		self.entries.entry(composite).or_default().push(handler);
	}

	/// Calls `f` on every handler for the composite, in registration order.
	pub fn for_each<F>(&self, event_type: &EventType, key_id: &KeyId, mut f: F)
	where
		F: FnMut(&Handler),
	{
		if let Some(handlers) = self.entries.get(&(event_type.clone(), key_id.clone())) {
			for handler in handlers {
				f(handler);
			}
		}
	}

	/// Snapshot of the handlers for the composite, in registration order.
	pub fn handlers(&self, event_type: &EventType, key_id: &KeyId) -> Vec<Handler> {
		let mut out = Vec::new();
		self.for_each(event_type, key_id, |h| out.push(h.clone()));
		out
	}

	/// Number of handlers for the composite.
	pub fn handler_count(&self, event_type: &EventType, key_id: &KeyId) -> usize {
		self.entries
			.get(&(event_type.clone(), key_id.clone()))
			.map_or(0, Vec::len)
	}

	/// Event categories with at least one handler anywhere in the map.
	pub fn distinct_event_types(&self) -> HashSet<EventType> {
		self.entries
			.iter()
			.filter(|(_, handlers)| !handlers.is_empty())
			.map(|((event_type, _), _)| event_type.clone())
			.collect()
	}

	/// Event categories with at least one handler of the given placement.
	pub fn distinct_event_types_for(&self, attach: Attach) -> HashSet<EventType> {
		self.entries
			.iter()
			.filter(|(_, handlers)| handlers.iter().any(|h| h.options.attach == attach))
			.map(|((event_type, _), _)| event_type.clone())
			.collect()
	}

	/// Total number of handlers.
	pub fn len(&self) -> usize {
		self.entries.values().map(Vec::len).sum()
	}

	/// Returns true when no handler is registered.
	pub fn is_empty(&self) -> bool {
		self.entries.values().all(Vec::is_empty)
	}

	/// Discards every handler.
	pub fn clear(&mut self) {
		self.entries.clear();
	}
}
