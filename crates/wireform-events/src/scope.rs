//! Scopes and the emit primitive
//!
//! A [`Scope`] is one node of the component tree. It owns a [`HandlerMap`] and
//! knows its parent, so a message emitted with [`EmitScope::Bubble`] reaches
//! the emitting scope first and then every ancestor up to the root.
//!
//! ```
//! use wireform_events::key::issue_typed;
//! use wireform_events::scope::{EmitScope, Scope};
//! use wireform_core::EventType;
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let saved = issue_typed::<u32>();
//! let parent = Scope::root();
//! let child = parent.child();
//!
//! let seen = Rc::new(Cell::new(0));
//! let sink = Rc::clone(&seen);
//! parent.on_message(EventType::Change, &saved, move |n, _| sink.set(*n));
//!
//! assert_eq!(child.emit(EventType::Change, &saved, None, 7, EmitScope::Bubble), 1);
//! assert_eq!(seen.get(), 7);
//! ```

use crate::handler::{Dispatch, Handler, HandlerMap, HandlerOptions};
use crate::key::{Key, KeyPress, TypedKey, UntypedKey};
use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::fmt;
use std::rc::{Rc, Weak};
use wireform_core::{EventType, NativeEvent, debug_log, warn_log};

/// How far an emission travels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EmitScope {
	/// Only the emitting scope.
	#[default]
	Local,
	/// The emitting scope, then each ancestor in order.
	Bubble,
}

struct ScopeInner {
	handlers: RefCell<HandlerMap>,
	parent: Option<Weak<ScopeInner>>,
	detached: Cell<bool>,
}

/// A node of the component tree owning one handler map.
///
/// Cloning a scope yields another handle to the same node.
#[derive(Clone)]
pub struct Scope {
	inner: Rc<ScopeInner>,
}

impl Scope {
	/// Creates a scope without a parent.
	pub fn root() -> Self {
		Self::with_parent(None)
	}

	/// Creates a child scope of `self`.
	///
	/// The child only holds a weak reference to its parent; keeping the parent
	/// alive is the owner's job.
	pub fn child(&self) -> Self {
		Self::with_parent(Some(Rc::downgrade(&self.inner)))
	}

	fn with_parent(parent: Option<Weak<ScopeInner>>) -> Self {
		Self {
			inner: Rc::new(ScopeInner {
				handlers: RefCell::new(HandlerMap::new()),
				parent,
				detached: Cell::new(false),
			}),
		}
	}

	/// Returns the parent scope, if it is still alive.
	pub fn parent(&self) -> Option<Scope> {
		self.inner
			.parent
			.as_ref()
			.and_then(Weak::upgrade)
			.map(|inner| Scope { inner })
	}

	/// Returns true when both handles point at the same scope.
	pub fn ptr_eq(&self, other: &Scope) -> bool {
		Rc::ptr_eq(&self.inner, &other.inner)
	}

	/// Adds a handler to this scope's map.
	///
	/// Registering on a detached scope is ignored.
	pub fn register(&self, handler: Handler) {
		if self.inner.detached.get() {
			warn_log!(
				"[Scope] ignoring {} handler registered after detach",
				handler.event_type()
			);
			return;
		}
		self.inner.handlers.borrow_mut().register(handler);
	}

	/// Subscribes to a payload-less key.
	pub fn on<F>(&self, event_type: EventType, key: &UntypedKey, options: HandlerOptions, callback: F)
	where
		F: Fn(&Dispatch<'_>) + 'static,
	{
		self.register(Handler::new(event_type, key.erase(), options, callback));
	}

	/// Subscribes to a typed key with default options.
	///
	/// The callback receives the payload and the native event, if any.
	pub fn on_message<T, F>(&self, event_type: EventType, key: &TypedKey<T>, callback: F)
	where
		T: 'static,
		F: Fn(&T, Option<&NativeEvent>) + 'static,
	{
		self.on_message_with(event_type, key, HandlerOptions::default(), callback);
	}

	/// Subscribes to a typed key.
	pub fn on_message_with<T, F>(
		&self,
		event_type: EventType,
		key: &TypedKey<T>,
		options: HandlerOptions,
		callback: F,
	) where
		T: 'static,
		F: Fn(&T, Option<&NativeEvent>) + 'static,
	{
		let handler = Handler::new(event_type, key.erase(), options, move |dispatch: &Dispatch<'_>| {
			match dispatch.payload::<T>() {
				Some(payload) => callback(payload, dispatch.native_event()),
				None => warn_log!(
					"[Scope] payload for {} is not a {}",
					dispatch.key().id(),
					std::any::type_name::<T>()
				),
			}
		});
		self.register(handler);
	}

	/// Subscribes to clicks addressed to `key`.
	pub fn on_click<F>(&self, key: &UntypedKey, callback: F)
	where
		F: Fn(Option<&NativeEvent>) + 'static,
	{
		self.on(EventType::Click, key, HandlerOptions::default(), move |d| {
			callback(d.native_event())
		});
	}

	/// Subscribes to a key combination.
	///
	/// Key presses are emitted under [`EventType::KeyDown`]; see
	/// [`Scope::emit_key_press`].
	pub fn on_key_press<F>(&self, press: &KeyPress, callback: F)
	where
		F: Fn(Option<&NativeEvent>) + 'static,
	{
		self.on(EventType::KeyDown, &press.to_key(), HandlerOptions::default(), move |d| {
			callback(d.native_event())
		});
	}

	/// Emits a message carrying `payload` to handlers of `key`.
	///
	/// Returns the number of handlers invoked.
	pub fn emit<T: 'static>(
		&self,
		event_type: EventType,
		key: &TypedKey<T>,
		native: Option<&NativeEvent>,
		payload: T,
		scope: EmitScope,
	) -> usize {
		self.dispatch(&event_type, &key.erase(), native, Some(&payload as &dyn Any), scope)
	}

	/// Emits a payload-less message to handlers of `key`.
	///
	/// Returns the number of handlers invoked.
	pub fn emit_untyped(
		&self,
		event_type: EventType,
		key: &UntypedKey,
		native: Option<&NativeEvent>,
		scope: EmitScope,
	) -> usize {
		self.dispatch(&event_type, &key.erase(), native, None, scope)
	}

	/// Emits a key combination under [`EventType::KeyDown`].
	pub fn emit_key_press(&self, press: &KeyPress, native: Option<&NativeEvent>, scope: EmitScope) -> usize {
		self.emit_untyped(EventType::KeyDown, &press.to_key(), native, scope)
	}

	fn dispatch(
		&self,
		event_type: &EventType,
		key: &Key,
		native: Option<&NativeEvent>,
		payload: Option<&dyn Any>,
		scope: EmitScope,
	) -> usize {
		let dispatch = Dispatch::new(event_type, key, native, payload);
		let mut invoked = 0;
		let mut current = Some(self.clone());

		while let Some(node) = current {
			// Snapshot first: a handler may register more handlers.
			let handlers = node.inner.handlers.borrow().handlers(event_type, key.id());
			for handler in &handlers {
				handler.invoke(&dispatch);
			}
			invoked += handlers.len();

			current = match scope {
				EmitScope::Local => None,
				EmitScope::Bubble => node.parent(),
			};
		}

		debug_log!(
			"[Scope] {} {} -> {} handler(s) ({:?})",
			event_type,
			key.id(),
			invoked,
			scope
		);
		invoked
	}

	/// Event categories this scope has handlers for.
	pub fn event_types(&self) -> HashSet<EventType> {
		self.inner.handlers.borrow().distinct_event_types()
	}

	/// Number of handlers registered on this scope.
	pub fn handler_count(&self) -> usize {
		self.inner.handlers.borrow().len()
	}

	/// Discards every handler and refuses new ones.
	pub fn detach(&self) {
		self.inner.detached.set(true);
		self.inner.handlers.borrow_mut().clear();
	}

	/// Returns true after [`Scope::detach`].
	pub fn is_detached(&self) -> bool {
		self.inner.detached.get()
	}
}

impl Default for Scope {
	fn default() -> Self {
		Self::root()
	}
}

impl fmt::Debug for Scope {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Scope")
			.field("handlers", &self.handler_count())
			.field("has_parent", &self.parent().is_some())
			.field("detached", &self.is_detached())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::key::{Modifier, issue_typed, issue_untyped};
	use rstest::{fixture, rstest};
	use wireform_core::Element;

	#[fixture]
	fn log() -> Rc<RefCell<Vec<String>>> {
		Rc::new(RefCell::new(Vec::new()))
	}

	#[rstest]
	fn test_emit_reaches_handlers_in_order(log: Rc<RefCell<Vec<String>>>) {
		let scope = Scope::root();
		let key = issue_typed::<i32>();
		for label in ["first", "second"] {
			let log = Rc::clone(&log);
			scope.on_message(EventType::Click, &key, move |n, _| {
				log.borrow_mut().push(format!("{label}:{n}"))
			});
		}

		let invoked = scope.emit(EventType::Click, &key, None, 5, EmitScope::Local);

		assert_eq!(invoked, 2);
		assert_eq!(*log.borrow(), vec!["first:5", "second:5"]);
	}

	#[rstest]
	fn test_emit_matches_event_type_and_key() {
		let scope = Scope::root();
		let key = issue_untyped();
		let other = issue_untyped();
		scope.on(EventType::Click, &key, HandlerOptions::default(), |_| {});

		assert_eq!(scope.emit_untyped(EventType::Input, &key, None, EmitScope::Local), 0);
		assert_eq!(scope.emit_untyped(EventType::Click, &other, None, EmitScope::Local), 0);
		assert_eq!(scope.emit_untyped(EventType::Click, &key, None, EmitScope::Local), 1);
	}

	#[rstest]
	fn test_bubble_visits_self_then_ancestors(log: Rc<RefCell<Vec<String>>>) {
		let root = Scope::root();
		let middle = root.child();
		let leaf = middle.child();
		let key = issue_untyped();
		for (name, scope) in [("leaf", &leaf), ("middle", &middle), ("root", &root)] {
			let log = Rc::clone(&log);
			scope.on(EventType::Change, &key, HandlerOptions::default(), move |_| {
				log.borrow_mut().push(name.to_string())
			});
		}

		assert_eq!(leaf.emit_untyped(EventType::Change, &key, None, EmitScope::Bubble), 3);
		assert_eq!(*log.borrow(), vec!["leaf", "middle", "root"]);
	}

	#[rstest]
	fn test_local_does_not_reach_parent() {
		let root = Scope::root();
		let child = root.child();
		let key = issue_untyped();
		root.on(EventType::Change, &key, HandlerOptions::default(), |_| {});

		assert_eq!(child.emit_untyped(EventType::Change, &key, None, EmitScope::Local), 0);
	}

	#[rstest]
	fn test_sibling_scopes_are_isolated() {
		let root = Scope::root();
		let left = root.child();
		let right = root.child();
		let key = issue_untyped();
		right.on(EventType::Click, &key, HandlerOptions::default(), |_| {});

		assert_eq!(left.emit_untyped(EventType::Click, &key, None, EmitScope::Bubble), 0);
	}

	#[rstest]
	fn test_dropped_parent_ends_bubbling() {
		let root = Scope::root();
		let child = root.child();
		drop(root);
		assert!(child.parent().is_none());
		assert_eq!(
			child.emit_untyped(EventType::Click, &issue_untyped(), None, EmitScope::Bubble),
			0
		);
	}

	#[rstest]
	fn test_handler_may_register_during_dispatch() {
		let scope = Scope::root();
		let key = issue_untyped();
		let inner_scope = scope.clone();
		let inner_key = key.clone();
		scope.on(EventType::Click, &key, HandlerOptions::default(), move |_| {
			inner_scope.on(EventType::Click, &inner_key, HandlerOptions::default(), |_| {});
		});

		assert_eq!(scope.emit_untyped(EventType::Click, &key, None, EmitScope::Local), 1);
		assert_eq!(scope.emit_untyped(EventType::Click, &key, None, EmitScope::Local), 2);
	}

	#[rstest]
	fn test_on_click_receives_native_event() {
		let scope = Scope::root();
		let key = issue_untyped();
		let target = Element::new("button");
		let seen = Rc::new(RefCell::new(None));
		let sink = Rc::clone(&seen);
		scope.on_click(&key, move |native| {
			*sink.borrow_mut() = native.map(|e| e.target().tag_name().to_string())
		});

		let native = NativeEvent::new(EventType::Click, target);
		scope.emit_untyped(EventType::Click, &key, Some(&native), EmitScope::Local);

		assert_eq!(seen.borrow().as_deref(), Some("button"));
	}

	#[rstest]
	fn test_key_press_dispatch_ignores_modifier_order() {
		let scope = Scope::root();
		let hits = Rc::new(Cell::new(0));
		let sink = Rc::clone(&hits);
		scope.on_key_press(
			&KeyPress::new("s").with(Modifier::Control).with(Modifier::Shift),
			move |_| sink.set(sink.get() + 1),
		);

		let pressed = KeyPress::from_keyboard("s", false, true, false, true);
		assert_eq!(scope.emit_key_press(&pressed, None, EmitScope::Local), 1);
		assert_eq!(
			scope.emit_key_press(&KeyPress::new("s"), None, EmitScope::Local),
			0
		);
		assert_eq!(hits.get(), 1);
	}

	#[rstest]
	fn test_detach_discards_handlers() {
		let scope = Scope::root();
		let key = issue_untyped();
		scope.on(EventType::Click, &key, HandlerOptions::default(), |_| {});
		assert_eq!(scope.handler_count(), 1);

		scope.detach();
		scope.on(EventType::Click, &key, HandlerOptions::default(), |_| {});

		assert!(scope.is_detached());
		assert_eq!(scope.handler_count(), 0);
		assert_eq!(scope.emit_untyped(EventType::Click, &key, None, EmitScope::Local), 0);
	}

	#[rstest]
	fn test_event_types() {
		let scope = Scope::root();
		scope.on_click(&issue_untyped(), |_| {});
		scope.on_key_press(&KeyPress::new("Escape"), |_| {});

		assert_eq!(
			scope.event_types(),
			HashSet::from([EventType::Click, EventType::KeyDown])
		);
	}
}
