//! Data stores behind a form binding
//!
//! A binding either writes through to component state ([`StateCell`], whose
//! subscribers re-render the component) or keeps its own detached copy.
//! Both sit behind [`DataStore`], so the engine does not care which.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

type Subscriber<T> = Rc<dyn Fn(&T)>;

struct StateInner<T> {
	value: RefCell<T>,
	subscribers: RefCell<Vec<(u64, Subscriber<T>)>>,
	next_subscriber: Cell<u64>,
	version: Cell<u64>,
}

/// Shared, observable component state.
///
/// Cloning yields another handle to the same value.
pub struct StateCell<T: 'static> {
	inner: Rc<StateInner<T>>,
}

impl<T: 'static> Clone for StateCell<T> {
	fn clone(&self) -> Self {
		Self {
			inner: Rc::clone(&self.inner),
		}
	}
}

impl<T: 'static> StateCell<T> {
	/// Creates a cell holding `value`.
	pub fn new(value: T) -> Self {
		Self {
			inner: Rc::new(StateInner {
				value: RefCell::new(value),
				subscribers: RefCell::new(Vec::new()),
				next_subscriber: Cell::new(0),
				version: Cell::new(0),
			}),
		}
	}

	/// Returns a copy of the current value.
	pub fn get(&self) -> T
	where
		T: Clone,
	{
		self.inner.value.borrow().clone()
	}

	/// Reads the value without cloning it.
	pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
		f(&self.inner.value.borrow())
	}

	/// Replaces the value and notifies subscribers.
	///
	/// Subscribers may write back to the cell; each write notifies again.
	pub fn set(&self, value: T)
	where
		T: Clone,
	{
		*self.inner.value.borrow_mut() = value;
		self.notify();
	}

	/// Mutates the value in place and notifies subscribers once.
	pub fn update(&self, f: impl FnOnce(&mut T))
	where
		T: Clone,
	{
		f(&mut self.inner.value.borrow_mut());
		self.notify();
	}

	/// Registers a callback run after every change.
	///
	/// The callback stays registered while the returned handle is alive.
	pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription<T> {
		let id = self.inner.next_subscriber.get();
		self.inner.next_subscriber.set(id + 1);
		self.inner
			.subscribers
			.borrow_mut()
			.push((id, Rc::new(callback)));
		Subscription {
			state: Rc::downgrade(&self.inner),
			id,
		}
	}

	/// Number of changes so far.
	pub fn version(&self) -> u64 {
		self.inner.version.get()
	}

	fn notify(&self)
	where
		T: Clone,
	{
		self.inner.version.set(self.inner.version.get() + 1);
		let subscribers: Vec<Subscriber<T>> = self
			.inner
			.subscribers
			.borrow()
			.iter()
			.map(|(_, s)| Rc::clone(s))
			.collect();
		let value = self.get();
		for subscriber in subscribers {
			subscriber(&value);
		}
	}
}

impl<T: fmt::Debug + 'static> fmt::Debug for StateCell<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("StateCell")
			.field("value", &*self.inner.value.borrow())
			.field("version", &self.inner.version.get())
			.finish()
	}
}

/// Keeps a [`StateCell`] subscription alive; dropping it unsubscribes.
#[must_use = "dropping the subscription unsubscribes immediately"]
pub struct Subscription<T> {
	state: Weak<StateInner<T>>,
	id: u64,
}

impl<T> Drop for Subscription<T> {
	fn drop(&mut self) {
		if let Some(state) = self.state.upgrade() {
			state.subscribers.borrow_mut().retain(|(id, _)| *id != self.id);
		}
	}
}

/// Where a binding reads its snapshot from and merges serialized data into.
pub trait DataStore<T> {
	/// Returns a copy of the current data.
	fn snapshot(&self) -> T;

	/// Replaces the current data.
	fn merge(&self, next: T);
}

/// Store writing through to component state.
pub struct ComponentState<T: 'static> {
	cell: StateCell<T>,
}

impl<T: 'static> ComponentState<T> {
	/// Wraps a state cell.
	pub fn new(cell: StateCell<T>) -> Self {
		Self { cell }
	}

	/// The wrapped cell.
	pub fn cell(&self) -> &StateCell<T> {
		&self.cell
	}
}

impl<T: Clone + 'static> DataStore<T> for ComponentState<T> {
	fn snapshot(&self) -> T {
		self.cell.get()
	}

	fn merge(&self, next: T) {
		self.cell.set(next);
	}
}

/// Store owning its own copy of the data.
pub struct DetachedData<T> {
	data: RefCell<T>,
}

impl<T> DetachedData<T> {
	/// Creates a store holding `data`.
	pub fn new(data: T) -> Self {
		Self {
			data: RefCell::new(data),
		}
	}
}

impl<T: Clone> DataStore<T> for DetachedData<T> {
	fn snapshot(&self) -> T {
		self.data.borrow().clone()
	}

	fn merge(&self, next: T) {
		*self.data.borrow_mut() = next;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_state_cell_set_and_update() {
		let cell = StateCell::new(1);
		cell.set(2);
		cell.update(|n| *n *= 10);
		assert_eq!(cell.get(), 20);
		assert_eq!(cell.version(), 2);
	}

	#[rstest]
	fn test_subscribers_see_new_value() {
		let cell = StateCell::new(String::new());
		let seen = Rc::new(RefCell::new(Vec::new()));
		let sink = Rc::clone(&seen);
		let _sub = cell.subscribe(move |v: &String| sink.borrow_mut().push(v.clone()));

		cell.set("a".into());
		cell.update(|s| s.push('b'));

		assert_eq!(*seen.borrow(), vec!["a", "ab"]);
	}

	#[rstest]
	fn test_dropping_subscription_unsubscribes() {
		let cell = StateCell::new(0);
		let hits = Rc::new(Cell::new(0));
		let sink = Rc::clone(&hits);
		let sub = cell.subscribe(move |_| sink.set(sink.get() + 1));

		cell.set(1);
		drop(sub);
		cell.set(2);

		assert_eq!(hits.get(), 1);
	}

	#[rstest]
	fn test_subscriber_may_write_back() {
		let cell = StateCell::new(0);
		let writer = cell.clone();
		let seen = Rc::new(RefCell::new(Vec::new()));
		let sink = Rc::clone(&seen);
		let _clamp = cell.subscribe(move |v: &i32| {
			sink.borrow_mut().push(*v);
			if *v > 10 {
				writer.set(10);
			}
		});

		cell.set(20);

		assert_eq!(cell.get(), 10);
		assert_eq!(cell.version(), 2);
		assert_eq!(*seen.borrow(), vec![20, 10]);
	}

	#[rstest]
	fn test_update_from_subscriber() {
		let cell = StateCell::new(String::from("a"));
		let writer = cell.clone();
		let _normalize = cell.subscribe(move |v: &String| {
			if v.chars().any(|c| c.is_uppercase()) {
				writer.update(|s| *s = s.to_lowercase());
			}
		});

		cell.set("MiXed".into());

		assert_eq!(cell.get(), "mixed");
	}

	#[rstest]
	fn test_clones_share_value() {
		let a = StateCell::new(vec![1]);
		let b = a.clone();
		b.update(|v| v.push(2));
		assert_eq!(a.with(|v| v.len()), 2);
	}

	#[rstest]
	fn test_component_state_merge_notifies() {
		let cell = StateCell::new(0);
		let hits = Rc::new(Cell::new(0));
		let sink = Rc::clone(&hits);
		let _sub = cell.subscribe(move |_| sink.set(sink.get() + 1));

		let store = ComponentState::new(cell.clone());
		store.merge(5);

		assert_eq!(store.snapshot(), 5);
		assert_eq!(cell.get(), 5);
		assert_eq!(hits.get(), 1);
	}

	#[rstest]
	fn test_detached_data() {
		let store = DetachedData::new("x".to_string());
		store.merge("y".to_string());
		assert_eq!(store.snapshot(), "y");
	}
}
