//! Local task spawning for change handlers.
//!
//! In the browser tasks go to the microtask queue through
//! `wasm_bindgen_futures`. Elsewhere they are queued on a thread-local
//! [`LocalPool`](futures::executor::LocalPool) that the host drives with
//! [`run_until_stalled`].

use std::future::Future;

#[cfg(target_arch = "wasm32")]
/// Spawns a `!Send` future on the browser event loop.
pub fn spawn_local<F>(future: F)
where
	F: Future<Output = ()> + 'static,
{
	wasm_bindgen_futures::spawn_local(future);
}

#[cfg(target_arch = "wasm32")]
/// No-op in the browser, where the event loop drives spawned tasks.
pub fn run_until_stalled() {}

#[cfg(not(target_arch = "wasm32"))]
mod native {
	use futures::executor::{LocalPool, LocalSpawner};
	use futures::task::LocalSpawnExt;
	use std::cell::RefCell;
	use std::future::Future;
	use wireform_core::{error_log, warn_log};

	thread_local! {
		static POOL: RefCell<LocalPool> = RefCell::new(LocalPool::new());
		static SPAWNER: LocalSpawner = POOL.with(|pool| pool.borrow().spawner());
	}

	pub fn spawn_local<F>(future: F)
	where
		F: Future<Output = ()> + 'static,
	{
		SPAWNER.with(|spawner| {
			if let Err(err) = spawner.spawn_local(future) {
				error_log!("[spawn] failed to queue task: {}", err);
			}
		});
	}

	pub fn run_until_stalled() {
		// The spawner must exist before the pool is borrowed for running.
		SPAWNER.with(|_| ());
		POOL.with(|pool| match pool.try_borrow_mut() {
			Ok(mut pool) => pool.run_until_stalled(),
			Err(_) => warn_log!("[spawn] run_until_stalled called from inside a task"),
		});
	}
}

#[cfg(not(target_arch = "wasm32"))]
/// Queues a `!Send` future on this thread's local pool.
pub fn spawn_local<F>(future: F)
where
	F: Future<Output = ()> + 'static,
{
	native::spawn_local(future);
}

#[cfg(not(target_arch = "wasm32"))]
/// Runs queued tasks on this thread until none can make progress.
pub fn run_until_stalled() {
	native::run_until_stalled();
}
