//! Logging abstraction layer for wireform
//!
//! These macros work across WASM and native targets. In the browser they write
//! straight to the console; natively they are forwarded to [`tracing`] so the
//! host application's subscriber decides what is kept.
//!
//! ## Macro Overview
//!
//! | Macro | Condition | WASM | Non-WASM |
//! |-------|-----------|------|----------|
//! | `debug_log!` | `debug-dispatch` + `debug_assertions` | `console.debug` | `tracing::debug!` |
//! | `info_log!` | `debug_assertions` on WASM, always natively | `console.info` | `tracing::info!` |
//! | `warn_log!` | `debug_assertions` on WASM, always natively | `console.warn` | `tracing::warn!` |
//! | `error_log!` | `debug_assertions` on WASM, always natively | `console.error` | `tracing::error!` |
//!
//! ## Example
//!
//! ```ignore
//! use wireform_core::{debug_log, error_log};
//!
//! debug_log!("dispatching {} to {} handlers", event_type, count);
//! error_log!("serialize failed: {}", err);
//! ```

/// Logs a debug message (requires `debug-dispatch` feature + `debug_assertions`)
#[macro_export]
#[cfg(all(debug_assertions, feature = "debug-dispatch", target_arch = "wasm32"))]
macro_rules! debug_log {
	($($arg:tt)*) => {{
		$crate::__web_sys::console::debug_1(&format!($($arg)*).into());
	}};
}

/// Logs a debug message (requires `debug-dispatch` feature + `debug_assertions`)
#[macro_export]
#[cfg(all(
	debug_assertions,
	feature = "debug-dispatch",
	not(target_arch = "wasm32")
))]
macro_rules! debug_log {
	($($arg:tt)*) => {{
		$crate::__tracing::debug!($($arg)*);
	}};
}

/// No-op debug_log when conditions are not met
#[macro_export]
#[cfg(not(all(debug_assertions, feature = "debug-dispatch")))]
macro_rules! debug_log {
	($($arg:tt)*) => {{}};
}

/// Logs an info message
///
/// # Example
///
/// ```ignore
/// info_log!("form {} mounted", instance_id);
/// ```
#[macro_export]
#[cfg(all(debug_assertions, target_arch = "wasm32"))]
macro_rules! info_log {
	($($arg:tt)*) => {{
		$crate::__web_sys::console::info_1(&format!($($arg)*).into());
	}};
}

/// Logs an info message
#[macro_export]
#[cfg(not(target_arch = "wasm32"))]
macro_rules! info_log {
	($($arg:tt)*) => {{
		$crate::__tracing::info!($($arg)*);
	}};
}

/// No-op info_log in WASM release builds
#[macro_export]
#[cfg(all(not(debug_assertions), target_arch = "wasm32"))]
macro_rules! info_log {
	($($arg:tt)*) => {{}};
}

/// Logs a warning message
#[macro_export]
#[cfg(all(debug_assertions, target_arch = "wasm32"))]
macro_rules! warn_log {
	($($arg:tt)*) => {{
		$crate::__web_sys::console::warn_1(&format!($($arg)*).into());
	}};
}

/// Logs a warning message
#[macro_export]
#[cfg(not(target_arch = "wasm32"))]
macro_rules! warn_log {
	($($arg:tt)*) => {{
		$crate::__tracing::warn!($($arg)*);
	}};
}

/// No-op warn_log in WASM release builds
#[macro_export]
#[cfg(all(not(debug_assertions), target_arch = "wasm32"))]
macro_rules! warn_log {
	($($arg:tt)*) => {{}};
}

/// Logs an error message
///
/// # Example
///
/// ```ignore
/// error_log!("change handler failed: {}", err);
/// ```
#[macro_export]
#[cfg(all(debug_assertions, target_arch = "wasm32"))]
macro_rules! error_log {
	($($arg:tt)*) => {{
		$crate::__web_sys::console::error_1(&format!($($arg)*).into());
	}};
}

/// Logs an error message
#[macro_export]
#[cfg(not(target_arch = "wasm32"))]
macro_rules! error_log {
	($($arg:tt)*) => {{
		$crate::__tracing::error!($($arg)*);
	}};
}

/// No-op error_log in WASM release builds
#[macro_export]
#[cfg(all(not(debug_assertions), target_arch = "wasm32"))]
macro_rules! error_log {
	($($arg:tt)*) => {{}};
}

#[cfg(test)]
mod tests {
	use rstest::rstest;
	use crate::{debug_log, error_log, info_log, warn_log};

	#[rstest]
	fn test_logging_macros_compile() {
		debug_log!("Debug message: {}", 42);
		info_log!("Info message: {}", "test");
		warn_log!("Warning message: {:?}", vec![1, 2, 3]);
		error_log!("Error message: {}", "error");
	}

	#[rstest]
	fn test_logging_macros_no_args() {
		debug_log!("Simple debug");
		info_log!("Simple info");
		warn_log!("Simple warning");
		error_log!("Simple error");
	}
}
