//! Mount-time failures.
//!
//! None of these reach the page: the engine logs them and stays inert.

use thiserror::Error;

/// Why an engine could not attach to the page.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MountError {
	/// Not running in a browser window.
	#[error("no global window")]
	NoWindow,
	/// The window or host element has no document.
	#[error("window has no document")]
	NoDocument,
	/// No element with the configured id.
	#[error("host element #{0} not found")]
	MissingHost(String),
	/// `addEventListener` threw.
	#[error("could not subscribe to `{0}` events")]
	Subscribe(&'static str),
	/// `requestAnimationFrame` threw.
	#[error("could not schedule an animation frame")]
	AnimationFrame,
}
