//! DOM event subscriptions that unsubscribe themselves.

use wasm_bindgen::prelude::*;
use web_sys::{Event, EventTarget};

use super::error::MountError;

/// A live event listener. Dropping it removes the listener.
pub struct Subscription {
	target: EventTarget,
	event: &'static str,
	callback: Closure<dyn FnMut(Event)>,
}

impl Subscription {
	/// Adds `handler` as a listener for `event` on `target`.
	pub fn listen(
		target: &EventTarget,
		event: &'static str,
		handler: impl FnMut(Event) + 'static,
	) -> Result<Self, MountError> {
		let callback = Closure::<dyn FnMut(Event)>::new(handler);
		target
			.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
			.map_err(|_| MountError::Subscribe(event))?;
		Ok(Self {
			target: target.clone(),
			event,
			callback,
		})
	}
}

impl Drop for Subscription {
	fn drop(&mut self) {
		let _ = self
			.target
			.remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref());
	}
}
