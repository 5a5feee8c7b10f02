//! The `requestAnimationFrame` driver.
//!
//! The loop reschedules itself after every frame until cancelled. It keeps
//! a reference to its own closure, so cancellation must drop that closure to
//! break the cycle; [`AnimationLoop`] does this on `cancel` and on drop.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use log::warn;
use wasm_bindgen::prelude::*;

use super::error::MountError;

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// Converts the wall clock into the seconds fed to the motion model.
pub fn elapsed_seconds(now_ms: f64) -> f64 {
	now_ms * 0.001
}

/// A cancellable, self-rescheduling frame task.
pub struct AnimationLoop {
	callback: FrameCallback,
	request_id: Rc<Cell<Option<i32>>>,
	running: Rc<Cell<bool>>,
}

impl AnimationLoop {
	/// Starts calling `on_frame` with `Date.now()` once per display frame.
	pub fn start(mut on_frame: impl FnMut(f64) + 'static) -> Result<Self, MountError> {
		let window = web_sys::window().ok_or(MountError::NoWindow)?;
		let callback: FrameCallback = Rc::new(RefCell::new(None));
		let request_id = Rc::new(Cell::new(None));
		let running = Rc::new(Cell::new(true));

		let (callback_inner, request_inner, running_inner) =
			(callback.clone(), request_id.clone(), running.clone());
		*callback.borrow_mut() = Some(Closure::new(move || {
			request_inner.set(None);
			if !running_inner.get() {
				return;
			}
			on_frame(js_sys::Date::now());
			if !running_inner.get() {
				return;
			}
			let Some(window) = web_sys::window() else {
				return;
			};
			if let Some(ref cb) = *callback_inner.borrow() {
				match window.request_animation_frame(cb.as_ref().unchecked_ref()) {
					Ok(id) => request_inner.set(Some(id)),
					Err(_) => warn!("flux-particles: failed to schedule next frame"),
				}
			}
		}));

		if let Some(ref cb) = *callback.borrow() {
			let id = window
				.request_animation_frame(cb.as_ref().unchecked_ref())
				.map_err(|_| MountError::AnimationFrame)?;
			request_id.set(Some(id));
		}

		Ok(Self {
			callback,
			request_id,
			running,
		})
	}

	/// Stops the loop and releases its closure. Safe to call twice.
	pub fn cancel(&self) {
		self.running.set(false);
		if let Some(id) = self.request_id.take() {
			if let Some(window) = web_sys::window() {
				let _ = window.cancel_animation_frame(id);
			}
		}
		self.callback.borrow_mut().take();
	}
}

impl Drop for AnimationLoop {
	fn drop(&mut self) {
		self.cancel();
	}
}
