//! Viewport-driven density control.
//!
//! Resize notifications are debounced on the trailing edge: each one records
//! the latest viewport and pushes the deadline out again, so only the size
//! the window settles at is acted on. The adapter holds no timer of its own;
//! the frame loop polls it with the current clock.

use log::debug;

use super::field::ParticleField;
use super::surface::Surface;

/// Quiet period after the last resize before the field reacts.
pub const RESIZE_DEBOUNCE_MS: f64 = 100.0;
/// Viewport area, in square CSS pixels, that earns one particle.
pub const AREA_PER_PARTICLE: f64 = 20_000.0;
/// Fewest particles a resize will settle on.
pub const RESIZE_MIN_PARTICLES: usize = 20;
/// Most particles a resize will settle on.
pub const RESIZE_MAX_PARTICLES: usize = 50;

/// Inner size of the browser window in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
	/// `innerWidth`.
	pub width: f64,
	/// `innerHeight`.
	pub height: f64,
}

impl Viewport {
	/// Viewport of the given size.
	pub fn new(width: f64, height: f64) -> Self {
		Self { width, height }
	}

	/// Particle count this viewport calls for.
	pub fn target_count(&self, area_per_particle: f64) -> usize {
		// NaN and negative areas saturate to 0, infinities to usize::MAX.
		let raw = (self.width * self.height / area_per_particle).floor() as usize;
		raw.clamp(RESIZE_MIN_PARTICLES, RESIZE_MAX_PARTICLES)
	}
}

#[derive(Clone, Copy, Debug)]
struct PendingResize {
	viewport: Viewport,
	deadline_ms: f64,
}

/// Debounced resize handling for a [`ParticleField`].
#[derive(Debug)]
pub struct ResizeAdapter {
	debounce_ms: f64,
	area_per_particle: f64,
	pending: Option<PendingResize>,
}

impl Default for ResizeAdapter {
	fn default() -> Self {
		Self::new(RESIZE_DEBOUNCE_MS, AREA_PER_PARTICLE)
	}
}

impl ResizeAdapter {
	/// Adapter with a custom quiet period and density. Invalid values
	/// fall back to the defaults.
	pub fn new(debounce_ms: f64, area_per_particle: f64) -> Self {
		Self {
			debounce_ms: debounce_ms.max(0.0),
			area_per_particle: if area_per_particle > 0.0 {
				area_per_particle
			} else {
				AREA_PER_PARTICLE
			},
			pending: None,
		}
	}

	/// Whether a resize is waiting out its quiet period.
	pub fn is_pending(&self) -> bool {
		self.pending.is_some()
	}

	/// Records a resize at `now_ms`, restarting the quiet period.
	pub fn notify(&mut self, viewport: Viewport, now_ms: f64) {
		self.pending = Some(PendingResize {
			viewport,
			deadline_ms: now_ms + self.debounce_ms,
		});
	}

	/// Drops any resize still waiting out its quiet period.
	pub fn cancel(&mut self) {
		self.pending = None;
	}

	/// Acts on a settled resize. Returns the new count when the field was
	/// rebuilt.
	pub fn poll<S: Surface>(&mut self, now_ms: f64, field: &mut ParticleField<S>) -> Option<usize> {
		let pending = self.pending?;
		if now_ms < pending.deadline_ms {
			return None;
		}
		self.pending = None;

		let count = pending.viewport.target_count(self.area_per_particle);
		if count == field.target_count() {
			return None;
		}
		debug!(
			"flux-particles: viewport {}x{} settled, {} particles",
			pending.viewport.width, pending.viewport.height, count
		);
		field.rebuild(count);
		Some(count)
	}
}
