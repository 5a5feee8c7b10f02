//! Particle lifecycle and density control.
//!
//! The field is the sole owner of particle state. Every mutation of the
//! collection goes through here so the surface always holds exactly one
//! handle per live particle and `target_count` always matches the collection.

use log::{debug, info};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use super::motion;
use super::particles::Particle;
use super::surface::Surface;
use super::theme::ThemeMode;

/// Fewest particles a field will hold.
pub const MIN_PARTICLES: usize = 10;
/// Most particles a field will hold.
pub const MAX_PARTICLES: usize = 50;
/// Particle count used when nothing else is configured.
pub const DEFAULT_PARTICLES: usize = 30;
/// Step used by add/remove when the caller gives no count.
pub const DEFAULT_STEP: usize = 5;

/// Clamps a requested count into the supported range.
pub fn clamp_count(count: usize) -> usize {
	count.clamp(MIN_PARTICLES, MAX_PARTICLES)
}

/// Converts a caller-supplied add/remove count into a step.
///
/// A missing count means [`DEFAULT_STEP`]. Fractions are floored; negative,
/// NaN and infinite counts step by nothing.
pub fn step_count(requested: Option<f64>) -> usize {
	match requested {
		None => DEFAULT_STEP,
		Some(n) if n.is_finite() && n > 0.0 => n.floor() as usize,
		Some(_) => 0,
	}
}

/// Maps a normalized density onto a particle count.
///
/// Density is clamped to `[0, 1]` and scaled linearly onto `0..=50`, then the
/// result is clamped into the supported count range. Non-finite input
/// yields `None`.
pub fn count_for_density(density: f64) -> Option<usize> {
	if !density.is_finite() {
		return None;
	}
	let raw = (MAX_PARTICLES as f64 * density.clamp(0.0, 1.0)).floor() as usize;
	Some(clamp_count(raw))
}

struct Slot<H> {
	particle: Particle,
	handle: H,
}

/// Owns the live particles and mirrors them onto a [`Surface`].
pub struct ParticleField<S: Surface> {
	surface: S,
	slots: Vec<Slot<S::Handle>>,
	target_count: usize,
	theme: ThemeMode,
	rng: SmallRng,
	next_id: u64,
	destroyed: bool,
}

impl<S: Surface> ParticleField<S> {
	/// Builds a field of `count` particles colored for `theme`.
	pub fn new(surface: S, count: usize, theme: ThemeMode) -> Self {
		Self::with_rng(surface, count, theme, SmallRng::from_entropy())
	}

	/// Like [`ParticleField::new`] with a caller-supplied generator.
	pub fn with_rng(surface: S, count: usize, theme: ThemeMode, rng: SmallRng) -> Self {
		let mut field = Self {
			surface,
			slots: Vec::new(),
			target_count: clamp_count(count),
			theme,
			rng,
			next_id: 0,
			destroyed: false,
		};
		field.initialize(count);
		field
	}

	/// Live particle count.
	pub fn len(&self) -> usize {
		self.slots.len()
	}

	/// Whether no particles are alive.
	pub fn is_empty(&self) -> bool {
		self.slots.is_empty()
	}

	/// Count the field is holding to.
	pub fn target_count(&self) -> usize {
		self.target_count
	}

	/// Theme the particles are colored for.
	pub fn theme(&self) -> ThemeMode {
		self.theme
	}

	/// Whether [`ParticleField::destroy`] has run.
	pub fn is_destroyed(&self) -> bool {
		self.destroyed
	}

	/// The surface particles are drawn onto.
	pub fn surface(&self) -> &S {
		&self.surface
	}

	/// Live particles in creation order.
	pub fn particles(&self) -> impl ExactSizeIterator<Item = &Particle> {
		self.slots.iter().map(|slot| &slot.particle)
	}

	fn spawn(&mut self) {
		let particle = Particle::spawn(self.next_id, self.theme, &mut self.rng);
		self.next_id += 1;
		let handle = self.surface.attach(&particle);
		self.slots.push(Slot { particle, handle });
	}

	fn detach_all(&mut self) {
		for slot in self.slots.drain(..) {
			self.surface.detach(slot.handle);
		}
	}

	/// Replaces the collection with `count` fresh particles.
	///
	/// Colors are assigned by index from the active palette, matching what a
	/// theme change would produce.
	pub fn initialize(&mut self, count: usize) {
		if self.destroyed {
			return;
		}
		self.detach_all();
		self.surface.clear();
		self.target_count = clamp_count(count);
		for _ in 0..self.target_count {
			self.spawn();
		}

		let palette = self.theme.palette();
		let opacity = self.theme.opacity_range();
		self.recolor_each(self.theme, |index, particle, rng| {
			particle.color = palette.get(index);
			particle.base_opacity = rng.gen_range(opacity.clone());
		});
	}

	/// Destroys every particle and builds `count` new ones.
	pub fn rebuild(&mut self, count: usize) {
		if self.destroyed {
			return;
		}
		debug!(
			"flux-particles: rebuilding field {} -> {}",
			self.target_count,
			clamp_count(count)
		);
		self.initialize(count);
	}

	/// Appends up to `n` particles, stopping at the maximum.
	pub fn add_particles(&mut self, n: usize) {
		if self.destroyed {
			return;
		}
		self.target_count = self.target_count.saturating_add(n).min(MAX_PARTICLES);
		while self.slots.len() < self.target_count {
			self.spawn();
		}
	}

	/// Removes up to `n` of the most recently created particles, stopping at
	/// the minimum.
	pub fn remove_particles(&mut self, n: usize) {
		if self.destroyed {
			return;
		}
		self.target_count = self.target_count.saturating_sub(n).max(MIN_PARTICLES);
		while self.slots.len() > self.target_count {
			if let Some(slot) = self.slots.pop() {
				self.surface.detach(slot.handle);
			}
		}
	}

	/// Grows or shrinks the field to match a normalized density in `[0, 1]`.
	pub fn set_density(&mut self, density: f64) {
		if self.destroyed {
			return;
		}
		let Some(target) = count_for_density(density) else {
			debug!("flux-particles: ignoring density {}", density);
			return;
		};
		if target > self.target_count {
			self.add_particles(target - self.target_count);
		} else if target < self.target_count {
			self.remove_particles(self.target_count - target);
		}
	}

	/// Advances every particle one frame and redraws it.
	pub fn tick(&mut self, elapsed: f64) {
		for slot in &mut self.slots {
			let frame = motion::advance(&mut slot.particle, elapsed);
			self.surface.project(&slot.handle, &frame);
		}
	}

	/// Switches the active theme and lets `restyle` rewrite each particle in
	/// index order before the surface is updated.
	pub(crate) fn recolor_each(
		&mut self,
		theme: ThemeMode,
		mut restyle: impl FnMut(usize, &mut Particle, &mut SmallRng),
	) {
		if self.destroyed {
			return;
		}
		self.theme = theme;
		for (index, slot) in self.slots.iter_mut().enumerate() {
			restyle(index, &mut slot.particle, &mut self.rng);
			self.surface.restyle(&slot.handle, &slot.particle);
		}
	}

	/// Releases every particle and the surface contents. Safe to call twice.
	pub fn destroy(&mut self) {
		if self.destroyed {
			return;
		}
		self.detach_all();
		self.surface.clear();
		self.destroyed = true;
		info!("flux-particles: field destroyed");
	}
}

impl<S: Surface> Drop for ParticleField<S> {
	fn drop(&mut self) {
		self.destroy();
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::particle_field::surface::HeadlessSurface;

	fn field(count: usize) -> ParticleField<HeadlessSurface> {
		ParticleField::with_rng(
			HeadlessSurface::new(),
			count,
			ThemeMode::Light,
			SmallRng::seed_from_u64(42),
		)
	}

	fn assert_consistent(field: &ParticleField<HeadlessSurface>) {
		assert_eq!(field.len(), field.target_count());
		assert_eq!(field.surface().attached(), field.len());
		assert!((MIN_PARTICLES..=MAX_PARTICLES).contains(&field.target_count()));
	}

	#[test]
	fn test_new_clamps_count() {
		let f = field(3);
		assert_eq!(f.len(), MIN_PARTICLES);
		assert_consistent(&f);

		let f = field(500);
		assert_eq!(f.len(), MAX_PARTICLES);
		assert_consistent(&f);
	}

	#[test]
	fn test_initialize_colors_by_index() {
		let f = field(12);
		let palette = ThemeMode::Light.palette();
		for (i, p) in f.particles().enumerate() {
			assert_eq!(p.color, palette.get(i));
			assert_eq!(f.surface().style(p.id).map(|s| s.color), Some(palette.get(i)));
		}
	}

	#[test]
	fn test_recolor_restyles_every_element() {
		let mut f = field(15);
		let before = f.surface().restyles();
		f.recolor_each(ThemeMode::Dark, |_, particle, _| {
			particle.base_opacity = 0.07;
		});
		assert_eq!(f.surface().restyles(), before + 15);
		for p in f.particles() {
			assert_eq!(f.surface().style(p.id).map(|s| s.opacity), Some(0.07));
		}
	}

	#[test]
	fn test_add_and_remove() {
		let mut f = field(30);
		f.add_particles(5);
		assert_eq!(f.len(), 35);
		assert_consistent(&f);

		f.add_particles(100);
		assert_eq!(f.len(), MAX_PARTICLES);
		assert_consistent(&f);

		f.remove_particles(15);
		assert_eq!(f.len(), 35);
		assert_consistent(&f);

		f.remove_particles(1000);
		assert_eq!(f.len(), MIN_PARTICLES);
		assert_consistent(&f);
	}

	#[test]
	fn test_remove_takes_newest() {
		let mut f = field(20);
		let ids: Vec<u64> = f.particles().map(|p| p.id).collect();
		f.remove_particles(4);
		let kept: Vec<u64> = f.particles().map(|p| p.id).collect();
		assert_eq!(kept, &ids[..16]);
		for id in &ids[16..] {
			assert!(!f.surface().is_attached(*id));
		}
	}

	#[test]
	fn test_set_density() {
		let mut f = field(30);
		f.set_density(0.2);
		assert_eq!(f.len(), 10);

		f.set_density(0.5);
		assert_eq!(f.len(), 25);

		f.set_density(1.0);
		assert_eq!(f.len(), 50);

		f.set_density(0.0);
		assert_eq!(f.len(), MIN_PARTICLES);

		f.set_density(7.5);
		assert_eq!(f.len(), MAX_PARTICLES);

		f.set_density(f64::NAN);
		assert_eq!(f.len(), MAX_PARTICLES);
		assert_consistent(&f);
	}

	#[test]
	fn test_step_count() {
		assert_eq!(step_count(None), DEFAULT_STEP);
		assert_eq!(step_count(Some(3.0)), 3);
		assert_eq!(step_count(Some(2.9)), 2);
		assert_eq!(step_count(Some(0.4)), 0);
		assert_eq!(step_count(Some(-1.0)), 0);
		assert_eq!(step_count(Some(-2.0)), 0);
		assert_eq!(step_count(Some(f64::NAN)), 0);
		assert_eq!(step_count(Some(f64::INFINITY)), 0);
	}

	#[test]
	fn test_negative_steps_leave_field_alone() {
		let mut f = field(30);
		f.add_particles(step_count(Some(-1.0)));
		assert_eq!(f.len(), 30);
		f.remove_particles(step_count(Some(-2.0)));
		assert_eq!(f.len(), 30);
		assert_consistent(&f);
	}

	#[test]
	fn test_count_for_density() {
		assert_eq!(count_for_density(0.2), Some(10));
		assert_eq!(count_for_density(0.37), Some(18));
		assert_eq!(count_for_density(0.1), Some(MIN_PARTICLES));
		assert_eq!(count_for_density(-3.0), Some(MIN_PARTICLES));
		assert_eq!(count_for_density(f64::INFINITY), None);
	}

	#[test]
	fn test_rebuild_replaces_identities() {
		let mut f = field(30);
		let before: Vec<u64> = f.particles().map(|p| p.id).collect();
		f.rebuild(48);
		assert_eq!(f.len(), 48);
		assert_consistent(&f);
		assert!(f.particles().all(|p| !before.contains(&p.id)));
	}

	#[test]
	fn test_tick_projects_every_particle() {
		let mut f = field(15);
		for frame in 0..10 {
			f.tick(frame as f64 * 0.016);
		}
		assert_eq!(f.surface().projections(), 150);
		for p in f.particles() {
			assert!(p.in_bounds());
			assert!(f.surface().last_frame(p.id).is_some());
		}
	}

	#[test]
	fn test_destroy_is_idempotent() {
		let mut f = field(30);
		f.destroy();
		assert!(f.is_empty());
		assert_eq!(f.surface().attached(), 0);
		let clears = f.surface().clears();

		f.destroy();
		assert!(f.is_empty());
		assert_eq!(f.surface().clears(), clears);
	}

	#[test]
	fn test_destroyed_field_ignores_calls() {
		let mut f = field(30);
		f.destroy();
		f.add_particles(5);
		f.set_density(1.0);
		f.rebuild(20);
		f.tick(1.0);
		assert!(f.is_empty());
		assert_eq!(f.surface().attached(), 0);
	}
}
