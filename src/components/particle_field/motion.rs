//! Per-frame particle kinematics.
//!
//! Motion is a fixed step per display frame rather than wall-clock scaled:
//! a slow machine sees slower drift, never a jump. Elapsed time only feeds
//! the wave offset, which is applied to the rendered frame and never written
//! back into the particle.

use super::particles::{Particle, WRAP_MAX, WRAP_MIN};

/// Amplitude of the pulse scale around 1.0.
const PULSE_AMPLITUDE: f64 = 0.1;
/// Amplitude of the wave display offset, in percent.
const WAVE_AMPLITUDE: f64 = 0.5;
/// How strongly position shifts the wave phase.
const WAVE_SPATIAL_FREQ: f64 = 0.01;

/// Display attributes for one particle on one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticleFrame {
	/// Horizontal position in percent, wave offset included.
	pub left: f64,
	/// Vertical position in percent, wave offset included.
	pub top: f64,
	/// Degrees.
	pub rotation: f64,
	/// Pulse scale around 1.0.
	pub scale: f64,
}

impl ParticleFrame {
	/// CSS `transform` value, centered on the position.
	pub fn css_transform(&self) -> String {
		format!(
			"translate(-50%, -50%) rotate({:.3}deg) scale({:.4})",
			self.rotation, self.scale
		)
	}

	/// CSS `left` value.
	pub fn css_left(&self) -> String {
		format!("{:.3}%", self.left)
	}

	/// CSS `top` value.
	pub fn css_top(&self) -> String {
		format!("{:.3}%", self.top)
	}
}

/// Wraps a coordinate that left the band back to the opposite edge.
fn wrap(v: f64) -> f64 {
	if v < WRAP_MIN {
		WRAP_MAX
	} else if v > WRAP_MAX {
		WRAP_MIN
	} else {
		v
	}
}

/// Advances `particle` by one tick and returns what to draw for it.
///
/// `elapsed` is seconds since an arbitrary epoch; it is never reset.
pub fn advance(particle: &mut Particle, elapsed: f64) -> ParticleFrame {
	particle.x = wrap(particle.x + particle.vx);
	particle.y = wrap(particle.y + particle.vy);
	particle.rotation += particle.rotation_speed;
	particle.pulse_phase += particle.pulse_speed;

	project(particle, elapsed)
}

/// Computes the display frame for the particle's current state.
pub fn project(particle: &Particle, elapsed: f64) -> ParticleFrame {
	let wave_x = (elapsed + particle.x * WAVE_SPATIAL_FREQ).sin() * WAVE_AMPLITUDE;
	let wave_y = (elapsed + particle.y * WAVE_SPATIAL_FREQ).cos() * WAVE_AMPLITUDE;

	ParticleFrame {
		left: particle.x + wave_x,
		top: particle.y + wave_y,
		rotation: particle.rotation,
		scale: particle.pulse_phase.sin() * PULSE_AMPLITUDE + 1.0,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::particle_field::theme::ThemeMode;
	use rand::SeedableRng;
	use rand::rngs::SmallRng;

	fn still_particle() -> Particle {
		let mut rng = SmallRng::seed_from_u64(1);
		Particle {
			x: 50.0,
			y: 50.0,
			vx: 0.0,
			vy: 0.0,
			rotation: 0.0,
			rotation_speed: 0.0,
			pulse_phase: 0.0,
			pulse_speed: 0.0,
			..Particle::spawn(0, ThemeMode::Light, &mut rng)
		}
	}

	#[test]
	fn test_advance_steps_each_channel() {
		let mut p = Particle {
			vx: 0.05,
			vy: -0.08,
			rotation_speed: 0.2,
			pulse_speed: 0.02,
			..still_particle()
		};
		let frame = advance(&mut p, 0.0);

		assert!((p.x - 50.05).abs() < 1e-12);
		assert!((p.y - 49.92).abs() < 1e-12);
		assert!((p.rotation - 0.2).abs() < 1e-12);
		assert!((p.pulse_phase - 0.02).abs() < 1e-12);
		assert!((frame.scale - (0.02f64.sin() * 0.1 + 1.0)).abs() < 1e-12);
		assert_eq!(frame.rotation, p.rotation);
	}

	#[test]
	fn test_step_ignores_elapsed_time() {
		let mut a = Particle {
			vx: 0.09,
			vy: 0.03,
			..still_particle()
		};
		let mut b = a.clone();
		advance(&mut a, 0.0);
		advance(&mut b, 1.0e6);
		assert_eq!(a.x, b.x);
		assert_eq!(a.y, b.y);
	}

	#[test]
	fn test_wave_is_display_only() {
		let mut p = still_particle();
		let frame = advance(&mut p, 1.3);
		let expected_left = 50.0 + (1.3f64 + 0.5).sin() * 0.5;
		let expected_top = 50.0 + (1.3f64 + 0.5).cos() * 0.5;
		assert!((frame.left - expected_left).abs() < 1e-12);
		assert!((frame.top - expected_top).abs() < 1e-12);
		assert_eq!(p.x, 50.0);
		assert_eq!(p.y, 50.0);
	}

	#[test]
	fn test_wrap_around_both_edges() {
		let mut p = Particle {
			x: -9.95,
			y: 109.95,
			vx: -0.1,
			vy: 0.1,
			..still_particle()
		};
		advance(&mut p, 0.0);
		assert_eq!(p.x, WRAP_MAX);
		assert_eq!(p.y, WRAP_MIN);

		advance(&mut p, 0.0);
		assert!(p.in_bounds());
	}

	#[test]
	fn test_bounds_hold_over_long_runs() {
		let mut rng = SmallRng::seed_from_u64(99);
		let mut particles: Vec<_> = (0..40)
			.map(|id| Particle::spawn(id, ThemeMode::Dark, &mut rng))
			.collect();
		for tick in 0..5_000 {
			let elapsed = tick as f64 / 60.0;
			for p in &mut particles {
				advance(p, elapsed);
				assert!(p.in_bounds(), "particle {} escaped: ({}, {})", p.id, p.x, p.y);
			}
		}
	}

	#[test]
	fn test_scale_stays_near_one() {
		let mut p = Particle {
			pulse_speed: 0.3,
			..still_particle()
		};
		for _ in 0..100 {
			let frame = advance(&mut p, 0.0);
			assert!((0.9..=1.1).contains(&frame.scale));
		}
	}

	#[test]
	fn test_frame_css() {
		let frame = ParticleFrame {
			left: 12.5,
			top: -3.25,
			rotation: 45.0,
			scale: 1.05,
		};
		assert_eq!(
			frame.css_transform(),
			"translate(-50%, -50%) rotate(45.000deg) scale(1.0500)"
		);
		assert_eq!(frame.css_left(), "12.500%");
		assert_eq!(frame.css_top(), "-3.250%");
	}
}
