//! Ambient particle state.

use std::f64::consts::TAU;

use rand::Rng;

use super::theme::{Color, ThemeMode};

/// Lower edge of the wrap-around band, in percent of the container.
pub const WRAP_MIN: f64 = -10.0;
/// Upper edge of the wrap-around band, in percent of the container.
pub const WRAP_MAX: f64 = 110.0;

/// Corner-radius preset giving each particle its blob shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShapeRadius {
	/// `50%`
	Circle,
	/// `30%`
	Rounded,
	/// `10% 50%`
	LeafWide,
	/// `50% 10%`
	LeafTall,
}

impl ShapeRadius {
	/// Every preset, in spawn-table order.
	pub const ALL: [ShapeRadius; 4] = [
		ShapeRadius::Circle,
		ShapeRadius::Rounded,
		ShapeRadius::LeafWide,
		ShapeRadius::LeafTall,
	];

	/// Value for CSS `border-radius`.
	pub fn to_css(self) -> &'static str {
		match self {
			ShapeRadius::Circle => "50%",
			ShapeRadius::Rounded => "30%",
			ShapeRadius::LeafWide => "10% 50%",
			ShapeRadius::LeafTall => "50% 10%",
		}
	}
}

/// A single floating particle.
///
/// Positions are percentages of the host container so the field survives
/// container resizes without rescaling.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
	/// Field-unique identity, never reused.
	pub id: u64,
	/// Horizontal position in percent.
	pub x: f64,
	/// Vertical position in percent.
	pub y: f64,
	/// Horizontal step per frame.
	pub vx: f64,
	/// Vertical step per frame.
	pub vy: f64,
	/// Diameter in CSS pixels.
	pub size: f64,
	/// Member of the active palette.
	pub color: Color,
	/// Opacity from the active theme's envelope.
	pub base_opacity: f64,
	/// Degrees.
	pub rotation: f64,
	/// Degrees per frame.
	pub rotation_speed: f64,
	/// Radians, drives the breathing scale.
	pub pulse_phase: f64,
	/// Radians per frame.
	pub pulse_speed: f64,
	/// Corner-radius preset.
	pub shape: ShapeRadius,
	/// Blur radius in CSS pixels.
	pub blur: f64,
}

impl Particle {
	/// Creates a particle with every field randomized for `theme`.
	pub fn spawn<R: Rng>(id: u64, theme: ThemeMode, rng: &mut R) -> Self {
		Self {
			id,
			x: rng.gen_range(0.0..100.0),
			y: rng.gen_range(0.0..100.0),
			vx: rng.gen_range(-0.1..0.1),
			vy: rng.gen_range(-0.1..0.1),
			size: rng.gen_range(10.0..50.0),
			color: theme.palette().pick(rng),
			base_opacity: rng.gen_range(theme.opacity_range()),
			rotation: rng.gen_range(0.0..360.0),
			rotation_speed: rng.gen_range(-0.25..0.25),
			pulse_phase: rng.gen_range(0.0..TAU),
			pulse_speed: rng.gen_range(0.01..0.03),
			shape: ShapeRadius::ALL[rng.gen_range(0..ShapeRadius::ALL.len())],
			blur: rng.gen_range(5.0..15.0),
		}
	}

	/// Whether the position lies inside the wrap band.
	pub fn in_bounds(&self) -> bool {
		(WRAP_MIN..=WRAP_MAX).contains(&self.x) && (WRAP_MIN..=WRAP_MAX).contains(&self.y)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::SeedableRng;
	use rand::rngs::SmallRng;

	#[test]
	fn test_spawn_respects_ranges() {
		let mut rng = SmallRng::seed_from_u64(7);
		for id in 0..500 {
			let p = Particle::spawn(id, ThemeMode::Light, &mut rng);
			assert_eq!(p.id, id);
			assert!((0.0..100.0).contains(&p.x) && (0.0..100.0).contains(&p.y));
			assert!((-0.1..0.1).contains(&p.vx) && (-0.1..0.1).contains(&p.vy));
			assert!((10.0..50.0).contains(&p.size));
			assert!((0.05..0.15).contains(&p.base_opacity));
			assert!((-0.25..0.25).contains(&p.rotation_speed));
			assert!((0.01..0.03).contains(&p.pulse_speed));
			assert!((5.0..15.0).contains(&p.blur));
			assert!(ThemeMode::Light.palette().contains(p.color));
			assert!(p.in_bounds());
		}
	}

	#[test]
	fn test_spawn_dark_uses_dim_envelope() {
		let mut rng = SmallRng::seed_from_u64(11);
		for id in 0..200 {
			let p = Particle::spawn(id, ThemeMode::Dark, &mut rng);
			assert!((0.02..0.10).contains(&p.base_opacity));
			assert!(ThemeMode::Dark.palette().contains(p.color));
		}
	}

	#[test]
	fn test_shape_css() {
		let css: Vec<_> = ShapeRadius::ALL.iter().map(|s| s.to_css()).collect();
		assert_eq!(css, ["50%", "30%", "10% 50%", "50% 10%"]);
	}
}
