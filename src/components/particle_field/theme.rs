//! Light/dark theming for the particle field.
//!
//! Provides the two palettes, the per-theme opacity envelope, and the
//! [`ThemeColorAdapter`] that recolors a live field when the page theme flips.

use std::ops::Range;

use log::debug;
use rand::Rng;
use serde::Deserialize;

use super::field::ParticleField;
use super::surface::Surface;

/// Name of the window event the theme manager dispatches on every change.
pub const THEME_CHANGED_EVENT: &str = "themeChanged";

/// Root element attribute holding the active theme name.
pub const THEME_ATTRIBUTE: &str = "data-theme";

/// Opaque RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
	/// Red channel.
	pub r: u8,
	/// Green channel.
	pub g: u8,
	/// Blue channel.
	pub b: u8,
}

impl Color {
	/// Builds a color from its channels.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b }
	}

	/// `#rrggbb` form for CSS.
	pub fn to_css(self) -> String {
		format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
	}
}

const LIGHT_COLORS: [Color; 5] = [
	Color::rgb(0x7c, 0x3a, 0xed), // Violet
	Color::rgb(0xec, 0x48, 0x99), // Pink
	Color::rgb(0x06, 0xb6, 0xd4), // Cyan
	Color::rgb(0x10, 0xb9, 0x81), // Emerald
	Color::rgb(0xf5, 0x9e, 0x0b), // Amber
];

const DARK_COLORS: [Color; 5] = [
	Color::rgb(0xa7, 0x8b, 0xfa), // Soft violet
	Color::rgb(0xf4, 0x72, 0xb6), // Soft pink
	Color::rgb(0x22, 0xd3, 0xee), // Soft cyan
	Color::rgb(0x34, 0xd3, 0x99), // Soft emerald
	Color::rgb(0xfb, 0xbf, 0x24), // Soft amber
];

/// A fixed, ordered set of particle colors.
#[derive(Clone, Copy, Debug)]
pub struct Palette {
	/// Colors in index order.
	pub colors: &'static [Color],
}

impl Palette {
	/// Color for a collection index, cycling through the palette.
	pub fn get(&self, index: usize) -> Color {
		self.colors[index % self.colors.len()]
	}

	/// Whether `color` belongs to this palette.
	pub fn contains(&self, color: Color) -> bool {
		self.colors.contains(&color)
	}

	/// Number of colors.
	pub fn len(&self) -> usize {
		self.colors.len()
	}

	/// Whether the palette has no colors.
	pub fn is_empty(&self) -> bool {
		self.colors.is_empty()
	}

	/// A uniformly random color.
	pub fn pick<R: Rng>(&self, rng: &mut R) -> Color {
		self.colors[rng.gen_range(0..self.colors.len())]
	}
}

/// Page display mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ThemeMode {
	/// Light page background.
	#[default]
	Light,
	/// Dark page background.
	Dark,
}

impl ThemeMode {
	/// Resolves a theme identifier. Unknown names fall back to light.
	pub fn from_name(name: &str) -> Self {
		match name.trim() {
			"dark" => Self::Dark,
			"light" => Self::Light,
			other => {
				debug!("flux-particles: unknown theme {:?}, using light", other);
				Self::Light
			}
		}
	}

	/// Identifier used in events and `data-theme`.
	pub fn name(self) -> &'static str {
		match self {
			Self::Light => "light",
			Self::Dark => "dark",
		}
	}

	/// Particle colors for this theme.
	pub fn palette(self) -> Palette {
		match self {
			Self::Light => Palette {
				colors: &LIGHT_COLORS,
			},
			Self::Dark => Palette {
				colors: &DARK_COLORS,
			},
		}
	}

	/// Base opacity envelope. Dark backgrounds get dimmer particles.
	pub fn opacity_range(self) -> Range<f64> {
		match self {
			Self::Light => 0.05..0.15,
			Self::Dark => 0.02..0.10,
		}
	}
}

/// Payload of a theme change notification: `{ "theme": "dark" }`.
#[derive(Clone, Debug, Deserialize)]
pub struct ThemeChange {
	/// New theme identifier.
	pub theme: String,
}

impl ThemeChange {
	/// Parses the payload. Anything unreadable yields `None`.
	pub fn from_json(json: &str) -> Option<Self> {
		serde_json::from_str(json).ok()
	}

	/// Theme the payload names, light when unknown.
	pub fn mode(&self) -> ThemeMode {
		ThemeMode::from_name(&self.theme)
	}
}

/// Recolors a field in place whenever the page theme changes.
///
/// Colors are assigned by collection index so neighbouring particles cycle
/// through the palette; opacities are redrawn from the new theme's envelope.
/// Geometry and motion are left untouched.
#[derive(Debug, Default)]
pub struct ThemeColorAdapter {
	active: ThemeMode,
}

impl ThemeColorAdapter {
	/// Starts tracking `initial` as the active theme.
	pub fn new(initial: ThemeMode) -> Self {
		Self { active: initial }
	}

	/// Theme last applied.
	pub fn active(&self) -> ThemeMode {
		self.active
	}

	/// Handles a notification. `None` means the payload was unreadable and
	/// `fallback` (usually the document attribute) decides the theme.
	pub fn handle<S: Surface>(
		&mut self,
		field: &mut ParticleField<S>,
		change: Option<&ThemeChange>,
		fallback: ThemeMode,
	) -> ThemeMode {
		let mode = change.map_or(fallback, ThemeChange::mode);
		self.apply(field, mode);
		mode
	}

	/// Recolors `field` for `mode`.
	pub fn apply<S: Surface>(&mut self, field: &mut ParticleField<S>, mode: ThemeMode) {
		self.active = mode;
		let palette = mode.palette();
		let opacity = mode.opacity_range();
		field.recolor_each(mode, |index, particle, rng| {
			particle.color = palette.get(index);
			particle.base_opacity = rng.gen_range(opacity.clone());
		});
		debug!(
			"flux-particles: recolored {} particles for {} theme",
			field.len(),
			mode.name()
		);
	}
}
