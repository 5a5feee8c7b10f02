//! Rendering surfaces that particles are projected onto.
//!
//! The field owns particle state; a surface only mirrors it. [`DomSurface`]
//! keeps one absolutely positioned `<div>` per particle inside the host
//! element, [`HeadlessSurface`] records the same calls in memory.

use std::collections::HashMap;

use web_sys::{Document, Element, HtmlElement};
use wasm_bindgen::JsCast;

use super::motion::ParticleFrame;
use super::particles::Particle;
use super::theme::Color;

/// A mounting point that holds one visual handle per live particle.
pub trait Surface {
	/// Per-particle visual element.
	type Handle;

	/// Creates the visual element for a freshly spawned particle.
	fn attach(&mut self, particle: &Particle) -> Self::Handle;

	/// Applies one frame of motion to a particle's element.
	fn project(&mut self, handle: &Self::Handle, frame: &ParticleFrame);

	/// Re-applies color and opacity after a theme change.
	fn restyle(&mut self, handle: &Self::Handle, particle: &Particle);

	/// Removes a single particle's element.
	fn detach(&mut self, handle: Self::Handle);

	/// Removes everything from the mounting point.
	fn clear(&mut self);
}

/// Color and opacity a surface is showing for one particle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Styled {
	/// Fill color.
	pub color: Color,
	/// Element opacity.
	pub opacity: f64,
}

impl Styled {
	fn of(particle: &Particle) -> Self {
		Self {
			color: particle.color,
			opacity: particle.base_opacity,
		}
	}
}

#[derive(Clone, Copy, Debug)]
struct Drawn {
	style: Styled,
	frame: Option<ParticleFrame>,
}

/// In-memory surface. Tracks what a real surface would be showing.
#[derive(Debug, Default)]
pub struct HeadlessSurface {
	drawn: HashMap<u64, Drawn>,
	projections: u64,
	restyles: u64,
	clears: u32,
}

impl HeadlessSurface {
	/// An empty surface.
	pub fn new() -> Self {
		Self::default()
	}

	/// Number of attached handles.
	pub fn attached(&self) -> usize {
		self.drawn.len()
	}

	/// Whether a particle still has an element.
	pub fn is_attached(&self, id: u64) -> bool {
		self.drawn.contains_key(&id)
	}

	/// Last frame drawn for a particle, if it has been drawn at all.
	pub fn last_frame(&self, id: u64) -> Option<ParticleFrame> {
		self.drawn.get(&id).and_then(|drawn| drawn.frame)
	}

	/// Color and opacity currently shown for a particle.
	pub fn style(&self, id: u64) -> Option<Styled> {
		self.drawn.get(&id).map(|drawn| drawn.style)
	}

	/// Total number of restyles since creation.
	pub fn restyles(&self) -> u64 {
		self.restyles
	}

	/// Total number of per-particle projections since creation.
	pub fn projections(&self) -> u64 {
		self.projections
	}

	/// Number of times the surface was wiped.
	pub fn clears(&self) -> u32 {
		self.clears
	}
}

impl Surface for HeadlessSurface {
	type Handle = u64;

	fn attach(&mut self, particle: &Particle) -> u64 {
		self.drawn.insert(
			particle.id,
			Drawn {
				style: Styled::of(particle),
				frame: None,
			},
		);
		particle.id
	}

	fn project(&mut self, handle: &u64, frame: &ParticleFrame) {
		if let Some(drawn) = self.drawn.get_mut(handle) {
			drawn.frame = Some(*frame);
			self.projections += 1;
		}
	}

	fn restyle(&mut self, handle: &u64, particle: &Particle) {
		if let Some(drawn) = self.drawn.get_mut(handle) {
			drawn.style = Styled::of(particle);
			self.restyles += 1;
		}
	}

	fn detach(&mut self, handle: u64) {
		self.drawn.remove(&handle);
	}

	fn clear(&mut self) {
		self.drawn.clear();
		self.clears += 1;
	}
}

/// Surface backed by `<div class="particle">` children of a host element.
pub struct DomSurface {
	document: Document,
	host: Element,
}

impl DomSurface {
	/// Draws particles as children of `host`.
	pub fn new(document: Document, host: Element) -> Self {
		Self { document, host }
	}

	fn initial_css(particle: &Particle) -> String {
		format!(
			"width: {size}px; height: {size}px; background: {color}; opacity: {opacity}; \
			 left: {x}%; top: {y}%; border-radius: {radius}; filter: blur({blur}px);",
			size = particle.size,
			color = particle.color.to_css(),
			opacity = particle.base_opacity,
			x = particle.x,
			y = particle.y,
			radius = particle.shape.to_css(),
			blur = particle.blur,
		)
	}
}

impl Surface for DomSurface {
	type Handle = Option<HtmlElement>;

	fn attach(&mut self, particle: &Particle) -> Option<HtmlElement> {
		let element: HtmlElement = self.document.create_element("div").ok()?.dyn_into().ok()?;
		element.set_class_name("particle");
		element.style().set_css_text(&Self::initial_css(particle));
		self.host.append_child(&element).ok()?;
		Some(element)
	}

	fn project(&mut self, handle: &Option<HtmlElement>, frame: &ParticleFrame) {
		let Some(element) = handle else {
			return;
		};
		let style = element.style();
		let _ = style.set_property("transform", &frame.css_transform());
		let _ = style.set_property("left", &frame.css_left());
		let _ = style.set_property("top", &frame.css_top());
	}

	fn restyle(&mut self, handle: &Option<HtmlElement>, particle: &Particle) {
		let Some(element) = handle else {
			return;
		};
		let style = element.style();
		let _ = style.set_property("background", &particle.color.to_css());
		let _ = style.set_property("opacity", &particle.base_opacity.to_string());
	}

	fn detach(&mut self, handle: Option<HtmlElement>) {
		if let Some(element) = handle {
			element.remove();
		}
	}

	fn clear(&mut self) {
		self.host.set_inner_html("");
	}
}
