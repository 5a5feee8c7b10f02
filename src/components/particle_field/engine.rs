//! The page-facing particle engine.
//!
//! [`ParticleEngine`] owns a DOM-backed field, the frame loop, and the
//! window subscriptions feeding the resize and theme adapters. All of them
//! share one [`EngineState`] on the browser's single event loop; each
//! callback borrows it for the duration of one update only.
//!
//! A failed mount leaves the engine inert rather than surfacing an error to
//! the page. From JavaScript it is constructed as `new ParticleSystem(id)`.

use std::cell::RefCell;
use std::rc::Rc;

use log::{info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CustomEvent, Document, Element, Event, Window};

use super::animation::{AnimationLoop, elapsed_seconds};
use super::config::EngineConfig;
use super::error::MountError;
use super::events::Subscription;
use super::field::{ParticleField, step_count};
use super::resize::{ResizeAdapter, Viewport};
use super::surface::DomSurface;
use super::theme::{
	THEME_ATTRIBUTE, THEME_CHANGED_EVENT, ThemeChange, ThemeColorAdapter, ThemeMode,
};

/// Everything the frame loop and the listeners mutate.
struct EngineState {
	field: ParticleField<DomSurface>,
	resize: ResizeAdapter,
	theme: ThemeColorAdapter,
}

impl EngineState {
	fn frame(&mut self, now_ms: f64) {
		self.resize.poll(now_ms, &mut self.field);
		self.field.tick(elapsed_seconds(now_ms));
	}
}

/// Resources held by a successfully mounted engine.
struct Mounted {
	state: Rc<RefCell<EngineState>>,
	animation: AnimationLoop,
	subscriptions: Vec<Subscription>,
}

impl Mounted {
	fn new(document: Document, host: Element, config: &EngineConfig) -> Result<Self, MountError> {
		let window = web_sys::window().ok_or(MountError::NoWindow)?;
		let theme = document_theme(&document);

		let state = Rc::new(RefCell::new(EngineState {
			field: ParticleField::new(
				DomSurface::new(document.clone(), host),
				config.initial_count,
				theme,
			),
			resize: ResizeAdapter::new(config.resize_debounce_ms, config.area_per_particle),
			theme: ThemeColorAdapter::new(theme),
		}));

		let state_resize = state.clone();
		let resize = Subscription::listen(window.as_ref(), "resize", move |_: Event| {
			let Some(viewport) = web_sys::window().as_ref().and_then(window_viewport) else {
				return;
			};
			state_resize
				.borrow_mut()
				.resize
				.notify(viewport, js_sys::Date::now());
		})?;

		let (state_theme, document_theme_src) = (state.clone(), document);
		let theme_changed = Subscription::listen(
			window.as_ref(),
			THEME_CHANGED_EVENT,
			move |event: Event| {
				let change = theme_change(&event);
				let fallback = document_theme(&document_theme_src);
				let mut state = state_theme.borrow_mut();
				let EngineState { field, theme, .. } = &mut *state;
				theme.handle(field, change.as_ref(), fallback);
			},
		)?;

		let state_frame = state.clone();
		let animation = AnimationLoop::start(move |now_ms| {
			state_frame.borrow_mut().frame(now_ms);
		})?;

		Ok(Self {
			state,
			animation,
			subscriptions: vec![resize, theme_changed],
		})
	}

	fn teardown(self) {
		self.animation.cancel();
		drop(self.subscriptions);
		let mut state = self.state.borrow_mut();
		state.resize.cancel();
		state.field.destroy();
	}
}

/// Reads the active theme from the document root's `data-theme`.
fn document_theme(document: &Document) -> ThemeMode {
	document
		.document_element()
		.and_then(|root| root.get_attribute(THEME_ATTRIBUTE))
		.map_or(ThemeMode::Light, |name| ThemeMode::from_name(&name))
}

/// Extracts `{ theme }` from a `themeChanged` event's detail.
fn theme_change(event: &Event) -> Option<ThemeChange> {
	let event: &CustomEvent = event.dyn_ref()?;
	let json = js_sys::JSON::stringify(&event.detail()).ok()?.as_string()?;
	ThemeChange::from_json(&json)
}

fn window_viewport(window: &Window) -> Option<Viewport> {
	Some(Viewport::new(
		window.inner_width().ok()?.as_f64()?,
		window.inner_height().ok()?.as_f64()?,
	))
}

/// Handle to a running particle background.
#[wasm_bindgen(js_name = ParticleSystem)]
pub struct ParticleEngine {
	inner: Option<Mounted>,
}

impl ParticleEngine {
	/// Mounts onto the element named by `config.container_id`.
	pub fn mount(config: &EngineConfig) -> Self {
		let host = web_sys::window()
			.ok_or(MountError::NoWindow)
			.and_then(|w| w.document().ok_or(MountError::NoDocument))
			.and_then(|d| {
				d.get_element_by_id(&config.container_id)
					.map(|host| (d, host))
					.ok_or_else(|| MountError::MissingHost(config.container_id.clone()))
			});
		match host {
			Ok((document, host)) => Self::mount_into(document, host, config),
			Err(e) => Self::inert(e),
		}
	}

	/// Mounts onto an element the caller already holds.
	pub fn attach(host: Element, config: &EngineConfig) -> Self {
		match host.owner_document() {
			Some(document) => Self::mount_into(document, host, config),
			None => Self::inert(MountError::NoDocument),
		}
	}

	fn mount_into(document: Document, host: Element, config: &EngineConfig) -> Self {
		match Mounted::new(document, host, config) {
			Ok(mounted) => {
				info!(
					"flux-particles: mounted {} particles",
					mounted.state.borrow().field.len()
				);
				Self {
					inner: Some(mounted),
				}
			}
			Err(e) => Self::inert(e),
		}
	}

	fn inert(reason: MountError) -> Self {
		warn!("flux-particles: particle background disabled: {}", reason);
		Self { inner: None }
	}

	/// Whether the engine is mounted and animating.
	pub fn is_active(&self) -> bool {
		self.inner.is_some()
	}

	fn with_field(&self, f: impl FnOnce(&mut ParticleField<DomSurface>)) {
		if let Some(mounted) = &self.inner {
			f(&mut mounted.state.borrow_mut().field);
		}
	}
}

#[wasm_bindgen(js_class = ParticleSystem)]
impl ParticleEngine {
	/// Mounts onto `#containerId` (default `particles`) with page config.
	#[wasm_bindgen(constructor)]
	pub fn new(container_id: Option<String>) -> ParticleEngine {
		let config = super::config::load_engine_config();
		let config = match container_id {
			Some(id) => config.with_container(id),
			None => config,
		};
		Self::mount(&config)
	}

	/// Resizes the field to `floor(50 * density)` particles.
	#[wasm_bindgen(js_name = setDensity)]
	pub fn set_density(&self, density: f64) {
		self.with_field(|field| field.set_density(density));
	}

	/// Alias of `setDensity`.
	#[wasm_bindgen(js_name = changeDensity)]
	pub fn change_density(&self, density: f64) {
		self.set_density(density);
	}

	/// Adds `count` particles (default 5).
	#[wasm_bindgen(js_name = addParticles)]
	pub fn add_particles(&self, count: Option<f64>) {
		let n = step_count(count);
		self.with_field(|field| field.add_particles(n));
	}

	/// Removes the `count` newest particles (default 5).
	#[wasm_bindgen(js_name = removeParticles)]
	pub fn remove_particles(&self, count: Option<f64>) {
		let n = step_count(count);
		self.with_field(|field| field.remove_particles(n));
	}

	/// Live particle count.
	#[wasm_bindgen(getter)]
	pub fn count(&self) -> usize {
		self.inner
			.as_ref()
			.map_or(0, |mounted| mounted.state.borrow().field.len())
	}

	/// Stops the animation, unsubscribes and clears the host. Idempotent.
	pub fn destroy(&mut self) {
		if let Some(mounted) = self.inner.take() {
			mounted.teardown();
			info!("flux-particles: engine destroyed");
		}
	}
}
