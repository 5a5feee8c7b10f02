//! flux-particles: ambient particle background for the Flux downloader pages.
//!
//! This crate provides a WASM particle layer that drifts behind page content,
//! adapts its density to the viewport and follows the page's light/dark theme.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info};

#[cfg(target_arch = "wasm32")]
use getrandom as _;

pub mod components;

pub use components::particle_field::{
	EngineConfig, HeadlessSurface, MountError, ParticleBackground, ParticleEngine, ParticleField,
	ResizeAdapter, Surface, ThemeColorAdapter, ThemeMode, Viewport,
};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("flux-particles: logging initialized");
}

/// Main application component.
/// Mounts the particle layer behind whatever the server rendered.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	view! {
		<Meta name="color-scheme" content="light dark" />
		<ParticleBackground />
	}
}
