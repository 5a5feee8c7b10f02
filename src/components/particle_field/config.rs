//! Engine configuration embedded in the page.
//!
//! Pages may ship a `<script id="particle-config" type="application/json">`
//! element to tune the field; anything left out keeps its default.

use log::{info, warn};
use serde::Deserialize;
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

use super::field::{DEFAULT_PARTICLES, clamp_count};
use super::resize::{AREA_PER_PARTICLE, RESIZE_DEBOUNCE_MS};

/// Element id of the optional JSON config script.
pub const CONFIG_ELEMENT_ID: &str = "particle-config";

/// Tunables for a [`ParticleEngine`](super::engine::ParticleEngine).
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
	/// Id of the element particles are mounted into.
	pub container_id: String,
	/// Particle count before the first resize settles.
	pub initial_count: usize,
	/// Quiet period after the last resize event.
	pub resize_debounce_ms: f64,
	/// Viewport area that earns one particle.
	pub area_per_particle: f64,
}

impl Default for EngineConfig {
	fn default() -> Self {
		Self {
			container_id: "particles".to_string(),
			initial_count: DEFAULT_PARTICLES,
			resize_debounce_ms: RESIZE_DEBOUNCE_MS,
			area_per_particle: AREA_PER_PARTICLE,
		}
	}
}

impl EngineConfig {
	/// Parses a JSON config, clamping the initial count into range.
	pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
		let mut config: Self = serde_json::from_str(json)?;
		config.initial_count = clamp_count(config.initial_count);
		Ok(config)
	}

	/// Same config, mounted into `#container_id`.
	pub fn with_container(mut self, container_id: impl Into<String>) -> Self {
		self.container_id = container_id.into();
		self
	}
}

fn config_text() -> Option<String> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id(CONFIG_ELEMENT_ID)?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	script.text().ok()
}

/// Loads the page config, falling back to defaults.
pub fn load_engine_config() -> EngineConfig {
	let Some(json_text) = config_text() else {
		return EngineConfig::default();
	};

	match EngineConfig::from_json(&json_text) {
		Ok(config) => {
			info!(
				"flux-particles: loaded config for #{} ({} particles)",
				config.container_id, config.initial_count
			);
			config
		}
		Err(e) => {
			warn!("flux-particles: failed to parse particle config: {}", e);
			EngineConfig::default()
		}
	}
}
