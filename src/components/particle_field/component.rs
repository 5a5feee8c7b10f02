//! Leptos component hosting the particle background.
//!
//! Renders the host `<div>` and, once it is in the document, mounts a
//! [`ParticleEngine`] onto it. The engine lives as long as the component's
//! effect closure.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use web_sys::Element;

use super::config::load_engine_config;
use super::engine::ParticleEngine;

/// Full-bleed decorative particle layer.
///
/// Sits behind page content; `pointer-events: none` keeps it out of the way
/// of forms and buttons. The host id defaults to the configured
/// `container_id` so page CSS targeting `#particles` keeps working.
#[component]
pub fn ParticleBackground(
	/// Host element id, overriding the configured one.
	#[prop(optional, into)]
	id: Option<String>,
) -> impl IntoView {
	let config = load_engine_config();
	let config = match id {
		Some(id) => config.with_container(id),
		None => config,
	};
	let host_id = config.container_id.clone();

	let host_ref = NodeRef::<leptos::html::Div>::new();
	let engine: Rc<RefCell<Option<ParticleEngine>>> = Rc::new(RefCell::new(None));

	Effect::new(move |_| {
		let Some(host) = host_ref.get() else {
			return;
		};
		let mut engine = engine.borrow_mut();
		if engine.is_none() {
			let host: Element = host.into();
			*engine = Some(ParticleEngine::attach(host, &config));
		}
	});

	view! {
		<div
			node_ref=host_ref
			id=host_id
			class="particles"
			aria-hidden="true"
			style="position: fixed; inset: 0; overflow: hidden; pointer-events: none; z-index: 0;"
		/>
	}
}
