//! Ambient particle background.
//!
//! Fills a host element with slowly drifting, pulsing, blurred blobs:
//! - Per-frame drift, rotation, pulsation and a wave offset, wrapping
//!   toroidally at the container edges
//! - Density that follows the viewport area, debounced on resize
//! - In-place recoloring when the page switches between light and dark
//!
//! # Example
//!
//! ```ignore
//! use flux_particles::{EngineConfig, ParticleEngine};
//!
//! let mut engine = ParticleEngine::mount(&EngineConfig::default());
//! engine.set_density(0.6);
//! engine.destroy();
//! ```
//!
//! Off the browser the same field runs against a [`HeadlessSurface`]:
//!
//! ```ignore
//! let mut field = ParticleField::new(HeadlessSurface::new(), 30, ThemeMode::Light);
//! field.tick(0.016);
//! ```

mod animation;
mod component;
pub mod config;
mod engine;
mod error;
mod events;
pub mod field;
pub mod motion;
pub mod particles;
pub mod resize;
pub mod surface;
pub mod theme;

pub use animation::AnimationLoop;
pub use component::ParticleBackground;
pub use config::EngineConfig;
pub use engine::ParticleEngine;
pub use error::MountError;
pub use field::ParticleField;
pub use motion::{ParticleFrame, advance};
pub use particles::{Particle, ShapeRadius};
pub use resize::{ResizeAdapter, Viewport};
pub use surface::{DomSurface, HeadlessSurface, Styled, Surface};
pub use theme::{Color, Palette, ThemeChange, ThemeColorAdapter, ThemeMode};
