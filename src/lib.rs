//! # sitefx - Frame-Driven Visual Effects
//!
//! The visual-effects layer of a marketing site, rebuilt as a set of
//! independent, frame-driven components: a pointer-reactive particle
//! field, a plasma shader background, scroll-triggered reveals, a
//! page-transition overlay, click sparks, and a typewriter heading.
//!
//! ## Quick Start
//!
//! ```ignore
//! use sitefx::prelude::*;
//!
//! fn main() -> Result<(), StageError> {
//!     Stage::new()
//!         .with_title("Open Source Club")
//!         .with_plasma(PlasmaConfig::default())
//!         .with_particle_field(FieldConfig {
//!             count: 400,
//!             color: "#A8F0FF".into(),
//!             ..FieldConfig::default()
//!         })
//!         .with_click_spark(SparkConfig::default())
//!         .run()
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Frame scheduling
//!
//! Components never schedule themselves. Each registers one callback
//! with the [`scheduler::FrameScheduler`] and the stage pumps the
//! scheduler once per redraw with a [`scheduler::FrameTick`] and a
//! read-only [`scheduler::FrameInput`] captured at the start of the
//! frame. Tests drive the same callbacks with virtual time.
//!
//! ### Independence
//!
//! Components do not communicate and do not share mutable state. The
//! pointer is a broadcast value: written by the event loop, read by
//! components as per-frame snapshots. A component that fails to
//! initialize (no GPU, shader mismatch) is logged and left inert without
//! touching its neighbors.
//!
//! ### Validated uniforms
//!
//! Shader-backed components declare their uniform block as a
//! [`uniforms::UniformTable`] that is checked against the WGSL source at
//! construction, so a renamed or mistyped uniform fails at init instead
//! of silently no-opping per frame.
//!
//! ## Component Overview
//!
//! | Component | Input | Output |
//! |-----------|-------|--------|
//! | [`field::ParticleField`] | pointer, clock | instance buffer |
//! | [`plasma::PlasmaBackground`] | pointer, clock | uniform buffer |
//! | [`reveal::RevealObserver`] | intersection events | revealed flags |
//! | [`overlay::TransitionOverlay`] | link activations, clock | opacity, deferred navigation |
//! | [`spark::ClickSpark`] | clicks, clock | line segments |
//! | [`typewriter::Typewriter`] | clock | visible text |

pub mod color;
pub mod error;
pub mod field;
pub mod gpu;
pub mod overlay;
pub mod plasma;
pub mod pointer;
pub mod reveal;
pub mod scheduler;
pub mod spark;
pub mod stage;
pub mod time;
pub mod typewriter;
pub mod uniforms;

pub use bytemuck;
pub use glam::{Vec2, Vec3};

pub use error::{GpuError, ShaderError, StageError};
pub use field::{FieldConfig, ParticleField, ParticleInstance};
pub use overlay::{InterceptDecision, OverlayConfig, OverlayState, TransitionOverlay};
pub use plasma::{PlasmaBackground, PlasmaConfig};
pub use reveal::{RevealObserver, RevealOptions, RevealStyle};
pub use scheduler::{CallbackId, FrameInput, FrameScheduler, FrameTick};
pub use spark::{ClickSpark, Easing, SparkConfig};
pub use stage::Stage;
pub use typewriter::{Typewriter, TypewriterConfig};
pub use uniforms::{UniformTable, UniformType};

/// Convenient re-exports for common usage.
///
/// # Usage
///
/// ```ignore
/// use sitefx::prelude::*;
/// ```
pub mod prelude {
    pub use crate::color::hex_to_rgb;
    pub use crate::error::{GpuError, ShaderError, StageError};
    pub use crate::field::{FieldConfig, ParticleField};
    pub use crate::overlay::{InterceptDecision, OverlayConfig, OverlayState, TransitionOverlay};
    pub use crate::plasma::{PlasmaBackground, PlasmaConfig};
    pub use crate::pointer::{PointerSnapshot, PointerTracker};
    pub use crate::reveal::{RevealObserver, RevealOptions, RevealStyle};
    pub use crate::scheduler::{FrameInput, FrameScheduler, FrameTick};
    pub use crate::spark::{ClickSpark, Easing, SparkConfig};
    pub use crate::stage::Stage;
    pub use crate::time::FrameClock;
    pub use crate::typewriter::{Typewriter, TypewriterConfig};
    pub use crate::uniforms::{UniformTable, UniformType};
    pub use crate::{Vec2, Vec3};
}
