//! Core library for the scene compiler.
//!
//! Takes loosely specified physics scene documents (bodies, joints, world
//! constants) written by a user or a language model and compiles them into
//! the fully elaborated scene graph a browser-side physics engine consumes:
//! derived densities, resolved pulley geometry and defaulted world settings.

pub mod body;
pub mod compiler;
pub mod config;
pub mod error;
pub mod export;
pub mod geometry;
pub mod joint;
pub mod presets;
pub mod scene;

pub use body::{elaborate_body, DensityRule};
pub use compiler::{compile_scene, PlanckEnvelope, PlanckScene, SceneCompiler};
pub use config::{AppConfig, CompilerConfig};
pub use error::{Result, SceneError};
pub use export::inject_scene;
pub use geometry::{Shape, Size, Vec2};
pub use joint::{CompiledJoint, Joint, PulleyJoint, PulleySpec};
pub use presets::PulleySystem;
pub use scene::{Body, BodyType, SceneDocument};
