use serde::Serialize;
use serde_json::{json, Value};

use crate::{
    body::elaborate_body,
    config::CompilerConfig,
    geometry::Vec2,
    joint::{resolve_pulley, BodyIndex, CompiledJoint, Joint},
    scene::{Body, SceneDocument},
    Result,
};

/// Fully elaborated scene handed to the browser-side physics engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanckScene {
    /// The document's `world`, copied as written, or the default world.
    pub world: Value,
    pub objects: Vec<Body>,
    pub joints: Vec<CompiledJoint>,
}

/// Single-key wrapper the caller receives on success.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanckEnvelope {
    pub planck_scene: PlanckScene,
}

impl PlanckEnvelope {
    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let text = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(text)
    }
}

/// Turns loosely specified scene documents into renderer-ready scenes.
///
/// Compilation is pure: every call builds its own lookup table and output
/// lists, so one compiler can be shared freely between threads.
#[derive(Debug, Clone, Default)]
pub struct SceneCompiler {
    config: CompilerConfig,
}

impl SceneCompiler {
    pub fn new(config: CompilerConfig) -> Self {
        Self { config }
    }

    /// World used when the document does not carry one: gravity pointing
    /// down -y with the configured magnitude.
    pub fn default_world(&self) -> Value {
        json!({"gravity": Value::from(Vec2::new(0.0, -self.config.gravity))})
    }

    /// Compiles an untyped JSON document. Missing keys and wrongly typed
    /// values are reported as errors rather than panics.
    pub fn compile_value(&self, value: &Value) -> Result<PlanckEnvelope> {
        let document = SceneDocument::from_value(value)?;
        self.compile(&document)
    }

    pub fn compile_str(&self, source: &str) -> Result<PlanckEnvelope> {
        let document = SceneDocument::from_json_str(source)?;
        self.compile(&document)
    }

    /// Compiles a typed document. Any failure voids the whole call.
    pub fn compile(&self, document: &SceneDocument) -> Result<PlanckEnvelope> {
        let world = document
            .world
            .clone()
            .unwrap_or_else(|| self.default_world());

        let index = build_index(&document.objects)?;

        let objects = document
            .objects
            .iter()
            .map(|body| elaborate_body(body, &self.config))
            .collect::<Result<Vec<_>>>()?;

        let joints = document
            .joints
            .iter()
            .map(|joint| self.compile_joint(joint, &index))
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(
            objects = objects.len(),
            joints = joints.len(),
            "compiled scene"
        );

        Ok(PlanckEnvelope {
            planck_scene: PlanckScene {
                world,
                objects,
                joints,
            },
        })
    }

    fn compile_joint(&self, joint: &Joint, index: &BodyIndex<'_>) -> Result<CompiledJoint> {
        match joint {
            Joint::Pulley(spec) => resolve_pulley(spec, index, self.config.default_pulley_ratio)
                .map(CompiledJoint::Pulley),
            Joint::Opaque(fields) => Ok(CompiledJoint::Opaque(fields.clone())),
        }
    }
}

/// Compiles `value` with the default configuration.
pub fn compile_scene(value: &Value) -> Result<PlanckEnvelope> {
    SceneCompiler::default().compile_value(value)
}

// Built from the input records: elaboration never moves a body, so joint
// geometry sees the caller's positions exactly as given.
fn build_index(bodies: &[Body]) -> Result<BodyIndex<'_>> {
    let mut index = BodyIndex::with_capacity(bodies.len());
    for body in bodies {
        let id = body.id()?;
        if index.insert(id, body).is_some() {
            tracing::warn!(id, "duplicate object id, later definition wins");
        }
    }
    Ok(index)
}
