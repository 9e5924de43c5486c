use std::collections::HashMap;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::{geometry::Vec2, scene::Body, Result, SceneError};

/// Type tag of the only joint kind the compiler computes parameters for.
pub const PULLEY_JOINT: &str = "PulleyJoint";

/// Read-only id → body table shared by every joint in one compile call.
pub type BodyIndex<'a> = HashMap<&'a str, &'a Body>;

/// Joint as written in the input document.
#[derive(Debug, Clone, PartialEq)]
pub enum Joint {
    Pulley(PulleySpec),
    /// Any other joint kind. Forwarded to the output without inspection.
    Opaque(Map<String, Value>),
}

impl Joint {
    /// Classifies a raw joint record by its `type` tag.
    fn classify(fields: Map<String, Value>) -> serde_json::Result<Self> {
        match fields.get("type").and_then(Value::as_str) {
            Some(PULLEY_JOINT) => PulleySpec::deserialize(Value::Object(fields)).map(Joint::Pulley),
            _ => Ok(Joint::Opaque(fields)),
        }
    }
}

impl<'de> Deserialize<'de> for Joint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let fields = Map::<String, Value>::deserialize(deserializer)?;
        Joint::classify(fields).map_err(de::Error::custom)
    }
}

impl Serialize for Joint {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Joint::Pulley(spec) => Tagged {
                kind: PULLEY_JOINT,
                body: spec,
            }
            .serialize(serializer),
            Joint::Opaque(fields) => fields.serialize(serializer),
        }
    }
}

/// Minimal pulley description: two bodies hanging from one anchor point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PulleySpec {
    pub object_a_id: String,
    pub object_b_id: String,
    pub pulley_anchor_pos: Vec2,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ratio: Option<f64>,
}

impl PulleySpec {
    pub fn new(
        object_a_id: impl Into<String>,
        object_b_id: impl Into<String>,
        anchor: Vec2,
    ) -> Self {
        Self {
            object_a_id: object_a_id.into(),
            object_b_id: object_b_id.into(),
            pulley_anchor_pos: anchor,
            ratio: None,
        }
    }

    pub fn with_ratio(mut self, ratio: f64) -> Self {
        self.ratio = Some(ratio);
        self
    }
}

/// Fully parameterised pulley as consumed by the renderer.
///
/// Both ground anchors are the single shared pulley point and the rope is
/// attached at each body's origin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PulleyJoint {
    pub object_a_id: String,
    pub object_b_id: String,
    pub ground_anchor_a: Vec2,
    pub ground_anchor_b: Vec2,
    pub local_anchor_a: Vec2,
    pub local_anchor_b: Vec2,
    pub length_a: f64,
    pub length_b: f64,
    pub ratio: f64,
}

/// Joint as emitted in the compiled scene.
#[derive(Debug, Clone, PartialEq)]
pub enum CompiledJoint {
    Pulley(PulleyJoint),
    Opaque(Map<String, Value>),
}

impl Serialize for CompiledJoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            CompiledJoint::Pulley(joint) => Tagged {
                kind: PULLEY_JOINT,
                body: joint,
            }
            .serialize(serializer),
            CompiledJoint::Opaque(fields) => fields.serialize(serializer),
        }
    }
}

#[derive(Serialize)]
struct Tagged<'a, T> {
    #[serde(rename = "type")]
    kind: &'static str,
    #[serde(flatten)]
    body: &'a T,
}

/// Expands a pulley description into the renderer's joint parameters.
///
/// Rope lengths are the distances from each body's position to the anchor at
/// compile time. Both ids must be present in `bodies`; otherwise the error
/// names every id that could not be found.
pub fn resolve_pulley(
    spec: &PulleySpec,
    bodies: &BodyIndex<'_>,
    default_ratio: f64,
) -> Result<PulleyJoint> {
    let mut missing = Vec::new();
    for id in [&spec.object_a_id, &spec.object_b_id] {
        if !bodies.contains_key(id.as_str()) && !missing.contains(id) {
            missing.push(id.clone());
        }
    }
    if !missing.is_empty() {
        return Err(SceneError::MissingObject {
            joint: PULLEY_JOINT.to_string(),
            ids: missing,
        });
    }

    let anchor = spec.pulley_anchor_pos;
    let length_a = body_position(bodies, &spec.object_a_id)?.distance(anchor);
    let length_b = body_position(bodies, &spec.object_b_id)?.distance(anchor);

    tracing::trace!(
        object_a = %spec.object_a_id,
        object_b = %spec.object_b_id,
        length_a,
        length_b,
        "resolved pulley joint"
    );

    Ok(PulleyJoint {
        object_a_id: spec.object_a_id.clone(),
        object_b_id: spec.object_b_id.clone(),
        ground_anchor_a: anchor,
        ground_anchor_b: anchor,
        local_anchor_a: Vec2::ZERO,
        local_anchor_b: Vec2::ZERO,
        length_a,
        length_b,
        ratio: spec.ratio.unwrap_or(default_ratio),
    })
}

fn body_position(bodies: &BodyIndex<'_>, id: &str) -> Result<Vec2> {
    let position = match bodies.get(id) {
        Some(body) => body.position()?,
        None => None,
    };
    position.ok_or_else(|| SceneError::missing_field(format!("object `{id}`"), "position"))
}
