use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    geometry::{Shape, Size, Vec2},
    joint::Joint,
    Result, SceneError,
};

/// Kinematic class of a body. Unrecognised names are preserved verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BodyType {
    Static,
    Kinematic,
    Dynamic,
    Other(String),
}

impl BodyType {
    pub fn as_str(&self) -> &str {
        match self {
            BodyType::Static => "static",
            BodyType::Kinematic => "kinematic",
            BodyType::Dynamic => "dynamic",
            BodyType::Other(name) => name,
        }
    }
}

impl From<String> for BodyType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "static" => BodyType::Static,
            "kinematic" => BodyType::Kinematic,
            "dynamic" => BodyType::Dynamic,
            _ => BodyType::Other(value),
        }
    }
}

impl From<BodyType> for String {
    fn from(value: BodyType) -> Self {
        match value {
            BodyType::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

/// One physical entity in the scene.
///
/// The record is kept exactly as the caller wrote it. Typed views such as
/// [`Body::position`] parse a single field on demand, so a malformed field
/// only fails a compile call when the compiler actually computes with it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Body {
    fields: Map<String, Value>,
}

impl Body {
    pub fn new(id: impl Into<String>, body_type: BodyType, shape: Shape, position: Vec2) -> Self {
        let id: String = id.into();
        Self::default()
            .with_field("id", id)
            .with_field("type", String::from(body_type))
            .with_field("shape", String::from(shape))
            .with_field("position", position)
    }

    pub fn with_size(self, size: Size) -> Self {
        self.with_field("size", size)
    }

    pub fn with_radius(self, radius: f64) -> Self {
        self.with_field("radius", radius)
    }

    pub fn with_angle(self, angle: f64) -> Self {
        self.with_field("angle", angle)
    }

    pub fn with_mass(self, mass: f64) -> Self {
        self.with_field("mass", mass)
    }

    pub fn with_density(self, density: f64) -> Self {
        self.with_field("density", density)
    }

    /// Sets any field, such as `friction` or `linearVelocity`.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.fields.shift_remove(key)
    }

    pub(crate) fn set_density(&mut self, density: f64) {
        self.fields.insert("density".to_string(), density.into());
    }

    /// The body's id. Required: it keys the lookup table joints resolve
    /// against.
    pub fn id(&self) -> Result<&str> {
        match self.fields.get("id") {
            Some(Value::String(id)) => Ok(id.as_str()),
            Some(other) => Err(SceneError::InvalidField {
                context: "object".to_string(),
                field: "id",
                source: serde::de::Error::custom(format!("expected a string, found {other}")),
            }),
            None => Err(SceneError::missing_field("object", "id")),
        }
    }

    pub fn body_type(&self) -> Option<BodyType> {
        self.fields
            .get("type")
            .and_then(Value::as_str)
            .map(|name| BodyType::from(name.to_string()))
    }

    pub fn is_dynamic(&self) -> bool {
        self.body_type() == Some(BodyType::Dynamic)
    }

    /// Shape name, when it is a string. Anything else counts as no shape.
    pub fn shape(&self) -> Option<Shape> {
        self.fields
            .get("shape")
            .and_then(Value::as_str)
            .map(|name| Shape::from(name.to_string()))
    }

    pub fn position(&self) -> Result<Option<Vec2>> {
        self.typed_field("position")
    }

    pub fn size(&self) -> Result<Option<Size>> {
        self.typed_field("size")
    }

    pub fn radius(&self) -> Result<Option<f64>> {
        self.typed_field("radius")
    }

    pub fn mass(&self) -> Result<Option<f64>> {
        self.typed_field("mass")
    }

    pub fn density(&self) -> Result<Option<f64>> {
        self.typed_field("density")
    }

    fn typed_field<T: DeserializeOwned>(&self, field: &'static str) -> Result<Option<T>> {
        let Some(value) = self.fields.get(field) else {
            return Ok(None);
        };
        T::deserialize(value)
            .map(Some)
            .map_err(|source| SceneError::InvalidField {
                context: self.describe(),
                field,
                source,
            })
    }

    fn describe(&self) -> String {
        match self.fields.get("id").and_then(Value::as_str) {
            Some(id) => format!("object `{id}`"),
            None => "object".to_string(),
        }
    }
}

/// High-level scene description as authored by a user or a language model.
///
/// `world` is kept as raw JSON: it is either forwarded untouched or replaced
/// by the compiler's default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub world: Option<Value>,
    #[serde(default)]
    pub objects: Vec<Body>,
    #[serde(default)]
    pub joints: Vec<Joint>,
}

impl SceneDocument {
    pub fn from_value(value: &Value) -> Result<Self> {
        Ok(Self::deserialize(value)?)
    }

    pub fn from_json_str(source: &str) -> Result<Self> {
        Ok(serde_json::from_str(source)?)
    }

    /// Cheap structural check used to tell scene documents apart from other
    /// JSON payloads: an object carrying both `world` and `objects`.
    pub fn looks_like_scene(value: &Value) -> bool {
        value
            .as_object()
            .map(|map| map.contains_key("world") && map.contains_key("objects"))
            .unwrap_or(false)
    }
}
