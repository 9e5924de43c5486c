use std::f64::consts::PI;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::Result;

/// Planar point or vector in world units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance between two points.
    pub fn distance(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Box extents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const UNIT: Self = Self {
        width: 1.0,
        height: 1.0,
    };

    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn area(self) -> f64 {
        self.width * self.height
    }
}

impl From<Vec2> for Value {
    fn from(value: Vec2) -> Self {
        json!({"x": value.x, "y": value.y})
    }
}

impl From<Size> for Value {
    fn from(value: Size) -> Self {
        json!({"width": value.width, "height": value.height})
    }
}

/// Collision shape of a body. Unrecognised names are kept as written so they
/// reach the renderer untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Shape {
    Box,
    Circle,
    Other(String),
}

impl Shape {
    pub fn as_str(&self) -> &str {
        match self {
            Shape::Box => "box",
            Shape::Circle => "circle",
            Shape::Other(name) => name,
        }
    }
}

impl From<String> for Shape {
    fn from(value: String) -> Self {
        match value.as_str() {
            "box" => Shape::Box,
            "circle" => Shape::Circle,
            _ => Shape::Other(value),
        }
    }
}

impl From<Shape> for String {
    fn from(value: Shape) -> Self {
        match value {
            Shape::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

/// Planar area used for density derivation.
///
/// Boxes without `size` count as 1×1 and circles without `radius` as radius
/// 1. Unknown or missing shapes get a placeholder area of 1. The dimension
/// readers are only invoked for the shape that needs them.
pub fn planar_area(
    shape: Option<&Shape>,
    size: impl FnOnce() -> Result<Option<Size>>,
    radius: impl FnOnce() -> Result<Option<f64>>,
) -> Result<f64> {
    let area = match shape {
        Some(Shape::Box) => size()?.unwrap_or(Size::UNIT).area(),
        Some(Shape::Circle) => {
            let radius = radius()?.unwrap_or(1.0);
            PI * radius * radius
        }
        Some(Shape::Other(_)) | None => 1.0,
    };
    Ok(area)
}
