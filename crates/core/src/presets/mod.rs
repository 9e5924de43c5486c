//! Ready-made scene documents for the canned scenarios the assistant offers:
//! a ball in free fall, a projectile launch and rope-and-pulley systems.
//!
//! Builders only assemble [`SceneDocument`]s. Derived fields such as rope
//! lengths are left to the [`SceneCompiler`](crate::SceneCompiler), and the
//! world is left unset so the compiler's configured gravity applies.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
    geometry::{Shape, Size, Vec2},
    joint::{Joint, PulleySpec},
    scene::{Body, BodyType, SceneDocument},
    Result, SceneError,
};

const GROUND_ID: &str = "ground";
const GROUND_POSITION: Vec2 = Vec2::new(25.0, 1.0);
const GROUND_SIZE: Size = Size::new(100.0, 1.0);
const BALL_ID: &str = "ball_1";
const BALL_RADIUS: f64 = 1.0;
const PROJECTILE_LAUNCH_X: f64 = 2.0;
const BLOCK_SIZE: Size = Size::new(2.0, 2.0);
const PULLEY_RADIUS: f64 = 0.1;
const DEFAULT_FRICTION: f64 = 0.3;

/// A ball released from rest `height` units above the ground.
pub fn free_fall(height: f64) -> Result<SceneDocument> {
    require_non_negative(height, "height")?;

    let ball = Body::new(
        BALL_ID,
        BodyType::Dynamic,
        Shape::Circle,
        Vec2::new(GROUND_POSITION.x, height + 1.0),
    )
    .with_radius(BALL_RADIUS);

    Ok(SceneDocument {
        world: None,
        objects: vec![ground(), ball],
        joints: Vec::new(),
    })
}

/// A ball launched at `speed` and `angle_deg` above the horizontal from
/// `height` units above the ground.
///
/// The launch velocity is written both as `initial_velocity` and as the
/// renderer's `linearVelocity`.
pub fn projectile(speed: f64, angle_deg: f64, height: f64) -> Result<SceneDocument> {
    require_non_negative(speed, "speed")?;
    require_finite(angle_deg, "angle")?;
    require_non_negative(height, "height")?;

    let angle = angle_deg.to_radians();
    let velocity = json!({"x": speed * angle.cos(), "y": speed * angle.sin()});
    let ball = Body::new(
        BALL_ID,
        BodyType::Dynamic,
        Shape::Circle,
        Vec2::new(PROJECTILE_LAUNCH_X, height + 2.0),
    )
    .with_radius(BALL_RADIUS)
    .with_field("initial_velocity", velocity.clone())
    .with_field("linearVelocity", velocity);

    Ok(SceneDocument {
        world: None,
        objects: vec![ground(), ball],
        joints: Vec::new(),
    })
}

fn ground() -> Body {
    Body::new(GROUND_ID, BodyType::Static, Shape::Box, GROUND_POSITION).with_size(GROUND_SIZE)
}

/// Static box the blocks can land on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Surface {
    pub id: String,
    pub position: Vec2,
    pub size: Size,
    #[serde(default)]
    pub angle: f64,
}

/// Fixed pulley wheel. Rendered as a small static circle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pulley {
    pub id: String,
    pub position: Vec2,
}

/// Standard 2×2 block hanging from the ropes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub id: String,
    pub mass: f64,
    pub position: Vec2,
    #[serde(default = "default_friction")]
    pub friction: f64,
}

fn default_friction() -> f64 {
    DEFAULT_FRICTION
}

/// Rope from `object_a` over the pulley named by `pulley_anchor` to `object_b`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub object_a: String,
    pub object_b: String,
    pub pulley_anchor: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ratio: Option<f64>,
}

/// Pulley arrangement described by named parts instead of raw bodies.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PulleySystem {
    #[serde(default)]
    pub surfaces: Vec<Surface>,
    #[serde(default)]
    pub pulleys: Vec<Pulley>,
    #[serde(default, alias = "objects")]
    pub blocks: Vec<Block>,
    #[serde(default)]
    pub connections: Vec<Connection>,
}

impl PulleySystem {
    pub fn from_json_str(source: &str) -> Result<Self> {
        Ok(serde_json::from_str(source)?)
    }

    /// Three blocks joined over two fixed pulleys, the middle block shared by
    /// both ropes.
    pub fn double_pulley() -> Self {
        let block = |id: &str, mass: f64, x: f64, y: f64| Block {
            id: id.to_string(),
            mass,
            position: Vec2::new(x, y),
            friction: DEFAULT_FRICTION,
        };
        let connection = |a: &str, b: &str, pulley: &str| Connection {
            object_a: a.to_string(),
            object_b: b.to_string(),
            pulley_anchor: pulley.to_string(),
            ratio: None,
        };

        Self {
            surfaces: vec![Surface {
                id: GROUND_ID.to_string(),
                position: GROUND_POSITION,
                size: GROUND_SIZE,
                angle: 0.0,
            }],
            pulleys: vec![
                Pulley {
                    id: "pulley1".to_string(),
                    position: Vec2::new(15.0, 30.0),
                },
                Pulley {
                    id: "pulley2".to_string(),
                    position: Vec2::new(35.0, 30.0),
                },
            ],
            blocks: vec![
                block("block_A", 5.0, 15.0, 20.0),
                block("block_B", 20.0, 25.0, 15.0),
                block("block_C", 5.0, 35.0, 20.0),
            ],
            connections: vec![
                connection("block_A", "block_B", "pulley1"),
                connection("block_B", "block_C", "pulley2"),
            ],
        }
    }
}

/// Expands a [`PulleySystem`] into a scene document with one pulley joint per
/// connection, anchored at the named pulley's position.
pub fn pulley_system(system: &PulleySystem) -> Result<SceneDocument> {
    let mut objects = Vec::with_capacity(
        system.surfaces.len() + system.pulleys.len() + system.blocks.len(),
    );

    objects.extend(system.surfaces.iter().map(|surface| {
        Body::new(surface.id.clone(), BodyType::Static, Shape::Box, surface.position)
            .with_size(surface.size)
            .with_angle(surface.angle)
    }));
    objects.extend(system.pulleys.iter().map(|pulley| {
        Body::new(pulley.id.clone(), BodyType::Static, Shape::Circle, pulley.position)
            .with_radius(PULLEY_RADIUS)
    }));
    objects.extend(system.blocks.iter().map(|block| {
        Body::new(block.id.clone(), BodyType::Dynamic, Shape::Box, block.position)
            .with_size(BLOCK_SIZE)
            .with_density(block.mass / BLOCK_SIZE.area())
            .with_field("friction", block.friction)
    }));

    let joints = system
        .connections
        .iter()
        .map(|connection| -> Result<Joint> {
            let pulley = system
                .pulleys
                .iter()
                .find(|pulley| pulley.id == connection.pulley_anchor)
                .ok_or_else(|| {
                    SceneError::InvalidInput(format!(
                        "connection between `{}` and `{}` names unknown pulley `{}`",
                        connection.object_a, connection.object_b, connection.pulley_anchor
                    ))
                })?;

            let mut spec = PulleySpec::new(
                connection.object_a.clone(),
                connection.object_b.clone(),
                pulley.position,
            );
            spec.ratio = connection.ratio;
            Ok(Joint::Pulley(spec))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(SceneDocument {
        world: None,
        objects,
        joints,
    })
}

fn require_finite(value: f64, label: &str) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(SceneError::InvalidInput(format!("{label} must be a finite number")))
    }
}

fn require_non_negative(value: f64, label: &str) -> Result<f64> {
    if require_finite(value, label)? < 0.0 {
        Err(SceneError::InvalidInput(format!("{label} must be non-negative")))
    } else {
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{joint::CompiledJoint, SceneCompiler};

    #[test]
    fn free_fall_places_ball_above_ground() {
        let doc = free_fall(20.0).unwrap();
        assert_eq!(doc.objects.len(), 2);
        assert_eq!(doc.objects[0].id().unwrap(), "ground");
        assert_eq!(doc.objects[1].position().unwrap(), Some(Vec2::new(25.0, 21.0)));

        let envelope = SceneCompiler::default().compile(&doc).unwrap();
        let scene = envelope.planck_scene;
        assert_eq!(scene.objects[0].density().unwrap(), None);
        assert_eq!(scene.objects[1].density().unwrap(), Some(1.0));
        assert_eq!(scene.world, json!({"gravity": {"x": 0.0, "y": -9.8}}));
    }

    #[test]
    fn projectile_carries_launch_velocity() {
        let doc = projectile(10.0, 90.0, 3.0).unwrap();
        let ball = &doc.objects[1];
        let velocity = ball.get("linearVelocity").unwrap();

        assert_eq!(ball.position().unwrap(), Some(Vec2::new(2.0, 5.0)));
        assert!(velocity["x"].as_f64().unwrap().abs() < 1e-9);
        assert!((velocity["y"].as_f64().unwrap() - 10.0).abs() < 1e-9);
        assert_eq!(ball.get("initial_velocity"), Some(velocity));

        let envelope = SceneCompiler::default().compile(&doc).unwrap();
        let compiled = &envelope.planck_scene.objects[1];
        assert_eq!(compiled.get("initial_velocity"), Some(velocity));
        assert_eq!(compiled.get("linearVelocity"), Some(velocity));
    }

    #[test]
    fn rejects_out_of_range_parameters() {
        assert!(matches!(free_fall(-1.0), Err(SceneError::InvalidInput(_))));
        assert!(matches!(free_fall(f64::NAN), Err(SceneError::InvalidInput(_))));
        assert!(projectile(-5.0, 45.0, 0.0).is_err());
        assert!(projectile(5.0, f64::INFINITY, 0.0).is_err());
    }

    #[test]
    fn double_pulley_compiles_with_rope_lengths() {
        let doc = pulley_system(&PulleySystem::double_pulley()).unwrap();
        assert_eq!(doc.objects.len(), 6);

        let envelope = SceneCompiler::default().compile(&doc).unwrap();
        let scene = envelope.planck_scene;

        let block_b = scene
            .objects
            .iter()
            .find(|body| body.id().ok() == Some("block_B"))
            .unwrap();
        assert_eq!(block_b.density().unwrap(), Some(5.0));
        assert_eq!(block_b.get("friction"), Some(&json!(0.3)));

        let joints: Vec<_> = scene
            .joints
            .iter()
            .map(|joint| match joint {
                CompiledJoint::Pulley(joint) => joint,
                other => panic!("expected pulley joint, got {other:?}"),
            })
            .collect();
        assert_eq!(joints.len(), 2);
        assert_eq!(joints[0].length_a, 10.0);
        assert!((joints[0].length_b - 325.0_f64.sqrt()).abs() < 1e-12);
        assert!((joints[1].length_a - 325.0_f64.sqrt()).abs() < 1e-12);
        assert_eq!(joints[1].ground_anchor_a, Vec2::new(35.0, 30.0));
        assert_eq!(joints[1].length_b, 10.0);
    }

    #[test]
    fn unknown_pulley_is_rejected() {
        let mut system = PulleySystem::double_pulley();
        system.connections[0].pulley_anchor = "pulley9".to_string();

        let err = pulley_system(&system).unwrap_err();
        assert!(err.to_string().contains("pulley9"));
    }

    #[test]
    fn unknown_block_is_caught_by_compiler() {
        let mut system = PulleySystem::double_pulley();
        system.connections[1].object_b = "block_Z".to_string();

        let doc = pulley_system(&system).unwrap();
        let err = SceneCompiler::default().compile(&doc).unwrap_err();
        assert!(err.to_string().contains("block_Z"));
    }

    #[test]
    fn parses_description_with_defaults() {
        let system = PulleySystem::from_json_str(
            r#"{
                "pulleys": [{"id": "p", "position": {"x": 0, "y": 10}}],
                "objects": [
                    {"id": "a", "mass": 4, "position": {"x": -2, "y": 0}},
                    {"id": "b", "mass": 8, "position": {"x": 2, "y": 0}}
                ],
                "connections": [{"object_a": "a", "object_b": "b", "pulley_anchor": "p", "ratio": 2}]
            }"#,
        )
        .unwrap();

        assert!(system.surfaces.is_empty());
        assert_eq!(system.blocks[0].friction, 0.3);

        let doc = pulley_system(&system).unwrap();
        match &doc.joints[0] {
            Joint::Pulley(spec) => assert_eq!(spec.ratio, Some(2.0)),
            other => panic!("expected pulley joint, got {other:?}"),
        }
    }
}
