use crate::{config::CompilerConfig, geometry::planar_area, scene::Body, Result};

/// How the density of one body is settled during elaboration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DensityRule {
    /// Static, kinematic and untyped bodies never receive a density.
    NotApplicable,
    /// The caller already wrote a `density` key; it is left alone.
    Explicit,
    /// Density follows from the supplied mass spread over the planar area.
    FromMass { mass: f64, area: f64 },
    /// Dynamic body with neither mass nor density.
    Default,
}

impl DensityRule {
    /// Picks the rule for `body` from its type, shape and supplied fields.
    ///
    /// Only the fields the chosen rule depends on are parsed: `mass`, and
    /// then `size` for boxes or `radius` for circles.
    pub fn for_body(body: &Body) -> Result<Self> {
        if !body.is_dynamic() {
            return Ok(DensityRule::NotApplicable);
        }
        if body.contains("density") {
            return Ok(DensityRule::Explicit);
        }

        let rule = match body.mass()? {
            Some(mass) => DensityRule::FromMass {
                mass,
                area: planar_area(body.shape().as_ref(), || body.size(), || body.radius())?,
            },
            None => DensityRule::Default,
        };
        Ok(rule)
    }

    /// Density to write into the body, or `None` when the field must stay
    /// as the caller left it.
    pub fn resolve(self, default_density: f64) -> Option<f64> {
        match self {
            DensityRule::NotApplicable | DensityRule::Explicit => None,
            // zero area would divide by zero
            DensityRule::FromMass { area, .. } if area == 0.0 => Some(default_density),
            DensityRule::FromMass { mass, area } => Some(mass / area),
            DensityRule::Default => Some(default_density),
        }
    }
}

/// Produces the renderer-ready copy of one body. The only field ever added is
/// `density`, and only for dynamic bodies that lack one.
pub fn elaborate_body(body: &Body, config: &CompilerConfig) -> Result<Body> {
    let mut elaborated = body.clone();
    if let Some(density) = DensityRule::for_body(body)?.resolve(config.default_density) {
        elaborated.set_density(density);
    }
    Ok(elaborated)
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use serde_json::json;

    use super::*;
    use crate::{
        geometry::{Shape, Size, Vec2},
        scene::BodyType,
        SceneError,
    };

    fn dynamic(shape: Shape) -> Body {
        Body::new("body", BodyType::Dynamic, shape, Vec2::ZERO)
    }

    fn density_of(body: &Body) -> Option<f64> {
        elaborate_body(body, &CompilerConfig::default())
            .unwrap()
            .density()
            .unwrap()
    }

    #[test]
    fn mass_over_box_area() {
        let body = dynamic(Shape::Box)
            .with_mass(10.0)
            .with_size(Size::new(2.0, 5.0));
        assert_eq!(density_of(&body), Some(1.0));
    }

    #[test]
    fn explicit_density_wins_over_mass() {
        let body = dynamic(Shape::Box)
            .with_mass(10.0)
            .with_size(Size::new(2.0, 5.0))
            .with_density(42.0);
        assert_eq!(DensityRule::for_body(&body).unwrap(), DensityRule::Explicit);
        assert_eq!(density_of(&body), Some(42.0));
    }

    #[test]
    fn null_density_key_counts_as_explicit() {
        let body = dynamic(Shape::Box)
            .with_mass(2.0)
            .with_field("density", serde_json::Value::Null);

        let elaborated = elaborate_body(&body, &CompilerConfig::default()).unwrap();
        assert_eq!(elaborated.get("density"), Some(&serde_json::Value::Null));
    }

    #[test]
    fn static_bodies_never_get_density() {
        let body = Body::new("ground", BodyType::Static, Shape::Box, Vec2::ZERO).with_mass(50.0);
        assert_eq!(
            DensityRule::for_body(&body).unwrap(),
            DensityRule::NotApplicable
        );
        assert_eq!(density_of(&body), None);
    }

    #[test]
    fn kinematic_and_untyped_bodies_are_left_alone() {
        let kinematic = Body::new("lift", BodyType::Kinematic, Shape::Box, Vec2::ZERO);
        let mut untyped = dynamic(Shape::Box).with_mass(3.0);
        untyped.remove("type");

        assert_eq!(density_of(&kinematic), None);
        assert_eq!(density_of(&untyped), None);
    }

    #[test]
    fn zero_area_falls_back_to_default_density() {
        let body = dynamic(Shape::Circle).with_radius(0.0).with_mass(5.0);
        assert_eq!(density_of(&body), Some(1.0));
    }

    #[test]
    fn dynamic_without_mass_gets_default_density() {
        assert_eq!(density_of(&dynamic(Shape::Circle)), Some(1.0));

        let config = CompilerConfig {
            default_density: 2.5,
            ..CompilerConfig::default()
        };
        let elaborated = elaborate_body(&dynamic(Shape::Box), &config).unwrap();
        assert_eq!(elaborated.density().unwrap(), Some(2.5));
    }

    #[test]
    fn circle_mass_spreads_over_disc() {
        let body = dynamic(Shape::Circle).with_radius(2.0).with_mass(8.0 * PI);
        let density = density_of(&body).unwrap();
        assert!((density - 2.0).abs() < 1e-12);
    }

    #[test]
    fn unknown_shape_uses_mass_as_density() {
        let body = dynamic(Shape::Other("polygon".to_string())).with_mass(7.0);
        assert_eq!(density_of(&body), Some(7.0));
    }

    #[test]
    fn unread_malformed_fields_are_tolerated() {
        let wall: Body = serde_json::from_value(json!({
            "id": "wall", "type": "static", "shape": "box", "size": {"width": 2}
        }))
        .unwrap();
        assert_eq!(density_of(&wall), None);

        let ball = dynamic(Shape::Circle).with_field("size", "not a size");
        assert_eq!(density_of(&ball), Some(1.0));
    }

    #[test]
    fn malformed_field_fails_when_density_needs_it() {
        let body = dynamic(Shape::Box)
            .with_mass(4.0)
            .with_field("size", json!({"width": 2}));

        let err = elaborate_body(&body, &CompilerConfig::default()).unwrap_err();
        assert!(matches!(err, SceneError::InvalidField { field: "size", .. }));
    }

    #[test]
    fn elaboration_only_appends_density() {
        let body: Body = serde_json::from_value(json!({
            "id": "crate", "type": "dynamic", "shape": "box",
            "position": {"x": 1, "y": 2, "z": 7}, "mass": 4, "tag": "cargo"
        }))
        .unwrap();
        let elaborated = elaborate_body(&body, &CompilerConfig::default()).unwrap();

        assert!(!body.contains("density"));
        assert_eq!(
            serde_json::to_value(&elaborated).unwrap(),
            json!({
                "id": "crate", "type": "dynamic", "shape": "box",
                "position": {"x": 1, "y": 2, "z": 7}, "mass": 4, "tag": "cargo",
                "density": 4.0
            })
        );
    }
}
