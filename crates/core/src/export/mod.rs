use crate::{compiler::PlanckScene, Result, SceneError};

/// Marker the browser page template carries where the scene JSON goes.
pub const SCENE_PLACEHOLDER: &str = "%%SCENE_DATA%%";

/// Fills the renderer page template with the compiled scene.
///
/// The inner scene (not the `planck_scene` envelope) is embedded, replacing
/// every occurrence of [`SCENE_PLACEHOLDER`].
pub fn inject_scene(template: &str, scene: &PlanckScene) -> Result<String> {
    if !template.contains(SCENE_PLACEHOLDER) {
        return Err(SceneError::Template(format!(
            "template does not contain the `{SCENE_PLACEHOLDER}` placeholder"
        )));
    }

    let json = serde_json::to_string(scene)?;
    Ok(template.replace(SCENE_PLACEHOLDER, &json))
}
