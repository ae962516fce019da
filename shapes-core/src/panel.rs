//! Declarative parameter panel.
//!
//! Every control binds a path such as `cube.width`, `sphere.rotation.y` or
//! `icosahedron.visible` to a range. The panel is the only place values are
//! clamped; descriptor fields reached through it trigger a geometry rebuild.

use std::f32::consts::PI;

use serde::Serialize;

use crate::descriptor::{ParamError, ShapeKind, ShapeParams};
use crate::scene::Scene;
use crate::transform::TransformGroup;

const AXES: [&str; 3] = ["x", "y", "z"];

/// What a control writes to
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Binding {
    Transform { group: TransformGroup, axis: usize },
    Visible,
    Param(&'static str),
}

/// Numeric slider bounds
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Range {
    pub min: f32,
    pub max: f32,
    pub step: Option<f32>,
    #[serde(skip)]
    pub increment: f32,
}

impl Range {
    /// Clamp into bounds, snapping to the step when one is set
    pub fn constrain(&self, value: f32) -> f32 {
        let value = match self.step {
            Some(step) if step > 0.0 => (value / step).round() * step,
            _ => value,
        };
        value.clamp(self.min, self.max)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Control {
    pub shape: ShapeKind,
    /// Folder path, e.g. `Cube/Rotation`
    pub folder: String,
    pub label: &'static str,
    pub path: String,
    pub binding: Binding,
    /// `None` for toggles
    pub range: Option<Range>,
}

/// Current value of a control
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ControlValue {
    Number(f32),
    Toggle(bool),
}

/// Serializable view of a control for external widget libraries
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControlDescription {
    pub path: String,
    pub folder: String,
    pub label: &'static str,
    #[serde(flatten)]
    pub range: Option<Range>,
    pub value: ControlValue,
}

#[derive(Debug, Clone)]
pub struct Panel {
    controls: Vec<Control>,
}

impl Panel {
    pub fn new() -> Self {
        let mut controls = Vec::new();
        for kind in ShapeKind::ALL {
            let shape = kind.name();
            let folder = kind.label();

            for group in TransformGroup::ALL {
                let (min, max, step) = match group {
                    TransformGroup::Rotation => (0.0, PI * 2.0, 0.01),
                    TransformGroup::Position => (-5.0, 5.0, 0.1),
                    TransformGroup::Scale => (0.1, 5.0, 0.1),
                };
                for (axis, label) in AXES.into_iter().enumerate() {
                    controls.push(Control {
                        shape: kind,
                        folder: format!("{folder}/{}", group.label()),
                        label,
                        path: format!("{shape}.{}.{label}", group.name()),
                        binding: Binding::Transform { group, axis },
                        range: Some(Range {
                            min,
                            max,
                            step: Some(step),
                            increment: step,
                        }),
                    });
                }
            }

            controls.push(Control {
                shape: kind,
                folder: folder.to_string(),
                label: "visible",
                path: format!("{shape}.visible"),
                binding: Binding::Visible,
                range: None,
            });

            for spec in ShapeParams::defaults(kind).fields() {
                controls.push(Control {
                    shape: kind,
                    folder: format!("{folder}/Properties"),
                    label: spec.name,
                    path: format!("{shape}.{}", spec.name),
                    binding: Binding::Param(spec.name),
                    range: Some(Range {
                        min: spec.min,
                        max: spec.max,
                        step: spec.step,
                        increment: spec.increment,
                    }),
                });
            }
        }
        Self { controls }
    }

    pub fn controls(&self) -> &[Control] {
        &self.controls
    }

    pub fn find(&self, path: &str) -> Result<&Control, ParamError> {
        self.controls
            .iter()
            .find(|control| control.path == path)
            .ok_or_else(|| ParamError::UnknownControl(path.to_string()))
    }

    pub fn value(&self, scene: &Scene, control: &Control) -> ControlValue {
        let shape = scene.shape(control.shape);
        match control.binding {
            Binding::Transform { group, axis } => {
                ControlValue::Number(shape.transform.group(group)[axis])
            }
            Binding::Visible => ControlValue::Toggle(shape.visible),
            Binding::Param(field) => {
                ControlValue::Number(shape.params().get(field).unwrap_or_default())
            }
        }
    }

    /// Set a numeric control, returning the value actually written
    pub fn apply(&self, scene: &mut Scene, path: &str, value: f32) -> Result<f32, ParamError> {
        let control = self.find(path)?;
        let range = control
            .range
            .ok_or_else(|| ParamError::NotNumeric(path.to_string()))?;
        if !value.is_finite() {
            return Err(ParamError::NotFinite {
                path: path.to_string(),
                value,
            });
        }

        let requested = value;
        let value = range.constrain(requested);
        if value != requested {
            log::debug!("{path}: {requested} constrained to {value}");
        }
        match control.binding {
            Binding::Transform { group, axis } => {
                scene.shape_mut(control.shape).transform.group_mut(group)[axis] = value;
            }
            Binding::Param(field) => scene.set_param(control.shape, field, value)?,
            Binding::Visible => return Err(ParamError::NotNumeric(path.to_string())),
        }
        Ok(value)
    }

    /// Move a numeric control by whole keyboard increments
    pub fn nudge(&self, scene: &mut Scene, path: &str, steps: i32) -> Result<f32, ParamError> {
        let control = self.find(path)?;
        let range = control
            .range
            .ok_or_else(|| ParamError::NotNumeric(path.to_string()))?;
        let ControlValue::Number(current) = self.value(scene, control) else {
            return Err(ParamError::NotNumeric(path.to_string()));
        };
        self.apply(scene, path, current + steps as f32 * range.increment)
    }

    /// Flip a boolean control, returning the new state
    pub fn toggle(&self, scene: &mut Scene, path: &str) -> Result<bool, ParamError> {
        let control = self.find(path)?;
        match control.binding {
            Binding::Visible => {
                let shape = scene.shape_mut(control.shape);
                shape.visible = !shape.visible;
                Ok(shape.visible)
            }
            _ => Err(ParamError::NotToggle(path.to_string())),
        }
    }

    pub fn describe(&self, scene: &Scene) -> Vec<ControlDescription> {
        self.controls
            .iter()
            .map(|control| ControlDescription {
                path: control.path.clone(),
                folder: control.folder.clone(),
                label: control.label,
                range: control.range,
                value: self.value(scene, control),
            })
            .collect()
    }
}

impl Default for Panel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_shape_gets_a_full_folder() {
        let panel = Panel::new();
        // 9 transform sliders + visible + descriptor fields
        let count = |kind| panel.controls().iter().filter(|c| c.shape == kind).count();
        assert_eq!(count(ShapeKind::Cube), 10 + 6);
        assert_eq!(count(ShapeKind::Sphere), 10 + 7);
        assert_eq!(count(ShapeKind::Icosahedron), 10 + 2);
        assert!(panel.find("sphere.phiLength").is_ok());
        assert!(panel.find("cube.rotation.z").is_ok());
    }

    #[test]
    fn test_apply_clamps_to_widget_range() {
        let panel = Panel::new();
        let mut scene = Scene::new();
        assert_eq!(panel.apply(&mut scene, "cube.width", 99.0), Ok(30.0));
        assert_eq!(panel.apply(&mut scene, "sphere.radius", 0.0), Ok(0.1));
        assert_eq!(scene.shape(ShapeKind::Cube).params().get("width"), Some(30.0));
    }

    #[test]
    fn test_apply_keeps_in_range_values_exact() {
        let panel = Panel::new();
        let mut scene = Scene::new();
        assert_eq!(panel.apply(&mut scene, "cube.height", 7.3), Ok(7.3));
        let geometry = scene.shape(ShapeKind::Cube).geometry();
        assert_eq!(geometry.params().get("height"), Some(7.3));
    }

    #[test]
    fn test_detail_snaps_to_whole_steps() {
        let panel = Panel::new();
        let mut scene = Scene::new();
        assert_eq!(panel.apply(&mut scene, "icosahedron.detail", 2.6), Ok(3.0));
        let mesh = scene.shape(ShapeKind::Icosahedron).geometry().mesh();
        assert_eq!(mesh.triangles.len(), 20 * 16);
    }

    #[test]
    fn test_transform_controls_do_not_rebuild_geometry() {
        let panel = Panel::new();
        let mut scene = Scene::new();
        let before = scene.shape(ShapeKind::Sphere).geometry().id();
        panel.apply(&mut scene, "sphere.position.y", 2.0).unwrap();
        assert_eq!(scene.shape(ShapeKind::Sphere).transform.position.y, 2.0);
        assert_eq!(scene.shape(ShapeKind::Sphere).geometry().id(), before);
    }

    #[test]
    fn test_nudge_and_toggle() {
        let panel = Panel::new();
        let mut scene = Scene::new();
        assert_eq!(panel.nudge(&mut scene, "cube.widthSegments", 3), Ok(4.0));
        assert_eq!(panel.nudge(&mut scene, "cube.scale.x", -100), Ok(0.1));

        assert_eq!(panel.toggle(&mut scene, "cube.visible"), Ok(false));
        assert!(!scene.shape(ShapeKind::Cube).visible);
        assert_eq!(
            panel.toggle(&mut scene, "cube.width"),
            Err(ParamError::NotToggle("cube.width".to_string()))
        );
        assert_eq!(
            panel.apply(&mut scene, "cube.visible", 1.0),
            Err(ParamError::NotNumeric("cube.visible".to_string()))
        );
    }

    #[test]
    fn test_rejects_unknown_paths_and_nan() {
        let panel = Panel::new();
        let mut scene = Scene::new();
        assert!(matches!(
            panel.apply(&mut scene, "cube.radius", 1.0),
            Err(ParamError::UnknownControl(_))
        ));
        assert!(matches!(
            panel.apply(&mut scene, "cube.width", f32::NAN),
            Err(ParamError::NotFinite { .. })
        ));
    }

    #[test]
    fn test_describe_serializes_current_values() {
        let panel = Panel::new();
        let scene = Scene::new();
        let description = panel.describe(&scene);
        assert_eq!(description.len(), panel.controls().len());

        let json = serde_json::to_value(&description).unwrap();
        let width = json
            .as_array()
            .unwrap()
            .iter()
            .find(|c| c["path"] == "cube.width")
            .unwrap();
        assert_eq!(width["folder"], "Cube/Properties");
        assert_eq!(width["min"], 1.0);
        assert_eq!(width["max"], 30.0);
        assert_eq!(width["value"], 1.0);

        let visible = json
            .as_array()
            .unwrap()
            .iter()
            .find(|c| c["path"] == "sphere.visible")
            .unwrap();
        assert_eq!(visible["value"], true);
    }
}
