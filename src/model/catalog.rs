//! Built-in model catalog
//!
//! Reference assemblies so the viewer runs without a backend. Asset paths
//! are relative to the asset root handed to the `AssetSource`.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use super::{ModelDefinition, ModelError, PartSpec};
use crate::geometry::Vec3;

const IDS: [&str; 3] = ["RobotArm", "RobotGripper", "Suspension"];

pub fn builtin_model_ids() -> &'static [&'static str] {
    &IDS
}

pub fn builtin_model(id: &str) -> Result<ModelDefinition, ModelError> {
    match id {
        "RobotArm" => Ok(robot_arm()),
        "RobotGripper" => Ok(robot_gripper()),
        "Suspension" => Ok(suspension()),
        other => Err(ModelError::Unknown(other.to_string())),
    }
}

fn v(x: f32, y: f32, z: f32) -> Vec3 {
    Vec3::new(x, y, z)
}

fn robot_arm() -> ModelDefinition {
    let dir = "/models/RobotArm";
    ModelDefinition {
        id: "RobotArm".into(),
        name: "Robot Arm".into(),
        description: None,
        parts: vec![
            PartSpec::new("base", &format!("{dir}/base.glb"), v(0.0, 0.0, 0.0), v(0.0, 0.0, 0.0)),
            PartSpec::new("Part2", &format!("{dir}/Part2.glb"), v(0.0, 0.1, 0.0), v(0.0, 0.3, 0.0)),
            PartSpec::new("Part3", &format!("{dir}/Part3.glb"), v(0.0, 0.26, 0.15), v(0.0, 0.6, 0.3))
                .with_rotation(v(-1.0, PI, -FRAC_PI_2)),
            PartSpec::new("Part4", &format!("{dir}/Part4.glb"), v(0.0, 0.5, -0.2), v(0.0, 0.9, -0.4)),
            PartSpec::new("Part5", &format!("{dir}/Part5.glb"), v(0.0, 0.5, 0.1), v(0.0, 1.2, 0.5)),
            PartSpec::new("Part6", &format!("{dir}/Part6.glb"), v(0.0, 0.47, 0.24), v(0.0, 1.5, 1.0))
                .with_rotation(v(-FRAC_PI_4, 0.0, 0.0)),
            PartSpec::new("Part7", &format!("{dir}/Part7.glb"), v(0.0, 0.43, 0.28), v(0.0, 1.8, 1.4))
                .with_rotation(v(FRAC_PI_4, 0.0, 0.0)),
            PartSpec::new("Part8_L", &format!("{dir}/Part8.glb"), v(-0.045, 0.35, 0.34), v(-0.3, 2.1, 1.8))
                .with_rotation(v(-FRAC_PI_4, 0.0, -0.5)),
            PartSpec::new("Part8_R", &format!("{dir}/Part8.glb"), v(0.045, 0.36, 0.35), v(0.3, 2.1, 1.8))
                .with_rotation(v(-FRAC_PI_4, -PI, -0.5)),
        ],
    }
}

fn robot_gripper() -> ModelDefinition {
    let dir = "/models/RobotGripper";
    let pin = |assembled: Vec3, exploded: Vec3| {
        PartSpec::new("Pin", &format!("{dir}/Pin.glb"), assembled, exploded)
            .with_rotation(v(0.0, 0.0, FRAC_PI_2))
            .with_name("Pin")
    };

    ModelDefinition {
        id: "RobotGripper".into(),
        name: "Robot Gripper".into(),
        description: None,
        parts: vec![
            PartSpec::new("Base Plate", &format!("{dir}/BasePlate.glb"), v(0.0, 0.0, 0.0), v(0.0, -0.3, 0.0))
                .with_rotation(v(-FRAC_PI_2, 0.0, PI)),
            PartSpec::new("Base Mounting Bracket", &format!("{dir}/BaseMountingBracket.glb"), v(-0.01, 0.005, -0.005), v(0.0, -0.15, 0.0))
                .with_rotation(v(0.0, -FRAC_PI_2, 0.0)),
            PartSpec::new("Base Gear", &format!("{dir}/BaseGear.glb"), v(-0.0075, -0.003, 0.017), v(0.0, 0.0, 0.0))
                .with_rotation(v(PI, -PI, -FRAC_PI_2)),
            PartSpec::new("Gear Link 1", &format!("{dir}/GearLink_1.glb"), v(-0.012, 0.003, 0.038), v(-0.1, 0.1, 0.0))
                .with_rotation(v(0.0, PI + 0.05, FRAC_PI_2)),
            PartSpec::new("Gear Link 2", &format!("{dir}/GearLink_2.glb"), v(0.013, 0.004, 0.038), v(0.1, 0.1, 0.0))
                .with_rotation(v(-FRAC_PI_2, PI, -1.6)),
            PartSpec::new("Link L", &format!("{dir}/Link.glb"), v(-0.0055, 0.0055, 0.0735), v(-0.15, 0.25, 0.0))
                .with_rotation(v(0.0, 0.0, FRAC_PI_2))
                .with_name("Link (L)"),
            PartSpec::new("Link R", &format!("{dir}/Link.glb"), v(0.005, 0.0055, 0.0735), v(0.15, 0.25, 0.0))
                .with_rotation(v(0.0, 0.0, FRAC_PI_2))
                .with_name("Link (R)"),
            PartSpec::new("Gripper L", &format!("{dir}/Gripper.glb"), v(0.0, 0.0, 0.0885), v(-0.2, 0.4, 0.0))
                .with_rotation(v(FRAC_PI_2, 0.0, 1.3)),
            PartSpec::new("Gripper R", &format!("{dir}/Gripper.glb"), v(0.0, 0.0, 0.0885), v(0.2, 0.4, 0.0))
                .with_rotation(v(-FRAC_PI_2, 0.0, -1.8)),
            pin(v(-0.0055, 0.002, 0.004), v(-0.08, -0.15, 0.05)),
            pin(v(0.0055, 0.002, 0.004), v(0.08, -0.15, 0.05)),
            pin(v(-0.0115, 0.001, 0.039), v(-0.15, 0.1, 0.05)),
            pin(v(0.0134, 0.001, 0.039), v(0.15, 0.1, 0.05)),
            pin(v(0.005, 0.002, 0.058), v(0.18, 0.25, 0.05)),
            pin(v(-0.0053, 0.002, 0.058), v(-0.18, 0.25, 0.05)),
            pin(v(-0.01, 0.001, 0.07), v(-0.22, 0.35, 0.05)),
            pin(v(0.01, 0.001, 0.07), v(0.22, 0.35, 0.05)),
            pin(v(0.005, 0.002, 0.089), v(0.25, 0.4, 0.05)),
            pin(v(-0.0053, 0.002, 0.089), v(-0.25, 0.4, 0.05)),
        ],
    }
}

fn suspension() -> ModelDefinition {
    let dir = "/models/Suspension";
    ModelDefinition {
        id: "Suspension".into(),
        name: "Suspension".into(),
        description: None,
        parts: vec![
            PartSpec::new("Base", &format!("{dir}/BASE.glb"), v(0.0, 0.0, 0.0), v(0.0, 0.0, 0.0)),
            PartSpec::new("ROD", &format!("{dir}/ROD.glb"), v(0.0, 0.1, 0.0), v(0.0, 0.4, 0.0)),
            PartSpec::new("SPRING", &format!("{dir}/SPRING.glb"), v(0.0, 0.02, 0.0), v(0.0, 0.8, 0.0)),
            PartSpec::new("NUT", &format!("{dir}/NUT.glb"), v(0.0, 0.12, 0.0), v(0.0, 1.2, 0.0)),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_builtin_validates() {
        for id in builtin_model_ids() {
            let model = builtin_model(id).unwrap();
            model.validate().unwrap();
            assert_eq!(&model.id, id);
        }
    }

    #[test]
    fn test_gripper_pins_get_unique_runtime_ids() {
        let model = builtin_model("RobotGripper").unwrap();
        let ids = model.runtime_ids();
        let unique: std::collections::HashSet<_> = ids.iter().collect();
        assert_eq!(unique.len(), ids.len());
        assert!(ids.contains(&"Pin#10".to_string()));
    }

    #[test]
    fn test_unknown_model() {
        assert!(matches!(builtin_model("V4_Engine"), Err(ModelError::Unknown(_))));
    }
}
