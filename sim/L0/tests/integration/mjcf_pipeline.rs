//! MJCF file → Model/Data: addressing tables, joint lookup, stepping.

use approx::assert_relative_eq;
use sim_core::{ElementType, MjJointType, joint_index};
use sim_mjcf::{MjcfError, load_model, load_model_from_file};

use crate::fixtures::{empty_world, pendulum_world};

#[test]
fn pendulum_world_addressing() {
    let model = load_model_from_file(pendulum_world()).unwrap();
    assert_eq!(model.name, "pendulum_world");
    assert_eq!(model.njnt, 3);
    assert_eq!((model.nq, model.nv, model.nu), (3, 3, 1));
    assert_eq!(model.timestep, 0.001);

    for (i, name) in ["joint0", "joint1", "joint2"].iter().enumerate() {
        let id = joint_index::resolve(&model, name).unwrap();
        assert_eq!(id, i);
        assert_eq!(joint_index::position_offset(&model, id), Some(i));
        assert_eq!(joint_index::velocity_offset(&model, id), Some(i));
        assert_eq!(model.id2name(ElementType::Joint, id), Some(*name));
    }
    assert_eq!(model.jnt_type[2], MjJointType::Slide);
    assert_eq!(model.name2id(ElementType::Actuator, "cart_motor"), Some(0));

    let data = model.make_data();
    assert_eq!(data.qpos.as_slice(), &[0.0; 3]);
    assert_eq!(data.qvel.as_slice(), &[0.0; 3]);
}

#[test]
fn empty_world_has_no_state() {
    let model = load_model_from_file(empty_world()).unwrap();
    assert_eq!((model.njnt, model.nq, model.nv), (0, 0, 0));

    let mut data = model.make_data();
    for _ in 0..100 {
        data.step(&model).unwrap();
    }
    assert_eq!(data.time, 0.001 * 100.0);
}

#[test]
fn multi_slot_joints_have_wide_offsets() {
    let model = load_model(
        r#"
        <mujoco model="mixed">
            <worldbody>
                <body name="torso" pos="0 0 1">
                    <freejoint name="root"/>
                    <geom type="sphere" size="0.1" mass="1"/>
                    <body name="head" pos="0 0 0.3">
                        <joint name="neck" type="ball"/>
                        <geom type="sphere" size="0.05" mass="0.5"/>
                        <body name="jaw" pos="0 0 -0.05">
                            <joint name="hinge" type="hinge" axis="1 0 0"/>
                            <geom type="box" size="0.02 0.02 0.02" mass="0.1"/>
                        </body>
                    </body>
                </body>
            </worldbody>
        </mujoco>
        "#,
    )
    .unwrap();

    let root = joint_index::address(&model, "root").unwrap();
    let neck = joint_index::address(&model, "neck").unwrap();
    let hinge = joint_index::address(&model, "hinge").unwrap();
    assert_eq!((root.qpos_adr, root.dof_adr, root.nq, root.nv), (0, 0, 7, 6));
    assert_eq!((neck.qpos_adr, neck.dof_adr, neck.nq, neck.nv), (7, 6, 4, 3));
    assert_eq!((hinge.qpos_adr, hinge.dof_adr, hinge.nq, hinge.nv), (11, 9, 1, 1));
}

#[test]
fn joint_lookup_is_exact() {
    let model = load_model_from_file(pendulum_world()).unwrap();
    assert_eq!(joint_index::resolve(&model, "joint"), None);
    assert_eq!(joint_index::resolve(&model, "Joint0"), None);
    assert_eq!(joint_index::resolve(&model, "joint0 "), None);
    assert!(joint_index::address(&model, "joint3").is_none());
}

#[test]
fn pendulum_swings_and_motor_drives_cart() {
    let model = load_model_from_file(pendulum_world()).unwrap();
    let mut data = model.make_data();
    data.qpos[0] = 0.5;
    data.ctrl[0] = 4.0;

    for _ in 0..100 {
        data.step(&model).unwrap();
    }

    assert!(data.qpos[0] < 0.5, "hinge should fall back toward hanging");
    assert!(data.qpos[2] > 0.0, "positive motor force moves the cart along +x");
    assert_relative_eq!(data.time, 0.1, epsilon = 1e-12);
}

#[test]
fn structural_errors_rejected() {
    let err = load_model(
        r#"<mujoco><worldbody>
            <body name="a"><joint name="j" type="hinge"/></body>
            <body name="b"><joint name="j" type="hinge"/></body>
        </worldbody></mujoco>"#,
    )
    .unwrap_err();
    assert!(matches!(err, MjcfError::DuplicateJoint(ref n) if n == "j"));

    let err = load_model(
        r#"<mujoco><worldbody>
            <body name="a"><joint name="j" type="hinge"/></body>
        </worldbody>
        <actuator><motor name="m" joint="elbow"/></actuator></mujoco>"#,
    )
    .unwrap_err();
    assert!(matches!(err, MjcfError::UndefinedJoint { .. }));

    let err = load_model(r#"<mujoco><option timestep="0"/></mujoco>"#).unwrap_err();
    assert!(matches!(err, MjcfError::InvalidOption { .. }));

    let err = load_model("<mujoco><worldbody>").unwrap_err();
    assert!(matches!(err, MjcfError::XmlParse(_)));
}

#[test]
fn missing_file_is_io_error() {
    let err = load_model_from_file("/no/such/model.xml").unwrap_err();
    assert!(matches!(err, MjcfError::Io { .. }));
}
