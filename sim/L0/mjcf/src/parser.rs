//! MJCF XML parser.
//!
//! Parses MJCF XML into the intermediate representation types. Elements that
//! do not affect the supported dynamics are skipped; the ones a reader would
//! expect to matter are skipped with a warning.

use nalgebra::{Vector3, Vector4};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::io::BufRead;
use tracing::{debug, warn};

use crate::error::{MjcfError, Result};
use crate::types::{
    AngleUnit, MjcfActuator, MjcfBody, MjcfCompiler, MjcfGeom, MjcfGeomType, MjcfInertial,
    MjcfJoint, MjcfJointType, MjcfModel, MjcfOption,
};

/// Top-level sections with no effect on the supported dynamics.
const COSMETIC_SECTIONS: &[&[u8]] = &[b"visual", b"asset", b"statistic", b"size", b"extension"];

/// Parse an MJCF string into a model.
///
/// # Errors
///
/// Returns an error if the XML is malformed, the `<mujoco>` root is missing,
/// or an attribute value cannot be parsed.
pub fn parse_mjcf_str(xml: &str) -> Result<MjcfModel> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);
    parse_mjcf_reader(&mut reader)
}

/// Parse MJCF from a reader.
fn parse_mjcf_reader<R: BufRead>(reader: &mut Reader<R>) -> Result<MjcfModel> {
    let mut buf = Vec::new();
    let mut model: Option<MjcfModel> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) if e.name().as_ref() == b"mujoco" => {
                model = Some(parse_mujoco(reader, e)?);
            }
            Ok(Event::Empty(ref e)) if e.name().as_ref() == b"mujoco" => {
                model = Some(MjcfModel::new(model_name(e)));
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(MjcfError::XmlParse(e.to_string())),
        }
        buf.clear();
    }

    model.ok_or_else(|| MjcfError::missing_element("mujoco", "MJCF document"))
}

fn model_name(e: &BytesStart) -> String {
    get_attribute_opt(e, "model").unwrap_or_else(|| "unnamed".to_string())
}

/// Parse the mujoco root element and its children.
fn parse_mujoco<R: BufRead>(reader: &mut Reader<R>, start: &BytesStart) -> Result<MjcfModel> {
    let mut model = MjcfModel::new(model_name(start));
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let elem_name = e.name().as_ref().to_vec();
                match elem_name.as_slice() {
                    b"option" => {
                        model.option = parse_option_attrs(e)?;
                        skip_element(reader, &elem_name)?;
                    }
                    b"compiler" => {
                        model.compiler = parse_compiler_attrs(e)?;
                        skip_element(reader, &elem_name)?;
                    }
                    b"worldbody" => {
                        let wb = parse_worldbody(reader)?;
                        model.worldbody.children.extend(wb.children);
                        model.worldbody.geoms.extend(wb.geoms);
                    }
                    b"actuator" => {
                        let actuators = parse_actuators(reader)?;
                        model.actuators.extend(actuators);
                    }
                    other => {
                        skip_section(other);
                        skip_element(reader, &elem_name)?;
                    }
                }
            }
            Ok(Event::Empty(ref e)) => match e.name().as_ref() {
                b"option" => model.option = parse_option_attrs(e)?,
                b"compiler" => model.compiler = parse_compiler_attrs(e)?,
                _ => {}
            },
            Ok(Event::End(ref e)) if e.name().as_ref() == b"mujoco" => break,
            Ok(Event::Eof) => return Err(MjcfError::XmlParse("unexpected EOF in mujoco".into())),
            Ok(_) => {}
            Err(e) => return Err(MjcfError::XmlParse(e.to_string())),
        }
        buf.clear();
    }

    Ok(model)
}

fn skip_section(name: &[u8]) {
    let section = String::from_utf8_lossy(name);
    if COSMETIC_SECTIONS.contains(&name) {
        debug!(%section, "skipping MJCF section");
    } else {
        warn!(%section, "MJCF section not supported, ignoring");
    }
}

/// Parse option attributes.
fn parse_option_attrs(e: &BytesStart) -> Result<MjcfOption> {
    let mut option = MjcfOption::default();

    if let Some(ts) = parse_float_attr(e, "timestep", "option")? {
        option.timestep = ts;
    }
    if let Some(g) = get_attribute_opt(e, "gravity") {
        option.gravity = parse_vector3(&g, "gravity", "option")?;
    }

    Ok(option)
}

/// Parse compiler attributes.
fn parse_compiler_attrs(e: &BytesStart) -> Result<MjcfCompiler> {
    let mut compiler = MjcfCompiler::default();

    if let Some(angle) = get_attribute_opt(e, "angle") {
        compiler.angle = match angle.as_str() {
            "degree" => AngleUnit::Degree,
            "radian" => AngleUnit::Radian,
            _ => {
                return Err(MjcfError::invalid_attribute(
                    "angle",
                    "compiler",
                    format!("expected 'degree' or 'radian', got '{angle}'"),
                ));
            }
        };
    }
    if let Some(autolimits) = parse_bool_attr(e, "autolimits", "compiler")? {
        compiler.autolimits = autolimits;
    }

    Ok(compiler)
}

/// Parse worldbody element.
fn parse_worldbody<R: BufRead>(reader: &mut Reader<R>) -> Result<MjcfBody> {
    let mut worldbody = MjcfBody::new("world");
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let elem_name = e.name().as_ref().to_vec();
                match elem_name.as_slice() {
                    b"body" => {
                        let body = parse_body(reader, e)?;
                        worldbody.children.push(body);
                    }
                    b"geom" => {
                        worldbody.geoms.push(parse_geom_attrs(e)?);
                        skip_element(reader, &elem_name)?;
                    }
                    _ => skip_element(reader, &elem_name)?,
                }
            }
            Ok(Event::Empty(ref e)) => match e.name().as_ref() {
                b"body" => worldbody.children.push(parse_body_attrs(e)?),
                b"geom" => worldbody.geoms.push(parse_geom_attrs(e)?),
                _ => {}
            },
            Ok(Event::End(ref e)) if e.name().as_ref() == b"worldbody" => break,
            Ok(Event::Eof) => {
                return Err(MjcfError::XmlParse("unexpected EOF in worldbody".into()));
            }
            Ok(_) => {}
            Err(e) => return Err(MjcfError::XmlParse(e.to_string())),
        }
        buf.clear();
    }

    Ok(worldbody)
}

/// Parse body element and its subtree.
fn parse_body<R: BufRead>(reader: &mut Reader<R>, start: &BytesStart) -> Result<MjcfBody> {
    let mut body = parse_body_attrs(start)?;
    let mut buf = Vec::new();
    let mut joint_counter = 0;

    loop {
        buf.clear();
        let (e, has_children) = match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => (e.into_owned(), true),
            Ok(Event::Empty(e)) => (e.into_owned(), false),
            Ok(Event::End(ref e)) if e.name().as_ref() == b"body" => break,
            Ok(Event::Eof) => return Err(MjcfError::XmlParse("unexpected EOF in body".into())),
            Ok(_) => continue,
            Err(e) => return Err(MjcfError::XmlParse(e.to_string())),
        };

        let elem_name = e.name().as_ref().to_vec();
        match elem_name.as_slice() {
            b"body" => {
                let child = if has_children {
                    parse_body(reader, &e)?
                } else {
                    parse_body_attrs(&e)?
                };
                body.children.push(child);
                continue;
            }
            b"joint" | b"freejoint" => {
                let mut joint = if elem_name == b"joint" {
                    parse_joint_attrs(&e)?
                } else {
                    parse_freejoint_attrs(&e)
                };
                // Joints of named bodies get a generated name; the rest stay anonymous
                if joint.name.is_empty() && !body.name.is_empty() {
                    joint.name = format!("{}_joint{}", body.name, joint_counter);
                    joint_counter += 1;
                }
                joint.body = Some(body.name.clone());
                body.joints.push(joint);
            }
            b"geom" => body.geoms.push(parse_geom_attrs(&e)?),
            b"inertial" => body.inertial = Some(parse_inertial_attrs(&e)?),
            _ => {}
        }
        if has_children {
            skip_element(reader, &elem_name)?;
        }
    }

    Ok(body)
}

/// Parse body attributes only.
fn parse_body_attrs(e: &BytesStart) -> Result<MjcfBody> {
    let mut body = MjcfBody::new(get_attribute_opt(e, "name").unwrap_or_default());

    if let Some(pos) = get_attribute_opt(e, "pos") {
        body.pos = parse_vector3(&pos, "pos", "body")?;
    }
    if let Some(quat) = get_attribute_opt(e, "quat") {
        body.quat = parse_vector4(&quat, "quat", "body")?;
    }
    for unsupported in ["euler", "axisangle", "xyaxes", "zaxis"] {
        if get_attribute_opt(e, unsupported).is_some() {
            warn!(body = %body.name, attribute = unsupported, "body orientation attribute ignored, use quat");
        }
    }

    Ok(body)
}

/// Parse joint attributes.
fn parse_joint_attrs(e: &BytesStart) -> Result<MjcfJoint> {
    let mut joint = MjcfJoint {
        name: get_attribute_opt(e, "name").unwrap_or_default(),
        ..Default::default()
    };

    if let Some(jtype) = get_attribute_opt(e, "type") {
        joint.joint_type = Some(
            MjcfJointType::from_str(&jtype).ok_or_else(|| MjcfError::UnknownJointType(jtype))?,
        );
    }
    if let Some(pos) = get_attribute_opt(e, "pos") {
        joint.pos = Some(parse_vector3(&pos, "pos", "joint")?);
    }
    if let Some(axis) = get_attribute_opt(e, "axis") {
        joint.axis = Some(parse_vector3(&axis, "axis", "joint")?);
    }
    joint.limited = parse_bool_attr(e, "limited", "joint")?;
    if let Some(range) = get_attribute_opt(e, "range") {
        let parts = parse_float_array(&range, "range", "joint")?;
        if parts.len() < 2 {
            return Err(MjcfError::invalid_attribute(
                "range",
                "joint",
                format!("expected 2 values, got {}", parts.len()),
            ));
        }
        joint.range = Some((parts[0], parts[1]));
    }
    joint.ref_pos = parse_float_attr(e, "ref", "joint")?;
    joint.spring_ref = parse_float_attr(e, "springref", "joint")?;
    joint.stiffness = parse_float_attr(e, "stiffness", "joint")?;
    joint.damping = parse_float_attr(e, "damping", "joint")?;
    joint.armature = parse_float_attr(e, "armature", "joint")?;

    Ok(joint)
}

/// `<freejoint/>` is shorthand for `<joint type="free"/>` and only takes a name.
fn parse_freejoint_attrs(e: &BytesStart) -> MjcfJoint {
    MjcfJoint {
        name: get_attribute_opt(e, "name").unwrap_or_default(),
        joint_type: Some(MjcfJointType::Free),
        ..Default::default()
    }
}

/// Parse geom attributes.
fn parse_geom_attrs(e: &BytesStart) -> Result<MjcfGeom> {
    let mut geom = MjcfGeom {
        name: get_attribute_opt(e, "name"),
        ..Default::default()
    };

    if let Some(gtype) = get_attribute_opt(e, "type") {
        geom.geom_type = match MjcfGeomType::from_str(&gtype) {
            Some(t) => Some(t),
            None if matches!(gtype.as_str(), "mesh" | "hfield" | "sdf") => {
                warn!(geom = ?geom.name, geom_type = %gtype, "geom type has no mass model, treating as massless");
                Some(MjcfGeomType::Plane)
            }
            None => return Err(MjcfError::UnknownGeomType(gtype)),
        };
    }
    if let Some(pos) = get_attribute_opt(e, "pos") {
        geom.pos = Some(parse_vector3(&pos, "pos", "geom")?);
    }
    if let Some(size) = get_attribute_opt(e, "size") {
        geom.size = parse_float_array(&size, "size", "geom")?;
    }
    if let Some(fromto) = get_attribute_opt(e, "fromto") {
        let p = parse_float_array(&fromto, "fromto", "geom")?;
        if p.len() < 6 {
            return Err(MjcfError::invalid_attribute(
                "fromto",
                "geom",
                format!("expected 6 values, got {}", p.len()),
            ));
        }
        geom.fromto = Some([p[0], p[1], p[2], p[3], p[4], p[5]]);
    }
    geom.mass = parse_float_attr(e, "mass", "geom")?;
    geom.density = parse_float_attr(e, "density", "geom")?;

    Ok(geom)
}

/// Parse inertial attributes.
fn parse_inertial_attrs(e: &BytesStart) -> Result<MjcfInertial> {
    let mut inertial = MjcfInertial::default();

    if let Some(pos) = get_attribute_opt(e, "pos") {
        inertial.pos = parse_vector3(&pos, "pos", "inertial")?;
    }
    if let Some(mass) = parse_float_attr(e, "mass", "inertial")? {
        inertial.mass = mass;
    }
    if let Some(diag) = get_attribute_opt(e, "diaginertia") {
        inertial.diaginertia = Some(parse_vector3(&diag, "diaginertia", "inertial")?);
    }
    if get_attribute_opt(e, "fullinertia").is_some() {
        warn!("inertial fullinertia not supported, using diaginertia or geoms");
    }

    Ok(inertial)
}

/// Parse the actuator section. Only `<motor>` is supported.
fn parse_actuators<R: BufRead>(reader: &mut Reader<R>) -> Result<Vec<MjcfActuator>> {
    let mut actuators = Vec::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let elem_name = e.name().as_ref().to_vec();
                if let Some(actuator) = parse_actuator_attrs(e)? {
                    actuators.push(actuator);
                }
                skip_element(reader, &elem_name)?;
            }
            Ok(Event::Empty(ref e)) => {
                if let Some(actuator) = parse_actuator_attrs(e)? {
                    actuators.push(actuator);
                }
            }
            Ok(Event::End(ref e)) if e.name().as_ref() == b"actuator" => break,
            Ok(Event::Eof) => return Err(MjcfError::XmlParse("unexpected EOF in actuator".into())),
            Ok(_) => {}
            Err(e) => return Err(MjcfError::XmlParse(e.to_string())),
        }
        buf.clear();
    }

    Ok(actuators)
}

fn parse_actuator_attrs(e: &BytesStart) -> Result<Option<MjcfActuator>> {
    let kind = String::from_utf8_lossy(e.name().as_ref()).to_string();
    let name = get_attribute_opt(e, "name").unwrap_or_default();
    if kind != "motor" {
        warn!(actuator = %name, kind = %kind, "only motor actuators are supported, ignoring");
        return Ok(None);
    }

    let gear = match get_attribute_opt(e, "gear") {
        Some(g) => parse_float_array(&g, "gear", "motor")?.first().copied(),
        None => None,
    };

    Ok(Some(MjcfActuator {
        name,
        joint: get_attribute_opt(e, "joint"),
        gear,
    }))
}

// ============================================================================
// Helper functions
// ============================================================================

/// Get an optional attribute value.
fn get_attribute_opt(e: &BytesStart, name: &str) -> Option<String> {
    for attr in e.attributes().flatten() {
        if attr.key.as_ref() == name.as_bytes() {
            return String::from_utf8(attr.value.to_vec()).ok();
        }
    }
    None
}

/// Parse a float attribute. Absent is `Ok(None)`; present but malformed is an error.
fn parse_float_attr(e: &BytesStart, name: &'static str, element: &str) -> Result<Option<f64>> {
    get_attribute_opt(e, name)
        .map(|s| {
            s.trim().parse::<f64>().map_err(|_| {
                MjcfError::invalid_attribute(name, element, format!("expected float, got '{s}'"))
            })
        })
        .transpose()
}

/// Parse a `true`/`false` attribute.
fn parse_bool_attr(e: &BytesStart, name: &'static str, element: &str) -> Result<Option<bool>> {
    match get_attribute_opt(e, name).as_deref() {
        None => Ok(None),
        Some("true") => Ok(Some(true)),
        Some("false") => Ok(Some(false)),
        Some(other) => Err(MjcfError::invalid_attribute(
            name,
            element,
            format!("expected 'true' or 'false', got '{other}'"),
        )),
    }
}

/// Parse a space-separated vector3 string.
fn parse_vector3(s: &str, name: &'static str, element: &str) -> Result<Vector3<f64>> {
    let parts = parse_float_array(s, name, element)?;

    if parts.len() < 3 {
        return Err(MjcfError::invalid_attribute(
            name,
            element,
            format!("expected 3 values, got {}: {s}", parts.len()),
        ));
    }

    Ok(Vector3::new(parts[0], parts[1], parts[2]))
}

/// Parse a space-separated vector4 string.
fn parse_vector4(s: &str, name: &'static str, element: &str) -> Result<Vector4<f64>> {
    let parts = parse_float_array(s, name, element)?;

    if parts.len() < 4 {
        return Err(MjcfError::invalid_attribute(
            name,
            element,
            format!("expected 4 values, got {}: {s}", parts.len()),
        ));
    }

    Ok(Vector4::new(parts[0], parts[1], parts[2], parts[3]))
}

/// Parse a space-separated array of floats.
fn parse_float_array(s: &str, name: &'static str, element: &str) -> Result<Vec<f64>> {
    s.split_whitespace()
        .map(|p| {
            p.parse::<f64>().map_err(|_| {
                MjcfError::invalid_attribute(name, element, format!("invalid float: {p}"))
            })
        })
        .collect()
}

/// Skip an element and all its children.
fn skip_element<R: BufRead>(reader: &mut Reader<R>, name: &[u8]) -> Result<()> {
    let mut buf = Vec::new();
    let mut depth = 1;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) if e.name().as_ref() == name => {
                depth += 1;
            }
            Ok(Event::End(ref e)) if e.name().as_ref() == name => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            Ok(Event::Eof) => {
                return Err(MjcfError::XmlParse(format!(
                    "unexpected EOF in {}",
                    String::from_utf8_lossy(name)
                )));
            }
            Ok(_) => {}
            Err(e) => return Err(MjcfError::XmlParse(e.to_string())),
        }
        buf.clear();
    }

    Ok(())
}
