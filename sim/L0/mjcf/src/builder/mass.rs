//! Body mass properties.
//!
//! An explicit `<inertial>` wins; otherwise mass, center of mass, and
//! inertia are accumulated from the body's geoms at their default density.
//! Only the diagonal of the combined inertia tensor is kept.

use nalgebra::{Matrix3, Rotation3, Vector3};
use std::f64::consts::PI;

use crate::types::{MjcfGeom, MjcfGeomType, MjcfInertial};

/// MuJoCo's default geom density (water), kg/m³.
const DEFAULT_DENSITY: f64 = 1000.0;

/// Inertia assigned to an explicit `<inertial>` without `diaginertia`.
const DEFAULT_DIAG_INERTIA: f64 = 0.001;

/// Resolved mass properties of one body, in the body frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MassProps {
    /// Total mass.
    pub mass: f64,
    /// Center of mass.
    pub com: Vector3<f64>,
    /// Diagonal of the inertia tensor about `com`.
    pub inertia: Vector3<f64>,
}

/// Mass properties from an explicit inertial or, failing that, the geoms.
pub fn body_mass_props(inertial: Option<&MjcfInertial>, geoms: &[MjcfGeom]) -> MassProps {
    match inertial {
        Some(inertial) => MassProps {
            mass: inertial.mass,
            com: inertial.pos,
            inertia: inertial
                .diaginertia
                .unwrap_or_else(|| Vector3::repeat(DEFAULT_DIAG_INERTIA)),
        },
        None => mass_from_geoms(geoms),
    }
}

fn mass_from_geoms(geoms: &[MjcfGeom]) -> MassProps {
    let parts: Vec<_> = geoms.iter().map(GeomShape::of).collect();

    let mass: f64 = parts.iter().map(|p| p.mass).sum();
    if mass <= 1e-10 {
        return MassProps::default();
    }
    let com = parts.iter().map(|p| p.center * p.mass).sum::<Vector3<f64>>() / mass;

    // Rotate each local tensor into the body frame, then shift to the body COM
    let mut tensor = Matrix3::zeros();
    for p in &parts {
        let local = Matrix3::from_diagonal(&p.local_inertia);
        let d = p.center - com;
        tensor += p.rotation * local * p.rotation.transpose()
            + p.mass * (Matrix3::identity() * d.dot(&d) - d * d.transpose());
    }

    MassProps {
        mass,
        com,
        inertia: tensor.diagonal(),
    }
}

/// One geom's mass and pose, with the symmetry axis along local Z.
struct GeomShape {
    mass: f64,
    center: Vector3<f64>,
    rotation: Matrix3<f64>,
    local_inertia: Vector3<f64>,
}

impl GeomShape {
    fn of(geom: &MjcfGeom) -> Self {
        let geom_type = geom.geom_type.unwrap_or_default();
        let size = |i: usize, fallback: f64| geom.size.get(i).copied().unwrap_or(fallback);

        let (center, rotation, half_length) = match geom.fromto {
            Some(ft) => {
                let a = Vector3::new(ft[0], ft[1], ft[2]);
                let b = Vector3::new(ft[3], ft[4], ft[5]);
                let dir = b - a;
                let rot = Rotation3::rotation_between(&Vector3::z(), &dir)
                    .unwrap_or_else(|| Rotation3::from_axis_angle(&Vector3::x_axis(), PI));
                ((a + b) / 2.0, *rot.matrix(), dir.norm() / 2.0)
            }
            None => (
                geom.pos.unwrap_or_else(Vector3::zeros),
                Matrix3::identity(),
                size(1, 0.0),
            ),
        };

        let r = size(0, 0.0);
        let volume = match geom_type {
            MjcfGeomType::Sphere => 4.0 / 3.0 * PI * r.powi(3),
            MjcfGeomType::Box => 8.0 * r * size(1, r) * size(2, r),
            MjcfGeomType::Capsule => PI * r * r * (2.0 * half_length + 4.0 / 3.0 * r),
            MjcfGeomType::Cylinder => PI * r * r * 2.0 * half_length,
            MjcfGeomType::Ellipsoid => 4.0 / 3.0 * PI * r * size(1, r) * size(2, r),
            MjcfGeomType::Plane => 0.0,
        };
        let mass = match geom_type {
            MjcfGeomType::Plane => 0.0,
            _ => geom
                .mass
                .unwrap_or_else(|| geom.density.unwrap_or(DEFAULT_DENSITY) * volume),
        };

        let local_inertia = match geom_type {
            MjcfGeomType::Sphere => Vector3::repeat(0.4 * mass * r * r),
            MjcfGeomType::Box => {
                let (x, y, z) = (2.0 * r, 2.0 * size(1, r), 2.0 * size(2, r));
                Vector3::new(y * y + z * z, x * x + z * z, x * x + y * y) * (mass / 12.0)
            }
            MjcfGeomType::Cylinder => {
                let h = 2.0 * half_length;
                let ix = mass * (3.0 * r * r + h * h) / 12.0;
                Vector3::new(ix, ix, 0.5 * mass * r * r)
            }
            MjcfGeomType::Capsule => capsule_inertia(mass, r, 2.0 * half_length),
            MjcfGeomType::Ellipsoid => {
                let (a, b, c) = (r, size(1, r), size(2, r));
                Vector3::new(b * b + c * c, a * a + c * c, a * a + b * b) * (mass / 5.0)
            }
            MjcfGeomType::Plane => Vector3::zeros(),
        };

        Self {
            mass,
            center,
            rotation,
            local_inertia,
        }
    }
}

/// Cylinder of height `h` capped by two hemispheres of radius `r`.
fn capsule_inertia(mass: f64, r: f64, h: f64) -> Vector3<f64> {
    let v_cyl = PI * r * r * h;
    let v_sphere = 4.0 / 3.0 * PI * r.powi(3);
    let v_total = v_cyl + v_sphere;
    if v_total <= 0.0 {
        return Vector3::zeros();
    }
    let m_cyl = mass * v_cyl / v_total;
    let m_hemi = mass * v_sphere / (2.0 * v_total);

    let hemi_own = 0.4 * m_hemi * r * r;
    let d = h / 2.0 + 3.0 / 8.0 * r;
    let ix = m_cyl * (3.0 * r * r + h * h) / 12.0 + 2.0 * (hemi_own + m_hemi * d * d);
    let iz = 0.5 * m_cyl * r * r + 2.0 * hemi_own;
    Vector3::new(ix, ix, iz)
}
