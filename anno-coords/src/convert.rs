use std::f32::consts::FRAC_PI_2;

use glam::{Quat, Vec3};

use anno_core::annotation::bbox::EulerRotation;
use anno_core::annotation::dataset::EgoPose;

// Two conventions exist. Backend (LIDAR/cuboid): right-handed, Z up,
// Y lateral. Render: right-handed, Y up, Z lateral (negated). Both
// position maps below are the fixed -90deg-about-X rotation and its
// inverse, written out componentwise. NaN/Infinity inputs propagate.

/// Backend position -> render position: (x, y, z) -> (x, z, -y).
pub fn backend_to_render(p: Vec3) -> Vec3 {
    Vec3::new(p.x, p.z, -p.y)
}

/// Render position -> backend position: (x, y, z) -> (x, -z, y).
/// Exact inverse of [`backend_to_render`].
pub fn render_to_backend(p: Vec3) -> Vec3 {
    Vec3::new(p.x, -p.z, p.y)
}

/// Sizes are unsigned extents, so the lateral/vertical swap carries no
/// sign flip: (x, y, z) -> (x, z, y). The swap is its own inverse.
pub fn backend_size_to_render(size: Vec3) -> Vec3 {
    Vec3::new(size.x, size.z, size.y)
}

pub fn render_size_to_backend(size: Vec3) -> Vec3 {
    backend_size_to_render(size)
}

/// The fixed correction quaternion: -90deg about X. Applying it to a
/// vector is exactly [`backend_to_render`].
pub fn axis_correction() -> Quat {
    Quat::from_rotation_x(-FRAC_PI_2)
}

/// Backend rotation -> render rotation. The correction conjugates the
/// quaternion so that converted rotations act on converted points the
/// same way the original rotation acted on backend points; a backend
/// yaw about Z becomes a render yaw about Y with the same angle.
pub fn backend_rotation_to_render(q: Quat) -> Quat {
    let fix = axis_correction();
    fix * q * fix.inverse()
}

/// Exact inverse of [`backend_rotation_to_render`].
pub fn render_rotation_to_backend(q: Quat) -> Quat {
    let fix = axis_correction();
    fix.inverse() * q * fix
}

/// Render-space yaw: the Euler Y component (Y is up in render space).
pub fn render_yaw(euler: &EulerRotation) -> f32 {
    euler.y
}

/// Backend-space yaw: the Euler Z component (Z is up in the backend
/// convention).
pub fn backend_yaw(q: Quat) -> f32 {
    let (_, _, z) = q.to_euler(glam::EulerRot::XYZ);
    z
}

/// Backend position -> render position with the dataset ego offset
/// removed first (backend positions are absolute, render positions are
/// ego-relative).
pub fn backend_position_to_render(p: Vec3, ego: Option<&EgoPose>) -> Vec3 {
    let centered = match ego {
        Some(ego) => p - ego.position,
        None => p,
    };
    backend_to_render(centered)
}

/// Render position -> absolute backend position (ego offset re-added).
pub fn render_position_to_backend(p: Vec3, ego: Option<&EgoPose>) -> Vec3 {
    let backend = render_to_backend(p);
    match ego {
        Some(ego) => backend + ego.position,
        None => backend,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;

    const TOL: f32 = 1e-5;

    fn assert_vec3_eq(a: Vec3, b: Vec3) {
        assert!((a - b).length() < TOL, "{:?} != {:?}", a, b);
    }

    // Componentwise up to the double-cover sign; robust where
    // angle_between loses precision near zero.
    fn assert_quat_eq(a: Quat, b: Quat) {
        let sign = if a.dot(b) < 0.0 { -1.0 } else { 1.0 };
        assert!((a - b * sign).length() < TOL, "{:?} != {:?}", a, b);
    }

    #[test]
    fn position_round_trip() {
        for p in [
            Vec3::new(1.0, 2.0, 3.0),
            Vec3::new(-4.5, 0.0, 12.25),
            Vec3::new(0.001, -0.001, 1000.0),
        ] {
            assert_vec3_eq(render_to_backend(backend_to_render(p)), p);
            assert_vec3_eq(backend_to_render(render_to_backend(p)), p);
        }
    }

    #[test]
    fn position_axes() {
        assert_vec3_eq(backend_to_render(Vec3::new(1.0, 2.0, 3.0)), Vec3::new(1.0, 3.0, -2.0));
        assert_vec3_eq(render_to_backend(Vec3::new(1.0, 3.0, -2.0)), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn size_swap_is_self_inverse() {
        let s = Vec3::new(2.0, 3.0, 4.0);
        assert_vec3_eq(backend_size_to_render(s), Vec3::new(2.0, 4.0, 3.0));
        assert_vec3_eq(render_size_to_backend(backend_size_to_render(s)), s);
    }

    #[test]
    fn rotation_round_trip() {
        for q in [
            Quat::from_rotation_z(0.8),
            Quat::from_euler(glam::EulerRot::XYZ, 0.1, -0.4, 1.2),
            Quat::IDENTITY,
        ] {
            let back = render_rotation_to_backend(backend_rotation_to_render(q));
            assert_quat_eq(q, back);
        }
    }

    // A converted rotation must act on converted points the same way the
    // original rotation acts on backend points. This pins down the
    // conjugation form; a bare left-multiply fails it.
    #[test]
    fn rotation_commutes_with_position_conversion() {
        let q = Quat::from_euler(glam::EulerRot::XYZ, 0.3, 0.7, -0.2);
        let p = Vec3::new(1.0, -2.0, 0.5);
        let rotated_then_converted = backend_to_render(q * p);
        let converted_then_rotated = backend_rotation_to_render(q) * backend_to_render(p);
        assert_vec3_eq(rotated_then_converted, converted_then_rotated);
    }

    // The yaw axis follows each convention's up axis: backend yaw about
    // Z maps to the same angle about render Y.
    #[test]
    fn yaw_axis_pairing() {
        let angle = 0.65;
        let render = backend_rotation_to_render(Quat::from_rotation_z(angle));
        assert_quat_eq(render, Quat::from_rotation_y(angle));

        let backend = render_rotation_to_backend(Quat::from_rotation_y(angle));
        assert!((backend_yaw(backend) - angle).abs() < TOL);
    }

    #[test]
    fn ego_offset_round_trip() {
        let ego = EgoPose {
            position: Vec3::new(10.0, 20.0, 1.5),
            heading: Quat::IDENTITY,
        };
        let p = Vec3::new(12.0, 19.0, 2.0);
        let render = backend_position_to_render(p, Some(&ego));
        assert_vec3_eq(render_position_to_backend(render, Some(&ego)), p);
        assert_vec3_eq(render, backend_to_render(Vec3::new(2.0, -1.0, 0.5)));
    }

    #[test]
    fn nan_propagates() {
        let p = backend_to_render(Vec3::new(f32::NAN, 1.0, 2.0));
        assert!(p.x.is_nan());
    }
}
