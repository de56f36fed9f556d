use glam::{Quat, Vec3};

/// Result of fitting a yaw-only oriented bounding box to a point set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FittedObb {
    pub center: Vec3,
    pub size: Vec3,
    pub yaw: f32,
}

/// Fit an oriented bounding box to a point set, restricting rotation to
/// yaw. The in-plane principal axis comes from 2D PCA over the X/Z
/// components; the points are transformed into the inverse-yaw frame,
/// boxed axis-aligned there, and the center rotated back out.
pub fn fit_yaw_obb(points: &[Vec3]) -> FittedObb {
    if points.is_empty() {
        return FittedObb {
            center: Vec3::ZERO,
            size: Vec3::ZERO,
            yaw: 0.0,
        };
    }

    let yaw = principal_xz_yaw(points);
    let unrotate = Quat::from_rotation_y(-yaw);

    let mut min = Vec3::splat(f32::MAX);
    let mut max = Vec3::splat(f32::MIN);
    for p in points {
        let q = unrotate * *p;
        min = min.min(q);
        max = max.max(q);
    }

    let center_local = (min + max) * 0.5;
    FittedObb {
        center: Quat::from_rotation_y(yaw) * center_local,
        size: max - min,
        yaw,
    }
}

/// Yaw of the principal XZ axis of the point set, expressed as a
/// rotation about +Y. Degenerate distributions (fewer than two points,
/// zero in-plane variance) fall back to yaw 0 so the caller still gets
/// an axis-aligned box.
fn principal_xz_yaw(points: &[Vec3]) -> f32 {
    if points.len() < 2 {
        return 0.0;
    }

    let n = points.len() as f32;
    let mean_x = points.iter().map(|p| p.x).sum::<f32>() / n;
    let mean_z = points.iter().map(|p| p.z).sum::<f32>() / n;

    let mut sxx = 0.0f32;
    let mut szz = 0.0f32;
    let mut sxz = 0.0f32;
    for p in points {
        let dx = p.x - mean_x;
        let dz = p.z - mean_z;
        sxx += dx * dx;
        szz += dz * dz;
        sxz += dx * dz;
    }

    if sxx + szz < 1e-12 {
        log::warn!("degenerate point distribution, falling back to yaw 0");
        return 0.0;
    }

    // Angle of the major covariance axis, measured from +X toward +Z;
    // a positive yaw about +Y turns +X toward -Z, hence the negation.
    let axis_angle = 0.5 * (2.0 * sxz).atan2(sxx - szz);
    -axis_angle
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local_coords(fit: &FittedObb, p: Vec3) -> Vec3 {
        Quat::from_rotation_y(-fit.yaw) * p - Quat::from_rotation_y(-fit.yaw) * fit.center
    }

    fn assert_contains_all(fit: &FittedObb, points: &[Vec3]) {
        let half = fit.size * 0.5;
        for p in points {
            let local = local_coords(fit, *p);
            assert!(
                local.x.abs() <= half.x + 1e-4
                    && local.y.abs() <= half.y + 1e-4
                    && local.z.abs() <= half.z + 1e-4,
                "point {:?} outside fitted box {:?}",
                p,
                fit
            );
        }
    }

    #[test]
    fn axis_aligned_input_is_fit_axis_aligned() {
        // Elongated along X with zero yaw; PCA must not invent one.
        let points = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(4.0, 0.0, 0.0),
            Vec3::new(2.0, 1.0, 1.0),
            Vec3::new(2.0, -1.0, -1.0),
        ];
        let fit = fit_yaw_obb(&points);
        assert!(fit.yaw.abs() < 1e-4, "yaw = {}", fit.yaw);
        assert!((fit.center - Vec3::new(2.0, 0.0, 0.0)).length() < 1e-4);
        assert!((fit.size - Vec3::new(4.0, 2.0, 2.0)).length() < 1e-4);
    }

    #[test]
    fn rotated_line_recovers_its_yaw() {
        // Points along the diagonal at 30 degrees from +X toward +Z.
        let angle = 30f32.to_radians();
        let dir = Vec3::new(angle.cos(), 0.0, angle.sin());
        let points: Vec<Vec3> = (0..10).map(|i| dir * i as f32 * 0.5).collect();
        let fit = fit_yaw_obb(&points);
        // The fitted box's local X axis must line up with the point
        // direction, so the footprint collapses to a line in Z.
        assert!(fit.size.z.abs() < 1e-3, "size = {:?}", fit.size);
        assert!((fit.size.x - 4.5).abs() < 1e-3);
        assert_contains_all(&fit, &points);
    }

    #[test]
    fn fitted_box_contains_every_input_point() {
        let yaw = 0.6f32;
        let rot = Quat::from_rotation_y(yaw);
        let points: Vec<Vec3> = [
            Vec3::new(-2.0, 0.0, -0.5),
            Vec3::new(2.0, 0.5, 0.5),
            Vec3::new(1.0, 1.0, -0.25),
            Vec3::new(-1.5, -0.5, 0.25),
        ]
        .iter()
        .map(|p| rot * *p + Vec3::new(5.0, 1.0, -3.0))
        .collect();
        let fit = fit_yaw_obb(&points);
        assert_contains_all(&fit, &points);
    }

    #[test]
    fn degenerate_sets_fall_back_to_zero_yaw() {
        assert_eq!(fit_yaw_obb(&[]).yaw, 0.0);

        let single = fit_yaw_obb(&[Vec3::new(1.0, 2.0, 3.0)]);
        assert_eq!(single.yaw, 0.0);
        assert!((single.center - Vec3::new(1.0, 2.0, 3.0)).length() < 1e-6);
        assert_eq!(single.size, Vec3::ZERO);

        // Coincident points: zero variance everywhere.
        let coincident = fit_yaw_obb(&[Vec3::ONE; 5]);
        assert_eq!(coincident.yaw, 0.0);

        // A vertical line has no in-plane spread either.
        let vertical: Vec<Vec3> = (0..5).map(|i| Vec3::new(1.0, i as f32, 2.0)).collect();
        assert_eq!(fit_yaw_obb(&vertical).yaw, 0.0);
    }
}
