use glam::Vec3;

use anno_core::annotation::bbox::AnnotationBox;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self {
            origin,
            dir: dir.normalize_or_zero(),
        }
    }

    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.dir * t
    }
}

/// Ray against an oriented annotation box: transform into the box's
/// local frame and run the slab test against its half extents.
pub fn ray_hits_box(ray: Ray, b: &AnnotationBox) -> Option<f32> {
    let origin = b.world_to_local(ray.origin);
    let dir = b.world_to_local(ray.origin + ray.dir) - origin;
    let half = b.size * 0.5;
    ray_aabb_hit_t(origin, dir, -half, half)
}

/// Slab-method ray-AABB intersection, returns the nearest non-negative t.
pub fn ray_aabb_hit_t(origin: Vec3, dir: Vec3, min: Vec3, max: Vec3) -> Option<f32> {
    let mut tmin = f32::NEG_INFINITY;
    let mut tmax = f32::INFINITY;

    for axis in 0..3 {
        if dir[axis].abs() < f32::EPSILON {
            if origin[axis] < min[axis] || origin[axis] > max[axis] {
                return None;
            }
            continue;
        }
        let inv = 1.0 / dir[axis];
        let mut t0 = (min[axis] - origin[axis]) * inv;
        let mut t1 = (max[axis] - origin[axis]) * inv;
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        tmin = tmin.max(t0);
        tmax = tmax.min(t1);
        if tmin > tmax {
            return None;
        }
    }

    if tmax < 0.0 {
        return None;
    }
    Some(if tmin >= 0.0 { tmin } else { tmax })
}

/// Nearest box hit by the ray, if any. Used for hover detection and
/// box picking.
pub fn hovered_box<'a>(ray: Ray, boxes: &'a [AnnotationBox]) -> Option<(&'a AnnotationBox, f32)> {
    let mut best: Option<(&AnnotationBox, f32)> = None;
    for b in boxes {
        if let Some(t) = ray_hits_box(ray, b) {
            if best.map_or(true, |(_, bt)| t < bt) {
                best = Some((b, t));
            }
        }
    }
    best
}

/// Intersection of the ray with the horizontal plane at height `y`
/// (the rotation ring's plane).
pub fn ray_plane_y(ray: Ray, y: f32) -> Option<Vec3> {
    if ray.dir.y.abs() < f32::EPSILON {
        return None;
    }
    let t = (y - ray.origin.y) / ray.dir.y;
    if t < 0.0 {
        return None;
    }
    Some(ray.point_at(t))
}
