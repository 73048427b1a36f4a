pub struct GeometryHelper;

impl GeometryHelper {
    /// Angle in degrees at `vertex`, formed by the rays toward `a` and `c`.
    ///
    /// Planar: only x and y participate, depth is ignored. A zero norm
    /// product (coincident points) yields 0.0 instead of NaN.
    pub fn angle_degrees(a: (f32, f32), vertex: (f32, f32), c: (f32, f32)) -> f32 {
        let v1 = (a.0 - vertex.0, a.1 - vertex.1);
        let v2 = (c.0 - vertex.0, c.1 - vertex.1);
        let dot = v1.0 * v2.0 + v1.1 * v2.1;
        let norms = v1.0.hypot(v1.1) * v2.0.hypot(v2.1);
        if norms == 0.0 {
            return 0.0;
        }
        (dot / norms).clamp(-1.0, 1.0).acos().to_degrees()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collinear_points_with_vertex_between_measure_straight() {
        let angle = GeometryHelper::angle_degrees((0.0, 0.0), (0.5, 0.0), (1.0, 0.0));
        assert!((angle - 180.0).abs() < 1e-4);
    }

    #[test]
    fn coincident_endpoints_measure_zero() {
        let angle = GeometryHelper::angle_degrees((0.2, 0.3), (0.5, 0.5), (0.2, 0.3));
        assert!(angle.abs() < 1e-4);
    }

    #[test]
    fn perpendicular_rays_measure_ninety() {
        let angle = GeometryHelper::angle_degrees((1.0, 0.0), (0.0, 0.0), (0.0, 1.0));
        assert!((angle - 90.0).abs() < 1e-4);
    }

    #[test]
    fn degenerate_vertex_yields_zero_not_nan() {
        let angle = GeometryHelper::angle_degrees((0.5, 0.5), (0.5, 0.5), (0.7, 0.7));
        assert_eq!(angle, 0.0);
    }
}
