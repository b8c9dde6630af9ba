//! Orthographic globe projection and great-circle interpolation.

/// View of the globe from above one point on its surface.
///
/// Projected coordinates lie in the unit disk, x to the east and y to the
/// north of the view center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orthographic {
    center_lon: f64,
    center_lat: f64,
}

impl Orthographic {
    /// Center the view on `lon`/`lat`, in degrees
    pub fn new(lon: f64, lat: f64) -> Self {
        Self {
            center_lon: lon,
            center_lat: lat.clamp(-90.0, 90.0),
        }
    }

    pub fn center(&self) -> (f64, f64) {
        (self.center_lon, self.center_lat)
    }

    /// Shift the view center by the given degrees
    pub fn rotate(&mut self, dlon: f64, dlat: f64) {
        self.center_lon = (self.center_lon + dlon + 180.0).rem_euclid(360.0) - 180.0;
        self.center_lat = (self.center_lat + dlat).clamp(-90.0, 90.0);
    }

    /// Project a point; `None` when it is on the far side
    pub fn project(&self, lat: f64, lon: f64) -> Option<(f64, f64)> {
        let (phi, lambda) = (lat.to_radians(), lon.to_radians());
        let (phi0, lambda0) = (self.center_lat.to_radians(), self.center_lon.to_radians());
        let dl = lambda - lambda0;

        let cos_c = phi0.sin() * phi.sin() + phi0.cos() * phi.cos() * dl.cos();
        if cos_c < 0.0 {
            return None;
        }

        let x = phi.cos() * dl.sin();
        let y = phi0.cos() * phi.sin() - phi0.sin() * phi.cos() * dl.cos();
        Some((x, y))
    }

    /// Project a path, splitting it wherever it crosses to the far side
    pub fn project_path(&self, points: &[(f64, f64)]) -> Vec<Vec<(f64, f64)>> {
        let mut runs = Vec::new();
        let mut current = Vec::new();

        for &(lat, lon) in points {
            match self.project(lat, lon) {
                Some(p) => current.push(p),
                None if !current.is_empty() => runs.push(std::mem::take(&mut current)),
                None => {}
            }
        }
        if !current.is_empty() {
            runs.push(current);
        }
        runs
    }
}

fn to_vector(lat: f64, lon: f64) -> [f64; 3] {
    let (phi, lambda) = (lat.to_radians(), lon.to_radians());
    [phi.cos() * lambda.cos(), phi.cos() * lambda.sin(), phi.sin()]
}

fn from_vector(v: [f64; 3]) -> (f64, f64) {
    let lat = v[2].clamp(-1.0, 1.0).asin().to_degrees();
    let lon = v[1].atan2(v[0]).to_degrees();
    (lat, lon)
}

/// Points along the shorter great-circle arc from `a` to `b`, endpoints
/// included. Inputs and outputs are `(lat, lon)` in degrees.
pub fn great_circle_path(a: (f64, f64), b: (f64, f64), segments: usize) -> Vec<(f64, f64)> {
    let (va, vb) = (to_vector(a.0, a.1), to_vector(b.0, b.1));
    let dot = (va[0] * vb[0] + va[1] * vb[1] + va[2] * vb[2]).clamp(-1.0, 1.0);
    let omega = dot.acos();
    let sin_omega = omega.sin();

    // Coincident or antipodal endpoints have no unique arc
    if segments < 2 || sin_omega.abs() < 1e-9 {
        return vec![a, b];
    }

    (0..=segments)
        .map(|i| {
            let t = i as f64 / segments as f64;
            let wa = ((1.0 - t) * omega).sin() / sin_omega;
            let wb = (t * omega).sin() / sin_omega;
            from_vector([
                wa * va[0] + wb * vb[0],
                wa * va[1] + wb * vb[1],
                wa * va[2] + wb * vb[2],
            ])
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_projects_to_origin() {
        let proj = Orthographic::new(-45.0, 10.0);
        let (x, y) = proj.project(10.0, -45.0).unwrap();
        assert!(x.abs() < 1e-9 && y.abs() < 1e-9);
    }

    #[test]
    fn test_far_side_is_hidden() {
        let proj = Orthographic::new(-45.0, 10.0);
        assert!(proj.project(-10.0, 135.0).is_none());
    }

    #[test]
    fn test_east_is_positive_x() {
        let proj = Orthographic::new(0.0, 0.0);
        let (x, y) = proj.project(0.0, 90.0).unwrap();
        assert!((x - 1.0).abs() < 1e-9);
        assert!(y.abs() < 1e-9);
    }

    #[test]
    fn test_rotate_wraps_longitude() {
        let mut proj = Orthographic::new(170.0, 80.0);
        proj.rotate(20.0, 20.0);
        let (lon, lat) = proj.center();
        assert!((lon + 170.0).abs() < 1e-9);
        assert_eq!(lat, 90.0);
    }

    #[test]
    fn test_great_circle_path_endpoints() {
        let path = great_circle_path((25.79, -80.29), (-34.82, -58.54), 16);
        assert_eq!(path.len(), 17);
        let (first, last) = (path[0], path[16]);
        assert!((first.0 - 25.79).abs() < 1e-6 && (first.1 + 80.29).abs() < 1e-6);
        assert!((last.0 + 34.82).abs() < 1e-6 && (last.1 + 58.54).abs() < 1e-6);
    }

    #[test]
    fn test_path_split_at_horizon() {
        let proj = Orthographic::new(0.0, 0.0);
        let runs = proj.project_path(&[(0.0, 0.0), (0.0, 120.0), (0.0, 60.0)]);
        assert_eq!(runs.len(), 2);
    }
}
