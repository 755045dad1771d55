//! Clough-Tocher C1 piecewise-cubic interpolation on a Delaunay triangulation.
//!
//! Each triangle is split at its centroid into three cubic Bezier patches.
//! Vertex gradients are estimated globally by minimising the curvature of the
//! interpolant along triangle edges.

use super::delaunay::Triangulation;

/// Convergence tolerance of the gradient estimation.
pub const GRADIENT_TOL: f64 = 1e-6;

/// Maximum number of gradient estimation sweeps.
pub const GRADIENT_MAX_ITER: usize = 400;

/// A fitted Clough-Tocher interpolant.
#[derive(Debug, Clone)]
pub struct CloughTocher2D {
    triangulation: Triangulation,
    values: Vec<f64>,
    gradients: Vec<[f64; 2]>,
    /// Value for query points outside the convex hull.
    pub fill_value: f64,
}

impl CloughTocher2D {
    /// Fit an interpolant to scattered points and their values.
    ///
    /// `points` and `values` must have the same length.
    pub fn fit(points: &[[f64; 2]], values: &[f64], fill_value: f64) -> Self {
        debug_assert_eq!(points.len(), values.len());
        let triangulation = Triangulation::new(points);
        let gradients =
            estimate_gradients(&triangulation, values, GRADIENT_TOL, GRADIENT_MAX_ITER);
        Self {
            triangulation,
            values: values.to_vec(),
            gradients,
            fill_value,
        }
    }

    pub fn triangulation(&self) -> &Triangulation {
        &self.triangulation
    }

    /// Estimated gradient at each input point.
    pub fn gradients(&self) -> &[[f64; 2]] {
        &self.gradients
    }

    /// Evaluate at `(x, y)`; points outside the hull get `fill_value`.
    pub fn evaluate(&self, x: f64, y: f64) -> f64 {
        let mut hint = None;
        self.evaluate_with_hint(x, y, &mut hint).0
    }

    /// Evaluate at `(x, y)` starting the triangle search at `hint`, which is
    /// updated to the containing triangle. Returns the value and whether the
    /// point was inside the hull.
    pub fn evaluate_with_hint(&self, x: f64, y: f64, hint: &mut Option<usize>) -> (f64, bool) {
        match self.triangulation.locate(x, y, *hint) {
            Some((t, b)) => {
                *hint = Some(t);
                (self.evaluate_in(t, b), true)
            }
            None => (self.fill_value, false),
        }
    }

    fn evaluate_in(&self, t: usize, b: [f64; 3]) -> f64 {
        let tri = &self.triangulation;
        let v = tri.triangles[t];
        let p = v.map(|i| tri.points[i]);
        let f = v.map(|i| self.values[i]);
        let df = v.map(|i| self.gradients[i]);

        let e12 = [p[1][0] - p[0][0], p[1][1] - p[0][1]];
        let e23 = [p[2][0] - p[1][0], p[2][1] - p[1][1]];
        let e31 = [p[0][0] - p[2][0], p[0][1] - p[2][1]];
        let dot = |g: [f64; 2], e: [f64; 2]| g[0] * e[0] + g[1] * e[1];

        // Directional derivatives along the edges.
        let df12 = dot(df[0], e12);
        let df21 = -dot(df[1], e12);
        let df23 = dot(df[1], e23);
        let df32 = -dot(df[2], e23);
        let df31 = dot(df[2], e31);
        let df13 = -dot(df[0], e31);

        // Bezier ordinates; cIJKL weights vertices 1, 2, 3 and the centroid.
        let c3000 = f[0];
        let c2100 = (df12 + 3.0 * c3000) / 3.0;
        let c2010 = (df13 + 3.0 * c3000) / 3.0;
        let c0300 = f[1];
        let c1200 = (df21 + 3.0 * c0300) / 3.0;
        let c0210 = (df23 + 3.0 * c0300) / 3.0;
        let c0030 = f[2];
        let c1020 = (df31 + 3.0 * c0030) / 3.0;
        let c0120 = (df32 + 3.0 * c0030) / 3.0;

        let c2001 = (c2100 + c2010 + c3000) / 3.0;
        let c0201 = (c1200 + c0300 + c0210) / 3.0;
        let c0021 = (c1020 + c0120 + c0030) / 3.0;

        // Cross-boundary derivative weights. An edge without a neighbour uses
        // the derivative towards our own centroid.
        let mut g = [-0.5; 3];
        for (k, gk) in g.iter_mut().enumerate() {
            let Some(other) = tri.neighbors[t][k] else {
                continue;
            };
            let q = tri.triangles[other].map(|i| tri.points[i]);
            let cx = (q[0][0] + q[1][0] + q[2][0]) / 3.0;
            let cy = (q[0][1] + q[1][1] + q[2][1]) / 3.0;
            let c = tri.barycentric(t, cx, cy);
            *gk = match k {
                0 => (2.0 * c[2] + c[1] - 1.0) / (2.0 - 3.0 * c[2] - 3.0 * c[1]),
                1 => (2.0 * c[0] + c[2] - 1.0) / (2.0 - 3.0 * c[0] - 3.0 * c[2]),
                _ => (2.0 * c[1] + c[0] - 1.0) / (2.0 - 3.0 * c[1] - 3.0 * c[0]),
            };
        }

        let c0111 = (g[0] * (-c0300 + 3.0 * c0210 - 3.0 * c0120 + c0030)
            + (-c0300 + 2.0 * c0210 - c0120 + c0021 + c0201))
            / 2.0;
        let c1011 = (g[1] * (-c0030 + 3.0 * c1020 - 3.0 * c2010 + c3000)
            + (-c0030 + 2.0 * c1020 - c2010 + c2001 + c0021))
            / 2.0;
        let c1101 = (g[2] * (-c3000 + 3.0 * c2100 - 3.0 * c1200 + c0300)
            + (-c3000 + 2.0 * c2100 - c1200 + c2001 + c0201))
            / 2.0;

        let c1002 = (c1101 + c1011 + c2001) / 3.0;
        let c0102 = (c1101 + c0111 + c0201) / 3.0;
        let c0012 = (c1011 + c0111 + c0021) / 3.0;
        let c0003 = (c1002 + c0102 + c0012) / 3.0;

        // Barycentric coordinates within the micro-triangle.
        let minval = b[0].min(b[1]).min(b[2]);
        let b1 = b[0] - minval;
        let b2 = b[1] - minval;
        let b3 = b[2] - minval;
        let b4 = 3.0 * minval;

        if b[0] == minval {
            b2.powi(3) * c0300
                + 3.0 * b2.powi(2) * b3 * c0210
                + 3.0 * b2 * b3.powi(2) * c0120
                + b3.powi(3) * c0030
                + 3.0 * b2.powi(2) * b4 * c0201
                + 6.0 * b2 * b3 * b4 * c0111
                + 3.0 * b3.powi(2) * b4 * c0021
                + 3.0 * b2 * b4.powi(2) * c0102
                + 3.0 * b3 * b4.powi(2) * c0012
                + b4.powi(3) * c0003
        } else if b[1] == minval {
            b1.powi(3) * c3000
                + 3.0 * b1.powi(2) * b3 * c2010
                + 3.0 * b1 * b3.powi(2) * c1020
                + b3.powi(3) * c0030
                + 3.0 * b1.powi(2) * b4 * c2001
                + 6.0 * b1 * b3 * b4 * c1011
                + 3.0 * b3.powi(2) * b4 * c0021
                + 3.0 * b1 * b4.powi(2) * c1002
                + 3.0 * b3 * b4.powi(2) * c0012
                + b4.powi(3) * c0003
        } else {
            b1.powi(3) * c3000
                + 3.0 * b1.powi(2) * b2 * c2100
                + 3.0 * b1 * b2.powi(2) * c1200
                + b2.powi(3) * c0300
                + 3.0 * b1.powi(2) * b4 * c2001
                + 6.0 * b1 * b2 * b4 * c1101
                + 3.0 * b2.powi(2) * b4 * c0201
                + 3.0 * b1 * b4.powi(2) * c1002
                + 3.0 * b2 * b4.powi(2) * c0102
                + b4.powi(3) * c0003
        }
    }
}

/// Estimate vertex gradients by Gauss-Seidel sweeps over the local
/// least-curvature conditions. Vertices outside every triangle keep a zero
/// gradient.
pub fn estimate_gradients(
    tri: &Triangulation,
    values: &[f64],
    tol: f64,
    max_iter: usize,
) -> Vec<[f64; 2]> {
    let n = tri.points.len();
    let mut grad = vec![[0.0; 2]; n];
    if tri.is_empty() {
        return grad;
    }
    let adjacency = tri.vertex_neighbors();

    for _ in 0..max_iter {
        let mut err = 0.0f64;
        for i in 0..n {
            if adjacency[i].is_empty() {
                continue;
            }
            let mut q = [0.0f64; 3];
            let mut s = [0.0f64; 2];
            for &j in &adjacency[i] {
                let ex = tri.points[j][0] - tri.points[i][0];
                let ey = tri.points[j][1] - tri.points[i][1];
                let l = ex.hypot(ey);
                let l3 = l * l * l;
                if l3 == 0.0 {
                    continue;
                }
                let df2 = -ex * grad[j][0] - ey * grad[j][1];
                let rhs = 6.0 * (values[i] - values[j]) - 2.0 * df2;
                q[0] += 4.0 * ex * ex / l3;
                q[1] += 4.0 * ex * ey / l3;
                q[2] += 4.0 * ey * ey / l3;
                s[0] += rhs * ex / l3;
                s[1] += rhs * ey / l3;
            }

            let det = q[0] * q[2] - q[1] * q[1];
            if det.abs() <= f64::EPSILON * (q[0] * q[2]).abs() {
                continue;
            }
            let r0 = (q[2] * s[0] - q[1] * s[1]) / det;
            let r1 = (-q[1] * s[0] + q[0] * s[1]) / det;

            let change = (grad[i][0] + r0).abs().max((grad[i][1] + r1).abs());
            grad[i] = [-r0, -r1];
            err = err.max(change / r0.abs().max(r1.abs()).max(1.0));
        }
        if err < tol {
            break;
        }
    }
    grad
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plane(x: f64, y: f64) -> f64 {
        3.0 - 0.5 * x + 2.0 * y
    }

    #[test]
    fn test_gradients_of_plane_are_exact() {
        let points = [
            [0.0, 0.0],
            [4.0, 0.0],
            [0.0, 4.0],
            [4.0, 4.0],
            [2.0, 1.0],
            [1.0, 3.0],
        ];
        let values: Vec<f64> = points.iter().map(|p| plane(p[0], p[1])).collect();
        let ct = CloughTocher2D::fit(&points, &values, f64::NAN);
        for g in ct.gradients() {
            assert!((g[0] + 0.5).abs() < 1e-4, "gx = {}", g[0]);
            assert!((g[1] - 2.0).abs() < 1e-4, "gy = {}", g[1]);
        }
    }

    #[test]
    fn test_reproduces_plane_inside_hull() {
        let points = [[0.0, 0.0], [10.0, 0.0], [0.0, 10.0], [10.0, 10.0], [4.0, 6.0]];
        let values: Vec<f64> = points.iter().map(|p| plane(p[0], p[1])).collect();
        let ct = CloughTocher2D::fit(&points, &values, -1.0);
        for &(x, y) in &[(1.0, 1.0), (5.0, 5.0), (9.5, 0.5), (2.0, 8.0)] {
            assert!((ct.evaluate(x, y) - plane(x, y)).abs() < 1e-4);
        }
    }

    #[test]
    fn test_interpolates_vertex_values() {
        let points = [[0.0, 0.0], [10.0, 0.0], [0.0, 10.0], [7.0, 8.0]];
        let values = [1.0, 5.0, -2.0, 9.0];
        let ct = CloughTocher2D::fit(&points, &values, 0.0);
        for (p, v) in points.iter().zip(values) {
            assert!((ct.evaluate(p[0], p[1]) - v).abs() < 1e-9);
        }
    }

    #[test]
    fn test_outside_hull_uses_fill_value() {
        let points = [[0.0, 0.0], [10.0, 0.0], [0.0, 10.0]];
        let ct = CloughTocher2D::fit(&points, &[1.0, 2.0, 3.0], 42.0);
        assert_eq!(ct.evaluate(9.0, 9.0), 42.0);
        assert_eq!(ct.evaluate(-1.0, 0.0), 42.0);

        let mut hint = None;
        let (value, inside) = ct.evaluate_with_hint(1.0, 1.0, &mut hint);
        assert!(inside);
        assert!(hint.is_some());
        assert!(value.is_finite());
    }
}
