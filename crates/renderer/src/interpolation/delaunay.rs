//! Delaunay triangulation of scattered points (Bowyer-Watson).
//!
//! Input order matters only for exactly co-circular configurations, so callers
//! sort points first to keep the result deterministic.

use std::collections::{BTreeSet, HashMap};

/// Relative tolerance for the in-circumcircle test.
const CIRCLE_EPS: f64 = 1e-12;

/// Triangles whose normalized area falls below this are dropped.
const MIN_AREA: f64 = 1e-12;

/// Barycentric tolerance when deciding whether a point lies in a triangle.
pub const HULL_EPS: f64 = 1e-9;

/// A triangulation of a point set.
///
/// Triangles are counter-clockwise in (x, y). `neighbors[t][k]` is the
/// triangle sharing the edge opposite vertex `k` of triangle `t`, if any.
#[derive(Debug, Clone)]
pub struct Triangulation {
    pub points: Vec<[f64; 2]>,
    pub triangles: Vec<[usize; 3]>,
    pub neighbors: Vec<[Option<usize>; 3]>,
    bounds: Vec<[f64; 4]>,
}

#[derive(Debug, Clone, Copy)]
struct WorkTriangle {
    v: [usize; 3],
    cx: f64,
    cy: f64,
    r2: f64,
}

impl Triangulation {
    /// Triangulate `points`. Fewer than three points, or points that are all
    /// collinear, produce a triangulation without triangles.
    pub fn new(points: &[[f64; 2]]) -> Self {
        let triangles = bowyer_watson(points);
        let neighbors = build_neighbors(&triangles);
        let bounds = triangles
            .iter()
            .map(|t| {
                let xs = t.map(|v| points[v][0]);
                let ys = t.map(|v| points[v][1]);
                [
                    xs.iter().copied().fold(f64::INFINITY, f64::min),
                    xs.iter().copied().fold(f64::NEG_INFINITY, f64::max),
                    ys.iter().copied().fold(f64::INFINITY, f64::min),
                    ys.iter().copied().fold(f64::NEG_INFINITY, f64::max),
                ]
            })
            .collect();
        Self {
            points: points.to_vec(),
            triangles,
            neighbors,
            bounds,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Barycentric coordinates of `(x, y)` with respect to triangle `t`.
    pub fn barycentric(&self, t: usize, x: f64, y: f64) -> [f64; 3] {
        let [a, b, c] = self.triangles[t].map(|v| self.points[v]);
        let det = (b[1] - c[1]) * (a[0] - c[0]) + (c[0] - b[0]) * (a[1] - c[1]);
        let b0 = ((b[1] - c[1]) * (x - c[0]) + (c[0] - b[0]) * (y - c[1])) / det;
        let b1 = ((c[1] - a[1]) * (x - c[0]) + (a[0] - c[0]) * (y - c[1])) / det;
        [b0, b1, 1.0 - b0 - b1]
    }

    /// Find a triangle containing `(x, y)`, trying `hint` first.
    ///
    /// Returns the triangle index and the barycentric coordinates, or `None`
    /// when the point is outside the convex hull. Among several containing
    /// triangles (points on a shared edge) the hint or the lowest index wins.
    pub fn locate(&self, x: f64, y: f64, hint: Option<usize>) -> Option<(usize, [f64; 3])> {
        if let Some(t) = hint.filter(|&t| t < self.triangles.len()) {
            let b = self.barycentric(t, x, y);
            if inside(&b) {
                return Some((t, b));
            }
        }
        for (t, bb) in self.bounds.iter().enumerate() {
            let slack = HULL_EPS * (1.0 + (bb[1] - bb[0]).max(bb[3] - bb[2]));
            if x < bb[0] - slack || x > bb[1] + slack || y < bb[2] - slack || y > bb[3] + slack {
                continue;
            }
            let b = self.barycentric(t, x, y);
            if inside(&b) {
                return Some((t, b));
            }
        }
        None
    }

    /// Vertices connected to each vertex by a triangle edge, in ascending order.
    pub fn vertex_neighbors(&self) -> Vec<Vec<usize>> {
        let mut sets: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); self.points.len()];
        for t in &self.triangles {
            for k in 0..3 {
                let a = t[k];
                let b = t[(k + 1) % 3];
                sets[a].insert(b);
                sets[b].insert(a);
            }
        }
        sets.into_iter().map(|s| s.into_iter().collect()).collect()
    }
}

fn inside(b: &[f64; 3]) -> bool {
    b.iter().all(|&v| v >= -HULL_EPS)
}

/// Twice the signed area of (a, b, c); positive when counter-clockwise.
fn orient(a: [f64; 2], b: [f64; 2], c: [f64; 2]) -> f64 {
    (b[0] - a[0]) * (c[1] - a[1]) - (b[1] - a[1]) * (c[0] - a[0])
}

fn circumcircle(p: &[[f64; 2]], v: [usize; 3]) -> (f64, f64, f64) {
    let [a, b, c] = v.map(|i| p[i]);
    let d = 2.0 * (a[0] * (b[1] - c[1]) + b[0] * (c[1] - a[1]) + c[0] * (a[1] - b[1]));
    if d.abs() < 1e-300 {
        // Collinear: every later point counts as inside.
        return (0.0, 0.0, f64::INFINITY);
    }
    let a2 = a[0] * a[0] + a[1] * a[1];
    let b2 = b[0] * b[0] + b[1] * b[1];
    let c2 = c[0] * c[0] + c[1] * c[1];
    let cx = (a2 * (b[1] - c[1]) + b2 * (c[1] - a[1]) + c2 * (a[1] - b[1])) / d;
    let cy = (a2 * (c[0] - b[0]) + b2 * (a[0] - c[0]) + c2 * (b[0] - a[0])) / d;
    let r2 = (a[0] - cx).powi(2) + (a[1] - cy).powi(2);
    (cx, cy, r2)
}

fn make_triangle(p: &[[f64; 2]], mut v: [usize; 3]) -> WorkTriangle {
    if orient(p[v[0]], p[v[1]], p[v[2]]) < 0.0 {
        v.swap(1, 2);
    }
    let (cx, cy, r2) = circumcircle(p, v);
    WorkTriangle { v, cx, cy, r2 }
}

fn bowyer_watson(points: &[[f64; 2]]) -> Vec<[usize; 3]> {
    let n = points.len();
    if n < 3 {
        return Vec::new();
    }

    // Work in a normalized frame so tolerances are scale free.
    let (mut x0, mut x1, mut y0, mut y1) = (f64::INFINITY, f64::NEG_INFINITY, f64::INFINITY, f64::NEG_INFINITY);
    for p in points {
        x0 = x0.min(p[0]);
        x1 = x1.max(p[0]);
        y0 = y0.min(p[1]);
        y1 = y1.max(p[1]);
    }
    let scale = (x1 - x0).max(y1 - y0);
    if scale <= 0.0 || !scale.is_finite() {
        return Vec::new();
    }
    let (cx, cy) = ((x0 + x1) / 2.0, (y0 + y1) / 2.0);
    let mut work: Vec<[f64; 2]> = points
        .iter()
        .map(|p| [(p[0] - cx) / scale, (p[1] - cy) / scale])
        .collect();

    // Super triangle, far outside the unit box.
    work.push([-100.0, -100.0]);
    work.push([100.0, -100.0]);
    work.push([0.0, 100.0]);

    let mut tris = vec![make_triangle(&work, [n, n + 1, n + 2])];

    for i in 0..n {
        let p = work[i];
        let mut edge_count: HashMap<(usize, usize), usize> = HashMap::new();
        let mut boundary: Vec<(usize, usize)> = Vec::new();
        let mut kept = Vec::with_capacity(tris.len() + 2);

        for tri in tris.drain(..) {
            let d2 = (p[0] - tri.cx).powi(2) + (p[1] - tri.cy).powi(2);
            if d2 < tri.r2 * (1.0 - CIRCLE_EPS) {
                for k in 0..3 {
                    let e = (tri.v[k], tri.v[(k + 1) % 3]);
                    let key = (e.0.min(e.1), e.0.max(e.1));
                    let count = edge_count.entry(key).or_insert(0);
                    if *count == 0 {
                        boundary.push(e);
                    }
                    *count += 1;
                }
            } else {
                kept.push(tri);
            }
        }

        for (a, b) in boundary {
            if edge_count[&(a.min(b), a.max(b))] == 1 {
                kept.push(make_triangle(&work, [a, b, i]));
            }
        }
        tris = kept;
    }

    tris.into_iter()
        .filter(|t| t.v.iter().all(|&v| v < n))
        .filter(|t| orient(work[t.v[0]], work[t.v[1]], work[t.v[2]]).abs() > MIN_AREA)
        .map(|t| t.v)
        .collect()
}

fn build_neighbors(triangles: &[[usize; 3]]) -> Vec<[Option<usize>; 3]> {
    let mut edges: HashMap<(usize, usize), Vec<(usize, usize)>> = HashMap::new();
    for (t, tri) in triangles.iter().enumerate() {
        for k in 0..3 {
            let a = tri[(k + 1) % 3];
            let b = tri[(k + 2) % 3];
            edges.entry((a.min(b), a.max(b))).or_default().push((t, k));
        }
    }

    let mut neighbors = vec![[None; 3]; triangles.len()];
    for sharing in edges.values() {
        if let [(t1, k1), (t2, k2)] = sharing.as_slice() {
            neighbors[*t1][*k1] = Some(*t2);
            neighbors[*t2][*k2] = Some(*t1);
        }
    }
    neighbors
}
