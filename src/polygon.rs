use num::Float;
use std::fmt::Debug;

/* ------------------------------------------------------------------------------
 * Polygon struct
 * ------------------------------------------------------------------------------ */

/// Convex 2D footprint polygon.
///
/// Vertices are stored in counter-clockwise order; `new` reverses the input
/// if it arrives clockwise. Intersection assumes both operands are convex.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon<T>
where
    T: Debug + Float,
{
    vertices: Vec<[T; 2]>,
}

impl<T> Polygon<T>
where
    T: Debug + Float,
{
    pub fn new(mut vertices: Vec<[T; 2]>) -> Self {
        if signed_area(&vertices) < T::zero() {
            vertices.reverse();
        }
        Self { vertices }
    }

    /// Oriented rectangle centered on (cx, cy), rotated by `yaw`,
    /// `length` along the heading axis and `width` across it.
    pub fn rectangle(cx: T, cy: T, yaw: T, length: T, width: T) -> Self {
        let two = T::one() + T::one();
        let half_l = length / two;
        let half_w = width / two;
        let (sin, cos) = yaw.sin_cos();

        let corners = [
            [half_l, half_w],
            [-half_l, half_w],
            [-half_l, -half_w],
            [half_l, -half_w],
        ];
        let vertices = corners
            .iter()
            .map(|&[lx, ly]| {
                [cx + cos * lx - sin * ly, cy + sin * lx + cos * ly]
            })
            .collect();
        Self { vertices }
    }

    pub fn vertices(&self) -> &[[T; 2]] {
        &self.vertices
    }

    pub fn area(&self) -> T {
        signed_area(&self.vertices).abs()
    }

    /// Area of the convex intersection of `self` and `other`
    /// (Sutherland-Hodgman clip of `self` against each edge of `other`).
    pub fn intersection_area(&self, other: &Polygon<T>) -> T {
        let n = other.vertices.len();
        if self.vertices.len() < 3 || n < 3 {
            return T::zero();
        }

        let mut output = self.vertices.clone();
        for i in 0..n {
            if output.is_empty() {
                return T::zero();
            }
            let a = other.vertices[i];
            let b = other.vertices[(i + 1) % n];

            let input = std::mem::take(&mut output);
            let m = input.len();
            for j in 0..m {
                let p = input[j];
                let q = input[(j + 1) % m];
                let side_p = cross(a, b, p);
                let side_q = cross(a, b, q);

                if side_p >= T::zero() {
                    output.push(p);
                    if side_q < T::zero() {
                        output.push(line_intersection(a, b, p, q));
                    }
                } else if side_q >= T::zero() {
                    output.push(line_intersection(a, b, p, q));
                }
            }
        }
        signed_area(&output).abs()
    }

    /// Intersection over union, with a union-area floor: a union smaller
    /// than `min_union_area` yields 0 instead of an unstable ratio.
    pub fn iou(&self, other: &Polygon<T>, min_union_area: T) -> T {
        let intersection = self.intersection_area(other);
        let union = self.area() + other.area() - intersection;
        if union < min_union_area {
            return T::zero();
        }
        (intersection / union).min(T::one())
    }
}

/* ------------------------------------------------------------------------------
 * Geometry helpers
 * ------------------------------------------------------------------------------ */

fn signed_area<T>(vertices: &[[T; 2]]) -> T
where
    T: Debug + Float,
{
    let n = vertices.len();
    if n < 3 {
        return T::zero();
    }
    let mut sum = T::zero();
    for i in 0..n {
        let p = vertices[i];
        let q = vertices[(i + 1) % n];
        sum = sum + p[0] * q[1] - q[0] * p[1];
    }
    sum / (T::one() + T::one())
}

/// Cross product of (b - a) x (p - a); positive when p is left of a->b.
fn cross<T>(a: [T; 2], b: [T; 2], p: [T; 2]) -> T
where
    T: Debug + Float,
{
    (b[0] - a[0]) * (p[1] - a[1]) - (b[1] - a[1]) * (p[0] - a[0])
}

/// Intersection of the infinite line a->b with the segment p->q.
/// Callers guarantee p and q lie on opposite sides of the line.
fn line_intersection<T>(a: [T; 2], b: [T; 2], p: [T; 2], q: [T; 2]) -> [T; 2]
where
    T: Debug + Float,
{
    let d1 = cross(a, b, p);
    let d2 = cross(a, b, q);
    let t = d1 / (d1 - d2);
    [p[0] + (q[0] - p[0]) * t, p[1] + (q[1] - p[1]) * t]
}
