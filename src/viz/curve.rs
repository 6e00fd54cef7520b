//! Monotone cubic interpolation in x (Steffen's method), sampled to a polyline.
//!
//! The curve passes through every input point and never overshoots between
//! neighbours, so a series that rises monotonically is drawn rising monotonically.

const SAMPLES_PER_SEGMENT: usize = 12;

fn sign(x: f64) -> f64 {
    if x < 0.0 { -1.0 } else { 1.0 }
}

/// Tangent at the middle of three points.
fn interior_slope(p0: (f64, f64), p1: (f64, f64), p2: (f64, f64)) -> f64 {
    let h0 = p1.0 - p0.0;
    let h1 = p2.0 - p1.0;
    let s0 = if h0 != 0.0 { (p1.1 - p0.1) / h0 } else { 0.0 };
    let s1 = if h1 != 0.0 { (p2.1 - p1.1) / h1 } else { 0.0 };
    let p = (s0 * h1 + s1 * h0) / (h0 + h1);
    let t = (sign(s0) + sign(s1)) * s0.abs().min(s1.abs()).min(0.5 * p.abs());
    if t.is_finite() { t } else { 0.0 }
}

/// Tangent at an end point, from the neighbouring tangent and the end segment.
fn end_slope(a: (f64, f64), b: (f64, f64), t: f64) -> f64 {
    let h = b.0 - a.0;
    if h != 0.0 {
        (3.0 * (b.1 - a.1) / h - t) / 2.0
    } else {
        t
    }
}

fn tangents(points: &[(f64, f64)]) -> Vec<f64> {
    let n = points.len();
    let mut t = vec![0.0; n];
    for i in 1..n - 1 {
        t[i] = interior_slope(points[i - 1], points[i], points[i + 1]);
    }
    t[0] = end_slope(points[0], points[1], t[1]);
    t[n - 1] = end_slope(points[n - 2], points[n - 1], t[n - 2]);
    t
}

/// Sample the monotone curve through `points` (sorted by x).
///
/// Fewer than three points are returned as straight segments.
pub fn monotone_x(points: &[(f64, f64)]) -> Vec<(f64, f64)> {
    if points.len() < 3 {
        return points.to_vec();
    }
    let t = tangents(points);
    let mut out = Vec::with_capacity((points.len() - 1) * SAMPLES_PER_SEGMENT + 1);
    out.push(points[0]);
    for i in 0..points.len() - 1 {
        let (x0, y0) = points[i];
        let (x1, y1) = points[i + 1];
        let dx = (x1 - x0) / 3.0;
        let c1 = (x0 + dx, y0 + dx * t[i]);
        let c2 = (x1 - dx, y1 - dx * t[i + 1]);
        for k in 1..=SAMPLES_PER_SEGMENT {
            let u = k as f64 / SAMPLES_PER_SEGMENT as f64;
            out.push(bezier((x0, y0), c1, c2, (x1, y1), u));
        }
    }
    out
}

fn bezier(p0: (f64, f64), c1: (f64, f64), c2: (f64, f64), p1: (f64, f64), u: f64) -> (f64, f64) {
    let v = 1.0 - u;
    let a = v * v * v;
    let b = 3.0 * v * v * u;
    let c = 3.0 * v * u * u;
    let d = u * u * u;
    (
        a * p0.0 + b * c1.0 + c * c2.0 + d * p1.0,
        a * p0.1 + b * c1.1 + c * c2.1 + d * p1.1,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passes_through_inputs_without_overshoot() {
        let pts = [(0.0, 0.0), (10.0, 5.0), (20.0, 5.0), (30.0, 20.0)];
        let s = monotone_x(&pts);
        assert_eq!(s.first(), Some(&(0.0, 0.0)));
        let last = s.last().copied().unwrap();
        assert!((last.0 - 30.0).abs() < 1e-9 && (last.1 - 20.0).abs() < 1e-9);
        for w in s.windows(2) {
            assert!(w[1].0 >= w[0].0);
            assert!(w[1].1 >= w[0].1 - 1e-9, "non-monotone at {:?}", w);
        }
        // Flat segment stays flat.
        assert!(s.iter().filter(|p| p.0 > 10.0 && p.0 < 20.0).all(|p| (p.1 - 5.0).abs() < 1e-9));
    }

    #[test]
    fn short_inputs_are_straight() {
        assert!(monotone_x(&[]).is_empty());
        assert_eq!(monotone_x(&[(1.0, 2.0), (3.0, 4.0)]).len(), 2);
    }
}
