//! Numeric helpers shared by the layout engines: tick placement, curve
//! interpolation, regression and downsampling.

/// "Nice" axis ticks covering `min..=max` with roughly `target` steps.
/// Step sizes are 1, 2 or 5 times a power of ten.
pub fn nice_ticks(min: f64, max: f64, target: usize) -> Vec<f64> {
    let (min, max) = if min <= max { (min, max) } else { (max, min) };
    let span = max - min;
    if !span.is_finite() || span <= 0.0 {
        return vec![min];
    }
    let raw_step = span / target.max(1) as f64;
    let mag = 10f64.powf(raw_step.log10().floor());
    let norm = raw_step / mag;
    let step = if norm <= 1.0 {
        1.0
    } else if norm <= 2.0 {
        2.0
    } else if norm <= 5.0 {
        5.0
    } else {
        10.0
    } * mag;
    let first = (min / step).ceil() * step;
    let mut ticks = Vec::new();
    let mut t = first;
    // Half-step tolerance absorbs accumulated float error at the top end.
    while t <= max + step * 0.5 {
        // Snap values that should be exactly zero.
        ticks.push(if t.abs() < step * 1e-9 { 0.0 } else { t });
        t += step;
    }
    ticks
}

/// Format a tick value without trailing float noise.
pub fn format_tick(v: f64) -> String {
    if v == 0.0 {
        return "0".to_string();
    }
    let abs = v.abs();
    if abs >= 1_000_000.0 {
        format!("{:.1}M", v / 1_000_000.0)
    } else if abs >= 10_000.0 {
        format!("{:.0}k", v / 1_000.0)
    } else if abs >= 1.0 && v.fract().abs() < 1e-9 {
        format!("{v:.0}")
    } else if abs >= 1.0 {
        format!("{v:.1}")
    } else {
        format!("{v:.2}")
    }
}

/// Catmull-Rom spline through the given points, sampling `samples_per_seg`
/// intermediate points per segment. Passes exactly through every input
/// point; inputs with fewer than three points come back unchanged.
pub fn catmull_rom(points: &[(f64, f64)], samples_per_seg: usize) -> Vec<(f64, f64)> {
    if points.len() < 3 || samples_per_seg == 0 {
        return points.to_vec();
    }
    let n = points.len();
    let mut out = Vec::with_capacity((n - 1) * samples_per_seg + 1);
    out.push(points[0]);
    for i in 0..n - 1 {
        // Clamp phantom endpoints at the boundary.
        let p0 = points[i.saturating_sub(1)];
        let p1 = points[i];
        let p2 = points[i + 1];
        let p3 = points[(i + 2).min(n - 1)];
        for s in 1..=samples_per_seg {
            let t = s as f64 / samples_per_seg as f64;
            let t2 = t * t;
            let t3 = t2 * t;
            let interp = |a: f64, b: f64, c: f64, d: f64| {
                0.5 * ((2.0 * b)
                    + (-a + c) * t
                    + (2.0 * a - 5.0 * b + 4.0 * c - d) * t2
                    + (-a + 3.0 * b - 3.0 * c + d) * t3)
            };
            out.push((
                interp(p0.0, p1.0, p2.0, p3.0),
                interp(p0.1, p1.1, p2.1, p3.1),
            ));
        }
    }
    out
}

/// Expand points into horizontal-then-vertical step segments: each pair
/// `(x0,y0) -> (x1,y1)` becomes `(x0,y0) -> (x1,y0) -> (x1,y1)`.
pub fn stepped_points(points: &[(f64, f64)]) -> Vec<(f64, f64)> {
    if points.len() < 2 {
        return points.to_vec();
    }
    let mut out = Vec::with_capacity(points.len() * 2 - 1);
    out.push(points[0]);
    for w in points.windows(2) {
        let (_, y0) = w[0];
        let (x1, y1) = w[1];
        out.push((x1, y0));
        out.push((x1, y1));
    }
    out
}

/// Least-squares linear fit returning `(slope, intercept)`.
pub fn linear_regression(points: &[(f64, f64)]) -> Option<(f64, f64)> {
    let n = points.len() as f64;
    if points.len() < 2 {
        return None;
    }
    let sum_x: f64 = points.iter().map(|p| p.0).sum();
    let sum_y: f64 = points.iter().map(|p| p.1).sum();
    let sum_xx: f64 = points.iter().map(|p| p.0 * p.0).sum();
    let sum_xy: f64 = points.iter().map(|p| p.0 * p.1).sum();
    let denom = n * sum_xx - sum_x * sum_x;
    if denom.abs() < f64::EPSILON {
        return None;
    }
    let slope = (n * sum_xy - sum_x * sum_y) / denom;
    let intercept = (sum_y - slope * sum_x) / n;
    Some((slope, intercept))
}

/// Largest Triangle Three Buckets downsampling.
///
/// Keeps the first and last points and selects, per bucket, the point that
/// forms the largest triangle with the previously selected point and the
/// next bucket's average. Returns exactly `threshold` points when the input
/// exceeds it, the input unchanged otherwise.
pub fn lttb(points: &[(f64, f64)], threshold: usize) -> Vec<(f64, f64)> {
    let n = points.len();
    if threshold < 3 || n <= threshold {
        return points.to_vec();
    }
    let mut out = Vec::with_capacity(threshold);
    out.push(points[0]);
    let bucket_size = (n - 2) as f64 / (threshold - 2) as f64;
    let mut prev = points[0];
    for i in 0..threshold - 2 {
        let start = (i as f64 * bucket_size) as usize + 1;
        let end = (((i + 1) as f64 * bucket_size) as usize + 1).min(n - 1);
        let next_start = end;
        let next_end = ((((i + 2) as f64 * bucket_size) as usize + 1).min(n - 1)).max(next_start);
        let next_slice = &points[next_start..=next_end];
        let inv = 1.0 / next_slice.len() as f64;
        let avg_x: f64 = next_slice.iter().map(|p| p.0).sum::<f64>() * inv;
        let avg_y: f64 = next_slice.iter().map(|p| p.1).sum::<f64>() * inv;

        let mut best = points[start];
        let mut best_area = -1.0;
        for &(x, y) in &points[start..end.max(start + 1)] {
            let area = ((prev.0 - avg_x) * (y - prev.1) - (prev.0 - x) * (avg_y - prev.1)).abs();
            if area > best_area {
                best_area = area;
                best = (x, y);
            }
        }
        out.push(best);
        prev = best;
    }
    out.push(points[n - 1]);
    out
}
