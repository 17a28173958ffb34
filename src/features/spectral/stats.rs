//! Order statistics and line fitting

/// Percentile with linear interpolation between closest ranks
///
/// `p` is in percent (0-100). Non-finite values are ignored; returns `None` when no finite
/// value remains.
pub fn percentile(values: &[f32], p: f32) -> Option<f32> {
    let mut sorted: Vec<f32> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(f32::total_cmp);

    let rank = (p.clamp(0.0, 100.0) / 100.0) * (sorted.len() - 1) as f32;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let frac = rank - lower as f32;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * frac)
}

/// Median (50th percentile)
pub fn median(values: &[f32]) -> Option<f32> {
    percentile(values, 50.0)
}

/// Mean and population standard deviation
pub fn mean_std(values: &[f32]) -> Option<(f32, f32)> {
    if values.is_empty() {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().map(|&v| v as f64).sum::<f64>() / n;
    let var = values
        .iter()
        .map(|&v| {
            let d = v as f64 - mean;
            d * d
        })
        .sum::<f64>()
        / n;
    Some((mean as f32, var.sqrt() as f32))
}

/// Least-squares slope of `ys` against `xs`
///
/// Returns `None` for fewer than two points or zero variance in `xs`.
pub fn linear_fit_slope(xs: &[f32], ys: &[f32]) -> Option<f32> {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return None;
    }

    let mean_x = xs[..n].iter().map(|&x| x as f64).sum::<f64>() / n as f64;
    let mean_y = ys[..n].iter().map(|&y| y as f64).sum::<f64>() / n as f64;

    let mut cov = 0.0f64;
    let mut var_x = 0.0f64;
    for (&x, &y) in xs[..n].iter().zip(&ys[..n]) {
        let dx = x as f64 - mean_x;
        cov += dx * (y as f64 - mean_y);
        var_x += dx * dx;
    }

    if var_x <= f64::EPSILON {
        return None;
    }
    let slope = (cov / var_x) as f32;
    slope.is_finite().then_some(slope)
}
