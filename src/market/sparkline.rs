use rand::Rng;

pub const SPARKLINE_POINTS: usize = 7;

/// Synthesizes a short trend ending exactly at `current_price`.
///
/// The start is back-solved from `change_percent` assuming simple growth, the
/// samples are interpolated linearly and every sample except the last gets
/// noise of up to a quarter step either way.
pub fn generate_series<R>(rng: &mut R, current_price: f64, change_percent: f64) -> Vec<f64>
where
    R: Rng + ?Sized,
{
    let growth = 1.0 + change_percent / 100.0;
    let start_price = if growth > 0.0 {
        current_price / growth
    } else {
        current_price
    };
    let start_price = if start_price.is_finite() {
        start_price
    } else {
        current_price
    };

    let step = (current_price - start_price) / (SPARKLINE_POINTS - 1) as f64;
    let mut series = Vec::with_capacity(SPARKLINE_POINTS);
    for index in 0..SPARKLINE_POINTS {
        let noise = (rng.gen::<f64>() - 0.5) * step.abs() * 0.5;
        series.push(start_price + step * index as f64 + noise);
    }

    if let Some(last) = series.last_mut() {
        *last = current_price;
    }
    series
}

/// Maps samples onto a `width` x `height` box with the y axis pointing down.
/// A flat series is drawn along the bottom edge.
pub fn scale_points(data: &[f64], width: f64, height: f64) -> Vec<(f64, f64)> {
    if data.is_empty() {
        return Vec::new();
    }

    let min = data.iter().copied().fold(f64::INFINITY, f64::min);
    let max = data.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = if max - min == 0.0 { 1.0 } else { max - min };
    let last_index = data.len().saturating_sub(1).max(1) as f64;

    data.iter()
        .enumerate()
        .map(|(index, sample)| {
            let x = index as f64 / last_index * width;
            let y = height - (sample - min) / range * height;
            (x, y)
        })
        .collect()
}
