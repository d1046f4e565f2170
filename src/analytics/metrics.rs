use crate::models::stock::{numeric, Trend};

/// Divides and keeps only finite results. A zero baseline yields `None`.
fn ratio(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator == 0.0 {
        return None;
    }
    let value = numerator / denominator;
    value.is_finite().then_some(value)
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    ratio(values.iter().sum(), values.len() as f64)
}

pub fn change(current_price: Option<f64>, previous_close: Option<f64>) -> Option<f64> {
    let value = current_price? - previous_close?;
    value.is_finite().then_some(value)
}

pub fn percent_change(current_price: Option<f64>, previous_close: Option<f64>) -> Option<f64> {
    let delta = change(current_price, previous_close)?;
    ratio(delta, previous_close?).map(|r| r * 100.0)
}

/// Mean of the raw close column. Named after the dashboard field; it averages
/// whatever window the chart request returned.
pub fn fifty_day_ma(raw_close: &[Option<f64>]) -> Option<f64> {
    mean(&numeric(raw_close))
}

/// Strictly rising from first to last point is `Up`; a tie is `Down`.
pub fn trend(series: &[f64]) -> Option<Trend> {
    match (series.first(), series.last()) {
        (Some(first), Some(last)) if series.len() > 1 => {
            Some(if last > first { Trend::Up } else { Trend::Down })
        }
        _ => None,
    }
}

/// Mean traded volume, falling back to the latest session when the mean is zero.
pub fn avg_volume(volume: &[Option<f64>], latest_index: Option<usize>) -> Option<f64> {
    if volume.is_empty() {
        return None;
    }

    match mean(&numeric(volume)) {
        Some(avg) if avg != 0.0 => Some(avg),
        fallback => latest_index
            .and_then(|i| volume.get(i).copied().flatten())
            .filter(|v| v.is_finite() && *v != 0.0)
            .or(fallback),
    }
}

/// Relative range `(max - min) / min` of the series.
pub fn volatility(series: &[f64]) -> Option<f64> {
    if series.len() < 2 {
        return None;
    }
    let high = series.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let low = series.iter().copied().fold(f64::INFINITY, f64::min);
    ratio(high - low, low)
}
