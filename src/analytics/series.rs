/// A series is degenerate when it has more than one point and every point is equal.
pub fn is_degenerate(series: &[f64]) -> bool {
    match series.split_first() {
        Some((first, rest)) if !rest.is_empty() => rest.iter().all(|v| v == first),
        _ => false,
    }
}

/// Returns the first candidate accepted by `accept`, in order.
pub fn first_satisfying<'a, T, I, F>(candidates: I, accept: F) -> Option<&'a [T]>
where
    I: IntoIterator<Item = &'a [T]>,
    F: Fn(&[T]) -> bool,
{
    candidates.into_iter().find(|candidate| accept(candidate))
}

/// Picks the series used for trend and volatility.
///
/// A flat `close` is replaced by the first of `adj_close`, `high` that has more
/// than one point and actually moves. When nothing better exists the original
/// `close` is returned untouched.
pub fn repair<'a>(close: &'a [f64], adj_close: &'a [f64], high: &'a [f64]) -> &'a [f64] {
    if !is_degenerate(close) {
        return close;
    }

    first_satisfying([adj_close, high], |s| s.len() > 1 && !is_degenerate(s)).unwrap_or(close)
}
