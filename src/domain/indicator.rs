//! Rolling calculations used by the feature builder.
//!
//! Each function returns one value per input bar, with `None` during the
//! warmup window (fewer observations than the window needs). Filling those
//! gaps is the caller's job.
//!
//! RSI here uses a rolling mean of gains over a rolling mean of losses with a
//! small epsilon in the denominator, matching the classifier's training
//! features. This is not Wilder's recursive smoothing.

/// Epsilon added to the average loss so a loss-free window yields a finite RS.
pub const RSI_EPSILON: f64 = 1e-6;

/// Fractional change over `lag` periods: `(x[i] - x[i-lag]) / x[i-lag]`.
pub fn pct_change(values: &[f64], lag: usize) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(values.len());
    for i in 0..values.len() {
        if lag == 0 || i < lag {
            out.push(None);
        } else {
            out.push(Some((values[i] - values[i - lag]) / values[i - lag]));
        }
    }
    out
}

/// Trailing simple moving average over `window` periods.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(values.len());
    for i in 0..values.len() {
        if window == 0 || i + 1 < window {
            out.push(None);
        } else {
            let sum: f64 = values[i + 1 - window..=i].iter().sum();
            out.push(Some(sum / window as f64));
        }
    }
    out
}

/// Trailing sample standard deviation (n-1 denominator) over `window`
/// periods. A window containing any missing value yields `None`.
pub fn rolling_std(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(values.len());
    for i in 0..values.len() {
        if window < 2 || i + 1 < window {
            out.push(None);
            continue;
        }
        let slice = &values[i + 1 - window..=i];
        if slice.iter().any(|v| v.is_none()) {
            out.push(None);
            continue;
        }
        let xs: Vec<f64> = slice.iter().map(|v| v.unwrap()).collect();
        let mean = xs.iter().sum::<f64>() / window as f64;
        let var = xs.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (window - 1) as f64;
        out.push(Some(var.sqrt()));
    }
    out
}

/// Relative strength index over `window` periods.
///
/// `RS = mean(gains, window) / (mean(losses, window) + epsilon)` and
/// `RSI = 100 - 100 / (1 + RS)`, both means simple rolling means over the
/// one-period price changes.
pub fn rsi(closes: &[f64], window: usize) -> Vec<Option<f64>> {
    let n = closes.len();
    let mut out = vec![None; n];
    if window == 0 || n < 2 {
        return out;
    }

    let mut gains = Vec::with_capacity(n - 1);
    let mut losses = Vec::with_capacity(n - 1);
    for i in 1..n {
        let change = closes[i] - closes[i - 1];
        gains.push(if change > 0.0 { change } else { 0.0 });
        losses.push(if change < 0.0 { -change } else { 0.0 });
    }

    // Bar i draws on the window of changes ending at change-index i-1.
    for i in window..n {
        let hi = i - 1;
        let lo = hi + 1 - window;
        let avg_gain: f64 = gains[lo..=hi].iter().sum::<f64>() / window as f64;
        let avg_loss: f64 = losses[lo..=hi].iter().sum::<f64>() / window as f64;
        let rs = avg_gain / (avg_loss + RSI_EPSILON);
        out[i] = Some(100.0 - 100.0 / (1.0 + rs));
    }
    out
}
