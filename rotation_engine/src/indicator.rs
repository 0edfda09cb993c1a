//! RSI (Relative Strength Index) over a close series, Wilder smoothing of avg gain/loss.

/// Default look-back period.
pub const DEFAULT_RSI_PERIOD: usize = 14;

/// Computes Wilder's RSI of `closes` (oldest first) over `period` deltas.
///
/// Returns `None` when there are fewer than `period + 1` closes (or `period`
/// is zero). Otherwise the averages are seeded with the simple mean of the
/// first `period` gains/losses and every later delta is folded in with
/// `avg = (avg * (period - 1) + value) / period`. The result is rounded to
/// two decimals; a series with no losses is exactly `100.0`.
pub fn rsi(closes: &[f64], period: usize) -> Option<f64> {
    if period == 0 || closes.len() < period + 1 {
        return None;
    }

    let mut deltas = closes.windows(2).map(|w| w[1] - w[0]);
    let p = period as f64;

    let (mut gain_sum, mut loss_sum) = (0.0, 0.0);
    for change in deltas.by_ref().take(period) {
        let (gain, loss) = split(change);
        gain_sum += gain;
        loss_sum += loss;
    }
    let mut avg_gain = gain_sum / p;
    let mut avg_loss = loss_sum / p;

    for change in deltas {
        let (gain, loss) = split(change);
        avg_gain = (avg_gain * (p - 1.0) + gain) / p;
        avg_loss = (avg_loss * (p - 1.0) + loss) / p;
    }

    if avg_loss == 0.0 {
        return Some(100.0);
    }
    let rs = avg_gain / avg_loss;
    Some(round2(100.0 - 100.0 / (1.0 + rs)))
}

fn split(change: f64) -> (f64, f64) {
    if change > 0.0 {
        (change, 0.0)
    } else {
        (0.0, -change)
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
