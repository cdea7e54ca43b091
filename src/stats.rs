//! Concentration bound used to accept or reject a candidate cut.

/// Variance of a 0/1 indicator stream of length `n` that is 1 exactly
/// `count` times.
///
/// With `support = count / n` this is
/// `(count * (1 - support)^2 + (n - count) * support^2) / n`.
pub fn variance(count: f64, n: f64) -> f64 {
    let support = count / n;
    (count * (1.0 - support).powi(2) + (n - count) * (0.0 - support).powi(2)) / n
}

/// Bound on `|before_support - after_support|` below which a difference is
/// attributed to sampling noise.
///
/// `before_len` and `after_len` are the transaction counts on either side
/// of the cut; `confidence` bounds the false-positive rate of a single cut.
///
/// # Panics
///
/// Panics if either length is zero, if `confidence` is outside `(0, 1]`,
/// or if the bound falls outside `[0, 1]`. Segments that short make the
/// bound meaningless, so hitting the last case is a parameter error.
pub fn epsilon(
    before_len: usize,
    after_len: usize,
    before_support: f64,
    after_support: f64,
    confidence: f64,
) -> f64 {
    assert!(
        before_len > 0 && after_len > 0,
        "epsilon requires non-empty segments"
    );
    assert!(
        confidence > 0.0 && confidence <= 1.0,
        "confidence must be in (0, 1], got {}",
        confidence
    );

    let before = before_len as f64;
    let after = after_len as f64;
    let total = before + after;

    let n = before_support + after_support;
    let v = variance(n, total);
    // Harmonic mean of the two segment lengths.
    let m = 1.0 / (1.0 / before + 1.0 / after);
    let delta_prime = (2.0 * total.ln() / confidence).ln();

    let epsilon = ((2.0 / m) * v * delta_prime).sqrt() + (2.0 / (3.0 * m)) * delta_prime;
    assert!(
        (0.0..=1.0).contains(&epsilon),
        "epsilon out of range: {} (before_len={}, after_len={}, confidence={})",
        epsilon,
        before_len,
        after_len,
        confidence
    );
    epsilon
}
