use freifahren_core::{SpatialDecayParams, TemporalDecayParams};
use statrs::function::beta::ln_beta;
use statrs::function::factorial::ln_binomial;

/// Temporal decay: monotone decreasing in `delta_s`, close to 1 for
/// `delta_s` well under `ttl` and close to 0 well past it.
pub fn temporal_decay(delta_s: f64, params: &TemporalDecayParams) -> f64 {
    let midpoint = params.ttl * (1.0 + params.shift);
    1.0 / (1.0 + ((delta_s - midpoint) / (params.strength * params.ttl)).exp())
}

/// Spatial decay: `P(|d| + shift) / P(peak)`, where `P` is a beta-binomial
/// pmf and `d` is the segment-rank distance from the anchor. Clamped to
/// `[0, 1]`.
pub fn spatial_decay(distance: i64, params: &SpatialDecayParams) -> f64 {
    let k = distance.unsigned_abs() + params.shift;
    let numerator = betabinom_pmf(k, params.n, params.alpha, params.beta);
    let denominator = betabinom_pmf(params.peak, params.n, params.alpha, params.beta);
    if denominator <= 0.0 {
        return 0.0;
    }
    (numerator / denominator).clamp(0.0, 1.0)
}

/// Beta-binomial pmf computed in log-space to avoid overflow for the
/// `n=30` line-wide kernel: `C(n,k) * B(k+a, n-k+b) / B(a,b)`.
fn betabinom_pmf(k: u64, n: u64, alpha: f64, beta: f64) -> f64 {
    if k > n {
        return 0.0;
    }
    let ln_pmf = ln_binomial(n, k) + ln_beta(k as f64 + alpha, (n - k) as f64 + beta)
        - ln_beta(alpha, beta);
    ln_pmf.exp()
}
