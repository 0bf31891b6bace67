/// Temperature-scaled softmax with max subtraction.
///
/// Always returns a probability distribution over exactly `values.len()` entries (empty in,
/// empty out):
/// - NaN entries get zero mass.
/// - If the maximum is `+inf`, mass is shared evenly among the `+inf` entries.
/// - If every entry is `-inf`/NaN, or the normalizer underflows to zero, the result is uniform.
///
/// `temperature` is expected to be finite and positive; [`ArbitratorConfig::validate`] enforces
/// that for arbitrators.
///
/// [`ArbitratorConfig::validate`]: crate::ArbitratorConfig::validate
pub fn softmax(values: &[f64], temperature: f64) -> Vec<f64> {
    if values.is_empty() {
        return Vec::new();
    }

    let max = values
        .iter()
        .copied()
        .filter(|v| !v.is_nan())
        .fold(f64::NEG_INFINITY, f64::max);

    if max == f64::INFINITY {
        let saturated = values.iter().filter(|&&v| v == f64::INFINITY).count() as f64;
        return values
            .iter()
            .map(|&v| if v == f64::INFINITY { 1.0 / saturated } else { 0.0 })
            .collect();
    }
    if max == f64::NEG_INFINITY {
        return uniform(values.len());
    }

    let exps: Vec<f64> = values
        .iter()
        .map(|&v| {
            if v.is_nan() {
                0.0
            } else {
                ((v - max) / temperature).exp()
            }
        })
        .collect();
    let total: f64 = exps.iter().sum();

    if total == 0.0 || !total.is_finite() {
        return uniform(values.len());
    }
    exps.into_iter().map(|e| e / total).collect()
}

fn uniform(n: usize) -> Vec<f64> {
    vec![1.0 / n as f64; n]
}
