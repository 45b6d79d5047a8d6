//! Congestion-sensitive price.

/// Affine price per unit of energy at the given station demand.
///
/// `price = alpha * demand + beta`, increasing in demand whenever `alpha > 0`.
pub fn price(demand: u64, alpha: f64, beta: f64) -> f64 {
    alpha * demand as f64 + beta
}
