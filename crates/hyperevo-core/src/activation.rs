//! Logistic activation of a weighted neighbor signal.

use serde::{Deserialize, Serialize};

/// Smallest activation the model reports.
pub const MIN_ACTIVATION: f64 = f64::MIN_POSITIVE;
/// Largest activation the model reports.
pub const MAX_ACTIVATION: f64 = 1.0 - f64::EPSILON;

/// Turns a weighted neighbor sum into an activation level in (0, 1),
/// using the node's activation threshold as bias:
///
/// ```text
/// activation = 1 / (1 + exp(-(weighted_sum - threshold)))
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivationModel;

impl ActivationModel {
    pub fn new() -> Self {
        Self
    }

    pub fn activate(&self, weighted_sum: f64, threshold: f64) -> f64 {
        let z = weighted_sum - threshold;
        // exp(-z) overflows for large negative z; use the mirrored form there.
        let raw = if z >= 0.0 {
            1.0 / (1.0 + (-z).exp())
        } else {
            let e = z.exp();
            e / (1.0 + e)
        };
        raw.clamp(MIN_ACTIVATION, MAX_ACTIVATION)
    }
}
