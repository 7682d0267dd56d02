use regression_core::PartialResultId;
use serde::{Deserialize, Serialize};

use super::training::MethodSpec;

/// Describes the partial result that follows as a `Values` data message.
///
/// The values hold two row-major matrices back to back: the `b x b` left hand
/// side statistic and the `responses x b` right hand side one, where `b` is
/// `features + 1` with an intercept and `features` without.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialResultSpec {
    pub id: PartialResultId,
    pub method: MethodSpec,
    pub intercept: bool,
    pub rows: usize,
    pub features: usize,
    pub responses: usize,
}

impl PartialResultSpec {
    /// The number of betas solved for per response.
    pub fn betas(&self) -> usize {
        self.features + usize::from(self.intercept)
    }

    /// The number of values the following data message must carry.
    pub fn values(&self) -> usize {
        let betas = self.betas();
        betas
            .saturating_mul(betas)
            .saturating_add(self.responses.saturating_mul(betas))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_count_covers_both_matrices() {
        let spec = PartialResultSpec {
            id: PartialResultId::MODEL,
            method: MethodSpec::Qr,
            intercept: true,
            rows: 10,
            features: 3,
            responses: 2,
        };

        assert_eq!(spec.betas(), 4);
        assert_eq!(spec.values(), 16 + 8);
    }

    #[test]
    fn id_travels_as_a_bare_integer() {
        let spec = PartialResultSpec {
            id: PartialResultId::MODEL,
            method: MethodSpec::NormEq,
            intercept: false,
            rows: 1,
            features: 1,
            responses: 1,
        };

        let json = serde_json::to_value(spec).unwrap();
        assert_eq!(json["id"], 0);
        assert_eq!(json["method"], "norm_eq");
    }
}
