//! Conversions between partial models and their wire representation.

use comms::specs::{partial::PartialResultSpec, training::MethodSpec};
use ndarray::Array2;
use regression_core::{PartialResultId, RegressionErr, Result};

use crate::{Method, PartialModel};

/// Splits a partial model into the spec describing it and the values that
/// follow it on the wire.
///
/// # Arguments
/// * `id` - The partial result slot the model was read from.
/// * `model` - The partial model to send.
pub fn encode(id: PartialResultId, model: &PartialModel) -> (PartialResultSpec, Vec<f64>) {
    let spec = PartialResultSpec {
        id,
        method: model.method().into(),
        intercept: model.intercept(),
        rows: model.rows(),
        features: model.features(),
        responses: model.responses(),
    };

    let mut values = Vec::with_capacity(spec.values());
    values.extend(model.lhs().iter());
    values.extend(model.rhs().iter());

    (spec, values)
}

/// Rebuilds a partial model from its spec and the values received after it.
///
/// # Returns
/// The partial model or a `SizeMismatch` if `values` doesn't hold both matrices.
pub fn decode(spec: &PartialResultSpec, values: &[f64]) -> Result<PartialModel> {
    spec.id.index()?;

    if values.len() != spec.values() {
        return Err(RegressionErr::SizeMismatch {
            what: "partial result values",
            got: values.len(),
            expected: spec.values(),
        });
    }

    if values.iter().any(|v| !v.is_finite()) {
        return Err(RegressionErr::NonFinite {
            what: "partial result values",
        });
    }

    let betas = spec.betas();
    let (lhs, rhs) = values.split_at(betas * betas);

    let shape_err = |_| RegressionErr::SizeMismatch {
        what: "partial result values",
        got: values.len(),
        expected: spec.values(),
    };
    let lhs = Array2::from_shape_vec((betas, betas), lhs.to_vec()).map_err(shape_err)?;
    let rhs = Array2::from_shape_vec((spec.responses, betas), rhs.to_vec()).map_err(shape_err)?;

    PartialModel::from_parts(spec.method.into(), spec.intercept, spec.rows, lhs, rhs)
}

impl From<Method> for MethodSpec {
    fn from(method: Method) -> Self {
        match method {
            Method::NormEq => MethodSpec::NormEq,
            Method::Qr => MethodSpec::Qr,
        }
    }
}

impl From<MethodSpec> for Method {
    fn from(spec: MethodSpec) -> Self {
        match spec {
            MethodSpec::NormEq => Method::NormEq,
            MethodSpec::Qr => Method::Qr,
        }
    }
}
