use crate::Method;

/// The parameters of linear regression training.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parameter {
    /// The computation method.
    pub method: Method,
    /// Whether to fit an intercept term.
    pub intercept: bool,
}

impl Parameter {
    /// Creates a new `Parameter`.
    pub fn new(method: Method, intercept: bool) -> Self {
        Self { method, intercept }
    }
}

impl Default for Parameter {
    fn default() -> Self {
        Self::new(Method::NormEq, true)
    }
}
