use serde::{Deserialize, Serialize};

/// The specification for the training `Method`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MethodSpec {
    #[default]
    NormEq,
    Qr,
}

/// The specification for the training `Parameter`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingSpec {
    #[serde(default)]
    pub method: MethodSpec,
    #[serde(default = "default_intercept")]
    pub intercept: bool,
}

fn default_intercept() -> bool {
    true
}
