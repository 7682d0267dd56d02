use comms::specs::training::TrainingSpec;

use super::{DistributedStep1Local, Trainer};
use crate::Parameter;

/// Builds `Trainer`s given a specification.
#[derive(Default)]
pub struct TrainerBuilder;

impl TrainerBuilder {
    /// Creates a new `TrainerBuilder`.
    pub fn new() -> Self {
        Self
    }

    /// Builds a local (first step) trainer following a spec.
    ///
    /// # Arguments
    /// * `spec` - The specification for the trainer.
    pub fn build(&self, spec: &TrainingSpec) -> Box<dyn Trainer> {
        let parameter = self.resolve_parameter(spec);
        Box::new(DistributedStep1Local::new(parameter))
    }

    /// Resolves the training parameters of a spec.
    pub fn resolve_parameter(&self, spec: &TrainingSpec) -> Parameter {
        Parameter::new(spec.method.into(), spec.intercept)
    }
}

#[cfg(test)]
mod tests {
    use comms::specs::training::MethodSpec;

    use super::*;
    use crate::Method;

    #[test]
    fn resolves_spec_into_parameter() {
        let spec = TrainingSpec {
            method: MethodSpec::Qr,
            intercept: false,
        };

        let parameter = TrainerBuilder::new().resolve_parameter(&spec);
        assert_eq!(parameter, Parameter::new(Method::Qr, false));
    }
}
