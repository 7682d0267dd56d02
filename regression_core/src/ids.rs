use serde::{Deserialize, Serialize};

use crate::{RegressionErr, Result};

/// Declares an integer-backed identifier family.
///
/// Every family is a transparent `i32` newtype: it serializes as the bare
/// integer, which is the value the other end of the wire must recognize.
/// The named constants are the only values that map to a container slot.
macro_rules! identifier {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $( $(#[$cmeta:meta])* $cname:ident = $cval:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            $( $(#[$cmeta])* pub const $cname: Self = Self($cval); )+

            /// The number of slots a container keyed by this identifier has.
            pub const COUNT: usize = [$($cval),+].len();

            /// Creates a new identifier holding `value` verbatim.
            pub const fn new(value: i32) -> Self {
                Self(value)
            }

            /// Returns the integer value of this identifier.
            pub const fn value(&self) -> i32 {
                self.0
            }

            /// Returns the container slot this identifier selects.
            ///
            /// # Returns
            /// The slot index or `RegressionErr::UnknownId` if the value has no slot.
            pub fn index(&self) -> Result<usize> {
                match usize::try_from(self.0) {
                    Ok(idx) if idx < Self::COUNT => Ok(idx),
                    _ => Err(RegressionErr::UnknownId {
                        kind: $kind,
                        value: self.0,
                    }),
                }
            }
        }

        impl From<$name> for i32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl From<i32> for $name {
            fn from(value: i32) -> Self {
                Self(value)
            }
        }
    };
}

identifier! {
    /// Available identifiers of a partial result of linear regression training.
    PartialResultId, "partial result" {
        /// Partial model trained on the available input data.
        MODEL = 0,
    }
}

identifier! {
    /// Available identifiers of the final result of linear regression training.
    ResultId, "result" {
        /// Model trained on the whole input.
        MODEL = 0,
    }
}

identifier! {
    /// Available identifiers of the input objects of linear regression training.
    InputId, "input" {
        /// Feature matrix.
        DATA = 0,
        /// Dependent variables matrix.
        DEPENDENT_VARIABLES = 1,
    }
}

identifier! {
    /// Identifiers of the inputs of the second (master) distributed step.
    MasterInputId, "master input" {
        /// Collection of partial models computed on local nodes.
        PARTIAL_MODELS = 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_partial_result_is_zero() {
        assert_eq!(PartialResultId::MODEL.value(), 0);
        assert_eq!(i32::from(PartialResultId::MODEL), 0);
    }

    #[test]
    fn value_is_idempotent() {
        let id = PartialResultId::MODEL;
        let first = id.value();

        for _ in 0..8 {
            assert_eq!(id.value(), first);
        }
    }

    #[test]
    fn new_stores_value_verbatim() {
        for v in [i32::MIN, -7, -1, 0, 1, 42, i32::MAX] {
            assert_eq!(PartialResultId::new(v).value(), v);
            assert_eq!(PartialResultId::from(v).value(), v);
        }
    }

    #[test]
    fn index_only_resolves_known_slots() {
        assert_eq!(PartialResultId::MODEL.index().unwrap(), 0);
        assert_eq!(InputId::DEPENDENT_VARIABLES.index().unwrap(), 1);
        assert_eq!(InputId::COUNT, 2);

        let err = PartialResultId::new(1).index().unwrap_err();
        assert!(matches!(
            err,
            RegressionErr::UnknownId {
                kind: "partial result",
                value: 1
            }
        ));
        assert!(ResultId::new(-1).index().is_err());
    }

    #[test]
    fn serializes_as_bare_integer() {
        let json = serde_json::to_string(&PartialResultId::MODEL).unwrap();
        assert_eq!(json, "0");

        let id: MasterInputId = serde_json::from_str("0").unwrap();
        assert_eq!(id, MasterInputId::PARTIAL_MODELS);
    }
}
