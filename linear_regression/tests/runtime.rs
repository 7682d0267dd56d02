use std::num::NonZeroUsize;

use linear_regression::runtime::{self, RuntimeConfig};

#[test]
fn init_is_explicit_and_only_applies_once() {
    assert!(runtime::config().is_none());

    let config = RuntimeConfig {
        threads: NonZeroUsize::new(2),
    };
    assert_eq!(runtime::init(config).unwrap(), config);
    assert_eq!(rayon::current_num_threads(), 2);

    let again = runtime::init(RuntimeConfig::default()).unwrap();
    assert_eq!(again, config);
    assert_eq!(runtime::config(), Some(config));
}
