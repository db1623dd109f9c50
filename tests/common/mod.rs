#![allow(dead_code, unused_imports)]

pub use hostagent_test_utils::builders;
pub use hostagent_test_utils::fakes;
pub use hostagent_test_utils::{init_tracing, with_timeout};
