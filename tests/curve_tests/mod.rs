//! Curve pipeline tests
//!
//! - Property tests for filling, bootstrapping and store merging
//! - CLI behaviour

pub mod test_cli;
pub mod test_properties;
