//! Knobs that CI and local runs use to tune test suites.

pub mod property_test_profile;
