pub mod common;
pub mod config;
pub mod market;
pub mod notify;
pub mod signal;

#[cfg(feature = "test-utils")]
pub mod test_utils;
