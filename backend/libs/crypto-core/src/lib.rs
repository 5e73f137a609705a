//! Token primitives shared by the chat backend.

pub mod jwt;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
