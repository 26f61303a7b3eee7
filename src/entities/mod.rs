//! Entity type definitions

pub mod test_case;

pub use test_case::{Branch, ExpectedStatus, Step, TestCase};
