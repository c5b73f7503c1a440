//! Property-based tests
//!
//! Uses proptest to generate random inputs and verify properties of the
//! shared request and pagination types.

mod pagination_proptest;
mod validation_proptest;
