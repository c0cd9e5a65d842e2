//! Hand-authored circuits and helpers for building test fixtures.

pub mod basic;

pub use basic::{bits_lsb_first, divisible_by_three, from_tuples, prime_under_sixteen};
