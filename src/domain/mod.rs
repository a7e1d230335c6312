//! Exchange- and transport-agnostic domain types and computation.
//!
//! Everything in this module is pure: no I/O, no clocks, no ambient state.

pub mod engagement;
pub mod level;
pub mod price;
pub mod token;
