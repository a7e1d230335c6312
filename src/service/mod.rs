//! Use-case services wiring domain logic to the outbound ports.

pub mod engagement;
pub mod pricing;
pub mod wallet;
