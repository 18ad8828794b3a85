//! Pipeline stages, in execution order.

pub mod allowance;
pub mod permit;
pub mod submit;
