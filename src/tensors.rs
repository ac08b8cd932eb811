//! Dense linear-algebra containers.

pub mod matrix;
