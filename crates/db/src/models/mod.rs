//! Entity structs matching the `role` and `employee` rows.

pub mod employee;
pub mod role;
