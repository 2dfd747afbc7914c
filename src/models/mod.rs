pub mod employee;
pub mod face;
