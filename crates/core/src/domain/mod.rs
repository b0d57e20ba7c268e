pub mod employee;
pub mod insight;
