pub mod analytics;
pub mod employee;
pub mod map;
