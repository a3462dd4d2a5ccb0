pub mod course;
pub mod market;
