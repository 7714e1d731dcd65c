pub mod dom;
pub mod types;
