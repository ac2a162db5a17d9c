pub mod conformance;
pub mod store;
pub mod tables;
pub mod validate;
