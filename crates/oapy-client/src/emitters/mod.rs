pub mod client;
pub mod function;
