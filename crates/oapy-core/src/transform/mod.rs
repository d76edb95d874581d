pub mod body;
pub mod classify;
pub mod sanitizer;
pub mod spec_to_ir;

pub use spec_to_ir::transform;
