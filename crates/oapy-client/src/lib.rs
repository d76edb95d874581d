pub mod emitters;
pub mod generator;

pub use generator::{DEFAULT_BASE_URL, DEFAULT_OUTPUT_FILE, EmitError, PythonClientGenerator};
