pub mod name_sanitizer;
pub mod schema_converter;
pub mod spec_to_ir;

pub use spec_to_ir::transform;
