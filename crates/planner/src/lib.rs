pub mod compiler;
pub mod registry;

pub use compiler::{FilterCompiler, PredicateCompiler};
pub use registry::{OperatorEntry, OperatorRegistry, TIMESTAMP_FIELD};
