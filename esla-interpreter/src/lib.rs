pub mod engine;
pub mod environment;
pub mod error;
pub mod evaluator;
pub mod native;
pub mod value;

pub use engine::Engine;
pub use error::EvaluationError;
pub use evaluator::{Flow, Interpreter};
pub use native::{NativeObject, NativeObjectHandle};
pub use value::Value;
