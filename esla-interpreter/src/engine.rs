use std::path::Path;

use crate::error::EvaluationError;
use crate::evaluator::Interpreter;
use crate::native::NativeObject;
use crate::value::Value;

/// Convenience layer over [`Interpreter`] for hosts that exchange plain Rust
/// values with scripts.
#[derive(Default)]
pub struct Engine {
    interpreter: Interpreter,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_variable(&mut self, name: &str, value: impl Into<Value>) {
        self.interpreter.define(name, value.into());
    }

    pub fn get_variable<T>(&self, name: &str) -> Result<T, EvaluationError>
    where
        T: TryFrom<Value, Error = EvaluationError>,
    {
        T::try_from(self.interpreter.look_up_variable(name)?)
    }

    pub fn register_object(&mut self, name: &str, object: impl NativeObject + 'static) {
        self.interpreter.define(name, Value::native(object));
    }

    /// Evaluates one statement and renders the result.
    pub fn eval(&mut self, code: &str) -> Result<String, EvaluationError> {
        self.interpreter.evaluate_to_string(code)
    }

    pub fn exec(&mut self, code: &str) -> Result<Value, EvaluationError> {
        self.interpreter.execute(code)
    }

    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<Value, EvaluationError> {
        self.interpreter.execute_file(path)
    }

    pub fn interpreter(&mut self) -> &mut Interpreter {
        &mut self.interpreter
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::native::tests::{person_handle, Person};

    #[test]
    fn test_typed_variables() {
        let mut engine = Engine::new();
        engine.set_variable("width", 6);
        engine.set_variable("ratio", 0.5);
        engine.set_variable("title", "box");

        engine.exec("area = width * width * ratio; label = title + '!'").unwrap();

        assert_eq!(engine.get_variable::<f64>("area").unwrap(), 18.0);
        assert_eq!(engine.get_variable::<String>("label").unwrap(), "box!");
        assert_eq!(engine.get_variable::<i64>("width").unwrap(), 6);
        assert!(matches!(
            engine.get_variable::<bool>("width"),
            Err(EvaluationError::TypeMismatch(_))
        ));
        assert!(matches!(
            engine.get_variable::<i64>("missing"),
            Err(EvaluationError::UndefinedVariable(_))
        ));
    }

    #[test]
    fn test_eval_renders_values() {
        let mut engine = Engine::new();

        assert_eq!(engine.eval("7 / 2").unwrap(), "3.5");
        assert_eq!(engine.eval("'hi'").unwrap(), "'hi'");
        assert_eq!(engine.eval("function f() {}").unwrap(), "null");
        assert_eq!(engine.eval("f").unwrap(), "<function f>");
    }

    #[test]
    fn test_registered_objects() {
        let bob = Rc::new(RefCell::new(Person {
            name: "Bob".to_string(),
            age: 30,
            hobbies: Vec::new(),
        }));
        let mut engine = Engine::new();
        engine.register_object("bob", person_handle(bob.clone()));

        engine.exec("bob.age = 31").unwrap();
        assert_eq!(
            engine.eval("bob.introduce()").unwrap(),
            "'Hi, I'm Bob and I'm 31 years old.'"
        );
        assert_eq!(bob.borrow().age, 31);
    }
}
