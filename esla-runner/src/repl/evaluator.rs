use esla_interpreter::{EvaluationError, Interpreter, Value};

pub trait Evaluator {
    type Object;

    fn evaluate(&mut self, source: &str) -> Self::Object;

    fn print_variables(&self);
}

pub struct InterpreterEvaluator {
    interpreter: Interpreter,
}

impl InterpreterEvaluator {
    pub fn new() -> Self {
        Self {
            interpreter: Interpreter::new(),
        }
    }
}

impl Evaluator for InterpreterEvaluator {
    type Object = Result<Value, EvaluationError>;

    fn evaluate(&mut self, source: &str) -> Self::Object {
        self.interpreter.evaluate(source)
    }

    fn print_variables(&self) {
        self.interpreter.print_variables()
    }
}
