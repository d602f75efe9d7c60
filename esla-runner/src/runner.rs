use std::path::Path;

use esla_interpreter::{EvaluationError, Interpreter, Value};

/// Runs a script file and prints its final value unless it is null.
pub fn execute_file(path: &Path) -> Result<(), EvaluationError> {
    let mut interpreter = Interpreter::new();
    let value = interpreter.execute_file(path)?;
    if let Some(line) = render_result(&value) {
        println!("{}", line);
    }
    Ok(())
}

pub fn render_result(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        value => Some(value.to_string()),
    }
}
