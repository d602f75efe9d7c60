use esla_interpreter::{EvaluationError, Value};

pub const HELP: &str = "\
ESLA Interactive Shell Commands:
  exit, quit    - Exit the shell
  vars          - List all variables
  history       - Show command history
  clear         - Clear the screen
  help          - Show this help message

Each line holds one statement, e.g. 'x = 1' or 'function f(a) { return a }'.

Keyboard shortcuts:
  Up/Down       - Navigate command history
  Ctrl+A        - Move to beginning of line
  Ctrl+E        - Move to end of line
  Ctrl+C        - Cancel current line
  Ctrl+D        - Exit the shell
  Tab           - Auto-complete";

pub trait Printer {
    type Object;

    fn print(&mut self, object: Self::Object);

    fn print_help(&mut self) {
        println!("{}", HELP);
    }
}

pub struct InterpreterPrinter {}

impl InterpreterPrinter {
    /// Line shown for a result, if any. Null results print nothing.
    pub fn render(object: &Result<Value, EvaluationError>) -> Option<String> {
        match object {
            Ok(Value::Null) => None,
            Ok(value) => Some(format!("=> {}", value)),
            Err(err) => Some(format!("Error: {}", err)),
        }
    }
}

impl Printer for InterpreterPrinter {
    type Object = Result<Value, EvaluationError>;

    fn print(&mut self, object: Self::Object) {
        match (&object, Self::render(&object)) {
            (Err(_), Some(line)) => eprintln!("{}", line),
            (Ok(_), Some(line)) => println!("{}", line),
            (_, None) => {}
        }
    }
}
