use std::path::Path;
use std::rc::Rc;

use esla_core::ast::{self, BinaryOperator, Expression, Statement};
use esla_core::parser::Parser;

use crate::environment::Environment;
use crate::error::EvaluationError;
use crate::native::NativeObject;
use crate::value::Value;

/// Outcome of running a statement. `Returning` unwinds enclosing blocks up
/// to the nearest function call, or to the top level.
#[derive(Debug, PartialEq, Clone)]
pub enum Flow {
    Normal(Value),
    Returning(Value),
}

impl Flow {
    pub fn into_value(self) -> Value {
        match self {
            Flow::Normal(value) | Flow::Returning(value) => value,
        }
    }
}

pub struct Interpreter {
    globals: Environment,
    environment: Environment,
}

impl Interpreter {
    pub fn new() -> Self {
        let globals = Environment::new();
        Interpreter {
            environment: globals.clone(),
            globals,
        }
    }

    pub fn globals(&self) -> &Environment {
        &self.globals
    }

    /// The scope statements currently run in. Between calls this is always
    /// the global scope.
    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// Evaluates a single statement. Anything after it is a parse error.
    pub fn evaluate(&mut self, source: &str) -> Result<Value, EvaluationError> {
        let mut parser = Parser::from_source(source);
        if parser.is_at_end() {
            return Ok(Value::Null);
        }

        let statement = parser.parse_single()?;
        self.evaluate_statement(&statement)
    }

    pub fn evaluate_to_string(&mut self, source: &str) -> Result<String, EvaluationError> {
        Ok(self.evaluate(source)?.to_string())
    }

    /// Runs every statement of `source` and returns the value of the last
    /// one. Nothing runs unless the whole source parses.
    pub fn execute(&mut self, source: &str) -> Result<Value, EvaluationError> {
        let program = Parser::from_source(source).parse_all()?;
        tracing::debug!(statements = program.statements.len(), "executing program");

        let mut output = Value::Null;
        for statement in &program.statements {
            match self.eval_statement(statement)? {
                Flow::Normal(value) => output = value,
                Flow::Returning(value) => return Ok(value),
            }
        }
        Ok(output)
    }

    pub fn run(&mut self, source: &str) -> Result<(), EvaluationError> {
        self.execute(source).map(|_| ())
    }

    pub fn execute_file(&mut self, path: impl AsRef<Path>) -> Result<Value, EvaluationError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| EvaluationError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::debug!(path = %path.display(), "executing file");
        self.execute(&source)
    }

    /// Binds `name` in the global scope.
    pub fn define(&mut self, name: &str, value: Value) {
        self.globals.define(name, value);
    }

    pub fn look_up_variable(&self, name: &str) -> Result<Value, EvaluationError> {
        self.environment
            .get(name)
            .ok_or_else(|| EvaluationError::UndefinedVariable(name.to_string()))
    }

    /// Updates the nearest binding of `name`, creating a global when there
    /// is none.
    pub fn assign(&mut self, name: &str, value: Value) {
        if !self.environment.assign(name, value.clone()) {
            tracing::trace!(name, "assignment defines a new global");
            self.globals.define(name, value);
        }
    }

    /// Global bindings sorted by name.
    pub fn variables(&self) -> Vec<(String, Value)> {
        self.globals.bindings()
    }

    pub fn print_variables(&self) {
        for (name, value) in self.variables() {
            println!("{} = {}", name, value);
        }
    }

    /// Runs one statement in the current scope. A top-level `return`
    /// produces its value.
    pub fn evaluate_statement(&mut self, statement: &Statement) -> Result<Value, EvaluationError> {
        self.eval_statement(statement).map(Flow::into_value)
    }

    /// Runs `statements` with `environment` as the current scope. The
    /// previous scope is restored however the statements finish.
    pub fn execute_block(
        &mut self,
        statements: &[Statement],
        environment: Environment,
    ) -> Result<Flow, EvaluationError> {
        let previous = std::mem::replace(&mut self.environment, environment);
        let result = self.eval_statements(statements);
        self.environment = previous;
        result
    }

    fn eval_statements(&mut self, statements: &[Statement]) -> Result<Flow, EvaluationError> {
        let mut result = Value::Null;
        for statement in statements {
            match self.eval_statement(statement)? {
                Flow::Normal(value) => result = value,
                returning @ Flow::Returning(_) => return Ok(returning),
            }
        }
        Ok(Flow::Normal(result))
    }

    fn eval_statement(&mut self, statement: &Statement) -> Result<Flow, EvaluationError> {
        match statement {
            Statement::Expression(expression) => {
                Ok(Flow::Normal(self.eval_expression(expression)?))
            }
            Statement::FunctionDecl(declaration) => {
                self.eval_function_declaration(declaration);
                Ok(Flow::Normal(Value::Null))
            }
            Statement::Return(value) => {
                let value = match value {
                    Some(expression) => self.eval_expression(expression)?,
                    None => Value::Null,
                };
                Ok(Flow::Returning(value))
            }
            Statement::Block(block) => {
                let environment = Environment::new_enclosed(&self.environment);
                self.execute_block(&block.statements, environment)
            }
        }
    }

    fn eval_function_declaration(&mut self, declaration: &ast::FunctionDecl) {
        let function = Value::function(
            declaration.name.name.clone(),
            declaration.parameters.clone(),
            declaration.body.clone(),
            self.environment.clone(),
        );
        self.environment.define(&declaration.name.name, function);
    }

    fn eval_expression(&mut self, expression: &Expression) -> Result<Value, EvaluationError> {
        match expression {
            Expression::Literal(literal) => Ok(Value::from(literal)),
            Expression::Variable(identifier) => self.look_up_variable(&identifier.name),
            Expression::Binary {
                operator,
                left,
                right,
            } => {
                let left = self.eval_expression(left)?;
                let right = self.eval_expression(right)?;
                eval_binary_operation(*operator, left, right)
            }
            Expression::Assign { name, value } => {
                let value = self.eval_expression(value)?;
                self.assign(&name.name, value.clone());
                Ok(value)
            }
            Expression::Call { callee, arguments } => match callee.as_ref() {
                Expression::Get { object, property } => {
                    let object = native_object(self.eval_expression(object)?)?;
                    let arguments = self.eval_expressions(arguments)?;
                    tracing::trace!(
                        type_name = object.type_name(),
                        method = %property,
                        "calling native method"
                    );
                    object.call_method(&property.name, &arguments)
                }
                _ => {
                    let callee = self.eval_expression(callee)?;
                    self.eval_call(callee, arguments)
                }
            },
            Expression::Get { object, property } => {
                native_object(self.eval_expression(object)?)?.get_property(&property.name)
            }
            Expression::Set {
                object,
                property,
                value,
            } => {
                let object = self.eval_expression(object)?;
                let value = self.eval_expression(value)?;
                native_object(object)?.set_property(&property.name, value.clone())?;
                Ok(value)
            }
        }
    }

    fn eval_expressions(&mut self, expressions: &[Expression]) -> Result<Vec<Value>, EvaluationError> {
        let mut result = Vec::with_capacity(expressions.len());
        for expression in expressions {
            result.push(self.eval_expression(expression)?);
        }
        Ok(result)
    }

    fn eval_call(&mut self, callee: Value, arguments: &[Expression]) -> Result<Value, EvaluationError> {
        let function = match &callee {
            Value::Function(function) => function.clone(),
            other => return Err(EvaluationError::NotCallable(other.type_name().to_string())),
        };

        let arguments = self.eval_expressions(arguments)?;
        if arguments.len() != function.arity() {
            return Err(EvaluationError::ArityMismatch {
                expected: function.arity(),
                actual: arguments.len(),
            });
        }

        tracing::debug!(function = %function.name, "calling function");
        let environment = Environment::new_enclosed(&function.closure);
        for (parameter, argument) in function.parameters.iter().zip(arguments) {
            environment.define(&parameter.name, argument);
        }

        match self.execute_block(&function.body.statements, environment)? {
            Flow::Returning(value) => Ok(value),
            Flow::Normal(_) => Ok(Value::Null),
        }
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

fn native_object(value: Value) -> Result<Rc<dyn NativeObject>, EvaluationError> {
    match &value {
        Value::Native(object) => Ok(object.clone()),
        other => Err(EvaluationError::TypeMismatch(format!(
            "only native objects have members, got {}",
            other.type_name()
        ))),
    }
}

fn eval_binary_operation(
    operator: BinaryOperator,
    left: Value,
    right: Value,
) -> Result<Value, EvaluationError> {
    match (operator, &left, &right) {
        (BinaryOperator::Add, Value::String(left), Value::String(right)) => {
            Ok(Value::from(format!("{}{}", left, right)))
        }
        (_, Value::Int(left), Value::Int(right)) => eval_integer_operation(operator, *left, *right),
        (_, Value::Int(_) | Value::Double(_), Value::Int(_) | Value::Double(_)) => {
            match (left.as_double(), right.as_double()) {
                (Some(left), Some(right)) => eval_double_operation(operator, left, right),
                _ => Err(operand_mismatch(operator, &left, &right)),
            }
        }
        _ => Err(operand_mismatch(operator, &left, &right)),
    }
}

fn eval_integer_operation(
    operator: BinaryOperator,
    left: i64,
    right: i64,
) -> Result<Value, EvaluationError> {
    match operator {
        BinaryOperator::Add => Ok(Value::Int(left.wrapping_add(right))),
        BinaryOperator::Subtract => Ok(Value::Int(left.wrapping_sub(right))),
        BinaryOperator::Multiply => Ok(Value::Int(left.wrapping_mul(right))),
        BinaryOperator::Divide => {
            if right == 0 {
                Err(EvaluationError::DivisionByZero)
            } else if left.wrapping_rem(right) == 0 {
                Ok(Value::Int(left.wrapping_div(right)))
            } else {
                Ok(Value::Double(left as f64 / right as f64))
            }
        }
    }
}

fn eval_double_operation(
    operator: BinaryOperator,
    left: f64,
    right: f64,
) -> Result<Value, EvaluationError> {
    match operator {
        BinaryOperator::Add => Ok(Value::Double(left + right)),
        BinaryOperator::Subtract => Ok(Value::Double(left - right)),
        BinaryOperator::Multiply => Ok(Value::Double(left * right)),
        BinaryOperator::Divide if right == 0.0 => Err(EvaluationError::DivisionByZero),
        BinaryOperator::Divide => Ok(Value::Double(left / right)),
    }
}

fn operand_mismatch(operator: BinaryOperator, left: &Value, right: &Value) -> EvaluationError {
    let expected = match operator {
        BinaryOperator::Add => "numbers or strings",
        _ => "numbers",
    };
    EvaluationError::TypeMismatch(format!(
        "operands of '{}' must be {}, got {} and {}",
        operator,
        expected,
        left.type_name(),
        right.type_name()
    ))
}
