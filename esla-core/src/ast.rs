use std::fmt::Display;
use std::rc::Rc;

#[derive(Debug, PartialEq, Clone)]
pub enum Statement {
    Expression(Expression),
    FunctionDecl(FunctionDecl),
    Return(Option<Expression>),
    Block(Block),
}

#[derive(Debug, PartialEq, Clone)]
pub struct FunctionDecl {
    pub name: Identifier,
    pub parameters: Vec<Identifier>,
    /// Shared with every function value created from this declaration.
    pub body: Rc<Block>,
}

#[derive(Debug, PartialEq, Clone)]
pub enum Expression {
    Literal(Literal),
    Variable(Identifier),
    Binary {
        operator: BinaryOperator,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    Assign {
        name: Identifier,
        value: Box<Expression>,
    },
    Call {
        callee: Box<Expression>,
        arguments: Vec<Expression>,
    },
    Get {
        object: Box<Expression>,
        property: Identifier,
    },
    Set {
        object: Box<Expression>,
        property: Identifier,
        value: Box<Expression>,
    },
}

/// Constant carried by a literal token.
#[derive(Debug, PartialEq, Clone)]
pub enum Literal {
    Int(i64),
    Double(f64),
    String(Rc<str>),
    Bool(bool),
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub struct Identifier {
    pub name: Rc<str>,
}

#[derive(Debug, PartialEq, Clone, Default)]
pub struct Program {
    pub statements: Vec<Statement>,
}

#[derive(Debug, PartialEq, Clone, Default)]
pub struct Block {
    pub statements: Vec<Statement>,
}

impl From<&str> for Identifier {
    fn from(name: &str) -> Self {
        Identifier { name: name.into() }
    }
}

/// Fixed six-digit rendering with the trailing zeros (and a bare trailing
/// point) removed, so `3.5` prints as `3.5` and `7.0` as `7`.
pub fn format_double(value: f64) -> String {
    let text = format!("{:.6}", value);
    if !text.contains('.') {
        return text;
    }
    text.trim_end_matches('0').trim_end_matches('.').to_owned()
}

impl BinaryOperator {
    pub fn symbol(&self) -> &'static str {
        use BinaryOperator::*;
        match self {
            Add => "+",
            Subtract => "-",
            Multiply => "*",
            Divide => "/",
        }
    }
}

impl Display for BinaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use Literal::*;
        match self {
            Int(val) => write!(f, "{}", val),
            Double(val) => write!(f, "{}", format_double(*val)),
            String(val) => write!(f, "'{}'", val),
            Bool(val) => write!(f, "{}", val),
        }
    }
}

impl Display for Block {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{{")?;
        for statement in &self.statements {
            writeln!(f, "  {}", statement)?;
        }
        write!(f, "}}")
    }
}

impl Display for FunctionDecl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "function {}({}) {}",
            self.name,
            self.parameters
                .iter()
                .map(|id| id.name.as_ref())
                .collect::<Box<[&str]>>()
                .join(", "),
            self.body
        )
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use Expression::*;
        match self {
            Literal(literal) => write!(f, "{}", literal),
            Variable(ident) => write!(f, "{}", ident),
            Binary {
                operator,
                left,
                right,
            } => write!(f, "({} {} {})", left, operator, right),
            Assign { name, value } => write!(f, "{} = {}", name, value),
            Call { callee, arguments } => {
                write!(
                    f,
                    "{}({})",
                    callee,
                    arguments
                        .iter()
                        .map(|arg| arg.to_string())
                        .collect::<Vec<String>>()
                        .join(", ")
                )
            }
            Get { object, property } => write!(f, "{}.{}", object, property),
            Set {
                object,
                property,
                value,
            } => write!(f, "{}.{} = {}", object, property, value),
        }
    }
}

impl Display for Statement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use Statement::*;
        match self {
            Expression(expression) => write!(f, "{};", expression),
            FunctionDecl(declaration) => write!(f, "{}", declaration),
            Return(Some(value)) => write!(f, "return {};", value),
            Return(None) => write!(f, "return;"),
            Block(block) => write!(f, "{}", block),
        }
    }
}

impl Display for Program {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for statement in &self.statements {
            writeln!(f, "{}", statement)?;
        }
        Ok(())
    }
}
