use std::collections::HashMap;

use log::{trace, warn};

use crate::config::ScopeMode;
use crate::parser::{
    ArithOp, BinaryExpr, CompareOp, Comparison, Expression, Operand, Statement, VarType,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(i64),
    Decimal(f64),
    Text(String),
}

impl Value {
    fn default_for(typ: VarType) -> Self {
        match typ {
            VarType::Integer | VarType::Decimal => Self::Integer(0),
            VarType::Text | VarType::Boolean => Self::Text(String::new()),
        }
    }

    // Text takes part in arithmetic and comparisons as 0.
    fn numeric(&self) -> Self {
        match self {
            Self::Text(_) => Self::Integer(0),
            other => other.clone(),
        }
    }

    fn to_f64(&self) -> f64 {
        match self {
            Self::Integer(i) => *i as f64,
            Self::Decimal(d) => *d,
            Self::Text(_) => 0.0,
        }
    }

    fn is_zero(&self) -> bool {
        self.to_f64() == 0.0
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Integer(i) => write!(f, "{i}"),
            // Whole decimals keep one fractional digit: `2.0`, not `2`.
            Self::Decimal(d) if d.is_finite() && d.fract() == 0.0 => write!(f, "{d:.1}"),
            Self::Decimal(d) => write!(f, "{d}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

/// Variable bindings of one execution frame, kept in first-binding order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Environment {
    names: Vec<String>,
    values: HashMap<String, Value>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn bind(&mut self, name: &str, value: Value) {
        if self.values.insert(name.to_string(), value).is_none() {
            self.names.push(name.to_string());
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.names
            .iter()
            .filter_map(|name| self.values.get(name).map(|value| (name.as_str(), value)))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    // Copies back the values of names this frame already had; names first
    // bound in `frame` stay there.
    fn write_back(&mut self, frame: &Environment) {
        for name in &self.names {
            if let Some(value) = frame.get(name) {
                self.values.insert(name.clone(), value.clone());
            }
        }
    }
}

/// Result of executing a statement sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecOutcome {
    Continue(Environment),
    Returned(Value, Environment),
}

impl ExecOutcome {
    pub fn environment(&self) -> &Environment {
        match self {
            Self::Continue(env) | Self::Returned(_, env) => env,
        }
    }

    pub fn returned(&self) -> Option<&Value> {
        match self {
            Self::Continue(_) => None,
            Self::Returned(value, _) => Some(value),
        }
    }
}

enum FlowControl {
    NextStatement,
    Return(Value),
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Interpreter {
    scope: ScopeMode,
}

impl Interpreter {
    pub fn new(scope: ScopeMode) -> Self {
        Self { scope }
    }

    pub fn execute(&self, statements: &[Statement], mut env: Environment) -> ExecOutcome {
        for statement in statements {
            if let FlowControl::Return(value) = self.evaluate(statement, &mut env) {
                return ExecOutcome::Returned(value, env);
            }
        }
        ExecOutcome::Continue(env)
    }

    fn evaluate(&self, statement: &Statement, env: &mut Environment) -> FlowControl {
        trace!("executing {:?}", statement);
        match statement {
            Statement::Declare(typ, name, init) => {
                env.bind(name, Value::default_for(*typ));
                if let Some(expr) = init {
                    let value = evaluate_expr(expr, env);
                    env.bind(name, value);
                }
                FlowControl::NextStatement
            }
            Statement::Assign(name, expr) => {
                let value = evaluate_expr(expr, env);
                env.bind(name, value);
                FlowControl::NextStatement
            }
            Statement::Return(operand) => FlowControl::Return(resolve(operand, env)),
            Statement::If(cond, then_block, else_block) => {
                if compare(cond, env) {
                    self.run_block(then_block, env)
                } else if let Some(else_block) = else_block {
                    self.run_block(else_block, env)
                } else {
                    FlowControl::NextStatement
                }
            }
            Statement::While(cond, body) => {
                while compare(cond, env) {
                    if let FlowControl::Return(value) = self.run_block(body, env) {
                        return FlowControl::Return(value);
                    }
                }
                FlowControl::NextStatement
            }
        }
    }

    // Every block runs in its own frame. With `ScopeMode::Isolated` the frame
    // starts empty and nothing but a returned value reaches the caller.
    fn run_block(&self, block: &[Statement], caller: &mut Environment) -> FlowControl {
        let frame = match self.scope {
            ScopeMode::Isolated => Environment::new(),
            ScopeMode::Inherited => caller.clone(),
        };
        let (flow, frame) = match self.execute(block, frame) {
            ExecOutcome::Continue(frame) => (FlowControl::NextStatement, frame),
            ExecOutcome::Returned(value, frame) => (FlowControl::Return(value), frame),
        };
        if self.scope == ScopeMode::Inherited {
            caller.write_back(&frame);
        }
        flow
    }
}

pub fn execute(statements: &[Statement], env: Environment) -> ExecOutcome {
    Interpreter::default().execute(statements, env)
}

fn resolve(operand: &Operand, env: &Environment) -> Value {
    match operand {
        Operand::Integer(i) => Value::Integer(*i),
        Operand::Decimal(d) => Value::Decimal(*d),
        Operand::Identifier(name) => match env.get(name) {
            Some(value) => value.clone(),
            None => {
                warn!("unbound identifier '{name}' evaluates to 0");
                Value::Integer(0)
            }
        },
    }
}

fn evaluate_expr(expression: &Expression, env: &Environment) -> Value {
    match expression {
        Expression::Operand(operand) => resolve(operand, env),
        Expression::Binary(BinaryExpr { op, left, right }) => {
            arithmetic(*op, &resolve(left, env), &resolve(right, env))
        }
    }
}

fn arithmetic(op: ArithOp, lhs: &Value, rhs: &Value) -> Value {
    let (lhs, rhs) = (lhs.numeric(), rhs.numeric());
    if op == ArithOp::Div {
        if rhs.is_zero() {
            warn!("division of {lhs} by zero evaluates to 0");
            return Value::Integer(0);
        }
        return Value::Decimal(lhs.to_f64() / rhs.to_f64());
    }
    if let (Value::Integer(a), Value::Integer(b)) = (&lhs, &rhs) {
        let exact = match op {
            ArithOp::Add => a.checked_add(*b),
            ArithOp::Sub => a.checked_sub(*b),
            ArithOp::Mul => a.checked_mul(*b),
            ArithOp::Div => unreachable!(),
        };
        if let Some(result) = exact {
            return Value::Integer(result);
        }
    }
    let (a, b) = (lhs.to_f64(), rhs.to_f64());
    Value::Decimal(match op {
        ArithOp::Add => a + b,
        ArithOp::Sub => a - b,
        ArithOp::Mul => a * b,
        ArithOp::Div => unreachable!(),
    })
}

fn compare(cond: &Comparison, env: &Environment) -> bool {
    use std::cmp::Ordering::*;

    let (lhs, rhs) = (resolve(&cond.left, env).numeric(), resolve(&cond.right, env).numeric());
    let ordering = match (&lhs, &rhs) {
        (Value::Integer(a), Value::Integer(b)) => Some(a.cmp(b)),
        _ => lhs.to_f64().partial_cmp(&rhs.to_f64()),
    };
    match cond.op {
        CompareOp::Greater => ordering == Some(Greater),
        CompareOp::Less => ordering == Some(Less),
        CompareOp::GreaterEqual => matches!(ordering, Some(Greater | Equal)),
        CompareOp::LessEqual => matches!(ordering, Some(Less | Equal)),
        CompareOp::NotEqual => ordering != Some(Equal),
    }
}
