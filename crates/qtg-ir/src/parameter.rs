//! Parameter expressions for parameterized circuits.
//!
//! Variational layers carry symbolic angles such as `γ[0]` or `β[1]`. Gates
//! hold a [`ParameterExpression`] tree that stays symbolic until a value is
//! bound, at which point [`ParameterExpression::as_f64`] folds it to a number.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::f64::consts::PI;
use std::fmt;

/// Arithmetic operator of a [`ParameterExpression::Binary`] node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinaryOp {
    /// Evaluate on numbers; `None` for division by zero.
    fn eval(self, a: f64, b: f64) -> Option<f64> {
        match self {
            BinaryOp::Add => Some(a + b),
            BinaryOp::Sub => Some(a - b),
            BinaryOp::Mul => Some(a * b),
            BinaryOp::Div if b == 0.0 => None,
            BinaryOp::Div => Some(a / b),
        }
    }

    fn symbol(self) -> char {
        match self {
            BinaryOp::Add => '+',
            BinaryOp::Sub => '-',
            BinaryOp::Mul => '*',
            BinaryOp::Div => '/',
        }
    }
}

/// A symbolic or concrete angle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParameterExpression {
    Constant(f64),
    Symbol(String),
    Pi,
    Neg(Box<ParameterExpression>),
    Binary(BinaryOp, Box<ParameterExpression>, Box<ParameterExpression>),
}

impl ParameterExpression {
    pub fn constant(value: f64) -> Self {
        ParameterExpression::Constant(value)
    }

    pub fn symbol(name: impl Into<String>) -> Self {
        ParameterExpression::Symbol(name.into())
    }

    pub fn pi() -> Self {
        ParameterExpression::Pi
    }

    fn binary(op: BinaryOp, a: Self, b: Self) -> Self {
        ParameterExpression::Binary(op, Box::new(a), Box::new(b))
    }

    /// Multiply by a constant factor, folding the result when possible.
    #[must_use]
    pub fn scaled(&self, factor: f64) -> Self {
        Self::binary(BinaryOp::Mul, factor.into(), self.clone()).simplify()
    }

    /// Whether any free symbol remains.
    pub fn is_symbolic(&self) -> bool {
        match self {
            ParameterExpression::Symbol(_) => true,
            ParameterExpression::Constant(_) | ParameterExpression::Pi => false,
            ParameterExpression::Neg(e) => e.is_symbolic(),
            ParameterExpression::Binary(_, a, b) => a.is_symbolic() || b.is_symbolic(),
        }
    }

    /// Numeric value, if the expression is closed and well defined.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParameterExpression::Constant(v) => Some(*v),
            ParameterExpression::Symbol(_) => None,
            ParameterExpression::Pi => Some(PI),
            ParameterExpression::Neg(e) => e.as_f64().map(|v| -v),
            ParameterExpression::Binary(op, a, b) => op.eval(a.as_f64()?, b.as_f64()?),
        }
    }

    /// Free symbols, sorted by name.
    pub fn symbols(&self) -> BTreeSet<String> {
        let mut set = BTreeSet::new();
        self.collect_symbols(&mut set);
        set
    }

    pub(crate) fn collect_symbols(&self, set: &mut BTreeSet<String>) {
        match self {
            ParameterExpression::Constant(_) | ParameterExpression::Pi => {}
            ParameterExpression::Symbol(name) => {
                set.insert(name.clone());
            }
            ParameterExpression::Neg(e) => e.collect_symbols(set),
            ParameterExpression::Binary(_, a, b) => {
                a.collect_symbols(set);
                b.collect_symbols(set);
            }
        }
    }

    /// Replace `name` by a number.
    pub fn bind(&self, name: &str, value: f64) -> Self {
        self.substitute(name, &value.into())
    }

    /// Replace every occurrence of `name` by `replacement`.
    pub fn substitute(&self, name: &str, replacement: &ParameterExpression) -> Self {
        match self {
            ParameterExpression::Symbol(n) if n == name => replacement.clone(),
            ParameterExpression::Neg(e) => {
                ParameterExpression::Neg(Box::new(e.substitute(name, replacement)))
            }
            ParameterExpression::Binary(op, a, b) => Self::binary(
                *op,
                a.substitute(name, replacement),
                b.substitute(name, replacement),
            ),
            _ => self.clone(),
        }
    }

    /// Fold closed subexpressions and drop additive zeros and unit factors.
    pub fn simplify(&self) -> Self {
        if let Some(v) = self.as_f64() {
            return ParameterExpression::Constant(v);
        }
        match self {
            ParameterExpression::Neg(e) => -e.simplify(),
            ParameterExpression::Binary(op, a, b) => {
                let (a, b) = (a.simplify(), b.simplify());
                match (op, a.as_f64(), b.as_f64()) {
                    (BinaryOp::Add, Some(z), None) if z == 0.0 => b,
                    (BinaryOp::Add | BinaryOp::Sub, None, Some(z)) if z == 0.0 => a,
                    (BinaryOp::Mul, Some(u), None) if u == 1.0 => b,
                    (BinaryOp::Mul | BinaryOp::Div, None, Some(u)) if u == 1.0 => a,
                    _ => Self::binary(*op, a, b),
                }
            }
            _ => self.clone(),
        }
    }
}

impl fmt::Display for ParameterExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterExpression::Constant(v) => write!(f, "{v}"),
            ParameterExpression::Symbol(name) => f.write_str(name),
            ParameterExpression::Pi => f.write_str("π"),
            ParameterExpression::Neg(e) => write!(f, "-({e})"),
            ParameterExpression::Binary(op, a, b) => write!(f, "({a} {} {b})", op.symbol()),
        }
    }
}

impl From<f64> for ParameterExpression {
    fn from(value: f64) -> Self {
        ParameterExpression::Constant(value)
    }
}

impl From<i32> for ParameterExpression {
    fn from(value: i32) -> Self {
        ParameterExpression::Constant(f64::from(value))
    }
}

macro_rules! binary_operator {
    ($trait:ident, $method:ident, $op:ident) => {
        impl std::ops::$trait for ParameterExpression {
            type Output = Self;

            fn $method(self, rhs: Self) -> Self {
                Self::binary(BinaryOp::$op, self, rhs)
            }
        }
    };
}

binary_operator!(Add, add, Add);
binary_operator!(Sub, sub, Sub);
binary_operator!(Mul, mul, Mul);
binary_operator!(Div, div, Div);

impl std::ops::Neg for ParameterExpression {
    type Output = Self;

    fn neg(self) -> Self::Output {
        match self {
            ParameterExpression::Constant(v) => ParameterExpression::Constant(-v),
            ParameterExpression::Neg(e) => *e,
            other => ParameterExpression::Neg(Box::new(other)),
        }
    }
}
