// Copyright 2022-2023 VMware, Inc.
// SPDX-License-Identifier: BSD-2-Clause

//! The AST for affine expressions with uninterpreted function calls, and the
//! sets built from them.

use serde::Serialize;
use thiserror::Error;

/// Coefficient arithmetic left the range of `i64`.
#[derive(Error, PartialEq, Eq, Clone, Copy, Debug)]
#[error("coefficient overflow")]
pub struct CoeffOverflow;

/// A single summand of an [`Exp`].
#[derive(PartialEq, Eq, Clone, Debug, Hash, Serialize, PartialOrd, Ord)]
pub enum Term {
    /// An integer literal
    Const(i64),
    /// A reference to a position in the enclosing tuple, `coeff * __tv<index>`
    TupleVar {
        /// Multiplier for the tuple variable
        coeff: i64,
        /// Position in the tuple (0-based)
        index: usize,
    },
    /// A free named variable (a symbolic constant), `coeff * name`
    Var {
        /// Multiplier for the variable
        coeff: i64,
        /// Name of the variable
        name: String,
    },
    /// An uninterpreted function call, `coeff * name(args)`
    UFCall {
        /// Multiplier for the call's value
        coeff: i64,
        /// The call itself
        call: UFCallTerm,
    },
}

/// Smart constructors for Term.
impl Term {
    /// Smart constructor for a tuple variable with coefficient 1
    pub fn tuple_var(index: usize) -> Self {
        Self::TupleVar { coeff: 1, index }
    }

    /// Smart constructor for a named variable with coefficient 1
    pub fn var(name: &str) -> Self {
        Self::Var {
            coeff: 1,
            name: name.to_string(),
        }
    }

    /// Smart constructor for a call term with coefficient 1
    pub fn call(call: UFCallTerm) -> Self {
        Self::UFCall { coeff: 1, call }
    }

    /// The multiplier of this term. For a literal this is its value.
    pub fn coeff(&self) -> i64 {
        match self {
            Term::Const(c) => *c,
            Term::TupleVar { coeff, .. } | Term::Var { coeff, .. } | Term::UFCall { coeff, .. } => {
                *coeff
            }
        }
    }

    /// Return a copy of this term with the given multiplier.
    pub fn with_coeff(&self, c: i64) -> Self {
        let mut t = self.clone();
        match &mut t {
            Term::Const(v) => *v = c,
            Term::TupleVar { coeff, .. } | Term::Var { coeff, .. } | Term::UFCall { coeff, .. } => {
                *coeff = c
            }
        }
        t
    }

    /// Whether two terms differ only in their coefficients, so that they can
    /// be combined into one summand.
    pub fn same_factor(&self, other: &Term) -> bool {
        match (self, other) {
            (Term::Const(_), Term::Const(_)) => true,
            (Term::TupleVar { index: i, .. }, Term::TupleVar { index: j, .. }) => i == j,
            (Term::Var { name: a, .. }, Term::Var { name: b, .. }) => a == b,
            (Term::UFCall { call: a, .. }, Term::UFCall { call: b, .. }) => a == b,
            _ => false,
        }
    }
}

/// An application of an uninterpreted function to a tuple of expressions.
#[derive(PartialEq, Eq, Clone, Debug, Hash, Serialize, PartialOrd, Ord)]
pub struct UFCallTerm {
    /// Name of the function being called
    pub name: String,
    /// Argument expressions, in order
    pub args: Vec<Exp>,
}

impl UFCallTerm {
    /// Smart constructor that accepts anything convertible to expressions.
    pub fn new<I>(name: &str, args: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Exp>,
    {
        UFCallTerm {
            name: name.to_string(),
            args: args.into_iter().map(|x| x.into()).collect(),
        }
    }

    /// Number of arguments the call is applied to.
    pub fn arity(&self) -> usize {
        self.args.len()
    }
}

/// An affine sum of [`Term`]s.
///
/// Terms keep the order in which they were first added. Adding a term whose
/// factor is already present only updates that summand's coefficient.
#[derive(PartialEq, Eq, Clone, Debug, Default, Hash, Serialize, PartialOrd, Ord)]
pub struct Exp {
    terms: Vec<Term>,
}

impl From<Term> for Exp {
    fn from(value: Term) -> Self {
        let mut e = Exp::new();
        e.add_term(value);
        e
    }
}

impl From<&Exp> for Exp {
    fn from(value: &Self) -> Self {
        value.clone()
    }
}

impl From<i64> for Exp {
    fn from(value: i64) -> Self {
        Term::Const(value).into()
    }
}

impl Exp {
    /// The empty sum (zero).
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a sum from a sequence of terms, combining like terms.
    ///
    /// # Panics
    ///
    /// Panics if combining like terms overflows a coefficient; see
    /// [`Exp::try_sum`].
    pub fn sum<I>(terms: I) -> Self
    where
        I: IntoIterator<Item = Term>,
    {
        Self::try_sum(terms).unwrap_or_else(|err| panic!("{err}"))
    }

    /// Build a sum from a sequence of terms, failing if combining like terms
    /// overflows a coefficient.
    pub fn try_sum<I>(terms: I) -> Result<Self, CoeffOverflow>
    where
        I: IntoIterator<Item = Term>,
    {
        let mut e = Exp::new();
        for t in terms {
            e.try_add_term(t)?;
        }
        Ok(e)
    }

    /// Add a term to the sum. Summands whose coefficient becomes zero are removed.
    ///
    /// # Panics
    ///
    /// Panics if the combined coefficient overflows; see [`Exp::try_add_term`].
    pub fn add_term(&mut self, term: Term) {
        self.try_add_term(term).unwrap_or_else(|err| panic!("{err}"))
    }

    /// Add a term to the sum. On overflow the sum is left unchanged.
    pub fn try_add_term(&mut self, term: Term) -> Result<(), CoeffOverflow> {
        if term.coeff() == 0 {
            return Ok(());
        }
        match self.terms.iter().position(|t| t.same_factor(&term)) {
            Some(i) => {
                let c = self.terms[i]
                    .coeff()
                    .checked_add(term.coeff())
                    .ok_or(CoeffOverflow)?;
                if c == 0 {
                    self.terms.remove(i);
                } else {
                    self.terms[i] = self.terms[i].with_coeff(c);
                }
            }
            None => self.terms.push(term),
        }
        Ok(())
    }

    /// Add every term of `other` to this sum.
    ///
    /// # Panics
    ///
    /// Panics on coefficient overflow; see [`Exp::try_add_exp`].
    pub fn add_exp(&mut self, other: Exp) {
        self.try_add_exp(other).unwrap_or_else(|err| panic!("{err}"))
    }

    /// Add every term of `other` to this sum. On overflow the sum is left
    /// unchanged.
    pub fn try_add_exp(&mut self, other: Exp) -> Result<(), CoeffOverflow> {
        let mut sum = self.clone();
        for t in other.terms {
            sum.try_add_term(t)?;
        }
        *self = sum;
        Ok(())
    }

    /// Multiply every summand by `c`.
    ///
    /// # Panics
    ///
    /// Panics on coefficient overflow; see [`Exp::try_multiply`].
    pub fn multiply(&mut self, c: i64) {
        self.try_multiply(c).unwrap_or_else(|err| panic!("{err}"))
    }

    /// Multiply every summand by `c`. On overflow the sum is left unchanged.
    pub fn try_multiply(&mut self, c: i64) -> Result<(), CoeffOverflow> {
        if c == 0 {
            self.terms.clear();
            return Ok(());
        }
        self.terms = self
            .terms
            .iter()
            .map(|t| {
                t.coeff()
                    .checked_mul(c)
                    .map(|coeff| t.with_coeff(coeff))
                    .ok_or(CoeffOverflow)
            })
            .collect::<Result<_, _>>()?;
        Ok(())
    }

    /// The summands of this expression, in order.
    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    /// Whether this is the empty sum.
    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    /// Whether some summand is an uninterpreted function call.
    pub fn has_calls(&self) -> bool {
        self.terms
            .iter()
            .any(|t| matches!(t, Term::UFCall { .. }))
    }

    /// Resolve named variables that are tuple element names into tuple
    /// variables, including inside call arguments.
    pub(crate) fn resolve_tuple_names(&self, names: &[TupleElem]) -> Result<Exp, CoeffOverflow> {
        let terms = self
            .terms
            .iter()
            .map(|t| t.resolve_tuple_names(names))
            .collect::<Result<Vec<_>, _>>()?;
        Exp::try_sum(terms)
    }
}

impl Term {
    fn resolve_tuple_names(&self, names: &[TupleElem]) -> Result<Term, CoeffOverflow> {
        Ok(match self {
            Term::Var { coeff, name } => match names
                .iter()
                .position(|e| matches!(e, TupleElem::Var(n) if n == name))
            {
                Some(index) => Term::TupleVar {
                    coeff: *coeff,
                    index,
                },
                None => self.clone(),
            },
            Term::UFCall { coeff, call } => Term::UFCall {
                coeff: *coeff,
                call: UFCallTerm {
                    name: call.name.clone(),
                    args: call
                        .args
                        .iter()
                        .map(|a| a.resolve_tuple_names(names))
                        .collect::<Result<_, _>>()?,
                },
            },
            Term::Const(_) | Term::TupleVar { .. } => self.clone(),
        })
    }
}

/// Comparison operators for constraints
#[allow(missing_docs)]
#[derive(PartialEq, Eq, Clone, Copy, Debug, Hash, Serialize, PartialOrd, Ord)]
pub enum CmpOp {
    Eq,
    Le,
    Lt,
    Ge,
    Gt,
}

/// A single constraint `lhs op rhs`
#[allow(missing_docs)]
#[derive(PartialEq, Eq, Clone, Debug, Hash, Serialize)]
pub struct Constraint {
    pub lhs: Exp,
    pub op: CmpOp,
    pub rhs: Exp,
}

/// An element of a set's tuple declaration: either a named tuple variable or
/// a fixed integer.
#[derive(PartialEq, Eq, Clone, Debug, Hash, Serialize)]
pub enum TupleElem {
    /// A tuple variable, referenced in constraints by name
    Var(String),
    /// A constant tuple position
    Const(i64),
}

/// A set of integer tuples `{ [t0, ..., tk] : c1 && ... && cn }`.
///
/// Only the tuple shape, deep copying and rendering matter to the UF
/// bookkeeping; constraints are kept as written.
#[derive(PartialEq, Eq, Clone, Debug, Hash, Serialize)]
pub struct Set {
    /// The tuple declaration
    pub tuple: Vec<TupleElem>,
    /// Conjunction of constraints; named references to tuple elements are
    /// stored as [`Term::TupleVar`]
    pub constraints: Vec<Constraint>,
}

impl Set {
    /// Smart constructor. Named variables in the constraints that match a tuple
    /// element name are turned into tuple variables.
    ///
    /// # Panics
    ///
    /// Panics if merging a resolved name with an existing tuple variable
    /// overflows its coefficient; see [`Set::try_new`].
    pub fn new(tuple: Vec<TupleElem>, constraints: Vec<Constraint>) -> Self {
        Self::try_new(tuple, constraints).unwrap_or_else(|err| panic!("{err}"))
    }

    /// Like [`Set::new`], but reports coefficient overflow.
    pub fn try_new(
        tuple: Vec<TupleElem>,
        constraints: Vec<Constraint>,
    ) -> Result<Self, CoeffOverflow> {
        let constraints = constraints
            .into_iter()
            .map(|c| {
                Ok(Constraint {
                    lhs: c.lhs.resolve_tuple_names(&tuple)?,
                    op: c.op,
                    rhs: c.rhs.resolve_tuple_names(&tuple)?,
                })
            })
            .collect::<Result<_, _>>()?;
        Ok(Set { tuple, constraints })
    }

    /// The unconstrained set over the given tuple variable names.
    pub fn universe(names: &[&str]) -> Self {
        Set {
            tuple: names.iter().map(|n| TupleElem::Var(n.to_string())).collect(),
            constraints: vec![],
        }
    }

    /// Number of tuple positions.
    pub fn arity(&self) -> usize {
        self.tuple.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_term_combines() {
        let mut e = Exp::new();
        e.add_term(Term::tuple_var(0));
        e.add_term(Term::Const(1));
        e.add_term(Term::Var {
            coeff: 2,
            name: "n".to_string(),
        });
        e.add_term(Term::Const(2));
        e.add_term(Term::tuple_var(0));
        assert_eq!(
            e.terms(),
            &[
                Term::TupleVar { coeff: 2, index: 0 },
                Term::Const(3),
                Term::Var {
                    coeff: 2,
                    name: "n".to_string()
                },
            ]
        );

        e.add_term(Term::Const(-3));
        assert_eq!(e.terms().len(), 2);
        e.multiply(0);
        assert!(e.is_zero());
    }

    #[test]
    fn test_coeff_overflow() {
        let mut e = Exp::from(Term::Var {
            coeff: i64::MAX,
            name: "n".to_string(),
        });
        assert_eq!(e.try_add_term(Term::var("n")), Err(CoeffOverflow));
        assert_eq!(e.try_multiply(2), Err(CoeffOverflow));
        assert_eq!(
            e.try_add_exp(Exp::sum([Term::Const(1), Term::var("n")])),
            Err(CoeffOverflow)
        );
        // a failed operation leaves the sum as it was
        assert_eq!(
            e.terms(),
            &[Term::Var {
                coeff: i64::MAX,
                name: "n".to_string()
            }]
        );

        let mut min = Exp::from(i64::MIN);
        assert_eq!(min.try_multiply(-1), Err(CoeffOverflow));
        assert_eq!(min.try_multiply(1), Ok(()));
        assert_eq!(
            Exp::try_sum([Term::Const(i64::MIN), Term::Const(-1)]),
            Err(CoeffOverflow)
        );

        let s = Set::try_new(
            vec![TupleElem::Var("i".to_string())],
            vec![Constraint {
                lhs: Exp::sum([
                    Term::Var {
                        coeff: i64::MAX,
                        name: "i".to_string(),
                    },
                    Term::tuple_var(0),
                ]),
                op: CmpOp::Eq,
                rhs: Exp::new(),
            }],
        );
        assert_eq!(s, Err(CoeffOverflow));
    }

    #[test]
    fn test_call_arity() {
        let call = UFCallTerm::new("f", [Term::var("x"), Term::Const(3)]);
        assert_eq!(call.arity(), 2);
        assert!(Exp::from(Term::call(call)).has_calls());
        assert!(!Exp::from(Term::var("x")).has_calls());
    }

    #[test]
    fn test_set_resolves_tuple_names() {
        let s = Set::new(
            vec![TupleElem::Var("i".to_string()), TupleElem::Const(0)],
            vec![Constraint {
                lhs: Exp::from(0i64),
                op: CmpOp::Le,
                rhs: Term::var("i").into(),
            }],
        );
        assert_eq!(s.arity(), 2);
        assert_eq!(s.constraints[0].rhs.terms(), &[Term::tuple_var(0)]);
    }
}
