// Copyright 2022-2023 VMware, Inc.
// SPDX-License-Identifier: BSD-2-Clause

//! Canonical rendering of expressions and sets.
//!
//! The rendering is deterministic and keeps summands in their stored order.
//! It is used as the structural identity of expressions elsewhere, so changes
//! here change which expressions are considered equal.

use std::fmt;

use itertools::Itertools;

use crate::syntax::*;

/// Names used for tuple variables while rendering. Outside of a set, tuple
/// variables print as `__tv<index>`.
type TupleNames<'a> = Option<&'a [TupleElem]>;

fn tuple_var(index: usize, names: TupleNames) -> String {
    match names.and_then(|n| n.get(index)) {
        Some(TupleElem::Var(name)) => name.clone(),
        _ => format!("__tv{index}"),
    }
}

fn factor(t: &Term, names: TupleNames) -> String {
    match t {
        Term::Const(_) => "1".to_string(),
        Term::TupleVar { index, .. } => tuple_var(*index, names),
        Term::Var { name, .. } => name.clone(),
        Term::UFCall { call, .. } => uf_call(call, names),
    }
}

fn summand(t: &Term, names: TupleNames) -> String {
    let c = t.coeff().unsigned_abs();
    match t {
        Term::Const(_) => c.to_string(),
        _ if c == 1 => factor(t, names),
        _ => format!("{c}*{}", factor(t, names)),
    }
}

fn exp(e: &Exp, names: TupleNames) -> String {
    if e.is_zero() {
        return "0".to_string();
    }
    let mut s = String::new();
    for (i, t) in e.terms().iter().enumerate() {
        let neg = t.coeff() < 0;
        match (i, neg) {
            (0, false) => (),
            (0, true) => s.push('-'),
            (_, false) => s.push_str(" + "),
            (_, true) => s.push_str(" - "),
        }
        s.push_str(&summand(t, names));
    }
    s
}

fn uf_call(call: &UFCallTerm, names: TupleNames) -> String {
    format!(
        "{}({})",
        call.name,
        call.args.iter().map(|a| exp(a, names)).join(", ")
    )
}

fn cmp_op(op: CmpOp) -> &'static str {
    match op {
        CmpOp::Eq => "=",
        CmpOp::Le => "<=",
        CmpOp::Lt => "<",
        CmpOp::Ge => ">=",
        CmpOp::Gt => ">",
    }
}

fn constraint(c: &Constraint, names: TupleNames) -> String {
    format!(
        "{} {} {}",
        exp(&c.lhs, names),
        cmp_op(c.op),
        exp(&c.rhs, names)
    )
}

fn tuple_elem(e: &TupleElem) -> String {
    match e {
        TupleElem::Var(name) => name.clone(),
        TupleElem::Const(c) => c.to_string(),
    }
}

fn set(s: &Set) -> String {
    let tuple = s.tuple.iter().map(tuple_elem).join(", ");
    if s.constraints.is_empty() {
        format!("{{ [{tuple}] }}")
    } else {
        let names = Some(s.tuple.as_slice());
        let constraints = s.constraints.iter().map(|c| constraint(c, names)).join(" && ");
        format!("{{ [{tuple}] : {constraints} }}")
    }
}

impl fmt::Display for Exp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", exp(self, None))
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", exp(&Exp::from(self.clone()), None))
    }
}

impl fmt::Display for UFCallTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", uf_call(self, None))
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", constraint(self, None))
    }
}

impl fmt::Display for Set {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", set(self))
    }
}
