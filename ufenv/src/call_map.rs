// Copyright 2022-2023 VMware, Inc.
// SPDX-License-Identifier: BSD-2-Clause

//! A bijection between uninterpreted function calls and symbolic constants.
//!
//! A solver that only understands affine constraints can treat each distinct
//! call as an opaque integer unknown. [`UFCallMap`] hands out one
//! [`SymbolicConstant`] per structurally distinct call, named by the call's
//! [canonical key](crate::encoding::canonical_key), and can map the constant
//! back to the call.

use std::{collections::BTreeMap, fmt};

use setrel::syntax::{Exp, Term, UFCallTerm};

use crate::encoding::canonical_key;

/// A free variable standing for the value of one uninterpreted function call.
#[derive(PartialEq, Eq, Clone, Debug, Hash, PartialOrd, Ord)]
pub struct SymbolicConstant {
    name: String,
}

impl SymbolicConstant {
    #[allow(missing_docs)]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The constant as a named variable term with coefficient 1.
    pub fn to_term(&self) -> Term {
        Term::var(&self.name)
    }
}

impl fmt::Display for SymbolicConstant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Maps each call seen so far to its symbolic constant and back.
///
/// Entries are only ever added. Calls are compared by their canonical key, so
/// a call built independently from the inserted one is found as long as it
/// renders the same way.
#[derive(Clone, Debug, Default)]
pub struct UFCallMap {
    /// canonical key to the constant and the call it stands for
    forward: BTreeMap<String, (SymbolicConstant, UFCallTerm)>,
    /// constant name to canonical key
    backward: BTreeMap<String, String>,
}

impl UFCallMap {
    #[allow(missing_docs)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the symbolic constant for `call`, creating it if this is the first
    /// time the call is seen.
    pub fn insert(&mut self, call: &UFCallTerm) -> SymbolicConstant {
        let key = canonical_key(&call.name, &call.args);
        if let Some((constant, _)) = self.forward.get(&key) {
            return constant.clone();
        }
        let constant = SymbolicConstant { name: key.clone() };
        log::debug!("new symbolic constant {constant} for {call}");
        self.backward.insert(constant.name.clone(), key.clone());
        self.forward.insert(key, (constant.clone(), call.clone()));
        constant
    }

    /// The symbolic constant previously created for `call`, if any.
    pub fn find_constant(&self, call: &UFCallTerm) -> Option<SymbolicConstant> {
        let key = canonical_key(&call.name, &call.args);
        self.forward.get(&key).map(|(constant, _)| constant.clone())
    }

    /// The call that `constant` stands for, if it came from this map.
    pub fn find_call(&self, constant: &SymbolicConstant) -> Option<UFCallTerm> {
        self.find_call_by_name(&constant.name)
    }

    fn find_call_by_name(&self, name: &str) -> Option<UFCallTerm> {
        let key = self.backward.get(name)?;
        self.forward.get(key).map(|(_, call)| call.clone())
    }

    /// Check if `call` has a symbolic constant.
    pub fn contains(&self, call: &UFCallTerm) -> bool {
        self.find_constant(call).is_some()
    }

    /// Number of distinct calls.
    pub fn len(&self) -> usize {
        self.forward.len()
    }

    #[allow(missing_docs)]
    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// Replace every call in `exp` by its symbolic constant, creating
    /// constants as needed. Arguments are abstracted first, so a nested call
    /// like `f(g(i))` becomes a constant for `f(<constant for g(i)>)`.
    pub fn replace_calls(&mut self, exp: &Exp) -> Exp {
        Exp::sum(exp.terms().iter().map(|t| match t {
            Term::UFCall { coeff, call } => {
                let inner = UFCallTerm {
                    name: call.name.clone(),
                    args: call.args.iter().map(|a| self.replace_calls(a)).collect(),
                };
                self.insert(&inner).to_term().with_coeff(*coeff)
            }
            _ => t.clone(),
        }))
    }

    /// Undo [`Self::replace_calls`]: every variable that is one of this map's
    /// constants becomes its call again (with its arguments restored too).
    /// Other variables are left alone.
    ///
    /// Constants are recognized by name only. A caller's own variable that is
    /// spelled like one of this map's keys (say a variable named `f_Li_R`
    /// after `f(i)` was inserted) is rewritten into the call as well.
    pub fn restore_calls(&self, exp: &Exp) -> Exp {
        Exp::sum(exp.terms().iter().map(|t| match t {
            Term::Var { coeff, name } => match self.find_call_by_name(name) {
                Some(call) => Term::UFCall {
                    coeff: *coeff,
                    call: UFCallTerm {
                        name: call.name.clone(),
                        args: call.args.iter().map(|a| self.restore_calls(a)).collect(),
                    },
                },
                None => t.clone(),
            },
            Term::UFCall { coeff, call } => Term::UFCall {
                coeff: *coeff,
                call: UFCallTerm {
                    name: call.name.clone(),
                    args: call.args.iter().map(|a| self.restore_calls(a)).collect(),
                },
            },
            Term::Const(_) | Term::TupleVar { .. } => t.clone(),
        }))
    }
}

impl fmt::Display for UFCallMap {
    /// Lists each call and its constant on its own line, sorted by key.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "UFCallMap:")?;
        for (constant, call) in self.forward.values() {
            writeln!(f, "    {call} ==> {constant}")?;
        }
        Ok(())
    }
}
