// Copyright 2022-2023 VMware, Inc.
// SPDX-License-Identifier: BSD-2-Clause

//! The registry of declared uninterpreted functions.
//!
//! An [`Environment`] owns one [`UninterpFunc`] per declared name, plus a
//! symmetric pairing of functions with their inverses. Declaring a bijective
//! function also declares its inverse, named with [`INVERSE_SUFFIX`], with the
//! domain and range swapped.

use std::{collections::BTreeMap, fmt};

use setrel::syntax::{Set, UFCallTerm};
use thiserror::Error;

use crate::uninterp_func::{MonotonicType, UninterpFunc};

/// Suffix appended to a bijective function's name to name its inverse.
pub const INVERSE_SUFFIX: &str = "_inv";

/// An error in declaring or looking up uninterpreted functions
#[derive(Error, Debug, PartialEq, Eq)]
pub enum EnvError {
    /// A function (possibly an automatically created inverse) was declared twice.
    #[error("function {0} was declared multiple times")]
    DuplicateDeclaration(String),
    /// A function was required to be declared but is not.
    #[error("function {0} has not been declared in the environment")]
    UndeclaredFunction(String),
    /// A call passed a different number of arguments than the domain allows.
    #[allow(missing_docs)]
    #[error("function {function_name} expected {expected} args but found {found} args")]
    ArityMismatch {
        function_name: String,
        expected: usize,
        found: usize,
    },
}

/// A set of uninterpreted function declarations and inverse pairings.
#[derive(PartialEq, Eq, Clone, Debug, Default)]
pub struct Environment {
    functions: BTreeMap<String, UninterpFunc>,
    inverses: BTreeMap<String, String>,
}

impl Environment {
    /// Create an environment holding just `func` (and its inverse, if `func`
    /// is bijective).
    pub fn new(func: UninterpFunc) -> Result<Self, EnvError> {
        let mut env = Environment::default();
        env.declare(func)?;
        Ok(env)
    }

    /// Add a declaration. A bijective function also gets an inverse named
    /// `<name>_inv`, and the two are paired.
    ///
    /// Nothing is added if either name is already declared.
    ///
    /// The inverse is always given [`MonotonicType::None`], even when the
    /// function itself is monotonic.
    pub fn declare(&mut self, func: UninterpFunc) -> Result<(), EnvError> {
        if self.contains(func.name()) {
            return Err(EnvError::DuplicateDeclaration(func.name().to_string()));
        }

        if !func.is_bijective() {
            log::debug!("declaring {func}");
            self.functions.insert(func.name().to_string(), func);
            return Ok(());
        }

        let inv_name = format!("{}{INVERSE_SUFFIX}", func.name());
        if self.contains(&inv_name) {
            return Err(EnvError::DuplicateDeclaration(inv_name));
        }
        let inverse = UninterpFunc::new(
            &inv_name,
            func.range().clone(),
            func.domain().clone(),
            true,
            MonotonicType::None,
        );
        log::debug!("declaring {func} with inverse {inverse}");
        self.inverses.insert(func.name().to_string(), inv_name.clone());
        self.inverses.insert(inv_name.clone(), func.name().to_string());
        self.functions.insert(func.name().to_string(), func);
        self.functions.insert(inv_name, inverse);
        Ok(())
    }

    /// Move every declaration and inverse pairing of `other` into this
    /// environment.
    ///
    /// If any of `other`'s functions is already declared here, or one of its
    /// names is already paired with a different inverse, nothing is moved and
    /// this environment is left unchanged.
    pub fn append(&mut self, other: Environment) -> Result<(), EnvError> {
        if let Some(name) = other.functions.keys().find(|name| self.contains(name)) {
            return Err(EnvError::DuplicateDeclaration(name.clone()));
        }
        if let Some((name, _)) = other
            .inverses
            .iter()
            .find(|(name, inv)| matches!(self.inverses.get(*name), Some(i) if i != *inv))
        {
            return Err(EnvError::DuplicateDeclaration(name.clone()));
        }
        log::debug!(
            "appending {} declarations and {} inverse pairings",
            other.functions.len(),
            other.inverses.len()
        );
        self.inverses.extend(other.inverses);
        self.functions.extend(other.functions);
        Ok(())
    }

    /// Remove all declarations and pairings.
    pub fn reset(&mut self) {
        log::debug!("resetting environment with {} declarations", self.len());
        self.functions.clear();
        self.inverses.clear();
    }

    /// Record `func` and `inverse` as inverses of each other.
    ///
    /// Neither name has to be declared, and no check is made that the domains
    /// and ranges line up.
    pub fn set_inverse(&mut self, func: &str, inverse: &str) {
        self.inverses.insert(func.to_string(), inverse.to_string());
        self.inverses.insert(inverse.to_string(), func.to_string());
    }

    /// Name of the function paired with `name` as its inverse.
    pub fn func_inverse(&self, name: &str) -> Option<String> {
        self.inverses.get(name).cloned()
    }

    /// A copy of the domain of `name`, if it is declared.
    pub fn func_domain(&self, name: &str) -> Option<Set> {
        self.functions.get(name).map(|f| f.domain().clone())
    }

    /// A copy of the range of `name`, if it is declared.
    pub fn func_range(&self, name: &str) -> Option<Set> {
        self.functions.get(name).map(|f| f.range().clone())
    }

    /// Monotonicity of `name`. Undeclared functions are not monotonic.
    pub fn func_mono_type(&self, name: &str) -> MonotonicType {
        self.functions
            .get(name)
            .map(UninterpFunc::mono_type)
            .unwrap_or_default()
    }

    /// The declaration of `name`.
    pub fn function(&self, name: &str) -> Option<&UninterpFunc> {
        self.functions.get(name)
    }

    /// Check if `name` is declared.
    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Names of all declared functions, in sorted order.
    pub fn function_names(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(String::as_str)
    }

    /// Number of declared functions (including automatically created inverses).
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    #[allow(missing_docs)]
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Check that `call` refers to a declared function and passes as many
    /// arguments as the function's domain has tuple positions.
    pub fn check_call(&self, call: &UFCallTerm) -> Result<(), EnvError> {
        let func = self
            .function(&call.name)
            .ok_or_else(|| EnvError::UndeclaredFunction(call.name.clone()))?;
        if func.arity() != call.arity() {
            return Err(EnvError::ArityMismatch {
                function_name: call.name.clone(),
                expected: func.arity(),
                found: call.arity(),
            });
        }
        Ok(())
    }
}

impl fmt::Display for Environment {
    /// Lists each inverse pairing on its own line, sorted by name.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Environment:")?;
        for (name, inverse) in &self.inverses {
            writeln!(f, "    {name} ==> {inverse}")?;
        }
        Ok(())
    }
}
