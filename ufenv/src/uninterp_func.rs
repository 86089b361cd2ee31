// Copyright 2022-2023 VMware, Inc.
// SPDX-License-Identifier: BSD-2-Clause

//! Declarations of uninterpreted functions.

use std::fmt;

use serde::Serialize;
use setrel::syntax::Set;

/// Whether and how an uninterpreted function's result follows its argument.
#[derive(PartialEq, Eq, Clone, Copy, Debug, Default, Hash, Serialize)]
pub enum MonotonicType {
    /// Nothing is known
    #[default]
    None,
    /// `x <= y` implies `f(x) <= f(y)`
    Nondecreasing,
    /// `x <= y` implies `f(x) >= f(y)`
    Nonincreasing,
}

impl fmt::Display for MonotonicType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MonotonicType::None => "none",
            MonotonicType::Nondecreasing => "nondecreasing",
            MonotonicType::Nonincreasing => "nonincreasing",
        };
        write!(f, "{s}")
    }
}

/// The declaration of a single uninterpreted function.
///
/// Cloning copies the domain and range, so a clone can be changed or dropped
/// independently of the original.
#[derive(PartialEq, Eq, Clone, Debug, Serialize, Hash)]
pub struct UninterpFunc {
    name: String,
    domain: Set,
    range: Set,
    bijective: bool,
    mono_type: MonotonicType,
}

impl UninterpFunc {
    /// Declare `name` as a function from tuples in `domain` to tuples in `range`.
    pub fn new(
        name: &str,
        domain: Set,
        range: Set,
        bijective: bool,
        mono_type: MonotonicType,
    ) -> Self {
        UninterpFunc {
            name: name.to_string(),
            domain,
            range,
            bijective,
            mono_type,
        }
    }

    #[allow(missing_docs)]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Valid argument tuples
    pub fn domain(&self) -> &Set {
        &self.domain
    }

    /// Valid result tuples
    pub fn range(&self) -> &Set {
        &self.range
    }

    #[allow(missing_docs)]
    pub fn is_bijective(&self) -> bool {
        self.bijective
    }

    #[allow(missing_docs)]
    pub fn mono_type(&self) -> MonotonicType {
        self.mono_type
    }

    /// Number of arguments, taken from the domain's tuple size.
    pub fn arity(&self) -> usize {
        self.domain.arity()
    }

    /// Size of the result tuple, taken from the range.
    pub fn range_arity(&self) -> usize {
        self.range.arity()
    }
}

impl fmt::Display for UninterpFunc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} -> {}", self.name, self.domain, self.range)?;
        if self.bijective {
            write!(f, ", bijective")?;
        }
        if self.mono_type != MonotonicType::None {
            write!(f, ", {}", self.mono_type)?;
        }
        Ok(())
    }
}
