// Copyright 2022-2023 VMware, Inc.
// SPDX-License-Identifier: BSD-2-Clause

//! A process-wide current [`Environment`].
//!
//! This is a compatibility layer for callers that cannot be handed an
//! [`Environment`] explicitly. Code that can should own its own environment
//! instead; the current environment is shared by everything in the process
//! and must be reset or replaced before it is reused.
//!
//! Unlike [`Environment::func_domain`] and [`Environment::func_range`], the
//! domain and range queries here treat an undeclared function as an error.

use std::sync::{Mutex, MutexGuard, PoisonError};

use lazy_static::lazy_static;
use setrel::syntax::Set;

use crate::environment::{EnvError, Environment};
use crate::uninterp_func::{MonotonicType, UninterpFunc};

lazy_static! {
    static ref CURRENT_ENV: Mutex<Environment> = Mutex::new(Environment::default());
}

fn current() -> MutexGuard<'static, Environment> {
    CURRENT_ENV.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Empty the current environment.
pub fn reset_current_env() {
    current().reset();
}

/// Empty the current environment and then declare `func` in it.
pub fn set_current_env(func: UninterpFunc) -> Result<(), EnvError> {
    let env = Environment::new(func)?;
    replace_current_env(env);
    Ok(())
}

/// Replace the current environment with `env`, returning the old one.
pub fn replace_current_env(env: Environment) -> Environment {
    std::mem::replace(&mut *current(), env)
}

/// Declare `func` in the current environment in addition to what is there.
pub fn append_current_env(func: UninterpFunc) -> Result<(), EnvError> {
    let env = Environment::new(func)?;
    current().append(env)
}

/// Run `f` on a snapshot of the current environment.
///
/// The lock is released before `f` runs, so `f` may itself call the other
/// functions in this module. Changes it makes to the current environment are
/// not visible through the snapshot.
pub fn with_current_env<T>(f: impl FnOnce(&Environment) -> T) -> T {
    let env = current().clone();
    f(&env)
}

/// Name of the inverse of `name` in the current environment.
pub fn query_inverse_current_env(name: &str) -> Option<String> {
    current().func_inverse(name)
}

/// A copy of the domain of `name`, which must be declared.
pub fn query_domain_current_env(name: &str) -> Result<Set, EnvError> {
    current()
        .func_domain(name)
        .ok_or_else(|| EnvError::UndeclaredFunction(name.to_string()))
}

/// A copy of the range of `name`, which must be declared.
pub fn query_range_current_env(name: &str) -> Result<Set, EnvError> {
    current()
        .func_range(name)
        .ok_or_else(|| EnvError::UndeclaredFunction(name.to_string()))
}

/// Monotonicity of `name`; [`MonotonicType::None`] if it is not declared.
pub fn query_mono_type_current_env(name: &str) -> MonotonicType {
    current().func_mono_type(name)
}

/// Size of the result tuple of `name`, which must be declared.
pub fn query_range_arity_current_env(name: &str) -> Result<usize, EnvError> {
    let range = query_range_current_env(name)?;
    Ok(range.arity())
}
