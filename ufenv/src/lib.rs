// Copyright 2022-2023 VMware, Inc.
// SPDX-License-Identifier: BSD-2-Clause

//! Bookkeeping for uninterpreted functions in a set/relation algebra.
//!
//! An [`Environment`] records what is known about each declared function
//! (domain, range, monotonicity, inverse), and a [`UFCallMap`] replaces
//! function calls by symbolic constants so that a solver for affine
//! constraints can treat them as ordinary unknowns.

// documentation-related lints (only checked when running rustdoc)
#![warn(missing_docs)]
#![allow(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod call_map;
pub mod current;
pub mod encoding;
pub mod environment;
pub mod uninterp_func;

pub use call_map::{SymbolicConstant, UFCallMap};
pub use environment::{EnvError, Environment, INVERSE_SUFFIX};
pub use uninterp_func::{MonotonicType, UninterpFunc};
