// Copyright 2022-2023 VMware, Inc.
// SPDX-License-Identifier: BSD-2-Clause

//! Encode uninterpreted function calls as identifiers.
//!
//! A call is rendered as `name(arg, ..., arg)` and every character that cannot
//! appear in an identifier is replaced by an escape sequence starting with
//! `_`. A literal `_` is doubled, so the encoding is injective, and spaces
//! (which only ever separate tokens in a rendering) are dropped:
//!
//! | char | encoded |
//! |------|---------|
//! | `_`  | `__`    |
//! | `+`  | `_P`    |
//! | `-`  | `_M`    |
//! | `*`  | `_T`    |
//! | `(`  | `_L`    |
//! | `)`  | `_R`    |
//! | `,`  | `_C`    |
//! | `[`  | `_B`    |
//! | `]`  | `_E`    |
//! | other | `_u<hex>_` |
//!
//! For example `row(__tv0 + 1, __tv2 - n)` becomes
//! `row_L____tv0_P1_C____tv2_Mn_R`.

use itertools::Itertools;
use setrel::syntax::Exp;
use thiserror::Error;

/// An error decoding a string that was not produced by [`encode`]
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DecodeError {
    /// The escape sequence starting at this byte offset is not valid.
    #[error("invalid escape sequence at offset {0}")]
    InvalidEscape(usize),
    /// The character at this byte offset never appears unescaped.
    #[error("unescaped character at offset {0}")]
    InvalidChar(usize),
}

/// The canonical key for a call of `name` on `args`. The key is a valid
/// identifier and two calls get the same key exactly when their renderings
/// agree.
pub fn canonical_key(name: &str, args: &[Exp]) -> String {
    encode(&format!("{name}({})", args.iter().join(", ")))
}

/// Escape `s` into an identifier, dropping spaces.
pub fn encode(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            ' ' => (),
            '_' => out.push_str("__"),
            '+' => out.push_str("_P"),
            '-' => out.push_str("_M"),
            '*' => out.push_str("_T"),
            '(' => out.push_str("_L"),
            ')' => out.push_str("_R"),
            ',' => out.push_str("_C"),
            '[' => out.push_str("_B"),
            ']' => out.push_str("_E"),
            c if c.is_ascii_alphanumeric() => out.push(c),
            c => out.push_str(&format!("_u{:x}_", c as u32)),
        }
    }
    out
}

/// Invert [`encode`]. The result is the original string with its spaces removed.
///
/// Only strings that [`encode`] can produce are accepted: raw characters
/// must be ASCII letters or digits, every `_u<hex>_` escape must be
/// terminated and must be the one [`encode`] would emit for its character.
pub fn decode(s: &str) -> Result<String, DecodeError> {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.char_indices();
    while let Some((i, c)) = chars.next() {
        if c != '_' {
            if !c.is_ascii_alphanumeric() {
                return Err(DecodeError::InvalidChar(i));
            }
            out.push(c);
            continue;
        }
        let decoded = match chars.next() {
            Some((_, '_')) => '_',
            Some((_, 'P')) => '+',
            Some((_, 'M')) => '-',
            Some((_, 'T')) => '*',
            Some((_, 'L')) => '(',
            Some((_, 'R')) => ')',
            Some((_, 'C')) => ',',
            Some((_, 'B')) => '[',
            Some((_, 'E')) => ']',
            Some((_, 'u')) => {
                let mut hex = String::new();
                let terminated = loop {
                    match chars.next() {
                        Some((_, '_')) => break true,
                        Some((_, c)) => hex.push(c),
                        None => break false,
                    }
                };
                u32::from_str_radix(&hex, 16)
                    .ok()
                    .and_then(char::from_u32)
                    .filter(|c| terminated && encode(&c.to_string()) == format!("_u{hex}_"))
                    .ok_or(DecodeError::InvalidEscape(i))?
            }
            _ => return Err(DecodeError::InvalidEscape(i)),
        };
        out.push(decoded);
    }
    Ok(out)
}
