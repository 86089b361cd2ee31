// Copyright 2022-2023 VMware, Inc.
// SPDX-License-Identifier: BSD-2-Clause

//! Parser for affine expressions and sets.

use crate::syntax::*;
use peg::{error::ParseError, str::LineCol};

peg::parser! {

grammar parser() for str {
    rule ident_start() = ['a'..='z' | 'A'..='Z' | '_']
    rule ident_char() = ident_start() / ['0'..='9']
    pub(super) rule ident() -> String
    = s:$(quiet!{ident_start() ident_char()*} / expected!("identifier"))
    { s.to_string() }

    rule whitespace() = quiet!{ [' ' | '\t' | '\n' | '\r'] }
    rule _ = whitespace()*

    rule number() -> i64
    = n:$(quiet!{['0'..='9']+} / expected!("integer"))
    {? n.parse().or(Err("integer")) }

    rule tuple_var() -> usize
    = "__tv" n:$(['0'..='9']+) !ident_char()
    {? n.parse().or(Err("tuple variable index")) }

    // note that no space is allowed between function name and args, so f (x)
    // doesn't parse as a call
    rule factor() -> Term
    = i:tuple_var() { Term::tuple_var(i) }
    / f:ident() "(" _ args:(exp() ** (_ "," _)) _ ")" { Term::call(UFCallTerm { name: f, args }) }
    / s:ident() { Term::var(&s) }

    rule atom() -> Exp
    = n:number() _ "*" _ t:factor() { t.with_coeff(n).into() }
    / n:number() { Term::Const(n).into() }
    / t:factor() { t.into() }
    / "(" _ e:exp() _ ")" { e }

    rule negated(e: rule<Exp>) -> Exp
    = x:e() {?
        let mut x = x;
        x.try_multiply(-1).map(|()| x).or(Err("coefficient in range"))
    }

    rule summand() -> Exp
    = "+" _ e:atom() { e }
    / "-" _ e:negated(<atom()>) { e }

    pub(super) rule exp() -> Exp
    = first:("-" _ e:negated(<atom()>) { e } / atom())
      rest:(_ e:summand() { e })*
    {?
        rest.into_iter()
            .try_fold(first, |mut e, r| e.try_add_exp(r).map(|()| e))
            .or(Err("coefficient in range"))
    }

    rule cmp_op() -> CmpOp
    = "<=" { CmpOp::Le }
    / ">=" { CmpOp::Ge }
    / "<" { CmpOp::Lt }
    / ">" { CmpOp::Gt }
    / "=" { CmpOp::Eq }

    // `a <= b < c` is read as `a <= b && b < c`
    rule chain() -> Vec<Constraint>
    = first:exp() rest:(_ op:cmp_op() _ e:exp() { (op, e) })+
    {
        let mut constraints = vec![];
        let mut lhs = first;
        for (op, rhs) in rest {
            constraints.push(Constraint { lhs, op, rhs: rhs.clone() });
            lhs = rhs;
        }
        constraints
    }

    rule tuple_elem() -> TupleElem
    = n:number() { TupleElem::Const(n) }
    / "-" _ n:number() { TupleElem::Const(-n) }
    / s:ident() { TupleElem::Var(s) }

    rule constraints() -> Vec<Constraint>
    = ":" _ cs:(chain() ** (_ "&&" _)) { cs.into_iter().flatten().collect() }

    pub(super) rule set() -> Set
    = "{" _ "[" _ tuple:(tuple_elem() ** (_ "," _)) _ "]" _ cs:constraints()? _ "}"
    {? Set::try_new(tuple, cs.unwrap_or_default()).or(Err("coefficient in range")) }
}
}

/// Parse a single expression, panicking on malformed input.
pub fn exp(s: &str) -> Exp {
    parse_exp(s).expect("test expression should parse")
}

/// Parse a single set, panicking on malformed input.
pub fn set(s: &str) -> Set {
    parse_set(s).expect("test set should parse")
}

/// Parse an expression such as `__tv0 + 2*n - f(i, j)`.
pub fn parse_exp(s: &str) -> Result<Exp, ParseError<LineCol>> {
    parser::exp(s.trim())
}

/// Parse a set such as `{[i, j] : 0 <= i < n && j = col(i)}`.
///
/// Names in the constraints that match a tuple element refer to that tuple
/// position.
pub fn parse_set(s: &str) -> Result<Set, ParseError<LineCol>> {
    parser::set(s.trim())
}

#[cfg(test)]
mod tests {
    use super::{exp, parse_exp, parse_set, parser, set};
    use crate::syntax::*;

    fn ident(s: &str) -> String {
        parser::ident(s).expect("test ident should parse")
    }

    #[test]
    fn test_ident() {
        assert_eq!(&ident("hello"), "hello");
        assert_eq!(&ident("__tv0"), "__tv0");
        assert_eq!(&ident("hello_world"), "hello_world");
        assert!(parser::ident("1up").is_err());
    }

    #[test]
    fn test_exp() {
        assert_eq!(
            exp("__tv0 + 1"),
            Exp::sum([Term::tuple_var(0), Term::Const(1)])
        );
        assert_eq!(
            exp("__tv2 - n"),
            Exp::sum([
                Term::tuple_var(2),
                Term::Var {
                    coeff: -1,
                    name: "n".to_string()
                }
            ])
        );
        // __tvX is only a tuple variable when followed by a word boundary
        assert_eq!(exp("__tv0x"), Exp::from(Term::var("__tv0x")));

        // like terms are combined
        assert_eq!(exp("i + 2*i - 3*i"), Exp::new());
        assert_eq!(exp("x+1+2"), exp("x + 3"));
        assert_eq!(exp("-(a - b)"), exp("-a + b"));

        assert!(parser::exp("+").is_err());
        assert!(parser::exp("f (x)").is_err());
    }

    #[test]
    fn test_calls() {
        let e = exp("row(__tv0 + 1, __tv2 - n)");
        match &e.terms()[0] {
            Term::UFCall { coeff: 1, call } => {
                assert_eq!(call.name, "row");
                assert_eq!(call.arity(), 2);
                assert_eq!(call.args[0], exp("__tv0 + 1"));
            }
            t => panic!("expected a call, got {t:?}"),
        }

        // repeated calls to the same function on the same arguments combine
        assert_eq!(exp("f(x) + f(x)"), exp("2*f(x)"));
        assert_ne!(exp("f(x) + f(y)"), exp("2*f(x)"));
    }

    #[test]
    fn test_set() {
        let s = set("{[i,j] : 0 <= i < n && j = col(i)}");
        assert_eq!(s.arity(), 2);
        assert_eq!(s.constraints.len(), 3);
        assert_eq!(s.constraints[1].lhs, Exp::from(Term::tuple_var(0)));
        assert_eq!(s.constraints[1].op, CmpOp::Lt);

        let s = set("{ [k, -1] }");
        assert_eq!(s.tuple, vec![TupleElem::Var("k".to_string()), TupleElem::Const(-1)]);
        assert!(s.constraints.is_empty());

        assert_eq!(set("{[]}").arity(), 0);
        assert!(parser::set("{[i] : i}").is_err());
        assert!(parser::set("[i]").is_err());
    }

    #[test]
    fn test_coeff_overflow_is_an_error() {
        assert!(parse_exp("9223372036854775807 + 1").is_err());
        assert!(parse_exp("-(-9223372036854775807 - 1)").is_err());
        assert!(parse_exp("9223372036854775807*x + x").is_err());
        assert!(parse_set("{[i] : 9223372036854775807*i + __tv0 = 0}").is_err());
        assert!(parse_exp("99999999999999999999").is_err());

        // right at the edge is fine
        assert_eq!(
            parse_exp("9223372036854775806 + 1"),
            Ok(Exp::from(i64::MAX))
        );
        assert_eq!(
            parse_exp("-9223372036854775807 - 1"),
            Ok(Exp::from(i64::MIN))
        );
    }
}
