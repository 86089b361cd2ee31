// Copyright 2022-2023 VMware, Inc.
// SPDX-License-Identifier: BSD-2-Clause

use setrel::{
    parser::{exp, set},
    syntax::{Exp, Term, UFCallTerm},
};
use ufenv::{encoding, Environment, MonotonicType, SymbolicConstant, UFCallMap, UninterpFunc};

/// `row(__tv0 + 1, __tv2 - n)`, built term by term
fn row_call() -> UFCallTerm {
    let mut e1 = Exp::new();
    e1.add_term(Term::tuple_var(0));
    e1.add_term(Term::Const(1));

    let mut e2 = Exp::new();
    e2.add_term(Term::tuple_var(2));
    e2.add_term(Term::Var {
        coeff: -1,
        name: "n".to_string(),
    });

    UFCallTerm::new("row", [e1, e2])
}

fn declare_row() -> Environment {
    Environment::new(UninterpFunc::new(
        "row",
        set("{[i, j] : 0 <= i < N && 0 <= j < M}"),
        set("{[k] : 0 <= k < nnz}"),
        false,
        MonotonicType::None,
    ))
    .expect("row should be declared")
}

#[test]
fn row_call_round_trip() {
    let _ = pretty_env_logger::try_init();
    let env = declare_row();
    let call = row_call();
    env.check_call(&call).expect("row is called with two args");

    let mut map = UFCallMap::new();
    map.insert(&call);

    let constant = map.find_constant(&call).expect("row call was inserted");
    assert_eq!(constant.name(), "row_L____tv0_P1_C____tv2_Mn_R");
    assert_eq!(
        encoding::decode(constant.name()).as_deref(),
        Ok("row(__tv0+1,__tv2-n)")
    );

    // an independently parsed call finds the same constant and gives back the
    // original call
    let parsed = match &exp("row(__tv0 + 1, __tv2 - n)").terms()[0] {
        Term::UFCall { call, .. } => call.clone(),
        t => panic!("{t} is not a call"),
    };
    assert_eq!(map.find_constant(&parsed), Some(constant.clone()));
    let back = map.find_call(&constant).expect("constant came from the map");
    assert_eq!(back.to_string(), call.to_string());
}

#[test]
fn missing_call_is_not_found() {
    let mut map = UFCallMap::new();
    map.insert(&row_call());

    let foo = UFCallTerm::new::<[Exp; 0]>("Foo", []);
    let found = match map.find_constant(&foo) {
        Some(_) => "Found",
        None => "notFound",
    };
    assert_eq!(found, "notFound");

    let mut other = UFCallMap::new();
    let foreign: SymbolicConstant = other.insert(&foo);
    assert_eq!(map.find_call(&foreign), None);
}

#[test]
fn abstracted_constraints_use_declared_functions() {
    let mut env = declare_row();
    env.append(
        Environment::new(UninterpFunc::new(
            "perm",
            set("{[i] : 0 <= i < N}"),
            set("{[p] : 0 <= p < N}"),
            true,
            MonotonicType::Nondecreasing,
        ))
        .unwrap(),
    )
    .unwrap();

    let mut map = UFCallMap::new();
    let e = exp("row(perm(i), j) - perm_inv(perm(i)) + 1");
    let abstracted = map.replace_calls(&e);
    assert!(!abstracted.has_calls());
    assert_eq!(map.len(), 3);

    // the abstracted calls are perm(i) and the two calls on its constant
    let perm_i = UFCallTerm::new("perm", [exp("i")]);
    let c = map.find_constant(&perm_i).expect("perm(i) was abstracted");
    let row = UFCallTerm::new("row", [Exp::from(c.to_term()), exp("j")]);
    let perm_inv = UFCallTerm::new("perm_inv", [Exp::from(c.to_term())]);
    for call in [&perm_i, &row, &perm_inv] {
        env.check_call(call).unwrap();
        let constant = map.find_constant(call).expect("call was abstracted");
        assert_eq!(map.find_call(&constant).as_ref(), Some(call));
    }
    assert_eq!(env.func_inverse("perm").as_deref(), Some("perm_inv"));

    assert_eq!(map.restore_calls(&abstracted), e);
}
