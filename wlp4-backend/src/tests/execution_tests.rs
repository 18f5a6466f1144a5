//! Generated programs executed on the VM

use super::builders::*;
use wlp4_tree::typed_ast::{BinaryOp, RelOp, Statement};

#[test]
fn test_constant_result() {
    let outcome = run(&simple(vec![], vec![], num(-17)), 0, 0);
    assert_eq!(outcome.result, -17);
    assert_eq!(outcome.output, "");
}

#[test]
fn test_largest_literal_survives_assembly() {
    let outcome = run(&simple(vec![local("big", i32::MAX)], vec![], var("big")), 0, 0);
    assert_eq!(outcome.result, i32::MAX);
    assert_eq!(run(&simple(vec![], vec![], num(i32::MAX)), 0, 0).result, i32::MAX);
}

#[test]
fn test_long_sum_chain() {
    // a + 1 + 1 + ... nests one level per operand
    let sum = (0..300).fold(var("a"), |acc, _| add(acc, num(1)));
    assert_eq!(run(&simple(vec![], vec![], sum), 5, 0).result, 305);
}

#[test]
fn test_call_result_plus_one() {
    let prog = program(
        vec![procedure("f", vec![int("x"), int("y")], vec![], vec![], add(var("x"), var("y")))],
        wain([int("a"), int("b")], vec![], vec![], add(call("f", vec![var("a"), var("b")]), num(1))),
    );
    assert_eq!(run(&prog, 3, 4).result, 8);
    assert_eq!(run(&prog, -10, 2).result, -7);
}

#[test]
fn test_address_of_and_deref() {
    let prog = simple(vec![local_ptr("p")], vec![assign("p", address_of("a"))], deref(pvar("p")));
    assert_eq!(run(&prog, 11, 0).result, 11);
}

#[test]
fn test_store_through_pointer() {
    let prog = simple(
        vec![local_ptr("p")],
        vec![
            assign("p", address_of("b")),
            store(pvar("p"), add(deref(pvar("p")), var("a"))),
        ],
        var("b"),
    );
    assert_eq!(run(&prog, 5, 6).result, 11);
}

#[test]
fn test_while_sum() {
    let prog = simple(
        vec![local("i", 0), local("sum", 0)],
        vec![while_loop(
            test(RelOp::Lt, var("i"), var("a")),
            vec![
                assign("i", add(var("i"), num(1))),
                assign("sum", add(var("sum"), var("i"))),
            ],
        )],
        var("sum"),
    );
    assert_eq!(run(&prog, 5, 0).result, 15);
    assert_eq!(run(&prog, 0, 0).result, 0);
}

#[test]
fn test_countdown_loop() {
    let prog = simple(
        vec![local("sum", 0)],
        vec![while_loop(
            test(RelOp::Gt, var("a"), num(0)),
            vec![
                assign("sum", add(var("sum"), var("a"))),
                assign("a", sub(var("a"), num(1))),
            ],
        )],
        var("sum"),
    );
    assert_eq!(run(&prog, 5, 0).result, 15);
}

#[test]
fn test_if_else_with_every_relation() {
    let cases = [
        (RelOp::Eq, [(2, 2, 1), (2, 3, 0)]),
        (RelOp::Ne, [(2, 3, 1), (2, 2, 0)]),
        (RelOp::Lt, [(-1, 1, 1), (1, -1, 0)]),
        (RelOp::Le, [(4, 4, 1), (5, 4, 0)]),
        (RelOp::Gt, [(1, -1, 1), (-1, 1, 0)]),
        (RelOp::Ge, [(4, 4, 1), (3, 4, 0)]),
    ];
    for (op, runs) in cases {
        let prog = simple(
            vec![local("r", 9)],
            vec![if_else(
                test(op, var("a"), var("b")),
                vec![assign("r", num(1))],
                vec![assign("r", num(0))],
            )],
            var("r"),
        );
        for (a, b, expected) in runs {
            assert_eq!(run(&prog, a, b).result, expected, "{a} {op} {b}");
        }
    }
}

#[test]
fn test_division_and_modulo_truncate() {
    let prog = simple(
        vec![],
        vec![
            Statement::Println(bin(BinaryOp::Div, var("a"), var("b"))),
            Statement::Println(bin(BinaryOp::Mod, var("a"), var("b"))),
        ],
        bin(BinaryOp::Mul, var("a"), var("b")),
    );
    let outcome = run(&prog, -7, 2);
    assert_eq!(outcome.output, "-3\n-1\n");
    assert_eq!(outcome.result, -14);
    assert_eq!(outcome.stats.prints, 2);
}

#[test]
fn test_println_keeps_entry_arguments() {
    let prog = simple(
        vec![],
        vec![
            Statement::Println(var("a")),
            assign("a", add(var("a"), var("b"))),
            Statement::Println(var("a")),
        ],
        var("a"),
    );
    let outcome = run(&prog, 3, 4);
    assert_eq!(outcome.output, "3\n7\n");
    assert_eq!(outcome.result, 7);
}

#[test]
fn test_getchar_and_putchar() {
    let getchar = wlp4_tree::typed_ast::Expr::new(
        wlp4_tree::typed_ast::ExprKind::Getchar,
        wlp4_common::Type::Int,
    );
    let prog = simple(
        vec![local("c", 0)],
        vec![
            assign("c", getchar.clone()),
            Statement::Putchar(add(var("c"), num(1))),
            Statement::Putchar(num(10)),
        ],
        getchar,
    );
    let outcome = run_with_input(&prog, 0, 0, b"H");
    assert_eq!(outcome.output, "I\n");
    assert_eq!(outcome.result, -1);
}

#[test]
fn test_recursive_factorial() {
    let fact = procedure(
        "fact",
        vec![int("n")],
        vec![local("r", 1)],
        vec![if_else(
            test(RelOp::Gt, var("n"), num(1)),
            vec![assign(
                "r",
                bin(
                    BinaryOp::Mul,
                    var("n"),
                    call("fact", vec![sub(var("n"), num(1))]),
                ),
            )],
            vec![],
        )],
        var("r"),
    );
    let prog = program(vec![fact], wain([int("a"), int("b")], vec![], vec![], call("fact", vec![var("a")])));
    assert_eq!(run(&prog, 5, 0).result, 120);
    assert_eq!(run(&prog, 1, 0).result, 1);
}

#[test]
fn test_procedure_declared_after_its_caller() {
    let first = procedure("first", vec![int("x")], vec![], vec![], call("second", vec![var("x"), num(10)]));
    let second = procedure("second", vec![int("x"), int("y")], vec![local("z", 0)], vec![assign("z", sub(var("x"), var("y")))], var("z"));
    let prog = program(vec![first, second], wain([int("a"), int("b")], vec![], vec![], call("first", vec![var("b")])));
    assert_eq!(run(&prog, 0, 4).result, -6);
}

#[test]
fn test_array_indexing_scales_by_word() {
    let prog = program(
        Vec::new(),
        wain(
            [ptr("arr"), int("len")],
            vec![],
            vec![],
            add(
                deref(add(pvar("arr"), num(2))),
                deref(sub(add(num(1), add(pvar("arr"), var("len"))), num(2))),
            ),
        ),
    );
    let outcome = run_array(&prog, &[10, 20, 30, 40]);
    assert_eq!(outcome.result, 30 + 40);
}

#[test]
fn test_pointer_difference_counts_words() {
    let prog = program(
        Vec::new(),
        wain(
            [ptr("arr"), int("len")],
            vec![local_ptr("end")],
            vec![assign("end", add(pvar("arr"), var("len")))],
            sub(pvar("end"), pvar("arr")),
        ),
    );
    assert_eq!(run_array(&prog, &[1, 2, 3, 4, 5, 6, 7]).result, 7);
}

#[test]
fn test_pointer_comparison_walks_array() {
    let prog = program(
        Vec::new(),
        wain(
            [ptr("arr"), int("len")],
            vec![local_ptr("p"), local_ptr("end"), local("sum", 0)],
            vec![
                assign("p", pvar("arr")),
                assign("end", add(pvar("arr"), var("len"))),
                while_loop(
                    test(RelOp::Lt, pvar("p"), pvar("end")),
                    vec![
                        assign("sum", add(var("sum"), deref(pvar("p")))),
                        assign("p", add(pvar("p"), num(1))),
                    ],
                ),
            ],
            var("sum"),
        ),
    );
    assert_eq!(run_array(&prog, &[3, -1, 4, 1, 5]).result, 12);
}

#[test]
fn test_allocation_store_and_delete() {
    let prog = simple(
        vec![local_ptr("p"), local("r", 0)],
        vec![
            assign("p", new_array(var("a"))),
            store(add(pvar("p"), num(1)), var("b")),
            assign("r", deref(add(pvar("p"), num(1)))),
            Statement::Delete(pvar("p")),
        ],
        var("r"),
    );
    let outcome = run(&prog, 3, 77);
    assert_eq!(outcome.result, 77);
    assert_eq!(outcome.stats.allocations, 1);
    assert_eq!(outcome.stats.frees, 1);
}

#[test]
fn test_failed_allocation_is_null_and_delete_skips_it() {
    let null = wlp4_tree::typed_ast::Expr::null();
    let prog = simple(
        vec![local_ptr("p"), local("r", 0)],
        vec![
            assign("p", new_array(var("a"))),
            if_else(
                test(RelOp::Eq, pvar("p"), null.clone()),
                vec![assign("r", num(1))],
                vec![assign("r", num(2))],
            ),
            Statement::Delete(pvar("p")),
            Statement::Delete(null),
        ],
        var("r"),
    );
    let outcome = run(&prog, 0, 0);
    assert_eq!(outcome.result, 1);
    assert_eq!(outcome.stats.failed_allocations, 1);
    assert_eq!(outcome.stats.frees, 0);
}

#[test]
fn test_null_local_initializer_compares_equal_to_null() {
    let prog = simple(
        vec![local_ptr("p"), local("r", 0)],
        vec![if_else(
            test(RelOp::Eq, pvar("p"), wlp4_tree::typed_ast::Expr::null()),
            vec![assign("r", num(1))],
            vec![],
        )],
        var("r"),
    );
    assert_eq!(run(&prog, 0, 0).result, 1);
}

#[test]
fn test_large_frame_round_trip() {
    let locals: Vec<_> = (0..8200).map(|i| local(&format!("v{i}"), i)).collect();
    let prog = simple(
        locals,
        vec![assign("v8199", add(var("v8199"), var("v8192")))],
        add(var("v8199"), var("a")),
    );
    assert_eq!(run(&prog, 1, 0).result, 8199 + 8192 + 1);
}
