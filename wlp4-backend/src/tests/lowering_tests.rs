use super::builders::*;
use crate::error::CodegenError;
use crate::{lower_program, LoweringOptions};
use pretty_assertions::assert_eq;
use std::collections::HashSet;
use wlp4_codegen::{validate, AsmInst};
use wlp4_common::Type;
use wlp4_tree::typed_ast::{BinaryOp, RelOp, Statement};

fn lower_err(program: &wlp4_tree::Program) -> CodegenError {
    lower_program(program, &LoweringOptions::default()).unwrap_err()
}

#[test]
fn test_whole_program_text() {
    let prog = simple(vec![], vec![], num(42));
    assert_eq!(
        lines(&prog),
        vec![
            ".import print",
            "Pwain:",
            "lis $4",
            ".word 4",
            "sw $1, -4($30)",
            "sub $30, $30, $4",
            "sw $2, -4($30)",
            "sub $30, $30, $4",
            "sub $29, $30, $4",
            "lis $3",
            ".word 42",
            "add $30, $30, $4",
            "add $30, $30, $4",
            "jr $31",
        ]
    );
}

#[test]
fn test_imports_only_what_is_used() {
    let plain = lines(&simple(vec![], vec![], num(0)));
    assert_eq!(plain.iter().filter(|line| line.starts_with(".import")).count(), 1);

    let heap = simple(
        vec![local_ptr("p")],
        vec![
            assign("p", new_array(num(2))),
            Statement::Delete(pvar("p")),
        ],
        num(0),
    );
    assert_eq!(
        lines(&heap)[..3],
        [".import print", ".import new", ".import delete"]
    );
}

#[test]
fn test_variable_access_uses_frame_offsets() {
    let prog = simple(
        vec![local("x", 0), local("y", 0)],
        vec![assign("y", var("a")), assign("x", var("b"))],
        var("y"),
    );
    let text = lines(&prog);
    assert!(contains_run(&text, &["lw $3, 8($29)", "sw $3, -4($29)"]));
    assert!(contains_run(&text, &["lw $3, 4($29)", "sw $3, 0($29)"]));
    assert!(contains_run(&text, &["lw $3, -4($29)", "add $30, $30, $4"]));
}

#[test]
fn test_entry_parameter_store_updates_argument_register() {
    let prog = simple(vec![], vec![assign("b", num(5))], var("b"));
    let text = lines(&prog);
    assert!(contains_run(&text, &["lis $3", ".word 5", "add $2, $3, $0", "sw $3, 4($29)"]));
}

#[test]
fn test_call_saves_and_pops_every_argument() {
    let prog = program(
        vec![
            procedure("f", vec![int("x"), int("y"), int("z")], vec![], vec![], var("x")),
            procedure("g", vec![], vec![], vec![], num(7)),
        ],
        wain(
            [int("a"), int("b")],
            vec![local("r", 0)],
            vec![assign("r", call("g", vec![]))],
            call("f", vec![var("a"), var("b"), var("r")]),
        ),
    );
    let text = lines(&prog);

    assert!(contains_run(
        &text,
        &[
            "sw $29, -4($30)",
            "sub $30, $30, $4",
            "sw $31, -4($30)",
            "sub $30, $30, $4",
            "lw $3, 8($29)",
            "sw $3, -4($30)",
            "sub $30, $30, $4",
        ]
    ));
    assert!(contains_run(
        &text,
        &[
            "lis $5",
            ".word Pf",
            "jalr $5",
            "add $30, $30, $4",
            "add $30, $30, $4",
            "add $30, $30, $4",
            "add $30, $30, $4",
            "lw $31, -4($30)",
            "add $30, $30, $4",
            "lw $29, -4($30)",
        ]
    ));
    assert!(contains_run(
        &text,
        &[
            "lis $5",
            ".word Pg",
            "jalr $5",
            "add $30, $30, $4",
            "lw $31, -4($30)",
        ]
    ));
}

#[test]
fn test_labels_are_unique_and_resolved() {
    let inner = if_else(
        test(RelOp::Lt, var("a"), var("b")),
        vec![assign("a", add(var("a"), num(1)))],
        vec![assign("b", sub(var("b"), num(1)))],
    );
    let prog = simple(
        vec![local_ptr("p")],
        vec![
            while_loop(test(RelOp::Ne, var("a"), var("b")), vec![inner.clone(), inner]),
            assign("p", new_array(num(1))),
            Statement::Delete(pvar("p")),
        ],
        var("a"),
    );
    let insts = lower_program(&prog, &LoweringOptions::default()).unwrap();
    validate(&insts).unwrap();

    let labels: Vec<&str> = insts
        .iter()
        .filter_map(|inst| match inst {
            AsmInst::Label(name) => Some(name.as_str()),
            _ => None,
        })
        .collect();
    let unique: HashSet<&str> = labels.iter().copied().collect();
    assert_eq!(unique.len(), labels.len());
    assert_eq!(
        labels,
        vec!["Pwain", "while1", "else3", "endif4", "else5", "endif6", "endwhile2", "allocsuccess7", "skipdelete8"]
    );
}

#[test]
fn test_comparisons_pick_signedness_from_operand_types() {
    let signed = lines(&simple(
        vec![],
        vec![if_else(test(RelOp::Lt, var("a"), var("b")), vec![], vec![])],
        num(0),
    ));
    assert!(contains_run(&signed, &["slt $6, $5, $3", "beq $6, $0, else1"]));

    let unsigned = lines(&simple(
        vec![local_ptr("p"), local_ptr("q")],
        vec![if_else(test(RelOp::Ge, pvar("p"), pvar("q")), vec![], vec![])],
        num(0),
    ));
    assert!(contains_run(&unsigned, &["sltu $6, $5, $3", "bne $6, $0, else1"]));
}

#[test]
fn test_pointer_arithmetic_scaling() {
    let prog = simple(
        vec![local_ptr("p")],
        vec![assign("p", add(num(2), pvar("p")))],
        sub(pvar("p"), pvar("p")),
    );
    let text = lines(&prog);
    assert!(contains_run(
        &text,
        &[".word 2", "mult $3, $4", "mflo $3", "sw $3, -4($30)"]
    ));
    assert!(contains_run(&text, &["sub $3, $5, $3", "div $3, $4", "mflo $3"]));
}

#[test]
fn test_large_offsets_go_through_scratch_register() {
    let locals: Vec<_> = (0..8200).map(|i| local(&format!("v{i}"), i)).collect();
    let prog = simple(locals, vec![assign("v8199", num(3))], var("v8199"));
    let text = lines(&prog);

    assert!(contains_run(&text, &["lis $5", ".word -32796", "add $5, $5, $29", "sw $3, 0($5)"]));
    assert!(contains_run(&text, &["lis $5", ".word -32796", "add $5, $5, $29", "lw $3, 0($5)"]));
    assert!(!text.iter().any(|line| line.contains("-32796($29)")));
}

#[test]
fn test_comments_follow_options() {
    let prog = simple(vec![local("x", 1)], vec![Statement::Println(var("x"))], num(0));
    let with = compile(&prog);
    assert!(with.contains("; procedure wain"));
    assert!(with.contains("; println"));

    let without = lower_program(&prog, &LoweringOptions { emit_comments: false }).unwrap();
    assert!(!without.iter().any(|inst| matches!(inst, AsmInst::Comment(_))));
}

#[test]
fn test_output_is_deterministic() {
    let prog = program(
        vec![procedure("f", vec![int("x")], vec![local("y", 2)], vec![], add(var("x"), var("y")))],
        wain([int("a"), int("b")], vec![], vec![], call("f", vec![var("a")])),
    );
    assert_eq!(compile(&prog), compile(&prog));
}

#[test]
fn test_invalid_operand_types() {
    let prog = simple(vec![local_ptr("p")], vec![], add(pvar("p"), pvar("p")));
    assert_eq!(
        lower_err(&prog),
        CodegenError::InvalidOperands {
            op: "+".to_string(),
            left: Type::IntPtr,
            right: Type::IntPtr,
            procedure: "wain".to_string(),
        }
    );

    let prog = simple(vec![local_ptr("p")], vec![], bin(BinaryOp::Mul, pvar("p"), num(2)));
    assert!(matches!(lower_err(&prog), CodegenError::InvalidOperands { .. }));
}

#[test]
fn test_undefined_names() {
    let prog = simple(vec![], vec![], call("missing", vec![]));
    assert_eq!(
        lower_err(&prog),
        CodegenError::UndefinedProcedure {
            name: "missing".to_string(),
            caller: "wain".to_string(),
        }
    );

    let prog = simple(vec![], vec![], var("ghost"));
    assert_eq!(
        lower_err(&prog),
        CodegenError::UndefinedVariable {
            name: "ghost".to_string(),
            procedure: "wain".to_string(),
        }
    );
}

#[test]
fn test_arity_mismatch() {
    let prog = program(
        vec![procedure("f", vec![int("x")], vec![], vec![], var("x"))],
        wain([int("a"), int("b")], vec![], vec![], call("f", vec![var("a"), var("b")])),
    );
    assert_eq!(
        lower_err(&prog),
        CodegenError::ArityMismatch {
            name: "f".to_string(),
            expected: 1,
            found: 2,
        }
    );
}
