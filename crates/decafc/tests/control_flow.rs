// Basic-block shape of the branching constructs.

mod common;

use anyhow::Result;
use common::*;
use decaf_ast::{BinaryOp, Stmt, Type};

#[test]
fn if_else_synthesizes_entry_then_else_merge() -> Result<()> {
    // if (x < 10) { x = 1; } else { x = 2; }
    let body = block(
        vec![def("x", Type::Int)],
        vec![
            Stmt::If {
                cond: bin(BinaryOp::Lt, var("x"), num(10)),
                then_block: block(vec![], vec![assign("x", num(1))]),
                else_block: Some(block(vec![], vec![assign("x", num(2))])),
            },
            ret(var("x")),
        ],
    );
    let ir = gen_ir(&program_with_main(body))?;

    assert!(ir.contains("if.entry:"), "missing entry block:\n{ir}");
    assert!(ir.contains("if.then:"), "missing then block:\n{ir}");
    assert!(ir.contains("if.else:"), "missing else block:\n{ir}");
    assert!(ir.contains("if.merge:"), "missing merge block:\n{ir}");
    // Condition is evaluated inside the entry block, not before it.
    assert!(ir.contains("br label %if.entry"));
    assert!(ir.contains("br i1 %cmpslttmp, label %if.then, label %if.else"));
    // Both branches funnel into the merge block.
    assert_eq!(ir.matches("br label %if.merge").count(), 2);
    Ok(())
}

#[test]
fn if_without_else_falls_through_to_merge() -> Result<()> {
    let body = block(
        vec![def("x", Type::Int)],
        vec![
            Stmt::If {
                cond: boolean(false),
                then_block: block(vec![], vec![assign("x", num(1))]),
                else_block: None,
            },
            ret(var("x")),
        ],
    );
    let ir = gen_ir(&program_with_main(body))?;

    assert!(!ir.contains("if.else"));
    assert!(ir.contains("br i1 false, label %if.then, label %if.merge"));
    Ok(())
}

#[test]
fn if_whose_branches_both_return_still_gets_a_terminated_merge() -> Result<()> {
    let body = block(
        vec![],
        vec![Stmt::If {
            cond: boolean(true),
            then_block: block(vec![], vec![ret(num(1))]),
            else_block: Some(block(vec![], vec![ret(num(2))])),
        }],
    );
    let ir = gen_ir(&program_with_main(body))?;

    assert!(ir.contains("ret i32 1"));
    assert!(ir.contains("ret i32 2"));
    // The unreachable merge block is patched with the default return.
    assert!(ir.contains("ret i32 0"));
    Ok(())
}

#[test]
fn while_shape_with_back_edge() -> Result<()> {
    // x = 0; while (x < 3) { x = x + 1; }
    let body = block(
        vec![def("x", Type::Int)],
        vec![
            assign("x", num(0)),
            Stmt::While {
                cond: bin(BinaryOp::Lt, var("x"), num(3)),
                body: block(vec![], vec![assign("x", bin(BinaryOp::Plus, var("x"), num(1)))]),
            },
            ret(var("x")),
        ],
    );
    let ir = gen_ir(&program_with_main(body))?;

    assert!(ir.contains("while.cond:"));
    assert!(ir.contains("while.body:"));
    assert!(ir.contains("while.after:"));
    assert!(ir.contains("br i1 %cmpslttmp, label %while.body, label %while.after"));
    // Entry branch plus the body's back edge.
    assert_eq!(ir.matches("br label %while.cond").count(), 2);
    Ok(())
}

#[test]
fn while_with_false_condition_branches_straight_to_exit() -> Result<()> {
    let body = block(
        vec![def("x", Type::Int)],
        vec![
            Stmt::While {
                cond: boolean(false),
                body: block(vec![], vec![assign("x", num(1))]),
            },
            ret(var("x")),
        ],
    );
    let ir = gen_ir(&program_with_main(body))?;

    assert!(ir.contains("br i1 false, label %while.body, label %while.after"));
    Ok(())
}

#[test]
fn break_jumps_to_loop_exit() -> Result<()> {
    let body = block(
        vec![],
        vec![
            Stmt::While {
                cond: boolean(true),
                body: block(vec![], vec![Stmt::Break]),
            },
            ret(num(0)),
        ],
    );
    let ir = gen_ir(&program_with_main(body))?;

    assert!(ir.contains("br label %while.after"));
    // The break terminated the body, so no back edge was emitted.
    assert_eq!(ir.matches("br label %while.cond").count(), 1);
    Ok(())
}

#[test]
fn continue_jumps_to_loop_condition() -> Result<()> {
    let body = block(
        vec![],
        vec![
            Stmt::While {
                cond: boolean(true),
                body: block(vec![], vec![Stmt::Continue]),
            },
            ret(num(0)),
        ],
    );
    let ir = gen_ir(&program_with_main(body))?;

    // Entry branch plus the continue.
    assert_eq!(ir.matches("br label %while.cond").count(), 2);
    Ok(())
}

#[test]
fn break_targets_the_innermost_loop() -> Result<()> {
    let inner = Stmt::While {
        cond: boolean(true),
        body: block(vec![], vec![Stmt::Break]),
    };
    let body = block(
        vec![],
        vec![
            Stmt::While {
                cond: boolean(true),
                body: block(vec![], vec![inner, Stmt::Break]),
            },
            ret(num(0)),
        ],
    );
    let ir = gen_ir(&program_with_main(body))?;

    // The inner loop's blocks are suffixed; its break must target them.
    assert!(ir.contains("br label %while.after1"), "inner break target:\n{ir}");
    Ok(())
}

#[test]
fn for_shape_runs_step_before_back_edge() -> Result<()> {
    // for (i = 0; i < 3; i = i + 1) { x = x + i; }
    let body = block(
        vec![def("i", Type::Int), def("x", Type::Int)],
        vec![
            Stmt::For {
                init: vec![assign("i", num(0))],
                cond: bin(BinaryOp::Lt, var("i"), num(3)),
                step: vec![assign("i", bin(BinaryOp::Plus, var("i"), num(1)))],
                body: block(vec![], vec![assign("x", bin(BinaryOp::Plus, var("x"), var("i")))]),
            },
            ret(var("x")),
        ],
    );
    let ir = gen_ir(&program_with_main(body))?;

    assert!(ir.contains("for.cond:"));
    assert!(ir.contains("for.body:"));
    assert!(ir.contains("for.after:"));
    // Entry branch plus the post-step back edge.
    assert_eq!(ir.matches("br label %for.cond").count(), 2);
    Ok(())
}

#[test]
fn continue_in_for_reevaluates_the_condition() -> Result<()> {
    let body = block(
        vec![def("i", Type::Int)],
        vec![
            Stmt::For {
                init: vec![assign("i", num(0))],
                cond: bin(BinaryOp::Lt, var("i"), num(3)),
                step: vec![assign("i", bin(BinaryOp::Plus, var("i"), num(1)))],
                body: block(vec![], vec![Stmt::Continue]),
            },
            ret(num(0)),
        ],
    );
    let ir = gen_ir(&program_with_main(body))?;

    // Entry branch plus the continue; the step (and its add) is skipped
    // because the loop context targets the condition block directly.
    assert_eq!(ir.matches("br label %for.cond").count(), 2);
    assert!(!ir.contains("addtmp"));
    Ok(())
}

#[test]
fn nested_block_shadows_and_unshadows() -> Result<()> {
    // x = 1; { var x int; x = 2; } x = 3;
    let inner = Stmt::Block(block(vec![def("x", Type::Int)], vec![assign("x", num(2))]));
    let body = block(
        vec![def("x", Type::Int)],
        vec![assign("x", num(1)), inner, assign("x", num(3)), ret(var("x"))],
    );
    let ir = gen_ir(&program_with_main(body))?;

    // Two distinct allocas share the surface name; the stores before and
    // after the inner block hit the outer one.
    assert!(ir.contains("store i32 1, ptr %x, align 4"));
    assert!(ir.contains("store i32 2, ptr %x1, align 4"));
    assert!(ir.contains("store i32 3, ptr %x, align 4"));
    Ok(())
}
