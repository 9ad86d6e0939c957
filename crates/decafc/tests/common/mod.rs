#![allow(dead_code)]

use anyhow::Result;
use decaf_ast::{
    BinaryOp, Block, Expr, ExternFunction, FieldDecl, MethodDecl, Package, Program, Stmt, Type,
    VarDef,
};
use inkwell::context::Context;

use decafc::diagnostics::CodegenError;

/// Lower a program and return the module's textual IR.
pub fn gen_ir(program: &Program) -> Result<String> {
    let context = Context::create();
    let module = decafc::compile(&context, "test_module", program)?;
    Ok(module.print_to_string().to_string())
}

/// Lower a program that is expected to fail, returning the error.
pub fn gen_err(program: &Program) -> CodegenError {
    let context = Context::create();
    match decafc::compile(&context, "test_module", program) {
        Ok(_) => panic!("lowering unexpectedly succeeded"),
        Err(err) => err,
    }
}

pub fn program(
    externs: Vec<ExternFunction>,
    fields: Vec<FieldDecl>,
    methods: Vec<MethodDecl>,
) -> Program {
    Program {
        externs,
        package: Some(Package {
            name: "test".into(),
            fields,
            methods,
        }),
    }
}

/// A program whose package holds a single `main` with the given body.
pub fn program_with_main(body: Block) -> Program {
    program(vec![], vec![], vec![method("main", Type::Int, vec![], body)])
}

pub fn method(name: &str, ret: Type, params: Vec<VarDef>, block: Block) -> MethodDecl {
    MethodDecl {
        name: name.into(),
        return_type: ret,
        params,
        block,
    }
}

pub fn extern_fn(name: &str, ret: Type, params: Vec<Type>) -> ExternFunction {
    ExternFunction {
        name: name.into(),
        return_type: ret,
        param_types: params,
    }
}

pub fn block(var_defs: Vec<VarDef>, stmts: Vec<Stmt>) -> Block {
    Block { var_defs, stmts }
}

pub fn def(name: &str, ty: Type) -> VarDef {
    VarDef {
        name: name.into(),
        ty,
    }
}

pub fn num(n: i32) -> Expr {
    Expr::Number(n)
}

pub fn boolean(value: bool) -> Expr {
    Expr::Bool(value)
}

pub fn var(name: &str) -> Expr {
    Expr::Variable(name.into())
}

pub fn bin(op: BinaryOp, lhs: Expr, rhs: Expr) -> Expr {
    Expr::Binary {
        op,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
    }
}

pub fn call(callee: &str, args: Vec<Expr>) -> Expr {
    Expr::Call {
        callee: callee.into(),
        args,
    }
}

pub fn assign(name: &str, value: Expr) -> Stmt {
    Stmt::Assign {
        name: name.into(),
        value,
    }
}

pub fn ret(value: Expr) -> Stmt {
    Stmt::Return(Some(value))
}
