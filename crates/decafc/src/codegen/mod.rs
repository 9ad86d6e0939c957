//! AST-to-LLVM lowering.
//!
//! `CodeGen` carries the backend handles (context, module, builder) plus the
//! small amount of state lowering needs: cached primitive types, the
//! string-literal intern cache, and the loop-context stack. The scope stack
//! is threaded explicitly through every lowering call so ownership of the
//! name environment stays visible in the signatures.

use decaf_ast::Program;
use inkwell::AddressSpace;
use inkwell::basic_block::BasicBlock;
use inkwell::builder::Builder;
use inkwell::context::Context;
use inkwell::module::Module;
use inkwell::types::{ArrayType, BasicTypeEnum, IntType, PointerType};
use inkwell::values::{FunctionValue, PointerValue};
use std::cell::RefCell;
use std::collections::HashMap;

use crate::diagnostics::CodegenError;

mod emit;
mod escape;
mod expr;
mod helpers;
mod stmt;

/// A value handle bound to a name: scalar storage, array storage, or a
/// callable function.
#[derive(Debug, Clone, Copy)]
pub enum Binding<'a> {
    Var {
        ptr: PointerValue<'a>,
        ty: BasicTypeEnum<'a>,
    },
    Array {
        ptr: PointerValue<'a>,
        ty: ArrayType<'a>,
    },
    Func(FunctionValue<'a>),
}

/// The lexical scope chain, innermost scope last.
///
/// Lookup scans innermost-outward and the first match wins, so inner
/// declarations shadow outer ones. Declaring a name twice in the same scope
/// overwrites the earlier binding (last write wins). Bindings are handles
/// only; the stack never owns backend values.
#[derive(Debug, Default)]
pub struct ScopeStack<'a> {
    scopes: Vec<HashMap<String, Binding<'a>>>,
}

impl<'a> ScopeStack<'a> {
    pub fn new() -> Self {
        Self { scopes: Vec::new() }
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    /// Unconditional LIFO pop. Popping with no open scope is a caller bug.
    pub fn pop_scope(&mut self) {
        self.scopes
            .pop()
            .expect("pop_scope on an empty scope stack");
    }

    pub fn declare(&mut self, name: impl Into<String>, binding: Binding<'a>) {
        let scope = self
            .scopes
            .last_mut()
            .expect("declare with no open scope");
        scope.insert(name.into(), binding);
    }

    pub fn lookup(&self, name: &str) -> Option<Binding<'a>> {
        for scope in self.scopes.iter().rev() {
            if let Some(binding) = scope.get(name) {
                return Some(*binding);
            }
        }
        None
    }
}

/// Branch targets for the innermost enclosing loop.
#[derive(Debug, Clone, Copy)]
pub(crate) struct LoopContext<'a> {
    /// `continue` target: the loop's condition block.
    pub continue_block: BasicBlock<'a>,
    /// `break` target: the loop's exit block.
    pub break_block: BasicBlock<'a>,
}

pub struct CodeGen<'a> {
    pub context: &'a Context,
    pub module: Module<'a>,
    pub builder: Builder<'a>,
    // Cache commonly used LLVM types to avoid repeated calls into Context.
    pub i32_t: IntType<'a>,
    pub bool_t: IntType<'a>,
    pub i8ptr_t: PointerType<'a>,
    // Cache string literal contents to their emitted globals so identical
    // literals are emitted once and reused. `RefCell` lets us mutate this
    // from `&self`.
    string_literals: RefCell<HashMap<String, PointerValue<'a>>>,
    loop_context_stack: RefCell<Vec<LoopContext<'a>>>,
}

impl<'a> CodeGen<'a> {
    pub fn new(context: &'a Context, module_name: &str) -> Self {
        let module = context.create_module(module_name);
        let builder = context.create_builder();
        CodeGen {
            context,
            module,
            builder,
            i32_t: context.i32_type(),
            bool_t: context.bool_type(),
            i8ptr_t: context.ptr_type(AddressSpace::default()),
            string_literals: RefCell::new(HashMap::new()),
            loop_context_stack: RefCell::new(Vec::new()),
        }
    }

    /// Lower a whole compilation unit into the module.
    ///
    /// Externs go first so package code can call them; the package's fields
    /// and methods follow, all registered in one outermost scope.
    pub fn compile_program(&self, program: &Program) -> Result<(), CodegenError> {
        let mut scopes = ScopeStack::new();
        scopes.push_scope();

        for ext in &program.externs {
            self.gen_extern_ir(ext, &mut scopes)?;
        }

        let package = program
            .package
            .as_ref()
            .ok_or(CodegenError::MissingPackage)?;
        for field in &package.fields {
            self.gen_field_ir(field, &mut scopes)?;
        }
        for method in &package.methods {
            self.gen_method_ir(method, &mut scopes)?;
        }

        scopes.pop_scope();
        Ok(())
    }
}
