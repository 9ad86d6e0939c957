//! Decaf compiler middle end.
//!
//! Consumes the parsed AST from `decaf_ast` and lowers it to LLVM IR through
//! `inkwell`: scoped symbol resolution, expression lowering with
//! integer-width promotion, control-flow construction via explicit basic
//! blocks, and global/extern/method materialization. The parser in front of
//! this crate and the code-emission stage behind it are external
//! collaborators.

pub mod codegen;
pub mod diagnostics;

use decaf_ast::Program;
use inkwell::context::Context;
use inkwell::module::Module;

use codegen::CodeGen;
use diagnostics::CodegenError;

/// Lower a whole program into a fresh LLVM module.
///
/// Any lowering error aborts the pass; the partially built module is dropped
/// with the generator and no partial output escapes.
pub fn compile<'ctx>(
    context: &'ctx Context,
    module_name: &str,
    program: &Program,
) -> Result<Module<'ctx>, CodegenError> {
    let codegen = CodeGen::new(context, module_name);
    codegen.compile_program(program)?;
    Ok(codegen.module)
}
