//! Statement lowering and control-flow construction.

use decaf_ast::{Block, Stmt};
use inkwell::basic_block::BasicBlock;
use inkwell::values::FunctionValue;

use super::{Binding, LoopContext, ScopeStack};
use crate::diagnostics::CodegenError;

impl<'a> super::CodeGen<'a> {
    /// Lower a block's declarations and statements in the current scope.
    ///
    /// Returns true if a lowered statement terminated the current basic
    /// block (return/break/continue, or an if whose branches both
    /// terminate); remaining statements are unreachable and are not lowered.
    pub(crate) fn lower_block(
        &self,
        block: &Block,
        function: FunctionValue<'a>,
        scopes: &mut ScopeStack<'a>,
    ) -> Result<bool, CodegenError> {
        for def in &block.var_defs {
            let ty = self.map_type(&def.ty)?;
            let alloca = self.builder.build_alloca(ty, &def.name)?;
            scopes.declare(def.name.clone(), Binding::Var { ptr: alloca, ty });
        }
        for stmt in &block.stmts {
            if self.lower_stmt(stmt, function, scopes)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Lower a block in a scope of its own.
    pub(crate) fn lower_scoped_block(
        &self,
        block: &Block,
        function: FunctionValue<'a>,
        scopes: &mut ScopeStack<'a>,
    ) -> Result<bool, CodegenError> {
        scopes.push_scope();
        let result = self.lower_block(block, function, scopes);
        scopes.pop_scope();
        result
    }

    pub(crate) fn lower_stmt(
        &self,
        stmt: &Stmt,
        function: FunctionValue<'a>,
        scopes: &mut ScopeStack<'a>,
    ) -> Result<bool, CodegenError> {
        match stmt {
            Stmt::Block(block) => self.lower_scoped_block(block, function, scopes),
            Stmt::Expr(expr) => {
                self.lower_expr(expr, function, scopes)?;
                Ok(false)
            }
            Stmt::Assign { name, value } => {
                let Some(binding) = scopes.lookup(name) else {
                    return Err(CodegenError::UndeclaredIdentifier(name.clone()));
                };
                let Binding::Var { ptr, .. } = binding else {
                    return Err(CodegenError::InvalidAssignment(format!(
                        "`{name}` is not scalar storage"
                    )));
                };
                let value = self.lower_expr(value, function, scopes)?.ok_or_else(|| {
                    CodegenError::InvalidAssignment(format!(
                        "right-hand side of `{name} =` has no value"
                    ))
                })?;
                // The name stays bound to its storage; the store changes the
                // contents, not the location.
                self.builder.build_store(ptr, value)?;
                Ok(false)
            }
            Stmt::AssignArray { name, index, value } => {
                let (elem_ptr, _) = self.array_element_ptr(name, index, function, scopes)?;
                let value = self.lower_expr(value, function, scopes)?.ok_or_else(|| {
                    CodegenError::InvalidAssignment(format!(
                        "right-hand side of `{name}[..] =` has no value"
                    ))
                })?;
                self.builder.build_store(elem_ptr, value)?;
                Ok(false)
            }
            Stmt::If {
                cond,
                then_block,
                else_block,
            } => {
                // Entry, true branch, optional false branch, merge. The
                // condition is evaluated inside the entry block; every
                // non-terminated branch funnels into the merge block, which
                // becomes the insertion point for whatever follows.
                let entry_bb = self.context.append_basic_block(function, "if.entry");
                let then_bb = self.context.append_basic_block(function, "if.then");
                let else_bb = else_block
                    .as_ref()
                    .map(|_| self.context.append_basic_block(function, "if.else"));
                let merge_bb = self.context.append_basic_block(function, "if.merge");

                self.builder.build_unconditional_branch(entry_bb)?;
                self.builder.position_at_end(entry_bb);
                let cond_val = self.lower_expr(cond, function, scopes)?;
                let cond_bool = self.as_condition(cond_val)?;
                self.builder
                    .build_conditional_branch(cond_bool, then_bb, else_bb.unwrap_or(merge_bb))?;

                self.builder.position_at_end(then_bb);
                let then_terminated = self.lower_scoped_block(then_block, function, scopes)?;
                if !then_terminated {
                    self.builder.build_unconditional_branch(merge_bb)?;
                }

                let mut else_terminated = false;
                if let (Some(else_block), Some(else_bb)) = (else_block, else_bb) {
                    self.builder.position_at_end(else_bb);
                    else_terminated = self.lower_scoped_block(else_block, function, scopes)?;
                    if !else_terminated {
                        self.builder.build_unconditional_branch(merge_bb)?;
                    }
                }

                self.builder.position_at_end(merge_bb);
                Ok(then_terminated && else_terminated)
            }
            Stmt::While { cond, body } => {
                let cond_bb = self.context.append_basic_block(function, "while.cond");
                let body_bb = self.context.append_basic_block(function, "while.body");
                let after_bb = self.context.append_basic_block(function, "while.after");

                self.builder.build_unconditional_branch(cond_bb)?;
                self.builder.position_at_end(cond_bb);
                let cond_val = self.lower_expr(cond, function, scopes)?;
                let cond_bool = self.as_condition(cond_val)?;
                self.builder
                    .build_conditional_branch(cond_bool, body_bb, after_bb)?;

                self.builder.position_at_end(body_bb);
                self.loop_context_stack.borrow_mut().push(LoopContext {
                    continue_block: cond_bb,
                    break_block: after_bb,
                });
                let body_result = self.lower_scoped_block(body, function, scopes);
                self.loop_context_stack.borrow_mut().pop();
                if !body_result? {
                    self.builder.build_unconditional_branch(cond_bb)?;
                }

                self.builder.position_at_end(after_bb);
                Ok(false)
            }
            Stmt::For {
                init,
                cond,
                step,
                body,
            } => {
                // Init runs once in the enclosing scope; the rest is a while
                // with the step statements at the tail of the body block.
                for stmt in init {
                    if self.lower_stmt(stmt, function, scopes)? {
                        return Ok(true);
                    }
                }

                let cond_bb = self.context.append_basic_block(function, "for.cond");
                let body_bb = self.context.append_basic_block(function, "for.body");
                let after_bb = self.context.append_basic_block(function, "for.after");

                self.builder.build_unconditional_branch(cond_bb)?;
                self.builder.position_at_end(cond_bb);
                let cond_val = self.lower_expr(cond, function, scopes)?;
                let cond_bool = self.as_condition(cond_val)?;
                self.builder
                    .build_conditional_branch(cond_bool, body_bb, after_bb)?;

                self.builder.position_at_end(body_bb);
                self.loop_context_stack.borrow_mut().push(LoopContext {
                    continue_block: cond_bb,
                    break_block: after_bb,
                });
                let body_result = self.lower_for_body(body, step, cond_bb, function, scopes);
                self.loop_context_stack.borrow_mut().pop();
                body_result?;

                self.builder.position_at_end(after_bb);
                Ok(false)
            }
            Stmt::Break => {
                let ctx = self.loop_context_stack.borrow().last().copied();
                let Some(ctx) = ctx else {
                    return Err(CodegenError::InvalidControlFlow("break"));
                };
                self.builder.build_unconditional_branch(ctx.break_block)?;
                Ok(true)
            }
            Stmt::Continue => {
                let ctx = self.loop_context_stack.borrow().last().copied();
                let Some(ctx) = ctx else {
                    return Err(CodegenError::InvalidControlFlow("continue"));
                };
                self.builder.build_unconditional_branch(ctx.continue_block)?;
                Ok(true)
            }
            Stmt::Return(expr) => {
                match expr {
                    Some(expr) => {
                        let value = self.lower_expr_value(expr, function, scopes)?;
                        self.builder.build_return(Some(&value))?;
                    }
                    None => {
                        self.builder.build_return(None)?;
                    }
                }
                Ok(true)
            }
        }
    }

    fn lower_for_body(
        &self,
        body: &Block,
        step: &[Stmt],
        cond_bb: BasicBlock<'a>,
        function: FunctionValue<'a>,
        scopes: &mut ScopeStack<'a>,
    ) -> Result<(), CodegenError> {
        if self.lower_scoped_block(body, function, scopes)? {
            return Ok(());
        }
        for stmt in step {
            if self.lower_stmt(stmt, function, scopes)? {
                return Ok(());
            }
        }
        self.builder.build_unconditional_branch(cond_bb)?;
        Ok(())
    }
}
