//! Expression lowering.

use decaf_ast::{BinaryOp, Expr, UnaryOp};
use inkwell::IntPredicate;
use inkwell::types::{BasicMetadataTypeEnum, BasicTypeEnum};
use inkwell::values::{BasicMetadataValueEnum, BasicValueEnum, FunctionValue, IntValue, PointerValue};

use super::{Binding, ScopeStack};
use crate::codegen::escape;
use crate::diagnostics::CodegenError;

impl<'a> super::CodeGen<'a> {
    /// Lower an expression at the current insertion point. `None` means the
    /// expression produced no value (a call to a void function).
    pub(crate) fn lower_expr(
        &self,
        expr: &Expr,
        function: FunctionValue<'a>,
        scopes: &mut ScopeStack<'a>,
    ) -> Result<Option<BasicValueEnum<'a>>, CodegenError> {
        match expr {
            Expr::Number(n) => Ok(Some(self.i32_t.const_int(*n as u64, false).into())),
            Expr::Bool(b) => Ok(Some(self.bool_t.const_int(*b as u64, false).into())),
            Expr::StringLit(raw) => self.lower_string_literal(raw).map(Some),
            Expr::Variable(name) => match scopes.lookup(name) {
                Some(Binding::Var { ptr, ty }) => {
                    Ok(Some(self.builder.build_load(ty, ptr, name)?))
                }
                Some(_) => Err(CodegenError::Internal(format!(
                    "`{name}` is not a scalar variable"
                ))),
                None => Err(CodegenError::UndeclaredIdentifier(name.clone())),
            },
            Expr::ArrayLoc { name, index } => {
                let (elem_ptr, elem_ty) = self.array_element_ptr(name, index, function, scopes)?;
                Ok(Some(self.builder.build_load(elem_ty, elem_ptr, "arrayload")?))
            }
            Expr::Paren(inner) => self.lower_expr(inner, function, scopes),
            Expr::Binary { op, lhs, rhs } => {
                let lhs_val = self.lower_expr_value(lhs, function, scopes)?;
                let rhs_val = self.lower_expr_value(rhs, function, scopes)?;
                self.lower_binary(*op, lhs_val, rhs_val).map(Some)
            }
            Expr::Unary { op, operand } => {
                let value = self.lower_expr_value(operand, function, scopes)?;
                let BasicValueEnum::IntValue(iv) = value else {
                    return Err(CodegenError::InvalidOperator(op.to_string()));
                };
                let result = match op {
                    UnaryOp::UnaryMinus => self.builder.build_int_neg(iv, "negtmp")?,
                    UnaryOp::Not => self.builder.build_not(iv, "nottmp")?,
                };
                Ok(Some(result.into()))
            }
            Expr::Call { callee, args } => self.lower_call(callee, args, function, scopes),
        }
    }

    /// Lower an expression that must produce a value.
    pub(crate) fn lower_expr_value(
        &self,
        expr: &Expr,
        function: FunctionValue<'a>,
        scopes: &mut ScopeStack<'a>,
    ) -> Result<BasicValueEnum<'a>, CodegenError> {
        self.lower_expr(expr, function, scopes)?.ok_or_else(|| {
            CodegenError::Internal("void value in expression position".into())
        })
    }

    // Both-integer operands of differing widths are zero-extended to i32
    // before the operation; division, remainder and comparisons are signed,
    // the right shift is logical, and/or are bitwise on the i1
    // representation. Operators have no meaning for non-integer operands.
    fn lower_binary(
        &self,
        op: BinaryOp,
        lhs: BasicValueEnum<'a>,
        rhs: BasicValueEnum<'a>,
    ) -> Result<BasicValueEnum<'a>, CodegenError> {
        let (BasicValueEnum::IntValue(mut l), BasicValueEnum::IntValue(mut r)) = (lhs, rhs) else {
            return Err(CodegenError::InvalidOperator(op.to_string()));
        };
        if l.get_type().get_bit_width() != r.get_type().get_bit_width() {
            l = self.promote_to_i32(l)?;
            r = self.promote_to_i32(r)?;
        }

        let b = &self.builder;
        let result: IntValue<'a> = match op {
            BinaryOp::Plus => b.build_int_add(l, r, "addtmp")?,
            BinaryOp::Minus => b.build_int_sub(l, r, "subtmp")?,
            BinaryOp::Mult => b.build_int_mul(l, r, "multmp")?,
            BinaryOp::Div => b.build_int_signed_div(l, r, "sdivtmp")?,
            BinaryOp::Mod => b.build_int_signed_rem(l, r, "sremtmp")?,
            BinaryOp::Leftshift => b.build_left_shift(l, r, "shltmp")?,
            BinaryOp::Rightshift => b.build_right_shift(l, r, false, "lshrtmp")?,
            BinaryOp::Lt => b.build_int_compare(IntPredicate::SLT, l, r, "cmpslttmp")?,
            BinaryOp::Leq => b.build_int_compare(IntPredicate::SLE, l, r, "cmpsletmp")?,
            BinaryOp::Gt => b.build_int_compare(IntPredicate::SGT, l, r, "cmpsgttmp")?,
            BinaryOp::Geq => b.build_int_compare(IntPredicate::SGE, l, r, "cmpsgetmp")?,
            BinaryOp::Eq => b.build_int_compare(IntPredicate::EQ, l, r, "cmpeqtmp")?,
            BinaryOp::Neq => b.build_int_compare(IntPredicate::NE, l, r, "cmpnetmp")?,
            BinaryOp::And => b.build_and(l, r, "andtmp")?,
            BinaryOp::Or => b.build_or(l, r, "ortmp")?,
        };
        Ok(result.into())
    }

    fn lower_call(
        &self,
        callee: &str,
        args: &[Expr],
        function: FunctionValue<'a>,
        scopes: &mut ScopeStack<'a>,
    ) -> Result<Option<BasicValueEnum<'a>>, CodegenError> {
        let Some(binding) = scopes.lookup(callee) else {
            return Err(CodegenError::UndeclaredIdentifier(callee.to_string()));
        };
        let Binding::Func(callee_fn) = binding else {
            return Err(CodegenError::Internal(format!("`{callee}` is not callable")));
        };

        // Integer arguments whose type differs from the declared parameter
        // type are zero-extended to i32.
        let param_types = callee_fn.get_type().get_param_types();
        let mut lowered: Vec<BasicMetadataValueEnum<'a>> = Vec::with_capacity(args.len());
        for (i, arg) in args.iter().enumerate() {
            let mut value = self.lower_expr_value(arg, function, scopes)?;
            if let (Some(param_ty), BasicValueEnum::IntValue(iv)) = (param_types.get(i), value)
                && BasicMetadataTypeEnum::from(value.get_type()) != *param_ty
            {
                value = self.promote_to_i32(iv)?.into();
            }
            lowered.push(value.into());
        }

        let is_void = callee_fn.get_type().get_return_type().is_none();
        let call = self
            .builder
            .build_call(callee_fn, &lowered, if is_void { "" } else { "calltmp" })?;
        Ok(call.try_as_basic_value().left())
    }

    // String literals intern into read-only NUL-terminated globals; the
    // expression value is a pointer to the first byte. Identical processed
    // literals share one global.
    fn lower_string_literal(&self, raw: &str) -> Result<BasicValueEnum<'a>, CodegenError> {
        let text = escape::unescape(raw);
        if let Some(ptr) = self.string_literals.borrow().get(&text) {
            return Ok((*ptr).into());
        }
        let global = self.builder.build_global_string_ptr(&text, "globalstring")?;
        let ptr = global.as_pointer_value();
        self.string_literals.borrow_mut().insert(text, ptr);
        Ok(ptr.into())
    }

    /// Compute the address of `name[index]`. The index is a fully general
    /// expression, promoted to i32 before the address computation. Shared by
    /// element reads (which load) and element assignment (which stores).
    pub(crate) fn array_element_ptr(
        &self,
        name: &str,
        index: &Expr,
        function: FunctionValue<'a>,
        scopes: &mut ScopeStack<'a>,
    ) -> Result<(PointerValue<'a>, BasicTypeEnum<'a>), CodegenError> {
        let Some(binding) = scopes.lookup(name) else {
            return Err(CodegenError::UndeclaredIdentifier(name.to_string()));
        };
        let Binding::Array { ptr, ty } = binding else {
            return Err(CodegenError::Internal(format!("`{name}` is not an array")));
        };

        let index_val = match self.lower_expr_value(index, function, scopes)? {
            BasicValueEnum::IntValue(iv) => self.promote_to_i32(iv)?,
            _ => {
                return Err(CodegenError::Internal(
                    "array index is not an integer".into(),
                ));
            }
        };
        let zero = self.i32_t.const_zero();
        let elem_ptr = unsafe {
            self.builder
                .build_in_bounds_gep(ty, ptr, &[zero, index_val], "arrayindex")?
        };
        Ok((elem_ptr, ty.get_element_type()))
    }
}
