//! Top-level item emission: package fields, extern prototypes, and method
//! definitions.

use decaf_ast::{Expr, ExternFunction, FieldDecl, FieldSize, MethodDecl, Type, VarDef};
use inkwell::module::Linkage;
use inkwell::types::BasicType;
use inkwell::values::{BasicValue, FunctionValue};

use super::{Binding, ScopeStack};
use crate::diagnostics::CodegenError;

impl<'a> super::CodeGen<'a> {
    /// Materialize a package-level field as module storage and register it
    /// in the current (outermost) scope.
    pub(crate) fn gen_field_ir(
        &self,
        field: &FieldDecl,
        scopes: &mut ScopeStack<'a>,
    ) -> Result<(), CodegenError> {
        match field {
            FieldDecl::Var {
                name,
                ty,
                size: FieldSize::Scalar,
            } => {
                let llvm_ty = self.map_type(ty)?;
                let global = self.module.add_global(llvm_ty, None, name);
                global.set_linkage(Linkage::Internal);
                global.set_initializer(&self.zero_value(ty)?);
                scopes.declare(
                    name.clone(),
                    Binding::Var {
                        ptr: global.as_pointer_value(),
                        ty: llvm_ty,
                    },
                );
            }
            FieldDecl::Var {
                name,
                ty,
                size: FieldSize::Array(len),
            } => {
                if *len < 0 || *len > u32::MAX as i64 {
                    return Err(CodegenError::InvalidArraySize {
                        name: name.clone(),
                        size: *len,
                    });
                }
                let elem_ty = self.map_type(ty)?;
                let arr_ty = elem_ty.array_type(*len as u32);
                let global = self.module.add_global(arr_ty, None, name);
                global.set_initializer(&arr_ty.const_zero());
                scopes.declare(
                    name.clone(),
                    Binding::Array {
                        ptr: global.as_pointer_value(),
                        ty: arr_ty,
                    },
                );
            }
            FieldDecl::Assigned { name, ty, value } => {
                let llvm_ty = self.map_type(ty)?;
                let init = match value {
                    Expr::Number(n) => {
                        self.i32_t.const_int(*n as u64, false).as_basic_value_enum()
                    }
                    Expr::Bool(b) => {
                        self.bool_t.const_int(*b as u64, false).as_basic_value_enum()
                    }
                    other => {
                        return Err(CodegenError::InvalidAssignment(format!(
                            "global `{name}` initializer `{other}` is not a literal constant"
                        )));
                    }
                };
                let global = self.module.add_global(llvm_ty, None, name);
                global.set_linkage(Linkage::Internal);
                global.set_initializer(&init);
                scopes.declare(
                    name.clone(),
                    Binding::Var {
                        ptr: global.as_pointer_value(),
                        ty: llvm_ty,
                    },
                );
            }
        }
        Ok(())
    }

    /// Declare an extern prototype (no body) and register it for call
    /// resolution.
    pub(crate) fn gen_extern_ir(
        &self,
        ext: &ExternFunction,
        scopes: &mut ScopeStack<'a>,
    ) -> Result<FunctionValue<'a>, CodegenError> {
        let fn_type = self.fn_type_for(&ext.param_types, &ext.return_type)?;
        let function = self.module.add_function(&ext.name, fn_type, None);
        scopes.declare(ext.name.clone(), Binding::Func(function));
        Ok(function)
    }

    /// Lower a method definition: signature, entry block, parameter
    /// spilling, body, and the default-return patch.
    pub(crate) fn gen_method_ir(
        &self,
        method: &MethodDecl,
        scopes: &mut ScopeStack<'a>,
    ) -> Result<FunctionValue<'a>, CodegenError> {
        // `main` keeps the entry-point ABI no matter how it was declared.
        let is_main = method.name == "main";
        let (param_defs, ret_type): (&[VarDef], Type) = if is_main {
            (&[], Type::Int)
        } else {
            (method.params.as_slice(), method.return_type)
        };

        let param_types: Vec<Type> = param_defs.iter().map(|p| p.ty).collect();
        let fn_type = self.fn_type_for(&param_types, &ret_type)?;
        let function = self.module.add_function(&method.name, fn_type, None);
        // Registered before the body is lowered so self-recursion resolves.
        scopes.declare(method.name.clone(), Binding::Func(function));

        let entry = self.context.append_basic_block(function, "entry");
        self.builder.position_at_end(entry);

        scopes.push_scope();
        let result = self.lower_method_body(method, function, param_defs, &ret_type, scopes);
        scopes.pop_scope();
        result?;
        Ok(function)
    }

    fn lower_method_body(
        &self,
        method: &MethodDecl,
        function: FunctionValue<'a>,
        param_defs: &[VarDef],
        ret_type: &Type,
        scopes: &mut ScopeStack<'a>,
    ) -> Result<(), CodegenError> {
        // Spill each parameter into a fresh alloca so parameters behave as
        // mutable locals.
        for (i, def) in param_defs.iter().enumerate() {
            let param_val = function.get_nth_param(i as u32).ok_or_else(|| {
                CodegenError::Internal(format!(
                    "missing parameter `{}` for method `{}`",
                    def.name, method.name
                ))
            })?;
            let ty = self.map_type(&def.ty)?;
            let alloca = self.builder.build_alloca(ty, &def.name)?;
            self.builder.build_store(alloca, param_val)?;
            scopes.declare(def.name.clone(), Binding::Var { ptr: alloca, ty });
        }

        self.lower_block(&method.block, function, scopes)?;

        // Patch the fall-through path with a default return of the declared
        // type's zero value, so every block ends in a terminator even when
        // the source omits a return.
        if self
            .builder
            .get_insert_block()
            .is_none_or(|bb| bb.get_terminator().is_none())
        {
            match ret_type {
                Type::Void => {
                    self.builder.build_return(None)?;
                }
                other => {
                    let zero = self.zero_value(other)?;
                    self.builder.build_return(Some(&zero))?;
                }
            }
        }
        Ok(())
    }
}
