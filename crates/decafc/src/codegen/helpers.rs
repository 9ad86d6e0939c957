use decaf_ast::Type;
use inkwell::types::{BasicMetadataTypeEnum, BasicType, BasicTypeEnum, FunctionType};
use inkwell::values::{BasicValueEnum, IntValue};

use crate::diagnostics::CodegenError;

impl<'a> super::CodeGen<'a> {
    // Map a surface type to the LLVM type used for storage, parameters and
    // array elements. `Void` has no value type; asking for one means the
    // front end handed over an ill-formed tree.
    pub(crate) fn map_type(&self, ty: &Type) -> Result<BasicTypeEnum<'a>, CodegenError> {
        match ty {
            Type::Int => Ok(self.i32_t.as_basic_type_enum()),
            Type::Bool => Ok(self.bool_t.as_basic_type_enum()),
            Type::String => Ok(self.i8ptr_t.as_basic_type_enum()),
            Type::Void => Err(CodegenError::UnknownType(Type::Void.to_string())),
        }
    }

    /// Zero initializer for a surface type: `0`, `false`, or the null
    /// string pointer.
    pub(crate) fn zero_value(&self, ty: &Type) -> Result<BasicValueEnum<'a>, CodegenError> {
        match ty {
            Type::Int => Ok(self.i32_t.const_zero().into()),
            Type::Bool => Ok(self.bool_t.const_zero().into()),
            Type::String => Ok(self.i8ptr_t.const_null().into()),
            Type::Void => Err(CodegenError::UnknownType(Type::Void.to_string())),
        }
    }

    /// Build an LLVM function type from surface parameter and return types.
    /// `Void` is only legal as the return type.
    pub(crate) fn fn_type_for(
        &self,
        params: &[Type],
        ret: &Type,
    ) -> Result<FunctionType<'a>, CodegenError> {
        let mut param_types: Vec<BasicMetadataTypeEnum<'a>> = Vec::with_capacity(params.len());
        for param in params {
            param_types.push(self.map_type(param)?.into());
        }
        Ok(match ret {
            Type::Void => self.context.void_type().fn_type(&param_types, false),
            other => self.map_type(other)?.fn_type(&param_types, false),
        })
    }

    /// Zero-extend an integer narrower than 32 bits; everything else passes
    /// through. This is the promotion applied to mismatched binary operands
    /// and to call arguments.
    pub(crate) fn promote_to_i32(&self, value: IntValue<'a>) -> Result<IntValue<'a>, CodegenError> {
        if value.get_type().get_bit_width() < 32 {
            Ok(self
                .builder
                .build_int_z_extend(value, self.i32_t, "zexttmp")?)
        } else {
            Ok(value)
        }
    }

    /// Extract the i1 condition from a lowered expression value. Conditions
    /// are boolean-typed at the surface, so anything else is an ill-formed
    /// tree.
    pub(crate) fn as_condition(
        &self,
        value: Option<BasicValueEnum<'a>>,
    ) -> Result<IntValue<'a>, CodegenError> {
        match value {
            Some(BasicValueEnum::IntValue(iv)) => Ok(iv),
            _ => Err(CodegenError::Internal(
                "condition did not lower to a boolean value".into(),
            )),
        }
    }
}
