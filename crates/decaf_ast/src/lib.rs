//! Decaf AST definitions
//!
//! This crate defines the abstract syntax tree (AST) for the Decaf language.
//! It serves as the contract between the parser and the compiler core: the
//! parser builds these nodes, the code generator consumes them.
//!
//! Every node also has a canonical textual rendering (the `Display` impls)
//! used for diagnostics and golden-output testing. The forms are recursive
//! and comma-separated, e.g. `BinaryExpr(Plus,NumberExpr(1),NumberExpr(2))`;
//! an absent optional child and an empty child list both render as the
//! literal token `None`.

use std::fmt;

/// Surface-level type tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Type {
    Void,
    Int,
    Bool,
    String,
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Type::Void => "VoidType",
            Type::Int => "IntType",
            Type::Bool => "BoolType",
            Type::String => "StringType",
        })
    }
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Plus,
    Minus,
    Mult,
    Div,
    Mod,
    Leftshift,
    Rightshift,
    Lt,
    Leq,
    Gt,
    Geq,
    Eq,
    Neq,
    And,
    Or,
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BinaryOp::Plus => "Plus",
            BinaryOp::Minus => "Minus",
            BinaryOp::Mult => "Mult",
            BinaryOp::Div => "Div",
            BinaryOp::Mod => "Mod",
            BinaryOp::Leftshift => "Leftshift",
            BinaryOp::Rightshift => "Rightshift",
            BinaryOp::Lt => "Lt",
            BinaryOp::Leq => "Leq",
            BinaryOp::Gt => "Gt",
            BinaryOp::Geq => "Geq",
            BinaryOp::Eq => "Eq",
            BinaryOp::Neq => "Neq",
            BinaryOp::And => "And",
            BinaryOp::Or => "Or",
        })
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    UnaryMinus,
    Not,
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            UnaryOp::UnaryMinus => "UnaryMinus",
            UnaryOp::Not => "Not",
        })
    }
}

/// Expressions.
#[derive(Debug, Clone)]
pub enum Expr {
    /// Integer literal.
    Number(i32),
    /// Boolean literal.
    Bool(bool),
    /// String literal, as scanned: surrounding quotes still present, escape
    /// sequences unprocessed. The code generator owns unescaping.
    StringLit(String),
    /// Reference to a named variable.
    Variable(String),
    /// Reference to an array element.
    ArrayLoc { name: String, index: Box<Expr> },
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Unary { op: UnaryOp, operand: Box<Expr> },
    /// Method or extern-function call.
    Call { callee: String, args: Vec<Expr> },
    /// Parenthesized expression; semantically transparent.
    Paren(Box<Expr>),
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Number(n) => write!(f, "NumberExpr({n})"),
            Expr::Bool(b) => {
                write!(f, "BoolExpr({})", if *b { "True" } else { "False" })
            }
            Expr::StringLit(raw) => write!(f, "StringConstant({raw})"),
            Expr::Variable(name) => write!(f, "VariableExpr({name})"),
            Expr::ArrayLoc { name, index } => {
                write!(f, "ArrayLocExpr({name},{index})")
            }
            Expr::Binary { op, lhs, rhs } => {
                write!(f, "BinaryExpr({op},{lhs},{rhs})")
            }
            Expr::Unary { op, operand } => write!(f, "UnaryExpr({op},{operand})"),
            Expr::Call { callee, args } => {
                write!(f, "MethodCall({callee},")?;
                write_list(f, args)?;
                f.write_str(")")
            }
            Expr::Paren(inner) => write!(f, "({inner})"),
        }
    }
}

/// A typed local declaration; also used for named method parameters.
#[derive(Debug, Clone)]
pub struct VarDef {
    pub name: String,
    pub ty: Type,
}

impl fmt::Display for VarDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VarDef({},{})", self.name, self.ty)
    }
}

/// A brace-delimited block: local declarations first, then statements.
#[derive(Debug, Clone)]
pub struct Block {
    pub var_defs: Vec<VarDef>,
    pub stmts: Vec<Stmt>,
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Block(")?;
        write_list(f, &self.var_defs)?;
        f.write_str(",")?;
        write_list(f, &self.stmts)?;
        f.write_str(")")
    }
}

/// Statements.
#[derive(Debug, Clone)]
pub enum Stmt {
    Block(Block),
    /// Assignment to a scalar variable.
    Assign { name: String, value: Expr },
    /// Assignment to an array element.
    AssignArray {
        name: String,
        index: Expr,
        value: Expr,
    },
    If {
        cond: Expr,
        then_block: Block,
        else_block: Option<Block>,
    },
    While { cond: Expr, body: Block },
    /// `for (init; cond; step) body`. The init and step lists hold plain
    /// assignment statements in the surface grammar.
    For {
        init: Vec<Stmt>,
        cond: Expr,
        step: Vec<Stmt>,
        body: Block,
    },
    Break,
    Continue,
    Return(Option<Expr>),
    /// An expression in statement position (a method call).
    Expr(Expr),
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stmt::Block(block) => block.fmt(f),
            Stmt::Assign { name, value } => write!(f, "AssignVar({name},{value})"),
            Stmt::AssignArray { name, index, value } => {
                write!(f, "AssignArrayLoc({name},{index},{value})")
            }
            Stmt::If {
                cond,
                then_block,
                else_block,
            } => {
                write!(f, "IfStmt({cond},{then_block},")?;
                write_opt(f, else_block.as_ref())?;
                f.write_str(")")
            }
            Stmt::While { cond, body } => write!(f, "WhileStmt({cond},{body})"),
            Stmt::For {
                init,
                cond,
                step,
                body,
            } => {
                f.write_str("ForStmt(")?;
                write_list(f, init)?;
                write!(f, ",{cond},")?;
                write_list(f, step)?;
                write!(f, ",{body})")
            }
            Stmt::Break => f.write_str("BreakStmt"),
            Stmt::Continue => f.write_str("ContinueStmt"),
            Stmt::Return(expr) => {
                f.write_str("ReturnStmt(")?;
                write_opt(f, expr.as_ref())?;
                f.write_str(")")
            }
            Stmt::Expr(expr) => expr.fmt(f),
        }
    }
}

/// Storage shape of a package-level field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldSize {
    Scalar,
    /// Fixed-length array; the length is a literal from the source text and
    /// may therefore be negative, which the code generator rejects.
    Array(i64),
}

impl fmt::Display for FieldSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldSize::Scalar => f.write_str("Scalar"),
            FieldSize::Array(n) => write!(f, "Array({n})"),
        }
    }
}

/// A package-level storage declaration.
#[derive(Debug, Clone)]
pub enum FieldDecl {
    /// Zero-initialized scalar or array storage.
    Var {
        name: String,
        ty: Type,
        size: FieldSize,
    },
    /// Scalar storage with a constant initializer.
    Assigned { name: String, ty: Type, value: Expr },
}

impl fmt::Display for FieldDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldDecl::Var { name, ty, size } => {
                write!(f, "FieldDecl({name},{ty},{size})")
            }
            FieldDecl::Assigned { name, ty, value } => {
                write!(f, "AssignGlobalVar({name},{ty},{value})")
            }
        }
    }
}

/// An external function prototype.
#[derive(Debug, Clone)]
pub struct ExternFunction {
    pub name: String,
    pub return_type: Type,
    pub param_types: Vec<Type>,
}

impl fmt::Display for ExternFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ExternFunction({},{},", self.name, self.return_type)?;
        if self.param_types.is_empty() {
            f.write_str("None")?;
        } else {
            for (i, ty) in self.param_types.iter().enumerate() {
                if i > 0 {
                    f.write_str(",")?;
                }
                write!(f, "VarDef({ty})")?;
            }
        }
        f.write_str(")")
    }
}

/// A method definition.
#[derive(Debug, Clone)]
pub struct MethodDecl {
    pub name: String,
    pub return_type: Type,
    pub params: Vec<VarDef>,
    pub block: Block,
}

impl fmt::Display for MethodDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Method({},{},", self.name, self.return_type)?;
        write_list(f, &self.params)?;
        f.write_str(",MethodBlock(")?;
        write_list(f, &self.block.var_defs)?;
        f.write_str(",")?;
        write_list(f, &self.block.stmts)?;
        f.write_str("))")
    }
}

/// The package: fields and methods under one name.
#[derive(Debug, Clone)]
pub struct Package {
    pub name: String,
    pub fields: Vec<FieldDecl>,
    pub methods: Vec<MethodDecl>,
}

impl fmt::Display for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Package({},", self.name)?;
        write_list(f, &self.fields)?;
        f.write_str(",")?;
        write_list(f, &self.methods)?;
        f.write_str(")")
    }
}

/// The whole compilation unit: extern prototypes plus the package.
#[derive(Debug, Clone)]
pub struct Program {
    pub externs: Vec<ExternFunction>,
    pub package: Option<Package>,
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Program(")?;
        write_list(f, &self.externs)?;
        f.write_str(",")?;
        write_opt(f, self.package.as_ref())?;
        f.write_str(")")
    }
}

fn write_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    if items.is_empty() {
        return f.write_str("None");
    }
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(",")?;
        }
        item.fmt(f)?;
    }
    Ok(())
}

fn write_opt<T: fmt::Display>(f: &mut fmt::Formatter<'_>, item: Option<&T>) -> fmt::Result {
    match item {
        Some(item) => item.fmt(f),
        None => f.write_str("None"),
    }
}
