//! Arena-allocated syntax tree.
//!
//! Every node lives in an [`ExprArena`]. Nodes refer to children by id, and
//! variable-length children (argument lists, block bodies, object
//! properties) are stored contiguously in side tables and referenced by a
//! `start + len` range. A parsed program is a [`Module`]: the arena plus the
//! range of top-level statements.

use std::fmt;

use smallvec::SmallVec;

use crate::{Name, Span};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Eq, PartialEq, Hash)]
        #[repr(transparent)]
        pub struct $name(u32);

        impl $name {
            #[inline]
            pub const fn new(index: u32) -> Self {
                $name(index)
            }

            #[inline]
            pub const fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    };
}

macro_rules! define_range {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
        pub struct $name {
            pub start: u32,
            pub len: u32,
        }

        impl $name {
            pub const EMPTY: $name = $name { start: 0, len: 0 };

            #[inline]
            pub const fn new(start: u32, len: u32) -> Self {
                $name { start, len }
            }

            #[inline]
            pub const fn is_empty(&self) -> bool {
                self.len == 0
            }

            #[inline]
            pub const fn len(&self) -> usize {
                self.len as usize
            }

            #[inline]
            fn as_range(self) -> std::ops::Range<usize> {
                self.start as usize..(self.start + self.len) as usize
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({}..+{})", stringify!($name), self.start, self.len)
            }
        }
    };
}

define_id!(
    /// Index into the expression table.
    ExprId
);
define_id!(
    /// Index into the statement table.
    StmtId
);
define_id!(
    /// Index into the function table.
    FunctionId
);

define_range!(
    /// Range of expression ids (call arguments, array elements).
    ExprRange
);
define_range!(
    /// Range of statement ids (block and function bodies).
    StmtRange
);
define_range!(
    /// Range of declarators in a `var`/`let`/`const` statement.
    DeclaratorRange
);
define_range!(
    /// Range of object literal properties.
    PropertyRange
);
define_range!(
    /// Range of template literal parts.
    TemplateRange
);

/// Declaration style of a variable binding.
///
/// The kind decides both where a declaration is hoisted and whether the
/// binding can be read before its declaration line or reassigned after it.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum DeclKind {
    /// `var`: function-scoped, mutable, hoisted as `undefined`.
    Var,
    /// `let`: block-scoped, mutable, unreadable before its declaration.
    Let,
    /// `const`: block-scoped, assigned exactly once.
    Const,
}

impl DeclKind {
    /// `let` and `const` live in the nearest block; `var` in the nearest function.
    #[inline]
    pub fn is_block_scoped(self) -> bool {
        matches!(self, DeclKind::Let | DeclKind::Const)
    }

    /// Only `const` bindings reject reassignment.
    #[inline]
    pub fn is_mutable(self) -> bool {
        !matches!(self, DeclKind::Const)
    }

    /// Source keyword.
    pub fn keyword(self) -> &'static str {
        match self {
            DeclKind::Var => "var",
            DeclKind::Let => "let",
            DeclKind::Const => "const",
        }
    }
}

/// Arithmetic, equality and relational operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Pow,
    StrictEq,
    StrictNotEq,
    LooseEq,
    LooseNotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
}

/// Short-circuiting operators. They return one of their operands.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum LogicalOp {
    And,
    Or,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum UnaryOp {
    Not,
    Neg,
    Plus,
    Typeof,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum UpdateOp {
    Increment,
    Decrement,
}

/// Expression node.
#[derive(Clone, Debug, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ExprKind {
    Number(f64),
    Str(Name),
    Template(TemplateRange),
    Bool(bool),
    Null,
    Ident(Name),
    Array(ExprRange),
    Object(PropertyRange),
    Function(FunctionId),
    Unary {
        op: UnaryOp,
        operand: ExprId,
    },
    Binary {
        op: BinaryOp,
        left: ExprId,
        right: ExprId,
    },
    Logical {
        op: LogicalOp,
        left: ExprId,
        right: ExprId,
    },
    /// `target = value`, or `target op= value` when `op` is set.
    Assign {
        op: Option<BinaryOp>,
        target: ExprId,
        value: ExprId,
    },
    Update {
        op: UpdateOp,
        prefix: bool,
        target: ExprId,
    },
    Conditional {
        test: ExprId,
        consequent: ExprId,
        alternate: ExprId,
    },
    Call {
        callee: ExprId,
        args: ExprRange,
    },
    Member {
        object: ExprId,
        property: Name,
    },
    Index {
        object: ExprId,
        index: ExprId,
    },
}

impl ExprKind {
    /// Whether this expression may appear on the left of `=`, `++` or `--`.
    pub fn is_assignment_target(&self) -> bool {
        matches!(
            self,
            ExprKind::Ident(_) | ExprKind::Member { .. } | ExprKind::Index { .. }
        )
    }
}

/// Statement node.
#[derive(Clone, Debug, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub enum StmtKind {
    Declaration {
        kind: DeclKind,
        declarators: DeclaratorRange,
    },
    Function(FunctionId),
    Expr(ExprId),
    Block(StmtRange),
    If {
        test: ExprId,
        consequent: StmtId,
        alternate: Option<StmtId>,
    },
    For {
        init: Option<StmtId>,
        test: Option<ExprId>,
        update: Option<ExprId>,
        body: StmtId,
    },
    /// `for (kind? binding of iterable) body`. Without a declaration keyword
    /// the loop assigns to an existing binding.
    ForOf {
        kind: Option<DeclKind>,
        binding: Name,
        iterable: ExprId,
        body: StmtId,
    },
    While {
        test: ExprId,
        body: StmtId,
    },
    Return(Option<ExprId>),
    Break,
    Continue,
    Empty,
}

/// One `name = init` in a declaration statement.
#[derive(Clone, Debug, PartialEq)]
pub struct Declarator {
    pub name: Name,
    pub init: Option<ExprId>,
    pub span: Span,
}

/// One `key: value` (or shorthand `key`) in an object literal.
#[derive(Clone, Debug, PartialEq)]
pub struct Property {
    pub key: Name,
    pub value: ExprId,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub enum TemplatePart {
    /// Literal text with escapes processed.
    Text(Name),
    /// A `${expr}` hole.
    Expr(ExprId),
}

/// Syntactic origin of a function value.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum FunctionKind {
    /// `function name() {}` statement; hoisted with its value.
    Declaration,
    /// `function () {}` or `function name() {}` in expression position.
    Expression,
    /// `(a, b) => ...`
    Arrow,
}

#[derive(Clone, Debug, PartialEq)]
pub enum FunctionBody {
    Block(StmtRange),
    /// Arrow function with an expression body: implicit return.
    Expr(ExprId),
}

#[derive(Clone, Debug, PartialEq)]
pub struct FunctionDef {
    pub name: Option<Name>,
    pub params: SmallVec<[Name; 4]>,
    pub body: FunctionBody,
    pub kind: FunctionKind,
    pub span: Span,
}

/// Storage for every node of one parsed program.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExprArena {
    exprs: Vec<Expr>,
    stmts: Vec<Stmt>,
    functions: Vec<FunctionDef>,
    expr_lists: Vec<ExprId>,
    stmt_lists: Vec<StmtId>,
    declarators: Vec<Declarator>,
    properties: Vec<Property>,
    template_parts: Vec<TemplatePart>,
}

fn next_index(len: usize) -> u32 {
    u32::try_from(len).unwrap_or_else(|_| panic!("arena exceeded u32::MAX entries"))
}

impl ExprArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc_expr(&mut self, kind: ExprKind, span: Span) -> ExprId {
        let id = ExprId::new(next_index(self.exprs.len()));
        self.exprs.push(Expr { kind, span });
        id
    }

    pub fn alloc_stmt(&mut self, kind: StmtKind, span: Span) -> StmtId {
        let id = StmtId::new(next_index(self.stmts.len()));
        self.stmts.push(Stmt { kind, span });
        id
    }

    pub fn alloc_function(&mut self, def: FunctionDef) -> FunctionId {
        let id = FunctionId::new(next_index(self.functions.len()));
        self.functions.push(def);
        id
    }

    pub fn alloc_expr_list(&mut self, ids: impl IntoIterator<Item = ExprId>) -> ExprRange {
        let start = next_index(self.expr_lists.len());
        self.expr_lists.extend(ids);
        ExprRange::new(start, next_index(self.expr_lists.len()) - start)
    }

    pub fn alloc_stmt_list(&mut self, ids: impl IntoIterator<Item = StmtId>) -> StmtRange {
        let start = next_index(self.stmt_lists.len());
        self.stmt_lists.extend(ids);
        StmtRange::new(start, next_index(self.stmt_lists.len()) - start)
    }

    pub fn alloc_declarators(
        &mut self,
        items: impl IntoIterator<Item = Declarator>,
    ) -> DeclaratorRange {
        let start = next_index(self.declarators.len());
        self.declarators.extend(items);
        DeclaratorRange::new(start, next_index(self.declarators.len()) - start)
    }

    pub fn alloc_properties(&mut self, items: impl IntoIterator<Item = Property>) -> PropertyRange {
        let start = next_index(self.properties.len());
        self.properties.extend(items);
        PropertyRange::new(start, next_index(self.properties.len()) - start)
    }

    pub fn alloc_template(&mut self, items: impl IntoIterator<Item = TemplatePart>) -> TemplateRange {
        let start = next_index(self.template_parts.len());
        self.template_parts.extend(items);
        TemplateRange::new(start, next_index(self.template_parts.len()) - start)
    }

    #[inline]
    pub fn expr(&self, id: ExprId) -> &Expr {
        &self.exprs[id.index()]
    }

    #[inline]
    pub fn stmt(&self, id: StmtId) -> &Stmt {
        &self.stmts[id.index()]
    }

    #[inline]
    pub fn function(&self, id: FunctionId) -> &FunctionDef {
        &self.functions[id.index()]
    }

    #[inline]
    pub fn expr_list(&self, range: ExprRange) -> &[ExprId] {
        &self.expr_lists[range.as_range()]
    }

    #[inline]
    pub fn stmt_list(&self, range: StmtRange) -> &[StmtId] {
        &self.stmt_lists[range.as_range()]
    }

    #[inline]
    pub fn declarators(&self, range: DeclaratorRange) -> &[Declarator] {
        &self.declarators[range.as_range()]
    }

    #[inline]
    pub fn properties(&self, range: PropertyRange) -> &[Property] {
        &self.properties[range.as_range()]
    }

    #[inline]
    pub fn template_parts(&self, range: TemplateRange) -> &[TemplatePart] {
        &self.template_parts[range.as_range()]
    }

    pub fn expr_count(&self) -> usize {
        self.exprs.len()
    }

    pub fn stmt_count(&self) -> usize {
        self.stmts.len()
    }

    pub fn function_count(&self) -> usize {
        self.functions.len()
    }
}

/// A parsed program: its arena and the top-level statement list.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Module {
    pub arena: ExprArena,
    pub body: StmtRange,
}

#[cfg(target_pointer_width = "64")]
mod size_asserts {
    use super::{ExprId, ExprRange};
    crate::static_assert_size!(ExprId, 4);
    crate::static_assert_size!(ExprRange, 8);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_expr_list_ranges_are_contiguous() {
        let mut arena = ExprArena::new();
        let a = arena.alloc_expr(ExprKind::Number(1.0), Span::new(0, 1));
        let b = arena.alloc_expr(ExprKind::Number(2.0), Span::new(2, 3));
        let first = arena.alloc_expr_list([a, b]);
        let second = arena.alloc_expr_list([b]);

        assert_eq!(arena.expr_list(first), &[a, b]);
        assert_eq!(arena.expr_list(second), &[b]);
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn test_empty_range() {
        let mut arena = ExprArena::new();
        let range = arena.alloc_stmt_list(std::iter::empty());
        assert!(range.is_empty());
        assert!(arena.stmt_list(range).is_empty());
    }

    #[test]
    fn test_decl_kind_rules() {
        assert!(!DeclKind::Var.is_block_scoped());
        assert!(DeclKind::Let.is_block_scoped());
        assert!(DeclKind::Const.is_block_scoped());
        assert!(DeclKind::Var.is_mutable());
        assert!(DeclKind::Let.is_mutable());
        assert!(!DeclKind::Const.is_mutable());
    }

    #[test]
    fn test_assignment_targets() {
        assert!(ExprKind::Ident(Name::EMPTY).is_assignment_target());
        assert!(!ExprKind::Null.is_assignment_target());
    }
}
