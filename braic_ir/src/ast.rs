use crate::token::Position;
use crate::type_tag::TypeTag;

/// A literal appearing directly in source text. Distinct from
/// `braic_value::Value`, the richer runtime value — array, record, vector
/// and matrix values are never literal syntax, only the result of
/// constructors, so the AST never needs to embed them.
#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    Integer(i64),
    Double(f64),
    String(String),
    Boolean(bool),
    Null,
}

/// The kind of GLM-style constructor invoked by a `vecKeyword "(" args ")"`
/// primary expression.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConstructorKind {
    Vec2,
    Vec3,
    Vec4,
    Mat3,
    Mat4,
    Quat,
}

/// One of the four vector/quaternion swizzle components.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Component {
    X,
    Y,
    Z,
    W,
}

impl Component {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "x" => Some(Component::X),
            "y" => Some(Component::Y),
            "z" => Some(Component::Z),
            "w" => Some(Component::W),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Literal {
        value: Literal,
        pos: Position,
    },
    /// A variable read, optionally indexed (array element) and/or followed
    /// by a member access (struct field read).
    Variable {
        name: String,
        indices: Vec<Expr>,
        member: Option<String>,
        pos: Position,
    },
    Binary {
        left: Box<Expr>,
        op: BinaryOp,
        right: Box<Expr>,
        pos: Position,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
        pos: Position,
    },
    /// `name[indices] = value` or `name.member = value`, produced only by
    /// assignment-rewriting in the parser (§4.3); never built directly by
    /// any grammar production.
    Assign {
        name: String,
        indices: Vec<Expr>,
        member: Option<String>,
        value: Box<Expr>,
        pos: Position,
    },
    /// `object.component = value`, the component-assign form for vector
    /// swizzle writes.
    ComponentAssign {
        object: Box<Expr>,
        component: Component,
        value: Box<Expr>,
        pos: Position,
    },
    Call {
        name: String,
        arguments: Vec<Expr>,
        pos: Position,
    },
    StructLiteral {
        type_name: String,
        values: Vec<Expr>,
        pos: Position,
    },
    Constructor {
        kind: ConstructorKind,
        arguments: Vec<Expr>,
        pos: Position,
    },
    ComponentAccess {
        object: Box<Expr>,
        component: Component,
        pos: Position,
    },
}

impl Expr {
    pub fn pos(&self) -> Position {
        match self {
            Expr::Literal { pos, .. }
            | Expr::Variable { pos, .. }
            | Expr::Binary { pos, .. }
            | Expr::Unary { pos, .. }
            | Expr::Assign { pos, .. }
            | Expr::ComponentAssign { pos, .. }
            | Expr::Call { pos, .. }
            | Expr::StructLiteral { pos, .. }
            | Expr::Constructor { pos, .. }
            | Expr::ComponentAccess { pos, .. } => *pos,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    And,
    Or,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
}

/// A function parameter: name plus optional declared type tag
/// (`param := IDENT ("as" typeTag)?`).
#[derive(Clone, Debug, PartialEq)]
pub struct Param {
    pub name: String,
    pub type_tag: Option<TypeTag>,
}

/// One `(name, type-tag)` pair in an FFI declaration's parameter list.
#[derive(Clone, Debug, PartialEq)]
pub struct FfiParam {
    pub name: String,
    pub type_tag: TypeTag,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Stmt {
    Expression {
        expr: Expr,
        pos: Position,
    },
    /// `var name[indices].member = value;` — a write, with optional array
    /// indices and/or struct member for the target.
    VarAssign {
        name: String,
        indices: Vec<Expr>,
        member: Option<String>,
        value: Expr,
        pos: Position,
    },
    If {
        condition: Expr,
        then_block: Vec<Stmt>,
        else_block: Vec<Stmt>,
        pos: Position,
    },
    /// The C-style counted loop (`for (init; cond; incr) { ... }`).
    CountedFor {
        name: String,
        init: Expr,
        condition: Expr,
        increment: Expr,
        body: Vec<Stmt>,
        pos: Position,
    },
    While {
        condition: Expr,
        body: Vec<Stmt>,
        pos: Position,
    },
    Return {
        value: Option<Expr>,
        pos: Position,
    },
    FunctionDecl {
        name: String,
        params: Vec<Param>,
        return_type: Option<TypeTag>,
        body: Vec<Stmt>,
        pos: Position,
    },
    StructDecl {
        name: String,
        field_names: Vec<String>,
        field_types: Vec<TypeTag>,
        pos: Position,
    },
    Dim {
        name: String,
        type_tag: Option<TypeTag>,
        dimensions: Vec<Expr>,
        pos: Position,
    },
    FfiFunctionDecl {
        name: String,
        library: String,
        return_type: TypeTag,
        params: Vec<FfiParam>,
        pos: Position,
    },
    Import {
        path: String,
        pos: Position,
    },
}

impl Stmt {
    pub fn pos(&self) -> Position {
        match self {
            Stmt::Expression { pos, .. }
            | Stmt::VarAssign { pos, .. }
            | Stmt::If { pos, .. }
            | Stmt::CountedFor { pos, .. }
            | Stmt::While { pos, .. }
            | Stmt::Return { pos, .. }
            | Stmt::FunctionDecl { pos, .. }
            | Stmt::StructDecl { pos, .. }
            | Stmt::Dim { pos, .. }
            | Stmt::FfiFunctionDecl { pos, .. }
            | Stmt::Import { pos, .. } => *pos,
        }
    }
}

/// An ordered list of top-level statements, per spec §3: "A program is an
/// ordered list of statements."
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Program {
    pub statements: Vec<Stmt>,
}
