//! Token and AST types shared by the braic lexer, parser, interpreter and
//! transpiler.
//!
//! This crate has no dependencies on any other `braic_*` crate: it is the
//! leaf of the pipeline, the same role `ori_ir` plays for the teacher
//! compiler.

mod ast;
mod token;
mod type_tag;

pub use ast::{
    BinaryOp, Component, ConstructorKind, Expr, FfiParam, Literal, Param, Program, Stmt, UnaryOp,
};
pub use token::{Position, Token, TokenKind};
pub use type_tag::TypeTag;
