mod cursor;
mod keywords;
mod lexer;

pub use lexer::tokenize;
