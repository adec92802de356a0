pub mod ast_printer;
pub mod callable;
pub mod diagnostics;
pub mod environment;
pub mod error;
pub mod expr;
pub mod function;
pub mod interpreter;
pub mod parser;
pub mod resolver;
pub mod runner;
pub mod scanner;
pub mod stmt;
pub mod token;
pub mod value;
