pub mod token;
pub mod ast;
pub mod scanner;
pub mod names;
pub mod parser;
