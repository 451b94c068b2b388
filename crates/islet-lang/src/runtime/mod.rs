pub mod value;
pub mod builtins;
pub mod interpreter;
