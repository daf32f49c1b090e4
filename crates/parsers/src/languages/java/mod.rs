//! Java front end built on tree-sitter-java.
//!
//! A single walk produces the declared types with their methods, every
//! variable binding and every method invocation. Call sites are recorded
//! receiver first, so `a.b().c()` yields `b` before `c`.

mod parser;
mod view;

pub use parser::{locate_method, parse_java};

#[cfg(test)]
mod tests;
