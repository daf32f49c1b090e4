mod invocations;

use crate::parse_java;
use ir::SourceUnit;

fn parse_snippet(code: &str) -> SourceUnit {
    parse_java(code, "Snippet.java").expect("parse java snippet")
}
