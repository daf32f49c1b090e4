use anyhow::{anyhow, Context, Result};
use ir::SourceUnit;
use tree_sitter::{Node, Parser, Tree};

use super::view::ViewBuilder;

fn parse_tree(content: &str) -> Result<Tree> {
    let mut parser = Parser::new();
    parser
        .set_language(tree_sitter_java::language())
        .context("load java grammar")?;
    parser
        .parse(content, None)
        .ok_or_else(|| anyhow!("tree-sitter returned no tree"))
}

/// First node that is an error or a parser-inserted placeholder.
fn first_error(node: Node) -> Option<Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    let children: Vec<Node> = node.children(&mut cursor).collect();
    children.into_iter().find_map(first_error)
}

/// Parses one Java file into its [`SourceUnit`].
///
/// Files that do not parse cleanly are rejected as a whole; nothing is
/// recovered from a partial tree.
pub fn parse_java(content: &str, file_path: &str) -> Result<SourceUnit> {
    let tree = parse_tree(content)?;
    let root = tree.root_node();
    if root.has_error() {
        let at = first_error(root).unwrap_or(root).start_position();
        return Err(anyhow!(
            "syntax error at line {}, column {}",
            at.row + 1,
            at.column + 1
        ));
    }
    let mut builder = ViewBuilder::new(content, file_path);
    builder.visit(root);
    Ok(builder.finish())
}

/// 0-based line where `type_name.method_name` is declared, annotations
/// included. The first matching type and the first matching method win.
pub fn locate_method(content: &str, type_name: &str, method_name: &str) -> Result<Option<usize>> {
    let unit = parse_java(content, "<memory>")?;
    Ok(unit
        .types
        .iter()
        .find(|t| t.name == type_name)
        .and_then(|t| t.methods.iter().find(|m| m.name == method_name))
        .map(|m| m.line.saturating_sub(1)))
}
