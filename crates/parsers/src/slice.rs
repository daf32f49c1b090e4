//! Line-based extraction of a declaration's source text.

/// Returns the block that starts at the 0-based line `start`.
///
/// Braces are counted per line from the first line whose declaration text
/// contains `{`; the block ends on the line where the depth returns to
/// zero. Annotations ahead of that point are skipped, argument lists
/// included, so `@Path("/{id}")` does not open a block. A declaration that
/// reaches a `;` before any `{` (abstract or interface method) ends on that
/// line. Inside the body, braces in string literals and comments are
/// counted too.
///
/// Line terminators are preserved. `None` when `start` is past the end.
///
/// # Example
/// ```
/// let src = "class A {\n  void f() {\n    g();\n  }\n}\n";
/// let block = parsers::slice::extract_code_block(src, 1).unwrap();
/// assert_eq!(block, "  void f() {\n    g();\n  }\n");
/// ```
pub fn extract_code_block(content: &str, start: usize) -> Option<String> {
    let mut lines = content.split_inclusive('\n').skip(start).peekable();
    lines.peek()?;
    let mut out = String::new();
    let mut depth: i64 = 0;
    let mut started = false;
    let mut annotation_parens = 0usize;
    for line in lines {
        out.push_str(line);
        let counted = if started {
            line.to_string()
        } else {
            let decl = strip_annotations(line, &mut annotation_parens);
            if !decl.contains('{') {
                if decl.trim_end().ends_with(';') {
                    break;
                }
                continue;
            }
            started = true;
            decl
        };
        depth += counted.matches('{').count() as i64 - counted.matches('}').count() as i64;
        if depth <= 0 {
            break;
        }
    }
    Some(out)
}

/// Text of `line` outside annotations. `open` carries the parenthesis depth
/// of an annotation argument list across lines.
fn strip_annotations(line: &str, open: &mut usize) -> String {
    let mut out = String::new();
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        if *open > 0 {
            match c {
                '(' => *open += 1,
                ')' => *open -= 1,
                _ => {}
            }
            continue;
        }
        if c != '@' {
            out.push(c);
            continue;
        }
        while chars
            .peek()
            .is_some_and(|c| c.is_alphanumeric() || matches!(c, '_' | '$' | '.'))
        {
            chars.next();
        }
        while chars.peek().is_some_and(|c| *c == ' ' || *c == '\t') {
            chars.next();
        }
        if chars.peek() == Some(&'(') {
            chars.next();
            *open = 1;
        }
    }
    out
}
