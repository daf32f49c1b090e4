use ir::{
    Binding, BindingOrigin, CallSite, ChainRoot, MethodDecl, Param, Receiver, Scope, SourceUnit,
    TypeDecl, TypeKind,
};
use tree_sitter::Node;

fn text<'a>(node: Node, src: &'a str) -> &'a str {
    node.utf8_text(src.as_bytes()).unwrap_or_default()
}

fn line_of(node: Node) -> usize {
    node.start_position().row + 1
}

fn named_children(node: Node) -> Vec<Node> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).collect()
}

fn type_kind(kind: &str) -> Option<TypeKind> {
    match kind {
        "class_declaration" => Some(TypeKind::Class),
        "interface_declaration" => Some(TypeKind::Interface),
        "enum_declaration" => Some(TypeKind::Enum),
        "record_declaration" => Some(TypeKind::Record),
        _ => None,
    }
}

/// Declared type with package qualification and array dimensions removed.
/// Generic arguments are kept; callers cut them when resolving.
pub(crate) fn declared_type(node: Node, src: &str) -> String {
    match node.kind() {
        "array_type" => node
            .child_by_field_name("element")
            .map(|e| declared_type(e, src))
            .unwrap_or_else(|| text(node, src).trim_end_matches("[]").to_string()),
        "generic_type" => {
            let children = named_children(node);
            let base = children
                .first()
                .map(|b| declared_type(*b, src))
                .unwrap_or_default();
            let args = children
                .iter()
                .find(|c| c.kind() == "type_arguments")
                .map(|a| text(*a, src))
                .unwrap_or_default();
            format!("{base}{args}")
        }
        "scoped_type_identifier" => text(node, src)
            .rsplit('.')
            .next()
            .unwrap_or_default()
            .trim()
            .to_string(),
        _ => text(node, src).trim().to_string(),
    }
}

/// `a`, `a.b.c` and `this.a.b` (as `a.b`) are name paths; anything else is not.
fn name_path(node: Node, src: &str) -> Option<String> {
    match node.kind() {
        "identifier" => Some(text(node, src).to_string()),
        "field_access" => {
            let object = node.child_by_field_name("object")?;
            let field = text(node.child_by_field_name("field")?, src);
            if object.kind() == "this" {
                Some(field.to_string())
            } else {
                name_path(object, src).map(|base| format!("{base}.{field}"))
            }
        }
        _ => None,
    }
}

fn chain_root(node: Node, src: &str) -> ChainRoot {
    match node.kind() {
        "method_invocation" | "field_access" => match node.child_by_field_name("object") {
            Some(object) => chain_root(object, src),
            None => ChainRoot::Other,
        },
        "string_literal" | "text_block" => ChainRoot::StringLiteral,
        "object_creation_expression" => node
            .child_by_field_name("type")
            .map(|t| ChainRoot::ObjectCreation(declared_type(t, src)))
            .unwrap_or(ChainRoot::Other),
        "class_literal" => named_children(node)
            .first()
            .map(|t| ChainRoot::ClassLiteral(declared_type(*t, src)))
            .unwrap_or(ChainRoot::Other),
        _ => ChainRoot::Other,
    }
}

pub(crate) fn classify_receiver(object: Option<Node>, src: &str) -> Receiver {
    let Some(object) = object else {
        return Receiver::Implicit;
    };
    if object.kind() == "this" {
        return Receiver::Implicit;
    }
    match name_path(object, src) {
        Some(path) => Receiver::Qualified(path),
        None => Receiver::Chained(chain_root(object, src)),
    }
}

fn annotations(method: Node, src: &str) -> Vec<String> {
    let Some(modifiers) = named_children(method)
        .into_iter()
        .find(|c| c.kind() == "modifiers")
    else {
        return Vec::new();
    };
    named_children(modifiers)
        .into_iter()
        .filter(|c| matches!(c.kind(), "annotation" | "marker_annotation"))
        .filter_map(|a| a.child_by_field_name("name"))
        .map(|n| text(n, src).trim_start_matches('@').to_string())
        .collect()
}

fn parameters(method: Node, src: &str) -> Vec<Param> {
    let Some(list) = method.child_by_field_name("parameters") else {
        return Vec::new();
    };
    let mut params = Vec::new();
    for p in named_children(list) {
        match p.kind() {
            "formal_parameter" => {
                let name = p.child_by_field_name("name").map(|n| text(n, src));
                let ty = p.child_by_field_name("type").map(|t| declared_type(t, src));
                if let (Some(name), Some(type_name)) = (name, ty) {
                    params.push(Param {
                        name: name.to_string(),
                        type_name,
                    });
                }
            }
            "spread_parameter" => {
                let children = named_children(p);
                let ty = children
                    .iter()
                    .find(|c| !matches!(c.kind(), "modifiers" | "variable_declarator"))
                    .map(|t| declared_type(*t, src));
                let name = children
                    .iter()
                    .find(|c| c.kind() == "variable_declarator")
                    .and_then(|d| d.child_by_field_name("name"))
                    .map(|n| text(n, src));
                if let (Some(name), Some(type_name)) = (name, ty) {
                    params.push(Param {
                        name: name.to_string(),
                        type_name,
                    });
                }
            }
            _ => {}
        }
    }
    params
}

fn method_decl(node: Node, src: &str) -> Option<MethodDecl> {
    let name = text(node.child_by_field_name("name")?, src).to_string();
    Some(MethodDecl {
        name,
        parameters: parameters(node, src),
        annotations: annotations(node, src),
        line: line_of(node),
    })
}

fn body_methods(body: Node, src: &str) -> Vec<MethodDecl> {
    let mut methods = Vec::new();
    for member in named_children(body) {
        match member.kind() {
            "method_declaration" => methods.extend(method_decl(member, src)),
            // enum constants come first, members follow in this wrapper
            "enum_body_declarations" => methods.extend(body_methods(member, src)),
            _ => {}
        }
    }
    methods
}

/// Builds the [`SourceUnit`] of one file in a single pre-order walk.
pub(crate) struct ViewBuilder<'a> {
    src: &'a str,
    unit: SourceUnit,
    scopes: Vec<Scope>,
}

impl<'a> ViewBuilder<'a> {
    pub(crate) fn new(src: &'a str, file_path: &str) -> Self {
        Self {
            src,
            unit: SourceUnit::new(file_path),
            scopes: Vec::new(),
        }
    }

    pub(crate) fn finish(self) -> SourceUnit {
        self.unit
    }

    pub(crate) fn visit(&mut self, node: Node) {
        let kind = node.kind();
        if let Some(type_kind) = type_kind(kind) {
            self.visit_type(node, type_kind);
            return;
        }
        match kind {
            "method_declaration" => self.visit_method(node),
            "local_variable_declaration" => self.visit_declaration(node, BindingOrigin::Local),
            "field_declaration" | "constant_declaration" => {
                self.visit_declaration(node, BindingOrigin::Field)
            }
            "method_invocation" => self.visit_call(node),
            _ => self.visit_children(node),
        }
    }

    fn visit_children(&mut self, node: Node) {
        for child in named_children(node) {
            self.visit(child);
        }
    }

    fn visit_type(&mut self, node: Node, kind: TypeKind) {
        let Some(name) = node.child_by_field_name("name").map(|n| text(n, self.src)) else {
            self.visit_children(node);
            return;
        };
        let methods = node
            .child_by_field_name("body")
            .map(|b| body_methods(b, self.src))
            .unwrap_or_default();
        self.unit.types.push(TypeDecl {
            name: name.to_string(),
            kind,
            line: line_of(node),
            methods,
        });
        self.scopes.push(Scope::Type(name.to_string()));
        self.visit_children(node);
        self.scopes.pop();
    }

    fn visit_method(&mut self, node: Node) {
        let Some(name) = node.child_by_field_name("name").map(|n| text(n, self.src)) else {
            self.visit_children(node);
            return;
        };
        for p in parameters(node, self.src) {
            self.unit.bindings.push(Binding {
                name: p.name,
                type_name: p.type_name,
                origin: BindingOrigin::Parameter,
            });
        }
        self.scopes.push(Scope::Method(name.to_string()));
        self.visit_children(node);
        self.scopes.pop();
    }

    fn visit_declaration(&mut self, node: Node, origin: BindingOrigin) {
        if let Some(ty) = node.child_by_field_name("type") {
            let type_name = declared_type(ty, self.src);
            for declarator in named_children(node)
                .into_iter()
                .filter(|c| c.kind() == "variable_declarator")
            {
                if let Some(name) = declarator.child_by_field_name("name") {
                    self.unit.bindings.push(Binding {
                        name: text(name, self.src).to_string(),
                        type_name: type_name.clone(),
                        origin,
                    });
                }
            }
        }
        self.visit_children(node);
    }

    /// Records every call of a receiver chain, innermost first, before any
    /// argument list of the chain is visited: `a.b(x.y()).c()` records `b`,
    /// `c`, `y` in that order.
    fn visit_call(&mut self, node: Node) {
        let mut links = Vec::new();
        let mut next = Some(node);
        while let Some(current) = next {
            match current.kind() {
                "method_invocation" => {
                    links.push(current);
                    next = current.child_by_field_name("object");
                }
                "field_access" => next = current.child_by_field_name("object"),
                _ => {
                    self.visit(current);
                    next = None;
                }
            }
        }
        for link in links.iter().rev() {
            let Some(name) = link.child_by_field_name("name") else {
                continue;
            };
            self.unit.calls.push(CallSite {
                member: text(name, self.src).to_string(),
                receiver: classify_receiver(link.child_by_field_name("object"), self.src),
                scopes: self.scopes.iter().rev().cloned().collect(),
                line: line_of(*link),
            });
        }
        for link in links.iter().rev() {
            if let Some(args) = link.child_by_field_name("arguments") {
                self.visit(args);
            }
        }
    }
}
