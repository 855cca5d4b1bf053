//! Tree-sitter based structural parser.
//!
//! Turns a source file into a [`SourceUnit`]: the class-like declarations,
//! their fields and methods, the call expressions inside method bodies, and
//! the raw file text. Capture is heuristic rather than exhaustive;
//! anything the heuristics miss is simply absent from the unit.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use tree_sitter::{Language as TsLanguage, Node, Parser as TsParser};

use crate::core::{Error, Language, Result, SourceFile};

/// Thread-safe parser pool for multi-language parsing.
pub struct Parser {
    /// Cached parsers per language.
    parsers: Mutex<HashMap<Language, TsParser>>,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    /// Create a new parser.
    pub fn new() -> Self {
        Self {
            parsers: Mutex::new(HashMap::new()),
        }
    }

    /// Parse a file and return its structural view.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<SourceUnit> {
        let file = SourceFile::load(path)?;
        self.parse_source(&file)
    }

    /// Parse loaded source content.
    pub fn parse_source(&self, file: &SourceFile) -> Result<SourceUnit> {
        self.parse(&file.content, file.language, &file.path)
    }

    /// Parse content with explicit language.
    pub fn parse(&self, content: &[u8], lang: Language, path: &Path) -> Result<SourceUnit> {
        let ts_lang = tree_sitter_language(lang);

        let tree = {
            let mut parsers = self.parsers.lock();
            let parser = parsers.entry(lang).or_insert_with(|| {
                let mut p = TsParser::new();
                p.set_language(&ts_lang).expect("Language should be valid");
                p
            });

            parser.parse(content, None).ok_or_else(|| Error::Parse {
                path: path.to_path_buf(),
                message: "Failed to parse file".to_string(),
            })?
        };

        // A tree with syntax errors gets the whole unit skipped, matching
        // the strict-parser behavior the extractor recovers from.
        if tree.root_node().has_error() {
            return Err(Error::parse(path, "syntax errors in source"));
        }

        let root = tree.root_node();
        let package = find_package(root, content, lang).unwrap_or_default();
        let mut classes = Vec::new();
        collect_classes(root, content, lang, &package, &mut classes);

        Ok(SourceUnit {
            path: path.to_path_buf(),
            language: lang,
            text: String::from_utf8_lossy(content).into_owned(),
            classes,
        })
    }
}

/// Structural view of one parsed source file.
#[derive(Debug, Clone)]
pub struct SourceUnit {
    /// File path.
    pub path: PathBuf,
    /// Detected language.
    pub language: Language,
    /// Raw file text.
    pub text: String,
    /// Class-like declarations, in declaration order.
    pub classes: Vec<ClassDecl>,
}

/// A class-like declaration (class or interface).
#[derive(Debug, Clone)]
pub struct ClassDecl {
    /// Declared name.
    pub name: String,
    /// Containing package or namespace ("" when none).
    pub package: String,
    /// Comment immediately preceding the declaration.
    pub comment: Option<String>,
    /// Raw field declarations, in declaration order.
    pub fields: Vec<String>,
    /// Method declarations, in declaration order.
    pub methods: Vec<MethodDecl>,
}

/// A method declaration.
#[derive(Debug, Clone)]
pub struct MethodDecl {
    /// Declared name.
    pub name: String,
    /// Raw "type name" parameter descriptors.
    pub params: Vec<String>,
    /// Return type text ("" when unannotated).
    pub return_type: String,
    /// Raw body text, when the declaration has one.
    pub body: Option<String>,
    /// Call expressions inside the body.
    pub calls: Vec<CallSite>,
    /// Comment immediately preceding the declaration.
    pub comment: Option<String>,
}

/// One call expression inside a method body.
#[derive(Debug, Clone)]
pub struct CallSite {
    /// Receiver/scope expression text, when the call has one.
    pub receiver: Option<String>,
    /// Called name.
    pub name: String,
}

/// Get tree-sitter language for a Language enum value.
pub fn tree_sitter_language(lang: Language) -> TsLanguage {
    match lang {
        Language::Java => tree_sitter_java::LANGUAGE.into(),
        Language::CSharp => tree_sitter_c_sharp::LANGUAGE.into(),
        Language::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
    }
}

fn class_node_kinds(lang: Language) -> &'static [&'static str] {
    match lang {
        Language::Java => &["class_declaration", "interface_declaration"],
        Language::CSharp => &["class_declaration", "interface_declaration"],
        Language::TypeScript => &["class_declaration", "abstract_class_declaration"],
    }
}

fn field_node_kinds(lang: Language) -> &'static [&'static str] {
    match lang {
        Language::Java => &["field_declaration"],
        Language::CSharp => &["field_declaration", "property_declaration"],
        Language::TypeScript => &["public_field_definition"],
    }
}

fn method_node_kinds(lang: Language) -> &'static [&'static str] {
    match lang {
        Language::Java | Language::CSharp => &["method_declaration"],
        Language::TypeScript => &["method_definition"],
    }
}

/// Find the file's package/namespace name, if declared.
fn find_package(root: Node<'_>, source: &[u8], lang: Language) -> Option<String> {
    let kinds: &[&str] = match lang {
        Language::Java => &["package_declaration"],
        Language::CSharp => &[
            "namespace_declaration",
            "file_scoped_namespace_declaration",
        ],
        Language::TypeScript => return None,
    };

    let decl = find_first(root, kinds)?;
    match lang {
        Language::Java => {
            for child in decl.children(&mut decl.walk()) {
                if child.kind() == "scoped_identifier" || child.kind() == "identifier" {
                    return node_text(&child, source);
                }
            }
            None
        }
        Language::CSharp => decl
            .child_by_field_name("name")
            .and_then(|n| node_text(&n, source)),
        Language::TypeScript => None,
    }
}

fn find_first<'a>(node: Node<'a>, kinds: &[&str]) -> Option<Node<'a>> {
    if kinds.contains(&node.kind()) {
        return Some(node);
    }
    for child in node.children(&mut node.walk()) {
        if let Some(found) = find_first(child, kinds) {
            return Some(found);
        }
    }
    None
}

/// Recursively collect class-like declarations, preserving declaration order.
fn collect_classes(
    node: Node<'_>,
    source: &[u8],
    lang: Language,
    package: &str,
    classes: &mut Vec<ClassDecl>,
) {
    if class_node_kinds(lang).contains(&node.kind()) {
        if let Some(class) = extract_class(&node, source, lang, package) {
            classes.push(class);
        }
    }

    for child in node.children(&mut node.walk()) {
        collect_classes(child, source, lang, package, classes);
    }
}

fn extract_class(
    node: &Node<'_>,
    source: &[u8],
    lang: Language,
    package: &str,
) -> Option<ClassDecl> {
    let name = node
        .child_by_field_name("name")
        .and_then(|n| node_text(&n, source))?;
    let comment = preceding_comment(node, source);

    let mut fields = Vec::new();
    let mut methods = Vec::new();
    if let Some(body) = node.child_by_field_name("body") {
        for member in body.children(&mut body.walk()) {
            if field_node_kinds(lang).contains(&member.kind()) {
                if let Some(text) = node_text(&member, source) {
                    fields.push(text);
                }
            } else if method_node_kinds(lang).contains(&member.kind()) {
                if let Some(method) = extract_method(&member, source, lang) {
                    methods.push(method);
                }
            }
        }
    }

    Some(ClassDecl {
        name,
        package: package.to_string(),
        comment,
        fields,
        methods,
    })
}

fn extract_method(node: &Node<'_>, source: &[u8], lang: Language) -> Option<MethodDecl> {
    let name = node
        .child_by_field_name("name")
        .and_then(|n| node_text(&n, source))?;

    let params = node
        .child_by_field_name("parameters")
        .map(|list| extract_params(&list, source, lang))
        .unwrap_or_default();

    let return_type = extract_return_type(node, source, lang);

    let body_node = node.child_by_field_name("body");
    let body = body_node.as_ref().and_then(|b| node_text(b, source));

    let mut calls = Vec::new();
    if let Some(body) = body_node {
        collect_calls(body, source, lang, &mut calls);
    }

    Some(MethodDecl {
        name,
        params,
        return_type,
        body,
        calls,
        comment: preceding_comment(node, source),
    })
}

fn extract_params(list: &Node<'_>, source: &[u8], lang: Language) -> Vec<String> {
    let mut params = Vec::new();
    for child in list.children(&mut list.walk()) {
        if !child.is_named() || child.kind().contains("comment") {
            continue;
        }
        let descriptor = match (lang, child.kind()) {
            (Language::Java, "formal_parameter") | (Language::CSharp, "parameter") => {
                type_name_pair(&child, "type", "name", source)
            }
            (Language::TypeScript, "required_parameter" | "optional_parameter") => {
                ts_param_descriptor(&child, source)
            }
            // Spread/receiver parameters keep their raw text
            _ => node_text(&child, source),
        };
        if let Some(descriptor) = descriptor {
            params.push(descriptor);
        }
    }
    params
}

/// Format a parameter as "Type name" from two node fields.
fn type_name_pair(node: &Node<'_>, ty: &str, name: &str, source: &[u8]) -> Option<String> {
    let name = node
        .child_by_field_name(name)
        .and_then(|n| node_text(&n, source))?;
    match node
        .child_by_field_name(ty)
        .and_then(|n| node_text(&n, source))
    {
        Some(ty) => Some(format!("{ty} {name}")),
        None => Some(name),
    }
}

fn ts_param_descriptor(node: &Node<'_>, source: &[u8]) -> Option<String> {
    let name = node
        .child_by_field_name("pattern")
        .and_then(|n| node_text(&n, source))?;
    match node
        .child_by_field_name("type")
        .and_then(|n| node_text(&n, source))
    {
        Some(annotation) => {
            let ty = annotation.trim_start_matches(':').trim();
            Some(format!("{ty} {name}"))
        }
        None => Some(name),
    }
}

fn extract_return_type(node: &Node<'_>, source: &[u8], lang: Language) -> String {
    let ty = match lang {
        Language::Java => node.child_by_field_name("type"),
        // Older grammars used "type", newer use "returns"
        Language::CSharp => node
            .child_by_field_name("returns")
            .or_else(|| node.child_by_field_name("type")),
        Language::TypeScript => node.child_by_field_name("return_type"),
    };
    ty.and_then(|n| node_text(&n, source))
        .map(|t| t.trim_start_matches(':').trim().to_string())
        .unwrap_or_default()
}

/// Collect call expressions in a body subtree, in source order.
fn collect_calls(node: Node<'_>, source: &[u8], lang: Language, calls: &mut Vec<CallSite>) {
    match lang {
        Language::Java if node.kind() == "method_invocation" => {
            if let Some(name) = node
                .child_by_field_name("name")
                .and_then(|n| node_text(&n, source))
            {
                let receiver = node
                    .child_by_field_name("object")
                    .and_then(|n| node_text(&n, source));
                calls.push(CallSite { receiver, name });
            }
        }
        Language::CSharp if node.kind() == "invocation_expression" => {
            if let Some(call) = csharp_call(&node, source) {
                calls.push(call);
            }
        }
        Language::TypeScript if node.kind() == "call_expression" => {
            if let Some(call) = typescript_call(&node, source) {
                calls.push(call);
            }
        }
        _ => {}
    }

    for child in node.children(&mut node.walk()) {
        collect_calls(child, source, lang, calls);
    }
}

fn csharp_call(node: &Node<'_>, source: &[u8]) -> Option<CallSite> {
    let function = node.child_by_field_name("function")?;
    if function.kind() == "member_access_expression" {
        let name = function
            .child_by_field_name("name")
            .and_then(|n| node_text(&n, source))?;
        let receiver = function
            .child_by_field_name("expression")
            .and_then(|n| node_text(&n, source));
        Some(CallSite { receiver, name })
    } else {
        let name = node_text(&function, source)?;
        Some(CallSite {
            receiver: None,
            name,
        })
    }
}

fn typescript_call(node: &Node<'_>, source: &[u8]) -> Option<CallSite> {
    let function = node.child_by_field_name("function")?;
    if function.kind() == "member_expression" {
        let name = function
            .child_by_field_name("property")
            .and_then(|n| node_text(&n, source))?;
        let receiver = function
            .child_by_field_name("object")
            .and_then(|n| node_text(&n, source));
        Some(CallSite { receiver, name })
    } else {
        let name = node_text(&function, source)?;
        Some(CallSite {
            receiver: None,
            name,
        })
    }
}

fn node_text(node: &Node<'_>, source: &[u8]) -> Option<String> {
    node.utf8_text(source).ok().map(|s| s.to_string())
}

/// The comment node immediately preceding a declaration, stripped of its
/// delimiters.
fn preceding_comment(node: &Node<'_>, source: &[u8]) -> Option<String> {
    let prev = node.prev_sibling()?;
    if !prev.kind().ends_with("comment") {
        return None;
    }
    let raw = prev.utf8_text(source).ok()?;
    let cleaned = strip_comment_markers(raw);
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

fn strip_comment_markers(raw: &str) -> String {
    let trimmed = raw.trim();
    if let Some(rest) = trimmed.strip_prefix("//") {
        return rest.trim().to_string();
    }
    let inner = trimmed
        .strip_prefix("/**")
        .or_else(|| trimmed.strip_prefix("/*"))
        .and_then(|s| s.strip_suffix("*/"))
        .unwrap_or(trimmed);
    inner
        .lines()
        .map(|l| l.trim().trim_start_matches('*').trim())
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_java_class() {
        let parser = Parser::new();
        let content = br#"package com.shop;

// Coordinates order workflows
public class OrderService {
    private final OrderRepository orderRepository;

    // Finds one order
    public Order findOrder(String id) {
        return orderRepository.findById(id);
    }

    public void touch(int count) {
        log.info(count);
    }
}
"#;
        let unit = parser
            .parse(content, Language::Java, Path::new("OrderService.java"))
            .unwrap();

        assert_eq!(unit.classes.len(), 1);
        let class = &unit.classes[0];
        assert_eq!(class.name, "OrderService");
        assert_eq!(class.package, "com.shop");
        assert_eq!(class.comment.as_deref(), Some("Coordinates order workflows"));
        assert_eq!(
            class.fields,
            vec!["private final OrderRepository orderRepository;"]
        );

        assert_eq!(class.methods.len(), 2);
        let find = &class.methods[0];
        assert_eq!(find.name, "findOrder");
        assert_eq!(find.params, vec!["String id"]);
        assert_eq!(find.return_type, "Order");
        assert_eq!(find.comment.as_deref(), Some("Finds one order"));
        assert!(find.body.as_deref().unwrap().contains("findById"));
        assert_eq!(find.calls.len(), 1);
        assert_eq!(find.calls[0].receiver.as_deref(), Some("orderRepository"));
        assert_eq!(find.calls[0].name, "findById");

        let touch = &class.methods[1];
        assert_eq!(touch.params, vec!["int count"]);
        assert_eq!(touch.return_type, "void");
        assert_eq!(touch.calls[0].receiver.as_deref(), Some("log"));
    }

    #[test]
    fn test_parse_java_interface() {
        let parser = Parser::new();
        let content = b"public interface StockRepository {\n}\n";
        let unit = parser
            .parse(content, Language::Java, Path::new("StockRepository.java"))
            .unwrap();

        assert_eq!(unit.classes.len(), 1);
        assert_eq!(unit.classes[0].name, "StockRepository");
        assert_eq!(unit.classes[0].package, "");
    }

    #[test]
    fn test_parse_csharp_class() {
        let parser = Parser::new();
        let content = br#"namespace Shop.Inventory;

// Tracks stock counts
public class StockService {
    private readonly IStockRepository stockRepository;

    public int CountItems(string warehouse) {
        return stockRepository.CountByWarehouse(warehouse);
    }
}
"#;
        let unit = parser
            .parse(content, Language::CSharp, Path::new("StockService.cs"))
            .unwrap();

        assert_eq!(unit.classes.len(), 1);
        let class = &unit.classes[0];
        assert_eq!(class.name, "StockService");
        assert_eq!(class.package, "Shop.Inventory");
        assert_eq!(class.methods.len(), 1);
        let count = &class.methods[0];
        assert_eq!(count.name, "CountItems");
        assert_eq!(count.params, vec!["string warehouse"]);
        assert_eq!(count.calls.len(), 1);
        assert_eq!(count.calls[0].receiver.as_deref(), Some("stockRepository"));
        assert_eq!(count.calls[0].name, "CountByWarehouse");
    }

    #[test]
    fn test_parse_typescript_class() {
        let parser = Parser::new();
        let content = br#"// Tracks stock levels
class StockTracker {
  private items: number = 0;

  refreshStock(productId: string): number {
    return this.stockRepo.fetchCount(productId);
  }
}
"#;
        let unit = parser
            .parse(content, Language::TypeScript, Path::new("stock.ts"))
            .unwrap();

        assert_eq!(unit.classes.len(), 1);
        let class = &unit.classes[0];
        assert_eq!(class.name, "StockTracker");
        assert_eq!(class.package, "");
        assert_eq!(class.comment.as_deref(), Some("Tracks stock levels"));
        assert_eq!(class.fields.len(), 1);

        let refresh = &class.methods[0];
        assert_eq!(refresh.name, "refreshStock");
        assert_eq!(refresh.params, vec!["string productId"]);
        assert_eq!(refresh.return_type, "number");
        assert_eq!(refresh.calls.len(), 1);
        assert_eq!(refresh.calls[0].receiver.as_deref(), Some("this.stockRepo"));
        assert_eq!(refresh.calls[0].name, "fetchCount");
    }

    #[test]
    fn test_parse_error_is_reported() {
        let parser = Parser::new();
        let content = b"class {{{ this is not java";
        let err = parser
            .parse(content, Language::Java, Path::new("Broken.java"))
            .unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }

    #[test]
    fn test_bare_calls_have_no_receiver() {
        let parser = Parser::new();
        let content = b"class A {\n  void run() {\n    helper();\n  }\n}\n";
        let unit = parser
            .parse(content, Language::Java, Path::new("A.java"))
            .unwrap();

        let run = &unit.classes[0].methods[0];
        assert_eq!(run.calls.len(), 1);
        assert!(run.calls[0].receiver.is_none());
        assert_eq!(run.calls[0].name, "helper");
    }
}
