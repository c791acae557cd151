//! Variable extraction from parsed syntax trees
//!
//! A [`VariableVisitor`] is scoped to one file. It walks the tree with a
//! cursor, collects every variable binding it recognises for the file's
//! language, and commits the batch to the shared [`VariableIndex`] in a single
//! [`VariableIndex::accept`] call once traversal finishes. A traversal that
//! fails part-way therefore records nothing.

use std::path::Path;

use anyhow::Context;
use tree_sitter::{Node, Tree};

use crate::index::{VariableIndex, VariableObservation};
use crate::lang::{Lang, LangFamily};

/// Visitor boundary for the indexing task.
///
/// Given one parsed file, record its observations into `index` and return how
/// many were recorded.
pub trait Extractor: Send + Sync {
    fn extract(
        &self,
        file: &Path,
        lang: Lang,
        source: &str,
        tree: &Tree,
        index: &VariableIndex,
    ) -> anyhow::Result<usize>;
}

/// Default extractor: runs a [`VariableVisitor`] over the tree
#[derive(Debug, Clone, Copy, Default)]
pub struct VariableExtractor;

impl Extractor for VariableExtractor {
    fn extract(
        &self,
        file: &Path,
        lang: Lang,
        source: &str,
        tree: &Tree,
        index: &VariableIndex,
    ) -> anyhow::Result<usize> {
        VariableVisitor::new(file, lang, source, index).visit(tree.root_node())
    }
}

/// Per-file traversal state
pub struct VariableVisitor<'a> {
    file: &'a Path,
    lang: Lang,
    source: &'a [u8],
    index: &'a VariableIndex,
    observations: Vec<VariableObservation>,
}

impl<'a> VariableVisitor<'a> {
    pub fn new(file: &'a Path, lang: Lang, source: &'a str, index: &'a VariableIndex) -> Self {
        Self {
            file,
            lang,
            source: source.as_bytes(),
            index,
            observations: Vec::new(),
        }
    }

    /// Traverse the tree rooted at `root`, then commit to the index.
    pub fn visit(mut self, root: Node<'_>) -> anyhow::Result<usize> {
        let mut cursor = root.walk();
        'walk: loop {
            self.inspect(cursor.node())?;

            if cursor.goto_first_child() {
                continue;
            }
            loop {
                if cursor.goto_next_sibling() {
                    break;
                }
                if !cursor.goto_parent() {
                    break 'walk;
                }
            }
        }

        let recorded = self.observations.len();
        self.index.accept(self.file, self.lang, self.observations);
        Ok(recorded)
    }

    fn inspect(&mut self, node: Node<'_>) -> anyhow::Result<()> {
        let kind = node.kind();
        match (self.lang.family(), kind) {
            (LangFamily::JavaScript | LangFamily::Java, "variable_declarator") => {
                self.record_field(node, "name", kind)
            }
            (LangFamily::Rust, "let_declaration") => self.record_field(node, "pattern", kind),
            (LangFamily::Rust, "const_item" | "static_item") => {
                self.record_field(node, "name", kind)
            }
            (LangFamily::Python, "assignment") => self.record_field(node, "left", kind),
            (LangFamily::Go, "short_var_declaration") => self.record_field(node, "left", kind),
            (LangFamily::Go, "var_spec" | "const_spec") => {
                let mut cursor = node.walk();
                let names: Vec<Node<'_>> = node.children_by_field_name("name", &mut cursor).collect();
                for name in names {
                    self.record_bindings(name, kind)?;
                }
                Ok(())
            }
            (LangFamily::CFamily, "declaration") => {
                let mut cursor = node.walk();
                let declarators: Vec<Node<'_>> =
                    node.children_by_field_name("declarator", &mut cursor).collect();
                for declarator in declarators {
                    if let Some(name) = c_declarator_name(declarator) {
                        self.push(name, kind)?;
                    }
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn record_field(&mut self, node: Node<'_>, field: &str, kind: &'static str) -> anyhow::Result<()> {
        match node.child_by_field_name(field) {
            Some(target) => self.record_bindings(target, kind),
            None => Ok(()),
        }
    }

    /// Record every identifier bound by a (possibly destructuring) pattern.
    fn record_bindings(&mut self, pattern: Node<'_>, kind: &'static str) -> anyhow::Result<()> {
        match pattern.kind() {
            "identifier" | "shorthand_property_identifier_pattern" | "shorthand_field_identifier" => {
                self.push(pattern, kind)
            }
            // Member targets (`self.x = ..`, `a[i] = ..`) bind nothing new
            "attribute" | "subscript" | "member_expression" | "subscript_expression"
            | "field_expression" | "selector_expression" | "index_expression" => Ok(()),
            "assignment_pattern" | "object_assignment_pattern" => {
                self.record_field(pattern, "left", kind)
            }
            "pair_pattern" => self.record_field(pattern, "value", kind),
            "tuple_struct_pattern" => {
                let type_id = pattern.child_by_field_name("type").map(|n| n.id());
                let mut cursor = pattern.walk();
                let children: Vec<Node<'_>> = pattern.named_children(&mut cursor).collect();
                for child in children {
                    if Some(child.id()) != type_id {
                        self.record_bindings(child, kind)?;
                    }
                }
                Ok(())
            }
            _ => {
                let mut cursor = pattern.walk();
                let children: Vec<Node<'_>> = pattern.named_children(&mut cursor).collect();
                for child in children {
                    self.record_bindings(child, kind)?;
                }
                Ok(())
            }
        }
    }

    fn push(&mut self, name: Node<'_>, kind: &'static str) -> anyhow::Result<()> {
        let text = name
            .utf8_text(self.source)
            .with_context(|| format!("invalid identifier bytes in {}", self.file.display()))?;
        let position = name.start_position();
        self.observations.push(VariableObservation {
            name: text.to_string(),
            line: position.row + 1,
            column: position.column + 1,
            declaration: kind,
        });
        Ok(())
    }
}

/// Unwrap C/C++ declarators down to the declared identifier.
///
/// Function declarators are prototypes, not variables.
fn c_declarator_name(node: Node<'_>) -> Option<Node<'_>> {
    match node.kind() {
        "identifier" => Some(node),
        "init_declarator" | "pointer_declarator" | "array_declarator" | "parenthesized_declarator" => {
            let inner = node.child_by_field_name("declarator").or_else(|| {
                let mut cursor = node.walk();
                let first = node.named_children(&mut cursor).next();
                first
            });
            inner.and_then(c_declarator_name)
        }
        "reference_declarator" => {
            let mut cursor = node.walk();
            let last = node.named_children(&mut cursor).last();
            last.and_then(c_declarator_name)
        }
        _ => None,
    }
}
