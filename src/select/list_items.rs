use crate::mdoc::{Document, DocumentNode, Macro, NodeFlags, NodeId};
use crate::output::{write_node, TextWriter, WriteError};
use crate::query::QueryError;
use std::io::Write;

/// Whether coming up empty is an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Requirement {
    Required,
    Optional,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ItemRegion {
    Head,
    Body,
}

impl ItemRegion {
    fn of(self, item: &DocumentNode) -> Option<NodeId> {
        match self {
            ItemRegion::Head => item.head(),
            ItemRegion::Body => item.body(),
        }
    }

    fn empty_message(self) -> &'static str {
        match self {
            ItemRegion::Head => "empty item header",
            ItemRegion::Body => "empty item body",
        }
    }
}

/// Writes one line per list item whose head starts with `target`.
///
/// Only the list's direct `It` children are looked at. An item with an empty head gets a diagnostic and is skipped.
/// Returns whether any item matched; with [`Requirement::Required`], no match is an error instead.
pub fn write_item_heads<O: Write, E: Write>(
    out: &mut TextWriter<O>,
    diagnostics: &mut E,
    doc: &Document,
    list: NodeId,
    target: Macro,
    requirement: Requirement,
) -> Result<bool, QueryError> {
    write_items(out, diagnostics, doc, list, ItemRegion::Head, target, "", requirement)
}

/// Writes one line per list item whose body starts with `target`, with `intro` written once before the first.
///
/// This works like [`write_item_heads`], except that a link with nothing but a target doesn't count as a match.
pub fn write_item_bodies<O: Write, E: Write>(
    out: &mut TextWriter<O>,
    diagnostics: &mut E,
    doc: &Document,
    list: NodeId,
    target: Macro,
    intro: &str,
    requirement: Requirement,
) -> Result<bool, QueryError> {
    write_items(out, diagnostics, doc, list, ItemRegion::Body, target, intro, requirement)
}

#[allow(clippy::too_many_arguments)]
fn write_items<O: Write, E: Write>(
    out: &mut TextWriter<O>,
    diagnostics: &mut E,
    doc: &Document,
    list: NodeId,
    region: ItemRegion,
    target: Macro,
    intro: &str,
    requirement: Requirement,
) -> Result<bool, QueryError> {
    let list_body = doc.node(list).body().unwrap_or(list);
    let mut found = false;
    for &item_id in doc.node(list_body).children() {
        let item = doc.node(item_id);
        if !item.is_macro(Macro::It) || item.kind().is_region() {
            continue;
        }
        let first = region.of(item).and_then(|r| doc.node(r).first_child());
        let Some(first) = first else {
            // diagnostics are best-effort
            let _ = writeln!(diagnostics, "{}: {}", item.position(), region.empty_message());
            continue;
        };
        let element = doc.node(first);
        if !element.is_macro(target) || is_hidden(item) || is_hidden(element) {
            continue;
        }
        if element.is_macro(Macro::Lk) && element.children().len() < 2 {
            continue;
        }
        if !found {
            found = true;
            if !intro.is_empty() {
                out.write_str(intro).map_err(WriteError::at(element.position()))?;
            }
        }
        write_node(out, doc, first)?;
        out.end_line().map_err(WriteError::at(element.position()))?;
    }
    if !found && requirement == Requirement::Required {
        return Err(QueryError::NoMatchingItems);
    }
    Ok(found)
}

fn is_hidden(node: &DocumentNode) -> bool {
    node.flags().contains(NodeFlags::NO_PRINT)
}
