use crate::mdoc::{Document, Macro, NodeId};
use crate::output::{write_node, TextWriter, WriteError};
use crate::query::{GlobalQuery, QueryError, QueryStatus, Selector};
use crate::select::{find_section, require_macro, require_section, write_item_bodies, write_item_heads, Requirement};
use paste::paste;
use std::io::Write;

/// Subsections of ECLASS VARIABLES, in the order their variables get listed.
static VARIABLE_SUBSECTIONS: &[&str] = &[
    "Required variables",
    "Optional variables",
    "Output variables",
    "User variables",
];

/// Macros that name a variable in a variable list's item heads.
static VARIABLE_MACROS: &[Macro] = &[Macro::Dv, Macro::Ev, Macro::Va];

const REFERENCES_INTRO: &str = "\n\nReferences:\n";

/// Runs a query against a document, writing its results to `out`.
///
/// Diagnostics that don't stop the query (like a list item with an empty head) go to `diagnostics`. Output is
/// streamed as the query goes, so an error can come after some of it has already been written.
pub fn run_query<O: Write, E: Write>(
    doc: &Document,
    selector: &Selector,
    out: O,
    diagnostics: &mut E,
) -> Result<(), QueryError> {
    let mut script = Script {
        doc,
        out: TextWriter::new(out),
        diagnostics,
    };
    let result = match selector {
        Selector::Global(query) => script.run_global(*query),
        Selector::Function { .. } | Selector::Variable { .. } => Err(QueryError::Unsupported(selector.clone())),
    };
    let finished = script.out.finish().map_err(QueryError::Flush);
    result.and(finished)
}

/// Like [`run_query`], but reports any error to `diagnostics` and returns only the status.
pub fn query<O: Write, E: Write>(doc: &Document, selector: &Selector, out: O, diagnostics: &mut E) -> QueryStatus {
    match run_query(doc, selector, out, diagnostics) {
        Ok(()) => QueryStatus::Ok,
        Err(err) => {
            let _ = writeln!(diagnostics, "{err}");
            err.status()
        }
    }
}

struct Script<'a, O, E> {
    doc: &'a Document,
    out: TextWriter<O>,
    diagnostics: &'a mut E,
}

macro_rules! global_scripts {
    ($($name:ident),+ $(,)?) => {
        impl<O: Write, E: Write> Script<'_, O, E> {
            fn run_global(&mut self, query: GlobalQuery) -> Result<(), QueryError> {
                paste! {
                    match query {
                        $( GlobalQuery::$name => self.[<$name:snake>](), )+
                    }
                }
            }
        }
    };
}

global_scripts! {
    Blurb,
    Description,
    FunctionList,
    VariableList,
    Authors,
    BugReportLink,
    DeprecationNotice,
    Examples,
    Maintainers,
}

impl<O: Write, E: Write> Script<'_, O, E> {
    fn blurb(&mut self) -> Result<(), QueryError> {
        let name = self.section("NAME")?;
        let nd = require_macro(self.doc, self.body(name), Macro::Nd)?;
        self.write(nd)?;
        self.end_line(nd)
    }

    fn description(&mut self) -> Result<(), QueryError> {
        self.section_body("DESCRIPTION")?;
        let Some(see_also) = find_section(self.doc, self.doc.root(), "SEE ALSO") else {
            return Ok(());
        };
        let list = require_macro(self.doc, self.body(see_also), Macro::Bl)?;
        write_item_bodies(
            &mut self.out,
            self.diagnostics,
            self.doc,
            list,
            Macro::Lk,
            REFERENCES_INTRO,
            Requirement::Optional,
        )?;
        Ok(())
    }

    fn function_list(&mut self) -> Result<(), QueryError> {
        let functions = self.section("FUNCTIONS")?;
        let list = require_macro(self.doc, self.body(functions), Macro::Bl)?;
        write_item_heads(
            &mut self.out,
            self.diagnostics,
            self.doc,
            list,
            Macro::Ic,
            Requirement::Required,
        )?;
        Ok(())
    }

    fn variable_list(&mut self) -> Result<(), QueryError> {
        self.section("ECLASS VARIABLES")?;
        for &title in VARIABLE_SUBSECTIONS {
            let Some(subsection) = find_section(self.doc, self.doc.root(), title) else {
                continue;
            };
            let list = require_macro(self.doc, self.body(subsection), Macro::Bl)?;
            for &target in VARIABLE_MACROS {
                write_item_heads(
                    &mut self.out,
                    self.diagnostics,
                    self.doc,
                    list,
                    target,
                    Requirement::Optional,
                )?;
            }
        }
        Ok(())
    }

    fn authors(&mut self) -> Result<(), QueryError> {
        self.section_body("AUTHORS")
    }

    fn bug_report_link(&mut self) -> Result<(), QueryError> {
        let section = self.section("REPORTING BUGS")?;
        let link = require_macro(self.doc, self.body(section), Macro::Lk)?;
        if let Some(target) = self.doc.node(link).first_child() {
            self.write(target)?;
        }
        self.end_line(link)
    }

    fn deprecation_notice(&mut self) -> Result<(), QueryError> {
        self.section_body("DEPRECATED")
    }

    fn examples(&mut self) -> Result<(), QueryError> {
        self.section_body("EXAMPLES")
    }

    fn maintainers(&mut self) -> Result<(), QueryError> {
        self.section_body("MAINTAINERS")
    }

    fn section(&self, heading: &str) -> Result<NodeId, QueryError> {
        require_section(self.doc, self.doc.root(), heading)
    }

    /// A block's body, or the node itself if it has none.
    fn body(&self, id: NodeId) -> NodeId {
        self.doc.node(id).body().unwrap_or(id)
    }

    fn section_body(&mut self, heading: &str) -> Result<(), QueryError> {
        let section = self.section(heading)?;
        self.write(self.body(section))
    }

    fn write(&mut self, id: NodeId) -> Result<(), QueryError> {
        write_node(&mut self.out, self.doc, id)?;
        Ok(())
    }

    fn end_line(&mut self, at: NodeId) -> Result<(), QueryError> {
        let position = self.doc.node(at).position();
        self.out.end_line().map_err(WriteError::at(position))?;
        Ok(())
    }
}
