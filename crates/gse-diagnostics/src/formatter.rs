// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Terminal formatter for diagnostics.
//!
//! ```text
//! error[E0302]: operator `+` cannot combine int and string
//!   --> level1.gse:4:9
//!     |
//!   4 | let b = a + 'oops';
//!     |         ^^^^^^^^^^ int and string
//!     |
//!     = note: values are never converted between types
//! ```
//!
//! Colors come from `colored`; callers decide whether they are enabled.

use std::collections::BTreeMap;

use colored::Colorize;

use gse_ast::LineMap;

use crate::{Diagnostic, LabelStyle, Severity};

/// Formats diagnostics against one source text.
pub struct DiagnosticFormatter<'a> {
    source: &'a str,
    file_name: Option<&'a str>,
    line_map: LineMap,
}

struct Annotation<'d> {
    col_start: usize,
    col_end: usize,
    style: LabelStyle,
    message: Option<&'d str>,
}

impl<'a> DiagnosticFormatter<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source, file_name: None, line_map: LineMap::new(source) }
    }

    pub fn with_file_name(mut self, name: &'a str) -> Self {
        self.file_name = Some(name);
        self
    }

    pub fn format(&self, diagnostic: &Diagnostic) -> String {
        let mut out = String::new();
        self.header(&mut out, diagnostic);

        let lines = self.annotated_lines(diagnostic);
        let gutter = lines.keys().last().map_or(1, |n| n.to_string().len()).max(2);

        if let Some(span) = diagnostic.primary_span() {
            let pos = self.line_map.position(span.start);
            out.push_str(&format!(
                "{}{} {}:{}\n",
                " ".repeat(gutter),
                "-->".blue(),
                self.file_name.unwrap_or("<script>"),
                pos
            ));
        }

        if !lines.is_empty() {
            out.push_str(&format!("{} {}\n", " ".repeat(gutter + 1), "|".blue()));
            let mut previous: Option<usize> = None;
            for (line_num, annotations) in &lines {
                if previous.is_some_and(|p| *line_num > p + 1) {
                    out.push_str(&format!("{} {}\n", " ".repeat(gutter), "...".blue()));
                }
                let text = self.line_map.line_text(self.source, *line_num as u32).unwrap_or("");
                out.push_str(&format!(
                    "{:>width$} {} {}\n",
                    line_num.to_string().blue().bold(),
                    "|".blue(),
                    text,
                    width = gutter + 1
                ));
                for ann in annotations {
                    self.underline(&mut out, ann, gutter);
                }
                previous = Some(*line_num);
            }
            if !diagnostic.notes.is_empty() || diagnostic.help.is_some() {
                out.push_str(&format!("{} {}\n", " ".repeat(gutter + 1), "|".blue()));
            }
        }

        for note in &diagnostic.notes {
            out.push_str(&format!("{} {} {}: {}\n", " ".repeat(gutter + 1), "=".cyan(), "note".cyan().bold(), note));
        }
        if let Some(help) = &diagnostic.help {
            out.push_str(&format!("{} {} {}: {}\n", " ".repeat(gutter + 1), "=".cyan(), "help".cyan().bold(), help));
        }
        out
    }

    fn header(&self, out: &mut String, diagnostic: &Diagnostic) {
        let severity = match diagnostic.severity {
            Severity::Error => "error".red().bold(),
            Severity::Warning => "warning".yellow().bold(),
        };
        match &diagnostic.code {
            Some(code) => out.push_str(&format!(
                "{}{}: {}\n",
                severity,
                format!("[{}]", code.0).red().bold(),
                diagnostic.message.bold()
            )),
            None => out.push_str(&format!("{}: {}\n", severity, diagnostic.message.bold())),
        }
    }

    /// Labels grouped by the line they start on. Multi-line spans are cut
    /// at the end of their first line.
    fn annotated_lines<'d>(&self, diagnostic: &'d Diagnostic) -> BTreeMap<usize, Vec<Annotation<'d>>> {
        let mut lines: BTreeMap<usize, Vec<Annotation<'d>>> = BTreeMap::new();
        for label in &diagnostic.labels {
            let start = self.line_map.position(label.span.start);
            let end = self.line_map.position(label.span.end);
            let line_num = start.line as usize;
            let col_start = start.column as usize;
            let col_end = if end.line == start.line {
                end.column as usize
            } else {
                self.line_map.line_text(self.source, start.line).map_or(col_start, |t| t.len() + 1)
            };
            lines.entry(line_num).or_default().push(Annotation {
                col_start,
                col_end: col_end.max(col_start + 1),
                style: label.style,
                message: label.message.as_deref(),
            });
        }
        for annotations in lines.values_mut() {
            annotations.sort_by_key(|a| (a.style == LabelStyle::Secondary, a.col_start));
        }
        lines
    }

    fn underline(&self, out: &mut String, ann: &Annotation<'_>, gutter: usize) {
        let width = ann.col_end - ann.col_start;
        let (marks, message) = match ann.style {
            LabelStyle::Primary => (
                "^".repeat(width).red().bold().to_string(),
                ann.message.map(|m| m.red().bold().to_string()),
            ),
            LabelStyle::Secondary => {
                ("-".repeat(width).blue().to_string(), ann.message.map(|m| m.blue().to_string()))
            }
        };
        out.push_str(&format!(
            "{} {} {}{}",
            " ".repeat(gutter + 1),
            "|".blue(),
            " ".repeat(ann.col_start - 1),
            marks
        ));
        if let Some(message) = message {
            out.push(' ');
            out.push_str(&message);
        }
        out.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gse_ast::Span;
    use pretty_assertions::assert_eq;

    fn plain<T>(f: impl FnOnce() -> T) -> T {
        colored::control::set_override(false);
        f()
    }

    #[test]
    fn renders_source_line_and_underline() {
        let src = "let a = 1;\nlet b = a + 'oops';\n";
        let diag = Diagnostic::error("operator `+` cannot combine int and string")
            .with_code("E0302")
            .with_primary(Span::new(19, 29), "int and string")
            .with_note("values are never converted between types");

        let out = plain(|| DiagnosticFormatter::new(src).with_file_name("level1.gse").format(&diag));
        let expected = "\
error[E0302]: operator `+` cannot combine int and string
  --> level1.gse:2:9
    |
  2 | let b = a + 'oops';
    |         ^^^^^^^^^^ int and string
    |
    = note: values are never converted between types
";
        assert_eq!(out, expected);
    }

    #[test]
    fn host_warning_with_secondary_label() {
        let src = "let hp = 10;\nspawn(hp);\n";
        let diag = Diagnostic::warning("`spawn` is deprecated")
            .with_primary(Span::new(13, 18), "deprecated native")
            .with_secondary(Span::new(4, 6), "defined here");

        let out = plain(|| DiagnosticFormatter::new(src).with_file_name("rules.gse").format(&diag));
        let expected = "\
warning: `spawn` is deprecated
  --> rules.gse:2:1
    |
  1 | let hp = 10;
    |     -- defined here
  2 | spawn(hp);
    | ^^^^^ deprecated native
";
        assert_eq!(out, expected);
    }

    #[test]
    fn diagnostic_without_labels() {
        let diag = Diagnostic::error("something broke").with_help("try again");
        let out = plain(|| DiagnosticFormatter::new("").format(&diag));
        assert_eq!(out, "error: something broke\n    = help: try again\n");
    }
}
