// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! JSON diagnostic output for tools.
//!
//! `gse <command> --format json` prints one [`DiagnosticReport`].

use serde::Serialize;

use gse_ast::LineMap;

use crate::codes::ErrorCodeRegistry;
use crate::{Diagnostic, LabelStyle, Severity};

/// Bumped when the shape of the report changes.
pub const REPORT_VERSION: u32 = 1;

/// Every diagnostic from one run over one file.
#[derive(Debug, Serialize)]
pub struct DiagnosticReport {
    pub version: u32,
    pub file: String,
    pub success: bool,
    /// `lex`, `parse` or `run`.
    pub phase: String,
    pub diagnostics: Vec<JsonDiagnostic>,
    pub error_count: usize,
    pub warning_count: usize,
}

#[derive(Debug, Serialize)]
pub struct JsonDiagnostic {
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Category from the code registry, e.g. "Type".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<SourceLocation>,
    pub labels: Vec<JsonLabel>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
}

/// Where the primary label starts, with the line for context.
#[derive(Debug, Serialize)]
pub struct SourceLocation {
    pub line: u32,
    pub column: u32,
    pub byte_offset: usize,
    pub source_line: String,
}

#[derive(Debug, Serialize)]
pub struct JsonLabel {
    pub style: LabelStyle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub start: LineCol,
    pub end: LineCol,
}

/// 1-based line/column plus the raw byte offset.
#[derive(Debug, Serialize)]
pub struct LineCol {
    pub line: u32,
    pub column: u32,
    pub byte_offset: usize,
}

/// Build a report for `diagnostics` produced from `source`.
pub fn to_json_report(diagnostics: &[Diagnostic], source: &str, file: &str, phase: &str) -> DiagnosticReport {
    let registry = ErrorCodeRegistry::default();
    let line_map = LineMap::new(source);

    let converted: Vec<JsonDiagnostic> =
        diagnostics.iter().map(|d| to_json_diagnostic(d, source, &line_map, &registry)).collect();
    let error_count = diagnostics.iter().filter(|d| d.severity == Severity::Error).count();
    let warning_count = diagnostics.iter().filter(|d| d.severity == Severity::Warning).count();

    DiagnosticReport {
        version: REPORT_VERSION,
        file: file.to_string(),
        success: error_count == 0,
        phase: phase.to_string(),
        diagnostics: converted,
        error_count,
        warning_count,
    }
}

fn to_json_diagnostic(
    diag: &Diagnostic,
    source: &str,
    line_map: &LineMap,
    registry: &ErrorCodeRegistry,
) -> JsonDiagnostic {
    let code = diag.code.as_ref().map(|c| c.0.clone());
    let category = code.as_deref().and_then(|c| registry.get(c)).map(|info| info.category.to_string());

    let location = diag.primary_span().map(|span| {
        let pos = line_map.position(span.start);
        SourceLocation {
            line: pos.line,
            column: pos.column,
            byte_offset: span.start,
            source_line: line_map.line_text(source, pos.line).unwrap_or("").to_string(),
        }
    });

    let line_col = |offset: usize| {
        let pos = line_map.position(offset);
        LineCol { line: pos.line, column: pos.column, byte_offset: offset }
    };
    let labels = diag
        .labels
        .iter()
        .map(|l| JsonLabel {
            style: l.style,
            message: l.message.clone(),
            start: line_col(l.span.start),
            end: line_col(l.span.end),
        })
        .collect();

    JsonDiagnostic {
        severity: diag.severity,
        code,
        category,
        message: diag.message.clone(),
        location,
        labels,
        notes: diag.notes.clone(),
        help: diag.help.clone(),
    }
}

/// Serialize a report to pretty JSON.
pub fn to_json_string(report: &DiagnosticReport) -> String {
    serde_json::to_string_pretty(report).unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
}
