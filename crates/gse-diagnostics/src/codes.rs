// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Error code registry.
//!
//! Maps error codes to titles and categories for display and JSON output.

use std::collections::HashMap;

/// Registry of all known error codes.
pub struct ErrorCodeRegistry {
    codes: HashMap<&'static str, ErrorCodeInfo>,
}

/// Information about a single error code.
pub struct ErrorCodeInfo {
    pub code: &'static str,
    pub title: &'static str,
    pub category: ErrorCategory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Syntax,
    Binding,
    Type,
    Call,
    Arithmetic,
    Host,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ErrorCategory::Syntax => "Syntax",
            ErrorCategory::Binding => "Binding",
            ErrorCategory::Type => "Type",
            ErrorCategory::Call => "Call",
            ErrorCategory::Arithmetic => "Arithmetic",
            ErrorCategory::Host => "Host",
        };
        f.write_str(name)
    }
}

macro_rules! register_codes {
    ($($code:literal => ($title:literal, $cat:expr)),* $(,)?) => {{
        let mut map = HashMap::new();
        $(
            map.insert($code, ErrorCodeInfo {
                code: $code,
                title: $title,
                category: $cat,
            });
        )*
        map
    }};
}

impl Default for ErrorCodeRegistry {
    fn default() -> Self {
        use ErrorCategory::*;

        Self {
            codes: register_codes! {
                // Lexer (E00xx)
                "E0001" => ("unexpected character", Syntax),
                "E0002" => ("unterminated string literal", Syntax),
                "E0003" => ("invalid escape sequence", Syntax),
                "E0004" => ("invalid number", Syntax),
                "E0005" => ("unterminated block comment", Syntax),

                // Parser (E01xx)
                "E0100" => ("unexpected token", Syntax),
                "E0101" => ("invalid assignment target", Syntax),
                "E0102" => ("misplaced keyword", Syntax),
                "E0103" => ("unbalanced delimiter", Syntax),
                "E0104" => ("duplicate parameter", Syntax),
                "E0105" => ("invalid negation", Syntax),
                "E0106" => ("nesting too deep", Syntax),

                // Evaluation (E03xx)
                "E0300" => ("undefined variable", Binding),
                "E0301" => ("variable already defined", Binding),
                "E0302" => ("mismatched operand types", Type),
                "E0303" => ("unsupported operand type", Type),
                "E0304" => ("wrong number of arguments", Call),
                "E0305" => ("value is not callable", Call),
                "E0306" => ("property access on a non-object", Type),
                "E0307" => ("dangling property reference", Binding),
                "E0308" => ("invalid assignment target", Binding),
                "E0309" => ("misplaced return", Call),
                "E0310" => ("division by zero", Arithmetic),
                "E0311" => ("integer overflow", Arithmetic),
                "E0312" => ("call depth exceeded", Call),
                "E0313" => ("malformed expression", Syntax),

                // Host (E04xx)
                "E0400" => ("native function failed", Host),
            },
        }
    }
}

impl ErrorCodeRegistry {
    pub fn get(&self, code: &str) -> Option<&ErrorCodeInfo> {
        self.codes.get(code)
    }

    pub fn all(&self) -> impl Iterator<Item = &ErrorCodeInfo> {
        self.codes.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_grouped_by_range() {
        let registry = ErrorCodeRegistry::default();
        for info in registry.all() {
            let expected = match &info.code[..3] {
                "E00" | "E01" => &[ErrorCategory::Syntax][..],
                "E03" => &[
                    ErrorCategory::Syntax,
                    ErrorCategory::Binding,
                    ErrorCategory::Type,
                    ErrorCategory::Call,
                    ErrorCategory::Arithmetic,
                ][..],
                "E04" => &[ErrorCategory::Host][..],
                other => panic!("unexpected code range {}", other),
            };
            assert!(expected.contains(&info.category), "{} is {}", info.code, info.category);
        }
    }

    #[test]
    fn lookup() {
        let registry = ErrorCodeRegistry::default();
        assert_eq!(registry.get("E0302").map(|i| i.title), Some("mismatched operand types"));
        assert!(registry.get("E9999").is_none());
    }
}
