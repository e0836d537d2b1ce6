//! Output backends, one module per target language.
//!
//! Backends are thin renderers over the precomputed
//! [`EmitContext`](crate::emit::EmitContext): method names, parameter
//! types and response shapes arrive resolved, so each module only knows its
//! language's syntax.

#[cfg(feature = "backend-javascript")]
pub mod javascript;

#[cfg(feature = "backend-typescript")]
pub mod typescript;

#[cfg(feature = "backend-python")]
pub mod python;

#[cfg(feature = "backend-java")]
pub mod java;

#[cfg(feature = "backend-php")]
pub mod php;

#[cfg(feature = "backend-go")]
pub mod go;

#[cfg(feature = "backend-dart")]
pub mod dart;

/// Re-indent a helper fragment (written at zero indent) to sit inside the
/// client class body. Blank lines stay blank.
pub(crate) fn indent_fragment(fragment: &str, indent: &str) -> String {
    let mut out = String::new();
    for line in fragment.trim_end().lines() {
        if line.is_empty() {
            out.push('\n');
        } else {
            out.push_str(indent);
            out.push_str(line);
            out.push('\n');
        }
    }
    out
}

/// JSON-style literal; fits JavaScript, TypeScript, Dart and Go source.
pub(crate) fn json_literal(value: &serde_json::Value) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "null".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fragments_reindent_without_touching_blank_lines() {
        let fragment = "def get_error(self):\n    return self._last_error\n";
        let indented = indent_fragment(fragment, "    ");
        assert_eq!(indented, "    def get_error(self):\n        return self._last_error\n");

        let with_blank = "a\n\nb\n";
        assert_eq!(indent_fragment(with_blank, "  "), "  a\n\n  b\n");
    }

    #[test]
    fn json_literals_quote_strings() {
        assert_eq!(json_literal(&serde_json::json!("0xab")), "\"0xab\"");
        assert_eq!(json_literal(&serde_json::json!(42)), "42");
        assert_eq!(json_literal(&serde_json::json!(true)), "true");
    }
}
