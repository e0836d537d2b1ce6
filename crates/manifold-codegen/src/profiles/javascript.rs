//! JavaScript profile.
//!
//! Method names keep the reference SDK's exact spellings for the four
//! irregular `getTransactionby*` endpoints, so downstream callers of the
//! original hand-written client keep compiling.

use crate::ident::IdentCase;
use crate::ir::ScalarKind;
use crate::profile::{ArraySyntax, AsyncPattern, LanguageProfile, OptionalSyntax};

pub static PROFILE: LanguageProfile = LanguageProfile {
    id: "javascript",
    label: "JavaScript",
    client_file: "client.js",
    types_file: "types.js",
    test_file: "client.test.js",
    method_case: IdentCase::Camel,
    field_case: IdentCase::Preserve,
    param_case: IdentCase::Camel,
    async_pattern: AsyncPattern::Promise,
    array_syntax: ArraySyntax::Suffix,
    optional_syntax: OptionalSyntax::Bare,
    supports_alias: true,
    type_prefix: "",
    helper_indent: "  ",
    primitives: &[
        (ScalarKind::String, "string"),
        (ScalarKind::Int, "number"),
        (ScalarKind::Float, "number"),
        (ScalarKind::Bool, "boolean"),
    ],
    reserved: &[
        "await", "break", "case", "catch", "class", "const", "continue", "debugger", "default",
        "delete", "do", "else", "enum", "export", "extends", "false", "finally", "for", "function",
        "if", "import", "in", "instanceof", "let", "new", "null", "return", "static", "super",
        "switch", "this", "throw", "true", "try", "typeof", "var", "void", "while", "with",
        "yield",
    ],
    name_overrides: &[
        ("getTransactionbyID", "getTransactionbyID"),
        ("getTransactionbyNode", "getTransactionbyNode"),
        ("getTransactionbyAddress", "getTransactionbyAddress"),
        ("getTransactionbyDate", "getTransactionbyDate"),
    ],
    surface_pattern: r"(?m)^  (?:async )?([A-Za-z_$][A-Za-z0-9_$]*)\(",
    surface_exclude: &["constructor"],
};
