//! TypeScript profile.

use crate::ident::IdentCase;
use crate::ir::ScalarKind;
use crate::profile::{ArraySyntax, AsyncPattern, LanguageProfile, OptionalSyntax};

pub static PROFILE: LanguageProfile = LanguageProfile {
    id: "typescript",
    label: "TypeScript",
    client_file: "client.ts",
    types_file: "types.ts",
    test_file: "client.test.ts",
    method_case: IdentCase::Camel,
    // Interfaces mirror the wire format so responses can be used unmapped.
    field_case: IdentCase::Preserve,
    param_case: IdentCase::Camel,
    async_pattern: AsyncPattern::AsyncAwait,
    array_syntax: ArraySyntax::Suffix,
    optional_syntax: OptionalSyntax::UnionUndefined,
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
        "if", "implements", "import", "in", "instanceof", "interface", "let", "new", "null",
        "package", "private", "protected", "public", "return", "static", "super", "switch",
        "this", "throw", "true", "try", "typeof", "var", "void", "while", "with", "yield",
    ],
    name_overrides: &[],
    surface_pattern: r"(?m)^  (?:private )?(?:async )?([A-Za-z_$][A-Za-z0-9_$]*)\(",
    surface_exclude: &["constructor"],
};
