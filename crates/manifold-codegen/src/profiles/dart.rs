//! Dart profile.

use crate::ident::IdentCase;
use crate::ir::ScalarKind;
use crate::profile::{ArraySyntax, AsyncPattern, LanguageProfile, OptionalSyntax};

pub static PROFILE: LanguageProfile = LanguageProfile {
    id: "dart",
    label: "Dart",
    client_file: "client.dart",
    types_file: "types.dart",
    test_file: "client_test.dart",
    method_case: IdentCase::Camel,
    field_case: IdentCase::Camel,
    param_case: IdentCase::Camel,
    async_pattern: AsyncPattern::Future,
    array_syntax: ArraySyntax::Generic("List"),
    optional_syntax: OptionalSyntax::QuestionSuffix,
    supports_alias: true,
    type_prefix: "",
    helper_indent: "  ",
    primitives: &[
        (ScalarKind::String, "String"),
        (ScalarKind::Int, "int"),
        (ScalarKind::Float, "double"),
        (ScalarKind::Bool, "bool"),
    ],
    reserved: &[
        "as", "assert", "async", "await", "break", "case", "catch", "class", "const", "continue",
        "default", "do", "else", "enum", "extends", "false", "final", "finally", "for", "if",
        "in", "is", "new", "null", "rethrow", "return", "super", "switch", "this", "throw",
        "true", "try", "var", "void", "while", "with", "yield",
    ],
    name_overrides: &[],
    surface_pattern: r"(?m)^  [A-Za-z_][A-Za-z0-9_<>,?\[\] ]* ([a-z_][A-Za-z0-9_]*)\(",
    surface_exclude: &[],
};
