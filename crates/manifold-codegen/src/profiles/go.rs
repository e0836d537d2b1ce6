//! Go profile.

use crate::ident::IdentCase;
use crate::ir::ScalarKind;
use crate::profile::{ArraySyntax, AsyncPattern, LanguageProfile, OptionalSyntax};

pub static PROFILE: LanguageProfile = LanguageProfile {
    id: "go",
    label: "Go",
    client_file: "client.go",
    types_file: "types.go",
    test_file: "client_test.go",
    method_case: IdentCase::Pascal,
    field_case: IdentCase::Pascal,
    param_case: IdentCase::Camel,
    async_pattern: AsyncPattern::ErrorReturn,
    array_syntax: ArraySyntax::SlicePrefix,
    optional_syntax: OptionalSyntax::Bare,
    supports_alias: true,
    type_prefix: "",
    helper_indent: "",
    primitives: &[
        (ScalarKind::String, "string"),
        (ScalarKind::Int, "int64"),
        (ScalarKind::Float, "float64"),
        (ScalarKind::Bool, "bool"),
    ],
    reserved: &[
        "break", "case", "chan", "const", "continue", "default", "defer", "else", "fallthrough",
        "for", "func", "go", "goto", "if", "import", "interface", "map", "package", "range",
        "return", "select", "struct", "switch", "type", "var",
    ],
    name_overrides: &[],
    surface_pattern: r"(?m)^func \([^)]+\) ([A-Z][A-Za-z0-9_]*)\(",
    surface_exclude: &[],
};
