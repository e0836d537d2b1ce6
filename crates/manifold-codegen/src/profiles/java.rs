//! Java profile.

use crate::ident::IdentCase;
use crate::ir::ScalarKind;
use crate::profile::{ArraySyntax, AsyncPattern, LanguageProfile, OptionalSyntax};

pub static PROFILE: LanguageProfile = LanguageProfile {
    id: "java",
    label: "Java",
    client_file: "Client.java",
    types_file: "Types.java",
    test_file: "ClientTest.java",
    method_case: IdentCase::Camel,
    field_case: IdentCase::Camel,
    param_case: IdentCase::Camel,
    async_pattern: AsyncPattern::CompletableFuture,
    array_syntax: ArraySyntax::Generic("List"),
    // Optional fields are nullable references; java.util.Optional is not
    // used for data fields.
    optional_syntax: OptionalSyntax::Bare,
    supports_alias: false,
    type_prefix: "Types.",
    helper_indent: "    ",
    primitives: &[
        (ScalarKind::String, "String"),
        (ScalarKind::Int, "Long"),
        (ScalarKind::Float, "Double"),
        (ScalarKind::Bool, "Boolean"),
    ],
    reserved: &[
        "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class",
        "const", "continue", "default", "do", "double", "else", "enum", "extends", "final",
        "finally", "float", "for", "goto", "if", "implements", "import", "instanceof", "int",
        "interface", "long", "native", "new", "package", "private", "protected", "public",
        "return", "short", "static", "strictfp", "super", "switch", "synchronized", "this",
        "throw", "throws", "transient", "try", "void", "volatile", "while",
    ],
    name_overrides: &[],
    surface_pattern: r"(?m)^    public [A-Za-z_][A-Za-z0-9_<>.,\[\] ]* ([A-Za-z_][A-Za-z0-9_]*)\(",
    surface_exclude: &[],
};
