//! PHP profile.
//!
//! The reference PHP SDK exposed snake_case methods, so this profile keeps
//! that convention rather than PSR camelCase.

use crate::ident::IdentCase;
use crate::ir::ScalarKind;
use crate::profile::{ArraySyntax, AsyncPattern, LanguageProfile, OptionalSyntax};

pub static PROFILE: LanguageProfile = LanguageProfile {
    id: "php",
    label: "PHP",
    client_file: "Client.php",
    types_file: "Types.php",
    test_file: "ClientTest.php",
    method_case: IdentCase::Snake,
    field_case: IdentCase::Camel,
    param_case: IdentCase::Camel,
    async_pattern: AsyncPattern::Sync,
    array_syntax: ArraySyntax::Plain("array"),
    optional_syntax: OptionalSyntax::NullablePrefix,
    supports_alias: false,
    type_prefix: "",
    helper_indent: "    ",
    primitives: &[
        (ScalarKind::String, "string"),
        (ScalarKind::Int, "int"),
        (ScalarKind::Float, "float"),
        (ScalarKind::Bool, "bool"),
    ],
    reserved: &[
        "abstract", "and", "array", "as", "break", "callable", "case", "catch", "class", "clone",
        "const", "continue", "declare", "default", "do", "echo", "else", "elseif", "empty",
        "extends", "final", "finally", "fn", "for", "foreach", "function", "global", "goto",
        "if", "implements", "include", "instanceof", "interface", "isset", "list", "match",
        "namespace", "new", "or", "print", "private", "protected", "public", "readonly",
        "require", "return", "static", "switch", "throw", "trait", "try", "unset", "use", "var",
        "while", "xor", "yield",
    ],
    name_overrides: &[],
    surface_pattern: r"(?m)^    public function ([A-Za-z_][A-Za-z0-9_]*)\(",
    surface_exclude: &[],
};
