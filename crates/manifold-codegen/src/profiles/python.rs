//! Python profile.

use crate::ident::IdentCase;
use crate::ir::ScalarKind;
use crate::profile::{ArraySyntax, AsyncPattern, LanguageProfile, OptionalSyntax};

pub static PROFILE: LanguageProfile = LanguageProfile {
    id: "python",
    label: "Python",
    client_file: "client.py",
    // Not "types.py": that would shadow the stdlib module on import.
    types_file: "models.py",
    test_file: "test_client.py",
    method_case: IdentCase::Snake,
    field_case: IdentCase::Snake,
    param_case: IdentCase::Snake,
    async_pattern: AsyncPattern::Sync,
    array_syntax: ArraySyntax::Brackets("list"),
    optional_syntax: OptionalSyntax::Brackets("Optional"),
    supports_alias: true,
    type_prefix: "",
    helper_indent: "    ",
    primitives: &[
        (ScalarKind::String, "str"),
        (ScalarKind::Int, "int"),
        (ScalarKind::Float, "float"),
        (ScalarKind::Bool, "bool"),
    ],
    reserved: &[
        "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
        "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global",
        "if", "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return",
        "try", "while", "with", "yield",
    ],
    name_overrides: &[],
    surface_pattern: r"(?m)^    def ([A-Za-z_][A-Za-z0-9_]*)\(",
    surface_exclude: &[],
};
