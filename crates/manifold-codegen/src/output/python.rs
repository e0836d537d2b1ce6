//! Python output backend.
//!
//! Emits `client.py` (sync client over urllib, snake_case methods),
//! `models.py` (scalar aliases, `Literal` enums, `TypedDict` records; the
//! file is not named `types.py` to avoid shadowing the stdlib module) and
//! `test_client.py` (unittest scaffold against a mock server).

use crate::artifact::{ArtifactKind, GeneratedArtifact};
use crate::emit::{Declaration, EmitContext, EmitError, MethodSpec, ParamSpec};
use crate::output::indent_fragment;
use crate::profile::LanguageProfile;
use crate::traits::Backend;

pub struct PythonBackend;

pub static PYTHON_BACKEND: PythonBackend = PythonBackend;

impl Backend for PythonBackend {
    fn profile(&self) -> &'static LanguageProfile {
        &crate::profiles::python::PROFILE
    }

    fn generate(&self, ctx: &EmitContext<'_>) -> Result<Vec<GeneratedArtifact>, EmitError> {
        let profile = self.profile();
        Ok(vec![
            GeneratedArtifact::new(self.id(), ArtifactKind::ClientSource, profile.client_file, client(ctx)),
            GeneratedArtifact::new(self.id(), ArtifactKind::TypeDeclarations, profile.types_file, models(ctx)),
            GeneratedArtifact::new(self.id(), ArtifactKind::TestScaffold, profile.test_file, scaffold(ctx)),
        ])
    }
}

fn literal(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => "None".to_string(),
        serde_json::Value::Bool(true) => "True".to_string(),
        serde_json::Value::Bool(false) => "False".to_string(),
        serde_json::Value::String(s) => format!("{s:?}"),
        other => other.to_string(),
    }
}

fn declaration_names(ctx: &EmitContext<'_>) -> Vec<String> {
    ctx.declarations
        .iter()
        .map(|d| match d {
            Declaration::Alias { name, .. }
            | Declaration::Enum { name, .. }
            | Declaration::Record { name, .. } => name.clone(),
        })
        .collect()
}

fn client(ctx: &EmitContext<'_>) -> String {
    let class = &ctx.class_name;
    let mut out = String::new();

    out.push_str("# Generated by manifold. Do not edit.\n\n");
    out.push_str(&format!("\"\"\"{} client.\"\"\"\n\n", ctx.ir.api.name));
    out.push_str("from __future__ import annotations\n\n");
    out.push_str("import hashlib\n");
    out.push_str("import json\n");
    out.push_str("import time\n");
    out.push_str("import urllib.request\n");
    out.push_str("from typing import Any, Optional, cast\n\n");
    out.push_str("from ecdsa import BadSignatureError, SECP256k1, SigningKey, VerifyingKey\n");
    out.push_str("from ecdsa.util import sigdecode_der, sigencode_der\n\n");

    let names = declaration_names(ctx);
    if !names.is_empty() {
        out.push_str("from models import (\n");
        for name in &names {
            out.push_str(&format!("    {name},\n"));
        }
        out.push_str(")\n\n");
    }

    out.push_str(&format!("DEFAULT_BASE_URL = {}\n\n\n", literal(&ctx.base_url.clone().into())));

    out.push_str(&format!("class {class}:\n"));
    out.push_str(&format!("    \"\"\"Generated client for the {} API.\"\"\"\n\n", ctx.ir.api.name));
    out.push_str("    def __init__(self, base_url: str = DEFAULT_BASE_URL) -> None:\n");
    out.push_str("        self._nag_url = base_url\n");
    out.push_str("        self._nag_key = \"\"\n");
    out.push_str(&format!("        self._version = {}\n", literal(&ctx.version.clone().into())));
    out.push_str("        self._last_error = \"\"\n\n");

    out.push_str("    def _post(self, path: str, payload: dict[str, Any]) -> Any:\n");
    out.push_str("        payload[\"Version\"] = self._version\n");
    out.push_str("        data = json.dumps(payload).encode(\"utf-8\")\n");
    out.push_str("        request = urllib.request.Request(\n");
    out.push_str("            self._nag_url + path,\n");
    out.push_str("            data=data,\n");
    out.push_str("            headers={\"Content-Type\": \"application/json\"},\n");
    out.push_str("        )\n");
    out.push_str("        with urllib.request.urlopen(request) as response:\n");
    out.push_str("            envelope = json.loads(response.read().decode(\"utf-8\"))\n");
    out.push_str("        if envelope.get(\"Result\") != 200:\n");
    out.push_str("            self._last_error = f\"request failed with result {envelope.get('Result')}\"\n");
    out.push_str("            raise RuntimeError(self._last_error)\n");
    out.push_str("        return envelope.get(\"Response\")\n");

    for method in &ctx.methods {
        out.push('\n');
        out.push_str(&render_method(method));
    }

    for helper in &ctx.helpers {
        out.push('\n');
        out.push_str(&indent_fragment(&helper.fragment, ctx.profile.helper_indent));
    }

    out
}

fn param_signature(param: &ParamSpec) -> String {
    if param.required {
        format!("{}: {}", param.emitted_name, param.ty)
    } else if param.ty.starts_with("Optional[") {
        format!("{}: {} = None", param.emitted_name, param.ty)
    } else {
        format!("{}: Optional[{}] = None", param.emitted_name, param.ty)
    }
}

fn render_method(method: &MethodSpec) -> String {
    let mut out = String::new();
    let mut signature = vec!["self".to_string()];
    signature.extend(method.params.iter().map(param_signature));

    out.push_str(&format!(
        "    def {}({}) -> {}:\n",
        method.emitted_name,
        signature.join(", "),
        method.response_type
    ));
    if let Some(docs) = &method.docs {
        out.push_str(&format!("        \"\"\"{docs}\"\"\"\n"));
    }
    out.push_str("        payload: dict[str, Any] = {\n");
    for param in method.params.iter().filter(|p| p.required) {
        out.push_str(&format!(
            "            \"{}\": {},\n",
            param.wire_name, param.emitted_name
        ));
    }
    out.push_str("        }\n");
    for param in method.params.iter().filter(|p| !p.required) {
        out.push_str(&format!("        if {} is not None:\n", param.emitted_name));
        out.push_str(&format!(
            "            payload[\"{}\"] = {}\n",
            param.wire_name, param.emitted_name
        ));
    }
    out.push_str(&format!(
        "        return cast({}, self._post({}, payload))\n",
        method.response_type,
        literal(&method.path.clone().into())
    ));
    out
}

fn models(ctx: &EmitContext<'_>) -> String {
    let mut out = String::new();
    out.push_str("# Generated by manifold. Do not edit.\n\n");
    out.push_str(&format!("\"\"\"Typed models for the {} API.\"\"\"\n\n", ctx.ir.api.name));
    out.push_str("from __future__ import annotations\n\n");
    out.push_str("from typing import Literal, NotRequired, Optional, TypedDict\n");

    for decl in &ctx.declarations {
        out.push('\n');
        match decl {
            Declaration::Alias { name, ty, docs } => {
                out.push_str(&format!("{name} = {ty}\n"));
                if let Some(docs) = docs {
                    out.push_str(&format!("\"\"\"{docs}\"\"\"\n"));
                }
            }
            Declaration::Enum { name, variants, docs } => {
                let values: Vec<String> =
                    variants.iter().map(|v| format!("{v:?}")).collect();
                out.push_str(&format!("{name} = Literal[{}]\n", values.join(", ")));
                if let Some(docs) = docs {
                    out.push_str(&format!("\"\"\"{docs}\"\"\"\n"));
                }
            }
            Declaration::Record { name, fields, docs } => {
                out.push_str(&format!("\nclass {name}(TypedDict):\n"));
                if let Some(docs) = docs {
                    out.push_str(&format!("    \"\"\"{docs}\"\"\"\n\n"));
                }
                if fields.is_empty() {
                    out.push_str("    pass\n");
                }
                for field in fields {
                    let ty = if field.required {
                        field.ty.clone()
                    } else {
                        format!("NotRequired[{}]", field.ty)
                    };
                    out.push_str(&format!("    {}: {ty}\n", field.emitted_name));
                }
            }
        }
    }
    out
}

fn scaffold(ctx: &EmitContext<'_>) -> String {
    let class = &ctx.class_name;
    let mut out = String::new();
    out.push_str("# Generated by manifold. Do not edit.\n\n");
    out.push_str("\"\"\"Scaffold tests exercising every client method against a mock server.\"\"\"\n\n");
    out.push_str("import os\n");
    out.push_str("import unittest\n\n");
    out.push_str(&format!("from client import {class}\n\n\n"));

    out.push_str(&format!("class {class}ScaffoldTest(unittest.TestCase):\n"));
    out.push_str("    def setUp(self) -> None:\n");
    out.push_str(&format!(
        "        self.client = {class}(\n            base_url=os.environ.get(\"MOCK_SERVER_URL\", \"http://localhost:8080\")\n        )\n"
    ));

    for method in &ctx.methods {
        let args: Vec<String> = method
            .params
            .iter()
            .map(|p| literal(&ctx.sample_value(method, p)))
            .collect();
        out.push('\n');
        out.push_str(&format!("    def test_{}(self) -> None:\n", method.emitted_name));
        out.push_str(&format!(
            "        response = self.client.{}({})\n",
            method.emitted_name,
            args.join(", ")
        ));
        out.push_str("        self.assertIsNotNone(response)\n");
    }

    out.push_str("\n\nif __name__ == \"__main__\":\n    unittest.main()\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dedup::NameTable;
    use crate::emit::build_context;
    use crate::ir::{EndpointDef, Field, HttpMethod, Ir, ScalarKind, TypeDef, TypeExpr};
    use crate::profile::profile_for_id;

    fn sample_ir() -> Ir {
        let mut ir = Ir::new();
        ir.api = crate::ir::ApiInfo {
            name: "ExampleAPI".into(),
            version: "1.0.0".into(),
            default_base_url: "https://example.test/api".into(),
        };
        ir.types.push(TypeDef::scalar("Address", ScalarKind::String, None));
        ir.endpoints.push(EndpointDef {
            canonical_name: "checkWallet".into(),
            http_method: HttpMethod::Post,
            path: "/checkWallet".into(),
            category: Some("wallet".into()),
            request: TypeExpr::Record(vec![
                Field::required("Blockchain", TypeExpr::reference("Address")),
                Field::optional("Asset", TypeExpr::string()),
            ]),
            response: TypeExpr::Record(vec![
                Field::required("exists", TypeExpr::bool()),
                Field::required("address", TypeExpr::reference("Address")),
            ]),
            example_request: None,
            example_response: None,
            docs: Some("Check whether a wallet exists.".into()),
        });
        ir
    }

    #[test]
    fn client_methods_are_snake_case_with_optional_defaults() {
        let ir = sample_ir();
        let names = NameTable::build(&ir).unwrap();
        let ctx = build_context(&ir, profile_for_id("python").unwrap(), &names, None).unwrap();
        let source = client(&ctx);

        assert!(source.contains(
            "    def check_wallet(self, blockchain: Address, asset: Optional[str] = None) -> CheckWalletResponse:"
        ));
        assert!(source.contains("        if asset is not None:"));
        assert!(source.contains("            payload[\"Asset\"] = asset"));
    }

    #[test]
    fn models_use_typeddict_with_wire_compatible_keys() {
        let ir = sample_ir();
        let names = NameTable::build(&ir).unwrap();
        let ctx = build_context(&ir, profile_for_id("python").unwrap(), &names, None).unwrap();
        let source = models(&ctx);

        assert!(source.contains("Address = str"));
        assert!(source.contains("class CheckWalletResponse(TypedDict):"));
        assert!(source.contains("    exists: bool"));
        assert!(source.contains("    address: Address"));
    }
}
