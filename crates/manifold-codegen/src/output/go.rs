//! Go output backend.
//!
//! Emits a single-package client: `client.go` (client struct, one exported
//! method per endpoint, spliced helper methods), `types.go` (aliases, enum
//! string types, structs with json tags) and `client_test.go` (scaffold
//! against a mock server).

use crate::artifact::{ArtifactKind, GeneratedArtifact};
use crate::emit::{Declaration, EmitContext, EmitError, MethodSpec, ValueShape};
use crate::ident;
use crate::ir::ScalarKind;
use crate::output::{indent_fragment, json_literal};
use crate::profile::LanguageProfile;
use crate::traits::Backend;

pub struct GoBackend;

pub static GO_BACKEND: GoBackend = GoBackend;

impl Backend for GoBackend {
    fn profile(&self) -> &'static LanguageProfile {
        &crate::profiles::go::PROFILE
    }

    fn generate(&self, ctx: &EmitContext<'_>) -> Result<Vec<GeneratedArtifact>, EmitError> {
        let profile = self.profile();
        Ok(vec![
            GeneratedArtifact::new(self.id(), ArtifactKind::ClientSource, profile.client_file, client(ctx)),
            GeneratedArtifact::new(self.id(), ArtifactKind::TypeDeclarations, profile.types_file, types(ctx)),
            GeneratedArtifact::new(self.id(), ArtifactKind::TestScaffold, profile.test_file, scaffold(ctx)),
        ])
    }
}

/// Package name: lowercased first token of the API name.
fn package_name(ctx: &EmitContext<'_>) -> String {
    ident::tokenize(&ctx.class_name)
        .first()
        .map(|t| t.to_lowercase())
        .unwrap_or_else(|| "client".to_string())
}

fn client(ctx: &EmitContext<'_>) -> String {
    let package = package_name(ctx);
    let class = &ctx.class_name;
    let mut out = String::new();

    out.push_str("// Code generated by manifold. DO NOT EDIT.\n\n");
    out.push_str(&format!("package {package}\n\n"));
    out.push_str("import (\n");
    out.push_str("\t\"bytes\"\n");
    out.push_str("\t\"crypto/sha256\"\n");
    out.push_str("\t\"encoding/hex\"\n");
    out.push_str("\t\"encoding/json\"\n");
    out.push_str("\t\"errors\"\n");
    out.push_str("\t\"fmt\"\n");
    out.push_str("\t\"io\"\n");
    out.push_str("\t\"net/http\"\n");
    out.push_str("\t\"strings\"\n");
    out.push_str("\t\"time\"\n\n");
    out.push_str("\tsecp256k1 \"github.com/decred/dcrd/dcrec/secp256k1/v4\"\n");
    out.push_str("\tsecpecdsa \"github.com/decred/dcrd/dcrec/secp256k1/v4/ecdsa\"\n");
    out.push_str(")\n\n");

    out.push_str(&format!("// {class} is the generated client for the {} API.\n", ctx.ir.api.name));
    out.push_str(&format!("type {class} struct {{\n"));
    out.push_str("\tnagURL     string\n");
    out.push_str("\tnagKey     string\n");
    out.push_str("\tversion    string\n");
    out.push_str("\tlastError  string\n");
    out.push_str("\thttpClient *http.Client\n");
    out.push_str("}\n\n");

    out.push_str(&format!("// New{class} returns a client pointed at the default gateway.\n"));
    out.push_str(&format!("func New{class}() *{class} {{\n"));
    out.push_str(&format!("\treturn &{class}{{\n"));
    out.push_str(&format!("\t\tnagURL:     {},\n", json_literal(&ctx.base_url.clone().into())));
    out.push_str(&format!("\t\tversion:    {},\n", json_literal(&ctx.version.clone().into())));
    out.push_str("\t\thttpClient: http.DefaultClient,\n");
    out.push_str("\t}\n");
    out.push_str("}\n\n");

    out.push_str("type apiEnvelope struct {\n");
    out.push_str("\tResult   int             `json:\"Result\"`\n");
    out.push_str("\tResponse json.RawMessage `json:\"Response\"`\n");
    out.push_str("}\n\n");

    out.push_str(&format!("func (c *{class}) post(path string, payload map[string]any, out any) error {{\n"));
    out.push_str("\tpayload[\"Version\"] = c.version\n");
    out.push_str("\tbody, err := json.Marshal(payload)\n");
    out.push_str("\tif err != nil {\n\t\treturn err\n\t}\n");
    out.push_str("\tresp, err := c.httpClient.Post(c.nagURL+path, \"application/json\", bytes.NewReader(body))\n");
    out.push_str("\tif err != nil {\n\t\tc.lastError = err.Error()\n\t\treturn err\n\t}\n");
    out.push_str("\tdefer resp.Body.Close()\n");
    out.push_str("\traw, err := io.ReadAll(resp.Body)\n");
    out.push_str("\tif err != nil {\n\t\tc.lastError = err.Error()\n\t\treturn err\n\t}\n");
    out.push_str("\tvar envelope apiEnvelope\n");
    out.push_str("\tif err := json.Unmarshal(raw, &envelope); err != nil {\n");
    out.push_str("\t\tc.lastError = err.Error()\n\t\treturn err\n\t}\n");
    out.push_str("\tif envelope.Result != 200 {\n");
    out.push_str("\t\tc.lastError = fmt.Sprintf(\"request failed with result %d\", envelope.Result)\n");
    out.push_str("\t\treturn errors.New(c.lastError)\n\t}\n");
    out.push_str("\tif out != nil {\n");
    out.push_str("\t\tif err := json.Unmarshal(envelope.Response, out); err != nil {\n");
    out.push_str("\t\t\tc.lastError = err.Error()\n\t\t\treturn err\n\t\t}\n\t}\n");
    out.push_str("\treturn nil\n");
    out.push_str("}\n");

    for method in &ctx.methods {
        out.push('\n');
        out.push_str(&render_method(ctx, method));
    }

    if !ctx.helpers.is_empty() {
        out.push_str("\n// Shared helper methods.\n");
        for helper in &ctx.helpers {
            out.push('\n');
            out.push_str(&indent_fragment(&helper.fragment, ctx.profile.helper_indent));
        }
    }

    out
}

fn render_method(ctx: &EmitContext<'_>, method: &MethodSpec) -> String {
    let class = &ctx.class_name;
    let mut out = String::new();

    let summary = method
        .docs
        .clone()
        .unwrap_or_else(|| format!("calls the {} endpoint.", method.canonical_name));
    out.push_str(&format!("// {} {}\n", method.emitted_name, summary));

    let params: Vec<String> = method
        .params
        .iter()
        .map(|p| format!("{} {}", p.emitted_name, p.ty))
        .collect();
    out.push_str(&format!(
        "func (c *{class}) {}({}) ({}, error) {{\n",
        method.emitted_name,
        params.join(", "),
        method.response_type
    ));

    out.push_str("\tpayload := map[string]any{\n");
    for param in &method.params {
        out.push_str(&format!("\t\t\"{}\": {},\n", param.wire_name, param.emitted_name));
    }
    out.push_str("\t}\n");

    let zero = zero_value(&method.response_shape);
    out.push_str(&format!("\tvar out {}\n", method.response_type));
    out.push_str(&format!(
        "\tif err := c.post({}, payload, &out); err != nil {{\n",
        json_literal(&method.path.clone().into())
    ));
    out.push_str(&format!("\t\treturn {zero}, err\n"));
    out.push_str("\t}\n");
    out.push_str("\treturn out, nil\n");
    out.push_str("}\n");
    out
}

fn zero_value(shape: &ValueShape) -> String {
    match shape {
        ValueShape::Scalar(ScalarKind::String) | ValueShape::Enum { .. } => "\"\"".to_string(),
        ValueShape::Scalar(ScalarKind::Int) | ValueShape::Scalar(ScalarKind::Float) => {
            "0".to_string()
        }
        ValueShape::Scalar(ScalarKind::Bool) => "false".to_string(),
        ValueShape::Record { type_name } => format!("{type_name}{{}}"),
        ValueShape::ScalarList(_) | ValueShape::RecordList { .. } => "nil".to_string(),
        ValueShape::Optional(inner) => zero_value(inner),
    }
}

fn types(ctx: &EmitContext<'_>) -> String {
    let package = package_name(ctx);
    let mut out = String::new();
    out.push_str("// Code generated by manifold. DO NOT EDIT.\n\n");
    out.push_str(&format!("package {package}\n"));

    for decl in &ctx.declarations {
        out.push('\n');
        match decl {
            Declaration::Alias { name, ty, docs } => {
                if let Some(docs) = docs {
                    out.push_str(&format!("// {name} is {docs}\n"));
                }
                out.push_str(&format!("type {name} = {ty}\n"));
            }
            Declaration::Enum { name, variants, docs } => {
                if let Some(docs) = docs {
                    out.push_str(&format!("// {name} is {docs}\n"));
                }
                out.push_str(&format!("type {name} string\n\n"));
                out.push_str("const (\n");
                for variant in variants {
                    out.push_str(&format!(
                        "\t{name}{} {name} = {}\n",
                        ident::pascal(variant),
                        json_literal(&variant.clone().into())
                    ));
                }
                out.push_str(")\n");
            }
            Declaration::Record { name, fields, docs } => {
                if let Some(docs) = docs {
                    out.push_str(&format!("// {name} is {docs}\n"));
                }
                out.push_str(&format!("type {name} struct {{\n"));
                for field in fields {
                    let tag = if field.required {
                        field.wire_name.clone()
                    } else {
                        format!("{},omitempty", field.wire_name)
                    };
                    out.push_str(&format!(
                        "\t{} {} `json:\"{tag}\"`\n",
                        field.emitted_name, field.ty
                    ));
                }
                out.push_str("}\n");
            }
        }
    }
    out
}

fn scaffold(ctx: &EmitContext<'_>) -> String {
    let package = package_name(ctx);
    let class = &ctx.class_name;
    let mut out = String::new();
    out.push_str("// Code generated by manifold. DO NOT EDIT.\n\n");
    out.push_str(&format!("package {package}\n\n"));
    out.push_str("import (\n\t\"os\"\n\t\"testing\"\n)\n\n");

    out.push_str(&format!("func scaffoldClient() *{class} {{\n"));
    out.push_str(&format!("\tc := New{class}()\n"));
    out.push_str("\tbase := os.Getenv(\"MOCK_SERVER_URL\")\n");
    out.push_str("\tif base == \"\" {\n\t\tbase = \"http://localhost:8080\"\n\t}\n");
    out.push_str("\tc.nagURL = base\n");
    out.push_str("\treturn c\n}\n");

    for method in &ctx.methods {
        let args: Vec<String> = method
            .params
            .iter()
            .map(|p| go_sample(ctx, method, p))
            .collect();
        out.push('\n');
        out.push_str(&format!("func Test{}(t *testing.T) {{\n", method.emitted_name));
        out.push_str("\tc := scaffoldClient()\n");
        out.push_str(&format!(
            "\tif _, err := c.{}({}); err != nil {{\n",
            method.emitted_name,
            args.join(", ")
        ));
        out.push_str(&format!("\t\tt.Fatalf(\"{}: %v\", err)\n", method.emitted_name));
        out.push_str("\t}\n}\n");
    }
    out
}

fn go_sample(
    ctx: &EmitContext<'_>,
    method: &MethodSpec,
    param: &crate::emit::ParamSpec,
) -> String {
    let value = ctx.sample_value(method, param);
    if value.is_null() {
        return "nil".to_string();
    }
    json_literal(&value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dedup::NameTable;
    use crate::emit::build_context;
    use crate::ir::{EndpointDef, Field, HttpMethod, Ir, TypeExpr};
    use crate::profile::profile_for_id;

    fn sample_ctx_ir() -> Ir {
        let mut ir = Ir::new();
        ir.api = crate::ir::ApiInfo {
            name: "ExampleAPI".into(),
            version: "1.0.0".into(),
            default_base_url: "https://example.test/api".into(),
        };
        ir.endpoints.push(EndpointDef {
            canonical_name: "checkWallet".into(),
            http_method: HttpMethod::Post,
            path: "/checkWallet".into(),
            category: Some("wallet".into()),
            request: TypeExpr::Record(vec![
                Field::required("Blockchain", TypeExpr::string()),
                Field::required("Address", TypeExpr::string()),
            ]),
            response: TypeExpr::Record(vec![
                Field::required("exists", TypeExpr::bool()),
                Field::required("address", TypeExpr::string()),
            ]),
            example_request: None,
            example_response: None,
            docs: None,
        });
        ir
    }

    #[test]
    fn client_contains_exported_method_and_struct() {
        let ir = sample_ctx_ir();
        let names = NameTable::build(&ir).unwrap();
        let ctx = build_context(&ir, profile_for_id("go").unwrap(), &names, None).unwrap();
        let source = client(&ctx);

        assert!(source.contains("package example"));
        assert!(source.contains(
            "func (c *ExampleAPI) CheckWallet(blockchain string, address string) (CheckWalletResponse, error) {"
        ));
        assert!(source.contains("\"Blockchain\": blockchain,"));
    }

    #[test]
    fn types_emit_structs_with_json_tags() {
        let ir = sample_ctx_ir();
        let names = NameTable::build(&ir).unwrap();
        let ctx = build_context(&ir, profile_for_id("go").unwrap(), &names, None).unwrap();
        let source = types(&ctx);

        assert!(source.contains("type CheckWalletResponse struct {"));
        assert!(source.contains("\tExists bool `json:\"exists\"`"));
        assert!(source.contains("\tAddress string `json:\"address\"`"));
    }
}
