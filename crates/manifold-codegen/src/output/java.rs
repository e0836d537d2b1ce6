//! Java output backend.
//!
//! Emits `<Api>.java` (HttpClient-based client returning
//! `CompletableFuture`s), `Types.java` (one holder class nesting enums and
//! POJOs with `fromJson` decoders) and `<Api>Test.java` (main-method
//! scaffold against a mock server). File names track the API class name
//! because javac ties public class names to file names.

use crate::artifact::{ArtifactKind, GeneratedArtifact};
use crate::emit::{Declaration, EmitContext, EmitError, FieldDecl, MethodSpec, ValueShape};
use crate::ident;
use crate::ir::ScalarKind;
use crate::output::indent_fragment;
use crate::profile::LanguageProfile;
use crate::traits::Backend;

pub struct JavaBackend;

pub static JAVA_BACKEND: JavaBackend = JavaBackend;

impl Backend for JavaBackend {
    fn profile(&self) -> &'static LanguageProfile {
        &crate::profiles::java::PROFILE
    }

    fn generate(&self, ctx: &EmitContext<'_>) -> Result<Vec<GeneratedArtifact>, EmitError> {
        let class = &ctx.class_name;
        Ok(vec![
            GeneratedArtifact::new(
                self.id(),
                ArtifactKind::ClientSource,
                &format!("{class}.java"),
                client(ctx),
            ),
            GeneratedArtifact::new(self.id(), ArtifactKind::TypeDeclarations, "Types.java", types(ctx)),
            GeneratedArtifact::new(
                self.id(),
                ArtifactKind::TestScaffold,
                &format!("{class}Test.java"),
                scaffold(ctx),
            ),
        ])
    }
}

fn package_name(ctx: &EmitContext<'_>) -> String {
    let first = ident::tokenize(&ctx.class_name)
        .first()
        .map(|t| t.to_lowercase())
        .unwrap_or_else(|| "client".to_string());
    format!("{first}.sdk")
}

fn string_literal(s: &str) -> String {
    format!("{s:?}")
}

fn literal(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => "null".to_string(),
        serde_json::Value::Number(n) if n.is_i64() || n.is_u64() => format!("{n}L"),
        other => serde_json::to_string(other).unwrap_or_else(|_| "null".to_string()),
    }
}

/// Scaffold argument for one parameter, shaped so the literal type-checks
/// (boxed longs get an `L` suffix, doubles always carry a decimal point).
fn argument(
    ctx: &EmitContext<'_>,
    method: &MethodSpec,
    param: &crate::emit::ParamSpec,
) -> String {
    let value = ctx.sample_value(method, param);
    let base = match &param.shape {
        ValueShape::Optional(inner) => inner.as_ref(),
        other => other,
    };
    if let (ValueShape::Scalar(ScalarKind::Float), Some(n)) = (base, value.as_i64()) {
        return format!("{n}.0");
    }
    literal(&value)
}

fn client(ctx: &EmitContext<'_>) -> String {
    let class = &ctx.class_name;
    let mut out = String::new();

    out.push_str("// Generated by manifold. Do not edit.\n\n");
    out.push_str(&format!("package {};\n\n", package_name(ctx)));
    out.push_str("import java.net.URI;\n");
    out.push_str("import java.net.http.HttpClient;\n");
    out.push_str("import java.net.http.HttpRequest;\n");
    out.push_str("import java.net.http.HttpResponse;\n");
    out.push_str("import java.nio.charset.StandardCharsets;\n");
    out.push_str("import java.security.MessageDigest;\n");
    out.push_str("import java.time.ZonedDateTime;\n");
    out.push_str("import java.time.format.DateTimeFormatter;\n");
    out.push_str("import java.util.ArrayList;\n");
    out.push_str("import java.util.List;\n");
    out.push_str("import java.util.concurrent.CompletableFuture;\n\n");
    out.push_str("import org.bouncycastle.jce.ECNamedCurveTable;\n");
    out.push_str("import org.bouncycastle.jce.spec.ECNamedCurveParameterSpec;\n");
    out.push_str("import org.json.JSONArray;\n");
    out.push_str("import org.json.JSONObject;\n\n");

    out.push_str(&format!("/** Generated client for the {} API. */\n", ctx.ir.api.name));
    out.push_str(&format!("public class {class} {{\n"));
    out.push_str("    private String nagUrl;\n");
    out.push_str("    private String nagKey;\n");
    out.push_str(&format!(
        "    private final String version = {};\n",
        string_literal(&ctx.version)
    ));
    out.push_str("    private String lastError = \"\";\n");
    out.push_str("    private final HttpClient httpClient = HttpClient.newHttpClient();\n\n");

    out.push_str(&format!("    public {class}() {{\n"));
    out.push_str(&format!("        this({});\n", string_literal(&ctx.base_url)));
    out.push_str("    }\n\n");
    out.push_str(&format!("    public {class}(String baseUrl) {{\n"));
    out.push_str("        this.nagUrl = baseUrl;\n");
    out.push_str("        this.nagKey = \"\";\n");
    out.push_str("    }\n\n");

    out.push_str("    private CompletableFuture<Object> post(String path, JSONObject payload) {\n");
    out.push_str("        payload.put(\"Version\", this.version);\n");
    out.push_str("        HttpRequest request = HttpRequest.newBuilder()\n");
    out.push_str("            .uri(URI.create(this.nagUrl + path))\n");
    out.push_str("            .header(\"Content-Type\", \"application/json\")\n");
    out.push_str("            .POST(HttpRequest.BodyPublishers.ofString(payload.toString(), StandardCharsets.UTF_8))\n");
    out.push_str("            .build();\n");
    out.push_str("        return this.httpClient.sendAsync(request, HttpResponse.BodyHandlers.ofString())\n");
    out.push_str("            .thenApply(response -> {\n");
    out.push_str("                JSONObject envelope = new JSONObject(response.body());\n");
    out.push_str("                if (envelope.getInt(\"Result\") != 200) {\n");
    out.push_str("                    this.lastError = \"request failed with result \" + envelope.getInt(\"Result\");\n");
    out.push_str("                    throw new IllegalStateException(this.lastError);\n");
    out.push_str("                }\n");
    out.push_str("                return envelope.get(\"Response\");\n");
    out.push_str("            });\n");
    out.push_str("    }\n");

    for method in &ctx.methods {
        out.push('\n');
        out.push_str(&render_method(method));
    }

    for helper in &ctx.helpers {
        out.push('\n');
        out.push_str(&indent_fragment(&helper.fragment, ctx.profile.helper_indent));
    }

    out.push_str("}\n");
    out
}

fn render_method(method: &MethodSpec) -> String {
    let mut out = String::new();
    if let Some(docs) = &method.docs {
        out.push_str(&format!("    /** {docs} */\n"));
    }
    let params: Vec<String> = method
        .params
        .iter()
        .map(|p| format!("{} {}", p.ty, p.emitted_name))
        .collect();
    out.push_str(&format!(
        "    public CompletableFuture<{}> {}({}) {{\n",
        method.response_type,
        method.emitted_name,
        params.join(", ")
    ));
    out.push_str("        JSONObject payload = new JSONObject();\n");
    for param in method.params.iter().filter(|p| p.required) {
        out.push_str(&format!(
            "        payload.put({}, {});\n",
            string_literal(&param.wire_name),
            param.emitted_name
        ));
    }
    for param in method.params.iter().filter(|p| !p.required) {
        out.push_str(&format!("        if ({} != null) {{\n", param.emitted_name));
        out.push_str(&format!(
            "            payload.put({}, {});\n",
            string_literal(&param.wire_name),
            param.emitted_name
        ));
        out.push_str("        }\n");
    }
    out.push_str(&format!(
        "        return this.post({}, payload)\n",
        string_literal(&method.path)
    ));
    out.push_str(&decode_response(&method.response_shape));
    out.push_str("    }\n");
    out
}

/// Render the `.thenApply` decode step for a response shape.
fn decode_response(shape: &ValueShape) -> String {
    match shape {
        ValueShape::Record { type_name } => format!(
            "            .thenApply(response -> Types.{type_name}.fromJson((JSONObject) response));\n"
        ),
        ValueShape::Scalar(kind) => {
            format!("            .thenApply(response -> {});\n", scalar_cast(*kind, "response"))
        }
        ValueShape::Enum { type_name, .. } => format!(
            "            .thenApply(response -> Types.{type_name}.fromValue((String) response));\n"
        ),
        ValueShape::RecordList { type_name } => {
            let mut out = String::new();
            out.push_str("            .thenApply(response -> {\n");
            out.push_str("                JSONArray array = (JSONArray) response;\n");
            out.push_str(&format!(
                "                List<Types.{type_name}> items = new ArrayList<>();\n"
            ));
            out.push_str("                for (int i = 0; i < array.length(); i++) {\n");
            out.push_str(&format!(
                "                    items.add(Types.{type_name}.fromJson(array.getJSONObject(i)));\n"
            ));
            out.push_str("                }\n");
            out.push_str("                return items;\n");
            out.push_str("            });\n");
            out
        }
        ValueShape::ScalarList(kind) => {
            let (boxed, getter) = scalar_list_parts(*kind);
            let mut out = String::new();
            out.push_str("            .thenApply(response -> {\n");
            out.push_str("                JSONArray array = (JSONArray) response;\n");
            out.push_str(&format!("                List<{boxed}> items = new ArrayList<>();\n"));
            out.push_str("                for (int i = 0; i < array.length(); i++) {\n");
            out.push_str(&format!("                    items.add(array.{getter}(i));\n"));
            out.push_str("                }\n");
            out.push_str("                return items;\n");
            out.push_str("            });\n");
            out
        }
        ValueShape::Optional(inner) => decode_response(inner),
    }
}

fn scalar_cast(kind: ScalarKind, expr: &str) -> String {
    match kind {
        ScalarKind::String => format!("(String) {expr}"),
        ScalarKind::Int => format!("((Number) {expr}).longValue()"),
        ScalarKind::Float => format!("((Number) {expr}).doubleValue()"),
        ScalarKind::Bool => format!("(Boolean) {expr}"),
    }
}

fn scalar_list_parts(kind: ScalarKind) -> (&'static str, &'static str) {
    match kind {
        ScalarKind::String => ("String", "getString"),
        ScalarKind::Int => ("Long", "getLong"),
        ScalarKind::Float => ("Double", "getDouble"),
        ScalarKind::Bool => ("Boolean", "getBoolean"),
    }
}

fn types(ctx: &EmitContext<'_>) -> String {
    let mut out = String::new();
    out.push_str("// Generated by manifold. Do not edit.\n\n");
    out.push_str(&format!("package {};\n\n", package_name(ctx)));
    out.push_str("import java.util.ArrayList;\n");
    out.push_str("import java.util.List;\n\n");
    out.push_str("import org.json.JSONArray;\n");
    out.push_str("import org.json.JSONObject;\n\n");
    out.push_str(&format!("/** Generated data types for the {} API. */\n", ctx.ir.api.name));
    out.push_str("public final class Types {\n");
    out.push_str("    private Types() {}\n");

    for decl in &ctx.declarations {
        match decl {
            // Aliases are resolved away for Java by the type mapper.
            Declaration::Alias { .. } => {}
            Declaration::Enum { name, variants, docs } => {
                out.push('\n');
                if let Some(docs) = docs {
                    out.push_str(&format!("    /** {docs} */\n"));
                }
                out.push_str(&format!("    public enum {name} {{\n"));
                let constants: Vec<String> = variants
                    .iter()
                    .map(|v| format!("        {}({})", v.to_uppercase(), string_literal(v)))
                    .collect();
                out.push_str(&constants.join(",\n"));
                out.push_str(";\n\n");
                out.push_str("        private final String value;\n\n");
                out.push_str(&format!("        {name}(String value) {{\n"));
                out.push_str("            this.value = value;\n");
                out.push_str("        }\n\n");
                out.push_str("        public String value() {\n");
                out.push_str("            return this.value;\n");
                out.push_str("        }\n\n");
                out.push_str(&format!("        public static {name} fromValue(String value) {{\n"));
                out.push_str(&format!("            for ({name} item : values()) {{\n"));
                out.push_str("                if (item.value.equals(value)) {\n");
                out.push_str("                    return item;\n");
                out.push_str("                }\n");
                out.push_str("            }\n");
                out.push_str("            throw new IllegalArgumentException(\"unknown value: \" + value);\n");
                out.push_str("        }\n");
                out.push_str("    }\n");
            }
            Declaration::Record { name, fields, docs } => {
                out.push('\n');
                if let Some(docs) = docs {
                    out.push_str(&format!("    /** {docs} */\n"));
                }
                out.push_str(&format!("    public static final class {name} {{\n"));
                for field in fields {
                    out.push_str(&format!("        public {} {};\n", field.ty, field.emitted_name));
                }
                out.push('\n');
                out.push_str(&format!("        public static {name} fromJson(JSONObject json) {{\n"));
                out.push_str(&format!("            {name} out = new {name}();\n"));
                for field in fields {
                    out.push_str(&decode_field(field));
                }
                out.push_str("            return out;\n");
                out.push_str("        }\n");
                out.push_str("    }\n");
            }
        }
    }

    out.push_str("}\n");
    out
}

fn decode_field(field: &FieldDecl) -> String {
    let key = string_literal(&field.wire_name);
    let target = &field.emitted_name;
    let shape = match &field.shape {
        ValueShape::Optional(inner) => inner.as_ref(),
        other => other,
    };
    match shape {
        ValueShape::Scalar(kind) => {
            let getter = match kind {
                ScalarKind::String => "getString",
                ScalarKind::Int => "getLong",
                ScalarKind::Float => "getDouble",
                ScalarKind::Bool => "getBoolean",
            };
            format!(
                "            if (json.has({key})) {{\n                out.{target} = json.{getter}({key});\n            }}\n"
            )
        }
        ValueShape::Enum { type_name, .. } => format!(
            "            if (json.has({key})) {{\n                out.{target} = {type_name}.fromValue(json.getString({key}));\n            }}\n"
        ),
        ValueShape::Record { type_name } => format!(
            "            if (json.has({key})) {{\n                out.{target} = {type_name}.fromJson(json.getJSONObject({key}));\n            }}\n"
        ),
        ValueShape::ScalarList(kind) => {
            let (boxed, getter) = scalar_list_parts(*kind);
            let mut out = String::new();
            out.push_str(&format!("            if (json.has({key})) {{\n"));
            out.push_str(&format!(
                "                JSONArray {target}Array = json.getJSONArray({key});\n"
            ));
            out.push_str(&format!(
                "                List<{boxed}> {target}Items = new ArrayList<>();\n"
            ));
            out.push_str(&format!(
                "                for (int i = 0; i < {target}Array.length(); i++) {{\n"
            ));
            out.push_str(&format!(
                "                    {target}Items.add({target}Array.{getter}(i));\n"
            ));
            out.push_str("                }\n");
            out.push_str(&format!("                out.{target} = {target}Items;\n"));
            out.push_str("            }\n");
            out
        }
        ValueShape::RecordList { type_name } => {
            let mut out = String::new();
            out.push_str(&format!("            if (json.has({key})) {{\n"));
            out.push_str(&format!(
                "                JSONArray {target}Array = json.getJSONArray({key});\n"
            ));
            out.push_str(&format!(
                "                List<{type_name}> {target}Items = new ArrayList<>();\n"
            ));
            out.push_str(&format!(
                "                for (int i = 0; i < {target}Array.length(); i++) {{\n"
            ));
            out.push_str(&format!(
                "                    {target}Items.add({type_name}.fromJson({target}Array.getJSONObject(i)));\n"
            ));
            out.push_str("                }\n");
            out.push_str(&format!("                out.{target} = {target}Items;\n"));
            out.push_str("            }\n");
            out
        }
        ValueShape::Optional(_) => String::new(),
    }
}

fn scaffold(ctx: &EmitContext<'_>) -> String {
    let class = &ctx.class_name;
    let mut out = String::new();
    out.push_str("// Generated by manifold. Do not edit.\n\n");
    out.push_str(&format!("package {};\n\n", package_name(ctx)));
    out.push_str("/** Exercises every generated method against a mock server. */\n");
    out.push_str(&format!("public final class {class}Test {{\n"));
    out.push_str("    public static void main(String[] args) throws Exception {\n");
    out.push_str("        String baseUrl = System.getenv().getOrDefault(\"MOCK_SERVER_URL\", \"http://localhost:8080\");\n");
    out.push_str(&format!("        {class} client = new {class}(baseUrl);\n\n"));

    for method in &ctx.methods {
        let args: Vec<String> = method
            .params
            .iter()
            .map(|p| argument(ctx, method, p))
            .collect();
        out.push_str(&format!(
            "        if (client.{}({}).get() == null) {{\n",
            method.emitted_name,
            args.join(", ")
        ));
        out.push_str(&format!(
            "            throw new AssertionError({});\n",
            string_literal(&format!("{} returned null", method.emitted_name))
        ));
        out.push_str("        }\n");
    }

    out.push_str(&format!(
        "\n        System.out.println(\"ok: {} methods exercised\");\n",
        ctx.methods.len()
    ));
    out.push_str("    }\n");
    out.push_str("}\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dedup::NameTable;
    use crate::emit::build_context;
    use crate::ir::{EndpointDef, Field, HttpMethod, Ir, TypeDef, TypeExpr};
    use crate::profile::profile_for_id;

    fn sample_ir() -> Ir {
        let mut ir = Ir::new();
        ir.api = crate::ir::ApiInfo {
            name: "ExampleAPI".into(),
            version: "1.0.0".into(),
            default_base_url: "https://example.test/api".into(),
        };
        ir.types.push(TypeDef::string_enum(
            "TransactionStatus",
            vec!["pending", "confirmed"],
        ));
        ir.endpoints.push(EndpointDef {
            canonical_name: "getPendingTransaction".into(),
            http_method: HttpMethod::Post,
            path: "/getPendingTransaction".into(),
            category: Some("transaction".into()),
            request: TypeExpr::Record(vec![Field::required("ID", TypeExpr::string())]),
            response: TypeExpr::Record(vec![
                Field::required("TransactionID", TypeExpr::string()),
                Field::required("Status", TypeExpr::reference("TransactionStatus")),
            ]),
            example_request: None,
            example_response: None,
            docs: None,
        });
        ir
    }

    #[test]
    fn methods_return_completable_futures_of_nested_types() {
        let ir = sample_ir();
        let names = NameTable::build(&ir).unwrap();
        let ctx = build_context(&ir, profile_for_id("java").unwrap(), &names, None).unwrap();
        let source = client(&ctx);

        assert!(source.contains(
            "    public CompletableFuture<Types.GetPendingTransactionResponse> getPendingTransaction(String id) {"
        ));
        assert!(source.contains("Types.GetPendingTransactionResponse.fromJson((JSONObject) response)"));
    }

    #[test]
    fn types_nest_enums_with_from_value() {
        let ir = sample_ir();
        let names = NameTable::build(&ir).unwrap();
        let ctx = build_context(&ir, profile_for_id("java").unwrap(), &names, None).unwrap();
        let source = types(&ctx);

        assert!(source.contains("    public enum TransactionStatus {"));
        assert!(source.contains("        PENDING(\"pending\")"));
        assert!(source.contains("out.status = TransactionStatus.fromValue(json.getString(\"Status\"));"));
    }
}
