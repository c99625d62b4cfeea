use axum::http::Method;
use schemars::JsonSchema;
use serde::Serialize;
use serde_json::Value;
use shapedoc_cli::commands::schema::render;
use shapedoc_cli::{CliError, SchemaCommand};
use shapedoc_core::{ApiRouter, RouteMeta};
use shapedoc_openapi::{OpenApiConfig, OpenApiExtension};
use tempfile::TempDir;

/// A pet in the store.
#[derive(Serialize, JsonSchema)]
struct Pet {
    name: String,
}

fn app() -> ApiRouter {
    ApiRouter::new("petstore").route(
        "/pets/<int:pet_id>",
        "get_pet",
        &[Method::GET],
        || async {},
        RouteMeta::builder().response::<Pet>(200).build(),
    )
}

#[test]
fn render_is_indented_with_two_spaces() {
    let ext = OpenApiExtension::new(OpenApiConfig::new().with_title("Pets"));
    let rendered = render(&ext, &app()).unwrap();

    assert!(rendered.starts_with("{\n  \"openapi\": \"3.0.3\""));
    assert!(rendered.ends_with("}\n"));

    let doc: Value = serde_json::from_str(&rendered).unwrap();
    assert_eq!(doc["info"]["title"], "Pets");
    assert!(doc["paths"]["/pets/{pet_id}"]["get"].is_object());
}

#[test]
fn writes_document_to_file() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("openapi.json");
    let command = SchemaCommand {
        output: Some(path.clone()),
    };

    command
        .run(&OpenApiExtension::new(OpenApiConfig::new()), &app())
        .unwrap();

    let written = std::fs::read_to_string(&path).unwrap();
    let doc: Value = serde_json::from_str(&written).unwrap();
    assert_eq!(doc["info"]["title"], "petstore");
    assert_eq!(
        doc["paths"]["/pets/{pet_id}"]["get"]["responses"]["200"]["description"],
        "A pet in the store."
    );
}

#[test]
fn file_output_matches_render() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("doc.json");
    let ext = OpenApiExtension::new(OpenApiConfig::new().with_casing(true));

    SchemaCommand {
        output: Some(path.clone()),
    }
    .run(&ext, &app())
    .unwrap();

    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        render(&ext, &app()).unwrap()
    );
}

#[test]
fn unwritable_output_is_an_io_error() {
    let tmp = TempDir::new().unwrap();
    let command = SchemaCommand {
        output: Some(tmp.path().join("missing").join("doc.json")),
    };

    let err = command
        .run(&OpenApiExtension::new(OpenApiConfig::new()), &app())
        .unwrap_err();
    assert!(matches!(err, CliError::Io(_)));
    assert!(err.to_string().starts_with("cannot write output"));
}

#[derive(clap::Parser)]
struct Cli {
    #[command(flatten)]
    schema: SchemaCommand,
}

#[test]
fn parses_output_flag() {
    use clap::Parser;

    let cli = Cli::parse_from(["app", "-o", "out.json"]);
    assert_eq!(cli.schema.output.unwrap().to_str(), Some("out.json"));

    let cli = Cli::parse_from(["app"]);
    assert!(cli.schema.output.is_none());
}
