//! Unit tests for CLI commands

use crate::cli::{describe_sdk, Cli, Commands};
use crate::config::GeneratorConfig;
use crate::generator::build_sdk;
use crate::spec::ApiDocument;
use clap::Parser;
use serde_json::json;

#[test]
fn test_generate_command_parses() {
    let cli = Cli::try_parse_from([
        "dotnet-sdkgen",
        "generate",
        "--spec",
        "openapi.yaml",
        "--output",
        "out",
        "--namespace",
        "Acme.Payments",
        "--dry-run",
    ])
    .unwrap();

    match cli.command {
        Commands::Generate {
            spec,
            output,
            namespace,
            config,
            dry_run,
        } => {
            assert_eq!(spec.to_string_lossy(), "openapi.yaml");
            assert_eq!(output.unwrap().to_string_lossy(), "out");
            assert_eq!(namespace.as_deref(), Some("Acme.Payments"));
            assert!(config.is_none());
            assert!(dry_run);
        }
        _ => panic!("Expected Generate command"),
    }
}

#[test]
fn test_generate_requires_spec() {
    assert!(Cli::try_parse_from(["dotnet-sdkgen", "generate", "--output", "out"]).is_err());
}

#[test]
fn test_inspect_command_with_global_verbose() {
    let cli = Cli::try_parse_from(["dotnet-sdkgen", "inspect", "-s", "api.json", "--verbose"]).unwrap();
    assert!(cli.verbose);
    match cli.command {
        Commands::Inspect { spec, .. } => assert_eq!(spec.to_string_lossy(), "api.json"),
        _ => panic!("Expected Inspect command"),
    }
}

#[test]
fn test_describe_sdk_lists_clients_and_models() {
    let doc = ApiDocument::from_value(json!({
        "openapi": "3.1.0",
        "info": { "title": "Pets", "version": "1.2.3" },
        "paths": {
            "/pets": { "get": { "operationId": "listPets", "tags": ["pets"], "responses": {
                "200": { "description": "ok", "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Pet" } } } }
            } } }
        },
        "components": { "schemas": { "Pet": { "type": "object", "properties": { "name": { "type": "string" } } } } }
    }))
    .unwrap();
    let sdk = build_sdk(&doc, &GeneratorConfig::new(".", "Acme.Pets")).unwrap();
    let text = describe_sdk(&sdk);
    assert!(text.starts_with("Acme.Pets.PetsClient (API version 1.2.3)"));
    assert!(text.contains("\nPetsApiClient\n"));
    assert!(text.contains("ListPetsAsync -> Pet [json]"));
    assert!(text.contains("Pet (class, 1 properties)"));
}
