mod common;

use common::{fixture, generate, read_tree};
use dotnet_sdkgen::generator::{build_sdk, ResponseMode};
use dotnet_sdkgen::{load_spec, GenerateError, GenerateOptions, GeneratorConfig};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_generates_expected_file_set() {
    let dir = TempDir::new().unwrap();
    let report = generate("payments.yaml", dir.path(), "Acme.Pay", false);
    let tree = read_tree(dir.path());
    let names: Vec<&str> = tree.keys().map(String::as_str).collect();
    assert_eq!(
        names,
        vec![
            "CoreClient.g.cs",
            "Http/ApiVersion.g.cs",
            "MerchantClient.g.cs",
            "Models/Entity.g.cs",
            "Models/MerchantWhoAmIResponse.g.cs",
            "Models/MerchantWhoAmIResponseSettings.g.cs",
            "Models/Payment.g.cs",
            "Models/PaymentRequest.g.cs",
            "Models/PaymentStatus.g.cs",
            "Models/Problem.g.cs",
            "PayClient.g.cs",
            "PaymentsClient.g.cs",
        ]
    );
    assert_eq!(report.files.len(), 12);
    assert_eq!(report.models, 7);
    assert_eq!(report.clients, 3);
    assert_eq!(report.operations, 5);
    assert!(tree["Http/ApiVersion.g.cs"].contains("public const string Value = \"2024-06-01\";"));
}

#[test]
fn test_rerun_is_byte_identical() {
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();
    generate("payments.yaml", first.path(), "Acme.Pay", false);
    generate("payments.yaml", second.path(), "Acme.Pay", false);
    generate("payments.yaml", second.path(), "Acme.Pay", false);
    assert_eq!(read_tree(first.path()), read_tree(second.path()));
}

#[test]
fn test_payment_model_merges_all_of() {
    let dir = TempDir::new().unwrap();
    generate("payments.yaml", dir.path(), "Acme.Pay", false);
    let payment = fs::read_to_string(dir.path().join("Models/Payment.g.cs")).unwrap();

    assert!(payment.contains("namespace Acme.Pay.Models;"));
    assert!(payment.contains("/// <summary>A payment &lt;with&gt; details &amp; more.</summary>"));
    assert!(payment.contains("public double Amount { get; set; }"));
    assert!(payment.contains("public DateTimeOffset? CreatedAt { get; set; }"));
    assert!(payment.contains("public string Id { get; set; } = default!;"));
    assert!(payment.contains("public IDictionary<string, string>? Metadata { get; set; }"));
    assert!(payment.contains("public string? Note { get; set; }"));
    assert!(payment.contains("public PaymentStatus Status { get; set; }"));
    assert_eq!(payment.matches("[JsonPropertyName(\"id\")]").count(), 1);
    assert!(!dir.path().join("Models/Amount.g.cs").exists());
}

#[test]
fn test_enum_and_open_model() {
    let dir = TempDir::new().unwrap();
    generate("payments.yaml", dir.path(), "Acme.Pay", false);
    let status = fs::read_to_string(dir.path().join("Models/PaymentStatus.g.cs")).unwrap();
    assert!(status.contains("[EnumMember(Value = \"PENDING\")]\n    Pending,"));
    assert!(status.contains("[EnumMember(Value = \"pending\")]\n    Pending2,"));

    let request = fs::read_to_string(dir.path().join("Models/PaymentRequest.g.cs")).unwrap();
    assert!(request.contains("[JsonExtensionData]"));
    assert!(request.contains("public IDictionary<string, JsonElement>? AdditionalProperties { get; set; }"));

    let problem = fs::read_to_string(dir.path().join("Models/Problem.g.cs")).unwrap();
    assert!(problem.contains("public override string ToString()"));
}

#[test]
fn test_payments_client_operations() {
    let doc = load_spec(&fixture("payments.yaml")).unwrap();
    let sdk = build_sdk(&doc, &GeneratorConfig::new("out", "Acme.Pay")).unwrap();
    let client = sdk.client("Payments").unwrap();
    let names: Vec<&str> = client.operations.iter().map(|op| op.method_name.as_str()).collect();
    assert_eq!(
        names,
        vec!["CreatePayment", "GetMerchantsMerchantCodePaymentsIdReceipt", "ListPayments"]
    );

    let list = &client.operations[2];
    let signatures: Vec<&str> = list.parameters.iter().map(|p| p.signature.as_str()).collect();
    assert_eq!(
        signatures,
        vec![
            "string merchantCode",
            "int? limit = null",
            "IEnumerable<PaymentStatus>? statuses = null"
        ]
    );
    assert_eq!(list.return_type, "IEnumerable<Payment>");
    assert_eq!(list.error_mappings.len(), 1);
    assert_eq!(list.error_mappings[0].switch_pattern(), "401");
    assert_eq!(list.error_mappings[0].error_type, "Problem");
    assert_eq!(list.parameters[0].description, "Short merchant identifier.");

    let create = &client.operations[0];
    let signatures: Vec<&str> = create.parameters.iter().map(|p| p.signature.as_str()).collect();
    assert_eq!(
        signatures,
        vec!["string merchantCode", "Guid idempotencyKey", "PaymentRequest body"]
    );
    assert_eq!(create.return_type, "Payment");
    assert!(create.has_default_error());

    let receipt = &client.operations[1];
    assert_eq!(receipt.response_mode, ResponseMode::Text);
    assert_eq!(receipt.return_type, "string");

    let health = &sdk.client("Core").unwrap().operations[0];
    assert_eq!(health.method_name, "Health");
    assert_eq!(health.response_mode, ResponseMode::None);

    let me = &sdk.client("Merchant").unwrap().operations[0];
    assert_eq!(me.method_name, "WhoAmI");
    assert_eq!(me.return_type, "MerchantWhoAmIResponse");
}

#[test]
fn test_client_file_contents() {
    let dir = TempDir::new().unwrap();
    generate("payments.yaml", dir.path(), "Acme.Pay", false);
    let client = fs::read_to_string(dir.path().join("PaymentsClient.g.cs")).unwrap();
    assert!(client.contains("namespace Acme.Pay;"));
    assert!(client.contains("using System.Collections.Generic;"));
    assert!(client.contains("builder.AddHeader(\"Idempotency-Key\", idempotencyKey);"));
    assert!(client.contains("builder.AddQuery(\"statuses\", statuses);"));
    assert!(!client.contains("session"));
    assert!(client.contains("_client.SendAsync<Payment>(request, body, \"application/json\", cancellationToken);"));
    assert!(client.contains("401 => typeof(Problem),"));
    assert!(client.contains("_ => typeof(Problem),"));

    let root = fs::read_to_string(dir.path().join("PayClient.g.cs")).unwrap();
    assert!(root.contains("public partial class PayClient"));
    assert!(root.contains("public CoreClient Core { get; private set; } = null!;"));
    assert!(root.contains("Payments = new PaymentsClient(apiClient);"));
}

#[test]
fn test_cleanup_replaces_stale_files_but_keeps_build_output() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("Models")).unwrap();
    fs::create_dir_all(root.join("obj/Debug")).unwrap();
    fs::write(root.join("Models/Removed.g.cs"), "// stale").unwrap();
    fs::write(root.join("ApiClient.cs"), "// hand written").unwrap();
    fs::write(root.join("obj/Debug/Keep.g.cs"), "// build output").unwrap();

    let report = generate("payments.yaml", root, "Acme.Pay", false);
    assert_eq!(report.removed, vec![root.join("Models/Removed.g.cs")]);
    assert!(!root.join("Models/Removed.g.cs").exists());
    assert!(root.join("ApiClient.cs").exists());
    assert!(root.join("obj/Debug/Keep.g.cs").exists());
}

#[test]
fn test_dry_run_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("sdk");
    let report = generate("payments.yaml", &output, "Acme.Pay", true);
    assert!(report.dry_run);
    assert_eq!(report.files.len(), 12);
    assert!(!output.exists());
}

#[test]
fn test_minimal_json_spec_defaults() {
    let dir = TempDir::new().unwrap();
    let report = generate("minimal.json", dir.path(), "", false);
    assert_eq!(report.clients, 1);
    let tree = read_tree(dir.path());
    assert!(tree.contains_key("SdkClient.g.cs"));
    assert!(tree["CoreClient.g.cs"].contains("public Task<ApiResponse<string>> GetPingAsync("));
    assert!(tree["Http/ApiVersion.g.cs"].contains("\"1.0.0\""));
}

#[test]
fn test_spec_without_operations_is_rejected() {
    let dir = TempDir::new().unwrap();
    let config = GeneratorConfig::new(dir.path(), "Acme");
    let err = dotnet_sdkgen::generate_sdk_from_spec(&fixture("empty.yaml"), &config, GenerateOptions::default())
        .unwrap_err();
    assert!(matches!(err, GenerateError::NoOperations));
    assert!(read_tree(dir.path()).is_empty());
}
