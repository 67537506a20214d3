mod common;

use common::{fixture, read_tree};
use std::fs;
use std::process::Command;
use tempfile::TempDir;

fn sdkgen() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_dotnet-sdkgen"));
    cmd.env("SDKGEN_LOG_LEVEL", "warn").env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_cli_generate_writes_sdk() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("sdk");
    let result = sdkgen()
        .arg("generate")
        .arg("--spec")
        .arg(fixture("payments.yaml"))
        .arg("--output")
        .arg(&output)
        .arg("--namespace")
        .arg("Acme.Pay")
        .output()
        .expect("run cli");
    assert!(result.status.success(), "stderr: {}", String::from_utf8_lossy(&result.stderr));

    let stdout = String::from_utf8_lossy(&result.stdout);
    assert!(stdout.contains("Wrote "));
    assert!(stdout.contains("7 models, 3 clients, 5 operations"));
    assert!(output.join("PayClient.g.cs").exists());
    assert!(output.join("Models/Payment.g.cs").exists());
}

#[test]
fn test_cli_dry_run_leaves_disk_untouched() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("sdk");
    let result = sdkgen()
        .args(["generate", "--dry-run", "--namespace", "Acme.Pay"])
        .arg("--spec")
        .arg(fixture("payments.yaml"))
        .arg("--output")
        .arg(&output)
        .output()
        .expect("run cli");
    assert!(result.status.success());
    let stdout = String::from_utf8_lossy(&result.stdout);
    assert!(stdout.contains("Would write"));
    assert!(!output.exists());
}

#[test]
fn test_cli_reads_config_beside_spec() {
    let dir = TempDir::new().unwrap();
    let spec = dir.path().join("openapi.yaml");
    fs::copy(fixture("payments.yaml"), &spec).unwrap();
    fs::write(
        dir.path().join("sdkgen.toml"),
        format!(
            "namespace = \"Contoso.Payments\"\noutput = \"{}\"\n",
            dir.path().join("generated").display().to_string().replace('\\', "/")
        ),
    )
    .unwrap();

    let result = sdkgen()
        .arg("generate")
        .arg("--spec")
        .arg(&spec)
        .output()
        .expect("run cli");
    assert!(result.status.success(), "stderr: {}", String::from_utf8_lossy(&result.stderr));

    let tree = read_tree(&dir.path().join("generated"));
    // The "Payments" tag clashes with the root client derived from the namespace.
    assert!(tree.contains_key("PaymentsClient.g.cs"));
    assert!(tree.contains_key("PaymentsApiClient.g.cs"));
    assert!(tree["PaymentsClient.g.cs"].contains("Payments = new PaymentsApiClient(apiClient);"));
    assert!(tree["Models/Payment.g.cs"].contains("namespace Contoso.Payments.Models;"));
}

#[test]
fn test_cli_missing_output_fails() {
    let result = sdkgen()
        .arg("generate")
        .arg("--spec")
        .arg(fixture("minimal.json"))
        .output()
        .expect("run cli");
    assert!(!result.status.success());
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("output directory is required"));
}

#[test]
fn test_cli_inspect_prints_summary() {
    let result = sdkgen()
        .arg("inspect")
        .arg("--spec")
        .arg(fixture("payments.yaml"))
        .arg("--namespace")
        .arg("Acme.Pay")
        .output()
        .expect("run cli");
    assert!(result.status.success());
    let stdout = String::from_utf8_lossy(&result.stdout);
    assert!(stdout.starts_with("Acme.Pay.PayClient (API version 2024-06-01)"));
    assert!(stdout.contains("ListPaymentsAsync -> IEnumerable<Payment> [json]"));
    assert!(stdout.contains("401 => Problem"));
    assert!(stdout.contains("PaymentStatus (enum, 4 members)"));
}

#[test]
fn test_cli_rejects_spec_without_operations() {
    let dir = TempDir::new().unwrap();
    let result = sdkgen()
        .arg("generate")
        .arg("--spec")
        .arg(fixture("empty.yaml"))
        .arg("--output")
        .arg(dir.path())
        .output()
        .expect("run cli");
    assert!(!result.status.success());
    assert!(String::from_utf8_lossy(&result.stderr).contains("spec contains no operations"));
}
