//! Integration tests for the stw CLI
//!
//! These tests exercise the CLI commands end-to-end using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use rust_decimal::Decimal;
use std::fs;
use tempfile::TempDir;

/// Helper to get an stw command
fn stw() -> Command {
    let mut cmd = Command::cargo_bin("stw").unwrap();
    cmd.env_remove("STW_CURRENCY").env("STW_AUTHOR", "Test Author");
    cmd
}

/// Helper to create a test project in a temp directory
fn setup_test_project() -> TempDir {
    let tmp = TempDir::new().unwrap();
    stw().current_dir(tmp.path()).arg("init").assert().success();
    tmp
}

/// Helper to create a draft; it becomes PRP@1 in a fresh project
fn create_test_draft(tmp: &TempDir, title: &str) {
    stw()
        .current_dir(tmp.path())
        .args(["new", "--title", title, "--customer", "Acme Mutfak", "--no-edit"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created proposal PRP@1"));
}

fn set(tmp: &TempDir, field: &str, value: &str) {
    stw()
        .current_dir(tmp.path())
        .args(["set", "PRP@1", field, value])
        .assert()
        .success();
}

fn calc_tsv(tmp: &TempDir) -> String {
    let output = stw()
        .current_dir(tmp.path())
        .args(["calc", "PRP@1", "-f", "tsv"])
        .output()
        .unwrap();
    assert!(output.status.success());
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn json_decimal(value: &serde_json::Value) -> Decimal {
    value.as_str().unwrap().parse().unwrap()
}

fn draft_files(tmp: &TempDir) -> Vec<std::path::PathBuf> {
    fs::read_dir(tmp.path().join("proposals"))
        .unwrap()
        .map(|e| e.unwrap().path())
        .filter(|p| p.to_string_lossy().ends_with(".stw.yaml"))
        .collect()
}

// ============================================================================
// Init Command Tests
// ============================================================================

#[test]
fn test_init_creates_project_structure() {
    let tmp = TempDir::new().unwrap();

    stw()
        .current_dir(tmp.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized stoneworks project"));

    assert!(tmp.path().join(".stw").is_dir());
    assert!(tmp.path().join(".stw/config.yaml").is_file());
    assert!(tmp.path().join("proposals").is_dir());
}

#[test]
fn test_init_twice_reports_existing_project() {
    let tmp = setup_test_project();

    stw()
        .current_dir(tmp.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn test_commands_outside_project_fail() {
    let tmp = TempDir::new().unwrap();

    stw()
        .current_dir(tmp.path())
        .arg("list")
        .assert()
        .failure();
}

// ============================================================================
// New / Set / Calc Tests
// ============================================================================

#[test]
fn test_new_creates_draft_file() {
    let tmp = setup_test_project();
    create_test_draft(&tmp, "Kitchen Countertop");

    let files = draft_files(&tmp);
    assert_eq!(files.len(), 1);
    let content = fs::read_to_string(&files[0]).unwrap();
    assert!(content.contains("Kitchen Countertop"));
    assert!(content.contains("Acme Mutfak"));
    assert!(content.contains("Test Author"));
}

#[test]
fn test_new_rejects_unknown_currency() {
    let tmp = setup_test_project();

    stw()
        .current_dir(tmp.path())
        .args(["new", "--title", "X", "--currency", "GBP", "--no-edit"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown currency"));
}

#[test]
fn test_empty_draft_prices_to_zero() {
    let tmp = setup_test_project();
    create_test_draft(&tmp, "Empty");

    let out = calc_tsv(&tmp);
    assert!(out.contains("summary\tgeneral_cost\t\t\t\t0\t0"), "{}", out);
    assert!(out.contains("summary\tfinal_total\t\t\t\t0\t0"), "{}", out);
}

#[test]
fn test_product_line_cost() {
    let tmp = setup_test_project();
    create_test_draft(&tmp, "Product");

    set(&tmp, "product.0.stone_fee", "100");
    set(&tmp, "product.0.plate_count", "5");

    let out = calc_tsv(&tmp);
    assert!(out.contains("product\t-\t5\t100\t\t500\t600"), "{}", out);
}

#[test]
fn test_overhead_duration_and_consumables() {
    let tmp = setup_test_project();
    create_test_draft(&tmp, "Services");

    set(&tmp, "service.atelier_overhead.duration", "2");

    let out = calc_tsv(&tmp);
    assert!(out.contains("service\tatelier_overhead\t1\t6350\t2\t12700\t12700"), "{}", out);
    assert!(out.contains("service\tconsumables\t"), "{}", out);
    assert!(out.contains("\t635\t762"), "{}", out);
}

#[test]
fn test_full_pricing_summary() {
    let tmp = setup_test_project();
    create_test_draft(&tmp, "Summary");

    set(&tmp, "product.0.stone_fee", "100");
    set(&tmp, "product.0.plate_count", "5");
    set(&tmp, "service.atelier_overhead.duration", "2");

    // general = 500 + 12700 + 635, vat = 600 + 12700 + 762
    let out = calc_tsv(&tmp);
    assert!(out.contains("summary\tgeneral_cost\t\t\t\t13835\t14062"), "{}", out);
    assert!(out.contains("summary\tprofit_total\t\t\t\t22136\t22136"), "{}", out);
    assert!(out.contains("summary\tfinal_total\t\t\t\t26563.2\t26563.2"), "{}", out);
}

#[test]
fn test_calc_profit_override_does_not_touch_draft() {
    let tmp = setup_test_project();
    create_test_draft(&tmp, "Override");
    set(&tmp, "product.0.stone_fee", "100");
    set(&tmp, "product.0.plate_count", "1");

    stw()
        .current_dir(tmp.path())
        .args(["calc", "PRP@1", "--profit", "2", "-f", "tsv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("summary\tprofit_total\t\t\t\t200\t200"));

    let out = calc_tsv(&tmp);
    assert!(out.contains("summary\tprofit_total\t\t\t\t160\t160"), "{}", out);
}

#[test]
fn test_lenient_numbers_in_set() {
    let tmp = setup_test_project();
    create_test_draft(&tmp, "Lenient");

    set(&tmp, "product.0.stone_fee", "12,5");
    set(&tmp, "product.0.plate_count", "2");

    let out = calc_tsv(&tmp);
    assert!(out.contains("product\t-\t2\t12.5\t\t25\t30"), "{}", out);

    set(&tmp, "product.0.stone_fee", "abc");
    let out = calc_tsv(&tmp);
    assert!(out.contains("product\t-\t2\t0\t\t0\t0"), "{}", out);
}

#[test]
fn test_external_service_duration_zero_counts_once() {
    let tmp = setup_test_project();
    create_test_draft(&tmp, "External");

    set(&tmp, "external.0.name", "Crane");
    set(&tmp, "external.0.quantity", "2");
    set(&tmp, "external.0.unit_price", "300");
    set(&tmp, "external.0.duration", "0");

    let out = calc_tsv(&tmp);
    assert!(out.contains("external\tCrane\t2\t300\t1\t600\t720"), "{}", out);
}

#[test]
fn test_set_rejects_derived_field() {
    let tmp = setup_test_project();
    create_test_draft(&tmp, "Derived");

    stw()
        .current_dir(tmp.path())
        .args(["set", "PRP@1", "service.consumables.total", "5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("computed"));
}

#[test]
fn test_set_out_of_range_line_fails() {
    let tmp = setup_test_project();
    create_test_draft(&tmp, "Range");

    stw()
        .current_dir(tmp.path())
        .args(["set", "PRP@1", "product.3.stone_fee", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn test_set_remove_line() {
    let tmp = setup_test_project();
    create_test_draft(&tmp, "Remove");
    set(&tmp, "product.0.stone_fee", "100");
    set(&tmp, "product.0.plate_count", "5");

    stw()
        .current_dir(tmp.path())
        .args(["set", "PRP@1", "product.0", "--remove"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed"));

    let out = calc_tsv(&tmp);
    assert!(!out.contains("product\t"), "{}", out);
}

#[test]
fn test_calc_json_output() {
    let tmp = setup_test_project();
    create_test_draft(&tmp, "Json");
    set(&tmp, "product.0.stone_fee", "100");
    set(&tmp, "product.0.plate_count", "5");

    let output = stw()
        .current_dir(tmp.path())
        .args(["calc", "PRP@1", "-f", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["title"], "Json");
    assert_eq!(json["currency"], "TRY");
    assert_eq!(json_decimal(&json["products"][0]["actual"]), Decimal::from(500));
    assert!(json["summary"]["final_total"].is_string());
    assert!(json["services"]["per_service"]["consumables"].is_object());
}

#[test]
fn test_calc_out_of_range_fee_counts_as_zero() {
    let tmp = setup_test_project();
    create_test_draft(&tmp, "Huge");

    let file = &draft_files(&tmp)[0];
    let content = fs::read_to_string(file).unwrap();
    fs::write(file, content.replace("products: []", "products:\n  - stone_fee: \"1e28\"\n    plate_count: 100")).unwrap();

    let out = calc_tsv(&tmp);
    assert!(out.contains("product\t-\t100\t0\t\t0\t0"), "{}", out);

    stw()
        .current_dir(tmp.path())
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("product.0.stone_fee"))
        .stdout(predicate::str::contains("above"));
}

#[test]
fn test_calc_huge_configured_rate_does_not_crash() {
    let tmp = setup_test_project();
    fs::write(
        tmp.path().join(".stw/config.yaml"),
        "rates:\n  labor: \"79228162514264337593543950335\"\n",
    )
    .unwrap();
    create_test_draft(&tmp, "Rates");
    set(&tmp, "service.labor.total", "1000");
    set(&tmp, "service.labor.duration", "1000");

    stw()
        .current_dir(tmp.path())
        .args(["calc", "PRP@1", "-f", "json"])
        .assert()
        .success();
}

#[test]
fn test_calc_human_output_uses_local_money_format() {
    let tmp = setup_test_project();
    create_test_draft(&tmp, "Money");
    set(&tmp, "service.atelier_overhead.duration", "2");

    stw()
        .current_dir(tmp.path())
        .args(["calc", "PRP@1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("₺12.700,00"))
        .stdout(predicate::str::contains("Summary"))
        .stdout(predicate::str::contains("Profit"));
}

// ============================================================================
// Item / Tax on a draft
// ============================================================================

#[test]
fn test_draft_items_and_tax() {
    let tmp = setup_test_project();
    create_test_draft(&tmp, "Items");

    set(&tmp, "item.0.product", "Calacatta");
    set(&tmp, "item.0.width", "60");
    set(&tmp, "item.0.length", "300");
    set(&tmp, "item.0.quantity", "2");
    set(&tmp, "item.0.unit_price", "1000");
    set(&tmp, "item.0.labor_cost", "250");

    let out = calc_tsv(&tmp);
    assert!(out.contains("item\tCalacatta\t3.6\t\t\t4210\t"), "{}", out);

    let output = stw()
        .current_dir(tmp.path())
        .args(["calc", "PRP@1", "-f", "json"])
        .output()
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json_decimal(&json["tax"]["tax_amount"]), Decimal::from(842));
    assert_eq!(json_decimal(&json["tax"]["grand_total"]), Decimal::from(5052));
}

// ============================================================================
// List Command Tests
// ============================================================================

#[test]
fn test_list_empty_project() {
    let tmp = setup_test_project();

    stw()
        .current_dir(tmp.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No proposals found"));
}

#[test]
fn test_list_shows_short_ids_and_totals() {
    let tmp = setup_test_project();
    create_test_draft(&tmp, "Bathroom Vanity");
    set(&tmp, "product.0.stone_fee", "100");
    set(&tmp, "product.0.plate_count", "5");

    stw()
        .current_dir(tmp.path())
        .args(["list", "-f", "tsv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("PRP@1\t"))
        .stdout(predicate::str::contains("Bathroom Vanity\tAcme Mutfak\t500\t960"));
}

#[test]
fn test_list_count() {
    let tmp = setup_test_project();
    create_test_draft(&tmp, "One");
    stw()
        .current_dir(tmp.path())
        .args(["new", "--title", "Two", "--no-edit"])
        .assert()
        .success();

    stw()
        .current_dir(tmp.path())
        .args(["list", "--count"])
        .assert()
        .success()
        .stdout(predicate::str::diff("2\n"));
}

#[test]
fn test_list_skips_broken_drafts() {
    let tmp = setup_test_project();
    create_test_draft(&tmp, "Good");
    fs::write(tmp.path().join("proposals/PRP-BROKEN.stw.yaml"), "title: [broken\n").unwrap();

    stw()
        .current_dir(tmp.path())
        .args(["list", "--count"])
        .assert()
        .success()
        .stdout(predicate::str::diff("1\n"));
}

// ============================================================================
// Validate Command Tests
// ============================================================================

#[test]
fn test_validate_clean_project() {
    let tmp = setup_test_project();
    create_test_draft(&tmp, "Clean");

    stw()
        .current_dir(tmp.path())
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("All drafts passed validation"));
}

#[test]
fn test_validate_syntax_error_fails() {
    let tmp = setup_test_project();
    create_test_draft(&tmp, "Good");
    fs::write(tmp.path().join("proposals/PRP-BROKEN.stw.yaml"), "title: [broken\n").unwrap();

    stw()
        .current_dir(tmp.path())
        .arg("validate")
        .assert()
        .failure()
        .stdout(predicate::str::contains("Drafts failed"));
}

#[test]
fn test_validate_strict_fails_on_coercion() {
    let tmp = setup_test_project();
    create_test_draft(&tmp, "Coerced");

    let file = &draft_files(&tmp)[0];
    let content = fs::read_to_string(file).unwrap();
    fs::write(file, content.replace("products: []", "products:\n  - stone_fee: abc\n    plate_count: 1")).unwrap();

    stw()
        .current_dir(tmp.path())
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("product.0.stone_fee"));

    stw()
        .current_dir(tmp.path())
        .args(["validate", "--strict"])
        .assert()
        .failure();
}

// ============================================================================
// Calculator Commands
// ============================================================================

#[test]
fn test_item_calculator() {
    stw()
        .args(["item", "-w", "60", "-l", "300", "--quantity", "2", "-p", "1000", "--labor", "250", "-f", "tsv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("3.6\t1.1\t3960\t250\t4210"));
}

#[test]
fn test_item_with_zero_fire_rate() {
    stw()
        .args(["item", "-w", "100", "-l", "100", "-p", "100", "--fire-rate", "0", "-f", "tsv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1\t1\t100\t0\t100"));
}

#[test]
fn test_tax_exclusive() {
    stw()
        .args(["tax", "1000", "-f", "tsv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1000\t200\t1200"));
}

#[test]
fn test_tax_inclusive() {
    stw()
        .args(["tax", "1200", "--include-tax", "-f", "tsv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1000\t200\t1200"));
}

#[test]
fn test_tax_zero_rate() {
    stw()
        .args(["tax", "1000", "--rate", "0", "-f", "tsv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1000\t0\t1000"));
}

#[test]
fn test_schedule_installments() {
    stw()
        .args([
            "schedule",
            "1000",
            "--method",
            "installment",
            "--count",
            "3",
            "--first-due",
            "2026-01-31",
            "-f",
            "tsv",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("1\t2026-01-31\t333.33\t"))
        .stdout(predicate::str::contains("2\t2026-02-28\t333.33\t"))
        .stdout(predicate::str::contains("3\t2026-03-31\t333.34\t"));
}

#[test]
fn test_schedule_cash_is_single_payment() {
    stw()
        .args(["schedule", "1500", "--first-due", "2026-05-01", "-f", "tsv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1\t2026-05-01\t1500\tcash"));
}

#[test]
fn test_schedule_explicit_installments() {
    stw()
        .args([
            "schedule",
            "1000",
            "--first-due",
            "2026-05-01",
            "--installment",
            "2026-05-01:400:cash",
            "--installment",
            "2026-06-15:600:cheque",
            "-f",
            "tsv",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("1\t2026-05-01\t400\tcash"))
        .stdout(predicate::str::contains("2\t2026-06-15\t600\tcheque"));
}

#[test]
fn test_schedule_single_payment_is_rounded() {
    stw()
        .args(["schedule", "100.005", "-f", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("100.00"))
        .stdout(predicate::str::contains("100.005").not());
}

#[test]
fn test_schedule_rejects_huge_installment_count() {
    stw()
        .args(["schedule", "1000", "--method", "installment", "--count", "40000"])
        .assert()
        .failure();
}

#[test]
fn test_schedule_unknown_method_fails() {
    stw()
        .args(["schedule", "1000", "--method", "barter"])
        .assert()
        .failure();
}

// ============================================================================
// Export / Completions
// ============================================================================

#[test]
fn test_export_payload_has_inputs_only() {
    let tmp = setup_test_project();
    create_test_draft(&tmp, "Export");
    set(&tmp, "product.0.stone_fee", "100");
    set(&tmp, "item.0.width", "60");
    set(&tmp, "item.0.length", "300");
    set(&tmp, "item.0.unit_price", "1000");
    set(&tmp, "item.1.unit_price", "5");

    let output = stw()
        .current_dir(tmp.path())
        .args(["export", "PRP@1"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["customer"], "Acme Mutfak");
    assert_eq!(json_decimal(&json["tax_rate"]), Decimal::from(20));
    assert_eq!(json["items"].as_array().unwrap().len(), 1);
    assert_eq!(json["items"][0]["description"], "Standard production");
    assert!(json.get("products").is_none());
    assert!(json.get("summary").is_none());
}

#[test]
fn test_unknown_short_id_fails() {
    let tmp = setup_test_project();

    stw()
        .current_dir(tmp.path())
        .args(["calc", "PRP@9"])
        .assert()
        .failure();
}

#[test]
fn test_completions_bash() {
    stw()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("stw"));
}
