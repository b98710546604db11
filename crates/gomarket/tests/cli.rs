//! CLI tests for the gomarket binary: output and exit codes.

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// A gomarket command against `db`, isolated from the caller's environment.
fn gomarket(db: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("gomarket");
    cmd.arg("--db").arg(db);
    for var in [
        "RUST_LOG",
        "GOMARKET_DB",
        "GOMARKET_STORAGE_KEY",
        "GOMARKET_PERSIST_DEBOUNCE_MS",
        "GOMARKET_PERSIST_EMPTY",
        "GOMARKET_ZERO_QUANTITY",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

fn add_shirt(db: &Path) {
    gomarket(db)
        .args(["add", "--id", "p1", "--title", "Shirt", "--price", "10"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""id":"p1""#));
}

#[test]
fn test_list_empty_cart() {
    let dir = TempDir::new().unwrap();

    gomarket(&dir.path().join("cart.db"))
        .arg("list")
        .assert()
        .success()
        .stdout("[]\n");
}

#[test]
fn test_changes_persist_between_runs() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("cart.db");

    add_shirt(&db);
    gomarket(&db)
        .args(["increment", "p1"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""quantity":2"#));

    gomarket(&db)
        .arg("list")
        .assert()
        .success()
        .stdout(
            predicate::str::contains(r#""title":"Shirt""#)
                .and(predicate::str::contains(r#""quantity":2"#)),
        );
}

#[test]
fn test_missing_product_exits_non_zero() {
    let dir = TempDir::new().unwrap();

    gomarket(&dir.path().join("cart.db"))
        .args(["decrement", "missing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("product missing is not in the cart"));
}

#[test]
fn test_non_finite_price_keeps_stored_cart() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("cart.db");

    add_shirt(&db);
    gomarket(&db)
        .args(["add", "--id", "p2", "--title", "Broken", "--price", "NaN"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid price for p2"));

    gomarket(&db)
        .arg("list")
        .assert()
        .success()
        .stdout(
            predicate::str::contains(r#""id":"p1""#).and(predicate::str::contains("p2").not()),
        );
}

#[test]
fn test_invalid_config_exits_non_zero() {
    let dir = TempDir::new().unwrap();

    gomarket(&dir.path().join("cart.db"))
        .env("GOMARKET_PERSIST_EMPTY", "maybe")
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("GOMARKET_PERSIST_EMPTY"));
}
