#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn storefront_cmd(data: &TempDir) -> Command {
    let mut cmd = Command::new(cargo_bin("storefront"));
    cmd.env("STOREFRONT_DATA", data.path().as_os_str())
        .env("STOREFRONT_LATENCY_MS", "0")
        .env("STOREFRONT_JITTER_MS", "0")
        .env("STOREFRONT_SLOW_LATENCY_MS", "0")
        .env_remove("STOREFRONT_DEV_TOGGLES")
        .env_remove("STOREFRONT_ADMIN_EMAIL")
        .env_remove("STOREFRONT_LOG");
    cmd
}

fn json_stdout(cmd: &mut Command) -> serde_json::Value {
    let output = cmd.output().unwrap();
    assert!(output.status.success(), "command failed: {:?}", output);
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn test_products_list_seeds_and_paginates() {
    let data = TempDir::new().unwrap();

    storefront_cmd(&data)
        .args(["products", "--limit", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Walnut Desk Lamp"))
        .stdout(predicate::str::contains("Page 1 of 3 (12 total)"));

    // Seeding wrote the collection to disk
    assert!(data.path().join("products.json").exists());
}

#[test]
fn test_products_json_honours_query_string() {
    let data = TempDir::new().unwrap();
    let page = json_stdout(storefront_cmd(&data).args([
        "products",
        "--json",
        "--query",
        "category=kitchen&sort=price-asc",
    ]));

    assert_eq!(page["total"], 3);
    let prices: Vec<f64> = page["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["price"].as_f64().unwrap())
        .collect();
    assert_eq!(prices, vec![18.0, 72.0, 129.0]);
}

#[test]
fn test_page_past_the_end_is_empty_not_an_error() {
    let data = TempDir::new().unwrap();
    let page = json_stdout(storefront_cmd(&data).args(["products", "--json", "--page", "9"]));
    assert_eq!(page["items"].as_array().unwrap().len(), 0);
    assert_eq!(page["total"], 12);
}

#[test]
fn test_force_error_needs_dev_toggles() {
    let data = TempDir::new().unwrap();

    storefront_cmd(&data)
        .args(["products", "--query", "forceError=1"])
        .assert()
        .success();

    storefront_cmd(&data)
        .env("STOREFRONT_DEV_TOGGLES", "true")
        .args(["products", "--query", "forceError=1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Network error"))
        .stderr(predicate::str::contains("try again"));
}

#[test]
fn test_admin_requires_admin_session() {
    let data = TempDir::new().unwrap();

    // Signed out
    storefront_cmd(&data)
        .args(["admin", "create", "--name", "Desk Mat", "--category", "home", "--price", "35"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Permission denied"));

    // Customer
    storefront_cmd(&data)
        .args(["login", "shopper@example.com"])
        .assert()
        .success()
        .stdout(predicate::str::contains("customer"));
    storefront_cmd(&data)
        .args(["admin", "delete", "products", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not an administrator"));

    // Nothing was written by the refused calls
    assert!(!data.path().join("products.json").exists());
}

#[test]
fn test_admin_crud_workflow() {
    let data = TempDir::new().unwrap();

    storefront_cmd(&data)
        .args(["login", "admin@storefront.test", "--name", "Ada"])
        .assert()
        .success()
        .stdout(predicate::str::contains("admin"));

    let created = json_stdout(storefront_cmd(&data).args([
        "admin", "create", "--json", "--name", "Desk Mat", "--category", "home", "--price", "35",
    ]));
    assert_eq!(created["id"], 13);

    storefront_cmd(&data)
        .args(["admin", "update", "13", "--price", "29.5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated product 13."));

    let shown = json_stdout(storefront_cmd(&data).args(["show", "13", "--json"]));
    assert_eq!(shown["price"], 29.5);
    assert_eq!(shown["name"], "Desk Mat");

    storefront_cmd(&data)
        .args(["admin", "delete", "products", "13"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted 13."));

    // Deleting again is a no-op
    storefront_cmd(&data)
        .args(["admin", "delete", "products", "13"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing to delete"));

    storefront_cmd(&data)
        .args(["show", "13"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("products 13 not found"));
}

#[test]
fn test_admin_validation_names_the_field() {
    let data = TempDir::new().unwrap();
    storefront_cmd(&data)
        .args(["login", "admin@storefront.test"])
        .assert()
        .success();

    storefront_cmd(&data)
        .args(["admin", "create", "--category", "home", "--price", "5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid name"));
}

#[test]
fn test_cart_workflow() {
    let data = TempDir::new().unwrap();

    storefront_cmd(&data)
        .args(["cart", "add", "5", "--quantity", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Stoneware Mug"));

    let cart = json_stdout(storefront_cmd(&data).args(["cart", "add", "5", "--json"]));
    assert_eq!(cart["count"], 3);
    assert_eq!(cart["subtotal"], 54.0);

    storefront_cmd(&data)
        .args(["cart", "add", "999"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("products 999 not found"));

    storefront_cmd(&data)
        .args(["cart", "set", "5", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Your cart is empty."));
}

#[test]
fn test_chat_replies_and_keeps_history() {
    let data = TempDir::new().unwrap();

    storefront_cmd(&data)
        .args(["chat", "send", "how", "long", "does", "shipping", "take?"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 business days"));

    let history = json_stdout(storefront_cmd(&data).args(["chat", "history", "--json"]));
    let messages = history.as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["role"], "user");
    assert_eq!(messages[1]["role"], "assistant");
}

#[test]
fn test_config_reads_the_data_dir_file() {
    let data = TempDir::new().unwrap();
    std::fs::write(data.path().join("storefront.toml"), "page_size = 4\n").unwrap();

    let config = json_stdout(storefront_cmd(&data).args(["config", "--json"]));
    assert_eq!(config["page_size"], 4);

    storefront_cmd(&data)
        .args(["products"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Page 1 of 3 (12 total)"));
}
