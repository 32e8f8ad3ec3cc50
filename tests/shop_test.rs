use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use assert_fs::prelude::*;
use predicates::prelude::*;

/// Run shopkeeper against a data directory inside `dir`.
fn shopkeeper(dir: &assert_fs::TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("shopkeeper");
    cmd.env_remove("SHOPKEEPER_DATA_DIR")
        .env_remove("RUST_LOG")
        .env("USER", "tester")
        .arg("--data-dir")
        .arg(dir.child("data").path());
    cmd
}

fn create_gold(dir: &assert_fs::TempDir, name: &str) {
    shopkeeper(dir)
        .args(["shop", "create", "--name", name, "--type", "GOLD"])
        .assert()
        .success();
}

#[test]
fn create_seeds_tier_allotment() {
    let dir = assert_fs::TempDir::new().unwrap();

    shopkeeper(&dir)
        .args(["shop", "create", "--name", "Alpha", "--type", "GOLD"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created shop #1 'Alpha' (GOLD)"))
        .stdout(predicate::str::contains("mentionHere"))
        .stdout(predicate::str::contains("300"));

    dir.child("data/shops.json")
        .assert(predicate::str::contains("\"mentionEveryone\": 200"));
    dir.child("data/audit.log")
        .assert(predicate::str::contains("إنشاء متجر"))
        .assert(predicate::str::contains("\"actorName\":\"tester\""));
}

#[test]
fn create_rejects_unknown_type() {
    let dir = assert_fs::TempDir::new().unwrap();

    shopkeeper(&dir)
        .args(["shop", "create", "--name", "Alpha", "--type", "BRONZE"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown shop type 'BRONZE'"));

    dir.child("data/shops.json").assert(predicate::path::missing());
}

#[test]
fn use_deducts_until_exhausted() {
    let dir = assert_fs::TempDir::new().unwrap();
    create_gold(&dir, "Alpha");

    shopkeeper(&dir)
        .args(["shop", "use", "1", "mentionHere", "50"])
        .assert()
        .success()
        .stdout(predicate::str::contains("250 left"));

    shopkeeper(&dir)
        .args(["shop", "use", "1", "mentionHere", "250"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0 left"));

    shopkeeper(&dir)
        .args(["shop", "use", "1", "mentionHere", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("0 left, 1 requested"));

    dir.child("data/shops.json")
        .assert(predicate::str::contains("\"mentionHere\": 0"));
}

#[test]
fn use_rejects_unknown_field_and_missing_shop() {
    let dir = assert_fs::TempDir::new().unwrap();
    create_gold(&dir, "Alpha");

    shopkeeper(&dir)
        .args(["shop", "use", "1", "mentionAll", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown mention field"));

    shopkeeper(&dir)
        .args(["shop", "use", "7", "mentionHere", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Shop #7 not found"));
}

#[test]
fn renew_adds_allotment() {
    let dir = assert_fs::TempDir::new().unwrap();
    create_gold(&dir, "Alpha");

    shopkeeper(&dir)
        .args(["shop", "renew", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Renewed mentions for 'Alpha'"))
        .stdout(predicate::str::contains("600"));
}

#[test]
fn list_update_and_delete() {
    let dir = assert_fs::TempDir::new().unwrap();

    shopkeeper(&dir)
        .args(["shop", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No shops yet"));

    create_gold(&dir, "Alpha");
    create_gold(&dir, "Beta");

    shopkeeper(&dir)
        .args(["shop", "update", "2", "--name", "Gamma", "--type", "VIP"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated shop #2 'Gamma' (VIP)"));

    shopkeeper(&dir)
        .args(["shop", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("shopkeeper shops (2)"))
        .stdout(predicate::str::contains("Alpha"))
        .stdout(predicate::str::contains("Gamma"));

    shopkeeper(&dir)
        .args(["shop", "delete", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted shop #1"));

    shopkeeper(&dir)
        .args(["shop", "delete", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("does not exist"));
}

#[test]
fn config_changes_allotment_and_ceiling() {
    let dir = assert_fs::TempDir::new().unwrap();
    dir.child("data/config.toml")
        .write_str("[quota]\nceiling = 1000\n\n[tiers.VIP]\nmention_everyone = 10\nmention_here = 20\nmention_stores = 600\n")
        .unwrap();

    shopkeeper(&dir)
        .args(["shop", "create", "--name", "Small", "--type", "VIP"])
        .assert()
        .success();

    shopkeeper(&dir)
        .args(["shop", "renew", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("mentionStores    1000"))
        .stdout(predicate::str::contains("mentionHere      40"));
}

#[test]
fn invalid_config_is_reported() {
    let dir = assert_fs::TempDir::new().unwrap();
    dir.child("data/config.toml")
        .write_str("[quota]\nceiling = 100\n")
        .unwrap();

    shopkeeper(&dir)
        .args(["shop", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("above quota.ceiling"));
}

#[test]
fn show_prints_one_shop() {
    let dir = assert_fs::TempDir::new().unwrap();
    create_gold(&dir, "Alpha");

    shopkeeper(&dir)
        .args(["shop", "show", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#1 Alpha (GOLD)"))
        .stdout(predicate::str::contains("mentionStores    400"));

    shopkeeper(&dir)
        .args(["shop", "show", "2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Shop #2 not found"));
}
