use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use assert_fs::prelude::*;
use predicates::prelude::*;

fn shopkeeper(dir: &assert_fs::TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("shopkeeper");
    cmd.env_remove("SHOPKEEPER_DATA_DIR")
        .env("USER", "tester")
        .arg("--data-dir")
        .arg(dir.child("data").path());
    cmd
}

#[test]
fn empty_log() {
    let dir = assert_fs::TempDir::new().unwrap();

    shopkeeper(&dir)
        .arg("log")
        .assert()
        .success()
        .stdout(predicate::str::contains("No audit entries found"));
}

#[test]
fn mutations_show_up_newest_first() {
    let dir = assert_fs::TempDir::new().unwrap();
    shopkeeper(&dir)
        .args(["shop", "create", "--name", "Alpha", "--type", "VIP"])
        .assert()
        .success();
    shopkeeper(&dir)
        .args(["shop", "use", "1", "mentionStores", "5"])
        .assert()
        .success();

    let out = shopkeeper(&dir).arg("log").assert().success();
    let stdout = String::from_utf8(out.get_output().stdout.clone()).unwrap();
    assert!(stdout.contains("shopkeeper log (2 entries)"));
    let used = stdout.find("استخدام منشن").unwrap();
    let created = stdout.find("إنشاء متجر").unwrap();
    assert!(used < created);
    assert!(stdout.contains("mentionStores -5"));

    shopkeeper(&dir)
        .args(["log", "--last", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(1 entries)"))
        .stdout(predicate::str::contains("إنشاء متجر").not());
}

#[test]
fn filters_by_store_and_actor() {
    let dir = assert_fs::TempDir::new().unwrap();
    for name in ["Alpha", "Beta"] {
        shopkeeper(&dir)
            .args(["shop", "create", "--name", name, "--type", "GOLD"])
            .assert()
            .success();
    }

    shopkeeper(&dir)
        .args(["log", "--store", "beta"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(1 entries)"))
        .stdout(predicate::str::contains("Beta"));

    shopkeeper(&dir)
        .args(["log", "--actor", "nobody"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Try removing filters"));
}
