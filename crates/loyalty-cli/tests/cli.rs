//! End-to-end command tests over a file-backed data directory.

use clap::Parser;
use tempfile::TempDir;

use loyalty_cli::{run, Cli};

const MARCUS: &str = "01HF8Z2K3M000000000000C002";

struct TestDir {
    dir: TempDir,
}

impl TestDir {
    fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Run `loyalty <args>` against this directory and return stdout.
    fn run(&self, args: &[&str]) -> anyhow::Result<String> {
        let data_dir = self.dir.path().join("data");
        let config = self.dir.path().join("loyalty.json");
        let mut argv = vec![
            "loyalty".to_string(),
            "--backend".into(),
            "file".into(),
            "--data-dir".into(),
            data_dir.display().to_string(),
            "--config".into(),
            config.display().to_string(),
        ];
        argv.extend(args.iter().map(ToString::to_string));

        let cli = Cli::try_parse_from(argv)?;
        let mut out = Vec::new();
        run(cli, &mut out)?;
        Ok(String::from_utf8(out)?)
    }

    fn json(&self, args: &[&str]) -> serde_json::Value {
        let mut args = args.to_vec();
        args.push("--json");
        serde_json::from_str(&self.run(&args).unwrap()).unwrap()
    }
}

#[test]
fn changes_persist_between_invocations() {
    let t = TestDir::new();

    t.run(&["earn", MARCUS, "360", "--note", "Anniversary"]).unwrap();
    t.run(&["redeem", MARCUS, "100"]).unwrap();

    let shown = t.json(&["show", MARCUS]);
    assert_eq!(shown["summary"]["customer"]["points"], 900);
    assert_eq!(shown["summary"]["tier"]["name"], "Silver");
    assert_eq!(shown["history"][0]["type"], "redeemed");
    assert_eq!(shown["history"][1]["note"], "Anniversary");

    assert!(t.dir.path().join("data").join("rp_customers.json").exists());
    assert!(t.dir.path().join("data").join("rp_transactions.json").exists());
}

#[test]
fn enrolled_customer_is_listed_first() {
    let t = TestDir::new();

    t.run(&[
        "add-customer",
        "--name",
        "Grace Hopper",
        "--email",
        "grace@navy.mil",
        "--dob",
        "1906-12-09",
    ])
    .unwrap();

    let rows = t.json(&["customers"]);
    assert_eq!(rows.as_array().unwrap().len(), 7);
    assert_eq!(rows[0]["name"], "Grace Hopper");
    assert_eq!(rows[0]["points"], 0);
    assert_eq!(rows[0]["dob"], "1906-12-09");
}

#[test]
fn custom_tiers_from_config_file() {
    let t = TestDir::new();
    std::fs::write(
        t.dir.path().join("loyalty.json"),
        r#"{"tiers":[{"name":"Member","min":0,"max":599},{"name":"Insider","min":600}]}"#,
    )
    .unwrap();

    let rows = t.json(&["customers", "--tier", "insider"]);
    let names: Vec<_> = rows
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Daniel Okafor", "Marcus Chen", "Olivia Bennett"]);
}

#[test]
fn refused_redemption_writes_nothing() {
    let t = TestDir::new();

    assert!(t.run(&["redeem", MARCUS, "5000"]).is_err());
    assert!(!t.dir.path().join("data").join("rp_transactions.json").exists());
}

#[test]
fn rocksdb_backend_requires_feature() {
    let t = TestDir::new();
    let cli = Cli::try_parse_from([
        "loyalty",
        "--backend",
        "rocksdb",
        "--data-dir",
        t.dir.path().to_str().unwrap(),
        "--config",
        t.dir.path().join("none.json").to_str().unwrap(),
        "dashboard",
    ])
    .unwrap();

    let result = run(cli, &mut Vec::new());
    if cfg!(feature = "rocksdb-backend") {
        assert!(result.is_ok());
    } else {
        assert!(result.unwrap_err().to_string().contains("not compiled in"));
    }
}
