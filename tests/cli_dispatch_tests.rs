use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

fn bin() -> &'static str {
    env!("CARGO_BIN_EXE_loadout")
}

fn unique_temp_path(name: &str) -> PathBuf {
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be after unix epoch")
        .as_nanos();
    std::env::temp_dir().join(format!("loadout-{name}-{stamp}"))
}

/// Two-slot data directory plus a config restricting the search to those slots.
fn write_fixture(name: &str, belt_price: &str) -> (PathBuf, PathBuf) {
    let dir = unique_temp_path(name);
    fs::create_dir_all(&dir).expect("fixture dir should be created");
    fs::write(
        dir.join("Belt.csv"),
        format!(
            "Item,Agility,Stamina,Hit Rating,Expertise Rating,Price\n\
             Iron Belt,10,600,200,60,{belt_price}\n\
             Rope Belt,2,500,150,50,50g\n"
        ),
    )
    .expect("belt table should be written");
    fs::write(
        dir.join("Necklace.csv"),
        "Item,Strength,Stamina,Hit Rating,Expertise Rating,Price\n\
         Gold Chain,8,500,150,50,200g\n",
    )
    .expect("necklace table should be written");

    let config = dir.join("loadout.yaml");
    fs::write(&config, "slots:\n  - Belt\n  - Necklace\n").expect("config should be written");
    (dir, config)
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

#[test]
fn optimize_command_emits_ranked_json() {
    let (dir, config) = write_fixture("optimize", "100g");

    let output = Command::new(bin())
        .args(["optimize", &path_arg(&dir), "--config", &path_arg(&config)])
        .output()
        .expect("optimize should run");

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let payload: serde_json::Value =
        serde_json::from_str(&stdout).expect("optimize should emit json");
    assert_eq!(payload["strategy"], "ranked");
    let builds = payload["results"].as_array().expect("results should be an array");
    assert!(!builds.is_empty());
    assert_eq!(builds[0]["build"]["Belt"]["name"], "Iron Belt");
    assert_eq!(builds[0]["build"]["Necklace"]["name"], "Gold Chain");
    assert_eq!(builds[0]["cost"].as_f64(), Some(300.0));

    let _ = fs::remove_dir_all(dir);
}

#[test]
fn scan_strategy_prints_text_and_exports_csv() {
    let (dir, config) = write_fixture("scan", "100g");
    let csv_path = dir.join("points.csv");

    let output = Command::new(bin())
        .args([
            "optimize",
            &path_arg(&dir),
            "--config",
            &path_arg(&config),
            "--strategy",
            "scan",
            "--format",
            "text",
            "--export-csv",
            &path_arg(&csv_path),
        ])
        .output()
        .expect("optimize should run");

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Lowest cost"));
    assert!(stdout.contains("Rope Belt"), "cheapest feasible belt should be listed");
    let csv = fs::read_to_string(&csv_path).expect("csv should be exported");
    assert!(csv.starts_with("build,power,cost,ratio"));

    let _ = fs::remove_dir_all(dir);
}

#[test]
fn optimize_fails_on_malformed_cost() {
    let (dir, config) = write_fixture("malformed", "lots");

    let output = Command::new(bin())
        .args(["optimize", &path_arg(&dir), "--config", &path_arg(&config)])
        .output()
        .expect("optimize should run");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("optimization failed"));

    let _ = fs::remove_dir_all(dir);
}

#[test]
fn validate_command_returns_non_zero_on_invalid_data() {
    let (dir, config) = write_fixture("validate", "lots");

    let output = Command::new(bin())
        .args(["validate", &path_arg(&dir), "--config", &path_arg(&config)])
        .output()
        .expect("validate should run");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("validation failed"));
    assert!(stderr.contains("Iron Belt"));

    let _ = fs::remove_dir_all(dir);
}

#[test]
fn score_command_lists_candidates_by_cost() {
    let (dir, _config) = write_fixture("score", "100g");

    let output = Command::new(bin())
        .args([
            "score",
            &path_arg(&dir.join("Belt.csv")),
            "--slot",
            "Belt",
            "--order",
            "cost",
        ])
        .output()
        .expect("score should run");

    assert_eq!(output.status.code(), Some(0));
    let payload: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("score should emit json");
    assert_eq!(payload[0]["name"], "Rope Belt");
    assert_eq!(payload[1]["name"], "Iron Belt");

    let _ = fs::remove_dir_all(dir);
}

#[test]
fn config_command_prints_default_tables() {
    let output = Command::new(bin())
        .arg("config")
        .output()
        .expect("config should run");

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Stamina"));
    assert!(stdout.contains("Wrist Guards"));
}

#[test]
fn missing_command_prints_usage() {
    let output = Command::new(bin()).output().expect("binary should run");

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Usage"));
}
