#![cfg(unix)]
#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

fn distkit(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("distkit").unwrap();
    cmd.current_dir(dir.path())
        .env("DISTKIT_ROOT", dir.path())
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    cmd
}

const COMPILE_OK: &str = "echo compile >> steps.log && mkdir -p build/out/src/dom \
     && echo 'module.exports = {};' > build/out/src/index.js \
     && echo 'class DocumentKit {}' > build/out/src/dom/DocumentKit.js";

/// Shell snippets standing in for prettier, jest, tslint and tsc.
struct Tools<'a> {
    style: &'a str,
    test: &'a str,
    lint: &'a str,
    compile: &'a str,
}

impl Default for Tools<'_> {
    fn default() -> Self {
        Self {
            style: "echo style >> steps.log",
            test: "echo test >> steps.log",
            lint: "echo lint >> steps.log",
            compile: COMPILE_OK,
        }
    }
}

fn tool_yaml(name: &str, script: &str, message: &str) -> String {
    format!(
        "  {name}:\n    program: sh\n    args: [\"-c\", {script:?}]\n    failure_message: {message:?}\n"
    )
}

fn write_config(dir: &TempDir, tools: &Tools) {
    let mut yaml = String::from("version: 1\ntools:\n");
    yaml.push_str(&tool_yaml(
        "style_check",
        tools.style,
        "check code style failed, please format above files",
    ));
    yaml.push_str(&tool_yaml("test", tools.test, "test failed, please fix"));
    yaml.push_str(&tool_yaml("lint", tools.lint, "lint failed, please fix"));
    yaml.push_str(&tool_yaml("compile", tools.compile, "compile failed, please fix"));
    std::fs::write(dir.path().join("distkit.yaml"), yaml).unwrap();
}

/// A library project with a manifest and a small source tree.
fn init_project(tools: &Tools) -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("package.json"), "{\"name\":\"core-fe\"}\n").unwrap();
    std::fs::create_dir_all(dir.path().join("src/dom")).unwrap();
    std::fs::write(dir.path().join("src/index.ts"), "export * from './dom/DocumentKit';\n").unwrap();
    std::fs::write(dir.path().join("src/dom/DocumentKit.ts"), "export class DocumentKit {}\n")
        .unwrap();
    write_config(&dir, tools);
    dir
}

fn steps_log(dir: &Path) -> String {
    std::fs::read_to_string(dir.join("steps.log")).unwrap_or_default()
}

// ---------------------------------------------------------------------------
// distkit build
// ---------------------------------------------------------------------------

#[test]
fn build_runs_all_steps_and_stages_dist() {
    let dir = init_project(&Tools::default());

    distkit(&dir)
        .arg("build")
        .assert()
        .success()
        .stdout(predicate::str::contains("[task] cleanup"))
        .stdout(predicate::str::contains("[task] check code style"))
        .stdout(predicate::str::contains("[task] distribute"))
        .stdout(predicate::str::contains(">> Build Successfully"))
        .stdout(predicate::str::contains(
            ">> Remember To Re-install In Our Projects, And Notify Others",
        ));

    assert_eq!(steps_log(dir.path()), "style\ntest\nlint\ncompile\n");

    let root = dir.path();
    assert!(root.join("build/dist/lib/index.js").exists());
    assert!(root.join("build/dist/lib/dom/DocumentKit.js").exists());
    assert_eq!(
        std::fs::read_to_string(root.join("build/dist/package.json")).unwrap(),
        "{\"name\":\"core-fe\"}\n"
    );
    assert!(root.join("build/dist/src/dom/DocumentKit.ts").exists());
    assert!(!root.join("build/out").exists());
}

#[test]
fn no_subcommand_runs_build() {
    let dir = init_project(&Tools::default());

    distkit(&dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Build Successfully"));

    assert!(dir.path().join("build/dist/lib/index.js").exists());
}

#[test]
fn test_failure_halts_and_propagates_exit_code() {
    let dir = init_project(&Tools {
        test: "echo test >> steps.log; exit 2",
        ..Tools::default()
    });

    distkit(&dir)
        .arg("build")
        .assert()
        .code(2)
        .stdout(predicate::str::contains("[task] test"))
        .stdout(predicate::str::contains("[task] lint").not())
        .stdout(predicate::str::contains("Build Successfully").not())
        .stderr(predicate::str::contains("test failed, please fix"))
        .stderr(predicate::str::contains("non-zero exit code returned, code=2"));

    assert_eq!(steps_log(dir.path()), "style\ntest\n");
    assert!(!dir.path().join("build/dist").exists());
}

#[test]
fn style_check_failure_runs_nothing_after_it() {
    let dir = init_project(&Tools {
        style: "echo style >> steps.log; exit 1",
        ..Tools::default()
    });

    distkit(&dir)
        .arg("build")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "check code style failed, please format above files",
        ));

    assert_eq!(steps_log(dir.path()), "style\n");
}

#[test]
fn missing_tool_is_fatal_launch_error() {
    let dir = init_project(&Tools::default());
    let config = std::fs::read_to_string(dir.path().join("distkit.yaml")).unwrap();
    let config = config.replacen("program: sh", "program: distkit-no-such-formatter", 1);
    std::fs::write(dir.path().join("distkit.yaml"), config).unwrap();

    distkit(&dir)
        .arg("build")
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "failed to launch 'distkit-no-such-formatter'",
        ));

    assert_eq!(steps_log(dir.path()), "");
}

#[test]
fn cleanup_removes_stale_artifacts() {
    let dir = init_project(&Tools::default());
    let stale = dir.path().join("build/dist/lib/removed.js");
    std::fs::create_dir_all(stale.parent().unwrap()).unwrap();
    std::fs::write(&stale, "old").unwrap();

    distkit(&dir).arg("build").assert().success();

    assert!(!stale.exists());
    assert!(dir.path().join("build/dist/lib/index.js").exists());
}

#[test]
fn missing_compiled_output_fails_distribute() {
    let dir = init_project(&Tools {
        compile: "echo compile >> steps.log",
        ..Tools::default()
    });

    distkit(&dir)
        .arg("build")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("distribute failed"));
}

#[test]
fn build_json_reports_steps() {
    let dir = init_project(&Tools::default());

    let out = distkit(&dir)
        .args(["build", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let report: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(report["outcome"]["status"], "success");
    assert_eq!(report["steps"].as_array().unwrap().len(), 6);
    assert_eq!(report["steps"][5]["step"], "distribute");
}

#[test]
fn build_json_reports_failed_step() {
    let dir = init_project(&Tools {
        lint: "exit 3",
        ..Tools::default()
    });

    let out = distkit(&dir)
        .args(["build", "--json"])
        .assert()
        .code(3)
        .get_output()
        .stdout
        .clone();

    let report: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(report["outcome"]["status"], "failed");
    assert_eq!(report["outcome"]["step"], "lint");
    assert_eq!(report["outcome"]["exit_code"], 3);
    assert_eq!(report["steps"].as_array().unwrap().len(), 3);
}

#[test]
fn invalid_layout_is_rejected_before_any_step() {
    let dir = init_project(&Tools::default());
    let mut config = std::fs::read_to_string(dir.path().join("distkit.yaml")).unwrap();
    config.push_str("layout:\n  build: .\n");
    std::fs::write(dir.path().join("distkit.yaml"), config).unwrap();

    distkit(&dir)
        .arg("build")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid config"));

    assert_eq!(steps_log(dir.path()), "");
    assert!(dir.path().join("src/index.ts").exists());
}

#[test]
fn sources_under_build_root_are_not_wiped() {
    let dir = init_project(&Tools::default());
    let kept = dir.path().join("build/src/index.ts");
    std::fs::create_dir_all(kept.parent().unwrap()).unwrap();
    std::fs::write(&kept, "export {};\n").unwrap();
    let mut config = std::fs::read_to_string(dir.path().join("distkit.yaml")).unwrap();
    config.push_str("layout:\n  source: build/src\n");
    std::fs::write(dir.path().join("distkit.yaml"), config).unwrap();

    distkit(&dir)
        .arg("build")
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "layout.source 'build/src' is inside layout.build",
        ));

    assert_eq!(steps_log(dir.path()), "");
    assert!(kept.exists());
}

// ---------------------------------------------------------------------------
// distkit plan
// ---------------------------------------------------------------------------

#[test]
fn plan_lists_steps_in_order() {
    let dir = init_project(&Tools::default());

    distkit(&dir)
        .arg("plan")
        .assert()
        .success()
        .stdout(predicate::str::contains("style_check"))
        .stdout(predicate::str::contains("sh -c echo lint >> steps.log"));

    assert!(!dir.path().join("build").exists());
}

#[test]
fn plan_json_with_defaults() {
    let dir = TempDir::new().unwrap();

    let out = distkit(&dir)
        .args(["plan", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let steps: serde_json::Value = serde_json::from_slice(&out).unwrap();
    let steps = steps.as_array().unwrap();
    assert_eq!(steps.len(), 6);
    assert_eq!(steps[0]["kind"], "cleanup");
    assert_eq!(steps[1]["action"]["program"], "prettier");
    assert_eq!(steps[4]["action"]["args"][1], "node/tsconfig.json");
}

// ---------------------------------------------------------------------------
// distkit config
// ---------------------------------------------------------------------------

#[test]
fn config_init_writes_defaults_once() {
    let dir = TempDir::new().unwrap();

    distkit(&dir)
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote"));

    let written = std::fs::read_to_string(dir.path().join("distkit.yaml")).unwrap();
    assert!(written.contains("program: prettier"));

    distkit(&dir)
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn config_validate_ok_and_error() {
    let dir = init_project(&Tools::default());

    distkit(&dir)
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Config OK"));

    let mut config = std::fs::read_to_string(dir.path().join("distkit.yaml")).unwrap();
    config.push_str("layout:\n  dist: build/out/dist\n");
    std::fs::write(dir.path().join("distkit.yaml"), config).unwrap();

    distkit(&dir)
        .args(["config", "validate"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("error: layout.dist"));
}

#[test]
fn config_show_merges_defaults() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("distkit.yaml"),
        "tools:\n  lint:\n    program: eslint\n    failure_message: lint failed\n",
    )
    .unwrap();

    distkit(&dir)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("program: eslint"))
        .stdout(predicate::str::contains("program: tsc"));
}

#[test]
fn config_show_json() {
    let dir = TempDir::new().unwrap();

    let out = distkit(&dir)
        .args(["config", "show", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let config: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(config["tools"]["compile"]["program"], "tsc");
    assert_eq!(config["layout"]["dist"], "build/dist");
}

#[test]
fn json_flag_rejected_where_unsupported() {
    let dir = TempDir::new().unwrap();

    distkit(&dir)
        .args(["config", "init", "--json"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--json"));
    assert!(!dir.path().join("distkit.yaml").exists());

    distkit(&dir)
        .args(["copy", "--json", "value"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--json"));
}

#[test]
fn malformed_config_reports_error() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("distkit.yaml"),
        "tools:\n  lint:\n    program: eslint\n    failure_message: x\n    retries: 3\n",
    )
    .unwrap();

    distkit(&dir)
        .arg("build")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("failed to load distkit.yaml"));
}
