use assert_cmd::Command;
use tempfile::TempDir;

fn todo_api() -> Command {
    let mut cmd = Command::cargo_bin("todo-api").expect("binary built");
    cmd.env_remove("TODO_DB")
        .env_remove("RUST_LOG")
        .env_remove("TODO_LOG_JSON");
    cmd
}

#[test]
fn version_prints_json() {
    let output = todo_api()
        .args(["version", "--json"])
        .output()
        .expect("run version");
    assert!(output.status.success());

    let parsed: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("version json");
    assert_eq!(parsed["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(parsed["name"], "todo-api");
}

#[test]
fn version_reports_resolved_database_path() {
    let dir = TempDir::new().expect("tempdir");
    let db = dir.path().join("todos.db");

    let output = todo_api()
        .args(["version", "--json", "--db"])
        .arg(&db)
        .output()
        .expect("run version");
    assert!(output.status.success());

    let parsed: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("version json");
    assert_eq!(parsed["db_path"], &*db.to_string_lossy());
    assert_eq!(parsed["default_bind"], "127.0.0.1:8080");
}

#[test]
fn log_json_env_accepts_boolish_values() {
    for value in ["1", "yes", "on", "0"] {
        todo_api()
            .env("TODO_LOG_JSON", value)
            .args(["version", "--json"])
            .assert()
            .success();
    }
}

#[test]
fn init_creates_database_then_refuses_without_force() {
    let dir = TempDir::new().expect("tempdir");
    let db = dir.path().join("data").join("todo.db");

    todo_api()
        .args(["init", "--quiet", "--db"])
        .arg(&db)
        .assert()
        .success();
    assert!(db.exists());

    let output = todo_api()
        .args(["init", "--quiet", "--json", "--db"])
        .arg(&db)
        .output()
        .expect("run init");
    assert_eq!(output.status.code(), Some(2));
    let parsed: serde_json::Value =
        serde_json::from_slice(&output.stderr).expect("error json");
    assert_eq!(parsed["error"]["code"], "ALREADY_INITIALIZED");

    todo_api()
        .args(["init", "--quiet", "--force", "--db"])
        .arg(&db)
        .assert()
        .success();
}

#[test]
fn serve_rejects_invalid_bind_address() {
    let output = todo_api()
        .args(["serve", "--in-memory", "--bind", "not-an-address"])
        .output()
        .expect("run serve");
    assert_eq!(output.status.code(), Some(7));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid bind address"));
}

#[test]
fn completions_generate_for_bash() {
    let output = todo_api()
        .args(["completions", "bash"])
        .output()
        .expect("run completions");
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("todo-api"));
}
