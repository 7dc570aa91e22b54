use assert_cmd::cargo::cargo_bin_cmd;
use assert_fs::prelude::*;
use predicates::prelude::*;

/// Run envresolve with a clean environment.
fn envresolve() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("envresolve");
    cmd.env_remove("GOOGLE_APPLICATION_CREDENTIALS")
        .env_remove("SECRET_MANAGER_ENDPOINT")
        .env_remove("RUST_LOG");
    cmd
}

// ─── Usage ───────────────────────────────────────────────────────

#[test]
fn no_arguments_prints_usage_and_exits_1() {
    envresolve()
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Usage"))
        .stdout(predicate::str::contains("<INPUT>"));
}

#[test]
fn help_flag_prints_usage_and_exits_1() {
    let dir = assert_fs::TempDir::new().unwrap();
    dir.child("app.env").write_str("A=1").unwrap();

    envresolve()
        .current_dir(dir.path())
        .args(["app.env", "--help"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Usage"))
        .stdout(predicate::str::contains("A=1").not());
}

#[test]
fn two_positionals_exit_1() {
    envresolve().args(["a.env", "b.env"]).assert().code(1);
}

#[test]
fn version_exits_0() {
    envresolve()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("envresolve"));
}

// ─── Files without references ────────────────────────────────────

#[test]
fn literals_are_requoted_without_touching_credentials() {
    let dir = assert_fs::TempDir::new().unwrap();
    dir.child("app.env")
        .write_str("# comment\nA=1\n\nB=\"two words\"\nexport C='x#y'\n")
        .unwrap();

    envresolve()
        .current_dir(dir.path())
        .args(["app.env", "--credential", "does-not-exist.json"])
        .assert()
        .success()
        .stdout("A='1'\nB='two words'\nC='x#y'\n");
}

#[test]
fn base64_mode_writes_bare_values() {
    let dir = assert_fs::TempDir::new().unwrap();
    dir.child("app.env")
        .write_str("A=1\nB=projects/p/secrets/s/versions/1\n")
        .unwrap();

    // `projects/` is not a reference in base64 mode.
    envresolve()
        .current_dir(dir.path())
        .args(["app.env", "--mode", "base64"])
        .assert()
        .success()
        .stdout("A=1\nB=projects/p/secrets/s/versions/1\n");
}

#[test]
fn sort_orders_keys() {
    let dir = assert_fs::TempDir::new().unwrap();
    dir.child("app.env").write_str("ZED=z\nALPHA=a\n").unwrap();

    envresolve()
        .current_dir(dir.path())
        .args(["app.env", "--sort"])
        .assert()
        .success()
        .stdout("ALPHA='a'\nZED='z'\n");
}

#[test]
fn output_file_receives_content() {
    let dir = assert_fs::TempDir::new().unwrap();
    dir.child("app.env").write_str("A=1\nB=2\n").unwrap();

    envresolve()
        .current_dir(dir.path())
        .args(["app.env", "--output", "out.env"])
        .assert()
        .success()
        .stdout("")
        .stderr(predicate::str::contains("wrote 2 variable(s) to out.env"));

    dir.child("out.env").assert("A='1'\nB='2'\n");
}

#[test]
fn quiet_suppresses_summary() {
    let dir = assert_fs::TempDir::new().unwrap();
    dir.child("app.env").write_str("A=1\n").unwrap();

    envresolve()
        .current_dir(dir.path())
        .args(["app.env", "--output", "out.env", "--quiet"])
        .assert()
        .success()
        .stderr("");
}

#[test]
fn quiet_hides_empty_file_warning() {
    let dir = assert_fs::TempDir::new().unwrap();
    dir.child("app.env").write_str("# nothing here\n").unwrap();

    envresolve()
        .current_dir(dir.path())
        .args(["app.env", "--quiet"])
        .assert()
        .success()
        .stdout("")
        .stderr("");
}

#[test]
fn empty_file_warns_without_quiet() {
    let dir = assert_fs::TempDir::new().unwrap();
    dir.child("app.env").write_str("# nothing here\n").unwrap();

    envresolve()
        .current_dir(dir.path())
        .arg("app.env")
        .assert()
        .success()
        .stderr(predicate::str::contains("has no variables"));
}

#[cfg(unix)]
#[test]
fn output_through_symlink_updates_target() {
    let dir = assert_fs::TempDir::new().unwrap();
    dir.child("app.env").write_str("A=1\n").unwrap();
    dir.child("real.env").write_str("OLD=1\n").unwrap();
    dir.child("link.env").symlink_to_file("real.env").unwrap();

    envresolve()
        .current_dir(dir.path())
        .args(["app.env", "--output", "link.env"])
        .assert()
        .success();

    dir.child("real.env").assert("A='1'\n");
    assert!(
        std::fs::symlink_metadata(dir.child("link.env").path())
            .unwrap()
            .file_type()
            .is_symlink()
    );
}

#[test]
fn single_dash_options_still_work() {
    let dir = assert_fs::TempDir::new().unwrap();
    dir.child("app.env").write_str("A=1\n").unwrap();

    envresolve()
        .current_dir(dir.path())
        .args(["-output", "out.env", "-credential", "none.json", "app.env"])
        .assert()
        .success();

    dir.child("out.env").assert("A='1'\n");
}

#[test]
fn settings_file_selects_mode() {
    let dir = assert_fs::TempDir::new().unwrap();
    dir.child("app.env").write_str("A=1\n").unwrap();
    dir.child("envresolve.toml")
        .write_str("[resolve]\nmode = \"base64\"\n")
        .unwrap();

    envresolve()
        .current_dir(dir.path())
        .args(["app.env", "--config", "envresolve.toml"])
        .assert()
        .success()
        .stdout("A=1\n");
}

// ─── Failures ────────────────────────────────────────────────────

#[test]
fn missing_input_file_fails() {
    let dir = assert_fs::TempDir::new().unwrap();

    envresolve()
        .current_dir(dir.path())
        .arg("absent.env")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to read input file"));
}

#[test]
fn invalid_syntax_fails_with_line_number() {
    let dir = assert_fs::TempDir::new().unwrap();
    dir.child("app.env").write_str("A=1\nNOT_VALID\n").unwrap();

    envresolve()
        .current_dir(dir.path())
        .args(["app.env", "--output", "out.env"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Parse error"))
        .stderr(predicate::str::contains("line 2"));

    dir.child("out.env").assert(predicate::path::missing());
}

#[test]
fn escaping_in_base64_mode_is_rejected() {
    let dir = assert_fs::TempDir::new().unwrap();
    dir.child("app.env").write_str("A=1\n").unwrap();

    envresolve()
        .current_dir(dir.path())
        .args(["app.env", "--mode", "base64", "--remove-whitespace"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid configuration"));
}

#[test]
fn reference_without_credentials_fails_before_writing() {
    let dir = assert_fs::TempDir::new().unwrap();
    dir.child("app.env")
        .write_str("DB_PASS=projects/p/secrets/s/versions/1\n")
        .unwrap();

    envresolve()
        .current_dir(dir.path())
        .args(["app.env", "--credential", "missing.json", "--output", "out.env"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to set up Secret Manager client"));

    dir.child("out.env").assert(predicate::path::missing());
}

#[test]
fn unreachable_token_endpoint_fails_with_resource_name() {
    let dir = assert_fs::TempDir::new().unwrap();
    dir.child("app.env")
        .write_str("DB_PASS=projects/p/secrets/s/versions/1\n")
        .unwrap();
    dir.child("creds.json")
        .write_str(
            r#"{"type":"authorized_user","client_id":"c","client_secret":"s",
                "refresh_token":"r","token_uri":"http://127.0.0.1:1/token"}"#,
        )
        .unwrap();
    dir.child("out.env").write_str("KEEP=me\n").unwrap();

    envresolve()
        .current_dir(dir.path())
        .args([
            "app.env",
            "--credential",
            "creds.json",
            "--endpoint",
            "http://127.0.0.1:1",
            "--output",
            "out.env",
        ])
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "Failed to get secret (projects/p/secrets/s/versions/1)",
        ));

    dir.child("out.env").assert("KEEP=me\n");
}
