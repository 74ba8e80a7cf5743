use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;

#[test]
fn render_prints_document_without_writing() {
    let tmp = tempfile::tempdir().unwrap();
    let mut cmd = cargo_bin_cmd!("supervisor-conf");
    cmd.arg("render")
        .arg("--base-dir")
        .arg(tmp.path())
        .arg("--set")
        .arg("programs=10 web /srv/web/run [--port 8080]");

    let output_pred = predicate::str::starts_with("[supervisord]\n")
        .and(predicate::str::contains("[program:web]\ncommand = /srv/web/run --port 8080\n"));

    cmd.assert().success().stdout(output_pred);
    assert!(!tmp.path().join("parts").exists());
}

#[test]
fn generate_writes_config_from_options_file() {
    let tmp = tempfile::tempdir().unwrap();
    let options = tmp.path().join("supervisor.toml");
    fs::write(
        &options,
        r#"
http-socket = "unix"
file = "/tmp/app.sock"
programs = [
    "10 web /srv/web/run",
    "20 worker /srv/worker/run true",
]
groups = "30 app web,worker"
"#,
    )
    .unwrap();

    let mut cmd = cargo_bin_cmd!("supervisor-conf");
    cmd.arg("generate")
        .arg("--options")
        .arg(&options)
        .arg("--base-dir")
        .arg(tmp.path());
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("parts/supervisor/supervisord.conf"));

    let conf = tmp.path().join("parts/supervisor/supervisord.conf");
    let text = fs::read_to_string(conf).unwrap();
    assert!(text.contains("[unix_http_server]\nfile = /tmp/app.sock\n"));
    assert!(text.contains("serverurl = unix:///tmp/app.sock\n"));
    assert!(text.contains("[group:app]\nprograms = web,worker\npriority = 30\n"));
    assert!(tmp.path().join("var/log").is_dir());
}

#[test]
fn generate_json_report() {
    let tmp = tempfile::tempdir().unwrap();
    let conf = tmp.path().join("etc/supervisord.conf");

    let mut cmd = cargo_bin_cmd!("supervisor-conf");
    cmd.arg("generate")
        .arg("--json")
        .arg("--base-dir")
        .arg(tmp.path())
        .arg("--set")
        .arg(format!("supervisord-conf={}", conf.display()));
    let out = cmd.assert().success().get_output().stdout.clone();

    let report: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(report["conf_file"], conf.display().to_string());
    assert_eq!(report["artifacts"].as_array().unwrap().len(), 1);
    assert_eq!(report["server_url"], "http://127.0.0.1:9001");
    assert!(conf.is_file());
}

#[test]
fn bad_line_fails_and_writes_nothing() {
    let tmp = tempfile::tempdir().unwrap();
    let mut cmd = cargo_bin_cmd!("supervisor-conf");
    cmd.arg("generate")
        .arg("--base-dir")
        .arg(tmp.path())
        .arg("--set")
        .arg("groups=webgroup");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("group line 1 is malformed"));
    assert!(!tmp.path().join("parts").exists());
    assert!(!tmp.path().join("var").exists());
}

#[test]
fn bad_transport_is_reported() {
    let mut cmd = cargo_bin_cmd!("supervisor-conf");
    cmd.arg("render").arg("--set").arg("http-socket=tcp");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("http-socket only supports values inet or unix"));
}
