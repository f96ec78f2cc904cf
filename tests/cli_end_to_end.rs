#![deny(clippy::all)]

use assert_cmd::Command;
use httpmock::MockServer;
use predicates::str::contains;
use serde_json::Value;

const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/snapshot.json");

fn mapprint() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("mapprint"));
    cmd.env_remove("MAPPRINT_CONFIG_FILE")
        .env_remove("RUST_LOG")
        .env("MAPPRINT__LOGGING__LEVEL", "warn");
    cmd
}

#[test]
fn render_prints_request_without_contacting_the_service() {
    let assert = mapprint()
        .args(["render", "--print-origin", "http://print.test", FIXTURE])
        .assert()
        .success();

    let output: Value = serde_json::from_slice(&assert.get_output().stdout).expect("json output");
    assert_eq!(output["appId"], "letter_portrait");
    assert_eq!(
        output["reportUrl"],
        "http://print.test/print/print/letter_portrait/report.pdf"
    );

    let request = &output["request"];
    assert_eq!(request["layout"], "letter portrait");
    assert_eq!(request["outputFormat"], "PDF");
    assert_eq!(request["dpi"], 300);
    assert_eq!(request["attributes"]["title"], "Road closures");
    assert_eq!(request["attributes"]["scale"], "1 : 24,000");
    assert_eq!(request["attributes"]["map"]["longitudeFirst"], true);
    assert!(request["attributes"].get("overview").is_none());
    assert!(request["attributes"].get("legend").is_none());

    let kinds: Vec<&str> = request["attributes"]["map"]["layers"]
        .as_array()
        .expect("layers")
        .iter()
        .map(|layer| layer["type"].as_str().expect("layer type"))
        .collect();
    assert_eq!(kinds, ["geoJson", "wms", "WMTS"]);
}

#[test]
fn submit_saves_document_end_to_end() {
    let server = MockServer::start();
    let submit = server.mock(|when, then| {
        when.method("POST").path("/print/print/letter_portrait/report.pdf");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"ref":"cli-1","statusURL":"/print/print/status/cli-1.json"}"#);
    });
    let status = server.mock(|when, then| {
        when.method("GET").path("/print/print/status/cli-1.json");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"done":true,"status":"finished","downloadURL":"/print/print/report/cli-1"}"#);
    });
    let download = server.mock(|when, then| {
        when.method("GET").path("/print/print/report/cli-1");
        then.status(200).body("%PDF-1.4 cli");
    });

    let dir = tempfile::tempdir().expect("tmp dir");
    let target = dir.path().join("map.pdf");
    let target_arg = target.to_str().expect("utf-8 path");

    let assert = mapprint()
        .args([
            "submit",
            "--print-origin",
            &server.base_url(),
            "--output",
            target_arg,
            FIXTURE,
        ])
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout);
    assert_eq!(stdout.trim(), target_arg);
    assert_eq!(
        std::fs::read_to_string(&target).expect("saved document"),
        "%PDF-1.4 cli"
    );
    submit.assert();
    status.assert();
    download.assert();
}

#[test]
fn layouts_lists_selectors_and_apps() {
    mapprint()
        .arg("layouts")
        .assert()
        .success()
        .stdout(contains("8X11 Portrait Overview\tletter_portrait_overview"))
        .stdout(contains("Map Only Landscape\tmap_only_landscape"));
}

#[test]
fn invalid_origin_fails_fast() {
    mapprint()
        .args(["render", "--print-origin", "not a url", FIXTURE])
        .assert()
        .failure()
        .stderr(contains("print.origin"));
}

#[test]
fn missing_snapshot_fails() {
    mapprint()
        .args(["render", "does-not-exist.json"])
        .assert()
        .failure()
        .stderr(contains("application error"));
}
