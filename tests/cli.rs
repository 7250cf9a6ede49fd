//! End-to-end tests for the `remo` binary.
//!
//! Cloud commands are only exercised up to token resolution (the base URL is
//! fixed); local commands run against a mock device.

use assert_cmd::cargo::cargo_bin_cmd;
use mockito::Server;
use predicates::prelude::*;

fn remo_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("remo");
    cmd.env_remove("REMO_ACCESS_TOKEN").env_remove("RUST_LOG");
    cmd
}

#[test]
fn no_access_token_fails() {
    remo_cmd()
        .args(["user", "get"])
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Error: Access token must be supplied"));
}

#[test]
fn empty_token_flag_counts_as_missing() {
    remo_cmd()
        .args(["device", "get", "--token", ""])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: Access token must be supplied"));
}

#[test]
fn help_lists_resource_groups() {
    remo_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("user")
            .and(predicate::str::contains("device"))
            .and(predicate::str::contains("appliance"))
            .and(predicate::str::contains("signal"))
            .and(predicate::str::contains("local")),
    );
}

#[test]
fn appliance_help_uses_snake_case_names() {
    remo_cmd().args(["appliance", "--help"]).assert().success().stdout(
        predicate::str::contains("update_aircon_settings")
            .and(predicate::str::contains("send_tv_infrared_signal"))
            .and(predicate::str::contains("update_orders")),
    );
}

#[test]
fn local_get_prints_sorted_json() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/messages")
        .with_status(200)
        .with_body(r#"{"freq": 38, "data": [0], "format": "us"}"#)
        .expect(1)
        .create();

    remo_cmd()
        .args(["local", "get", &server.host_with_port()])
        .assert()
        .success()
        .stdout(r#"{"data": [0], "format": "us", "freq": 38}"#.to_string() + "\n");
    mock.assert();
}

#[test]
fn local_send_prints_nothing() {
    let mut server = Server::new();
    let message = r#"{"format":"us","freq":38,"data":[0]}"#;
    let mock = server
        .mock("POST", "/messages")
        .match_body(message)
        .with_status(200)
        .expect(1)
        .create();

    remo_cmd()
        .args(["local", "send", &server.host_with_port(), message])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
    mock.assert();
}

#[test]
fn local_error_is_reported() {
    let mut server = Server::new();
    server.mock("GET", "/messages").with_status(404).create();

    remo_cmd()
        .args(["local", "get", &server.host_with_port()])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Error: 404 Not Found"));
}
