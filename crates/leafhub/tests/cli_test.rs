//! Integration tests for the `leafhub` CLI binary.
//!
//! These tests drive the binary end to end over temporary event files
//! and output directories, without touching the user's configuration.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::{Value, json};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `leafhub` binary with env isolation.
fn leafhub_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("leafhub");
    cmd.env("HOME", "/tmp/leafhub-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/leafhub-cli-test-nonexistent")
        .env_remove("LEAFHUB_CONFIG")
        .env_remove("LEAFHUB_LEAF_HUB_NAME")
        .env_remove("LEAFHUB_AGGREGATION_LEVEL")
        .env_remove("LEAFHUB_SYNC_INTERVAL_SECS")
        .env_remove("LEAFHUB_OUTPUT_DIR")
        .env_remove("LEAFHUB_EVENTS")
        .env_remove("RUST_LOG");
    cmd
}

fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

fn cluster_event(kind: &str, uid: &str, version: &str) -> String {
    json!({
        "type": kind,
        "object": {
            "kind": "ManagedCluster",
            "metadata": { "name": uid, "uid": uid, "resourceVersion": version }
        }
    })
    .to_string()
}

fn policy_object(finalizers: &[&str]) -> Value {
    json!({
        "kind": "Policy",
        "metadata": {
            "name": "policy-1",
            "namespace": "default",
            "uid": "local-uid",
            "resourceVersion": "3",
            "annotations": {
                "hub-of-hubs.open-cluster-management.io/originOwnerReferenceUid": "origin-1"
            },
            "finalizers": finalizers
        },
        "spec": { "remediationAction": "enforce" },
        "status": {
            "status": [
                { "clustername": "c1", "clusternamespace": "c1", "compliant": "NonCompliant" },
                { "clustername": "c2", "clusternamespace": "c2", "compliant": "Compliant" }
            ]
        }
    })
}

fn stored(dir: &Path, id: &str) -> Value {
    serde_json::from_slice(&std::fs::read(dir.join(format!("{id}.json"))).unwrap()).unwrap()
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = leafhub_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    leafhub_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("hub of hubs")
            .and(predicate::str::contains("run"))
            .and(predicate::str::contains("cleanup")),
    );
}

#[test]
fn test_version_flag() {
    leafhub_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("leafhub"));
}

#[test]
fn test_completions_bash() {
    leafhub_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

// ── run ─────────────────────────────────────────────────────────────

#[test]
fn test_run_requires_leaf_hub_name() {
    let out = tempfile::tempdir().unwrap();
    let output = leafhub_cmd()
        .args(["run", "--events", "-", "--output-dir"])
        .arg(out.path())
        .write_stdin("")
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3));
    assert!(combined_output(&output).contains("leaf_hub_name"));
}

#[test]
fn test_run_writes_bundles_from_event_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("bundles");
    let events = dir.path().join("events.jsonl");
    let policy_event = json!({ "type": "applied", "object": policy_object(&[]) }).to_string();
    std::fs::write(
        &events,
        [
            cluster_event("applied", "u1", "1"),
            cluster_event("applied", "u2", "1"),
            policy_event,
        ]
        .join("\n"),
    )
    .unwrap();

    leafhub_cmd()
        .args(["run", "--leaf-hub-name", "hub1", "--events"])
        .arg(&events)
        .arg("--output-dir")
        .arg(&out)
        .assert()
        .success();

    let clusters = stored(&out, "hub1.ManagedClusters");
    assert_eq!(clusters["version"], "2");
    assert_eq!(clusters["payload"]["objects"].as_array().unwrap().len(), 2);

    let compliance = stored(&out, "hub1.PolicyCompliance");
    assert_eq!(compliance["payload"]["objects"][0]["nonCompliantClusters"], json!(["c1"]));
    assert!(!out.join("hub1.MinimalPolicyCompliance.json").exists());
}

#[test]
fn test_run_logs_each_sent_bundle_at_info() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("bundles");
    let events = dir.path().join("events.jsonl");
    std::fs::write(&events, cluster_event("applied", "u1", "1")).unwrap();

    let output = leafhub_cmd()
        .args(["-v", "run", "--leaf-hub-name", "hub1", "--events"])
        .arg(&events)
        .arg("--output-dir")
        .arg(&out)
        .output()
        .unwrap();

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("bundle sent"), "stderr: {stderr}");
    assert!(stderr.contains("hub1.ManagedClusters"), "stderr: {stderr}");
}

#[test]
fn test_run_minimal_from_stdin_skips_malformed_lines() {
    let out = tempfile::tempdir().unwrap();
    let input = format!(
        "{}\nnot json\n\n{}\n",
        json!({ "type": "applied", "object": policy_object(&[]) }),
        cluster_event("applied", "u1", "1"),
    );

    leafhub_cmd()
        .args(["run", "--leaf-hub-name", "hub1", "--aggregation-level", "minimal"])
        .arg("--output-dir")
        .arg(out.path())
        .args(["--events", "-"])
        .write_stdin(input)
        .assert()
        .success();

    let minimal = stored(out.path(), "hub1.MinimalPolicyCompliance");
    assert_eq!(
        minimal["payload"]["objects"],
        json!([{
            "policyId": "origin-1",
            "remediationAction": "enforce",
            "appliedClusters": 2,
            "nonCompliantClusters": 1
        }])
    );
    assert!(!out.path().join("hub1.PolicyCompliance.json").exists());
    assert!(out.path().join("hub1.ManagedClusters.json").exists());
}

#[test]
fn test_run_resumes_generation_across_runs() {
    let out = tempfile::tempdir().unwrap();
    for (uid, expected) in [("u1", "1"), ("u2", "2")] {
        leafhub_cmd()
            .args(["run", "--leaf-hub-name", "hub1", "--events", "-", "--output-dir"])
            .arg(out.path())
            .write_stdin(cluster_event("applied", uid, "1"))
            .assert()
            .success();
        assert_eq!(stored(out.path(), "hub1.ManagedClusters")["version"], expected);
    }
}

#[test]
fn test_run_missing_event_file() {
    let out = tempfile::tempdir().unwrap();
    let output = leafhub_cmd()
        .args(["run", "--leaf-hub-name", "hub1", "--events", "/nonexistent/events.jsonl"])
        .arg("--output-dir")
        .arg(out.path())
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(4));
}

// ── cleanup ─────────────────────────────────────────────────────────

#[test]
fn test_cleanup_strips_finalizer_and_annotation() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("objects.json");
    let finalizer = "hub-of-hubs.open-cluster-management.io/policy-cleanup";
    let objects = json!([
        policy_object(&[finalizer, "keep-me"]),
        { "kind": "ManagedCluster", "metadata": { "name": "c1", "uid": "u1", "finalizers": [finalizer] } }
    ]);
    std::fs::write(&input, objects.to_string()).unwrap();

    let output = leafhub_cmd()
        .args(["cleanup", "--input"])
        .arg(&input)
        .output()
        .unwrap();
    assert!(output.status.success());

    let cleaned: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(cleaned[0]["metadata"]["finalizers"], json!(["keep-me"]));
    assert!(cleaned[0]["metadata"].get("annotations").is_none());
    assert_eq!(cleaned[1]["metadata"]["finalizers"], json!([finalizer]));
}

#[test]
fn test_cleanup_writes_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.json");

    leafhub_cmd()
        .args(["cleanup", "--input", "-", "--output"])
        .arg(&output)
        .write_stdin(json!([policy_object(&[])]).to_string())
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let cleaned: Value = serde_json::from_slice(&std::fs::read(&output).unwrap()).unwrap();
    assert!(cleaned[0]["metadata"].get("annotations").is_none());
}

#[test]
fn test_cleanup_invalid_json() {
    leafhub_cmd()
        .args(["cleanup", "--input", "-"])
        .write_stdin("{ not json")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid JSON"));
}

#[test]
fn test_cleanup_empty_finalizer_is_usage_error() {
    leafhub_cmd()
        .args(["cleanup", "--input", "-", "--finalizer", " "])
        .write_stdin("[]")
        .assert()
        .code(2);
}

// ── config ──────────────────────────────────────────────────────────

#[test]
fn test_config_show_merges_file_and_env() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("leafhub.toml");
    std::fs::write(&path, "leaf_hub_name = \"hub7\"\nsync_interval_secs = 9\n").unwrap();

    leafhub_cmd()
        .args(["config", "show", "--config"])
        .arg(&path)
        .env("LEAFHUB_AGGREGATION_LEVEL", "minimal")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("leaf_hub_name = \"hub7\"")
                .and(predicate::str::contains("sync_interval_secs = 9"))
                .and(predicate::str::contains("aggregation_level = \"minimal\"")),
        );
}

#[test]
fn test_config_show_missing_file() {
    leafhub_cmd()
        .args(["config", "show", "--config", "/nonexistent/leafhub.toml"])
        .assert()
        .code(3);
}

#[test]
fn test_config_path_honours_flag() {
    leafhub_cmd()
        .args(["config", "path", "--config", "/etc/leafhub/custom.toml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("/etc/leafhub/custom.toml"));
}
