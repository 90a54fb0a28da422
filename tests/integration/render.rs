//! Tests for the `render` command.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use std::path::{Path, PathBuf};

fn devstack() -> Command {
    Command::cargo_bin("devstack").unwrap()
}

/// Write a representative configuration into `root` and return its path.
fn write_stack_config(root: &Path, proxy_strategy: &str) -> PathBuf {
    let config = json!({
        "project": "demo",
        "proxyStrategy": proxy_strategy,
        "repos": [
            {
                "name": "api",
                "repository": "git@example.com:demo/api.git",
                "into": root.join("src/api").display().to_string(),
                "framework": "nodejs",
                "domains": "api.local"
            },
            {
                "name": "legacy",
                "repository": "git@example.com:demo/legacy.git",
                "into": root.join("src/legacy").display().to_string(),
                "framework": "laravel|9.9"
            },
            {
                "name": "shop",
                "repository": "git@example.com:demo/shop.git",
                "into": root.join("src/shop").display().to_string(),
                "framework": "laravel|7.2"
            }
        ],
        "dbs": ["mysql"],
        "queues": ["rabbitmq"],
        "custom": [
            {
                "mailhog": {
                    "image": "mailhog/mailhog",
                    "ports": ["8025:8025"]
                }
            }
        ]
    });

    let path = root.join("stack.json");
    std::fs::write(&path, serde_json::to_string_pretty(&config).unwrap()).unwrap();
    path
}

#[test]
fn render_generates_descriptor_and_vhosts() {
    let temp = tempfile::tempdir().unwrap();
    let config = write_stack_config(temp.path(), "standard");

    devstack().arg("render").arg(&config).assert().success();

    let descriptor = std::fs::read_to_string(temp.path().join("docker-compose.yml")).unwrap();
    let parsed: serde_yaml::Value = serde_yaml::from_str(&descriptor).unwrap();

    assert_eq!(parsed["version"].as_str().unwrap(), "2");

    for service in ["api", "shop", "nginx-proxy", "mysql", "rabbitmq", "mailhog"] {
        assert!(
            parsed["services"][service].is_mapping(),
            "missing service section '{service}'"
        );
    }

    // The api unit's alias list is exactly its declared main domain
    let aliases = &parsed["services"]["api"]["networks"]["demo"]["aliases"];
    assert_eq!(aliases[0].as_str().unwrap(), "api.local");
    assert_eq!(aliases.as_sequence().unwrap().len(), 1);

    // 7.2 resolves to the 7.0 build context
    assert_eq!(
        parsed["services"]["shop"]["build"].as_str().unwrap(),
        "./laravel/7.0/"
    );

    // The unresolvable laravel version got no entry, and did not stop the
    // run: the sections after it are all present
    assert!(parsed["services"]["legacy"].is_null());

    // Standard strategy: the proxy is a plain network member
    assert_eq!(
        parsed["services"]["nginx-proxy"]["networks"][0]
            .as_str()
            .unwrap(),
        "demo"
    );

    // Network trailer
    assert_eq!(
        parsed["networks"]["demo"]["driver"].as_str().unwrap(),
        "bridge"
    );

    // Vhost generated with placeholders substituted
    let vhost =
        std::fs::read_to_string(temp.path().join("nginx/conf.d/api.conf")).unwrap();
    assert!(vhost.contains("server_name api.local;"));
    assert!(vhost.contains("proxy_pass http://api:3000;"));
    assert!(!vhost.contains("{{"));
}

#[test]
fn render_inner_strategy_is_consistent_across_artifacts() {
    let temp = tempfile::tempdir().unwrap();
    let config = write_stack_config(temp.path(), "inner");

    devstack().arg("render").arg(&config).assert().success();

    let descriptor = std::fs::read_to_string(temp.path().join("docker-compose.yml")).unwrap();
    let parsed: serde_yaml::Value = serde_yaml::from_str(&descriptor).unwrap();

    // The suffixed form appears in the unit's alias list...
    assert_eq!(
        parsed["services"]["api"]["networks"]["demo"]["aliases"][0]
            .as_str()
            .unwrap(),
        "api.local.inner"
    );

    // ...in the proxy's alias list...
    assert_eq!(
        parsed["services"]["nginx-proxy"]["networks"]["demo"]["aliases"][0]
            .as_str()
            .unwrap(),
        "api.local.inner"
    );

    // ...and in the vhost, never mixed with the unsuffixed form
    let vhost =
        std::fs::read_to_string(temp.path().join("nginx/conf.d/api.conf")).unwrap();
    assert!(vhost.contains("api.local.inner"));
    assert!(!vhost.contains("Host api.local;"));
}

#[test]
fn render_twice_regenerates_cleanly() {
    let temp = tempfile::tempdir().unwrap();
    let config = write_stack_config(temp.path(), "standard");

    devstack().arg("render").arg(&config).assert().success();

    // A stale vhost from an earlier layout must not survive the second run
    std::fs::write(temp.path().join("nginx/conf.d/removed-unit.conf"), "stale").unwrap();

    devstack().arg("render").arg(&config).assert().success();

    assert!(!temp.path().join("nginx/conf.d/removed-unit.conf").exists());
    assert!(temp.path().join("nginx/conf.d/api.conf").exists());
}

#[test]
fn render_missing_config_exits_nonzero() {
    let temp = tempfile::tempdir().unwrap();

    devstack()
        .arg("render")
        .arg(temp.path().join("nope.json"))
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Configuration file not found"));
}

#[test]
fn render_malformed_config_exits_nonzero_and_writes_nothing() {
    let temp = tempfile::tempdir().unwrap();
    let config = temp.path().join("stack.json");
    std::fs::write(&config, r#"{"project": "demo", "dbs": ["postgres"]}"#).unwrap();

    devstack()
        .arg("render")
        .arg(&config)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Invalid configuration"));

    assert!(!temp.path().join("docker-compose.yml").exists());
}

#[test]
fn up_missing_config_exits_nonzero() {
    let temp = tempfile::tempdir().unwrap();

    devstack()
        .arg("up")
        .arg(temp.path().join("nope.json"))
        .assert()
        .failure()
        .code(1);
}
