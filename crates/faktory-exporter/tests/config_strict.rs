#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use clap::Parser;

use faktory_exporter::config::{self, Cli};

#[test]
fn deny_unknown_fields_nested() {
    let bad = r#"
faktory:
  url: "tcp://localhost:7419"
web:
  listen_adress: ":9386" # typo should fail
"#;

    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.code().as_str(), "CONFIG");
}

#[test]
fn ok_minimal_config() {
    let ok = r#"
faktory:
  url: "tcp://:pw@faktory:7419"
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    assert_eq!(cfg.faktory.url, "tcp://:pw@faktory:7419");
    assert_eq!(cfg.faktory.timeout_ms, 5000);
    assert_eq!(cfg.web.telemetry_path, "/metrics");
    assert_eq!(cfg.web.listen_addr().unwrap(), "0.0.0.0:9386");
}

#[test]
fn listen_address_accepts_hostnames() {
    for (yaml, want) in [
        ("web: { listen_address: \"localhost:9386\" }", "localhost:9386"),
        ("web: { listen_address: \"127.0.0.1:9000\" }", "127.0.0.1:9000"),
        ("web: { listen_address: \"[::1]:9386\" }", "[::1]:9386"),
        ("web: { listen_address: \":9000\" }", "0.0.0.0:9000"),
    ] {
        let cfg = config::load_from_str(yaml).expect(yaml);
        assert_eq!(cfg.web.listen_addr().unwrap(), want, "yaml={yaml}");
    }
}

#[test]
fn rejects_bad_values() {
    for bad in [
        "web: { listen_address: \"nowhere\" }",
        "web: { listen_address: \"localhost:http\" }",
        "web: { listen_address: \"::1:9386\" }",
        "web: { telemetry_path: \"metrics\" }",
        "web: { telemetry_path: \"/\" }",
        "web: { telemetry_path: \"/healthz\" }",
        "web: { telemetry_path: \"/:id\" }",
        "faktory: { timeout_ms: 10 }",
    ] {
        let err = config::load_from_str(bad).expect_err(bad);
        assert_eq!(err.code().as_str(), "CONFIG", "yaml={bad}");
    }
}

#[test]
fn flags_override_file() {
    let dir = std::env::temp_dir().join(format!("faktory-exporter-cfg-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("exporter.yaml");
    std::fs::write(
        &path,
        concat!(
            "faktory:\n  url: \"tcp://file-host:7419\"\n  timeout_ms: 2000\n",
            "web:\n  telemetry_path: \"/from-file\"\n",
        ),
    )
    .unwrap();

    let cli = Cli::try_parse_from([
        "faktory_exporter",
        "--config.file",
        path.to_str().unwrap(),
        "--faktory.url",
        "tcp://flag-host:7419",
    ])
    .unwrap();
    let cfg = config::resolve(&cli).unwrap();

    assert_eq!(cfg.faktory.url, "tcp://flag-host:7419");
    assert_eq!(cfg.faktory.timeout_ms, 2000);
    assert_eq!(cfg.web.telemetry_path, "/from-file");

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn flags_can_repair_an_invalid_file_value() {
    let dir = std::env::temp_dir().join(format!("faktory-exporter-fix-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("exporter.yaml");
    std::fs::write(&path, "web:\n  telemetry_path: \"metrics\"\n").unwrap();

    let file_only = Cli::try_parse_from([
        "faktory_exporter",
        "--config.file",
        path.to_str().unwrap(),
    ])
    .unwrap();
    assert_eq!(config::resolve(&file_only).unwrap_err().code().as_str(), "CONFIG");

    let fixed = Cli::try_parse_from([
        "faktory_exporter",
        "--config.file",
        path.to_str().unwrap(),
        "--web.telemetry-path",
        "/faktory",
    ])
    .unwrap();
    let cfg = config::resolve(&fixed).unwrap();
    assert_eq!(cfg.web.telemetry_path, "/faktory");

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn resolve_without_file_uses_defaults() {
    let cli = Cli::try_parse_from(["faktory_exporter"]).unwrap();
    let cfg = config::resolve(&cli).unwrap();
    assert_eq!(cfg.faktory.url, "tcp://localhost:7419");
    assert_eq!(cfg.web.listen_address, ":9386");
    assert_eq!(cfg.web.telemetry_path, "/metrics");
}

#[test]
fn missing_file_is_config_error() {
    let cli = Cli::try_parse_from([
        "faktory_exporter",
        "--config.file",
        "/nonexistent/faktory-exporter.yaml",
    ])
    .unwrap();
    let err = config::resolve(&cli).unwrap_err();
    assert_eq!(err.code().as_str(), "CONFIG");
}
