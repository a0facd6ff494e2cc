use std::env;
use std::sync::{Mutex, OnceLock};

use frontdesk_cli::commands::{doctor, migrate, provision};
use serde_json::Value;

#[test]
fn migrate_returns_success_with_valid_env() {
    with_env(&[("FRONTDESK_DATABASE_URL", "sqlite::memory:")], || {
        let result = migrate::run();
        assert_eq!(result.exit_code, 0, "expected successful migrate");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "migrate");
        assert_eq!(payload["status"], "ok");
    });
}

#[test]
fn migrate_reports_config_failure_on_empty_database_url() {
    with_env(&[("FRONTDESK_DATABASE_URL", "")], || {
        let result = migrate::run();
        assert_eq!(result.exit_code, 2, "expected config validation failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "migrate");
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "config_validation");
    });
}

#[test]
fn migrate_reports_connectivity_failure_for_unreachable_database() {
    with_env(
        &[("FRONTDESK_DATABASE_URL", "sqlite:///no/such/directory/frontdesk.db")],
        || {
            let result = migrate::run();
            assert_eq!(result.exit_code, 4, "expected connectivity failure code");

            let payload = parse_payload(&result.output);
            assert_eq!(payload["error_class"], "db_connectivity");
        },
    );
}

#[test]
fn doctor_json_skips_provider_check_without_credential() {
    with_env(&[("FRONTDESK_DATABASE_URL", "sqlite::memory:")], || {
        let report: Value =
            serde_json::from_str(&doctor::run(true)).expect("doctor output should be valid JSON");
        assert_eq!(report["overall_status"], "pass");

        let checks = report["checks"].as_array().expect("checks array");
        let provider_check = checks
            .iter()
            .find(|check| check["name"] == "provider_credential")
            .expect("provider_credential check present");
        assert_eq!(provider_check["status"], "skipped");
    });
}

#[test]
fn doctor_human_output_reports_config_failure() {
    with_env(&[("FRONTDESK_DATABASE_URL", "")], || {
        let rendered = doctor::run(false);
        assert!(rendered.contains("[FAIL] config_validation"), "got: {rendered}");
    });
}

#[test]
fn provision_reports_config_failure_on_empty_database_url() {
    with_env(&[("FRONTDESK_DATABASE_URL", "")], || {
        let result = provision::run("b-123");
        assert_eq!(result.exit_code, 2);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "provision");
        assert_eq!(payload["error_class"], "config_validation");
    });
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be valid JSON")
}

fn with_env(vars: &[(&str, &str)], test_fn: impl FnOnce()) {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let _guard =
        ENV_LOCK.get_or_init(|| Mutex::new(())).lock().expect("env mutex should not be poisoned");

    let keys = [
        "FRONTDESK_DATABASE_URL",
        "FRONTDESK_PROVIDER_BASE_URL",
        "FRONTDESK_PROVIDER_API_KEY",
        "FRONTDESK_GENERATOR_API_KEY",
        "FRONTDESK_CACHE_PATH",
        "FRONTDESK_LOG_LEVEL",
        "FRONTDESK_LOG_FORMAT",
    ];

    let previous_values: Vec<(&str, Option<String>)> =
        keys.iter().map(|key| (*key, env::var(key).ok())).collect();

    for key in &keys {
        env::remove_var(key);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }

    test_fn();

    for (key, value) in previous_values {
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
    }
}
