use secrecy::ExposeSecret;
use serde::Serialize;

use frontdesk_core::config::{AppConfig, LoadOptions};
use frontdesk_db::connect;
use frontdesk_provider::AgentProviderClient;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

pub fn run(json_output: bool) -> String {
    let report = build_report();

    if json_output {
        return serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                error.to_string().replace('"', "\\\"")
            )
        });
    }

    render_human(&report)
}

fn build_report() -> DoctorReport {
    let mut checks = Vec::new();

    match AppConfig::load(LoadOptions::default()) {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            });
            checks.push(run_async(check_database_connectivity(&config)));
            checks.push(run_async(check_provider_credential(&config)));
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
        }
    }

    let overall_status = if checks.iter().any(|check| check.status == CheckStatus::Fail) {
        CheckStatus::Fail
    } else {
        CheckStatus::Pass
    };
    let summary = match overall_status {
        CheckStatus::Pass => "all checks passed".to_string(),
        _ => "one or more checks failed".to_string(),
    };

    DoctorReport { overall_status, summary, checks }
}

fn run_async(
    future: impl std::future::Future<Output = DoctorCheck>,
) -> DoctorCheck {
    match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime.block_on(future),
        Err(error) => DoctorCheck {
            name: "runtime_init",
            status: CheckStatus::Fail,
            details: format!("failed to initialize async runtime: {error}"),
        },
    }
}

async fn check_database_connectivity(config: &AppConfig) -> DoctorCheck {
    match connect(&config.database).await {
        Ok(pool) => {
            pool.close().await;
            DoctorCheck {
                name: "db_connectivity",
                status: CheckStatus::Pass,
                details: "database reachable".to_string(),
            }
        }
        Err(error) => DoctorCheck {
            name: "db_connectivity",
            status: CheckStatus::Fail,
            details: error.to_string(),
        },
    }
}

async fn check_provider_credential(config: &AppConfig) -> DoctorCheck {
    let Some(api_key) = &config.provider.api_key else {
        return DoctorCheck {
            name: "provider_credential",
            status: CheckStatus::Skipped,
            details: "no provider API key configured".to_string(),
        };
    };

    let client = AgentProviderClient::new(config.provider.base_url.clone());
    if client.validate_credential(api_key.expose_secret()).await {
        DoctorCheck {
            name: "provider_credential",
            status: CheckStatus::Pass,
            details: "provider accepted the credential".to_string(),
        }
    } else {
        DoctorCheck {
            name: "provider_credential",
            status: CheckStatus::Fail,
            details: "provider rejected the credential or was unreachable".to_string(),
        }
    }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = vec![format!("doctor: {}", report.summary)];
    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "pass",
            CheckStatus::Fail => "FAIL",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("  [{marker}] {} - {}", check.name, check.details));
    }
    lines.join("\n")
}
