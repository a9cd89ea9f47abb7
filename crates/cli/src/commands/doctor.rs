use serde::Serialize;
use souschef_core::config::{AppConfig, LoadOptions};

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
                escape_json(&error.to_string())
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
            checks.push(check_endpoint("recipe_catalog_endpoint", &config.recipes.base_url));
            checks.push(check_endpoint("grocery_api_endpoint", &config.groceries.base_url));
            checks.push(check_timeout(&config));
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
            for name in ["recipe_catalog_endpoint", "grocery_api_endpoint", "http_timeout"] {
                checks.push(DoctorCheck {
                    name,
                    status: CheckStatus::Skipped,
                    details: "skipped because configuration did not load".to_string(),
                });
            }
        }
    }

    let all_pass = checks.iter().all(|check| check.status == CheckStatus::Pass);
    let overall_status = if all_pass { CheckStatus::Pass } else { CheckStatus::Fail };
    let summary = if all_pass {
        "doctor: all readiness checks passed".to_string()
    } else {
        "doctor: one or more readiness checks failed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

fn check_endpoint(name: &'static str, base_url: &str) -> DoctorCheck {
    // Config validation already enforced the scheme; this check catches
    // obviously truncated URLs like `https://`.
    let has_host = base_url
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .split('/')
        .next()
        .map(|host| !host.trim().is_empty())
        .unwrap_or(false);

    if has_host {
        DoctorCheck {
            name,
            status: CheckStatus::Pass,
            details: format!("endpoint configured: {base_url}"),
        }
    } else {
        DoctorCheck {
            name,
            status: CheckStatus::Fail,
            details: format!("endpoint has no host: `{base_url}`"),
        }
    }
}

fn check_timeout(config: &AppConfig) -> DoctorCheck {
    let details = if config.http.retry_once {
        format!(
            "external calls time out after {}s and retry once on transport failure",
            config.http.timeout_secs
        )
    } else {
        format!("external calls time out after {}s with no retry", config.http.timeout_secs)
    };
    DoctorCheck { name: "http_timeout", status: CheckStatus::Pass, details }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = vec![report.summary.clone()];
    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "FAIL",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("  [{marker:>4}] {:<26} {}", check.name, check.details));
    }
    lines.join("\n")
}

fn escape_json(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::{check_endpoint, CheckStatus};

    #[test]
    fn endpoints_with_hosts_pass_and_bare_schemes_fail() {
        assert_eq!(
            check_endpoint("recipe_catalog_endpoint", "https://recipes.test/v1").status,
            CheckStatus::Pass
        );
        assert_eq!(
            check_endpoint("grocery_api_endpoint", "https://").status,
            CheckStatus::Fail
        );
    }
}
