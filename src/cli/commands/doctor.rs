//! Doctor command - verify system requirements and configuration.

use crate::cli::Output;
use crate::config::{LlmProvider, Settings};
use console::style;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Check result for a single item.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };

        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);

        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Run all diagnostic checks.
pub fn run_doctor(settings: &Settings, config_path: Option<&PathBuf>) -> anyhow::Result<()> {
    Output::header("Glean Doctor");
    println!("Checking system requirements and configuration...\n");

    let sections = [
        (
            "External Tools",
            vec![check_tool(&settings.pdf.command, install_hint_wkhtmltopdf())],
        ),
        ("API Configuration", vec![check_api_key(settings)]),
        (
            "Front-end",
            vec![
                check_file("Index template", &settings.templates_dir().join("index.html")),
                check_dir("Static assets", &settings.static_dir()),
            ],
        ),
        (
            "Configuration",
            vec![check_config_file(
                &config_path.cloned().unwrap_or_else(Settings::default_config_path),
            )],
        ),
    ];

    let mut errors = 0;
    let mut warnings = 0;
    for (title, checks) in &sections {
        println!("{}", style(title).bold());
        for check in checks {
            check.print();
            match check.status {
                CheckStatus::Error => errors += 1,
                CheckStatus::Warning => warnings += 1,
                CheckStatus::Ok => {}
            }
        }
        println!();
    }

    if errors > 0 {
        Output::error(&format!(
            "{} error(s) found. Please fix them before using Glean.",
            errors
        ));
        std::process::exit(1);
    } else if warnings > 0 {
        Output::warning(&format!("All checks passed with {} warning(s).", warnings));
    } else {
        Output::success("All checks passed! Glean is ready to use.");
    }

    Ok(())
}

/// Check if an external tool is available.
fn check_tool(cmd: &str, hint: &str) -> CheckResult {
    match Command::new(cmd).arg("--version").output() {
        Ok(output) if output.status.success() => {
            let version = String::from_utf8_lossy(&output.stdout)
                .lines()
                .next()
                .unwrap_or("installed")
                .trim()
                .chars()
                .take(50)
                .collect::<String>();
            CheckResult::ok(cmd, &version)
        }
        Ok(_) => CheckResult::error(cmd, "installed but not working", hint),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            CheckResult::error(cmd, "not found", hint)
        }
        Err(e) => CheckResult::error(cmd, &format!("error: {}", e), hint),
    }
}

/// Check that the configured LLM provider has an API key.
fn check_api_key(settings: &Settings) -> CheckResult {
    let name = format!("{} API key", settings.llm.provider);
    let env_hint = format!("Set with: export {}='...'", settings.llm.api_key_env);

    match settings.llm.resolve_api_key() {
        Some(key) => CheckResult::ok(&name, &format!("configured ({})", mask_key(&key))),
        // async-openai falls back to OPENAI_API_KEY on its own.
        None if settings.llm.provider == LlmProvider::OpenAI
            && std::env::var("OPENAI_API_KEY").is_ok_and(|k| !k.trim().is_empty()) =>
        {
            CheckResult::ok(&name, "configured (OPENAI_API_KEY)")
        }
        None => CheckResult::error(&name, "not set", &env_hint),
    }
}

fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "****".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

fn check_file(name: &str, path: &Path) -> CheckResult {
    if path.is_file() {
        CheckResult::ok(name, &path.display().to_string())
    } else {
        CheckResult::error(
            name,
            &format!("{} missing", path.display()),
            "Set server.templates_dir or run from the project directory",
        )
    }
}

fn check_dir(name: &str, path: &Path) -> CheckResult {
    if path.is_dir() {
        CheckResult::ok(name, &path.display().to_string())
    } else {
        CheckResult::warning(
            name,
            &format!("{} missing", path.display()),
            "Set server.static_dir; /static requests will 404",
        )
    }
}

/// Check if config file exists.
fn check_config_file(config_path: &Path) -> CheckResult {
    if config_path.exists() {
        CheckResult::ok("Config file", &config_path.display().to_string())
    } else {
        CheckResult::warning(
            "Config file",
            "using defaults",
            "Create with: glean config init",
        )
    }
}

/// Platform-specific install hint for wkhtmltopdf.
fn install_hint_wkhtmltopdf() -> &'static str {
    if cfg!(target_os = "macos") {
        "Install with: brew install --cask wkhtmltopdf"
    } else if cfg!(target_os = "linux") {
        "Install with: sudo apt install wkhtmltopdf (or your package manager)"
    } else {
        "Install from: https://wkhtmltopdf.org/downloads.html"
    }
}
