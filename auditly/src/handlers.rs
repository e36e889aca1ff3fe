use anyhow::{Context, Result, anyhow};
use auditly_client::AuditClient;
use auditly_core::config::{Config, ConfigOverrides, default_config_contents, expand_path};
use auditly_core::export::export_pdf;
use auditly_core::report::{ReportData, ReportFormat, render_report, save_report};
use auditly_core::validate::validate_request;
use auditly_core::view::{AUDIT_FAILED_MESSAGE, AuditHandoff, LOADING_MESSAGE, ResultsView};
use auditly_core::{EvaluatedReport, ScoreClass};
use chrono::Local;
use clap::ArgMatches;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{Level, debug};

/// Everything a finished CLI audit produced.
#[derive(Debug)]
pub struct AuditOutcome {
    pub view: ResultsView,
    pub rendered: String,
    pub pdf: Option<PathBuf>,
}

/// Build the effective configuration from the shared config flags.
pub fn config_from_args(args: &ArgMatches) -> Result<Config> {
    let overrides = ConfigOverrides {
        endpoint: args.get_one::<String>("endpoint").cloned(),
        policy: args.get_one::<String>("policy").cloned(),
        output_dir: args.get_one::<String>("output-dir").cloned(),
    };
    let path = args.get_one::<String>("config").map(String::as_str);

    Ok(Config::load(path, overrides)?)
}

/// Validate `input`, submit it and render the evaluated report.
///
/// Validation errors surface with their own message. Any failure of the
/// request itself collapses into the generic retry message; the cause is
/// only logged.
pub async fn perform_audit(
    config: &Config,
    input: &str,
    format: ReportFormat,
    write_pdf: bool,
) -> Result<AuditOutcome> {
    let request = validate_request(input)?;

    let client = AuditClient::new(config.endpoint.clone())?;
    let report = client.submit_audit(&request.url).await.map_err(|e| {
        debug!(error = %e, url = %request.url, "Audit request failed");
        anyhow!(AUDIT_FAILED_MESSAGE)
    })?;

    let view = ResultsView::new(
        AuditHandoff {
            report,
            url: request.url,
        },
        &config.policy,
        &config.screenshot_base(),
    );

    let generated_at = Local::now();
    let data = ReportData::from_view(&view, config.policy.name(), generated_at);
    let rendered = render_report(&data, format).context("Failed to render report")?;

    let pdf = if write_pdf {
        Some(export_pdf(&view.export_context(generated_at), &config.output_dir)?)
    } else {
        None
    };

    Ok(AuditOutcome {
        view,
        rendered,
        pdf,
    })
}

pub async fn handle_audit(args: &ArgMatches, quiet: bool) -> Result<()> {
    let level = if args.get_flag("verbose") {
        Level::DEBUG
    } else {
        Level::WARN
    };
    // Report output owns stdout
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .try_init();

    let config = config_from_args(args)?;
    let input = args
        .get_one::<String>("URL")
        .context("A URL to audit is required")?;
    let format = args
        .get_one::<String>("format")
        .and_then(|f| ReportFormat::from_str(f))
        .unwrap_or(ReportFormat::Text);
    let write_pdf = args.get_flag("pdf");
    let output = args.get_one::<PathBuf>("output");

    let spinner = ProgressBar::new_spinner();
    if quiet {
        spinner.set_draw_target(indicatif::ProgressDrawTarget::hidden());
    }
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message(format!("{} {}", LOADING_MESSAGE, input));

    let result = perform_audit(&config, input, format, write_pdf).await;
    spinner.finish_and_clear();
    let outcome = result?;

    match output {
        Some(path) => {
            save_report(&outcome.rendered, path)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            println!(
                "{} Report saved to {}",
                "✓".green().bold(),
                path.display().to_string().bright_white()
            );
        }
        None => println!("{}", outcome.rendered),
    }

    if !quiet {
        print_summary(&outcome.view.evaluated());
    }

    if let Some(pdf) = &outcome.pdf {
        println!(
            "{} PDF exported to {}",
            "✓".green().bold(),
            pdf.display().to_string().bright_white()
        );
    }

    Ok(())
}

fn print_summary(evaluated: &EvaluatedReport) {
    let score = format!("{} / 100", evaluated.score);
    let score = match evaluated.score_class {
        ScoreClass::Good => score.green().bold(),
        ScoreClass::Ok => score.yellow().bold(),
        ScoreClass::Bad => score.red().bold(),
    };
    eprintln!(
        "{} SEO score {} ({} issue{})",
        "→".blue(),
        score,
        evaluated.issues.len(),
        if evaluated.issues.len() == 1 { "" } else { "s" }
    );
}

pub async fn handle_ui(args: &ArgMatches) -> Result<()> {
    let config = config_from_args(args)?;
    let runtime = tokio::runtime::Handle::current();

    tokio::task::spawn_blocking(move || auditly_tui::run(config, runtime))
        .await
        .context("Terminal UI thread panicked")?
}

/// Write the default configuration to `path`, creating parent directories.
pub fn write_default_config(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(path, default_config_contents())
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

fn print_divider() {
    println!("{}", "═".repeat(60).bright_blue().bold());
}

fn print_prompt(msg: &str) -> Result<String> {
    print!("{} ", msg.bright_cyan().bold());
    io::stdout().flush()?;
    let mut response = String::new();
    io::stdin().read_line(&mut response)?;
    Ok(response.trim().to_lowercase())
}

pub fn handle_init(args: &ArgMatches) -> Result<()> {
    print_divider();
    println!("{}", "  AUDITLY INITIALIZATION".bright_white().bold());
    print_divider();
    println!();

    let raw_path = args
        .get_one::<String>("PATH")
        .context("A configuration path is required")?;
    let force = args.get_flag("force");
    let config_path = expand_path(raw_path);

    println!(
        "{} Target: {}",
        "→".blue(),
        config_path.display().to_string().bright_white()
    );
    println!();

    if config_path.exists() && !force {
        println!("{}", "⚠ WARNING".yellow().bold());
        println!("A configuration file already exists:");
        println!(
            "  {} {}",
            "•".yellow(),
            config_path.display().to_string().bright_white()
        );
        println!();

        let response = print_prompt("Do you want to overwrite it? [y/N]:")?;
        println!();

        if response != "y" && response != "yes" {
            println!("{} Initialization cancelled.", "✗".red().bold());
            return Ok(());
        }
        println!("{} Proceeding with overwrite", "→".yellow().bold());
        println!();
    }

    write_default_config(&config_path)?;

    print_divider();
    println!("{}", "  INITIALIZATION COMPLETE".green().bold());
    print_divider();
    println!();
    println!(
        "{} Config file: {}",
        "✓".green().bold(),
        config_path.display().to_string().bright_white()
    );
    println!();

    Ok(())
}
