use std::{
    env,
    io::{self, Write},
    path::Path,
    process::ExitCode,
};

use anyhow::{Context, Result};
use clap::Parser;
use common::status::Reporter;
use console::style;
use terraform::{OutputSource, Terraform};
use tracing_subscriber::EnvFilter;

use crate::{
    args::Cli,
    cluster::{get_cluster_info, save_ssh_key, ClusterInfo},
    config::Config,
    credentials::{check_prerequisites, load_credentials, Credentials},
    render::{render_json, render_summary},
};

mod args;
mod cluster;
mod config;
mod credentials;
mod error;
mod render;
#[cfg(test)]
mod test_support;

#[tokio::main]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_env("LOG").unwrap_or_else(|_| EnvFilter::new("error"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let reporter = reporter_for(&cli);

    match run(&cli, &reporter).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            reporter.error(format!("{err:#}"));
            ExitCode::FAILURE
        }
    }
}

/// In JSON mode status lines go to stderr so stdout carries only the document.
fn reporter_for(cli: &Cli) -> Reporter {
    let reporter = Reporter::new(cli.quiet);
    if cli.json {
        reporter.to_stderr()
    } else {
        reporter
    }
}

async fn run(cli: &Cli, reporter: &Reporter) -> Result<()> {
    let config = Config::resolve(cli)?;
    let tf = setup_environment(&config, reporter).await?;
    execute_and_display(&config, &tf, reporter, &mut io::stdout()).await
}

async fn setup_environment(config: &Config, reporter: &Reporter) -> Result<Terraform> {
    let exec_path = check_prerequisites(config)?;

    let path = style(config.credentials_file.display()).color256(214);
    reporter.info(format!("Loading credentials from {path}"));
    let creds = load_credentials(config)?;
    reporter.success("Credentials loaded");

    start_session(config, &exec_path, &creds, reporter).await
}

async fn start_session(
    config: &Config,
    exec_path: &Path,
    creds: &Credentials,
    reporter: &Reporter,
) -> Result<Terraform> {
    let mut tf = Terraform::new(&config.terraform_dir, exec_path)
        .context("failed to create Terraform instance")?
        .with_spinner(!config.quiet);
    tf.set_env(creds.environment(|var| env::var(var).ok()));

    if !config.no_init {
        reporter.info("Initializing Terraform...");
        tf.init().await?;
        reporter.success("Terraform initialized");
    }

    Ok(tf)
}

/// Retrieves the cluster record, saves the SSH key unless disabled and writes
/// the rendered record to `out`. A failed key save is only a warning.
async fn execute_and_display(
    config: &Config,
    source: &dyn OutputSource,
    reporter: &Reporter,
    out: &mut dyn Write,
) -> Result<()> {
    reporter.info("Retrieving cluster information...");
    let info = get_cluster_info(source, &config.ssh_key_path).await?;
    reporter.success("Information retrieved");

    if !config.no_save_key {
        match save_ssh_key(source, &config.ssh_key_path).await {
            Ok(true) => {
                let path = style(config.ssh_key_path.display()).color256(214);
                reporter.success(format!("SSH key saved: {path}"));
            }
            Ok(false) => reporter.warning("No SSH key found in outputs"),
            Err(err) => {
                let err = anyhow::Error::from(err);
                reporter.warning(format!("Failed to save SSH key: {err:#}"));
            }
        }
    }

    print_info(&info, config.json_output, out)
}

fn print_info(info: &ClusterInfo, json: bool, out: &mut dyn Write) -> Result<()> {
    if json {
        let json = render_json(info).context("failed to encode cluster info")?;
        writeln!(out, "{json}")?;
    } else {
        write!(out, "{}", render_summary(info))?;
    }
    Ok(())
}
