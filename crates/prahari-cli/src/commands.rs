use std::fmt::{self, Write as _};
use std::path::Path;

use anyhow::{anyhow, Context};
use colored::Colorize;
use prahari_ledger::{LookupHit, LookupResult};
use prahari_sdk::{AuditReport, GrievanceId};
use prahari_server::{PrahariServer, ServerConfig};
use serde::de::DeserializeOwned;
use serde_json::json;
use url::Url;

use crate::cli::*;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Serve(args) => cmd_serve(args).await,
        Command::Verify(args) => cmd_verify(args, cli.format).await,
        Command::Lookup(args) => cmd_lookup(args, cli.format).await,
        Command::Diagnose(args) => cmd_diagnose(args, cli.format).await,
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<ServerConfig> {
    let mut config = match path {
        Some(path) => ServerConfig::load(path)?,
        None => ServerConfig::default(),
    };
    config.apply_env()?;
    Ok(config)
}

async fn fetch_json<T>(url: Url) -> anyhow::Result<T>
where
    T: DeserializeOwned + Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let value = ureq::get(url.as_str())
            .call()
            .with_context(|| format!("request to {url} failed"))?
            .into_body()
            .read_json::<T>()
            .with_context(|| format!("unexpected response from {url}"))?;
        Ok(value)
    })
    .await?
}

/// `base` plus `segments`, each percent-encoded as one path segment.
fn endpoint(base: &str, segments: &[&str]) -> anyhow::Result<Url> {
    let mut url = Url::parse(base).with_context(|| format!("invalid server URL {base}"))?;
    url.path_segments_mut()
        .map_err(|_| anyhow!("server URL {base} cannot carry a path"))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

fn lookup_url(base: &str, id: &str) -> anyhow::Result<Url> {
    let grievance_id = GrievanceId::parse(id)?;
    endpoint(base, &["v1", "grievances", grievance_id.as_str()])
}

async fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(bind) = &args.bind {
        config.bind_addr = bind
            .parse()
            .with_context(|| format!("invalid bind address {bind}"))?;
    }
    PrahariServer::new(config).serve().await?;
    Ok(())
}

async fn cmd_verify(args: VerifyArgs, format: OutputFormat) -> anyhow::Result<()> {
    let report: AuditReport = fetch_json(endpoint(&args.url, &["v1", "chain", "verify"])?).await?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => print!("{}", render_report(&report)?),
    }
    Ok(())
}

async fn cmd_lookup(args: LookupArgs, format: OutputFormat) -> anyhow::Result<()> {
    let url = lookup_url(&args.url, &args.id)?;
    let result: LookupResult = fetch_json(url).await?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        OutputFormat::Text => print!("{}", render_lookup(&args.id, &result)),
    }
    Ok(())
}

async fn cmd_diagnose(args: DiagnoseArgs, format: OutputFormat) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;
    let mirror_config = &config.mirror;

    let (status, can_write, balance) = match mirror_config.connect() {
        Some(mirror) => (
            mirror.status().await,
            mirror.can_write(),
            mirror.balance().await,
        ),
        None => (None, false, None),
    };

    if format == OutputFormat::Json {
        let out = json!({
            "configured": mirror_config.is_configured(),
            "endpoint": mirror_config.endpoint,
            "registry_address": mirror_config.registry_address,
            "credential": mirror_config.api_token.is_some(),
            "timeout_ms": mirror_config.timeout_ms,
            "reachable": status.is_some(),
            "network": status.as_ref().map(|s| s.network.clone()),
            "latest_block": status.as_ref().map(|s| s.latest_block),
            "can_write": can_write,
            "balance": balance,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("{}", "Remote registry".bold());
    let show = |value: &Option<String>| match value {
        Some(v) => v.cyan().to_string(),
        None => "not set".red().to_string(),
    };
    println!("  Endpoint:   {}", show(&mirror_config.endpoint));
    println!("  Address:    {}", show(&mirror_config.registry_address));
    println!(
        "  Credential: {}",
        if mirror_config.api_token.is_some() {
            "set".green()
        } else {
            "not set".yellow()
        }
    );
    println!("  Timeout:    {} ms", mirror_config.timeout_ms);

    if !mirror_config.is_configured() {
        println!(
            "{} No remote registry configured; intake runs local-only.",
            "!".yellow().bold()
        );
        return Ok(());
    }

    match &status {
        Some(s) => println!(
            "{} Reachable: {} (latest block {})",
            "✓".green().bold(),
            s.network.cyan(),
            s.latest_block
        ),
        None => println!("{} Registry unreachable", "✗".red().bold()),
    }
    if !can_write {
        println!("{} No writing identity configured", "✗".red().bold());
    }
    match balance {
        Some(0) => println!("{} Balance: 0 (registrations will stay local)", "✗".red().bold()),
        Some(b) => println!("{} Balance: {b}", "✓".green().bold()),
        None => println!("{} Balance unknown", "!".yellow().bold()),
    }
    Ok(())
}

pub fn render_report(report: &AuditReport) -> Result<String, fmt::Error> {
    let mut out = String::new();
    write_report(&mut out, report)?;
    Ok(out)
}

fn write_report(out: &mut String, report: &AuditReport) -> fmt::Result {
    let r = &report.report;
    let verdict = if r.is_valid {
        format!("✓ {}", r.message).green().bold()
    } else {
        format!("✗ {}", r.message).red().bold()
    };
    writeln!(out, "{verdict}")?;
    writeln!(out, "  Blocks:    {}", r.total_blocks)?;
    writeln!(out, "  Integrity: {}", r.chain_integrity)?;
    writeln!(out, "  Genesis:   {}", r.genesis_hash.dimmed())?;
    writeln!(out, "  Latest:    {}", r.latest_hash.dimmed())?;
    writeln!(
        out,
        "  Remote:    {} (block {}, registry {})",
        report.remote_network, report.remote_latest_block, report.registry_address
    )?;

    for detail in &r.tampering_details {
        writeln!(
            out,
            "  {} block {}: {}",
            detail.error_type.to_string().red(),
            detail.block_index,
            detail.message
        )?;
        writeln!(out, "    expected {}", detail.expected_hash)?;
        writeln!(out, "    actual   {}", detail.actual_hash)?;
    }

    for block in &r.blocks {
        let mark = if block.is_valid { "✓".green() } else { "✗".red() };
        writeln!(
            out,
            "  {mark} #{} {} {} records={}",
            block.index,
            block.timestamp,
            &block.hash[..block.hash.len().min(12)],
            block.data_count
        )?;
        if let Some(err) = &block.error_message {
            writeln!(out, "      {}", err.red())?;
        }
    }
    Ok(())
}

pub fn render_lookup(id: &str, result: &LookupResult) -> String {
    match &result.hit {
        None => format!("{} Grievance {} not found\n", "✗".red().bold(), id.yellow()),
        Some(LookupHit::Local(hit)) => format!(
            "{} Grievance {} [{}]\n  Status: {}\n  Block:  #{} {}\n  Time:   {}\n",
            "✓".green().bold(),
            hit.grievance_id.as_str().yellow(),
            "local".cyan(),
            hit.status,
            hit.block_index,
            hit.block_hash.dimmed(),
            hit.timestamp
        ),
        Some(LookupHit::Remote(hit)) => format!(
            "{} Grievance {} [{}]\n  Content: {}\n  By:      {}\n  Time:    {}\n  Tx:      {}\n",
            "✓".green().bold(),
            hit.grievance_id.as_str().yellow(),
            "remote".cyan(),
            hit.content_hash,
            hit.registered_by,
            hit.timestamp,
            hit.tx_hash.as_deref().unwrap_or("unknown")
        ),
    }
}
