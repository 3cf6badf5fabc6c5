//! Canon-Sweep main entry point
//!
//! This is the command-line interface for the canonical tag auditor.

use anyhow::Context;
use canon_sweep::config::{load_config_with_hash, Config};
use canon_sweep::output::{
    load_audit, print_statistics, write_reports, CanonicalStats, JsonArtifactWriter,
    MarkdownReportWriter, ReportWriter,
};
use canon_sweep::{AuditError, Coordinator};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Canon-Sweep: sitemap discovery and canonical tag auditing
///
/// Canon-Sweep reads a site's sitemap index, groups every page URL by the
/// kind of sitemap it came from, samples one group for canonical tags and
/// checks that every canonical target actually resolves.
#[derive(Parser, Debug)]
#[command(name = "canon-sweep")]
#[command(version = "1.0.0")]
#[command(about = "Sitemap discovery and canonical tag auditing", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be audited without fetching anything
    #[arg(long, conflicts_with_all = ["discover_only", "export_summary"])]
    dry_run: bool,

    /// Fetch the sitemaps, print per-category URL counts and exit
    #[arg(long, conflicts_with_all = ["dry_run", "export_summary"])]
    discover_only: bool,

    /// Regenerate the markdown report from a saved audit artifact and exit
    #[arg(long, value_name = "AUDIT_JSON", conflicts_with_all = ["dry_run", "discover_only"])]
    export_summary: Option<PathBuf>,

    /// Print statistics only, without writing the artifact or report
    #[arg(long)]
    no_report: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (cfg, hash)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e).with_context(|| format!("loading {}", cli.config.display()));
        }
    };

    // Handle different modes
    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.discover_only {
        handle_discover(config).await?;
    } else if let Some(audit_path) = &cli.export_summary {
        handle_export_summary(&config, audit_path)?;
    } else {
        handle_audit(config, config_hash, cli.no_report).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("canon_sweep=info,warn"),
            1 => EnvFilter::new("canon_sweep=debug,info"),
            2 => EnvFilter::new("canon_sweep=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates config and shows what would be audited
fn handle_dry_run(config: &Config) {
    println!("=== Canon-Sweep Dry Run ===\n");

    println!("Sitemap:");
    println!("  Index: {}", config.sitemap.index_url);
    println!("  Timeout: {}s", config.sitemap.timeout_secs);

    println!("\nCrawler Configuration:");
    println!("  Target category: {}", config.crawler.target_category);
    println!("  Sample cap: {}", config.crawler.sample_cap);
    println!("  Request timeout: {}s", config.crawler.request_timeout_secs);
    println!("  Request delay: {}ms", config.crawler.request_delay_ms);
    match config.crawler.run_deadline_secs {
        Some(secs) => println!("  Run deadline: {}s", secs),
        None => println!("  Run deadline: none"),
    }

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header);

    println!("\nOutput:");
    println!("  Client: {}", config.output.client_name);
    println!("  Report directory: {}", config.output.report_dir);

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would sample up to {} {} pages from {}",
        config.crawler.sample_cap, config.crawler.target_category, config.sitemap.index_url
    );
}

/// Handles the --discover-only mode: prints discovered URL counts per category
async fn handle_discover(config: Config) -> anyhow::Result<()> {
    let coordinator = Coordinator::new(config)?;
    let urls = coordinator.discover().await?;

    println!("=== Discovered URLs ===\n");
    for (category, count) in urls.counts() {
        println!("  {}: {}", category, count);
    }
    println!("\nTotal: {}", urls.len());

    Ok(())
}

/// Handles the --export-summary mode: regenerates the markdown report
fn handle_export_summary(config: &Config, audit_path: &Path) -> anyhow::Result<()> {
    println!("=== Exporting Canonical Report ===\n");
    println!("Audit: {}", audit_path.display());

    tracing::info!("Loading audit artifact...");
    let audit = load_audit(audit_path)
        .with_context(|| format!("reading audit artifact {}", audit_path.display()))?;

    let path = MarkdownReportWriter.write(&audit, Path::new(&config.output.report_dir))?;

    println!("✓ Report exported to: {}", path.display());

    Ok(())
}

/// Handles the main audit run
async fn handle_audit(config: Config, config_hash: String, no_report: bool) -> anyhow::Result<()> {
    tracing::info!(
        "Target category: {}, sample cap: {}",
        config.crawler.target_category,
        config.crawler.sample_cap
    );

    let report_dir = PathBuf::from(&config.output.report_dir);
    let coordinator = Coordinator::new(config)?.with_config_hash(config_hash);

    // Ctrl-C abandons the run; partial results are not written
    let result = tokio::select! {
        result = coordinator.run() => result,
        _ = tokio::signal::ctrl_c() => {
            tracing::warn!("Received interrupt, abandoning run");
            Err(AuditError::Interrupted)
        }
    };

    let audit = match result {
        Ok(audit) => {
            tracing::info!("Audit completed successfully");
            audit
        }
        Err(e) => {
            tracing::error!("Audit failed: {}", e);
            return Err(e.into());
        }
    };

    if no_report {
        tracing::info!("Skipping report files (--no-report)");
    } else {
        let writers: [&dyn ReportWriter; 2] = [&JsonArtifactWriter, &MarkdownReportWriter];
        let paths = write_reports(&audit, &report_dir, &writers)
            .with_context(|| format!("writing reports to {}", report_dir.display()))?;
        for path in &paths {
            println!("✓ Wrote {}", path.display());
        }
        println!();
    }

    print_statistics(&CanonicalStats::from_audit(&audit));

    Ok(())
}
