//! ForgePath CLI - Attack path analysis over preset topologies
//!
//! This is the main entry point for the `forgepath` binary.

use anyhow::{Context, Result};
use clap::Parser;
use forgepath_common::{Config, LogConfig, LogFormat};
use forgepath_engine::{
    AnalysisResult, AnalysisStrategy, AttackPathAnalyzer, PostureSimulator, PostureSummary, Preset,
    Scenario, StaticCatalog,
};
use tracing::{info, warn};

/// ForgePath Attack Path Analyzer
#[derive(Parser, Debug)]
#[command(name = "forgepath")]
#[command(author = "Forge Cyber Defense")]
#[command(version)]
#[command(about = "Risk-weighted attack path analysis", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "/etc/forgepath/forgepath.toml")]
    config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Log format (pretty, json, compact)
    #[arg(long)]
    log_format: Option<String>,

    /// Topology preset (default, simple, dmz, iot)
    #[arg(short, long, default_value = "default")]
    preset: String,

    /// Analysis strategy (dijkstra, exhaustive-dfs); overrides config
    #[arg(short, long)]
    strategy: Option<String>,

    /// Scenario to simulate after the baseline analysis (repeatable)
    #[arg(long = "simulate")]
    scenarios: Vec<String>,

    /// Seed for reproducible simulations; overrides config
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let config_exists = std::path::Path::new(&args.config).exists();
    let mut config = if config_exists {
        Config::from_file(&args.config)?
    } else {
        Config::default()
    };
    config = config.merge_env();
    if let Some(level) = args.log_level {
        config.logging.level = level;
    }
    if let Some(format) = args.log_format {
        config.logging.format = format;
    }
    if let Some(seed) = args.seed {
        config.simulation.seed = Some(seed);
    }
    config.validate()?;

    // Initialize logging
    let log_config = LogConfig::from_settings(&config.logging);
    let json_output = log_config.format == LogFormat::Json;
    forgepath_common::init_logging_with_config(log_config)?;

    info!("ForgePath starting...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    if !config_exists {
        info!("Config file not found, using defaults");
    }

    let strategy: AnalysisStrategy = args
        .strategy
        .as_deref()
        .unwrap_or(&config.analysis.strategy)
        .parse()
        .context("invalid analysis strategy")?;
    let scenarios = args
        .scenarios
        .iter()
        .map(|s| s.parse::<Scenario>())
        .collect::<Result<Vec<_>, _>>()
        .context("invalid simulation scenario")?;
    let preset: Preset = args.preset.parse().context("invalid preset")?;

    let analyzer = AttackPathAnalyzer::from_config(&config.analysis);
    let mut topology = preset.build_with_model(&StaticCatalog::builtin(), analyzer.risk_model())?;
    info!(
        "Loaded preset {}: {} assets, {} connections",
        preset,
        topology.len(),
        topology.connections().len()
    );

    let baseline = analyzer.run(&mut topology, strategy)?;
    report("baseline", &baseline, &PostureSummary::from_topology(&topology), json_output);

    let mut simulator = PostureSimulator::new(config.simulation.clone())?;
    for scenario in scenarios {
        let simulation = simulator.run(&mut topology, scenario, &analyzer, strategy)?;
        info!("Change: {:?}", simulation.change);
        report(
            scenario.as_str(),
            &simulation.analysis,
            &PostureSummary::from_topology(&topology),
            json_output,
        );
    }

    Ok(())
}

fn report(label: &str, result: &AnalysisResult, summary: &PostureSummary, structured: bool) {
    if structured {
        info!(
            run = label,
            strategy = %result.strategy,
            path = %result.path.join(" -> "),
            total_cost = result.total_cost,
            system_score = summary.system_score,
            vulnerabilities = summary.total_vulnerabilities,
            "Analysis complete"
        );
        return;
    }

    info!("=== {} ({}) ===", label, result.strategy);
    info!(
        "System score: {:.2} / 10.0 ({:.1}%, {})",
        summary.system_score, summary.score_percent, summary.band
    );
    info!("Total vulnerabilities: {}", summary.total_vulnerabilities);
    for (asset, category) in &summary.classified_assets {
        info!("  {} -> STRIDE {} ({})", asset, category.letter(), category);
    }

    if result.is_found() {
        info!("Attack path: {}", result.path.join(" -> "));
        info!(
            "Target: {} (severity {:.2}), cost {:.2} over {} hops",
            result.target.as_deref().unwrap_or("-"),
            result.target_severity,
            result.total_cost,
            result.hops()
        );
        for (rank, ranked) in result.ranked_paths.iter().enumerate().skip(1).take(4) {
            info!("  #{} {} (cost {:.2})", rank + 1, ranked.path.join(" -> "), ranked.cost);
        }
    } else {
        warn!("No attack path found ({:?})", result.outcome);
    }
    if result.truncated {
        warn!("Path enumeration was truncated");
    }
}
