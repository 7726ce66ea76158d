//! PS-Lang CLI
//!
//! Zone extraction, agent filtering, deterministic simulation runs, seed
//! sweeps and benchmark series.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use pslang_core::{filter_for_agent, ZoneReport};
use pslang_sim::benchmark::{self, DatasetProfile};
use pslang_sim::engine::{compare_with, Comparison};
use pslang_sim::exporter;
use pslang_sim::{
    run_simulation_with, DisclosureLevel, FixedContext, ModelId, RunContext, ScenarioId, Seed,
    SimulationParams, SimulationResult, SweepRunner, WallClockContext,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// PS-Lang zone tooling and benchmark simulator
#[derive(Parser, Debug)]
#[command(name = "pslang")]
#[command(about = "Prompt zone tooling and deterministic benchmark simulation", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Count zones per kind with short previews
    Zones {
        file: PathBuf,

        /// Machine-readable report
        #[arg(long)]
        json: bool,
    },

    /// Print the view of a file an agent is allowed to see
    Filter {
        file: PathBuf,

        /// Agent id (owner, none, public, benchmark-runner, ...)
        #[arg(short, long)]
        agent: String,

        /// Print the full filter result
        #[arg(long)]
        json: bool,
    },

    /// Run one simulation
    Simulate {
        #[command(flatten)]
        run: RunArgs,

        /// Enable zone filtering
        #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
        pslang: bool,

        /// public, pass-through or private_demo
        #[arg(short, long, default_value = "public")]
        disclosure: String,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Stamp with the wall clock and a random run id
        #[arg(long)]
        live: bool,

        /// Run with filtering off and on, side by side
        #[arg(long)]
        compare: bool,

        /// Also write the result(s) to a file (.csv or .json)
        #[arg(long)]
        export: Option<PathBuf>,
    },

    /// Run consecutive seeds and summarize
    Sweep {
        #[command(flatten)]
        run: RunArgs,

        /// Number of seeds
        #[arg(long, default_value = "10")]
        seeds: u64,

        #[arg(long)]
        json: bool,
    },

    /// Print a benchmark series
    Bench {
        #[arg(short, long, default_value = "20")]
        iterations: usize,

        /// baseline, heavy-zones, benchmark-zones, private-zones or minimal-zones
        #[arg(short, long, default_value = "baseline")]
        profile: String,

        #[arg(long)]
        json: bool,
    },
}

#[derive(clap::Args, Debug)]
struct RunArgs {
    /// Master seed (0..=2^53-1)
    #[arg(short, long, default_value = "42")]
    seed: String,

    #[arg(short, long, default_value = "claude-sonnet-4.5")]
    model: String,

    #[arg(short = 'S', long, default_value = "multi-tool-agent")]
    scenario: String,
}

impl RunArgs {
    fn params(&self) -> Result<SimulationParams> {
        let seed: Seed = self.seed.parse()?;
        let model: ModelId = self.model.parse()?;
        let scenario: ScenarioId = self.scenario.parse()?;
        Ok(SimulationParams::default()
            .with_seed(seed)
            .with_model(model)
            .with_scenario(scenario))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
    Csv,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_file(path: &PathBuf) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn cmd_zones(file: &PathBuf, json: bool) -> Result<()> {
    let text = read_file(file)?;
    let report = ZoneReport::from_text(&text);
    info!("{} zones in {}", report.total_zones, file.display());

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{} zones (max depth {})", report.total_zones, report.max_depth);
    for summary in &report.kinds {
        println!("{:<20} {}", summary.kind.name(), summary.count);
        for preview in &summary.previews {
            println!("    {}", preview);
        }
    }
    Ok(())
}

fn cmd_filter(file: &PathBuf, agent: &str, json: bool) -> Result<()> {
    let text = read_file(file)?;
    let result = filter_for_agent(&text, agent);
    info!(
        "agent={} zones={} elided={}",
        agent,
        result.zones.len(),
        result.elided_count
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", result.visible_text);
    }
    Ok(())
}

fn print_result(result: &SimulationResult) {
    let m = &result.metrics;
    let d = &result.deltas_vs_no_ps;
    println!("run_id      {}", result.run_id);
    println!("seed        {}", result.seed);
    println!("model       {}", result.model);
    println!("scenario    {}", result.scenario);
    println!("pslang      {}", result.pslang);
    println!("tokens      {} in / {} out", m.tokens_in, m.tokens_out);
    println!("latency     {} ms", m.latency_ms);
    println!("rounds      {}", m.rounds);
    println!("tool calls  {}", m.tool_calls);
    println!("cost        ${:.6}", m.cost_usd);
    println!(
        "deltas      tokens {:+.2}%  latency {:+.2}%  rounds {:+.2}%  cost {:+.2}%",
        100.0 * d.tokens,
        100.0 * d.latency,
        100.0 * d.rounds,
        100.0 * d.cost
    );
    println!("osm         {:.4} ({})", result.osm.score_public, result.osm.band);
    if let Some(w) = &result.osm.profile.weights {
        println!(
            "weights     tokens {} latency {} rounds {}",
            w.tokens, w.latency, w.rounds
        );
    }
    if let Some(q) = result.osm.profile.quality_gate {
        println!("quality     {}", q);
    }
    if let Some(p) = &result.osm.profile.penalty {
        println!("penalty     λ={} P={}", p.lambda, p.magnitude);
    }
    if let Some(terms) = &result.osm.profile.terms {
        for t in terms {
            println!(
                "  {:<8} Δ={:+.4} w={} → {:+.4}",
                t.metric, t.delta, t.weight, t.contribution
            );
        }
    }
    println!("digest      {}", result.attest.digest);
}

fn print_comparison(cmp: &Comparison) {
    let (a, b) = (&cmp.baseline.metrics, &cmp.pslang.metrics);
    println!("{:<12} {:>14} {:>14}", "", "baseline", "pslang");
    println!("{:<12} {:>14} {:>14}", "tokens in", a.tokens_in, b.tokens_in);
    println!("{:<12} {:>14} {:>14}", "tokens out", a.tokens_out, b.tokens_out);
    println!("{:<12} {:>14} {:>14}", "latency ms", a.latency_ms, b.latency_ms);
    println!("{:<12} {:>14} {:>14}", "rounds", a.rounds, b.rounds);
    println!("{:<12} {:>14} {:>14}", "tool calls", a.tool_calls, b.tool_calls);
    println!(
        "{:<12} {:>14.6} {:>14.6}",
        "cost usd", a.cost_usd, b.cost_usd
    );
    println!(
        "{:<12} {:>14.4} {:>14.4}",
        "osm", cmp.baseline.osm.score_public, cmp.pslang.osm.score_public
    );
    println!(
        "{:<12} {:>14} {:>14}",
        "digest", cmp.baseline.attest.digest, cmp.pslang.attest.digest
    );
}

#[allow(clippy::too_many_arguments)]
fn cmd_simulate(
    run: &RunArgs,
    pslang: bool,
    disclosure: &str,
    format: OutputFormat,
    live: bool,
    compare: bool,
    export: Option<&PathBuf>,
) -> Result<()> {
    let disclosure: DisclosureLevel = disclosure.parse()?;
    let params = run.params()?.with_pslang(pslang).with_disclosure(disclosure);

    let ctx: Arc<dyn RunContext> = if live {
        Arc::new(WallClockContext::new())
    } else {
        FixedContext::shared()
    };
    debug!("params={:?} live={}", params, live);

    let results = if compare {
        let cmp = compare_with(ctx.as_ref(), &params)?;
        if format == OutputFormat::Text {
            print_comparison(&cmp);
        }
        vec![cmp.baseline, cmp.pslang]
    } else {
        let result = run_simulation_with(ctx.as_ref(), &params)?;
        if format == OutputFormat::Text {
            print_result(&result);
        }
        vec![result]
    };

    match format {
        OutputFormat::Text => {}
        OutputFormat::Json => {
            if let [single] = results.as_slice() {
                println!("{}", exporter::to_json(single)?);
            } else {
                println!("{}", serde_json::to_string_pretty(&results)?);
            }
        }
        OutputFormat::Csv => print!("{}", exporter::to_csv_string(&results)?),
    }

    if let Some(path) = export {
        exporter::write_to_file(path, &results)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Exported {} result(s) to {}", results.len(), path.display());
    }
    Ok(())
}

fn cmd_sweep(run: &RunArgs, seeds: u64, json: bool) -> Result<()> {
    let params = run.params()?;
    let summary = SweepRunner::new(params, seeds)?.run()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!(
        "{} runs of {} / {} from seed {}",
        summary.runs, params.model, params.scenario, params.seed
    );
    println!("{:<10} {:>9} {:>9} {:>9}", "delta", "mean", "min", "max");
    for (name, s) in [
        ("tokens", summary.tokens),
        ("latency", summary.latency),
        ("rounds", summary.rounds),
        ("cost", summary.cost),
    ] {
        println!(
            "{:<10} {:>8.2}% {:>8.2}% {:>8.2}%",
            name,
            100.0 * s.mean,
            100.0 * s.min,
            100.0 * s.max
        );
    }
    println!("mean osm   {:.4}", summary.mean_score);
    Ok(())
}

fn cmd_bench(iterations: usize, profile: &str, json: bool) -> Result<()> {
    let profile: DatasetProfile = profile.parse()?;
    let series = benchmark::generate_series(iterations, profile)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&series)?);
        return Ok(());
    }

    println!(
        "{:>4} {:>8} {:>8} {:>8} {:>8} {:>8}",
        "iter", "regular", "pslang", "tokens%", "time%", "cost%"
    );
    for p in &series {
        println!(
            "{:>4} {:>8} {:>8} {:>8.2} {:>8.2} {:>8.2}",
            p.iteration,
            p.regular.tokens,
            p.ps_lang.tokens,
            p.improvement.tokens,
            p.improvement.time,
            p.improvement.cost
        );
    }
    if let Some(summary) = benchmark::summarize(&series) {
        println!(
            "mean {:.2}% tokens, {:.2}% time, {:.2}% cost; {} tokens saved",
            summary.mean_tokens, summary.mean_time, summary.mean_cost, summary.tokens_saved
        );
    }
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Zones { file, json } => cmd_zones(&file, json),
        Command::Filter { file, agent, json } => cmd_filter(&file, &agent, json),
        Command::Simulate {
            run,
            pslang,
            disclosure,
            format,
            live,
            compare,
            export,
        } => cmd_simulate(&run, pslang, &disclosure, format, live, compare, export.as_ref()),
        Command::Sweep { run, seeds, json } => cmd_sweep(&run, seeds, json),
        Command::Bench {
            iterations,
            profile,
            json,
        } => cmd_bench(iterations, &profile, json),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(1)
        }
    }
}
