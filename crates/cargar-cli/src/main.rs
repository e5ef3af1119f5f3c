//! Cargador: load-test a MulticastMenu deployment
//!
//! ## Usage
//!
//! ```bash
//! cargador check --data-dir data        # Validate fixture files
//! cargador run --users 50 -d 120        # 50 users for two minutes
//! cargador run --scenario peak.yaml     # Run from a scenario file
//! cargador run -o json --report out.json
//! ```

use cargador::{
    render_run_report, CheckArgs, Cli, CliConfig, CliResult, ColorChoice, Commands, OutputFormat,
    RunArgs, Verbosity,
};
use cargar::{FixtureSet, LoadRunner, RunConfig};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::process::ExitCode;
use std::time::Duration;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();
    let config = build_config(&cli);
    apply_color(config.color);
    init_tracing(config.verbosity);

    match cli.command {
        Commands::Run(args) => run_load(&config, &args),
        Commands::Check(args) => run_check(&config, &args),
    }
}

fn build_config(cli: &Cli) -> CliConfig {
    let verbosity = if cli.quiet {
        Verbosity::Quiet
    } else {
        match cli.verbose {
            0 => Verbosity::Normal,
            1 => Verbosity::Verbose,
            _ => Verbosity::Debug,
        }
    };
    CliConfig::new()
        .with_verbosity(verbosity)
        .with_color(cli.color.into())
}

fn apply_color(color: ColorChoice) {
    match color {
        ColorChoice::Always => console::set_colors_enabled(true),
        ColorChoice::Never => console::set_colors_enabled(false),
        ColorChoice::Auto => {}
    }
}

fn init_tracing(verbosity: Verbosity) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(verbosity.filter()));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

fn run_load(config: &CliConfig, args: &RunArgs) -> CliResult<()> {
    let run_config = match &args.scenario {
        Some(path) => RunConfig::load(path)?,
        None => RunConfig::new(&args.host)
            .with_users(args.users)
            .with_duration(Duration::from_secs(args.duration))
            .with_wait_time(args.wait_min, args.wait_max)
            .with_data_dir(&args.data_dir)
            .with_fetch_static_assets(args.fetch_static_assets)
            .with_timeout(Duration::from_secs(args.timeout)),
    };

    let host = run_config.host.clone();
    let duration_secs = run_config.duration_secs;
    let runner = LoadRunner::new(run_config)?;

    let show_progress =
        !config.verbosity.is_quiet() && args.output == OutputFormat::Text;

    let runtime = tokio::runtime::Runtime::new()?;
    let summary = runtime.block_on(async {
        let progress = show_progress.then(|| spawn_progress(duration_secs));
        let result = runner.run().await;
        if let Some((bar, ticker)) = progress {
            ticker.abort();
            bar.finish_and_clear();
        }
        result
    })?;

    match args.output {
        OutputFormat::Text => {
            println!("{}", render_run_report(&host, &summary));
            if !config.verbosity.is_quiet() {
                println!(
                    "{} {} requests in {:.1}s",
                    console::style("✓").green(),
                    summary.total_requests,
                    summary.elapsed_secs
                );
            }
        }
        OutputFormat::Json => println!("{}", summary.to_json()),
    }

    if let Some(path) = &args.report {
        std::fs::write(path, summary.to_json())?;
    }

    Ok(())
}

fn spawn_progress(duration_secs: u64) -> (ProgressBar, tokio::task::JoinHandle<()>) {
    let bar = ProgressBar::new(duration_secs);
    if let Ok(style) = ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len}s") {
        bar.set_style(style);
    }
    let ticker = tokio::spawn({
        let bar = bar.clone();
        async move {
            loop {
                tokio::time::sleep(Duration::from_secs(1)).await;
                if bar.position() >= bar.length().unwrap_or(0) {
                    break;
                }
                bar.inc(1);
            }
        }
    });
    (bar, ticker)
}

fn run_check(config: &CliConfig, args: &CheckArgs) -> CliResult<()> {
    let fixtures = FixtureSet::load(&args.data_dir)?;
    if !config.verbosity.is_quiet() {
        println!(
            "{} {}: {} credentials, {} stream ids, {} category slugs",
            console::style("✓").green(),
            args.data_dir.display(),
            fixtures.credentials.len(),
            fixtures.stream_ids.len(),
            fixtures.category_slugs.len()
        );
    }
    if fixtures.stream_ids.is_empty() || fixtures.category_slugs.is_empty() {
        return Err(cargador::CliError::config(
            "stream_ids.csv and category_slugs.csv must not be empty",
        ));
    }
    Ok(())
}
