use anyhow::Context;
use clap::{value_parser, Arg, Command};
use replidiff_client::{ClientConfig, HttpEndpointClient};
use replidiff_core::{CorpusReader, Target};
use replidiff_runner::{FsReportSink, RunHandle, RunnerConfig, ScenarioRunner};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Command::new("replidiff")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Multi-endpoint response-equivalence verifier")
        .arg(
            Arg::new("corpus")
                .required(true)
                .help("Path to the JSONL request corpus"),
        )
        .arg(
            Arg::new("endpoints")
                .required(true)
                .num_args(1..)
                .help("Target endpoint URLs, baseline first"),
        )
        .arg(
            Arg::new("api-key-env")
                .long("api-key-env")
                .default_value("TRANSITLAND_API_KEY")
                .help("Environment variable holding the API key"),
        )
        .arg(
            Arg::new("timeout-secs")
                .long("timeout-secs")
                .default_value("30")
                .value_parser(value_parser!(u64))
                .help("Per-request timeout in seconds"),
        )
        .arg(
            Arg::new("max-in-flight")
                .long("max-in-flight")
                .default_value("4")
                .value_parser(value_parser!(usize))
                .help("Maximum scenarios processed concurrently"),
        )
        .arg(
            Arg::new("out-dir")
                .long("out-dir")
                .default_value(".")
                .help("Directory for divergence artifacts"),
        );

    let matches = cli.get_matches();

    let corpus_path = matches.get_one::<String>("corpus").unwrap();
    let timeout_secs = *matches.get_one::<u64>("timeout-secs").unwrap();
    let max_in_flight = *matches.get_one::<usize>("max-in-flight").unwrap();
    let out_dir = matches.get_one::<String>("out-dir").unwrap();
    let api_key_env = matches.get_one::<String>("api-key-env").unwrap();

    let targets: Vec<Target> = matches
        .get_many::<String>("endpoints")
        .unwrap()
        .map(|url| Target::from_url(url.clone()))
        .collect();

    let mut client_config =
        ClientConfig::new().with_timeout(Duration::from_secs(timeout_secs));
    match std::env::var(api_key_env) {
        Ok(key) => client_config = client_config.with_api_key(key),
        Err(_) => {
            tracing::warn!(
                var = %api_key_env,
                "no API key in environment, sending unauthenticated requests"
            );
        }
    }

    let client = HttpEndpointClient::new(client_config).context("building HTTP client")?;
    let sink = FsReportSink::new(out_dir);
    let runner = ScenarioRunner::new(
        RunnerConfig::new(targets).with_max_in_flight(max_in_flight),
        Arc::new(client),
        Arc::new(sink),
    );

    let handle = RunHandle::new();
    {
        let handle = handle.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("interrupt received, finishing in-flight scenarios");
                handle.cancel();
            }
        });
    }

    let summary = runner
        .run(&CorpusReader::new(corpus_path), &handle)
        .await?;

    println!();
    println!(
        "run {}: scenarios {}  clean {}  divergent {}  skipped {}",
        summary.run_id,
        summary.scenarios_total,
        summary.clean,
        summary.divergent,
        summary.skipped
    );

    std::process::exit(if summary.passed() { 0 } else { 1 });
}
