use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;

use imgpath::config::Config;
use imgpath::logging::{init_subscriber, LogFormat};
use imgpath::url_builder::{ParamValue, ParameterMap, UrlSpec};

/// imgpath - build signed asset URLs for an image delivery host
#[derive(Parser, Debug)]
#[command(name = "imgpath")]
#[command(version, about, long_about = None)]
struct Args {
    /// Asset path or fully-qualified source URL
    path: String,

    /// Path to a YAML source configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Source name from the configuration file
    #[arg(short, long)]
    source: Option<String>,

    /// Host to build the URL for (bypasses the configuration file)
    #[arg(long, conflicts_with_all = ["config", "source"])]
    host: Option<String>,

    /// Signing token for --host
    #[arg(long, requires = "host")]
    token: Option<String>,

    /// Use http instead of https for --host
    #[arg(long, requires = "host")]
    insecure: bool,

    /// Query parameter as key=value; may be repeated and keeps its order
    #[arg(short, long = "param", value_name = "KEY=VALUE", value_parser = parse_param)]
    params: Vec<(String, ParamValue)>,

    /// Log output format (text or json)
    #[arg(long, default_value = "text")]
    log_format: LogFormat,

    /// Log level used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn parse_param(arg: &str) -> Result<(String, ParamValue), String> {
    let (key, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", arg))?;
    if key.is_empty() {
        return Err(format!("empty parameter name in '{}'", arg));
    }
    Ok((key.to_string(), ParamValue::infer(value)))
}

fn resolve_spec(args: &Args) -> Result<UrlSpec> {
    if let Some(host) = &args.host {
        let spec = UrlSpec::new(args.path.clone(), host.clone())?.with_secure(!args.insecure);
        return Ok(match &args.token {
            Some(token) => spec.with_token(token.clone()),
            None => spec,
        });
    }

    let Some(config_path) = &args.config else {
        bail!("either --host or --config must be given");
    };

    let config = Config::from_file(config_path).with_context(|| {
        format!("Failed to load configuration from {}", config_path.display())
    })?;
    config.validate().context("Invalid configuration")?;

    let source = match &args.source {
        Some(name) => config
            .source(name)
            .ok_or_else(|| anyhow!("source '{}' is not configured", name))?,
        None => config
            .default_source()
            .ok_or_else(|| anyhow!("multiple sources configured; pick one with --source"))?,
    };

    tracing::info!(
        config_file = %config_path.display(),
        source = %source.name,
        signed = source.token.is_some(),
        "Configuration loaded successfully"
    );

    Ok(source.url_spec(args.path.clone())?)
}

fn run(args: Args) -> Result<()> {
    let spec = resolve_spec(&args)?;
    let params: ParameterMap = args.params.into_iter().collect();
    println!("{}", spec.to_url(&params));
    Ok(())
}

fn main() {
    let args = Args::parse();

    if let Err(e) = init_subscriber(args.log_format, &args.log_level) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = run(args) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
