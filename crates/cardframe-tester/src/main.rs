//! Command line harness for inspecting card parsing and rendering.
//!
//! `parse` round-trips a card file through the object model and prints the
//! normalized JSON with diagnostics. `render` runs the full pipeline against a
//! host config and dumps the resulting UI tree, optionally driving scheduled
//! image loads to completion first.

use std::{
    fs,
    io::{self, Read},
    path::{Path, PathBuf},
    process,
    rc::Rc,
    sync::Arc,
};

use clap::{Parser, Subcommand};
use serde_json::json;

use cardframe_model::parse_card_str;
use cardframe_render::{
    CardRenderer, HostConfig, RenderError, ResolveError, ResourceRequest, ResourceResolver,
    SvgImageRenderer,
};

#[derive(Parser)]
#[command(name = "cardframe-tester")]
#[command(about = "Minimal CLI to drive the card rendering pipeline", long_about = None)]
struct Cli {
    /// Log renderer activity at debug level.
    #[arg(long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    Parse {
        #[arg(value_name = "CARD_JSON")]
        card: PathBuf,
    },
    Render {
        #[arg(value_name = "CARD_JSON")]
        card: PathBuf,
        #[arg(long, value_name = "HOST_CONFIG_JSON")]
        host_config: Option<PathBuf>,
        /// Drive scheduled image loads to completion before printing.
        #[arg(long)]
        resolve: bool,
        /// Pin the root panel to a fixed size, e.g. 400x600.
        #[arg(long, value_name = "WIDTHxHEIGHT")]
        fixed_size: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();
    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(level)
        .init();

    let exit_code = match run(cli) {
        Ok(_) => 0,
        Err(err) => {
            eprintln!("error: {err}");
            err.exit_code()
        }
    };
    process::exit(exit_code);
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Parse { card } => handle_parse(card),
        Command::Render {
            card,
            host_config,
            resolve,
            fixed_size,
        } => handle_render(card, host_config, resolve, fixed_size),
    }
}

fn handle_parse(card_path: PathBuf) -> Result<(), CliError> {
    let text =
        fs::read_to_string(&card_path).map_err(|err| CliError::CardRead(card_path.clone(), err))?;
    let parsed = parse_card_str(&text);
    let output = json!({
        "card": parsed.card.as_ref().map(|card| card.to_json()),
        "errors": parsed.errors,
        "warnings": parsed.warnings,
    });
    println!("{}", serde_json::to_string_pretty(&output).unwrap());
    if parsed.card.is_none() {
        return Err(CliError::CardParse(card_path));
    }
    Ok(())
}

fn handle_render(
    card_path: PathBuf,
    host_config_path: Option<PathBuf>,
    resolve: bool,
    fixed_size: Option<String>,
) -> Result<(), CliError> {
    let text =
        fs::read_to_string(&card_path).map_err(|err| CliError::CardRead(card_path.clone(), err))?;
    let host_config = match host_config_path {
        Some(path) => {
            load_host_config(&path).map_err(|err| CliError::HostConfigLoad(path.clone(), err))?
        }
        None => HostConfig::default(),
    };

    let mut renderer = CardRenderer::new(host_config).map_err(CliError::Renderer)?;
    renderer
        .element_renderers()
        .set("Image", Rc::new(SvgImageRenderer::default()));
    let http = Arc::new(HttpResolver::new());
    renderer.resource_resolvers().set("http", http.clone());
    renderer.resource_resolvers().set("https", http);
    renderer
        .resource_resolvers()
        .set("symbol", Arc::new(SymbolResolver));
    if let Some(spec) = fixed_size {
        let (width, height) = parse_fixed_size(&spec)?;
        renderer.set_fixed_dimensions(width, height);
    }

    let mut rendered = renderer.render_str(&text);
    let mut delivered = 0;
    if resolve && rendered.pending_load_count() > 0 {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .map_err(CliError::Runtime)?;
        delivered = runtime.block_on(rendered.resolve_images());
    }

    let output = json!({
        "root": rendered.root.to_json(),
        "speak": rendered.speak,
        "errors": rendered.errors,
        "warnings": rendered.warnings,
        "pendingLoads": rendered.pending_load_count(),
        "deliveredLoads": delivered,
    });
    println!("{}", serde_json::to_string_pretty(&output).unwrap());
    Ok(())
}

fn load_host_config(path: &Path) -> anyhow::Result<HostConfig> {
    let text = fs::read_to_string(path)?;
    Ok(HostConfig::from_json_str(&text)?)
}

fn parse_fixed_size(spec: &str) -> Result<(u32, u32), CliError> {
    spec.split_once(['x', 'X'])
        .and_then(|(width, height)| Some((width.trim().parse().ok()?, height.trim().parse().ok()?)))
        .ok_or_else(|| CliError::FixedSize(spec.to_string()))
}

/// Fetches `http:` and `https:` image URLs with a shared agent. A cache bypass
/// turns into a `cache-control: no-cache` request header.
struct HttpResolver {
    agent: ureq::Agent,
}

impl HttpResolver {
    fn new() -> Self {
        Self {
            agent: ureq::agent(),
        }
    }
}

impl ResourceResolver for HttpResolver {
    fn load(&self, request: &ResourceRequest) -> Result<Vec<u8>, ResolveError> {
        let mut builder = self.agent.get(request.url.as_str());
        if request.bypass_cache {
            builder = builder.header("cache-control", "no-cache");
        }
        let response = builder
            .call()
            .map_err(|err| ResolveError::Fetch(err.to_string()))?;
        let mut bytes = Vec::new();
        response
            .into_body()
            .into_reader()
            .read_to_end(&mut bytes)
            .map_err(|err| ResolveError::Fetch(err.to_string()))?;
        Ok(bytes)
    }
}

const STAR_SVG: &[u8] = br##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24"><path d="M12 2l2.9 6.6 7.1.6-5.4 4.7 1.6 7L12 17.3 5.8 20.9l1.6-7L2 9.2l7.1-.6z"/></svg>"##;
const DOT_SVG: &[u8] = br##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24"><circle cx="12" cy="12" r="6"/></svg>"##;

/// Serves a couple of embedded vector icons for `symbol:` URLs so demo cards
/// can exercise the load path without touching the network.
struct SymbolResolver;

impl ResourceResolver for SymbolResolver {
    fn load(&self, request: &ResourceRequest) -> Result<Vec<u8>, ResolveError> {
        let name = request.url.strip_prefix("symbol:").unwrap_or(&request.url);
        match name {
            "star" => Ok(STAR_SVG.to_vec()),
            "dot" => Ok(DOT_SVG.to_vec()),
            _ => Err(ResolveError::NotFound(request.url.clone())),
        }
    }
}

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error("card read failed ({0}): {1}")]
    CardRead(PathBuf, #[source] io::Error),
    #[error("card is not valid JSON ({0})")]
    CardParse(PathBuf),
    #[error("host config load failed ({0}): {1}")]
    HostConfigLoad(PathBuf, #[source] anyhow::Error),
    #[error("renderer setup failed: {0}")]
    Renderer(#[source] RenderError),
    #[error("invalid --fixed-size `{0}`, expected WIDTHxHEIGHT")]
    FixedSize(String),
    #[error("tokio runtime failed to start: {0}")]
    Runtime(#[source] io::Error),
}

impl CliError {
    fn exit_code(&self) -> i32 {
        match self {
            CliError::CardRead(_, _) => 1,
            CliError::CardParse(_) => 1,
            CliError::HostConfigLoad(_, _) => 2,
            CliError::Renderer(_) => 2,
            CliError::FixedSize(_) => 2,
            CliError::Runtime(_) => 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_size_accepts_width_by_height() {
        assert_eq!(parse_fixed_size("400x600").unwrap(), (400, 600));
        assert_eq!(parse_fixed_size("32X32").unwrap(), (32, 32));
        assert_eq!(parse_fixed_size(" 10 x 20 ").unwrap(), (10, 20));
    }

    #[test]
    fn fixed_size_rejects_everything_else() {
        assert!(parse_fixed_size("400").is_err());
        assert!(parse_fixed_size("wxh").is_err());
        assert!(parse_fixed_size("10x-20").is_err());
    }

    #[test]
    fn symbol_resolver_serves_known_icons() {
        let resolver = SymbolResolver;
        let bytes = resolver
            .load(&ResourceRequest::new("symbol:star"))
            .expect("star icon");
        assert!(bytes.starts_with(b"<svg"));
        assert!(matches!(
            resolver.load(&ResourceRequest::new("symbol:unknown")),
            Err(ResolveError::NotFound(_))
        ));
    }
}
