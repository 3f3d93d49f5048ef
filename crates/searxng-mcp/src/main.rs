use anyhow::Result;
use clap::{Parser, Subcommand};
use searxng_core::{format_results, SearchQuery};
use searxng_local::{config, FallbackSearcher, SearxngConfig};

mod envelope;
#[cfg(feature = "stdio")]
mod mcp;

use envelope::{add_envelope_fields, error_from};

#[derive(Parser, Debug)]
#[command(name = "mcp-searxng")]
#[command(
    about = "SearXNG web search with ordered instance fallback (MCP stdio server)",
    long_about = None
)]
struct Cli {
    /// Defaults to `mcp-stdio` configured from the environment.
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run as an MCP stdio server (for MCP clients).
    #[cfg(feature = "stdio")]
    McpStdio(InstanceArgs),
    /// Run one search from the command line and print the formatted results.
    Search(SearchCmd),
    /// Diagnose configuration/launch issues (json).
    Doctor(DoctorCmd),
    /// Print version info.
    Version(VersionCmd),
}

#[derive(clap::Args, Debug, Clone)]
struct InstanceArgs {
    /// Comma-separated SearXNG base URLs, tried in order.
    #[arg(long, env = config::ENV_INSTANCES)]
    instances: Option<String>,
    /// User-Agent sent to every instance.
    #[arg(long, env = config::ENV_USER_AGENT)]
    user_agent: Option<String>,
    /// Set to 0 to skip TLS certificate verification.
    #[arg(long, env = config::ENV_TLS_REJECT_UNAUTHORIZED)]
    tls_reject_unauthorized: Option<String>,
    /// Skip TLS certificate verification (self-signed instances).
    #[arg(long, default_value_t = false)]
    insecure_tls: bool,
    /// Per-instance timeout (ms).
    #[arg(long, env = config::ENV_TIMEOUT_MS)]
    timeout_ms: Option<u64>,
}

impl InstanceArgs {
    fn config(&self) -> searxng_core::Result<SearxngConfig> {
        SearxngConfig::from_parts(
            self.instances.as_deref(),
            self.user_agent.as_deref(),
            self.insecure_tls
                || config::tls_verification_disabled(self.tls_reject_unauthorized.as_deref()),
            self.timeout_ms,
        )
    }
}

#[derive(clap::Args, Debug)]
struct SearchCmd {
    /// Search query.
    query: String,
    /// Page number.
    #[arg(long)]
    page: Option<u32>,
    /// Language code (e.g. en, zh, all).
    #[arg(long)]
    language: Option<String>,
    /// Category (repeatable), e.g. --category news --category it
    #[arg(long = "category")]
    categories: Vec<String>,
    /// Time range. Allowed: day, week, month, year
    #[arg(long)]
    time_range: Option<String>,
    /// 0: None, 1: Moderate, 2: Strict
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=2))]
    safesearch: Option<u8>,
    /// Output format: text|json
    #[arg(long = "output", alias = "format", default_value = "text")]
    output: String,
    #[command(flatten)]
    instances: InstanceArgs,
}

#[derive(clap::Args, Debug)]
struct DoctorCmd {
    /// Output format: json|text
    #[arg(long = "output", alias = "format", default_value = "json")]
    output: String,
    /// Attempt a local stdio MCP handshake (list_tools) to prove a client can start the server.
    ///
    /// This spawns a child `mcp-searxng mcp-stdio` process and calls `list_tools`.
    /// It does not contact any SearXNG instance.
    #[arg(long, action = clap::ArgAction::Set, default_value_t = true)]
    check_stdio: bool,
    /// Timeout for the stdio handshake (ms).
    #[arg(long, default_value_t = 3000)]
    handshake_timeout_ms: u64,
    #[command(flatten)]
    instances: InstanceArgs,
}

#[derive(clap::Args, Debug)]
struct VersionCmd {
    /// Output format: json|text
    #[arg(long = "output", alias = "format", default_value = "json")]
    output: String,
}

fn init_tracing() {
    // stdout carries the MCP protocol; logs go to stderr.
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Opt-in env file (`SEARXNG_ENV_FILE`): sets only variables not already present.
fn load_env_file() {
    let Ok(p) = std::env::var("SEARXNG_ENV_FILE") else {
        return;
    };
    let p = p.trim();
    if p.is_empty() {
        return;
    }
    let Ok(txt) = std::fs::read_to_string(p) else {
        tracing::warn!(path = p, "could not read SEARXNG_ENV_FILE");
        return;
    };
    for raw in txt.lines() {
        let s = raw.trim();
        if s.is_empty() || s.starts_with('#') {
            continue;
        }
        let Some((k, v)) = s.split_once('=') else {
            continue;
        };
        let k = k.trim();
        if k.is_empty() {
            continue;
        }
        // Don't override explicit process env.
        if std::env::var_os(k).is_none() {
            std::env::set_var(k, v.trim());
        }
    }
}

async fn run_search(args: SearchCmd) -> Result<()> {
    let cfg = args.instances.config()?;
    let searcher = FallbackSearcher::new(&cfg)?;

    let raw = serde_json::json!({
        "query": args.query,
        "page": args.page,
        "language": args.language,
        "categories": args.categories,
        "time_range": args.time_range,
        "safesearch": args.safesearch,
    });
    let q = SearchQuery::from_args(&raw);

    let t0 = std::time::Instant::now();
    let outcome = searcher.search(&q).await;
    let json_out = args.output.eq_ignore_ascii_case("json");

    match outcome {
        Ok(rs) => {
            if json_out {
                let mut payload = serde_json::json!({
                    "ok": true,
                    "request": q,
                    "instances": cfg.endpoints.as_slice(),
                    "results": rs.results,
                    "text": format_results(&rs.results),
                });
                add_envelope_fields(&mut payload, "search", t0.elapsed().as_millis());
                println!("{payload}");
            } else {
                println!("{}", format_results(&rs.results));
            }
            Ok(())
        }
        Err(e) => {
            if json_out {
                let mut payload = serde_json::json!({
                    "ok": false,
                    "request": q,
                    "instances": cfg.endpoints.as_slice(),
                    "error": error_from(&e),
                });
                add_envelope_fields(&mut payload, "search", t0.elapsed().as_millis());
                println!("{payload}");
            }
            Err(e.into())
        }
    }
}

async fn run_doctor(args: DoctorCmd) -> Result<()> {
    let t0 = std::time::Instant::now();
    let mut checks: Vec<serde_json::Value> = Vec::new();

    let cfg = args.instances.config();
    let configured = match &cfg {
        Ok(c) => serde_json::json!({
            "instances": c.endpoints.as_slice(),
            "user_agent": c.user_agent,
            "tls_verify": !c.accept_invalid_certs,
            "attempt_timeout_ms": c.attempt_timeout.as_millis() as u64,
        }),
        Err(_) => serde_json::Value::Null,
    };
    checks.push(match &cfg {
        Ok(_) => serde_json::json!({
            "name": "config_valid",
            "ok": true,
            "message": "configuration parsed",
            "hint": "",
        }),
        Err(e) => {
            let err = error_from(e);
            serde_json::json!({
                "name": "config_valid",
                "ok": false,
                "message": e.to_string(),
                "hint": err["hint"],
            })
        }
    });

    checks.push(stdio_handshake_check(&args).await);

    let ok = checks
        .iter()
        .all(|c| c["ok"].as_bool().unwrap_or(false));
    let mut payload = serde_json::json!({
        "ok": ok,
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "features": { "stdio": cfg!(feature = "stdio") },
        "configured": configured,
        "checks": checks,
    });
    add_envelope_fields(&mut payload, "doctor", t0.elapsed().as_millis());

    match args.output.to_ascii_lowercase().as_str() {
        "text" => {
            println!(
                "{} {} doctor: {}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION"),
                if ok { "ok" } else { "problems found" }
            );
            for c in &checks {
                let mark = if c["ok"].as_bool().unwrap_or(false) { "ok  " } else { "FAIL" };
                println!(
                    "  [{mark}] {}: {}",
                    c["name"].as_str().unwrap_or(""),
                    c["message"].as_str().unwrap_or("")
                );
            }
        }
        _ => println!("{payload}"),
    }
    Ok(())
}

#[cfg(feature = "stdio")]
async fn stdio_handshake_check(args: &DoctorCmd) -> serde_json::Value {
    use rmcp::service::ServiceExt;
    use rmcp::transport::{ConfigureCommandExt, TokioChildProcess};
    use tokio::process::Command;

    if !args.check_stdio {
        return serde_json::json!({
            "name": "mcp_stdio_handshake",
            "ok": true,
            "skipped": true,
            "elapsed_ms": 0,
            "error": null,
        });
    }

    let check_t0 = std::time::Instant::now();
    let probe = async {
        let exe = std::env::current_exe()?;
        let child = TokioChildProcess::new(Command::new(exe).configure(|cmd| {
            cmd.args(["mcp-stdio"]);
            // Keep stderr quiet for this probe.
            cmd.env("RUST_LOG", "error");
        }))?;
        let service = ().serve(child).await?;
        let tools = service.list_tools(Default::default()).await?;
        let names: Vec<String> = tools
            .tools
            .iter()
            .map(|t| t.name.clone().into_owned())
            .collect();
        let _ = service.cancel().await;
        anyhow::Ok(names)
    };
    let res = tokio::time::timeout(
        std::time::Duration::from_millis(args.handshake_timeout_ms),
        probe,
    )
    .await;
    let elapsed_ms = check_t0.elapsed().as_millis();

    match res {
        Ok(Ok(names)) => {
            let has_search = names.iter().any(|n| n == "web_search");
            serde_json::json!({
                "name": "mcp_stdio_handshake",
                "ok": has_search,
                "skipped": false,
                "elapsed_ms": elapsed_ms,
                "tools": names,
                "error": if has_search { serde_json::Value::Null } else { serde_json::json!("web_search tool missing") },
            })
        }
        Ok(Err(e)) => serde_json::json!({
            "name": "mcp_stdio_handshake",
            "ok": false,
            "skipped": false,
            "elapsed_ms": elapsed_ms,
            "error": e.to_string(),
        }),
        Err(_) => serde_json::json!({
            "name": "mcp_stdio_handshake",
            "ok": false,
            "skipped": false,
            "elapsed_ms": elapsed_ms,
            "error": format!("timed out after {}ms", args.handshake_timeout_ms),
        }),
    }
}

#[cfg(not(feature = "stdio"))]
async fn stdio_handshake_check(_args: &DoctorCmd) -> serde_json::Value {
    serde_json::json!({
        "name": "mcp_stdio_handshake",
        "ok": true,
        "skipped": true,
        "elapsed_ms": 0,
        "error": "built without the stdio feature",
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    load_env_file();

    let cli = Cli::parse();

    match cli.command {
        #[cfg(feature = "stdio")]
        None => {
            let cfg = SearxngConfig::from_env()?;
            mcp::serve_stdio(cfg)
                .await
                .map_err(|e| anyhow::anyhow!(e.to_string()))?;
        }
        #[cfg(not(feature = "stdio"))]
        None => {
            anyhow::bail!("built without the stdio feature; pass a subcommand (see --help)");
        }
        #[cfg(feature = "stdio")]
        Some(Commands::McpStdio(args)) => {
            mcp::serve_stdio(args.config()?)
                .await
                .map_err(|e| anyhow::anyhow!(e.to_string()))?;
        }
        Some(Commands::Search(args)) => run_search(args).await?,
        Some(Commands::Doctor(args)) => run_doctor(args).await?,
        Some(Commands::Version(args)) => {
            let v = serde_json::json!({
                "schema_version": envelope::SCHEMA_VERSION,
                "kind": "version",
                "ok": true,
                "name": env!("CARGO_PKG_NAME"),
                "version": env!("CARGO_PKG_VERSION"),
            });
            match args.output.to_ascii_lowercase().as_str() {
                "text" => println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
                _ => println!("{v}"),
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_search_flags() {
        let cli = Cli::try_parse_from([
            "mcp-searxng",
            "search",
            "rust async",
            "--category",
            "news",
            "--category",
            "it",
            "--safesearch",
            "0",
            "--instances",
            "http://a:8080,http://b:8080",
            "--output",
            "json",
        ])
        .unwrap();
        let Some(Commands::Search(s)) = cli.command else {
            panic!("expected search subcommand");
        };
        assert_eq!(s.query, "rust async");
        assert_eq!(s.categories, vec!["news".to_string(), "it".to_string()]);
        assert_eq!(s.safesearch, Some(0));
        let cfg = s.instances.config().unwrap();
        assert_eq!(cfg.endpoints.len(), 2);
    }

    #[test]
    fn cli_rejects_out_of_range_safesearch() {
        assert!(Cli::try_parse_from(["mcp-searxng", "search", "x", "--safesearch", "3"]).is_err());
    }

    #[test]
    fn no_subcommand_is_allowed() {
        let cli = Cli::try_parse_from(["mcp-searxng"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn insecure_flag_or_env_value_relaxes_tls() {
        let base = InstanceArgs {
            instances: None,
            user_agent: None,
            tls_reject_unauthorized: None,
            insecure_tls: false,
            timeout_ms: None,
        };
        assert!(!base.config().unwrap().accept_invalid_certs);
        let flag = InstanceArgs {
            insecure_tls: true,
            ..base.clone()
        };
        assert!(flag.config().unwrap().accept_invalid_certs);
        let env_style = InstanceArgs {
            tls_reject_unauthorized: Some("0".to_string()),
            ..base
        };
        assert!(env_style.config().unwrap().accept_invalid_certs);
    }
}
