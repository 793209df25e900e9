use clap::{Parser, Subcommand};
use lib::webhook::{Parameters, WebhookRequest};

#[derive(Parser)]
#[command(name = "cxhook")]
#[command(about = "Fulfillment webhook for conversational agents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show version
    Version,

    /// Create the configuration directory and a default config.json.
    Init {
        /// Config file path (default: CXHOOK_CONFIG_PATH or ~/.cxhook/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<std::path::PathBuf>,
    },

    /// Run the webhook server (POST / for fulfillment calls, GET /health for probes).
    Serve {
        /// Config file path (default: CXHOOK_CONFIG_PATH or ~/.cxhook/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<std::path::PathBuf>,

        /// Listen port (default from PORT env, then config, then 8080)
        #[arg(long, short)]
        port: Option<u16>,

        /// Bind address (default from config or 127.0.0.1). PORT does not change it;
        /// in a container or hosted runtime pass 0.0.0.0 (or set server.bind).
        #[arg(long, short, value_name = "ADDR")]
        bind: Option<String>,
    },

    /// Send one fulfillment request to a running webhook and print the response.
    Call {
        /// Fulfillment tag (generateAccountNumber, validateAccountNumber, greeting, joke)
        #[arg(long, short)]
        tag: String,

        /// Session parameter as name=value; repeatable.
        #[arg(long = "param", short = 'P', value_name = "NAME=VALUE", value_parser = parse_param)]
        params: Vec<(String, String)>,

        /// Session id to send in sessionInfo.session.
        #[arg(long, value_name = "ID", default_value = "")]
        session: String,

        /// Webhook URL (default: http://<bind>:<port>/ from config)
        #[arg(long, value_name = "URL")]
        url: Option<String>,

        /// Config file path (default: CXHOOK_CONFIG_PATH or ~/.cxhook/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<std::path::PathBuf>,
    },
}

fn parse_param(s: &str) -> Result<(String, String), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got {:?}", s))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("empty parameter name in {:?}", s));
    }
    Ok((name.to_string(), value.to_string()))
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_filter = match cli.command {
        Some(Commands::Serve { .. }) => "info",
        _ => "warn",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    match cli.command {
        Some(Commands::Version) => {
            println!("cxhook {}", env!("CARGO_PKG_VERSION"));
        }
        Some(Commands::Init { config }) => {
            if let Err(e) = run_init(config) {
                log::error!("init failed: {:#}", e);
                std::process::exit(1);
            }
        }
        Some(Commands::Serve { config, port, bind }) => {
            if let Err(e) = run_serve(config, port, bind).await {
                log::error!("serve failed: {:#}", e);
                std::process::exit(1);
            }
        }
        Some(Commands::Call {
            tag,
            params,
            session,
            url,
            config,
        }) => {
            if let Err(e) = run_call(config, url, tag, session, params).await {
                log::error!("call failed: {:#}", e);
                std::process::exit(1);
            }
        }
        None => {
            println!("Run with --help for usage");
        }
    }
}

fn run_init(config_path: Option<std::path::PathBuf>) -> anyhow::Result<()> {
    let path = config_path.unwrap_or_else(lib::config::default_config_path);
    let dir = lib::init::init_config_dir(&path)?;
    println!("initialized configuration at {}", dir.display());
    Ok(())
}

async fn run_serve(
    config_path: Option<std::path::PathBuf>,
    port: Option<u16>,
    bind: Option<String>,
) -> anyhow::Result<()> {
    let (mut config, path) = lib::config::load_config(config_path)?;
    log::debug!("config loaded from {}", path.display());
    config.server.port = port.unwrap_or_else(|| lib::config::resolve_port(&config));
    if let Some(b) = bind {
        config.server.bind = b;
    }
    lib::webhook::run_server(config).await
}

async fn run_call(
    config_path: Option<std::path::PathBuf>,
    url: Option<String>,
    tag: String,
    session: String,
    params: Vec<(String, String)>,
) -> anyhow::Result<()> {
    let url = match url {
        Some(u) => u,
        None => {
            let (config, _) = lib::config::load_config(config_path)?;
            format!(
                "http://{}:{}/",
                config.server.bind.trim(),
                lib::config::resolve_port(&config)
            )
        }
    };
    let parameters: Parameters = params.into_iter().collect();
    let request = WebhookRequest::new(tag, session, parameters);

    let res = reqwest::Client::new()
        .post(&url)
        .json(&request)
        .send()
        .await?;
    let status = res.status();
    let body = res.text().await?;
    if !status.is_success() {
        anyhow::bail!("{} returned {}: {}", url, status, body.trim());
    }
    match serde_json::from_str::<serde_json::Value>(&body) {
        Ok(value) => println!("{}", serde_json::to_string_pretty(&value)?),
        Err(_) => println!("{}", body),
    }
    Ok(())
}
