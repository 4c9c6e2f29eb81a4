use clap::{Parser, ValueEnum};
use riffus::{server, ProviderKind, ServerConfig};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "riffus-server")]
#[command(about = "Music metadata search backend", long_about = None)]
struct Cli {
    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = riffus::config::DEFAULT_PORT)]
    port: u16,

    /// Address to bind
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0")]
    bind_addr: String,

    /// Upstream catalog
    #[arg(long, env = "PROVIDER", value_enum, default_value_t = Provider::Itunes)]
    provider: Provider,

    /// Override the provider base URL
    #[arg(long, env = "PROVIDER_BASE_URL")]
    provider_base_url: Option<String>,

    /// Cache seen tracks in memory and merge them into searches
    #[arg(long, env = "USE_CACHE")]
    use_cache: bool,

    /// Most tracks kept in the cache
    #[arg(long, env = "CACHE_CAPACITY", default_value_t = riffus::cache::DEFAULT_CACHE_CAPACITY)]
    cache_capacity: usize,

    /// Include error details in 500 responses
    #[arg(long, env = "DEVELOPMENT")]
    development: bool,

    /// Country used when a request doesn't name one
    #[arg(long, env = "DEFAULT_COUNTRY", default_value = "us")]
    default_country: String,

    /// Attempts per upstream request
    #[arg(long, env = "MAX_RETRIES", default_value_t = 3)]
    max_retries: u32,

    /// Base delay between attempts, grows linearly
    #[arg(long, env = "RETRY_DELAY_MS", default_value_t = 1000)]
    retry_delay_ms: u64,

    /// Per-attempt timeout
    #[arg(long, env = "TIMEOUT_MS", default_value_t = 10_000)]
    timeout_ms: u64,

    /// Fail fast on 4xx responses instead of retrying them
    #[arg(long, env = "NO_RETRY_CLIENT_ERRORS")]
    no_retry_client_errors: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum Provider {
    Itunes,
    Deezer,
}

impl From<Provider> for ProviderKind {
    fn from(p: Provider) -> Self {
        match p {
            Provider::Itunes => ProviderKind::Itunes,
            Provider::Deezer => ProviderKind::Deezer,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()?;

    let config = ServerConfig {
        bind_addr: cli.bind_addr,
        port: cli.port,
        provider: cli.provider.into(),
        provider_base_url: cli.provider_base_url,
        use_cache: cli.use_cache,
        cache_capacity: cli.cache_capacity,
        development: cli.development,
        default_country: cli.default_country,
        retry_client_errors: !cli.no_retry_client_errors,
        ..ServerConfig::default()
    }
    .with_retry_millis(cli.max_retries, cli.retry_delay_ms, cli.timeout_ms);

    server::run_server(config).await?;
    Ok(())
}
