use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use wlm_display::api;
use wlm_display::assets::AssetLoader;
use wlm_display::models::{AppConfig, ChannelReading, ChannelView, DisplaySnapshot};
use wlm_display::server::{self, FeedMode};

#[derive(Parser)]
#[command(name = "wlm-display")]
#[command(about = "Live browser display for multi-channel wavelength meters")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server, reading from the upstream wavemeter
    Serve,
    /// Start the HTTP server with a simulated wavemeter
    Dev,
    /// Print the display color of a frequency or wavelength
    Color {
        /// Frequency in GHz
        #[arg(short, long, conflicts_with = "wavelength", required_unless_present = "wavelength")]
        frequency: Option<f64>,

        /// Wavelength in nm
        #[arg(short, long)]
        wavelength: Option<f64>,
    },
    /// Extract the embedded config.yaml for customization
    Init {
        /// Overwrite an existing file
        #[arg(long, short)]
        force: bool,
    },
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "wlm-display API",
        description = "Live browser display for multi-channel wavelength meters",
        version = "0.1.0",
        license(name = "MIT")
    ),
    paths(api::handle_channels, api::handle_color),
    components(schemas(
        api::ColorResponse,
        DisplaySnapshot,
        ChannelView,
        ChannelReading,
    )),
    tags(
        (name = "Display", description = "Current channel readouts"),
        (name = "Color", description = "Wavelength to color mapping")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Serve) => run_server(FeedMode::Upstream).await,
        Some(Commands::Dev) => run_server(FeedMode::Simulated).await,
        Some(Commands::Color {
            frequency,
            wavelength,
        }) => run_color_command(frequency, wavelength),
        Some(Commands::Init { force }) => run_init_command(force),
        None => {
            run_status_command();
            Ok(())
        }
    }
}

fn init_cli_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wlm_display=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();
}

fn config_file_from_env() -> Option<PathBuf> {
    std::env::var("CONFIG_FILE").ok().map(PathBuf::from)
}

/// Print the mapped color (no server needed)
fn run_color_command(frequency: Option<f64>, wavelength: Option<f64>) -> anyhow::Result<()> {
    init_cli_logging();

    let nm = match (frequency, wavelength) {
        (Some(f), _) => spectrum_color::frequency_to_wavelength(f)?,
        (None, Some(w)) => w,
        (None, None) => anyhow::bail!("Give --frequency or --wavelength"),
    };
    let rgb = spectrum_color::wavelength_to_rgb(nm)?;

    println!("wavelength: {nm:.3} nm");
    println!("rgb:        {}, {}, {}", rgb.r, rgb.g, rgb.b);
    println!("hex:        {}", rgb.to_hex());
    println!("gradient:   {}", rgb.gradient_css());
    Ok(())
}

/// Extract the embedded config to the filesystem
fn run_init_command(force: bool) -> anyhow::Result<()> {
    init_cli_logging();

    let loader = AssetLoader::new(config_file_from_env());
    let report = loader.init(force)?;

    for f in &report.written {
        println!("  + {f}");
    }
    for f in &report.skipped {
        println!("  - {f} (exists, use --force to overwrite)");
    }
    Ok(())
}

/// Display status and configuration information
fn run_status_command() {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    let bind_addr = std::env::var("BIND_ADDR").ok();
    let config_file = std::env::var("CONFIG_FILE").ok();
    let upstream = std::env::var("UPSTREAM_URL").ok();

    println!("wlm-display v{VERSION}");
    println!("Live browser display for multi-channel wavelength meters\n");

    println!("Environment Variables:");
    println!(
        "  BIND_ADDR    = {}",
        bind_addr.as_deref().unwrap_or("0.0.0.0:3000 (default)")
    );
    println!(
        "  CONFIG_FILE  = {}",
        config_file.as_deref().unwrap_or("(not set)")
    );
    println!(
        "  UPSTREAM_URL = {}",
        upstream.as_deref().unwrap_or("(not set)")
    );

    let loader = AssetLoader::new(config_file.map(PathBuf::from));
    let source = match loader.config_file() {
        Some(path) if loader.config_is_external() => path.display().to_string(),
        Some(_) => "embedded (file not found)".to_string(),
        None => "embedded".to_string(),
    };
    println!("\nConfig: {source}");
    println!("Assets: {}", AssetLoader::list_static().join(", "));

    println!("\nCommands:");
    println!("  wlm-display serve    Start the server with the upstream feed");
    println!("  wlm-display dev      Start the server with a simulated wavemeter");
    println!("  wlm-display color    Print the color of a frequency or wavelength");
    println!("  wlm-display init     Extract the embedded config");
    println!("\nRun 'wlm-display --help' for more details.");
}

/// Run the HTTP server
async fn run_server(mode: FeedMode) -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wlm_display=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config_file = config_file_from_env();
    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let upstream = std::env::var("UPSTREAM_URL").ok();

    tracing::info!(
        config = ?config_file.as_ref().map(|p| p.display().to_string()).unwrap_or_else(|| "embedded".to_string()),
        ?mode,
        "Starting"
    );

    let loader = AssetLoader::new(config_file);
    let config = AppConfig::load_from_assets(&loader).with_upstream(upstream);

    let state = server::create_app_state(config)?;
    let _feed = server::spawn_feed(&state, mode)?;

    let app = server::build_router(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "wlm-display listening");

    axum::serve(listener, app).await?;

    Ok(())
}
