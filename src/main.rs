use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use folio::assets::{AssetCategory, AssetLoader};
use folio::models::AppConfig;
use folio::server;
use folio::services::{FileWatcher, InlineSource, PortfolioPipeline};

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Folio - renders a single-page portfolio from a JSON profile")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the portfolio page to a file
    Render {
        /// Profile location: file path, http(s) URL, or "-" for stdin
        #[arg(short, long)]
        data: Option<String>,

        /// HTML template with the anchor regions
        #[arg(short, long)]
        template: Option<PathBuf>,

        /// Output file, or "-" for stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Start the HTTP server
    Serve,
    /// Start the HTTP server with dev mode (live reload)
    Dev,
    /// Extract embedded assets to filesystem for customization
    Init {
        /// Extract the starter site (index.html, data.json)
        #[arg(long)]
        site: bool,

        /// Extract the card templates
        #[arg(long)]
        cards: bool,

        /// Extract folio.yaml
        #[arg(long)]
        config: bool,

        /// Extract all assets
        #[arg(long)]
        all: bool,

        /// Overwrite existing files
        #[arg(long, short)]
        force: bool,

        /// List embedded assets without extracting
        #[arg(long)]
        list: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Render {
            data,
            template,
            output,
        }) => run_render_command(data, template, output).await,
        Some(Commands::Init {
            site,
            cards,
            config,
            all,
            force,
            list,
        }) => run_init_command(site, cards, config, all, force, list),
        Some(Commands::Serve) => run_server().await,
        Some(Commands::Dev) => run_dev_server().await,
        None => {
            run_status_command();
            Ok(())
        }
    }
}

/// Asset loader with optional external paths from env vars
fn asset_loader_from_env() -> AssetLoader {
    let site_dir = std::env::var("SITE_DIR").ok().map(PathBuf::from);
    let config_file = std::env::var("CONFIG_FILE").ok().map(PathBuf::from);
    AssetLoader::new(site_dir, config_file)
}

/// Paths given on the command line are relative to the working directory
fn cli_path(path: &Path) -> PathBuf {
    if path.is_relative() && path.exists() {
        std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
    } else {
        path.to_path_buf()
    }
}

/// Render the page once (no server needed)
async fn run_render_command(
    data: Option<String>,
    template: Option<PathBuf>,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    // Minimal logging for CLI; stdout may carry the page
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "folio=warn".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    let asset_loader = Arc::new(asset_loader_from_env());
    let mut config = AppConfig::load_from_assets(&asset_loader);

    if let Some(template) = template {
        config.template = cli_path(&template);
    }

    let mut stdin_profile = None;
    match data.as_deref() {
        Some("-") => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            stdin_profile = Some(text);
        }
        Some(location) => {
            config.data = location.to_string();
            if !config.data_is_remote() {
                config.data = cli_path(Path::new(location)).display().to_string();
            }
        }
        None => {}
    }

    let output = config.render_output(output);

    let mut pipeline = PortfolioPipeline::new(Arc::new(config), asset_loader);
    if let Some(text) = stdin_profile {
        pipeline = pipeline.with_source(Box::new(InlineSource::new("stdin", text)));
    }

    let rendered = pipeline
        .run()
        .await
        .map_err(|e| anyhow::anyhow!("Render failed: {e}"))?;
    let html = rendered.html();

    if output == Path::new("-") {
        print!("{html}");
        return Ok(());
    }

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&output, &html)?;

    let summary = rendered.summary;
    println!(
        "Rendered {} ({} experience, {} education, {} certifications, {} projects; {} bytes)",
        output.display(),
        summary.experience,
        summary.education,
        summary.certifications,
        summary.projects,
        html.len()
    );

    Ok(())
}

/// Extract embedded assets to filesystem
fn run_init_command(
    site: bool,
    cards: bool,
    config: bool,
    all: bool,
    force: bool,
    list: bool,
) -> anyhow::Result<()> {
    if list {
        println!("Embedded assets:\n");
        println!("Site:");
        for f in AssetLoader::list_embedded(AssetCategory::Site) {
            println!("  {f}");
        }
        println!("\nCards:");
        for f in AssetLoader::list_embedded(AssetCategory::Cards) {
            println!("  {f}");
        }
        println!("\nConfig:");
        for f in AssetLoader::list_embedded(AssetCategory::Config) {
            println!("  {f}");
        }
        return Ok(());
    }

    // Determine which categories to extract
    let mut categories = Vec::new();
    if all || site {
        categories.push(AssetCategory::Site);
    }
    if all || cards {
        categories.push(AssetCategory::Cards);
    }
    if all || config {
        categories.push(AssetCategory::Config);
    }

    if categories.is_empty() {
        eprintln!("No categories specified. Use --all, --site, --cards, or --config");
        eprintln!("\nRun 'folio init --list' to see embedded assets.");
        std::process::exit(1);
    }

    let report = asset_loader_from_env().init(&categories, force)?;

    if !report.written.is_empty() {
        println!("Extracted {} files:", report.written.len());
        for f in &report.written {
            println!("  + {f}");
        }
    }
    if !report.skipped.is_empty() {
        println!(
            "\nSkipped {} existing files (use --force to overwrite):",
            report.skipped.len()
        );
        for f in &report.skipped {
            println!("  - {f}");
        }
    }

    if report.written.is_empty() && report.skipped.is_empty() {
        println!("No files to extract.");
    }

    Ok(())
}

/// Display status and configuration information
fn run_status_command() {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    let bind_addr = std::env::var("BIND_ADDR").ok();
    let config_file = std::env::var("CONFIG_FILE").ok();
    let site_dir = std::env::var("SITE_DIR").ok();

    println!("Folio v{VERSION}");
    println!("Renders a single-page portfolio from a JSON profile\n");

    println!("Environment Variables:");
    println!(
        "  BIND_ADDR   = {}",
        bind_addr.as_deref().unwrap_or("0.0.0.0:3000 (default)")
    );
    println!(
        "  CONFIG_FILE = {}",
        config_file.as_deref().unwrap_or("(not set)")
    );
    println!(
        "  SITE_DIR    = {}",
        site_dir.as_deref().unwrap_or("(not set)")
    );

    println!("\nAsset Sources:");

    let loader = asset_loader_from_env();

    let config_source = match config_file {
        Some(ref path) if Path::new(path).exists() => path.to_string(),
        Some(_) => "embedded (file not found)".to_string(),
        None => "embedded".to_string(),
    };
    println!("  Config:  {config_source}");

    let embedded_count = AssetLoader::list_embedded(AssetCategory::Site).len();
    match site_dir {
        Some(ref path) if Path::new(path).exists() => {
            let count = loader.list_site().len();
            println!("  Site:    {path} ({count} files, {embedded_count} embedded)");
        }
        _ => println!("  Site:    embedded ({embedded_count} files)"),
    }

    let config = AppConfig::load_from_assets(&loader);
    println!("  Profile: {}", config.data);
    println!("  Template: {}", config.template.display());
    if let Some(ref cards) = config.cards_dir {
        println!("  Cards:   {}", cards.display());
    }

    println!("\nCommands:");
    println!("  folio serve    Start the HTTP server");
    println!("  folio dev      Start server with dev mode (live reload)");
    println!("  folio render   Render the page to a file");
    println!("  folio init     Extract embedded assets");
    println!("\nRun 'folio --help' for more details.");
}

fn init_server_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "folio=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn log_asset_sources(loader: &AssetLoader) {
    let config_file = std::env::var("CONFIG_FILE").ok();
    tracing::info!(
        site = %loader
            .site_dir()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "embedded".to_string()),
        config = %config_file.unwrap_or_else(|| "embedded".to_string()),
        "Asset sources configured"
    );
}

/// Run the HTTP server
async fn run_server() -> anyhow::Result<()> {
    init_server_tracing();

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let asset_loader = Arc::new(asset_loader_from_env());
    log_asset_sources(&asset_loader);

    let state = server::create_app_state(asset_loader);
    let app = server::build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "Folio server listening");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Run the HTTP server with dev mode (file watching, live reload)
async fn run_dev_server() -> anyhow::Result<()> {
    init_server_tracing();

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let asset_loader = Arc::new(asset_loader_from_env());
    log_asset_sources(&asset_loader);

    // Watch the site directory for changes
    let file_watcher = Arc::new(FileWatcher::new(
        asset_loader.site_dir().map(PathBuf::from),
    ));
    if file_watcher.is_active() {
        tracing::info!("File watcher active for live reload");
    } else {
        tracing::warn!("File watcher not active - set SITE_DIR to enable live reload");
    }

    let mut state = server::create_app_state(asset_loader);
    state.live_reload = true;

    let app = server::build_router(state).nest("/dev", server::build_dev_router(file_watcher));

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "Folio dev server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
