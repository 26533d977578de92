//! Place Explorer: browse hotels, restaurants and landmarks on a map
//!
//! Usage:
//!   place-explorer                          - Start the desktop app
//!   place-explorer search <lat> <lon> [r]   - One headless search, printed
//!   place-explorer config                   - Show resolved configuration
//!   place-explorer help                     - Show help

mod app;
mod ui;

use std::env;
use std::process::ExitCode;

use app::ExplorerApp;
use iced::window;
use place_explorer::config::{self, ExplorerConfig};
use place_explorer::geo::{LatLng, Viewport};
use place_explorer::{PlaceExplorer, PlacesClient};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_SEARCH_RADIUS_M: f64 = 1000.0;

fn main() -> ExitCode {
    init_logging();

    let args: Vec<String> = env::args().collect();

    if args.len() > 1 {
        return handle_cli_command(&args[1], &args[2..]);
    }

    start_app()
}

fn init_logging() {
    // try_init so a second call is harmless
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("place_explorer=info")),
        )
        .try_init();
}

fn load_config() -> Option<ExplorerConfig> {
    match ExplorerConfig::load() {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::error!("Configuration error: {}", e);
            eprintln!("Error: {}", e);
            None
        }
    }
}

fn handle_cli_command(cmd: &str, rest: &[String]) -> ExitCode {
    match cmd {
        "search" => {
            let Some((center, radius)) = parse_search_args(rest) else {
                eprintln!("Usage: place-explorer search <lat> <lon> [radius_m]");
                return ExitCode::FAILURE;
            };
            let Some(config) = load_config() else {
                return ExitCode::FAILURE;
            };
            run_search(config, center, radius)
        }
        "config" => {
            let path = config::config_path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "<no config dir>".to_string());
            println!("Config file: {}", path);
            let resolved = ExplorerConfig::resolve();
            match resolved {
                Ok(config) => {
                    println!("{}", config.redacted());
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    ExitCode::FAILURE
                }
            }
        }
        "help" | "--help" | "-h" => {
            println!("Place Explorer - hotels, restaurants and landmarks around the map\n");
            println!("Usage: place-explorer [command]\n");
            println!("Commands:");
            println!("  (none)                        Start the desktop app");
            println!("  search <lat> <lon> [radius]   Search once around a point (radius in meters, default 1000)");
            println!("  config                        Show resolved configuration");
            println!("  help                          Show this help message");
            println!("\nSet {} (or {}) to your places API key.", config::ENV_API_KEY, config::ENV_API_KEY_FALLBACK);
            ExitCode::SUCCESS
        }
        _ => {
            eprintln!("Unknown command: {}", cmd);
            eprintln!("Run 'place-explorer help' for usage");
            ExitCode::FAILURE
        }
    }
}

fn parse_search_args(args: &[String]) -> Option<(LatLng, f64)> {
    let lat: f64 = args.first()?.parse().ok()?;
    let lon: f64 = args.get(1)?.parse().ok()?;
    let radius = match args.get(2) {
        Some(r) => r.parse().ok()?,
        None => DEFAULT_SEARCH_RADIUS_M,
    };
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) || radius <= 0.0 {
        return None;
    }
    Some((LatLng::new(lat, lon), radius))
}

fn run_search(config: ExplorerConfig, center: LatLng, radius: f64) -> ExitCode {
    let client = match PlacesClient::from_config(&config) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create tokio runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // A square viewport whose half-diagonal is the requested radius
    let viewport = viewport_for_radius(center, radius);
    let mut explorer = PlaceExplorer::new(config.quiet_period());

    rt.block_on(explorer.refresh(&client, &viewport));

    for marker in explorer.markers() {
        let popup = &marker.popup;
        print!("{} {}", marker.icon.glyph(), popup.title);
        if let Some(breadcrumb) = &popup.breadcrumb {
            print!(" ({})", breadcrumb);
        }
        if let Some(address) = &popup.address {
            print!(" - {}", address);
        }
        println!();
    }
    println!("{}", explorer.status_text());
    ExitCode::SUCCESS
}

fn viewport_for_radius(center: LatLng, radius: f64) -> Viewport {
    let mut viewport = Viewport::new(center, 15.0, 512.0, 512.0);
    // Each zoom step halves the radius; walk towards the closest fit
    while viewport.search_radius() < radius && viewport.zoom > place_explorer::geo::MIN_ZOOM {
        viewport.zoom_by(-1.0);
    }
    while viewport.search_radius() > radius * 2.0 && viewport.zoom < place_explorer::geo::MAX_ZOOM {
        viewport.zoom_by(1.0);
    }
    let scale = radius / viewport.search_radius();
    viewport.resize(512.0 * scale, 512.0 * scale);
    viewport
}

fn start_app() -> ExitCode {
    let Some(config) = load_config() else {
        return ExitCode::FAILURE;
    };
    let client = match PlacesClient::from_config(&config) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    tracing::info!("Starting Place Explorer ({})", config.redacted());

    let result = iced::application(ExplorerApp::title, ExplorerApp::update, ExplorerApp::view)
        .subscription(ExplorerApp::subscription)
        .theme(ExplorerApp::theme)
        .window(window::Settings {
            size: app::INITIAL_WINDOW,
            position: window::Position::Centered,
            resizable: true,
            ..Default::default()
        })
        .antialiasing(true)
        .run_with(move || ExplorerApp::new(config, client));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Application error: {}", e);
            ExitCode::FAILURE
        }
    }
}
