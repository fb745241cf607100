//! Bookscout: an incremental book-search core written in Rust
//!
//! Demo binary: runs a catalog search from the command line and prints the
//! accumulated results.

use anyhow::Result;
use bookscout::{
    config::Settings,
    network::HttpClient,
    providers::ProviderLoader,
    search::{SearchController, SearchMode, SessionStatus},
};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    // Parse arguments
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut mode_flag: Option<SearchMode> = None;
    let mut suggest_only = false;
    let mut pages: u32 = 1;
    let mut terms: Vec<String> = Vec::new();

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-a" | "--author" => mode_flag = Some(SearchMode::Author),
            "-s" | "--suggest" => suggest_only = true,
            "-p" | "--pages" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--pages requires a value"))?;
                pages = value.parse()?;
            }
            "-h" | "--help" => {
                print_usage();
                return Ok(());
            }
            "-V" | "--version" => {
                println!("bookscout {}", bookscout::VERSION);
                return Ok(());
            }
            _ => terms.push(arg),
        }
    }

    if terms.is_empty() {
        print_usage();
        return Ok(());
    }
    let query = terms.join(" ");

    info!("Starting bookscout v{}", bookscout::VERSION);

    // Load configuration
    let settings = load_settings()?;
    let mode = mode_flag.unwrap_or(settings.search.default_mode);

    // Initialize HTTP client
    let client = HttpClient::with_settings(&settings.outgoing)?;

    if suggest_only {
        let suggestions = bookscout::suggest::fetch_suggestions(
            &client,
            &settings.search.suggest_backend,
            &query,
            mode,
        )
        .await
        .unwrap_or_default();

        if suggestions.is_empty() {
            println!("No suggestions for '{}'", query);
        }
        for suggestion in suggestions {
            println!("{}", suggestion.text);
        }
        return Ok(());
    }

    // Load the configured provider
    let provider = ProviderLoader::load(&settings)?;

    let controller = SearchController::new(client, provider)
        .with_page_size(settings.search.page_size)
        .with_timeout(Duration::from_secs_f64(settings.outgoing.request_timeout))
        .with_max_page(settings.search.max_page);

    // Run the search, then extend it page by page
    controller.search(&query, mode, 0).await?;
    for _ in 1..pages.max(1) {
        if !controller.has_more() {
            break;
        }
        controller.load_more().await?;
    }

    let session = controller.session();
    match session.status() {
        SessionStatus::Empty => {
            println!("No results for '{}'", query);
        }
        _ => {
            for (i, book) in session.results().iter().enumerate() {
                let mut line = format!("{:3}. {}", i + 1, book.title);
                if !book.authors.is_empty() {
                    line.push_str(&format!(" - {}", book.author_line()));
                }
                if let Some(ref date) = book.published_date {
                    line.push_str(&format!(" ({})", date));
                }
                println!("{}", line);
            }
            println!(
                "\nShowing {} of {} results for '{}' ({} search)",
                session.results().len(),
                session.total_available(),
                query,
                session.mode()
            );
        }
    }

    Ok(())
}

/// Load settings from file or use defaults
fn load_settings() -> Result<Settings> {
    let paths = [
        PathBuf::from("settings.yml"),
        PathBuf::from("config/settings.yml"),
        dirs::config_dir()
            .map(|p| p.join("bookscout/settings.yml"))
            .unwrap_or_default(),
    ];

    // Check environment variable first
    if let Ok(path) = std::env::var("BOOKSCOUT_SETTINGS_PATH") {
        let path = PathBuf::from(path);
        if path.exists() {
            info!("Loading settings from: {}", path.display());
            let mut settings = Settings::from_file(&path)?;
            settings.merge_env();
            return Ok(settings);
        }
    }

    // Try each default path
    for path in paths.iter() {
        if path.exists() {
            info!("Loading settings from: {}", path.display());
            let mut settings = Settings::from_file(path)?;
            settings.merge_env();
            return Ok(settings);
        }
    }

    // Use defaults
    info!("No settings file found, using defaults");
    let mut settings = Settings::default();
    settings.merge_env();
    Ok(settings)
}

/// Print usage information
fn print_usage() {
    println!(
        r#"
bookscout {}
Incremental book search over external catalog APIs

USAGE:
    bookscout [OPTIONS] <QUERY>...

OPTIONS:
    -a, --author           Search by author instead of title
    -s, --suggest          Print autocomplete suggestions instead of searching
    -p, --pages <N>        Number of pages to load (default: 1)
    -h, --help             Print help information
    -V, --version          Print version information

ENVIRONMENT VARIABLES:
    BOOKSCOUT_SETTINGS_PATH  Path to settings.yml
    BOOKSCOUT_PROVIDER       Search provider (google_books, open_library)
    BOOKSCOUT_API_KEY        API key for the active provider
    BOOKSCOUT_DEBUG          Enable debug mode (true/false)
"#,
        bookscout::VERSION
    );
}
