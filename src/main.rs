use anyhow::Result;
use parts_catalog::app::{AppController, AppState, Command, CommandOutcome};
use parts_catalog::config::CatalogConfig;
use parts_catalog::domain::app_settings::Section;
use parts_catalog::domain::product::spec_label;
use parts_catalog::repository::{Repository, database::init_database};
use parts_catalog::services::CatalogStore;
use parts_catalog::services::data_source::{RemoteProductSource, SyntheticProductSource};
use parts_catalog::services::error_handling::{LogHelper, UserErrorFormatter};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let config = CatalogConfig::load()?;
    let pool = init_database(&config.database_path).await?;
    let repository = Repository::new(pool);

    let mut controller = AppController::new(config.clone(), &repository);
    let remote = RemoteProductSource::new(config.source_url.clone());
    let synthetic = SyntheticProductSource::from_config(&config);
    let outcome = controller.bootstrap(&remote, &synthetic).await?;
    info!(
        origin = %outcome.origin,
        count = outcome.products.len(),
        elapsed_ms = outcome.elapsed.as_millis() as u64,
        "Catalog ready"
    );

    render(controller.state(), &config);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if matches!(line, "quit" | "exit") {
            break;
        }

        let command = match line.parse::<Command>() {
            Ok(Command::Export { format, path: None }) => Command::Export {
                format,
                path: Some(PathBuf::from(format.default_file_name())),
            },
            Ok(command) => command,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };

        match controller.dispatch(command).await {
            Ok(outcome) => report(&outcome),
            Err(e) => {
                LogHelper::log_error_with_context("dispatch command", &e);
                println!("! {}", UserErrorFormatter::format_for_ui(&e));
            }
        }
        render(controller.state(), &config);
    }

    Ok(())
}

fn report(outcome: &CommandOutcome) {
    match outcome {
        CommandOutcome::Updated | CommandOutcome::Ignored => {}
        CommandOutcome::Rejected(message) => println!("! {}", message),
        CommandOutcome::Exported { path: Some(path), .. } => {
            println!("Exported to {}", path.display())
        }
        CommandOutcome::Exported { content, path: None, .. } => println!("{}", content),
        CommandOutcome::Calculated(value) => println!("= {}", value),
        CommandOutcome::ChainSpeed(speed) => println!("{}", speed.describe()),
    }
}

fn render(state: &AppState, config: &CatalogConfig) {
    let user = state
        .profiles
        .active()
        .map(|p| p.display_name().to_string())
        .unwrap_or_else(|| "guest".to_string());
    println!("\n[{}] theme: {} | user: {}", state.section, state.theme, user);
    if let Some(notice) = &state.notice {
        println!("! {}", notice);
    }

    match state.section {
        Section::Home => {
            for summary in CatalogStore::category_summaries(&config.categories) {
                println!("  {:<16} {:>6}  {}", summary.name, summary.count, summary.description);
            }
            let history = state.profiles.search_history();
            if !history.is_empty() {
                println!("Recent searches: {}", history.join(", "));
            }
        }
        Section::Products => render_products(state),
        Section::Calculator => println!("Calculator: {}", state.calculator.value),
        Section::Guide => {
            println!("Chain speed V = (P × Z × N) / 1000 m/min");
            println!("  P pitch (mm), Z sprocket teeth, N rpm. Try: speed 12.7 20 100");
        }
    }
}

fn render_products(state: &AppState) {
    if let Some(product) = state.selected() {
        println!("{} ({})", product.name, product.id);
        println!("  Model: {}  Code: {}", product.model, product.tsubaki_code);
        for (key, value) in &product.specifications {
            println!("  {}: {}", spec_label(key), value);
        }
        return;
    }

    let page = state.catalog.page();
    for product in &page.items {
        let marker = if state.profiles.is_bookmarked(&product.id) { "*" } else { " " };
        println!("{} {:<10} {:<36} {}", marker, product.id, product.name, product.tsubaki_code);
    }
    println!("{} products", state.catalog.filtered().len());

    if page.show_controls() {
        let window: Vec<String> = page
            .window
            .iter()
            .map(|n| if *n == page.current_page { format!("[{}]", n) } else { n.to_string() })
            .collect();
        println!(
            "{} {} {}  (page {} of {})",
            if page.has_previous() { "<" } else { " " },
            window.join(" "),
            if page.has_next() { ">" } else { " " },
            page.current_page,
            page.total_pages
        );
    }
}
