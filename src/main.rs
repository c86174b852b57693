// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{Context, Result};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// Use library instead of local modules
use tuition_tracker::{
    format_rupiah, parse_export, sample_data, AppSettings, ConsoleNotifier, IdGenerator,
    Session, Tracker, TrackerConfig,
};

const CONFIG_ENV: &str = "TUITION_CONFIG";
const SETTINGS_ENV: &str = "TUITION_SETTINGS";

fn main() -> Result<()> {
    init_tracing();

    let args: Vec<String> = env::args().collect();
    let command = args.get(1).map(String::as_str).unwrap_or("ui");

    match command {
        "stats" => run_stats()?,
        "import" => {
            let file = args
                .get(2)
                .context("Usage: tuition-tracker import <file.csv>")?;
            run_import(Path::new(file))?;
        }
        "export" => {
            let dir = args.get(2).map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));
            run_export(&dir)?;
        }
        "ui" | "--import" => {
            // `tuition-tracker --import FILE` is shorthand for `ui --import FILE`
            run_ui_mode(import_arg(&args)?)?;
        }
        other => {
            eprintln!("❌ Unknown command: {}", other);
            eprintln!("   Usage: tuition-tracker [ui [--import FILE] | stats | import FILE | export [DIR]]");
            std::process::exit(2);
        }
    }

    Ok(())
}

/// The file following `--import`, if the flag is present.
fn import_arg(args: &[String]) -> Result<Option<PathBuf>> {
    let Some(i) = args.iter().position(|a| a == "--import") else {
        return Ok(None);
    };

    let file = args
        .get(i + 1)
        .context("Usage: tuition-tracker ui --import <file.csv>")?;
    Ok(Some(PathBuf::from(file)))
}

/// Log to stderr, quiet by default so the terminal UI is not disturbed.
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Sample class, with config and settings taken from the env-named JSON files
/// when present.
fn load_tracker() -> Result<Tracker> {
    let config = match env::var(CONFIG_ENV) {
        Ok(path) => TrackerConfig::load_from_file(&path)?,
        Err(_) => TrackerConfig::default(),
    };

    let mut tracker = sample_data::tracker(config, IdGenerator::clock());

    if let Ok(path) = env::var(SETTINGS_ENV) {
        tracker.replace_settings(AppSettings::load_or_default(&path));
    }

    debug!(
        students = tracker.students().len(),
        transactions = tracker.transactions().len(),
        "tracker loaded"
    );
    Ok(tracker)
}

fn read_import_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read import file: {:?}", path))
}

fn run_stats() -> Result<()> {
    let tracker = load_tracker()?;
    let stats = tracker.monthly_stats();
    let chart = tracker.chart_data();

    println!("📊 Tuition Summary");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Students:           {}", tracker.students().len());
    println!("Transactions:       {}", tracker.total_transactions());
    println!("Total collected:    {}", format_rupiah(tracker.total_collected()));

    println!("\n📅 SPP {}", tracker.config().reference_month);
    println!("Target:             {}", format_rupiah(stats.monthly_target));
    println!("Collected:          {}", format_rupiah(stats.current_month_spp));
    println!("Progress:           {}%", stats.percentage);
    println!("Students paid:      {}", stats.paid_count);

    println!("\n🍩 By payment type");
    if chart.is_placeholder() {
        println!("   (no payments yet)");
    }
    for slice in &chart.data {
        println!(
            "   {:<12} {:>16}  {:>5.1}%",
            slice.label,
            format_rupiah(slice.value),
            slice.percentage
        );
    }

    Ok(())
}

fn run_import(path: &Path) -> Result<()> {
    println!("📥 Importing students from {:?}", path);

    let text = read_import_file(path)?;
    let mut session = Session::new(load_tracker()?, ConsoleNotifier);
    let report = session.import_text(&text);

    println!("✓ Imported: {}", report.imported);
    if report.skipped > 0 {
        println!("⚠️  Skipped:  {} (missing NIS or name)", report.skipped);
    }

    println!("\n{:<10} {:<28} {:<6} Status", "NIS", "Name", "Class");
    for student in session.tracker().students() {
        println!(
            "{:<10} {:<28} {:<6} {}",
            student.nis,
            student.name,
            student.class,
            student.status.label()
        );
    }

    Ok(())
}

fn run_export(dir: &Path) -> Result<()> {
    let session = Session::new(load_tracker()?, ConsoleNotifier);
    let file = session.export();

    fs::create_dir_all(dir).with_context(|| format!("Failed to create {:?}", dir))?;
    let path = dir.join(&file.filename);
    fs::write(&path, &file.contents).with_context(|| format!("Failed to write {:?}", path))?;

    // Read the report back to confirm it is well formed
    let rows = parse_export(&file.contents)?;
    let total = rows.iter().map(|r| r.amount).fold(0, u64::saturating_add);

    println!("📤 {} {:?}", session.t("alert_export_success"), path);
    println!("✓ {} rows, {}", rows.len(), format_rupiah(total));

    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode(import: Option<PathBuf>) -> Result<()> {
    let tracker = load_tracker()?;
    let mut app = ui::App::new(tracker, env::current_dir()?);

    if let Some(path) = import {
        let text = read_import_file(&path)?;
        app.import_text(&text);
    }

    ui::run_ui(&mut app)?;

    if let Ok(path) = env::var(SETTINGS_ENV) {
        app.tracker().settings().save(&path)?;
    }

    println!("\n✅ UI closed successfully");

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_import: Option<PathBuf>) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use the API: cargo run --bin tuition-server --features server");
    std::process::exit(1);
}
