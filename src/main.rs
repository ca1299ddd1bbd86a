// Entry point and interactive menu.
//
// The dashboard runs as a console menu:
// - [1] loads the orders and targets sheets,
// - [2]/[3] edit or reset the active filters,
// - [4] switches what the donut centres show,
// - [5] recomputes and prints every panel for the current filters,
// - [6] exports the current view.
// `--batch` skips the menu and renders once.
mod config;
mod donut;
mod error;
mod filter;
mod loader;
mod output;
mod reports;
mod types;
mod util;
mod view;

use clap::Parser;
use config::Args;
use error::{DashboardError, Result};
use loader::Dataset;
use std::collections::BTreeSet;
use std::io::{self, BufRead, Write};
use std::path::Path;
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;
use types::{DisplayMode, FilterOptions, FilterSelection};

/// Menu state. Owned by `main` and passed down explicitly.
struct AppState {
    args: Args,
    data: Option<Dataset>,
    selection: FilterSelection,
    mode: DisplayMode,
}

impl AppState {
    fn dataset(&self) -> Result<&Dataset> {
        self.data
            .as_ref()
            .ok_or_else(|| DashboardError::NotLoaded("load the sheets first (option 1)".to_string()))
    }
}

/// One trimmed line from `reader`, or `None` once input is closed or unreadable.
fn read_trimmed_line<R: BufRead>(reader: &mut R) -> Option<String> {
    let mut buf = String::new();
    match reader.read_line(&mut buf) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(buf.trim().to_string()),
    }
}

fn prompt(label: &str) -> Option<String> {
    print!("{}", label);
    let _ = io::stdout().flush();
    read_trimmed_line(&mut io::stdin().lock())
}

fn read_choice() -> Option<String> {
    prompt("Enter choice: ")
}

/// Handle option [1]: load both sheets and report what was read.
fn handle_load(state: &mut AppState) {
    match loader::load_dataset(&state.args.orders, &state.args.targets) {
        Ok((data, report)) => {
            println!(
                "Processing dataset... ({} rows read, {} orders loaded, {} targets)",
                util::format_int(report.order_rows),
                util::format_int(report.loaded_orders),
                util::format_int(report.target_rows)
            );
            if report.parse_errors > 0 {
                println!(
                    "Note: {} rows skipped due to parse/validation errors.",
                    util::format_int(report.parse_errors)
                );
            }
            if !data.has_product {
                println!("Note: no product column; the products panel will be empty.");
            }
            println!();
            state.data = Some(data);
        }
        Err(e) => {
            error!(error = %e, "failed to load dataset");
            eprintln!("Failed to load files: {}\n", e);
        }
    }
}

fn show_choices(label: &str, options: &[String]) {
    if options.is_empty() {
        println!("{}: (none)", label);
    } else {
        println!("{}: {}", label, options.join(", "));
    }
}

/// Ask for one text field. Blank (or closed input) keeps the current value,
/// `-` clears it.
fn edit_field(
    label: &str,
    current: &BTreeSet<String>,
    available: &[String],
    parse: fn(&str) -> BTreeSet<String>,
) -> BTreeSet<String> {
    show_choices(label, available);
    let current_text: Vec<&str> = current.iter().map(String::as_str).collect();
    let input = prompt(&format!("{} [{}]: ", label, current_text.join(", "))).unwrap_or_default();
    match input.as_str() {
        "" => current.clone(),
        "-" => BTreeSet::new(),
        text => {
            let values = parse(text);
            let unknown = filter::unknown_values(&values, available);
            if !unknown.is_empty() {
                warn!(field = label, values = ?unknown, "filter values not present in data");
                println!("Warning: no data for {}", unknown.join(", "));
            }
            values
        }
    }
}

/// Handle option [2]: walk through every filter field.
fn handle_edit_filters(state: &mut AppState) -> Result<()> {
    let options: FilterOptions = filter::filter_options(&state.dataset()?.orders);
    println!("Comma-separated values; blank keeps, '-' clears.\n");
    let sel = &state.selection;
    let cities = edit_field("City", &sel.cities, &options.cities, filter::parse_list);
    let clients = edit_field("Client", &sel.clients, &options.clients, filter::parse_list);
    let industries = edit_field(
        "Industry",
        &sel.industries,
        &options.industries,
        filter::parse_list,
    );

    let year_options: Vec<String> = options.years.iter().map(i32::to_string).collect();
    let year_text: BTreeSet<String> = sel.years.iter().map(i32::to_string).collect();
    let years = edit_field("Year", &year_text, &year_options, filter::parse_list);
    let months = edit_field("Month", &sel.months, &options.months, filter::parse_months);

    state.selection = FilterSelection {
        cities,
        clients,
        industries,
        years: years.iter().filter_map(|y| y.parse().ok()).collect(),
        months,
    };
    println!();
    Ok(())
}

/// Handle option [5]: recompute and print every panel.
fn handle_render(state: &AppState) -> Result<()> {
    let data = state.dataset()?;
    let view = view::recompute(&state.selection, data, state.mode, state.args.top);
    print_selection(&state.selection);
    output::render_dashboard(&view, state.args.rows);
    Ok(())
}

/// Handle option [6]: write the view as JSON and the ranked tables as CSV.
fn handle_export(state: &AppState) -> Result<()> {
    let data = state.dataset()?;
    let view = view::recompute(&state.selection, data, state.mode, state.args.top);
    output::write_json(Path::new("dashboard.json"), &view)?;
    output::write_csv(Path::new("ranking_clients.csv"), &view.clients)?;
    output::write_csv(Path::new("ranking_cities.csv"), &view.cities)?;
    output::write_csv(Path::new("top_products.csv"), &view.products)?;
    println!("Outputs saved: dashboard.json, ranking_clients.csv, ranking_cities.csv, top_products.csv\n");
    Ok(())
}

fn print_selection(sel: &FilterSelection) {
    if sel.is_empty() {
        println!("Filters: none\n");
        return;
    }
    let join = |set: &BTreeSet<String>| set.iter().cloned().collect::<Vec<_>>().join(", ");
    let years: BTreeSet<String> = sel.years.iter().map(i32::to_string).collect();
    println!(
        "Filters: city [{}] client [{}] industry [{}] year [{}] month [{}]\n",
        join(&sel.cities),
        join(&sel.clients),
        join(&sel.industries),
        join(&years),
        join(&sel.months)
    );
}

fn run_batch(state: &AppState) -> Result<()> {
    let (data, report) = loader::load_dataset(&state.args.orders, &state.args.targets)?;
    if report.parse_errors > 0 {
        warn!(skipped = report.parse_errors, "rows skipped while loading");
    }
    let view = view::recompute(&state.selection, &data, state.mode, state.args.top);
    print_selection(&state.selection);
    output::render_dashboard(&view, state.args.rows);
    if let Some(path) = &state.args.json {
        output::write_json(path, &view)?;
    }
    Ok(())
}

fn report_error(result: Result<()>) {
    if let Err(e) = result {
        println!("Error: {}\n", e);
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let mut state = AppState {
        selection: args.selection(),
        mode: args.mode,
        data: None,
        args,
    };

    if state.args.batch {
        if let Err(e) = run_batch(&state) {
            error!(error = %e, "batch run failed");
            std::process::exit(1);
        }
        return;
    }

    loop {
        println!("Sales Dashboard");
        println!("[1] Load the files");
        println!("[2] Edit filters");
        println!("[3] Reset filters");
        println!(
            "[4] Donut centre: {} (toggle)",
            match state.mode {
                DisplayMode::Percent => "percent",
                DisplayMode::Value => "value",
            }
        );
        println!("[5] Show dashboard");
        println!("[6] Export");
        println!("[0] Exit\n");
        let Some(choice) = read_choice() else {
            println!("\nInput closed. Exiting the program.");
            break;
        };
        match choice.as_str() {
            "1" => handle_load(&mut state),
            "2" => report_error(handle_edit_filters(&mut state)),
            "3" => {
                state.selection.reset();
                println!("Filters cleared.\n");
            }
            "4" => {
                state.mode = state.mode.toggled();
                println!();
            }
            "5" => {
                println!();
                report_error(handle_render(&state));
            }
            "6" => report_error(handle_export(&state)),
            "0" => {
                println!("Exiting the program.");
                break;
            }
            _ => println!("Invalid choice. Please enter 0-6.\n"),
        }
    }
}
