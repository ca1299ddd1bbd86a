use crate::error::Result;
use crate::types::{ActivationSummary, ColorState, DisplayMode, DonutSpec};
use crate::util::{format_currency, format_number};
use crate::view::DashboardView;
use serde::Serialize;
use std::path::Path;
use tabled::{settings::Style, Table, Tabled};
use tracing::info;

pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    info!(path = %path.display(), rows = rows.len(), "wrote csv");
    Ok(())
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    info!(path = %path.display(), "wrote json");
    Ok(())
}

pub fn preview_table<T>(title: &str, note: Option<&str>, rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    println!("{}", title);
    if let Some(n) = note {
        println!("({})", n);
    }
    println!();
    let slice: Vec<T> = rows.iter().take(max_rows).cloned().collect();
    if slice.is_empty() {
        println!("(no rows)\n");
        return;
    }
    let table_str = Table::new(slice).with(Style::markdown()).to_string();
    println!("{}\n", table_str);
}

#[derive(Clone, Tabled)]
struct DonutLine {
    #[tabled(rename = "Industry")]
    industry: String,
    #[tabled(rename = "Centre")]
    center: String,
    #[tabled(rename = "Realized")]
    realized: String,
    #[tabled(rename = "Target")]
    target: String,
    #[tabled(rename = "Remaining")]
    remaining: String,
    #[tabled(rename = "Ring")]
    ring: String,
    #[tabled(rename = "State")]
    state: String,
}

// Ten-cell text stand-in for the ring, filled up to the clamped ratio.
fn ring(spec: &DonutSpec) -> String {
    let filled = (spec.ratio.clamp(0.0, 1.0) * 10.0).floor() as usize;
    let mark = match spec.color_state {
        ColorState::OnTarget => '#',
        ColorState::BelowTarget => '=',
    };
    let mut s: String = std::iter::repeat(mark).take(filled).collect();
    s.extend(std::iter::repeat('.').take(10 - filled));
    s
}

fn donut_lines(donuts: &[DonutSpec]) -> Vec<DonutLine> {
    donuts
        .iter()
        .map(|d| DonutLine {
            industry: d.industry.clone(),
            center: d.center_label.clone(),
            realized: format_currency(d.realized),
            target: format_currency(d.target),
            remaining: format_currency(d.remaining),
            ring: ring(d),
            state: d.color_state.to_string(),
        })
        .collect()
}

/// Print the whole dashboard. `max_rows` caps the ranked client and city
/// tables.
pub fn render_dashboard(view: &DashboardView, max_rows: usize) {
    preview_table("Summary", None, &view.cards, view.cards.len());

    let mode = match view.mode {
        DisplayMode::Percent => "centre: percent",
        DisplayMode::Value => "centre: value",
    };
    preview_table(
        "Goal Attainment by Industry",
        Some(mode),
        &donut_lines(&view.donuts),
        view.donuts.len(),
    );

    preview_table(
        "Client Activation by Industry",
        None,
        &activation_lines(&view.activation),
        view.activation.len(),
    );

    preview_table("Clients", Some("ranked by total"), &view.clients, max_rows);
    preview_table("Cities", Some("ranked by total"), &view.cities, max_rows);
    preview_table("Top Products", None, &view.products, view.products.len());
    preview_table("Monthly Detail", None, &view.monthly, view.monthly.len());
}

#[derive(Clone, Tabled)]
struct ActivationLine {
    #[tabled(rename = "Industry")]
    industry: String,
    #[tabled(rename = "Active Clients")]
    active: usize,
    #[tabled(rename = "Annual Target")]
    target: String,
    #[tabled(rename = "Attainment")]
    ratio: String,
}

fn activation_lines(rows: &[ActivationSummary]) -> Vec<ActivationLine> {
    rows.iter()
        .map(|a| ActivationLine {
            industry: a.industry.clone(),
            active: a.active_clients,
            target: format_number(a.annual_activation_target, 0),
            ratio: format!("{}%", format_number(a.activation_ratio * 100.0, 1)),
        })
        .collect()
}
