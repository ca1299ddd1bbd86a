use crate::filter::parse_months;
use crate::types::{DisplayMode, FilterSelection};
use clap::Parser;
use std::path::PathBuf;

/// Terminal sales dashboard: filter orders and compare them with annual
/// industry targets.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Orders sheet exported as CSV.
    #[arg(long, default_value = "pedidos.csv")]
    pub orders: PathBuf,

    /// Targets sheet exported as CSV.
    #[arg(long, default_value = "metas.csv")]
    pub targets: PathBuf,

    /// What the centre of each attainment donut shows.
    #[arg(long, value_enum, default_value_t = DisplayMode::Percent)]
    pub mode: DisplayMode,

    /// Number of products in the top products table.
    #[arg(long, default_value_t = 10)]
    pub top: usize,

    /// Rows shown per ranked table on screen.
    #[arg(long, default_value_t = 15)]
    pub rows: usize,

    #[arg(long)]
    pub city: Vec<String>,

    #[arg(long)]
    pub client: Vec<String>,

    #[arg(long)]
    pub industry: Vec<String>,

    #[arg(long)]
    pub year: Vec<i32>,

    /// Month abbreviation, e.g. "Jan".
    #[arg(long)]
    pub month: Vec<String>,

    /// Render once with the given filters and exit instead of opening the menu.
    #[arg(long)]
    pub batch: bool,

    /// Write the rendered view as JSON (batch mode).
    #[arg(long)]
    pub json: Option<PathBuf>,
}

impl Args {
    /// Initial filter state from the command line flags.
    pub fn selection(&self) -> FilterSelection {
        FilterSelection {
            cities: self.city.iter().cloned().collect(),
            clients: self.client.iter().cloned().collect(),
            industries: self.industry.iter().cloned().collect(),
            years: self.year.iter().copied().collect(),
            months: parse_months(&self.month.join(",")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = Args::parse_from(["sales_dashboard"]);
        assert_eq!(args.orders, PathBuf::from("pedidos.csv"));
        assert_eq!(args.mode, DisplayMode::Percent);
        assert_eq!(args.top, 10);
        assert!(args.selection().is_empty());
    }

    #[test]
    fn filter_flags_build_a_selection() {
        let args = Args::parse_from([
            "sales_dashboard",
            "--city",
            "Recife",
            "--city",
            "Olinda",
            "--year",
            "2024",
            "--month",
            "feb",
            "--mode",
            "value",
            "--batch",
        ]);
        let sel = args.selection();
        assert_eq!(sel.cities.len(), 2);
        assert!(sel.years.contains(&2024));
        assert!(sel.months.contains("Feb"));
        assert_eq!(args.mode, DisplayMode::Value);
        assert!(args.batch);
    }
}
