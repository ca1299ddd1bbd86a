use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tabled::Tabled;

/// One row of the orders sheet as it comes off the CSV reader.
///
/// Headers are accepted in English or in the Portuguese of the source
/// workbook ("Data da Venda", "Cidade", ...).
#[derive(Debug, Deserialize)]
pub struct RawOrderRow {
    #[serde(rename = "SaleDate", alias = "Data da Venda")]
    pub sale_date: Option<String>,
    #[serde(rename = "City", alias = "Cidade")]
    pub city: Option<String>,
    #[serde(rename = "Client", alias = "Cliente")]
    pub client: Option<String>,
    #[serde(rename = "Industry", alias = "Indústria")]
    pub industry: Option<String>,
    #[serde(rename = "Product", alias = "Produto", default)]
    pub product: Option<String>,
    #[serde(rename = "SaleValue", alias = "Valor")]
    pub sale_value: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawTargetRow {
    #[serde(rename = "Industry", alias = "Indústria")]
    pub industry: Option<String>,
    #[serde(rename = "AnnualValueTarget", alias = "Meta Valor Anual")]
    pub annual_value_target: Option<String>,
    #[serde(rename = "AnnualActivationTarget", alias = "Meta Positivação Anual")]
    pub annual_activation_target: Option<String>,
}

/// A single sale. Immutable once loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRecord {
    pub sale_date: NaiveDate,
    pub city: String,
    pub client: String,
    pub industry: String,
    pub product: Option<String>,
    pub sale_value: f64,
    pub year: i32,
    pub month_name: String,
    pub month_number: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndustryTarget {
    pub industry: String,
    pub annual_value_target: f64,
    pub annual_activation_target: f64,
}

/// Active filter constraints. An empty set means "no restriction".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    pub cities: BTreeSet<String>,
    pub clients: BTreeSet<String>,
    pub industries: BTreeSet<String>,
    pub years: BTreeSet<i32>,
    pub months: BTreeSet<String>,
}

/// Distinct values available for each filter field.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterOptions {
    pub cities: Vec<String>,
    pub clients: Vec<String>,
    pub industries: Vec<String>,
    pub years: Vec<i32>,
    pub months: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SummaryMetrics {
    pub total: f64,
    pub count: usize,
    pub distinct_clients: usize,
    pub distinct_industries: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndustrySummary {
    pub industry: String,
    pub realized_value: f64,
    pub annual_value_target: f64,
    pub attainment_ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivationSummary {
    pub industry: String,
    pub active_clients: usize,
    pub annual_activation_target: f64,
    pub activation_ratio: f64,
}

/// Field used by `ranked_totals`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupField {
    Client,
    City,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct RankedRow {
    #[serde(rename = "Rank")]
    #[tabled(rename = "Rank")]
    pub rank: usize,
    #[serde(rename = "Key")]
    #[tabled(rename = "Key")]
    pub key: String,
    #[serde(rename = "Total")]
    #[tabled(rename = "Total")]
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct ProductRow {
    #[serde(rename = "Product")]
    #[tabled(rename = "Product")]
    pub product: String,
    #[serde(rename = "Total")]
    #[tabled(rename = "Total")]
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct MonthlyRow {
    #[serde(rename = "Year")]
    #[tabled(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Month")]
    #[tabled(rename = "Month")]
    pub month_name: String,
    #[serde(skip)]
    #[tabled(skip)]
    pub month_number: u32,
    #[serde(rename = "Orders")]
    #[tabled(rename = "Orders")]
    pub orders: usize,
    #[serde(rename = "Total")]
    #[tabled(rename = "Total")]
    pub total: f64,
}

/// What the centre of an attainment donut shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "camelCase")]
pub enum DisplayMode {
    #[default]
    Percent,
    Value,
}

impl DisplayMode {
    pub fn toggled(self) -> Self {
        match self {
            DisplayMode::Percent => DisplayMode::Value,
            DisplayMode::Value => DisplayMode::Percent,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ColorState {
    OnTarget,
    BelowTarget,
}

impl std::fmt::Display for ColorState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColorState::OnTarget => write!(f, "onTarget"),
            ColorState::BelowTarget => write!(f, "belowTarget"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DonutSpec {
    pub industry: String,
    pub realized: f64,
    pub target: f64,
    pub remaining: f64,
    pub ratio: f64,
    pub color_state: ColorState,
    pub center_label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct Card {
    #[tabled(rename = "Metric")]
    pub title: String,
    #[tabled(rename = "Value")]
    pub value: String,
}
