use crate::donut::donut_specs;
use crate::filter::{filter, filter_options};
use crate::loader::Dataset;
use crate::reports::{
    activation_attainment, industry_attainment, monthly_totals, ranked_totals, summary_metrics,
    top_products,
};
use crate::types::{
    ActivationSummary, Card, DisplayMode, DonutSpec, FilterOptions, FilterSelection, GroupField,
    MonthlyRow, ProductRow, RankedRow, SummaryMetrics,
};
use crate::util::{format_currency, format_int};
use serde::Serialize;

/// Everything the dashboard shows for one filter state.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub mode: DisplayMode,
    pub metrics: SummaryMetrics,
    pub cards: Vec<Card>,
    pub donuts: Vec<DonutSpec>,
    pub activation: Vec<ActivationSummary>,
    pub clients: Vec<RankedRow>,
    pub cities: Vec<RankedRow>,
    pub products: Vec<ProductRow>,
    pub monthly: Vec<MonthlyRow>,
    pub options: FilterOptions,
}

pub fn cards(m: &SummaryMetrics) -> Vec<Card> {
    vec![
        Card { title: "Total Sales".to_string(), value: format_currency(m.total) },
        Card { title: "Orders".to_string(), value: format_int(m.count) },
        Card { title: "Clients".to_string(), value: format_int(m.distinct_clients) },
        Card { title: "Industries".to_string(), value: format_int(m.distinct_industries) },
    ]
}

/// Filter the shared dataset and run every aggregation over the result.
///
/// `dataset` is only read; each call works on its own filtered copy.
pub fn recompute(
    selection: &FilterSelection,
    dataset: &Dataset,
    mode: DisplayMode,
    top_n: usize,
) -> DashboardView {
    let subset = filter(&dataset.orders, selection);
    let metrics = summary_metrics(&subset);
    let attainment = industry_attainment(&subset, &dataset.targets);
    DashboardView {
        mode,
        cards: cards(&metrics),
        metrics,
        donuts: donut_specs(&attainment, mode),
        activation: activation_attainment(&subset, &dataset.targets),
        clients: ranked_totals(&subset, GroupField::Client),
        cities: ranked_totals(&subset, GroupField::City),
        products: top_products(&subset, top_n),
        monthly: monthly_totals(&subset),
        options: filter_options(&subset),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::{load_orders_from_reader, load_targets_from_reader};
    use crate::types::ColorState;

    fn dataset() -> Dataset {
        let orders = "\
SaleDate,City,Client,Industry,SaleValue
2024-01-10,Recife,Acme,A,500
2024-02-11,Olinda,Beta,A,300
2024-02-12,Recife,Acme,B,200
2023-07-01,Recife,Gamma,B,1000
";
        let targets = "Industry,AnnualValueTarget,AnnualActivationTarget\nA,1000,2\nB,1000,4\n";
        let (orders, has_product, _) = load_orders_from_reader(orders.as_bytes()).unwrap();
        let targets = load_targets_from_reader(targets.as_bytes()).unwrap();
        Dataset { orders, targets, has_product }
    }

    #[test]
    fn recompute_with_year_filter() {
        let ds = dataset();
        let before = ds.orders.clone();
        let mut sel = FilterSelection::default();
        sel.years.insert(2024);
        let view = recompute(&sel, &ds, DisplayMode::Percent, 10);

        assert_eq!(view.metrics.total, 1000.0);
        assert_eq!(view.metrics.count, 3);
        assert_eq!(view.cards[0].value, "R$ 1,000.00");
        assert_eq!(view.donuts.len(), 2);
        assert_eq!(view.donuts[0].industry, "A");
        assert_eq!(view.donuts[0].center_label, "80%");
        assert_eq!(view.donuts[1].center_label, "20%");
        assert_eq!(view.clients[0].key, "Acme");
        assert_eq!(view.clients[0].total, 700.0);
        assert!(view.products.is_empty());
        assert_eq!(view.options.years, vec![2024]);
        assert_eq!(ds.orders, before);
    }

    #[test]
    fn empty_result_is_well_defined() {
        let ds = dataset();
        let mut sel = FilterSelection::default();
        sel.clients.insert("Nobody".to_string());
        let view = recompute(&sel, &ds, DisplayMode::Value, 10);
        assert_eq!(view.metrics, SummaryMetrics::default());
        assert!(view.donuts.is_empty());
        assert!(view.clients.is_empty());
        assert!(view.monthly.is_empty());
    }

    #[test]
    fn unfiltered_view_reaches_target() {
        let ds = dataset();
        let view = recompute(&FilterSelection::default(), &ds, DisplayMode::Value, 10);
        let b = &view.donuts[1];
        assert_eq!(b.color_state, ColorState::OnTarget);
        assert_eq!(b.center_label, "R$ 1.2k");
        assert_eq!(view.activation[0].activation_ratio, 1.0);
        assert!(serde_json::to_string(&view).unwrap().contains("\"onTarget\""));
    }
}
