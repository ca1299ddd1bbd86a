use crate::types::{
    ActivationSummary, GroupField, IndustrySummary, IndustryTarget, MonthlyRow, OrderRecord,
    ProductRow, RankedRow, SummaryMetrics,
};
use crate::util::month_abbrev;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Card figures: total value, order count, distinct clients and industries.
pub fn summary_metrics(data: &[OrderRecord]) -> SummaryMetrics {
    let clients: HashSet<&str> = data.iter().map(|r| r.client.as_str()).collect();
    let industries: HashSet<&str> = data.iter().map(|r| r.industry.as_str()).collect();
    SummaryMetrics {
        total: data.iter().fold(0.0, |acc, r| acc + r.sale_value),
        count: data.len(),
        distinct_clients: clients.len(),
        distinct_industries: industries.len(),
    }
}

/// Ratio with the zero-default convention: a missing or zero target
/// yields 0, never NaN or infinity.
fn ratio(realized: f64, target: f64) -> f64 {
    if target > 0.0 {
        (realized / target).max(0.0)
    } else {
        0.0
    }
}

/// Realized value per industry against its annual value target, ascending by
/// industry name. Industries with no target row get target 0 and ratio 0.
pub fn industry_attainment(
    data: &[OrderRecord],
    targets: &[IndustryTarget],
) -> Vec<IndustrySummary> {
    let mut realized: BTreeMap<&str, f64> = BTreeMap::new();
    for r in data {
        *realized.entry(r.industry.as_str()).or_insert(0.0) += r.sale_value;
    }
    let by_industry: HashMap<&str, &IndustryTarget> =
        targets.iter().map(|t| (t.industry.as_str(), t)).collect();

    realized
        .into_iter()
        .map(|(industry, realized_value)| {
            let target = by_industry
                .get(industry)
                .map(|t| t.annual_value_target)
                .unwrap_or(0.0);
            IndustrySummary {
                industry: industry.to_string(),
                realized_value,
                annual_value_target: target,
                attainment_ratio: ratio(realized_value, target),
            }
        })
        .collect()
}

/// Distinct active clients per industry against the annual activation target.
/// Same ordering and zero-default join as `industry_attainment`.
pub fn activation_attainment(
    data: &[OrderRecord],
    targets: &[IndustryTarget],
) -> Vec<ActivationSummary> {
    let mut clients: BTreeMap<&str, HashSet<&str>> = BTreeMap::new();
    for r in data {
        clients
            .entry(r.industry.as_str())
            .or_default()
            .insert(r.client.as_str());
    }
    let by_industry: HashMap<&str, &IndustryTarget> =
        targets.iter().map(|t| (t.industry.as_str(), t)).collect();

    clients
        .into_iter()
        .map(|(industry, set)| {
            let target = by_industry
                .get(industry)
                .map(|t| t.annual_activation_target)
                .unwrap_or(0.0);
            ActivationSummary {
                industry: industry.to_string(),
                active_clients: set.len(),
                annual_activation_target: target,
                activation_ratio: ratio(set.len() as f64, target),
            }
        })
        .collect()
}

// Descending by total, ties ascending by key.
fn by_total_desc(a: &(String, f64), b: &(String, f64)) -> Ordering {
    b.1.partial_cmp(&a.1)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.0.cmp(&b.0))
}

fn sum_by<'a, F>(data: &'a [OrderRecord], key: F) -> Vec<(String, f64)>
where
    F: Fn(&'a OrderRecord) -> Option<&'a str>,
{
    let mut map: HashMap<&str, f64> = HashMap::new();
    for r in data {
        if let Some(k) = key(r) {
            *map.entry(k).or_insert(0.0) += r.sale_value;
        }
    }
    let mut rows: Vec<(String, f64)> = map.into_iter().map(|(k, v)| (k.to_string(), v)).collect();
    rows.sort_by(by_total_desc);
    rows
}

/// Totals per client or city, ranked 1..N by descending total.
pub fn ranked_totals(data: &[OrderRecord], field: GroupField) -> Vec<RankedRow> {
    let rows = match field {
        GroupField::Client => sum_by(data, |r| Some(r.client.as_str())),
        GroupField::City => sum_by(data, |r| Some(r.city.as_str())),
    };
    rows.into_iter()
        .enumerate()
        .map(|(idx, (key, total))| RankedRow {
            rank: idx + 1,
            key,
            total,
        })
        .collect()
}

/// The `n` best-selling products. Records without a product are ignored, so
/// a sheet with no product column gives an empty list.
pub fn top_products(data: &[OrderRecord], n: usize) -> Vec<ProductRow> {
    sum_by(data, |r| r.product.as_deref())
        .into_iter()
        .take(n)
        .map(|(product, total)| ProductRow { product, total })
        .collect()
}

/// Order count and value per calendar month, oldest first.
pub fn monthly_totals(data: &[OrderRecord]) -> Vec<MonthlyRow> {
    let mut map: BTreeMap<(i32, u32), (usize, f64)> = BTreeMap::new();
    for r in data {
        let e = map.entry((r.year, r.month_number)).or_insert((0, 0.0));
        e.0 += 1;
        e.1 += r.sale_value;
    }
    map.into_iter()
        .map(|((year, month_number), (orders, total))| MonthlyRow {
            year,
            month_name: month_abbrev(month_number).to_string(),
            month_number,
            orders,
            total,
        })
        .collect()
}
