use crate::error::{DashboardError, Result};
use crate::types::{IndustryTarget, OrderRecord, RawOrderRow, RawTargetRow};
use crate::util::{month_abbrev, parse_date_safe, parse_f64_safe, text_or};
use chrono::Datelike;
use csv::{ReaderBuilder, StringRecord, Trim};
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

/// The read-only tables every recomputation runs against.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub orders: Vec<OrderRecord>,
    pub targets: Vec<IndustryTarget>,
    pub has_product: bool,
}

#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub order_rows: usize,
    pub loaded_orders: usize,
    pub parse_errors: usize,
    pub target_rows: usize,
}

// (canonical name, accepted header spellings)
const ORDER_COLUMNS: [(&str, &[&str]); 5] = [
    ("SaleDate", &["SaleDate", "Data da Venda"]),
    ("City", &["City", "Cidade"]),
    ("Client", &["Client", "Cliente"]),
    ("Industry", &["Industry", "Indústria"]),
    ("SaleValue", &["SaleValue", "Valor"]),
];
const PRODUCT_COLUMN: &[&str] = &["Product", "Produto"];
const TARGET_COLUMNS: [(&str, &[&str]); 2] = [
    ("Industry", &["Industry", "Indústria"]),
    ("AnnualValueTarget", &["AnnualValueTarget", "Meta Valor Anual"]),
];
const ACTIVATION_COLUMN: &[&str] = &["AnnualActivationTarget", "Meta Positivação Anual"];

fn has_column(headers: &StringRecord, names: &[&str]) -> bool {
    headers.iter().any(|h| names.contains(&h.trim()))
}

fn require_columns(
    headers: &StringRecord,
    sheet: &'static str,
    columns: &[(&'static str, &[&str])],
) -> Result<()> {
    for (canonical, names) in columns {
        if !has_column(headers, names) {
            return Err(DashboardError::MissingColumn {
                sheet,
                column: *canonical,
            });
        }
    }
    Ok(())
}

pub fn load_dataset(orders_path: &Path, targets_path: &Path) -> Result<(Dataset, LoadReport)> {
    info!(orders = %orders_path.display(), targets = %targets_path.display(), "loading dataset");
    let orders_file = std::fs::File::open(orders_path)?;
    let targets_file = std::fs::File::open(targets_path)?;
    let (orders, has_product, mut report) = load_orders_from_reader(orders_file)?;
    let targets = load_targets_from_reader(targets_file)?;
    report.target_rows = targets.len();
    info!(
        orders = report.loaded_orders,
        skipped = report.parse_errors,
        targets = report.target_rows,
        has_product,
        "dataset loaded"
    );
    Ok((
        Dataset {
            orders,
            targets,
            has_product,
        },
        report,
    ))
}

/// Read the orders sheet. Returns the records, whether a product column was
/// present, and a load report. Rows with an unusable date or value are
/// skipped and counted.
pub fn load_orders_from_reader<R: Read>(
    reader: R,
) -> Result<(Vec<OrderRecord>, bool, LoadReport)> {
    let mut rdr = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::Headers)
        .from_reader(reader);
    let headers = rdr.headers()?.clone();
    require_columns(&headers, "orders", &ORDER_COLUMNS)?;
    let has_product = has_column(&headers, PRODUCT_COLUMN);
    if !has_product {
        warn!("orders sheet has no product column; product ranking will be empty");
    }

    let mut report = LoadReport::default();
    let mut orders = Vec::new();
    for result in rdr.deserialize::<RawOrderRow>() {
        report.order_rows += 1;
        let row = match result {
            Ok(r) => r,
            Err(e) => {
                debug!(error = %e, "unreadable order row");
                report.parse_errors += 1;
                continue;
            }
        };

        let sale_date = match parse_date_safe(row.sale_date.as_deref()) {
            Some(d) => d,
            None => {
                report.parse_errors += 1;
                continue;
            }
        };
        let sale_value = match parse_f64_safe(row.sale_value.as_deref()) {
            Some(v) if v >= 0.0 => v,
            _ => {
                report.parse_errors += 1;
                continue;
            }
        };

        let product = if has_product {
            row.product
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty())
        } else {
            None
        };

        orders.push(OrderRecord {
            sale_date,
            city: text_or(row.city, "Unknown"),
            client: text_or(row.client, "Unknown"),
            industry: text_or(row.industry, "Unknown"),
            product,
            sale_value,
            year: sale_date.year(),
            month_name: month_abbrev(sale_date.month()).to_string(),
            month_number: sale_date.month(),
        });
    }
    report.loaded_orders = orders.len();
    Ok((orders, has_product, report))
}

/// Read the targets sheet. Industry is the key: later duplicates are
/// ignored. Unusable, negative or absent target values become 0.
pub fn load_targets_from_reader<R: Read>(reader: R) -> Result<Vec<IndustryTarget>> {
    let mut rdr = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::Headers)
        .from_reader(reader);
    let headers = rdr.headers()?.clone();
    require_columns(&headers, "targets", &TARGET_COLUMNS)?;
    if !has_column(&headers, ACTIVATION_COLUMN) {
        warn!("targets sheet has no activation column; activation targets default to 0");
    }

    let mut seen: HashSet<String> = HashSet::new();
    let mut targets = Vec::new();
    for result in rdr.deserialize::<RawTargetRow>() {
        let row = match result {
            Ok(r) => r,
            Err(e) => {
                debug!(error = %e, "unreadable target row");
                continue;
            }
        };
        let industry = match row.industry {
            Some(i) if !i.trim().is_empty() => i.trim().to_string(),
            _ => continue,
        };
        if !seen.insert(industry.clone()) {
            warn!(%industry, "duplicate target row ignored");
            continue;
        }
        let value = parse_f64_safe(row.annual_value_target.as_deref()).unwrap_or(0.0);
        let activation = parse_f64_safe(row.annual_activation_target.as_deref()).unwrap_or(0.0);
        targets.push(IndustryTarget {
            industry,
            annual_value_target: value.max(0.0),
            annual_activation_target: activation.max(0.0),
        });
    }
    Ok(targets)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORDERS: &str = "\
SaleDate,City,Client,Industry,Product,SaleValue
2024-01-10,Recife,Acme,A,Widget,500
2024-02-03,Olinda,Beta,A,Gadget,\"1,300.50\"
not-a-date,Recife,Acme,B,Widget,10
2024-02-20,Recife,,B,,-5
2023-12-31,Recife,Gamma,B,,200
";

    #[test]
    fn loads_orders_and_derives_dates() {
        let (orders, has_product, report) = load_orders_from_reader(ORDERS.as_bytes()).unwrap();
        assert!(has_product);
        assert_eq!(report.order_rows, 5);
        assert_eq!(report.loaded_orders, 3);
        assert_eq!(report.parse_errors, 2);
        assert_eq!(orders[0].year, 2024);
        assert_eq!(orders[0].month_name, "Jan");
        assert_eq!(orders[0].month_number, 1);
        assert_eq!(orders[1].sale_value, 1300.5);
        assert_eq!(orders[2].product, None);
        assert_eq!(orders[2].month_name, "Dec");
    }

    #[test]
    fn portuguese_headers_without_product() {
        let csv = "Data da Venda,Cidade,Cliente,Indústria,Valor\n15/03/2024,Recife,Acme,A,100\n";
        let (orders, has_product, _) = load_orders_from_reader(csv.as_bytes()).unwrap();
        assert!(!has_product);
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].city, "Recife");
        assert_eq!(orders[0].product, None);
    }

    #[test]
    fn missing_required_column_is_reported() {
        let csv = "SaleDate,City,Client,SaleValue\n2024-01-01,Recife,Acme,1\n";
        match load_orders_from_reader(csv.as_bytes()) {
            Err(DashboardError::MissingColumn { column, .. }) => assert_eq!(column, "Industry"),
            other => panic!("expected missing column, got {:?}", other.map(|r| r.0.len())),
        }
    }

    #[test]
    fn padded_headers_are_matched() {
        let csv = "SaleDate, City ,Client,Industry,SaleValue\n2024-01-10,Recife,Acme,A,5\n";
        let (orders, _, report) = load_orders_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(report.loaded_orders, 1);
        assert_eq!(orders[0].city, "Recife");

        let csv = " Industry,AnnualValueTarget \nA,1000\n";
        let targets = load_targets_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(targets[0].industry, "A");
        assert_eq!(targets[0].annual_value_target, 1000.0);
    }

    #[test]
    fn activation_column_is_optional() {
        let csv = "Industry,AnnualValueTarget\nA,1000\n";
        let targets = load_targets_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].annual_value_target, 1000.0);
        assert_eq!(targets[0].annual_activation_target, 0.0);
    }

    #[test]
    fn loads_targets_with_defaults() {
        let csv = "\
Indústria,Meta Valor Anual,Meta Positivação Anual
A,1000,10
B,n/a,
A,5000,50
C,-10,3
";
        let targets = load_targets_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(targets.len(), 3);
        assert_eq!(targets[0].annual_value_target, 1000.0);
        assert_eq!(targets[0].annual_activation_target, 10.0);
        assert_eq!(targets[1].annual_value_target, 0.0);
        assert_eq!(targets[2].annual_value_target, 0.0);
    }
}
