use crate::types::{FilterOptions, FilterSelection, OrderRecord};
use crate::util::{month_abbrev, month_number};
use std::collections::{BTreeSet, HashSet};

impl FilterSelection {
    /// True when no field restricts anything.
    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
            && self.clients.is_empty()
            && self.industries.is_empty()
            && self.years.is_empty()
            && self.months.is_empty()
    }

    /// Clear every field, as the "reset filters" action does.
    pub fn reset(&mut self) {
        *self = FilterSelection::default();
    }

    pub fn matches(&self, r: &OrderRecord) -> bool {
        (self.cities.is_empty() || self.cities.contains(&r.city))
            && (self.clients.is_empty() || self.clients.contains(&r.client))
            && (self.industries.is_empty() || self.industries.contains(&r.industry))
            && (self.years.is_empty() || self.years.contains(&r.year))
            && (self.months.is_empty() || self.months.contains(&r.month_name))
    }
}

/// Keep the records that satisfy every non-empty field of `selection`.
///
/// Returns a fresh vector; `records` is never touched. Unknown values just
/// produce an empty result.
pub fn filter(records: &[OrderRecord], selection: &FilterSelection) -> Vec<OrderRecord> {
    if selection.is_empty() {
        return records.to_vec();
    }
    records
        .iter()
        .filter(|r| selection.matches(r))
        .cloned()
        .collect()
}

/// Distinct values for each filter field, sorted for display. Months follow
/// calendar order.
pub fn filter_options(records: &[OrderRecord]) -> FilterOptions {
    let cities: BTreeSet<&str> = records.iter().map(|r| r.city.as_str()).collect();
    let clients: BTreeSet<&str> = records.iter().map(|r| r.client.as_str()).collect();
    let industries: BTreeSet<&str> = records.iter().map(|r| r.industry.as_str()).collect();
    let years: BTreeSet<i32> = records.iter().map(|r| r.year).collect();
    let months: BTreeSet<(u32, &str)> = records
        .iter()
        .map(|r| (r.month_number, r.month_name.as_str()))
        .collect();

    FilterOptions {
        cities: cities.into_iter().map(String::from).collect(),
        clients: clients.into_iter().map(String::from).collect(),
        industries: industries.into_iter().map(String::from).collect(),
        years: years.into_iter().collect(),
        months: months.into_iter().map(|(_, m)| m.to_string()).collect(),
    }
}

/// Split comma-separated user input into trimmed, non-empty values.
pub fn parse_list(input: &str) -> BTreeSet<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Month abbreviations from comma-separated input, normalised to the
/// loader's spelling ("jan" -> "Jan"). Unknown names are kept as typed so
/// they simply match nothing.
pub fn parse_months(input: &str) -> BTreeSet<String> {
    parse_list(input)
        .into_iter()
        .map(|m| match month_number(&m) {
            Some(n) => month_abbrev(n).to_string(),
            None => m,
        })
        .collect()
}

/// Values in `selected` that do not occur in `available`. Used to warn the
/// user about filters that can only produce an empty result.
pub fn unknown_values<'a>(selected: &'a BTreeSet<String>, available: &[String]) -> Vec<&'a str> {
    let known: HashSet<&str> = available.iter().map(String::as_str).collect();
    selected
        .iter()
        .map(String::as_str)
        .filter(|s| !known.contains(s))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn rec(date: (i32, u32, u32), city: &str, client: &str, industry: &str, value: f64) -> OrderRecord {
        let d = NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap();
        OrderRecord {
            sale_date: d,
            city: city.to_string(),
            client: client.to_string(),
            industry: industry.to_string(),
            product: None,
            sale_value: value,
            year: date.0,
            month_name: crate::util::month_abbrev(date.1).to_string(),
            month_number: date.1,
        }
    }

    fn sample() -> Vec<OrderRecord> {
        vec![
            rec((2023, 11, 2), "Recife", "Acme", "A", 100.0),
            rec((2024, 1, 5), "Recife", "Beta", "B", 200.0),
            rec((2024, 1, 9), "Olinda", "Acme", "A", 300.0),
            rec((2024, 3, 1), "Caruaru", "Gamma", "C", 400.0),
        ]
    }

    #[test]
    fn empty_selection_returns_everything() {
        let data = sample();
        assert_eq!(filter(&data, &FilterSelection::default()), data);
    }

    #[test]
    fn fields_combine_with_and() {
        let data = sample();
        let mut sel = FilterSelection::default();
        sel.clients.insert("Acme".to_string());
        sel.years.insert(2024);
        let out = filter(&data, &sel);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].city, "Olinda");

        sel.cities = parse_list("Recife, Caruaru");
        assert!(filter(&data, &sel).is_empty());
    }

    #[test]
    fn values_within_a_field_combine_with_or() {
        let data = sample();
        let mut sel = FilterSelection::default();
        sel.months = parse_months("jan,mar");
        assert_eq!(filter(&data, &sel).len(), 3);
    }

    #[test]
    fn filtering_is_idempotent_and_leaves_source_alone() {
        let data = sample();
        let before = data.clone();
        let mut sel = FilterSelection::default();
        sel.industries.insert("A".to_string());
        let once = filter(&data, &sel);
        let twice = filter(&once, &sel);
        assert_eq!(once, twice);
        assert_eq!(data, before);
    }

    #[test]
    fn unknown_value_gives_empty_result() {
        let data = sample();
        let mut sel = FilterSelection::default();
        sel.cities.insert("Atlantis".to_string());
        assert!(filter(&data, &sel).is_empty());
        let opts = filter_options(&data);
        assert_eq!(unknown_values(&sel.cities, &opts.cities), vec!["Atlantis"]);
    }

    #[test]
    fn reset_clears_all_fields() {
        let mut sel = FilterSelection::default();
        sel.years.insert(2024);
        sel.cities.insert("Recife".to_string());
        assert!(!sel.is_empty());
        sel.reset();
        assert!(sel.is_empty());
    }

    #[test]
    fn options_are_sorted() {
        let opts = filter_options(&sample());
        assert_eq!(opts.cities, vec!["Caruaru", "Olinda", "Recife"]);
        assert_eq!(opts.years, vec![2023, 2024]);
        assert_eq!(opts.months, vec!["Jan", "Mar", "Nov"]);
    }
}
