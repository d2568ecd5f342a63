// Work-site and period filtering.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::period::Period;
use crate::types::{Record, UnifiedTable};

/// The work-site control: one site, or every site.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SiteSelection {
    #[default]
    All,
    Site(String),
}

impl SiteSelection {
    /// Parse a CLI value; `*` means every site. Any other value, including
    /// `all`, names a site.
    pub fn from_arg(value: &str) -> Self {
        let value = value.trim();
        if value == "*" {
            SiteSelection::All
        } else {
            SiteSelection::Site(value.to_string())
        }
    }

    pub fn matches(&self, company_name: &str) -> bool {
        match self {
            SiteSelection::All => true,
            SiteSelection::Site(name) => name == company_name,
        }
    }
}

/// The dashboard's current filter state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub site: SiteSelection,
    /// Selected period labels. Empty selects nothing.
    pub periods: Vec<String>,
}

impl Selection {
    /// Every site and every period present in `table`.
    pub fn everything(table: &UnifiedTable) -> Self {
        Self {
            site: SiteSelection::All,
            periods: available_periods(table)
                .into_iter()
                .map(|p| p.label)
                .collect(),
        }
    }

    pub fn with_site(mut self, site: SiteSelection) -> Self {
        self.site = site;
        self
    }

    pub fn with_periods<I, S>(mut self, periods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.periods = periods.into_iter().map(Into::into).collect();
        self
    }
}

/// A read-only copy of the rows a selection keeps.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilteredView {
    rows: Vec<Record>,
}

impl FilteredView {
    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Record> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Rows whose site matches and whose period label is selected.
pub fn apply(table: &UnifiedTable, selection: &Selection) -> FilteredView {
    let periods: HashSet<&str> = selection.periods.iter().map(String::as_str).collect();
    let rows = table
        .rows()
        .iter()
        .filter(|r| selection.site.matches(&r.company_name))
        .filter(|r| periods.contains(r.period_label.as_str()))
        .cloned()
        .collect();
    FilteredView { rows }
}

/// Distinct work sites, sorted.
pub fn available_sites(table: &UnifiedTable) -> Vec<String> {
    table
        .rows()
        .iter()
        .map(|r| r.company_name.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Distinct periods ordered by number, one entry per label.
pub fn available_periods(table: &UnifiedTable) -> Vec<Period> {
    let mut by_label: BTreeMap<&str, u32> = BTreeMap::new();
    for r in table.rows() {
        let n = by_label.entry(r.period_label.as_str()).or_insert(r.period_number);
        *n = (*n).min(r.period_number);
    }
    let mut periods: Vec<Period> = by_label
        .into_iter()
        .map(|(label, number)| Period {
            number,
            label: label.to_string(),
        })
        .collect();
    periods.sort();
    periods
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(site: &str, number: u32, label: &str) -> Record {
        Record {
            company_name: site.into(),
            sex: "F".into(),
            employee_name: format!("{site}-{number}"),
            role: "Servente".into(),
            employee_type: "Direct".into(),
            ot70_saturday: 0.0,
            ot70_weekday: 0.0,
            ot100: 0.0,
            paid_rest: 0.0,
            production: 0.0,
            production_reflex: 0.0,
            net_remuneration: 0.0,
            advance_payment: 0.0,
            period_number: number,
            period_label: label.into(),
        }
    }

    fn table() -> UnifiedTable {
        UnifiedTable::from_rows(vec![
            record("Obra B", 2, "Fevereiro"),
            record("Obra A", 1, "Janeiro"),
            record("Obra A", 2, "Fevereiro"),
            record("Obra C", 13, "Unknown"),
        ])
        .unwrap()
    }

    #[test]
    fn site_and_period_filters_combine() {
        let table = table();
        let selection = Selection::everything(&table)
            .with_site(SiteSelection::Site("Obra A".into()))
            .with_periods(["Fevereiro"]);
        let view = apply(&table, &selection);
        assert_eq!(view.len(), 1);
        assert_eq!(view.rows()[0].company_name, "Obra A");
        assert_eq!(view.rows()[0].period_number, 2);
    }

    #[test]
    fn wildcard_keeps_every_site() {
        let table = table();
        let view = apply(&table, &Selection::everything(&table));
        assert_eq!(view.len(), table.len());
    }

    #[test]
    fn empty_period_subset_is_an_empty_view() {
        let table = table();
        let selection = Selection::everything(&table).with_periods(Vec::<String>::new());
        assert!(apply(&table, &selection).is_empty());
    }

    #[test]
    fn controls_list_sites_and_periods_in_order() {
        let table = table();
        assert_eq!(available_sites(&table), vec!["Obra A", "Obra B", "Obra C"]);
        let labels: Vec<(u32, String)> = available_periods(&table)
            .into_iter()
            .map(|p| (p.number, p.label))
            .collect();
        assert_eq!(
            labels,
            vec![
                (1, "Janeiro".to_string()),
                (2, "Fevereiro".to_string()),
                (13, "Unknown".to_string())
            ]
        );
    }

    #[test]
    fn site_argument_parsing() {
        assert_eq!(SiteSelection::from_arg(" * "), SiteSelection::All);
        assert_eq!(
            SiteSelection::from_arg("All"),
            SiteSelection::Site("All".into())
        );
        assert_eq!(
            SiteSelection::from_arg("Obra A"),
            SiteSelection::Site("Obra A".into())
        );
    }
}
