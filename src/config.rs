// Pipeline configuration.
//
// Everything that differed between the historical dashboard scripts (column
// headers, month names, sentinels, accepted extensions) lives here so that a
// single pipeline can be pointed at any variant of the export.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::{DashboardError, Result};

/// Sentinel written into text columns that are absent or empty.
pub const NOT_INFORMED: &str = "Not Informed";

/// Label used for period numbers without a month name.
pub const UNKNOWN_PERIOD: &str = "Unknown";

const MONTHS_PT: [&str; 12] = [
    "Janeiro", "Fevereiro", "Março", "Abril", "Maio", "Junho", "Julho", "Agosto", "Setembro",
    "Outubro", "Novembro", "Dezembro",
];

static CANONICAL_MANIFEST: Lazy<ColumnManifest> = Lazy::new(|| ColumnManifest {
    text: TextColumns {
        company_name: "Nome da Empresa".into(),
        sex: "Sexo".into(),
        employee_name: "Nome do funcionário".into(),
        role: "Função".into(),
        employee_type: "TIPO".into(),
    },
    numeric: NumericColumns {
        ot70_saturday: "Hora Extra 70% - Sabado (Qtde)".into(),
        ot70_weekday: "Hora Extra 70% - Semana (Qtde)".into(),
        ot100: "Hora Extra 100% (Qtde)".into(),
        paid_rest: "Repouso Remunerado".into(),
        production: "PRODUÇÃO".into(),
        production_reflex: "REFLEXO S/ PRODUÇÃO".into(),
        net_remuneration: "Remuneração Líquida".into(),
        advance_payment: "Adiantamento 2".into(),
    },
});

/// Source headers for the text columns of a `Record`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextColumns {
    pub company_name: String,
    pub sex: String,
    pub employee_name: String,
    pub role: String,
    pub employee_type: String,
}

impl Default for TextColumns {
    fn default() -> Self {
        CANONICAL_MANIFEST.text.clone()
    }
}

/// Source headers for the numeric columns of a `Record`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NumericColumns {
    pub ot70_saturday: String,
    pub ot70_weekday: String,
    pub ot100: String,
    pub paid_rest: String,
    pub production: String,
    pub production_reflex: String,
    pub net_remuneration: String,
    pub advance_payment: String,
}

impl Default for NumericColumns {
    fn default() -> Self {
        CANONICAL_MANIFEST.numeric.clone()
    }
}

/// The canonical column set every ingested batch is reconciled to.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnManifest {
    pub text: TextColumns,
    pub numeric: NumericColumns,
}

impl ColumnManifest {
    /// Text headers in `Record` field order.
    pub fn text_headers(&self) -> [&str; 5] {
        let t = &self.text;
        [
            t.company_name.as_str(),
            t.sex.as_str(),
            t.employee_name.as_str(),
            t.role.as_str(),
            t.employee_type.as_str(),
        ]
    }

    /// Numeric headers in `Record` field order.
    pub fn numeric_headers(&self) -> [&str; 8] {
        let n = &self.numeric;
        [
            n.ot70_saturday.as_str(),
            n.ot70_weekday.as_str(),
            n.ot100.as_str(),
            n.paid_rest.as_str(),
            n.production.as_str(),
            n.production_reflex.as_str(),
            n.net_remuneration.as_str(),
            n.advance_payment.as_str(),
        ]
    }

    fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for header in self.text_headers().into_iter().chain(self.numeric_headers()) {
            if header.is_empty() {
                return Err(DashboardError::Config(
                    "manifest contains an empty column header".into(),
                ));
            }
            if !seen.insert(header) {
                return Err(DashboardError::Config(format!(
                    "column header '{header}' is mapped more than once"
                )));
            }
        }
        Ok(())
    }
}

/// Settings for one ingestion pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Folder holding the monthly exports.
    pub input_dir: PathBuf,
    /// Folder the report CSVs and summary JSON are written to.
    pub output_dir: PathBuf,
    /// Accepted file extensions, compared case-insensitively.
    pub extensions: Vec<String>,
    pub text_sentinel: String,
    pub unknown_period_label: String,
    /// Month names for period numbers 1 through 12.
    pub month_labels: Vec<String>,
    pub manifest: ColumnManifest,
    /// Load files on the rayon pool instead of one after another.
    pub parallel: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("Efetivo"),
            output_dir: PathBuf::from("."),
            extensions: vec!["xls".into(), "xlsx".into()],
            text_sentinel: NOT_INFORMED.into(),
            unknown_period_label: UNKNOWN_PERIOD.into(),
            month_labels: MONTHS_PT.iter().map(|m| m.to_string()).collect(),
            manifest: ColumnManifest::default(),
            parallel: true,
        }
    }
}

impl PipelineConfig {
    /// Load a TOML config file, or the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(p) => {
                let raw = fs::read_to_string(p)?;
                Self::from_toml(&raw)?
            }
            None => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(raw).map_err(|e| DashboardError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.month_labels.len() != 12 {
            return Err(DashboardError::Config(format!(
                "expected 12 month labels, got {}",
                self.month_labels.len()
            )));
        }
        if self.extensions.is_empty() {
            return Err(DashboardError::Config(
                "at least one spreadsheet extension is required".into(),
            ));
        }
        self.manifest.validate()
    }

    /// Month label for a period number, or the unknown label when unmapped.
    pub fn month_label(&self, number: u32) -> &str {
        number
            .checked_sub(1)
            .and_then(|idx| self.month_labels.get(idx as usize))
            .map(String::as_str)
            .unwrap_or(&self.unknown_period_label)
    }

    /// Whether `file_name` ends in one of the accepted extensions.
    pub fn is_spreadsheet(&self, file_name: &str) -> bool {
        let lower = file_name.to_lowercase();
        self.extensions
            .iter()
            .any(|ext| lower.ends_with(&format!(".{}", ext.to_lowercase())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_thirteen_distinct_headers() {
        let config = PipelineConfig::default();
        config.validate().unwrap();
        let manifest = &config.manifest;
        assert_eq!(manifest.text_headers().len() + manifest.numeric_headers().len(), 13);
        assert_eq!(manifest.text.employee_type, "TIPO");
        assert_eq!(manifest.numeric.advance_payment, "Adiantamento 2");
    }

    #[test]
    fn month_label_lookup() {
        let config = PipelineConfig::default();
        assert_eq!(config.month_label(1), "Janeiro");
        assert_eq!(config.month_label(3), "Março");
        assert_eq!(config.month_label(12), "Dezembro");
        assert_eq!(config.month_label(0), UNKNOWN_PERIOD);
        assert_eq!(config.month_label(13), UNKNOWN_PERIOD);
    }

    #[test]
    fn extension_match_ignores_case() {
        let config = PipelineConfig::default();
        assert!(config.is_spreadsheet("01.Janeiro.xlsx"));
        assert!(config.is_spreadsheet("12.Dezembro - Folha.XLS"));
        assert!(!config.is_spreadsheet("notes.csv"));
        assert!(!config.is_spreadsheet("xlsx"));
    }

    #[test]
    fn toml_overrides_merge_with_defaults() {
        let config = PipelineConfig::from_toml(
            r#"
            input_dir = "exports"
            parallel = false

            [manifest.text]
            employee_type = "Tipo"
            "#,
        )
        .unwrap();
        assert_eq!(config.input_dir, PathBuf::from("exports"));
        assert!(!config.parallel);
        assert_eq!(config.manifest.text.employee_type, "Tipo");
        assert_eq!(config.manifest.text.sex, "Sexo");
        assert_eq!(config.month_labels.len(), 12);
    }

    #[test]
    fn rejects_short_month_list_and_duplicate_headers() {
        let err = PipelineConfig::from_toml(r#"month_labels = ["Jan"]"#).unwrap_err();
        assert!(matches!(err, DashboardError::Config(_)));

        let err = PipelineConfig::from_toml(
            r#"
            [manifest.text]
            sex = "TIPO"
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("TIPO"));
    }
}
