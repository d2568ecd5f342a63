// Period resolution from export file names.
//
// Exports are named `<month>.<free text>.<ext>`, e.g. `12.Dezembro - Folha.xls`.

use serde::Serialize;

use crate::config::PipelineConfig;
use crate::error::LoadError;
use crate::util::parse_u32_safe;

/// A month as identified by an export's file name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Period {
    pub number: u32,
    pub label: String,
}

/// The segment before the first `.` of a file name.
pub fn period_token(file_name: &str) -> &str {
    file_name.split('.').next().unwrap_or_default()
}

/// Resolve the period a file belongs to.
///
/// A token that is not a number fails the file. A number with no month
/// name still resolves, labelled with the configured unknown label.
pub fn resolve_period(file_name: &str, config: &PipelineConfig) -> Result<Period, LoadError> {
    let token = period_token(file_name);
    let number = parse_u32_safe(token).ok_or_else(|| LoadError::InvalidPeriodToken {
        token: token.to_string(),
    })?;
    Ok(Period {
        number,
        label: config.month_label(number).to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(name: &str) -> Result<Period, LoadError> {
        resolve_period(name, &PipelineConfig::default())
    }

    #[test]
    fn token_is_text_before_first_dot() {
        assert_eq!(period_token("01.Janeiro.xlsx"), "01");
        assert_eq!(period_token("12.Dezembro - Folha.xls"), "12");
        assert_eq!(period_token("bad.xlsx"), "bad");
        assert_eq!(period_token("noext"), "noext");
    }

    #[test]
    fn resolves_zero_padded_and_plain_numbers() {
        assert_eq!(
            resolve("01.Janeiro.xlsx").unwrap(),
            Period {
                number: 1,
                label: "Janeiro".into()
            }
        );
        assert_eq!(resolve("3.Marco.xlsx").unwrap().label, "Março");
        assert_eq!(resolve("12.Dezembro - Folha.xls").unwrap().number, 12);
    }

    #[test]
    fn unmapped_number_gets_unknown_label() {
        let period = resolve("13.Extra.xlsx").unwrap();
        assert_eq!(period.number, 13);
        assert_eq!(period.label, "Unknown");
        assert_eq!(resolve("00.Zero.xlsx").unwrap().label, "Unknown");
    }

    #[test]
    fn non_numeric_token_fails() {
        assert_eq!(
            resolve("bad.xlsx").unwrap_err(),
            LoadError::InvalidPeriodToken {
                token: "bad".into()
            }
        );
        assert!(resolve("-1.Negativo.xlsx").is_err());
        assert!(resolve(".xlsx").is_err());
    }
}
