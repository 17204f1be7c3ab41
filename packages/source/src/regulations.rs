//! Embedded zoning regulations catalogue.
//!
//! Development standards (lot size, density, setbacks, height, coverage)
//! keyed by zoning code. Codes without an entry simply have no known
//! regulation.

use land_map_source_models::{RegulationCatalog, ZoningRegulation};

use crate::SourceError;

const REGULATIONS_TOML: &str = include_str!("../regulations/charlotte.toml");

/// Parses the embedded catalogue.
///
/// # Errors
///
/// Returns [`SourceError::Toml`] if the embedded file is malformed.
pub fn all_regulations() -> Result<Vec<ZoningRegulation>, SourceError> {
    let catalog: RegulationCatalog = toml::de::from_str(REGULATIONS_TOML)?;
    Ok(catalog.regulations)
}

/// Finds the regulation for `code`, ignoring case and surrounding
/// whitespace.
///
/// # Errors
///
/// Returns [`SourceError::Toml`] if the embedded file is malformed.
pub fn regulation_for(code: &str) -> Result<Option<ZoningRegulation>, SourceError> {
    let code = code.trim();
    Ok(all_regulations()?
        .into_iter()
        .find(|regulation| regulation.code.eq_ignore_ascii_case(code)))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    #[test]
    fn catalogue_parses() {
        let regulations = all_regulations().unwrap();
        assert!(!regulations.is_empty());
        let mut seen = BTreeSet::new();
        for regulation in &regulations {
            assert!(
                seen.insert(regulation.code.to_ascii_uppercase()),
                "Duplicate regulation code: {}",
                regulation.code
            );
        }
    }

    #[test]
    fn looks_up_by_code() {
        let r3 = regulation_for(" r-3 ").unwrap().unwrap();
        assert_eq!(r3.max_height_ft, Some(35));
        assert_eq!(r3.setbacks.front_ft, 20);
        assert!(regulation_for("UMUD").unwrap().is_none());
    }
}
