//! Compile-time registry of city feature-service sources.
//!
//! Each entry is a `(name, toml_content)` pair embedded via `include_str!`.
//! Adding a new city requires creating a TOML file in `sources/` and adding
//! a corresponding entry here.

use land_map_source_models::CitySource;

use crate::SourceError;

/// Number of registered sources. Updated when new sources are added.
/// Enforced by a test.
#[cfg(test)]
const EXPECTED_SOURCE_COUNT: usize = 1;

/// Embedded TOML source definitions.
const SOURCE_TOMLS: &[(&str, &str)] = &[("charlotte", include_str!("../sources/charlotte.toml"))];

/// Returns all registered city sources.
///
/// # Panics
///
/// Panics if any embedded TOML file fails to parse. Since these are
/// compile-time constants, parse failures indicate a development error
/// and are caught during CI.
#[must_use]
pub fn all_sources() -> Vec<CitySource> {
    SOURCE_TOMLS
        .iter()
        .map(|(name, toml_str)| {
            toml::de::from_str(toml_str)
                .unwrap_or_else(|e| panic!("Failed to parse city source '{name}': {e}"))
        })
        .collect()
}

/// Looks up a registered source by id.
///
/// # Errors
///
/// Returns [`SourceError::UnknownSource`] if no source has this id.
pub fn find_source(id: &str) -> Result<CitySource, SourceError> {
    all_sources()
        .into_iter()
        .find(|source| source.id.eq_ignore_ascii_case(id.trim()))
        .ok_or_else(|| SourceError::UnknownSource { id: id.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn loads_all_sources() {
        let sources = all_sources();
        assert_eq!(
            sources.len(),
            EXPECTED_SOURCE_COUNT,
            "Expected {EXPECTED_SOURCE_COUNT} city sources, found {}. \
             Update EXPECTED_SOURCE_COUNT after adding/removing sources.",
            sources.len()
        );
    }

    #[test]
    fn source_ids_are_unique() {
        let mut seen = BTreeSet::new();
        for source in &all_sources() {
            assert!(seen.insert(source.id.clone()), "Duplicate source ID: {}", source.id);
        }
    }

    #[test]
    fn all_sources_have_required_fields() {
        for source in &all_sources() {
            assert!(!source.id.is_empty(), "Source has empty id");
            assert!(!source.name.is_empty(), "Source {} has empty name", source.id);
            assert!(
                source.state.len() == 2,
                "Source {} has invalid state: {}",
                source.id,
                source.state
            );
            assert!(
                !source.parcels.fields.id.is_empty(),
                "Source {} has no parcel id fields",
                source.id
            );
            assert!(
                !source.vacant.fields.id.is_empty(),
                "Source {} has no vacant id fields",
                source.id
            );
            assert!(
                !source.zoning.fields.code.is_empty(),
                "Source {} has no zoning code fields",
                source.id
            );
            for url in [&source.parcels.url, &source.vacant.url, &source.zoning.url] {
                assert!(url.starts_with("https://"), "Source {} has non-https url {url}", source.id);
            }
        }
    }

    #[test]
    fn finds_source_case_insensitively() {
        assert_eq!(find_source("Charlotte").unwrap().state, "NC");
        assert!(matches!(
            find_source("nowhere"),
            Err(SourceError::UnknownSource { .. })
        ));
    }
}
