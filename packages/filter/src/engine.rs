//! Query evaluation.
//!
//! [`evaluate`] is a pure function of one parcel snapshot, one zoning
//! snapshot, and a query. It never mutates its inputs and returns either
//! the full result or an error raised before any filtering happens.

use std::sync::Arc;

use land_map_parcel::{ParcelSnapshot, fold_case};
use land_map_parcel_models::{LandUse, Parcel, ParcelQuery, ZoningRegion};
use land_map_spatial::ZoningSnapshot;

use crate::FilterError;

/// A parcel paired with the zoning region that governs it.
#[derive(Debug, Clone, PartialEq)]
pub struct ParcelMatch {
    pub parcel: Arc<Parcel>,
    /// `None` when the parcel's centroid falls outside every region.
    pub zoning: Option<Arc<ZoningRegion>>,
}

impl ParcelMatch {
    /// Land use implied by the resolved zoning code.
    #[must_use]
    pub fn land_use(&self) -> Option<LandUse> {
        self.zoning.as_deref().map(ZoningRegion::land_use)
    }

    #[must_use]
    pub fn zoning_code(&self) -> Option<&str> {
        self.zoning.as_deref().map(|z| z.code.as_str())
    }
}

/// The ordered outcome of one query, in parcel load order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterResult {
    matches: Vec<ParcelMatch>,
}

impl FilterResult {
    #[must_use]
    pub fn matches(&self) -> &[ParcelMatch] {
        &self.matches
    }

    #[must_use]
    pub fn into_matches(self) -> Vec<ParcelMatch> {
        self.matches
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ParcelMatch> {
        self.matches.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.matches.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Identifiers of the matched parcels, in order.
    #[must_use]
    pub fn parcel_ids(&self) -> Vec<&str> {
        self.matches.iter().map(|m| m.parcel.id.as_str()).collect()
    }

    /// Sum of known deed acreage across matches.
    #[must_use]
    pub fn total_acres(&self) -> f64 {
        self.matches.iter().map(|m| m.parcel.acres_or_zero()).sum()
    }

    #[must_use]
    pub fn vacant_count(&self) -> usize {
        self.matches.iter().filter(|m| m.parcel.vacant).count()
    }
}

impl IntoIterator for FilterResult {
    type Item = ParcelMatch;
    type IntoIter = std::vec::IntoIter<ParcelMatch>;

    fn into_iter(self) -> Self::IntoIter {
        self.matches.into_iter()
    }
}

impl<'a> IntoIterator for &'a FilterResult {
    type Item = &'a ParcelMatch;
    type IntoIter = std::slice::Iter<'a, ParcelMatch>;

    fn into_iter(self) -> Self::IntoIter {
        self.matches.iter()
    }
}

/// Checks that the acreage bounds of `query` are usable.
///
/// # Errors
///
/// Returns [`FilterError::InvalidQuery`] if `min_acres` or `max_acres` is
/// negative, NaN, or infinite.
pub fn validate(query: &ParcelQuery) -> Result<(), FilterError> {
    check_acres("minAcres", query.min_acres)?;
    if let Some(max) = query.max_acres {
        check_acres("maxAcres", max)?;
    }
    Ok(())
}

fn check_acres(field: &'static str, value: f64) -> Result<(), FilterError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(FilterError::InvalidQuery { field, value })
    }
}

/// Runs `query` against one parcel snapshot and one zoning snapshot.
///
/// Filters apply in order: id substring, acreage bounds (missing acreage
/// counts as zero), vacancy, then the zoning join and zoning-code filter,
/// then the limit. Output keeps parcel load order.
///
/// # Errors
///
/// Returns [`FilterError::InvalidQuery`] if the query's acreage bounds
/// are invalid.
pub fn evaluate(
    parcels: &ParcelSnapshot,
    zoning: &ZoningSnapshot,
    query: &ParcelQuery,
) -> Result<FilterResult, FilterError> {
    validate(query)?;

    let id_filter = query.id_filter().map(fold_case);
    let zoning_filter = query.zoning_filter();
    let limit = query.limit.unwrap_or(usize::MAX);

    let matches: Vec<ParcelMatch> = parcels
        .iter()
        .filter(|p| {
            id_filter
                .as_deref()
                .is_none_or(|needle| fold_case(&p.id).contains(needle))
        })
        .filter(|p| {
            let acres = p.acres_or_zero();
            acres >= query.min_acres && query.max_acres.is_none_or(|max| acres <= max)
        })
        .filter(|p| !query.vacant_only || p.vacant)
        .map(|p| ParcelMatch {
            parcel: Arc::clone(p),
            zoning: zoning.resolve(p).cloned(),
        })
        .filter(|m| {
            zoning_filter.is_none_or(|code| {
                m.zoning_code()
                    .is_some_and(|resolved| resolved.trim().eq_ignore_ascii_case(code))
            })
        })
        .take(limit)
        .collect();

    log::debug!(
        "Query matched {} of {} parcels",
        matches.len(),
        parcels.len()
    );

    Ok(FilterResult { matches })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_negative_min_acres() {
        let err = validate(&ParcelQuery::default().with_min_acres(-1.0)).unwrap_err();
        assert!(matches!(
            err,
            FilterError::InvalidQuery {
                field: "minAcres",
                ..
            }
        ));
    }

    #[test]
    fn rejects_non_finite_bounds() {
        assert!(validate(&ParcelQuery::default().with_min_acres(f64::NAN)).is_err());
        assert!(validate(&ParcelQuery::default().with_min_acres(f64::INFINITY)).is_err());
        assert!(validate(&ParcelQuery::default().with_max_acres(f64::NEG_INFINITY)).is_err());
        assert!(validate(&ParcelQuery::default().with_max_acres(-0.5)).is_err());
    }

    #[test]
    fn accepts_zero_and_inverted_bounds() {
        assert!(validate(&ParcelQuery::default()).is_ok());
        assert!(
            validate(
                &ParcelQuery::default()
                    .with_min_acres(5.0)
                    .with_max_acres(1.0)
            )
            .is_ok()
        );
    }
}
