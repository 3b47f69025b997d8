//! Query helpers built on [`CachedClient`]: broad filtered search and
//! lookup of specific schools by name.

use scorecard_api::SchoolQuery;

use crate::client::CachedClient;
use crate::error::ScoutError;
use crate::filter::FilterEngine;
use crate::school::{self, fields, School, DEFAULT_FIELDS};
use crate::transform::{DisplayRecord, Transformer};

/// Builds a query with the given filters and the default field list.
pub fn school_query<K, V>(filters: impl IntoIterator<Item = (K, V)>) -> SchoolQuery
where
    K: Into<String>,
    V: Into<String>,
{
    SchoolQuery::default()
        .with_filters(filters)
        .with_fields(DEFAULT_FIELDS)
}

/// Fetches every school matching `query`, sorts by name, drops the ones the
/// filter rejects, and formats the rest.
pub async fn general_search(
    client: &CachedClient,
    query: &SchoolQuery,
    engine: &FilterEngine,
    transformer: &Transformer,
) -> Result<Vec<DisplayRecord>, ScoutError> {
    let raw = client.fetch_all(query).await?;
    let mut schools = school::from_raw_records(raw)?;
    schools.sort_by(|a, b| a.name.cmp(&b.name));
    let kept = engine.filter(schools);
    transformer.transform_all(&kept)
}

/// Resolves a school by its exact name.
///
/// The API matches names by prefix, so a search can return several schools.
/// A single result is accepted as-is. Otherwise exactly one result must carry
/// the requested name; zero or several exact matches are
/// [`ScoutError::RecordNotFound`], listing the names that came back.
pub async fn find_by_name(client: &CachedClient, name: &str) -> Result<School, ScoutError> {
    let query = school_query([(fields::NAME, name)]);
    let mut schools = school::from_raw_records(client.fetch_all(&query).await?)?;

    if schools.len() == 1 {
        return Ok(schools.remove(0));
    }

    let exact: Vec<usize> = schools
        .iter()
        .enumerate()
        .filter(|(_, s)| s.name.as_deref() == Some(name))
        .map(|(i, _)| i)
        .collect();
    if let [idx] = exact.as_slice() {
        return Ok(schools.swap_remove(*idx));
    }

    Err(ScoutError::RecordNotFound {
        name: name.to_string(),
        candidates: schools.into_iter().filter_map(|s| s.name).collect(),
    })
}

/// Looks up and formats each named school, in the order given.
///
/// No threshold filtering is applied: a hand-picked list is kept whole.
pub async fn search_from_list(
    client: &CachedClient,
    names: &[String],
    transformer: &Transformer,
) -> Result<Vec<DisplayRecord>, ScoutError> {
    let mut records = Vec::with_capacity(names.len());
    for name in names {
        let school = find_by_name(client, name).await?;
        records.push(transformer.transform(&school)?);
    }
    Ok(records)
}
