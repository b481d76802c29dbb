//! Raw list parameters and the parsed [`ListQuery`].

use serde::Deserialize;

use crate::error::{ListQueryError, Parameter};
use crate::{Document, Filter, Projection, SortSpec};

/// List parameters exactly as they arrive on the query string.
///
/// Every value is kept as text so that numeric and boolean parse failures are
/// reported as list-query errors rather than extractor failures.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ListParams {
    /// JSON filter expression (`where`).
    #[serde(rename = "where")]
    pub filter: Option<String>,
    /// JSON sort specification.
    pub sort: Option<String>,
    /// JSON projection, also accepted as `filter`.
    #[serde(alias = "filter")]
    pub select: Option<String>,
    /// Number of matching documents to skip.
    pub skip: Option<String>,
    /// Maximum number of documents to return; `0` means unlimited.
    pub limit: Option<String>,
    /// Return the number of matches instead of documents.
    pub count: Option<String>,
}

/// Parsed list request.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ListQuery {
    /// Predicate selecting documents.
    pub filter: Filter,
    /// Ordering; `None` keeps the store's natural order.
    pub sort: Option<SortSpec>,
    /// Field selection; `None` returns whole documents.
    pub projection: Option<Projection>,
    /// Matching documents to skip before returning results.
    pub skip: u64,
    /// Upper bound on returned documents; `None` is unlimited.
    pub limit: Option<u64>,
    /// Count matches instead of returning them.
    pub count: bool,
}

fn parse_integer(parameter: Parameter, raw: &str) -> Result<u64, ListQueryError> {
    raw.trim()
        .parse::<u64>()
        .map_err(|_| ListQueryError::InvalidInteger {
            parameter,
            value: raw.to_owned(),
        })
}

fn parse_flag(raw: &str) -> Result<bool, ListQueryError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(ListQueryError::InvalidFlag {
            value: raw.to_owned(),
        }),
    }
}

const fn limit_from(value: u64) -> Option<u64> {
    if value == 0 { None } else { Some(value) }
}

impl ListQuery {
    /// Parse raw parameters, applying `default_limit` when `limit` is absent.
    ///
    /// A limit of `0`, whether requested or configured, disables limiting.
    ///
    /// # Errors
    /// Returns the first [`ListQueryError`] encountered.
    pub fn from_params(params: &ListParams, default_limit: u64) -> Result<Self, ListQueryError> {
        let filter = params
            .filter
            .as_deref()
            .map(Filter::parse)
            .transpose()?
            .unwrap_or_default();
        let sort = params.sort.as_deref().map(SortSpec::parse).transpose()?;
        let projection = params
            .select
            .as_deref()
            .map(Projection::parse)
            .transpose()?;
        let skip = params
            .skip
            .as_deref()
            .map(|raw| parse_integer(Parameter::Skip, raw))
            .transpose()?
            .unwrap_or(0);
        let limit = params
            .limit
            .as_deref()
            .map(|raw| parse_integer(Parameter::Limit, raw))
            .transpose()?
            .unwrap_or(default_limit);
        let count = params
            .count
            .as_deref()
            .map(parse_flag)
            .transpose()?
            .unwrap_or(false);

        Ok(Self {
            filter,
            sort,
            projection,
            skip,
            limit: limit_from(limit),
            count,
        })
    }

    /// Query matching `filter` with no window or projection.
    #[must_use]
    pub fn matching(filter: Filter) -> Self {
        Self {
            filter,
            ..Self::default()
        }
    }

    /// Evaluate the query over documents held in natural order.
    ///
    /// Filters, sorts (stably), skips, limits and finally projects. The count
    /// flag is not consulted; callers wanting a count use [`Self::count_in`].
    #[must_use]
    pub fn select_from<'a, I>(&self, documents: I) -> Vec<Document>
    where
        I: IntoIterator<Item = &'a Document>,
    {
        let mut matched: Vec<&Document> = documents
            .into_iter()
            .filter(|document| self.filter.matches(document))
            .collect();
        if let Some(sort) = self.sort.as_ref().filter(|sort| !sort.is_empty()) {
            matched.sort_by(|left, right| sort.compare(left, right));
        }
        let skip = usize::try_from(self.skip).unwrap_or(usize::MAX);
        let take = self
            .limit
            .map_or(usize::MAX, |limit| usize::try_from(limit).unwrap_or(usize::MAX));
        matched
            .into_iter()
            .skip(skip)
            .take(take)
            .map(|document| match &self.projection {
                Some(projection) => projection.apply(document.clone()),
                None => document.clone(),
            })
            .collect()
    }

    /// Count documents matching the filter, ignoring window and projection.
    #[must_use]
    pub fn count_in<'a, I>(&self, documents: I) -> u64
    where
        I: IntoIterator<Item = &'a Document>,
    {
        let matched = documents
            .into_iter()
            .filter(|document| self.filter.matches(document))
            .count();
        u64::try_from(matched).unwrap_or(u64::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use serde_json::{Value, json};

    #[fixture]
    fn tasks() -> Vec<Document> {
        (1..=5)
            .filter_map(|n| {
                json!({
                    "_id": format!("t{n}"),
                    "name": format!("task {n}"),
                    "completed": n % 2 == 0,
                    "deadline": format!("2025-01-0{n}T00:00:00Z"),
                })
                .as_object()
                .cloned()
            })
            .collect()
    }

    fn params(pairs: &[(&str, &str)]) -> ListParams {
        let mut params = ListParams::default();
        for (key, value) in pairs {
            let value = Some((*value).to_owned());
            match *key {
                "where" => params.filter = value,
                "sort" => params.sort = value,
                "select" => params.select = value,
                "skip" => params.skip = value,
                "limit" => params.limit = value,
                "count" => params.count = value,
                other => panic!("unknown parameter {other}"),
            }
        }
        params
    }

    fn ids(documents: &[Document]) -> Vec<&str> {
        documents
            .iter()
            .filter_map(|doc| doc.get("_id").and_then(Value::as_str))
            .collect()
    }

    #[rstest]
    fn defaults_apply_when_parameters_are_missing() {
        let query = ListQuery::from_params(&ListParams::default(), 100).expect("parses");
        assert_eq!(query.filter, Filter::All);
        assert_eq!(query.sort, None);
        assert_eq!(query.projection, None);
        assert_eq!(query.skip, 0);
        assert_eq!(query.limit, Some(100));
        assert!(!query.count);
    }

    #[rstest]
    #[case(0, None, None)]
    #[case(100, None, Some(100))]
    #[case(100, Some("0"), None)]
    #[case(0, Some("7"), Some(7))]
    fn zero_limit_disables_limiting(
        #[case] default_limit: u64,
        #[case] requested: Option<&str>,
        #[case] expected: Option<u64>,
    ) {
        let params = ListParams {
            limit: requested.map(str::to_owned),
            ..ListParams::default()
        };
        let query = ListQuery::from_params(&params, default_limit).expect("parses");
        assert_eq!(query.limit, expected);
    }

    #[rstest]
    fn select_from_filters_sorts_and_windows(tasks: Vec<Document>) {
        let query = ListQuery::from_params(
            &params(&[
                ("where", r#"{"completed": false}"#),
                ("sort", r#"{"deadline": -1}"#),
                ("skip", "1"),
                ("limit", "1"),
                ("select", r#"{"name": 1, "_id": 0}"#),
            ]),
            100,
        )
        .expect("parses");

        let selected = query.select_from(&tasks);
        assert_eq!(selected.len(), 1);
        assert_eq!(
            selected.first().cloned().map(Value::Object),
            Some(json!({"name": "task 3"}))
        );
    }

    #[rstest]
    fn count_ignores_window_and_projection(tasks: Vec<Document>) {
        let query = ListQuery::from_params(
            &params(&[
                ("where", r#"{"completed": false}"#),
                ("skip", "2"),
                ("limit", "1"),
                ("select", r#"{"name": 1}"#),
                ("sort", r#"{"name": -1}"#),
                ("count", "true"),
            ]),
            100,
        )
        .expect("parses");

        assert!(query.count);
        assert_eq!(query.count_in(&tasks), 3);
    }

    #[rstest]
    fn natural_order_is_kept_without_sort(tasks: Vec<Document>) {
        let query = ListQuery::from_params(&params(&[("skip", "3")]), 0).expect("parses");
        assert_eq!(ids(&query.select_from(&tasks)), ["t4", "t5"]);
    }

    #[rstest]
    #[case("skip", "-1", Parameter::Skip)]
    #[case("limit", "ten", Parameter::Limit)]
    #[case("count", "maybe", Parameter::Count)]
    #[case("where", "{", Parameter::Where)]
    #[case("sort", "[]", Parameter::Sort)]
    #[case("select", r#"{"a": 1, "b": 0}"#, Parameter::Select)]
    fn malformed_parameters_name_the_offender(
        #[case] key: &str,
        #[case] value: &str,
        #[case] parameter: Parameter,
    ) {
        let error = ListQuery::from_params(&params(&[(key, value)]), 100)
            .expect_err("parameter should be rejected");
        assert_eq!(error.parameter(), parameter);
    }
}
