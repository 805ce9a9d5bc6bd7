use super::StopsError;
use itertools::Itertools;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// a centreline intersection. `INTERSEC5` names the streets meeting there,
/// separated by " / ".
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct IntersectionRow {
    #[serde(rename = "INTERSEC5")]
    pub name: String,
    pub longitude: f64,
    pub latitude: f64,
}

/// how an intersection name is matched.
#[derive(Clone, Debug, PartialEq)]
pub enum IntersectionQuery {
    /// a street meeting itself, matched by the whole name
    Exact(String),
    /// SQL LIKE patterns where `%` matches any run of characters; any
    /// matching pattern is a hit
    Like(Vec<String>),
}

impl IntersectionQuery {
    /// builds the query for a stop street and cross street.
    ///
    /// periods and apostrophes are dropped. `Mc` and `Mac` may be followed by
    /// anything, to tolerate spacing and capitalisation differences in the
    /// centreline names. when either street lists alternatives with `/`, or
    /// the cross street joins two streets with " and ", the first two
    /// alternatives are each tried.
    pub fn new(stop_street: &str, cross_street: &str) -> IntersectionQuery {
        let strip = |s: &str| s.replace(['.', '\''], "");
        let wildcard = |s: &str| s.replace("Mc", "Mc%").replace("Mac", "Mac%");
        let (stop, cross) = (strip(stop_street), strip(cross_street));
        if stop == cross {
            return IntersectionQuery::Exact(stop);
        }
        let (stop, cross) = (wildcard(&stop), wildcard(&cross));
        let pairs = if stop.contains('/') {
            alternatives(&stop, "/")
                .into_iter()
                .map(|s| (s, cross.clone()))
                .collect_vec()
        } else if cross.contains('/') {
            alternatives(&cross, "/")
                .into_iter()
                .map(|c| (stop.clone(), c))
                .collect_vec()
        } else if cross.contains(" and ") {
            alternatives(&cross, " and ")
                .into_iter()
                .map(|c| (stop.clone(), c))
                .collect_vec()
        } else {
            vec![(stop, cross)]
        };
        let patterns = pairs
            .iter()
            .flat_map(|(a, b)| [format!("%{a} /% {b}%"), format!("%{b} /% {a}%")])
            .collect_vec();
        IntersectionQuery::Like(patterns)
    }

    fn matcher(&self) -> Result<Matcher, StopsError> {
        match self {
            IntersectionQuery::Exact(name) => Ok(Matcher::Exact(name.clone())),
            IntersectionQuery::Like(patterns) => {
                let regexes = patterns
                    .iter()
                    .map(|p| like_to_regex(p))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Matcher::Like(regexes))
            }
        }
    }
}

enum Matcher {
    Exact(String),
    Like(Vec<Regex>),
}

impl Matcher {
    fn is_match(&self, name: &str) -> bool {
        match self {
            Matcher::Exact(n) => n == name,
            Matcher::Like(regexes) => regexes.iter().any(|re| re.is_match(name)),
        }
    }
}

/// centreline intersections, searched in file order.
#[derive(Clone, Debug, Default)]
pub struct IntersectionLookup {
    rows: Vec<IntersectionRow>,
}

impl IntersectionLookup {
    pub fn new(rows: Vec<IntersectionRow>) -> IntersectionLookup {
        IntersectionLookup { rows }
    }

    pub fn from_csv(path: &Path) -> Result<IntersectionLookup, StopsError> {
        let filename = path.to_string_lossy().to_string();
        let mut reader = csv::Reader::from_path(path)
            .map_err(|e| StopsError::CsvReadError(filename.clone(), e))?;
        let rows = reader
            .deserialize::<IntersectionRow>()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| StopsError::CsvReadError(filename.clone(), e))?;
        log::info!("loaded {} intersections from {filename}", rows.len());
        Ok(IntersectionLookup::new(rows))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// the first intersection matching the query.
    pub fn find(&self, query: &IntersectionQuery) -> Result<Option<&IntersectionRow>, StopsError> {
        let matcher = query.matcher()?;
        Ok(self.rows.iter().find(|row| matcher.is_match(&row.name)))
    }
}

fn alternatives(name: &str, separator: &str) -> Vec<String> {
    name.split(separator).take(2).map(String::from).collect()
}

fn like_to_regex(pattern: &str) -> Result<Regex, StopsError> {
    let body = pattern.split('%').map(regex::escape).join(".*");
    Ok(Regex::new(&format!("^{body}$"))?)
}
