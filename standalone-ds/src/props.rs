//! Normalization of `--key=value` arguments, system properties and
//! environment variables into one multi-valued string map.
//!
//! Accepted command-line form:
//!
//! ```text
//! standalone-ds --standalone-file=/opt/wildfly/standalone.xml \
//!               --datasource=ExampleDS \
//!               --output=json \
//!               -Dverbose=1
//! ```
//!
//! Values may carry several items separated by `,` or `;`. Tokens that do not
//! match the form are ignored rather than reported.

use std::collections::btree_map::{self, BTreeMap};
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Error, Result};

static TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^--([^=]*)=([^=]*)$").expect("valid regex"));
static VALUE_SEPARATOR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[;,]").expect("valid regex"));

/// Key to ordered values, as produced by [`normalize`] and [`merge_all`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Props {
    entries: BTreeMap<String, Vec<String>>,
}

/// Process-wide state captured once at startup.
///
/// System properties are the `-Dname=value` tokens of the command line;
/// the environment is whatever the process inherited.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessSnapshot {
    pub system_properties: BTreeMap<String, String>,
    pub environment: BTreeMap<String, String>,
}

impl ProcessSnapshot {
    #[must_use]
    pub fn new(
        system_properties: BTreeMap<String, String>,
        environment: BTreeMap<String, String>,
    ) -> Self {
        Self {
            system_properties,
            environment,
        }
    }

    /// Captures `-D` tokens from `tokens` and the current process environment.
    /// Environment entries that are not valid unicode are skipped.
    #[must_use]
    pub fn capture(tokens: &[String]) -> Self {
        let system_properties = tokens
            .iter()
            .filter_map(|t| t.strip_prefix("-D"))
            .filter_map(|t| t.split_once('='))
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let environment = std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect();
        Self::new(system_properties, environment)
    }
}

fn split_values(raw: &str) -> Vec<String> {
    VALUE_SEPARATOR_RE
        .split(raw)
        .filter(|v| !v.trim().is_empty())
        .map(str::to_string)
        .collect()
}

/// Parses raw command-line tokens.
///
/// A token is kept only when it looks like `--key=value` with exactly one `=`
/// and a non-blank key and value. A repeated key keeps its last occurrence.
pub fn normalize<I, S>(tokens: I) -> Props
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tokens
        .into_iter()
        .filter_map(|token| {
            let caps = TOKEN_RE.captures(token.as_ref())?;
            let key = caps.get(1)?.as_str();
            let raw = caps.get(2)?.as_str();
            if key.trim().is_empty() || raw.trim().is_empty() {
                return None;
            }
            Some((key.to_string(), split_values(raw)))
        })
        .filter(|(_, values)| !values.is_empty())
        .collect()
}

fn single_valued(source: &BTreeMap<String, String>) -> Props {
    source
        .iter()
        .filter(|(k, _)| !k.trim().is_empty())
        .map(|(k, v)| (k.clone(), v.trim().to_string()))
        .filter(|(_, v)| !v.is_empty())
        .map(|(k, v)| (k, vec![v]))
        .collect()
}

/// System properties of the snapshot, one value per name.
#[must_use]
pub fn system_properties(snapshot: &ProcessSnapshot) -> Props {
    single_valued(&snapshot.system_properties)
}

/// Environment variables of the snapshot, one value per name.
#[must_use]
pub fn environment_variables(snapshot: &ProcessSnapshot) -> Props {
    single_valued(&snapshot.environment)
}

/// Merges command-line tokens, system properties and environment variables.
///
/// The first source defining a key wins: command line, then system
/// properties, then environment.
pub fn merge_all<I, S>(tokens: I, snapshot: &ProcessSnapshot) -> Props
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut merged = normalize(tokens);
    for lower in [system_properties(snapshot), environment_variables(snapshot)] {
        for (key, values) in lower.entries {
            merged.entries.entry(key).or_insert(values);
        }
    }
    merged
}

fn parse_all<T: FromStr>(key: &str, values: &[String], expected: &'static str) -> Result<Vec<T>> {
    values
        .iter()
        .map(|v| v.parse::<T>().map_err(|_| Error::invalid_value(key, v, expected)))
        .collect()
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    if value.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if value.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(Error::invalid_value(key, value, "true or false"))
    }
}

impl Props {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, Vec<String>> {
        self.entries.iter()
    }

    // Absent keys and empty lists both count as "no value".
    fn values(&self, key: &str) -> Option<&[String]> {
        self.get(key).filter(|v| !v.is_empty())
    }

    pub fn any_strings(&self, key: &str) -> Vec<String> {
        self.any_strings_or(key, Vec::new())
    }

    pub fn any_strings_or(&self, key: &str, default: Vec<String>) -> Vec<String> {
        self.values(key).map_or(default, <[String]>::to_vec)
    }

    pub fn first_string(&self, key: &str) -> String {
        self.first_string_or(key, "")
    }

    pub fn first_string_or(&self, key: &str, default: &str) -> String {
        self.values(key)
            .map_or_else(|| default.to_string(), |v| v[0].clone())
    }

    pub fn any_integers(&self, key: &str) -> Result<Vec<i32>> {
        self.any_integers_or(key, Vec::new())
    }

    pub fn any_integers_or(&self, key: &str, default: Vec<i32>) -> Result<Vec<i32>> {
        match self.values(key) {
            Some(values) => parse_all(key, values, "an integer"),
            None => Ok(default),
        }
    }

    pub fn first_integer(&self, key: &str) -> Result<i32> {
        self.first_integer_or(key, 0)
    }

    pub fn first_integer_or(&self, key: &str, default: i32) -> Result<i32> {
        match self.values(key) {
            Some(values) => values[0]
                .parse()
                .map_err(|_| Error::invalid_value(key, &values[0], "an integer")),
            None => Ok(default),
        }
    }

    pub fn any_longs(&self, key: &str) -> Result<Vec<i64>> {
        self.any_longs_or(key, Vec::new())
    }

    pub fn any_longs_or(&self, key: &str, default: Vec<i64>) -> Result<Vec<i64>> {
        match self.values(key) {
            Some(values) => parse_all(key, values, "a long integer"),
            None => Ok(default),
        }
    }

    pub fn first_long(&self, key: &str) -> Result<i64> {
        self.first_long_or(key, 0)
    }

    pub fn first_long_or(&self, key: &str, default: i64) -> Result<i64> {
        match self.values(key) {
            Some(values) => values[0]
                .parse()
                .map_err(|_| Error::invalid_value(key, &values[0], "a long integer")),
            None => Ok(default),
        }
    }

    pub fn any_booleans(&self, key: &str) -> Result<Vec<bool>> {
        self.any_booleans_or(key, Vec::new())
    }

    pub fn any_booleans_or(&self, key: &str, default: Vec<bool>) -> Result<Vec<bool>> {
        match self.values(key) {
            Some(values) => values.iter().map(|v| parse_bool(key, v)).collect(),
            None => Ok(default),
        }
    }

    pub fn first_boolean(&self, key: &str) -> Result<bool> {
        self.first_boolean_or(key, false)
    }

    pub fn first_boolean_or(&self, key: &str, default: bool) -> Result<bool> {
        match self.values(key) {
            Some(values) => parse_bool(key, &values[0]),
            None => Ok(default),
        }
    }
}

impl FromIterator<(String, Vec<String>)> for Props {
    fn from_iter<T: IntoIterator<Item = (String, Vec<String>)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Props {
    type Item = (&'a String, &'a Vec<String>);
    type IntoIter = btree_map::Iter<'a, String, Vec<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
