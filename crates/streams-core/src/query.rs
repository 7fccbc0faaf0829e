use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use streams_models::InstanceStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKey {
    Name,
    Owner,
    Status,
    CloudProvider,
    Region,
}

impl FilterKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterKey::Name => "name",
            FilterKey::Owner => "owner",
            FilterKey::Status => "status",
            FilterKey::CloudProvider => "cloud_provider",
            FilterKey::Region => "region",
        }
    }
}

impl fmt::Display for FilterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "name" => Ok(FilterKey::Name),
            "owner" => Ok(FilterKey::Owner),
            "status" => Ok(FilterKey::Status),
            "cloud_provider" | "provider" => Ok(FilterKey::CloudProvider),
            "region" => Ok(FilterKey::Region),
            other => Err(format!("unknown filter key '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterValue {
    pub value: String,
    /// Exact values use `=`, others a substring `like` match.
    pub exact: bool,
}

impl FilterValue {
    pub fn exact(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            exact: true,
        }
    }

    pub fn contains(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            exact: false,
        }
    }

    fn to_clause(&self, key: FilterKey) -> Option<String> {
        let value = self.value.trim();

        if value == InstanceStatus::Provisioning.as_str() {
            return Some(format!(
                "{key} = {} or {key} = {}",
                InstanceStatus::Preparing,
                InstanceStatus::Provisioning
            ));
        }
        if value == InstanceStatus::Deprovision.as_str() {
            return Some(format!(
                "{key} = {} or {key} = {}",
                InstanceStatus::Deprovision,
                InstanceStatus::Deleted
            ));
        }

        if value.is_empty() {
            return None;
        }

        if self.exact {
            Some(format!("{key} = {value}"))
        } else {
            Some(format!("{key} like %{value}%"))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriterion {
    pub key: FilterKey,
    pub values: Vec<FilterValue>,
}

impl FilterCriterion {
    pub fn new(key: FilterKey, values: Vec<FilterValue>) -> Self {
        Self { key, values }
    }

    fn to_clause(&self) -> Option<String> {
        let matchers: Vec<String> = self
            .values
            .iter()
            .filter_map(|value| value.to_clause(self.key))
            .collect();

        if matchers.is_empty() {
            return None;
        }

        Some(format!("({})", matchers.join(" or ")))
    }
}

/// Build the backend `search` expression: OR within a key, AND across keys.
pub fn build_filter_query(filters: &[FilterCriterion]) -> String {
    filters
        .iter()
        .filter_map(FilterCriterion::to_clause)
        .collect::<Vec<_>>()
        .join(" and ")
}

/// Parse `key=value` (substring) or `key==value` (exact) into a criterion,
/// merging repeated keys so their values are OR-ed together.
pub fn parse_filters<'a>(
    specs: impl IntoIterator<Item = &'a str>,
) -> Result<Vec<FilterCriterion>, String> {
    let mut filters: Vec<FilterCriterion> = Vec::new();

    for spec in specs {
        let (key, value) = spec
            .split_once('=')
            .ok_or_else(|| format!("filter '{}' must look like key=value", spec))?;
        let key: FilterKey = key.parse()?;
        let value = match value.strip_prefix('=') {
            Some(exact) => FilterValue::exact(exact),
            None => FilterValue::contains(value),
        };

        match filters.iter_mut().find(|f| f.key == key) {
            Some(existing) => existing.values.push(value),
            None => filters.push(FilterCriterion::new(key, vec![value])),
        }
    }

    Ok(filters)
}
