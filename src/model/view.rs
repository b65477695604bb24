use serde::{Deserialize, Serialize};

use super::column::{Column, ColumnId, ColumnKind, default_columns};

/// Row spacing of the table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayDensity {
    Compact,
    #[default]
    Standard,
    Comfortable,
}

impl DisplayDensity {
    pub fn as_str(self) -> &'static str {
        match self {
            DisplayDensity::Compact => "compact",
            DisplayDensity::Standard => "standard",
            DisplayDensity::Comfortable => "comfortable",
        }
    }

    pub fn parse(s: &str) -> Option<DisplayDensity> {
        [
            DisplayDensity::Compact,
            DisplayDensity::Standard,
            DisplayDensity::Comfortable,
        ]
        .into_iter()
        .find(|d| d.as_str().eq_ignore_ascii_case(s.trim()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortConfig {
    pub column_id: ColumnId,
    pub direction: SortDirection,
}

impl SortConfig {
    pub fn asc(column_id: ColumnId) -> Self {
        SortConfig {
            column_id,
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(column_id: ColumnId) -> Self {
        SortConfig {
            column_id,
            direction: SortDirection::Desc,
        }
    }
}

/// Next sort state after clicking a column header:
/// unsorted → ascending → descending → unsorted.
/// Clicking a different column starts over at ascending.
pub fn next_sort(current: Option<SortConfig>, column_id: ColumnId) -> Option<SortConfig> {
    match current {
        Some(sc) if sc.column_id == column_id => match sc.direction {
            SortDirection::Asc => Some(SortConfig::desc(column_id)),
            SortDirection::Desc => None,
        },
        _ => Some(SortConfig::asc(column_id)),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOperator {
    Contains,
    NotContains,
    Is,
    IsNot,
    IsEmpty,
    IsNotEmpty,
}

const TEXT_OPERATORS: &[FilterOperator] = &[
    FilterOperator::Contains,
    FilterOperator::NotContains,
    FilterOperator::Is,
    FilterOperator::IsNot,
    FilterOperator::IsEmpty,
    FilterOperator::IsNotEmpty,
];

const ENUM_OPERATORS: &[FilterOperator] = &[
    FilterOperator::Is,
    FilterOperator::IsNot,
    FilterOperator::IsEmpty,
    FilterOperator::IsNotEmpty,
];

impl FilterOperator {
    pub fn as_str(self) -> &'static str {
        match self {
            FilterOperator::Contains => "contains",
            FilterOperator::NotContains => "not_contains",
            FilterOperator::Is => "is",
            FilterOperator::IsNot => "is_not",
            FilterOperator::IsEmpty => "is_empty",
            FilterOperator::IsNotEmpty => "is_not_empty",
        }
    }

    pub fn parse(s: &str) -> Option<FilterOperator> {
        let s = s.trim().to_lowercase().replace('-', "_");
        TEXT_OPERATORS.iter().copied().find(|op| op.as_str() == s)
    }

    /// Operators offered for a column
    pub fn for_column(column: ColumnId) -> &'static [FilterOperator] {
        match column.kind() {
            ColumnKind::Text => TEXT_OPERATORS,
            ColumnKind::Enum => ENUM_OPERATORS,
            ColumnKind::Display => &[],
        }
    }

    /// Whether the operator compares against a value
    pub fn takes_value(self) -> bool {
        !matches!(self, FilterOperator::IsEmpty | FilterOperator::IsNotEmpty)
    }
}

/// A filter value: one string for text columns, a set for enum columns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    One(String),
    Many(Vec<String>),
}

impl FilterValue {
    /// Text form. A set contributes its first entry.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FilterValue::One(s) => Some(s.as_str()),
            FilterValue::Many(v) => v.first().map(String::as_str),
        }
    }

    /// Set form. A single string is a one-element set.
    pub fn as_set(&self) -> Vec<&str> {
        match self {
            FilterValue::One(s) => vec![s.as_str()],
            FilterValue::Many(v) => v.iter().map(String::as_str).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterRule {
    pub id: String,
    pub column_id: ColumnId,
    pub operator: FilterOperator,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<FilterValue>,
}

/// A named, persisted table configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct View {
    pub id: String,
    pub name: String,
    pub columns: Vec<Column>,
    #[serde(default)]
    pub display_density: DisplayDensity,
    #[serde(default = "default_true")]
    pub show_grid_lines: bool,
    #[serde(default)]
    pub sort_config: Option<SortConfig>,
    #[serde(default)]
    pub search_query: String,
    #[serde(default)]
    pub filters: Vec<FilterRule>,
}

fn default_true() -> bool {
    true
}

pub const DEFAULT_VIEW_ID: &str = "table";
pub const DEFAULT_VIEW_NAME: &str = "Table";

impl View {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        View {
            id: id.into(),
            name: name.into(),
            columns: default_columns(),
            display_density: DisplayDensity::default(),
            show_grid_lines: true,
            sort_config: None,
            search_query: String::new(),
            filters: Vec::new(),
        }
    }

    /// Visible columns in display order
    pub fn visible_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| c.visible)
    }

    pub fn column(&self, id: ColumnId) -> Option<&Column> {
        self.columns.iter().find(|c| c.id == id)
    }
}

/// The fallback configuration: one view named "Table" with default columns
pub fn default_view() -> View {
    View::new(DEFAULT_VIEW_ID, DEFAULT_VIEW_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_clicks_on_same_header_clear_sort() {
        let first = next_sort(None, ColumnId::Name);
        assert_eq!(first, Some(SortConfig::asc(ColumnId::Name)));
        let second = next_sort(first, ColumnId::Name);
        assert_eq!(second, Some(SortConfig::desc(ColumnId::Name)));
        assert_eq!(next_sort(second, ColumnId::Name), None);
    }

    #[test]
    fn clicking_other_header_restarts_ascending() {
        let sorted = Some(SortConfig::desc(ColumnId::Name));
        assert_eq!(
            next_sort(sorted, ColumnId::Dates),
            Some(SortConfig::asc(ColumnId::Dates))
        );
    }

    #[test]
    fn operators_per_column_kind() {
        assert_eq!(FilterOperator::for_column(ColumnId::Name).len(), 6);
        assert_eq!(FilterOperator::for_column(ColumnId::Status).len(), 4);
        assert!(FilterOperator::for_column(ColumnId::Progress).is_empty());
        assert!(!FilterOperator::IsEmpty.takes_value());
        assert_eq!(FilterOperator::parse("not-contains"), Some(FilterOperator::NotContains));
    }

    #[test]
    fn filter_value_accepts_string_or_list() {
        let one: FilterValue = serde_json::from_str("\"user\"").unwrap();
        assert_eq!(one.as_text(), Some("user"));
        let many: FilterValue = serde_json::from_str(r#"["New","Planned"]"#).unwrap();
        assert_eq!(many.as_set(), vec!["New", "Planned"]);
    }

    #[test]
    fn view_deserializes_with_only_required_fields() {
        let json = r#"{"id":"v1","name":"Mine","columns":[]}"#;
        let view: View = serde_json::from_str(json).unwrap();
        assert_eq!(view.display_density, DisplayDensity::Standard);
        assert!(view.show_grid_lines);
        assert!(view.sort_config.is_none());
        assert!(view.search_query.is_empty());
        assert!(view.filters.is_empty());
    }
}
