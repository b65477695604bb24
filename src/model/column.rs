use serde::{Deserialize, Serialize};

/// Identifies a table column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnId {
    Name,
    Status,
    Assignee,
    Dates,
    Progress,
    Details,
    Priority,
    Impact,
}

/// What kind of values a column holds, which decides its filter operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Enum,
    /// Columns that cannot be filtered
    Display,
}

impl ColumnId {
    pub const ALL: [ColumnId; 8] = [
        ColumnId::Name,
        ColumnId::Status,
        ColumnId::Assignee,
        ColumnId::Dates,
        ColumnId::Progress,
        ColumnId::Details,
        ColumnId::Priority,
        ColumnId::Impact,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ColumnId::Name => "name",
            ColumnId::Status => "status",
            ColumnId::Assignee => "assignee",
            ColumnId::Dates => "dates",
            ColumnId::Progress => "progress",
            ColumnId::Details => "details",
            ColumnId::Priority => "priority",
            ColumnId::Impact => "impact",
        }
    }

    pub fn parse(s: &str) -> Option<ColumnId> {
        let s = s.trim().to_lowercase();
        ColumnId::ALL.into_iter().find(|c| c.as_str() == s)
    }

    pub fn kind(self) -> ColumnKind {
        match self {
            ColumnId::Name | ColumnId::Dates => ColumnKind::Text,
            ColumnId::Status | ColumnId::Assignee | ColumnId::Priority | ColumnId::Impact => {
                ColumnKind::Enum
            }
            ColumnId::Progress | ColumnId::Details => ColumnKind::Display,
        }
    }
}

impl std::fmt::Display for ColumnId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A column definition as stored in a view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub id: ColumnId,
    pub label: String,
    /// Pixel width, e.g. `"400px"`
    pub width: String,
    pub visible: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_width: Option<u32>,
}

impl Column {
    fn new(id: ColumnId, label: &str, width: u32, visible: bool, min_width: u32) -> Self {
        Column {
            id,
            label: label.to_string(),
            width: format!("{}px", width),
            visible,
            min_width: Some(min_width),
        }
    }

    /// Width in pixels. Unparsable widths fall back to the minimum.
    pub fn width_px(&self) -> u32 {
        self.width
            .trim()
            .trim_end_matches("px")
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|w| w.is_finite() && *w >= 0.0)
            .map(|w| w.round() as u32)
            .unwrap_or_else(|| self.min_width.unwrap_or(0))
    }

    pub fn set_width_px(&mut self, px: u32) {
        self.width = format!("{}px", px);
    }
}

/// The hard-coded column set used for new installs and "reset to default"
pub fn default_columns() -> Vec<Column> {
    vec![
        Column::new(ColumnId::Name, "Name", 400, true, 200),
        Column::new(ColumnId::Status, "Status", 150, true, 120),
        Column::new(ColumnId::Assignee, "Assignee", 120, true, 80),
        Column::new(ColumnId::Dates, "Start Date - Due Date", 220, true, 180),
        Column::new(ColumnId::Progress, "Progress", 180, true, 150),
        Column::new(ColumnId::Details, "Details", 100, true, 80),
        Column::new(ColumnId::Priority, "Priority", 120, false, 100),
        Column::new(ColumnId::Impact, "Impact", 120, false, 100),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_columns_cover_every_id_once() {
        let cols = default_columns();
        assert_eq!(cols.len(), ColumnId::ALL.len());
        for id in ColumnId::ALL {
            assert_eq!(cols.iter().filter(|c| c.id == id).count(), 1);
        }
        assert_eq!(cols[0].width, "400px");
        assert!(!cols.iter().find(|c| c.id == ColumnId::Impact).unwrap().visible);
    }

    #[test]
    fn width_px_parses_pixel_strings() {
        let mut col = default_columns().remove(0);
        assert_eq!(col.width_px(), 400);
        col.width = "bogus".into();
        assert_eq!(col.width_px(), 200);
        col.set_width_px(250);
        assert_eq!(col.width, "250px");
    }

    #[test]
    fn column_id_round_trips_through_json() {
        let json = serde_json::to_string(&ColumnId::Assignee).unwrap();
        assert_eq!(json, "\"assignee\"");
        assert_eq!(ColumnId::parse("Dates"), Some(ColumnId::Dates));
    }
}
