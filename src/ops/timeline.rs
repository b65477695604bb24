use std::collections::HashMap;

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::model::task::{Task, TaskId};
use crate::ops::dates::parse_dmy;
use crate::ops::task_ops::for_each_task;

/// Days shown by the lookahead weather strip at most
pub const WEATHER_STRIP_DAYS: usize = 14;

/// A run of consecutive days in the same month, for the Gantt header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthSpan {
    pub year: i32,
    pub month: u32,
    pub days: usize,
}

/// Bar geometry in whole days relative to the project start
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bar {
    pub offset_days: i64,
    /// Inclusive length; at least one day
    pub span_days: i64,
}

/// Date range covered by a Gantt chart
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timeline {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Timeline {
    /// Span every task in the forest, collapsed descendants included.
    /// Returns `None` when no task has a parsable start and due date.
    pub fn from_tasks(tasks: &[Task]) -> Option<Timeline> {
        let mut start: Option<NaiveDate> = None;
        let mut end: Option<NaiveDate> = None;
        for_each_task(tasks, &mut |task| {
            if let Some(s) = task.start_date.as_deref().and_then(parse_dmy) {
                start = Some(start.map_or(s, |cur| cur.min(s)));
            }
            if let Some(d) = task.due_date.as_deref().and_then(parse_dmy) {
                end = Some(end.map_or(d, |cur| cur.max(d)));
            }
        });
        let (start, end) = (start?, end?);
        Some(Timeline {
            start,
            end: end.max(start),
        })
    }

    /// Inclusive day count
    pub fn total_days(&self) -> usize {
        ((self.end - self.start).num_days() + 1) as usize
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.start.iter_days().take(self.total_days())
    }

    pub fn is_weekend(date: NaiveDate) -> bool {
        matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
    }

    pub fn month_spans(&self) -> Vec<MonthSpan> {
        let mut spans: Vec<MonthSpan> = Vec::new();
        for day in self.days() {
            match spans.last_mut() {
                Some(span) if span.year == day.year() && span.month == day.month() => {
                    span.days += 1;
                }
                _ => spans.push(MonthSpan {
                    year: day.year(),
                    month: day.month(),
                    days: 1,
                }),
            }
        }
        spans
    }

    /// Bar for a task with both dates parsable. A due date before the start
    /// still yields a one-day bar at the start.
    pub fn bar(&self, task: &Task) -> Option<Bar> {
        let start = task.start_date.as_deref().and_then(parse_dmy)?;
        let due = task.due_date.as_deref().and_then(parse_dmy)?;
        Some(Bar {
            offset_days: (start - self.start).num_days(),
            span_days: ((due - start).num_days() + 1).max(1),
        })
    }

    /// Bars for every task in the forest, keyed by id
    pub fn bars(&self, tasks: &[Task]) -> HashMap<TaskId, Bar> {
        let mut bars = HashMap::new();
        for_each_task(tasks, &mut |task| {
            if let Some(bar) = self.bar(task) {
                bars.insert(task.id, bar);
            }
        });
        bars
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeatherIcon {
    Sun,
    Cloud,
    Rain,
}

/// One day of forecast data supplied by the lookahead collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherForecast {
    pub date: NaiveDate,
    pub icon: WeatherIcon,
    #[serde(rename = "temp")]
    pub temperature: i32,
}

/// Pair each of the first `min(total_days, 14)` days from `start` with its
/// forecast, if one exists.
pub fn weather_strip(
    start: NaiveDate,
    total_days: usize,
    forecasts: &[WeatherForecast],
) -> Vec<(NaiveDate, Option<&WeatherForecast>)> {
    let by_date: HashMap<NaiveDate, &WeatherForecast> =
        forecasts.iter().map(|f| (f.date, f)).collect();
    (0..total_days.min(WEATHER_STRIP_DAYS))
        .map(|i| {
            let date = start + Duration::days(i as i64);
            (date, by_date.get(&date).copied())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::sample::sample_tasks;
    use crate::model::task::Status;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn sample_project_range() {
        let tl = Timeline::from_tasks(&sample_tasks()).unwrap();
        assert_eq!(tl.start, ymd(2024, 5, 15));
        assert_eq!(tl.end, ymd(2024, 6, 30));
        assert_eq!(tl.total_days(), 47);
        assert_eq!(
            tl.month_spans(),
            vec![
                MonthSpan { year: 2024, month: 5, days: 17 },
                MonthSpan { year: 2024, month: 6, days: 30 },
            ]
        );
    }

    #[test]
    fn bars_are_offset_from_project_start() {
        let tasks = sample_tasks();
        let tl = Timeline::from_tasks(&tasks).unwrap();
        let bars = tl.bars(&tasks);
        assert_eq!(bars[&1], Bar { offset_days: 0, span_days: 47 });
        assert_eq!(bars[&5], Bar { offset_days: 14, span_days: 7 });
        assert_eq!(bars.len(), 9);
    }

    #[test]
    fn unparsable_dates_are_skipped() {
        let mut t = Task::new(1, "a", Status::New);
        t.start_date = Some("soon".into());
        t.due_date = Some("later".into());
        assert_eq!(Timeline::from_tasks(&[t]), None);
    }

    #[test]
    fn weekends_are_flagged() {
        // 18/05/2024 was a Saturday
        assert!(Timeline::is_weekend(ymd(2024, 5, 18)));
        assert!(!Timeline::is_weekend(ymd(2024, 5, 20)));
    }

    #[test]
    fn weather_strip_caps_at_two_weeks() {
        let forecasts = vec![WeatherForecast {
            date: ymd(2024, 5, 16),
            icon: WeatherIcon::Rain,
            temperature: 14,
        }];
        let strip = weather_strip(ymd(2024, 5, 15), 47, &forecasts);
        assert_eq!(strip.len(), 14);
        assert!(strip[0].1.is_none());
        assert_eq!(strip[1].1.map(|f| f.icon), Some(WeatherIcon::Rain));
        assert_eq!(weather_strip(ymd(2024, 5, 15), 3, &forecasts).len(), 3);
    }
}
