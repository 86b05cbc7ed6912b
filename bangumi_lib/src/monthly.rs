//! Best record per calendar month over the most recent unbroken run of months.
//!
//! Records are bucketed by year and month. Starting from the latest month
//! present, months are accepted while each is exactly one calendar month
//! before the previous one; the first gap ends the run, even if older months
//! have data. Each accepted month contributes its highest-magnitude record.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::cmp::Ordering;
use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::normalize::Row;

/// A calendar month.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The month before this one.
    pub fn pred(self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    /// Month of a date string, or `None` if it does not parse.
    ///
    /// Accepts `YYYY-MM-DD`, `YYYY/MM/DD`, `YYYY.MM.DD`, `YYYY-MM`, and
    /// timestamps whose first ten characters are one of the full-date forms.
    pub fn parse(input: &str) -> Option<Self> {
        let s = input.trim();
        if let Some(date) = parse_full_date(s) {
            return Some(Self::from_date(date));
        }
        if let Some(prefix) = s.get(..10) {
            if s.len() > 10 {
                if let Some(date) = parse_full_date(prefix) {
                    return Some(Self::from_date(date));
                }
            }
        }
        parse_full_date(&format!("{}-01", s)).map(Self::from_date)
    }
}

fn parse_full_date(s: &str) -> Option<NaiveDate> {
    ["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Anything with a date and a magnitude to rank by.
pub trait MonthlyRecord {
    fn date(&self) -> &str;
    fn magnitude(&self) -> f64;
}

/// Rows compete on rating count.
impl MonthlyRecord for Row {
    fn date(&self) -> &str {
        &self.date
    }

    fn magnitude(&self) -> f64 {
        self.score_total as f64
    }
}

/// One month of the streak and its winning record.
#[derive(Debug, PartialEq)]
pub struct MonthPick<'a, T> {
    pub month: YearMonth,
    pub record: &'a T,
}

/// Winners of the streak, latest month first.
#[derive(Debug, PartialEq)]
pub struct MonthlyBest<'a, T> {
    pub picks: Vec<MonthPick<'a, T>>,
}

impl<'a, T> MonthlyBest<'a, T> {
    /// Number of consecutive months in the streak.
    pub fn streak_len(&self) -> usize {
        self.picks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.picks.is_empty()
    }

    pub fn months(&self) -> Vec<YearMonth> {
        self.picks.iter().map(|p| p.month).collect()
    }

    pub fn records(&self) -> Vec<&'a T> {
        self.picks.iter().map(|p| p.record).collect()
    }
}

/// Selects the best record of each month in the latest unbroken run.
///
/// Records with unparseable dates are ignored. Within a month the highest
/// magnitude wins; on equal magnitude the record that appears first in
/// `records` wins.
pub fn select_monthly_best<T: MonthlyRecord>(records: &[T]) -> MonthlyBest<'_, T> {
    let mut best: BTreeMap<YearMonth, &T> = BTreeMap::new();
    for record in records {
        let Some(month) = YearMonth::parse(record.date()) else {
            continue;
        };
        match best.entry(month) {
            Entry::Vacant(slot) => {
                slot.insert(record);
            }
            Entry::Occupied(mut slot) => {
                if record.magnitude().total_cmp(&slot.get().magnitude()) == Ordering::Greater {
                    slot.insert(record);
                }
            }
        }
    }

    let mut picks = Vec::new();
    let mut expected: Option<YearMonth> = None;
    for (&month, &record) in best.iter().rev() {
        if expected.is_some_and(|e| e != month) {
            break;
        }
        picks.push(MonthPick { month, record });
        expected = Some(month.pred());
    }

    MonthlyBest { picks }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Rec {
        tag: &'static str,
        date: &'static str,
        score: f64,
    }

    impl MonthlyRecord for Rec {
        fn date(&self) -> &str {
            self.date
        }

        fn magnitude(&self) -> f64 {
            self.score
        }
    }

    fn rec(tag: &'static str, date: &'static str, score: f64) -> Rec {
        Rec { tag, date, score }
    }

    fn tags<'a>(best: &MonthlyBest<'a, Rec>) -> Vec<&'static str> {
        best.records().iter().map(|r| r.tag).collect()
    }

    #[test]
    fn empty_input_gives_empty_streak() {
        let best = select_monthly_best::<Rec>(&[]);
        assert!(best.is_empty());
        assert_eq!(best.streak_len(), 0);
    }

    #[test]
    fn single_month_is_streak_of_one() {
        let records = [rec("a", "2024-03-02", 1.0), rec("b", "2024-03-20", 5.0)];
        let best = select_monthly_best(&records);
        assert_eq!(best.streak_len(), 1);
        assert_eq!(tags(&best), vec!["b"]);
    }

    #[test]
    fn gap_ends_the_streak() {
        let records = [
            rec("jun", "2024-06-10", 1.0),
            rec("may", "2024-05-10", 1.0),
            rec("mar", "2024-03-10", 100.0),
        ];
        let best = select_monthly_best(&records);
        assert_eq!(best.streak_len(), 2);
        assert_eq!(
            best.months(),
            vec![YearMonth::new(2024, 6).unwrap(), YearMonth::new(2024, 5).unwrap()]
        );
        assert_eq!(tags(&best), vec!["jun", "may"]);
    }

    #[test]
    fn streak_is_anchored_at_latest_month() {
        let records = [
            rec("jan", "2024-01-15", 50.0),
            rec("feb-90", "2024-02-01", 90.0),
            rec("feb-70", "2024-02-20", 70.0),
            rec("apr", "2024-04-03", 10.0),
        ];
        let best = select_monthly_best(&records);
        assert_eq!(best.streak_len(), 1);
        assert_eq!(best.months(), vec![YearMonth::new(2024, 4).unwrap()]);
        assert_eq!(tags(&best), vec!["apr"]);
    }

    #[test]
    fn picks_top_record_per_month_across_year_boundary() {
        let records = [
            rec("jan-lo", "2024-01-01", 3.0),
            rec("dec", "2023-12-31", 8.0),
            rec("jan-hi", "2024-01-31", 9.0),
            rec("nov", "2023-11-05", 2.0),
        ];
        let best = select_monthly_best(&records);
        assert_eq!(tags(&best), vec!["jan-hi", "dec", "nov"]);
    }

    #[test]
    fn ties_go_to_first_record_in_input_order() {
        let records = [
            rec("first", "2024-02-01", 7.0),
            rec("second", "2024-02-02", 7.0),
        ];
        for _ in 0..3 {
            assert_eq!(tags(&select_monthly_best(&records)), vec!["first"]);
        }
    }

    #[test]
    fn unparseable_dates_are_ignored() {
        let records = [
            rec("bad", "someday", 100.0),
            rec("empty", "", 100.0),
            rec("ok", "2024-02-02", 1.0),
        ];
        assert_eq!(tags(&select_monthly_best(&records)), vec!["ok"]);
    }

    #[test]
    fn input_is_not_reordered() {
        let records = vec![rec("b", "2024-02-01", 1.0), rec("a", "2024-01-01", 2.0)];
        let _ = select_monthly_best(&records);
        assert_eq!(records[0].tag, "b");
    }

    #[test]
    fn parses_common_date_shapes() {
        let want = YearMonth::new(2023, 7);
        for s in ["2023-07-04", "2023/07/04", "2023.07.04", "2023-07", "2023-07-04T12:00:00Z", "2023-07-04 00:00:00"] {
            assert_eq!(YearMonth::parse(s), want, "{}", s);
        }
        assert_eq!(YearMonth::parse("2023-13-01"), None);
        assert_eq!(YearMonth::parse("2023"), None);
    }

    #[test]
    fn pred_wraps_year() {
        let jan = YearMonth::new(2024, 1).unwrap();
        assert_eq!(jan.pred(), YearMonth::new(2023, 12).unwrap());
        assert_eq!(jan.to_string(), "2024-01");
    }

    #[test]
    fn rows_rank_by_rating_count() {
        let make = |id, date: &str, total| Row {
            id,
            name: String::new(),
            name_cn: String::new(),
            date: date.to_string(),
            meta_tags: String::new(),
            score: None,
            score_total: total,
            rank: 1,
        };
        let rows = vec![make(1, "2024-05-01", 10), make(2, "2024-05-09", 30), make(3, "2024-04-01", 5)];
        let best = select_monthly_best(&rows);
        assert_eq!(best.records().iter().map(|r| r.id).collect::<Vec<_>>(), vec![2, 3]);
    }
}
