//! Upload dates and per-month series.
//!
//! The export writes upload dates as `Date(Y,M,D)` with a zero-based
//! month. Decoding follows the spreadsheet's calendar arithmetic: an
//! out-of-range month or day rolls over into the next (or previous) unit,
//! and two-digit years are 1900-based.

use core::fmt;

use chrono::{Datelike, Duration, Months, NaiveDate};
use memchr::memmem;
use rustc_hash::FxHashMap;
use shelf_types::Book;

const PREFIX: &[u8] = b"Date(";

const MONTH_ABBREVIATIONS: [&str; 12] = [
    "ene", "feb", "mar", "abr", "may", "jun", "jul", "ago", "sep", "oct", "nov", "dic",
];

/// A calendar month, the x-axis unit of the uploads chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    /// Calendar year.
    pub year: i32,
    /// Month, 1-based.
    pub month: u32,
}

impl MonthKey {
    /// Month containing `date`.
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Axis tick label, e.g. `"ene 2024"`.
    pub fn short_label(self) -> String {
        let name = MONTH_ABBREVIATIONS
            .get(self.month.wrapping_sub(1) as usize)
            .copied()
            .unwrap_or("?");
        format!("{name} {}", self.year)
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}

/// Parses the first `Date(Y,M,D)` in `raw`.
///
/// Returns `None` when no well-formed marker is present or the date falls
/// outside the representable range.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use shelf_core::stats::parse_upload_date;
///
/// assert_eq!(parse_upload_date("Date(2024,0,15)"), NaiveDate::from_ymd_opt(2024, 1, 15));
/// assert_eq!(parse_upload_date("Date(2024,12,1)"), NaiveDate::from_ymd_opt(2025, 1, 1));
/// assert_eq!(parse_upload_date("2024-01-15"), None);
/// ```
pub fn parse_upload_date(raw: &str) -> Option<NaiveDate> {
    let bytes = raw.as_bytes();
    memmem::find_iter(bytes, PREFIX).find_map(|start| {
        let (y, m, d) = parse_fields(&raw[start + PREFIX.len()..])?;
        calendar_date(y, m, d)
    })
}

/// Parses `Y,M,D)` where every field is one or more ASCII digits.
fn parse_fields(rest: &str) -> Option<(u64, u64, u64)> {
    let close = rest.find(')')?;
    let mut fields = rest[..close].split(',').map(|f| {
        if f.is_empty() || !f.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        f.parse::<u64>().ok()
    });
    let y = fields.next()??;
    let m = fields.next()??;
    let d = fields.next()??;
    if fields.next().is_some() {
        return None;
    }
    Some((y, m, d))
}

fn calendar_date(year: u64, month0: u64, day: u64) -> Option<NaiveDate> {
    let year = if year <= 99 { 1900 + year } else { year };
    let year = i32::try_from(year).ok()?;
    let months = u32::try_from(month0).ok()?;
    let days = i64::try_from(day).ok()? - 1;

    NaiveDate::from_ymd_opt(year, 1, 1)?
        .checked_add_months(Months::new(months))?
        .checked_add_signed(Duration::try_days(days)?)
}

/// Books uploaded per month, ascending. Undecodable dates are skipped.
pub fn uploads_by_month(books: &[Book]) -> Vec<(MonthKey, usize)> {
    let mut counts: FxHashMap<MonthKey, usize> = FxHashMap::default();
    for month in books.iter().filter_map(|b| parse_upload_date(&b.uploaded).map(MonthKey::of)) {
        *counts.entry(month).or_default() += 1;
    }
    let mut months: Vec<(MonthKey, usize)> = counts.into_iter().collect();
    months.sort_unstable_by_key(|&(m, _)| m);
    months
}

/// One line of the uploads chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Series {
    /// Category label.
    pub label: String,
    /// Uploads per month, aligned with [`UploadChart::months`].
    pub counts: Vec<usize>,
}

/// Uploads chart: a shared month axis and one or more series.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UploadChart {
    /// Every month with at least one upload, ascending.
    pub months: Vec<MonthKey>,
    /// Series aligned with `months`.
    pub series: Vec<Series>,
}

/// Label of the single series shown when no type is selected.
pub const ALL_UPLOADS_LABEL: &str = "Libros subidos por mes";

/// Type of `book` as the uploads chart labels it.
#[inline]
fn type_label<'a>(book: &'a Book, unspecified: &'a str) -> &'a str {
    let kind = book.kind.trim();
    if kind.is_empty() {
        unspecified
    } else {
        kind
    }
}

/// Uploads per month for each selected type.
///
/// The month axis always spans every upload, so series stay comparable;
/// months where a type had no uploads are zero. Blank types are selected
/// by `unspecified`. With no type selected the chart has one series
/// covering every book.
pub fn uploads_by_month_for_types(books: &[Book], types: &[&str], unspecified: &str) -> UploadChart {
    let totals = uploads_by_month(books);
    let months: Vec<MonthKey> = totals.iter().map(|&(m, _)| m).collect();

    if types.is_empty() {
        return UploadChart {
            months,
            series: vec![Series {
                label: ALL_UPLOADS_LABEL.to_owned(),
                counts: totals.into_iter().map(|(_, c)| c).collect(),
            }],
        };
    }

    let column: FxHashMap<MonthKey, usize> =
        months.iter().enumerate().map(|(i, &m)| (m, i)).collect();
    let row: FxHashMap<&str, usize> = types.iter().enumerate().map(|(i, &t)| (t, i)).collect();
    let mut grid = vec![vec![0usize; months.len()]; types.len()];

    for book in books {
        let Some(date) = parse_upload_date(&book.uploaded) else {
            continue;
        };
        let Some(&r) = row.get(type_label(book, unspecified)) else {
            continue;
        };
        if let Some(&c) = column.get(&MonthKey::of(date)) {
            grid[r][c] += 1;
        }
    }

    UploadChart {
        months,
        series: types
            .iter()
            .zip(grid)
            .map(|(&label, counts)| Series {
                label: label.to_owned(),
                counts,
            })
            .collect(),
    }
}

/// Types offered as series toggles: distinct trimmed types, blank ones
/// under `unspecified`, sorted.
pub fn upload_type_options<'a>(books: &'a [Book], unspecified: &'a str) -> Vec<&'a str> {
    let mut types: Vec<&str> = books.iter().map(|b| type_label(b, unspecified)).collect();
    types.sort_unstable();
    types.dedup();
    types
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    fn upload(kind: &str, uploaded: &str) -> Book {
        Book {
            kind: kind.into(),
            uploaded: uploaded.into(),
            ..Default::default()
        }
    }

    #[test]
    fn zero_based_months() {
        assert_eq!(parse_upload_date("Date(2024,0,1)"), date(2024, 1, 1));
        assert_eq!(parse_upload_date("Date(2023,11,31)"), date(2023, 12, 31));
    }

    #[test]
    fn out_of_range_values_roll_over() {
        assert_eq!(parse_upload_date("Date(2024,1,30)"), date(2024, 3, 1));
        assert_eq!(parse_upload_date("Date(2024,0,0)"), date(2023, 12, 31));
        assert_eq!(parse_upload_date("Date(2024,14,1)"), date(2025, 3, 1));
        assert_eq!(parse_upload_date("Date(2023,1,29)"), date(2023, 3, 1));
    }

    #[test]
    fn two_digit_years_are_1900_based() {
        assert_eq!(parse_upload_date("Date(99,0,1)"), date(1999, 1, 1));
        assert_eq!(parse_upload_date("Date(100,0,1)"), date(100, 1, 1));
    }

    #[test]
    fn marker_may_be_embedded() {
        assert_eq!(parse_upload_date("subido Date(2024,5,3) aprox."), date(2024, 6, 3));
        assert_eq!(parse_upload_date("Date(x) Date(2024,5,3)"), date(2024, 6, 3));
    }

    #[test]
    fn malformed_dates_are_none() {
        for raw in [
            "",
            "Date()",
            "Date(2024,1)",
            "Date(2024,1,2,3)",
            "Date(2024,-1,2)",
            "Date(2024, 1,2)",
            "Date(2024,1,2",
            "Date(99999999999,0,1)",
        ] {
            assert_eq!(parse_upload_date(raw), None, "{raw}");
        }
    }

    #[test]
    fn month_keys() {
        let key = MonthKey { year: 2024, month: 3 };
        assert_eq!(key.to_string(), "2024-03");
        assert_eq!(key.short_label(), "mar 2024");
        assert_eq!(MonthKey { year: 500, month: 12 }.to_string(), "500-12");
    }

    #[test]
    fn uploads_counted_per_month() {
        let books = vec![
            upload("Novela", "Date(2024,1,3)"),
            upload("Novela", "Date(2023,11,3)"),
            upload("Ensayo", "Date(2024,1,28)"),
            upload("Ensayo", ""),
        ];
        let got: Vec<(String, usize)> = uploads_by_month(&books)
            .into_iter()
            .map(|(m, c)| (m.to_string(), c))
            .collect();
        assert_eq!(got, vec![("2023-12".into(), 1), ("2024-02".into(), 2)]);
    }

    #[test]
    fn per_type_series_share_the_axis() {
        let books = vec![
            upload("Novela", "Date(2024,0,3)"),
            upload("Ensayo", "Date(2024,1,3)"),
            upload(" ", "Date(2024,2,3)"),
            upload("Novela", "Date(2024,2,9)"),
            upload("Cómic", "Date(2024,3,9)"),
        ];
        let chart = uploads_by_month_for_types(&books, &["Novela", "Sin especificar"], "Sin especificar");

        assert_eq!(chart.months.len(), 4);
        assert_eq!(chart.series.len(), 2);
        assert_eq!(chart.series[0].label, "Novela");
        assert_eq!(chart.series[0].counts, vec![1, 0, 1, 0]);
        assert_eq!(chart.series[1].counts, vec![0, 0, 1, 0]);
    }

    #[test]
    fn no_selection_gives_the_total_series() {
        let books = vec![upload("Novela", "Date(2024,0,3)"), upload("Ensayo", "Date(2024,0,5)")];
        let chart = uploads_by_month_for_types(&books, &[], "Sin especificar");
        assert_eq!(chart.series.len(), 1);
        assert_eq!(chart.series[0].label, ALL_UPLOADS_LABEL);
        assert_eq!(chart.series[0].counts, vec![2]);
    }

    #[test]
    fn type_options_are_sorted_and_distinct() {
        let books = vec![upload("Novela", ""), upload("", ""), upload("Ensayo ", ""), upload("Novela", "")];
        assert_eq!(
            upload_type_options(&books, "Sin especificar"),
            vec!["Ensayo", "Novela", "Sin especificar"]
        );
    }
}
