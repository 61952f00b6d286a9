//! Frequency counts for charts.
//!
//! All counters preserve first-seen order internally so that ties resolve
//! deterministically; every sort here is stable.

use core::cmp::Ordering;

use rustc_hash::FxHashMap;

use crate::analyzer::list_items;

/// A labelled count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tally<'a> {
    /// Category, theme or year label.
    pub label: &'a str,
    /// Occurrences.
    pub count: usize,
}

/// A pie chart slice.
#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice<'a> {
    /// Category label.
    pub label: &'a str,
    /// Occurrences.
    pub count: usize,
    /// CSS colour, evenly spaced around the hue wheel.
    pub color: String,
}

/// Counts labels in first-seen order.
#[derive(Debug, Default)]
struct Counter<'a> {
    slots: FxHashMap<&'a str, usize>,
    tallies: Vec<Tally<'a>>,
}

impl<'a> Counter<'a> {
    #[inline]
    fn add(&mut self, label: &'a str) {
        match self.slots.get(label) {
            Some(&i) => self.tallies[i].count += 1,
            None => {
                self.slots.insert(label, self.tallies.len());
                self.tallies.push(Tally { label, count: 1 });
            }
        }
    }

    fn into_tallies(self) -> Vec<Tally<'a>> {
        self.tallies
    }
}

fn numeric_year(value: &str) -> Option<f64> {
    value.parse::<f64>().ok().filter(|y| y.is_finite())
}

/// Counts publication years, ascending.
///
/// Values are trimmed; blank and non-numeric entries are ignored. Years
/// compare numerically (`"-500" < "0800" < "1963"`), and spellings of the
/// same number (`"800"`, `"0800"`) are counted separately, in first-seen
/// order.
///
/// # Examples
///
/// ```
/// use shelf_core::stats::count_by_year;
///
/// let counts = count_by_year(["1963", "s/f", "1963", "-700", ""]);
/// let pairs: Vec<_> = counts.iter().map(|t| (t.label, t.count)).collect();
/// assert_eq!(pairs, vec![("-700", 1), ("1963", 2)]);
/// ```
pub fn count_by_year<'a>(values: impl IntoIterator<Item = &'a str>) -> Vec<Tally<'a>> {
    let mut counter = Counter::default();
    for value in values {
        let value = value.trim();
        if numeric_year(value).is_some() {
            counter.add(value);
        }
    }

    let mut years: Vec<(f64, Tally<'a>)> = counter
        .into_tallies()
        .into_iter()
        .filter_map(|t| numeric_year(t.label).map(|y| (y, t)))
        .collect();
    years.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));
    years.into_iter().map(|(_, t)| t).collect()
}

/// Counts category values for a pie chart, in first-seen order.
///
/// Blank or whitespace-only values are counted under `unspecified`.
pub fn count_by_category<'a>(
    values: impl IntoIterator<Item = &'a str>,
    unspecified: &'a str,
) -> Vec<PieSlice<'a>> {
    let mut counter = Counter::default();
    for value in values {
        let value = value.trim();
        counter.add(if value.is_empty() { unspecified } else { value });
    }

    let tallies = counter.into_tallies();
    let len = tallies.len();
    tallies
        .into_iter()
        .enumerate()
        .map(|(i, t)| PieSlice {
            label: t.label,
            count: t.count,
            color: hue_color(i, len),
        })
        .collect()
}

/// `hsl(i * 360 / len, 70%, 60%)`.
pub fn hue_color(i: usize, len: usize) -> String {
    let hue = if len == 0 {
        0.0
    } else {
        (i as f64 * 360.0) / len as f64
    };
    format!("hsl({hue}, 70%, 60%)")
}

/// The `n` most frequent items across comma-joined cells.
///
/// Each cell is split on commas and trimmed; empty items are skipped.
/// Results are ordered by descending count; equal counts keep the order in
/// which the items were first seen.
///
/// # Examples
///
/// ```
/// use shelf_core::stats::top_n;
///
/// let top = top_n(["A,B", "A", "B,B"], 2);
/// let pairs: Vec<_> = top.iter().map(|t| (t.label, t.count)).collect();
/// assert_eq!(pairs, vec![("B", 3), ("A", 2)]);
/// ```
pub fn top_n<'a>(cells: impl IntoIterator<Item = &'a str>, n: usize) -> Vec<Tally<'a>> {
    let mut counter = Counter::default();
    for cell in cells {
        for item in list_items(cell) {
            counter.add(item);
        }
    }

    let mut tallies = counter.into_tallies();
    tallies.sort_by(|a, b| b.count.cmp(&a.count));
    tallies.truncate(n);
    tallies
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs<'a>(tallies: &[Tally<'a>]) -> Vec<(&'a str, usize)> {
        tallies.iter().map(|t| (t.label, t.count)).collect()
    }

    #[test]
    fn years_sort_numerically() {
        let counts = count_by_year(["1998", "-500", "0800", "1983", "1998", " 1983 "]);
        assert_eq!(
            pairs(&counts),
            vec![("-500", 1), ("0800", 1), ("1983", 2), ("1998", 2)]
        );
    }

    #[test]
    fn non_numeric_years_are_ignored() {
        let counts = count_by_year(["", "   ", "s. XV", "NaN", "inf", "1605"]);
        assert_eq!(pairs(&counts), vec![("1605", 1)]);
    }

    #[test]
    fn equal_numbers_keep_first_seen_order() {
        let counts = count_by_year(["0800", "800", "0800"]);
        assert_eq!(pairs(&counts), vec![("0800", 2), ("800", 1)]);
    }

    #[test]
    fn blank_categories_are_unspecified() {
        let slices = count_by_category(["Novela", " ", "Ensayo", "", "Novela "], "Sin especificar");
        let got: Vec<(&str, usize)> = slices.iter().map(|s| (s.label, s.count)).collect();
        assert_eq!(
            got,
            vec![("Novela", 2), ("Sin especificar", 2), ("Ensayo", 1)]
        );
    }

    #[test]
    fn pie_colors_spread_around_the_wheel() {
        let slices = count_by_category(["a", "b", "c"], "?");
        let colors: Vec<&str> = slices.iter().map(|s| s.color.as_str()).collect();
        assert_eq!(
            colors,
            vec!["hsl(0, 70%, 60%)", "hsl(120, 70%, 60%)", "hsl(240, 70%, 60%)"]
        );
        assert_eq!(hue_color(1, 7), "hsl(51.42857142857143, 70%, 60%)");
    }

    #[test]
    fn top_n_counts_across_cells() {
        let top = top_n(["A,B", "A", "B,B"], 2);
        assert_eq!(pairs(&top), vec![("B", 3), ("A", 2)]);
    }

    #[test]
    fn top_n_ties_keep_first_seen_order() {
        let top = top_n(["Humor, Drama", "Amor", "Drama, Humor, Amor"], 10);
        assert_eq!(pairs(&top), vec![("Humor", 2), ("Drama", 2), ("Amor", 2)]);
    }

    #[test]
    fn top_n_truncates_and_skips_blanks() {
        let top = top_n(["a, ,b,", "", "c"], 2);
        assert_eq!(pairs(&top), vec![("a", 1), ("b", 1)]);
        assert!(top_n(["x"], 0).is_empty());
    }

    #[test]
    fn empty_inputs() {
        assert!(count_by_year(Vec::<&str>::new()).is_empty());
        assert!(count_by_category(Vec::<&str>::new(), "?").is_empty());
        assert!(top_n(Vec::<&str>::new(), 3).is_empty());
    }
}
