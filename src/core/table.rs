use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// A single sortable cell. Numeric-looking columns surface as `Number`
/// (parsed by the row, with unparseable values as NaN); everything else
/// compares as case-insensitive text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell<'a> {
    Text(&'a str),
    Number(f64),
}

/// A row that can be searched, sorted and paginated into a table view.
pub trait TableRow {
    type SortKey: Copy;

    /// Text fields matched by the free-text filter.
    fn search_fields(&self) -> Vec<&str>;

    fn cell(&self, key: Self::SortKey) -> Cell<'_>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    #[serde(alias = "asc")]
    Ascending,
    #[serde(alias = "desc")]
    Descending,
}

/// Transient per-request sort selection. `key: None` leaves the incoming
/// order untouched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SortConfig<K> {
    pub key: Option<K>,
    pub order: SortOrder,
}

impl<K> Default for SortConfig<K> {
    fn default() -> Self {
        Self {
            key: None,
            order: SortOrder::default(),
        }
    }
}

/// One page of a table view, with enough bookkeeping for a pager widget.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<R> {
    pub rows: Vec<R>,
    pub page: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

/// Case-insensitive substring filter over the row's search fields. An
/// empty or whitespace-only term is the identity.
pub fn filter_rows<R: TableRow>(rows: Vec<R>, term: &str) -> Vec<R> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return rows;
    }

    rows.into_iter()
        .filter(|row| {
            row.search_fields()
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
        })
        .collect()
}

/// Stable sort by the configured key. Ties keep their incoming relative
/// order, so toggling the direction on the same key never reshuffles them.
/// NaN cells sort to the end regardless of direction.
pub fn sort_rows<R: TableRow>(rows: &mut [R], config: SortConfig<R::SortKey>) {
    let Some(key) = config.key else {
        return;
    };

    rows.sort_by(|a, b| compare_cells(a.cell(key), b.cell(key), config.order));
}

fn compare_cells(a: Cell<'_>, b: Cell<'_>, order: SortOrder) -> Ordering {
    let ordering = match (a, b) {
        (Cell::Text(a), Cell::Text(b)) => {
            directed(a.to_lowercase().cmp(&b.to_lowercase()), order)
        }
        (Cell::Number(a), Cell::Number(b)) => match (a.is_nan(), b.is_nan()) {
            // NaN placement is direction-independent.
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => directed(a.total_cmp(&b), order),
        },
        // A key never yields mixed cell kinds within one column; if it
        // somehow does, leave the pair in its incoming order.
        _ => Ordering::Equal,
    };
    ordering
}

fn directed(ordering: Ordering, order: SortOrder) -> Ordering {
    match order {
        SortOrder::Ascending => ordering,
        SortOrder::Descending => ordering.reverse(),
    }
}

/// Slice out the 1-based `page` of `page_size` rows, clamped to bounds.
pub fn paginate<R>(rows: Vec<R>, page: usize, page_size: usize) -> Page<R> {
    let page_size = page_size.max(1);
    let page = page.max(1);
    let total_items = rows.len();
    let total_pages = total_items.div_ceil(page_size).max(1);

    let start = (page - 1).saturating_mul(page_size).min(total_items);
    let end = start.saturating_add(page_size).min(total_items);
    let rows = rows
        .into_iter()
        .skip(start)
        .take(end - start)
        .collect::<Vec<_>>();

    Page {
        rows,
        page,
        page_size,
        total_items,
        total_pages,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        symbol: &'static str,
        close: &'static str,
    }

    #[derive(Debug, Clone, Copy)]
    enum Key {
        Symbol,
        Close,
    }

    impl TableRow for Row {
        type SortKey = Key;

        fn search_fields(&self) -> Vec<&str> {
            vec![self.symbol]
        }

        fn cell(&self, key: Key) -> Cell<'_> {
            match key {
                Key::Symbol => Cell::Text(self.symbol),
                Key::Close => Cell::Number(self.close.parse().unwrap_or(f64::NAN)),
            }
        }
    }

    fn rows() -> Vec<Row> {
        vec![
            Row {
                symbol: "TCS",
                close: "4100.5",
            },
            Row {
                symbol: "INFY",
                close: "1520.0",
            },
            Row {
                symbol: "HDFCBANK",
                close: "n/a",
            },
            Row {
                symbol: "RELIANCE",
                close: "2950.25",
            },
        ]
    }

    #[test]
    fn empty_filter_term_is_identity() {
        let original = rows();
        assert_eq!(filter_rows(original.clone(), ""), original);
        assert_eq!(filter_rows(original.clone(), "   "), original);
    }

    #[test]
    fn filter_matches_case_insensitively() {
        let filtered = filter_rows(rows(), "infy");
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].symbol, "INFY");
    }

    #[test]
    fn filter_with_no_match_is_empty() {
        assert_eq!(filter_rows(rows(), "ZOMATO"), vec![]);
    }

    #[test]
    fn sort_by_text_key_is_case_insensitive() {
        let mut data = rows();
        sort_rows(
            &mut data,
            SortConfig {
                key: Some(Key::Symbol),
                order: SortOrder::Ascending,
            },
        );
        let symbols: Vec<_> = data.iter().map(|r| r.symbol).collect();
        assert_eq!(symbols, vec!["HDFCBANK", "INFY", "RELIANCE", "TCS"]);
    }

    #[test]
    fn sort_parses_numeric_cells_and_pushes_nan_to_the_end() {
        let mut ascending = rows();
        sort_rows(
            &mut ascending,
            SortConfig {
                key: Some(Key::Close),
                order: SortOrder::Ascending,
            },
        );
        let symbols: Vec<_> = ascending.iter().map(|r| r.symbol).collect();
        assert_eq!(symbols, vec!["INFY", "RELIANCE", "TCS", "HDFCBANK"]);

        let mut descending = rows();
        sort_rows(
            &mut descending,
            SortConfig {
                key: Some(Key::Close),
                order: SortOrder::Descending,
            },
        );
        let symbols: Vec<_> = descending.iter().map(|r| r.symbol).collect();
        assert_eq!(symbols, vec!["TCS", "RELIANCE", "INFY", "HDFCBANK"]);
    }

    #[test]
    fn sort_is_stable_on_ties() {
        let mut data = vec![
            Row {
                symbol: "A",
                close: "1",
            },
            Row {
                symbol: "B",
                close: "1",
            },
            Row {
                symbol: "C",
                close: "0.5",
            },
        ];
        sort_rows(
            &mut data,
            SortConfig {
                key: Some(Key::Close),
                order: SortOrder::Ascending,
            },
        );
        let symbols: Vec<_> = data.iter().map(|r| r.symbol).collect();
        assert_eq!(symbols, vec!["C", "A", "B"]);
    }

    #[test]
    fn sort_without_key_keeps_incoming_order() {
        let original = rows();
        let mut data = original.clone();
        sort_rows(&mut data, SortConfig::default());
        assert_eq!(data, original);
    }

    #[test]
    fn paginate_slices_one_based_pages() {
        let page = paginate(rows(), 2, 3);
        assert_eq!(page.rows.len(), 1);
        assert_eq!(page.rows[0].symbol, "RELIANCE");
        assert_eq!(page.page, 2);
        assert_eq!(page.total_items, 4);
        assert_eq!(page.total_pages, 2);
    }

    #[test]
    fn paginate_clamps_out_of_range_pages_to_empty() {
        let page = paginate(rows(), 99, 3);
        assert_eq!(page.rows, vec![]);
        assert_eq!(page.total_pages, 2);
    }

    #[test]
    fn paginate_treats_page_zero_as_first_page() {
        let page = paginate(rows(), 0, 2);
        assert_eq!(page.page, 1);
        assert_eq!(page.rows.len(), 2);
        assert_eq!(page.rows[0].symbol, "TCS");
    }

    #[test]
    fn paginate_of_empty_input_reports_one_empty_page() {
        let page = paginate(Vec::<Row>::new(), 1, 10);
        assert_eq!(page.rows, vec![]);
        assert_eq!(page.total_items, 0);
        assert_eq!(page.total_pages, 1);
    }
}
