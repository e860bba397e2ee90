//! Sortable index tables.
//!
//! Each `.sorter` button in a table head sorts the sibling `.table-body`
//! rows by its column. Cell text is compared accent- and case-insensitively,
//! numerically when both cells are numbers.

use std::cmp::Ordering;

use unicode_normalization::UnicodeNormalization;
use wasm_bindgen::JsCast;
use web_sys::{Element, NodeList};

use crate::config::sorter::{ASC_CLASS, BUTTON, DESC_CLASS, ROW, TABLE, TABLE_BODY, TABLE_HEAD};
use crate::core::error::BehaviorError;
use crate::utils::dom::{EventListener, is_bound, mark_bound};

/// Direction of a column sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    /// Direction after a click on a column currently sorted in `current`.
    ///
    /// An unsorted column starts ascending; a sorted one flips.
    pub fn after_click(current: Option<SortDirection>) -> Self {
        match current {
            Some(Self::Ascending) => Self::Descending,
            _ => Self::Ascending,
        }
    }

    pub fn class(self) -> &'static str {
        match self {
            Self::Ascending => ASC_CLASS,
            Self::Descending => DESC_CLASS,
        }
    }

    fn from_element(button: &Element) -> Option<Self> {
        let classes = button.class_list();
        if classes.contains(ASC_CLASS) {
            Some(Self::Ascending)
        } else if classes.contains(DESC_CLASS) {
            Some(Self::Descending)
        } else {
            None
        }
    }
}

// =============================================================================
// Comparison
// =============================================================================

/// Strip combining diacritics, lowercase and trim.
pub fn normalize_cell(text: &str) -> String {
    text.nfd()
        .filter(|c| !('\u{0300}'..='\u{036f}').contains(c))
        .collect::<String>()
        .to_lowercase()
        .trim()
        .to_string()
}

/// Numeric value of a normalized cell, following JavaScript `Number()`.
///
/// Cells are lowercased first, so `Infinity` never matches and stays text.
/// Unsigned `0x`, `0o` and `0b` literals are integers.
fn as_number(value: &str) -> Option<f64> {
    if value.is_empty() || value.contains("inf") || value.contains("nan") {
        return None;
    }
    let radix_literal = [("0x", 16), ("0o", 8), ("0b", 2)]
        .into_iter()
        .find_map(|(prefix, radix)| Some((value.strip_prefix(prefix)?, radix)));
    if let Some((digits, radix)) = radix_literal {
        if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
            return None;
        }
        return Some(
            digits
                .chars()
                .filter_map(|c| c.to_digit(radix))
                .fold(0.0, |acc, d| acc * f64::from(radix) + f64::from(d)),
        );
    }
    value.parse::<f64>().ok()
}

/// Compare two normalized cells in the given direction.
pub fn compare_cells(a: &str, b: &str, direction: SortDirection) -> Ordering {
    let ordering = match (as_number(a), as_number(b)) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        _ => a.cmp(b),
    };
    match direction {
        SortDirection::Ascending => ordering,
        SortDirection::Descending => ordering.reverse(),
    }
}

/// Stable sort of `rows` by the normalized text `cell` returns for each.
pub fn sort_rows<T>(rows: Vec<T>, cell: impl Fn(&T) -> String, direction: SortDirection) -> Vec<T> {
    let keyed: Vec<(String, T)> = rows
        .into_iter()
        .map(|row| (normalize_cell(&cell(&row)), row))
        .collect();
    merge_sort_by(keyed, &|a: &(String, T), b: &(String, T)| {
        compare_cells(&a.0, &b.0, direction)
    })
    .into_iter()
    .map(|(_, row)| row)
    .collect()
}

// Mixed text/number columns do not form a total order, which `slice::sort_by`
// is allowed to panic on.
fn merge_sort_by<T>(mut items: Vec<T>, cmp: &impl Fn(&T, &T) -> Ordering) -> Vec<T> {
    if items.len() <= 1 {
        return items;
    }
    let right = items.split_off(items.len() / 2);
    let left = merge_sort_by(items, cmp);
    let right = merge_sort_by(right, cmp);

    let mut merged = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();
    loop {
        let take_right = match (left.peek(), right.peek()) {
            (Some(l), Some(r)) => cmp(r, l) == Ordering::Less,
            (Some(_), None) => false,
            (None, Some(_)) => true,
            (None, None) => break,
        };
        if take_right {
            merged.extend(right.next());
        } else {
            merged.extend(left.next());
        }
    }
    merged
}

// =============================================================================
// DOM binding
// =============================================================================

pub(crate) fn elements(list: NodeList) -> Vec<Element> {
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

/// Bind the sort buttons of every table under `root`.
///
/// Already-bound buttons are skipped. Returns the new listeners; dropping
/// one unbinds its button.
pub fn init_sorters(root: &Element) -> Result<Vec<EventListener>, BehaviorError> {
    let mut listeners = Vec::new();

    for body in elements(root.query_selector_all(TABLE_BODY)?) {
        let Some(head) = body
            .closest(TABLE)?
            .and_then(|table| table.query_selector(TABLE_HEAD).ok().flatten())
        else {
            continue;
        };
        let buttons = elements(head.query_selector_all(BUTTON)?);

        for (column, button) in buttons.iter().enumerate() {
            if is_bound(button) {
                continue;
            }
            let body = body.clone();
            let siblings = buttons.clone();
            let clicked = button.clone();
            listeners.push(EventListener::new(button, "click", false, move |event| {
                event.prevent_default();
                sort_table(&body, &siblings, &clicked, column);
            })?);
            mark_bound(button);
        }
    }

    Ok(listeners)
}

fn sort_table(body: &Element, buttons: &[Element], clicked: &Element, column: usize) {
    let direction = SortDirection::after_click(SortDirection::from_element(clicked));
    for button in buttons {
        let _ = button.class_list().remove_2(ASC_CLASS, DESC_CLASS);
    }
    let _ = clicked.class_list().add_1(direction.class());

    let rows = match body.query_selector_all(ROW) {
        Ok(list) => elements(list),
        Err(e) => {
            log::error!(target: "behaviors", "cannot list rows: {:?}", e);
            return;
        }
    };
    let sorted = sort_rows(
        rows,
        |row| {
            row.children()
                .item(column as u32)
                .and_then(|cell| cell.text_content())
                .unwrap_or_default()
        },
        direction,
    );

    body.set_inner_html("");
    for row in sorted {
        if let Err(e) = body.append_child(&row) {
            log::error!(target: "behaviors", "cannot reattach row: {:?}", e);
        }
    }
}
