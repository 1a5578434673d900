use crate::domain::matches;
use std::collections::BTreeMap;

/// Columns the tool knows how to read or fill in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    SearchContent,
    Level,
    Highest,
    Lowest,
    Average,
    Count,
    Source,
}

/// Canonical header titles, in template order.
pub const CANONICAL_TITLES: [(&str, Field); 7] = [
    ("input card name", Field::SearchContent),
    ("level", Field::Level),
    ("highest", Field::Highest),
    ("lowest", Field::Lowest),
    ("average", Field::Average),
    ("count", Field::Count),
    ("source", Field::Source),
];

/// Result columns appended to a sheet that lacks them.
pub const RESULT_FIELDS: [Field; 5] = [
    Field::Highest,
    Field::Lowest,
    Field::Average,
    Field::Count,
    Field::Source,
];

impl Field {
    pub fn title(self) -> &'static str {
        CANONICAL_TITLES
            .iter()
            .find(|(_, f)| *f == self)
            .map(|(t, _)| *t)
            .unwrap_or_default()
    }
}

/// Recognises a single header cell. When several canonical titles contain the
/// cell text, the longest title wins.
pub fn recognise(cell: &str) -> Option<Field> {
    if cell.trim().is_empty() {
        return None;
    }

    CANONICAL_TITLES
        .iter()
        .filter(|(title, _)| matches(cell, title))
        .max_by_key(|(title, _)| title.len())
        .map(|(_, field)| *field)
}

/// Maps column positions of `header_row` to the fields they hold.
pub fn index_fields<S: AsRef<str>>(header_row: &[S]) -> BTreeMap<usize, Field> {
    header_row
        .iter()
        .enumerate()
        .filter_map(|(i, cell)| recognise(cell.as_ref()).map(|f| (i, f)))
        .collect()
}

/// First column holding `field`, if any.
pub fn column_of(columns: &BTreeMap<usize, Field>, field: Field) -> Option<usize> {
    columns.iter().find(|(_, f)| **f == field).map(|(i, _)| *i)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fuzzy_headers_are_recognised() {
        let columns = index_fields(&["Input Card Name", "LEVEL", "Notes", "High est", "source"]);

        assert_eq!(columns.get(&0), Some(&Field::SearchContent));
        assert_eq!(columns.get(&1), Some(&Field::Level));
        assert_eq!(columns.get(&2), None);
        assert_eq!(columns.get(&3), Some(&Field::Highest));
        assert_eq!(columns.get(&4), Some(&Field::Source));
    }

    #[test]
    fn partial_header_matches_containing_title() {
        // "card name" is contained only in "input card name".
        assert_eq!(recognise("card name"), Some(Field::SearchContent));
        assert_eq!(recognise("avg"), None);
    }

    #[test]
    fn longest_title_wins_on_ties() {
        // "e" occurs in several titles; "input card name" is the longest.
        assert_eq!(recognise("e"), Some(Field::SearchContent));
        // "l" is in "level" and "lowest".
        assert_eq!(recognise("l"), Some(Field::Lowest));
    }

    #[test]
    fn empty_cells_are_ignored() {
        assert!(index_fields(&["", "  "]).is_empty());
    }

    #[test]
    fn titles_round_trip() {
        for (title, field) in CANONICAL_TITLES {
            assert_eq!(field.title(), title);
            assert_eq!(recognise(title), Some(field));
        }
    }
}
