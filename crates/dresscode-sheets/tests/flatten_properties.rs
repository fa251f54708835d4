//! Property tests for row flattening
//!
//! Rows are generated from arbitrary JSON trees, including trees that reuse
//! the real section names with the wrong shapes underneath.

use dresscode_sheets::schema::COLUMNS;
use dresscode_sheets::{flatten, AnalysisResult};
use proptest::prelude::*;
use serde_json::{Map, Value};

const SECTION_KEYS: &[&str] = &[
    "general",
    "uniform",
    "clothing_items",
    "appearance",
    "belongings",
    "school_life_outside",
    "hair",
    "status",
    "evidence",
    "items",
];

fn leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        "[a-zあ-ん ]{0,8}".prop_map(Value::String),
    ]
}

fn key() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::sample::select(SECTION_KEYS).prop_map(str::to_string),
        "_?[a-z]{1,6}",
    ]
}

fn tree() -> impl Strategy<Value = Value> {
    leaf().prop_recursive(4, 64, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map(key(), inner, 0..6)
                .prop_map(|m| Value::Object(m.into_iter().collect::<Map<_, _>>())),
        ]
    })
}

proptest! {
    /// Property: row and header always have the same length
    #[test]
    fn test_row_matches_header_length(value in tree()) {
        let row = flatten::flatten_tree(&value);
        prop_assert_eq!(row.len(), flatten::header().len());
    }

    /// Property: results built from any mapping flatten without panicking
    #[test]
    fn test_results_flatten_totally(map in prop::collection::btree_map(key(), tree(), 0..6)) {
        let result = AnalysisResult::from_map(map.into_iter().collect());
        prop_assert!(result.body().keys().all(|k| !k.starts_with('_')));
        prop_assert_eq!(flatten::to_row(&result).len(), COLUMNS.len());
    }

    /// Property: removing a column's leaf empties exactly that cell
    #[test]
    fn test_missing_path_is_empty_cell(index in 0..COLUMNS.len(), text in "[a-z]{1,8}") {
        let column = &COLUMNS[index];
        let segments: Vec<&str> = column.segments().collect();

        let mut filled = Value::String(text.clone());
        for segment in segments.iter().rev() {
            let mut map = Map::new();
            map.insert(segment.to_string(), filled);
            filled = Value::Object(map);
        }

        let row = flatten::flatten_tree(&filled);
        prop_assert_eq!(&row[index], &text);
        prop_assert!(row.iter().enumerate().all(|(i, cell)| i == index || cell.is_empty()));

        let mut pruned = filled.clone();
        let mut cursor = &mut pruned;
        for segment in &segments[..segments.len() - 1] {
            cursor = cursor.get_mut(*segment).unwrap();
        }
        if let Some(map) = cursor.as_object_mut() {
            map.remove(*segments.last().unwrap());
        }

        let row = flatten::flatten_tree(&pruned);
        prop_assert_eq!(row.len(), COLUMNS.len());
        prop_assert!(row.iter().all(String::is_empty));
    }
}

#[test]
fn test_empty_object_gives_all_empty_cells() {
    let result = AnalysisResult::from_value(Value::Object(Map::new())).unwrap();
    let row = flatten::to_row(&result);

    assert_eq!(row.len(), flatten::header().len());
    assert!(row.iter().all(String::is_empty));
}
