//! List alignment
//!
//! Parallel per-field value lists (one column per field, one entry per
//! occurrence) rarely have equal lengths. These helpers pad them to a common
//! length and transpose columns into rows. Ragged input is never an error.

/// Right-pad every list to the longest length with `fill`
///
/// Empty lists take part and come back as all-`fill`.
pub fn extend_padding<T: Clone>(mut lists: Vec<Vec<T>>, fill: T) -> Vec<Vec<T>> {
    let width = lists.iter().map(Vec::len).max().unwrap_or(0);
    for list in &mut lists {
        list.resize(width, fill.clone());
    }
    lists
}

/// `extend_padding` with `T::default()` as fill (`""` for strings)
pub fn extend_padding_default<T: Clone + Default>(lists: Vec<Vec<T>>) -> Vec<Vec<T>> {
    extend_padding(lists, T::default())
}

/// Pad, then transpose: row `i` holds the `i`-th entry of every column
pub fn flatten<T: Clone>(columns: Vec<Vec<T>>, fill: T) -> Vec<Vec<T>> {
    let padded = extend_padding(columns, fill);
    let height = padded.first().map_or(0, Vec::len);

    let mut iters: Vec<_> = padded.into_iter().map(Vec::into_iter).collect();
    (0..height)
        .map(|_| iters.iter_mut().filter_map(Iterator::next).collect())
        .collect()
}

/// `flatten` with `T::default()` as fill
pub fn flatten_default<T: Clone + Default>(columns: Vec<Vec<T>>) -> Vec<Vec<T>> {
    flatten(columns, T::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extend_padding_numeric_fill() {
        let lists = vec![vec![1, 2, 3], vec![4, 5], vec![5, 6, 7, 8]];
        assert_eq!(
            extend_padding(lists, 0),
            vec![vec![1, 2, 3, 0], vec![4, 5, 0, 0], vec![5, 6, 7, 8]]
        );
    }

    #[test]
    fn test_extend_padding_string_default() {
        let lists = vec![vec!["a", "b", "c"], vec!["d"]];
        assert_eq!(
            extend_padding_default(lists),
            vec![vec!["a", "b", "c"], vec!["d", "", ""]]
        );
    }

    #[test]
    fn test_flatten_square() {
        let columns = vec![vec![1, 4, 7], vec![2, 5, 8], vec![3, 6, 9]];
        assert_eq!(
            flatten(columns, 0),
            vec![vec![1, 2, 3], vec![4, 5, 6], vec![7, 8, 9]]
        );
    }

    #[test]
    fn test_flatten_ragged() {
        let columns = vec![vec!["1", "4", "7"], vec!["2", "5", "8"], vec!["3", "6"]];
        assert_eq!(
            flatten_default(columns),
            vec![vec!["1", "2", "3"], vec!["4", "5", "6"], vec!["7", "8", ""]]
        );
    }

    #[test]
    fn test_flatten_ragged_multiple() {
        let columns = vec![vec!["1", "4", "7"], vec!["2"], vec!["3", "6"]];
        assert_eq!(
            flatten_default(columns),
            vec![vec!["1", "2", "3"], vec!["4", "", "6"], vec!["7", "", ""]]
        );
    }

    #[test]
    fn test_flatten_optional_fill() {
        let columns = vec![vec![Some(1), Some(4)], vec![Some(2)]];
        assert_eq!(
            flatten_default(columns),
            vec![vec![Some(1), Some(2)], vec![Some(4), None]]
        );
    }

    #[test]
    fn test_zero_length_column_is_filled() {
        let columns = vec![vec!["x".to_string(), "y".to_string()], vec![]];
        assert_eq!(
            flatten_default(columns),
            vec![
                vec!["x".to_string(), String::new()],
                vec!["y".to_string(), String::new()],
            ]
        );
    }

    #[test]
    fn test_empty_inputs() {
        let none: Vec<Vec<i32>> = vec![];
        assert!(extend_padding(none.clone(), 0).is_empty());
        assert!(flatten(none, 0).is_empty());

        let all_empty: Vec<Vec<i32>> = vec![vec![], vec![]];
        assert_eq!(extend_padding(all_empty.clone(), 0), vec![Vec::<i32>::new(), vec![]]);
        assert!(flatten(all_empty, 0).is_empty());
    }
}
