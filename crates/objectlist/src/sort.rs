//! Row ordering by column values.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::aspect::Reflect;
use crate::column::Column;
use crate::row::RowItem;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SortOrder {
    /// Ascending order (A-Z, 0-9).
    #[default]
    Ascending,
    /// Descending order (Z-A, 9-0).
    Descending,
    /// Unsorted. Rows keep their insertion order.
    None,
}

impl SortOrder {
    /// The opposite direction. `None` flips to `Ascending`.
    pub fn toggled(self) -> Self {
        match self {
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending | SortOrder::None => SortOrder::Ascending,
        }
    }

    /// Apply this direction to an ascending comparison result.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortOrder::Descending => ordering.reverse(),
            SortOrder::Ascending | SortOrder::None => ordering,
        }
    }
}

/// Compares model objects by one column's values, with an optional
/// tie-breaking secondary column.
///
/// Null values sort after every non-null value in both directions.
/// Other values follow [`AspectValue::total_cmp`](crate::value::AspectValue::total_cmp), so mixed-type columns
/// still sort consistently.
/// With [`SortOrder::None`] every pair compares equal, which leaves a stable
/// sort's input untouched.
pub struct RowComparator<'a, T> {
    column: &'a Column<T>,
    order: SortOrder,
    secondary: Option<(&'a Column<T>, SortOrder)>,
}

impl<'a, T> Clone for RowComparator<'a, T> {
    fn clone(&self) -> Self {
        Self {
            column: self.column,
            order: self.order,
            secondary: self.secondary,
        }
    }
}

impl<'a, T> std::fmt::Debug for RowComparator<'a, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RowComparator")
            .field("column", &self.column.title())
            .field("order", &self.order)
            .field("secondary", &self.secondary.map(|(c, o)| (c.title(), o)))
            .finish()
    }
}

impl<'a, T: Reflect> RowComparator<'a, T> {
    pub fn new(column: &'a Column<T>, order: SortOrder) -> Self {
        Self {
            column,
            order,
            secondary: None,
        }
    }

    /// Break ties with `column`. Ignored when it is the primary column.
    pub fn with_secondary(mut self, column: &'a Column<T>, order: SortOrder) -> Self {
        self.secondary = if std::ptr::eq(column, self.column) {
            None
        } else {
            Some((column, order))
        };
        self
    }

    /// The column compared first.
    pub fn column(&self) -> &'a Column<T> {
        self.column
    }

    pub fn order(&self) -> SortOrder {
        self.order
    }

    pub fn has_secondary(&self) -> bool {
        self.secondary.is_some()
    }

    /// Compare two model objects.
    pub fn compare(&self, a: &T, b: &T) -> Ordering {
        if self.order == SortOrder::None {
            return Ordering::Equal;
        }
        let result = compare_by(self.column, self.order, a, b);
        match (result, self.secondary) {
            (Ordering::Equal, Some((column, order))) => compare_by(column, order, a, b),
            _ => result,
        }
    }

    /// Compare two rows by the model objects they show.
    pub fn compare_items(&self, objects: &[T], a: &RowItem, b: &RowItem) -> Ordering {
        match (objects.get(a.model_index()), objects.get(b.model_index())) {
            (Some(x), Some(y)) => self.compare(x, y),
            _ => Ordering::Equal,
        }
    }

    /// Stable-sort model indices. Does nothing for [`SortOrder::None`].
    pub fn sort_indices(&self, objects: &[T], indices: &mut [usize]) {
        if self.order == SortOrder::None {
            return;
        }
        indices.sort_by(|&a, &b| match (objects.get(a), objects.get(b)) {
            (Some(x), Some(y)) => self.compare(x, y),
            _ => Ordering::Equal,
        });
    }
}

fn compare_by<T: Reflect>(column: &Column<T>, order: SortOrder, a: &T, b: &T) -> Ordering {
    if order == SortOrder::None {
        return Ordering::Equal;
    }
    let x = column.get_value(a);
    let y = column.get_value(b);
    match (x.is_null(), y.is_null()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => order.apply(x.total_cmp(&y)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aspect::Member;
    use crate::value::AspectValue;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        name: &'static str,
        size: Option<i64>,
    }

    impl Reflect for Item {
        fn member(&self, name: &str) -> Option<Member<'_>> {
            match name {
                "Name" => Some(Member::Value(self.name.into())),
                "Size" => Some(Member::Value(self.size.into())),
                _ => None,
            }
        }
    }

    fn item(name: &'static str, size: Option<i64>) -> Item {
        Item { name, size }
    }

    #[test]
    fn test_ascending_and_descending() {
        let size = Column::<Item>::new("Size", "Size");
        let a = item("a", Some(1));
        let b = item("b", Some(2));
        let asc = RowComparator::new(&size, SortOrder::Ascending);
        let desc = RowComparator::new(&size, SortOrder::Descending);
        assert_eq!(asc.compare(&a, &b), Ordering::Less);
        assert_eq!(desc.compare(&a, &b), Ordering::Greater);
        assert_eq!(asc.compare(&a, &a), Ordering::Equal);
    }

    #[test]
    fn test_nulls_last_in_both_directions() {
        let size = Column::<Item>::new("Size", "Size");
        let null = item("n", None);
        let some = item("s", Some(5));
        for order in [SortOrder::Ascending, SortOrder::Descending] {
            let cmp = RowComparator::new(&size, order);
            assert_eq!(cmp.compare(&null, &some), Ordering::Greater);
            assert_eq!(cmp.compare(&some, &null), Ordering::Less);
            assert_eq!(cmp.compare(&null, &null), Ordering::Equal);
        }
    }

    #[test]
    fn test_none_order_is_always_equal() {
        let size = Column::<Item>::new("Size", "Size");
        let name = Column::<Item>::new("Name", "Name");
        let cmp =
            RowComparator::new(&size, SortOrder::None).with_secondary(&name, SortOrder::Ascending);
        assert_eq!(
            cmp.compare(&item("a", Some(1)), &item("b", None)),
            Ordering::Equal
        );
    }

    #[test]
    fn test_secondary_breaks_ties_only() {
        let size = Column::<Item>::new("Size", "Size");
        let name = Column::<Item>::new("Name", "Name");
        let cmp = RowComparator::new(&size, SortOrder::Ascending)
            .with_secondary(&name, SortOrder::Descending);
        assert_eq!(
            cmp.compare(&item("a", Some(1)), &item("b", Some(1))),
            Ordering::Greater
        );
        assert_eq!(
            cmp.compare(&item("a", Some(1)), &item("b", Some(2))),
            Ordering::Less
        );
    }

    #[test]
    fn test_secondary_on_same_column_is_ignored() {
        let size = Column::<Item>::new("Size", "Size");
        let cmp = RowComparator::new(&size, SortOrder::Ascending)
            .with_secondary(&size, SortOrder::Descending);
        assert!(!cmp.has_secondary());
    }

    #[test]
    fn test_text_is_case_insensitive() {
        let name = Column::<Item>::new("Name", "Name");
        let cmp = RowComparator::new(&name, SortOrder::Ascending);
        assert_eq!(cmp.compare(&item("apple", None), &item("Banana", None)), Ordering::Less);
        assert_eq!(cmp.compare(&item("ABC", None), &item("abc", None)), Ordering::Equal);
    }

    #[test]
    fn test_mixed_variants_order_by_variant() {
        let mixed = Column::<Item>::new("Mixed", "").with_getter(|i: &Item| match i.size {
            Some(n) => AspectValue::Int(n),
            None => AspectValue::from(i.name),
        });
        let asc = RowComparator::new(&mixed, SortOrder::Ascending);
        let desc = RowComparator::new(&mixed, SortOrder::Descending);
        assert_eq!(asc.compare(&item("y", Some(1)), &item("x", None)), Ordering::Less);
        assert_eq!(desc.compare(&item("y", Some(1)), &item("x", None)), Ordering::Greater);
    }

    #[test]
    fn test_mixed_column_sorts_without_panicking() {
        let mixed = Column::<Item>::new("Mixed", "").with_getter(|i: &Item| match i.size {
            Some(n) if n % 3 != 0 => AspectValue::Int(n),
            Some(n) if n % 5 == 0 => AspectValue::Float(n as f64 + 0.5),
            _ => AspectValue::from(i.name),
        });
        const NAMES: [&str; 7] = ["kiwi", "Fig", "apple", "date", "Elder", "cherry", "banana"];
        let objects: Vec<Item> = (0..120)
            .map(|n: i64| {
                // Scatter values so the input is far from sorted.
                let size = (n * 37) % 101;
                item(NAMES[(n % 7) as usize], if n % 11 == 0 { None } else { Some(size) })
            })
            .collect();
        for order in [SortOrder::Ascending, SortOrder::Descending] {
            let cmp = RowComparator::new(&mixed, order);
            let mut indices: Vec<usize> = (0..objects.len()).collect();
            cmp.sort_indices(&objects, &mut indices);
            for pair in indices.windows(2) {
                assert_ne!(cmp.compare(&objects[pair[0]], &objects[pair[1]]), Ordering::Greater);
            }
        }
    }

    #[test]
    fn test_sort_indices_is_stable() {
        let size = Column::<Item>::new("Size", "Size");
        let objects = vec![
            item("a", Some(2)),
            item("b", Some(1)),
            item("c", Some(2)),
            item("d", None),
            item("e", Some(1)),
        ];
        let mut indices: Vec<usize> = (0..objects.len()).collect();
        RowComparator::new(&size, SortOrder::Descending).sort_indices(&objects, &mut indices);
        assert_eq!(indices, vec![0, 2, 1, 4, 3]);

        let mut untouched = vec![4, 3, 2, 1, 0];
        RowComparator::new(&size, SortOrder::None).sort_indices(&objects, &mut untouched);
        assert_eq!(untouched, vec![4, 3, 2, 1, 0]);
    }
}
