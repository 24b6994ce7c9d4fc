//! Partitioning rows into titled groups.
//!
//! [`build_groups`] is a pure function over model indices: it buckets rows by
//! the grouping column's key, orders the buckets and orders the rows inside
//! each bucket. The list engine decides which columns and directions to use
//! and lays the result out.

use std::cmp::Ordering;
use std::collections::HashMap;

use objectlist_core::logging::targets;

use crate::aspect::Reflect;
use crate::column::Column;
use crate::format::format_template;
use crate::sort::{RowComparator, SortOrder};
use crate::value::{AspectValue, compare_ignore_case};

/// Header template for groups with more than one member.
pub const DEFAULT_GROUP_ITEM_COUNT_FORMAT: &str = "{0} [{1} items]";
/// Header template for groups with exactly one member.
pub const DEFAULT_GROUP_ITEM_COUNT_SINGULAR_FORMAT: &str = "{0} [{1} item]";

/// One group of rows.
#[derive(Debug, Clone, PartialEq)]
pub struct ListGroup {
    /// The group key shared by every member. Null for rows without a key.
    pub key: AspectValue,
    /// Title derived from the key, before any item-count suffix.
    pub title: String,
    /// Displayed header, including the item count when enabled.
    pub header: String,
    /// Member model indices in display order.
    pub rows: Vec<usize>,
}

impl ListGroup {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Item-count header templates. `{0}` is the title, `{1}` the count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemCountFormats<'a> {
    pub plural: &'a str,
    pub singular: &'a str,
}

impl Default for ItemCountFormats<'_> {
    fn default() -> Self {
        Self {
            plural: DEFAULT_GROUP_ITEM_COUNT_FORMAT,
            singular: DEFAULT_GROUP_ITEM_COUNT_SINGULAR_FORMAT,
        }
    }
}

impl<'a> ItemCountFormats<'a> {
    fn header(&self, title: &str, count: usize) -> String {
        let template = if count == 1 { self.singular } else { self.plural };
        format_template(template, &[&title, &count])
    }
}

/// Everything [`build_groups`] needs to know.
#[derive(Debug)]
pub struct GroupingPlan<'a, T> {
    /// Column whose group key buckets the rows.
    pub group_column: &'a Column<T>,
    /// Direction for ordering the groups themselves.
    pub group_order: SortOrder,
    /// Ordering for rows inside each group. A comparator whose order is
    /// [`SortOrder::None`] keeps insertion order.
    pub item_order: RowComparator<'a, T>,
    /// Suffix headers with the member count when set.
    pub item_counts: Option<ItemCountFormats<'a>>,
}

/// Partition `rows` (indices into `objects`) into ordered groups.
///
/// Every row lands in exactly one group, and there is one group per
/// distinct key, with null counting as a key of its own.
pub fn build_groups<T: Reflect>(objects: &[T], rows: &[usize], plan: &GroupingPlan<'_, T>) -> Vec<ListGroup> {
    let column = plan.group_column;

    let mut slots: HashMap<AspectValue, usize> = HashMap::new();
    let mut buckets: Vec<(AspectValue, Vec<usize>)> = Vec::new();
    for &row in rows {
        let Some(model) = objects.get(row) else {
            continue;
        };
        let key = column.get_group_key(model);
        match slots.get(&key) {
            Some(&slot) => buckets[slot].1.push(row),
            None => {
                slots.insert(key.clone(), buckets.len());
                buckets.push((key, vec![row]));
            }
        }
    }

    let mut groups: Vec<ListGroup> = buckets
        .into_iter()
        .map(|(key, rows)| {
            let title = column.get_group_title(&key);
            ListGroup {
                key,
                header: title.clone(),
                title,
                rows,
            }
        })
        .collect();

    groups.sort_by(|a, b| plan.group_order.apply(compare_groups(a, b)));

    for group in &mut groups {
        if let Some(formats) = &plan.item_counts {
            group.header = formats.header(&group.title, group.rows.len());
        }
        plan.item_order.sort_indices(objects, &mut group.rows);
    }

    tracing::debug!(
        target: targets::GROUP,
        column = column.title(),
        groups = groups.len(),
        rows = rows.len(),
        "built groups"
    );
    groups
}

/// Order groups by key, then by title for keys that tie.
fn compare_groups(a: &ListGroup, b: &ListGroup) -> Ordering {
    a.key
        .total_cmp(&b.key)
        .then_with(|| compare_ignore_case(&a.title, &b.title))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aspect::Member;

    #[derive(Debug, Clone, PartialEq)]
    struct Person {
        name: &'static str,
        age: i64,
        city: Option<&'static str>,
    }

    impl Reflect for Person {
        fn member(&self, name: &str) -> Option<Member<'_>> {
            match name {
                "Name" => Some(Member::Value(self.name.into())),
                "Age" => Some(Member::Value(self.age.into())),
                "City" => Some(Member::Value(self.city.into())),
                _ => None,
            }
        }
    }

    fn people() -> Vec<Person> {
        vec![
            Person { name: "Ann", age: 30, city: Some("Paris") },
            Person { name: "Bob", age: 25, city: Some("Berlin") },
            Person { name: "Cid", age: 41, city: Some("Paris") },
            Person { name: "Dee", age: 19, city: None },
            Person { name: "Eve", age: 33, city: Some("Berlin") },
        ]
    }

    fn all_rows(objects: &[Person]) -> Vec<usize> {
        (0..objects.len()).collect()
    }

    #[test]
    fn test_groups_by_key_with_items_sorted() {
        let objects = people();
        let city = Column::<Person>::new("City", "City");
        let age = Column::<Person>::new("Age", "Age");
        let plan = GroupingPlan {
            group_column: &city,
            group_order: SortOrder::Ascending,
            item_order: RowComparator::new(&age, SortOrder::Descending),
            item_counts: None,
        };
        let groups = build_groups(&objects, &all_rows(&objects), &plan);

        let titles: Vec<&str> = groups.iter().map(|g| g.title.as_str()).collect();
        assert_eq!(titles, vec!["", "Berlin", "Paris"]);
        assert_eq!(groups[1].rows, vec![4, 1]);
        assert_eq!(groups[2].rows, vec![2, 0]);
        assert_eq!(groups[0].key, AspectValue::Null);
    }

    #[test]
    fn test_descending_group_order() {
        let objects = people();
        let city = Column::<Person>::new("City", "City");
        let plan = GroupingPlan {
            group_column: &city,
            group_order: SortOrder::Descending,
            item_order: RowComparator::new(&city, SortOrder::None),
            item_counts: None,
        };
        let groups = build_groups(&objects, &all_rows(&objects), &plan);
        let titles: Vec<&str> = groups.iter().map(|g| g.title.as_str()).collect();
        assert_eq!(titles, vec!["Paris", "Berlin", ""]);
    }

    #[test]
    fn test_none_order_keeps_insertion_order() {
        let objects = people();
        let city = Column::<Person>::new("City", "City");
        let age = Column::<Person>::new("Age", "Age");
        let plan = GroupingPlan {
            group_column: &city,
            group_order: SortOrder::Ascending,
            item_order: RowComparator::new(&age, SortOrder::None),
            item_counts: None,
        };
        let rows = vec![4, 3, 2, 1, 0];
        let groups = build_groups(&objects, &rows, &plan);
        let berlin = groups.iter().find(|g| g.title == "Berlin").unwrap();
        assert_eq!(berlin.rows, vec![4, 1]);
        let paris = groups.iter().find(|g| g.title == "Paris").unwrap();
        assert_eq!(paris.rows, vec![2, 0]);
    }

    #[test]
    fn test_item_count_headers() {
        let objects = people();
        let city = Column::<Person>::new("City", "City");
        let plan = GroupingPlan {
            group_column: &city,
            group_order: SortOrder::Ascending,
            item_order: RowComparator::new(&city, SortOrder::Ascending),
            item_counts: Some(ItemCountFormats::default()),
        };
        let groups = build_groups(&objects, &all_rows(&objects), &plan);
        let headers: Vec<&str> = groups.iter().map(|g| g.header.as_str()).collect();
        assert_eq!(headers, vec![" [1 item]", "Berlin [2 items]", "Paris [2 items]"]);
    }

    #[test]
    fn test_mixed_keys_order_by_variant() {
        let objects = people();
        let mixed = Column::<Person>::new("Mixed", "").with_group_key_getter(|p: &Person| {
            if p.age < 30 {
                AspectValue::Int(p.age)
            } else {
                AspectValue::from("zz old")
            }
        });
        let plan = GroupingPlan {
            group_column: &mixed,
            group_order: SortOrder::Ascending,
            item_order: RowComparator::new(&mixed, SortOrder::None),
            item_counts: None,
        };
        let groups = build_groups(&objects, &all_rows(&objects), &plan);
        assert_eq!(groups.len(), 3);
        let titles: Vec<&str> = groups.iter().map(|g| g.title.as_str()).collect();
        assert_eq!(titles, vec!["19", "25", "zz old"]);
    }

    #[test]
    fn test_many_mixed_keys_sort_consistently() {
        let objects: Vec<Person> = (0..80)
            .map(|n: i64| Person {
                name: "P",
                age: (n * 53) % 97,
                city: None,
            })
            .collect();
        let mixed = Column::<Person>::new("Mixed", "").with_group_key_getter(|p: &Person| {
            if p.age % 2 == 0 {
                AspectValue::Int(p.age)
            } else {
                AspectValue::Text(p.age.to_string())
            }
        });
        let age = Column::<Person>::new("Age", "Age");
        for order in [SortOrder::Ascending, SortOrder::Descending] {
            let plan = GroupingPlan {
                group_column: &mixed,
                group_order: order,
                item_order: RowComparator::new(&age, order),
                item_counts: None,
            };
            let groups = build_groups(&objects, &all_rows(&objects), &plan);
            assert_eq!(groups.len(), 80);
            for pair in groups.windows(2) {
                assert_ne!(order.apply(compare_groups(&pair[0], &pair[1])), Ordering::Greater);
            }
        }
    }

    #[test]
    fn test_empty_rows_give_no_groups() {
        let objects = people();
        let city = Column::<Person>::new("City", "City");
        let plan = GroupingPlan {
            group_column: &city,
            group_order: SortOrder::Ascending,
            item_order: RowComparator::new(&city, SortOrder::Ascending),
            item_counts: None,
        };
        assert!(build_groups(&objects, &[], &plan).is_empty());
    }
}
