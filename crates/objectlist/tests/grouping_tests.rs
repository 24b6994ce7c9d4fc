//! Tests for grouped layouts.

mod common;

use common::{Employee, columns, employee, employees, names, populated_list};
use objectlist::{AspectValue, Column, ListOptions, ObjectListView, SortOrder, ViewMode};

fn grouped_by_city() -> ListOptions {
    ListOptions {
        show_groups: true,
        always_group_by_column: Some(2),
        always_group_by_sort_order: SortOrder::Ascending,
        sort_group_items_by_primary_column: false,
        ..Default::default()
    }
}

fn ages(list: &ObjectListView<Employee>, rows: &[usize]) -> Vec<i64> {
    rows.iter()
        .filter_map(|&model_index| list.objects()[model_index].age)
        .collect()
}

#[test]
fn test_group_by_city_sort_by_age_descending() {
    let mut list = ObjectListView::with_options(columns(), grouped_by_city());
    list.set_objects(employees());
    list.sort(1, SortOrder::Descending);

    let titles: Vec<&str> = list.groups().iter().map(|g| g.title.as_str()).collect();
    assert_eq!(titles, ["Lima", "Oslo", "Rome"]);

    for group in list.groups() {
        let ages = ages(&list, &group.rows);
        assert!(ages.windows(2).all(|pair| pair[0] >= pair[1]), "{ages:?}");
    }

    assert_eq!(names(&list), ["Bo", "Eve", "Cleo", "Ann", "Dag"]);
    let total: usize = list.groups().iter().map(|g| g.len()).sum();
    assert_eq!(total, list.row_count());
}

#[test]
fn test_default_sorting_orders_groups_before_any_sort() {
    let mut list = ObjectListView::with_options(
        columns(),
        ListOptions {
            show_groups: true,
            always_group_by_column: Some(2),
            sorting: SortOrder::Descending,
            ..Default::default()
        },
    );
    list.set_objects(employees());

    assert_eq!(list.last_sort_order(), SortOrder::None);
    let titles: Vec<&str> = list.groups().iter().map(|g| g.title.as_str()).collect();
    assert_eq!(titles, ["Rome", "Oslo", "Lima"]);
    assert_eq!(names(&list), ["Dag", "Cleo", "Ann", "Eve", "Bo"]);
}

#[test]
fn test_groups_follow_sort_column_by_default() {
    let mut list = ObjectListView::with_options(
        columns(),
        ListOptions {
            show_groups: true,
            ..Default::default()
        },
    );
    list.set_objects(employees());
    list.sort(2, SortOrder::Descending);

    let titles: Vec<&str> = list.groups().iter().map(|g| g.title.as_str()).collect();
    assert_eq!(titles, ["Rome", "Oslo", "Lima"]);
    // Items sort by the primary column, in the sort direction.
    assert_eq!(names(&list), ["Dag", "Cleo", "Ann", "Eve", "Bo"]);
}

#[test]
fn test_group_headers_show_item_counts() {
    let options = ListOptions {
        show_item_count_on_groups: true,
        ..grouped_by_city()
    };
    let mut list = ObjectListView::with_options(columns(), options);
    list.set_objects(employees());
    list.sort(0, SortOrder::Ascending);

    let headers: Vec<&str> = list.groups().iter().map(|g| g.header.as_str()).collect();
    assert_eq!(headers, ["Lima [2 items]", "Oslo [2 items]", "Rome [1 item]"]);
}

#[test]
fn test_column_item_count_format_overrides_list_format() {
    let mut catalog = columns();
    catalog[2] = Column::new("City", "City").with_group_item_count_formats("{0}: {1}", "{0}: one");
    let options = ListOptions {
        show_item_count_on_groups: true,
        ..grouped_by_city()
    };
    let mut list = ObjectListView::with_options(catalog, options);
    list.set_objects(employees());
    list.sort(0, SortOrder::Ascending);

    let headers: Vec<&str> = list.groups().iter().map(|g| g.header.as_str()).collect();
    assert_eq!(headers, ["Lima: 2", "Oslo: 2", "Rome: one"]);
}

#[test]
fn test_null_key_forms_its_own_group() {
    let mut list = ObjectListView::with_options(columns(), grouped_by_city());
    let mut people = employees();
    people.push(employee("Nil", Some(60), None));
    people.push(employee("Zero", Some(20), None));
    list.set_objects(people);
    list.sort(1, SortOrder::Ascending);

    assert_eq!(list.groups().len(), 4);
    let first = &list.groups()[0];
    assert_eq!(first.key, AspectValue::Null);
    assert_eq!(first.title, "");
    assert_eq!(first.len(), 2);
}

#[test]
fn test_unsorted_groups_keep_insertion_order() {
    let mut list = ObjectListView::with_options(
        columns(),
        ListOptions {
            show_groups: true,
            ..Default::default()
        },
    );
    list.set_objects(employees());
    list.build_groups(Some(2), SortOrder::None);

    let oslo = list
        .groups()
        .iter()
        .find(|g| g.title == "Oslo")
        .map(|g| g.rows.clone());
    assert_eq!(oslo, Some(vec![0, 2]));
    assert_eq!(list.last_sort_column(), None);
}

#[test]
fn test_groupies_bucket_ages() {
    let mut catalog = columns();
    catalog[1]
        .make_groupies(vec![30, 50], vec!["Young", "Middle", "Senior"])
        .unwrap();
    let mut list = ObjectListView::with_options(
        catalog,
        ListOptions {
            show_groups: true,
            ..Default::default()
        },
    );
    list.set_objects(employees());
    list.sort(1, SortOrder::Ascending);

    let titles: Vec<&str> = list.groups().iter().map(|g| g.title.as_str()).collect();
    assert_eq!(titles, ["Young", "Middle", "Senior"]);
    assert_eq!(list.groups()[0].len(), 1);
    assert_eq!(list.groups()[1].len(), 3);
}

#[test]
fn test_list_view_never_groups() {
    let mut list = populated_list();
    list.set_show_groups(true);
    list.sort(2, SortOrder::Ascending);
    assert_eq!(list.groups().len(), 3);

    list.set_view(ViewMode::List);
    assert!(!list.showing_groups());
    assert!(list.groups().is_empty());
}
