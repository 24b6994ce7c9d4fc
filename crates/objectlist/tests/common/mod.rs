//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use objectlist::{AspectError, AspectValue, Column, Member, ObjectListView, Reflect};

#[derive(Debug, Clone, PartialEq)]
pub struct Employee {
    pub name: String,
    pub age: Option<i64>,
    pub city: Option<String>,
    pub subscribed: bool,
}

impl Reflect for Employee {
    fn member(&self, name: &str) -> Option<Member<'_>> {
        match name {
            "Name" => Some(Member::Value(self.name.clone().into())),
            "Age" => Some(Member::Value(self.age.into())),
            "City" => Some(Member::Value(self.city.clone().into())),
            "Subscribed" => Some(Member::Value(self.subscribed.into())),
            _ => None,
        }
    }

    fn set_member(&mut self, name: &str, value: AspectValue) -> Result<(), AspectError> {
        match (name, value) {
            ("Name", AspectValue::Text(text)) => self.name = text,
            ("Age", AspectValue::Int(age)) => self.age = Some(age),
            ("Age", AspectValue::Null) => self.age = None,
            ("City", AspectValue::Text(text)) => self.city = Some(text),
            ("City", AspectValue::Null) => self.city = None,
            ("Subscribed", AspectValue::Bool(flag)) => self.subscribed = flag,
            (_, other) => {
                return Err(AspectError::type_mismatch(name, "field", other.type_name()));
            }
        }
        Ok(())
    }
}

pub fn employee(name: &str, age: Option<i64>, city: Option<&str>) -> Employee {
    Employee {
        name: name.to_owned(),
        age,
        city: city.map(str::to_owned),
        subscribed: false,
    }
}

/// Five employees spread over three cities.
pub fn employees() -> Vec<Employee> {
    vec![
        employee("Ann", Some(30), Some("Oslo")),
        employee("Bo", Some(52), Some("Lima")),
        employee("Cleo", Some(41), Some("Oslo")),
        employee("Dag", Some(25), Some("Rome")),
        employee("Eve", Some(47), Some("Lima")),
    ]
}

/// Name, Age and City, in that catalog order.
pub fn columns() -> Vec<Column<Employee>> {
    vec![
        Column::new("Name", "Name"),
        Column::new("Age", "Age"),
        Column::new("City", "City"),
    ]
}

pub fn populated_list() -> ObjectListView<Employee> {
    let mut list = ObjectListView::new(columns());
    list.set_objects(employees());
    list
}

/// Primary cell text of every row, top to bottom.
pub fn names(list: &ObjectListView<Employee>) -> Vec<String> {
    list.items()
        .iter()
        .map(|item| item.text(0).unwrap_or_default().to_owned())
        .collect()
}
