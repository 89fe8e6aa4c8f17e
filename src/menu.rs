use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

/// A node of an admin menu (tab menu, dropdown, dropdown entry).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MenuItem {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, Value>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub extras: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<MenuItem>,
}

impl MenuItem {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            uri: None,
            attributes: BTreeMap::new(),
            extras: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extras.insert(key.into(), value.into());
        self
    }

    /// Appends `child`, replacing an existing child of the same name in place.
    pub fn add_child(&mut self, child: MenuItem) -> &mut MenuItem {
        let index = match self.children.iter().position(|c| c.name == child.name) {
            Some(index) => {
                self.children[index] = child;
                index
            }
            None => {
                self.children.push(child);
                self.children.len() - 1
            }
        };
        &mut self.children[index]
    }

    pub fn child(&self, name: &str) -> Option<&MenuItem> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    pub fn extra(&self, key: &str) -> Option<&str> {
        self.extras.get(key).map(String::as_str)
    }
}
