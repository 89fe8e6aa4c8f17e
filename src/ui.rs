//! Terminal output of the `routes` and `menu` commands.
//!
//! Uses `console` for colors: route names in cyan, transition items that
//! carry an apply link in green, items without one dimmed.

use std::fmt::Write;

use console::Style;

use crate::menu::MenuItem;
use crate::route::RouteCollection;

pub struct Printer {
    name: Style,
    link: Style,
    muted: Style,
}

impl Default for Printer {
    fn default() -> Self {
        Self {
            name: Style::new().cyan(),
            link: Style::new().green(),
            muted: Style::new().dim(),
        }
    }
}

impl Printer {
    /// One line per route: name, then path.
    pub fn routes(&self, routes: &RouteCollection) -> String {
        let width = routes.routes().iter().map(|r| r.name.len()).max().unwrap_or(0);
        let mut out = String::new();
        for route in routes.routes() {
            let padded = format!("{:<width$}", route.name);
            let _ = writeln!(out, "{}  {}", self.name.apply_to(padded), route.path);
        }
        out
    }

    /// The menu as an indented tree, one node per line.
    pub fn menu(&self, menu: &MenuItem) -> String {
        let mut out = String::new();
        self.node(&mut out, menu, 0);
        out
    }

    fn node(&self, out: &mut String, item: &MenuItem, depth: usize) {
        let indent = "  ".repeat(depth);
        let icon = item
            .attribute("icon")
            .and_then(|icon| icon.as_str())
            .map(|icon| format!(" [{icon}]"))
            .unwrap_or_default();
        let _ = match &item.uri {
            Some(uri) => writeln!(out, "{indent}{}{icon} -> {}", item.name, self.link.apply_to(uri)),
            None if depth > 0 && !item.has_children() => {
                writeln!(out, "{indent}{}{icon}", self.muted.apply_to(&item.name))
            }
            None => writeln!(out, "{indent}{}{icon}", item.name),
        };
        for child in &item.children {
            self.node(out, child, depth + 1);
        }
    }
}
