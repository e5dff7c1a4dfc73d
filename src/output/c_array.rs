// C array initializer formatting
//
// The braces form is what gets pasted into the firmware sources; the full
// definition is printed next to it for reference.

use std::fmt::Display;

use crate::config::params::c_array::DEFAULT_ITEMS_PER_LINE;

/// Element type, variable name and line wrapping of the emitted array
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CArrayFormat {
    pub data_type: String,
    pub name: String,
    pub items_per_line: usize,
}

impl CArrayFormat {
    pub fn new(data_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            data_type: data_type.into(),
            name: name.into(),
            items_per_line: DEFAULT_ITEMS_PER_LINE,
        }
    }

    pub fn with_items_per_line(mut self, items_per_line: usize) -> Self {
        self.items_per_line = items_per_line.max(1);
        self
    }

    /// `{    a, b,\n    c}`: four-space indented lines of `items_per_line` elements.
    pub fn braces<T: Display>(&self, data: &[T]) -> String {
        let lines: Vec<String> = data
            .chunks(self.items_per_line.max(1))
            .map(|chunk| {
                let items: Vec<String> = chunk.iter().map(|item| item.to_string()).collect();
                format!("    {}", items.join(", "))
            })
            .collect();
        format!("{{{}}}", lines.join(",\n"))
    }

    /// `type name[len] = {...};`
    pub fn definition<T: Display>(&self, data: &[T]) -> String {
        format!(
            "{} {}[{}] = {};",
            self.data_type,
            self.name,
            data.len(),
            self.braces(data)
        )
    }
}
