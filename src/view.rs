//! Renders query results as script-friendly text.

use itertools::Itertools;
use serde_json::Value;

/// Marks an item that can be converted into a line of output.
pub trait Viewable {
    /// Converts the item into a string for printing, without a trailing
    /// newline.
    fn view(&self) -> String;
}

/// One line of output: cells that are printed separated by tabs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Row {
    cells: Vec<String>,
}

impl Row {
    /// Creates a row from the given cells.
    pub fn new<I, S>(cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let cells = cells.into_iter().map(Into::into).collect();
        Self { cells }
    }

    /// The cells of the row.
    pub fn cells(&self) -> &[String] {
        &self.cells
    }
}

impl Viewable for Row {
    /// Joins the cells with tabs.
    ///
    /// # Examples
    ///
    /// ```
    /// use slak::view::{Row, Viewable};
    /// let row = Row::new(["29", "react-1"]);
    /// assert_eq!(row.view(), "29\treact-1");
    /// ```
    fn view(&self) -> String {
        self.cells.iter().join("\t")
    }
}

/// How a raw API response is printed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum JsonStyle {
    /// Indented over several lines, for people.
    #[default]
    Pretty,

    /// On a single line, for JSON Lines output.
    Compact,
}

/// A raw API response, printed as JSON.
#[derive(Debug)]
pub struct Json<'a> {
    value: &'a Value,
    style: JsonStyle,
}

impl<'a> Json<'a> {
    /// Wraps `value` for printing in the given `style`.
    pub fn new(value: &'a Value, style: JsonStyle) -> Self {
        Self { value, style }
    }
}

impl Viewable for Json<'_> {
    fn view(&self) -> String {
        match self.style {
            JsonStyle::Pretty => format!("{:#}", self.value),
            JsonStyle::Compact => self.value.to_string(),
        }
    }
}
