//! HTML table extraction
//!
//! The UNECE pages are loosely structured: layout tables wrap data tables,
//! header rows sometimes use `<th>` and sometimes linked `<td>` cells. This
//! module finds the one table matching a small declarative predicate and
//! returns its rows as cleaned cell text, so fetchers never walk the DOM
//! themselves.

use scraper::{ElementRef, Html, Selector};

/// Structural hint used to pick the target table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableMatcher<'a> {
    /// The table has a `<th>` whose text contains the needle
    HeaderContains(&'a str),

    /// The table has a `<td>` with a link whose text contains the needle
    LinkedCellContains(&'a str),
}

impl TableMatcher<'_> {
    fn matches(&self, table: &ElementRef<'_>) -> bool {
        match self {
            TableMatcher::HeaderContains(needle) => select_all(table, "th")
                .iter()
                .any(|th| th.text().collect::<String>().contains(needle)),
            TableMatcher::LinkedCellContains(needle) => select_all(table, "td a")
                .iter()
                .any(|a| a.text().collect::<String>().contains(needle)),
        }
    }
}

/// A single `<td>` cell
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableCell {
    /// Cell text with entities decoded and whitespace collapsed
    pub text: String,

    /// Raw `href` values of the links inside the cell, in document order
    pub links: Vec<String>,
}

/// The data cells of one `<tr>`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableRow {
    pub cells: Vec<TableCell>,
}

impl TableRow {
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cell(&self, index: usize) -> Option<&TableCell> {
        self.cells.get(index)
    }

    /// Text of the cell at `index`, or `""` when the row is shorter
    pub fn text(&self, index: usize) -> &str {
        self.cells.get(index).map(|c| c.text.as_str()).unwrap_or("")
    }
}

/// Rows of the selected table, in document order
///
/// An empty table means nothing matched; callers treat that as zero records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub rows: Vec<TableRow>,
}

impl Table {
    /// Rows with at least `min_cells` data cells
    pub fn rows_with_min_cells(&self, min_cells: usize) -> impl Iterator<Item = &TableRow> {
        with_min_cells(self.rows.iter(), min_cells)
    }

    /// Like [`Table::rows_with_min_cells`], but skips the first row, which
    /// holds the column titles even when they are written as `<td>`
    pub fn body_rows_with_min_cells(&self, min_cells: usize) -> impl Iterator<Item = &TableRow> {
        with_min_cells(self.rows.iter().skip(1), min_cells)
    }
}

fn with_min_cells<'a>(
    rows: impl Iterator<Item = &'a TableRow>,
    min_cells: usize,
) -> impl Iterator<Item = &'a TableRow> {
    rows.filter(move |row| row.len() >= min_cells)
}

/// Collapses every whitespace run (including non-breaking spaces) into one
/// ASCII space and trims the ends
pub fn clean_text(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Parses `html` and extracts the table matching any of `matchers`
///
/// When several tables match (for instance a layout table wrapping the data
/// table), the innermost matching table wins; ties go to document order.
///
/// # Example
///
/// ```
/// use unlocode_crawler::html::{extract_table, TableMatcher};
///
/// let html = r#"<table><tr><th>Code</th><th>Name</th></tr>
///               <tr><td>SG</td><td>Singapore&nbsp;</td></tr></table>"#;
/// let table = extract_table(html, &[TableMatcher::HeaderContains("Name")]);
/// assert_eq!(table.rows[1].text(1), "Singapore");
/// ```
pub fn extract_table(html: &str, matchers: &[TableMatcher<'_>]) -> Table {
    let document = Html::parse_document(html);
    select_table(&document, matchers)
        .map(|table| read_rows(&table))
        .unwrap_or_default()
}

fn select_table<'a>(document: &'a Html, matchers: &[TableMatcher<'_>]) -> Option<ElementRef<'a>> {
    let selector = Selector::parse("table").ok()?;

    let candidates: Vec<ElementRef<'a>> = document
        .select(&selector)
        .filter(|table| matchers.iter().any(|m| m.matches(table)))
        .collect();

    candidates
        .iter()
        .find(|table| {
            !candidates
                .iter()
                .any(|other| other.id() != table.id() && is_descendant_of(other, table))
        })
        .copied()
}

fn is_descendant_of(node: &ElementRef<'_>, ancestor: &ElementRef<'_>) -> bool {
    node.ancestors().any(|a| a.id() == ancestor.id())
}

/// Nearest enclosing `<table>` of an element
fn owning_table<'a>(element: &ElementRef<'a>) -> Option<ElementRef<'a>> {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|e| e.value().name() == "table")
}

fn read_rows(table: &ElementRef<'_>) -> Table {
    let rows = select_all(table, "tr")
        .into_iter()
        .filter(|tr| owning_table(tr).map(|t| t.id()) == Some(table.id()))
        .map(|tr| TableRow {
            cells: tr
                .children()
                .filter_map(ElementRef::wrap)
                .filter(|e| e.value().name() == "td")
                .map(|td| read_cell(&td))
                .collect(),
        })
        .collect();

    Table { rows }
}

fn read_cell(td: &ElementRef<'_>) -> TableCell {
    let links = select_all(td, "a[href]")
        .iter()
        .filter_map(|a| a.value().attr("href"))
        .map(str::trim)
        .filter(|href| !href.is_empty())
        .map(str::to_string)
        .collect();

    TableCell {
        text: clean_text(&td.text().collect::<String>()),
        links,
    }
}

fn select_all<'a>(element: &ElementRef<'a>, css: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(css) {
        Ok(selector) => element.select(&selector).collect(),
        Err(_) => Vec::new(),
    }
}
