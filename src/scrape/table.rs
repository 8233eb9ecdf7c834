use lazy_static::lazy_static;
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;

lazy_static! {
    static ref TABLE: Selector = Selector::parse("table").expect("static selector");
}

/// Why a page block did not contribute rows.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TableSkip {
    #[error("block contains no table")]
    NoTable,
    #[error("table has {columns} column(s), need at least two")]
    TooFewColumns { columns: usize },
    #[error("table has a header but no data rows")]
    NoDataRows,
    #[error("header {header:?} does not name a known category")]
    Unrecognized { header: String },
    #[error("none of {rows} row(s) holds a parsable percentage")]
    NoParsablePercentages { rows: usize },
}

/// Text content of one html table: the header row and the data rows below it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new<S: Into<String>>(header: Vec<S>, rows: Vec<Vec<S>>) -> Self {
        Self {
            header: header.into_iter().map(Into::into).collect(),
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        }
    }

    pub fn columns(&self) -> usize {
        self.rows
            .iter()
            .map(Vec::len)
            .fold(self.header.len(), usize::max)
    }

    /// Reads the rows that belong to `table` itself; rows of nested tables are ignored.
    ///
    /// The header is the first row made only of `th` cells, else the first row.
    /// Rows above the header (captions, titles) are dropped.
    pub fn from_element(table: ElementRef) -> Self {
        let rows: Vec<(bool, Vec<String>)> = own_rows(table)
            .into_iter()
            .map(|row| {
                let cells: Vec<ElementRef> = row
                    .children()
                    .filter_map(ElementRef::wrap)
                    .filter(|cell| matches!(cell.value().name(), "th" | "td"))
                    .collect();
                let all_th = cells.iter().all(|cell| cell.value().name() == "th");
                (all_th, cells.into_iter().map(cell_text).collect::<Vec<String>>())
            })
            .filter(|(_, cells)| !cells.is_empty())
            .collect();

        let header_at = rows.iter().position(|(all_th, _)| *all_th).unwrap_or(0);
        let mut rows = rows.into_iter().skip(header_at).map(|(_, cells)| cells);
        let header = rows.next().unwrap_or_default();
        Self {
            header,
            rows: rows.collect(),
        }
    }
}

/// One entry per block matched by `blocks`, in document order.
pub fn page_tables(page: &Html, blocks: &Selector) -> Vec<Result<RawTable, TableSkip>> {
    page.select(blocks)
        .map(|block| {
            block
                .select(&TABLE)
                .next()
                .map(RawTable::from_element)
                .ok_or(TableSkip::NoTable)
        })
        .collect()
}

fn own_rows(table: ElementRef) -> Vec<ElementRef> {
    let mut rows = Vec::new();
    for child in table.children().filter_map(ElementRef::wrap) {
        match child.value().name() {
            "tr" => rows.push(child),
            "thead" | "tbody" | "tfoot" => rows.extend(
                child
                    .children()
                    .filter_map(ElementRef::wrap)
                    .filter(|row| row.value().name() == "tr"),
            ),
            _ => {}
        }
    }
    rows
}

fn cell_text(cell: ElementRef) -> String {
    cell.text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<&str>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blocks() -> Selector {
        Selector::parse("div.card").unwrap()
    }

    #[test]
    fn reads_header_and_rows() {
        let page = Html::parse_document(
            r#"<div class="card"><table>
                 <thead><tr><th>Sex</th><th>Percentage</th></tr></thead>
                 <tbody>
                   <tr><th scope="row">Men</th><td>13.1%</td></tr>
                   <tr><th scope="row">Women</th><td>
                       10.1%
                   </td></tr>
                 </tbody></table></div>"#,
        );
        let tables = page_tables(&page, &blocks());
        assert_eq!(
            tables,
            vec![Ok(RawTable::new(
                vec!["Sex", "Percentage"],
                vec![vec!["Men", "13.1%"], vec!["Women", "10.1%"]]
            ))]
        );
    }

    #[test]
    fn block_without_table_is_reported() {
        let page = Html::parse_document(
            r#"<div class="card"><p>No data</p></div>
               <div class="card"><table><tr><td>Age Group</td><td>%</td></tr></table></div>"#,
        );
        let tables = page_tables(&page, &blocks());
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0], Err(TableSkip::NoTable));
        let second = tables[1].as_ref().unwrap();
        assert_eq!(second.header, vec!["Age Group", "%"]);
        assert!(second.rows.is_empty());
    }

    #[test]
    fn nested_table_rows_stay_with_inner_table() {
        let page = Html::parse_document(
            r#"<div class="card"><table>
                 <tr><th>Education</th><th>Percentage</th></tr>
                 <tr><td>GED</td><td>32.0%<table><tr><td>x</td><td>y</td></tr></table></td></tr>
               </table></div>"#,
        );
        let tables = page_tables(&page, &blocks());
        let outer = tables[0].as_ref().unwrap();
        assert_eq!(outer.rows.len(), 1);
        assert_eq!(outer.rows[0][0], "GED");
    }

    #[test]
    fn header_is_first_all_th_row_after_a_caption() {
        let page = Html::parse_document(
            r#"<div class="card"><table>
                 <tr><td colspan="2">Table 3. Current smoking</td></tr>
                 <tr><th>Sex</th><th>Percentage</th></tr>
                 <tr><th scope="row">Men</th><td>13.1%</td></tr>
               </table></div>"#,
        );
        let tables = page_tables(&page, &blocks());
        assert_eq!(
            tables,
            vec![Ok(RawTable::new(
                vec!["Sex", "Percentage"],
                vec![vec!["Men", "13.1%"]]
            ))]
        );
    }

    #[test]
    fn first_row_is_header_without_th_cells() {
        let page = Html::parse_document(
            r#"<div class="card"><table>
                 <tr><td>Education</td><td>Percentage</td></tr>
                 <tr><td>GED</td><td>32.0%</td></tr>
               </table></div>"#,
        );
        let tables = page_tables(&page, &blocks());
        let table = tables[0].as_ref().unwrap();
        assert_eq!(table.header, vec!["Education", "Percentage"]);
        assert_eq!(table.rows, vec![vec!["GED", "32.0%"]]);
    }

    #[test]
    fn column_count_spans_header_and_rows() {
        let table = RawTable::new(vec!["Sex"], vec![vec!["Men", "13.1%"]]);
        assert_eq!(table.columns(), 2);
        assert_eq!(RawTable::default().columns(), 0);
    }
}
