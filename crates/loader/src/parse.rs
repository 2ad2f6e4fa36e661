use csv::{ReaderBuilder, Trim};
use shared::{Cell, Record, Table};

use crate::error::ParseError;

/// Parses CSV text into a [`Table`], coercing numeric cells once.
///
/// The first row is the header. Rows shorter than the header get
/// [`Cell::Empty`] for the missing trailing columns; extra cells are dropped.
pub fn parse_table(text: &str) -> Result<Table, ParseError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::Headers)
        .from_reader(text.as_bytes());

    let columns: Vec<String> = reader
        .headers()?
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            if idx == 0 {
                name.trim_start_matches('\u{feff}').to_string()
            } else {
                name.to_string()
            }
        })
        .collect();
    if columns.is_empty() || columns.iter().all(String::is_empty) {
        return Err(ParseError::MissingHeader);
    }

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let fields = columns
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                let cell = row.get(idx).map_or(Cell::Empty, Cell::coerce);
                (name.clone(), cell)
            })
            .collect();
        records.push(Record::new(fields));
    }

    Ok(Table::new(columns, records))
}
