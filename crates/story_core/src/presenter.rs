use shared::{Cell, RenderKind, StepId, Table};

/// Draws steps. Calls are synchronous and side-effect only.
pub trait Presenter: Send + Sync {
    fn render(&self, step: StepId, kind: RenderKind, table: &Table);

    /// Shows exactly `steps` and hides every other step.
    fn show_only(&self, steps: &[StepId]);

    fn set_caption(&self, text: &str);
}

#[derive(Debug, Clone, PartialEq)]
pub struct NameValue {
    pub name: String,
    pub value: f64,
}

/// Flattens a table into name/value pairs for bar and pie style charts.
///
/// A single-row table turns every numeric column into a pair named after the
/// column. A two-column table takes its values from whichever column is
/// numeric in the first row (left column first) and its names from the other.
/// Any other shape, or a two-column table without a numeric column, gives
/// `None`.
pub fn name_value_pairs(table: &Table) -> Option<Vec<NameValue>> {
    let first = table.first()?;

    if table.len() == 1 {
        let pairs = table
            .columns()
            .iter()
            .filter_map(|column| {
                let value = first.get(column)?.as_f64()?;
                Some(NameValue {
                    name: column.clone(),
                    value,
                })
            })
            .collect();
        return Some(pairs);
    }

    let [left, right] = table.columns() else {
        return None;
    };
    let (name_column, value_column) = if first.get(left).is_some_and(Cell::is_numeric) {
        (right, left)
    } else if first.get(right).is_some_and(Cell::is_numeric) {
        (left, right)
    } else {
        tracing::debug!("table has no numeric column to chart");
        return None;
    };

    let pairs = table
        .records()
        .iter()
        .map(|record| NameValue {
            name: record
                .get(name_column)
                .map(|cell| cell.as_text().into_owned())
                .unwrap_or_default(),
            value: record.get(value_column).and_then(Cell::as_f64).unwrap_or(0.0),
        })
        .collect();
    Some(pairs)
}
