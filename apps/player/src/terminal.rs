//! Text presenter: prints steps to a terminal instead of drawing charts.

use std::{
    io::{self, Write},
    sync::{Mutex, PoisonError},
};

use shared::{RenderKind, StepId, Table};
use story_core::{name_value_pairs, Presenter};
use tracing::warn;

const BAR_WIDTH: f64 = 30.0;

pub struct TerminalPresenter {
    out: Mutex<Box<dyn Write + Send>>,
}

impl TerminalPresenter {
    pub fn new(out: Box<dyn Write + Send>) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn stdout() -> Self {
        Self::new(Box::new(io::stdout()))
    }

    fn emit(&self, text: &str) {
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(err) = writeln!(out, "{text}").and_then(|()| out.flush()) {
            warn!(error = %err, "failed to write to terminal");
        }
    }
}

impl Presenter for TerminalPresenter {
    fn render(&self, _step: StepId, kind: RenderKind, table: &Table) {
        self.emit(&render_text(kind, table));
    }

    fn show_only(&self, steps: &[StepId]) {
        let labels: Vec<String> = steps.iter().map(StepId::to_string).collect();
        self.emit(&format!("--- step {} ---", labels.join(", ")));
    }

    fn set_caption(&self, text: &str) {
        self.emit(&format!("[{text}]"));
    }
}

/// Text for one step. Titles and quotes print their first row; bar and pie
/// charts print a name/value listing; other charts print their shape.
pub fn render_text(kind: RenderKind, table: &Table) -> String {
    if let Some(column) = kind.text_column() {
        let text = table
            .first()
            .and_then(|row| row.get(column))
            .map(|cell| cell.as_text().into_owned());
        return match (kind, text) {
            (RenderKind::Title, Some(text)) => format!("== {text} =="),
            (_, Some(text)) => format!("\"{text}\""),
            (_, None) => format!("(no {column} column)"),
        };
    }

    match kind {
        RenderKind::Bar | RenderKind::Pie => match name_value_pairs(table) {
            Some(pairs) if !pairs.is_empty() => {
                let width = pairs.iter().map(|p| p.name.len()).max().unwrap_or(0);
                let max = pairs.iter().map(|p| p.value).fold(0.0_f64, f64::max);
                pairs
                    .iter()
                    .map(|pair| {
                        let bar = if max > 0.0 {
                            "#".repeat((pair.value.max(0.0) / max * BAR_WIDTH).round() as usize)
                        } else {
                            String::new()
                        };
                        let line = format!("{:<width$}  {:>10}  {bar}", pair.name, pair.value);
                        line.trim_end().to_string()
                    })
                    .collect::<Vec<_>>()
                    .join("\n")
            }
            _ => "(nothing to draw)".to_string(),
        },
        other => format!(
            "<{other}: {} rows x {} columns>",
            table.len(),
            table.columns().len()
        ),
    }
}

#[cfg(test)]
#[path = "tests/terminal_tests.rs"]
mod tests;
