use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! index_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub usize);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

index_newtype!(StepId);

/// Which presenter routine consumes a step's table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderKind {
    Title,
    Quote,
    CircleHierarchy,
    Bar,
    Pie,
    GroupedBar,
    RadialGauge,
    Donut,
    DonutGrid,
    StackedBar,
}

impl RenderKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RenderKind::Title => "title",
            RenderKind::Quote => "quote",
            RenderKind::CircleHierarchy => "circle_hierarchy",
            RenderKind::Bar => "bar",
            RenderKind::Pie => "pie",
            RenderKind::GroupedBar => "grouped_bar",
            RenderKind::RadialGauge => "radial_gauge",
            RenderKind::Donut => "donut",
            RenderKind::DonutGrid => "donut_grid",
            RenderKind::StackedBar => "stacked_bar",
        }
    }

    /// Text kinds draw a single column of the first row instead of a chart.
    pub fn text_column(self) -> Option<&'static str> {
        match self {
            RenderKind::Title => Some("Title"),
            RenderKind::Quote => Some("Quote"),
            _ => None,
        }
    }
}

impl fmt::Display for RenderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
