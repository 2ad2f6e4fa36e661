pub mod domain;
pub mod table;

pub use domain::{RenderKind, StepId};
pub use table::{Cell, Record, Table};
