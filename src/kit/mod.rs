// Data visualization widgets and the demo application built on them

pub mod components;
pub mod pages;
pub mod theme;
pub mod utils;

/// Re-export of the widgets and pages for convenience
pub mod prelude {
    pub use crate::kit::components::{BarChart, DataTable, Editor, Graph, RawEditor};
    pub use crate::kit::pages::{App, AppContext, Home, NotFound};
    pub use crate::kit::theme::{HOST_VARIABLES, PALETTE};
}
