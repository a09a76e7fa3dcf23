// Widget module organization

// Charts
pub mod bar_chart;
pub mod graph;

// Data editing
pub mod data_table;
pub mod editor;
pub mod raw_editor;

// Re-export commonly used components
pub use bar_chart::BarChart;
pub use data_table::DataTable;
pub use editor::Editor;
pub use graph::Graph;
pub use raw_editor::RawEditor;
