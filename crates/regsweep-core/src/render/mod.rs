//! Rendering of accumulated results

pub mod reg_export;

pub use reg_export::{export_lines, to_reg_text, REG_HEADER};
