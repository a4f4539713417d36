//! Core types shared by the catalog builder and the search engines.

mod descriptor;
mod entry;
mod source;

pub use descriptor::{RawToolDescriptor, make_tool_id, parse_tool_id};
pub use entry::ToolEntry;
pub use source::{Priority, ToolSource};
