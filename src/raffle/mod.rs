pub mod message;
pub mod models;
pub mod parser;
pub mod record;
pub mod selector;
pub mod stats;
pub mod view;

pub use message::render;
pub use models::*;
pub use parser::parse;
pub use record::{RecordMeta, build};
pub use selector::select;
pub use stats::{aggregate, build_export_rows, to_csv};
pub use view::filter;
