pub mod tabular;
pub mod markdown;
pub mod json;

pub use tabular::TabularFormatter;
pub use markdown::MarkdownFormatter;
pub use json::JsonFormatter;
