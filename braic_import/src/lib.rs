//! Source loader & multi-file import resolver (spec §4.1).

mod resolver;

pub use resolver::{resolve, Resolved};
