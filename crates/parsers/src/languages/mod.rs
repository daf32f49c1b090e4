/// Language front ends.
///
/// Each front end exposes a `parse_<language>` function that turns source
/// text into an [`ir::SourceUnit`]. Only Java is supported today.
pub mod java;
pub use java::{locate_method, parse_java};
