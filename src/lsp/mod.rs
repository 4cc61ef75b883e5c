//! LSP protocol feature implementations.
//!
//! Each entry point converts the position to an offset, checks whether the
//! cursor sits inside a `{...}` expression, and only then asks the markup
//! engine:
//! - Hover information for element and attribute names
//! - Completions, augmented with language-block variants
//! - Tag auto-close

pub mod completion;
mod hover;
mod tag_complete;

pub use completion::{augment, completion_at_position, completion_site, CompletionSite};
pub use hover::hover_at_position;
pub use tag_complete::tag_complete_at_position;
