//! Amendment and deed merge.
//!
//! Both passes search the whole document set by agreement group, so they run
//! only after every document has been built and priced.

mod amendments;
mod deeds;

pub use amendments::{apply_all_amendments, apply_amendments, find_amendments};
pub use deeds::resolve_deeds;
