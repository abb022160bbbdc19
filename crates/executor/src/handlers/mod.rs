//! Command handlers organized by category.
//!
//! | Module | Commands | Backed by |
//! |--------|----------|-----------|
//! | `library` | 7 | LibraryRegistry |
//! | `document` | 6 | IngestPipeline, IndexManager |
//! | `search` | 1 | IndexManager |

pub mod document;
pub mod library;
pub mod search;
