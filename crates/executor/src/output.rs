//! Output enum for command execution results.
//!
//! Every command produces exactly one output variant; the mapping is
//! documented on each [`Command`](crate::Command) variant.

use serde::{Deserialize, Serialize};

use crate::types::*;

/// Successful command execution results.
///
/// # Example
///
/// ```text
/// use ragsearch_executor::{Command, Output};
///
/// match executor.execute(Command::ListLibraries)? {
///     Output::Libraries(libs) => println!("{} libraries", libs.len()),
///     _ => unreachable!("ListLibraries always returns Libraries"),
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Output {
    /// No return value (delete)
    Unit,

    /// Unsigned integer result (counts)
    Uint(u64),

    /// Ping response
    Pong {
        /// Crate version
        version: String,
    },

    /// Service information
    ServiceInfo(ServiceInfo),

    /// One library
    Library(LibraryInfo),

    /// Libraries sorted by id
    Libraries(Vec<LibraryInfo>),

    /// Library statistics
    Stats(LibraryStats),

    /// One document
    Document(DocumentInfo),

    /// Documents sorted by id
    Documents(Vec<DocumentInfo>),

    /// Search results, best first
    Hits(Vec<SearchHit>),
}
