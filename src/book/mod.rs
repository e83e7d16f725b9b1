// Order book: record types and the time-ordered session index

pub mod entry;
pub mod index;

pub use entry::{OrderRecord, OwnerId, Side};
pub use index::BookIndex;
