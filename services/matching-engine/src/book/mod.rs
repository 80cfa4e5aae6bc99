//! Order book structures
//!
//! Two ordered sides per outcome book, each a BTreeMap of price levels
//! holding sequence-ordered FIFO queues.

pub mod ask_book;
pub mod bid_book;
pub mod price_level;

pub use ask_book::AskBook;
pub use bid_book::BidBook;
pub use price_level::{LevelEntry, PriceLevel};
