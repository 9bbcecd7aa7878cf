pub mod display;
pub mod process_table;
pub mod transaction_log;

pub use process_table::{ProcessEntry, ProcessTable};
pub use transaction_log::Transaction;
