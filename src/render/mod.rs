//! Output rendering

pub mod dump;

pub use dump::{write_dump, write_dump_file, DumpOutcome, DumpPlan};
