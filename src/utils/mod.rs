mod error;
mod io_utils;
mod math;
mod readers;
mod sequences;

pub use error::{handle_error_and_exit, Error, Result};
pub use io_utils::{create_writer, PendingOutput};
pub use math::round_to;
pub use readers::open_input_reader;
pub use sequences::{ProteinSequence, SequenceStore};
