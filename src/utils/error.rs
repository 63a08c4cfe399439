use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Malformed profile, hit table, catalog, FASTA or model file
    #[error("Parse error: {0}")]
    Parse(String),

    /// Required input (profile file, model resource, ...) is missing
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unknown motif '{motif}' at residue {res_id} of protein {protein}")]
    UnknownMotif {
        protein: String,
        res_id: usize,
        motif: String,
    },

    /// Profile search exited unsuccessfully or did not produce its outputs
    #[error("External tool failure: {0}")]
    ExternalTool(String),

    #[error("Timed out: {0}")]
    TimedOut(String),

    /// Inputs disagree with each other (e.g. profile length vs sequence length)
    #[error("Inconsistent data: {0}")]
    Inconsistent(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::NotFound(_) => true,
            Error::Io(e) => e.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }
}

pub fn handle_error_and_exit(err: Error) -> ! {
    log::error!("{}", err);
    std::process::exit(1);
}
