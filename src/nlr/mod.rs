mod domains;
mod hits;
mod scan;
pub mod writers;

pub use domains::{
    classify_domains, classify_protein, DomainCalls, DomainParams, DomainReport,
    DEFAULT_DOMAIN_THRESHOLD,
};
pub use hits::{read_hits, HitRecord, CONTEXT_LEN};
pub use scan::{
    passes_cutoff, scan, MotifFailure, ScanParams, ScanReport, DEFAULT_CUTOFF,
    PROBABILITY_DIGITS,
};
