mod write_domains;
mod write_hits;

pub use write_domains::{DomainWriter, DOMAINS_FILE_NAME};
pub use write_hits::{HitWriter, HITS_FILE_NAME};
