mod jackhmmer;
mod parser;
mod profile;

use std::collections::HashMap;

pub use jackhmmer::{run_jackhmmer, JackhmmerParams};
pub use parser::{parse_profile_file, parse_profiles, strip_iteration_suffix};
pub use profile::{profile_paths, MergedProfile, SearchProfiles, FEATURES_PER_RESIDUE};

/// Emission alphabet of HMMER amino-acid profiles, in file column order.
pub const AMINO_ALPHABET: [u8; 20] = *b"ACDEFGHIKLMNPQRSTVWY";
pub const ALPHABET_SIZE: usize = AMINO_ALPHABET.len();

/// Match-state emission values of one residue.
pub type ProfileVector = [f64; ALPHABET_SIZE];

/// Protein name to one profile vector per residue.
pub type ProfileMap = HashMap<String, Vec<ProfileVector>>;
