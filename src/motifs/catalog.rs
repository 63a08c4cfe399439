use crate::utils::{Error, Result};
use std::{collections::HashMap, fmt, fs, io::BufRead, str::FromStr};

/// Structural domain family a motif belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DomainFamily {
    CC,
    TIR,
    NBARC,
    LRR,
}

impl FromStr for DomainFamily {
    type Err = String;
    fn from_str(family: &str) -> std::result::Result<Self, Self::Err> {
        match family {
            "CC" => Ok(DomainFamily::CC),
            "TIR" => Ok(DomainFamily::TIR),
            "NBARC" | "NBS" => Ok(DomainFamily::NBARC),
            "LRR" => Ok(DomainFamily::LRR),
            _ => Err(format!(
                "Invalid domain family '{}'. Options are: CC, TIR, NBARC, LRR",
                family
            )),
        }
    }
}

impl fmt::Display for DomainFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DomainFamily::CC => "CC",
            DomainFamily::TIR => "TIR",
            DomainFamily::NBARC => "NBARC",
            DomainFamily::LRR => "LRR",
        };
        write!(f, "{}", label)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MotifDefinition {
    pub name: String,
    pub family: DomainFamily,
    /// Residues of context before the anchor
    pub left: usize,
    /// Residues of context after the motif span
    pub right: usize,
    /// Length of the motif itself
    pub span: usize,
    /// Locator of the scoring model, relative to the models directory
    pub model: String,
}

impl MotifDefinition {
    /// Number of residues covered by one feature window.
    pub fn window_len(&self) -> usize {
        self.left + self.span + self.right + 1
    }

    /// Anchor positions for which a full window fits in a sequence of `seq_len`.
    pub fn anchor_range(&self, seq_len: usize) -> std::ops::Range<usize> {
        let end = seq_len.saturating_sub(self.span + self.right);
        self.left..end.max(self.left)
    }

    #[cfg(test)]
    pub(crate) fn is_valid_anchor(&self, position: usize, seq_len: usize) -> bool {
        self.anchor_range(seq_len).contains(&position)
    }
}

//                       name        family              left right span model
const DEFAULT_MOTIFS: [(&str, DomainFamily, usize, usize, usize, &str); 17] = [
    ("extEDVID", DomainFamily::CC, 5, 5, 12, "MLP_CC_extEDVID.json"),
    ("bA", DomainFamily::TIR, 5, 5, 10, "MLP_TIR_bA.json"),
    ("aA", DomainFamily::TIR, 5, 5, 7, "MLP_TIR_aA.json"),
    ("bC", DomainFamily::TIR, 5, 5, 8, "MLP_TIR_bC.json"),
    ("aC", DomainFamily::TIR, 5, 5, 6, "MLP_TIR_aC.json"),
    ("bDaD1", DomainFamily::TIR, 5, 5, 16, "MLP_TIR_bD-aD1.json"),
    ("aD3", DomainFamily::TIR, 5, 5, 13, "MLP_TIR_aD3.json"),
    ("VG", DomainFamily::NBARC, 5, 5, 5, "MLP_NBS_VG.json"),
    ("P-loop", DomainFamily::NBARC, 5, 5, 9, "MLP_NBS_P-loop.json"),
    ("RNSB-A", DomainFamily::NBARC, 5, 5, 10, "MLP_NBS_RNSB-A.json"),
    ("Walker-B", DomainFamily::NBARC, 5, 5, 8, "MLP_NBS_Walker-B.json"),
    ("RNSB-B", DomainFamily::NBARC, 5, 5, 7, "MLP_NBS_RNSB-B.json"),
    ("RNSB-C", DomainFamily::NBARC, 5, 5, 10, "MLP_NBS_RNSB-C.json"),
    ("RNSB-D", DomainFamily::NBARC, 5, 5, 9, "MLP_NBS_RNSB-D.json"),
    ("GLPL", DomainFamily::NBARC, 5, 5, 5, "MLP_NBS_GLPL.json"),
    ("MHD", DomainFamily::NBARC, 5, 5, 3, "MLP_NBS_MHD.json"),
    ("LxxLxL", DomainFamily::LRR, 5, 5, 6, "MLP_LRR_LxxLxL.json"),
];

/// Ordered, immutable set of motif definitions.
#[derive(Debug, Clone, PartialEq)]
pub struct MotifCatalog {
    motifs: Vec<MotifDefinition>,
    index: HashMap<String, usize>,
}

impl Default for MotifCatalog {
    fn default() -> Self {
        let motifs: Vec<MotifDefinition> = DEFAULT_MOTIFS
            .iter()
            .map(|&(name, family, left, right, span, model)| MotifDefinition {
                name: name.to_string(),
                family,
                left,
                right,
                span,
                model: model.to_string(),
            })
            .collect();
        let index = motifs
            .iter()
            .enumerate()
            .map(|(i, m)| (m.name.clone(), i))
            .collect();
        Self { motifs, index }
    }
}

impl MotifCatalog {
    pub fn from_definitions(motifs: Vec<MotifDefinition>) -> Result<Self> {
        let mut index = HashMap::with_capacity(motifs.len());
        for (i, motif) in motifs.iter().enumerate() {
            if motif.span == 0 {
                return Err(Error::Parse(format!(
                    "Motif {} must span at least one residue",
                    motif.name
                )));
            }
            if index.insert(motif.name.clone(), i).is_some() {
                return Err(Error::Parse(format!(
                    "Duplicate motif entry: {}",
                    motif.name
                )));
            }
        }
        Ok(Self { motifs, index })
    }

    /// Loads the built-in catalog, or a catalog file when a path is given.
    pub fn new(path: Option<&std::path::Path>) -> Result<Self> {
        match path {
            None => Ok(Self::default()),
            Some(path) => {
                let file = fs::File::open(path).map_err(|e| match e.kind() {
                    std::io::ErrorKind::NotFound => {
                        Error::NotFound(format!("Motif catalog {}", path.display()))
                    }
                    _ => Error::Io(e),
                })?;
                Self::from_reader(std::io::BufReader::new(file))
            }
        }
    }

    /// Parses whitespace-separated `name family left right span model` lines.
    /// Blank lines and lines starting with `#` are ignored.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        const EXPECTED_FIELD_COUNT: usize = 6;
        let mut motifs = Vec::new();
        for (line_number, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() != EXPECTED_FIELD_COUNT {
                return Err(Error::Parse(format!(
                    "Expected {} fields in the format 'name family left right span model' at catalog line {}, found {}",
                    EXPECTED_FIELD_COUNT,
                    line_number + 1,
                    fields.len()
                )));
            }
            let parse_width = |s: &str| {
                s.parse::<usize>().map_err(|_| {
                    Error::Parse(format!(
                        "Invalid width '{}' at catalog line {}",
                        s,
                        line_number + 1
                    ))
                })
            };
            let family = fields[1].parse::<DomainFamily>().map_err(|e| {
                Error::Parse(format!("{} at catalog line {}", e, line_number + 1))
            })?;
            motifs.push(MotifDefinition {
                name: fields[0].to_string(),
                family,
                left: parse_width(fields[2])?,
                right: parse_width(fields[3])?,
                span: parse_width(fields[4])?,
                model: fields[5].to_string(),
            });
        }
        if motifs.is_empty() {
            return Err(Error::Parse("Motif catalog is empty".into()));
        }
        Self::from_definitions(motifs)
    }

    pub fn get(&self, name: &str) -> Option<&MotifDefinition> {
        self.index.get(name).map(|&i| &self.motifs[i])
    }

    pub fn family_of(&self, name: &str) -> Option<DomainFamily> {
        self.get(name).map(|m| m.family)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MotifDefinition> {
        self.motifs.iter()
    }

    pub fn len(&self) -> usize {
        self.motifs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.motifs.is_empty()
    }
}
