use crate::core::utils::identifiers::{UnknownVariant, lookup_variant};
use phf::{Map, phf_map};
use tracing::info;

/// How a sequencer reads the i5 barcode relative to the index plate sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum I5Orientation {
    ReverseComplement,
    Forward,
}

static SEQUENCERS: Map<&'static str, I5Orientation> = phf_map! {
    "HiSeq4000" => I5Orientation::ReverseComplement,
    "MiniSeq" => I5Orientation::ReverseComplement,
    "NextSeq" => I5Orientation::ReverseComplement,
    "HiSeq3000" => I5Orientation::ReverseComplement,
    "iSeq" => I5Orientation::ReverseComplement,
    "NovaSeq" => I5Orientation::ReverseComplement,
    "HiSeq2500" => I5Orientation::Forward,
    "HiSeq1500" => I5Orientation::Forward,
    "MiSeq" => I5Orientation::Forward,
};

static COMPLEMENTS: Map<char, char> = phf_map! {
    'A' => 'T',
    'C' => 'G',
    'G' => 'C',
    'T' => 'A',
};

pub fn i5_orientation(sequencer: &str) -> Result<I5Orientation, UnknownVariant> {
    lookup_variant(&SEQUENCERS, "sequencer", sequencer)
}

/// Reverse complement of an upper-case nucleotide sequence. Characters other
/// than `A`, `C`, `G` and `T` are kept as they are.
pub fn reverse_complement(seq: &str) -> String {
    seq.chars()
        .rev()
        .map(|base| COMPLEMENTS.get(&base).copied().unwrap_or(base))
        .collect()
}

/// Orients i5 barcodes the way the given sequencer reads them.
pub fn sequencer_i5_index<S: AsRef<str>>(
    sequencer: &str,
    indices: &[S],
) -> Result<Vec<String>, UnknownVariant> {
    let oriented = match i5_orientation(sequencer)? {
        I5Orientation::ReverseComplement => {
            info!(sequencer, "i5 barcodes are output as reverse complements.");
            indices
                .iter()
                .map(|s| reverse_complement(s.as_ref()))
                .collect()
        }
        I5Orientation::Forward => {
            info!(sequencer, "i5 barcodes are output in the standard direction.");
            indices.iter().map(|s| s.as_ref().to_string()).collect()
        }
    };
    Ok(oriented)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reverse_complement_reverses_and_complements() {
        assert_eq!(reverse_complement("AGCCT"), "AGGCT");
        assert_eq!(reverse_complement(""), "");
    }

    #[test]
    fn reverse_complement_keeps_unknown_bases() {
        assert_eq!(reverse_complement("ACNGT"), "ACNGT");
        assert_eq!(reverse_complement("AAn"), "nTT");
    }

    #[test]
    fn novaseq_reads_i5_as_reverse_complement() {
        let out = sequencer_i5_index("NovaSeq", &["AGCT", "AAAC"]).unwrap();
        assert_eq!(out, vec!["AGCT", "GTTT"]);
    }

    #[test]
    fn miseq_reads_i5_forward() {
        let input = vec!["AGCT".to_string(), "AAAC".to_string()];
        let out = sequencer_i5_index("MiSeq", &input).unwrap();
        assert_eq!(out, input);
    }

    #[test]
    fn unknown_sequencer_lists_all_recognized_ones() {
        let err = sequencer_i5_index("MinION", &["A"]).unwrap_err();
        assert_eq!(err.kind, "sequencer");
        assert_eq!(err.accepted.len(), 9);
        assert!(err.accepted.contains(&"iSeq"));
        assert!(err.accepted.contains(&"HiSeq1500"));
    }
}
