//! Output modalities and tissue ontology terms

use serde::{Deserialize, Serialize};
use std::fmt;

/// Output modality the prediction service can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OutputType {
    #[serde(rename = "ATAC", alias = "ATAC_SEQ")]
    Atac,
    #[serde(rename = "CAGE")]
    Cage,
    #[serde(rename = "DNASE", alias = "DNase")]
    Dnase,
    #[serde(rename = "RNA_SEQ")]
    RnaSeq,
    #[serde(rename = "CHIP_HISTONE")]
    ChipHistone,
    #[serde(rename = "CHIP_TF")]
    ChipTf,
    #[serde(rename = "SPLICE_SITES")]
    SpliceSites,
    #[serde(rename = "SPLICE_SITE_USAGE")]
    SpliceSiteUsage,
    #[serde(rename = "SPLICE_JUNCTIONS")]
    SpliceJunctions,
    #[serde(rename = "CONTACT_MAPS")]
    ContactMaps,
    #[serde(rename = "PROCAP")]
    Procap,
}

impl OutputType {
    /// Name as used on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputType::Atac => "ATAC",
            OutputType::Cage => "CAGE",
            OutputType::Dnase => "DNASE",
            OutputType::RnaSeq => "RNA_SEQ",
            OutputType::ChipHistone => "CHIP_HISTONE",
            OutputType::ChipTf => "CHIP_TF",
            OutputType::SpliceSites => "SPLICE_SITES",
            OutputType::SpliceSiteUsage => "SPLICE_SITE_USAGE",
            OutputType::SpliceJunctions => "SPLICE_JUNCTIONS",
            OutputType::ContactMaps => "CONTACT_MAPS",
            OutputType::Procap => "PROCAP",
        }
    }

    /// Parse an output name (case-insensitive, `-` and `_` interchangeable)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().replace('-', "_").as_str() {
            "ATAC" | "ATAC_SEQ" => Some(OutputType::Atac),
            "CAGE" => Some(OutputType::Cage),
            "DNASE" => Some(OutputType::Dnase),
            "RNA_SEQ" | "RNASEQ" => Some(OutputType::RnaSeq),
            "CHIP_HISTONE" => Some(OutputType::ChipHistone),
            "CHIP_TF" => Some(OutputType::ChipTf),
            "SPLICE_SITES" => Some(OutputType::SpliceSites),
            "SPLICE_SITE_USAGE" => Some(OutputType::SpliceSiteUsage),
            "SPLICE_JUNCTIONS" => Some(OutputType::SpliceJunctions),
            "CONTACT_MAPS" => Some(OutputType::ContactMaps),
            "PROCAP" => Some(OutputType::Procap),
            _ => None,
        }
    }

    pub fn all() -> &'static [OutputType] {
        &[
            OutputType::Atac,
            OutputType::Cage,
            OutputType::Dnase,
            OutputType::RnaSeq,
            OutputType::ChipHistone,
            OutputType::ChipTf,
            OutputType::SpliceSites,
            OutputType::SpliceSiteUsage,
            OutputType::SpliceJunctions,
            OutputType::ContactMaps,
            OutputType::Procap,
        ]
    }
}

impl fmt::Display for OutputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Default tissue: transverse colon
pub const DEFAULT_ONTOLOGY_TERM: &str = "UBERON:0001157";

/// Tissue ontology terms offered to callers, with display names
pub const TISSUES: &[(&str, &str)] = &[
    ("UBERON:0001157", "Colon - Transverse"),
    ("UBERON:0001114", "Right liver lobe"),
    ("UBERON:0002048", "Lung"),
    ("UBERON:0000948", "Heart"),
    ("UBERON:0000955", "Brain"),
    ("UBERON:0002113", "Kidney"),
];

/// Display name for a known ontology term
pub fn tissue_name(term: &str) -> Option<&'static str> {
    TISSUES
        .iter()
        .find(|(id, _)| *id == term)
        .map(|(_, name)| *name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_roundtrips_all() {
        for output in OutputType::all() {
            assert_eq!(OutputType::parse(output.as_str()), Some(*output));
        }
    }

    #[test]
    fn test_parse_aliases() {
        assert_eq!(OutputType::parse("atac_seq"), Some(OutputType::Atac));
        assert_eq!(OutputType::parse("rna-seq"), Some(OutputType::RnaSeq));
        assert_eq!(OutputType::parse("DNase"), Some(OutputType::Dnase));
        assert_eq!(OutputType::parse("HiC"), None);
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(
            serde_json::to_string(&OutputType::RnaSeq).unwrap(),
            "\"RNA_SEQ\""
        );
        let parsed: OutputType = serde_json::from_str("\"ATAC_SEQ\"").unwrap();
        assert_eq!(parsed, OutputType::Atac);
    }

    #[test]
    fn test_tissues() {
        assert_eq!(TISSUES.len(), 6);
        assert_eq!(tissue_name(DEFAULT_ONTOLOGY_TERM), Some("Colon - Transverse"));
        assert_eq!(tissue_name("UBERON:9999999"), None);
    }
}
