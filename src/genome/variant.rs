//! Genomic variants

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::interval::parse_coordinate;
use crate::error::PredictError;

/// Kind of sequence change, derived from the allele lengths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariantType {
    /// Single base replaced by a single base
    Substitution,
    /// Equal-length multi-base replacement
    MultiNucleotide,
    /// Alternate allele longer than reference
    Insertion,
    /// Alternate allele shorter than reference
    Deletion,
}

impl VariantType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VariantType::Substitution => "substitution",
            VariantType::MultiNucleotide => "multi_nucleotide",
            VariantType::Insertion => "insertion",
            VariantType::Deletion => "deletion",
        }
    }
}

impl fmt::Display for VariantType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single-position change described by reference and alternate bases
///
/// Bases are upper-cased on construction. The reference allele must be
/// non-empty; an empty alternate allele describes a pure deletion.
///
/// # Examples
///
/// ```
/// use ferro_predict::genome::{GenomicVariant, VariantType};
///
/// let variant: GenomicVariant = "chr22:36201698:A>C".parse().unwrap();
/// assert_eq!(variant.position(), 36_201_698);
/// assert_eq!(variant.variant_type(), VariantType::Substitution);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GenomicVariant {
    chromosome: String,
    position: u64,
    #[serde(alias = "referenceBases")]
    reference_bases: String,
    #[serde(alias = "alternateBases")]
    alternate_bases: String,
}

impl GenomicVariant {
    /// Create a variant, normalizing bases to upper case
    pub fn new(
        chromosome: impl Into<String>,
        position: u64,
        reference_bases: impl AsRef<str>,
        alternate_bases: impl AsRef<str>,
    ) -> Result<Self, PredictError> {
        let variant = Self {
            chromosome: chromosome.into(),
            position,
            reference_bases: reference_bases.as_ref().trim().to_ascii_uppercase(),
            alternate_bases: alternate_bases.as_ref().trim().to_ascii_uppercase(),
        };
        variant.check()?;
        Ok(variant)
    }

    /// Re-apply construction checks (deserialized values skip [`GenomicVariant::new`])
    pub fn check(&self) -> Result<(), PredictError> {
        if self.position == 0 {
            return Err(PredictError::coordinate(format!(
                "variant position must be >= 1 in {}",
                self
            )));
        }
        if self.reference_bases.is_empty() {
            return Err(PredictError::InvalidBases {
                bases: String::new(),
            });
        }
        check_bases(&self.reference_bases)?;
        check_bases(&self.alternate_bases)?;
        Ok(())
    }

    pub fn chromosome(&self) -> &str {
        &self.chromosome
    }

    pub fn position(&self) -> u64 {
        self.position
    }

    pub fn reference_bases(&self) -> &str {
        &self.reference_bases
    }

    pub fn alternate_bases(&self) -> &str {
        &self.alternate_bases
    }

    /// Derive the variant type from allele lengths
    pub fn variant_type(&self) -> VariantType {
        let ref_len = self.reference_bases.len();
        let alt_len = self.alternate_bases.len();
        match alt_len.cmp(&ref_len) {
            std::cmp::Ordering::Greater => VariantType::Insertion,
            std::cmp::Ordering::Less => VariantType::Deletion,
            std::cmp::Ordering::Equal if ref_len == 1 => VariantType::Substitution,
            std::cmp::Ordering::Equal => VariantType::MultiNucleotide,
        }
    }
}

fn check_bases(bases: &str) -> Result<(), PredictError> {
    if bases.bytes().all(|b| matches!(b, b'A' | b'C' | b'G' | b'T')) {
        Ok(())
    } else {
        Err(PredictError::InvalidBases {
            bases: bases.to_string(),
        })
    }
}

impl fmt::Display for GenomicVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}>{}",
            self.chromosome, self.position, self.reference_bases, self.alternate_bases
        )
    }
}

impl FromStr for GenomicVariant {
    type Err = PredictError;

    /// Parse `chrom:pos:REF>ALT` or `chrom:pos REF>ALT`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (chromosome, rest) = trimmed
            .split_once(':')
            .ok_or_else(|| PredictError::invalid_input(s, "expected chrom:pos:REF>ALT"))?;

        let split_at = rest
            .find(|c: char| c == ':' || c.is_whitespace())
            .ok_or_else(|| PredictError::invalid_input(s, "expected chrom:pos:REF>ALT"))?;
        let (position, alleles) = rest.split_at(split_at);
        let alleles = alleles[1..].trim();

        let position = parse_coordinate(position).ok_or_else(|| {
            PredictError::invalid_input(s, format!("invalid position '{}'", position))
        })?;
        let (reference, alternate) = alleles
            .split_once('>')
            .ok_or_else(|| PredictError::invalid_input(s, "expected REF>ALT"))?;

        if chromosome.is_empty() {
            return Err(PredictError::invalid_input(s, "missing chromosome"));
        }

        GenomicVariant::new(chromosome, position, reference, alternate)
    }
}
