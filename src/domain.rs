use std::cmp::Ordering;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// A finite numeric catalog value.
///
/// Integral values serialize as JSON integers so counts and lengths read
/// `12`, not `12.0`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Number(f64);

impl Number {
    pub fn new(value: f64) -> Option<Self> {
        value.is_finite().then_some(Self(value))
    }

    pub fn value(self) -> f64 {
        self.0
    }

    fn as_integer(self) -> Option<i64> {
        (self.0.fract() == 0.0 && self.0.abs() <= MAX_SAFE_INTEGER).then_some(self.0 as i64)
    }

    pub fn max_defined(a: Option<Number>, b: Option<Number>) -> Option<Number> {
        match (a, b) {
            (Some(a), Some(b)) => match a.partial_cmp(&b) {
                Some(Ordering::Less) => Some(b),
                _ => Some(a),
            },
            (Some(a), None) => Some(a),
            (None, b) => b,
        }
    }
}

impl Serialize for Number {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.as_integer() {
            Some(value) => serializer.serialize_i64(value),
            None => serializer.serialize_f64(self.0),
        }
    }
}

impl<'de> Deserialize<'de> for Number {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        Number::new(value).ok_or_else(|| serde::de::Error::custom("non-finite number"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RefLabel {
    Yes,
    No,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequencingRun {
    pub accession: String,
    pub biosample: String,
    pub instrument: String,
    pub library_layout: String,
    pub library_source: String,
    pub library_strategy: String,
    pub platform: String,
    pub run_total_bases: Number,
    pub sra_run_acc: String,
    pub sra_sample_acc: String,
    pub sra_study_acc: String,
    pub total_bases: Number,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Genome {
    pub accession: String,
    pub annotation_status: Option<String>,
    pub chromosomes: Option<Number>,
    pub coverage: Option<String>,
    pub gc_percent: Number,
    pub gene_model_url: Option<String>,
    pub is_ref: RefLabel,
    pub length: Number,
    pub level: String,
    pub ncbi_taxonomy_id: String,
    pub scaffold_count: Option<Number>,
    pub scaffold_l50: Option<Number>,
    pub scaffold_n50: Option<Number>,
    pub species: String,
    pub species_taxonomy_id: String,
    #[serde(rename = "sra_data")]
    pub sra_data: Vec<SequencingRun>,
    pub strain: Option<String>,
    pub taxonomic_group: Vec<String>,
    pub tol_id: Option<String>,
    pub ucsc_browser_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organism {
    pub assembly_count: usize,
    pub assembly_taxonomy_ids: Vec<String>,
    pub genomes: Vec<Genome>,
    pub max_scaffold_n50: Option<Number>,
    pub ncbi_taxonomy_id: String,
    pub species: String,
    pub taxonomic_group: Vec<String>,
    pub tol_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(value: f64) -> Number {
        Number::new(value).unwrap()
    }

    #[test]
    fn integral_numbers_serialize_without_fraction() {
        assert_eq!(serde_json::to_string(&num(12.0)).unwrap(), "12");
        assert_eq!(serde_json::to_string(&num(-3.0)).unwrap(), "-3");
        assert_eq!(serde_json::to_string(&num(12.5)).unwrap(), "12.5");
    }

    #[test]
    fn non_finite_numbers_are_rejected() {
        assert!(Number::new(f64::NAN).is_none());
        assert!(Number::new(f64::INFINITY).is_none());
    }

    #[test]
    fn max_defined_treats_absent_as_identity() {
        assert_eq!(Number::max_defined(None, None), None);
        assert_eq!(Number::max_defined(Some(num(5.0)), None), Some(num(5.0)));
        assert_eq!(Number::max_defined(None, Some(num(7.0))), Some(num(7.0)));
        assert_eq!(
            Number::max_defined(Some(num(50.0)), Some(num(80.0))),
            Some(num(80.0))
        );
        assert_eq!(
            Number::max_defined(Some(num(90.0)), Some(num(80.0))),
            Some(num(90.0))
        );
    }

    #[test]
    fn ref_label_serializes_as_word() {
        assert_eq!(serde_json::to_string(&RefLabel::Yes).unwrap(), "\"Yes\"");
        assert_eq!(serde_json::to_string(&RefLabel::No).unwrap(), "\"No\"");
    }
}
