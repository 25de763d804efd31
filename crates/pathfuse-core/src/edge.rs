//! Edge payloads: the relation vocabulary and per-statement data.
//!
//! Every edge in a [`crate::PathwayGraph`] carries an [`EdgeData`]: one
//! [`Relation`] plus pass-through citation/evidence and an optional
//! annotation container. The container stays `None` until the annotator
//! creates it, so freshly decoded graphs compare equal to what was encoded.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Annotation container: key to set of values, deterministically ordered.
pub type Annotations = BTreeMap<String, BTreeSet<String>>;

// ---------------------------------------------------------------------------
// Relation vocabulary
// ---------------------------------------------------------------------------

/// The fixed relation vocabulary, serialized in BEL camelCase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Relation {
    Increases,
    DirectlyIncreases,
    Decreases,
    DirectlyDecreases,
    RateLimitingStepOf,
    CausesNoChange,
    Regulates,
    PositiveCorrelation,
    NegativeCorrelation,
    Correlation,
    NoCorrelation,
    Association,
    Binds,
    Orthologous,
    AnalogousTo,
    EquivalentTo,
    IsA,
    PartOf,
    SubProcessOf,
    HasVariant,
    HasMember,
    HasComponent,
    HasReactant,
    HasProduct,
    TranscribedTo,
    TranslatedTo,
    BiomarkerFor,
    PrognosticBiomarkerFor,
}

impl Relation {
    pub const ALL: [Relation; 28] = [
        Relation::Increases,
        Relation::DirectlyIncreases,
        Relation::Decreases,
        Relation::DirectlyDecreases,
        Relation::RateLimitingStepOf,
        Relation::CausesNoChange,
        Relation::Regulates,
        Relation::PositiveCorrelation,
        Relation::NegativeCorrelation,
        Relation::Correlation,
        Relation::NoCorrelation,
        Relation::Association,
        Relation::Binds,
        Relation::Orthologous,
        Relation::AnalogousTo,
        Relation::EquivalentTo,
        Relation::IsA,
        Relation::PartOf,
        Relation::SubProcessOf,
        Relation::HasVariant,
        Relation::HasMember,
        Relation::HasComponent,
        Relation::HasReactant,
        Relation::HasProduct,
        Relation::TranscribedTo,
        Relation::TranslatedTo,
        Relation::BiomarkerFor,
        Relation::PrognosticBiomarkerFor,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Relation::Increases => "increases",
            Relation::DirectlyIncreases => "directlyIncreases",
            Relation::Decreases => "decreases",
            Relation::DirectlyDecreases => "directlyDecreases",
            Relation::RateLimitingStepOf => "rateLimitingStepOf",
            Relation::CausesNoChange => "causesNoChange",
            Relation::Regulates => "regulates",
            Relation::PositiveCorrelation => "positiveCorrelation",
            Relation::NegativeCorrelation => "negativeCorrelation",
            Relation::Correlation => "correlation",
            Relation::NoCorrelation => "noCorrelation",
            Relation::Association => "association",
            Relation::Binds => "binds",
            Relation::Orthologous => "orthologous",
            Relation::AnalogousTo => "analogousTo",
            Relation::EquivalentTo => "equivalentTo",
            Relation::IsA => "isA",
            Relation::PartOf => "partOf",
            Relation::SubProcessOf => "subProcessOf",
            Relation::HasVariant => "hasVariant",
            Relation::HasMember => "hasMember",
            Relation::HasComponent => "hasComponent",
            Relation::HasReactant => "hasReactant",
            Relation::HasProduct => "hasProduct",
            Relation::TranscribedTo => "transcribedTo",
            Relation::TranslatedTo => "translatedTo",
            Relation::BiomarkerFor => "biomarkerFor",
            Relation::PrognosticBiomarkerFor => "prognosticBiomarkerFor",
        }
    }

    /// `increases` or `directlyIncreases`.
    pub fn is_increase(self) -> bool {
        matches!(self, Relation::Increases | Relation::DirectlyIncreases)
    }

    /// `decreases` or `directlyDecreases`.
    pub fn is_decrease(self) -> bool {
        matches!(self, Relation::Decreases | Relation::DirectlyDecreases)
    }

    /// Any relation that asserts a causal effect, including `causesNoChange`.
    pub fn is_causal(self) -> bool {
        self.is_increase()
            || self.is_decrease()
            || matches!(
                self,
                Relation::CausesNoChange | Relation::Regulates | Relation::RateLimitingStepOf
            )
    }

    pub fn is_association(self) -> bool {
        self == Relation::Association
    }

    /// Direction-symmetric relations, folded per unordered pair on export.
    pub fn is_two_way(self) -> bool {
        matches!(
            self,
            Relation::Association
                | Relation::Binds
                | Relation::PositiveCorrelation
                | Relation::NegativeCorrelation
                | Relation::Correlation
                | Relation::NoCorrelation
                | Relation::Orthologous
                | Relation::AnalogousTo
                | Relation::EquivalentTo
        )
    }

    /// The family-normalized relation shown on exported links: the increase
    /// and decrease families collapse to their plain forms, everything else
    /// has no link-level relation.
    pub fn normalized(self) -> Option<Relation> {
        if self.is_increase() {
            Some(Relation::Increases)
        } else if self.is_decrease() {
            Some(Relation::Decreases)
        } else {
            None
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Relation {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Relation::ALL
            .iter()
            .copied()
            .find(|relation| relation.as_str() == s)
            .ok_or_else(|| CoreError::UnknownRelation {
                value: s.to_string(),
            })
    }
}

// ---------------------------------------------------------------------------
// Edge data
// ---------------------------------------------------------------------------

/// Literature reference for a statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Citation {
    pub db: String,
    pub reference: String,
}

/// The payload of one statement (edge).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeData {
    pub relation: Relation,
    pub citation: Option<Citation>,
    pub evidence: Option<String>,
    pub annotations: Option<Annotations>,
}

impl EdgeData {
    pub fn new(relation: Relation) -> Self {
        EdgeData {
            relation,
            citation: None,
            evidence: None,
            annotations: None,
        }
    }

    pub fn with_citation(mut self, db: impl Into<String>, reference: impl Into<String>) -> Self {
        self.citation = Some(Citation {
            db: db.into(),
            reference: reference.into(),
        });
        self
    }

    pub fn with_evidence(mut self, evidence: impl Into<String>) -> Self {
        self.evidence = Some(evidence.into());
        self
    }

    pub fn with_annotation(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.annotate(key, value);
        self
    }

    /// Adds `value` to the set under `key`, creating the container and the
    /// key if missing. Existing values are kept.
    pub fn annotate(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.annotations
            .get_or_insert_with(Annotations::new)
            .entry(key.into())
            .or_default()
            .insert(value.into());
    }

    /// Returns `true` if the annotation `key` contains `value`.
    pub fn has_annotation(&self, key: &str, value: &str) -> bool {
        self.annotations
            .as_ref()
            .and_then(|annotations| annotations.get(key))
            .is_some_and(|values| values.contains(value))
    }

    /// Canonical bytes used for edge identity.
    ///
    /// Every field is a string, an enum tag or a string-keyed map, so JSON
    /// encoding has no failure path.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        serde_json::to_vec(self).expect("EdgeData serialization should never fail")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relation_serde_is_camel_case() {
        let json = serde_json::to_string(&Relation::DirectlyIncreases).unwrap();
        assert_eq!(json, "\"directlyIncreases\"");
        let back: Relation = serde_json::from_str("\"causesNoChange\"").unwrap();
        assert_eq!(back, Relation::CausesNoChange);
    }

    #[test]
    fn relation_from_str_matches_as_str() {
        for relation in Relation::ALL {
            assert_eq!(relation.as_str().parse::<Relation>().unwrap(), relation);
        }
        assert!(matches!(
            "inhibits".parse::<Relation>(),
            Err(CoreError::UnknownRelation { .. })
        ));
    }

    #[test]
    fn families() {
        assert!(Relation::DirectlyDecreases.is_decrease());
        assert!(Relation::CausesNoChange.is_causal());
        assert!(Relation::Regulates.is_causal());
        assert!(!Relation::Association.is_causal());
        assert!(Relation::Association.is_two_way());
        assert!(Relation::Binds.is_two_way());
        assert!(!Relation::Increases.is_two_way());
        assert_eq!(Relation::DirectlyIncreases.normalized(), Some(Relation::Increases));
        assert_eq!(Relation::CausesNoChange.normalized(), None);
    }

    #[test]
    fn annotate_is_set_union() {
        let mut data = EdgeData::new(Relation::Increases);
        assert!(data.annotations.is_none());
        data.annotate("Database", "kegg");
        data.annotate("Database", "kegg");
        data.annotate("Database", "reactome");
        data.annotate("Species", "9606");
        let annotations = data.annotations.as_ref().unwrap();
        assert_eq!(annotations["Database"].len(), 2);
        assert!(data.has_annotation("Species", "9606"));
        assert!(!data.has_annotation("Species", "10090"));
    }

    #[test]
    fn canonical_bytes_distinguish_annotations() {
        let a = EdgeData::new(Relation::Increases).with_annotation("Database", "kegg");
        let b = EdgeData::new(Relation::Increases).with_annotation("Database", "reactome");
        assert_ne!(a.canonical_bytes(), b.canonical_bytes());
        assert_eq!(a.canonical_bytes(), a.clone().canonical_bytes());
    }

    #[test]
    fn canonical_bytes_cover_every_field() {
        let full = EdgeData::new(Relation::Association)
            .with_citation("PubMed", "123")
            .with_evidence("line\twith\ncontrol \"chars\"")
            .with_annotation("Pathway name", "ErbB");
        let bytes = full.canonical_bytes();
        let restored: EdgeData = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(restored, full);
        assert_ne!(bytes, EdgeData::new(Relation::Association).canonical_bytes());
    }
}
