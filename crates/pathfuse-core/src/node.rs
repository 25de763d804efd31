//! Biological entity nodes.
//!
//! A [`Node`] is an immutable value: its identity is its canonical BEL-like
//! string (see [`Node::as_bel`]) and the [`NodeSignature`] derived from it.
//! Equality, hashing and ordering all go through the canonical string, so two
//! nodes built independently by different pathways compare equal whenever
//! they describe the same entity.
//!
//! Composite structure (variants, fusions, complex/composite members,
//! reaction participants) is rendered in sorted order, which makes the
//! canonical string independent of the order it was listed in.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::id::NodeSignature;

// ---------------------------------------------------------------------------
// Function
// ---------------------------------------------------------------------------

/// The abundance type of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Function {
    Protein,
    Rna,
    MicroRna,
    Gene,
    Abundance,
    BiologicalProcess,
    Pathology,
    Complex,
    Composite,
    Reaction,
}

impl Function {
    /// Short BEL function name used in canonical strings.
    pub fn bel_prefix(self) -> &'static str {
        match self {
            Function::Protein => "p",
            Function::Rna => "r",
            Function::MicroRna => "m",
            Function::Gene => "g",
            Function::Abundance => "a",
            Function::BiologicalProcess => "bp",
            Function::Pathology => "path",
            Function::Complex => "complex",
            Function::Composite => "composite",
            Function::Reaction => "rxn",
        }
    }

    /// Display label used in exported node attributes.
    pub fn label(self) -> &'static str {
        match self {
            Function::Protein => "Protein",
            Function::Rna => "RNA",
            Function::MicroRna => "miRNA",
            Function::Gene => "Gene",
            Function::Abundance => "Abundance",
            Function::BiologicalProcess => "BiologicalProcess",
            Function::Pathology => "Pathology",
            Function::Complex => "Complex",
            Function::Composite => "Composite",
            Function::Reaction => "Reaction",
        }
    }

    /// Returns `true` for the central-dogma and small-molecule abundances
    /// that participate in gene-level overlap comparison.
    pub fn is_molecular(self) -> bool {
        matches!(
            self,
            Function::Protein
                | Function::Rna
                | Function::MicroRna
                | Function::Gene
                | Function::Abundance
        )
    }

    /// Returns `true` for forms that collapse onto their parent gene.
    pub fn is_gene_product(self) -> bool {
        matches!(self, Function::Protein | Function::Rna | Function::MicroRna)
    }
}

// ---------------------------------------------------------------------------
// Entity, variants, fusion
// ---------------------------------------------------------------------------

/// A namespaced name, e.g. `HGNC:AKT1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entity {
    pub namespace: String,
    pub name: String,
    /// Database identifier, when the converter resolved one.
    pub identifier: Option<String>,
}

impl Entity {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Entity {
            namespace: namespace.into(),
            name: name.into(),
            identifier: None,
        }
    }

    pub fn as_bel(&self) -> String {
        format!("{}:{}", quote(&self.namespace), quote(&self.name))
    }
}

/// Sub-structure that distinguishes a modified form from its parent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Variant {
    /// HGVS variant description, e.g. `p.Ala127Tyr`.
    Hgvs(String),
    /// Post-translational modification, e.g. `pmod(Ph, Ser, 473)`.
    ProteinModification {
        name: String,
        code: Option<String>,
        position: Option<u32>,
    },
    /// Protein fragment with optional range bounds.
    Fragment {
        start: Option<String>,
        stop: Option<String>,
    },
    /// Gene modification, e.g. `gmod(Me)`.
    GeneModification { name: String },
}

impl Variant {
    pub fn as_bel(&self) -> String {
        match self {
            Variant::Hgvs(text) => format!("var({})", quote_always(text)),
            Variant::ProteinModification {
                name,
                code,
                position,
            } => match (code, position) {
                (Some(code), Some(position)) => {
                    format!("pmod({}, {}, {})", quote(name), code, position)
                }
                (Some(code), None) => format!("pmod({}, {})", quote(name), code),
                _ => format!("pmod({})", quote(name)),
            },
            Variant::Fragment { start, stop } => match (start, stop) {
                (None, None) => "frag(\"?\")".to_string(),
                (start, stop) => format!(
                    "frag(\"{}_{}\")",
                    start.as_deref().unwrap_or("?"),
                    stop.as_deref().unwrap_or("?")
                ),
            },
            Variant::GeneModification { name } => format!("gmod({})", quote(name)),
        }
    }
}

/// A gene/protein fusion between a 5' and a 3' partner.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fusion {
    pub five_prime: Entity,
    pub three_prime: Entity,
}

impl Fusion {
    pub fn as_bel(&self) -> String {
        format!(
            "fus({}, \"?\", {}, \"?\")",
            self.five_prime.as_bel(),
            self.three_prime.as_bel()
        )
    }
}

// ---------------------------------------------------------------------------
// Node
// ---------------------------------------------------------------------------

/// A biological entity abundance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub function: Function,
    pub entity: Option<Entity>,
    pub variants: Vec<Variant>,
    pub fusion: Option<Fusion>,
    /// Members of a complex or composite.
    pub members: Vec<Node>,
    pub reactants: Vec<Node>,
    pub products: Vec<Node>,
}

impl Node {
    fn bare(function: Function) -> Self {
        Node {
            function,
            entity: None,
            variants: Vec::new(),
            fusion: None,
            members: Vec::new(),
            reactants: Vec::new(),
            products: Vec::new(),
        }
    }

    /// Creates a node naming a single entity.
    pub fn named(
        function: Function,
        namespace: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        let mut node = Node::bare(function);
        node.entity = Some(Entity::new(namespace, name));
        node
    }

    pub fn protein(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Node::named(Function::Protein, namespace, name)
    }

    pub fn rna(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Node::named(Function::Rna, namespace, name)
    }

    pub fn mirna(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Node::named(Function::MicroRna, namespace, name)
    }

    pub fn gene(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Node::named(Function::Gene, namespace, name)
    }

    pub fn abundance(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Node::named(Function::Abundance, namespace, name)
    }

    pub fn biological_process(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Node::named(Function::BiologicalProcess, namespace, name)
    }

    pub fn pathology(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Node::named(Function::Pathology, namespace, name)
    }

    /// A complex defined by its members.
    pub fn complex(members: Vec<Node>) -> Self {
        let mut node = Node::bare(Function::Complex);
        node.members = members;
        node
    }

    /// A composite abundance defined by its members.
    pub fn composite(members: Vec<Node>) -> Self {
        let mut node = Node::bare(Function::Composite);
        node.members = members;
        node
    }

    pub fn reaction(reactants: Vec<Node>, products: Vec<Node>) -> Self {
        let mut node = Node::bare(Function::Reaction);
        node.reactants = reactants;
        node.products = products;
        node
    }

    pub fn fusion(function: Function, five_prime: Entity, three_prime: Entity) -> Self {
        let mut node = Node::bare(function);
        node.fusion = Some(Fusion {
            five_prime,
            three_prime,
        });
        node
    }

    pub fn with_variant(mut self, variant: Variant) -> Self {
        self.variants.push(variant);
        self
    }

    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        if let Some(entity) = self.entity.as_mut() {
            entity.identifier = Some(identifier.into());
        }
        self
    }

    /// Fills attributes that do not take part in the signature from `other`.
    /// Values already present are kept.
    pub fn absorb(&mut self, other: &Node) {
        if let (Some(entity), Some(incoming)) = (self.entity.as_mut(), other.entity.as_ref()) {
            if entity.identifier.is_none() {
                entity.identifier = incoming.identifier.clone();
            }
        }
        for (mine, theirs) in [
            (&mut self.members, &other.members),
            (&mut self.reactants, &other.reactants),
            (&mut self.products, &other.products),
        ] {
            for node in mine.iter_mut() {
                let signature = node.signature();
                if let Some(twin) = theirs.iter().find(|t| t.signature() == signature) {
                    node.absorb(twin);
                }
            }
        }
    }

    /// The canonical BEL-like string of this node.
    pub fn as_bel(&self) -> String {
        let prefix = self.function.bel_prefix();
        match self.function {
            Function::Reaction => format!(
                "rxn(reactants({}), products({}))",
                sorted_bel(&self.reactants),
                sorted_bel(&self.products)
            ),
            Function::Complex | Function::Composite if !self.members.is_empty() => {
                format!("{}({})", prefix, sorted_bel(&self.members))
            }
            _ => {
                let mut parts = Vec::with_capacity(1 + self.variants.len());
                if let Some(fusion) = &self.fusion {
                    parts.push(fusion.as_bel());
                } else if let Some(entity) = &self.entity {
                    parts.push(entity.as_bel());
                }
                let mut variants: Vec<String> = self.variants.iter().map(Variant::as_bel).collect();
                variants.sort();
                parts.extend(variants);
                format!("{}({})", prefix, parts.join(", "))
            }
        }
    }

    /// The content signature used for deduplication.
    pub fn signature(&self) -> NodeSignature {
        NodeSignature::of(&self.as_bel())
    }

    /// Returns `true` if the node carries variant, fusion, membership or
    /// reaction sub-structure.
    pub fn is_composite(&self) -> bool {
        !self.variants.is_empty()
            || self.fusion.is_some()
            || !self.members.is_empty()
            || !self.reactants.is_empty()
            || !self.products.is_empty()
    }

    /// Returns `true` for molecular abundances (proteins, RNAs, genes,
    /// chemicals) that are not defined by members.
    pub fn is_molecular_abundance(&self) -> bool {
        self.function.is_molecular() && self.members.is_empty()
    }

    /// The gene this node is a product or variant of, if it collapses.
    ///
    /// Protein, RNA and miRNA forms (with or without variants) and genes
    /// with variants map to the plain `g(namespace:name)` node. Fusions and
    /// nodes without an entity never collapse.
    pub fn gene_parent(&self) -> Option<Node> {
        if self.fusion.is_some() {
            return None;
        }
        let entity = self.entity.as_ref()?;
        let collapses = self.function.is_gene_product()
            || (self.function == Function::Gene && !self.variants.is_empty());
        if !collapses {
            return None;
        }
        let mut gene = Node::named(Function::Gene, entity.namespace.clone(), entity.name.clone());
        gene.entity = Some(entity.clone());
        Some(gene)
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.as_bel() == other.as_bel()
    }
}

impl Eq for Node {}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.signature().hash(state);
    }
}

impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Node {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_bel().cmp(&other.as_bel())
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_bel())
    }
}

fn sorted_bel(nodes: &[Node]) -> String {
    let mut rendered: Vec<String> = nodes.iter().map(Node::as_bel).collect();
    rendered.sort();
    rendered.join(", ")
}

fn is_plain(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Quotes a name unless it is a plain identifier.
fn quote(value: &str) -> String {
    if is_plain(value) {
        value.to_string()
    } else {
        quote_always(value)
    }
}

fn quote_always(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        match c {
            '\\' => quoted.push_str("\\\\"),
            '"' => quoted.push_str("\\\""),
            '\t' => quoted.push_str("\\t"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            _ => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_canonical_strings() {
        assert_eq!(Node::protein("HGNC", "AKT1").as_bel(), "p(HGNC:AKT1)");
        assert_eq!(Node::gene("HGNC", "AKT1").as_bel(), "g(HGNC:AKT1)");
        assert_eq!(
            Node::abundance("CHEBI", "calcium(2+)").as_bel(),
            "a(CHEBI:\"calcium(2+)\")"
        );
        assert_eq!(
            Node::biological_process("GO", "apoptotic process").as_bel(),
            "bp(GO:\"apoptotic process\")"
        );
    }

    #[test]
    fn variants_render_sorted() {
        let node = Node::protein("HGNC", "AKT1")
            .with_variant(Variant::ProteinModification {
                name: "Ph".into(),
                code: Some("Thr".into()),
                position: Some(308),
            })
            .with_variant(Variant::ProteinModification {
                name: "Ph".into(),
                code: Some("Ser".into()),
                position: Some(473),
            });
        assert_eq!(
            node.as_bel(),
            "p(HGNC:AKT1, pmod(Ph, Ser, 473), pmod(Ph, Thr, 308))"
        );
        assert!(node.is_composite());
    }

    #[test]
    fn complex_members_are_order_independent() {
        let a = Node::complex(vec![Node::protein("HGNC", "B"), Node::protein("HGNC", "A")]);
        let b = Node::complex(vec![Node::protein("HGNC", "A"), Node::protein("HGNC", "B")]);
        assert_eq!(a.as_bel(), "complex(p(HGNC:A), p(HGNC:B))");
        assert_eq!(a, b);
        assert_eq!(a.signature(), b.signature());
    }

    #[test]
    fn reaction_and_fusion() {
        let rxn = Node::reaction(
            vec![Node::abundance("CHEBI", "ATP")],
            vec![Node::abundance("CHEBI", "ADP")],
        );
        assert_eq!(rxn.as_bel(), "rxn(reactants(a(CHEBI:ATP)), products(a(CHEBI:ADP)))");

        let fusion = Node::fusion(
            Function::Protein,
            Entity::new("HGNC", "BCR"),
            Entity::new("HGNC", "JAK2"),
        );
        assert_eq!(fusion.as_bel(), "p(fus(HGNC:BCR, \"?\", HGNC:JAK2, \"?\"))");
        assert!(fusion.gene_parent().is_none());
    }

    #[test]
    fn fragment_and_hgvs() {
        let frag = Node::protein("HGNC", "APP").with_variant(Variant::Fragment {
            start: Some("672".into()),
            stop: Some("713".into()),
        });
        assert_eq!(frag.as_bel(), "p(HGNC:APP, frag(\"672_713\"))");

        let unknown = Node::protein("HGNC", "APP").with_variant(Variant::Fragment {
            start: None,
            stop: None,
        });
        assert_eq!(unknown.as_bel(), "p(HGNC:APP, frag(\"?\"))");

        let hgvs = Node::gene("HGNC", "CFTR").with_variant(Variant::Hgvs("c.1521_1523delCTT".into()));
        assert_eq!(hgvs.as_bel(), "g(HGNC:CFTR, var(\"c.1521_1523delCTT\"))");
    }

    #[test]
    fn identity_ignores_identifier_field_in_ordering() {
        let a = Node::protein("HGNC", "AKT1");
        let b = Node::protein("HGNC", "AKT1").with_identifier("391");
        // the identifier is carried but not part of the canonical string
        assert_eq!(a, b);
    }

    #[test]
    fn gene_parent_mapping() {
        let protein = Node::protein("HGNC", "TP53").with_variant(Variant::Hgvs("p.Arg175His".into()));
        assert_eq!(protein.gene_parent().unwrap().as_bel(), "g(HGNC:TP53)");
        assert_eq!(Node::rna("HGNC", "TP53").gene_parent().unwrap().as_bel(), "g(HGNC:TP53)");
        assert!(Node::gene("HGNC", "TP53").gene_parent().is_none());
        assert!(Node::abundance("CHEBI", "water").gene_parent().is_none());
        assert!(Node::complex(vec![Node::protein("HGNC", "A")]).gene_parent().is_none());
    }

    #[test]
    fn molecular_abundance_classification() {
        assert!(Node::protein("HGNC", "A").is_molecular_abundance());
        assert!(Node::abundance("CHEBI", "water").is_molecular_abundance());
        assert!(!Node::biological_process("GO", "x").is_molecular_abundance());
        assert!(!Node::complex(vec![Node::protein("HGNC", "A")]).is_molecular_abundance());
    }

    #[test]
    fn quoting_escapes() {
        assert_eq!(quote("a\"b"), "\"a\\\"b\"");
        assert_eq!(quote("plain_name1"), "plain_name1");
        assert_eq!(quote("a\tb\nc"), "\"a\\tb\\nc\"");
    }

    #[test]
    fn absorb_fills_missing_identifier() {
        let mut bare = Node::protein("HGNC", "AKT1");
        bare.absorb(&Node::protein("HGNC", "AKT1").with_identifier("391"));
        assert_eq!(bare.entity.as_ref().unwrap().identifier.as_deref(), Some("391"));

        let mut known = Node::protein("HGNC", "AKT1").with_identifier("391");
        known.absorb(&Node::protein("HGNC", "AKT1").with_identifier("999"));
        assert_eq!(known.entity.as_ref().unwrap().identifier.as_deref(), Some("391"));

        let mut complex = Node::complex(vec![Node::protein("HGNC", "A")]);
        complex.absorb(&Node::complex(vec![Node::protein("HGNC", "A").with_identifier("1")]));
        assert_eq!(complex.members[0].entity.as_ref().unwrap().identifier.as_deref(), Some("1"));
    }
}
