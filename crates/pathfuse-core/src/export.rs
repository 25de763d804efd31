//! Rendering a [`PathwayGraph`] into its download formats.
//!
//! [`export`] is the single entry point; it dispatches on [`ExportFormat`]
//! and returns a [`Payload`] that tells the transport layer how to send the
//! result (inline JSON, inline text, or a named attachment).
//!
//! All renderings are deterministic: nodes are ordered by canonical string
//! and edges by statement, so the same merged graph always exports to the
//! same bytes regardless of merge order.

use std::collections::BTreeMap;
use std::fmt;
use std::io::Cursor;
use std::str::FromStr;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use serde_json::{json, Map, Value};

use crate::codec;
use crate::edge::{EdgeData, Relation};
use crate::error::CoreError;
use crate::graph::{EdgeView, PathwayGraph};
use crate::node::{Node, Variant};

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Json,
    Bytes,
    Bel,
    GraphMl,
    Csv,
}

impl ExportFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Bytes => "bytes",
            ExportFormat::Bel => "bel",
            ExportFormat::GraphMl => "graphml",
            ExportFormat::Csv => "csv",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(ExportFormat::Json),
            "bytes" => Ok(ExportFormat::Bytes),
            "bel" => Ok(ExportFormat::Bel),
            "graphml" => Ok(ExportFormat::GraphMl),
            "csv" => Ok(ExportFormat::Csv),
            other => Err(CoreError::UnsupportedFormat {
                format: other.to_string(),
            }),
        }
    }
}

/// A rendered graph plus the information needed to deliver it.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(Value),
    Text {
        media_type: &'static str,
        body: String,
    },
    Attachment {
        media_type: &'static str,
        file_name: &'static str,
        body: Vec<u8>,
    },
}

/// Renders `graph` in `format`.
pub fn export(graph: &PathwayGraph, format: ExportFormat) -> Result<Payload, CoreError> {
    match format {
        ExportFormat::Json => Ok(Payload::Json(to_json(graph))),
        ExportFormat::Bytes => Ok(Payload::Attachment {
            media_type: "application/octet-stream",
            file_name: "graph.bin",
            body: codec::dump(graph)?,
        }),
        ExportFormat::Bel => Ok(Payload::Text {
            media_type: "text/plain",
            body: to_bel(graph),
        }),
        ExportFormat::GraphMl => Ok(Payload::Attachment {
            media_type: "text/xml",
            file_name: "graph.graphml",
            body: to_graphml(graph)?,
        }),
        ExportFormat::Csv => Ok(Payload::Attachment {
            media_type: "text/tab-separated-values",
            file_name: "graph.tsv",
            body: to_tsv(graph)?,
        }),
    }
}

/// Edges sorted by statement, then by payload.
fn sorted_edges(graph: &PathwayGraph) -> Vec<EdgeView<'_>> {
    let mut edges: Vec<EdgeView<'_>> = graph.edges().collect();
    edges.sort_by_cached_key(|edge| (edge.statement(), edge.data.canonical_bytes()));
    edges
}

// ---------------------------------------------------------------------------
// JSON
// ---------------------------------------------------------------------------

/// The node-link JSON consumed by the network explorer.
pub fn to_json(graph: &PathwayGraph) -> Value {
    let nodes = graph.sorted_nodes();
    let position: BTreeMap<String, usize> = nodes
        .iter()
        .enumerate()
        .map(|(i, node)| (node.as_bel(), i))
        .collect();

    let node_values: Vec<Value> = nodes
        .iter()
        .enumerate()
        .map(|(i, node)| node_json(i, node))
        .collect();

    struct Link {
        relation: Option<Relation>,
        contexts: Vec<Value>,
    }

    let mut links: BTreeMap<(usize, usize), Link> = BTreeMap::new();
    for edge in sorted_edges(graph) {
        let mut source = position[&edge.subject.as_bel()];
        let mut target = position[&edge.object.as_bel()];
        if edge.data.relation.is_two_way() && source > target {
            std::mem::swap(&mut source, &mut target);
        }
        let link = links.entry((source, target)).or_insert_with(|| Link {
            relation: None,
            contexts: Vec::new(),
        });
        if let Some(relation) = edge.data.relation.normalized() {
            link.relation = Some(relation);
        }
        link.contexts.push(context_json(&edge.statement(), edge.data));
    }

    let link_values: Vec<Value> = links
        .into_iter()
        .map(|((source, target), link)| {
            let mut object = Map::new();
            object.insert("source".into(), json!(source));
            object.insert("target".into(), json!(target));
            if let Some(relation) = link.relation {
                object.insert("relation".into(), json!(relation));
            }
            object.insert("contexts".into(), Value::Array(link.contexts));
            Value::Object(object)
        })
        .collect();

    json!({ "nodes": node_values, "links": link_values })
}

fn node_json(position: usize, node: &Node) -> Value {
    let bel = node.as_bel();
    let mut object = Map::new();
    object.insert("id".into(), json!(position));
    object.insert("signature".into(), json!(node.signature()));
    object.insert("bel".into(), json!(bel));
    if node.is_composite() {
        object.insert("cname".into(), json!(bel));
    }
    object.insert("function".into(), json!(node.function.label()));
    if let Some(entity) = &node.entity {
        object.insert("namespace".into(), json!(entity.namespace));
        object.insert("name".into(), json!(entity.name));
        if let Some(identifier) = &entity.identifier {
            object.insert("identifier".into(), json!(identifier));
        }
    }
    if !node.variants.is_empty() {
        let mut variants: Vec<String> = node.variants.iter().map(Variant::as_bel).collect();
        variants.sort();
        object.insert("variants".into(), json!(variants));
    }
    for (key, list) in [
        ("members", &node.members),
        ("reactants", &node.reactants),
        ("products", &node.products),
    ] {
        if !list.is_empty() {
            let mut rendered: Vec<String> = list.iter().map(Node::as_bel).collect();
            rendered.sort();
            object.insert(key.into(), json!(rendered));
        }
    }
    Value::Object(object)
}

fn context_json(statement: &str, data: &EdgeData) -> Value {
    let mut object = Map::new();
    object.insert("bel".into(), json!(statement));
    object.insert("relation".into(), json!(data.relation));
    if let Some(citation) = &data.citation {
        object.insert("citation".into(), json!(citation));
    }
    if let Some(evidence) = &data.evidence {
        object.insert("evidence".into(), json!(evidence));
    }
    if let Some(annotations) = &data.annotations {
        object.insert("annotations".into(), json!(annotations));
    }
    Value::Object(object)
}

// ---------------------------------------------------------------------------
// BEL script
// ---------------------------------------------------------------------------

fn bel_quote(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Annotation keys are bare words unless they contain other characters.
fn bel_key(key: &str) -> String {
    if !key.is_empty() && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        key.to_string()
    } else {
        bel_quote(key)
    }
}

/// A BEL script: document header, then one statement group per edge.
pub fn to_bel(graph: &PathwayGraph) -> String {
    let metadata = &graph.metadata;
    let mut lines = vec![
        format!("SET DOCUMENT Name = {}", bel_quote(&metadata.name)),
        format!("SET DOCUMENT Version = {}", bel_quote(&metadata.version)),
    ];
    if let Some(authors) = &metadata.authors {
        lines.push(format!("SET DOCUMENT Authors = {}", bel_quote(authors)));
    }
    if let Some(contact) = &metadata.contact {
        lines.push(format!("SET DOCUMENT ContactInfo = {}", bel_quote(contact)));
    }
    if let Some(description) = &metadata.description {
        lines.push(format!("SET DOCUMENT Description = {}", bel_quote(description)));
    }

    for edge in sorted_edges(graph) {
        lines.push(String::new());
        if let Some(citation) = &edge.data.citation {
            lines.push(format!(
                "SET Citation = {{{}, {}}}",
                bel_quote(&citation.db),
                bel_quote(&citation.reference)
            ));
        }
        if let Some(evidence) = &edge.data.evidence {
            lines.push(format!("SET SupportingText = {}", bel_quote(evidence)));
        }
        if let Some(annotations) = &edge.data.annotations {
            for (key, values) in annotations {
                let values: Vec<String> = values.iter().map(|v| bel_quote(v)).collect();
                lines.push(format!("SET {} = {{{}}}", bel_key(key), values.join(", ")));
            }
        }
        lines.push(edge.statement());
        lines.push("UNSET ALL".to_string());
    }

    let mut script = lines.join("\n");
    script.push('\n');
    script
}

// ---------------------------------------------------------------------------
// GraphML
// ---------------------------------------------------------------------------

const GRAPHML_NODE_KEYS: [&str; 4] = ["bel", "function", "namespace", "name"];
const GRAPHML_EDGE_KEYS: [&str; 3] = ["relation", "evidence", "annotations"];

/// GraphML document with node and edge attributes as `<data>` elements.
pub fn to_graphml(graph: &PathwayGraph) -> Result<Vec<u8>, CoreError> {
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
    write_graphml(&mut writer, graph).map_err(|reason| CoreError::Export { reason })?;
    Ok(writer.into_inner().into_inner())
}

fn write_graphml(writer: &mut Writer<Cursor<Vec<u8>>>, graph: &PathwayGraph) -> Result<(), String> {
    fn emit(writer: &mut Writer<Cursor<Vec<u8>>>, event: Event<'_>) -> Result<(), String> {
        writer.write_event(event).map_err(|e| e.to_string())
    }

    fn data(writer: &mut Writer<Cursor<Vec<u8>>>, key: &str, value: &str) -> Result<(), String> {
        emit(
            writer,
            Event::Start(BytesStart::new("data").with_attributes([("key", key)])),
        )?;
        emit(writer, Event::Text(BytesText::new(value)))?;
        emit(writer, Event::End(BytesEnd::new("data")))
    }

    emit(writer, Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    emit(
        writer,
        Event::Start(
            BytesStart::new("graphml")
                .with_attributes([("xmlns", "http://graphml.graphdrawing.org/xmlns")]),
        ),
    )?;
    for (domain, keys) in [("node", &GRAPHML_NODE_KEYS[..]), ("edge", &GRAPHML_EDGE_KEYS[..])] {
        for key in keys {
            emit(
                writer,
                Event::Empty(BytesStart::new("key").with_attributes([
                    ("id", *key),
                    ("for", domain),
                    ("attr.name", *key),
                    ("attr.type", "string"),
                ])),
            )?;
        }
    }
    emit(
        writer,
        Event::Start(
            BytesStart::new("graph").with_attributes([("id", "G"), ("edgedefault", "directed")]),
        ),
    )?;

    let nodes = graph.sorted_nodes();
    let position: BTreeMap<String, usize> = nodes
        .iter()
        .enumerate()
        .map(|(i, node)| (node.as_bel(), i))
        .collect();

    for (i, node) in nodes.iter().enumerate() {
        let id = format!("n{}", i);
        emit(
            writer,
            Event::Start(BytesStart::new("node").with_attributes([("id", id.as_str())])),
        )?;
        data(writer, "bel", &node.as_bel())?;
        data(writer, "function", node.function.label())?;
        if let Some(entity) = &node.entity {
            data(writer, "namespace", &entity.namespace)?;
            data(writer, "name", &entity.name)?;
        }
        emit(writer, Event::End(BytesEnd::new("node")))?;
    }

    for (i, edge) in sorted_edges(graph).into_iter().enumerate() {
        let id = format!("e{}", i);
        let source = format!("n{}", position[&edge.subject.as_bel()]);
        let target = format!("n{}", position[&edge.object.as_bel()]);
        emit(
            writer,
            Event::Start(BytesStart::new("edge").with_attributes([
                ("id", id.as_str()),
                ("source", source.as_str()),
                ("target", target.as_str()),
            ])),
        )?;
        data(writer, "relation", edge.data.relation.as_str())?;
        if let Some(evidence) = &edge.data.evidence {
            data(writer, "evidence", evidence)?;
        }
        if let Some(annotations) = &edge.data.annotations {
            let rendered = serde_json::to_string(annotations).map_err(|e| e.to_string())?;
            data(writer, "annotations", &rendered)?;
        }
        emit(writer, Event::End(BytesEnd::new("edge")))?;
    }

    emit(writer, Event::End(BytesEnd::new("graph")))?;
    emit(writer, Event::End(BytesEnd::new("graphml")))
}

// ---------------------------------------------------------------------------
// TSV triplets
// ---------------------------------------------------------------------------

fn export_error(e: impl fmt::Display) -> CoreError {
    CoreError::Export {
        reason: e.to_string(),
    }
}

/// One tab-separated row per edge: subject, relation, object, data JSON.
pub fn to_tsv(graph: &PathwayGraph) -> Result<Vec<u8>, CoreError> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .quote_style(csv::QuoteStyle::Never)
        .from_writer(Vec::new());
    for edge in sorted_edges(graph) {
        let data = serde_json::to_string(edge.data).map_err(export_error)?;
        writer
            .write_record([
                edge.subject.as_bel().as_str(),
                edge.data.relation.as_str(),
                edge.object.as_bel().as_str(),
                data.as_str(),
            ])
            .map_err(export_error)?;
    }
    writer.into_inner().map_err(export_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphMetadata;

    fn p(name: &str) -> Node {
        Node::protein("HGNC", name)
    }

    fn sample() -> PathwayGraph {
        let mut graph = PathwayGraph::with_metadata(GraphMetadata::new("Sample", "1.0.0"));
        graph.add_edge(
            p("A"),
            p("B"),
            EdgeData::new(Relation::DirectlyIncreases)
                .with_citation("PubMed", "123")
                .with_evidence("A activates B")
                .with_annotation("Database", "kegg"),
        );
        graph.add_edge(p("B"), p("C"), EdgeData::new(Relation::Decreases));
        graph
    }

    #[test]
    fn format_parsing() {
        assert_eq!("graphml".parse::<ExportFormat>().unwrap(), ExportFormat::GraphMl);
        assert_eq!("csv".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        let err = "xlsx".parse::<ExportFormat>().unwrap_err();
        assert!(matches!(err, CoreError::UnsupportedFormat { ref format } if format == "xlsx"));
    }

    #[test]
    fn json_nodes_are_sorted_with_positions() {
        let value = to_json(&sample());
        let nodes = value["nodes"].as_array().unwrap();
        let bels: Vec<&str> = nodes.iter().map(|n| n["bel"].as_str().unwrap()).collect();
        assert_eq!(bels, vec!["p(HGNC:A)", "p(HGNC:B)", "p(HGNC:C)"]);
        assert_eq!(nodes[1]["id"], json!(1));
        assert_eq!(nodes[0]["namespace"], json!("HGNC"));
        assert!(nodes[0].get("cname").is_none());
    }

    #[test]
    fn json_composite_nodes_get_cname() {
        let mut graph = PathwayGraph::new();
        graph.add_node(Node::complex(vec![p("A"), p("B")]));
        let value = to_json(&graph);
        let node = &value["nodes"][0];
        assert_eq!(node["cname"], node["bel"]);
        assert_eq!(node["members"], json!(["p(HGNC:A)", "p(HGNC:B)"]));
    }

    #[test]
    fn json_links_normalize_causal_relations() {
        let value = to_json(&sample());
        let links = value["links"].as_array().unwrap();
        assert_eq!(links.len(), 2);
        assert_eq!(links[0]["source"], json!(0));
        assert_eq!(links[0]["target"], json!(1));
        assert_eq!(links[0]["relation"], json!("increases"));
        let context = &links[0]["contexts"][0];
        assert_eq!(context["bel"], json!("p(HGNC:A) directlyIncreases p(HGNC:B)"));
        assert_eq!(context["citation"]["reference"], json!("123"));
        assert_eq!(context["annotations"]["Database"], json!(["kegg"]));
        assert_eq!(links[1]["relation"], json!("decreases"));
    }

    #[test]
    fn json_two_way_edges_fold_into_one_link() {
        for reverse_first in [false, true] {
            let mut graph = PathwayGraph::new();
            let forward = (p("P"), p("Q"));
            let backward = (p("Q"), p("P"));
            let (first, second) = if reverse_first {
                (backward, forward)
            } else {
                (forward, backward)
            };
            graph.add_edge(first.0, first.1, EdgeData::new(Relation::Association));
            graph.add_edge(second.0, second.1, EdgeData::new(Relation::Association));

            let value = to_json(&graph);
            let links = value["links"].as_array().unwrap();
            assert_eq!(links.len(), 1);
            assert_eq!(links[0]["source"], json!(0));
            assert_eq!(links[0]["target"], json!(1));
            assert_eq!(links[0]["contexts"].as_array().unwrap().len(), 2);
            assert!(links[0].get("relation").is_none());
        }
    }

    #[test]
    fn one_way_edges_keep_direction() {
        let mut graph = PathwayGraph::new();
        graph.add_edge(p("Q"), p("P"), EdgeData::new(Relation::Increases));
        graph.add_edge(p("P"), p("Q"), EdgeData::new(Relation::Increases));
        let value = to_json(&graph);
        assert_eq!(value["links"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn bel_script_layout() {
        let script = to_bel(&sample());
        let lines: Vec<&str> = script.lines().collect();
        assert_eq!(lines[0], "SET DOCUMENT Name = \"Sample\"");
        assert_eq!(lines[1], "SET DOCUMENT Version = \"1.0.0\"");
        assert!(script.contains("SET Citation = {\"PubMed\", \"123\"}"));
        assert!(script.contains("SET SupportingText = \"A activates B\""));
        assert!(script.contains("SET Database = {\"kegg\"}"));
        assert!(script.contains("p(HGNC:A) directlyIncreases p(HGNC:B)\nUNSET ALL"));
        assert_eq!(script.matches("UNSET ALL").count(), 2);
    }

    #[test]
    fn graphml_contains_nodes_and_edges() {
        let body = to_graphml(&sample()).unwrap();
        let text = String::from_utf8(body).unwrap();
        assert!(text.starts_with("<?xml"));
        assert_eq!(text.matches("<node ").count(), 3);
        assert_eq!(text.matches("<edge ").count(), 2);
        assert!(text.contains("directlyIncreases"));
        assert!(text.contains("p(HGNC:A)"));
    }

    #[test]
    fn tsv_rows() {
        let body = to_tsv(&sample()).unwrap();
        let text = String::from_utf8(body).unwrap();
        let rows: Vec<&str> = text.lines().collect();
        assert_eq!(rows.len(), 2);
        let fields: Vec<&str> = rows[0].split('\t').collect();
        assert_eq!(fields[0], "p(HGNC:A)");
        assert_eq!(fields[1], "directlyIncreases");
        assert_eq!(fields[2], "p(HGNC:B)");
        let data: Value = serde_json::from_str(fields[3]).unwrap();
        assert_eq!(data["relation"], json!("directlyIncreases"));
    }

    #[test]
    fn tsv_keeps_one_row_per_edge_with_control_characters() {
        let mut graph = PathwayGraph::new();
        graph.add_edge(
            Node::protein("HGNC", "odd\tname"),
            Node::abundance("CHEBI", "line\nbreak"),
            EdgeData::new(Relation::Increases).with_evidence("two\nlines"),
        );
        let text = String::from_utf8(to_tsv(&graph).unwrap()).unwrap();
        let rows: Vec<&str> = text.lines().collect();
        assert_eq!(rows.len(), 1);
        let fields: Vec<&str> = rows[0].split('\t').collect();
        assert_eq!(fields.len(), 4);
        assert_eq!(fields[0], "p(HGNC:\"odd\\tname\")");
        assert_eq!(fields[2], "a(CHEBI:\"line\\nbreak\")");
    }

    #[test]
    fn export_payload_kinds() {
        let graph = sample();
        assert!(matches!(export(&graph, ExportFormat::Json).unwrap(), Payload::Json(_)));
        match export(&graph, ExportFormat::Bytes).unwrap() {
            Payload::Attachment { file_name, body, .. } => {
                assert_eq!(file_name, "graph.bin");
                assert!(codec::load(&body).unwrap().structurally_equal(&graph));
            }
            other => panic!("expected attachment, got {:?}", other),
        }
        assert!(matches!(
            export(&graph, ExportFormat::Bel).unwrap(),
            Payload::Text { media_type: "text/plain", .. }
        ));
        assert!(matches!(
            export(&graph, ExportFormat::Csv).unwrap(),
            Payload::Attachment { file_name: "graph.tsv", .. }
        ));
    }
}
