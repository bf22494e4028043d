//! GEXF 1.2 persistence for citation graphs
//!
//! Node attributes are declared as `string` columns in first-seen order.
//! Every node is written with `id` and `label` equal to its pmid.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

use pubnet_core::{AtomicFile, PipelineError};
use pubnet_pubmed::Pmid;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};
use rustc_hash::FxHashMap;

use crate::assemble::{CitationGraph, NodeAttributes};
use crate::convert::LABEL_ATTRIBUTE;

const GEXF_NAMESPACE: &str = "http://www.gexf.net/1.2draft";

/// Write `graph` to `path` through a tmp file
pub fn write_gexf(graph: &CitationGraph, path: &Path) -> io::Result<()> {
    let mut columns: Vec<&str> = Vec::new();
    for pmid in graph.nodes() {
        for (key, _) in graph.attributes(pmid) {
            if key != LABEL_ATTRIBUTE && !columns.contains(&key.as_str()) {
                columns.push(key);
            }
        }
    }
    let column_ids: FxHashMap<&str, String> = columns
        .iter()
        .enumerate()
        .map(|(i, name)| (*name, i.to_string()))
        .collect();

    let mut writer = Writer::new_with_indent(AtomicFile::create(path)?, b' ', 2);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(Event::Start(
        BytesStart::new("gexf").with_attributes([("xmlns", GEXF_NAMESPACE), ("version", "1.2")]),
    ))?;
    writer.write_event(Event::Start(
        BytesStart::new("graph").with_attributes([("defaultedgetype", "directed"), ("mode", "static")]),
    ))?;

    writer.write_event(Event::Start(
        BytesStart::new("attributes").with_attributes([("class", "node"), ("mode", "static")]),
    ))?;
    for (i, name) in columns.iter().enumerate() {
        let id = i.to_string();
        writer.write_event(Event::Empty(BytesStart::new("attribute").with_attributes([
            ("id", id.as_str()),
            ("title", *name),
            ("type", "string"),
        ])))?;
    }
    writer.write_event(Event::End(BytesEnd::new("attributes")))?;

    writer.write_event(Event::Start(BytesStart::new("nodes")))?;
    for pmid in graph.nodes() {
        let id = pmid.to_string();
        let label = graph.attribute(pmid, LABEL_ATTRIBUTE).unwrap_or(&id);
        let node = BytesStart::new("node").with_attributes([("id", id.as_str()), ("label", label)]);

        let values: Vec<&(String, String)> = graph
            .attributes(pmid)
            .iter()
            .filter(|(key, _)| key != LABEL_ATTRIBUTE)
            .collect();
        if values.is_empty() {
            writer.write_event(Event::Empty(node))?;
            continue;
        }

        writer.write_event(Event::Start(node))?;
        writer.write_event(Event::Start(BytesStart::new("attvalues")))?;
        for (key, value) in values {
            let column = column_ids.get(key.as_str()).map_or("", String::as_str);
            writer.write_event(Event::Empty(
                BytesStart::new("attvalue").with_attributes([("for", column), ("value", value.as_str())]),
            ))?;
        }
        writer.write_event(Event::End(BytesEnd::new("attvalues")))?;
        writer.write_event(Event::End(BytesEnd::new("node")))?;
    }
    writer.write_event(Event::End(BytesEnd::new("nodes")))?;

    writer.write_event(Event::Start(BytesStart::new("edges")))?;
    for (i, (source, target)) in graph.edges().enumerate() {
        let (id, source, target) = (i.to_string(), source.to_string(), target.to_string());
        writer.write_event(Event::Empty(BytesStart::new("edge").with_attributes([
            ("id", id.as_str()),
            ("source", source.as_str()),
            ("target", target.as_str()),
        ])))?;
    }
    writer.write_event(Event::End(BytesEnd::new("edges")))?;

    writer.write_event(Event::End(BytesEnd::new("graph")))?;
    writer.write_event(Event::End(BytesEnd::new("gexf")))?;

    writer.into_inner().finalize()?;
    log::info!(
        "Saved graph ({} nodes, {} edges) to {}",
        graph.node_count(),
        graph.edge_count(),
        path.display()
    );
    Ok(())
}

fn attr(e: &BytesStart<'_>, key: &[u8]) -> Result<Option<String>, quick_xml::Error> {
    for attribute in e.attributes() {
        let attribute = attribute.map_err(quick_xml::Error::from)?;
        if attribute.key.as_ref() == key {
            return Ok(Some(attribute.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

fn parse_id(path: &Path, value: Option<String>, what: &str) -> Result<Pmid, PipelineError> {
    let value = value.ok_or_else(|| PipelineError::malformed_input(path, format!("{what} without id")))?;
    value
        .trim()
        .parse()
        .map_err(|_| PipelineError::malformed_input(path, format!("{what} id {value:?} is not a pmid")))
}

/// Node being read: key, label and attribute values so far
struct PendingNode {
    pmid: Pmid,
    label: Option<String>,
    attributes: NodeAttributes,
}

impl PendingNode {
    fn finish(mut self, graph: &mut CitationGraph) {
        graph.add_node(self.pmid);
        if !self.attributes.is_empty() {
            if let Some(label) = self.label.take() {
                self.attributes.push((LABEL_ATTRIBUTE.to_string(), label));
            }
            graph.set_attributes(self.pmid, self.attributes);
        }
    }
}

/// Read a graph written by [`write_gexf`] (or any GEXF with numeric node ids)
pub fn read_gexf(path: &Path) -> Result<CitationGraph, PipelineError> {
    let file = File::open(path)?;
    let mut reader = Reader::from_reader(BufReader::new(file));
    reader.config_mut().trim_text(true);

    let xml_err = |e: quick_xml::Error| PipelineError::malformed_input(path, e);

    let mut graph = CitationGraph::new();
    let mut titles: FxHashMap<String, String> = FxHashMap::default();
    let mut in_node_attributes = false;
    let mut pending: Option<PendingNode> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf).map_err(xml_err)? {
            Event::Start(e) | Event::Empty(e)
                if e.name().as_ref() == b"attributes" =>
            {
                in_node_attributes = attr(&e, b"class").map_err(xml_err)?.as_deref() == Some("node");
            }
            Event::End(e) if e.name().as_ref() == b"attributes" => in_node_attributes = false,
            Event::Start(e) | Event::Empty(e)
                if in_node_attributes && e.name().as_ref() == b"attribute" =>
            {
                let id = attr(&e, b"id").map_err(xml_err)?.unwrap_or_default();
                let title = attr(&e, b"title").map_err(xml_err)?.unwrap_or_else(|| id.clone());
                titles.insert(id, title);
            }
            Event::Start(e) if e.name().as_ref() == b"node" => {
                pending = Some(PendingNode {
                    pmid: parse_id(path, attr(&e, b"id").map_err(xml_err)?, "node")?,
                    label: attr(&e, b"label").map_err(xml_err)?,
                    attributes: Vec::new(),
                });
            }
            Event::Empty(e) if e.name().as_ref() == b"node" => {
                graph.add_node(parse_id(path, attr(&e, b"id").map_err(xml_err)?, "node")?);
            }
            Event::End(e) if e.name().as_ref() == b"node" => {
                if let Some(node) = pending.take() {
                    node.finish(&mut graph);
                }
            }
            Event::Start(e) | Event::Empty(e) if e.name().as_ref() == b"attvalue" => {
                if let Some(node) = pending.as_mut() {
                    let column = attr(&e, b"for").map_err(xml_err)?.unwrap_or_default();
                    let value = attr(&e, b"value").map_err(xml_err)?.unwrap_or_default();
                    let key = titles.get(&column).cloned().unwrap_or(column);
                    node.attributes.push((key, value));
                }
            }
            Event::Start(e) | Event::Empty(e) if e.name().as_ref() == b"edge" => {
                let source = parse_id(path, attr(&e, b"source").map_err(xml_err)?, "edge source")?;
                let target = parse_id(path, attr(&e, b"target").map_err(xml_err)?, "edge target")?;
                graph.add_edge(source, target);
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    log::info!(
        "Loaded graph ({} nodes, {} edges) from {}",
        graph.node_count(),
        graph.edge_count(),
        path.display()
    );
    Ok(graph)
}
