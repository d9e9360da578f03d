//! RDF/XML export
//!
//! Maps plain (sentinel-free, unfiltered) triples to URI statements under a
//! base URI and serializes them as RDF/XML, one `rdf:Description` per
//! subject.

use crate::core::{convert_table, RowConverter};
use crate::delimited::file_safe;
use crate::error::{GraphError, GraphResult};
use crate::types::{ConversionMode, RaterTable, TripleTable};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::Writer;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub const DEFAULT_BASE_URI: &str = "https://interpolar.com/";

const RDF_NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";

/// Subject, predicate and object URIs
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Statement {
    pub subject: String,
    pub predicate: String,
    pub object: String,
}

/// Statement set in first-insertion order
#[derive(Debug, Clone, Default)]
pub struct RdfGraph {
    statements: Vec<Statement>,
    seen: HashSet<Statement>,
}

impl RdfGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map every triple to `base + name` URIs
    pub fn from_triples(table: &TripleTable, base_uri: &str) -> Self {
        let mut graph = Self::new();
        for triple in table.iter() {
            graph.add(Statement {
                subject: format!("{}{}", base_uri, triple.source),
                predicate: format!("{}{}", base_uri, triple.edge),
                object: format!("{}{}", base_uri, triple.target),
            });
        }
        graph
    }

    /// Add a statement; returns false if it was already present
    pub fn add(&mut self, statement: Statement) -> bool {
        if !self.seen.insert(statement.clone()) {
            return false;
        }
        self.statements.push(statement);
        true
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Statement> {
        self.statements.iter()
    }

    /// Serialize as RDF/XML
    pub fn to_xml(&self) -> GraphResult<String> {
        // predicate namespaces get ns1, ns2, ... in first-seen order
        let mut prefixes: Vec<(String, String)> = Vec::new();
        let mut predicates: Vec<(String, &str)> = Vec::with_capacity(self.statements.len());
        for statement in &self.statements {
            let (namespace, local) = split_uri(&statement.predicate)?;
            let prefix = if namespace == RDF_NS {
                "rdf".to_string()
            } else if let Some((_, prefix)) = prefixes.iter().find(|(ns, _)| ns == namespace) {
                prefix.clone()
            } else {
                let prefix = format!("ns{}", prefixes.len() + 1);
                prefixes.push((namespace.to_string(), prefix.clone()));
                prefix
            };
            predicates.push((format!("{}:{}", prefix, local), statement.object.as_str()));
        }

        // group statements by subject, subjects in first-seen order
        let mut subjects: Vec<&str> = Vec::new();
        let mut by_subject: HashMap<&str, Vec<usize>> = HashMap::new();
        for (idx, statement) in self.statements.iter().enumerate() {
            let entry = by_subject.entry(statement.subject.as_str()).or_default();
            if entry.is_empty() {
                subjects.push(statement.subject.as_str());
            }
            entry.push(idx);
        }

        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
            .map_err(xml_err)?;

        let mut root = BytesStart::new("rdf:RDF");
        for (namespace, prefix) in &prefixes {
            let attr = format!("xmlns:{}", prefix);
            root.push_attribute((attr.as_str(), namespace.as_str()));
        }
        root.push_attribute(("xmlns:rdf", RDF_NS));
        writer.write_event(Event::Start(root)).map_err(xml_err)?;

        for subject in subjects {
            let mut description = BytesStart::new("rdf:Description");
            description.push_attribute(("rdf:about", subject));
            writer.write_event(Event::Start(description)).map_err(xml_err)?;
            for idx in &by_subject[subject] {
                let (element, object) = &predicates[*idx];
                let mut property = BytesStart::new(element.as_str());
                property.push_attribute(("rdf:resource", *object));
                writer.write_event(Event::Empty(property)).map_err(xml_err)?;
            }
            writer
                .write_event(Event::End(BytesEnd::new("rdf:Description")))
                .map_err(xml_err)?;
        }

        writer
            .write_event(Event::End(BytesEnd::new("rdf:RDF")))
            .map_err(xml_err)?;

        let mut xml = String::from_utf8(writer.into_inner())
            .map_err(|e| GraphError::Export(format!("RDF/XML is not UTF-8: {}", e)))?;
        xml.push('\n');
        Ok(xml)
    }

    pub fn write(&self, path: &Path) -> GraphResult<()> {
        fs::write(path, self.to_xml()?)?;
        info!(path = %path.display(), statements = self.len(), "wrote rdf/xml");
        Ok(())
    }
}

fn xml_err<E: std::fmt::Display>(e: E) -> GraphError {
    GraphError::Export(format!("Failed to write RDF/XML: {}", e))
}

/// Build the statement graph of one rater table: normalized cells, no
/// sentinels, no EPA filtering
pub fn rater_graph(table: &RaterTable, base_uri: &str) -> GraphResult<RdfGraph> {
    let converter = RowConverter::for_mode(ConversionMode::Plain, None)?;
    let triples = convert_table(&converter, table);
    Ok(RdfGraph::from_triples(&triples, base_uri))
}

/// Write `<label>.rdf` per rater table into `dir`
pub fn write_rater_graphs(dir: &Path, tables: &[RaterTable], base_uri: &str) -> GraphResult<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;
    let mut written = Vec::with_capacity(tables.len());
    for table in tables {
        let graph = rater_graph(table, base_uri)?;
        let path = dir.join(format!("{}.rdf", file_safe(&table.label)));
        graph.write(&path)?;
        written.push(path);
    }
    Ok(written)
}

/// Split a predicate URI into namespace and local name at the last `#` or `/`
pub fn split_uri(uri: &str) -> GraphResult<(&str, &str)> {
    let cut = uri
        .rfind(|c: char| c == '#' || c == '/')
        .map(|i| i + 1)
        .unwrap_or(0);
    let (namespace, local) = uri.split_at(cut);
    if namespace.is_empty() || !is_xml_name(local) {
        return Err(GraphError::Rdf(format!(
            "'{}' cannot be written as an RDF/XML property element",
            uri
        )));
    }
    Ok((namespace, local))
}

/// XML NCName check (no colons)
fn is_xml_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph() -> RdfGraph {
        let table = RaterTable::from_rows(
            "P1",
            &[vec!["Take History", "needs", "Labs;Vitals"], vec!["Labs", "informs", "Physician"]],
        );
        rater_graph(&table, DEFAULT_BASE_URI).unwrap()
    }

    #[test]
    fn test_rater_graph_statements() {
        let graph = graph();
        assert_eq!(graph.len(), 3);
        let first = graph.iter().next().unwrap();
        assert_eq!(first.subject, "https://interpolar.com/TakeHistory");
        assert_eq!(first.predicate, "https://interpolar.com/needs");
        assert_eq!(first.object, "https://interpolar.com/Labs");
    }

    #[test]
    fn test_duplicates_collapse() {
        let table = RaterTable::from_rows("P1", &[vec!["A", "x", "B"], vec!["A", "x", "B"]]);
        assert_eq!(rater_graph(&table, DEFAULT_BASE_URI).unwrap().len(), 1);
    }

    #[test]
    fn test_xml_layout() {
        let xml = graph().to_xml().unwrap();
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>"));
        assert!(xml.contains("xmlns:ns1=\"https://interpolar.com/\""));
        assert!(xml.contains("<rdf:Description rdf:about=\"https://interpolar.com/TakeHistory\">"));
        assert!(xml.contains("<ns1:needs rdf:resource=\"https://interpolar.com/Vitals\"/>"));
        assert_eq!(xml.matches("<rdf:Description ").count(), 2);
        assert!(xml.trim_end().ends_with("</rdf:RDF>"));
    }

    #[test]
    fn test_attribute_escaping() {
        let mut graph = RdfGraph::new();
        graph.add(Statement {
            subject: "https://interpolar.com/A&B".to_string(),
            predicate: "https://interpolar.com/x".to_string(),
            object: "https://interpolar.com/\"C\"".to_string(),
        });
        let xml = graph.to_xml().unwrap();
        assert!(xml.contains("A&amp;B"));
        assert!(xml.contains("&quot;C&quot;"));
    }

    #[test]
    fn test_split_uri() {
        assert_eq!(
            split_uri("https://interpolar.com/needs").unwrap(),
            ("https://interpolar.com/", "needs")
        );
        assert_eq!(
            split_uri("http://example.org/ns#hasOutcome").unwrap(),
            ("http://example.org/ns#", "hasOutcome")
        );
        assert!(matches!(split_uri("https://interpolar.com/1st"), Err(GraphError::Rdf(_))));
        assert!(split_uri("needs").is_err());
    }

    #[test]
    fn test_is_xml_name() {
        assert!(is_xml_name("needsRequestOf"));
        assert!(is_xml_name("_x-1.2"));
        assert!(!is_xml_name(""));
        assert!(!is_xml_name("0"));
        assert!(!is_xml_name("a;b"));
    }
}
