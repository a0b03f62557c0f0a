//! Schema introspection: the label/relationship summary and the textual
//! schema description injected into the Cypher generation prompt.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use cafeqa_core::SchemaSummary;
use serde_json::Value;

use crate::store::Record;

pub const SUMMARY_QUERY: &str = "CALL db.schema.visualization() YIELD nodes, relationships
RETURN [n IN nodes | labels(n)[0]] AS node_labels,
       [r IN relationships | type(r)] AS rel_types";

pub const NODE_PROPERTIES_QUERY: &str = "CALL db.schema.nodeTypeProperties()
YIELD nodeLabels, propertyName, propertyTypes
RETURN nodeLabels, propertyName, propertyTypes";

pub const REL_PROPERTIES_QUERY: &str = "CALL db.schema.relTypeProperties()
YIELD relType, propertyName, propertyTypes
RETURN relType, propertyName, propertyTypes";

pub const PATTERNS_QUERY: &str = "CALL db.schema.visualization() YIELD relationships
UNWIND relationships AS r
RETURN labels(startNode(r))[0] AS start, type(r) AS type, labels(endNode(r))[0] AS end";

/// Build the summary from the rows of [`SUMMARY_QUERY`].
///
/// Only the first row is read; the procedure yields a single row.
pub fn summary_from_rows(rows: &[Record]) -> SchemaSummary {
    let Some(row) = rows.first() else {
        return SchemaSummary::default();
    };
    SchemaSummary::new(strings_in(row.get("node_labels")), strings_in(row.get("rel_types")))
}

/// Properties of one node label or relationship type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertySet {
    pub name: String,
    /// Property name to type, e.g. `nombre -> STRING`.
    pub properties: BTreeMap<String, String>,
}

/// A `(:Start)-[:TYPE]->(:End)` pattern observed in the graph.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct RelationshipPattern {
    pub start: String,
    pub rel_type: String,
    pub end: String,
}

impl fmt::Display for RelationshipPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(:{})-[:{}]->(:{})", self.start, self.rel_type, self.end)
    }
}

/// Schema description of the live graph, recomputed on every question.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphSchema {
    pub node_properties: Vec<PropertySet>,
    pub rel_properties: Vec<PropertySet>,
    pub relationships: Vec<RelationshipPattern>,
}

impl GraphSchema {
    /// Assemble the schema from the rows of the three introspection queries.
    pub fn from_rows(node_rows: &[Record], rel_rows: &[Record], pattern_rows: &[Record]) -> Self {
        let mut nodes: BTreeMap<String, BTreeMap<String, String>> = BTreeMap::new();
        for row in node_rows {
            let property = property_entry(row);
            for label in strings_in(row.get("nodeLabels")) {
                let props = nodes.entry(label).or_default();
                if let Some((name, ty)) = &property {
                    props.insert(name.clone(), ty.clone());
                }
            }
        }

        let mut rels: BTreeMap<String, BTreeMap<String, String>> = BTreeMap::new();
        for row in rel_rows {
            let Some(rel_type) = row.get("relType").and_then(Value::as_str) else {
                continue;
            };
            let props = rels.entry(clean_rel_type(rel_type)).or_default();
            if let Some((name, ty)) = property_entry(row) {
                props.insert(name, ty);
            }
        }

        let relationships: BTreeSet<RelationshipPattern> = pattern_rows
            .iter()
            .filter_map(|row| {
                Some(RelationshipPattern {
                    start: row.get("start")?.as_str()?.to_string(),
                    rel_type: row.get("type")?.as_str()?.to_string(),
                    end: row.get("end")?.as_str()?.to_string(),
                })
            })
            .collect();

        Self {
            node_properties: into_property_sets(nodes),
            rel_properties: into_property_sets(rels),
            relationships: relationships.into_iter().collect(),
        }
    }

    /// Labels and relationship types mentioned anywhere in the schema.
    pub fn summary(&self) -> SchemaSummary {
        let nodes = self
            .node_properties
            .iter()
            .map(|p| p.name.clone())
            .chain(
                self.relationships
                    .iter()
                    .flat_map(|r| [r.start.clone(), r.end.clone()]),
            );
        let rels = self
            .rel_properties
            .iter()
            .map(|p| p.name.clone())
            .chain(self.relationships.iter().map(|r| r.rel_type.clone()));
        SchemaSummary::new(nodes, rels)
    }

    pub fn is_empty(&self) -> bool {
        self.node_properties.is_empty()
            && self.rel_properties.is_empty()
            && self.relationships.is_empty()
    }
}

impl fmt::Display for GraphSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Node properties:")?;
        for set in &self.node_properties {
            writeln!(f, "{}", render_property_set(set))?;
        }
        writeln!(f, "Relationship properties:")?;
        for set in &self.rel_properties {
            writeln!(f, "{}", render_property_set(set))?;
        }
        write!(f, "The relationships:")?;
        for pattern in &self.relationships {
            write!(f, "\n{pattern}")?;
        }
        Ok(())
    }
}

fn render_property_set(set: &PropertySet) -> String {
    if set.properties.is_empty() {
        return set.name.clone();
    }
    let props: Vec<String> = set
        .properties
        .iter()
        .map(|(name, ty)| format!("{name}: {ty}"))
        .collect();
    format!("{} {{{}}}", set.name, props.join(", "))
}

fn into_property_sets(map: BTreeMap<String, BTreeMap<String, String>>) -> Vec<PropertySet> {
    map.into_iter()
        .map(|(name, properties)| PropertySet { name, properties })
        .collect()
}

/// `(propertyName, TYPE)` from a `db.schema.*TypeProperties` row, if the row
/// describes a property at all.
fn property_entry(row: &Record) -> Option<(String, String)> {
    let name = row.get("propertyName")?.as_str()?.to_string();
    let ty = row
        .get("propertyTypes")
        .and_then(Value::as_array)
        .and_then(|types| types.first())
        .and_then(Value::as_str)
        .map(normalize_type)
        .unwrap_or_else(|| "ANY".to_string());
    Some((name, ty))
}

/// Map Neo4j procedure type names onto Cypher type names.
fn normalize_type(raw: &str) -> String {
    match raw {
        "Long" => "INTEGER".to_string(),
        "Double" => "FLOAT".to_string(),
        other if other.ends_with("Array") => "LIST".to_string(),
        other => other.to_uppercase(),
    }
}

/// `db.schema.relTypeProperties` reports types as ``:`TIENE_ORIGEN` ``.
fn clean_rel_type(raw: &str) -> String {
    raw.trim_start_matches(':').trim_matches('`').to_string()
}

fn strings_in(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected a JSON object"),
        }
    }

    #[test]
    fn empty_result_gives_empty_summary() {
        let summary = summary_from_rows(&[]);
        assert_eq!(
            serde_json::to_value(summary).unwrap(),
            json!({"nodes": [], "rels": []})
        );
    }

    #[test]
    fn summary_sorts_and_deduplicates() {
        let rows = vec![record(json!({
            "node_labels": ["Origen", "Cafe", null, "Cafe"],
            "rel_types": ["TIENE_ORIGEN", "SE_PREPARA_CON", "TIENE_ORIGEN"],
        }))];
        let summary = summary_from_rows(&rows);
        assert_eq!(summary.nodes(), ["Cafe", "Origen"]);
        assert_eq!(summary.rels(), ["SE_PREPARA_CON", "TIENE_ORIGEN"]);
    }

    #[test]
    fn summary_tolerates_missing_columns() {
        let rows = vec![record(json!({"node_labels": ["Cafe"]}))];
        let summary = summary_from_rows(&rows);
        assert_eq!(summary.nodes(), ["Cafe"]);
        assert!(summary.rels().is_empty());
    }

    fn sample_schema() -> GraphSchema {
        let node_rows = vec![
            record(json!({"nodeLabels": ["Cafe"], "propertyName": "nombre", "propertyTypes": ["String"]})),
            record(json!({"nodeLabels": ["Cafe"], "propertyName": "puntaje", "propertyTypes": ["Long"]})),
            record(json!({"nodeLabels": ["Origen"], "propertyName": null, "propertyTypes": null})),
        ];
        let rel_rows = vec![record(
            json!({"relType": ":`TIENE_ORIGEN`", "propertyName": "desde", "propertyTypes": ["Long"]}),
        )];
        let pattern_rows = vec![
            record(json!({"start": "Cafe", "type": "TIENE_ORIGEN", "end": "Origen"})),
            record(json!({"start": "Cafe", "type": "TIENE_ORIGEN", "end": "Origen"})),
        ];
        GraphSchema::from_rows(&node_rows, &rel_rows, &pattern_rows)
    }

    #[test]
    fn schema_collects_properties_and_patterns() {
        let schema = sample_schema();
        assert_eq!(schema.node_properties.len(), 2);
        assert_eq!(schema.node_properties[0].name, "Cafe");
        assert_eq!(schema.node_properties[0].properties["puntaje"], "INTEGER");
        assert!(schema.node_properties[1].properties.is_empty());
        assert_eq!(schema.rel_properties[0].name, "TIENE_ORIGEN");
        assert_eq!(schema.relationships.len(), 1);
    }

    #[test]
    fn schema_renders_prompt_text() {
        let text = sample_schema().to_string();
        assert_eq!(
            text,
            "Node properties:\n\
             Cafe {nombre: STRING, puntaje: INTEGER}\n\
             Origen\n\
             Relationship properties:\n\
             TIENE_ORIGEN {desde: INTEGER}\n\
             The relationships:\n\
             (:Cafe)-[:TIENE_ORIGEN]->(:Origen)"
        );
    }

    #[test]
    fn schema_summary_unions_all_sources() {
        let summary = sample_schema().summary();
        assert_eq!(summary.nodes(), ["Cafe", "Origen"]);
        assert_eq!(summary.rels(), ["TIENE_ORIGEN"]);
    }

    #[test]
    fn empty_schema_renders_headers_only() {
        let schema = GraphSchema::from_rows(&[], &[], &[]);
        assert!(schema.is_empty());
        assert_eq!(
            schema.to_string(),
            "Node properties:\nRelationship properties:\nThe relationships:"
        );
    }
}
