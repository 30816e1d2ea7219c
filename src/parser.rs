use std::collections::BTreeMap;
use std::collections::BTreeSet;

use anyhow::{Result, bail};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::ir::ListSet;

/// Matrix header cell naming the gene-identifier column.
static MATRIX_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(genes?|ids?|identifiers?|probes?)$").unwrap());

/// Matrix cells that mean "not a member" (anything else is presence).
static ABSENT_CELL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(0|na|n/a|nan|null|none|false)?$").unwrap());

/// Separators accepted in an inline filter list.
static FILTER_SPLIT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[,;\s]+").unwrap());

#[derive(Debug, Default)]
pub struct ParseOutput {
    /// Lists in input order; order decides anchor assignment.
    pub lists: Vec<ListSet>,
    pub metadata: BTreeMap<String, Value>,
}

/// Parse gene lists from any supported format: JSON, GMT
/// (`name<TAB>description<TAB>gene...`), or a delimited membership matrix
/// (rows = genes, columns = lists, non-empty cell = member).
pub fn parse_lists(input: &str) -> Result<ParseOutput> {
    let trimmed = input.trim_start();
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        return parse_json(input);
    }

    let Some(header) = first_content_line(input) else {
        bail!("input contains no gene lists");
    };
    let delimiter = if header.contains('\t') { '\t' } else { ',' };
    let first_cell = header.split(delimiter).next().unwrap_or("").trim();
    if MATRIX_ID_RE.is_match(first_cell) {
        return parse_matrix(input, delimiter);
    }
    if delimiter == '\t' {
        return parse_gmt(input);
    }
    bail!("unrecognized input format; expected JSON, GMT, or a membership matrix");
}

/// Parse a universe filter: a JSON `{"genes": [...]}` body, a bare JSON
/// array, or an inline separator-delimited list of identifiers.
pub fn parse_filter(input: &str) -> Result<BTreeSet<String>> {
    let trimmed = input.trim();
    let genes: BTreeSet<String> = if trimmed.starts_with('{') {
        let value: Value = serde_json::from_str(trimmed)?;
        let Some(array) = value.get("genes").and_then(Value::as_array) else {
            bail!("filter object is missing a \"genes\" array");
        };
        string_array(array)?
    } else if trimmed.starts_with('[') {
        let value: Value = serde_json::from_str(trimmed)?;
        let Some(array) = value.as_array() else {
            bail!("filter is not a JSON array");
        };
        string_array(array)?
    } else {
        FILTER_SPLIT_RE
            .split(trimmed)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    };

    if genes.is_empty() {
        bail!("filter contains no gene identifiers");
    }
    Ok(genes)
}

fn first_content_line(input: &str) -> Option<&str> {
    input
        .lines()
        .map(str::trim_end)
        .find(|line| !line.trim().is_empty() && !line.starts_with('#'))
}

fn string_array(array: &[Value]) -> Result<BTreeSet<String>> {
    array
        .iter()
        .map(|v| match v.as_str() {
            Some(s) => Ok(s.to_string()),
            None => bail!("expected a string gene identifier, got {v}"),
        })
        .collect()
}

fn parse_json(input: &str) -> Result<ParseOutput> {
    let root: Value = serde_json::from_str(input)?;

    let mut metadata = BTreeMap::new();
    let mut bare_object = false;
    let lists_value = match &root {
        Value::Object(map) => {
            if let Some(meta) = map.get("metadata").and_then(Value::as_object) {
                for (name, value) in meta {
                    metadata.insert(name.clone(), value.clone());
                }
            }
            match map.get("lists") {
                Some(wrapped) => wrapped,
                None => {
                    bare_object = true;
                    &root
                }
            }
        }
        Value::Array(_) => &root,
        _ => bail!("top-level JSON must be an object or an array of lists"),
    };

    let mut lists = Vec::new();
    match lists_value {
        // Insertion-ordered map: list name -> array of gene ids.
        Value::Object(map) => {
            for (name, genes) in map {
                if bare_object && name == "metadata" {
                    continue;
                }
                let Some(array) = genes.as_array() else {
                    bail!("list {name:?} is not an array of gene identifiers");
                };
                push_list(&mut lists, name.clone(), string_array(array)?)?;
            }
        }
        // Explicitly ordered: [{ "name": ..., "genes": [...] }, ...].
        Value::Array(entries) => {
            for entry in entries {
                let Some(name) = entry.get("name").and_then(Value::as_str) else {
                    bail!("list entry is missing a \"name\" string");
                };
                let Some(array) = entry.get("genes").and_then(Value::as_array) else {
                    bail!("list {name:?} is missing a \"genes\" array");
                };
                push_list(&mut lists, name.to_string(), string_array(array)?)?;
                if let Some(meta) = entry.get("metadata") {
                    metadata.insert(name.to_string(), meta.clone());
                }
            }
        }
        _ => bail!("\"lists\" must be an object or an array"),
    }

    if lists.is_empty() {
        bail!("input contains no gene lists");
    }
    Ok(ParseOutput { lists, metadata })
}

fn parse_gmt(input: &str) -> Result<ParseOutput> {
    let mut lists = Vec::new();
    let mut metadata = BTreeMap::new();

    for line in input.lines() {
        let line = line.trim_end();
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }
        let mut fields = line.split('\t');
        let Some(name) = fields.next().map(str::trim).filter(|n| !n.is_empty()) else {
            bail!("GMT line is missing a list name: {line:?}");
        };
        let description = fields.next().map(str::trim).unwrap_or("");
        let genes: BTreeSet<String> = fields
            .map(str::trim)
            .filter(|g| !g.is_empty())
            .map(str::to_string)
            .collect();
        push_list(&mut lists, name.to_string(), genes)?;
        if !description.is_empty() {
            metadata.insert(
                name.to_string(),
                serde_json::json!({ "description": description }),
            );
        }
    }

    if lists.is_empty() {
        bail!("input contains no gene lists");
    }
    Ok(ParseOutput { lists, metadata })
}

fn parse_matrix(input: &str, delimiter: char) -> Result<ParseOutput> {
    let mut lines = input
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.trim().is_empty() && !line.starts_with('#'));
    let Some(header) = lines.next() else {
        bail!("membership matrix has no header row");
    };

    let names: Vec<String> = header
        .split(delimiter)
        .skip(1)
        .map(|cell| cell.trim().to_string())
        .collect();
    if names.iter().any(String::is_empty) {
        bail!("membership matrix header has an unnamed list column");
    }

    let mut members: Vec<BTreeSet<String>> = vec![BTreeSet::new(); names.len()];
    for line in lines {
        let cells: Vec<&str> = line.split(delimiter).collect();
        let gene = cells[0].trim();
        if gene.is_empty() {
            continue;
        }
        for (slot, member_set) in members.iter_mut().enumerate() {
            let cell = cells.get(slot + 1).map(|c| c.trim()).unwrap_or("");
            if !ABSENT_CELL_RE.is_match(cell) {
                member_set.insert(gene.to_string());
            }
        }
    }

    let mut lists = Vec::new();
    for (name, genes) in names.into_iter().zip(members) {
        push_list(&mut lists, name, genes)?;
    }
    Ok(ParseOutput {
        lists,
        metadata: BTreeMap::new(),
    })
}

fn push_list(lists: &mut Vec<ListSet>, name: String, genes: BTreeSet<String>) -> Result<()> {
    if lists.iter().any(|l| l.name == name) {
        bail!("duplicate list name: {name:?}");
    }
    lists.push(ListSet { name, genes });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_json_object_in_order() {
        let input = r#"{ "lists": { "B": ["g2", "g1"], "A": ["g1"] } }"#;
        let parsed = parse_lists(input).unwrap();
        let names: Vec<&str> = parsed.lists.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, ["B", "A"]);
        assert_eq!(parsed.lists[0].genes.len(), 2);
    }

    #[test]
    fn parses_json_array_with_metadata() {
        let input = r#"[
            { "name": "A", "genes": ["g1"], "metadata": { "source": "exp1" } },
            { "name": "B", "genes": ["g1", "g2"] }
        ]"#;
        let parsed = parse_lists(input).unwrap();
        assert_eq!(parsed.lists.len(), 2);
        assert_eq!(parsed.metadata["A"]["source"], "exp1");
    }

    #[test]
    fn parses_gmt_lines() {
        let input = "A\tfirst list\tg1\tg2\nB\t\tg2\tg3\n";
        let parsed = parse_lists(input).unwrap();
        assert_eq!(parsed.lists.len(), 2);
        assert!(parsed.lists[0].contains("g2"));
        assert_eq!(parsed.metadata["A"]["description"], "first list");
        assert!(!parsed.metadata.contains_key("B"));
    }

    #[test]
    fn parses_membership_matrix() {
        let input = "gene\tA\tB\ng1\tx\t\ng2\tx\tx\ng3\t0\t1\n";
        let parsed = parse_lists(input).unwrap();
        assert_eq!(parsed.lists[0].genes.len(), 2);
        assert_eq!(parsed.lists[1].genes.len(), 2);
        assert!(!parsed.lists[0].contains("g3"));
        assert!(parsed.lists[1].contains("g3"));
    }

    #[test]
    fn parses_comma_matrix() {
        let input = "id,A,B\ng1,1,\ng2,1,1\n";
        let parsed = parse_lists(input).unwrap();
        assert_eq!(parsed.lists[0].genes.len(), 2);
        assert_eq!(parsed.lists[1].genes.len(), 1);
    }

    #[test]
    fn rejects_duplicate_names() {
        let input = r#"{ "lists": { "A": ["g1"] } }"#;
        assert!(parse_lists(input).is_ok());
        let dup = "A\t\tg1\nA\t\tg2\n";
        assert!(parse_lists(dup).is_err());
    }

    #[test]
    fn filter_accepts_all_three_shapes() {
        let from_object = parse_filter(r#"{ "genes": ["g1", "g2"] }"#).unwrap();
        let from_array = parse_filter(r#"["g1", "g2"]"#).unwrap();
        let from_inline = parse_filter("g1, g2").unwrap();
        assert_eq!(from_object, from_array);
        assert_eq!(from_object, from_inline);
    }

    #[test]
    fn empty_filter_is_rejected() {
        assert!(parse_filter("   ").is_err());
        assert!(parse_filter(r#"{ "genes": [] }"#).is_err());
    }
}
