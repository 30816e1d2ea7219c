use std::collections::BTreeMap;

use crate::error::{Result, SungearError};
use crate::ir::SetRegistry;

use super::types::{AnchorLayout, Point};

/// One distinct intersection signature with its member genes and the
/// position it starts the relaxation from.
#[derive(Debug, Clone)]
pub(super) struct SignatureGroup {
    pub signature: Vec<String>,
    pub genes: Vec<String>,
    pub position: Point,
}

/// Group every gene in the restricted universe by the exact set of lists
/// containing it. Grouping partitions the universe: gene sets of distinct
/// groups are disjoint and their union is the whole universe.
///
/// Output order is the processing order for everything downstream: gene
/// count ascending, stable over the enumeration order (signature
/// cardinality ascending, then signature lexicographic).
pub(super) fn enumerate_signatures(
    registry: &SetRegistry,
    anchors: &[AnchorLayout],
) -> Result<Vec<SignatureGroup>> {
    if registry.universe().is_empty() {
        return Err(SungearError::EmptyUniverse);
    }

    let mut groups: BTreeMap<Vec<String>, Vec<String>> = BTreeMap::new();
    for gene in registry.universe() {
        let mut signature: Vec<String> = registry
            .lists()
            .iter()
            .filter(|list| list.contains(gene))
            .map(|list| list.name.clone())
            .collect();
        signature.sort();
        groups.entry(signature).or_default().push(gene.clone());
    }

    let mut nodes: Vec<SignatureGroup> = groups
        .into_iter()
        .map(|(signature, genes)| {
            let position = anchor_centroid(&signature, anchors);
            SignatureGroup {
                signature,
                genes,
                position,
            }
        })
        .collect();

    nodes.sort_by(|a, b| {
        a.signature
            .len()
            .cmp(&b.signature.len())
            .then_with(|| a.signature.cmp(&b.signature))
    });
    nodes.sort_by_key(|node| node.genes.len());

    Ok(nodes)
}

/// Unweighted mean of the anchors named by the signature.
pub(super) fn anchor_centroid(signature: &[String], anchors: &[AnchorLayout]) -> Point {
    let mut sum = Point::default();
    let mut count = 0usize;
    for anchor in anchors {
        if signature.iter().any(|name| name == &anchor.name) {
            sum = sum + anchor.position;
            count += 1;
        }
    }
    sum * (1.0 / count.max(1) as f64)
}
