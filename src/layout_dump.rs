use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::layout::Layout;

/// Wire view of a computed layout. Field names match the JSON the
/// surrounding application consumes: `vertices` for anchors and
/// `intersects` for signature markers.
#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub vertices: Vec<VertexDump>,
    pub intersects: Vec<IntersectDump>,
    pub outcome: String,
    pub iterations: u32,
    pub can_cache: bool,
    pub metadata: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub struct VertexDump {
    pub name: String,
    pub position: [f64; 2],
}

#[derive(Debug, Serialize)]
pub struct IntersectDump {
    pub signature: Vec<String>,
    pub position: [f64; 2],
    pub genes: Vec<String>,
    pub radius: f64,
    pub label: [f64; 2],
}

impl LayoutDump {
    pub fn from_layout(layout: &Layout) -> Self {
        let vertices = layout
            .anchors
            .iter()
            .map(|anchor| VertexDump {
                name: anchor.name.clone(),
                position: [anchor.position.x, anchor.position.y],
            })
            .collect();

        let intersects = layout
            .nodes
            .iter()
            .map(|node| IntersectDump {
                signature: node.signature.clone(),
                position: [node.position.x, node.position.y],
                genes: node.genes.clone(),
                radius: node.radius,
                label: [node.label.x, node.label.y],
            })
            .collect();

        LayoutDump {
            vertices,
            intersects,
            outcome: format!("{:?}", layout.outcome),
            iterations: layout.iterations,
            can_cache: layout.can_cache,
            metadata: layout.metadata.clone(),
        }
    }
}

pub fn write_layout_dump(path: &Path, layout: &Layout) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    let dump = LayoutDump::from_layout(layout);
    serde_json::to_writer_pretty(&mut writer, &dump)?;
    writer.write_all(b"\n")?;
    Ok(())
}
