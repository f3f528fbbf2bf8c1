//! Style document types (sources + ordered layers).

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

use super::expr::Expr;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Source {
    Raster {
        tiles: Vec<String>,
        #[serde(rename = "tileSize")]
        tile_size: u32,
        attribution: String,
    },
    Vector {
        tiles: Vec<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        maxzoom: Option<u8>,
    },
    #[serde(rename = "geojson")]
    GeoJson { data: Value },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    Raster,
    Fill,
    Line,
    Symbol,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layer {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: LayerKind,
    pub source: String,
    #[serde(rename = "source-layer", skip_serializing_if = "Option::is_none")]
    pub source_layer: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub layout: BTreeMap<String, Expr>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub paint: BTreeMap<String, Expr>,
}

impl Layer {
    pub fn new(id: &str, kind: LayerKind, source: &str) -> Self {
        Self {
            id: id.to_string(),
            kind,
            source: source.to_string(),
            source_layer: None,
            layout: BTreeMap::new(),
            paint: BTreeMap::new(),
        }
    }

    pub fn source_layer(mut self, name: &str) -> Self {
        self.source_layer = Some(name.to_string());
        self
    }

    pub fn paint(mut self, key: &str, value: Expr) -> Self {
        self.paint.insert(key.to_string(), value);
        self
    }

    pub fn layout(mut self, key: &str, value: Expr) -> Self {
        self.layout.insert(key.to_string(), value);
        self
    }
}

/// Complete, disposable style document. Rebuilt from scratch on every input change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapStyleSpec {
    pub version: u8,
    pub sources: BTreeMap<String, Source>,
    pub layers: Vec<Layer>,
}

impl MapStyleSpec {
    pub fn new() -> Self {
        Self { version: 8, sources: BTreeMap::new(), layers: Vec::new() }
    }

    pub fn layer(&self, id: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id == id)
    }

    pub fn layer_ids(&self) -> Vec<&str> {
        self.layers.iter().map(|l| l.id.as_str()).collect()
    }

    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

impl Default for MapStyleSpec {
    fn default() -> Self {
        Self::new()
    }
}
