//! In-memory chart description handed to a rendering surface.
//!
//! A [`ChartSpec`] serializes directly to a Chart.js configuration object
//! (`{type, data: {labels, datasets}, options: {plugins, scales}}`).

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Line,
    Bar,
    Doughnut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

pub const RED: Rgb = Rgb(255, 0, 0);
pub const DARK_GREEN: Rgb = Rgb(53, 173, 19);
pub const BLUE: Rgb = Rgb(0, 0, 255);

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.0, self.1, self.2)
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One colour for the whole dataset, or one per data point.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Paint {
    Solid(Rgb),
    Each(Vec<Rgb>),
}

/// A metric series: a bare array, or a `{label: value}` object in payload order.
/// `None` marks a gap (`null` in the payload).
#[derive(Debug, Clone, PartialEq)]
pub enum DataPoints {
    Indexed(Vec<Option<f64>>),
    Keyed(Vec<(String, Option<f64>)>),
}

impl DataPoints {
    pub fn from_value(value: &Value) -> Result<Self, String> {
        match value {
            Value::Array(items) => items
                .iter()
                .enumerate()
                .map(|(i, v)| point(v).map_err(|e| format!("item {}: {}", i, e)))
                .collect::<Result<Vec<_>, _>>()
                .map(DataPoints::Indexed),
            Value::Object(map) => map
                .iter()
                .map(|(k, v)| point(v).map(|p| (k.clone(), p)).map_err(|e| format!("{}: {}", k, e)))
                .collect::<Result<Vec<_>, _>>()
                .map(DataPoints::Keyed),
            other => Err(format!("expected an array or object, got {}", type_name(other))),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            DataPoints::Indexed(v) => v.len(),
            DataPoints::Keyed(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn values(&self) -> Vec<Option<f64>> {
        match self {
            DataPoints::Indexed(v) => v.clone(),
            DataPoints::Keyed(v) => v.iter().map(|(_, p)| *p).collect(),
        }
    }

    /// Labels of a keyed series; empty for an indexed one.
    pub fn keys(&self) -> Vec<String> {
        match self {
            DataPoints::Indexed(_) => Vec::new(),
            DataPoints::Keyed(v) => v.iter().map(|(k, _)| k.clone()).collect(),
        }
    }
}

fn point(value: &Value) -> Result<Option<f64>, String> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => n
            .as_f64()
            .map(Some)
            .ok_or_else(|| format!("{} is not representable as f64", n)),
        other => Err(format!("expected a number, got {}", type_name(other))),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl Serialize for DataPoints {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DataPoints::Indexed(points) => {
                let mut seq = serializer.serialize_seq(Some(points.len()))?;
                for p in points {
                    seq.serialize_element(p)?;
                }
                seq.end()
            }
            DataPoints::Keyed(points) => {
                let mut map = serializer.serialize_map(Some(points.len()))?;
                for (k, p) in points {
                    map.serialize_entry(k, p)?;
                }
                map.end()
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub label: String,
    pub data: DataPoints,
    pub background_color: Paint,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<Rgb>,
}

impl Dataset {
    /// Dataset drawn in a single colour, fill and border alike.
    pub fn solid(label: String, data: DataPoints, color: Rgb) -> Self {
        Self {
            label,
            data,
            background_color: Paint::Solid(color),
            border_color: Some(color),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Title {
    pub display: bool,
    pub text: String,
}

impl Title {
    pub fn shown(text: String) -> Self {
        Self { display: true, text }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Axis {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stacked: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Title>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Scales {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<Axis>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Plugins {
    pub title: Title,
    pub subtitle: Title,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Options {
    pub plugins: Plugins,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scales: Option<Scales>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
    pub datasets: Vec<Dataset>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    #[serde(rename = "type")]
    pub kind: ChartKind,
    pub data: ChartData,
    pub options: Options,
}

impl ChartSpec {
    pub fn new(kind: ChartKind, title: String, subtitle: String) -> Self {
        Self {
            kind,
            data: ChartData {
                labels: None,
                datasets: Vec::new(),
            },
            options: Options {
                plugins: Plugins {
                    title: Title::shown(title),
                    subtitle: Title::shown(subtitle),
                },
                scales: None,
            },
        }
    }

    pub fn with_dataset(mut self, dataset: Dataset) -> Self {
        self.data.datasets.push(dataset);
        self
    }

    pub fn with_labels(mut self, labels: Vec<String>) -> Self {
        self.data.labels = Some(labels);
        self
    }

    pub fn with_y_title(mut self, text: String) -> Self {
        let scales = self.options.scales.get_or_insert_with(Scales::default);
        scales.y.get_or_insert_with(Axis::default).title = Some(Title::shown(text));
        self
    }

    /// Stack both axes.
    pub fn stacked(mut self) -> Self {
        let scales = self.options.scales.get_or_insert_with(Scales::default);
        scales.x.get_or_insert_with(Axis::default).stacked = Some(true);
        scales.y.get_or_insert_with(Axis::default).stacked = Some(true);
        self
    }

    pub fn datasets(&self) -> &[Dataset] {
        &self.data.datasets
    }
}
