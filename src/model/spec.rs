//! Chart specifications and recommendation groups as delivered by the host

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An opaque declarative chart description (Vega-Lite style JSON)
///
/// The widget never interprets a spec beyond what the thumbnail renderer
/// needs for its textual summary; it is passed through unchanged on export.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChartSpec(Value);

impl ChartSpec {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// True for `null`, `{}`, `[]`, `""` and any number or boolean
    ///
    /// Numbers and booleans carry no chart, so they count as empty too.
    pub fn is_empty(&self) -> bool {
        match &self.0 {
            Value::Null | Value::Bool(_) | Value::Number(_) => true,
            Value::Object(map) => map.is_empty(),
            Value::Array(items) => items.is_empty(),
            Value::String(s) => s.is_empty(),
        }
    }

    /// Chart title, accepting both `"title": "..."` and `"title": {"text": ...}`
    pub fn title(&self) -> Option<String> {
        let title = self.0.get("title")?;
        let text = match title {
            Value::Object(obj) => obj.get("text")?,
            other => other,
        };
        match text {
            Value::String(s) => Some(s.clone()),
            Value::Array(parts) => {
                let joined: Vec<&str> = parts.iter().filter_map(Value::as_str).collect();
                (!joined.is_empty()).then(|| joined.join(" "))
            }
            _ => None,
        }
    }

    /// Mark type, accepting both `"mark": "bar"` and `"mark": {"type": "bar"}`
    pub fn mark(&self) -> Option<&str> {
        match self.0.get("mark")? {
            Value::String(s) => Some(s),
            Value::Object(obj) => obj.get("type")?.as_str(),
            _ => None,
        }
    }

    /// Encoding channels as `(channel, description)` pairs, sorted by channel
    pub fn encodings(&self) -> Vec<(String, String)> {
        let Some(Value::Object(encoding)) = self.0.get("encoding") else {
            return Vec::new();
        };

        encoding
            .iter()
            .map(|(channel, def)| (channel.clone(), describe_channel(def)))
            .collect()
    }
}

impl From<Value> for ChartSpec {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

fn describe_channel(def: &Value) -> String {
    let field = def.get("field").and_then(Value::as_str);
    let aggregate = def.get("aggregate").and_then(Value::as_str);
    let kind = def.get("type").and_then(Value::as_str);

    let base = match (aggregate, field) {
        (Some(agg), Some(field)) => format!("{}({})", agg, field),
        (Some(agg), None) => format!("{}()", agg),
        (None, Some(field)) => field.to_string(),
        (None, None) => "-".to_string(),
    };

    match kind {
        Some(kind) => format!("{} [{}]", base, kind),
        None => base,
    }
}

/// One named collection of candidate charts, shown as one tab
///
/// Fields other than `action` and `vspec` are kept verbatim so they can be
/// carried through to the export payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationGroup {
    pub action: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    #[serde(default)]
    pub vspec: Vec<ChartSpec>,
}

impl RecommendationGroup {
    pub fn new(action: impl Into<String>, vspec: Vec<ChartSpec>) -> Self {
        Self {
            action: action.into(),
            extra: Map::new(),
            vspec,
        }
    }
}
