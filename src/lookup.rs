//! Lookup kinds and batch payloads.

use serde::de::{self, MapAccess, SeqAccess, Visitor};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

/// Which direction a lookup goes.
///
/// The only thing the kind changes is the endpoint segment of the request
/// path; query and body shapes are identical for both.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum LookupKind {
    /// Address to coordinates.
    #[default]
    Forward,
    /// `"lat,long"` pair to address.
    Reverse,
}

impl LookupKind {
    /// Endpoint segment used in the request path.
    pub fn as_str(&self) -> &'static str {
        match self {
            LookupKind::Forward => "geocode",
            LookupKind::Reverse => "reverse",
        }
    }

    pub const fn all() -> &'static [LookupKind] {
        &[LookupKind::Forward, LookupKind::Reverse]
    }
}

impl fmt::Display for LookupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for LookupKind {
    type Error = crate::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "geocode" | "forward" => Ok(LookupKind::Forward),
            "reverse" => Ok(LookupKind::Reverse),
            _ => Err(crate::Error::UnknownLookupKind(value.to_string())),
        }
    }
}

/// Several lookup inputs sent together in one POST.
///
/// A `List` is encoded as a JSON array and the service answers item by item
/// in the same order. A `Labeled` batch is encoded as a JSON object and the
/// service answers keyed by the same labels.
///
/// # Examples
///
/// ```
/// use geocodio::BatchPayload;
///
/// let list = BatchPayload::from(vec!["1 Main St", "2 Main St"]);
/// assert_eq!(list.len(), 2);
///
/// let labeled = BatchPayload::labeled([("home", "1 Main St"), ("work", "2 Main St")]);
/// assert_eq!(serde_json::to_string(&labeled).unwrap(), r#"{"home":"1 Main St","work":"2 Main St"}"#);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchPayload {
    /// Ordered inputs.
    List(Vec<String>),
    /// Label to input, in insertion order. Labels are unique.
    Labeled(Vec<(String, String)>),
}

impl BatchPayload {
    /// Builds an ordered batch.
    pub fn list<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        BatchPayload::List(values.into_iter().map(Into::into).collect())
    }

    /// Builds a labeled batch.
    ///
    /// A repeated label keeps the position of its first occurrence and the
    /// value of its last.
    pub fn labeled<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut pairs: Vec<(String, String)> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();
        for (label, value) in entries {
            let (label, value) = (label.into(), value.into());
            match positions.get(&label) {
                Some(&index) => pairs[index].1 = value,
                None => {
                    positions.insert(label.clone(), pairs.len());
                    pairs.push((label, value));
                }
            }
        }
        BatchPayload::Labeled(pairs)
    }

    pub fn len(&self) -> usize {
        match self {
            BatchPayload::List(values) => values.len(),
            BatchPayload::Labeled(pairs) => pairs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Encodes the payload as the JSON request body.
    pub fn to_json(&self) -> crate::Result<String> {
        serde_json::to_string(self).map_err(|e| crate::Error::SerializationFailed(e.to_string()))
    }
}

impl<S: Into<String>> From<Vec<S>> for BatchPayload {
    fn from(values: Vec<S>) -> Self {
        BatchPayload::list(values)
    }
}

impl<S: Into<String>, const N: usize> From<[S; N]> for BatchPayload {
    fn from(values: [S; N]) -> Self {
        BatchPayload::list(values)
    }
}

impl<K: Into<String>, V: Into<String>> From<BTreeMap<K, V>> for BatchPayload {
    fn from(entries: BTreeMap<K, V>) -> Self {
        BatchPayload::labeled(entries)
    }
}

impl<K: Into<String>, V: Into<String>> From<HashMap<K, V>> for BatchPayload {
    fn from(entries: HashMap<K, V>) -> Self {
        BatchPayload::labeled(entries)
    }
}

impl Serialize for BatchPayload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            BatchPayload::List(values) => {
                let mut seq = serializer.serialize_seq(Some(values.len()))?;
                for value in values {
                    seq.serialize_element(value)?;
                }
                seq.end()
            }
            BatchPayload::Labeled(pairs) => {
                let mut map = serializer.serialize_map(Some(pairs.len()))?;
                for (label, value) in pairs {
                    map.serialize_entry(label, value)?;
                }
                map.end()
            }
        }
    }
}

struct BatchPayloadVisitor;

impl<'de> Visitor<'de> for BatchPayloadVisitor {
    type Value = BatchPayload;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an array of strings or an object of string values")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut values = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(value) = seq.next_element::<String>()? {
            values.push(value);
        }
        Ok(BatchPayload::List(values))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let capacity = map.size_hint().unwrap_or(0);
        let mut pairs: Vec<(String, String)> = Vec::with_capacity(capacity);
        let mut seen: HashSet<String> = HashSet::with_capacity(capacity);
        while let Some((label, value)) = map.next_entry::<String, String>()? {
            if !seen.insert(label.clone()) {
                return Err(de::Error::custom(format!("duplicate label `{label}`")));
            }
            pairs.push((label, value));
        }
        Ok(BatchPayload::Labeled(pairs))
    }
}

impl<'de> Deserialize<'de> for BatchPayload {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(BatchPayloadVisitor)
    }
}
