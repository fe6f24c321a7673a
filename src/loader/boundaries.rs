//! Department Boundaries
//!
//! Parses the GeoJSON FeatureCollection of French departments. The document
//! itself is kept untouched for the choropleth; only the code→name mapping
//! is extracted from `features[].properties`.

use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::dataset::{DataError, DataResult};

#[derive(Deserialize)]
struct FeatureCollection {
    #[serde(rename = "type")]
    kind: String,
    features: Vec<Feature>,
}

#[derive(Deserialize)]
struct Feature {
    #[serde(default)]
    properties: Option<FeatureProperties>,
}

#[derive(Deserialize)]
struct FeatureProperties {
    code: Option<String>,
    nom: Option<String>,
}

/// Parsed boundary file: the raw document plus its code→name mapping
#[derive(Debug, Clone)]
pub struct Boundaries {
    document: Arc<Value>,
    names: BTreeMap<String, String>,
}

impl Boundaries {
    /// Parse a GeoJSON FeatureCollection
    pub fn from_slice(data: &[u8]) -> DataResult<Self> {
        let document: Value = serde_json::from_slice(data)?;
        Self::from_value(document)
    }

    pub fn from_value(document: Value) -> DataResult<Self> {
        let collection = FeatureCollection::deserialize(&document)?;

        if collection.kind != "FeatureCollection" {
            return Err(DataError::Parse(format!(
                "Expected a GeoJSON FeatureCollection, found {:?}",
                collection.kind
            )));
        }

        let mut names = BTreeMap::new();
        for (idx, feature) in collection.features.into_iter().enumerate() {
            let props = feature.properties.ok_or_else(|| {
                DataError::Parse(format!("Feature {} has no properties", idx))
            })?;

            match (props.code, props.nom) {
                (Some(code), Some(nom)) => {
                    names.insert(code, nom);
                }
                _ => {
                    return Err(DataError::Parse(format!(
                        "Feature {} is missing properties.code or properties.nom",
                        idx
                    )))
                }
            }
        }

        Ok(Self {
            document: Arc::new(document),
            names,
        })
    }

    /// Resolve a department code to its name
    pub fn name_of(&self, code: &str) -> DataResult<&str> {
        self.names
            .get(code)
            .map(String::as_str)
            .ok_or_else(|| DataError::UnknownDepartmentCode(code.to_string()))
    }

    /// All departments, ordered by code
    pub fn departments(&self) -> impl Iterator<Item = (&str, &str)> {
        self.names.iter().map(|(c, n)| (c.as_str(), n.as_str()))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// The GeoJSON document as loaded
    pub fn document(&self) -> &Arc<Value> {
        &self.document
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) const SAMPLE_GEOJSON: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "properties": {"code": "01", "nom": "Ain"}, "geometry": null},
            {"type": "Feature", "properties": {"code": "2A", "nom": "Corse-du-Sud"}, "geometry": null},
            {"type": "Feature", "properties": {"code": "75", "nom": "Paris"}, "geometry": null}
        ]
    }"#;

    #[test]
    fn test_parse_code_names() {
        let boundaries = Boundaries::from_slice(SAMPLE_GEOJSON.as_bytes()).unwrap();

        assert_eq!(boundaries.len(), 3);
        assert_eq!(boundaries.name_of("75").unwrap(), "Paris");
        assert_eq!(boundaries.name_of("2A").unwrap(), "Corse-du-Sud");
        assert_eq!(boundaries.name_of("01").unwrap(), "Ain");
    }

    #[test]
    fn test_unknown_code() {
        let boundaries = Boundaries::from_slice(SAMPLE_GEOJSON.as_bytes()).unwrap();

        let err = boundaries.name_of("971").unwrap_err();
        assert!(matches!(err, DataError::UnknownDepartmentCode(ref c) if c == "971"));
    }

    #[test]
    fn test_departments_ordered_by_code() {
        let boundaries = Boundaries::from_slice(SAMPLE_GEOJSON.as_bytes()).unwrap();
        let codes: Vec<&str> = boundaries.departments().map(|(c, _)| c).collect();
        assert_eq!(codes, vec!["01", "2A", "75"]);
    }

    #[test]
    fn test_document_preserved() {
        let boundaries = Boundaries::from_slice(SAMPLE_GEOJSON.as_bytes()).unwrap();
        assert_eq!(boundaries.document()["features"][2]["properties"]["nom"], "Paris");
    }

    #[test]
    fn test_rejects_non_collection() {
        let json = r#"{"type": "Feature", "features": []}"#;
        assert!(matches!(
            Boundaries::from_slice(json.as_bytes()),
            Err(DataError::Parse(_))
        ));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            Boundaries::from_slice(b"{\"type\": "),
            Err(DataError::Parse(_))
        ));
    }

    #[test]
    fn test_rejects_feature_without_name() {
        let json = r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature", "properties": {"code": "01"}}
        ]}"#;
        assert!(matches!(
            Boundaries::from_slice(json.as_bytes()),
            Err(DataError::Parse(_))
        ));
    }
}
