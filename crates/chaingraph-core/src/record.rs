//! Validated entity and relationship records.
//!
//! Input files yield raw JSON objects. Before a statement is built, each raw
//! object is checked for its required keys and converted into one of the
//! typed records below.

use serde::Serialize;
use serde_json::Value;

use crate::error::RecordError;
use crate::types::{Label, PropertyValue, RelType};

/// A raw record as read from an input file.
pub type RawRecord = serde_json::Map<String, Value>;

/// Key holding the relationship type tag.
pub const REL_KEY: &str = "rel";
/// Key holding the optional relationship weight.
pub const WEIGHT_KEY: &str = "rel_weight";
/// Key every entity must carry; relationships match on it.
pub const NAME_KEY: &str = "name";

/// An entity ready to become one node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityRecord {
    pub label: Label,
    pub name: PropertyValue,
    /// Every non-null attribute, `name` included, in key order.
    pub properties: Vec<(String, PropertyValue)>,
}

impl EntityRecord {
    pub fn from_raw(label: Label, raw: &RawRecord) -> Result<Self, RecordError> {
        let name = required_scalar(raw, NAME_KEY)?;

        let mut properties = Vec::with_capacity(raw.len());
        for (key, value) in raw {
            if key.trim().is_empty() {
                return Err(RecordError::EmptyPropertyName);
            }
            if let Some(v) = PropertyValue::from_json(key, value)? {
                properties.push((key.clone(), v));
            }
        }

        Ok(Self {
            label,
            name,
            properties,
        })
    }
}

/// A relationship ready to become one edge.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelationshipRecord {
    pub from: PropertyValue,
    pub to: PropertyValue,
    pub rel: RelType,
    /// String form of `rel_weight`, present for weighted loads.
    pub weight: Option<String>,
}

impl RelationshipRecord {
    /// Extract a relationship from `raw` using the given endpoint keys.
    ///
    /// When `weighted` is set, `rel_weight` becomes a required key.
    pub fn from_raw(
        raw: &RawRecord,
        from_key: &str,
        to_key: &str,
        weighted: bool,
    ) -> Result<Self, RecordError> {
        let from = required_scalar(raw, from_key)?;
        let to = required_scalar(raw, to_key)?;

        let rel = match raw.get(REL_KEY) {
            None | Some(Value::Null) => return Err(RecordError::MissingKey(REL_KEY.to_string())),
            Some(Value::String(tag)) => tag.parse::<RelType>()?,
            Some(other) => return Err(RecordError::UnknownRelType(other.to_string())),
        };

        let weight = if weighted {
            Some(required_weight(raw)?)
        } else {
            None
        };

        Ok(Self {
            from,
            to,
            rel,
            weight,
        })
    }
}

fn required_scalar(raw: &RawRecord, key: &str) -> Result<PropertyValue, RecordError> {
    let value = raw
        .get(key)
        .ok_or_else(|| RecordError::MissingKey(key.to_string()))?;
    PropertyValue::from_json(key, value)?.ok_or_else(|| RecordError::MissingKey(key.to_string()))
}

/// `rel_weight` as written in the input. Numbers keep their JSON form, so
/// `1.0` stays `"1.0"`.
fn required_weight(raw: &RawRecord) -> Result<String, RecordError> {
    match raw.get(WEIGHT_KEY) {
        None | Some(Value::Null) => Err(RecordError::MissingKey(WEIGHT_KEY.to_string())),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(Value::Bool(b)) => Ok(b.to_string()),
        Some(Value::Array(_) | Value::Object(_)) => Err(RecordError::NotScalar {
            key: WEIGHT_KEY.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: Value) -> RawRecord {
        match value {
            Value::Object(map) => map,
            _ => panic!("test record must be an object"),
        }
    }

    #[test]
    fn entity_keeps_scalar_properties() {
        let record = raw(json!({"name": "华为", "code": 1001, "listed": false, "note": null}));
        let entity = EntityRecord::from_raw(Label::Company, &record).unwrap();

        assert_eq!(entity.name, PropertyValue::from("华为"));
        assert_eq!(entity.properties.len(), 3);
        assert!(entity
            .properties
            .iter()
            .all(|(k, _)| k == "name" || k == "code" || k == "listed"));
    }

    #[test]
    fn entity_without_name_is_rejected() {
        let record = raw(json!({"code": 1001}));
        let err = EntityRecord::from_raw(Label::Company, &record).unwrap_err();
        assert_eq!(err, RecordError::MissingKey("name".into()));

        let record = raw(json!({"name": null}));
        assert!(EntityRecord::from_raw(Label::Company, &record).is_err());
    }

    #[test]
    fn entity_with_nested_value_is_rejected() {
        let record = raw(json!({"name": "x", "tags": ["a"]}));
        let err = EntityRecord::from_raw(Label::Product, &record).unwrap_err();
        assert_eq!(err, RecordError::NotScalar { key: "tags".into() });
    }

    #[test]
    fn entity_with_blank_key_is_rejected() {
        let record = raw(json!({"name": "x", " ": 1}));
        let err = EntityRecord::from_raw(Label::Product, &record).unwrap_err();
        assert_eq!(err, RecordError::EmptyPropertyName);
    }

    #[test]
    fn relationship_extracts_configured_keys() {
        let record = raw(json!({
            "company_name": "华为",
            "industry_name": "通信设备",
            "rel": "所属行业"
        }));
        let rel =
            RelationshipRecord::from_raw(&record, "company_name", "industry_name", false).unwrap();

        assert_eq!(rel.from, PropertyValue::from("华为"));
        assert_eq!(rel.to, PropertyValue::from("通信设备"));
        assert_eq!(rel.rel, RelType::BelongsToIndustry);
        assert_eq!(rel.weight, None);
    }

    #[test]
    fn relationship_missing_keys() {
        let record = raw(json!({"from": "a", "to": "b"}));
        assert_eq!(
            RelationshipRecord::from_raw(&record, "from", "to", false).unwrap_err(),
            RecordError::MissingKey("rel".into())
        );

        let record = raw(json!({"from": "a", "rel": "上游材料"}));
        assert_eq!(
            RelationshipRecord::from_raw(&record, "from", "to", false).unwrap_err(),
            RecordError::MissingKey("to".into())
        );
    }

    #[test]
    fn relationship_with_unknown_tag() {
        let record = raw(json!({"from": "a", "to": "b", "rel": "投资"}));
        assert_eq!(
            RelationshipRecord::from_raw(&record, "from", "to", false).unwrap_err(),
            RecordError::UnknownRelType("投资".into())
        );

        let record = raw(json!({"from": "a", "to": "b", "rel": 7}));
        assert!(matches!(
            RelationshipRecord::from_raw(&record, "from", "to", false),
            Err(RecordError::UnknownRelType(_))
        ));
    }

    #[test]
    fn weighted_relationship_stringifies_weight() {
        let record = raw(json!({"from": "a", "to": "b", "rel": "主营产品", "rel_weight": 0.35}));
        let rel = RelationshipRecord::from_raw(&record, "from", "to", true).unwrap();
        assert_eq!(rel.weight.as_deref(), Some("0.35"));

        let record = raw(json!({"from": "a", "to": "b", "rel": "主营产品", "rel_weight": "12%"}));
        let rel = RelationshipRecord::from_raw(&record, "from", "to", true).unwrap();
        assert_eq!(rel.weight.as_deref(), Some("12%"));
    }

    #[test]
    fn whole_number_weight_keeps_its_decimal_point() {
        let record = raw(json!({"from": "a", "to": "b", "rel": "主营产品", "rel_weight": 1.0}));
        let rel = RelationshipRecord::from_raw(&record, "from", "to", true).unwrap();
        assert_eq!(rel.weight.as_deref(), Some("1.0"));

        let record = raw(json!({"from": "a", "to": "b", "rel": "主营产品", "rel_weight": 3}));
        let rel = RelationshipRecord::from_raw(&record, "from", "to", true).unwrap();
        assert_eq!(rel.weight.as_deref(), Some("3"));

        let record = raw(json!({"from": "a", "to": "b", "rel": "主营产品", "rel_weight": [1]}));
        assert_eq!(
            RelationshipRecord::from_raw(&record, "from", "to", true).unwrap_err(),
            RecordError::NotScalar { key: "rel_weight".into() }
        );
    }

    #[test]
    fn weighted_relationship_requires_weight() {
        let record = raw(json!({"from": "a", "to": "b", "rel": "主营产品"}));
        assert_eq!(
            RelationshipRecord::from_raw(&record, "from", "to", true).unwrap_err(),
            RecordError::MissingKey("rel_weight".into())
        );
        // Ignored on plain loads.
        assert!(RelationshipRecord::from_raw(&record, "from", "to", false).is_ok());
    }
}
