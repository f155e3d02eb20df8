use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::value::{format_number, parse_number, RuntimeValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableType {
    Boolean,
    Number,
    String,
    Array,
    Object,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveType {
    Boolean,
    Number,
    String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Primitive {
    Boolean(bool),
    Number(#[serde(with = "crate::value::number_or_nan")] f64),
    String(String),
}

impl Primitive {
    pub fn primitive_type(&self) -> PrimitiveType {
        match self {
            Self::Boolean(_) => PrimitiveType::Boolean,
            Self::Number(_) => PrimitiveType::Number,
            Self::String(_) => PrimitiveType::String,
        }
    }

    pub fn to_runtime(&self) -> RuntimeValue {
        match self {
            Self::Boolean(value) => RuntimeValue::Bool(*value),
            Self::Number(value) => RuntimeValue::Number(*value),
            Self::String(value) => RuntimeValue::String(value.clone()),
        }
    }

    pub fn to_display_text(&self) -> String {
        match self {
            Self::Boolean(value) => value.to_string(),
            Self::Number(value) => format_number(*value),
            Self::String(value) => value.clone(),
        }
    }

    /// Converts any runtime value into the requested primitive type.
    pub fn coerce(target: PrimitiveType, source: &RuntimeValue) -> Primitive {
        match target {
            PrimitiveType::Boolean => Self::Boolean(coerce_boolean(source)),
            PrimitiveType::Number => Self::Number(source.to_number()),
            PrimitiveType::String => Self::String(coerce_string(source)),
        }
    }

    /// Picks a primitive type from the runtime shape. Nested collections are
    /// flattened to their JSON text.
    pub fn infer(source: &RuntimeValue) -> Primitive {
        match source {
            RuntimeValue::Bool(value) => Self::Boolean(*value),
            RuntimeValue::Number(value) => Self::Number(*value),
            RuntimeValue::String(value) => Self::String(value.clone()),
            RuntimeValue::Array(_) | RuntimeValue::Map(_) => Self::String(source.to_display_text()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrayValue {
    pub element_type: PrimitiveType,
    #[serde(default)]
    pub elements: Vec<Primitive>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectEntry {
    #[serde(rename = "type")]
    pub entry_type: PrimitiveType,
    pub value: Primitive,
}

impl ObjectEntry {
    pub fn from_primitive(value: Primitive) -> Self {
        Self {
            entry_type: value.primitive_type(),
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ObjectValue {
    #[serde(default)]
    pub keys: BTreeMap<String, ObjectEntry>,
}

/// A variable's value, tagged with its declared type. The tag and the payload
/// shape can never disagree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum VariableValue {
    Boolean(bool),
    Number(#[serde(with = "crate::value::number_or_nan")] f64),
    String(String),
    Array(ArrayValue),
    Object(ObjectValue),
}

impl VariableValue {
    pub fn variable_type(&self) -> VariableType {
        match self {
            Self::Boolean(_) => VariableType::Boolean,
            Self::Number(_) => VariableType::Number,
            Self::String(_) => VariableType::String,
            Self::Array(_) => VariableType::Array,
            Self::Object(_) => VariableType::Object,
        }
    }

    pub fn to_runtime(&self) -> RuntimeValue {
        match self {
            Self::Boolean(value) => RuntimeValue::Bool(*value),
            Self::Number(value) => RuntimeValue::Number(*value),
            Self::String(value) => RuntimeValue::String(value.clone()),
            Self::Array(array) => {
                RuntimeValue::Array(array.elements.iter().map(Primitive::to_runtime).collect())
            }
            Self::Object(object) => RuntimeValue::Map(
                object
                    .keys
                    .iter()
                    .map(|(key, entry)| (key.clone(), entry.value.to_runtime()))
                    .collect(),
            ),
        }
    }

    pub fn to_display_text(&self) -> String {
        self.to_runtime().to_display_text()
    }

    /// Produces the value assigned when `source` is written into a variable of
    /// this value's type. Mismatched collections keep the current value.
    pub fn coerce(&self, source: &RuntimeValue) -> VariableValue {
        match self {
            Self::Boolean(_) => Self::Boolean(coerce_boolean(source)),
            Self::Number(_) => Self::Number(source.to_number()),
            Self::String(_) => Self::String(coerce_string(source)),
            Self::Array(current) => match source {
                RuntimeValue::Array(values) => Self::Array(ArrayValue {
                    element_type: current.element_type,
                    elements: values
                        .iter()
                        .map(|value| Primitive::coerce(current.element_type, value))
                        .collect(),
                }),
                _ => self.clone(),
            },
            Self::Object(_) => match source {
                RuntimeValue::Map(values) => Self::Object(ObjectValue {
                    keys: values
                        .iter()
                        .map(|(key, value)| {
                            (key.clone(), ObjectEntry::from_primitive(Primitive::infer(value)))
                        })
                        .collect(),
                }),
                _ => self.clone(),
            },
        }
    }

    /// Coerces a literal token written by an author (`true`, `42`, `"Ava"`,
    /// `'Ava'`, or JSON for collections) into this value's type.
    pub fn coerce_literal(&self, text: &str) -> VariableValue {
        let trimmed = text.trim();
        match self {
            Self::Boolean(_) => Self::Boolean(trimmed == "true"),
            Self::Number(_) => Self::Number(parse_number(trimmed)),
            Self::String(_) => Self::String(strip_quotes(trimmed).to_string()),
            Self::Array(_) | Self::Object(_) => match serde_json::from_str::<serde_json::Value>(trimmed) {
                Ok(json) => self.coerce(&RuntimeValue::from_json(&json)),
                Err(_) => self.clone(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub value: VariableValue,
}

impl Variable {
    pub fn new(id: impl Into<String>, name: impl Into<String>, value: VariableValue) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            value,
        }
    }

    pub fn variable_type(&self) -> VariableType {
        self.value.variable_type()
    }

    pub fn with_value(&self, value: VariableValue) -> Self {
        Self {
            id: self.id.clone(),
            name: self.name.clone(),
            value,
        }
    }
}

pub fn strip_quotes(text: &str) -> &str {
    for quote in ['"', '\'', '`'] {
        if text.len() >= 2 && text.starts_with(quote) && text.ends_with(quote) {
            return &text[1..text.len() - 1];
        }
    }
    text
}

fn coerce_boolean(source: &RuntimeValue) -> bool {
    match source {
        RuntimeValue::Bool(value) => *value,
        RuntimeValue::String(value) => value.trim() == "true",
        RuntimeValue::Number(value) => *value != 0.0 && !value.is_nan(),
        RuntimeValue::Array(_) | RuntimeValue::Map(_) => false,
    }
}

fn coerce_string(source: &RuntimeValue) -> String {
    match source {
        RuntimeValue::String(value) => value.clone(),
        other => other.to_display_text(),
    }
}

#[cfg(test)]
mod variable_tests {
    use super::*;

    fn string_array(values: &[&str]) -> VariableValue {
        VariableValue::Array(ArrayValue {
            element_type: PrimitiveType::String,
            elements: values
                .iter()
                .map(|value| Primitive::String((*value).to_string()))
                .collect(),
        })
    }

    #[test]
    fn variable_deserializes_every_declared_type() {
        let parsed: Vec<Variable> = serde_json::from_str(
            r#"[
  {"id":"1","name":"flag","type":"boolean","value":true},
  {"id":"2","name":"score","type":"number","value":3},
  {"id":"3","name":"who","type":"string","value":"Ava"},
  {"id":"4","name":"bag","type":"array","value":{"elementType":"string","elements":["rope"]}},
  {"id":"5","name":"hero","type":"object","value":{"keys":{"hp":{"type":"number","value":10}}}}
]"#,
        )
        .expect("variables should deserialize");

        assert_eq!(parsed[0].value, VariableValue::Boolean(true));
        assert_eq!(parsed[1].value, VariableValue::Number(3.0));
        assert_eq!(parsed[2].value, VariableValue::String("Ava".to_string()));
        assert_eq!(parsed[3].value, string_array(&["rope"]));
        let VariableValue::Object(hero) = &parsed[4].value else {
            panic!("hero should be an object");
        };
        assert_eq!(
            hero.keys.get("hp"),
            Some(&ObjectEntry {
                entry_type: PrimitiveType::Number,
                value: Primitive::Number(10.0),
            })
        );
    }

    #[test]
    fn variable_serializes_back_to_document_shape() {
        let variable = Variable::new("1", "score", VariableValue::Number(15.0));
        let json = serde_json::to_value(&variable).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({"id":"1","name":"score","type":"number","value":15.0})
        );
    }

    #[test]
    fn primitive_coercion_follows_declared_type() {
        let flag = VariableValue::Boolean(false);
        assert_eq!(
            flag.coerce(&RuntimeValue::String("true".to_string())),
            VariableValue::Boolean(true)
        );
        assert_eq!(
            flag.coerce(&RuntimeValue::String("yes".to_string())),
            VariableValue::Boolean(false)
        );

        let number = VariableValue::Number(0.0);
        assert_eq!(
            number.coerce(&RuntimeValue::String("12".to_string())),
            VariableValue::Number(12.0)
        );
        let VariableValue::Number(nan) = number.coerce(&RuntimeValue::String("x".to_string()))
        else {
            panic!("number stays a number");
        };
        assert!(nan.is_nan());

        let text = VariableValue::String(String::new());
        assert_eq!(
            text.coerce(&RuntimeValue::Number(5.0)),
            VariableValue::String("5".to_string())
        );
    }

    #[test]
    fn array_coercion_keeps_element_type_and_ignores_non_sequences() {
        let bag = string_array(&["rope"]);
        assert_eq!(
            bag.coerce(&RuntimeValue::Array(vec![
                RuntimeValue::String("rope".to_string()),
                RuntimeValue::Number(2.0),
            ])),
            string_array(&["rope", "2"])
        );
        assert_eq!(bag.coerce(&RuntimeValue::String("lamp".to_string())), bag);
    }

    #[test]
    fn object_coercion_infers_entry_types_and_ignores_non_maps() {
        let hero = VariableValue::Object(ObjectValue::default());
        let rebuilt = hero.coerce(&RuntimeValue::Map(BTreeMap::from([
            ("hp".to_string(), RuntimeValue::Number(7.0)),
            ("alive".to_string(), RuntimeValue::Bool(true)),
        ])));
        let VariableValue::Object(rebuilt) = rebuilt else {
            panic!("object stays an object");
        };
        assert_eq!(rebuilt.keys["hp"].entry_type, PrimitiveType::Number);
        assert_eq!(rebuilt.keys["alive"].entry_type, PrimitiveType::Boolean);

        assert_eq!(hero.coerce(&RuntimeValue::Number(1.0)), hero);
    }

    #[test]
    fn literal_coercion_strips_quotes() {
        let text = VariableValue::String(String::new());
        assert_eq!(
            text.coerce_literal("\"Ava\""),
            VariableValue::String("Ava".to_string())
        );
        assert_eq!(
            text.coerce_literal("'Ava'"),
            VariableValue::String("Ava".to_string())
        );
        assert_eq!(
            VariableValue::Boolean(false).coerce_literal(" true "),
            VariableValue::Boolean(true)
        );
        assert_eq!(
            string_array(&[]).coerce_literal(r#"["a","b"]"#),
            string_array(&["a", "b"])
        );
    }
}
