use std::sync::OnceLock;

use regex::{Captures, Regex};
use sb_core::{Primitive, VariableSnapshot, VariableValue};

use crate::helpers::value_path::{parse_placeholder_path, PlaceholderPath};

fn placeholder_regex() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| Regex::new(r"\{\{([^{}]*)\}\}").expect("placeholder regex must compile"))
}

/// Replaces every resolvable `{{expr}}` in `text`. Placeholders that do not
/// resolve are copied through untouched.
pub fn interpolate(text: &str, variables: &VariableSnapshot) -> String {
    placeholder_regex()
        .replace_all(text, |captures: &Captures<'_>| {
            resolve_placeholder(&captures[1], variables)
                .unwrap_or_else(|| captures[0].to_string())
        })
        .into_owned()
}

fn resolve_placeholder(expr: &str, variables: &VariableSnapshot) -> Option<String> {
    match parse_placeholder_path(expr) {
        PlaceholderPath::Index { name, index } => match &variables.get(name)?.value {
            VariableValue::Array(array) => array.elements.get(index).map(Primitive::to_display_text),
            _ => None,
        },
        PlaceholderPath::Key { name, key } => match &variables.get(name)?.value {
            VariableValue::Object(object) => {
                object.keys.get(key).map(|entry| entry.value.to_display_text())
            }
            _ => None,
        },
        PlaceholderPath::Whole(name) => Some(variables.get(name)?.value.to_display_text()),
        PlaceholderPath::Invalid => None,
    }
}

#[cfg(test)]
mod interpolate_tests {
    use std::collections::BTreeMap;

    use super::*;
    use sb_core::{ArrayValue, ObjectEntry, ObjectValue, PrimitiveType, Variable};

    fn variables() -> VariableSnapshot {
        VariableSnapshot::from_declared(&[
            Variable::new("1", "name", VariableValue::String("Ava".to_string())),
            Variable::new("2", "score", VariableValue::Number(15.0)),
            Variable::new(
                "3",
                "bag",
                VariableValue::Array(ArrayValue {
                    element_type: PrimitiveType::String,
                    elements: vec![
                        Primitive::String("rope".to_string()),
                        Primitive::String("lamp".to_string()),
                    ],
                }),
            ),
            Variable::new(
                "4",
                "hero",
                VariableValue::Object(ObjectValue {
                    keys: BTreeMap::from([(
                        "hp".to_string(),
                        ObjectEntry::from_primitive(Primitive::Number(10.0)),
                    )]),
                }),
            ),
        ])
    }

    #[test]
    fn substitutes_whole_variables() {
        assert_eq!(interpolate("Hello {{name}}", &variables()), "Hello Ava");
        assert_eq!(interpolate("Score: {{ score }}", &variables()), "Score: 15");
        assert_eq!(
            interpolate("{{bag}} / {{hero}}", &variables()),
            r#"["rope","lamp"] / {"hp":10}"#
        );
    }

    #[test]
    fn substitutes_array_index_and_object_key() {
        assert_eq!(interpolate("{{bag[1]}}", &variables()), "lamp");
        assert_eq!(interpolate("HP {{hero.hp}}", &variables()), "HP 10");
    }

    #[test]
    fn leaves_unresolved_placeholders_untouched() {
        let vars = variables();
        for text in [
            "{{unknown}}",
            "{{bag[9]}}",
            "{{name[0]}}",
            "{{hero.mp}}",
            "{{score.value}}",
            "{{}}",
        ] {
            assert_eq!(interpolate(text, &vars), text);
        }
        assert_eq!(
            interpolate("{{unknown}}", &VariableSnapshot::default()),
            "{{unknown}}"
        );
    }

    #[test]
    fn reinterpolating_is_idempotent() {
        let vars = variables();
        let once = interpolate("{{name}} has {{missing}} and {{bag[5]}}", &vars);
        assert_eq!(once, "Ava has {{missing}} and {{bag[5]}}");
        assert_eq!(interpolate(&once, &vars), once);
    }
}
