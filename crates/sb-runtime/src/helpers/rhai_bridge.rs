use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;
use rhai::{Array, Dynamic, ImmutableString, Map, FLOAT, INT};
use sb_core::{RuntimeValue, StoryError};

pub(crate) fn runtime_to_dynamic(value: &RuntimeValue) -> Dynamic {
    match value {
        RuntimeValue::Bool(value) => Dynamic::from_bool(*value),
        RuntimeValue::Number(value) => Dynamic::from_float(*value as FLOAT),
        RuntimeValue::String(value) => Dynamic::from(value.clone()),
        RuntimeValue::Array(values) => {
            Dynamic::from_array(values.iter().map(runtime_to_dynamic).collect::<Array>())
        }
        RuntimeValue::Map(values) => {
            let mut map = Map::new();
            for (key, value) in values {
                map.insert(key.as_str().into(), runtime_to_dynamic(value));
            }
            Dynamic::from_map(map)
        }
    }
}

pub(crate) fn dynamic_to_runtime(value: Dynamic) -> Result<RuntimeValue, StoryError> {
    if value.is::<bool>() {
        return Ok(RuntimeValue::Bool(value.cast::<bool>()));
    }
    if value.is::<INT>() {
        return Ok(RuntimeValue::Number(value.cast::<INT>() as f64));
    }
    if value.is::<FLOAT>() {
        return Ok(RuntimeValue::Number(value.cast::<FLOAT>()));
    }
    if value.is::<ImmutableString>() {
        return Ok(RuntimeValue::String(
            value.cast::<ImmutableString>().to_string(),
        ));
    }
    if value.is::<char>() {
        return Ok(RuntimeValue::String(value.cast::<char>().to_string()));
    }
    if value.is::<Array>() {
        let array = value.cast::<Array>();
        let mut out = Vec::with_capacity(array.len());
        for item in array {
            out.push(dynamic_to_runtime(item)?);
        }
        return Ok(RuntimeValue::Array(out));
    }
    if value.is::<Map>() {
        let map = value.cast::<Map>();
        let mut out = BTreeMap::new();
        for (key, value) in map {
            out.insert(key.to_string(), dynamic_to_runtime(value)?);
        }
        return Ok(RuntimeValue::Map(out));
    }

    Err(StoryError::new(
        "SCRIPT_VALUE_UNSUPPORTED",
        format!("Unsupported script value type \"{}\".", value.type_name()),
    ))
}

fn increment_regex() -> &'static Regex {
    static INCREMENT: OnceLock<Regex> = OnceLock::new();
    INCREMENT.get_or_init(|| {
        Regex::new(r"([A-Za-z_$][A-Za-z0-9_$]*)\s*(\+\+|--)").expect("increment regex must compile")
    })
}

/// Rewrites browser-style statement spellings into their Rhai equivalents.
/// Quoted text and `//` comments are left alone. Bare statements on their own
/// line get a terminating `;`.
pub(crate) fn normalize_script_source(source: &str) -> String {
    let rewritten = rewrite_outside_literals(source);
    let lines = rewritten.lines().collect::<Vec<_>>();

    let mut out = String::with_capacity(rewritten.len() + 8);
    for (index, line) in lines.iter().enumerate() {
        let (code, comment) = split_line_comment(line.trim_end());
        let code = code.trim_end();
        out.push_str(code);
        if needs_terminator(code) && !continues_on_next_line(&lines[index + 1..]) {
            out.push(';');
        }
        if !comment.is_empty() {
            if !code.is_empty() {
                out.push(' ');
            }
            out.push_str(comment);
        }
        out.push('\n');
    }
    out
}

fn rewrite_code(code: &str) -> String {
    let rewritten = code.replace("===", "==").replace("!==", "!=");
    increment_regex()
        .replace_all(&rewritten, |captures: &regex::Captures<'_>| {
            let op = if &captures[2] == "++" { "+=" } else { "-=" };
            format!("{} {} 1", &captures[1], op)
        })
        .into_owned()
}

fn rewrite_outside_literals(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut code = String::new();
    let mut chars = source.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '"' | '\'' | '`' => {
                out.push_str(&rewrite_code(&std::mem::take(&mut code)));
                out.push(ch);
                let mut escaped = false;
                for inner in chars.by_ref() {
                    out.push(inner);
                    if escaped {
                        escaped = false;
                    } else if inner == '\\' {
                        escaped = true;
                    } else if inner == ch {
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'/') => {
                out.push_str(&rewrite_code(&std::mem::take(&mut code)));
                out.push(ch);
                for inner in chars.by_ref() {
                    if inner == '\n' {
                        code.push(inner);
                        break;
                    }
                    out.push(inner);
                }
            }
            _ => code.push(ch),
        }
    }
    out.push_str(&rewrite_code(&code));
    out
}

/// Splits a line at a `//` comment that is not inside quotes.
fn split_line_comment(line: &str) -> (&str, &str) {
    let mut quote = None;
    let mut escaped = false;
    let mut previous_slash = false;
    for (index, ch) in line.char_indices() {
        if let Some(open) = quote {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == open {
                quote = None;
            }
            continue;
        }
        match ch {
            '"' | '\'' | '`' => quote = Some(ch),
            '/' if previous_slash => return line.split_at(index - 1),
            _ => {}
        }
        previous_slash = ch == '/';
    }
    (line, "")
}

fn needs_terminator(code: &str) -> bool {
    let Some(last) = code.chars().last() else {
        return false;
    };
    !matches!(
        last,
        ';' | '{' | '}' | '(' | '[' | ',' | '+' | '-' | '*' | '/' | '%' | '=' | '&' | '|'
            | '!' | '<' | '>' | '.' | '?' | ':' | '\\'
    )
}

// A statement continues when the next code line opens its block, carries its
// `else`, or chains a method call.
fn continues_on_next_line(rest: &[&str]) -> bool {
    let Some(next) = rest
        .iter()
        .map(|line| split_line_comment(line).0.trim())
        .find(|code| !code.is_empty())
    else {
        return false;
    };
    if next.starts_with('{') || next.starts_with('.') {
        return true;
    }
    next.strip_prefix("else")
        .is_some_and(|tail| !tail.starts_with(|ch: char| ch.is_alphanumeric() || ch == '_'))
}

#[cfg(test)]
mod rhai_bridge_tests {
    use super::*;

    #[test]
    fn runtime_values_cross_the_bridge_unchanged() {
        let value = RuntimeValue::Map(BTreeMap::from([
            (
                "bag".to_string(),
                RuntimeValue::Array(vec![RuntimeValue::String("rope".to_string())]),
            ),
            ("hp".to_string(), RuntimeValue::Number(2.5)),
            ("alive".to_string(), RuntimeValue::Bool(true)),
        ]));
        let back = dynamic_to_runtime(runtime_to_dynamic(&value)).expect("roundtrip");
        assert_eq!(back, value);
    }

    #[test]
    fn integers_become_numbers() {
        assert_eq!(
            dynamic_to_runtime(Dynamic::from_int(7)).expect("int"),
            RuntimeValue::Number(7.0)
        );
        assert_eq!(
            dynamic_to_runtime(Dynamic::from_char('a')).expect("char"),
            RuntimeValue::String("a".to_string())
        );
    }

    #[test]
    fn unit_is_rejected() {
        let error = dynamic_to_runtime(Dynamic::UNIT).expect_err("unit has no mapping");
        assert_eq!(error.code, "SCRIPT_VALUE_UNSUPPORTED");
    }

    #[test]
    fn normalize_terminates_bare_statements() {
        assert_eq!(
            normalize_script_source("score = 5\nscore += 10"),
            "score = 5;\nscore += 10;\n"
        );
        assert_eq!(
            normalize_script_source("if score > 1 {\n  won = true\n}"),
            "if score > 1 {\n  won = true;\n}\n"
        );
    }

    #[test]
    fn normalize_leaves_quoted_text_and_comments_alone() {
        assert_eq!(
            normalize_script_source("lang = \"C++\"\nok = tag == 'a===b'"),
            "lang = \"C++\";\nok = tag == 'a===b';\n"
        );
        assert_eq!(
            normalize_script_source("say = \"x \\\" y++\" // don't count++"),
            "say = \"x \\\" y++\"; // don't count++\n"
        );
        assert_eq!(normalize_script_source("// only a note"), "// only a note\n");
    }

    #[test]
    fn normalize_keeps_statements_open_before_blocks_and_else() {
        assert_eq!(
            normalize_script_source("if (gold > 1)\n{\n  half = 1\n}\nelse\n{\n  half = 0\n}"),
            "if (gold > 1)\n{\n  half = 1;\n}\nelse\n{\n  half = 0;\n}\n"
        );
        assert_eq!(
            normalize_script_source("score = 1\nelsewhere = 2"),
            "score = 1;\nelsewhere = 2;\n"
        );
        assert_eq!(
            normalize_script_source("bag\n  .push(1)"),
            "bag\n  .push(1);\n"
        );
    }

    #[test]
    fn normalize_rewrites_strict_equality_and_increments() {
        assert_eq!(
            normalize_script_source("ok = name === \"Ava\";"),
            "ok = name == \"Ava\";\n"
        );
        assert_eq!(normalize_script_source("count++;"), "count += 1;\n");
        assert_eq!(normalize_script_source("lives--"), "lives -= 1;\n");
    }
}
