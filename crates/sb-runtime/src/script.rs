use std::sync::{Arc, OnceLock};

use regex::Regex;
use rhai::{Dynamic, Engine, ImmutableString, Scope, FLOAT, INT};
use sb_core::{format_number, Variable, VariableSnapshot};
use tracing::{debug, info, warn};

use crate::helpers::rhai_bridge::{dynamic_to_runtime, normalize_script_source, runtime_to_dynamic};

/// Resource ceilings applied to every script run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptLimits {
    pub max_operations: u64,
    pub max_call_depth: usize,
    pub max_string_size: usize,
    pub max_array_size: usize,
    pub max_map_size: usize,
}

impl Default for ScriptLimits {
    fn default() -> Self {
        Self {
            max_operations: 100_000,
            max_call_depth: 32,
            max_string_size: 64 * 1024,
            max_array_size: 10_000,
            max_map_size: 10_000,
        }
    }
}

fn script_block_regex() -> &'static Regex {
    static SCRIPT_BLOCK: OnceLock<Regex> = OnceLock::new();
    SCRIPT_BLOCK.get_or_init(|| {
        Regex::new(r"(?is)<script\b[^>]*>(.*?)</script\s*>").expect("script block regex must compile")
    })
}

/// Collects the code of every `<script>` block in document order.
pub fn extract_script_fragments(content: &str) -> Vec<String> {
    script_block_regex()
        .captures_iter(content)
        .map(|captures| captures[1].trim().to_string())
        .filter(|code| !code.is_empty())
        .collect()
}

/// Content with every `<script>` block removed, ready for interpolation.
pub fn strip_script_fragments(content: &str) -> String {
    script_block_regex().replace_all(content, "").trim().to_string()
}

/// Runs authored code fragments against a variable snapshot.
///
/// Each variable is bound by name in a fresh scope. After the run, bindings
/// whose value changed are coerced back into their declared type; untouched
/// variables are carried over as the same allocation. A failing script leaves
/// the snapshot exactly as it was.
pub struct ScriptExecutor {
    engine: Engine,
}

impl ScriptExecutor {
    pub fn new(limits: ScriptLimits) -> Self {
        let mut engine = Engine::new();
        engine.set_strict_variables(true);
        engine.set_max_operations(limits.max_operations);
        engine.set_max_call_levels(limits.max_call_depth);
        engine.set_max_string_size(limits.max_string_size);
        engine.set_max_array_size(limits.max_array_size);
        engine.set_max_map_size(limits.max_map_size);
        // Built-in fast paths ignore overloads on standard types.
        engine.set_fast_operators(false);
        register_number_operators(&mut engine);
        engine.on_print(|text| info!(target: "sb_runtime::script", "{}", text));
        engine.on_debug(|text, _source, position| {
            debug!(target: "sb_runtime::script", %position, "{}", text)
        });
        Self { engine }
    }

    pub fn run(&self, code: &str, variables: &VariableSnapshot) -> VariableSnapshot {
        if code.trim().is_empty() {
            return variables.clone();
        }

        let mut scope = Scope::new();
        let mut before = Vec::with_capacity(variables.len());
        for variable in variables.iter() {
            let value = variable.value.to_runtime();
            scope.push_dynamic(variable.name.clone(), runtime_to_dynamic(&value));
            before.push(value);
        }

        let source = normalize_script_source(code);
        if let Err(error) = self.engine.run_with_scope(&mut scope, &source) {
            warn!(%error, "script fragment failed; variables left unchanged");
            return variables.clone();
        }

        let next = variables
            .iter()
            .zip(before)
            .map(|(variable, before)| rebind(variable, &before, &scope))
            .collect();
        VariableSnapshot::from_shared(next)
    }
}

/// Story numbers are one numeric type: dividing whole numbers keeps the
/// fraction, and a whole number joins a string without a trailing `.0`.
fn register_number_operators(engine: &mut Engine) {
    engine.register_fn("/", |left: INT, right: INT| -> FLOAT { left as FLOAT / right as FLOAT });
    engine.register_fn("+", |left: ImmutableString, right: FLOAT| -> ImmutableString {
        format!("{}{}", left, format_number(right)).into()
    });
    engine.register_fn("+", |left: FLOAT, right: ImmutableString| -> ImmutableString {
        format!("{}{}", format_number(left), right).into()
    });
    engine.register_fn("+=", |left: &mut ImmutableString, right: FLOAT| {
        *left = format!("{}{}", left, format_number(right)).into();
    });
}

fn rebind(
    variable: &Arc<Variable>,
    before: &sb_core::RuntimeValue,
    scope: &Scope<'_>,
) -> Arc<Variable> {
    let Some(after) = scope.get_value::<Dynamic>(&variable.name) else {
        return Arc::clone(variable);
    };
    match dynamic_to_runtime(after) {
        Ok(after) if after.same_value(before) => Arc::clone(variable),
        Ok(after) => Arc::new(variable.with_value(variable.value.coerce(&after))),
        Err(error) => {
            warn!(variable = %variable.name, %error, "script left a value with no variable mapping");
            Arc::clone(variable)
        }
    }
}
