use sb_core::{RuntimeValue, Variable, VariableSnapshot, VariableValue};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CompareOp {
    Eq,
    Ne,
    Gt,
    Lt,
    Ge,
    Le,
}

// Longest spellings first so `===` is not read as `==` followed by `=`.
const OPERATORS: [(&str, CompareOp); 8] = [
    ("===", CompareOp::Eq),
    ("!==", CompareOp::Ne),
    ("==", CompareOp::Eq),
    ("!=", CompareOp::Ne),
    (">=", CompareOp::Ge),
    ("<=", CompareOp::Le),
    (">", CompareOp::Gt),
    ("<", CompareOp::Lt),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Comparison<'a> {
    left: &'a str,
    op: CompareOp,
    right: &'a str,
}

enum Operand<'a> {
    Variable(&'a Variable),
    Literal(&'a str),
}

/// Evaluates a single `operand op operand` comparison against the store.
///
/// Empty text and the literal `true` always pass. Anything that cannot be
/// resolved, such as an unknown variable, a missing or repeated operator, or a
/// `NaN` operand, evaluates to `false`.
pub fn evaluate_condition(condition: &str, variables: &VariableSnapshot) -> bool {
    let condition = condition.trim();
    if condition.is_empty() || condition == "true" {
        return true;
    }

    let Some(comparison) = split_comparison(condition) else {
        debug!(condition, "condition is not a single comparison");
        return false;
    };

    let left = resolve_operand(comparison.left, variables);
    let right = resolve_operand(comparison.right, variables);
    let (left, right) = match (left, right) {
        (Operand::Variable(left), Operand::Variable(right)) => {
            (left.value.clone(), right.value.clone())
        }
        (Operand::Variable(left), Operand::Literal(raw)) => {
            (left.value.clone(), left.value.coerce_literal(raw))
        }
        (Operand::Literal(raw), Operand::Variable(right)) => {
            (right.value.coerce_literal(raw), right.value.clone())
        }
        (Operand::Literal(_), Operand::Literal(_)) => {
            debug!(condition, "condition names no declared variable");
            return false;
        }
    };

    apply(comparison.op, &left, &right)
}

fn resolve_operand<'a>(raw: &'a str, variables: &'a VariableSnapshot) -> Operand<'a> {
    match variables.get(raw) {
        Some(variable) => Operand::Variable(variable),
        None => Operand::Literal(raw),
    }
}

/// Finds exactly one comparison operator outside quoted text and splits the
/// condition around it.
fn split_comparison(text: &str) -> Option<Comparison<'_>> {
    let mut found: Option<(usize, usize, CompareOp)> = None;
    let mut quote: Option<char> = None;
    let mut cursor = 0usize;

    while cursor < text.len() {
        let rest = &text[cursor..];
        let ch = rest.chars().next()?;

        if let Some(open) = quote {
            if ch == open {
                quote = None;
            }
            cursor += ch.len_utf8();
            continue;
        }
        if matches!(ch, '"' | '\'' | '`') {
            quote = Some(ch);
            cursor += ch.len_utf8();
            continue;
        }

        match OPERATORS
            .iter()
            .find(|(spelling, _)| rest.starts_with(spelling))
        {
            Some((spelling, op)) => {
                if found.is_some() {
                    return None;
                }
                found = Some((cursor, spelling.len(), *op));
                cursor += spelling.len();
            }
            None => cursor += ch.len_utf8(),
        }
    }

    if quote.is_some() {
        return None;
    }

    let (start, len, op) = found?;
    let left = text[..start].trim();
    let right = text[start + len..].trim();
    if left.is_empty() || right.is_empty() {
        return None;
    }
    Some(Comparison { left, op, right })
}

fn apply(op: CompareOp, left: &VariableValue, right: &VariableValue) -> bool {
    let left = left.to_runtime();
    let right = right.to_runtime();
    if is_nan(&left) || is_nan(&right) {
        return false;
    }

    match op {
        CompareOp::Eq => left == right,
        CompareOp::Ne => left != right,
        CompareOp::Gt => ordered(&left, &right, |l, r| l > r),
        CompareOp::Lt => ordered(&left, &right, |l, r| l < r),
        CompareOp::Ge => ordered(&left, &right, |l, r| l >= r),
        CompareOp::Le => ordered(&left, &right, |l, r| l <= r),
    }
}

fn ordered(left: &RuntimeValue, right: &RuntimeValue, compare: impl Fn(f64, f64) -> bool) -> bool {
    let (left, right) = (left.to_number(), right.to_number());
    if left.is_nan() || right.is_nan() {
        return false;
    }
    compare(left, right)
}

fn is_nan(value: &RuntimeValue) -> bool {
    matches!(value, RuntimeValue::Number(number) if number.is_nan())
}
