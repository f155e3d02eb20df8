/// Addressing forms accepted inside `{{ }}` placeholders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PlaceholderPath<'a> {
    Index { name: &'a str, index: usize },
    Key { name: &'a str, key: &'a str },
    Whole(&'a str),
    Invalid,
}

pub(crate) fn parse_placeholder_path(expr: &str) -> PlaceholderPath<'_> {
    let expr = expr.trim();
    if expr.is_empty() {
        return PlaceholderPath::Invalid;
    }

    if let Some(open) = expr.find('[') {
        let Some(inner) = expr[open + 1..].strip_suffix(']') else {
            return PlaceholderPath::Invalid;
        };
        let name = expr[..open].trim();
        return match inner.trim().parse::<usize>() {
            Ok(index) if !name.is_empty() => PlaceholderPath::Index { name, index },
            _ => PlaceholderPath::Invalid,
        };
    }

    if let Some((name, key)) = expr.split_once('.') {
        let (name, key) = (name.trim(), key.trim());
        if name.is_empty() || key.is_empty() {
            return PlaceholderPath::Invalid;
        }
        return PlaceholderPath::Key { name, key };
    }

    PlaceholderPath::Whole(expr)
}
