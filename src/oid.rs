//! Dotted-decimal object identifiers.

/// Parse `"2.5.4.3"` into its arcs. Needs at least two arcs.
pub fn parse(dotted: &str) -> Option<Vec<u64>> {
    let arcs = dotted
        .trim()
        .split('.')
        .map(|arc| arc.parse::<u64>().ok())
        .collect::<Option<Vec<_>>>()?;
    match arcs.as_slice() {
        [first, second, ..] if *first <= 2 && (*first == 2 || *second < 40) => Some(arcs),
        _ => None,
    }
}

pub fn format(arcs: &[u64]) -> String {
    arcs.iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join(".")
}
