use phf::Map;
use thiserror::Error;

/// An identifier that does not name any member of a fixed vocabulary
/// (plate readers, sequencers, pooling policies).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown {kind} '{value}'; expected one of: {}", .accepted.join(", "))]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
    pub accepted: Vec<&'static str>,
}

/// Looks an identifier up in a static table, reporting the sorted list of
/// accepted keys when it is missing.
pub fn lookup_variant<V: Clone>(
    table: &'static Map<&'static str, V>,
    kind: &'static str,
    value: &str,
) -> Result<V, UnknownVariant> {
    table
        .get(value.trim())
        .cloned()
        .ok_or_else(|| UnknownVariant {
            kind,
            value: value.to_string(),
            accepted: accepted_names(table),
        })
}

pub fn accepted_names<V>(table: &'static Map<&'static str, V>) -> Vec<&'static str> {
    let mut names: Vec<&'static str> = table.keys().copied().collect();
    names.sort_unstable();
    names
}

/// Sorted, de-duplicated list of the values that occur more than once.
pub fn find_duplicates<'a>(values: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut duplicates: Vec<String> = values
        .into_iter()
        .filter(|v| !seen.insert(*v))
        .map(str::to_string)
        .collect();
    duplicates.sort_unstable();
    duplicates.dedup();
    duplicates
}
