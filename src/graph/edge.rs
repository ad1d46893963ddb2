/// A directed dependency between two repository-relative paths.
///
/// Not deduplicated: a file importing the same module twice yields two equal edges.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Edge {
    pub from: String,
    pub to: String,
}
