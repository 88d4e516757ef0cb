use std::fmt;

/// Identifies one molecule within a batch.
///
/// The same molecule name can appear in several reactions of a batch (e.g. `H2` as a reactant
/// in two different reactions), so the global position of the component in the concatenated
/// component list is part of the key. The name is kept for display and dispersion lookups.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentKey {
    pub name: String,
    pub occurrence: usize,
}

impl ComponentKey {
    pub fn new(name: impl Into<String>, occurrence: usize) -> Self {
        Self {
            name: name.into(),
            occurrence,
        }
    }
}

impl fmt::Display for ComponentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.name, self.occurrence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn keys_with_same_name_but_different_occurrence_are_distinct() {
        let a = ComponentKey::new("H2", 0);
        let b = ComponentKey::new("H2", 3);
        assert_ne!(a, b);

        let set: HashSet<_> = [a.clone(), b, a].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn display_includes_name_and_occurrence() {
        assert_eq!(ComponentKey::new("CH4", 2).to_string(), "CH4#2");
    }
}
