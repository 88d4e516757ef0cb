use super::ids::ComponentKey;

/// Total energy (electronic + HF + dispersion, Hartree) of every molecule in a batch.
///
/// Entries keep insertion order, which is the component order of the batch. The reaction
/// combiner pairs coefficients with energies by position, so this order is load-bearing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MoleculeEnergies {
    entries: Vec<(ComponentKey, f64)>,
}

impl MoleculeEnergies {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, key: ComponentKey, energy: f64) {
        self.entries.push((key, energy));
    }

    pub fn get(&self, key: &ComponentKey) -> Option<f64> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, energy)| *energy)
    }

    /// Energies of every molecule with the given name, in component order.
    pub fn by_name(&self, name: &str) -> Vec<f64> {
        self.entries
            .iter()
            .filter(|(k, _)| k.name == name)
            .map(|(_, energy)| *energy)
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ComponentKey, f64)> {
        self.entries.iter().map(|(k, e)| (k, *e))
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.entries.iter().map(|(_, e)| *e)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(ComponentKey, f64)> for MoleculeEnergies {
    fn from_iter<I: IntoIterator<Item = (ComponentKey, f64)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserves_insertion_order() {
        let mut energies = MoleculeEnergies::new();
        energies.push(ComponentKey::new("B", 0), -5.0);
        energies.push(ComponentKey::new("A", 1), -10.0);
        let values: Vec<f64> = energies.values().collect();
        assert_eq!(values, vec![-5.0, -10.0]);
    }

    #[test]
    fn duplicate_names_are_kept_separately() {
        let energies: MoleculeEnergies = [
            (ComponentKey::new("H2", 0), -1.1),
            (ComponentKey::new("O2", 1), -150.0),
            (ComponentKey::new("H2", 2), -1.2),
        ]
        .into_iter()
        .collect();

        assert_eq!(energies.len(), 3);
        assert_eq!(energies.get(&ComponentKey::new("H2", 0)), Some(-1.1));
        assert_eq!(energies.get(&ComponentKey::new("H2", 2)), Some(-1.2));
        assert_eq!(energies.by_name("H2"), vec![-1.1, -1.2]);
        assert_eq!(energies.get(&ComponentKey::new("H2", 1)), None);
    }
}
