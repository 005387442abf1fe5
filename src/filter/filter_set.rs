use std::collections::BTreeMap;

use super::registry::{FacetFamily, FacetRegistry};

/// Toggle state for every known facet option.
///
/// Keys are fixed at construction from a [`FacetRegistry`]; toggling a name
/// outside that enumeration leaves the mapping untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSet {
    dietary: BTreeMap<String, bool>,
    cuisine: BTreeMap<String, bool>,
}

impl FilterSet {
    /// A filter set with every registry option deselected.
    pub fn empty(registry: &FacetRegistry) -> Self {
        let mut set = Self {
            dietary: BTreeMap::new(),
            cuisine: BTreeMap::new(),
        };
        for def in registry.defs() {
            set.family_mut(def.family).insert(def.name.to_string(), false);
        }
        set
    }

    /// Flip one option. Returns `false` if the option is unknown.
    pub fn toggle(&mut self, family: FacetFamily, option: &str) -> bool {
        match self.family_mut(family).get_mut(option) {
            Some(selected) => {
                *selected = !*selected;
                true
            }
            None => {
                tracing::debug!(
                    family = family.as_str(),
                    option = %option,
                    "Ignoring toggle of unknown facet option"
                );
                false
            }
        }
    }

    /// Set one option explicitly. Returns `false` if the option is unknown.
    pub fn set(&mut self, family: FacetFamily, option: &str, selected: bool) -> bool {
        match self.family_mut(family).get_mut(option) {
            Some(slot) => {
                *slot = selected;
                true
            }
            None => false,
        }
    }

    pub fn is_selected(&self, family: FacetFamily, option: &str) -> bool {
        self.family(family).get(option).copied().unwrap_or(false)
    }

    /// Selected option names of one family, lexicographically sorted.
    pub fn selected(&self, family: FacetFamily) -> impl Iterator<Item = &str> {
        self.family(family)
            .iter()
            .filter(|(_, selected)| **selected)
            .map(|(name, _)| name.as_str())
    }

    pub fn selected_count(&self) -> usize {
        FacetFamily::all()
            .iter()
            .map(|f| self.selected(*f).count())
            .sum()
    }

    /// Deselect everything.
    pub fn clear(&mut self) {
        for value in self.dietary.values_mut().chain(self.cuisine.values_mut()) {
            *value = false;
        }
    }

    fn family(&self, family: FacetFamily) -> &BTreeMap<String, bool> {
        match family {
            FacetFamily::Dietary => &self.dietary,
            FacetFamily::Cuisine => &self.cuisine,
        }
    }

    fn family_mut(&mut self, family: FacetFamily) -> &mut BTreeMap<String, bool> {
        match family {
            FacetFamily::Dietary => &mut self.dietary,
            FacetFamily::Cuisine => &mut self.cuisine,
        }
    }
}
