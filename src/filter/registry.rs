/// One of the two independent facet families.
///
/// The `as_str()` value is used in logs and CLI output; `wire_param()` is the
/// catalog's query parameter name. Once published, do not rename either.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FacetFamily {
    Dietary,
    Cuisine,
}

impl FacetFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dietary => "dietary",
            Self::Cuisine => "cuisine",
        }
    }

    /// Query parameter the catalog expects for this family.
    pub fn wire_param(&self) -> &'static str {
        match self {
            Self::Dietary => "health",
            Self::Cuisine => "cuisineType",
        }
    }

    /// Section header shown above the family's options.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Dietary => "Restrictions",
            Self::Cuisine => "Cuisine",
        }
    }

    /// All variants, in display order.
    pub fn all() -> &'static [FacetFamily] {
        &[Self::Dietary, Self::Cuisine]
    }

    /// Parse from `as_str()` form. Unknown values return `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "dietary" => Some(Self::Dietary),
            "cuisine" => Some(Self::Cuisine),
            _ => None,
        }
    }
}

/// Definition of a single selectable facet option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacetDef {
    pub family: FacetFamily,
    /// Catalog wire value. Case-sensitive.
    pub name: &'static str,
    pub label: &'static str,
}

/// The fixed enumeration of legal facet options.
///
/// Registry order is display order. Adding an option = one `FacetDef` in
/// `builtin_registry()`.
#[derive(Debug, Clone)]
pub struct FacetRegistry {
    defs: Vec<FacetDef>,
}

impl FacetRegistry {
    pub fn builtin() -> Self {
        Self {
            defs: builtin_registry(),
        }
    }

    pub fn defs(&self) -> &[FacetDef] {
        &self.defs
    }

    /// Options of one family in display order.
    pub fn options(&self, family: FacetFamily) -> impl Iterator<Item = &FacetDef> {
        self.defs.iter().filter(move |d| d.family == family)
    }

    pub fn contains(&self, family: FacetFamily, name: &str) -> bool {
        self.find(family, name).is_some()
    }

    pub fn label_for(&self, family: FacetFamily, name: &str) -> Option<&'static str> {
        self.find(family, name).map(|d| d.label)
    }

    fn find(&self, family: FacetFamily, name: &str) -> Option<&FacetDef> {
        self.defs
            .iter()
            .find(|d| d.family == family && d.name == name)
    }
}

impl Default for FacetRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

fn builtin_registry() -> Vec<FacetDef> {
    use FacetFamily::{Cuisine, Dietary};

    let dietary = [
        ("vegan", "Vegan"),
        ("vegetarian", "Vegetarian"),
        ("dairy-free", "Dairy free"),
        ("DASH", "DASH diet"),
        ("gluten-free", "Gluten free"),
        ("paleo", "Paleo diet"),
        ("peanut-free", "Peanut free"),
        ("soy-free", "Soy free"),
    ];
    let cuisine = [
        ("American", "American"),
        ("Asian", "Asian"),
        ("Caribbean", "Caribbean"),
        ("Chinese", "Chinese"),
        ("French", "French"),
        ("Indian", "Indian"),
        ("Italian", "Italian"),
        ("Japanese", "Japanese"),
        ("Kosher", "Kosher"),
        ("Mediterranean", "Mediterranean"),
        ("Mexican", "Mexican"),
        ("Nordic", "Nordic"),
        ("South American", "South American"),
    ];

    dietary
        .into_iter()
        .map(|(name, label)| FacetDef {
            family: Dietary,
            name,
            label,
        })
        .chain(cuisine.into_iter().map(|(name, label)| FacetDef {
            family: Cuisine,
            name,
            label,
        }))
        .collect()
}
