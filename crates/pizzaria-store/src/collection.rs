use std::fmt;

/// A table in the hosted database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Collection {
    Products,
    OptionGroups,
    OptionItems,
}

impl Collection {
    pub const ALL: [Self; 3] = [Self::Products, Self::OptionGroups, Self::OptionItems];

    #[must_use]
    pub fn table_name(self) -> &'static str {
        match self {
            Self::Products => "produtos",
            Self::OptionGroups => "grupos_opcionais",
            Self::OptionItems => "itens_opcionais",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table_name())
    }
}
