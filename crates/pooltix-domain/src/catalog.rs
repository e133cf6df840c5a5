//! Ticket type catalog.

use std::{collections::HashSet, fmt};

use serde::{Deserialize, Serialize};

/// A category of ticket and its default unit price.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TicketType {
    pub id: String,
    pub name: String,
    /// Unit price; `0` means the amount is variable.
    pub price: u64,
    pub color: String,
    pub icon: String,
    /// Whether the operator must enter an amount at issuance.
    #[serde(default)]
    pub amount_required: bool,
}

impl TicketType {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        price: u64,
        color: impl Into<String>,
        icon: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            color: color.into(),
            icon: icon.into(),
            amount_required: false,
        }
    }

    pub fn requiring_amount(mut self) -> Self {
        self.amount_required = true;
        self
    }

    pub fn is_variable(&self) -> bool {
        self.price == 0
    }
}

// id, name, price, color, icon, amount required
const STANDARD_TYPES: [(&str, &str, u64, &str, &str, bool); 11] = [
    ("adult", "تعرفه آزاد", 220_000, "#4CAF50", "person", false),
    ("child", "زیر ۵ سال", 190_000, "#2196F3", "child-care", false),
    ("poolro", "پول‌رو", 0, "#FF9800", "card-membership", false),
    ("offticket", "آف تیکت", 0, "#9C27B0", "local-offer", false),
    ("offcard", "آف کارت", 0, "#E91E63", "credit-card", false),
    ("paper", "بلیط کاغذی متفرقه", 0, "#795548", "receipt", false),
    ("private", "آموزش خصوصی", 4_700_000, "#F44336", "school", false),
    ("semiprivate", "آموزش نیمه خصوصی", 3_800_000, "#3F51B5", "group", false),
    ("cash", "مبلغ نقدی", 0, "#607D8B", "attach-money", true),
    ("buffet_card", "کارتخوان بوفه", 0, "#00BCD4", "credit-card", true),
    ("buffet_cash", "نقدی بوفه", 0, "#8BC34A", "restaurant", true),
];

/// Ordered, id-unique collection of ticket types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Catalog {
    types: Vec<TicketType>,
}

impl Catalog {
    pub fn new(types: Vec<TicketType>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for ticket_type in &types {
            if ticket_type.id.trim().is_empty() {
                return Err(CatalogError::EmptyId);
            }
            if !seen.insert(ticket_type.id.as_str()) {
                return Err(CatalogError::DuplicateId(ticket_type.id.clone()));
            }
        }
        Ok(Self { types })
    }

    /// The built-in eleven-entry catalog.
    pub fn standard() -> Self {
        let types = STANDARD_TYPES
            .iter()
            .map(|(id, name, price, color, icon, amount_required)| TicketType {
                id: (*id).to_string(),
                name: (*name).to_string(),
                price: *price,
                color: (*color).to_string(),
                icon: (*icon).to_string(),
                amount_required: *amount_required,
            })
            .collect();
        Self { types }
    }

    pub fn find(&self, id: &str) -> Option<&TicketType> {
        self.types.iter().find(|ticket_type| ticket_type.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    /// Iterates in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &TicketType> {
        self.types.iter()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Errors that can occur when constructing a [`Catalog`].
pub enum CatalogError {
    EmptyId,
    DuplicateId(String),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::EmptyId => f.write_str("ticket type id must not be empty"),
            CatalogError::DuplicateId(id) => write!(f, "duplicate ticket type id `{}`", id),
        }
    }
}

impl std::error::Error for CatalogError {}
