//! Validation and price resolution for ticket issuance requests.

use pooltix_domain::{Catalog, Ticket, TicketType};

use crate::{format::parse_amount, CoreError, LedgerStore};

/// Raw operator input for one issuance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueRequest {
    pub type_id: Option<String>,
    pub amount: Option<String>,
    pub quantity: u32,
}

impl Default for IssueRequest {
    fn default() -> Self {
        Self {
            type_id: None,
            amount: None,
            quantity: 1,
        }
    }
}

impl IssueRequest {
    pub fn new(type_id: impl Into<String>) -> Self {
        Self {
            type_id: Some(type_id.into()),
            ..Self::default()
        }
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn with_amount(mut self, amount: impl Into<String>) -> Self {
        self.amount = Some(amount.into());
        self
    }
}

/// A request whose type and unit price are settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIssue<'a> {
    pub ticket_type: &'a TicketType,
    pub unit_price: u64,
    pub quantity: u32,
}

impl ResolvedIssue<'_> {
    pub fn order_total(&self) -> u64 {
        self.unit_price.saturating_mul(u64::from(self.quantity))
    }
}

pub struct IssueService;

impl IssueService {
    /// Checks the request against the catalog before anything is mutated.
    ///
    /// Amount-required types take the entered amount, which must be non-zero.
    /// Every other type is charged its catalog price, including zero-priced
    /// voucher types.
    pub fn resolve<'a>(
        catalog: &'a Catalog,
        request: &IssueRequest,
    ) -> Result<ResolvedIssue<'a>, CoreError> {
        let type_id = request
            .type_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| CoreError::Validation("select a ticket type".into()))?;
        let ticket_type = catalog
            .find(type_id)
            .ok_or_else(|| CoreError::UnknownTicketType(type_id.to_string()))?;
        if request.quantity == 0 {
            return Err(CoreError::Validation("quantity must be at least 1".into()));
        }

        let unit_price = if ticket_type.amount_required {
            let raw = request.amount.as_deref().unwrap_or_default();
            match parse_amount(raw)? {
                0 => return Err(CoreError::Validation("enter an amount".into())),
                amount => amount,
            }
        } else {
            ticket_type.price
        };

        Ok(ResolvedIssue {
            ticket_type,
            unit_price,
            quantity: request.quantity,
        })
    }

    /// Resolves and appends; returns only the newly issued tickets.
    pub fn issue(
        store: &mut LedgerStore,
        catalog: &Catalog,
        request: &IssueRequest,
    ) -> Result<Vec<Ticket>, CoreError> {
        let resolved = Self::resolve(catalog, request)?;
        let quantity = resolved.quantity as usize;
        let tickets = store.append(resolved.ticket_type, resolved.unit_price, resolved.quantity)?;
        Ok(tickets[tickets.len() - quantity..].to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_type_is_rejected() {
        let err = IssueService::resolve(&Catalog::standard(), &IssueRequest::default())
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(message) if message.contains("type")));
    }

    #[test]
    fn unknown_type_is_reported_by_id() {
        let err = IssueService::resolve(&Catalog::standard(), &IssueRequest::new("vip"))
            .unwrap_err();
        assert!(matches!(err, CoreError::UnknownTicketType(id) if id == "vip"));
    }

    #[test]
    fn fixed_price_types_ignore_entered_amounts() {
        let catalog = Catalog::standard();
        let request = IssueRequest::new("adult").with_amount("5").with_quantity(2);
        let resolved = IssueService::resolve(&catalog, &request).unwrap();
        assert_eq!(resolved.unit_price, 220_000);
        assert_eq!(resolved.order_total(), 440_000);
    }

    #[test]
    fn amount_required_types_need_a_non_zero_amount() {
        let catalog = Catalog::standard();
        for amount in [None, Some(""), Some("0"), Some("0,000")] {
            let mut request = IssueRequest::new("cash");
            request.amount = amount.map(str::to_string);
            let err = IssueService::resolve(&catalog, &request).unwrap_err();
            assert!(matches!(err, CoreError::Validation(_)), "{amount:?}");
        }

        let resolved =
            IssueService::resolve(&catalog, &IssueRequest::new("buffet_cash").with_amount("85,000"))
                .unwrap();
        assert_eq!(resolved.unit_price, 85_000);
    }

    #[test]
    fn voucher_types_issue_at_zero_without_amount() {
        let catalog = Catalog::standard();
        let resolved = IssueService::resolve(&catalog, &IssueRequest::new("poolro")).unwrap();
        assert_eq!(resolved.unit_price, 0);
    }

    #[test]
    fn zero_quantity_is_rejected() {
        let request = IssueRequest::new("adult").with_quantity(0);
        assert!(IssueService::resolve(&Catalog::standard(), &request).is_err());
    }
}
