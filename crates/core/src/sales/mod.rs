//! Posting policy for sales invoices.
//!
//! The invoicing desk owns this mapping: which cash, bank, or receivable
//! account a payment method lands in, and where sales, tax, and discounts go.
//! The resulting entry goes through the same validation as any other.

use chrono::NaiveDate;
use obrador_shared::types::{AccountId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::journal::{CreateEntryInput, EntryLineInput, EntryType};

/// Reference type stamped on entries originated by an invoice.
pub const INVOICE_REFERENCE: &str = "Invoice";

/// How the customer paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    /// Cash at the counter.
    Cash,
    /// Bank transfer.
    Transfer,
    /// Card payment.
    Card,
    /// Sold on credit.
    Credit,
}

impl PaymentMethod {
    const ALL: [Self; 4] = [Self::Cash, Self::Transfer, Self::Card, Self::Credit];

    fn label(self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Transfer => "transfer",
            Self::Card => "card",
            Self::Credit => "credit",
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown payment method '{s}'"))
    }
}

/// The invoice figures needed to book a sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleInvoice {
    /// Invoice identifier in the invoicing module.
    pub invoice_id: String,
    /// Printed invoice number.
    pub invoice_number: String,
    /// Customer name as printed.
    pub customer_name: String,
    /// Invoice date.
    pub date: NaiveDate,
    /// Payment method.
    pub payment_method: PaymentMethod,
    /// Amount before tax and discount.
    pub subtotal: Decimal,
    /// Tax charged.
    pub tax: Decimal,
    /// Discount granted.
    pub discount: Decimal,
    /// Amount collected (`subtotal + tax - discount`).
    pub total: Decimal,
}

/// Chart codes the policy posts to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleAccountCodes {
    /// Cash on hand.
    pub cash: String,
    /// Bank account for transfers and cards.
    pub bank: String,
    /// Customer receivables.
    pub receivable: String,
    /// Sales revenue.
    pub sales: String,
    /// Output tax payable.
    pub tax_payable: String,
    /// Discounts granted on sales.
    pub discounts: String,
}

impl Default for SaleAccountCodes {
    fn default() -> Self {
        Self {
            cash: "1.1.01.001".to_string(),
            bank: "1.1.01.002".to_string(),
            receivable: "1.1.02.001".to_string(),
            sales: "4.1.01.001".to_string(),
            tax_payable: "2.1.02.001".to_string(),
            discounts: "4.1.02.001".to_string(),
        }
    }
}

impl SaleAccountCodes {
    /// Every code the policy needs, for bulk lookup.
    #[must_use]
    pub fn all(&self) -> [&str; 6] {
        [
            &self.cash,
            &self.bank,
            &self.receivable,
            &self.sales,
            &self.tax_payable,
            &self.discounts,
        ]
    }
}

/// The resolved accounts the policy posts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaleAccounts {
    /// Cash on hand.
    pub cash: AccountId,
    /// Bank account for transfers and cards.
    pub bank: AccountId,
    /// Customer receivables.
    pub receivable: AccountId,
    /// Sales revenue.
    pub sales: AccountId,
    /// Output tax payable.
    pub tax_payable: AccountId,
    /// Discounts granted on sales.
    pub discounts: AccountId,
}

impl SaleAccounts {
    /// Resolves every code through `lookup`, returning the first missing code on failure.
    pub fn resolve<F>(codes: &SaleAccountCodes, lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<AccountId>,
    {
        let get = |code: &String| lookup(code).ok_or_else(|| code.clone());
        Ok(Self {
            cash: get(&codes.cash)?,
            bank: get(&codes.bank)?,
            receivable: get(&codes.receivable)?,
            sales: get(&codes.sales)?,
            tax_payable: get(&codes.tax_payable)?,
            discounts: get(&codes.discounts)?,
        })
    }

    /// The account collecting the invoice total for a payment method.
    #[must_use]
    pub const fn collection_account(&self, method: PaymentMethod) -> AccountId {
        match method {
            PaymentMethod::Cash => self.cash,
            PaymentMethod::Transfer | PaymentMethod::Card => self.bank,
            PaymentMethod::Credit => self.receivable,
        }
    }
}

/// Builds SALE entries from invoices.
pub struct SalePolicy;

impl SalePolicy {
    /// Maps an invoice to a SALE entry.
    ///
    /// - Debit the collection account for the total
    /// - Credit sales for the subtotal
    /// - Credit tax payable for the tax, when charged
    /// - Debit discounts for the discount, when granted
    #[must_use]
    pub fn build_entry(
        invoice: &SaleInvoice,
        accounts: &SaleAccounts,
        created_by: UserId,
    ) -> CreateEntryInput {
        let mut lines = vec![
            EntryLineInput::debit(
                accounts.collection_account(invoice.payment_method),
                invoice.total,
            )
            .with_description(format!("Collected by {}", invoice.payment_method.label())),
            EntryLineInput::credit(accounts.sales, invoice.subtotal)
                .with_description("Product sales"),
        ];

        if invoice.tax > Decimal::ZERO {
            lines.push(
                EntryLineInput::credit(accounts.tax_payable, invoice.tax)
                    .with_description("Output tax on sales"),
            );
        }

        if invoice.discount > Decimal::ZERO {
            lines.push(
                EntryLineInput::debit(accounts.discounts, invoice.discount)
                    .with_description("Discount granted"),
            );
        }

        CreateEntryInput {
            date: invoice.date,
            description: format!(
                "Sale per invoice {} - Customer: {}",
                invoice.invoice_number, invoice.customer_name
            ),
            entry_type: EntryType::Sale,
            reference_type: Some(INVOICE_REFERENCE.to_string()),
            reference_id: Some(invoice.invoice_id.clone()),
            lines,
            created_by,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal::{EntryTotals, JournalService, PostingAccount};
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn accounts() -> SaleAccounts {
        SaleAccounts {
            cash: AccountId::new(),
            bank: AccountId::new(),
            receivable: AccountId::new(),
            sales: AccountId::new(),
            tax_payable: AccountId::new(),
            discounts: AccountId::new(),
        }
    }

    fn invoice(method: PaymentMethod, tax: Decimal, discount: Decimal) -> SaleInvoice {
        let subtotal = dec!(100.00);
        SaleInvoice {
            invoice_id: "42".to_string(),
            invoice_number: "F-000042".to_string(),
            customer_name: "Cafe Central".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
            payment_method: method,
            subtotal,
            tax,
            discount,
            total: subtotal + tax - discount,
        }
    }

    #[rstest]
    #[case(PaymentMethod::Cash)]
    #[case(PaymentMethod::Transfer)]
    #[case(PaymentMethod::Card)]
    #[case(PaymentMethod::Credit)]
    fn test_payment_method_routes_collection(#[case] method: PaymentMethod) {
        let accounts = accounts();
        let entry = SalePolicy::build_entry(&invoice(method, dec!(0), dec!(0)), &accounts, UserId::new());

        let expected = match method {
            PaymentMethod::Cash => accounts.cash,
            PaymentMethod::Transfer | PaymentMethod::Card => accounts.bank,
            PaymentMethod::Credit => accounts.receivable,
        };
        assert_eq!(entry.lines[0].account_id, expected);
        assert_eq!(entry.lines.len(), 2);
    }

    #[test]
    fn test_entry_with_tax_and_discount_balances() {
        let accounts = accounts();
        let entry = SalePolicy::build_entry(
            &invoice(PaymentMethod::Cash, dec!(13.00), dec!(5.00)),
            &accounts,
            UserId::new(),
        );

        assert_eq!(entry.entry_type, EntryType::Sale);
        assert_eq!(entry.reference_type.as_deref(), Some(INVOICE_REFERENCE));
        assert_eq!(entry.reference_id.as_deref(), Some("42"));
        assert_eq!(entry.lines.len(), 4);
        assert_eq!(entry.lines[2].account_id, accounts.tax_payable);
        assert_eq!(entry.lines[3].account_id, accounts.discounts);

        let totals = EntryTotals::from_lines(&entry.lines);
        assert_eq!(totals.total_debit, dec!(113.00));
        assert!(totals.is_balanced());
        assert!(
            JournalService::validate_entry(&entry, |id| Some(PostingAccount {
                id,
                allows_posting: true
            }))
            .is_ok()
        );
    }

    #[test]
    fn test_resolve_reports_missing_code() {
        let codes = SaleAccountCodes::default();
        let err = SaleAccounts::resolve(&codes, |code| {
            (code != "2.1.02.001").then(AccountId::new)
        })
        .unwrap_err();
        assert_eq!(err, "2.1.02.001");
    }

    #[test]
    fn test_resolve_all_codes() {
        let codes = SaleAccountCodes::default();
        assert!(SaleAccounts::resolve(&codes, |_| Some(AccountId::new())).is_ok());
        assert_eq!(codes.all().len(), 6);
    }

    #[test]
    fn test_payment_method_parses_case_insensitively() {
        assert_eq!("CASH".parse::<PaymentMethod>(), Ok(PaymentMethod::Cash));
        assert_eq!("card".parse::<PaymentMethod>(), Ok(PaymentMethod::Card));
        assert!("cheque".parse::<PaymentMethod>().is_err());
    }
}
