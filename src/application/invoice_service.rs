use std::sync::Arc;

use chrono::{Duration, Utc};

use crate::domain::errors::DomainError;
use crate::domain::invoice::{
    Invoice, InvoicePatch, InvoiceView, NewInvoice, PaymentStatus, MISSING_PAYMENT_METHOD,
};
use crate::domain::pagination::{Page, PageRequest};
use crate::domain::ports::EntityStore;

use super::listing::paginate;
use super::new_id;
use super::order_view::OrderViewEngine;

pub struct InvoiceService<S: ?Sized> {
    store: Arc<S>,
}

impl<S: EntityStore + ?Sized> InvoiceService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Join the invoice with its order's line view.
    ///
    /// An order without items still produces a view, with the payment due,
    /// table number and order details left empty.
    pub fn build_view(&self, invoice_id: &str) -> Result<InvoiceView, DomainError> {
        let invoice = self
            .store
            .find_invoice(invoice_id)?
            .ok_or(DomainError::NotFound("invoice"))?;

        let groups = OrderViewEngine::new(Arc::clone(&self.store)).compute(&invoice.order_id)?;
        let (payment_due, table_number, order_details) = match groups.into_iter().next() {
            Some(group) => (
                Some(group.payment_due),
                group.table_number,
                Some(group.order_items),
            ),
            None => (None, None, None),
        };

        Ok(InvoiceView {
            invoice_id: invoice.invoice_id,
            payment_method: invoice
                .payment_method
                .map(|m| m.as_str().to_string())
                .unwrap_or_else(|| MISSING_PAYMENT_METHOD.to_string()),
            order_id: invoice.order_id,
            payment_status: invoice.payment_status,
            payment_due,
            table_number,
            payment_due_date: invoice.payment_due_date,
            order_details,
        })
    }

    pub fn create_invoice(&self, input: NewInvoice) -> Result<Invoice, DomainError> {
        if self.store.find_order(&input.order_id)?.is_none() {
            return Err(DomainError::NotFound("order"));
        }

        let now = Utc::now();
        let invoice = Invoice {
            invoice_id: new_id(),
            order_id: input.order_id,
            payment_method: input.payment_method,
            payment_status: Some(input.payment_status.unwrap_or_default()),
            payment_due_date: now + Duration::days(1),
            created_at: now,
            updated_at: now,
        };
        self.store.insert_invoice(invoice.clone())?;
        log::info!(
            "created invoice {} for order {}",
            invoice.invoice_id,
            invoice.order_id
        );
        Ok(invoice)
    }

    pub fn update_invoice(&self, invoice_id: &str, patch: InvoicePatch) -> Result<Invoice, DomainError> {
        if !self.store.update_invoice(invoice_id, &patch, Utc::now())? {
            return Err(DomainError::NotFound("invoice"));
        }
        if patch.payment_status == Some(PaymentStatus::Paid) {
            log::info!("invoice {} marked as paid", invoice_id);
        }
        self.store
            .find_invoice(invoice_id)?
            .ok_or(DomainError::NotFound("invoice"))
    }

    pub fn list_invoices(&self, request: PageRequest) -> Result<Page<Invoice>, DomainError> {
        paginate(
            request,
            &(),
            |_, window| self.store.list_invoices(window),
            |_| self.store.count_invoices(),
        )
    }
}
