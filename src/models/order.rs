use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::format_money;

/// Customer fields collected on the checkout page. Only whitespace trimming is applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDetails {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub notes: String,
}

impl CustomerDetails {
    pub fn trimmed(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            company: self.company.trim().to_string(),
            notes: self.notes.trim().to_string(),
        }
    }
}

/// A cart entry joined with its service, computed fresh for every render or submit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub service_id: String,
    pub name: String,
    pub category: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

/// Order identifier built from the submission time plus a random suffix
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    pub fn generate() -> Self {
        let suffix = Uuid::new_v4().simple().to_string();
        Self(format!(
            "ORD-{}-{}",
            Utc::now().timestamp_millis(),
            suffix.get(0..8).unwrap_or("00000000")
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Destination, subject and body handed to a submission sink
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSubmission {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl OrderSubmission {
    /// `mailto:` URL with every component percent-encoded
    pub fn mailto_url(&self) -> String {
        format!(
            "mailto:{}?subject={}&body={}",
            urlencoding::encode(&self.to),
            urlencoding::encode(&self.subject),
            urlencoding::encode(&self.body)
        )
    }
}

/// Machine-readable order record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPayload {
    pub order_id: OrderId,
    pub customer: CustomerDetails,
    pub items: Vec<OrderLine>,
    pub subtotal: Decimal,
    pub currency: String,
}

/// A fully composed order, ready for hand-off
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedOrder {
    pub order_id: OrderId,
    pub business_name: String,
    pub destination: String,
    pub currency: String,
    pub customer: CustomerDetails,
    pub lines: Vec<OrderLine>,
    pub subtotal: Decimal,
}

impl ComposedOrder {
    pub fn subject(&self) -> String {
        format!("{} Order {}", self.business_name, self.order_id)
    }

    /// Human-readable order summary sent as the message body
    pub fn body(&self) -> String {
        let items = self
            .lines
            .iter()
            .map(|line| {
                format!(
                    "- {} x{} @ {} = {}",
                    line.name,
                    line.quantity,
                    self.money(line.unit_price),
                    self.money(line.line_total)
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "New Service Order: {order_id}\n\
             \n\
             Customer:\n\
             Name: {name}\n\
             Email: {email}\n\
             Phone: {phone}\n\
             Company: {company}\n\
             \n\
             Items:\n\
             {items}\n\
             \n\
             Subtotal: {subtotal}\n\
             \n\
             Notes:\n\
             {notes}\n\
             \n\
             (Submitted from portfolio website checkout)\n",
            order_id = self.order_id,
            name = self.customer.name,
            email = self.customer.email,
            phone = or_dash(&self.customer.phone),
            company = or_dash(&self.customer.company),
            items = items,
            subtotal = self.money(self.subtotal),
            notes = or_dash(&self.customer.notes),
        )
    }

    pub fn to_submission(&self) -> OrderSubmission {
        OrderSubmission {
            to: self.destination.clone(),
            subject: self.subject(),
            body: self.body(),
        }
    }

    pub fn payload(&self) -> OrderPayload {
        OrderPayload {
            order_id: self.order_id.clone(),
            customer: self.customer.clone(),
            items: self.lines.clone(),
            subtotal: self.subtotal,
            currency: self.currency.clone(),
        }
    }

    fn money(&self, amount: Decimal) -> String {
        format_money(amount, &self.currency)
    }
}

fn or_dash(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::collections::HashSet;

    fn create_test_order() -> ComposedOrder {
        ComposedOrder {
            order_id: OrderId("ORD-1-abcdef12".to_string()),
            business_name: "Studio".to_string(),
            destination: "orders@studio.test".to_string(),
            currency: "USD".to_string(),
            customer: CustomerDetails {
                name: "Ada".to_string(),
                email: "ada@example.test".to_string(),
                phone: String::new(),
                company: "Engines Ltd".to_string(),
                notes: String::new(),
            },
            lines: vec![OrderLine {
                service_id: "A".to_string(),
                name: "Logo".to_string(),
                category: "Branding".to_string(),
                quantity: 2,
                unit_price: dec!(100),
                line_total: dec!(200),
            }],
            subtotal: dec!(200),
        }
    }

    #[test]
    fn test_customer_trimmed() {
        let customer = CustomerDetails {
            name: "  Ada ".to_string(),
            email: "\tada@example.test\n".to_string(),
            phone: "   ".to_string(),
            company: String::new(),
            notes: " call me ".to_string(),
        }
        .trimmed();

        assert_eq!(customer.name, "Ada");
        assert_eq!(customer.email, "ada@example.test");
        assert_eq!(customer.phone, "");
        assert_eq!(customer.notes, "call me");
    }

    #[test]
    fn test_order_ids_are_distinct() {
        let ids: HashSet<_> = (0..500).map(|_| OrderId::generate()).collect();
        assert_eq!(ids.len(), 500);
        assert!(ids.iter().all(|id| id.as_str().starts_with("ORD-")));
    }

    #[test]
    fn test_subject() {
        assert_eq!(create_test_order().subject(), "Studio Order ORD-1-abcdef12");
    }

    #[test]
    fn test_body_layout() {
        let body = create_test_order().body();

        assert!(body.starts_with("New Service Order: ORD-1-abcdef12\n\nCustomer:\n"));
        assert!(body.contains("Name: Ada\n"));
        assert!(body.contains("Email: ada@example.test\n"));
        assert!(body.contains("Phone: -\n"));
        assert!(body.contains("Company: Engines Ltd\n"));
        assert!(body.contains("Items:\n- Logo x2 @ $100.00 = $200.00\n"));
        assert!(body.contains("Subtotal: $200.00\n"));
        assert!(body.contains("Notes:\n-\n"));
        assert!(body.ends_with("(Submitted from portfolio website checkout)\n"));
    }

    #[test]
    fn test_mailto_url_encoding() {
        let submission = OrderSubmission {
            to: "orders@studio.test".to_string(),
            subject: "Studio Order 1".to_string(),
            body: "a & b\nc=d".to_string(),
        };

        assert_eq!(
            submission.mailto_url(),
            "mailto:orders%40studio.test?subject=Studio%20Order%201&body=a%20%26%20b%0Ac%3Dd"
        );
    }

    #[test]
    fn test_payload_serialization() {
        let payload = create_test_order().payload();
        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(json["orderId"], "ORD-1-abcdef12");
        assert_eq!(json["items"][0]["serviceId"], "A");
        assert_eq!(json["customer"]["company"], "Engines Ltd");
    }
}
