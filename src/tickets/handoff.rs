//! Confirmation handoff payload
//!
//! After a reservation commits, the buyer is handed a pre-filled WhatsApp
//! message addressed at the raffle's contact number. The handoff is
//! one-way and unverified; it never gates the Pending → Confirmed
//! transition. Payload generation is pure and deterministic.

pub const CURRENCY_SYMBOL: &str = "$";

/// Human-readable purchase confirmation, rendered for the messaging handoff
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationMessage {
    pub lottery_title: String,
    /// Numbers in the order the buyer picked them
    pub numbers: Vec<i32>,
    pub total_cents: i64,
    pub purchase_id: String,
}

impl ConfirmationMessage {
    /// Render the message text the buyer sends to the admin
    pub fn render(&self) -> String {
        let numbers = self
            .numbers
            .iter()
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            "👋 Hola PUKATU, confirmo mi compra:\n\
             🎫 *Sorteo:* {}\n\
             🔢 *Números:* {}\n\
             💰 *Total:* {}\n\
             🆔 *ID:* {}",
            self.lottery_title,
            numbers,
            format_amount(self.total_cents),
            self.purchase_id
        )
    }

    /// WhatsApp deep link carrying the rendered message
    pub fn whatsapp_url(&self, contact_phone: &str) -> String {
        format!(
            "https://wa.me/{}?text={}",
            contact_phone,
            percent_encode(&self.render())
        )
    }
}

/// Format a cent amount for display: whole dollars stay whole
pub fn format_amount(cents: i64) -> String {
    if cents % 100 == 0 {
        format!("{}{}", CURRENCY_SYMBOL, cents / 100)
    } else {
        format!("{}{}.{:02}", CURRENCY_SYMBOL, cents / 100, cents % 100)
    }
}

// Minimal RFC 3986 percent-encoding, enough for a wa.me text parameter.
fn percent_encode(input: &str) -> String {
    let mut out = String::with_capacity(input.len() * 3);
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message() -> ConfirmationMessage {
        ConfirmationMessage {
            lottery_title: "Gran Sorteo".to_string(),
            numbers: vec![42, 7, 13],
            total_cents: 3_000,
            purchase_id: "p1234".to_string(),
        }
    }

    #[test]
    fn test_render_is_deterministic_and_ordered() {
        let text = message().render();
        assert!(text.contains("Gran Sorteo"));
        assert!(text.contains("42, 7, 13"));
        assert!(text.contains("$30"));
        assert!(text.contains("p1234"));
        assert_eq!(text, message().render());
    }

    #[test]
    fn test_whatsapp_url_encodes_message() {
        let url = message().whatsapp_url("584121234567");
        assert!(url.starts_with("https://wa.me/584121234567?text="));
        assert!(!url.contains(' '));
        assert!(!url.contains('\n'));
        assert!(url.contains("%20"));
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(1_000), "$10");
        assert_eq!(format_amount(1_050), "$10.50");
        assert_eq!(format_amount(5), "$0.05");
    }

    #[test]
    fn test_percent_encode_unreserved_untouched() {
        assert_eq!(percent_encode("abc-XYZ_0.9~"), "abc-XYZ_0.9~");
        assert_eq!(percent_encode("a b"), "a%20b");
        assert_eq!(percent_encode("ñ"), "%C3%B1");
    }
}
