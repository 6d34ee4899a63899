//! System messages: the short status lines shown at row 24 in response to
//! navigation, confirmation, and validation events. Numeric codes match
//! the reference implementation's `create_system_message` table; `Custom`
//! carries the handful of inline German strings individual field
//! validators raise directly rather than through a numbered code.

use crate::cept;
use crate::preamble::format_currency;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SystemMessage {
    /// Back requested with insufficient history.
    NoHistory,
    /// "Send?" confirmation prompt, no charge.
    ConfirmFree,
    /// "Send? (price)" confirmation prompt.
    ConfirmWithPrice(i64),
    /// Default post-form "transaction accepted" notice.
    Accepted,
    /// Message sent notice, shown after a `send_message` action.
    Sent,
    /// Page not found, or invalid input at the navigation prompt.
    NotFound,
    /// Requested subpage does not exist.
    SubpageNotFound,
    /// "Please wait" notice prepended to a long preamble.
    PleaseWait,
    Custom(String),
}

impl SystemMessage {
    pub fn text(&self) -> String {
        match self {
            SystemMessage::NoHistory => "Keine Vorinformation vorhanden".to_string(),
            SystemMessage::ConfirmFree => "Senden?".to_string(),
            SystemMessage::ConfirmWithPrice(price) => {
                format!("Senden? ({} DM)", format_currency(*price))
            }
            SystemMessage::Accepted => "Eingabe wird bearbeitet".to_string(),
            SystemMessage::Sent => "Mitteilung gesendet".to_string(),
            SystemMessage::NotFound => "Diese Seite ist nicht vorhanden".to_string(),
            SystemMessage::SubpageNotFound => "Diese Folgeseite ist nicht vorhanden".to_string(),
            SystemMessage::PleaseWait => "Bitte warten".to_string(),
            SystemMessage::Custom(s) => s.clone(),
        }
    }

    pub fn code(&self) -> Option<u16> {
        match self {
            SystemMessage::NoHistory => Some(10),
            SystemMessage::ConfirmFree => Some(44),
            SystemMessage::ConfirmWithPrice(_) => Some(47),
            SystemMessage::Accepted => Some(55),
            SystemMessage::Sent => Some(73),
            SystemMessage::NotFound => Some(100),
            SystemMessage::SubpageNotFound => Some(101),
            SystemMessage::PleaseWait => Some(291),
            SystemMessage::Custom(_) => None,
        }
    }

    /// Maps a raw numeric code from the navigation loop's error slot to a
    /// message. Panics on an unmapped code, since the navigation loop only
    /// ever sets codes from this table.
    pub fn from_error_code(code: u16) -> SystemMessage {
        match code {
            10 => SystemMessage::NoHistory,
            100 => SystemMessage::NotFound,
            101 => SystemMessage::SubpageNotFound,
            other => panic!("unmapped system message code: {other}"),
        }
    }

    /// Encodes the message at row 24 the way the reference implementation
    /// renders system messages: cursor home to the line, clear it, then
    /// the text, numeric codes prefixed the way the field editor echoes
    /// them back.
    pub fn to_cept_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend(cept::set_cursor(24, 1));
        out.extend(cept::clear_line());
        if let Some(code) = self.code() {
            out.extend(cept::from_str(&format!("*{code:03} ")));
        }
        out.extend(cept::from_str(&self.text()));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_codes_match_the_error_table() {
        assert_eq!(SystemMessage::NoHistory.code(), Some(10));
        assert_eq!(SystemMessage::ConfirmFree.code(), Some(44));
        assert_eq!(SystemMessage::ConfirmWithPrice(0).code(), Some(47));
        assert_eq!(SystemMessage::Accepted.code(), Some(55));
        assert_eq!(SystemMessage::Sent.code(), Some(73));
        assert_eq!(SystemMessage::NotFound.code(), Some(100));
        assert_eq!(SystemMessage::SubpageNotFound.code(), Some(101));
        assert_eq!(SystemMessage::PleaseWait.code(), Some(291));
        assert!(SystemMessage::Custom("x".into()).code().is_none());
    }

    #[test]
    fn from_error_code_round_trips_the_navigation_loop_codes() {
        assert_eq!(SystemMessage::from_error_code(10), SystemMessage::NoHistory);
        assert_eq!(SystemMessage::from_error_code(100), SystemMessage::NotFound);
        assert_eq!(SystemMessage::from_error_code(101), SystemMessage::SubpageNotFound);
    }

    #[test]
    fn confirm_with_price_renders_currency() {
        let msg = SystemMessage::ConfirmWithPrice(250);
        assert!(msg.text().contains("2,50"));
    }

    #[test]
    fn custom_message_carries_its_own_text() {
        let msg = SystemMessage::Custom("Teilnehmerkennung ungültig! -> #".to_string());
        assert_eq!(msg.text(), "Teilnehmerkennung ungültig! -> #");
    }

    #[test]
    fn encoded_bytes_start_with_cursor_positioning_to_line_24() {
        let bytes = SystemMessage::Accepted.to_cept_bytes();
        assert!(bytes.starts_with(&cept::set_cursor(24, 1)));
    }
}
