//! Parsers for the two modem response shapes the engine consumes:
//! `+CMTI` new-message notifications and `+CMGR` retrieved messages.

/// A retrieved SMS, decoded from the modem's text-mode response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmsMessage {
    /// Sender identifier from the `+CMGR` header (usually a phone number).
    pub sender: String,
    /// Message text, header and trailer lines stripped.
    pub body: String,
}

/// Extract the storage index from a notification line such as
/// `+CMTI: "SM",7`.
///
/// The index is everything after the first comma. Returns an empty
/// string when there is no comma, the comma is the first character, or
/// nothing follows it.
pub fn parse_notification(text: &str) -> &str {
    match text.find(',') {
        Some(pos) if pos > 0 && pos + 1 < text.len() => &text[pos + 1..],
        _ => "",
    }
}

/// Decode a `+CMGR` response into sender and body.
///
/// The first line is a header with quote-delimited fields; the second
/// quoted field (split index 3) is the sender. The modem appends a
/// blank line and an `OK` status line, so the body is every line except
/// the first and the last two, joined with single spaces.
pub fn parse_retrieved(text: &str) -> SmsMessage {
    let lines: Vec<&str> = text.split("\r\n").collect();

    let header_fields: Vec<&str> = lines[0].split('"').collect();
    let sender = if header_fields.len() >= 4 {
        header_fields[3].to_string()
    } else {
        String::new()
    };

    if lines.len() < 4 {
        return SmsMessage {
            sender,
            body: String::new(),
        };
    }

    SmsMessage {
        sender,
        body: lines[1..lines.len() - 2].join(" "),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notification_index_after_comma() {
        assert_eq!(parse_notification("+CMTI: \"SM\",7"), "7");
    }

    #[test]
    fn notification_multi_digit_index() {
        assert_eq!(parse_notification("+CMTI: \"SM\",23"), "23");
    }

    #[test]
    fn notification_without_comma_is_empty() {
        assert_eq!(parse_notification("no comma"), "");
    }

    #[test]
    fn notification_trailing_comma_is_empty() {
        assert_eq!(parse_notification("+CMTI: \"SM\","), "");
    }

    #[test]
    fn notification_leading_comma_is_empty() {
        assert_eq!(parse_notification(",7"), "");
    }

    #[test]
    fn retrieved_single_body_line() {
        let text = "+CMGR: \"REC UNREAD\",\"+15551234567\",,\"24/01/05,10:31:02+04\"\r\n\
                    hello world\r\n\
                    \r\n\
                    OK";
        let msg = parse_retrieved(text);
        assert_eq!(msg.sender, "+15551234567");
        assert_eq!(msg.body, "hello world");
    }

    #[test]
    fn retrieved_multi_line_body_joined_with_spaces() {
        let text = "+CMGR: \"REC UNREAD\",\"+15551234567\",,\"stamp\"\r\n\
                    line one\r\n\
                    line two\r\n\
                    \r\n\
                    OK";
        let msg = parse_retrieved(text);
        assert_eq!(msg.body, "line one line two");
    }

    #[test]
    fn retrieved_short_header_has_no_sender() {
        let msg = parse_retrieved("+CMGR: 0,,24\r\nbody\r\n\r\nOK");
        assert_eq!(msg.sender, "");
        assert_eq!(msg.body, "body");
    }

    #[test]
    fn retrieved_too_few_lines_has_empty_body() {
        let msg = parse_retrieved("+CMGR: \"REC UNREAD\",\"+15551234567\",,\"s\"\r\nOK");
        assert_eq!(msg.sender, "+15551234567");
        assert_eq!(msg.body, "");
    }

    #[test]
    fn retrieved_header_only() {
        let msg = parse_retrieved("garbage");
        assert_eq!(msg.sender, "");
        assert_eq!(msg.body, "");
    }
}
