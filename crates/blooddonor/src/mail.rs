//! `mailto:` links for contacting donors.
//!
//! The registry never sends mail; it builds a link the user's mail client
//! opens with recipients, blind copies, subject and body filled in.

use std::fmt::Write as _;

/// The parts of a mail-client deep link.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MailLink {
    /// Visible recipients.
    pub to: Vec<String>,
    /// Blind-copy recipients.
    pub bcc: Vec<String>,
    /// Subject line.
    pub subject: String,
    /// Message body.
    pub body: String,
}

impl MailLink {
    /// Render the `mailto:` URL.
    ///
    /// Recipients are comma-joined and percent-encoded; subject and body are
    /// form-encoded. Empty parts are left out.
    #[must_use]
    pub fn href(&self) -> String {
        let mut query = Vec::new();
        if !self.subject.is_empty() {
            query.push(format!("subject={}", form_encode(&self.subject)));
        }
        if !self.body.is_empty() {
            query.push(format!("body={}", form_encode(&self.body)));
        }
        if !self.bcc.is_empty() {
            query.push(format!("bcc={}", component_encode(&self.bcc.join(","))));
        }

        let mut href = format!("mailto:{}", component_encode(&self.to.join(",")));
        if !query.is_empty() {
            href.push('?');
            href.push_str(&query.join("&"));
        }
        href
    }
}

/// Percent-encode everything except the URI-component unreserved set.
fn component_encode(value: &str) -> String {
    encode(value, false, |b| {
        b.is_ascii_alphanumeric()
            || matches!(b, b'-' | b'_' | b'.' | b'!' | b'~' | b'*' | b'\'' | b'(' | b')')
    })
}

/// `application/x-www-form-urlencoded`: spaces become `+`.
fn form_encode(value: &str) -> String {
    encode(value, true, |b| {
        b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b'*')
    })
}

fn encode(value: &str, space_as_plus: bool, keep: impl Fn(u8) -> bool) -> String {
    let mut out = String::with_capacity(value.len());
    for b in value.bytes() {
        if keep(b) {
            out.push(char::from(b));
        } else if b == b' ' && space_as_plus {
            out.push('+');
        } else {
            let _ = write!(out, "%{b:02X}");
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_link() {
        assert_eq!(MailLink::default().href(), "mailto:");
    }

    #[test]
    fn test_bcc_only_link() {
        let link = MailLink {
            bcc: vec!["a@x.org".to_string(), "b@x.org".to_string()],
            ..MailLink::default()
        };
        assert_eq!(link.href(), "mailto:?bcc=a%40x.org%2Cb%40x.org");
    }

    #[test]
    fn test_full_link() {
        let link = MailLink {
            to: vec!["me@x.org".to_string()],
            bcc: vec!["d@x.org".to_string()],
            subject: "Urgent blood request: O+ in Pune".to_string(),
            body: "Hello,\n\nThanks!".to_string(),
        };
        assert_eq!(
            link.href(),
            "mailto:me%40x.org?subject=Urgent+blood+request%3A+O%2B+in+Pune\
             &body=Hello%2C%0A%0AThanks%21&bcc=d%40x.org"
        );
    }

    #[test]
    fn test_non_ascii_is_utf8_encoded() {
        assert_eq!(form_encode("é"), "%C3%A9");
        assert_eq!(component_encode("a b"), "a%20b");
    }
}
