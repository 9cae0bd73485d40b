use std::ops::Range;

use serde::{Deserialize, Serialize};

use super::blocks::TextBlock;
use super::patterns::{email_spans, locate, recognize, Field};

/// Byte that never takes part in any recognizer match.
const MASK: u8 = 0;

/// One contact as found in a single block. Empty strings mean "not found".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRecord {
    pub company_name: String,
    pub contact_name: String,
    pub job_title: String,
    pub email: String,
    pub website: String,
    pub social_profile: String,
}

impl ContactRecord {
    pub fn is_empty(&self) -> bool {
        self.company_name.is_empty()
            && self.contact_name.is_empty()
            && self.job_title.is_empty()
            && self.email.is_empty()
            && self.website.is_empty()
            && self.social_profile.is_empty()
    }

    fn set(&mut self, field: Field, value: &str) {
        let slot = match field {
            Field::CompanyName => &mut self.company_name,
            Field::ContactName => &mut self.contact_name,
            Field::JobTitle => &mut self.job_title,
            Field::Email => &mut self.email,
            Field::Website => &mut self.website,
            Field::SocialProfile => &mut self.social_profile,
        };
        *slot = value.to_string();
    }
}

/// Run every recognizer over one block, whatever its size.
///
/// Email and company are read from the block as-is. Name, title, website and
/// profile scan a copy in which all email addresses are masked, so an address
/// can never leak into those fields. Returns `None` when no field was found.
pub fn build_record(block: &TextBlock<'_>) -> Option<ContactRecord> {
    let text = block.text;

    let mut record = ContactRecord::default();
    for field in [Field::Email, Field::CompanyName] {
        if let Some(value) = recognize(field, text) {
            record.set(field, value);
        }
    }

    let masked = mask_spans(text, &email_spans(text));
    for field in Field::ALL.into_iter().filter(|f| !reads_raw_text(*f)) {
        if let Some(range) = locate(field, &masked) {
            let value = text[range].trim();
            if !value.is_empty() {
                record.set(field, value);
            }
        }
    }

    (!record.is_empty()).then_some(record)
}

fn reads_raw_text(field: Field) -> bool {
    matches!(field, Field::Email | Field::CompanyName)
}

/// Same-length copy of `text` with every byte in `spans` replaced by `MASK`.
/// Offsets outside the spans stay valid for slicing the original.
fn mask_spans(text: &str, spans: &[Range<usize>]) -> String {
    let mut bytes = text.as_bytes().to_vec();
    for span in spans {
        bytes[span.clone()].fill(MASK);
    }
    // Spans start and end on char boundaries and MASK is ASCII.
    String::from_utf8(bytes).unwrap_or_else(|_| text.to_string())
}
