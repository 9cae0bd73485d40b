use anyhow::Result;
use tracing::{debug, warn};

use crate::batch::SourcedContact;
use crate::parser::ContactRecord;

/// Lookup source for fields the extraction left empty. Every lookup sees the
/// record as enriched so far.
pub trait Enricher {
    fn name(&self) -> &str;

    fn lookup_website(&mut self, _contact: &ContactRecord) -> Result<Option<String>> {
        Ok(None)
    }

    fn lookup_social_profile(&mut self, _contact: &ContactRecord) -> Result<Option<String>> {
        Ok(None)
    }

    fn lookup_email(&mut self, _contact: &ContactRecord) -> Result<Option<String>> {
        Ok(None)
    }

    /// Release whatever the enricher holds (connections, browser handles).
    fn close(&mut self) {}
}

/// Fill empty `website`, `social_profile` and `email`, in that order.
/// Non-empty fields are never replaced; a failed lookup leaves the field empty.
pub fn enrich_record(contact: &ContactRecord, enricher: &mut dyn Enricher) -> ContactRecord {
    let mut out = contact.clone();

    if out.website.is_empty() {
        if let Some(v) = attempt(enricher, "website", &out, |e, c| e.lookup_website(c)) {
            out.website = v;
        }
    }
    if out.social_profile.is_empty() {
        let found = attempt(enricher, "social_profile", &out, |e, c| {
            e.lookup_social_profile(c)
        });
        if let Some(v) = found {
            out.social_profile = v;
        }
    }
    if out.email.is_empty() {
        if let Some(v) = attempt(enricher, "email", &out, |e, c| e.lookup_email(c)) {
            out.email = v;
        }
    }

    out
}

fn attempt<F>(
    enricher: &mut dyn Enricher,
    field: &str,
    contact: &ContactRecord,
    lookup: F,
) -> Option<String>
where
    F: FnOnce(&mut dyn Enricher, &ContactRecord) -> Result<Option<String>>,
{
    match lookup(&mut *enricher, contact) {
        Ok(found) => found.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()),
        Err(e) => {
            warn!(
                enricher = enricher.name(),
                field,
                "lookup failed for {:?}: {}",
                contact.contact_name,
                e
            );
            None
        }
    }
}

/// Owns an enricher for one batch run and closes it exactly once, whichever
/// way the run ends.
pub struct EnrichmentSession<E: Enricher> {
    enricher: E,
    closed: bool,
}

impl<E: Enricher> EnrichmentSession<E> {
    pub fn open(enricher: E) -> Self {
        debug!(enricher = enricher.name(), "enrichment session opened");
        EnrichmentSession {
            enricher,
            closed: false,
        }
    }

    pub fn enrich_all(&mut self, contacts: Vec<SourcedContact>) -> Vec<SourcedContact> {
        contacts
            .into_iter()
            .map(|c| SourcedContact {
                contact: enrich_record(&c.contact, &mut self.enricher),
                ..c
            })
            .collect()
    }

    pub fn close(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if !self.closed {
            self.closed = true;
            self.enricher.close();
            debug!(enricher = self.enricher.name(), "enrichment session closed");
        }
    }
}

impl<E: Enricher> Drop for EnrichmentSession<E> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

const PUBLIC_MAIL_DOMAINS: &[&str] = &[
    "gmail.com",
    "googlemail.com",
    "yahoo.com",
    "outlook.com",
    "hotmail.com",
    "live.com",
    "icloud.com",
    "aol.com",
    "protonmail.com",
    "proton.me",
    "gmx.net",
    "gmx.ch",
    "gmx.de",
    "web.de",
    "bluewin.ch",
];

/// Offline enricher: a company address implies the company's site.
#[derive(Debug, Default)]
pub struct EmailDomainEnricher;

impl Enricher for EmailDomainEnricher {
    fn name(&self) -> &str {
        "email-domain"
    }

    fn lookup_website(&mut self, contact: &ContactRecord) -> Result<Option<String>> {
        let Some((_, domain)) = contact.email.rsplit_once('@') else {
            return Ok(None);
        };
        let domain = domain.trim_end_matches('.').to_lowercase();
        if domain.is_empty() || PUBLIC_MAIL_DOMAINS.contains(&domain.as_str()) {
            return Ok(None);
        }
        Ok(Some(domain))
    }
}
