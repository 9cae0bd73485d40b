pub mod blocks;
pub mod patterns;
pub mod record;

use tracing::{debug, trace};

pub use record::ContactRecord;

/// Document text → blocks → records, in block order. Every block is scanned,
/// however large; blocks with no recognizable field are dropped.
pub fn extract(document: &str) -> Vec<ContactRecord> {
    let blocks = blocks::split_blocks(document);
    let total = blocks.len();

    let records: Vec<ContactRecord> = blocks
        .iter()
        .filter_map(|block| {
            let found = record::build_record(block)?;
            trace!(block = block.index, line = block.line, "contact block");
            Some(found)
        })
        .collect();

    debug!(blocks = total, records = records.len(), "document parsed");
    records
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture(name: &str) -> String {
        std::fs::read_to_string(format!("tests/fixtures/{}.txt", name)).unwrap()
    }

    #[test]
    fn empty_document() {
        assert!(extract("").is_empty());
        assert!(extract(" \n\n\t \n").is_empty());
    }

    #[test]
    fn swiss_pension_directory() {
        let records = extract(&fixture("pension_directory"));
        assert_eq!(records.len(), 4);

        assert!(records[0].company_name.contains("Pension"));
        assert_eq!(records[0].website, "www.swisspensionfund.ch");

        let john = &records[1];
        assert_eq!(john.contact_name, "John Smith");
        assert!(john.job_title.contains("Manager"));
        assert_eq!(john.email, "john.smith@swisspensionfund.ch");

        let anna = &records[2];
        assert_eq!(anna.contact_name, "Anna Meier");
        assert_eq!(anna.job_title, "Managing Director");
        assert_eq!(anna.social_profile, "https://www.linkedin.com/in/anna-meier");
        assert_eq!(anna.email, "a.meier@alpine-invest.ch");

        let peter = &records[3];
        assert_eq!(peter.company_name, "Helvetia Trust Ltd");
        assert_eq!(peter.contact_name, "Peter Huber");
        assert_eq!(peter.job_title, "CFO");
    }

    #[test]
    fn decorative_blocks_dropped() {
        let records = extract(&fixture("pension_directory"));
        assert!(records.iter().all(|r| !r.is_empty()));
        assert!(records.iter().all(|r| !r.company_name.contains("-----")));
    }

    #[test]
    fn conference_attendees_keep_block_order() {
        let records = extract(&fixture("conference_attendees"));
        let emails: Vec<&str> = records
            .iter()
            .map(|r| r.email.as_str())
            .filter(|e| !e.is_empty())
            .collect();
        assert_eq!(
            emails,
            vec!["p.rossi@fondoitalia.it", "lena.brandt@nordic-am.se", "kim@harbourcap.com"]
        );
    }

    #[test]
    fn never_more_records_than_blocks() {
        for name in ["pension_directory", "conference_attendees"] {
            let doc = fixture(name);
            assert!(extract(&doc).len() <= blocks::split_blocks(&doc).len());
        }
    }

    #[test]
    fn repeated_runs_agree() {
        let doc = fixture("conference_attendees");
        assert_eq!(extract(&doc), extract(&doc));
    }

    #[test]
    fn two_emails_in_one_block() {
        let records = extract("Desk: desk@fund.ch\nBackup: backup@fund.ch");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].email, "desk@fund.ch");
    }

    #[test]
    fn large_block_kept_with_neighbours() {
        let filler = "lorem ipsum dolor sit amet\n".repeat(3000);
        let doc = format!(
            "Swiss Pension Fund AG\nContact: John Smith\njohn@spf.ch\n{}\nSecond Person\nsecond@example.com",
            filler
        );
        assert!(doc.len() > 64 * 1024);
        let records = extract(&doc);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].company_name, "Swiss Pension Fund AG");
        assert_eq!(records[0].email, "john@spf.ch");
        assert_eq!(records[1].contact_name, "Second Person");
    }

    #[test]
    fn garbage_input_does_not_fail() {
        let doc = "\u{0}\u{1}@@@ ###\n\n\u{FFFD}\u{FFFD}\n\n%%%%";
        assert!(extract(doc).is_empty());
    }
}
