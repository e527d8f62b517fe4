use super::{NoteQuery, RowSource, SourceError, SourceRow};

/// Demo notes served when a real source has nothing for the query.
///
/// Dates are derived from the requested months so the notes always fall
/// inside the range: days 15 and 28 of the start month, day 10 of the end month.
#[derive(Debug, Default, Clone, Copy)]
pub struct SampleSource;

const SAMPLES: [(&str, &str, &str, &str); 3] = [
    (
        "sample_001",
        "Nike",
        "Q2 Planning Discussion with Nike",
        "<p><b>TLDR:</b> Nike expressed strong interest in our <em>pilot program</em> for Q2. \
         They want to start with analytics dashboard.</p><h2>Meeting Details</h2><p>Nike is \
         looking to improve their customer insights through our platform. Key discussion \
         points:</p><ul><li>Pilot program duration: 6 weeks</li><li>Budget: $50K approved</li>\
         <li>Timeline: Start May 2025</li><li>Primary contact: Sarah Johnson</li></ul><div>They \
         are particularly interested in real-time analytics and custom dashboards. Pricing was \
         discussed and is within their budget.</div>",
    ),
    (
        "sample_002",
        "Adidas",
        "Technical Requirements Review",
        "<p><b>TLDR:</b> Adidas needs better <strong>analytics integration</strong> with their \
         existing systems. Current solution has performance issues.</p><h3>Current Pain \
         Points</h3><p>Adidas reported several challenges:</p><ul><li>Dashboard response times \
         &gt; 10 seconds</li><li>Missing integration with SAP</li><li>Limited customization \
         options</li><li>No real-time data updates</li></ul><p>However, they mentioned that \
         <strong>pricing is a major concern</strong> and they need to stay within a tight budget \
         for this fiscal year.</p><script>alert('test')</script>",
    ),
    (
        "sample_003",
        "Under Armour",
        "Implementation Planning Session",
        "<p><b>TLDR:</b> Under Armour ready to proceed with full implementation. They want to \
         start with a <em>pilot program</em> first.</p><p>Great meeting with Under Armour team. \
         They're excited about our platform capabilities and want to move forward quickly. Key \
         outcomes:</p><ul><li>Pilot program approved: 4 weeks starting June</li><li>Full team \
         buy-in achieved</li><li>Technical requirements documented</li><li>No pricing concerns - \
         budget approved</li></ul><p>Next steps: Send contract for legal review and schedule \
         kickoff meeting.</p>",
    ),
];

impl RowSource for SampleSource {
    fn key(&self) -> &str {
        "samples"
    }

    fn fetch(&self, query: &NoteQuery) -> Result<Vec<SourceRow>, SourceError> {
        let start = query.months.start_month();
        let end = query.months.end_month();
        let dates = [
            format!("{start}-15"),
            format!("{start}-28"),
            format!("{end}-10"),
        ];

        Ok(SAMPLES
            .iter()
            .zip(dates)
            .map(|(&(id, customer, subject, content), date)| SourceRow {
                author_name: Some(query.author_pattern.trim().to_string())
                    .filter(|name| !name.is_empty()),
                note_id: Some(id.to_string()),
                date: Some(date),
                customer_name: Some(customer.to_string()),
                subject: Some(subject.to_string()),
                content: Some(content.to_string()),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MonthRange;

    #[test]
    fn sample_dates_follow_requested_months() {
        let query = NoteQuery::new("Ella Wang", MonthRange::parse("2024-01", "2024-02").unwrap());
        let rows = SampleSource.fetch(&query).unwrap();

        let dates: Vec<_> = rows.iter().filter_map(|r| r.date.as_deref()).collect();
        assert_eq!(dates, vec!["2024-01-15", "2024-01-28", "2024-02-10"]);
        assert!(rows
            .iter()
            .all(|r| r.author_name.as_deref() == Some("Ella Wang")));
    }

    #[test]
    fn sample_ids_are_unique() {
        let query = NoteQuery::new("", MonthRange::parse("2024-05", "2024-05").unwrap());
        let rows = SampleSource.fetch(&query).unwrap();

        let mut ids: Vec<_> = rows.iter().filter_map(|r| r.note_id.clone()).collect();
        ids.dedup();
        assert_eq!(ids.len(), 3);
        assert!(rows.iter().all(|r| r.author_name.is_none()));
    }
}
