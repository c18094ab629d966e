//! Foreign-key summary of a data package, one row per field pair.

use crate::catalog::PredicateEdge;
use crate::datapackage::Descriptor;
use crate::measure::TextTable;

/// Rows sorted by subject table, then by where the subject field is declared
/// in its resource. Fields missing from the declaration sort last.
pub fn summarize(descriptor: &Descriptor) -> Vec<PredicateEdge> {
    let mut keyed: Vec<(usize, PredicateEdge)> = descriptor
        .resources
        .iter()
        .flat_map(|resource| {
            resource.predicates().into_iter().map(move |p| {
                let order = resource.field_position(&p.subject_field).unwrap_or(usize::MAX);
                (order, p)
            })
        })
        .collect();

    // stable, so pairs of one composite key keep their order
    keyed.sort_by(|(a_order, a), (b_order, b)| {
        a.subject_table
            .cmp(&b.subject_table)
            .then(a_order.cmp(b_order))
    });

    keyed.into_iter().map(|(_, row)| row).collect()
}

pub fn to_json(rows: &[PredicateEdge]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(rows)
}

pub fn to_text(rows: &[PredicateEdge]) -> String {
    let mut table = TextTable::new(vec![
        "subject_table",
        "subject_field",
        "predicate",
        "related_table",
        "related_field",
    ]);
    for row in rows {
        table.push_row(vec![
            row.subject_table.clone(),
            row.subject_field.clone(),
            row.predicate.clone(),
            row.related_table.clone(),
            row.related_field.clone(),
        ]);
    }
    table.render()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PACKAGE: &str = r#"{"resources": [
        {
            "name": "occurrence",
            "schema": {
                "fields": [{"name": "occurrenceID"}, {"name": "organismID"}, {"name": "eventID"}],
                "foreignKeys": [
                    {"fields": "eventID", "reference": {"resource": "event", "fields": "eventID"}},
                    {"fields": "unlistedID", "reference": {"resource": "agent", "fields": "agentID"}},
                    {"fields": "organismID", "reference": {"resource": "organism", "fields": "organismID"}}
                ]
            }
        },
        {
            "name": "event",
            "schema": {
                "fields": [{"name": "eventID"}, {"name": "parentEventID"}],
                "foreignKeys": [
                    {"fields": "parentEventID", "reference": {"resource": "event", "fields": "eventID"}}
                ]
            }
        }
    ]}"#;

    #[test]
    fn test_summary_order() {
        let rows = summarize(&Descriptor::parse(PACKAGE).unwrap());
        let order: Vec<(&str, &str)> = rows
            .iter()
            .map(|r| (r.subject_table.as_str(), r.subject_field.as_str()))
            .collect();

        assert_eq!(
            order,
            vec![
                ("event", "parentEventID"),
                ("occurrence", "organismID"),
                ("occurrence", "eventID"),
                ("occurrence", "unlistedID"),
            ]
        );
        assert_eq!(rows[0].predicate, "parentEventID → eventID");
    }

    #[test]
    fn test_summary_text() {
        let rows = summarize(&Descriptor::parse(PACKAGE).unwrap());
        let text = to_text(&rows);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), rows.len() + 2);
        assert!(lines[0].starts_with("subject_table"));
        assert!(lines[2].contains("parentEventID → eventID"));
    }

    #[test]
    fn test_summary_empty() {
        let rows = summarize(&Descriptor::parse(r#"{"resources": []}"#).unwrap());
        assert!(rows.is_empty());
        assert_eq!(to_json(&rows).unwrap(), "[]");
    }

    #[test]
    fn test_summary_rows_are_predicates() {
        let rows = summarize(&Descriptor::parse(PACKAGE).unwrap());
        assert_eq!(
            rows[0],
            PredicateEdge::new("event", "parentEventID", "parentEventID → eventID", "event", "eventID")
        );

        let json: serde_json::Value = serde_json::from_str(&to_json(&rows).unwrap()).unwrap();
        assert_eq!(json[1]["subject_field"], "organismID");
        assert_eq!(json[1]["related_table"], "organism");
    }
}
