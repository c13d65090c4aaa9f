use church_events_domain::Occurrence;

pub fn titles(occurrences: &[Occurrence]) -> Vec<&str> {
    occurrences.iter().map(|o| o.title.as_str()).collect()
}

pub fn format_start(occurrence: &Occurrence) -> String {
    occurrence
        .start
        .map(|start| start.format("%F %R").to_string())
        .unwrap_or_default()
}
