//! Route metadata extraction.
//!
//! Reads one rule and the annotations of its endpoint into an
//! [`OperationMeta`]. Extraction never fails: missing annotations simply
//! leave their fields empty.

use std::collections::BTreeMap;

use shapedoc_core::routing::PathConverter;
use shapedoc_core::{DataSource, ResponseSpec, RouteMeta, Rule, SecurityRequirement, ShapeRef};

/// Normalized annotations of one route.
#[derive(Debug, Clone, Default)]
pub struct OperationMeta {
    pub hidden: bool,
    pub tags: Vec<String>,
    pub deprecated: bool,
    pub security: Option<Vec<SecurityRequirement>>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub request: Option<(ShapeRef, DataSource)>,
    pub querystring: Option<ShapeRef>,
    pub headers: Option<ShapeRef>,
    pub responses: BTreeMap<u16, ResponseSpec>,
    pub path_converters: Vec<PathConverter>,
}

/// Extract the annotations of `rule`. `meta` is the endpoint's entry in the
/// route table, if any.
pub fn extract(rule: &Rule, meta: Option<&RouteMeta>) -> OperationMeta {
    let path_converters = rule.converters().to_vec();
    let Some(meta) = meta else {
        return OperationMeta {
            path_converters,
            ..OperationMeta::default()
        };
    };

    let (summary, description) = match meta.doc() {
        Some(doc) => {
            let (summary, description) = split_doc(doc);
            (Some(summary), Some(description))
        }
        None => (None, None),
    };

    OperationMeta {
        hidden: meta.is_hidden(),
        tags: meta.tags().to_vec(),
        deprecated: meta.is_deprecated(),
        security: meta.security().map(<[SecurityRequirement]>::to_vec),
        summary,
        description,
        request: meta.request().map(|(shape, source)| (shape.clone(), source)),
        querystring: meta.querystring().cloned(),
        headers: meta.headers().cloned(),
        responses: meta.responses().clone(),
        path_converters,
    }
}

/// Split documentation into a summary (first line) and a description (the
/// remaining lines joined by `\n`, empty when there are none).
pub fn split_doc(doc: &str) -> (String, String) {
    let cleaned = clean_doc(doc);
    let mut lines = cleaned.lines();
    let summary = lines.next().unwrap_or_default().to_string();
    let description = lines.collect::<Vec<_>>().join("\n");
    (summary, description)
}

/// Normalize documentation text: tabs expanded, the first line's leading
/// whitespace and the common indentation of the other lines removed,
/// surrounding blank lines dropped.
pub fn clean_doc(doc: &str) -> String {
    let expanded = doc.replace('\t', "        ");
    let lines: Vec<&str> = expanded.lines().collect();
    let Some((first, rest)) = lines.split_first() else {
        return String::new();
    };

    let margin = rest
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.chars().take_while(|c| c.is_whitespace()).count())
        .min()
        .unwrap_or(0);

    // The margin counts characters, not bytes.
    let mut cleaned: Vec<&str> = Vec::with_capacity(lines.len());
    cleaned.push(first.trim_start());
    for line in rest {
        let dedented = line
            .char_indices()
            .nth(margin)
            .map_or("", |(start, _)| &line[start..]);
        cleaned.push(dedented.trim_end());
    }

    while cleaned.first().is_some_and(|line| line.trim().is_empty()) {
        cleaned.remove(0);
    }
    while cleaned.last().is_some_and(|line| line.trim().is_empty()) {
        cleaned.pop();
    }
    cleaned.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Method;

    #[test]
    fn single_line_doc_has_empty_description() {
        assert_eq!(
            split_doc("List pets."),
            ("List pets.".to_string(), String::new())
        );
    }

    #[test]
    fn unicode_indentation_keeps_text() {
        let (summary, description) = split_doc("Summary\n\u{3000}Important detail\n  second");
        assert_eq!(summary, "Summary");
        assert_eq!(description, "Important detail\n second");
    }

    #[test]
    fn indented_doc_is_dedented() {
        let doc = "Create a pet.

            The pet is stored in memory.
              Indented detail.
        ";
        let (summary, description) = split_doc(doc);
        assert_eq!(summary, "Create a pet.");
        assert_eq!(
            description,
            "\nThe pet is stored in memory.\n  Indented detail."
        );
    }

    #[test]
    fn leading_blank_lines_are_dropped() {
        let (summary, description) = split_doc("\n\n   Summary\n   Body\n");
        assert_eq!(summary, "Summary");
        assert_eq!(description, "Body");
    }

    #[test]
    fn missing_meta_yields_minimal_record() {
        let rule = Rule::new("/pets/<int:pet_id>", "show", [Method::GET]);
        let meta = extract(&rule, None);
        assert!(!meta.hidden);
        assert!(meta.summary.is_none());
        assert!(meta.description.is_none());
        assert!(meta.responses.is_empty());
        assert_eq!(meta.path_converters.len(), 1);
    }

    #[test]
    fn annotations_are_copied() {
        let rule = Rule::new("/pets", "list", [Method::GET]);
        let route_meta = RouteMeta::builder()
            .doc("List pets.\nAll of them.")
            .tags(["pets", "read", "pets"])
            .deprecated()
            .security([SecurityRequirement::new("bearer")])
            .build();
        let meta = extract(&rule, Some(&route_meta));
        assert_eq!(meta.summary.as_deref(), Some("List pets."));
        assert_eq!(meta.description.as_deref(), Some("All of them."));
        assert_eq!(meta.tags, vec!["pets", "read"]);
        assert!(meta.deprecated);
        assert_eq!(meta.security.unwrap()[0].name, "bearer");
    }
}
