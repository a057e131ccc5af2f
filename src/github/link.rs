use std::collections::HashMap;

/// Parse a `link` response header into a map of relation name to URL.
///
/// The header is a comma-separated list of entries shaped like
/// `<https://api.github.com/...?page=2>; rel="next"`. Relation names are
/// lower-cased, and a single `rel` may name several space-separated relations.
/// Entries without a bracketed URL or without a `rel` parameter are skipped.
pub fn parse_link_header(value: &str) -> HashMap<String, String> {
    let mut relations = HashMap::new();

    for entry in value.split(',') {
        let mut parts = entry.split(';');
        let Some(target) = parts.next().map(str::trim) else {
            continue;
        };
        let Some(url) = target
            .strip_prefix('<')
            .and_then(|rest| rest.strip_suffix('>'))
        else {
            continue;
        };
        if url.is_empty() {
            continue;
        }

        for param in parts {
            let Some((key, raw_value)) = param.split_once('=') else {
                continue;
            };
            if !key.trim().eq_ignore_ascii_case("rel") {
                continue;
            }
            let rels = raw_value.trim().trim_matches('"');
            for rel in rels.split_whitespace() {
                relations
                    .entry(rel.to_ascii_lowercase())
                    .or_insert_with(|| url.to_string());
            }
        }
    }

    relations
}

/// URL of the `next` relation, if the header advertises one that parses.
pub fn next_link(value: &str) -> Option<String> {
    parse_link_header(value).remove("next")
}

/// Whether the raw header text claims a `next` relation, parsed or not.
pub(crate) fn claims_next(value: &str) -> bool {
    value.to_ascii_lowercase().contains("rel=\"next\"")
}
