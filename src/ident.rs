//! Identifier reconciliation.
//!
//! Historical rows were written under two conventions: a generated UUID
//! (stored in canonical hyphenated lowercase form) or an opaque string id
//! carried over from the legacy deployment. Every lookup-by-id has to work
//! against both, so a caller-supplied identifier expands into an ordered
//! list of equivalent stored forms: the canonical UUID rendering first,
//! then the raw string as a fallback.

use uuid::Uuid;

/// Mint an identifier for a new record, in the canonical stored form.
pub fn generate() -> String {
    Uuid::new_v4().to_string()
}

/// Expand a caller-supplied identifier into the stored forms it may match,
/// in the order they should be tried. Pure; no store access.
pub fn candidates(raw: &str) -> Vec<String> {
    match Uuid::parse_str(raw) {
        Ok(id) => {
            let canonical = id.as_hyphenated().to_string();
            if canonical == raw {
                vec![canonical]
            } else {
                vec![canonical, raw.to_string()]
            }
        }
        Err(_) => vec![raw.to_string()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_uuid_yields_single_candidate() {
        let id = generate();
        assert_eq!(candidates(&id), vec![id]);
    }

    #[test]
    fn uppercase_uuid_tries_canonical_form_first() {
        let raw = "67E55044-10B1-426F-9247-BB680E5FE0C8";
        let forms = candidates(raw);
        assert_eq!(
            forms,
            vec![
                "67e55044-10b1-426f-9247-bb680e5fe0c8".to_string(),
                raw.to_string()
            ]
        );
    }

    #[test]
    fn unhyphenated_uuid_is_recognized() {
        let forms = candidates("67e5504410b1426f9247bb680e5fe0c8");
        assert_eq!(forms[0], "67e55044-10b1-426f-9247-bb680e5fe0c8");
        assert_eq!(forms.len(), 2);
    }

    #[test]
    fn opaque_string_falls_through_unchanged() {
        assert_eq!(candidates("legacy-user-42"), vec!["legacy-user-42".to_string()]);
    }

    #[test]
    fn empty_string_is_still_a_candidate() {
        assert_eq!(candidates(""), vec![String::new()]);
    }
}
