//! Organization slug derivation.

/// Machine-readable organization name: the display name lowercased with
/// spaces replaced by hyphens.
///
/// The identity provider requires organization names to be URL-safe; the
/// original display name is kept separately as `display_name`.
pub fn org_slug(display_name: &str) -> String {
    display_name.to_lowercase().replace(' ', "-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_lowercases_and_hyphenates() {
        assert_eq!(org_slug("Acme Corp"), "acme-corp");
    }

    #[test]
    fn test_slug_handles_multiple_spaces() {
        assert_eq!(org_slug("Acme  Corp"), "acme--corp");
    }

    #[test]
    fn test_slug_leaves_hyphenated_input_alone() {
        assert_eq!(org_slug("acme-corp"), "acme-corp");
    }
}
