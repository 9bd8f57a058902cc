//! Header normalization.

/// Canonical comparison token for a header or field name.
///
/// Lowercases and keeps only ASCII letters and digits, so `"Region Name"`,
/// `"RegionName"` and `"region_name"` all become `"regionname"`. Total: empty
/// or symbol-only input yields an empty token.
pub fn normalize(raw: &str) -> String {
    raw.chars()
        .flat_map(char::to_lowercase)
        .filter(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_case_and_separators() {
        assert_eq!(normalize("Region Name"), "regionname");
        assert_eq!(normalize("RegionName"), "regionname");
        assert_eq!(normalize("region_name"), "regionname");
        assert_eq!(normalize("  lineItem/UnblendedCost "), "lineitemunblendedcost");
        assert_eq!(normalize("service.description"), "servicedescription");
    }

    #[test]
    fn keeps_digits() {
        assert_eq!(normalize("Col 3"), "col3");
    }

    #[test]
    fn empty_and_symbol_only_inputs() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize(" -_/ "), "");
        assert_eq!(normalize("Coût €"), "cot");
    }
}
