/// Characters stripped from a CNPJ before comparison.
const CNPJ_PUNCTUATION: [char; 3] = ['.', '/', '-'];

/// Strip `.`, `/` and `-` from a CNPJ. Absent input yields an empty string.
///
/// Only punctuation is removed; anything else (letters, spaces) is kept as-is,
/// so a malformed ID still compares unequal to a clean one.
pub fn normalize_cnpj(cnpj: Option<&str>) -> String {
    match cnpj {
        Some(s) => s.chars().filter(|c| !CNPJ_PUNCTUATION.contains(c)).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn strips_formatting() {
        assert_eq!(normalize_cnpj(Some("12.345.678/0001-99")), "12345678000199");
        assert_eq!(normalize_cnpj(Some("12345678000199")), "12345678000199");
    }

    #[test]
    fn absent_and_empty() {
        assert_eq!(normalize_cnpj(None), "");
        assert_eq!(normalize_cnpj(Some("")), "");
        assert_eq!(normalize_cnpj(Some("./-")), "");
    }

    #[test]
    fn keeps_other_characters() {
        assert_eq!(normalize_cnpj(Some(" 12.3a ")), " 123a ");
    }

    proptest! {
        #[test]
        fn removes_exactly_punctuation(s in "[0-9./-]{0,32}") {
            let out = normalize_cnpj(Some(&s));
            let digits: String = s.chars().filter(|c| c.is_ascii_digit()).collect();
            prop_assert_eq!(out, digits);
        }

        #[test]
        fn idempotent(s in "\\PC{0,32}") {
            let once = normalize_cnpj(Some(&s));
            let twice = normalize_cnpj(Some(&once));
            prop_assert_eq!(once, twice);
        }
    }
}
