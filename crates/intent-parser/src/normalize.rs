//! Lexical normalization shared by every matcher in this crate.

/// Lowercase `text`, turn every character outside `[a-z0-9]` into a separator and
/// join the remaining words with single spaces.
///
/// Total and idempotent: `normalize(&normalize(x)) == normalize(x)`.
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    let mut out = String::with_capacity(lowered.len());
    for word in lowered
        .split(|c: char| !(c.is_ascii_lowercase() || c.is_ascii_digit()))
        .filter(|w| !w.is_empty())
    {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}

/// Whitespace tokens of an already normalized string.
pub fn tokens(normalized: &str) -> Vec<&str> {
    normalized.split(' ').filter(|t| !t.is_empty()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_normalize_basic() {
        assert_eq!(normalize("  Add to Cart: the MESH pants!! "), "add to cart the mesh pants");
        assert_eq!(normalize("size\tmedium\n\nplease"), "size medium please");
        assert_eq!(normalize("XL-2"), "xl 2");
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("?!..."), "");
    }

    #[test]
    fn test_normalize_non_ascii_becomes_separator() {
        assert_eq!(normalize("café crème"), "caf cr me");
        assert_eq!(normalize("I’m"), "i m");
    }

    #[test]
    fn test_tokens_skip_empty() {
        assert_eq!(tokens(""), Vec::<&str>::new());
        assert_eq!(tokens("add to cart"), vec!["add", "to", "cart"]);
    }

    proptest! {
        #[test]
        fn normalize_is_idempotent(input in any::<String>()) {
            let once = normalize(&input);
            prop_assert_eq!(normalize(&once), once.clone());
        }

        #[test]
        fn normalize_output_charset(input in any::<String>()) {
            let out = normalize(&input);
            prop_assert!(out.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == ' '));
            prop_assert!(!out.contains("  "));
            prop_assert!(!out.starts_with(' '));
            prop_assert!(!out.ends_with(' '));
        }
    }
}
