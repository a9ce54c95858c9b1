use crate::license::spdx::LicenseRegistry;
use crate::license::texts::LicenseTextLookup;
use crate::models::LicenseInfo;

pub const NO_LICENSE_TEXT: &str = "No license text found.";

/// Lowercase hex of the identifier's UTF-8 bytes.
///
/// The renderer only accepts alphanumeric anchors, and hex keeps distinct
/// identifiers distinct.
pub fn anchor_key(license: &str) -> String {
    hex::encode(license.as_bytes())
}

/// The built-in PDF fonts have no tab glyph.
pub fn normalize_text(text: &str) -> String {
    text.replace('\t', "    ")
}

pub fn build(
    license: &str,
    texts: &dyn LicenseTextLookup,
    registry: &dyn LicenseRegistry,
) -> LicenseInfo {
    let text = texts
        .license_text(license)
        .unwrap_or_else(|| NO_LICENSE_TEXT.to_string());

    LicenseInfo {
        anchor: anchor_key(license),
        text: normalize_text(&text),
        license: license.to_string(),
        name: registry
            .full_name(license)
            .unwrap_or_else(|| license.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use proptest::prelude::*;

    use super::*;
    use crate::license::spdx::SpdxRegistry;
    use crate::license::texts::LicenseTexts;

    fn texts(entries: &[(&str, &str)]) -> LicenseTexts {
        let mut texts = LicenseTexts::default();
        for (id, text) in entries {
            texts.insert(id.to_string(), text.to_string());
        }
        texts
    }

    #[test]
    fn test_anchor_key_mit() {
        assert_eq!(anchor_key("MIT"), "4d4954");
    }

    #[test]
    fn test_tabs_become_four_spaces() {
        let info = build(
            "MIT",
            &texts(&[("MIT", "Permission\tis granted")]),
            &SpdxRegistry::default(),
        );
        assert_eq!(info.text, "Permission    is granted");
        assert_eq!(info.name, "MIT License");
        assert_eq!(info.license, "MIT");
        assert_eq!(info.anchor, "4d4954");
    }

    #[test]
    fn test_missing_text_uses_placeholder() {
        let info = build("Foo", &texts(&[]), &SpdxRegistry::default());
        assert_eq!(info.text, "No license text found.");
        assert_eq!(info.name, "Foo");
    }

    #[test]
    fn test_registry_override_name() {
        let registry = SpdxRegistry::new(HashMap::from([(
            "LicenseRef-acme".to_string(),
            "ACME License".to_string(),
        )]));
        let info = build("LicenseRef-acme", &texts(&[]), &registry);
        assert_eq!(info.name, "ACME License");
    }

    proptest! {
        #[test]
        fn prop_anchor_keys_are_hex(id in "\\PC{1,40}") {
            let key = anchor_key(&id);
            prop_assert!(!key.is_empty());
            prop_assert!(key.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')));
        }

        #[test]
        fn prop_anchor_keys_are_injective(a in "\\PC{1,24}", b in "\\PC{1,24}") {
            prop_assume!(a != b);
            prop_assert_ne!(anchor_key(&a), anchor_key(&b));
        }

        #[test]
        fn prop_no_tabs_survive(text in "[a-z\t ]{0,64}") {
            let out = normalize_text(&text);
            prop_assert!(!out.contains('\t'));
            let tabs = text.matches('\t').count();
            prop_assert_eq!(out.len(), text.len() + tabs * 3);
        }
    }
}
