//! Style rule text for the pseudo-element effect variant.
//!
//! The pseudo-element variant cannot be colored through an inline style, so
//! the color is published as a one-rule stylesheet that targets the marker
//! attribute:
//!
//! ```
//! use ripple_style::pseudo_rule;
//!
//! let rule = pseudo_rule("ant-click-animating-without-extra-node", "rgb(1, 2, 3)").unwrap();
//! assert_eq!(
//!     rule,
//!     r#"[ant-click-animating-without-extra-node="true"]:after { border-color: rgb(1, 2, 3); }"#
//! );
//! ```

use crate::{Error, Result};

/// Check that `name` can be used as an unquoted attribute selector name.
fn validate_attribute(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid_start = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    if valid_start && chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
        Ok(())
    } else {
        Err(Error::invalid_attribute(name))
    }
}

/// Selector matching elements whose `attribute` is currently `"true"`.
pub fn marker_selector(attribute: &str) -> Result<String> {
    validate_attribute(attribute)?;
    Ok(format!("[{attribute}=\"true\"]"))
}

/// A rule coloring the `:after` pseudo-element's border of marked elements.
pub fn pseudo_rule(attribute: &str, color: &str) -> Result<String> {
    let selector = marker_selector(attribute)?;
    Ok(format!("{selector}:after {{ border-color: {color}; }}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_for_marker_attribute() {
        assert_eq!(
            marker_selector("ant-click-animating").unwrap(),
            "[ant-click-animating=\"true\"]"
        );
    }

    #[test]
    fn rule_embeds_color_verbatim() {
        let rule = pseudo_rule("data-wave", "#1890ff").unwrap();
        assert_eq!(rule, "[data-wave=\"true\"]:after { border-color: #1890ff; }");
    }

    #[test]
    fn rejects_unusable_attribute_names() {
        for name in ["", "1st", "a b", "x]y", "wave\"on"] {
            assert_eq!(
                pseudo_rule(name, "red"),
                Err(Error::invalid_attribute(name)),
                "{name:?} should be rejected"
            );
        }
    }
}
