use strum_macros::{AsRefStr, Display, EnumString};

/// Stylesheet languages the range parser understands.
///
/// The string forms are the editor language identifiers (`css`, `less`, `scss`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, EnumString, Display, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum Dialect {
    #[default]
    Css,
    Less,
    Scss,
}

/// What a dialect allows inside a rule body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// Rules may be nested in other rules and combine with their selectors.
    pub supports_nesting: bool,
    /// `@at-root` is split off as its own name, ahead of the selectors after it.
    pub supports_at_root_escape: bool,
}

impl Dialect {
    /// Resolves an editor language identifier, falling back to plain CSS for
    /// anything unrecognized.
    pub fn from_language_id(language_id: &str) -> Self {
        match language_id.parse() {
            Ok(dialect) => dialect,
            Err(_) => {
                tracing::warn!(
                    language_id,
                    "only css, less and scss can be parsed for ranges, treating document as css"
                );
                Dialect::Css
            }
        }
    }

    pub const fn capabilities(self) -> Capabilities {
        match self {
            Dialect::Css => Capabilities {
                supports_nesting: false,
                supports_at_root_escape: false,
            },
            Dialect::Less => Capabilities {
                supports_nesting: true,
                supports_at_root_escape: false,
            },
            Dialect::Scss => Capabilities {
                supports_nesting: true,
                supports_at_root_escape: true,
            },
        }
    }
}

#[cfg(test)]
mod dialect_test {
    use super::Dialect;

    #[test]
    fn known_language_ids() {
        assert_eq!(Dialect::from_language_id("css"), Dialect::Css);
        assert_eq!(Dialect::from_language_id("less"), Dialect::Less);
        assert_eq!(Dialect::from_language_id("scss"), Dialect::Scss);
        assert_eq!(Dialect::Scss.to_string(), "scss");
    }

    #[test]
    fn unknown_language_id_falls_back_to_css() {
        assert_eq!(Dialect::from_language_id("sass"), Dialect::Css);
        assert_eq!(Dialect::from_language_id("SCSS"), Dialect::Css);
        assert_eq!(Dialect::from_language_id(""), Dialect::Css);
    }

    #[test]
    fn capabilities() {
        assert!(!Dialect::Css.capabilities().supports_nesting);
        assert!(Dialect::Less.capabilities().supports_nesting);
        assert!(Dialect::Scss.capabilities().supports_nesting);
        assert!(!Dialect::Less.capabilities().supports_at_root_escape);
        assert!(Dialect::Scss.capabilities().supports_at_root_escape);
    }
}
