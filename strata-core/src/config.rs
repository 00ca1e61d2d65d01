//! Configuration types

use crate::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Rule for ordering commits that become ready at the same time.
///
/// Only affects the relative order of independent lineages. Parent/child
/// order is always topological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Most recent `date` first, undated commits last, then by hash.
    #[default]
    NewestFirst,
    /// Ascending hash only.
    HashOrder,
}

impl TieBreak {
    pub fn as_str(&self) -> &'static str {
        match self {
            TieBreak::NewestFirst => "newest_first",
            TieBreak::HashOrder => "hash_order",
        }
    }
}

impl fmt::Display for TieBreak {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TieBreak {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "newest_first" => Ok(TieBreak::NewestFirst),
            "hash_order" => Ok(TieBreak::HashOrder),
            _ => Err(ConfigError::InvalidValue {
                field: "tie_break".to_string(),
                value: s.to_string(),
                reason: "expected newest_first or hash_order".to_string(),
            }),
        }
    }
}

/// Layout configuration passed to every render call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// Keep a column free for the first public commit so the main branch
    /// stays on the left.
    pub reserve_public_column: bool,
    /// Skip parents that are not loaded at all instead of drawing `~`.
    pub ignore_anonymous_parents: bool,
    pub tie_break: TieBreak,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            reserve_public_column: true,
            ignore_anonymous_parents: false,
            tie_break: TieBreak::NewestFirst,
        }
    }
}

impl RenderConfig {
    /// Create from environment variables with fallback to defaults.
    ///
    /// Environment variables:
    /// - `STRATA_RESERVE_PUBLIC_COLUMN`: `true`/`false` (default: true)
    /// - `STRATA_IGNORE_ANONYMOUS_PARENTS`: `true`/`false` (default: false)
    /// - `STRATA_TIE_BREAK`: `newest_first` or `hash_order` (default: newest_first)
    ///
    /// Unparseable values fall back to the default for that field.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            reserve_public_column: std::env::var("STRATA_RESERVE_PUBLIC_COLUMN")
                .ok()
                .and_then(|s| parse_bool(&s))
                .unwrap_or(defaults.reserve_public_column),
            ignore_anonymous_parents: std::env::var("STRATA_IGNORE_ANONYMOUS_PARENTS")
                .ok()
                .and_then(|s| parse_bool(&s))
                .unwrap_or(defaults.ignore_anonymous_parents),
            tie_break: std::env::var("STRATA_TIE_BREAK")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.tie_break),
        }
    }

    /// Parse a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(source: &str) -> StrataResult<Self> {
        let config: RenderConfig = toml::from_str(source).map_err(|e| {
            StrataError::Config(ConfigError::Parse {
                reason: e.to_string(),
            })
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    ///
    /// Every combination of the current fields is meaningful, so this only
    /// exists to keep the load path uniform with [`TextConfig::validate`].
    pub fn validate(&self) -> StrataResult<()> {
        Ok(())
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

// ============================================================================
// TEXT OUTPUT
// ============================================================================

/// Glyphs and spacing for the plain-text graph renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TextConfig {
    pub node_glyph: char,
    /// Glyph of the working copy parent.
    pub head_glyph: char,
    pub obsolete_glyph: char,
    pub you_are_here_glyph: char,
    /// Spaces between the graph and the message column.
    pub message_gap: usize,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            node_glyph: 'o',
            head_glyph: '@',
            obsolete_glyph: 'x',
            you_are_here_glyph: '+',
            message_gap: 2,
        }
    }
}

/// Characters reserved for edges; glyphs must stay distinguishable from them.
const LINE_CHARS: &[char] = &[
    '│', '─', '╎', '┄', '├', '┤', '┬', '┴', '┼', '╭', '╮', '╯', '╰', '╵', '╷', '╴', '╶', '~',
];

impl TextConfig {
    /// Validate the configuration.
    ///
    /// Validates:
    /// - every glyph is visible and not an edge character
    /// - message_gap >= 1
    pub fn validate(&self) -> StrataResult<()> {
        let glyphs = [
            ("node_glyph", self.node_glyph),
            ("head_glyph", self.head_glyph),
            ("obsolete_glyph", self.obsolete_glyph),
            ("you_are_here_glyph", self.you_are_here_glyph),
        ];
        for (field, glyph) in glyphs {
            if glyph.is_whitespace() || glyph.is_control() {
                return Err(StrataError::Config(ConfigError::InvalidValue {
                    field: field.to_string(),
                    value: format!("{:?}", glyph),
                    reason: "glyph must be a visible character".to_string(),
                }));
            }
            if LINE_CHARS.contains(&glyph) {
                return Err(StrataError::Config(ConfigError::InvalidValue {
                    field: field.to_string(),
                    value: glyph.to_string(),
                    reason: "glyph collides with an edge character".to_string(),
                }));
            }
        }

        if self.message_gap == 0 {
            return Err(StrataError::Config(ConfigError::InvalidValue {
                field: "message_gap".to_string(),
                value: self.message_gap.to_string(),
                reason: "message_gap must be greater than 0".to_string(),
            }));
        }

        Ok(())
    }

    /// Parse a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(source: &str) -> StrataResult<Self> {
        let config: TextConfig = toml::from_str(source).map_err(|e| {
            StrataError::Config(ConfigError::Parse {
                reason: e.to_string(),
            })
        })?;
        config.validate()?;
        Ok(config)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_config_defaults() {
        let config = RenderConfig::default();
        assert!(config.reserve_public_column);
        assert!(!config.ignore_anonymous_parents);
        assert_eq!(config.tie_break, TieBreak::NewestFirst);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_render_config_from_toml() {
        let config = RenderConfig::from_toml_str(
            r#"
            ignore_anonymous_parents = true
            tie_break = "hash_order"
            "#,
        )
        .unwrap();
        assert!(config.reserve_public_column);
        assert!(config.ignore_anonymous_parents);
        assert_eq!(config.tie_break, TieBreak::HashOrder);
    }

    #[test]
    fn test_render_config_rejects_unknown_keys() {
        let result = RenderConfig::from_toml_str("max_width = 3");
        assert!(matches!(
            result,
            Err(StrataError::Config(ConfigError::Parse { .. }))
        ));
    }

    #[test]
    fn test_tie_break_parse() {
        assert_eq!("newest-first".parse::<TieBreak>().unwrap(), TieBreak::NewestFirst);
        assert_eq!("HASH_ORDER".parse::<TieBreak>().unwrap(), TieBreak::HashOrder);
        assert!(matches!(
            "random".parse::<TieBreak>(),
            Err(ConfigError::InvalidValue { field, .. }) if field == "tie_break"
        ));
    }

    #[test]
    fn test_parse_bool_variants() {
        assert_eq!(parse_bool("Yes"), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn test_text_config_defaults_are_valid() {
        assert!(TextConfig::default().validate().is_ok());
    }

    #[test]
    fn test_text_config_rejects_line_glyph() {
        let config = TextConfig {
            node_glyph: '│',
            ..TextConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(StrataError::Config(ConfigError::InvalidValue { field, .. })) if field == "node_glyph"
        ));
    }

    #[test]
    fn test_text_config_rejects_zero_gap() {
        let config = TextConfig {
            message_gap: 0,
            ..TextConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(StrataError::Config(ConfigError::InvalidValue { field, .. })) if field == "message_gap"
        ));
    }

    #[test]
    fn test_text_config_from_toml() {
        let config = TextConfig::from_toml_str("head_glyph = \"*\"").unwrap();
        assert_eq!(config.head_glyph, '*');
        assert_eq!(config.node_glyph, 'o');
    }
}

// ============================================================================
// PROPERTY-BASED TESTS
// ============================================================================

#[cfg(test)]
mod prop_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Any whitespace glyph is rejected.
        #[test]
        fn prop_text_config_rejects_whitespace_glyph(glyph in prop::sample::select(vec![' ', '\t', '\u{00a0}', '\u{2003}'])) {
            let config = TextConfig { head_glyph: glyph, ..TextConfig::default() };
            prop_assert!(config.validate().is_err());
        }

        /// Any positive gap with default glyphs validates.
        #[test]
        fn prop_text_config_accepts_positive_gap(gap in 1usize..64) {
            let config = TextConfig { message_gap: gap, ..TextConfig::default() };
            prop_assert!(config.validate().is_ok());
        }
    }
}
