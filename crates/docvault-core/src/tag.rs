//! Lexical parsing of field tags.
//!
//! A tag is `name,rule,rule=param,...`. Slot 0 is always the output field
//! name (possibly empty). Nothing here knows what a rule means.

/// Tag value that removes a field from validation and output.
pub const IGNORE_MARKER: &str = "-";

/// Token prefix that selects a transformation instead of a validation.
pub const TRANSFORM_PREFIX: &str = "transform=";

///
/// RuleList
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RuleList {
    tokens: Vec<String>,
}

impl RuleList {
    /// True for a tag that is exactly the ignore marker.
    #[must_use]
    pub fn is_ignored(&self) -> bool {
        matches!(self.tokens.as_slice(), [only] if only == IGNORE_MARKER)
    }

    /// Output field name from slot 0, if one was given.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.tokens
            .first()
            .map(String::as_str)
            .filter(|name| !name.is_empty())
    }

    /// Every token after the name slot, omission directives included.
    #[must_use]
    pub fn rules(&self) -> &[String] {
        self.tokens.get(1..).unwrap_or_default()
    }

    pub fn omissions(&self) -> impl Iterator<Item = Omission> + '_ {
        self.rules().iter().filter_map(|token| Omission::parse(token))
    }

    /// Rule tokens with every omission directive removed.
    #[must_use]
    pub fn without_omissions(&self) -> Vec<&str> {
        self.rules()
            .iter()
            .map(String::as_str)
            .filter(|token| Omission::parse(token).is_none())
            .collect()
    }
}

/// Split on `,`, trim each segment, and drop empty segments except the
/// name slot.
#[must_use]
pub fn parse_tag(raw: &str) -> RuleList {
    let tokens = raw
        .split(',')
        .map(str::trim)
        .enumerate()
        .filter(|(index, token)| *index == 0 || !token.is_empty())
        .map(|(_, token)| token.to_string())
        .collect();

    RuleList { tokens }
}

///
/// Omission
/// Directive that drops an empty field from the output.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Omission {
    Always,
    Create,
    Update,
    Validate,
}

impl Omission {
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "omitempty" => Some(Self::Always),
            "omitempty_create" => Some(Self::Create),
            "omitempty_update" | "omitemptyupdate" => Some(Self::Update),
            "omitempty_validate" => Some(Self::Validate),
            _ => None,
        }
    }
}

///
/// Token
/// One executable rule token.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Token<'a> {
    Transform(&'a str),
    Rule { name: &'a str, param: &'a str },
}

impl<'a> Token<'a> {
    /// Split once on `=`; `transform=<name>` selects a transformation.
    #[must_use]
    pub fn parse(raw: &'a str) -> Self {
        if let Some(name) = raw.strip_prefix(TRANSFORM_PREFIX) {
            return Self::Transform(name);
        }

        let (name, param) = raw.split_once('=').unwrap_or((raw, ""));

        Self::Rule { name, param }
    }

    #[must_use]
    pub const fn name(&self) -> &'a str {
        match self {
            Self::Transform(name) | Self::Rule { name, .. } => name,
        }
    }

    #[must_use]
    pub const fn param(&self) -> &'a str {
        match self {
            Self::Transform(_) => "",
            Self::Rule { param, .. } => param,
        }
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_keeps_empty_name_slot() {
        let rules = parse_tag(",required");

        assert_eq!(rules.name(), None);
        assert_eq!(rules.rules(), ["required"]);
    }

    #[test]
    fn parse_trims_and_drops_empty_segments() {
        let rules = parse_tag(" name , required,, min=3 ,");

        assert_eq!(rules.name(), Some("name"));
        assert_eq!(rules.rules(), ["required", "min=3"]);
    }

    #[test]
    fn ignore_marker_must_stand_alone() {
        assert!(parse_tag("-").is_ignored());
        assert!(parse_tag(" - ").is_ignored());
        assert!(!parse_tag("-,required").is_ignored());
        assert_eq!(parse_tag("-,required").name(), Some("-"));
    }

    #[test]
    fn omissions_are_found_anywhere_and_stripped() {
        let rules = parse_tag("tags,omitempty,min=1,omitemptyupdate,omitempty_create");

        let found: Vec<_> = rules.omissions().collect();
        assert_eq!(
            found,
            [Omission::Always, Omission::Update, Omission::Create]
        );
        assert_eq!(rules.without_omissions(), ["min=1"]);
    }

    #[test]
    fn token_splits_on_first_equals_only() {
        assert_eq!(
            Token::parse("pattern=a=b"),
            Token::Rule {
                name: "pattern",
                param: "a=b"
            }
        );
        assert_eq!(
            Token::parse("required"),
            Token::Rule {
                name: "required",
                param: ""
            }
        );
        assert_eq!(Token::parse("transform=upper"), Token::Transform("upper"));
        assert_eq!(Token::parse("transform=upper").name(), "upper");
    }
}
