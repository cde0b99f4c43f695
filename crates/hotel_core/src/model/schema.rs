//! Declarative field rules.
//!
//! Each entity publishes a static `&[FieldRule]` table; the service layer
//! interprets it instead of carrying per-entity validation code.

/// Expected JSON shape of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Non-blank string.
    Text,
    /// Integer not lower than `min`.
    Integer { min: i64 },
    /// Calendar date string, `YYYY-MM-DD`.
    Date,
    /// RFC 3339 timestamp string.
    Timestamp,
    /// String that must be one of the listed literals.
    Enum(&'static [&'static str]),
}

/// Validation rule for one entity field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
    pub name: &'static str,
    pub kind: FieldKind,
    /// Must be present and non-empty on create.
    pub required: bool,
    /// Accepts `null`.
    pub nullable: bool,
}

impl FieldRule {
    pub const fn required(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: true,
            nullable: false,
        }
    }

    pub const fn optional(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: false,
            nullable: true,
        }
    }

    /// Same field, but required on create (still nullable on update).
    pub const fn required_on_create(self) -> Self {
        Self {
            name: self.name,
            kind: self.kind,
            required: true,
            nullable: self.nullable,
        }
    }
}

/// Looks up the rule for `name` in a rule table.
pub fn find_rule<'a>(rules: &'a [FieldRule], name: &str) -> Option<&'a FieldRule> {
    rules.iter().find(|rule| rule.name == name)
}
