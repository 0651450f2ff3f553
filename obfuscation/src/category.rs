//! Sensitivity categories: "what kind of sensitive data is this?"
//!
//! The set is closed. Every category has exactly one standard substitution, and
//! the standard registry is built by an exhaustive match over this enum, so a new
//! variant does not compile until it has a policy.

use std::fmt;

/// Category attached to a field with `#[obfuscate(Category)]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ObfuscationType {
    /// Name of the acting or affected user.
    UserName,
    /// Client IP address in text form.
    IpAddress,
    /// Free-text author list of a package.
    Authors,
    /// Numeric account key.
    UserKey,
    /// Collection of user names, e.g. package owners.
    UserNameList,
}

impl ObfuscationType {
    /// Every category, in declaration order.
    pub const ALL: [ObfuscationType; 5] = [
        ObfuscationType::UserName,
        ObfuscationType::IpAddress,
        ObfuscationType::Authors,
        ObfuscationType::UserKey,
        ObfuscationType::UserNameList,
    ];

    /// Returns the category name as written in `#[obfuscate(...)]`.
    pub const fn name(self) -> &'static str {
        match self {
            ObfuscationType::UserName => "UserName",
            ObfuscationType::IpAddress => "IpAddress",
            ObfuscationType::Authors => "Authors",
            ObfuscationType::UserKey => "UserKey",
            ObfuscationType::UserNameList => "UserNameList",
        }
    }
}

impl fmt::Display for ObfuscationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::ObfuscationType;

    #[test]
    fn all_lists_each_category_once() {
        let mut names: Vec<_> = ObfuscationType::ALL.iter().map(|c| c.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), ObfuscationType::ALL.len());
    }

    #[test]
    fn display_matches_attribute_spelling() {
        assert_eq!(ObfuscationType::IpAddress.to_string(), "IpAddress");
        assert_eq!(ObfuscationType::UserNameList.to_string(), "UserNameList");
    }
}
