//! Placement rules for accounts in the chart tree.

use super::error::AccountError;

/// The parent fields needed to place a new account.
#[derive(Debug, Clone, Copy)]
pub struct ParentAccount {
    /// Depth of the parent in the hierarchy.
    pub level: i32,
}

/// Checks that an account of `level` may hang under `parent`.
///
/// Roots sit at level 1 without a parent; every other account needs a
/// parent whose level is strictly lower.
pub fn validate_hierarchy(level: i32, parent: Option<ParentAccount>) -> Result<(), AccountError> {
    if level < 1 {
        return Err(AccountError::InvalidHierarchy(format!(
            "level must be at least 1, got {level}"
        )));
    }

    match parent {
        None if level > 1 => Err(AccountError::InvalidHierarchy(format!(
            "an account at level {level} needs a parent"
        ))),
        None => Ok(()),
        Some(parent) if level <= parent.level => Err(AccountError::InvalidHierarchy(format!(
            "level {level} must be greater than parent level {}",
            parent.level
        ))),
        Some(_) => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_root_without_parent() {
        assert!(validate_hierarchy(1, None).is_ok());
    }

    #[rstest]
    #[case(2, 1)]
    #[case(4, 3)]
    #[case(4, 1)]
    fn test_child_below_parent(#[case] level: i32, #[case] parent_level: i32) {
        assert!(validate_hierarchy(level, Some(ParentAccount { level: parent_level })).is_ok());
    }

    #[rstest]
    #[case(2, 2)]
    #[case(2, 3)]
    fn test_child_not_below_parent(#[case] level: i32, #[case] parent_level: i32) {
        let err = validate_hierarchy(level, Some(ParentAccount { level: parent_level }))
            .unwrap_err();
        assert!(matches!(err, AccountError::InvalidHierarchy(_)));
    }

    #[test]
    fn test_non_root_requires_parent() {
        assert!(validate_hierarchy(3, None).is_err());
    }

    #[test]
    fn test_level_zero_rejected() {
        assert!(validate_hierarchy(0, None).is_err());
    }
}
