use crate::enums::Permission;
use serde::Serialize;
use std::collections::BTreeSet;

/// The set of permissions a user holds through their role.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Capabilities(BTreeSet<Permission>);

impl Capabilities {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a set from stored permission names, skipping the ones this
    /// build does not know about.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut caps = Self::new();
        for name in names {
            match name.as_ref().parse::<Permission>() {
                Ok(p) => caps.grant(p),
                Err(e) => tracing::warn!(error = %e, "Ignoring stored permission."),
            }
        }
        caps
    }

    pub fn grant(&mut self, permission: Permission) {
        self.0.insert(permission);
    }

    pub fn contains(&self, permission: Permission) -> bool {
        self.0.contains(&permission)
    }

    pub fn iter(&self) -> impl Iterator<Item = Permission> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<Permission> for Capabilities {
    fn from_iter<T: IntoIterator<Item = Permission>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_names_are_skipped() {
        let caps = Capabilities::from_names(["PREDICT SI", "FLY", "SEE_ALL"]);
        assert!(caps.contains(Permission::Predict));
        assert!(caps.contains(Permission::SeeAll));
        assert!(!caps.contains(Permission::NewData));
        assert_eq!(caps.iter().count(), 2);
    }

    #[test]
    fn serializes_as_a_list_of_names() {
        let caps: Capabilities = [Permission::SeeLocal, Permission::Predict].into_iter().collect();
        assert_eq!(
            serde_json::to_value(&caps).unwrap(),
            serde_json::json!(["PREDICT SI", "SEE_LOCAL"])
        );
    }
}
