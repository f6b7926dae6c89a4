//! Attribute projection for serialized instances.
//!
//! `AttributeFilter` expresses which attributes of a serialized instance to
//! keep: an optional `only` list (kept in its own order) minus an `except`
//! list. With neither set, everything is kept in declaration order.

use crate::instance::Serialized;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeFilter {
    /// Names to keep, in output order. `None` keeps every attribute.
    pub only: Option<Vec<String>>,
    /// Names to drop, applied after `only`.
    pub except: Vec<String>,
}

impl AttributeFilter {
    /// A filter that keeps everything.
    pub fn all() -> Self {
        Self::default()
    }

    /// Convenience: keep only these attributes.
    pub fn only<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            only: Some(names.into_iter().map(Into::into).collect()),
            except: Vec::new(),
        }
    }

    /// Convenience: keep everything except these attributes.
    pub fn except<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            only: None,
            except: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Add names to the except list.
    pub fn and_except<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.except.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.only.is_none() && self.except.is_empty()
    }

    /// Check if an attribute name passes the filter.
    pub fn allows(&self, name: &str) -> bool {
        let listed = match &self.only {
            Some(only) => only.iter().any(|kept| kept == name),
            None => true,
        };
        listed && !self.except.iter().any(|dropped| dropped == name)
    }

    /// Project a serialized instance.
    ///
    /// Names in `only` that the serialized form lacks are skipped.
    pub fn apply(&self, serialized: &Serialized) -> Serialized {
        match &self.only {
            Some(only) => only
                .iter()
                .filter(|name| self.allows(name))
                .filter_map(|name| {
                    serialized
                        .get_key_value(name.as_str())
                        .map(|(key, value)| (key.clone(), value.clone()))
                })
                .collect(),
            None => serialized
                .iter()
                .filter(|(name, _)| self.allows(name))
                .map(|(name, value)| (name.clone(), value.clone()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    fn serialized() -> Serialized {
        [("name", 1), ("birthday", 2), ("phones", 3), ("addresses", 4)]
            .into_iter()
            .map(|(name, value)| (name.to_string(), Value::Integer(value)))
            .collect()
    }

    fn keys(serialized: &Serialized) -> Vec<&str> {
        serialized.keys().map(String::as_str).collect()
    }

    #[test]
    fn empty_filter_keeps_everything() {
        let filter = AttributeFilter::all();
        assert!(filter.is_empty());
        assert_eq!(filter.apply(&serialized()), serialized());
    }

    #[test]
    fn only_follows_its_own_order() {
        let filter = AttributeFilter::only(["birthday", "name"]);
        assert_eq!(keys(&filter.apply(&serialized())), vec!["birthday", "name"]);
    }

    #[test]
    fn except_drops_names_and_ignores_unknown_ones() {
        let filter = AttributeFilter::except(["age", "addresses"]);
        assert_eq!(
            keys(&filter.apply(&serialized())),
            vec!["name", "birthday", "phones"]
        );
    }

    #[test]
    fn only_minus_except() {
        let filter = AttributeFilter::only(["name", "phones"]).and_except(["phones"]);
        assert!(filter.allows("name"));
        assert!(!filter.allows("phones"));
        assert!(!filter.allows("birthday"));
        assert_eq!(keys(&filter.apply(&serialized())), vec!["name"]);
    }

    #[test]
    fn only_skips_missing_names() {
        let filter = AttributeFilter::only(["name", "nickname"]);
        assert_eq!(keys(&filter.apply(&serialized())), vec!["name"]);
    }
}
