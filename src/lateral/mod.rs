// SPDX-License-Identifier: PMPL-1.0-or-later

//! Lateral attribute generalization.
//!
//! When neither the exact path nor its aliases carry a value, a handful of
//! attributes may be generalized: `alt` variants fall back to the plain
//! value, optional grammatical `case`/`gender` fall back to the unmarked
//! form, and plural `count` falls back to `other` and then to no count at all.
//!
//! Generalization is cumulative: one working copy of the path loses its
//! governed attributes one by one, in table order, and every intermediate
//! path becomes a candidate. The table order does not depend on where the
//! attributes sit in the path.

use crate::error::ResolutionError;
use crate::source::SchemaInfo;
use crate::xpath::XPath;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributePolicy {
    /// Always generate the variant without the attribute.
    Remove,
    /// Generate the variant without the attribute only if the schema says
    /// the attribute is optional on its element.
    RemoveIfOptional,
    /// Substitute the default category (unless already there), then also
    /// generate the variant without the attribute.
    CategoryFallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GovernedAttribute {
    pub name: &'static str,
    pub policy: AttributePolicy,
}

pub const GOVERNED_ATTRIBUTES: &[GovernedAttribute] = &[
    GovernedAttribute {
        name: "alt",
        policy: AttributePolicy::Remove,
    },
    GovernedAttribute {
        name: "case",
        policy: AttributePolicy::RemoveIfOptional,
    },
    GovernedAttribute {
        name: "gender",
        policy: AttributePolicy::RemoveIfOptional,
    },
    GovernedAttribute {
        name: "count",
        policy: AttributePolicy::CategoryFallback,
    },
];

impl GovernedAttribute {
    /// Variants of `path` for this attribute. When non-empty, the last one no
    /// longer carries the attribute.
    fn apply<C>(
        &self,
        path: &XPath,
        index: usize,
        schema: &C,
        default_category: &str,
    ) -> Result<Vec<XPath>, ResolutionError>
    where
        C: SchemaInfo + ?Sized,
    {
        let mut variants = Vec::new();
        match self.policy {
            AttributePolicy::Remove => {
                variants.push(self.stripped(path, index)?);
            }
            AttributePolicy::RemoveIfOptional => {
                let element = path.elements()[index].name();
                let optional = schema
                    .is_optional(element, self.name)
                    .map_err(ResolutionError::collaborator)?;
                if optional {
                    variants.push(self.stripped(path, index)?);
                }
            }
            AttributePolicy::CategoryFallback => {
                if path.attribute(index, self.name) != Some(default_category) {
                    let substituted = path.with_attribute(index, self.name, Some(default_category))?;
                    self.verify_singular(&substituted, 1)?;
                    variants.push(substituted);
                }
                variants.push(self.stripped(path, index)?);
            }
        }
        Ok(variants)
    }

    fn stripped(&self, path: &XPath, index: usize) -> Result<XPath, ResolutionError> {
        let variant = path.with_attribute(index, self.name, None)?;
        self.verify_singular(&variant, 0)?;
        Ok(variant)
    }

    fn verify_singular(&self, path: &XPath, expected: usize) -> Result<(), ResolutionError> {
        if path.attribute_occurrences(self.name) == expected {
            Ok(())
        } else {
            Err(ResolutionError::DuplicateGovernedAttribute {
                attribute: self.name.to_string(),
                path: path.to_string(),
            })
        }
    }
}

/// Cumulative generalizations of `path`, in policy table order.
///
/// Each governed attribute contributes zero, one or two variants of the
/// working path, which then continues without that attribute. A governed
/// attribute found on more than one element is a fatal error.
pub fn generate_variants<C>(
    path: &XPath,
    schema: &C,
    default_category: &str,
) -> Result<Vec<XPath>, ResolutionError>
where
    C: SchemaInfo + ?Sized,
{
    let mut variants = Vec::new();
    let mut working = path.clone();
    for rule in GOVERNED_ATTRIBUTES {
        let Some(index) = working.attribute_element_index(rule.name) else {
            continue;
        };
        if working.attribute_occurrences(rule.name) > 1 {
            return Err(ResolutionError::DuplicateGovernedAttribute {
                attribute: rule.name.to_string(),
                path: working.to_string(),
            });
        }
        let produced = rule.apply(&working, index, schema, default_category)?;
        if let Some(last) = produced.last() {
            working = last.clone();
        }
        variants.extend(produced);
    }
    Ok(variants)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::Snapshot;

    fn path(raw: &str) -> XPath {
        XPath::parse(raw).unwrap()
    }

    fn strings(paths: Vec<XPath>) -> Vec<String> {
        paths.into_iter().map(String::from).collect()
    }

    #[test]
    fn test_policy_table_order() {
        let names: Vec<&str> = GOVERNED_ATTRIBUTES.iter().map(|rule| rule.name).collect();
        assert_eq!(names, vec!["alt", "case", "gender", "count"]);
    }

    #[test]
    fn test_alt_is_always_removed() {
        let schema = Snapshot::new();
        let variants = generate_variants(
            &path(r#"//ldml/localeDisplayNames/territories/territory[@type="GB"][@alt="short"]"#),
            &schema,
            "other",
        )
        .unwrap();
        assert_eq!(
            strings(variants),
            vec![r#"//ldml/localeDisplayNames/territories/territory[@type="GB"]"#]
        );
    }

    #[test]
    fn test_case_removed_only_when_optional() {
        let raw = r#"//ldml/units/unit[@type="meter"]/unitPattern[@case="genitive"]"#;
        let required = Snapshot::new();
        assert!(generate_variants(&path(raw), &required, "other")
            .unwrap()
            .is_empty());

        let mut optional = Snapshot::new();
        optional.mark_optional("unitPattern", "case");
        assert_eq!(
            strings(generate_variants(&path(raw), &optional, "other").unwrap()),
            vec![r#"//ldml/units/unit[@type="meter"]/unitPattern"#]
        );
    }

    #[test]
    fn test_count_substitutes_other_before_removal() {
        let schema = Snapshot::new();
        let variants = generate_variants(
            &path(r#"//ldml/units/unit[@type="meter"]/unitPattern[@count="few"]"#),
            &schema,
            "other",
        )
        .unwrap();
        assert_eq!(
            strings(variants),
            vec![
                r#"//ldml/units/unit[@type="meter"]/unitPattern[@count="other"]"#,
                r#"//ldml/units/unit[@type="meter"]/unitPattern"#,
            ]
        );
    }

    #[test]
    fn test_count_other_is_only_removed() {
        let schema = Snapshot::new();
        let variants = generate_variants(
            &path(r#"//ldml/units/unit[@type="meter"]/unitPattern[@count="other"]"#),
            &schema,
            "other",
        )
        .unwrap();
        assert_eq!(
            strings(variants),
            vec![r#"//ldml/units/unit[@type="meter"]/unitPattern"#]
        );
    }

    #[test]
    fn test_generalization_is_cumulative_in_table_order() {
        let mut schema = Snapshot::new();
        schema.mark_optional("unitPattern", "gender");
        let variants = generate_variants(
            &path(r#"//ldml/units/unit[@alt="x"][@type="meter"]/unitPattern[@count="one"][@gender="masculine"]"#),
            &schema,
            "other",
        )
        .unwrap();
        assert_eq!(
            strings(variants),
            vec![
                r#"//ldml/units/unit[@type="meter"]/unitPattern[@count="one"][@gender="masculine"]"#,
                r#"//ldml/units/unit[@type="meter"]/unitPattern[@count="one"]"#,
                r#"//ldml/units/unit[@type="meter"]/unitPattern[@count="other"]"#,
                r#"//ldml/units/unit[@type="meter"]/unitPattern"#,
            ]
        );
    }

    #[test]
    fn test_required_attribute_stays_on_working_path() {
        let schema = Snapshot::new();
        let variants = generate_variants(
            &path(r#"//ldml/a[@alt="short"][@case="dative"][@count="few"]"#),
            &schema,
            "other",
        )
        .unwrap();
        assert_eq!(
            strings(variants),
            vec![
                r#"//ldml/a[@case="dative"][@count="few"]"#,
                r#"//ldml/a[@case="dative"][@count="other"]"#,
                r#"//ldml/a[@case="dative"]"#,
            ]
        );
    }

    #[test]
    fn test_duplicate_count_is_fatal() {
        let schema = Snapshot::new();
        let result = generate_variants(
            &path(r#"//ldml/a[@count="one"]/b[@count="few"]"#),
            &schema,
            "other",
        );
        match result {
            Err(ResolutionError::DuplicateGovernedAttribute { attribute, .. }) => {
                assert_eq!(attribute, "count");
            }
            other => panic!("expected duplicate attribute error, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_required_case_is_still_fatal() {
        let schema = Snapshot::new();
        assert!(generate_variants(
            &path(r#"//ldml/a[@case="x"]/b[@case="y"]"#),
            &schema,
            "other",
        )
        .is_err());
    }
}
