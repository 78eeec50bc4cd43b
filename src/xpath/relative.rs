// SPDX-License-Identifier: PMPL-1.0-or-later

//! Relative path composition for alias targets.

use super::{PathError, XPath};

/// Compose `relative` against `base`.
///
/// A leading `//` makes `relative` absolute. Otherwise every leading `../`
/// drops one trailing element of `base` before the remainder is appended.
/// Single quotes in `relative` become double quotes, since alias targets are
/// written inside a double-quoted attribute.
pub fn resolve_relative(base: &XPath, relative: &str) -> Result<XPath, PathError> {
    let relative = relative.replace('\'', "\"");
    if relative.starts_with("//") {
        return XPath::parse(&relative);
    }

    let mut keep = base.len();
    let mut rest = relative.as_str();
    while let Some(stripped) = rest.strip_prefix("../") {
        rest = stripped.trim_start_matches('/');
        keep = keep.checked_sub(1).ok_or_else(|| escapes(base, &relative))?;
    }
    if rest == ".." {
        rest = "";
        keep = keep.checked_sub(1).ok_or_else(|| escapes(base, &relative))?;
    }
    if keep == 0 {
        return Err(escapes(base, &relative));
    }

    let parent = base.truncated(keep);
    if rest.is_empty() {
        return Ok(parent);
    }
    XPath::parse(&format!("{}/{}", parent.as_str(), rest))
}

fn escapes(base: &XPath, relative: &str) -> PathError {
    PathError::RelativeEscapesRoot {
        base: base.as_str().to_string(),
        relative: relative.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(raw: &str) -> XPath {
        XPath::parse(raw).unwrap()
    }

    #[test]
    fn test_parent_relative_target() {
        let base = path(r#"//ldml/dates/calendars/calendar[@type="buddhist"]/eras"#);
        let target = resolve_relative(&base, "../../calendar[@type='gregorian']/eras").unwrap();
        assert_eq!(
            target.as_str(),
            r#"//ldml/dates/calendars/calendar[@type="gregorian"]/eras"#
        );
    }

    #[test]
    fn test_sibling_relative_target() {
        let base = path(r#"//ldml/dates/calendars/calendar[@type="gregorian"]/months/monthContext[@type="format"]/monthWidth[@type="narrow"]"#);
        let target = resolve_relative(&base, "../../monthContext[@type='stand-alone']/monthWidth[@type='narrow']").unwrap();
        assert_eq!(
            target.as_str(),
            r#"//ldml/dates/calendars/calendar[@type="gregorian"]/months/monthContext[@type="stand-alone"]/monthWidth[@type="narrow"]"#
        );
    }

    #[test]
    fn test_absolute_target() {
        let base = path("//ldml/a/b");
        let target = resolve_relative(&base, "//ldml/c[@type='x']").unwrap();
        assert_eq!(target.as_str(), r#"//ldml/c[@type="x"]"#);
    }

    #[test]
    fn test_child_target_appends() {
        let base = path("//ldml/a");
        assert_eq!(resolve_relative(&base, "b").unwrap().as_str(), "//ldml/a/b");
    }

    #[test]
    fn test_climbing_above_root_fails() {
        let base = path("//ldml/a");
        assert!(matches!(
            resolve_relative(&base, "../../../x"),
            Err(PathError::RelativeEscapesRoot { .. })
        ));
    }
}
