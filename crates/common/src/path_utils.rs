//! Path normalization utilities for the object path cache.
//!
//! Object names are slash-delimited. Empty components are discarded so
//! `"/a//b/"` and `"a/b"` address the same entry.

use smallvec::SmallVec;

/// Path components borrowed from the input string.
///
/// Most object paths are shallow, so the components stay inline.
pub type Components<'a> = SmallVec<[&'a str; 8]>;

/// Split a slash-delimited path into its non-empty components.
///
/// # Arguments
/// * `path` - Path to split (leading, trailing and repeated slashes allowed)
///
/// # Returns
/// Components in root-to-leaf order. Empty for `""` or `"/"`.
pub fn split_path(path: &str) -> Components<'_> {
    path.split('/').filter(|c: &&str| !c.is_empty()).collect()
}

/// Join components back into a normalized path (no leading or trailing slash).
///
/// # Arguments
/// * `components` - Components in root-to-leaf order
pub fn join_components<S: AsRef<str>>(components: &[S]) -> String {
    let mut out = String::new();
    for (i, component) in components.iter().enumerate() {
        if i > 0 {
            out.push('/');
        }
        out.push_str(component.as_ref());
    }
    out
}

/// Normalize a path by dropping empty components.
///
/// # Arguments
/// * `path` - Path to normalize
///
/// # Returns
/// Normalized path, e.g. `"//a/b/"` becomes `"a/b"`.
pub fn normalize_path(path: &str) -> String {
    join_components(&split_path(path))
}

/// Check whether `candidate` lies strictly below `ancestor`.
///
/// Comparison is component-wise, so `"a/bc"` is not below `"a/b"`.
///
/// # Arguments
/// * `ancestor` - Components of the potential ancestor
/// * `candidate` - Components of the potential descendant
pub fn is_strict_descendant(ancestor: &[&str], candidate: &[&str]) -> bool {
    candidate.len() > ancestor.len() && candidate[..ancestor.len()] == *ancestor
}
