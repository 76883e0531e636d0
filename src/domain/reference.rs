use std::fmt;

/// Classification of a resolved reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RefType {
    DefaultBranchRef,
    ReleaseBranchRef,
    ReleaseRef,
    /// No ref satisfied the ruleset
    NoRef,
}

impl fmt::Display for RefType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RefType::DefaultBranchRef => "Default Branch",
            RefType::ReleaseBranchRef => "Release Branch",
            RefType::ReleaseRef => "Release",
            RefType::NoRef => "No Ref",
        };
        f.write_str(s)
    }
}

/// Splits a `module@ref` string produced by resolution back into its parts,
/// classifying the ref by its shape.
///
/// # Example
/// ```
/// use buoy::domain::{parse_ref, RefType};
///
/// let (module, r, kind) = parse_ref("knative.dev/pkg@release-0.15");
/// assert_eq!(module, "knative.dev/pkg");
/// assert_eq!(r, "release-0.15");
/// assert_eq!(kind, RefType::ReleaseBranchRef);
/// ```
pub fn parse_ref(reference: &str) -> (&str, &str, RefType) {
    match reference.split_once('@') {
        None => (reference, "", RefType::NoRef),
        Some((module, r)) => {
            let kind = if r.starts_with('v') {
                RefType::ReleaseRef
            } else if r.starts_with("release-") {
                RefType::ReleaseBranchRef
            } else {
                RefType::DefaultBranchRef
            };
            (module, r, kind)
        }
    }
}
