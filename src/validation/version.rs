//! Tolerant Kubernetes version parsing.

use semver::Version;

/// Parse a version the way Kubernetes versions are usually written.
///
/// Accepts surrounding whitespace, a leading `v`, a missing minor or patch
/// component and leading zeros in numeric components ("v1.26", "1.026.0").
/// Pre-release and build suffixes are kept.
pub fn parse_tolerant(input: &str) -> Result<Version, semver::Error> {
    let trimmed = input.trim();
    let trimmed = trimmed.strip_prefix('v').unwrap_or(trimmed);

    // Split off pre-release/build so only the numeric core gets padded.
    let core_end = trimmed.find(['-', '+']).unwrap_or(trimmed.len());
    let (core, suffix) = trimmed.split_at(core_end);

    let mut parts: Vec<String> = core
        .split('.')
        .map(|part| {
            let stripped = part.trim_start_matches('0');
            if stripped.is_empty() && !part.is_empty() {
                "0".to_string()
            } else {
                stripped.to_string()
            }
        })
        .collect();
    while parts.len() < 3 {
        parts.push("0".to_string());
    }

    Version::parse(&format!("{}{}", parts.join("."), suffix))
}
