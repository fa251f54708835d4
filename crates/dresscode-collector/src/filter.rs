//! Keyword filter for candidate documents
//!
//! A file is accepted when its name contains one of [`KEYWORDS`]. When an
//! organization has at most [`FALLBACK_THRESHOLD`] candidate files, every
//! file is accepted, the ones without a keyword as [`MatchKind::Potential`].
//! The threshold is fixed.

use dresscode_domain::traits::FileEntry;

/// Name fragments marking a regulation document
pub const KEYWORDS: &[&str] = &[
    "校則",
    "生活のきまり",
    "生徒心得",
    "学校生活",
    "生活指導",
    "規則",
    "きまり",
    "ルール",
    "心得",
    "生活規定",
];

/// Candidate count at or below which all files are accepted
pub const FALLBACK_THRESHOLD: usize = 3;

/// Why a document was accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchKind {
    /// Name contains a keyword
    Keyword,

    /// Accepted only because the organization has few candidates
    Potential,
}

/// True when `name` contains any keyword
pub fn has_keyword(name: &str) -> bool {
    KEYWORDS.iter().any(|keyword| name.contains(keyword))
}

/// Apply the keyword filter to one organization's candidates, keeping order
///
/// # Examples
///
/// ```
/// use dresscode_collector::filter::{filter_candidates, MatchKind};
/// use dresscode_domain::traits::FileEntry;
///
/// let files = vec![
///     FileEntry { name: "校則.pdf".into(), ..Default::default() },
///     FileEntry { name: "random.pdf".into(), ..Default::default() },
/// ];
/// let accepted = filter_candidates(files);
/// assert_eq!(accepted[0].1, MatchKind::Keyword);
/// assert_eq!(accepted[1].1, MatchKind::Potential);
/// ```
pub fn filter_candidates(files: Vec<FileEntry>) -> Vec<(FileEntry, MatchKind)> {
    let fallback = files.len() <= FALLBACK_THRESHOLD;

    files
        .into_iter()
        .filter_map(|file| {
            if has_keyword(&file.name) {
                Some((file, MatchKind::Keyword))
            } else if fallback {
                Some((file, MatchKind::Potential))
            } else {
                None
            }
        })
        .collect()
}
