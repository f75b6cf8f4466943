//! Image search sources and the (keyword, source) task unit.

use std::fmt;

/// A search site family. Files and completion sentinels are named after the family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceFamily {
    Google,
    Naver,
}

impl SourceFamily {
    pub const ALL: [SourceFamily; 2] = [SourceFamily::Google, SourceFamily::Naver];

    /// Lowercase label used in file names (`google_0001.jpg`, `google_done`).
    pub fn label(self) -> &'static str {
        match self {
            SourceFamily::Google => "google",
            SourceFamily::Naver => "naver",
        }
    }

    /// Query suffix that restricts results to faces, decided per family.
    pub fn face_suffix(self) -> &'static str {
        match self {
            SourceFamily::Google => "&tbs=itp:face",
            SourceFamily::Naver => "&face=1",
        }
    }

    /// The source used for this family in thumbnail or full-resolution mode.
    pub fn source(self, full_resolution: bool) -> Source {
        match (self, full_resolution) {
            (SourceFamily::Google, false) => Source::Google,
            (SourceFamily::Google, true) => Source::GoogleFull,
            (SourceFamily::Naver, false) => Source::Naver,
            (SourceFamily::Naver, true) => Source::NaverFull,
        }
    }
}

impl fmt::Display for SourceFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A concrete traversal target: a family plus the thumbnail/full-resolution mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    Google,
    GoogleFull,
    Naver,
    NaverFull,
}

impl Source {
    pub fn family(self) -> SourceFamily {
        match self {
            Source::Google | Source::GoogleFull => SourceFamily::Google,
            Source::Naver | Source::NaverFull => SourceFamily::Naver,
        }
    }

    pub fn is_full_resolution(self) -> bool {
        matches!(self, Source::GoogleFull | Source::NaverFull)
    }

    /// Search results page for `keyword`, with the family's face filter when requested.
    pub fn search_url(self, keyword: &str, face_filter: bool) -> String {
        let query: String = url::form_urlencoded::byte_serialize(keyword.as_bytes()).collect();
        let suffix = if face_filter {
            self.family().face_suffix()
        } else {
            ""
        };
        match self {
            Source::Google => format!(
                "https://www.google.com/search?q={}&source=lnms&tbm=isch{}",
                query, suffix
            ),
            Source::GoogleFull => {
                format!("https://www.google.com/search?q={}&tbm=isch{}", query, suffix)
            }
            Source::Naver | Source::NaverFull => format!(
                "https://search.naver.com/search.naver?where=image&sm=tab_jum&query={}{}",
                query, suffix
            ),
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Google => f.write_str("google"),
            Source::GoogleFull => f.write_str("google_full"),
            Source::Naver => f.write_str("naver"),
            Source::NaverFull => f.write_str("naver_full"),
        }
    }
}

/// One unit of work: collect and download images for `keyword` from `source`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub keyword: String,
    pub source: Source,
    pub face_filter: bool,
}

impl Task {
    pub fn search_url(&self) -> String {
        self.source.search_url(&self.keyword, self.face_filter)
    }
}
