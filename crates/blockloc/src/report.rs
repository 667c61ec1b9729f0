//! Location reports and requester notices.
//!
//! Formatting is pure: the same match set always renders to the same
//! lines. Routing lines to a channel is the service's job.

use core::fmt;

use crate::scan::MatchSet;

const RULE: &str = "----------";

/// How a host should present a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tone {
    Error,
    Info,
}

/// Short message for the requester.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Notice {
    /// No complete selection.
    SelectionRequired,
    /// The type input did not resolve; echoes the input verbatim.
    UnknownType { input: String },
    /// Sent right before the scan starts.
    Calculating,
    /// The scan found nothing.
    NoMatches { kind: String },
    /// The full report went to the log channel.
    PrintedToConsole,
    /// The scan aborted (unreadable block, malformed volume).
    ScanFailed,
    Cancelled,
}

impl Notice {
    #[must_use]
    pub const fn tone(&self) -> Tone {
        match self {
            Self::SelectionRequired | Self::UnknownType { .. } | Self::ScanFailed => Tone::Error,
            Self::Calculating | Self::NoMatches { .. } | Self::PrintedToConsole | Self::Cancelled => {
                Tone::Info
            }
        }
    }

    /// Text split around the fragment a host may want to emphasise.
    ///
    /// Returns `(before, highlight, after)`; `highlight` is empty for
    /// notices without one.
    #[must_use]
    pub fn parts(&self) -> (&'static str, &str, &'static str) {
        match self {
            Self::SelectionRequired => ("You must select a full region to use this command.", "", ""),
            Self::UnknownType { input } => (
                "The block type ",
                input,
                " could not be found. (Did you use CAPS or a namespaced key like minecraft:stone?)",
            ),
            Self::Calculating => ("Calculating blocks...", "", ""),
            Self::NoMatches { kind } => ("There were no blocks of type ", kind, " in your selection."),
            Self::PrintedToConsole => ("The block location list has been printed to the console.", "", ""),
            Self::ScanFailed => ("The block scan failed; no results were reported.", "", ""),
            Self::Cancelled => ("The block scan was cancelled.", "", ""),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (before, highlight, after) = self.parts();
        write!(f, "{before}{highlight}{after}")
    }
}

/// Full location report: header, one line per position, footer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    lines: Vec<String>,
}

impl Report {
    #[must_use]
    pub fn header(&self) -> &str {
        &self.lines[0]
    }

    #[must_use]
    pub fn footer(&self) -> &str {
        &self.lines[self.lines.len() - 1]
    }

    /// The `x, y, z` lines between header and footer.
    #[must_use]
    pub fn locations(&self) -> &[String] {
        &self.lines[1..self.lines.len() - 1]
    }

    /// Every line, header and footer included.
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

/// Outcome of formatting a match set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Formatted {
    /// Nothing matched; only this notice goes to the requester.
    Empty(Notice),
    Report(Report),
}

/// Render a match set.
///
/// Locations are ordered by x, then y, then z regardless of the order the
/// scan found them in. The footer is as many dashes as the header has
/// characters.
#[must_use]
pub fn format(matches: &MatchSet, kind: &str, world: &str) -> Formatted {
    if matches.is_empty() {
        return Formatted::Empty(Notice::NoMatches {
            kind: kind.to_string(),
        });
    }

    let header = format!(
        "{RULE} Locations of {kind} in {world} ({}) {RULE}",
        matches.len()
    );
    let footer = "-".repeat(header.chars().count());

    let mut lines = Vec::with_capacity(matches.len() + 2);
    lines.push(header);
    lines.extend(matches.sorted().into_iter().map(|pos| pos.to_string()));
    lines.push(footer);

    Formatted::Report(Report { lines })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::pos::BlockPos;

    fn report(formatted: Formatted) -> Report {
        match formatted {
            Formatted::Report(report) => report,
            Formatted::Empty(notice) => panic!("expected a report, got {notice:?}"),
        }
    }

    #[test]
    fn test_empty_set_is_notice_only() {
        let formatted = format(&MatchSet::new(), "DIAMOND_ORE", "world");
        assert_eq!(
            formatted,
            Formatted::Empty(Notice::NoMatches {
                kind: "DIAMOND_ORE".to_string()
            })
        );
        if let Formatted::Empty(notice) = formatted {
            assert_eq!(
                notice.to_string(),
                "There were no blocks of type DIAMOND_ORE in your selection."
            );
        }
    }

    #[test]
    fn test_report_layout() {
        let matches: MatchSet = [BlockPos::new(1, 1, 1), BlockPos::new(0, 0, 0)]
            .into_iter()
            .collect();
        let report = report(format(&matches, "STONE", "world"));

        assert_eq!(
            report.lines(),
            &[
                "---------- Locations of STONE in world (2) ----------".to_string(),
                "0, 0, 0".to_string(),
                "1, 1, 1".to_string(),
                "-----------------------------------------------------".to_string(),
            ]
        );
        assert_eq!(report.header().len(), report.footer().len());
    }

    #[test]
    fn test_locations_sorted_x_then_y_then_z() {
        let matches: MatchSet = [
            BlockPos::new(2, 0, 0),
            BlockPos::new(-1, 5, 5),
            BlockPos::new(0, 1, -3),
            BlockPos::new(0, 1, -4),
            BlockPos::new(0, -2, 9),
        ]
        .into_iter()
        .collect();
        let report = report(format(&matches, "STONE", "world"));

        assert_eq!(
            report.locations(),
            &["-1, 5, 5", "0, -2, 9", "0, 1, -4", "0, 1, -3", "2, 0, 0"]
        );
    }

    #[test]
    fn test_formatting_is_deterministic() {
        let forward: MatchSet = (0..50).map(|i| BlockPos::new(i % 7, i % 3, i)).collect();
        let backward: MatchSet = (0..50).rev().map(|i| BlockPos::new(i % 7, i % 3, i)).collect();

        let a = format(&forward, "SAND", "world");
        let b = format(&forward, "SAND", "world");
        let c = format(&backward, "SAND", "world");
        assert_eq!(a, b);
        assert_eq!(a, c);
    }

    #[test]
    fn test_footer_counts_characters_not_bytes() {
        let matches: MatchSet = std::iter::once(BlockPos::new(0, 0, 0)).collect();
        let report = report(format(&matches, "STONE", "wörld"));
        assert_eq!(report.footer().chars().count(), report.header().chars().count());
    }

    #[test]
    fn test_no_duplicate_lines() {
        let mut matches = MatchSet::new();
        for _ in 0..3 {
            matches.insert(BlockPos::new(4, 4, 4));
        }
        let report = report(format(&matches, "STONE", "world"));
        assert_eq!(report.locations(), &["4, 4, 4"]);
        assert!(report.header().contains("(1)"));
    }

    #[test]
    fn test_notice_text() {
        assert_eq!(
            Notice::SelectionRequired.to_string(),
            "You must select a full region to use this command."
        );
        assert_eq!(Notice::Calculating.to_string(), "Calculating blocks...");
        assert_eq!(
            Notice::PrintedToConsole.to_string(),
            "The block location list has been printed to the console."
        );

        let unknown = Notice::UnknownType {
            input: "diamond ore".to_string(),
        };
        assert!(unknown.to_string().contains("diamond ore"));
        assert_eq!(unknown.parts().1, "diamond ore");
        assert_eq!(unknown.tone(), Tone::Error);
        assert_eq!(Notice::Calculating.tone(), Tone::Info);
    }
}
