//! Decoders turning git output lines into typed entities.
//!
//! History and ref-log records are Unit Separator (U+001F) delimited; the
//! format strings that produce them live in [`super::args`]. Branch listings
//! use `git branch`'s own layout. Every decoder here is a pure function.

use chrono::{DateTime, Utc};

use super::model::{Branch, Commit, Decoded, RefLogEntry};

/// Field delimiter in history and ref-log records.
pub const FIELD_SEPARATOR: char = '\u{1f}';

/// Raw parts in a history record: ten fields plus the empty tail left by the
/// trailing separator.
pub const COMMIT_FIELD_COUNT: usize = 11;

/// Raw parts in a ref-log record.
pub const REF_LOG_FIELD_COUNT: usize = 4;

/// Separates the action from the message in a ref-log subject.
const REF_LOG_ACTION_SEPARATOR: &str = ": ";

/// Marks a symbolic remote ref, as in `origin/HEAD -> origin/main`.
const SYMREF_ARROW: &str = " -> ";

/// Parses a git date, falling back to the Unix epoch.
///
/// Accepts strict ISO-8601 (`%cI`, `--date=iso-strict`) and git's looser
/// `iso` layout (`2024-03-01 10:00:00 +0100`).
#[must_use]
pub fn parse_git_date(raw: &str) -> DateTime<Utc> {
    let raw = raw.trim();
    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S %z"))
        .map_or_else(|_| DateTime::<Utc>::default(), |date| date.with_timezone(&Utc))
}

/// Decodes one history record produced by the decorated log format.
///
/// A record with any field count other than [`COMMIT_FIELD_COUNT`] is
/// [`Decoded::Skipped`]; partial lines at stream edges are expected.
#[must_use]
pub fn decode_commit_line(line: &str) -> Decoded<Commit> {
    let fields: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
    let [
        sha,
        short_sha,
        parents,
        date,
        committer_name,
        committer_email,
        author_name,
        author_email,
        refs,
        subject,
        _tail,
    ] = fields.as_slice()
    else {
        return Decoded::Skipped {
            fields: fields.len(),
        };
    };

    Decoded::Entity(Commit {
        sha: sha.trim().to_string(),
        short_sha: short_sha.trim().to_string(),
        parent_shas: parents.split_whitespace().map(str::to_owned).collect(),
        commit_date: parse_git_date(date),
        committer_name: (*committer_name).to_string(),
        committer_email: (*committer_email).to_string(),
        author_name: (*author_name).to_string(),
        author_email: (*author_email).to_string(),
        refs: (*refs).to_string(),
        message_short: trim_message(subject),
    })
}

/// Decodes one line of `git branch` output.
///
/// The first two characters are the marker (`"* "` for the checked-out
/// branch), the rest is the name.
#[must_use]
pub fn decode_local_branch_line(line: &str) -> Branch {
    let mut chars = line.chars();
    let marker = chars.next();
    chars.next();
    Branch {
        name: chars.as_str().to_string(),
        is_remote: false,
        is_current: marker == Some('*'),
    }
}

/// Decodes one line of `git branch -r` output, dropping any symref target.
#[must_use]
pub fn decode_remote_branch_line(line: &str) -> Branch {
    let name = line.split_once(SYMREF_ARROW).map_or(line, |(name, _)| name);
    Branch::remote(name.trim())
}

/// Decodes one ref-log record.
#[must_use]
pub fn decode_ref_log_line(line: &str) -> Decoded<RefLogEntry> {
    let fields: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
    let [sha, short_sha, selector, subject] = fields.as_slice() else {
        return Decoded::Skipped {
            fields: fields.len(),
        };
    };

    // `HEAD@{2024-03-01T10:00:00+01:00}` with --date=iso-strict.
    let date = selector
        .split_once('{')
        .and_then(|(_, rest)| rest.strip_suffix('}'))
        .unwrap_or_default();
    let (action, message) =
        subject.split_once(REF_LOG_ACTION_SEPARATOR).unwrap_or(("", *subject));

    Decoded::Entity(RefLogEntry {
        sha: sha.trim().to_string(),
        short_sha: short_sha.trim().to_string(),
        action: action.trim().to_string(),
        message_short: trim_message(message),
        date_time: parse_git_date(date),
    })
}

fn trim_message(raw: &str) -> String {
    raw.trim_matches(|c: char| c.is_whitespace() || c.is_control()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const SHA: &str = "4b825dc642cb6eb9a060e54bf8d69288fbee4904";
    const PARENT_A: &str = "1111111111111111111111111111111111111111";
    const PARENT_B: &str = "2222222222222222222222222222222222222222";

    fn record(fields: &[&str]) -> String {
        fields.join("\u{1f}")
    }

    fn full_record(parents: &str, date: &str, subject: &str) -> String {
        record(&[
            SHA,
            "4b825dc",
            parents,
            date,
            "Carol Committer",
            "carol@example.com",
            "Alex Author",
            "alex@example.com",
            "HEAD -> refs/heads/main",
            subject,
            "",
        ])
    }

    #[test]
    fn decodes_eleven_field_record() {
        let line = full_record(PARENT_A, "2024-03-01T10:00:00+01:00", "Fix parser");
        let Decoded::Entity(commit) = decode_commit_line(&line) else {
            panic!("expected a commit");
        };
        assert_eq!(commit.sha, SHA);
        assert_eq!(commit.short_sha, "4b825dc");
        assert_eq!(commit.parent_shas, vec![PARENT_A]);
        assert_eq!(commit.commit_date, Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap());
        assert_eq!(commit.committer_name, "Carol Committer");
        assert_eq!(commit.committer_email, "carol@example.com");
        assert_eq!(commit.author_name, "Alex Author");
        assert_eq!(commit.author_email, "alex@example.com");
        assert_eq!(commit.refs, "HEAD -> refs/heads/main");
        assert_eq!(commit.message_short, "Fix parser");
        assert!(!commit.is_merge());
    }

    #[test]
    fn merge_parents_split_on_whitespace_and_drop_stray_newlines() {
        let parents = format!("{PARENT_A}  {PARENT_B}\r\n");
        let line = full_record(&parents, "2024-03-01T10:00:00Z", "Merge branch 'dev'");
        let commit = decode_commit_line(&line).entity().unwrap();
        assert_eq!(commit.parent_shas, vec![PARENT_A, PARENT_B]);
        assert!(commit.is_merge());
    }

    #[test]
    fn root_commit_has_no_parents() {
        let line = full_record("", "2024-03-01T10:00:00Z", "Initial commit");
        let commit = decode_commit_line(&line).entity().unwrap();
        assert!(commit.parent_shas.is_empty());
    }

    #[test]
    fn wrong_field_count_is_skipped() {
        let ten = record(&[SHA, "4b825dc", "", "", "", "", "", "", "", "subject"]);
        assert_eq!(decode_commit_line(&ten), Decoded::Skipped { fields: 10 });

        let twelve = format!("{}\u{1f}extra", full_record("", "", "subject"));
        assert_eq!(decode_commit_line(&twelve), Decoded::Skipped { fields: 12 });

        assert_eq!(decode_commit_line(""), Decoded::Skipped { fields: 1 });
    }

    #[test]
    fn unparseable_date_falls_back_to_epoch() {
        let line = full_record(PARENT_A, "last tuesday", "Subject");
        let commit = decode_commit_line(&line).entity().unwrap();
        assert_eq!(commit.commit_date, DateTime::<Utc>::default());
        assert_eq!(commit.commit_date.timestamp(), 0);
    }

    #[test]
    fn git_iso_date_layout_is_accepted() {
        assert_eq!(
            parse_git_date("2024-03-01 10:00:00 +0100"),
            Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
        );
    }

    #[test]
    fn subject_loses_surrounding_control_characters() {
        let line = full_record(PARENT_A, "2024-03-01T10:00:00Z", "\u{7}  Tidy up\r");
        assert_eq!(decode_commit_line(&line).entity().unwrap().message_short, "Tidy up");
    }

    #[test]
    fn local_branch_lines() {
        assert_eq!(
            decode_local_branch_line("* main"),
            Branch {
                name: "main".into(),
                is_remote: false,
                is_current: true,
            }
        );
        assert_eq!(
            decode_local_branch_line("  dev"),
            Branch {
                name: "dev".into(),
                is_remote: false,
                is_current: false,
            }
        );
        assert_eq!(decode_local_branch_line("+ wt-branch").name, "wt-branch");
        assert_eq!(
            decode_local_branch_line("*"),
            Branch {
                name: String::new(),
                is_remote: false,
                is_current: true,
            }
        );
    }

    #[test]
    fn local_branch_name_is_the_whole_remainder() {
        assert_eq!(decode_local_branch_line("  dev ").name, "dev ");
        let detached = decode_local_branch_line("* (HEAD detached at 1a2b3c4)");
        assert_eq!(detached.name, "(HEAD detached at 1a2b3c4)");
        assert!(detached.is_current);
    }

    #[test]
    fn remote_branch_lines() {
        assert_eq!(
            decode_remote_branch_line("  origin/HEAD -> origin/main"),
            Branch {
                name: "origin/HEAD".into(),
                is_remote: true,
                is_current: false,
            }
        );
        assert_eq!(
            decode_remote_branch_line("origin/HEAD -> origin/main"),
            Branch::remote("origin/HEAD")
        );
        assert_eq!(
            decode_remote_branch_line("  origin/feature/x"),
            Branch::remote("origin/feature/x")
        );
    }

    #[test]
    fn ref_log_subject_splits_into_action_and_message() {
        let line = record(&[
            SHA,
            "4b825dc",
            "HEAD@{2024-03-01T10:00:00+01:00}",
            "checkout: moving from main to dev",
        ]);
        let entry = decode_ref_log_line(&line).entity().unwrap();
        assert_eq!(entry.action, "checkout");
        assert_eq!(entry.message_short, "moving from main to dev");
        assert_eq!(entry.date_time, Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap());
    }

    #[test]
    fn ref_log_without_action_keeps_whole_subject() {
        let line = record(&[SHA, "4b825dc", "HEAD@{garbage}", "reset to upstream"]);
        let entry = decode_ref_log_line(&line).entity().unwrap();
        assert_eq!(entry.action, "");
        assert_eq!(entry.message_short, "reset to upstream");
        assert_eq!(entry.date_time, DateTime::<Utc>::default());
    }

    #[test]
    fn ref_log_wrong_field_count_is_skipped() {
        assert_eq!(decode_ref_log_line("abc\u{1f}def"), Decoded::Skipped { fields: 2 });
    }
}
