#![forbid(unsafe_code)]

//! Server-rendered HTML. Everything interpolated here is either escaped or
//! was sanitized at ingestion.

use lt_core::fragment::render_fragments;
use lt_core::ids::{CommitName, PlayerName};
use lt_core::listing::{CommitListing, PlayerListing};
use lt_core::time::ts_ms_to_rfc3339;
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use std::fmt::Write as _;

// A path segment may not carry `/`, and `%` must not survive unencoded.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

pub(crate) fn commit_path(commit: &str) -> String {
    format!("/logs/{}", utf8_percent_encode(commit, SEGMENT))
}

pub(crate) fn player_path(commit: &str, player: &str) -> String {
    format!(
        "/logs/{}/{}",
        utf8_percent_encode(commit, SEGMENT),
        utf8_percent_encode(player, SEGMENT)
    )
}

pub(crate) fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Full document around `body`. Log pages get the tail script and its
/// controls; listing pages are static.
pub(crate) fn page(title: &str, body: &str, include_script: bool) -> String {
    let title = escape_html(title);
    let (script, controls) = if include_script {
        (
            r#"<script src="/index.js" defer></script>"#,
            concat!(
                r#"<div id="controls">"#,
                r#"<label id="flipOrder"><input type="checkbox" name="flipOrder"> Oldest first</label>"#,
                r#"<input id="filterMessage" type="text" placeholder="Filter logs" size="12">"#,
                r#"<button id="pause" type="button">Pause</button>"#,
                r#"<span id="status" class="status">live</span>"#,
                r#"</div>"#
            ),
        )
    } else {
        ("", "")
    };

    format!(
        concat!(
            "<!DOCTYPE html>\n",
            "<html>\n",
            "<head>\n",
            "<meta charset=\"utf-8\">\n",
            "<title>{title}</title>\n",
            "<link rel=\"stylesheet\" href=\"/style.css\">\n",
            "{script}\n",
            "</head>\n",
            "<body>\n",
            "<header><h1 id=\"title\">{title}</h1>{controls}</header>\n",
            "{body}\n",
            "</body>\n",
            "</html>\n"
        ),
        title = title,
        script = script,
        controls = controls,
        body = body,
    )
}

pub(crate) fn commits_page(listing: &CommitListing) -> String {
    let body = match listing {
        CommitListing::NoLogs => {
            "<main><p class=\"empty\">There are no logs for any commit</p></main>".to_string()
        }
        CommitListing::Commits(commits) => {
            let mut items = String::new();
            for summary in commits {
                let _ = write!(
                    items,
                    "<li><a href=\"{href}\">{name}</a> <time>{seen}</time></li>",
                    href = escape_html(&commit_path(&summary.commit)),
                    name = escape_html(&summary.commit),
                    seen = ts_ms_to_rfc3339(summary.first_seen_ms),
                );
            }
            format!("<main><ul class=\"listing\">{items}</ul></main>")
        }
    };
    page("Commits", &body, false)
}

pub(crate) fn players_page(commit: &CommitName, listing: &PlayerListing) -> String {
    let title = format!("Players on commit {commit}");
    let body = match listing {
        PlayerListing::NoPlayers => format!(
            "<main><p class=\"empty\">No players with logs on commit {}</p></main>",
            escape_html(commit.as_str())
        ),
        PlayerListing::Redirect(player) => {
            player_list(commit, std::iter::once((player.as_str(), None)))
        }
        PlayerListing::Players(players) => player_list(
            commit,
            players
                .iter()
                .map(|p| (p.player.as_str(), Some(p.last_seen_ms))),
        ),
    };
    page(&title, &body, false)
}

fn player_list<'a>(
    commit: &CommitName,
    players: impl Iterator<Item = (&'a str, Option<i64>)>,
) -> String {
    let mut items = String::new();
    for (player, last_seen_ms) in players {
        let _ = write!(
            items,
            "<li><a href=\"{href}\">{name}</a>",
            href = escape_html(&player_path(commit.as_str(), player)),
            name = escape_html(player),
        );
        if let Some(ts) = last_seen_ms {
            let _ = write!(items, " <time>{}</time>", ts_ms_to_rfc3339(ts));
        }
        items.push_str("</li>");
    }
    format!("<main><ul class=\"listing\">{items}</ul></main>")
}

/// `messages` is the first page of the log; `total` is the full line count.
/// The script resumes polling from `data-offset`, so it must equal the
/// number of rendered messages, never the placeholder.
pub(crate) fn log_page(
    commit: &CommitName,
    player: &PlayerName,
    messages: &[String],
    total: usize,
) -> String {
    let title = format!("Logs for {player} on commit {commit}");
    let lines = if messages.is_empty() {
        format!(
            "<pre id=\"placeholder\" class=\"unknown\">No logs for player {} yet</pre>",
            escape_html(player.as_str())
        )
    } else {
        render_fragments(messages)
    };
    let body = format!(
        "<p class=\"meta\">{total} lines</p><main id=\"logs\" data-offset=\"{offset}\">{lines}</main>",
        offset = messages.len(),
    );
    page(&title, &body, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lt_core::model::{CommitSummary, PlayerSummary};

    fn commit(name: &str) -> CommitName {
        CommitName::try_new(name).expect("commit")
    }

    #[test]
    fn paths_encode_segments() {
        assert_eq!(player_path("c1", "alice"), "/logs/c1/alice");
        assert_eq!(commit_path("a/b c"), "/logs/a%2Fb%20c");
        assert_eq!(player_path("c#1", "50%"), "/logs/c%231/50%25");
    }

    #[test]
    fn titles_are_escaped() {
        let html = page("<b>x</b> & y", "", false);
        assert!(html.contains("<title>&lt;b&gt;x&lt;/b&gt; &amp; y</title>"));
        assert!(!html.contains("index.js"));
    }

    #[test]
    fn empty_commit_listing_is_friendly() {
        let html = commits_page(&CommitListing::NoLogs);
        assert!(html.contains("There are no logs for any commit"));
    }

    #[test]
    fn commit_listing_links_each_commit() {
        let html = commits_page(&CommitListing::Commits(vec![
            CommitSummary {
                commit: "new".to_string(),
                first_seen_ms: 0,
            },
            CommitSummary {
                commit: "<old>".to_string(),
                first_seen_ms: 0,
            },
        ]));
        assert!(html.contains("<a href=\"/logs/new\">new</a>"));
        assert!(html.contains("<a href=\"/logs/%3Cold%3E\">&lt;old&gt;</a>"));
        assert!(html.contains("1970-01-01T00:00:00Z"));
        assert!(html.find("/logs/new") < html.find("/logs/%3Cold%3E"));
    }

    #[test]
    fn player_listing_shows_players_and_empty_state() {
        let c1 = commit("c1");
        let html = players_page(
            &c1,
            &PlayerListing::Players(vec![
                PlayerSummary {
                    player: "bob".to_string(),
                    last_seen_ms: 0,
                },
                PlayerSummary {
                    player: "alice".to_string(),
                    last_seen_ms: 0,
                },
            ]),
        );
        assert!(html.contains("<a href=\"/logs/c1/bob\">bob</a>"));
        assert!(html.contains("<a href=\"/logs/c1/alice\">alice</a>"));

        let empty = players_page(&c1, &PlayerListing::NoPlayers);
        assert!(empty.contains("No players with logs on commit c1"));
    }

    #[test]
    fn log_page_offsets_skip_the_placeholder() {
        let (c1, alice) = (commit("c1"), PlayerName::try_new("alice").expect("player"));
        let empty = log_page(&c1, &alice, &[], 0);
        assert!(empty.contains("No logs for player alice yet"));
        assert!(empty.contains("data-offset=\"0\""));
        assert!(empty.contains("<script src=\"/index.js\" defer></script>"));
        assert!(empty.contains("id=\"pause\""));

        let messages = vec!["t  [Warning] hot".to_string(), "plain".to_string()];
        let full = log_page(&c1, &alice, &messages, 2);
        assert!(full.contains("data-offset=\"2\""));
        assert!(full.contains("<pre class=\"warning\">t  [Warning] hot</pre>"));
        assert!(!full.contains("id=\"placeholder\""));
        assert!(full.contains("<title>Logs for alice on commit c1</title>"));
    }
}
