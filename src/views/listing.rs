//! Listing page: spotlight card plus a grid of match cards.

use crate::catalog::{stream_links, Listing};
use crate::feed::Match;
use crate::views::html::{document, escape};

pub const APP_NAME: &str = "Overtime";
pub const TAGLINE: &str = "Where the game never ends.";
pub const LOAD_ERROR: &str = "Could not load matches. Please check your connection and try again.";
pub const EMPTY_MESSAGE: &str = "No matches available right now.";
pub const NO_LINKS: &str = "Links coming soon...";

/// Render the listing page for a successfully loaded feed.
pub fn render_listing(listing: &Listing) -> String {
    let mut body = header();
    body.push_str("<main>\n");

    if let Some(spotlight) = &listing.spotlight {
        body.push_str(&spotlight_card(spotlight));
    }

    body.push_str("<h2>Live &amp; Upcoming</h2>\n");
    if listing.is_empty() {
        body.push_str(&format!("<p class=\"empty\">{EMPTY_MESSAGE}</p>\n"));
    } else {
        body.push_str("<div class=\"grid\">\n");
        for m in &listing.grid {
            body.push_str(&match_card(m));
        }
        body.push_str("</div>\n");
    }

    body.push_str("</main>\n");
    document(APP_NAME, "", &body)
}

/// Render the listing page when the feed could not be loaded.
pub fn render_listing_error() -> String {
    let body = format!(
        "{}<main>\n<h2>Live &amp; Upcoming</h2>\n<p class=\"error\">{LOAD_ERROR}</p>\n</main>\n",
        header()
    );
    document(APP_NAME, "", &body)
}

fn header() -> String {
    format!("<header>\n<h1>{APP_NAME}</h1>\n<p>{TAGLINE}</p>\n</header>\n")
}

fn spotlight_card(m: &Match) -> String {
    let title = or_default(&m.title, "Live Match");
    let image = or_default(&m.image, "https://picsum.photos/seed/spotlight/800/450");

    format!(
        "<section class=\"spotlight\" data-match-id=\"{id}\">\n\
         <img src=\"{img}\" alt=\"{alt}\">\n\
         <span class=\"badge\">LIVE NOW</span>\n\
         <p class=\"tournament\">{tournament}</p>\n\
         <h2>{title}</h2>\n\
         <p class=\"language\">{language}</p>\n\
         {links}</section>\n",
        id = escape(m.match_id.as_str()),
        img = escape(image),
        alt = escape(&m.title),
        tournament = escape(&m.tournament),
        title = escape(title),
        language = escape(&m.language),
        links = links_block(m),
    )
}

fn match_card(m: &Match) -> String {
    let title = or_default(&m.title, "Match Title");
    let image = if m.image.is_empty() {
        format!("https://picsum.photos/seed/{}/400/225", m.match_id)
    } else {
        m.image.clone()
    };
    let badge = if m.is_live() {
        "<span class=\"badge\">LIVE</span>\n"
    } else {
        ""
    };

    format!(
        "<article class=\"card\" data-match-id=\"{id}\">\n\
         <img src=\"{img}\" alt=\"{alt}\">\n\
         {badge}\
         <p class=\"tournament\">{tournament}</p>\n\
         <h3>{title}</h3>\n\
         {links}</article>\n",
        id = escape(m.match_id.as_str()),
        img = escape(&image),
        alt = escape(&m.title),
        tournament = escape(&m.tournament),
        title = escape(title),
        links = links_block(m),
    )
}

fn links_block(m: &Match) -> String {
    let links = stream_links(m);
    if links.is_empty() {
        return format!("<p class=\"no-links\">{NO_LINKS}</p>\n");
    }

    let mut out = String::from("<nav class=\"streams\">\n");
    for link in links {
        out.push_str(&format!(
            "<a class=\"watch-btn\" href=\"{}\">{}</a>\n",
            escape(&link.href),
            escape(&link.label)
        ));
    }
    out.push_str("</nav>\n");
    out
}

fn or_default<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.is_empty() {
        fallback
    } else {
        value
    }
}
