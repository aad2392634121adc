//! Player page and the stream error screen.

use crate::relay::relay_url;
use crate::views::html::{document, escape, js_string};
use crate::views::listing::APP_NAME;

pub const HLS_SCRIPT: &str = "https://cdn.jsdelivr.net/npm/hls.js@1";
pub const PLYR_SCRIPT: &str = "https://cdn.jsdelivr.net/npm/plyr@3/dist/plyr.polyfilled.min.js";
pub const PLYR_STYLESHEET: &str = "https://cdn.jsdelivr.net/npm/plyr@3/dist/plyr.css";
pub const FEED_ERROR: &str = "Failed to load match data.";

/// Render the player for one stream.
///
/// The video source always points at the relay. HLS sources are attached
/// with hls.js when the browser supports it, otherwise assigned directly.
pub fn render_player(title: &str, stream_url: &str) -> String {
    let title = if title.is_empty() { "Live Match" } else { title };
    let source = relay_url(stream_url);
    let is_hls = stream_url.contains(".m3u8");

    let head = format!(
        "<link rel=\"stylesheet\" href=\"{PLYR_STYLESHEET}\">\n\
         <script src=\"{HLS_SCRIPT}\"></script>\n\
         <script src=\"{PLYR_SCRIPT}\"></script>\n"
    );

    let body = format!(
        "<header><h1>{title}</h1></header>\n\
         <main>\n<video id=\"player\" playsinline controls></video>\n</main>\n\
         <footer><a href=\"/\">&larr; Go Back</a></footer>\n\
         <script>\n\
         (function () {{\n\
         \x20 var source = {source};\n\
         \x20 var isHls = {is_hls};\n\
         \x20 var video = document.getElementById('player');\n\
         \x20 function attachControls() {{ new Plyr(video, {{ autoplay: true }}); }}\n\
         \x20 if (isHls && window.Hls && Hls.isSupported()) {{\n\
         \x20   var hls = new Hls();\n\
         \x20   hls.loadSource(source);\n\
         \x20   hls.attachMedia(video);\n\
         \x20   hls.on(Hls.Events.MANIFEST_PARSED, attachControls);\n\
         \x20 }} else {{\n\
         \x20   video.src = source;\n\
         \x20   attachControls();\n\
         \x20 }}\n\
         }})();\n\
         </script>\n",
        title = escape(title),
        source = js_string(&source),
        is_hls = is_hls,
    );

    document(&format!("{title} | {APP_NAME}"), &head, &body)
}

/// Static error screen with a way back to the listing.
pub fn render_stream_error(message: &str) -> String {
    let body = format!(
        "<main class=\"stream-error\">\n<h2>Stream Error</h2>\n<p>{}</p>\n\
         <a href=\"/\">Go Back Home</a>\n</main>\n",
        escape(message)
    );
    document(&format!("Stream Error | {APP_NAME}"), "", &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_routes_through_relay() {
        let html = render_player("A vs B", "https://cdn.example.com/live/index.m3u8?t=1");
        assert!(html.contains("<h1>A vs B</h1>"));
        assert!(html.contains("/api/proxy?url=https%3A%2F%2Fcdn.example.com%2Flive%2Findex.m3u8%3Ft%3D1"));
        assert!(html.contains("var isHls = true;"));
        assert!(html.contains(HLS_SCRIPT));
        assert!(!html.contains("\"https://cdn.example.com/live/index.m3u8"));
    }

    #[test]
    fn test_progressive_source() {
        let html = render_player("", "https://cdn.example.com/clip.mp4");
        assert!(html.contains("<h1>Live Match</h1>"));
        assert!(html.contains("var isHls = false;"));
    }

    #[test]
    fn test_error_screen() {
        let html = render_stream_error("Match not found.");
        assert!(html.contains("Stream Error"));
        assert!(html.contains("Match not found."));
        assert!(html.contains("<a href=\"/\">Go Back Home</a>"));
    }
}
