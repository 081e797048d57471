//! Markup merging
//!
//! Splices freshly generated highlighting markup with markup that was
//! already present in the original input, over the same plain text. Both
//! markup strings flatten into offset-ordered event streams; a merge walk
//! re-emits every original event exactly once, closing and re-opening any
//! generated span an original boundary lands inside so neither nesting is
//! corrupted.

use crate::html::escape;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EventKind {
    Start,
    Stop,
}

/// One tag boundary, positioned in plain-text bytes.
#[derive(Debug, Clone)]
struct Event {
    kind: EventKind,
    offset: usize,
    /// Tag name, lowercased
    name: String,
    /// Raw opening tag text; empty for stop events
    raw: String,
}

/// Elements that never produce a stop event.
const VOID_TAGS: [&str; 4] = ["br", "hr", "img", "input"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stream {
    Original,
    Generated,
}

/// Merge `generated` highlighting markup with the `original` markup that
/// wrapped the same `plain` text before highlighting.
///
/// Original events take precedence on exact-offset ties, preserving the
/// original nesting exactly; a generated span is split around any
/// original boundary that falls strictly inside it.
///
/// # Panics
///
/// Panics when either markup string does not cover `plain` exactly — that
/// is an internal consistency error upstream, and corrupt markup must not
/// be produced silently.
pub fn merge_markup(original: &str, generated: &str, plain: &str) -> String {
    let (original_events, original_len) = parse_events(original);
    let (generated_events, generated_len) = parse_events(generated);
    assert_eq!(
        original_len,
        plain.len(),
        "original markup covers {} bytes of plain text, expected {}",
        original_len,
        plain.len()
    );
    assert_eq!(
        generated_len,
        plain.len(),
        "generated markup covers {} bytes of plain text, expected {}",
        generated_len,
        plain.len()
    );

    let mut result = String::new();
    let mut processed = 0;
    // Generated spans currently open, bottom-up
    let mut open: Vec<&Event> = Vec::new();
    let (mut oi, mut gi) = (0, 0);

    while let Some(stream) = select(&original_events, oi, &generated_events, gi) {
        let offset = match stream {
            Stream::Original => original_events[oi].offset,
            Stream::Generated => generated_events[gi].offset,
        };
        result.push_str(&escape(&plain[processed..offset]));
        processed = offset;

        match stream {
            Stream::Original => {
                // Suspend every open generated span, replay the original
                // events at this offset, then restore the spans.
                for event in open.iter().rev() {
                    result.push_str(&close_tag(event));
                }
                loop {
                    render(&mut result, &original_events[oi]);
                    oi += 1;
                    let again = select(&original_events, oi, &generated_events, gi)
                        == Some(Stream::Original)
                        && original_events
                            .get(oi)
                            .is_some_and(|e| e.offset == processed);
                    if !again {
                        break;
                    }
                }
                for event in open.iter() {
                    result.push_str(&event.raw);
                }
            }
            Stream::Generated => {
                let event = &generated_events[gi];
                match event.kind {
                    EventKind::Start => open.push(event),
                    EventKind::Stop => {
                        open.pop();
                    }
                }
                render(&mut result, event);
                gi += 1;
            }
        }
    }
    result.push_str(&escape(&plain[processed..]));
    result
}

/// Pick the stream whose next event comes first. On an exact-offset tie
/// the original wins, unless the generated event is a stop — a span must
/// close before the boundary it ends on.
fn select(
    original: &[Event],
    oi: usize,
    generated: &[Event],
    gi: usize,
) -> Option<Stream> {
    match (original.get(oi), generated.get(gi)) {
        (None, None) => None,
        (Some(_), None) => Some(Stream::Original),
        (None, Some(_)) => Some(Stream::Generated),
        (Some(o), Some(g)) => {
            if o.offset != g.offset {
                Some(if o.offset < g.offset {
                    Stream::Original
                } else {
                    Stream::Generated
                })
            } else if g.kind == EventKind::Start {
                Some(Stream::Original)
            } else {
                Some(Stream::Generated)
            }
        }
    }
}

fn render(out: &mut String, event: &Event) {
    match event.kind {
        EventKind::Start => out.push_str(&event.raw),
        EventKind::Stop => out.push_str(&close_tag(event)),
    }
}

fn close_tag(event: &Event) -> String {
    format!("</{}>", event.name)
}

/// Flatten a markup string into events. Offsets count plain-text bytes,
/// with entity references decoded to their plain length. Returns the
/// events and the total plain-text byte length covered.
fn parse_events(markup: &str) -> (Vec<Event>, usize) {
    let mut events = Vec::new();
    let mut offset = 0;
    let mut rest = markup;
    loop {
        let Some(lt) = rest.find('<') else {
            offset += decoded_len(rest);
            break;
        };
        offset += decoded_len(&rest[..lt]);
        let tail = &rest[lt..];
        let Some(gt) = tail.find('>') else {
            // Dangling "<": literal text
            offset += decoded_len(tail);
            break;
        };
        let tag = &tail[..=gt];
        let inner = &tag[1..tag.len() - 1];
        if let Some(closing) = inner.strip_prefix('/') {
            events.push(Event {
                kind: EventKind::Stop,
                offset,
                name: tag_name(closing),
                raw: String::new(),
            });
        } else {
            let name = tag_name(inner);
            let void = VOID_TAGS.contains(&name.as_str());
            let self_closing = inner.ends_with('/');
            events.push(Event {
                kind: EventKind::Start,
                offset,
                name: name.clone(),
                raw: tag.to_string(),
            });
            if self_closing && !void {
                events.push(Event {
                    kind: EventKind::Stop,
                    offset,
                    name,
                    raw: String::new(),
                });
            }
        }
        rest = &tail[gt + 1..];
    }
    (events, offset)
}

fn tag_name(s: &str) -> String {
    s.chars()
        .take_while(|c| !c.is_whitespace() && *c != '/' && *c != '>')
        .collect::<String>()
        .to_lowercase()
}

/// Plain-text byte length of a markup text run, decoding entities.
fn decoded_len(text: &str) -> usize {
    let mut len = 0;
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        len += amp;
        let tail = &rest[amp..];
        match entity_len(tail) {
            Some((decoded, consumed)) => {
                len += decoded;
                rest = &tail[consumed..];
            }
            None => {
                len += 1;
                rest = &tail[1..];
            }
        }
    }
    len + rest.len()
}

/// Decoded byte length and consumed source length of one entity at the
/// start of `s`, or `None` for a bare ampersand.
fn entity_len(s: &str) -> Option<(usize, usize)> {
    let semi = s.as_bytes().iter().take(12).position(|&b| b == b';')?;
    let body = &s[1..semi];
    let decoded = match body {
        "amp" | "lt" | "gt" | "quot" | "apos" => 1,
        _ if body.starts_with("#x") || body.starts_with("#X") => {
            let code = u32::from_str_radix(&body[2..], 16).ok()?;
            char::from_u32(code)?.len_utf8()
        }
        _ if body.starts_with('#') => {
            let code: u32 = body[1..].parse().ok()?;
            char::from_u32(code)?.len_utf8()
        }
        _ => return None,
    };
    Some((decoded, semi + 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_events_offsets() {
        let (events, len) = parse_events("<b>wor</b>ld");
        assert_eq!(len, 5);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].offset, 0);
        assert_eq!(events[0].kind, EventKind::Start);
        assert_eq!(events[0].name, "b");
        assert_eq!(events[1].offset, 3);
        assert_eq!(events[1].kind, EventKind::Stop);
    }

    #[test]
    fn test_parse_events_entities_and_void_tags() {
        let (events, len) = parse_events("a&amp;b<br>c");
        assert_eq!(len, 4); // "a&b" + "c"
        assert_eq!(events.len(), 1); // <br> opens but never closes
        assert_eq!(events[0].offset, 3);
    }

    #[test]
    fn test_merge_preserves_original_boundary_inside_span() {
        // The spec's scenario: <b>wor</b>ld with one generated span over
        // the whole word splits at the original boundary.
        let merged = merge_markup(
            "<b>wor</b>ld",
            "<span class=\"hljs-keyword\">world</span>",
            "world",
        );
        assert_eq!(
            merged,
            "<b><span class=\"hljs-keyword\">wor</span></b><span class=\"hljs-keyword\">ld</span>"
        );
    }

    #[test]
    fn test_merge_without_original_markup() {
        let merged = merge_markup(
            "a &lt; b",
            "<span class=\"hljs-number\">a</span> &lt; b",
            "a < b",
        );
        assert_eq!(merged, "<span class=\"hljs-number\">a</span> &lt; b");
    }

    #[test]
    fn test_merge_original_tags_outside_spans_pass_through() {
        let merged = merge_markup(
            "x<i>y</i>z",
            "xyz",
            "xyz",
        );
        assert_eq!(merged, "x<i>y</i>z");
    }

    #[test]
    fn test_merge_nested_original_inside_span() {
        let merged = merge_markup(
            "<em><b>ab</b></em>cd",
            "<span class=\"hljs-title\">abcd</span>",
            "abcd",
        );
        assert_eq!(
            merged,
            "<em><b><span class=\"hljs-title\">ab</span></b></em><span class=\"hljs-title\">cd</span>"
        );
    }

    #[test]
    #[should_panic(expected = "plain text")]
    fn test_merge_length_mismatch_panics() {
        merge_markup("<b>abc</b>", "<span>abcd</span>", "abcd");
    }

    #[test]
    fn test_merge_escapes_text_once() {
        let merged = merge_markup("&amp;x", "&amp;<span class=\"hljs-title\">x</span>", "&x");
        assert_eq!(merged, "&amp;<span class=\"hljs-title\">x</span>");
    }
}
