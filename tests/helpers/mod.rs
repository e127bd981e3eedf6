//! Shared helpers for the integration suites.

#![allow(dead_code)]

use trickle_xml::{Arena, Config, Event, Origin, Parser, Sanitizer, SanitizerConfig};

pub fn start(name: &[u8]) -> Event<'_> {
    Event::ElementStart {
        name,
        origin: Origin::Explicit,
    }
}

pub fn end(name: &[u8]) -> Event<'_> {
    Event::ElementEnd {
        name,
        origin: Origin::Explicit,
    }
}

pub fn attr<'a>(name: &'a [u8], value: &'a [u8]) -> Event<'a> {
    Event::Attribute { name, value }
}

pub fn text(bytes: &[u8]) -> Event<'_> {
    Event::Text(bytes)
}

/// Feeds `input` whole, finishes, and collects every event through
/// `EndOfStream` (inclusive).
pub fn parse_all<'a>(arena: &'a Arena, config: Config, input: &[u8]) -> Vec<Event<'a>> {
    let mut parser = Parser::with_config(config, arena);
    parser.feed(input);
    parser.finish();
    collect(&mut parser)
}

/// Feeds `input` in `chunk`-sized pieces, draining the parser after each
/// chunk until it reports `NeedMoreInput`, then finishes and collects
/// the rest. `NeedMoreInput` itself is not recorded.
pub fn parse_chunked<'a>(
    arena: &'a Arena,
    config: Config,
    input: &[u8],
    chunk: usize,
) -> Vec<Event<'a>> {
    let mut parser = Parser::with_config(config, arena);
    let mut events = Vec::new();
    for part in input.chunks(chunk) {
        parser.feed(part);
        loop {
            match parser.next_event() {
                Event::NeedMoreInput => break,
                event => events.push(event),
            }
        }
    }
    parser.finish();
    events.extend(collect(&mut parser));
    events
}

/// Drains a finished parser through `EndOfStream` (inclusive).
pub fn collect<'a>(parser: &mut Parser<'a>) -> Vec<Event<'a>> {
    let mut events = Vec::new();
    loop {
        let event = parser.next_event();
        let done = event == Event::EndOfStream;
        events.push(event);
        if done {
            return events;
        }
    }
}

/// Runs an upstream event sequence (which must contain `EndOfStream`,
/// as the `parse_*` helpers guarantee) through a sanitizer and collects
/// its output through `EndOfStream` (inclusive).
pub fn sanitize<'a>(config: SanitizerConfig, upstream: &[Event<'a>]) -> Vec<Event<'a>> {
    let mut sanitizer = Sanitizer::new(config);
    let mut events = Vec::new();
    for &event in upstream {
        sanitizer.push(event);
        loop {
            match sanitizer.next_event() {
                Event::NeedMoreInput => break,
                event => {
                    let done = event == Event::EndOfStream;
                    events.push(event);
                    if done {
                        return events;
                    }
                }
            }
        }
    }
    events
}

/// Whole pipeline with default configurations.
pub fn pipeline<'a>(arena: &'a Arena, input: &[u8]) -> Vec<Event<'a>> {
    let raw = parse_all(arena, Config::default(), input);
    sanitize(SanitizerConfig::default(), &raw)
}

/// Asserts that starts and ends match like parentheses and that every
/// text event outside the outermost pair is whitespace-only. Call on
/// sanitized sequences that contain no `Error` events.
pub fn assert_balanced(events: &[Event<'_>]) {
    let mut stack: Vec<&[u8]> = Vec::new();
    for event in events {
        match *event {
            Event::ElementStart { name, .. } => stack.push(name),
            Event::ElementEnd { name, .. } => {
                assert_eq!(stack.pop(), Some(name), "unbalanced end tag");
            }
            Event::Text(bytes) if stack.is_empty() => {
                assert!(
                    bytes.iter().all(|b| b" \t\r\n".contains(b)),
                    "significant text outside the root: {:?}",
                    event
                );
            }
            Event::Error { .. } => panic!("assert_balanced on a sequence with errors"),
            _ => {}
        }
    }
    assert!(stack.is_empty(), "elements left open: {:?}", stack);
}
