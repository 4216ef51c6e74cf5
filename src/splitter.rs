//! Splits a raw line into delimiter-bounded segments.
//! `;` runs the segment and waits for it, `&` runs it in the background.
//! Segments are borrowed views into the line; the line itself is never modified.
use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Sequential,
    Background,
}

impl Mode {
    fn from_delimiter(c: char) -> Option<Mode> {
        match c {
            ';' => Some(Mode::Sequential),
            '&' => Some(Mode::Background),
            _ => None,
        }
    }
}

/// One command substring of a line, paired with how it should be run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment<'a> {
    pub text: &'a str,
    pub mode: Mode,
    pub span: Range<usize>,
}

/// Result of a single scan step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split<'a> {
    pub segment: Segment<'a>,
    /// Byte offset right after the delimiter, or the end of the line.
    pub next: usize,
    /// No delimiter was found, nothing follows this segment.
    pub done: bool,
}

/// Scans `line` from `cursor` for the next `;` or `&`.
///
/// Returns `None` when what is left of the line is empty or just the line terminator:
/// nothing should be dispatched for it.
pub fn next_segment(line: &str, cursor: usize) -> Option<Split<'_>> {
    let rest = line.get(cursor..)?;
    if rest.is_empty() || rest == "\n" {
        return None;
    }

    let found = rest
        .char_indices()
        .find_map(|(offset, c)| Mode::from_delimiter(c).map(|mode| (offset, mode)));

    match found {
        Some((offset, mode)) => {
            let end = cursor + offset;
            Some(Split {
                segment: Segment {
                    text: &line[cursor..end],
                    mode,
                    span: cursor..end,
                },
                // both delimiters are one byte
                next: end + 1,
                done: false,
            })
        }
        None => Some(Split {
            segment: Segment {
                text: rest,
                mode: Mode::Sequential,
                span: cursor..line.len(),
            },
            next: line.len(),
            done: true,
        }),
    }
}

/// Iterator over every segment of a line, in order.
#[derive(Debug)]
pub struct Segments<'a> {
    line: &'a str,
    cursor: usize,
    finished: bool,
}

impl<'a> Segments<'a> {
    pub fn new(line: &'a str) -> Segments<'a> {
        Segments {
            line,
            cursor: 0,
            finished: false,
        }
    }
}

impl<'a> Iterator for Segments<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Segment<'a>> {
        if self.finished {
            return None;
        }
        match next_segment(self.line, self.cursor) {
            Some(split) => {
                self.cursor = split.next;
                self.finished = split.done;
                Some(split.segment)
            }
            None => {
                self.finished = true;
                None
            }
        }
    }
}
