use crate::parser::base::ParseError;
use crate::parser::ErrorContext;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TotalWidth(pub usize);

/// Renders a two column table: ` left  middle`.
/// The middle column wraps onto subsequent lines, aligned under itself.
#[derive(Debug)]
pub(crate) struct ColumnRenderer {
    indent: usize,
    left: usize,
    padding: usize,
    middle: usize,
}

// Let's assume the average word length is 5.
// Then 17 is a good minimum, because it allows precisely 3 words with a space between them.
pub(crate) const MINIMUM_MIDDLE_WIDTH: usize = 17;

impl ColumnRenderer {
    /// Produce a renderer whose middle column takes whatever the total width leaves over (but never less than the minimum).
    pub(crate) fn guided(indent: usize, left: usize, padding: usize, total_width: TotalWidth) -> Self {
        let non_middle = indent + left + padding;

        let middle = if non_middle + MINIMUM_MIDDLE_WIDTH <= total_width.0 {
            total_width.0 - non_middle
        } else {
            #[cfg(feature = "tracing_debug")]
            {
                debug!("Columns {non_middle} do not fit within the total {total_width:?}.  Selecting middle: {MINIMUM_MIDDLE_WIDTH}.");
            }

            MINIMUM_MIDDLE_WIDTH
        };

        Self {
            indent,
            left,
            padding,
            middle,
        }
    }

    pub(crate) fn render(&self, left: &str, middle: &str) -> Vec<String> {
        let ColumnRenderer {
            indent,
            left: left_width,
            padding,
            middle: middle_width,
        } = *self;
        let mut out = Vec::default();

        for (i, part) in middle
            .lines()
            .flat_map(|line| chunk(line, middle_width))
            .enumerate()
        {
            let left = if i == 0 { left } else { "" };
            out.push(format!("{:indent$}{left:left_width$}{:padding$}{part}", "", ""));
        }

        if out.is_empty() {
            out.push(format!("{:indent$}{left}", ""));
        }

        out
    }
}

/// Wrap paragraphs (separated by blank lines) to the width, keeping a blank line between them.
pub(crate) fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut out = Vec::default();

    for (i, paragraph) in text.split("\n\n").enumerate() {
        if i > 0 {
            out.push(String::default());
        }

        out.extend(chunk(&paragraph.replace('\n', " "), width));
    }

    out
}

fn chunk(paragraph: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::default();
    let mut current = String::default();

    for word in paragraph.split(' ').filter(|word| !word.is_empty()) {
        if current.is_empty() {
            hyphenate(width, &mut lines, &mut current, word);
        } else if current.chars().count() + word.chars().count() < width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            hyphenate(width, &mut lines, &mut current, word);
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    lines
}

// Break words that cannot fit on a line of their own.
fn hyphenate(width: usize, lines: &mut Vec<String>, current: &mut String, word: &str) {
    let increment = std::cmp::max(width, 2) - 1;
    let characters: Vec<char> = word.chars().collect();
    let mut left = 0;

    while characters.len() - left > width {
        let piece: String = characters[left..left + increment].iter().collect();
        lines.push(format!("{piece}-"));
        left += increment;
    }

    current.extend(&characters[left..]);
}

/// Where the dispatcher writes: help and version messages, errors, and error contexts.
pub(crate) trait UserInterface {
    fn print(&self, message: String);
    fn print_error(&self, error: ParseError);
    fn print_error_context(&self, error_context: ErrorContext);
}

#[derive(Default)]
pub(crate) struct ConsoleInterface {}

impl UserInterface for ConsoleInterface {
    fn print(&self, message: String) {
        println!("{message}");
    }

    fn print_error(&self, error: ParseError) {
        eprintln!("{error}");
    }

    fn print_error_context(&self, error_context: ErrorContext) {
        eprintln!("{error_context}");
    }
}
