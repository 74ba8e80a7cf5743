use crate::error::GenerateError;
use crate::lines::record::{EventListenerSpec, Extras, GroupSpec, PluginSpec, ProgramSpec};
use crate::lines::scan::Scanner;
use std::fmt;

/// Which block a line came from. Used to report malformed lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineKind {
    Program,
    EventListener,
    Group,
    CtlPlugin,
    RpcPlugin,
}

impl fmt::Display for LineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LineKind::Program => "program",
            LineKind::EventListener => "event listener",
            LineKind::Group => "group",
            LineKind::CtlPlugin => "ctl plugin",
            LineKind::RpcPlugin => "rpc plugin",
        };
        f.write_str(name)
    }
}

/// A record that can be read from one line.
///
/// `parse` consumes fields from the scanner and returns `None` on the first
/// field that does not fit. Trailing input is checked by the caller.
pub trait LineGrammar: Sized {
    fn parse(s: &mut Scanner<'_>) -> Option<Self>;
}

/// Parse a single line as `T`.
pub fn parse_line<T: LineGrammar>(
    kind: LineKind,
    line: &str,
    line_no: usize,
) -> Result<T, GenerateError> {
    let mut s = Scanner::new(line.trim());
    match T::parse(&mut s) {
        Some(record) if s.is_done() => Ok(record),
        _ => Err(GenerateError::MalformedLine {
            kind,
            line_no,
            line: line.to_string(),
        }),
    }
}

/// Parse every non-blank line of a multi-line block, keeping input order.
///
/// Line numbers in errors count blank lines too, so they point at the line
/// as written.
pub fn parse_block<T: LineGrammar>(kind: LineKind, block: &str) -> Result<Vec<T>, GenerateError> {
    block
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| parse_line(kind, line, idx + 1))
        .collect()
}

/// Priority digits, kept as written so `010` or values past `u32` render unchanged.
fn priority(s: &mut Scanner<'_>) -> Option<String> {
    s.digits().map(str::to_string)
}

fn is_flag(word: &str) -> bool {
    matches!(word, "true" | "false")
}

/// ` (<key=value ...>)`
fn option_block(s: &mut Scanner<'_>) -> Extras {
    s.spaced(|s| s.delimited('(', ')'))
        .map(Extras::parse)
        .unwrap_or_default()
}

/// ` [<args>]`
fn bracket_args(s: &mut Scanner<'_>) -> Option<String> {
    s.spaced(|s| s.delimited('[', ']')).map(str::to_string)
}

impl LineGrammar for ProgramSpec {
    fn parse(s: &mut Scanner<'_>) -> Option<Self> {
        let priority = priority(s)?;
        s.gap().then_some(())?;
        let name = s.word()?.to_string();
        let extras = option_block(s);
        s.gap().then_some(())?;
        let command = s.word()?.to_string();
        let args = bracket_args(s);
        let directory = s.spaced(|s| {
            s.word()
                .filter(|w| !is_flag(w) && !w.starts_with('['))
                .map(str::to_string)
        });
        let redirect_stderr = s
            .spaced(|s| s.word().filter(|w| is_flag(w)))
            .is_some_and(|w| w == "true");
        let user = s
            .spaced(|s| s.word().filter(|w| !w.starts_with('[')))
            .map(str::to_string);

        Some(ProgramSpec {
            priority,
            name,
            command,
            args,
            directory,
            redirect_stderr,
            user,
            extras,
        })
    }
}

impl LineGrammar for EventListenerSpec {
    fn parse(s: &mut Scanner<'_>) -> Option<Self> {
        let name = s.word()?.to_string();
        let extras = option_block(s);
        s.gap().then_some(())?;
        let events = s.word()?.to_string();
        s.gap().then_some(())?;
        let command = s.word()?.to_string();
        let args = bracket_args(s);

        Some(EventListenerSpec {
            name,
            events,
            command,
            args,
            extras,
        })
    }
}

impl LineGrammar for GroupSpec {
    fn parse(s: &mut Scanner<'_>) -> Option<Self> {
        let priority = priority(s)?;
        s.gap().then_some(())?;
        let name = s.word()?.to_string();
        s.gap().then_some(())?;
        let programs: Vec<String> = s
            .remainder()?
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect();
        if programs.is_empty() {
            return None;
        }

        Some(GroupSpec {
            priority,
            name,
            programs,
        })
    }
}

impl LineGrammar for PluginSpec {
    fn parse(s: &mut Scanner<'_>) -> Option<Self> {
        let name = s.word()?.to_string();
        s.gap().then_some(())?;
        let callable = s.word()?.to_string();
        Some(PluginSpec { name, callable })
    }
}
