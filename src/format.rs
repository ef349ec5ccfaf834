use std::io::Write;

use crate::entry::{symbolic_mode, Entry};
use crate::error::WalkError;
use crate::owner::Resolver;
use crate::traits::Action;

/// A metadata attribute selected by one character of `-e`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldCode {
    /// `U`: owner name.
    Owner,
    /// `G`: group name.
    Group,
    /// `M`: last user to modify the entry.
    Modifier,
    /// `a`: last access time.
    Accessed,
    /// `m`: last modification time.
    Modified,
    /// `n`: final path element.
    Name,
    /// `p`: path.
    Path,
    /// `s`: size in bytes.
    Size,
    /// `x`: permission bits.
    Mode,
}

impl FieldCode {
    pub fn from_char(c: char) -> Option<Self> {
        Some(match c {
            'U' => FieldCode::Owner,
            'G' => FieldCode::Group,
            'M' => FieldCode::Modifier,
            'a' => FieldCode::Accessed,
            'm' => FieldCode::Modified,
            'n' => FieldCode::Name,
            'p' => FieldCode::Path,
            's' => FieldCode::Size,
            'x' => FieldCode::Mode,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatToken {
    Field(FieldCode),
    /// A run of characters echoed verbatim.
    Literal(String),
}

/// A compiled `-e` format string.
///
/// Compiled once, rendered once per entry.
///
/// ```rust
/// use pwalk::{Entry, EntryKind, FormatProgram, Meta, SystemResolver};
///
/// let entry = Entry::new("sub/file.txt", EntryKind::File, 1, Meta { size: 42, ..Meta::default() });
/// let mut out = Vec::new();
/// FormatProgram::compile("ns").render(&entry, &SystemResolver::new(), &mut out).unwrap();
/// assert_eq!(out, b"file.txt 42\n");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatProgram {
    tokens: Vec<FormatToken>,
}

impl Default for FormatProgram {
    fn default() -> Self {
        Self::compile("p")
    }
}

#[derive(Clone, Copy)]
enum LexState {
    Start,
    Literal,
}

impl FormatProgram {
    pub fn compile(spec: &str) -> Self {
        let mut tokens = Vec::new();
        let mut state = LexState::Start;
        let mut run = String::new();

        for c in spec.chars() {
            match (state, FieldCode::from_char(c)) {
                (LexState::Start, Some(code)) => tokens.push(FormatToken::Field(code)),
                (LexState::Literal, Some(code)) => {
                    tokens.push(FormatToken::Literal(std::mem::take(&mut run)));
                    tokens.push(FormatToken::Field(code));
                    state = LexState::Start;
                }
                (_, None) => {
                    run.push(c);
                    state = LexState::Literal;
                }
            }
        }
        if let LexState::Literal = state {
            tokens.push(FormatToken::Literal(run));
        }

        Self { tokens }
    }

    pub fn tokens(&self) -> &[FormatToken] {
        &self.tokens
    }

    /// Write one line for `entry`.
    ///
    /// Every field except a trailing one is followed by a single space;
    /// literals are written as-is.
    pub fn render(
        &self,
        entry: &Entry,
        resolver: &dyn Resolver,
        out: &mut dyn Write,
    ) -> std::io::Result<()> {
        let last = self.tokens.len().saturating_sub(1);
        for (i, token) in self.tokens.iter().enumerate() {
            match token {
                FormatToken::Literal(text) => out.write_all(text.as_bytes())?,
                FormatToken::Field(code) => {
                    write_field(*code, entry, resolver, out)?;
                    if i != last {
                        out.write_all(b" ")?;
                    }
                }
            }
        }
        out.write_all(b"\n")
    }
}

fn write_field(
    code: FieldCode,
    entry: &Entry,
    resolver: &dyn Resolver,
    out: &mut dyn Write,
) -> std::io::Result<()> {
    let meta = &entry.meta;
    match code {
        // The modifying user is not tracked by the filesystems we stat; the
        // owner is the closest answer.
        FieldCode::Owner | FieldCode::Modifier => {
            if let Some(name) = resolver.user_name(meta.uid) {
                out.write_all(name.as_bytes())?;
            }
        }
        FieldCode::Group => {
            if let Some(name) = resolver.group_name(meta.gid) {
                out.write_all(name.as_bytes())?;
            }
        }
        FieldCode::Accessed => {
            if let Some(t) = meta.accessed {
                write!(out, "{t}")?;
            }
        }
        FieldCode::Modified => write!(out, "{}", meta.modified)?,
        FieldCode::Name => out.write_all(entry.name.as_bytes())?,
        FieldCode::Path => write!(out, "{}", entry.path.display())?,
        FieldCode::Size => write!(out, "{}", meta.size)?,
        FieldCode::Mode => out.write_all(symbolic_mode(meta.mode).as_bytes())?,
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Renderer
// ---------------------------------------------------------------------------

/// The default action: print one formatted line per entry.
pub struct Renderer {
    program:  FormatProgram,
    resolver: Box<dyn Resolver>,
}

impl Renderer {
    pub fn new(program: FormatProgram, resolver: Box<dyn Resolver>) -> Self {
        Self { program, resolver }
    }
}

impl Action for Renderer {
    fn apply(&mut self, entry: &Entry, out: &mut dyn Write) -> Result<(), WalkError> {
        self.program
            .render(entry, self.resolver.as_ref(), out)
            .map_err(|source| WalkError::Io {
                path: entry.path.clone(),
                source,
            })
    }
}
