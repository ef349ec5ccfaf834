//! Command-line surface of the `walk` binary.
//!
//! Flags are only recognised before the first positional word. Everything
//! from the first word on is either a root path or, from the first word
//! starting with `!`, part of the command template.

use clap::Parser;

use crate::builder::WalkBuilder;
use crate::command::CommandTemplate;
use crate::error::WalkError;
use crate::format::FormatProgram;
use crate::range::DepthRange;

const FORMAT_HELP: &str = "\
Output format, one character per field:
  U  owner name
  G  group name
  M  name of the last user to modify the file
  a  last access time (epoch seconds)
  m  last modification time (epoch seconds)
  n  final path element
  p  path
  s  size in bytes
  x  permissions
Any other character is printed as-is.";

#[derive(Parser, Debug)]
#[command(
    name = "walk",
    version,
    about = "Walk a directory hierarchy, printing or running a command per entry",
    override_usage = "walk [-dfx] [-n min,max] [-e fmt] [path ...] [! cmd]"
)]
pub struct Cli {
    /// Print only directories
    #[arg(short = 'd')]
    pub dirs_only: bool,

    /// Print only non-directories
    #[arg(short = 'f')]
    pub files_only: bool,

    /// Print only entries with an executable bit set
    #[arg(short = 'x')]
    pub executable_only: bool,

    /// Inclusive depth range; either bound may be omitted, a bare N means 0,N
    #[arg(short = 'n', value_name = "min,max", allow_hyphen_values = true)]
    pub range: Option<DepthRange>,

    /// Output format, see --help for the field codes
    #[arg(short = 'e', value_name = "fmt", default_value = "p", long_help = FORMAT_HELP)]
    pub format: String,

    /// Root paths (default: .), optionally followed by `! cmd`; `%` in cmd is
    /// replaced by each path, `\%` is a literal percent
    #[arg(value_name = "ARGS", trailing_var_arg = true)]
    pub args: Vec<String>,
}

/// The positional words split into roots and an optional command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub roots:   Vec<String>,
    pub command: Option<String>,
}

impl Cli {
    /// Split the positional words at the first `!`-prefixed token.
    ///
    /// A bare `!` starts the command with the next word; `!cmd` starts it with
    /// `cmd`. Command words are joined with single spaces.
    pub fn invocation(&self) -> Result<Invocation, WalkError> {
        let split = self.args.iter().position(|a| a.starts_with('!'));

        let (roots, command) = match split {
            None => (self.args.clone(), None),
            Some(n) => {
                let head = &self.args[n][1..];
                let words = std::iter::once(head)
                    .filter(|w| !w.is_empty())
                    .chain(self.args[n + 1..].iter().map(String::as_str))
                    .collect::<Vec<_>>();
                if words.is_empty() {
                    return Err(WalkError::Usage("missing command after '!'".into()));
                }
                (self.args[..n].to_vec(), Some(words.join(" ")))
            }
        };

        let roots = if roots.is_empty() {
            vec![".".to_string()]
        } else {
            roots
        };

        Ok(Invocation { roots, command })
    }

    /// Assemble a ready-to-run [`WalkBuilder`].
    pub fn into_builder(self) -> Result<WalkBuilder, WalkError> {
        let invocation = self.invocation()?;

        let mut builder = crate::walk()
            .dirs_only(self.dirs_only)
            .files_only(self.files_only)
            .executable_only(self.executable_only)
            .depth(self.range.unwrap_or_default())
            .format(FormatProgram::compile(&self.format));

        if let Some(command) = invocation.command {
            builder = builder.command(CommandTemplate::parse(&command));
        }
        for root in invocation.roots {
            builder = builder.root(root);
        }

        Ok(builder)
    }
}
