// src/ui/console.rs

use crate::ui::{Console, Prompt};
use crossterm::style::Stylize;
use crossterm::tty::IsTty;
use std::io::{self, BufRead, Write};

/// Whether prompting is possible: both ends of the terminal must be a TTY,
/// otherwise a read would block on a pipe or a closed stdin.
pub fn is_interactive() -> bool {
    io::stdin().is_tty() && io::stdout().is_tty()
}

/// Prints gate events to stdout in the usual `[+]`/`[i]`/`[!]` style.
pub struct TerminalConsole<W: Write> {
    out: W,
}

impl TerminalConsole<io::Stdout> {
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write> TerminalConsole<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    // Console output is best effort; a closed stdout must not abort the gate.
    fn line(&mut self, text: impl std::fmt::Display) {
        let _ = writeln!(self.out, "{}", text);
    }
}

impl<W: Write> Console for TerminalConsole<W> {
    fn banner(&mut self) {
        self.line("_______________________________________________________________".dark_grey());
        self.line(format!("  {} v{}", "Vanguard WP".bold(), env!("CARGO_PKG_VERSION")));
        self.line("  WordPress pre-scan gate".dark_grey());
        self.line("_______________________________________________________________".dark_grey());
        self.line("");
    }

    fn notice(&mut self, message: &str) {
        self.line(format!("{} {}", "[i]".cyan().bold(), message));
    }

    fn update_started(&mut self) {
        self.line(format!("{} Updating the Database ...", "[i]".cyan().bold()));
    }

    fn update_finished(&mut self, updated: &[String], verbose: bool) {
        self.line(format!("{} Update completed.", "[i]".cyan().bold()));
        if verbose && !updated.is_empty() {
            self.line(format!("{} File(s) Updated:", "[+]".green().bold()));
            for file in updated {
                self.line(format!(" |  {}", file));
            }
        }
        self.line("");
    }

    fn not_fully_configured(&mut self, url: &str) {
        self.line(format!(
            "{} The WordPress install wizard is still reachable, the site is not fully configured: {}",
            "[!]".yellow().bold(),
            url
        ));
    }

    fn ready(&mut self, summary: &str) {
        self.line(format!("{} {}", "[+]".green().bold(), summary));
    }

    fn aborted(&mut self, message: &str) {
        self.line(format!("{} {}", "Scan Aborted:".red().bold(), message));
    }
}

/// Reads answers from stdin. The question is printed without a newline so
/// the answer is typed on the same line.
#[derive(Debug, Default)]
pub struct StdinPrompt;

impl Prompt for StdinPrompt {
    fn ask(&mut self, question: &str) -> io::Result<String> {
        let mut stdout = io::stdout();
        write!(stdout, "{} {} ", "[?]".magenta().bold(), question)?;
        stdout.flush()?;

        let mut answer = String::new();
        io::stdin().lock().read_line(&mut answer)?;
        Ok(answer)
    }
}
