use std::time::Duration;
use anyhow::{Context, Result};
use log::debug;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use crate::models::{AggregateResult, EntryId, Grade};
use crate::utils::aggregate::compute;
use crate::utils::celebration::{confetti, should_celebrate};
use crate::utils::roster::Roster;
use crate::utils::share::{share, Clipboard, SharePayload, ShareTarget};
use crate::utils::theme::{PreferenceStore, ThemeSwitch};

pub const EMPTY_CREDITS_MESSAGE: &str = "Please set credits for at least one course.";
pub const PROMPT_MESSAGE: &str = "Set credits and grades above, then type `calc`.";

const HELP: &str = "\
Commands:
  list                      show the courses
  add                       add a course (up to 12)
  remove <n>                remove course n (at least one stays)
  credits <n> <value>       set credits of course n (0-10)
  up <n> | down <n>         step credits of course n by one
  grade <n> <grade>         set grade of course n (O, A+, A, B+, B, C, F)
  name <n> <text>           name course n
  calc                      compute the CGPA
  reset                     start over with six empty courses
  theme                     toggle dark/light
  share                     share the calculator
  quit                      leave";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    List,
    Add,
    Remove(usize),
    Credits(usize, String),
    Step(usize, i8),
    Grade(usize, Grade),
    Name(usize, String),
    Calc,
    Reset,
    Theme,
    Share,
    Help,
    Quit,
}

impl Command {
    /// Parses one input line. `Ok(None)` for a blank line, `Err` with a hint otherwise.
    pub fn parse(line: &str) -> std::result::Result<Option<Command>, String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let index = |rest: &str| -> std::result::Result<(usize, String), String> {
            let (n, tail) = match rest.split_once(char::is_whitespace) {
                Some((n, tail)) => (n, tail.trim()),
                None => (rest, ""),
            };
            n.parse::<usize>()
                .map(|n| (n, tail.to_string()))
                .map_err(|_| format!("`{}` expects a course number", word))
        };

        let command = match word.to_ascii_lowercase().as_str() {
            "list" | "ls" => Command::List,
            "add" => Command::Add,
            "remove" | "rm" => Command::Remove(index(rest)?.0),
            "credits" => {
                let (n, value) = index(rest)?;
                Command::Credits(n, value)
            }
            "up" => Command::Step(index(rest)?.0, 1),
            "down" => Command::Step(index(rest)?.0, -1),
            "grade" => {
                let (n, grade) = index(rest)?;
                Command::Grade(n, grade.parse().map_err(|e| format!("{}", e))?)
            }
            "name" => {
                let (n, name) = index(rest)?;
                Command::Name(n, name)
            }
            "calc" | "calculate" => Command::Calc,
            "reset" => Command::Reset,
            "theme" => Command::Theme,
            "share" => Command::Share,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => return Err(format!("Unknown command `{}`, type `help`", other)),
        };
        Ok(Some(command))
    }
}

/// Terminal front end: owns the roster and turns commands into roster calls.
pub struct Session<S: PreferenceStore> {
    roster: Roster,
    theme: ThemeSwitch<S>,
    share_target: Option<Box<dyn ShareTarget>>,
    clipboard: Option<Box<dyn Clipboard>>,
    payload: SharePayload,
    remove_delay: Duration,
    celebrate_at: f64,
    removing: Option<EntryId>,
    last_result: Option<AggregateResult>,
}

impl<S: PreferenceStore> Session<S> {
    pub fn new(theme: ThemeSwitch<S>, payload: SharePayload) -> Self {
        Session {
            roster: Roster::new(),
            theme,
            share_target: None,
            clipboard: None,
            payload,
            remove_delay: Duration::ZERO,
            celebrate_at: crate::utils::celebration::DEFAULT_THRESHOLD,
            removing: None,
            last_result: None,
        }
    }

    pub fn with_share_target(mut self, target: Box<dyn ShareTarget>) -> Self {
        self.share_target = Some(target);
        self
    }

    pub fn with_clipboard(mut self, clipboard: Box<dyn Clipboard>) -> Self {
        self.clipboard = Some(clipboard);
        self
    }

    pub fn with_remove_delay(mut self, delay: Duration) -> Self {
        self.remove_delay = delay;
        self
    }

    pub fn with_celebration_threshold(mut self, threshold: f64) -> Self {
        self.celebrate_at = threshold;
        self
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn theme(&self) -> &ThemeSwitch<S> {
        &self.theme
    }

    pub fn last_result(&self) -> Option<&AggregateResult> {
        self.last_result.as_ref()
    }

    /// Reads commands until `quit` or end of input.
    pub async fn run<R, W>(&mut self, input: R, out: &mut W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        self.render(out).await?;
        let mut lines = input.lines();
        while let Some(line) = lines.next_line().await.context("Failed to read input")? {
            match Command::parse(&line) {
                Ok(Some(Command::Quit)) => break,
                Ok(Some(command)) => self.execute(command, out).await?,
                Ok(None) => {}
                Err(hint) => write_line(out, &hint).await?,
            }
        }
        out.flush().await.context("Failed to flush output")?;
        Ok(())
    }

    pub async fn execute<W: AsyncWrite + Unpin>(&mut self, command: Command, out: &mut W) -> Result<()> {
        debug!("Executing {:?}", command);
        match command {
            Command::List => self.render(out).await,
            Command::Add => {
                self.roster.add();
                self.render(out).await
            }
            Command::Remove(n) => self.remove(n, out).await,
            Command::Credits(n, raw) => self.edit(n, out, |roster, id| {
                roster.set_credits(id, &raw);
            }).await,
            Command::Step(n, dir) => self.edit(n, out, |roster, id| {
                roster.step_credits(id, dir);
            }).await,
            Command::Grade(n, grade) => self.edit(n, out, |roster, id| {
                roster.set_grade(id, grade);
            }).await,
            Command::Name(n, name) => self.edit(n, out, |roster, id| {
                roster.set_name(id, &name);
            }).await,
            Command::Calc => self.calculate(out).await,
            Command::Reset => {
                self.roster.reset();
                self.last_result = None;
                self.render(out).await?;
                write_line(out, PROMPT_MESSAGE).await
            }
            Command::Theme => {
                let theme = self.theme.toggle();
                write_line(out, &format!("Theme: {}", theme)).await
            }
            Command::Share => {
                let outcome = share(self.share_target.as_deref(), self.clipboard.as_deref(), &self.payload).await;
                match outcome.notice() {
                    Some(notice) => write_line(out, &notice).await,
                    None => Ok(()),
                }
            }
            Command::Help => write_line(out, HELP).await,
            Command::Quit => Ok(()),
        }
    }

    async fn edit<W, F>(&mut self, n: usize, out: &mut W, apply: F) -> Result<()>
    where
        W: AsyncWrite + Unpin,
        F: FnOnce(&mut Roster, EntryId),
    {
        match self.roster.id_at(n) {
            Some(id) => {
                apply(&mut self.roster, id);
                self.render(out).await
            }
            None => write_line(out, &format!("There is no course {}", n)).await,
        }
    }

    // The row is shown as removing first and only dropped from the roster after the delay.
    async fn remove<W: AsyncWrite + Unpin>(&mut self, n: usize, out: &mut W) -> Result<()> {
        let Some(id) = self.roster.id_at(n) else {
            return write_line(out, &format!("There is no course {}", n)).await;
        };
        if !self.roster.can_remove() {
            return write_line(out, "At least one course has to stay.").await;
        }

        self.removing = Some(id);
        self.render(out).await?;
        if !self.remove_delay.is_zero() {
            tokio::time::sleep(self.remove_delay).await;
        }
        self.removing = None;
        self.roster.remove(id);
        self.render(out).await
    }

    async fn calculate<W: AsyncWrite + Unpin>(&mut self, out: &mut W) -> Result<()> {
        match compute(self.roster.entries()) {
            Ok(result) => {
                self.last_result = Some(result);
                write_line(out, &format!("CGPA: {}  [{}] {}", result, result.tier.style(), result.tier.message())).await?;
                if should_celebrate(&result, self.celebrate_at) {
                    let line = confetti(&mut rand::thread_rng(), 12);
                    write_line(out, &line).await?;
                }
                Ok(())
            }
            Err(e) => {
                debug!("Calculation skipped: {}", e);
                self.last_result = None;
                write_line(out, EMPTY_CREDITS_MESSAGE).await
            }
        }
    }

    pub fn render_rows(&self) -> String {
        let mut text = format!("Courses ({}/{}) · theme: {}\n", self.roster.len(), crate::utils::roster::MAX_COURSES, self.theme.current());
        for (i, entry) in self.roster.entries().iter().enumerate() {
            let name = if entry.name.is_empty() { "-" } else { entry.name.as_str() };
            let marker = if self.removing == Some(entry.id) { "  (removing)" } else { "" };
            text.push_str(&format!(
                "{:>3}. {:<24} credits {:>2}  grade {:<2}{}\n",
                i + 1,
                name,
                entry.credits,
                entry.grade,
                marker
            ));
        }
        if !self.roster.can_add() {
            text.push_str("Course limit reached.\n");
        }
        text
    }

    async fn render<W: AsyncWrite + Unpin>(&self, out: &mut W) -> Result<()> {
        out.write_all(self.render_rows().as_bytes()).await.context("Failed to write output")
    }
}

async fn write_line<W: AsyncWrite + Unpin>(out: &mut W, line: &str) -> Result<()> {
    out.write_all(line.as_bytes()).await.context("Failed to write output")?;
    out.write_all(b"\n").await.context("Failed to write output")
}
