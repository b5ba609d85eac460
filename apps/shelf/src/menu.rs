//! Line-oriented menus: login gate and collection screens.
//!
//! Input and output are generic so whole sessions can be scripted in tests.
//! End of input anywhere behaves like choosing Exit.

use std::fmt::Display;
use std::io::{BufRead, Write};

use gameshelf_accounts::{AccountBook, AccountsError, Session};
use gameshelf_games::{Format, GameLibrary, GamesError, Platform, PlatformFilter};

use crate::app::Shelf;

/// Screen to show next.
enum Screen {
    Login,
    Register,
    Main(Option<Session>),
    Exit,
}

#[derive(Debug, Clone, Copy)]
enum MainAction {
    View,
    Add,
    Delete,
    Logout,
    Exit,
}

impl MainAction {
    fn label(&self) -> &'static str {
        match self {
            MainAction::View => "View Games",
            MainAction::Add => "Input Game Details",
            MainAction::Delete => "Delete Entry",
            MainAction::Logout => "Logout",
            MainAction::Exit => "Exit App",
        }
    }
}

/// Domain errors split into "tell the user" and "abort".
trait UserFacing: std::error::Error + Send + Sync + 'static {
    fn is_validation(&self) -> bool;
}

impl UserFacing for GamesError {
    fn is_validation(&self) -> bool {
        GamesError::is_validation(self)
    }
}

impl UserFacing for AccountsError {
    fn is_validation(&self) -> bool {
        AccountsError::is_validation(self)
    }
}

/// Terminal front end over a [`Shelf`].
pub struct Menu<'a, R, W> {
    shelf: &'a Shelf,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write> Menu<'a, R, W> {
    pub fn new(shelf: &'a Shelf, input: R, output: W) -> Self {
        Self {
            shelf,
            input,
            output,
        }
    }

    /// Runs screens until the user exits or input ends.
    ///
    /// Validation failures are printed and the session continues; I/O
    /// failures end the session with an error.
    pub fn run(mut self) -> anyhow::Result<()> {
        let mut screen = if self.shelf.accounts.is_some() {
            Screen::Login
        } else {
            Screen::Main(None)
        };

        loop {
            screen = match screen {
                Screen::Login => self.login()?,
                Screen::Register => self.register()?,
                Screen::Main(session) => self.main_menu(session)?,
                Screen::Exit => {
                    tracing::debug!("menu closed");
                    return Ok(());
                }
            };
        }
    }

    fn login(&mut self) -> anyhow::Result<Screen> {
        let Some(choice) = self.choose("Login", &["Login", "Register", "Exit"])? else {
            return Ok(Screen::Exit);
        };
        match choice {
            0 => {}
            1 => return Ok(Screen::Register),
            _ => return Ok(Screen::Exit),
        }

        let Some(username) = self.prompt("Username:")? else {
            return Ok(Screen::Exit);
        };
        let Some(password) = self.prompt("Password:")? else {
            return Ok(Screen::Exit);
        };

        let result = self.accounts()?.authenticate(&username, &password);
        match self.settle(result)? {
            Some(session) => Ok(Screen::Main(Some(session))),
            None => Ok(Screen::Login),
        }
    }

    fn register(&mut self) -> anyhow::Result<Screen> {
        writeln!(self.output, "\nRegister")?;
        let Some(username) = self.prompt("Username:")? else {
            return Ok(Screen::Exit);
        };
        let Some(password) = self.prompt("Password:")? else {
            return Ok(Screen::Exit);
        };
        let Some(confirm) = self.prompt("Confirm Password:")? else {
            return Ok(Screen::Exit);
        };

        let result = self.accounts()?.register(&username, &password, &confirm);
        if self.settle(result)?.is_some() {
            writeln!(self.output, "Registration successful. Please login.")?;
        }
        Ok(Screen::Login)
    }

    fn main_menu(&mut self, session: Option<Session>) -> anyhow::Result<Screen> {
        let title = match &session {
            Some(s) => format!("Main Menu\nUser: {}", s.username()),
            None => "Main Menu".to_string(),
        };

        let mut actions = vec![MainAction::View, MainAction::Add, MainAction::Delete];
        if session.is_some() {
            actions.push(MainAction::Logout);
        }
        actions.push(MainAction::Exit);
        let labels: Vec<&str> = actions.iter().map(MainAction::label).collect();

        let Some(choice) = self.choose(&title, &labels)? else {
            return Ok(Screen::Exit);
        };

        let done = match actions[choice] {
            MainAction::View => self.view_games()?,
            MainAction::Add => self.add_game()?,
            MainAction::Delete => self.delete_game()?,
            MainAction::Logout => {
                if let Some(session) = session {
                    session.logout();
                }
                return Ok(Screen::Login);
            }
            MainAction::Exit => return Ok(Screen::Exit),
        };

        if done {
            Ok(Screen::Main(session))
        } else {
            Ok(Screen::Exit)
        }
    }

    /// Each of the collection screens returns `false` when input ran out.
    fn view_games(&mut self) -> anyhow::Result<bool> {
        let mut labels = vec!["All"];
        labels.extend(Platform::ALL.iter().map(Platform::as_str));
        let Some(choice) = self.choose("Filter by platform", &labels)? else {
            return Ok(false);
        };
        let filter = match choice {
            0 => PlatformFilter::All,
            n => PlatformFilter::Only(Platform::ALL[n - 1]),
        };

        let result = self.games().list(filter);
        if let Some(games) = self.settle(result)? {
            writeln!(self.output, "\nGame List")?;
            if games.is_empty() {
                writeln!(self.output, "(no games)")?;
            }
            for game in &games {
                writeln!(self.output, "{game}")?;
            }
        }
        Ok(true)
    }

    fn add_game(&mut self) -> anyhow::Result<bool> {
        let Some(name) = self.prompt("Game Name:")? else {
            return Ok(false);
        };
        let Some(platform) = self.pick("Platform", &Platform::ALL)? else {
            return Ok(false);
        };
        let Some(format) = self.pick("Format", &Format::ALL)? else {
            return Ok(false);
        };

        let result = self.games().save(&name, platform, format);
        if self.settle(result)?.is_some() {
            writeln!(self.output, "Game added!")?;
        }
        Ok(true)
    }

    fn delete_game(&mut self) -> anyhow::Result<bool> {
        let Some(name) = self.prompt("Game Name:")? else {
            return Ok(false);
        };
        let Some(platform) = self.pick("Platform", &Platform::ALL)? else {
            return Ok(false);
        };

        let result = self.games().delete(&name, platform);
        if self.settle(result)?.is_some() {
            writeln!(self.output, "Game deleted successfully.")?;
        }
        Ok(true)
    }

    fn games(&self) -> &'a GameLibrary {
        &self.shelf.games
    }

    fn accounts(&self) -> anyhow::Result<&'a AccountBook> {
        self.shelf
            .accounts
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("login is disabled"))
    }

    /// Prints validation errors and swallows them; passes anything else up.
    fn settle<T, E: UserFacing>(&mut self, result: Result<T, E>) -> anyhow::Result<Option<T>> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.is_validation() => {
                writeln!(self.output, "Error: {e}")?;
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Reads one line. `None` on end of input.
    fn prompt(&mut self, label: &str) -> anyhow::Result<Option<String>> {
        write!(self.output, "{label} ")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let value = line.strip_suffix('\n').unwrap_or(&line);
        let value = value.strip_suffix('\r').unwrap_or(value);
        Ok(Some(value.to_string()))
    }

    /// Shows a numbered list and returns the zero-based choice.
    fn choose(&mut self, title: &str, options: &[&str]) -> anyhow::Result<Option<usize>> {
        writeln!(self.output, "\n{title}")?;
        for (i, option) in options.iter().enumerate() {
            writeln!(self.output, "  {}. {option}", i + 1)?;
        }

        loop {
            let Some(answer) = self.prompt(">")? else {
                return Ok(None);
            };
            match answer.trim().parse::<usize>() {
                Ok(n) if (1..=options.len()).contains(&n) => return Ok(Some(n - 1)),
                _ => writeln!(self.output, "Invalid choice.")?,
            }
        }
    }

    fn pick<T: Display + Copy>(&mut self, title: &str, values: &[T]) -> anyhow::Result<Option<T>> {
        let labels: Vec<String> = values.iter().map(T::to_string).collect();
        let labels: Vec<&str> = labels.iter().map(String::as_str).collect();
        Ok(self.choose(title, &labels)?.map(|i| values[i]))
    }
}
