//! Login and signup screen.
//!
//! Shown whenever nobody is logged in. The user sees:
//!
//! ```text
//! ────────────────────────────────────────────────
//!                    MindMingle
//! ────────────────────────────────────────────────
//! Log in  (/signup to create an account, /quit to exit)
//! Username:
//! Password:
//! ```
//!
//! # Commands
//!
//! | Command | Aliases | Description |
//! |---------|---------|-------------|
//! | `/signup` | `/register` | Switch to account creation |
//! | `/login` | | Switch back to login |
//! | `/quit` | `/exit`, `/q` | Leave the application |
//!
//! Commands are accepted at the username prompt. The password is read
//! without echo.

use crate::output::console::ConsoleFormatter;
use dialoguer::Password;
use dialoguer::theme::ColorfulTheme;
use mindmingle_application::AuthManager;
use mindmingle_domain::User;
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RlResult};
use std::io;

/// Which form the screen is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    #[default]
    Login,
    Signup,
}

impl AuthMode {
    fn heading(self) -> &'static str {
        match self {
            AuthMode::Login => "Log in  (/signup to create an account, /quit to exit)",
            AuthMode::Signup => "Create account  (/login if you already have one, /quit to exit)",
        }
    }
}

/// What the user typed at the username prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UsernameInput {
    SwitchTo(AuthMode),
    Quit,
    Name(String),
}

pub fn parse_username_input(line: &str) -> UsernameInput {
    match line.trim() {
        "/signup" | "/register" => UsernameInput::SwitchTo(AuthMode::Signup),
        "/login" => UsernameInput::SwitchTo(AuthMode::Login),
        "/quit" | "/exit" | "/q" => UsernameInput::Quit,
        _ => UsernameInput::Name(line.to_string()),
    }
}

/// Source of input that must not be echoed
pub trait SecretInput {
    /// `None` when the user cancelled.
    fn read_secret(&self, prompt: &str) -> io::Result<Option<String>>;
}

/// Reads from the terminal, hiding what is typed.
pub struct MaskedTerminal;

impl SecretInput for MaskedTerminal {
    fn read_secret(&self, prompt: &str) -> io::Result<Option<String>> {
        let result = Password::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .allow_empty_password(true)
            .interact();
        match result {
            Ok(secret) => Ok(Some(secret)),
            Err(e)
                if matches!(
                    e.kind(),
                    io::ErrorKind::Interrupted | io::ErrorKind::UnexpectedEof
                ) =>
            {
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

/// Interactive login/signup prompt
pub struct AuthScreen<'a> {
    auth: &'a AuthManager,
    formatter: &'a ConsoleFormatter,
    secrets: &'a dyn SecretInput,
}

impl<'a> AuthScreen<'a> {
    pub fn new(auth: &'a AuthManager, formatter: &'a ConsoleFormatter) -> Self {
        Self {
            auth,
            formatter,
            secrets: &MaskedTerminal,
        }
    }

    /// Read passwords from `secrets` instead of the terminal.
    pub fn with_secret_input(mut self, secrets: &'a dyn SecretInput) -> Self {
        self.secrets = secrets;
        self
    }

    /// Prompt until someone logs in. `None` means the user asked to quit.
    pub fn run(&self, rl: &mut DefaultEditor) -> RlResult<Option<User>> {
        let mut mode = AuthMode::default();
        println!();
        println!("{}", self.formatter.header("MindMingle"));

        loop {
            println!("{}", mode.heading());

            let Some(line) = read_line(rl, "Username: ")? else {
                return Ok(None);
            };
            let username = match parse_username_input(&line) {
                UsernameInput::SwitchTo(next) => {
                    mode = next;
                    continue;
                }
                UsernameInput::Quit => return Ok(None),
                UsernameInput::Name(name) => name,
            };

            let Some(password) = self.secrets.read_secret("Password")? else {
                return Ok(None);
            };

            match self.submit(mode, &username, &password) {
                Some(user) => return Ok(Some(user)),
                None => println!(),
            }
        }
    }

    fn submit(&self, mode: AuthMode, username: &str, password: &str) -> Option<User> {
        let result = match mode {
            AuthMode::Login => self.auth.login(username, password),
            AuthMode::Signup => self.auth.signup(username, password),
        };

        match result {
            Ok(user) => {
                println!(
                    "{}",
                    self.formatter
                        .notice(&format!("Logged in as {}", user.username))
                );
                Some(user)
            }
            Err(e) => {
                println!("{}", self.formatter.error(&e.to_string()));
                None
            }
        }
    }
}

/// Read one line; `None` on Ctrl-C or Ctrl-D.
fn read_line(rl: &mut DefaultEditor, prompt: &str) -> RlResult<Option<String>> {
    match rl.readline(prompt) {
        Ok(line) => Ok(Some(line)),
        Err(ReadlineError::Interrupted | ReadlineError::Eof) => Ok(None),
        Err(err) => Err(err),
    }
}
