//! Interactive shell for parkfinder
//!
//! This module contains the prompt loop: choose a state, pick one of its park
//! sites by number, and list the places near it. Input errors are reported
//! and re-prompted here; they never reach the retrieval pipeline.

use std::io::{self, Write};

use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tracing::warn;

use crate::data::{NearbyPlace, ParkSite};
use crate::error::{ErrorKind, ParkError};
use crate::service::ParkService;

const STATE_PROMPT: &str = "Enter a state name (e.g. Michigan, michigan) or 'exit':";
const SITE_PROMPT: &str = "Choose the number for detail search or 'exit' or 'back':";
const SEPARATOR: &str = "------------------------------------";

/// Operator mistakes, reported at the prompt
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("[Error] Enter proper state name")]
    UnknownState,

    #[error("[Error] Invalid input")]
    InvalidSelection,
}

/// Errors that end the shell
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Park(#[from] ParkError),

    #[error("Terminal I/O failed: {0}")]
    Io(#[from] io::Error),
}

/// Which prompt the shell is showing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppState {
    /// Waiting for a state name
    ChooseState,
    /// Waiting for a site number from the listed sites
    ChooseSite { sites: Vec<ParkSite> },
}

/// A parsed answer to the site prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiteCommand {
    Exit,
    Back,
    /// 0-based index into the listed sites
    Select(usize),
}

/// Parses a 1-based site number, `back` or `exit`
pub fn parse_site_input(input: &str, site_count: usize) -> Result<SiteCommand, InputError> {
    match input.trim() {
        "exit" => Ok(SiteCommand::Exit),
        "back" => Ok(SiteCommand::Back),
        number if !number.is_empty() && number.chars().all(|c| c.is_ascii_digit()) => {
            match number.parse::<usize>() {
                Ok(n) if (1..=site_count).contains(&n) => Ok(SiteCommand::Select(n - 1)),
                _ => Err(InputError::InvalidSelection),
            }
        }
        _ => Err(InputError::InvalidSelection),
    }
}

/// Numbered listing of a state's sites
pub fn format_site_list(state_name: &str, sites: &[ParkSite]) -> String {
    let mut out = format!(
        "{SEPARATOR}\nList of national sites in {}:\n{SEPARATOR}\n",
        state_name.trim().to_lowercase()
    );
    for (i, site) in sites.iter().enumerate() {
        out.push_str(&format!("[{}] {}\n", i + 1, site.info()));
    }
    out
}

/// Listing of the places near a site
pub fn format_places(site: &ParkSite, places: &[NearbyPlace]) -> String {
    let mut out = format!("{SEPARATOR}\nPlaces near {}\n{SEPARATOR}\n", site.name);
    for place in places {
        out.push_str(&format!("{}\n", place));
    }
    out
}

/// The prompt loop over an input stream and an output sink
pub struct App<R, W> {
    service: ParkService,
    lines: Lines<R>,
    output: W,
    /// Current prompt
    pub state: AppState,
    /// Set once the operator asked to leave or input ended
    pub should_quit: bool,
}

impl<R, W> App<R, W>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    pub fn new(service: ParkService, input: R, output: W) -> Self {
        Self {
            service,
            lines: input.lines(),
            output,
            state: AppState::ChooseState,
            should_quit: false,
        }
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    /// Runs until `exit` or end of input, then flushes the cache
    ///
    /// Network and file failures end the loop; the cache is still flushed
    /// before the error is returned.
    pub async fn run(&mut self) -> Result<(), AppError> {
        let result = self.prompt_loop().await;
        let flushed = self.service.flush();
        result?;
        flushed?;
        Ok(())
    }

    async fn prompt_loop(&mut self) -> Result<(), AppError> {
        while !self.should_quit {
            let prompt = match self.state {
                AppState::ChooseState => STATE_PROMPT,
                AppState::ChooseSite { .. } => SITE_PROMPT,
            };
            write!(self.output, "{prompt} ")?;
            self.output.flush()?;

            let Some(line) = self.lines.next_line().await? else {
                writeln!(self.output)?;
                self.should_quit = true;
                break;
            };
            self.handle_line(&line).await?;
        }
        Ok(())
    }

    /// Handles one line of operator input at the current prompt
    pub async fn handle_line(&mut self, line: &str) -> Result<(), AppError> {
        if self.state == AppState::ChooseState {
            self.handle_state_input(line).await
        } else {
            self.handle_site_input(line).await
        }
    }

    async fn handle_state_input(&mut self, line: &str) -> Result<(), AppError> {
        let state_name = line.trim();
        if state_name == "exit" {
            self.should_quit = true;
            return Ok(());
        }

        let known = match self.service.state_index().await {
            Ok(index) => index.contains(state_name),
            Err(e) => return self.report(e),
        };
        if !known {
            writeln!(self.output, "{}", InputError::UnknownState)?;
            return Ok(());
        }

        match self.service.sites_for_state(state_name).await {
            Ok(sites) => {
                write!(self.output, "{}", format_site_list(state_name, &sites))?;
                self.state = AppState::ChooseSite { sites };
                Ok(())
            }
            Err(e) => self.report(e),
        }
    }

    async fn handle_site_input(&mut self, line: &str) -> Result<(), AppError> {
        let AppState::ChooseSite { sites } = &self.state else {
            return Ok(());
        };

        let site = match parse_site_input(line, sites.len()) {
            Ok(SiteCommand::Exit) => {
                self.should_quit = true;
                return Ok(());
            }
            Ok(SiteCommand::Back) => {
                self.state = AppState::ChooseState;
                return Ok(());
            }
            Ok(SiteCommand::Select(index)) => sites[index].clone(),
            Err(e) => {
                writeln!(self.output, "{e}")?;
                return Ok(());
            }
        };

        let places = self
            .service
            .nearby(&site)
            .await
            .and_then(|result| result.places().map_err(ParkError::from));
        match places {
            Ok(places) => {
                write!(self.output, "{}", format_places(&site, &places))?;
                Ok(())
            }
            Err(e) => self.report(e),
        }
    }

    /// Prints a lookup failure, or passes it on when it is not recoverable
    ///
    /// A structural failure also abandons the listed sites.
    fn report(&mut self, error: ParkError) -> Result<(), AppError> {
        let kind = error.kind();
        if kind == ErrorKind::Transient {
            return Err(error.into());
        }

        warn!(error = %error, "lookup failed");
        writeln!(self.output, "[Error] {error}")?;
        if kind == ErrorKind::Structural {
            self.state = AppState::ChooseState;
        }
        Ok(())
    }
}
