use std::io::Write;
use std::path::PathBuf;

use colored::*;
use tracing::{info, warn};

use crate::catalog::{fetch_catalog, print_model_menu, select_model, show_model_details, ModelSummary};
use crate::chat::ChatSession;
use crate::client::OllamaClient;
use crate::config::{DeriveConfig, Settings};
use crate::console::LineSource;
use crate::derive::{capture, derive_model};
use crate::error::{ConsoleError, ParameterError, SessionError};

/// Where the menu currently is.
#[derive(Debug, Clone, PartialEq)]
pub enum MenuState {
    /// Model list; re-fetched every time it is shown
    MainMenu,
    /// Actions for the selected model
    SecondaryMenu(ModelSummary),
    Exit,
}

/// An entry of the secondary menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecondaryChoice {
    Run,
    ShowDetails,
    Copy,
    Back,
    Exit,
}

impl SecondaryChoice {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(Self::Run),
            "2" => Some(Self::ShowDetails),
            "3" => Some(Self::Copy),
            "4" => Some(Self::Back),
            "5" => Some(Self::Exit),
            _ => None,
        }
    }
}

fn print_secondary_menu(model: &ModelSummary, out: &mut dyn Write) -> std::io::Result<()> {
    writeln!(out, "\n{} {}", "Secondary Menu:".bright_cyan().bold(), model.name.green())?;
    writeln!(out, "1. Run Model")?;
    writeln!(out, "2. Show Model Details")?;
    writeln!(out, "3. Copy Model")?;
    writeln!(out, "4. Back to Main Menu")?;
    writeln!(out, "5. Exit")
}

/// The top-level interactive loop: pick a model, then act on it.
pub struct MenuController {
    client: OllamaClient,
    sessions_dir: PathBuf,
    derive: DeriveConfig,
}

impl MenuController {
    pub fn new(client: OllamaClient, sessions_dir: PathBuf, derive: DeriveConfig) -> Self {
        Self {
            client,
            sessions_dir,
            derive,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            OllamaClient::new(settings.base_url()),
            settings.sessions.directory.clone(),
            settings.derive.clone(),
        )
    }

    /// Drives the menu until the user exits, input ends, or there are no
    /// models to choose from.
    ///
    /// # Errors
    ///
    /// Only a broken console ends the loop with an error; closed input is a
    /// normal exit.
    pub async fn run(&self, input: &mut dyn LineSource, out: &mut dyn Write) -> Result<(), ConsoleError> {
        let mut state = MenuState::MainMenu;

        while state != MenuState::Exit {
            state = match self.step(state, input, out).await {
                Ok(next) => next,
                Err(ConsoleError::Closed) => {
                    writeln!(out, "\nGoodbye!")?;
                    MenuState::Exit
                }
                Err(e) => return Err(e),
            };
        }

        info!("Menu loop finished");
        Ok(())
    }

    /// Performs the work of `state` and returns the state to move to.
    pub async fn step(
        &self,
        state: MenuState,
        input: &mut dyn LineSource,
        out: &mut dyn Write,
    ) -> Result<MenuState, ConsoleError> {
        match state {
            MenuState::MainMenu => self.main_menu(input, out).await,
            MenuState::SecondaryMenu(model) => self.secondary_menu(model, input, out).await,
            MenuState::Exit => Ok(MenuState::Exit),
        }
    }

    async fn main_menu(&self, input: &mut dyn LineSource, out: &mut dyn Write) -> Result<MenuState, ConsoleError> {
        let models = fetch_catalog(&self.client, out).await?;
        if models.is_empty() {
            writeln!(out, "{}", "No models found.".yellow())?;
            return Ok(MenuState::Exit);
        }

        print_model_menu(&models, out)?;
        let selected = select_model(&models, input, out)?;
        Ok(MenuState::SecondaryMenu(selected.clone()))
    }

    async fn secondary_menu(
        &self,
        model: ModelSummary,
        input: &mut dyn LineSource,
        out: &mut dyn Write,
    ) -> Result<MenuState, ConsoleError> {
        print_secondary_menu(&model, out)?;
        let line = input.read_line("Enter your choice (1-5): ")?;

        let Some(choice) = SecondaryChoice::parse(&line) else {
            writeln!(out, "{}", "Invalid option. Please try again.".yellow())?;
            return Ok(MenuState::SecondaryMenu(model));
        };
        info!("Secondary menu choice {:?} for {}", choice, model.name);

        match choice {
            SecondaryChoice::Run => self.run_model(&model, input, out).await?,
            SecondaryChoice::ShowDetails => show_model_details(&self.client, &model.name, out).await?,
            SecondaryChoice::Copy => self.copy_model(&model, input, out).await?,
            SecondaryChoice::Back => return Ok(MenuState::MainMenu),
            SecondaryChoice::Exit => return Ok(MenuState::Exit),
        }

        Ok(MenuState::SecondaryMenu(model))
    }

    async fn run_model(
        &self,
        model: &ModelSummary,
        input: &mut dyn LineSource,
        out: &mut dyn Write,
    ) -> Result<(), ConsoleError> {
        let session = ChatSession::new(&self.client, &self.sessions_dir);
        match session.run(&model.name, input, out).await {
            Ok(_) => Ok(()),
            Err(SessionError::Output(e)) => Err(e.into()),
            Err(SessionError::Console(e)) => Err(e),
            // Already reported by the session
            Err(_) => Ok(()),
        }
    }

    async fn copy_model(
        &self,
        model: &ModelSummary,
        input: &mut dyn LineSource,
        out: &mut dyn Write,
    ) -> Result<(), ConsoleError> {
        let new_name = input.read_line("Enter the name for the new model: ")?;
        let new_name = new_name.trim();

        let parameters = match capture(input) {
            Ok(parameters) => parameters,
            Err(ParameterError::Console(e)) => return Err(e),
            Err(e) => {
                warn!("Parameter capture for {} aborted: {}", new_name, e);
                writeln!(out, "{}", format!("Error: {}", e).red())?;
                return Ok(());
            }
        };

        derive_model(
            &self.derive.tool,
            &self.derive.directory,
            new_name,
            &model.name,
            &parameters,
            out,
        )
        .await?;
        Ok(())
    }
}
