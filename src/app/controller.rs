use crate::app::intent::{CalcAction, Command};
use crate::app::state::AppState;
use crate::config::CatalogConfig;
use crate::domain::app_settings::Section;
use crate::domain::calculator::ChainSpeed;
use crate::domain::user::SessionUser;
use crate::repository::Repository;
use crate::services::data_source::{LoadOutcome, ProductSource, load_with_deadline};
use crate::services::error_handling::{CatalogError, LogHelper, UserErrorFormatter};
use crate::services::export_service::ExportFormat;
use crate::services::{AuthService, CatalogStore, ExportService, UserProfileStore};
use anyhow::Result;
use std::path::PathBuf;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    Updated,
    /// The intent had no effect (out-of-range page, no user, unknown product)
    Ignored,
    /// Rejected with a user-visible message, state unchanged
    Rejected(String),
    Exported {
        format: ExportFormat,
        content: String,
        path: Option<PathBuf>,
    },
    Calculated(f64),
    ChainSpeed(ChainSpeed),
}

/// Top-level owner of application state. Intents go in through [`dispatch`](Self::dispatch).
pub struct AppController {
    state: AppState,
    auth: AuthService,
    config: CatalogConfig,
}

impl AppController {
    pub fn new(config: CatalogConfig, repository: &Repository) -> Self {
        let catalog = CatalogStore::new(config.page_size);
        let profiles =
            UserProfileStore::with_history_limit(repository.profiles.clone(), config.history_limit);
        Self {
            state: AppState::new(catalog, profiles),
            auth: AuthService::new(config.admin.clone()),
            config,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Restores the previous session and loads the catalog, racing `primary`
    /// against the configured deadline.
    pub async fn bootstrap(
        &mut self,
        primary: &dyn ProductSource,
        fallback: &dyn ProductSource,
    ) -> Result<LoadOutcome> {
        match self.state.profiles.restore_session().await {
            Ok(true) => info!(
                user = ?self.state.profiles.user().map(|u| &u.name),
                "Session restored"
            ),
            Ok(false) => {}
            Err(e) => LogHelper::log_recovered("restore session", &e),
        }

        let outcome = load_with_deadline(primary, fallback, self.config.fetch_timeout()).await?;
        self.state.catalog.load(outcome.products.clone());
        self.state.data_origin = Some(outcome.origin);
        Ok(outcome)
    }

    pub async fn dispatch(&mut self, command: Command) -> Result<CommandOutcome> {
        debug!(command = ?command, "Dispatching intent");
        self.state.notice = None;

        let outcome = match command {
            Command::Navigate(section) => {
                self.state.section = section;
                CommandOutcome::Updated
            }
            Command::Search(query) => self.search(&query).await,
            Command::SetFilter(field) => {
                self.state.catalog.set_filter(field);
                CommandOutcome::Updated
            }
            Command::FilterByCategory(category) => {
                self.state.catalog.filter_by_category(&category);
                self.state.section = Section::Products;
                CommandOutcome::Updated
            }
            Command::ClearFilters => {
                self.state.catalog.clear_filters();
                CommandOutcome::Updated
            }
            Command::GoToPage(page) => moved(self.state.catalog.go_to_page(page)),
            Command::PreviousPage => moved(self.state.catalog.previous_page()),
            Command::NextPage => moved(self.state.catalog.next_page()),
            Command::ShowProduct(id) => {
                if self.state.catalog.find(&id).is_some() {
                    self.state.selected_product = Some(id);
                    CommandOutcome::Updated
                } else {
                    CommandOutcome::Ignored
                }
            }
            Command::CloseProduct => {
                self.state.selected_product = None;
                CommandOutcome::Updated
            }
            Command::ToggleBookmark(id) => self.toggle_bookmark(&id).await,
            Command::Login(user) => self.login(user).await,
            Command::LoginAdmin { id, password } => {
                match self.auth.authenticate_admin(&id, &password) {
                    Ok(user) => self.login(user).await,
                    Err(e) => self.reject(e),
                }
            }
            Command::LoginWithProvider(provider) => match self.auth.provider_login(provider) {
                Ok(user) => self.login(user).await,
                Err(e) => self.reject(e),
            },
            Command::Logout => {
                let result = self.state.profiles.logout().await;
                self.best_effort("logout", result);
                CommandOutcome::Updated
            }
            Command::Export { format, path } => {
                let products = self.state.catalog.filtered();
                let content = ExportService::export(products, format)?;
                if let Some(path) = &path {
                    ExportService::export_to_file(products, format, path)?;
                }
                CommandOutcome::Exported { format, content, path }
            }
            Command::ToggleTheme => {
                self.state.theme = self.state.theme.toggled();
                CommandOutcome::Updated
            }
            Command::Calc(action) => self.calc(action),
            Command::Calculate(expression) => {
                self.state.calculator.clear();
                self.state.calculator.append(&expression);
                self.calc(CalcAction::Evaluate)
            }
            Command::ChainSpeed { pitch, teeth, rpm } => {
                match ChainSpeed::from_inputs(&pitch, &teeth, &rpm) {
                    Ok(speed) => CommandOutcome::ChainSpeed(speed),
                    Err(e) => self.reject(CatalogError::from(e)),
                }
            }
        };

        Ok(outcome)
    }

    async fn search(&mut self, query: &str) -> CommandOutcome {
        let Some(normalized) = self.state.catalog.search(query) else {
            return CommandOutcome::Ignored;
        };
        let result = self.state.profiles.record_search(&normalized).await;
        self.best_effort("record search", result);
        self.state.section = Section::Products;
        CommandOutcome::Updated
    }

    async fn toggle_bookmark(&mut self, product_id: &str) -> CommandOutcome {
        if !self.state.is_logged_in() {
            return CommandOutcome::Ignored;
        }
        let Some(product) = self.state.catalog.find(product_id).cloned() else {
            return CommandOutcome::Ignored;
        };
        let result = self.state.profiles.toggle_bookmark(&product).await;
        self.best_effort("toggle bookmark", result);
        CommandOutcome::Updated
    }

    async fn login(&mut self, user: SessionUser) -> CommandOutcome {
        let result = self.state.profiles.login(user).await;
        self.best_effort("login", result);
        CommandOutcome::Updated
    }

    fn calc(&mut self, action: CalcAction) -> CommandOutcome {
        let display = &mut self.state.calculator;
        match action {
            CalcAction::Append(input) => display.append(&input),
            CalcAction::DeleteLast => display.delete_last(),
            CalcAction::Clear => display.clear(),
            CalcAction::Evaluate => {
                return match display.evaluate() {
                    Ok(value) => CommandOutcome::Calculated(value),
                    Err(e) => self.reject(CatalogError::from(e)),
                };
            }
        }
        CommandOutcome::Updated
    }

    fn reject(&mut self, error: CatalogError) -> CommandOutcome {
        let message = UserErrorFormatter::format_catalog_error(&error);
        debug!(error = %error, "Intent rejected");
        self.state.notice = Some(message.clone());
        CommandOutcome::Rejected(message)
    }

    /// Storage failures never undo the in-memory change; they surface as a notice.
    fn best_effort<T>(&mut self, context: &str, result: Result<T>) {
        if let Err(e) = result {
            LogHelper::log_recovered(context, &e);
            self.state.notice = Some(UserErrorFormatter::format_for_ui(&e));
        }
    }
}

fn moved(changed: bool) -> CommandOutcome {
    if changed {
        CommandOutcome::Updated
    } else {
        CommandOutcome::Ignored
    }
}
