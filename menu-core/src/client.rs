use log::{debug, info, warn};

use crate::config::ServerConfig;
use crate::error::{MenuError, NetworkError};
use crate::http::HttpTransport;
use crate::menu::{parse_menu, ChangeMealRequest, MealCategory, MenuOfDay};

/// Talks to the menu server. The server is the only source of truth; nothing
/// is cached here.
pub struct MenuClient<H> {
    http: H,
    base_url: String,
}

impl<H: HttpTransport> MenuClient<H> {
    pub fn new(http: H, server: &ServerConfig) -> Self {
        Self {
            http,
            base_url: server.base_url(),
        }
    }

    pub fn menu_url(&self, date: &str) -> String {
        format!("{}/getMenu?date={}", self.base_url, urlencoding::encode(date))
    }

    pub fn change_url(&self) -> String {
        format!("{}/changeMeal", self.base_url)
    }

    /// GET the menu for `date`.
    pub fn fetch_menu(&mut self, date: &str) -> Result<MenuOfDay, MenuError> {
        let url = self.menu_url(date);
        info!("GET {}", url);

        let response = self.http.get(&url)?;
        info!("GET /getMenu -> {}", response.status);

        if !response.is_ok() {
            warn!("HTTP GET failed with status {}", response.status);
            return Err(NetworkError::Status(response.status).into());
        }

        debug!("Received payload: {}", response.body_text());
        parse_menu(date, &response.body).inspect_err(|e| warn!("Failed to parse menu JSON: {}", e))
    }

    /// POST a random replacement request for one slot.
    ///
    /// Success means HTTP 200 only; callers re-fetch to see the new meal.
    pub fn request_random_meal(
        &mut self,
        date: &str,
        category: MealCategory,
    ) -> Result<(), MenuError> {
        let url = self.change_url();
        let body = serde_json::to_vec(&ChangeMealRequest::random(date, category))
            .map_err(|e| NetworkError::Transport(format!("encode request: {}", e)))?;
        info!("POST {} ({} for {})", url, category, date);

        let response = self.http.post_json(&url, &body)?;
        if !response.is_ok() {
            warn!("Failed to change {}: HTTP {}", category, response.status);
            return Err(NetworkError::Status(response.status).into());
        }

        info!("Meal changed successfully: {}", response.body_text());
        Ok(())
    }
}
