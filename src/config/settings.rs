use serde::Deserialize;

/// Top-level configuration settings for the relay.
///
/// Built once at startup and shared read-only afterwards.
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub store: StoreSettings,
    pub chat: ChatSettings,
    pub notifier: NotifierSettings,
    pub generator: GeneratorSettings,
    pub logging: LoggingSettings,
}

/// Addresses the two listeners bind to.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub ws_port: u16,
    pub http_port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StoreSettings {
    pub path: String,
}

/// Sender tags that drive pipeline behavior.
#[derive(Debug, Deserialize, Clone)]
pub struct ChatSettings {
    pub human_tag: String,
    pub bot_tag: String,
}

/// Outbound e-mail settings. `operator_email` and `api_token` are required.
#[derive(Debug, Deserialize, Clone)]
pub struct NotifierSettings {
    pub operator_email: String,
    pub from_address: String,
    pub api_url: String,
    pub api_token: String,
}

/// Text-generation provider settings. `api_key` is required.
#[derive(Debug, Deserialize, Clone)]
pub struct GeneratorSettings {
    pub api_url: String,
    pub api_key: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingSettings {
    pub level: String,
    pub json: bool,
}

/// Partial configuration settings loaded from files or environment.
///
/// Every field is optional; missing values are filled from `Settings::default()`.
#[derive(Debug, Default, Deserialize)]
pub struct PartialSettings {
    pub server: Option<PartialServerSettings>,
    pub store: Option<PartialStoreSettings>,
    pub chat: Option<PartialChatSettings>,
    pub notifier: Option<PartialNotifierSettings>,
    pub generator: Option<PartialGeneratorSettings>,
    pub logging: Option<PartialLoggingSettings>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PartialServerSettings {
    pub host: Option<String>,
    pub ws_port: Option<u16>,
    pub http_port: Option<u16>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PartialStoreSettings {
    pub path: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PartialChatSettings {
    pub human_tag: Option<String>,
    pub bot_tag: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PartialNotifierSettings {
    pub operator_email: Option<String>,
    pub from_address: Option<String>,
    pub api_url: Option<String>,
    pub api_token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PartialGeneratorSettings {
    pub api_url: Option<String>,
    pub api_key: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PartialLoggingSettings {
    pub level: Option<String>,
    pub json: Option<bool>,
}

/// Provides default values for `Settings`.
///
/// Required credentials default to empty strings and are rejected by
/// `Settings::missing_required`.
impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings {
                host: "127.0.0.1".to_string(),
                ws_port: 8080,
                http_port: 5001,
            },
            store: StoreSettings {
                path: "chat_db".to_string(),
            },
            chat: ChatSettings {
                human_tag: "User".to_string(),
                bot_tag: "AI".to_string(),
            },
            notifier: NotifierSettings {
                operator_email: String::new(),
                from_address: "noreply@localhost".to_string(),
                api_url: "https://api.postmarkapp.com".to_string(),
                api_token: String::new(),
            },
            generator: GeneratorSettings {
                api_url: "https://api.deepai.org/api/text-generator".to_string(),
                api_key: String::new(),
            },
            logging: LoggingSettings {
                level: "info".to_string(),
                json: false,
            },
        }
    }
}

impl Settings {
    /// Overlay whatever `partial` specifies onto these settings.
    pub fn merge(self, partial: PartialSettings) -> Self {
        let server = partial.server.unwrap_or_default();
        let store = partial.store.unwrap_or_default();
        let chat = partial.chat.unwrap_or_default();
        let notifier = partial.notifier.unwrap_or_default();
        let generator = partial.generator.unwrap_or_default();
        let logging = partial.logging.unwrap_or_default();

        Self {
            server: ServerSettings {
                host: server.host.unwrap_or(self.server.host),
                ws_port: server.ws_port.unwrap_or(self.server.ws_port),
                http_port: server.http_port.unwrap_or(self.server.http_port),
            },
            store: StoreSettings {
                path: store.path.unwrap_or(self.store.path),
            },
            chat: ChatSettings {
                human_tag: chat.human_tag.unwrap_or(self.chat.human_tag),
                bot_tag: chat.bot_tag.unwrap_or(self.chat.bot_tag),
            },
            notifier: NotifierSettings {
                operator_email: notifier
                    .operator_email
                    .unwrap_or(self.notifier.operator_email),
                from_address: notifier.from_address.unwrap_or(self.notifier.from_address),
                api_url: notifier.api_url.unwrap_or(self.notifier.api_url),
                api_token: notifier.api_token.unwrap_or(self.notifier.api_token),
            },
            generator: GeneratorSettings {
                api_url: generator.api_url.unwrap_or(self.generator.api_url),
                api_key: generator.api_key.unwrap_or(self.generator.api_key),
            },
            logging: LoggingSettings {
                level: logging.level.unwrap_or(self.logging.level),
                json: logging.json.unwrap_or(self.logging.json),
            },
        }
    }

    /// Returns the dotted key of the first required setting that is blank.
    pub fn missing_required(&self) -> Option<&'static str> {
        [
            ("notifier.operator_email", &self.notifier.operator_email),
            ("notifier.api_token", &self.notifier.api_token),
            ("generator.api_key", &self.generator.api_key),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(key, _)| key)
    }

    pub fn ws_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.ws_port)
    }

    pub fn http_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.http_port)
    }
}
