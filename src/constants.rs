/// Constants module to avoid magic numbers in the codebase

// Network Configuration
pub const DEFAULT_SERVER_URL: &str = "http://localhost:8000";
pub const CHAT_ENDPOINT: &str = "/chat";
pub const LIST_SOURCES_ENDPOINT: &str = "/list-sources";
pub const HEALTH_ENDPOINT: &str = "/";

// Timeouts
pub const HTTP_REQUEST_TIMEOUT_SECS: u64 = 600; // agent runs can take minutes
pub const HEALTH_CHECK_TIMEOUT_SECS: u64 = 3;

// Session identity
pub const SESSION_STORAGE_KEY: &str = "chatSessionId";
pub const SESSION_ID_PREFIX: &str = "user-";
pub const SESSION_ID_HEX_LEN: usize = 8;

// Answering service
pub const DEFAULT_MODEL: &str = "llama-3.3-70b";

// Conversation texts
pub const GREETING_TEXT: &str = "¡Hola! Soy tu asistente virtual. ¿En qué puedo ayudarte hoy?";
pub const GREETING_DELAY_MS: u64 = 500;
pub const GENERIC_APOLOGY: &str = "Lo siento, ha ocurrido un error. Por favor, intenta de nuevo.";
pub const DETAILED_APOLOGY_PREFIX: &str = "Lo siento, ha ocurrido un error: ";

// Source selector
pub const AUTODETECT_LABEL: &str = "Autodetectar";
pub const SOURCES_TITLE: &str = "Fuente de datos:";
pub const SOURCES_ERROR_NOTICE: &str = "No se pudieron cargar las fuentes de datos.";

// UI Configuration
pub const UI_POLL_INTERVAL_MS: u64 = 50;
pub const UI_SCROLL_LINES: u16 = 3;
pub const UI_PAGE_LINES: u16 = 10;
