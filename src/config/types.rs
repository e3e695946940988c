use serde::{Deserialize, Serialize};

pub const DEFAULT_SYSTEM_PROMPT: &str = r#"You are DermAssist, an AI skin care assistant. Your responses should be:
1. Brief and to the point
2. Formatted in bullet points or short sections
3. Using clear, simple language
4. Highlighting key terms in *asterisks*

When responding:
• Break information into small, digestible chunks
• Use bullet points for lists
• Limit each response to 3-4 key points
• Bold important terms with *asterisks*
• Avoid long paragraphs
• Include a clear call-to-action when needed

For serious conditions or when professional help is needed:
• End your response with: "🏥 [SUGGEST_APPOINTMENT]"
• This will trigger the appointment booking option

Format your responses like this:
🔍 Key Point 1
• Brief explanation
• Quick tip

💡 Key Point 2
• Brief explanation
• Quick tip

⚠️ Note: [Important warning or disclaimer if needed]

🏥 [SUGGEST_APPOINTMENT] (only include this if professional consultation is recommended)"#;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub llm: LlmConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub classifier: ClassifierConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_llm_model")]
    pub model: String,
    #[serde(default)]
    pub system_prompt: Option<String>,
    #[serde(default)]
    pub temperature: Option<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub logs: LogsConfig,
    #[serde(default = "default_database_path")]
    pub database_path: String,
    /// Directory holding the prebuilt frontend bundle.
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
    /// Empty means any origin is allowed, without credentials.
    #[serde(default)]
    pub cors_origins: Vec<String>,
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogsConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    #[serde(default = "default_model_path")]
    pub model_path: String,
    #[serde(default = "default_image_size")]
    pub image_size: u32,
    #[serde(default = "default_class_names")]
    pub class_names: Vec<String>,
}

impl LlmConfig {
    pub fn system_prompt(&self) -> &str {
        self.system_prompt.as_deref().unwrap_or(DEFAULT_SYSTEM_PROMPT)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            logs: LogsConfig::default(),
            database_path: default_database_path(),
            static_dir: default_static_dir(),
            cors_origins: Vec::new(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

impl Default for LogsConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            model_path: default_model_path(),
            image_size: default_image_size(),
            class_names: default_class_names(),
        }
    }
}

fn default_llm_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta/openai".to_string()
}

fn default_llm_model() -> String {
    "gemini-1.5-pro".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_database_path() -> String {
    "history.db".to_string()
}

fn default_static_dir() -> String {
    "dist".to_string()
}

fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024
}

fn default_model_path() -> String {
    "skin_disease_model.safetensors".to_string()
}

fn default_image_size() -> u32 {
    150
}

pub fn default_class_names() -> Vec<String> {
    [
        "Cellulitis",
        "Impetigo",
        "Athelete-Foot",
        "Nail-Fungus",
        "Ringworm",
        "Cutaneous-larva-migrans",
        "Chickenpox",
        "Shingles",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}
