use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of backend families the gateway can front.
///
/// Each variant carries the full capability set the translator needs:
/// default base URL, model-name remapping, and embedding support. Adding a
/// backend family means adding a variant here, not patching conditionals in
/// the handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum BackendKind {
    /// OpenAI-native aggregation gateway. No model remapping needed.
    #[default]
    AiGateway,
    /// Web-scraping adapter fleet. Model names are remapped to its own
    /// identifiers and it has no embeddings endpoint.
    ChatgptAdapter,
}

/// Static capability entry for one model a backend claims to serve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelDescriptor {
    pub id: &'static str,
    pub owned_by: &'static str,
}

const AI_GATEWAY_MODELS: &[ModelDescriptor] = &[
    ModelDescriptor { id: "gpt-3.5-turbo", owned_by: "openai" },
    ModelDescriptor { id: "gpt-4", owned_by: "openai" },
    ModelDescriptor { id: "claude-3-opus", owned_by: "anthropic" },
    ModelDescriptor { id: "claude-3-sonnet", owned_by: "anthropic" },
    ModelDescriptor { id: "gemini-pro", owned_by: "google" },
];

const CHATGPT_ADAPTER_MODELS: &[ModelDescriptor] = &[
    ModelDescriptor { id: "gpt-3.5-turbo", owned_by: "openai" },
    ModelDescriptor { id: "gpt-4", owned_by: "openai" },
    ModelDescriptor { id: "claude-3", owned_by: "anthropic" },
    ModelDescriptor { id: "coze", owned_by: "coze" },
    ModelDescriptor { id: "deepseek", owned_by: "deepseek" },
    ModelDescriptor { id: "cursor", owned_by: "cursor" },
    ModelDescriptor { id: "windsurf", owned_by: "windsurf" },
    ModelDescriptor { id: "qodo", owned_by: "qodo" },
    ModelDescriptor { id: "blackbox", owned_by: "blackbox" },
    ModelDescriptor { id: "you", owned_by: "you.com" },
    ModelDescriptor { id: "grok", owned_by: "xai" },
    ModelDescriptor { id: "bing", owned_by: "microsoft" },
];

impl BackendKind {
    /// Stable identifier as it appears in config files and `--backend`.
    pub fn id(self) -> &'static str {
        match self {
            Self::AiGateway => "ai-gateway",
            Self::ChatgptAdapter => "chatgpt-adapter",
        }
    }

    /// Default base URL when no override is configured.
    pub fn default_base_url(self) -> &'static str {
        match self {
            Self::AiGateway => "http://localhost:8080",
            Self::ChatgptAdapter => "http://localhost:8081",
        }
    }

    /// Whether the family exposes a real `/v1/embeddings` endpoint.
    pub fn supports_embeddings(self) -> bool {
        match self {
            Self::AiGateway => true,
            Self::ChatgptAdapter => false,
        }
    }

    /// Remap an OpenAI model name to the backend's own identifier.
    ///
    /// Total and idempotent: names not in the table pass through unchanged.
    /// The table is a compatibility shim, not a validation gate.
    pub fn remap_model<'a>(self, model: &'a str) -> &'a str {
        match self {
            Self::AiGateway => model,
            Self::ChatgptAdapter => match model {
                "claude-3-opus" | "claude-3-sonnet" => "claude-3",
                other => other,
            },
        }
    }

    /// Models this backend family claims to serve.
    pub fn models(self) -> &'static [ModelDescriptor] {
        match self {
            Self::AiGateway => AI_GATEWAY_MODELS,
            Self::ChatgptAdapter => CHATGPT_ADAPTER_MODELS,
        }
    }

    /// Registry lookup by raw identifier. Unrecognized identifiers yield an
    /// empty list rather than an error, so listing stays total across
    /// unconfigured backends.
    pub fn models_for(id: &str) -> &'static [ModelDescriptor] {
        match Self::from_str(id) {
            Ok(kind) => kind.models(),
            Err(_) => &[],
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "ai-gateway" => Ok(Self::AiGateway),
            "chatgpt-adapter" => Ok(Self::ChatgptAdapter),
            other => Err(format!(
                "unknown backend '{other}' (expected 'ai-gateway' or 'chatgpt-adapter')"
            )),
        }
    }
}
